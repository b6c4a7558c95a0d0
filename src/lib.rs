//! capsule-opt
//!
//! Literal-inlining optimization stage for a capsule-based language compiler.
//! The stage sits between the parser and the type checker: identifier reads
//! bound to literals are replaced by the literal, redundant literal bindings
//! are dropped, and enumerations are flattened into numeric constants.
//!
//! # Example
//!
//! ```
//! use capsule_opt::frontend::ast::{types, Ast};
//! use capsule_opt::frontend::Session;
//!
//! let mut ast = Ast::new();
//! let x = ast.declared_identifier("x", types::NUMBER);
//! let five = ast.number("5");
//! let bind = ast.assignment(x, five);
//! let read = ast.identifier("x");
//! let capsule = ast.capsule("Main", vec![bind, read]);
//!
//! let mut session = Session::new();
//! assert!(session.optimize_ast(&mut ast, capsule, false));
//! ```

#![warn(rust_2018_idioms)]

pub mod frontend;
pub mod middle;
pub mod util;

// Re-exports
pub use anyhow::{Context, Result};
pub use thiserror::Error;

use ::std::path::Path;

use tracing::debug;

use crate::frontend::ast::{Ast, NodeId};
use crate::frontend::Session;
use crate::util::config::OptimizeConfig;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the optimization stage with settings read from a TOML file
///
/// A missing file falls back to the default settings. Returns whether the
/// run raised no diagnostics.
pub fn optimize_with_config_file(
    config_path: &Path,
    ast: &mut Ast,
    root: NodeId,
) -> Result<bool> {
    let config = OptimizeConfig::load(config_path)
        .with_context(|| format!("Failed to load config: {}", config_path.display()))?;
    debug!("loaded optimize config from {}", config_path.display());

    let silence_errors = config.silence_errors;
    let mut session = Session::with_config(config);
    Ok(session.optimize_ast(ast, root, silence_errors))
}
