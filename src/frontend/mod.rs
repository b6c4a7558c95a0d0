//! Frontend data structures
//!
//! The tree model shared with the external parser and the compilation
//! session that owns diagnostics across stages.

pub mod ast;
pub mod session;

pub use session::{ParsedCapsule, Session};
