//! Middle-end optimization stages
//!
//! Passes rewrite the tree produced by the parser before type checking.

pub mod passes;

pub use passes::{optimize, LiteralInlinerPass, OptimizationPass};
