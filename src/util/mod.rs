//! Utility modules: configuration, diagnostics, logging

pub mod config;
pub mod diagnostic;
pub mod logger;
