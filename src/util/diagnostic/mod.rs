//! 统一诊断系统
//!
//! 优化阶段只负责收集诊断，不负责渲染。
//!
//! # 模块结构
//!
//! - [`error`] - 诊断数据结构 (Diagnostic, Severity)
//! - [`codes`] - 错误码注册表与构建器
//! - [`collect`] - 错误收集器

pub mod codes;
pub mod collect;
pub mod error;

#[cfg(test)]
mod tests;

// 重新导出
pub use codes::{DiagnosticBuilder, ErrorCategory, ErrorCodeDefinition};
pub use collect::ErrorCollector;
pub use error::{Diagnostic, Severity};
