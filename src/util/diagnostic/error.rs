//! 诊断数据结构
//!
//! - `Diagnostic` 的 `message` 和 `help` 在构建时已渲染完成
//! - 只通过 `DiagnosticBuilder` 创建诊断，所有错误码都在注册表中登记

use crate::frontend::ast::NodeId;

/// 诊断严重级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// 检查是否为错误级别
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
            Severity::Hint => write!(f, "hint"),
        }
    }
}

/// 诊断信息
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// 严重级别
    pub severity: Severity,
    /// 错误码
    pub code: String,
    /// 完整消息
    pub message: String,
    /// 帮助信息
    pub help: String,
    /// 触发诊断的节点
    pub node: Option<NodeId>,
    /// 模板参数（保留原始值，便于调用方按字段读取）
    pub params: Vec<(&'static str, String)>,
}

impl Diagnostic {
    /// `pub(crate)`: 仅由 `DiagnosticBuilder::build()` 调用
    pub(crate) fn new(
        severity: Severity,
        code: String,
        message: String,
        help: String,
        node: Option<NodeId>,
        params: Vec<(&'static str, String)>,
    ) -> Self {
        Self {
            severity,
            code,
            message,
            help,
            node,
            params,
        }
    }

    /// 读取模板参数
    pub fn param(
        &self,
        key: &str,
    ) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
    }
}
