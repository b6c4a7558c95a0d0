//! 错误码定义
//!
//! E2xxx: 语义分析阶段的错误码

use super::{DiagnosticBuilder, ErrorCategory, ErrorCodeDefinition};

/// E2020 非法重新绑定
pub const ILLEGAL_REASSIGNMENT: ErrorCodeDefinition = ErrorCodeDefinition {
    code: "E2020",
    category: ErrorCategory::Semantic,
    message_template: "Illegal reassignment of '{name}'",
    help_template: "'{name}' is already bound in this scope; bindings cannot be reassigned",
};

/// E2xxx 错误码列表
pub static E2XXX: &[ErrorCodeDefinition] = &[ILLEGAL_REASSIGNMENT];

// E2xxx 快捷方法
impl ErrorCodeDefinition {
    /// E2020 非法重新绑定
    pub fn illegal_reassignment(name: &str) -> DiagnosticBuilder {
        ILLEGAL_REASSIGNMENT.builder().param("name", name)
    }
}
