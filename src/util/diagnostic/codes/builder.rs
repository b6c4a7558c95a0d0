//! 通用诊断构建器
//!
//! 支持模板参数化的错误消息构建器

use crate::frontend::ast::NodeId;
use crate::util::diagnostic::{Diagnostic, Severity};

/// 诊断构建器（支持模板参数）
#[derive(Debug, Clone)]
pub struct DiagnosticBuilder {
    code: &'static str,
    message_template: &'static str,
    help_template: &'static str,
    severity: Severity,
    params: Vec<(&'static str, String)>,
    node: Option<NodeId>,
}

impl DiagnosticBuilder {
    /// 创建新的诊断构建器
    pub fn new(
        code: &'static str,
        template: &'static str,
        help: &'static str,
    ) -> Self {
        Self {
            code,
            message_template: template,
            help_template: help,
            severity: Severity::Error,
            params: Vec::new(),
            node: None,
        }
    }

    /// 添加模板参数
    pub fn param(
        mut self,
        key: &'static str,
        value: impl Into<String>,
    ) -> Self {
        self.params.push((key, value.into()));
        self
    }

    /// 设置触发节点
    #[inline]
    pub fn at(
        mut self,
        node: NodeId,
    ) -> Self {
        self.node = Some(node);
        self
    }

    /// 构建 Diagnostic
    pub fn build(self) -> Diagnostic {
        let message = render(self.message_template, &self.params);
        let help = render(self.help_template, &self.params);
        Diagnostic::new(
            self.severity,
            self.code.to_string(),
            message,
            help,
            self.node,
            self.params,
        )
    }
}

/// 渲染模板，未提供的占位符保留原样
fn render(
    template: &str,
    params: &[(&'static str, String)],
) -> String {
    let mut result = String::with_capacity(template.len() + 32);
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '{' {
            result.push(c);
            continue;
        }

        let mut key = String::new();
        let mut closed = false;
        while let Some(&c) = chars.peek() {
            chars.next();
            if c == '}' {
                closed = true;
                break;
            }
            key.push(c);
        }

        match params.iter().find(|(k, _)| *k == key) {
            Some((_, value)) if closed => result.push_str(value),
            _ => {
                result.push('{');
                result.push_str(&key);
                if closed {
                    result.push('}');
                }
            }
        }
    }

    result
}
