//! 错误收集
//!
//! 累积并继续：收集器只追加，不中断调用方

use super::Diagnostic;

/// 错误收集器
///
/// 收集多个诊断，支持批量报告
#[derive(Debug, Clone)]
pub struct ErrorCollector<E = Diagnostic> {
    /// 错误列表
    errors: Vec<E>,
}

impl<E> Default for ErrorCollector<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> ErrorCollector<E> {
    /// 创建新的错误收集器
    pub fn new() -> Self {
        ErrorCollector { errors: Vec::new() }
    }

    /// 添加错误
    pub fn add_error(
        &mut self,
        error: E,
    ) {
        self.errors.push(error);
    }

    /// 添加多个错误
    pub fn extend_errors(
        &mut self,
        errors: impl IntoIterator<Item = E>,
    ) {
        self.errors.extend(errors);
    }

    /// 检查是否有错误
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// 获取错误数量
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// 获取所有错误
    pub fn errors(&self) -> &[E] {
        &self.errors
    }

    /// 取出并清空所有错误
    pub fn take_errors(&mut self) -> Vec<E> {
        std::mem::take(&mut self.errors)
    }

    /// 消耗收集器，获取所有错误
    pub fn into_errors(self) -> Vec<E> {
        self.errors
    }

    /// 清空所有错误
    pub fn clear(&mut self) {
        self.errors.clear();
    }
}
