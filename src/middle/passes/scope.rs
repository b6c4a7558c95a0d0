//! 作用域符号表
//!
//! 词法作用域栈：下标 0 为最外层。每一帧把名字映射到一个值（在优化阶段
//! 是指向树节点的句柄别名）。符号表本身不拒绝重复绑定，重复绑定策略由
//! 调用方决定。

use indexmap::IndexMap;
use tracing::trace;

/// 单个作用域帧
pub type ScopeFrame<T> = IndexMap<String, T>;

/// 作用域栈
#[derive(Debug, Clone)]
pub struct SymbolTableStack<T> {
    scopes: Vec<ScopeFrame<T>>,
}

impl<T> Default for SymbolTableStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SymbolTableStack<T> {
    /// 创建空栈（没有任何帧）
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    /// 进入新的作用域
    pub fn enter_scope(&mut self) {
        self.scopes.push(ScopeFrame::new());
        trace!("enter scope (depth {})", self.scopes.len());
    }

    /// 退出当前作用域
    ///
    /// # Panics
    ///
    /// 栈为空时 panic：作用域必须与开启作用域的节点成对出现
    pub fn exit_scope(&mut self) {
        if self.scopes.pop().is_none() {
            panic!("exit_scope called on an empty scope stack");
        }
        trace!("exit scope (depth {})", self.scopes.len());
    }

    /// 在最内层作用域中插入绑定
    ///
    /// # Panics
    ///
    /// 栈为空时 panic
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: T,
    ) {
        match self.scopes.last_mut() {
            Some(frame) => {
                frame.insert(name.into(), value);
            }
            None => panic!("insert called on an empty scope stack"),
        }
    }

    /// 从最内层到最外层查找
    pub fn lookup(
        &self,
        name: &str,
    ) -> Option<&T> {
        self.scopes.iter().rev().find_map(|frame| frame.get(name))
    }

    /// 只在最内层作用域中查找
    pub fn lookup_in_current_scope(
        &self,
        name: &str,
    ) -> Option<&T> {
        self.scopes.last().and_then(|frame| frame.get(name))
    }

    /// 最内层作用域（按插入顺序）
    pub fn current_scope(&self) -> Option<&ScopeFrame<T>> {
        self.scopes.last()
    }

    /// 当前帧数
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// 丢弃所有帧
    pub fn clear(&mut self) {
        self.scopes.clear();
    }
}
