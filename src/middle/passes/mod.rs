//! 优化阶段
//!
//! 每个优化 pass 只描述如何改写单个槽位（保留、原地修改、替换为其他节点、
//! 或置空表示删除），由 [`optimize`] 负责遍历整棵树并把结果写回父节点。
//!
//! 遍历规则：
//! - 胶囊的提升阶段（`hoist_necessary`）严格早于整树遍历
//! - 先序：节点自身的改写先于其子节点
//! - 被删除的节点不再遍历子节点，也不会开启作用域
//! - 带有独立作用域的节点进入时调用 `enter_scope`，离开时调用 `exit_scope`，
//!   与具体 pass 无关
//! - 整树遍历包在一个根作用域中
//! - 链接节点指向的胶囊是独立的编译单元，不在此处遍历

pub mod literal_inliner;
pub mod scope;

#[cfg(test)]
mod tests;

pub use literal_inliner::LiteralInlinerPass;
pub use scope::{ScopeFrame, SymbolTableStack};

use tracing::debug;

use crate::frontend::ast::{Ast, NodeId, NodeTag, SlotGroup};
use crate::util::diagnostic::ErrorCollector;

/// 树改写契约
pub trait OptimizationPass {
    /// pass 名称（用于日志）
    fn name(&self) -> &'static str;

    /// 改写一个槽位
    ///
    /// - `slot`: 当前位置的占用者，pass 可以写入新的句柄或置为 `None`
    /// - `is_capsule_direct_child`: 节点是否为胶囊的直接语句
    fn optimize_ast(
        &mut self,
        ast: &mut Ast,
        slot: &mut Option<NodeId>,
        is_capsule_direct_child: bool,
        diagnostics: &mut ErrorCollector,
    );

    /// 整树遍历之前，对胶囊直接语句做的预处理
    fn hoist_necessary(
        &mut self,
        _ast: &mut Ast,
        _capsule: NodeId,
        _diagnostics: &mut ErrorCollector,
    ) {
    }

    /// 进入带有独立作用域的节点
    fn enter_scope(&mut self);

    /// 离开带有独立作用域的节点
    fn exit_scope(&mut self);

    /// 丢弃上一个编译单元留下的状态
    fn reset(&mut self);
}

/// 在以 `root` 为根的树上运行一个 pass
///
/// 返回改写后的根（根节点被删除时为 `None`）
pub fn optimize<P: OptimizationPass + ?Sized>(
    pass: &mut P,
    ast: &mut Ast,
    root: NodeId,
    diagnostics: &mut ErrorCollector,
) -> Option<NodeId> {
    pass.reset();

    if let Some(capsule) = ast.find_capsule(root) {
        debug!("{}: hoisting capsule {}", pass.name(), capsule);
        pass.hoist_necessary(ast, capsule, diagnostics);
    }

    // 根作用域：不在任何作用域节点内的绑定也有落脚的帧
    pass.enter_scope();
    let mut slot = Some(root);
    walk(pass, ast, &mut slot, false, diagnostics);
    pass.exit_scope();
    slot
}

fn walk<P: OptimizationPass + ?Sized>(
    pass: &mut P,
    ast: &mut Ast,
    slot: &mut Option<NodeId>,
    is_capsule_direct_child: bool,
    diagnostics: &mut ErrorCollector,
) {
    if slot.is_none() {
        return;
    }

    pass.optimize_ast(ast, slot, is_capsule_direct_child, diagnostics);

    let Some(id) = *slot else {
        return;
    };

    let own_scope = ast.has_own_scope(id);
    if own_scope {
        pass.enter_scope();
    }

    let is_capsule = ast.tag(id) == NodeTag::Capsule;

    for group in ast.slot_layout(id) {
        match *group {
            SlotGroup::Named(name) => {
                let before = ast.slot(id, name);
                if before.is_none() {
                    continue;
                }

                let mut child = before;
                walk(pass, ast, &mut child, false, diagnostics);
                if child != before {
                    ast.set_slot(id, name, child);
                }
            }
            SlotGroup::Sequence => {
                let mut index = 0;
                while let Some(current) = ast.sequence(id).and_then(|seq| seq.get(index).copied()) {
                    let mut child = Some(current);
                    walk(pass, ast, &mut child, is_capsule, diagnostics);

                    match child {
                        Some(next) => {
                            if next != current {
                                ast.set_sequence_element(id, index, next);
                            }
                            index += 1;
                        }
                        None => {
                            ast.remove_sequence_element(id, index);
                        }
                    }
                }
            }
        }
    }

    if own_scope {
        pass.exit_scope();
    }
}
