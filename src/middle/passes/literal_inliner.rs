//! 字面量内联
//!
//! 把绑定到字面量的变量读取替换为字面量本身，删除冗余的字面量局部绑定，
//! 把枚举展开为数字常量，并把引用枚举名的类型声明改写为 `Number`。
//! 这样类型检查器看到的树更小，也不再需要了解枚举。
//!
//! 维护两个作用域栈：
//! - `hoisted_scope`: 胶囊级绑定，在文本位置之前即可见
//! - `local_scope`: 块级绑定，只在绑定之后、所在作用域内可见；
//!   同名时局部绑定覆盖胶囊级绑定

use tracing::debug;

use super::scope::SymbolTableStack;
use super::OptimizationPass;
use crate::frontend::ast::{types, Ast, LiteralKind, NodeId, NodeKind, NodeTag, SlotName};
use crate::frontend::session::Session;
use crate::util::diagnostic::{ErrorCodeDefinition, ErrorCollector};

/// 绑定写入的目标命名空间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Namespace {
    Hoisted,
    Local,
}

/// 字面量内联 pass
#[derive(Debug, Default)]
pub struct LiteralInlinerPass {
    hoisted_scope: SymbolTableStack<NodeId>,
    local_scope: SymbolTableStack<NodeId>,
}

impl OptimizationPass for LiteralInlinerPass {
    fn name(&self) -> &'static str {
        "literal-inliner"
    }

    fn optimize_ast(
        &mut self,
        ast: &mut Ast,
        slot: &mut Option<NodeId>,
        is_capsule_direct_child: bool,
        diagnostics: &mut ErrorCollector,
    ) {
        let Some(id) = *slot else {
            return;
        };

        match ast.tag(id) {
            NodeTag::Identifier => {
                if is_declaration(ast, id) {
                    self.bind_parameter(ast, id, diagnostics);
                } else {
                    self.substitute_identifiers(ast, slot);
                }
            }
            NodeTag::TypeDeclaration => self.remap_enum_type_references(ast, id),
            NodeTag::Enum => {
                self.unpack_enum_elements_in_scope(ast, id, Namespace::Local, diagnostics);
                debug!("removed unpacked enum {}", id);
                *slot = None;
            }
            NodeTag::Assignment if !is_capsule_direct_child => {
                let bound = self.bind_identifier_to_scope(ast, id, Namespace::Local, diagnostics);

                // 左侧类型先改写，枚举类型的字面量绑定才能在本轮被识别
                let declared = ast
                    .assignment_parts(id)
                    .and_then(|(left, _)| ast.identifier_type(left));
                if let Some(ty) = declared {
                    self.remap_enum_type_references(ast, ty);
                }

                // 块的最后一个元素是块的值，必须保留
                let in_block = ast
                    .parent(id)
                    .is_some_and(|parent| ast.tag(parent) == NodeTag::Block);
                // 非法重新绑定的语句保留在树中
                if bound && in_block && is_literal_assignment(ast, id) && !ast.is_last_in_block(id) {
                    debug!("removed literal binding {}", id);
                    *slot = None;
                }
            }
            NodeTag::Assignment
            | NodeTag::Source
            | NodeTag::Link
            | NodeTag::Capsule
            | NodeTag::NumberLiteral
            | NodeTag::StringLiteral
            | NodeTag::BooleanLiteral
            | NodeTag::Symbol
            | NodeTag::Block
            | NodeTag::List
            | NodeTag::FunctionDeclaration
            | NodeTag::FunctionInvocation
            | NodeTag::BinaryOperation
            | NodeTag::Return => {}
        }
    }

    fn hoist_necessary(
        &mut self,
        ast: &mut Ast,
        capsule: NodeId,
        diagnostics: &mut ErrorCollector,
    ) {
        self.hoisted_scope.enter_scope();

        let body = ast.sequence(capsule).cloned().unwrap_or_default();
        let mut survivors = Vec::with_capacity(body.len());

        for statement in body {
            match ast.tag(statement) {
                NodeTag::Enum => {
                    self.unpack_enum_elements_in_scope(
                        ast,
                        statement,
                        Namespace::Hoisted,
                        diagnostics,
                    );
                    // 枚举已完全展开到作用域中，不再交给类型检查
                    debug!("removed hoisted enum {}", statement);
                    continue;
                }
                NodeTag::Assignment => {
                    self.bind_identifier_to_scope(ast, statement, Namespace::Hoisted, diagnostics);
                }
                _ => {}
            }
            survivors.push(statement);
        }

        if let Some(body) = ast.sequence_mut(capsule) {
            *body = survivors;
        }

        self.resolve_forward_references(ast);
    }

    fn enter_scope(&mut self) {
        self.local_scope.enter_scope();
    }

    fn exit_scope(&mut self) {
        self.local_scope.exit_scope();
    }

    fn reset(&mut self) {
        self.hoisted_scope.clear();
        self.local_scope.clear();
    }
}

impl LiteralInlinerPass {
    /// 创建新的 pass
    pub fn new() -> Self {
        Self::default()
    }

    /// 胶囊级作用域
    pub fn hoisted_scope(&self) -> &SymbolTableStack<NodeId> {
        &self.hoisted_scope
    }

    /// 块级作用域
    pub fn local_scope(&self) -> &SymbolTableStack<NodeId> {
        &self.local_scope
    }

    fn scope(
        &self,
        namespace: Namespace,
    ) -> &SymbolTableStack<NodeId> {
        match namespace {
            Namespace::Hoisted => &self.hoisted_scope,
            Namespace::Local => &self.local_scope,
        }
    }

    fn scope_mut(
        &mut self,
        namespace: Namespace,
    ) -> &mut SymbolTableStack<NodeId> {
        match namespace {
            Namespace::Hoisted => &mut self.hoisted_scope,
            Namespace::Local => &mut self.local_scope,
        }
    }

    /// 先查胶囊级作用域，局部作用域的结果覆盖之
    pub fn lookup_in_scope(
        &self,
        name: &str,
    ) -> Option<NodeId> {
        self.local_scope
            .lookup(name)
            .or_else(|| self.hoisted_scope.lookup(name))
            .copied()
    }

    /// 名字当前绑定的字面量
    fn resolve_literal(
        &self,
        ast: &Ast,
        name: &str,
    ) -> Option<(LiteralKind, String)> {
        let bound = self.lookup_in_scope(name)?;
        ast.literal_value(bound)
            .map(|(kind, value)| (kind, value.to_string()))
    }

    /// 变量读取 -> 字面量
    fn substitute_identifiers(
        &self,
        ast: &mut Ast,
        slot: &mut Option<NodeId>,
    ) {
        let Some(id) = *slot else {
            return;
        };
        let Some(name) = ast.identifier_name(id) else {
            return;
        };
        let Some((kind, value)) = self.resolve_literal(ast, name) else {
            return;
        };

        debug!("inlined `{}` as {} literal {}", name, kind.type_name(), value);

        let parent = ast.parent(id);
        let literal = ast.literal(kind, value);
        ast.set_parent(literal, parent);
        *slot = Some(literal);
    }

    /// 把名字绑定到赋值的右侧
    ///
    /// 右侧为函数声明时使用限定函数名，支持重载。名字已存在于目标作用域
    /// 的最内层帧时记录非法重新绑定，不修改作用域和树。
    ///
    /// 返回是否写入了绑定
    fn bind_identifier_to_scope(
        &mut self,
        ast: &mut Ast,
        assignment: NodeId,
        namespace: Namespace,
        diagnostics: &mut ErrorCollector,
    ) -> bool {
        let Some((left, right)) = ast.assignment_parts(assignment) else {
            return false;
        };
        let Some(identifier) = ast.identifier_name(left).map(str::to_string) else {
            return false;
        };

        let bound_name = if ast.tag(right) == NodeTag::FunctionDeclaration {
            Session::qualified_function_identifier(ast, &identifier, right)
        } else {
            identifier.clone()
        };

        if self
            .scope(namespace)
            .lookup_in_current_scope(&bound_name)
            .is_some()
        {
            debug!("illegal reassignment of `{}`", identifier);
            diagnostics.add_error(
                ErrorCodeDefinition::illegal_reassignment(&identifier)
                    .at(assignment)
                    .build(),
            );
            return false;
        }

        let value = self.resolve_right_hand_side(ast, assignment, right);
        debug!("bound `{}` to {} ({:?})", bound_name, value, namespace);
        self.scope_mut(namespace).insert(bound_name, value);
        true
    }

    /// 右侧是可解析为字面量的变量读取时，先把它替换为字面量
    fn resolve_right_hand_side(
        &self,
        ast: &mut Ast,
        assignment: NodeId,
        right: NodeId,
    ) -> NodeId {
        if ast.tag(right) != NodeTag::Identifier || is_declaration(ast, right) {
            return right;
        }

        let mut slot = Some(right);
        self.substitute_identifiers(ast, &mut slot);
        match slot {
            Some(literal) if literal != right => {
                ast.set_slot(assignment, SlotName::Right, Some(literal));
                literal
            }
            _ => right,
        }
    }

    /// 胶囊级绑定可以引用文本位置在后的绑定：反复解析右侧仍是变量读取的
    /// 绑定，直到没有新的字面量可解析
    fn resolve_forward_references(
        &mut self,
        ast: &mut Ast,
    ) {
        loop {
            let pending: Vec<(String, NodeId)> = match self.hoisted_scope.current_scope() {
                Some(frame) => frame
                    .iter()
                    .filter(|(_, value)| ast.tag(**value) == NodeTag::Identifier)
                    .map(|(name, value)| (name.clone(), *value))
                    .collect(),
                None => return,
            };

            let mut changed = false;
            for (name, value) in pending {
                let Some(assignment) = ast.parent(value) else {
                    continue;
                };
                if ast.tag(assignment) != NodeTag::Assignment {
                    continue;
                }

                let resolved = self.resolve_right_hand_side(ast, assignment, value);
                if resolved != value {
                    debug!("resolved forward reference `{}` to {}", name, resolved);
                    self.hoisted_scope.insert(name, resolved);
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }
    }

    /// 函数参数在函数作用域中遮蔽同名的外层绑定
    fn bind_parameter(
        &mut self,
        ast: &Ast,
        param: NodeId,
        diagnostics: &mut ErrorCollector,
    ) {
        let is_param = ast.parent(param).is_some_and(|parent| {
            matches!(
                ast.kind(parent),
                NodeKind::FunctionDeclaration { params, .. } if params.contains(&param)
            )
        });
        if !is_param {
            return;
        }
        let Some(name) = ast.identifier_name(param) else {
            return;
        };

        if self.local_scope.lookup_in_current_scope(name).is_some() {
            diagnostics.add_error(ErrorCodeDefinition::illegal_reassignment(name).at(param).build());
            return;
        }
        self.local_scope.insert(name, param);
    }

    /// 展开枚举成员：`B.m_i` -> 数字字面量 `i`，`B` -> `Number` 类型声明
    fn unpack_enum_elements_in_scope(
        &mut self,
        ast: &mut Ast,
        enumeration: NodeId,
        namespace: Namespace,
        diagnostics: &mut ErrorCollector,
    ) {
        let (name, members) = match ast.kind(enumeration) {
            NodeKind::Enum {
                name: Some(name),
                members,
            } => (*name, members.clone()),
            _ => return,
        };
        let Some(base) = ast.identifier_name(name).map(str::to_string) else {
            return;
        };

        for (ordinal, member) in members.into_iter().enumerate() {
            let symbol = match ast.kind(member) {
                NodeKind::Symbol { symbol } => symbol.strip_prefix(':').unwrap_or(symbol),
                _ => continue,
            };
            let member_name = format!("{}.{}", base, symbol);

            if self
                .scope(namespace)
                .lookup_in_current_scope(&member_name)
                .is_some()
            {
                diagnostics.add_error(
                    ErrorCodeDefinition::illegal_reassignment(&member_name)
                        .at(member)
                        .build(),
                );
                continue;
            }

            let literal = ast.number(ordinal.to_string());
            debug!("bound `{}` to {}", member_name, ordinal);
            self.scope_mut(namespace).insert(member_name, literal);
        }

        if self
            .scope(namespace)
            .lookup_in_current_scope(&base)
            .is_some()
        {
            diagnostics.add_error(
                ErrorCodeDefinition::illegal_reassignment(&base)
                    .at(enumeration)
                    .build(),
            );
            return;
        }

        // 枚举名本身绑定到 Number，供类型声明改写使用
        let number = ast.type_declaration(types::NUMBER);
        self.scope_mut(namespace).insert(base, number);
    }

    /// 引用枚举名的类型声明改写为枚举的底层类型
    fn remap_enum_type_references(
        &self,
        ast: &mut Ast,
        id: NodeId,
    ) {
        let Some(ty) = ast.type_name(id) else {
            return;
        };
        let Some(resolved) = self.lookup_in_scope(ty) else {
            return;
        };
        let Some(remapped) = ast.type_name(resolved).map(str::to_string) else {
            return;
        };

        debug!("remapped type `{}` to `{}`", ty, remapped);
        if let NodeKind::TypeDeclaration { ty, .. } = ast.kind_mut(id) {
            *ty = remapped;
        }
    }
}

/// 标识符是声明（带类型、位于赋值左侧，或是函数参数）而非读取
fn is_declaration(
    ast: &Ast,
    id: NodeId,
) -> bool {
    let typed = ast
        .identifier_type(id)
        .is_some_and(|ty| ast.tag(ty) == NodeTag::TypeDeclaration);
    let binding_site = ast.parent(id).is_some_and(|parent| match ast.kind(parent) {
        NodeKind::Assignment {
            left: Some(left), ..
        } => *left == id,
        NodeKind::FunctionDeclaration { params, .. } => params.contains(&id),
        _ => false,
    });
    typed || binding_site
}

/// 右侧字面量的类型与左侧声明的原始类型完全一致
fn is_literal_assignment(
    ast: &Ast,
    assignment: NodeId,
) -> bool {
    let Some((left, right)) = ast.assignment_parts(assignment) else {
        return false;
    };
    let Some((kind, _)) = ast.literal_value(right) else {
        return false;
    };
    let declared = ast.identifier_type(left).and_then(|decl| match ast.kind(decl) {
        NodeKind::TypeDeclaration { ty, elements } if elements.is_empty() => Some(ty.as_str()),
        _ => None,
    });

    declared == Some(kind.type_name())
}
