//! 语法树（Arena 形式）
//!
//! 解析器产出、类型检查器消费的树结构。所有节点存放在 [`Ast`] 中，
//! 通过 [`NodeId`] 句柄互相引用：子节点由父节点独占，父指针和作用域表
//! 中保存的句柄都只是别名。
//!
//! 删除节点只是把它从父节点的槽位中移除，arena 中的数据保持不变，
//! 因此作用域表里的别名句柄始终有效。

pub mod json;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

/// 节点句柄
///
/// 使用 newtype 模式，内部是 arena 下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(pub usize);

impl NodeId {
    /// 创建新的节点句柄
    pub fn new(id: usize) -> Self {
        NodeId(id)
    }

    /// 获取内部索引
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// 字面量种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiteralKind {
    Number,
    String,
    Boolean,
}

impl LiteralKind {
    /// 字面量对应的原始类型名
    pub fn type_name(&self) -> &'static str {
        match self {
            LiteralKind::Number => types::NUMBER,
            LiteralKind::String => types::STRING,
            LiteralKind::Boolean => types::BOOLEAN,
        }
    }
}

/// 节点类型标签（不携带数据，用于查找和打印）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeTag {
    Source,
    Link,
    Capsule,
    Identifier,
    NumberLiteral,
    StringLiteral,
    BooleanLiteral,
    Symbol,
    Assignment,
    Block,
    List,
    Enum,
    TypeDeclaration,
    FunctionDeclaration,
    FunctionInvocation,
    BinaryOperation,
    Return,
}

impl std::fmt::Display for NodeTag {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let name = match self {
            NodeTag::Source => "Source",
            NodeTag::Link => "Link",
            NodeTag::Capsule => "Capsule",
            NodeTag::Identifier => "Identifier",
            NodeTag::NumberLiteral => "NumberLiteral",
            NodeTag::StringLiteral => "StringLiteral",
            NodeTag::BooleanLiteral => "BooleanLiteral",
            NodeTag::Symbol => "Symbol",
            NodeTag::Assignment => "Assignment",
            NodeTag::Block => "Block",
            NodeTag::List => "List",
            NodeTag::Enum => "Enum",
            NodeTag::TypeDeclaration => "TypeDeclaration",
            NodeTag::FunctionDeclaration => "FunctionDeclaration",
            NodeTag::FunctionInvocation => "FunctionInvocation",
            NodeTag::BinaryOperation => "BinaryOperation",
            NodeTag::Return => "Return",
        };
        write!(f, "{}", name)
    }
}

/// 节点数据
///
/// 命名槽位用 `Option<NodeId>`，删除时置空；有序子节点用 `Vec<NodeId>`，
/// 删除时按下标移除。
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// 源文件根节点：链接列表 + 胶囊
    Source {
        links: Vec<NodeId>,
        capsule: Option<NodeId>,
    },
    /// 对其他胶囊的链接（链接的胶囊单独编译，不在此处遍历）
    Link { capsule: String },
    /// 胶囊（模块）
    Capsule { name: String, body: Vec<NodeId> },
    /// 标识符；`ty` 存在时表示这是一个声明而非读取
    Identifier { name: String, ty: Option<NodeId> },
    /// 数字 / 字符串 / 布尔字面量
    Literal { kind: LiteralKind, value: String },
    /// 符号，如枚举成员 `:Red`
    Symbol { symbol: String },
    /// 赋值 `left = right`
    Assignment {
        left: Option<NodeId>,
        right: Option<NodeId>,
    },
    /// 代码块，最后一个元素是块的值
    Block { elements: Vec<NodeId> },
    /// 序列（元组、列表字面量等）
    List { elements: Vec<NodeId> },
    /// 枚举声明
    Enum {
        name: Option<NodeId>,
        members: Vec<NodeId>,
    },
    /// 类型声明，`elements` 为泛型参数
    TypeDeclaration { ty: String, elements: Vec<NodeId> },
    /// 函数声明
    FunctionDeclaration {
        params: Vec<NodeId>,
        body: Option<NodeId>,
    },
    /// 函数调用
    FunctionInvocation {
        callee: Option<NodeId>,
        args: Vec<NodeId>,
    },
    /// 二元运算
    BinaryOperation {
        op: String,
        left: Option<NodeId>,
        right: Option<NodeId>,
    },
    /// 返回
    Return { value: Option<NodeId> },
}

impl NodeKind {
    /// 获取类型标签
    pub fn tag(&self) -> NodeTag {
        match self {
            NodeKind::Source { .. } => NodeTag::Source,
            NodeKind::Link { .. } => NodeTag::Link,
            NodeKind::Capsule { .. } => NodeTag::Capsule,
            NodeKind::Identifier { .. } => NodeTag::Identifier,
            NodeKind::Literal { kind, .. } => match kind {
                LiteralKind::Number => NodeTag::NumberLiteral,
                LiteralKind::String => NodeTag::StringLiteral,
                LiteralKind::Boolean => NodeTag::BooleanLiteral,
            },
            NodeKind::Symbol { .. } => NodeTag::Symbol,
            NodeKind::Assignment { .. } => NodeTag::Assignment,
            NodeKind::Block { .. } => NodeTag::Block,
            NodeKind::List { .. } => NodeTag::List,
            NodeKind::Enum { .. } => NodeTag::Enum,
            NodeKind::TypeDeclaration { .. } => NodeTag::TypeDeclaration,
            NodeKind::FunctionDeclaration { .. } => NodeTag::FunctionDeclaration,
            NodeKind::FunctionInvocation { .. } => NodeTag::FunctionInvocation,
            NodeKind::BinaryOperation { .. } => NodeTag::BinaryOperation,
            NodeKind::Return { .. } => NodeTag::Return,
        }
    }

    /// 进入该节点时是否开启新的词法作用域
    pub fn has_own_scope(&self) -> bool {
        matches!(
            self,
            NodeKind::Capsule { .. } | NodeKind::Block { .. } | NodeKind::FunctionDeclaration { .. }
        )
    }
}

/// 树节点
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// 节点句柄
    pub id: NodeId,
    /// 节点数据
    pub kind: NodeKind,
    /// 父节点（非所有权）
    pub parent: Option<NodeId>,
}

/// 命名槽位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotName {
    Left,
    Right,
    Type,
    Name,
    Body,
    Callee,
    Capsule,
    Value,
}

/// 子节点布局中的一组
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotGroup {
    /// 单个命名槽位
    Named(SlotName),
    /// 节点唯一的有序子节点序列
    Sequence,
}

/// 节点 arena
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    /// 创建空树
    pub fn new() -> Self {
        Self::default()
    }

    /// arena 中的节点数（包括已被摘除的节点）
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// arena 是否为空
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 分配节点，并把 `kind` 中引用的子节点的父指针指向它
    pub fn alloc(
        &mut self,
        kind: NodeKind,
    ) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        let children = children_of(&kind);
        self.nodes.push(Node {
            id,
            kind,
            parent: None,
        });
        for child in children {
            self.nodes[child.index()].parent = Some(id);
        }
        id
    }

    pub fn get(
        &self,
        id: NodeId,
    ) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get_mut(
        &mut self,
        id: NodeId,
    ) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn kind(
        &self,
        id: NodeId,
    ) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn kind_mut(
        &mut self,
        id: NodeId,
    ) -> &mut NodeKind {
        &mut self.nodes[id.index()].kind
    }

    pub fn tag(
        &self,
        id: NodeId,
    ) -> NodeTag {
        self.kind(id).tag()
    }

    pub fn parent(
        &self,
        id: NodeId,
    ) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn set_parent(
        &mut self,
        id: NodeId,
        parent: Option<NodeId>,
    ) {
        self.nodes[id.index()].parent = parent;
    }

    pub fn has_own_scope(
        &self,
        id: NodeId,
    ) -> bool {
        self.kind(id).has_own_scope()
    }

    /// 当前挂在树上的直接子节点（按遍历顺序）
    pub fn children(
        &self,
        id: NodeId,
    ) -> Vec<NodeId> {
        children_of(self.kind(id))
    }

    // ------------------------------------------------------------------
    // 构造辅助
    // ------------------------------------------------------------------

    pub fn source(
        &mut self,
        links: Vec<NodeId>,
        capsule: NodeId,
    ) -> NodeId {
        self.alloc(NodeKind::Source {
            links,
            capsule: Some(capsule),
        })
    }

    pub fn link(
        &mut self,
        capsule: impl Into<String>,
    ) -> NodeId {
        self.alloc(NodeKind::Link {
            capsule: capsule.into(),
        })
    }

    pub fn capsule(
        &mut self,
        name: impl Into<String>,
        body: Vec<NodeId>,
    ) -> NodeId {
        self.alloc(NodeKind::Capsule {
            name: name.into(),
            body,
        })
    }

    /// 标识符读取
    pub fn identifier(
        &mut self,
        name: impl Into<String>,
    ) -> NodeId {
        self.alloc(NodeKind::Identifier {
            name: name.into(),
            ty: None,
        })
    }

    /// 带类型的标识符声明，如 `x<Number>`
    pub fn declared_identifier(
        &mut self,
        name: impl Into<String>,
        ty: impl Into<String>,
    ) -> NodeId {
        let ty = self.type_declaration(ty);
        self.alloc(NodeKind::Identifier {
            name: name.into(),
            ty: Some(ty),
        })
    }

    pub fn type_declaration(
        &mut self,
        ty: impl Into<String>,
    ) -> NodeId {
        self.generic_type_declaration(ty, Vec::new())
    }

    pub fn generic_type_declaration(
        &mut self,
        ty: impl Into<String>,
        elements: Vec<NodeId>,
    ) -> NodeId {
        self.alloc(NodeKind::TypeDeclaration {
            ty: ty.into(),
            elements,
        })
    }

    pub fn literal(
        &mut self,
        kind: LiteralKind,
        value: impl Into<String>,
    ) -> NodeId {
        self.alloc(NodeKind::Literal {
            kind,
            value: value.into(),
        })
    }

    pub fn number(
        &mut self,
        value: impl Into<String>,
    ) -> NodeId {
        self.literal(LiteralKind::Number, value)
    }

    pub fn string(
        &mut self,
        value: impl Into<String>,
    ) -> NodeId {
        self.literal(LiteralKind::String, value)
    }

    pub fn boolean(
        &mut self,
        value: bool,
    ) -> NodeId {
        self.literal(LiteralKind::Boolean, value.to_string())
    }

    pub fn symbol(
        &mut self,
        symbol: impl Into<String>,
    ) -> NodeId {
        self.alloc(NodeKind::Symbol {
            symbol: symbol.into(),
        })
    }

    pub fn assignment(
        &mut self,
        left: NodeId,
        right: NodeId,
    ) -> NodeId {
        self.alloc(NodeKind::Assignment {
            left: Some(left),
            right: Some(right),
        })
    }

    pub fn block(
        &mut self,
        elements: Vec<NodeId>,
    ) -> NodeId {
        self.alloc(NodeKind::Block { elements })
    }

    pub fn list(
        &mut self,
        elements: Vec<NodeId>,
    ) -> NodeId {
        self.alloc(NodeKind::List { elements })
    }

    /// 枚举声明；`members` 为符号文本，如 `[":Red", ":Green"]`
    pub fn enumeration(
        &mut self,
        name: impl Into<String>,
        members: &[&str],
    ) -> NodeId {
        let name = self.identifier(name);
        let members = members.iter().map(|m| self.symbol(*m)).collect();
        self.alloc(NodeKind::Enum {
            name: Some(name),
            members,
        })
    }

    pub fn function_declaration(
        &mut self,
        params: Vec<NodeId>,
        body: NodeId,
    ) -> NodeId {
        self.alloc(NodeKind::FunctionDeclaration {
            params,
            body: Some(body),
        })
    }

    pub fn function_invocation(
        &mut self,
        callee: NodeId,
        args: Vec<NodeId>,
    ) -> NodeId {
        self.alloc(NodeKind::FunctionInvocation {
            callee: Some(callee),
            args,
        })
    }

    pub fn binary_operation(
        &mut self,
        op: impl Into<String>,
        left: NodeId,
        right: NodeId,
    ) -> NodeId {
        self.alloc(NodeKind::BinaryOperation {
            op: op.into(),
            left: Some(left),
            right: Some(right),
        })
    }

    pub fn return_value(
        &mut self,
        value: NodeId,
    ) -> NodeId {
        self.alloc(NodeKind::Return { value: Some(value) })
    }

    // ------------------------------------------------------------------
    // 访问器
    // ------------------------------------------------------------------

    /// 标识符名
    pub fn identifier_name(
        &self,
        id: NodeId,
    ) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Identifier { name, .. } => Some(name),
            _ => None,
        }
    }

    /// 标识符声明的类型节点
    pub fn identifier_type(
        &self,
        id: NodeId,
    ) -> Option<NodeId> {
        match self.kind(id) {
            NodeKind::Identifier { ty, .. } => *ty,
            _ => None,
        }
    }

    /// 类型声明的类型名
    pub fn type_name(
        &self,
        id: NodeId,
    ) -> Option<&str> {
        match self.kind(id) {
            NodeKind::TypeDeclaration { ty, .. } => Some(ty),
            _ => None,
        }
    }

    /// 字面量种类和文本
    pub fn literal_value(
        &self,
        id: NodeId,
    ) -> Option<(LiteralKind, &str)> {
        match self.kind(id) {
            NodeKind::Literal { kind, value } => Some((*kind, value)),
            _ => None,
        }
    }

    /// 赋值的左右两侧
    pub fn assignment_parts(
        &self,
        id: NodeId,
    ) -> Option<(NodeId, NodeId)> {
        match self.kind(id) {
            NodeKind::Assignment {
                left: Some(left),
                right: Some(right),
            } => Some((*left, *right)),
            _ => None,
        }
    }

    /// 胶囊名
    pub fn capsule_name(
        &self,
        id: NodeId,
    ) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Capsule { name, .. } => Some(name),
            _ => None,
        }
    }

    /// 找到根节点下的胶囊：`Source` 取其胶囊，`Capsule` 即自身
    pub fn find_capsule(
        &self,
        root: NodeId,
    ) -> Option<NodeId> {
        match self.kind(root) {
            NodeKind::Capsule { .. } => Some(root),
            NodeKind::Source { capsule, .. } => *capsule,
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // 槽位
    // ------------------------------------------------------------------

    /// 子节点布局，驱动器按此顺序遍历
    pub fn slot_layout(
        &self,
        id: NodeId,
    ) -> &'static [SlotGroup] {
        use SlotGroup::{Named, Sequence};

        match self.kind(id) {
            NodeKind::Source { .. } => &[Sequence, Named(SlotName::Capsule)],
            NodeKind::Link { .. } | NodeKind::Literal { .. } | NodeKind::Symbol { .. } => &[],
            NodeKind::Capsule { .. }
            | NodeKind::Block { .. }
            | NodeKind::List { .. }
            | NodeKind::TypeDeclaration { .. } => &[Sequence],
            NodeKind::Identifier { .. } => &[Named(SlotName::Type)],
            NodeKind::Assignment { .. } | NodeKind::BinaryOperation { .. } => {
                &[Named(SlotName::Left), Named(SlotName::Right)]
            }
            NodeKind::Enum { .. } => &[Named(SlotName::Name), Sequence],
            NodeKind::FunctionDeclaration { .. } => &[Sequence, Named(SlotName::Body)],
            NodeKind::FunctionInvocation { .. } => &[Named(SlotName::Callee), Sequence],
            NodeKind::Return { .. } => &[Named(SlotName::Value)],
        }
    }

    /// 有序子节点序列
    pub fn sequence(
        &self,
        id: NodeId,
    ) -> Option<&Vec<NodeId>> {
        match self.kind(id) {
            NodeKind::Source { links, .. } => Some(links),
            NodeKind::Capsule { body, .. } => Some(body),
            NodeKind::Block { elements }
            | NodeKind::List { elements }
            | NodeKind::TypeDeclaration { elements, .. } => Some(elements),
            NodeKind::Enum { members, .. } => Some(members),
            NodeKind::FunctionDeclaration { params, .. } => Some(params),
            NodeKind::FunctionInvocation { args, .. } => Some(args),
            _ => None,
        }
    }

    pub fn sequence_mut(
        &mut self,
        id: NodeId,
    ) -> Option<&mut Vec<NodeId>> {
        match self.kind_mut(id) {
            NodeKind::Source { links, .. } => Some(links),
            NodeKind::Capsule { body, .. } => Some(body),
            NodeKind::Block { elements }
            | NodeKind::List { elements }
            | NodeKind::TypeDeclaration { elements, .. } => Some(elements),
            NodeKind::Enum { members, .. } => Some(members),
            NodeKind::FunctionDeclaration { params, .. } => Some(params),
            NodeKind::FunctionInvocation { args, .. } => Some(args),
            _ => None,
        }
    }

    /// 读取命名槽位
    pub fn slot(
        &self,
        id: NodeId,
        name: SlotName,
    ) -> Option<NodeId> {
        match (self.kind(id), name) {
            (NodeKind::Source { capsule, .. }, SlotName::Capsule) => *capsule,
            (NodeKind::Identifier { ty, .. }, SlotName::Type) => *ty,
            (NodeKind::Assignment { left, .. }, SlotName::Left)
            | (NodeKind::BinaryOperation { left, .. }, SlotName::Left) => *left,
            (NodeKind::Assignment { right, .. }, SlotName::Right)
            | (NodeKind::BinaryOperation { right, .. }, SlotName::Right) => *right,
            (NodeKind::Enum { name, .. }, SlotName::Name) => *name,
            (NodeKind::FunctionDeclaration { body, .. }, SlotName::Body) => *body,
            (NodeKind::FunctionInvocation { callee, .. }, SlotName::Callee) => *callee,
            (NodeKind::Return { value }, SlotName::Value) => *value,
            _ => None,
        }
    }

    /// 写入命名槽位，新占用者的父指针指向 `id`
    ///
    /// 节点没有该槽位时返回 `false`
    pub fn set_slot(
        &mut self,
        id: NodeId,
        name: SlotName,
        value: Option<NodeId>,
    ) -> bool {
        let slot = match (self.kind_mut(id), name) {
            (NodeKind::Source { capsule, .. }, SlotName::Capsule) => capsule,
            (NodeKind::Identifier { ty, .. }, SlotName::Type) => ty,
            (NodeKind::Assignment { left, .. }, SlotName::Left)
            | (NodeKind::BinaryOperation { left, .. }, SlotName::Left) => left,
            (NodeKind::Assignment { right, .. }, SlotName::Right)
            | (NodeKind::BinaryOperation { right, .. }, SlotName::Right) => right,
            (NodeKind::Enum { name, .. }, SlotName::Name) => name,
            (NodeKind::FunctionDeclaration { body, .. }, SlotName::Body) => body,
            (NodeKind::FunctionInvocation { callee, .. }, SlotName::Callee) => callee,
            (NodeKind::Return { value }, SlotName::Value) => value,
            _ => return false,
        };
        *slot = value;
        if let Some(child) = value {
            self.set_parent(child, Some(id));
        }
        true
    }

    /// 替换序列中下标 `index` 处的子节点
    pub fn set_sequence_element(
        &mut self,
        id: NodeId,
        index: usize,
        child: NodeId,
    ) {
        if let Some(seq) = self.sequence_mut(id) {
            seq[index] = child;
            self.set_parent(child, Some(id));
        }
    }

    /// 删除序列中下标 `index` 处的子节点
    pub fn remove_sequence_element(
        &mut self,
        id: NodeId,
        index: usize,
    ) -> Option<NodeId> {
        let seq = self.sequence_mut(id)?;
        if index < seq.len() {
            Some(seq.remove(index))
        } else {
            None
        }
    }

    /// 节点是否为其父代码块的最后一个元素
    pub fn is_last_in_block(
        &self,
        id: NodeId,
    ) -> bool {
        match self.parent(id).map(|p| self.kind(p)) {
            Some(NodeKind::Block { elements }) => elements.last() == Some(&id),
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // 树工具
    // ------------------------------------------------------------------

    /// 先序收集 `root` 下所有类型为 `tag` 的节点（包括 `root` 自身）
    pub fn find_all(
        &self,
        root: NodeId,
        tag: NodeTag,
    ) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if self.tag(id) == tag {
                found.push(id);
            }
            let children = self.children(id);
            stack.extend(children.into_iter().rev());
        }
        found
    }

    /// 深拷贝类型声明（包括泛型参数），挂到 `parent` 下
    pub fn deep_copy_type_declaration(
        &mut self,
        id: NodeId,
        parent: Option<NodeId>,
    ) -> Option<NodeId> {
        let (ty, elements) = match self.kind(id) {
            NodeKind::TypeDeclaration { ty, elements } => (ty.clone(), elements.clone()),
            _ => return None,
        };

        let mut copied = Vec::with_capacity(elements.len());
        for element in elements {
            if let Some(copy) = self.deep_copy_type_declaration(element, None) {
                copied.push(copy);
            }
        }

        let copy = self.generic_type_declaration(ty, copied);
        self.set_parent(copy, parent);
        Some(copy)
    }
}

/// 节点数据中引用的子节点（按遍历顺序）
fn children_of(kind: &NodeKind) -> Vec<NodeId> {
    match kind {
        NodeKind::Source { links, capsule } => links.iter().copied().chain(*capsule).collect(),
        NodeKind::Link { .. } | NodeKind::Literal { .. } | NodeKind::Symbol { .. } => Vec::new(),
        NodeKind::Capsule { body, .. } => body.clone(),
        NodeKind::Identifier { ty, .. } => ty.iter().copied().collect(),
        NodeKind::Assignment { left, right } | NodeKind::BinaryOperation { left, right, .. } => {
            left.iter().chain(right.iter()).copied().collect()
        }
        NodeKind::Block { elements }
        | NodeKind::List { elements }
        | NodeKind::TypeDeclaration { elements, .. } => elements.clone(),
        NodeKind::Enum { name, members } => name.iter().chain(members.iter()).copied().collect(),
        NodeKind::FunctionDeclaration { params, body } => {
            params.iter().chain(body.iter()).copied().collect()
        }
        NodeKind::FunctionInvocation { callee, args } => {
            callee.iter().chain(args.iter()).copied().collect()
        }
        NodeKind::Return { value } => value.iter().copied().collect(),
    }
}
