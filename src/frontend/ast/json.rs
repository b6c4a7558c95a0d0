//! 语法树 JSON 输出
//!
//! 调试用：`emit_ast` 打开时，优化后的树以 JSON 形式写入日志。

use serde_json::{json, Value};

use super::{Ast, NodeId, NodeKind};

impl Ast {
    /// 把 `root` 子树转换为 JSON
    pub fn to_json(
        &self,
        root: NodeId,
    ) -> Value {
        let ty = self.tag(root).to_string();
        let opt = |id: &Option<NodeId>| id.map_or(Value::Null, |id| self.to_json(id));
        let seq = |ids: &[NodeId]| Value::Array(ids.iter().map(|id| self.to_json(*id)).collect());

        match self.kind(root) {
            NodeKind::Source { links, capsule } => json!({
                "type": ty,
                "links": seq(links),
                "value": opt(capsule),
            }),
            NodeKind::Link { capsule } => json!({ "type": ty, "capsule": capsule }),
            NodeKind::Capsule { name, body } => json!({
                "type": ty,
                "name": name,
                "value": seq(body),
            }),
            NodeKind::Identifier { name, ty: decl } => json!({
                "type": ty,
                "value": name,
                "declaredType": opt(decl),
            }),
            NodeKind::Literal { value, .. } => json!({ "type": ty, "value": value }),
            NodeKind::Symbol { symbol } => json!({ "type": ty, "value": symbol }),
            NodeKind::Assignment { left, right } => json!({
                "type": ty,
                "left": opt(left),
                "right": opt(right),
            }),
            NodeKind::Block { elements } | NodeKind::List { elements } => json!({
                "type": ty,
                "value": seq(elements),
            }),
            NodeKind::Enum { name, members } => json!({
                "type": ty,
                "identifier": opt(name),
                "value": seq(members),
            }),
            NodeKind::TypeDeclaration { ty: decl, elements } => json!({
                "type": ty,
                "value": decl,
                "elements": seq(elements),
            }),
            NodeKind::FunctionDeclaration { params, body } => json!({
                "type": ty,
                "parameters": seq(params),
                "definition": opt(body),
            }),
            NodeKind::FunctionInvocation { callee, args } => json!({
                "type": ty,
                "value": opt(callee),
                "arguments": seq(args),
            }),
            NodeKind::BinaryOperation { op, left, right } => json!({
                "type": ty,
                "operator": op,
                "left": opt(left),
                "right": opt(right),
            }),
            NodeKind::Return { value } => json!({ "type": ty, "value": opt(value) }),
        }
    }

    /// 格式化的 JSON 文本
    pub fn to_json_string(
        &self,
        root: NodeId,
    ) -> String {
        serde_json::to_string_pretty(&self.to_json(root)).unwrap_or_default()
    }
}
