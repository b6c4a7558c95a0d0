//! 语法树测试

use crate::frontend::ast::{types, Ast, LiteralKind, NodeKind, NodeTag, SlotName};

#[test]
fn test_alloc_sets_parent() {
    let mut ast = Ast::new();
    let left = ast.declared_identifier("x", types::NUMBER);
    let right = ast.number("5");
    let assign = ast.assignment(left, right);

    assert_eq!(ast.parent(left), Some(assign));
    assert_eq!(ast.parent(right), Some(assign));
    assert_eq!(ast.parent(assign), None);
    assert_eq!(ast.tag(assign), NodeTag::Assignment);
    assert_eq!(ast.assignment_parts(assign), Some((left, right)));
}

#[test]
fn test_own_scope_flags() {
    let mut ast = Ast::new();
    let block = ast.block(vec![]);
    let list = ast.list(vec![]);
    let capsule = ast.capsule("Main", vec![]);

    assert!(ast.has_own_scope(block));
    assert!(ast.has_own_scope(capsule));
    assert!(!ast.has_own_scope(list));
}

#[test]
fn test_sequence_mutation() {
    let mut ast = Ast::new();
    let a = ast.number("1");
    let b = ast.number("2");
    let c = ast.number("3");
    let block = ast.block(vec![a, b, c]);

    assert!(ast.is_last_in_block(c));
    assert!(!ast.is_last_in_block(a));

    assert_eq!(ast.remove_sequence_element(block, 1), Some(b));
    assert_eq!(ast.sequence(block), Some(&vec![a, c]));

    let d = ast.string("d");
    ast.set_sequence_element(block, 0, d);
    assert_eq!(ast.sequence(block), Some(&vec![d, c]));
    assert_eq!(ast.parent(d), Some(block));
}

#[test]
fn test_named_slot_mutation() {
    let mut ast = Ast::new();
    let value = ast.identifier("x");
    let ret = ast.return_value(value);

    let replacement = ast.number("7");
    assert!(ast.set_slot(ret, SlotName::Value, Some(replacement)));
    assert_eq!(ast.slot(ret, SlotName::Value), Some(replacement));
    assert_eq!(ast.parent(replacement), Some(ret));

    assert!(ast.set_slot(ret, SlotName::Value, None));
    assert_eq!(ast.slot(ret, SlotName::Value), None);

    // Return 没有 Left 槽位
    assert!(!ast.set_slot(ret, SlotName::Left, None));
}

#[test]
fn test_find_all_preorder() {
    let mut ast = Ast::new();
    let x = ast.identifier("x");
    let y = ast.identifier("y");
    let sum = ast.binary_operation("+", x, y);
    let z = ast.identifier("z");
    let block = ast.block(vec![sum, z]);

    assert_eq!(ast.find_all(block, NodeTag::Identifier), vec![x, y, z]);
    assert_eq!(ast.find_all(block, NodeTag::Block), vec![block]);
    assert!(ast.find_all(block, NodeTag::Enum).is_empty());
}

#[test]
fn test_deep_copy_type_declaration() {
    let mut ast = Ast::new();
    let inner = ast.type_declaration(types::NUMBER);
    let list_ty = ast.generic_type_declaration("List", vec![inner]);
    let owner = ast.identifier("xs");

    let copy = ast.deep_copy_type_declaration(list_ty, Some(owner)).unwrap();
    assert_ne!(copy, list_ty);
    assert_eq!(ast.parent(copy), Some(owner));
    assert_eq!(ast.type_name(copy), Some("List"));

    let copied_inner = ast.sequence(copy).unwrap()[0];
    assert_ne!(copied_inner, inner);
    assert_eq!(ast.type_name(copied_inner), Some(types::NUMBER));
    assert_eq!(ast.parent(copied_inner), Some(copy));

    // 非类型声明节点无法拷贝
    assert!(ast.deep_copy_type_declaration(owner, None).is_none());
}

#[test]
fn test_enumeration_builder() {
    let mut ast = Ast::new();
    let color = ast.enumeration("Color", &[":Red", ":Green"]);

    match ast.kind(color) {
        NodeKind::Enum {
            name: Some(name),
            members,
        } => {
            assert_eq!(ast.identifier_name(*name), Some("Color"));
            assert_eq!(members.len(), 2);
            assert_eq!(ast.parent(members[1]), Some(color));
        }
        other => panic!("unexpected node: {:?}", other),
    }
}

#[test]
fn test_literal_kind_type_names() {
    assert_eq!(LiteralKind::Number.type_name(), types::NUMBER);
    assert_eq!(LiteralKind::String.type_name(), types::STRING);
    assert_eq!(LiteralKind::Boolean.type_name(), types::BOOLEAN);
}

#[test]
fn test_to_json() {
    let mut ast = Ast::new();
    let left = ast.declared_identifier("x", types::NUMBER);
    let right = ast.number("5");
    let assign = ast.assignment(left, right);
    let capsule = ast.capsule("Main", vec![assign]);

    let json = ast.to_json(capsule);
    assert_eq!(json["type"], "Capsule");
    assert_eq!(json["name"], "Main");
    assert_eq!(json["value"][0]["type"], "Assignment");
    assert_eq!(json["value"][0]["left"]["value"], "x");
    assert_eq!(json["value"][0]["left"]["declaredType"]["value"], "Number");
    assert_eq!(json["value"][0]["right"]["type"], "NumberLiteral");
    assert_eq!(json["value"][0]["right"]["value"], "5");

    assert!(ast.to_json_string(capsule).contains("\"Capsule\""));
}
