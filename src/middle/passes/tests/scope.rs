//! 作用域栈测试

use proptest::prelude::*;

use crate::middle::passes::SymbolTableStack;

#[test]
fn test_enter_and_exit_scope() {
    let mut scopes: SymbolTableStack<u32> = SymbolTableStack::new();
    assert!(scopes.is_empty());

    scopes.enter_scope();
    scopes.enter_scope();
    assert_eq!(scopes.depth(), 2);

    scopes.exit_scope();
    assert_eq!(scopes.depth(), 1);
    scopes.exit_scope();
    assert!(scopes.is_empty());
}

#[test]
fn test_lookup_innermost_first() {
    let mut scopes = SymbolTableStack::new();
    scopes.enter_scope();
    scopes.insert("x", 1);
    scopes.insert("y", 2);

    scopes.enter_scope();
    scopes.insert("x", 10);

    // 内层遮蔽外层
    assert_eq!(scopes.lookup("x"), Some(&10));
    assert_eq!(scopes.lookup("y"), Some(&2));
    assert_eq!(scopes.lookup("z"), None);

    // 离开内层后恢复外层绑定
    scopes.exit_scope();
    assert_eq!(scopes.lookup("x"), Some(&1));
}

#[test]
fn test_lookup_in_current_scope_only() {
    let mut scopes = SymbolTableStack::new();
    scopes.enter_scope();
    scopes.insert("outer", 1);
    scopes.enter_scope();

    assert_eq!(scopes.lookup("outer"), Some(&1));
    assert_eq!(scopes.lookup_in_current_scope("outer"), None);

    scopes.insert("inner", 2);
    assert_eq!(scopes.lookup_in_current_scope("inner"), Some(&2));
}

#[test]
fn test_current_scope_keeps_insertion_order() {
    let mut scopes = SymbolTableStack::new();
    scopes.enter_scope();
    scopes.insert("b", 2);
    scopes.insert("a", 1);
    scopes.insert("c", 3);

    let names: Vec<&str> = scopes
        .current_scope()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(names, vec!["b", "a", "c"]);
}

#[test]
fn test_clear() {
    let mut scopes = SymbolTableStack::new();
    scopes.enter_scope();
    scopes.insert("x", 1);
    scopes.enter_scope();

    scopes.clear();
    assert!(scopes.is_empty());
    assert_eq!(scopes.lookup("x"), None);
    assert!(scopes.current_scope().is_none());
}

#[test]
#[should_panic(expected = "empty scope stack")]
fn test_exit_empty_stack_panics() {
    let mut scopes: SymbolTableStack<u32> = SymbolTableStack::new();
    scopes.exit_scope();
}

#[test]
#[should_panic(expected = "empty scope stack")]
fn test_insert_into_empty_stack_panics() {
    let mut scopes = SymbolTableStack::new();
    scopes.insert("x", 1);
}

proptest! {
    #[test]
    fn test_lookup_returns_innermost_binding(values in prop::collection::vec(0u32..1000, 1..16)) {
        let mut scopes = SymbolTableStack::new();
        for value in &values {
            scopes.enter_scope();
            scopes.insert("x", *value);
        }
        prop_assert_eq!(scopes.depth(), values.len());

        // 逐层退出，每次都应看到下一层的绑定
        for expected in values.iter().rev() {
            prop_assert_eq!(scopes.lookup("x"), Some(expected));
            prop_assert_eq!(scopes.lookup_in_current_scope("x"), Some(expected));
            scopes.exit_scope();
        }
        prop_assert!(scopes.is_empty());
        prop_assert_eq!(scopes.lookup("x"), None);
    }
}
