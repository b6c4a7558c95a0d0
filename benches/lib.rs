//! # capsule-opt 性能基准测试
//!
//! 使用 Criterion.rs 进行性能基准测试。
//!
//! ## 基准测试分组
//! - `scope`: 作用域栈的插入与查找
//! - `literal_inliner`: 生成的胶囊上的整树优化
//!
//! ## 使用方法
//! ```bash
//! cargo bench                  # 运行所有
//! cargo bench literal_inliner  # 只运行优化测试
//! ```

use std::hint::black_box;

use capsule_opt::frontend::ast::{types, Ast, NodeId};
use capsule_opt::frontend::Session;
use capsule_opt::middle::passes::SymbolTableStack;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

// ============================================================================
// Scope Benchmarks - 作用域栈
// ============================================================================

fn bench_scope_lookup(c: &mut Criterion) {
    let mut scopes = SymbolTableStack::new();
    for depth in 0..16 {
        scopes.enter_scope();
        for i in 0..32 {
            scopes.insert(format!("v{}_{}", depth, i), i);
        }
    }

    c.bench_function("scope_lookup_outermost", |b| {
        b.iter(|| scopes.lookup(black_box("v0_31")))
    });
    c.bench_function("scope_lookup_missing", |b| {
        b.iter(|| scopes.lookup(black_box("missing")))
    });
}

// ============================================================================
// Literal Inliner Benchmarks - 字面量内联
// ============================================================================

/// 胶囊：一个枚举、`bindings` 个胶囊级绑定，以及一个函数，
/// 函数体中有同样数量的局部绑定和对它们的读取
fn build_capsule(bindings: usize) -> (Ast, NodeId) {
    let mut ast = Ast::new();
    let mut body = Vec::with_capacity(bindings + 2);

    body.push(ast.enumeration("Color", &[":Red", ":Green", ":Blue"]));

    for i in 0..bindings {
        let left = ast.declared_identifier(format!("g{}", i), types::NUMBER);
        let right = ast.number(i.to_string());
        body.push(ast.assignment(left, right));
    }

    let mut statements = Vec::with_capacity(bindings * 2 + 1);
    for i in 0..bindings {
        let left = ast.declared_identifier(format!("l{}", i), "Color");
        let right = ast.identifier("Color.Green");
        statements.push(ast.assignment(left, right));

        let a = ast.identifier(format!("g{}", i));
        let b = ast.identifier(format!("l{}", i));
        statements.push(ast.binary_operation("+", a, b));
    }
    statements.push(ast.identifier("g0"));

    let block = ast.block(statements);
    let function = ast.function_declaration(vec![], block);
    let name = ast.declared_identifier("main", types::FUNCTION);
    body.push(ast.assignment(name, function));

    let capsule = ast.capsule("Main", body);
    (ast, capsule)
}

fn bench_literal_inliner(c: &mut Criterion) {
    let mut group = c.benchmark_group("literal_inliner");
    for bindings in [16usize, 128, 1024] {
        let (ast, capsule) = build_capsule(bindings);
        group.bench_with_input(BenchmarkId::from_parameter(bindings), &ast, |b, ast| {
            b.iter(|| {
                let mut ast = ast.clone();
                let mut session = Session::new();
                session.optimize_ast(&mut ast, capsule, true)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scope_lookup, bench_literal_inliner);
criterion_main!(benches);
