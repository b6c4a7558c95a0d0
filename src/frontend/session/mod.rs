//! 编译会话
//!
//! 一次编译调用对应一个 [`Session`]，显式传给每个阶段。诊断、已解析的
//! 链接胶囊、胶囊到文件的映射都挂在会话上，生命周期随会话结束。


use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::frontend::ast::{types, Ast, NodeId, NodeKind};
use crate::middle::passes::{self, LiteralInlinerPass, OptimizationPass};
use crate::util::config::OptimizeConfig;
use crate::util::diagnostic::{Diagnostic, ErrorCollector};

/// 已解析的链接胶囊：独立 arena + 根节点
#[derive(Debug, Clone)]
pub struct ParsedCapsule {
    pub ast: Ast,
    pub root: NodeId,
}

/// 编译会话
#[derive(Debug, Default)]
pub struct Session {
    /// 优化配置
    config: OptimizeConfig,
    /// 收集到的诊断
    diagnostics: ErrorCollector,
    /// 已解析的链接胶囊
    parsed_link_asts: HashMap<String, ParsedCapsule>,
    /// 胶囊名 -> 源文件
    files_by_capsule_name: HashMap<String, PathBuf>,
}

impl Session {
    /// 创建新会话
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用配置创建会话
    pub fn with_config(config: OptimizeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// 获取优化配置
    #[inline]
    pub fn config(&self) -> &OptimizeConfig {
        &self.config
    }

    /// 记录一条诊断
    pub fn add_diagnostic(
        &mut self,
        diagnostic: Diagnostic,
    ) {
        self.diagnostics.add_error(diagnostic);
    }

    /// 目前收集到的所有诊断
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.errors()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// 清空诊断
    pub fn clear_diagnostics(&mut self) {
        self.diagnostics.clear();
    }

    /// 对树运行所有启用的优化 pass（原地修改）
    ///
    /// 本次运行没有产生诊断时返回 `true`。诊断会保留在会话中；
    /// `silence_errors` 或配置中的 `silence_errors` 为真时不输出。
    pub fn optimize_ast(
        &mut self,
        ast: &mut Ast,
        root: NodeId,
        silence_errors: bool,
    ) -> bool {
        let mut pipeline: Vec<Box<dyn OptimizationPass>> = Vec::new();
        if self.config.passes.literal_inliner {
            pipeline.push(Box::new(LiteralInlinerPass::new()));
        }

        let mut raised = ErrorCollector::new();
        let mut root = Some(root);
        for pass in pipeline.iter_mut() {
            let Some(current) = root else {
                break;
            };
            debug!("running optimization pass `{}`", pass.name());
            root = passes::optimize(pass.as_mut(), ast, current, &mut raised);
        }

        if self.config.emit_ast {
            if let Some(root) = root {
                debug!("optimized AST:\n{}", ast.to_json_string(root));
            }
        }

        let success = !raised.has_errors();
        if !(silence_errors || self.config.silence_errors) {
            for diagnostic in raised.errors() {
                error!("{}", diagnostic);
            }
        }
        self.diagnostics.extend_errors(raised.into_errors());

        success
    }

    /// 缓存已解析的链接胶囊
    pub fn add_parsed_link_ast(
        &mut self,
        capsule_name: impl Into<String>,
        capsule: ParsedCapsule,
    ) {
        self.parsed_link_asts.insert(capsule_name.into(), capsule);
    }

    /// 获取已解析的链接胶囊
    pub fn parsed_link_ast(
        &self,
        capsule_name: &str,
    ) -> Option<&ParsedCapsule> {
        self.parsed_link_asts.get(capsule_name)
    }

    /// 对所有缓存的链接胶囊运行优化，每个胶囊使用独立的作用域
    ///
    /// 全部成功时返回 `true`
    pub fn optimize_linked_capsules(
        &mut self,
        silence_errors: bool,
    ) -> bool {
        let mut linked = std::mem::take(&mut self.parsed_link_asts);
        let mut names: Vec<String> = linked.keys().cloned().collect();
        names.sort();

        let mut success = true;
        for name in names {
            if let Some(capsule) = linked.get_mut(&name) {
                debug!("optimizing linked capsule `{}`", name);
                let root = capsule.root;
                success &= self.optimize_ast(&mut capsule.ast, root, silence_errors);
            }
        }

        self.parsed_link_asts = linked;
        success
    }

    /// 登记胶囊所在的源文件
    pub fn register_capsule_file(
        &mut self,
        capsule_name: impl Into<String>,
        path: impl Into<PathBuf>,
    ) {
        self.files_by_capsule_name
            .insert(capsule_name.into(), path.into());
    }

    /// 胶囊所在的源文件
    pub fn capsule_file(
        &self,
        capsule_name: &str,
    ) -> Option<&Path> {
        self.files_by_capsule_name
            .get(capsule_name)
            .map(PathBuf::as_path)
    }

    /// 生成支持重载的限定函数名：名字 + 参数个数 + 各参数类型
    ///
    /// 例如 `add(a<Number>, b<Number>)` 得到 `add2NumberNumber`
    pub fn qualified_function_identifier(
        ast: &Ast,
        name: &str,
        function: NodeId,
    ) -> String {
        let params: &[NodeId] = match ast.kind(function) {
            NodeKind::FunctionDeclaration { params, .. } => params.as_slice(),
            _ => &[],
        };

        let mut qualified = format!("{}{}", name, params.len());
        for param in params {
            match ast.identifier_type(*param) {
                Some(ty) => qualified.push_str(&type_signature(ast, ty)),
                None => qualified.push_str(types::UNKNOWN),
            }
        }
        qualified
    }

    /// 由函数类型 `Function<P1, ..., Pn, R>` 生成限定函数名
    ///
    /// 最后一个泛型参数是返回类型，不参与命名
    pub fn qualified_function_identifier_from_type_signature(
        ast: &Ast,
        name: &str,
        signature: NodeId,
    ) -> String {
        let elements = ast.sequence(signature).map(Vec::as_slice).unwrap_or(&[]);
        let params: &[NodeId] = match elements.split_last() {
            Some((_, params)) => params,
            None => &[],
        };

        let mut qualified = format!("{}{}", name, params.len());
        for param in params {
            qualified.push_str(&type_signature(ast, *param));
        }
        qualified
    }
}

/// 类型声明的文本形式，如 `List<Number>`
fn type_signature(
    ast: &Ast,
    ty: NodeId,
) -> String {
    let Some(name) = ast.type_name(ty) else {
        return types::UNKNOWN.to_string();
    };

    let elements = ast.sequence(ty).map(Vec::as_slice).unwrap_or(&[]);
    if elements.is_empty() {
        return name.to_string();
    }

    let inner: Vec<String> = elements.iter().map(|e| type_signature(ast, *e)).collect();
    format!("{}<{}>", name, inner.join(","))
}
