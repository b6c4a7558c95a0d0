//! 诊断系统测试

use crate::frontend::ast::NodeId;
use crate::util::diagnostic::{
    Diagnostic, DiagnosticBuilder, ErrorCategory, ErrorCodeDefinition, ErrorCollector, Severity,
};

#[test]
fn test_registry_lookup() {
    let def = ErrorCodeDefinition::find("E2020").unwrap();
    assert_eq!(def.category, ErrorCategory::Semantic);
    assert!(ErrorCodeDefinition::find("E9999").is_none());
    assert_eq!(
        ErrorCodeDefinition::by_category(ErrorCategory::Semantic).count(),
        ErrorCodeDefinition::all().len()
    );
}

#[test]
fn test_illegal_reassignment_message() {
    let diagnostic = ErrorCodeDefinition::illegal_reassignment("x")
        .at(NodeId::new(3))
        .build();

    assert_eq!(diagnostic.code, "E2020");
    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(diagnostic.message, "Illegal reassignment of 'x'");
    assert!(diagnostic.help.contains("'x' is already bound"));
    assert_eq!(diagnostic.node, Some(NodeId::new(3)));
    assert_eq!(diagnostic.param("name"), Some("x"));
    assert_eq!(diagnostic.to_string(), "error[E2020]: Illegal reassignment of 'x'");
}

#[test]
fn test_missing_param_kept_verbatim() {
    let diagnostic = DiagnosticBuilder::new("E0000", "{a} and {b}", "").param("a", "1").build();
    assert_eq!(diagnostic.message, "1 and {b}");

    let unclosed = DiagnosticBuilder::new("E0000", "open {a", "").param("a", "1").build();
    assert_eq!(unclosed.message, "open {a");
}

#[test]
fn test_error_collector() {
    let mut collector: ErrorCollector<Diagnostic> = ErrorCollector::new();
    assert!(!collector.has_errors());

    collector.add_error(ErrorCodeDefinition::illegal_reassignment("a").build());
    collector.extend_errors(vec![ErrorCodeDefinition::illegal_reassignment("b").build()]);
    assert_eq!(collector.error_count(), 2);
    assert_eq!(collector.errors()[1].param("name"), Some("b"));

    let taken = collector.take_errors();
    assert_eq!(taken.len(), 2);
    assert!(!collector.has_errors());
}
