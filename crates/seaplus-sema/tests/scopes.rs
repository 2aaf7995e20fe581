//! Integration tests for declarations and block scoping

use seaplus_parse::parse_str;
use seaplus_sema::{analyze, Analyzer, SemanticErrorKind, Severity};

#[test]
fn declare_then_assign_marks_initialized() {
    let parsed = parse_str("int x; x = 5;").expect("parse failed");
    let mut analyzer = Analyzer::new();

    assert!(analyzer.analyze(&parsed.program));
    let x = analyzer.symbols().lookup("x").expect("x declared");
    assert!(x.initialized);
    assert_eq!(x.scope_level, 0);
}

#[test]
fn inner_block_may_shadow() {
    let parsed = parse_str("{ int x; { int x; } }").expect("parse failed");
    let analysis = analyze(&parsed.program);

    assert!(analysis.ok);
    assert!(analysis.diagnostics.is_empty());
}

#[test]
fn same_block_redeclaration_fails_at_second_line() {
    let parsed = parse_str("{\n  int x;\n  int x;\n}").expect("parse failed");
    let analysis = analyze(&parsed.program);

    assert!(!analysis.ok);
    assert_eq!(analysis.diagnostics.len(), 1);
    let d = &analysis.diagnostics[0];
    assert_eq!(d.kind, SemanticErrorKind::RedeclaredVariable);
    assert_eq!(d.line, 3);
}

#[test]
fn uninitialized_print_is_only_a_warning() {
    let parsed = parse_str("int x; print(x);").expect("parse failed");
    let analysis = analyze(&parsed.program);

    assert!(analysis.ok);
    assert_eq!(analysis.diagnostics.len(), 1);
    assert_eq!(
        analysis.diagnostics[0].kind,
        SemanticErrorKind::UninitializedVariable
    );
    assert_eq!(analysis.diagnostics[0].severity, Severity::Warning);
}

#[test]
fn use_after_block_exit_is_undeclared() {
    let src = "{ int t; t = 1; }\nprint(t);";
    let parsed = parse_str(src).expect("parse failed");
    let analysis = analyze(&parsed.program);

    assert!(!analysis.ok);
    let d = &analysis.diagnostics[0];
    assert_eq!(d.kind, SemanticErrorKind::UndeclaredVariable);
    assert_eq!(d.name.as_deref(), Some("t"));
    assert_eq!(d.line, 2);
}

#[test]
fn outer_variable_visible_in_loop_body() {
    let src = "int i; i = 0; while (i < 3) { i = i + 1; }";
    let parsed = parse_str(src).expect("parse failed");

    assert!(analyze(&parsed.program).ok);
}

#[test]
fn independent_errors_are_all_reported() {
    let src = "a = 1;\nint b;\nint b;\nprint(c);";
    let parsed = parse_str(src).expect("parse failed");
    let analysis = analyze(&parsed.program);

    let lines: Vec<u32> = analysis.diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![1, 3, 4]);
}

#[test]
fn reanalysis_is_deterministic() {
    let src = "int x; int x; { print(y); }";
    let parsed = parse_str(src).expect("parse failed");
    let mut analyzer = Analyzer::new();

    analyzer.analyze(&parsed.program);
    let first = analyzer.diagnostics().to_vec();
    analyzer.analyze(&parsed.program);

    assert_eq!(analyzer.diagnostics(), first.as_slice());
    assert_eq!(analyze(&parsed.program).diagnostics, first);
}
