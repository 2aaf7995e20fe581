use seaplus_ast::ast::{Expr, Stmt, TypeName};
use seaplus_parse::parse_str;

fn stmts(src: &str) -> Vec<Stmt> {
    parse_str(src).expect("parse ok").program.stmts
}

#[test]
fn declaration_then_assignment_reference_the_same_name() {
    let s = stmts("int x;\nx = 5;");
    assert_eq!(s.len(), 2);
    let Stmt::VarDecl { ty, name, .. } = &s[0] else {
        panic!("expected declaration");
    };
    assert_eq!(*ty, TypeName::Int);
    assert_eq!(name.text, "x");
    let Stmt::Assign { target, .. } = &s[1] else {
        panic!("expected assignment");
    };
    assert_eq!(target.text, "x");
    assert_eq!(target.line, 2);
}

#[test]
fn char_and_string_declarations() {
    let s = stmts("char c; string s;");
    assert!(matches!(&s[0], Stmt::VarDecl { ty: TypeName::Char, .. }));
    assert!(matches!(&s[1], Stmt::VarDecl { ty: TypeName::Str, .. }));
}

#[test]
fn if_with_else_attached() {
    let s = stmts("if (x > 1) { print(x); } else print(0);");
    assert_eq!(s.len(), 1);
    let Stmt::If { cond, body, else_, .. } = &s[0] else {
        panic!("expected if");
    };
    assert!(matches!(cond, Expr::Binary { .. }));
    assert!(matches!(body.as_ref(), Stmt::Block(b) if b.stmts.len() == 1));
    let else_ = else_.as_ref().expect("else branch");
    assert!(matches!(else_.body.as_ref(), Stmt::Print { .. }));
}

#[test]
fn else_binds_to_the_nearest_if() {
    let s = stmts("if (a) if (b) x = 1; else x = 2;");
    let Stmt::If { body, else_, .. } = &s[0] else {
        panic!("expected if");
    };
    assert!(else_.is_none());
    assert!(matches!(body.as_ref(), Stmt::If { else_: Some(_), .. }));
}

#[test]
fn while_and_break() {
    let s = stmts("while (i < 10) { i = i + 1; break; }");
    let Stmt::While { body, .. } = &s[0] else {
        panic!("expected while");
    };
    let Stmt::Block(block) = body.as_ref() else {
        panic!("expected block body");
    };
    assert!(matches!(&block.stmts[1], Stmt::Break { .. }));
}

#[test]
fn repeat_until() {
    let s = stmts("repeat { i = i + 1; if (i == 3) break; } until (i >= 10);");
    let Stmt::RepeatUntil { body, cond, token } = &s[0] else {
        panic!("expected repeat-until");
    };
    assert_eq!(token.lexeme, "repeat");
    assert!(matches!(body.as_ref(), Stmt::Block(_)));
    assert!(matches!(cond, Expr::Binary { .. }));
}

#[test]
fn print_statement() {
    let s = stmts("print(\"hello\");");
    assert!(matches!(&s[0], Stmt::Print { .. }));
}

#[test]
fn nested_blocks_keep_statement_order() {
    let s = stmts("{ int a; { int b; b = 1; } a = 2; }");
    let Stmt::Block(outer) = &s[0] else {
        panic!("expected block");
    };
    assert_eq!(outer.stmts.len(), 3);
    assert!(matches!(&outer.stmts[0], Stmt::VarDecl { .. }));
    assert!(matches!(&outer.stmts[1], Stmt::Block(inner) if inner.stmts.len() == 2));
    assert!(matches!(&outer.stmts[2], Stmt::Assign { .. }));
}

#[test]
fn function_declaration_and_call_statement() {
    let s = stmts("func add(int a, int b) { print(a + b); }\nadd(x, y);");
    let Stmt::FnDecl(decl) = &s[0] else {
        panic!("expected function");
    };
    assert_eq!(decl.name.text, "add");
    let params: Vec<_> = decl.params.iter().map(|p| (p.ty, p.name.text.as_str())).collect();
    assert_eq!(params, vec![(TypeName::Int, "a"), (TypeName::Int, "b")]);

    let Stmt::Call(call) = &s[1] else {
        panic!("expected call");
    };
    assert_eq!(call.callee.text, "add");
    let args: Vec<_> = call.args.iter().map(|a| a.text.as_str()).collect();
    assert_eq!(args, vec!["x", "y"]);
    assert_eq!(call.token.line, 2);
}

#[test]
fn call_inside_expression_uses_lookahead() {
    let s = stmts("x = f(a) + g;");
    let Stmt::Assign { value, .. } = &s[0] else {
        panic!("expected assignment");
    };
    let Expr::Binary { lhs, rhs, .. } = value else {
        panic!("expected binary");
    };
    assert!(matches!(lhs.as_ref(), Expr::Call(c) if c.callee.text == "f"));
    assert!(matches!(rhs.as_ref(), Expr::Var(id) if id.text == "g"));
}

#[test]
fn factorial_as_value_and_statement() {
    let s = stmts("x = $(n - 1);\n$(5);");
    assert!(matches!(&s[0], Stmt::Assign { value: Expr::Factorial { .. }, .. }));
    let Stmt::Expr { expr, .. } = &s[1] else {
        panic!("expected expression statement");
    };
    assert!(matches!(expr, Expr::Factorial { .. }));
}
