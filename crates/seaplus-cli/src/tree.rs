//! Indented tree rendering for `seaplus parse --format tree`.

use seaplus_ast::ast::{Call, Expr, Lit, Program, Stmt, TypeName, UnOp};

pub fn render(program: &Program) -> String {
    let mut p = TreePrinter::default();
    p.line("Program");
    p.nested(|p| {
        for stmt in &program.stmts {
            p.stmt(stmt);
        }
    });
    p.out
}

#[derive(Default)]
struct TreePrinter {
    out: String,
    indent: usize,
}

impl TreePrinter {
    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.indent += 1;
        f(self);
        self.indent -= 1;
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl { ty, name, .. } => {
                self.line(&format!("Declare {} {} @{}", type_name(*ty), name.text, name.line));
            }
            Stmt::Assign { target, value, .. } => {
                self.line(&format!("Assign {} @{}", target.text, target.line));
                self.nested(|p| p.expr(value));
            }
            Stmt::Call(call) => self.call(call),
            Stmt::Print { value, token } => {
                self.line(&format!("Print @{}", token.line));
                self.nested(|p| p.expr(value));
            }
            Stmt::If {
                cond,
                body,
                else_,
                token,
            } => {
                self.line(&format!("If @{}", token.line));
                self.nested(|p| {
                    p.expr(cond);
                    p.stmt(body);
                    if let Some(branch) = else_ {
                        p.line("Else");
                        p.nested(|p| p.stmt(&branch.body));
                    }
                });
            }
            Stmt::While { cond, body, token } => {
                self.line(&format!("While @{}", token.line));
                self.nested(|p| {
                    p.expr(cond);
                    p.stmt(body);
                });
            }
            Stmt::RepeatUntil { body, cond, token } => {
                self.line(&format!("Repeat @{}", token.line));
                self.nested(|p| {
                    p.stmt(body);
                    p.line("Until");
                    p.nested(|p| p.expr(cond));
                });
            }
            Stmt::Break { token } => self.line(&format!("Break @{}", token.line)),
            Stmt::FnDecl(decl) => {
                let params: Vec<String> = decl
                    .params
                    .iter()
                    .map(|param| format!("{} {}", type_name(param.ty), param.name.text))
                    .collect();
                self.line(&format!(
                    "Func {}({}) @{}",
                    decl.name.text,
                    params.join(", "),
                    decl.name.line
                ));
                self.nested(|p| p.stmt(&decl.body));
            }
            Stmt::Block(block) => {
                self.line("Block");
                self.nested(|p| {
                    for s in &block.stmts {
                        p.stmt(s);
                    }
                });
            }
            Stmt::Expr { expr, .. } => self.expr(expr),
        }
    }

    fn call(&mut self, call: &Call) {
        let args: Vec<&str> = call.args.iter().map(|a| a.text.as_str()).collect();
        self.line(&format!("Call {}({})", call.callee.text, args.join(", ")));
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Lit(Lit::Number(n), _) => self.line(&format!("Number {}", n)),
            Expr::Lit(Lit::Str(s), _) => self.line(&format!("String {:?}", s)),
            Expr::Lit(Lit::Char(c), _) => self.line(&format!("Char {:?}", c)),
            Expr::Lit(Lit::Null, _) => self.line("Null"),
            Expr::Var(id) => self.line(&format!("Ident {}", id.text)),
            Expr::Unary {
                op: UnOp::Not,
                expr,
                ..
            } => {
                self.line("Not");
                self.nested(|p| p.expr(expr));
            }
            Expr::Binary { lhs, rhs, token, .. } => {
                self.line(&format!("Binary {}", token.lexeme));
                self.nested(|p| {
                    p.expr(lhs);
                    p.expr(rhs);
                });
            }
            Expr::Factorial { arg, .. } => {
                self.line("Factorial");
                self.nested(|p| p.expr(arg));
            }
            Expr::Call(call) => self.call(call),
        }
    }
}

fn type_name(ty: TypeName) -> &'static str {
    match ty {
        TypeName::Int => "int",
        TypeName::Char => "char",
        TypeName::Str => "string",
    }
}
