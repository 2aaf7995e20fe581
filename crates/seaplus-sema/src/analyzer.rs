// Semantic analyzer for SeaPlus+ - scoping, declarations and expression types

use crate::diagnostic::{Diagnostic, SemanticErrorKind};
use crate::symbols::{SymbolTable, TypeTag};
use seaplus_ast::ast::{Block, Call, Expr, FnDecl, Ident, Lit, Program, Stmt, TypeName};

/// Outcome of analysing one program.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// `true` iff no error-severity diagnostic was produced.
    pub ok: bool,
    /// Every diagnostic, in traversal order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Analyse a program against a fresh symbol table.
pub fn analyze(program: &Program) -> Analysis {
    let mut analyzer = Analyzer::new();
    analyzer.analyze(program);
    analyzer.into_analysis()
}

/// Walks a parsed program with a scope stack, recording diagnostics.
///
/// Every check returns whether its subtree is valid but never stops the
/// walk early, so independent problems are all reported in one pass.
pub struct Analyzer {
    table: SymbolTable,
    diagnostics: Vec<Diagnostic>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            table: SymbolTable::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Analyse `program`. Any state from a previous run is discarded first.
    pub fn analyze(&mut self, program: &Program) -> bool {
        self.table = SymbolTable::new();
        self.diagnostics.clear();
        self.check_stmts(&program.stmts);
        !self.has_errors()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Program-scope symbols left after the last run.
    pub fn symbols(&self) -> &SymbolTable {
        &self.table
    }

    pub fn into_analysis(self) -> Analysis {
        Analysis {
            ok: !self.has_errors(),
            diagnostics: self.diagnostics,
        }
    }

    fn error(&mut self, kind: SemanticErrorKind, name: &str, line: u32) {
        self.diagnostics.push(Diagnostic::error(kind, name, line));
    }

    fn check_stmts(&mut self, stmts: &[Stmt]) -> bool {
        let mut ok = true;
        for stmt in stmts {
            ok &= self.check_statement(stmt);
        }
        ok
    }

    fn check_statement(&mut self, stmt: &Stmt) -> bool {
        match stmt {
            Stmt::VarDecl { ty, name, .. } => self.check_declaration(*ty, name),
            Stmt::Assign { target, value, .. } => self.check_assignment(target, value),
            Stmt::Call(call) => self.check_call(call),
            Stmt::Print { value, .. } => self.check_operand(value),
            Stmt::If {
                cond, body, else_, ..
            } => {
                let mut ok = self.check_expression(cond);
                ok &= self.check_statement(body);
                if let Some(branch) = else_ {
                    ok &= self.check_statement(&branch.body);
                }
                ok
            }
            Stmt::While { cond, body, .. } => {
                let cond_ok = self.check_expression(cond);
                self.check_statement(body) && cond_ok
            }
            Stmt::RepeatUntil { body, cond, .. } => {
                let body_ok = self.check_statement(body);
                self.check_expression(cond) && body_ok
            }
            Stmt::Break { .. } => true,
            Stmt::FnDecl(decl) => self.check_fn_decl(decl),
            Stmt::Block(block) => self.check_block(block),
            Stmt::Expr { expr, .. } => self.check_expression(expr),
        }
    }

    fn check_declaration(&mut self, ty: TypeName, name: &Ident) -> bool {
        if self.table.declare(&name.text, ty.into(), name.line) {
            true
        } else {
            self.error(SemanticErrorKind::RedeclaredVariable, &name.text, name.line);
            false
        }
    }

    fn check_assignment(&mut self, target: &Ident, value: &Expr) -> bool {
        let Some(ty) = self.table.lookup(&target.text).map(|sym| sym.ty.clone()) else {
            self.error(
                SemanticErrorKind::UndeclaredVariable,
                &target.text,
                target.line,
            );
            self.check_operand(value);
            return false;
        };

        let ok = match ty {
            TypeTag::Func(_) => {
                self.error(
                    SemanticErrorKind::InvalidOperation,
                    &target.text,
                    target.line,
                );
                self.check_operand(value);
                false
            }
            TypeTag::Int => {
                if is_text_literal(value) {
                    self.error(SemanticErrorKind::TypeMismatch, &target.text, target.line);
                    false
                } else {
                    self.check_expression(value)
                }
            }
            TypeTag::Char | TypeTag::Str => {
                if is_text_literal(value) {
                    true
                } else {
                    self.error(SemanticErrorKind::TypeMismatch, &target.text, target.line);
                    false
                }
            }
        };

        if ok {
            self.table.mark_initialized(&target.text);
        }
        ok
    }

    /// A print operand or untyped value: text literals and bare identifiers
    /// of any type are accepted, anything else must be an int expression.
    fn check_operand(&mut self, value: &Expr) -> bool {
        match value {
            Expr::Lit(Lit::Str(_) | Lit::Char(_) | Lit::Null, _) => true,
            Expr::Var(id) => self.check_use(id).is_some(),
            _ => self.check_expression(value),
        }
    }

    /// Resolve a use of `id`, warning if it was never assigned.
    fn check_use(&mut self, id: &Ident) -> Option<TypeTag> {
        let Some(sym) = self.table.lookup(&id.text) else {
            self.error(SemanticErrorKind::UndeclaredVariable, &id.text, id.line);
            return None;
        };
        let ty = sym.ty.clone();
        if !sym.initialized {
            self.diagnostics.push(Diagnostic::warning(
                SemanticErrorKind::UninitializedVariable,
                &id.text,
                id.line,
            ));
        }
        Some(ty)
    }

    /// Integer-typed expression check.
    fn check_expression(&mut self, expr: &Expr) -> bool {
        match expr {
            Expr::Lit(Lit::Number(_), _) => true,
            Expr::Lit(_, tok) => {
                self.error(SemanticErrorKind::TypeMismatch, &tok.lexeme, tok.line);
                false
            }
            Expr::Var(id) => match self.check_use(id) {
                Some(TypeTag::Int) => true,
                Some(_) => {
                    self.error(SemanticErrorKind::TypeMismatch, &id.text, id.line);
                    false
                }
                None => false,
            },
            Expr::Unary { expr, .. } => self.check_expression(expr),
            Expr::Binary { lhs, rhs, .. } => {
                let lhs_ok = self.check_expression(lhs);
                let rhs_ok = self.check_expression(rhs);
                lhs_ok && rhs_ok
            }
            Expr::Factorial { arg, .. } => self.check_expression(arg),
            Expr::Call(call) => self.check_call(call),
        }
    }

    fn check_call(&mut self, call: &Call) -> bool {
        let callee = &call.callee;
        let params = match self.table.lookup(&callee.text).map(|sym| sym.ty.clone()) {
            None => {
                self.error(
                    SemanticErrorKind::UndeclaredVariable,
                    &callee.text,
                    callee.line,
                );
                None
            }
            Some(TypeTag::Func(params)) if params.len() == call.args.len() => Some(params),
            Some(_) => {
                self.error(
                    SemanticErrorKind::InvalidOperation,
                    &callee.text,
                    callee.line,
                );
                None
            }
        };

        let mut ok = params.is_some();
        for (i, arg) in call.args.iter().enumerate() {
            match self.check_use(arg) {
                None => ok = false,
                Some(ty) => {
                    if let Some(expected) = params.as_ref().and_then(|p| p.get(i)) {
                        if *expected != ty {
                            self.error(SemanticErrorKind::TypeMismatch, &arg.text, arg.line);
                            ok = false;
                        }
                    }
                }
            }
        }
        ok
    }

    fn check_block(&mut self, block: &Block) -> bool {
        self.table.enter_scope();
        let ok = self.check_stmts(&block.stmts);
        self.table.exit_scope();
        ok
    }

    fn check_fn_decl(&mut self, decl: &FnDecl) -> bool {
        let name = &decl.name;
        let mut ok = true;

        if self.table.current_scope() != 0 {
            self.error(SemanticErrorKind::ScopeViolation, &name.text, name.line);
            ok = false;
        }

        // Declared before the body so recursive calls resolve.
        let params: Vec<TypeTag> = decl.params.iter().map(|p| p.ty.into()).collect();
        if self.table.declare(&name.text, TypeTag::Func(params), name.line) {
            self.table.mark_initialized(&name.text);
        } else {
            self.error(SemanticErrorKind::RedeclaredVariable, &name.text, name.line);
            ok = false;
        }

        self.table.enter_scope();
        for param in &decl.params {
            let pname = &param.name;
            if self.table.declare(&pname.text, param.ty.into(), pname.line) {
                self.table.mark_initialized(&pname.text);
            } else {
                self.error(SemanticErrorKind::RedeclaredVariable, &pname.text, pname.line);
                ok = false;
            }
        }
        ok &= self.check_statement(&decl.body);
        self.table.exit_scope();
        ok
    }
}

fn is_text_literal(expr: &Expr) -> bool {
    matches!(expr, Expr::Lit(Lit::Str(_) | Lit::Char(_) | Lit::Null, _))
}
