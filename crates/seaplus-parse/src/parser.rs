use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{LexWarning, Scanner};
use anyhow::{bail, Result};
use seaplus_ast::ast::{
    BinOp, Block, Call, ElseBranch, Expr, FnDecl, Ident, Lit, Param, Program, Stmt, TypeName,
    UnOp,
};
use seaplus_ast::token::{Keyword, Token, TokenKind};

/// Maximum nesting of statements and expressions before the parser gives up.
/// Statements, parentheses, `!`, and binary operators each add one level.
pub const MAX_NESTING_DEPTH: u32 = 100;

/// A successfully parsed program plus the scanner's non-fatal warnings.
#[derive(Debug)]
pub struct Parsed {
    pub program: Program,
    pub warnings: Vec<LexWarning>,
}

/// Parse a whole program. The first syntax (or lexical) error aborts the
/// parse; it is a [`ParseError`] inside the returned `anyhow::Error`.
pub fn parse_str(src: &str) -> Result<Parsed> {
    let mut p = Parser::new(src)?;
    let program = p.parse_program()?;
    Ok(Parsed {
        program,
        warnings: p.lex.take_warnings(),
    })
}

struct Parser<'a> {
    lex: Scanner<'a>,
    cur: Token,
    depth: u32,
    loop_depth: u32,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Result<Self> {
        let mut lex = Scanner::new(src);
        let cur = lex.next_token();
        check_lexical(&cur)?;
        Ok(Self {
            lex,
            cur,
            depth: 0,
            loop_depth: 0,
        })
    }

    /// Consume the current token and return it.
    fn bump(&mut self) -> Result<Token> {
        let next = self.lex.next_token();
        check_lexical(&next)?;
        Ok(std::mem::replace(&mut self.cur, next))
    }

    fn at(&self, k: TokenKind) -> bool {
        self.cur.kind == k
    }

    fn at_keyword(&self, kw: Keyword) -> bool {
        self.cur.is_keyword(kw)
    }

    /// Current token is an operator or comparison spelled as one of `ops`.
    fn at_op(&self, ops: &[&str]) -> bool {
        matches!(self.cur.kind, TokenKind::Operator | TokenKind::Comparison)
            && ops.contains(&self.cur.lexeme.as_str())
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::at(kind, &self.cur)
    }

    fn expect(&mut self, k: TokenKind, err: ParseErrorKind) -> Result<Token> {
        if self.at(k) {
            self.bump()
        } else {
            bail!(self.error(err))
        }
    }

    fn parse_ident(&mut self, err: ParseErrorKind) -> Result<Ident> {
        let tok = self.expect(TokenKind::Identifier, err)?;
        Ok(Ident {
            text: tok.lexeme,
            line: tok.line,
        })
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            bail!(self.error(ParseErrorKind::NestingTooDeep));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // ======= program / statements =======

    fn parse_program(&mut self) -> Result<Program> {
        let mut stmts = Vec::new();
        while !self.at(TokenKind::Eof) {
            stmts.push(self.parse_statement()?);
        }
        Ok(Program { stmts })
    }

    fn parse_statement(&mut self) -> Result<Stmt> {
        self.enter()?;
        let stmt = self.parse_statement_inner()?;
        self.leave();
        Ok(stmt)
    }

    fn parse_statement_inner(&mut self) -> Result<Stmt> {
        match self.cur.kind {
            TokenKind::Keyword(kw) => match kw {
                Keyword::Int | Keyword::Char | Keyword::String => self.parse_declaration(),
                Keyword::If => self.parse_if(),
                Keyword::While => self.parse_while(),
                Keyword::Repeat => self.parse_repeat_until(),
                Keyword::Print => self.parse_print(),
                Keyword::Break => self.parse_break(),
                Keyword::Func => self.parse_fn_decl(),
                // a dangling `else` has no `if` to attach to
                Keyword::Else | Keyword::Until | Keyword::Null => {
                    bail!(self.error(ParseErrorKind::UnexpectedToken))
                }
            },
            TokenKind::Identifier => self.parse_assignment_or_call(),
            TokenKind::LBrace => Ok(Stmt::Block(self.parse_block()?)),
            TokenKind::Factorial => {
                let token = self.cur.clone();
                let expr = self.parse_factorial_call()?;
                self.expect(TokenKind::Semicolon, ParseErrorKind::MissingSemicolon)?;
                Ok(Stmt::Expr { expr, token })
            }
            TokenKind::Eof => bail!(self.error(ParseErrorKind::UnexpectedEof)),
            TokenKind::Operator | TokenKind::Comparison | TokenKind::Assign => {
                bail!(self.error(ParseErrorKind::UnexpectedOperator))
            }
            _ => bail!(self.error(ParseErrorKind::UnexpectedToken)),
        }
    }

    /// `type IDENT ;`
    fn parse_declaration(&mut self) -> Result<Stmt> {
        let token = self.bump()?;
        let ty = match token.kind {
            TokenKind::Keyword(kw) => TypeName::from_keyword(kw),
            _ => None,
        };
        let Some(ty) = ty else {
            bail!(ParseError::at(ParseErrorKind::UnexpectedToken, &token));
        };
        let name = self.parse_ident(ParseErrorKind::MissingIdentifier)?;
        self.expect(TokenKind::Semicolon, ParseErrorKind::MissingSemicolon)?;
        Ok(Stmt::VarDecl { ty, name, token })
    }

    /// `IDENT ( '(' args ')' | '=' rhs ) ;`
    fn parse_assignment_or_call(&mut self) -> Result<Stmt> {
        let id_tok = self.bump()?;
        let target = Ident {
            text: id_tok.lexeme.clone(),
            line: id_tok.line,
        };

        if self.at(TokenKind::LParen) {
            let call = self.parse_call_rest(target, id_tok)?;
            self.expect(TokenKind::Semicolon, ParseErrorKind::MissingSemicolon)?;
            return Ok(Stmt::Call(call));
        }

        if !self.at(TokenKind::Assign) {
            bail!(self.error(ParseErrorKind::MissingEquals));
        }
        let token = self.bump()?;
        // string, char and null right-hand sides are primaries of the expression grammar
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, ParseErrorKind::MissingSemicolon)?;
        Ok(Stmt::Assign {
            target,
            value,
            token,
        })
    }

    /// `'(' (IDENT (',' IDENT)*)? ')'` after the callee has been consumed.
    fn parse_call_rest(&mut self, callee: Ident, token: Token) -> Result<Call> {
        self.expect(TokenKind::LParen, ParseErrorKind::MissingParen)?;
        let mut args = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                args.push(self.parse_ident(ParseErrorKind::InvalidFunctionCall)?);
                if self.at(TokenKind::Comma) {
                    self.bump()?;
                    continue;
                }
                break;
            }
        }
        self.expect(TokenKind::RParen, ParseErrorKind::MissingParen)?;
        Ok(Call {
            callee,
            args,
            token,
        })
    }

    /// `'(' expr ')'` of if / while / until.
    fn parse_condition(&mut self) -> Result<Expr> {
        self.expect(TokenKind::LParen, ParseErrorKind::MissingParen)?;
        if self.at(TokenKind::RParen) {
            bail!(self.error(ParseErrorKind::MissingCondition));
        }
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen, ParseErrorKind::MissingParen)?;
        Ok(cond)
    }

    fn parse_if(&mut self) -> Result<Stmt> {
        let token = self.bump()?;
        let cond = self.parse_condition()?;
        let body = Box::new(self.parse_statement()?);

        let else_ = if self.at_keyword(Keyword::Else) {
            let else_tok = self.bump()?;
            let else_body = self.parse_statement()?;
            Some(ElseBranch {
                body: Box::new(else_body),
                token: else_tok,
            })
        } else {
            None
        };

        Ok(Stmt::If {
            cond,
            body,
            else_,
            token,
        })
    }

    fn parse_loop_body(&mut self) -> Result<Box<Stmt>> {
        self.loop_depth += 1;
        let body = self.parse_statement()?;
        self.loop_depth -= 1;
        Ok(Box::new(body))
    }

    fn parse_while(&mut self) -> Result<Stmt> {
        let token = self.bump()?;
        let cond = self.parse_condition()?;
        let body = self.parse_loop_body()?;
        Ok(Stmt::While { cond, body, token })
    }

    /// `repeat statement until ( expr ) ;`
    fn parse_repeat_until(&mut self) -> Result<Stmt> {
        let token = self.bump()?;
        let body = self.parse_loop_body()?;
        if !self.at_keyword(Keyword::Until) {
            bail!(self.error(ParseErrorKind::UnexpectedToken));
        }
        self.bump()?;
        let cond = self.parse_condition()?;
        self.expect(TokenKind::Semicolon, ParseErrorKind::MissingSemicolon)?;
        Ok(Stmt::RepeatUntil { body, cond, token })
    }

    fn parse_print(&mut self) -> Result<Stmt> {
        let token = self.bump()?;
        self.expect(TokenKind::LParen, ParseErrorKind::MissingParen)?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::RParen, ParseErrorKind::MissingParen)?;
        self.expect(TokenKind::Semicolon, ParseErrorKind::MissingSemicolon)?;
        Ok(Stmt::Print { value, token })
    }

    fn parse_break(&mut self) -> Result<Stmt> {
        if self.loop_depth == 0 {
            bail!(self.error(ParseErrorKind::BreakOutsideLoop));
        }
        let token = self.bump()?;
        self.expect(TokenKind::Semicolon, ParseErrorKind::MissingSemicolon)?;
        Ok(Stmt::Break { token })
    }

    /// `func IDENT ( (type IDENT (, type IDENT)*)? ) statement`
    fn parse_fn_decl(&mut self) -> Result<Stmt> {
        let token = self.bump()?;
        let name = self.parse_ident(ParseErrorKind::MissingIdentifier)?;
        self.expect(TokenKind::LParen, ParseErrorKind::MissingParen)?;

        let mut params = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                params.push(self.parse_param()?);
                if self.at(TokenKind::Comma) {
                    self.bump()?;
                    continue;
                }
                break;
            }
        }
        self.expect(
            TokenKind::RParen,
            ParseErrorKind::InvalidFunctionDeclaration,
        )?;

        // a loop around the declaration does not extend into the body
        let outer_loops = std::mem::replace(&mut self.loop_depth, 0);
        let body = self.parse_statement();
        self.loop_depth = outer_loops;

        Ok(Stmt::FnDecl(FnDecl {
            name,
            params,
            body: Box::new(body?),
            token,
        }))
    }

    fn parse_param(&mut self) -> Result<Param> {
        let ty = match self.cur.kind {
            TokenKind::Keyword(kw) => TypeName::from_keyword(kw),
            _ => None,
        };
        let Some(ty) = ty else {
            bail!(self.error(ParseErrorKind::InvalidFunctionDeclaration));
        };
        self.bump()?;
        let name = self.parse_ident(ParseErrorKind::InvalidFunctionDeclaration)?;
        Ok(Param { ty, name })
    }

    /// `{ statement* }`
    fn parse_block(&mut self) -> Result<Block> {
        let token = self.expect(TokenKind::LBrace, ParseErrorKind::MissingBrace)?;
        let mut stmts = Vec::new();
        while !self.at(TokenKind::RBrace) {
            if self.at(TokenKind::Eof) {
                bail!(self.error(ParseErrorKind::MissingBrace));
            }
            stmts.push(self.parse_statement()?);
        }
        self.bump()?;
        Ok(Block { stmts, token })
    }

    // ======= expressions (precedence climbing) =======
    //
    // Loosest to tightest:
    //   ||
    //   &&
    //   == !=
    //   > >= <= <
    //   + -
    //   * / %
    //   ^^        (right-assoc)
    //   $( )      factorial
    //   !         prefix not
    //   primary

    fn parse_expr(&mut self) -> Result<Expr> {
        self.enter()?;
        let e = self.parse_or()?;
        self.leave();
        Ok(e)
    }

    /// One left-associative level: `next (op next)*`.
    ///
    /// Every operator deepens the tree by one node, so each counts against
    /// `MAX_NESTING_DEPTH` like a parenthesis would.
    fn binary_level(&mut self, ops: &[&str], next: fn(&mut Self) -> Result<Expr>) -> Result<Expr> {
        let mut lhs = next(self)?;
        let mut chained = 0;
        while self.at_op(ops) {
            let token = self.bump()?;
            self.enter()?;
            chained += 1;
            let rhs = next(self)?;
            lhs = binary(lhs, token, rhs)?;
        }
        self.depth -= chained;
        Ok(lhs)
    }

    fn parse_or(&mut self) -> Result<Expr> {
        self.binary_level(&["||"], Self::parse_and)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        self.binary_level(&["&&"], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> Result<Expr> {
        self.binary_level(&["==", "!="], Self::parse_relational)
    }

    fn parse_relational(&mut self) -> Result<Expr> {
        self.binary_level(&[">", ">=", "<=", "<"], Self::parse_additive)
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        self.binary_level(&["+", "-"], Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        self.binary_level(&["*", "/", "%"], Self::parse_power)
    }

    /// `a ^^ b ^^ c` groups as `a ^^ (b ^^ c)`.
    fn parse_power(&mut self) -> Result<Expr> {
        let lhs = self.parse_factorial()?;
        if !self.at_op(&["^^"]) {
            return Ok(lhs);
        }
        let token = self.bump()?;
        self.enter()?;
        let rhs = self.parse_power()?;
        self.leave();
        binary(lhs, token, rhs)
    }

    fn parse_factorial(&mut self) -> Result<Expr> {
        if self.at(TokenKind::Factorial) {
            self.parse_factorial_call()
        } else {
            self.parse_not()
        }
    }

    /// `$ ( expr )`
    fn parse_factorial_call(&mut self) -> Result<Expr> {
        let token = self.expect(TokenKind::Factorial, ParseErrorKind::InvalidExpression)?;
        self.expect(TokenKind::LParen, ParseErrorKind::MissingParen)?;
        let arg = self.parse_expr()?;
        self.expect(TokenKind::RParen, ParseErrorKind::MissingParen)?;
        Ok(Expr::Factorial {
            arg: Box::new(arg),
            token,
        })
    }

    fn parse_not(&mut self) -> Result<Expr> {
        if !self.at_op(&["!"]) {
            return self.parse_primary();
        }
        let token = self.bump()?;
        self.enter()?;
        let inner = self.parse_not()?;
        self.leave();
        Ok(Expr::Unary {
            op: UnOp::Not,
            expr: Box::new(inner),
            token,
        })
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        match self.cur.kind {
            TokenKind::Number => {
                let tok = self.bump()?;
                let Ok(v) = tok.lexeme.parse::<i64>() else {
                    bail!(ParseError::at(ParseErrorKind::InvalidExpression, &tok));
                };
                Ok(Expr::Lit(Lit::Number(v), tok))
            }
            TokenKind::Identifier => {
                // one token of lookahead tells a call from a plain variable
                if self.lex.peek_token().kind == TokenKind::LParen {
                    let tok = self.bump()?;
                    let callee = Ident {
                        text: tok.lexeme.clone(),
                        line: tok.line,
                    };
                    return Ok(Expr::Call(self.parse_call_rest(callee, tok)?));
                }
                let id = self.parse_ident(ParseErrorKind::MissingIdentifier)?;
                Ok(Expr::Var(id))
            }
            TokenKind::StringLiteral => {
                let tok = self.bump()?;
                Ok(Expr::Lit(Lit::Str(tok.lexeme.clone()), tok))
            }
            TokenKind::CharLiteral => {
                let tok = self.bump()?;
                let Some(c) = tok.lexeme.chars().next() else {
                    bail!(ParseError::at(ParseErrorKind::InvalidExpression, &tok));
                };
                Ok(Expr::Lit(Lit::Char(c), tok))
            }
            TokenKind::Keyword(Keyword::Null) => {
                let tok = self.bump()?;
                Ok(Expr::Lit(Lit::Null, tok))
            }
            TokenKind::Factorial => self.parse_factorial_call(),
            TokenKind::LParen => {
                self.bump()?;
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, ParseErrorKind::MissingParen)?;
                Ok(inner)
            }
            TokenKind::Eof => bail!(self.error(ParseErrorKind::UnexpectedEof)),
            TokenKind::Operator | TokenKind::Comparison | TokenKind::Assign => {
                bail!(self.error(ParseErrorKind::UnexpectedOperator))
            }
            _ => bail!(self.error(ParseErrorKind::InvalidExpression)),
        }
    }
}

fn check_lexical(tok: &Token) -> Result<()> {
    if let Some(kind) = tok.error {
        bail!(ParseError::at(ParseErrorKind::Lexical(kind), tok));
    }
    Ok(())
}

fn binary(lhs: Expr, token: Token, rhs: Expr) -> Result<Expr> {
    let Some(op) = BinOp::from_lexeme(&token.lexeme) else {
        bail!(ParseError::at(ParseErrorKind::UnexpectedOperator, &token));
    };
    Ok(Expr::Binary {
        lhs: Box::new(lhs),
        op,
        rhs: Box::new(rhs),
        token,
    })
}
