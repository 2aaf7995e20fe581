pub mod token {
    use serde::Serialize;
    use std::fmt;

    /// Longest lexeme a token may carry.
    pub const MAX_LEXEME_LEN: usize = 99;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub enum Keyword {
        If,
        Else,
        While,
        Repeat,
        Until,
        Break,
        Print,
        Int,
        Char,
        String,
        Null,
        Func,
    }

    impl Keyword {
        /// Exact, case-sensitive keyword lookup.
        pub fn lookup(word: &str) -> Option<Keyword> {
            let kw = match word {
                "if" => Keyword::If,
                "else" => Keyword::Else,
                "while" => Keyword::While,
                "repeat" => Keyword::Repeat,
                "until" => Keyword::Until,
                "break" => Keyword::Break,
                "print" => Keyword::Print,
                "int" => Keyword::Int,
                "char" => Keyword::Char,
                "string" => Keyword::String,
                "null" => Keyword::Null,
                "func" => Keyword::Func,
                _ => return None,
            };
            Some(kw)
        }

        pub fn as_str(self) -> &'static str {
            match self {
                Keyword::If => "if",
                Keyword::Else => "else",
                Keyword::While => "while",
                Keyword::Repeat => "repeat",
                Keyword::Until => "until",
                Keyword::Break => "break",
                Keyword::Print => "print",
                Keyword::Int => "int",
                Keyword::Char => "char",
                Keyword::String => "string",
                Keyword::Null => "null",
                Keyword::Func => "func",
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub enum TokenKind {
        Eof,
        Number,
        /// `+ - * / % ! || ^^ &&`
        Operator,
        /// `=`
        Assign,
        /// `== != < <= > >=`
        Comparison,
        Keyword(Keyword),
        Identifier,
        StringLiteral,
        CharLiteral,
        // delimiters
        LParen,
        RParen,
        LBrace,
        RBrace,
        LBracket,
        RBracket,
        Comma,
        Semicolon,
        /// standalone `_` or a single `&`
        Special,
        /// `$`
        Factorial,
        Error,
    }

    impl fmt::Display for TokenKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let name = match self {
                TokenKind::Eof => "EOF",
                TokenKind::Number => "NUMBER",
                TokenKind::Operator => "OPERATOR",
                TokenKind::Assign => "EQUALS",
                TokenKind::Comparison => "COMPARISON",
                TokenKind::Keyword(_) => "KEYWORD",
                TokenKind::Identifier => "IDENTIFIER",
                TokenKind::StringLiteral => "STRING_LITERAL",
                TokenKind::CharLiteral => "CHAR_LITERAL",
                TokenKind::LParen
                | TokenKind::RParen
                | TokenKind::LBrace
                | TokenKind::RBrace
                | TokenKind::LBracket
                | TokenKind::RBracket
                | TokenKind::Comma => "DELIMITER",
                TokenKind::Semicolon => "SEMICOLON",
                TokenKind::Special => "SPECIAL_CHARACTER",
                TokenKind::Factorial => "FACTORIAL",
                TokenKind::Error => "ERROR",
            };
            f.write_str(name)
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub enum LexErrorKind {
        InvalidChar,
        InvalidNumber,
        ConsecutiveOperators,
        StringOverflow,
        UnterminatedString,
        InvalidEscapeCharacter,
        UnterminatedCharacter,
        OpenDelimiter,
        LexemeOverflow,
    }

    impl fmt::Display for LexErrorKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let msg = match self {
                LexErrorKind::InvalidChar => "invalid character",
                LexErrorKind::InvalidNumber => "invalid number format",
                LexErrorKind::ConsecutiveOperators => "consecutive operators not allowed",
                LexErrorKind::StringOverflow => "string literal too long",
                LexErrorKind::UnterminatedString => "unterminated string",
                LexErrorKind::InvalidEscapeCharacter => "unrecognized escape character",
                LexErrorKind::UnterminatedCharacter => "unterminated character literal",
                LexErrorKind::OpenDelimiter => "unclosed delimiter",
                LexErrorKind::LexemeOverflow => "identifier too long",
            };
            f.write_str(msg)
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct Token {
        pub kind: TokenKind,
        pub lexeme: String,
        pub line: u32,
        pub error: Option<LexErrorKind>,
    }

    impl Token {
        pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32) -> Self {
            Token {
                kind,
                lexeme: lexeme.into(),
                line,
                error: None,
            }
        }

        pub fn error(error: LexErrorKind, lexeme: impl Into<String>, line: u32) -> Self {
            Token {
                kind: TokenKind::Error,
                lexeme: lexeme.into(),
                line,
                error: Some(error),
            }
        }

        pub fn is_keyword(&self, kw: Keyword) -> bool {
            self.kind == TokenKind::Keyword(kw)
        }
    }
}

pub mod ast {
    use super::token::{Keyword, Token};
    use serde::Serialize;

    #[derive(Debug, Clone, Serialize)]
    pub struct Program {
        pub stmts: Vec<Stmt>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub enum TypeName {
        Int,
        Char,
        Str,
    }

    impl TypeName {
        pub fn from_keyword(kw: Keyword) -> Option<TypeName> {
            match kw {
                Keyword::Int => Some(TypeName::Int),
                Keyword::Char => Some(TypeName::Char),
                Keyword::String => Some(TypeName::Str),
                _ => None,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct Ident {
        pub text: String,
        pub line: u32,
    }

    #[derive(Debug, Clone, Serialize)]
    pub enum Stmt {
        /// `int x;`
        VarDecl {
            ty: TypeName,
            name: Ident,
            token: Token,
        },
        Assign {
            target: Ident,
            value: Expr,
            token: Token,
        },
        Call(Call),
        Print {
            value: Expr,
            token: Token,
        },
        If {
            cond: Expr,
            body: Box<Stmt>,
            else_: Option<ElseBranch>,
            token: Token,
        },
        While {
            cond: Expr,
            body: Box<Stmt>,
            token: Token,
        },
        RepeatUntil {
            body: Box<Stmt>,
            cond: Expr,
            token: Token,
        },
        Break {
            token: Token,
        },
        FnDecl(FnDecl),
        Block(Block),
        /// Bare expression statement, e.g. `$(5);`
        Expr {
            expr: Expr,
            token: Token,
        },
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct ElseBranch {
        pub body: Box<Stmt>,
        pub token: Token,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct Block {
        pub stmts: Vec<Stmt>,
        pub token: Token,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct FnDecl {
        pub name: Ident,
        pub params: Vec<Param>,
        pub body: Box<Stmt>,
        pub token: Token,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct Param {
        pub ty: TypeName,
        pub name: Ident,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct Call {
        pub callee: Ident,
        pub args: Vec<Ident>,
        pub token: Token,
    }

    #[derive(Debug, Clone, Serialize)]
    pub enum Expr {
        Lit(Lit, Token),
        Var(Ident),
        Unary {
            op: UnOp,
            expr: Box<Expr>,
            token: Token,
        },
        Binary {
            lhs: Box<Expr>,
            op: BinOp,
            rhs: Box<Expr>,
            token: Token,
        },
        /// `$(arg)`
        Factorial {
            arg: Box<Expr>,
            token: Token,
        },
        Call(Call),
    }

    impl Expr {
        /// Line of the token that produced this node.
        pub fn line(&self) -> u32 {
            match self {
                Expr::Lit(_, tok) => tok.line,
                Expr::Var(id) => id.line,
                Expr::Unary { token, .. }
                | Expr::Binary { token, .. }
                | Expr::Factorial { token, .. } => token.line,
                Expr::Call(call) => call.token.line,
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub enum UnOp {
        Not,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum Lit {
        Number(i64),
        Str(String),
        Char(char),
        Null,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub enum BinOp {
        // logical
        Or,
        And,
        // equality
        Eq,
        Ne,
        // relational
        Gt,
        Ge,
        Le,
        Lt,
        // arithmetic
        Add,
        Sub,
        Mul,
        Div,
        Mod,
        Pow,
    }

    impl BinOp {
        pub fn from_lexeme(s: &str) -> Option<BinOp> {
            let op = match s {
                "||" => BinOp::Or,
                "&&" => BinOp::And,
                "==" => BinOp::Eq,
                "!=" => BinOp::Ne,
                ">" => BinOp::Gt,
                ">=" => BinOp::Ge,
                "<=" => BinOp::Le,
                "<" => BinOp::Lt,
                "+" => BinOp::Add,
                "-" => BinOp::Sub,
                "*" => BinOp::Mul,
                "/" => BinOp::Div,
                "%" => BinOp::Mod,
                "^^" => BinOp::Pow,
                _ => return None,
            };
            Some(op)
        }
    }
}
