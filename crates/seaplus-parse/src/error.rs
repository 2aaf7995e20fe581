use seaplus_ast::token::{LexErrorKind, Token};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnexpectedToken,
    UnexpectedEof,
    UnexpectedOperator,
    MissingSemicolon,
    MissingIdentifier,
    MissingEquals,
    MissingParen,
    MissingCondition,
    MissingBrace,
    InvalidExpression,
    InvalidFunctionCall,
    InvalidFunctionDeclaration,
    BreakOutsideLoop,
    /// Pathological nesting (blocks, parentheses, unary chains)
    NestingTooDeep,
    /// The scanner produced an error token
    Lexical(LexErrorKind),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnexpectedToken => f.write_str("unexpected token"),
            ParseErrorKind::UnexpectedEof => f.write_str("unexpected end of input"),
            ParseErrorKind::UnexpectedOperator => f.write_str("unexpected operator"),
            ParseErrorKind::MissingSemicolon => f.write_str("missing semicolon"),
            ParseErrorKind::MissingIdentifier => f.write_str("expected identifier"),
            ParseErrorKind::MissingEquals => f.write_str("expected '='"),
            ParseErrorKind::MissingParen => f.write_str("missing parenthesis"),
            ParseErrorKind::MissingCondition => f.write_str("missing condition"),
            ParseErrorKind::MissingBrace => f.write_str("missing closing brace"),
            ParseErrorKind::InvalidExpression => f.write_str("invalid expression"),
            ParseErrorKind::InvalidFunctionCall => f.write_str("invalid function call"),
            ParseErrorKind::InvalidFunctionDeclaration => {
                f.write_str("invalid function declaration")
            }
            ParseErrorKind::BreakOutsideLoop => f.write_str("'break' outside of a loop"),
            ParseErrorKind::NestingTooDeep => f.write_str("nesting depth limit exceeded"),
            ParseErrorKind::Lexical(kind) => write!(f, "{}", kind),
        }
    }
}

/// First unrecoverable error of a parse, positioned at the offending token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub lexeme: String,
    pub line: u32,
}

impl ParseError {
    pub fn at(kind: ParseErrorKind, tok: &Token) -> Self {
        ParseError {
            kind,
            lexeme: tok.lexeme.clone(),
            line: tok.line,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParseErrorKind::Lexical(kind) => write!(
                f,
                "Lexer error at line {}: {} '{}'",
                self.line, kind, self.lexeme
            ),
            kind => write!(
                f,
                "Parse error at line {}: {} near '{}'",
                self.line, kind, self.lexeme
            ),
        }
    }
}

impl std::error::Error for ParseError {}
