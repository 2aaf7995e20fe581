//! Source loading and output formatting shared by the `seaplus` subcommands.

use anyhow::{bail, Context, Result};
use seaplus_ast::token::{Token, TokenKind};
use seaplus_sema::{Analysis, Diagnostic};
use serde::Serialize;

/// Maximum source file size in bytes (1MB)
pub const MAX_SOURCE_SIZE: usize = 1_000_000;

/// Read a source file, refusing oversized input and dropping carriage returns.
pub fn load_source(path: &str) -> Result<String> {
    let src =
        std::fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path))?;
    if src.len() > MAX_SOURCE_SIZE {
        bail!(
            "source file exceeds {}MB limit ({} bytes)",
            MAX_SOURCE_SIZE / 1_000_000,
            src.len()
        );
    }
    Ok(src.replace('\r', ""))
}

/// One listing line: `line  KIND  lexeme`, with the error kind for error tokens.
pub fn format_token(tok: &Token) -> String {
    match (tok.kind, tok.error) {
        (TokenKind::Error, Some(err)) => {
            format!("{:>4}  ERROR({})  {}", tok.line, err, tok.lexeme)
        }
        (TokenKind::Keyword(kw), _) => format!("{:>4}  KEYWORD  {}", tok.line, kw.as_str()),
        (TokenKind::Eof, _) => format!("{:>4}  EOF", tok.line),
        (kind, _) => format!("{:>4}  {}  {}", tok.line, kind, tok.lexeme),
    }
}

/// Machine-readable result of `seaplus check`.
#[derive(Debug, Serialize)]
pub struct CheckReport<'a> {
    pub file: &'a str,
    pub ok: bool,
    pub warnings: Vec<String>,
    pub diagnostics: &'a [Diagnostic],
}

impl<'a> CheckReport<'a> {
    pub fn new(file: &'a str, warnings: Vec<String>, analysis: &'a Analysis) -> Self {
        CheckReport {
            file,
            ok: analysis.ok,
            warnings,
            diagnostics: &analysis.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seaplus_ast::token::{Keyword, LexErrorKind};

    #[test]
    fn token_lines() {
        let kw = Token::new(TokenKind::Keyword(Keyword::While), "while", 3);
        assert_eq!(format_token(&kw), "   3  KEYWORD  while");

        let num = Token::new(TokenKind::Number, "42", 12);
        assert_eq!(format_token(&num), "  12  NUMBER  42");

        let bad = Token::error(LexErrorKind::InvalidChar, "@", 1);
        assert_eq!(format_token(&bad), "   1  ERROR(invalid character)  @");
    }

    #[test]
    fn oversized_source_is_refused() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let path = dir.path().join("big.sp");
        std::fs::write(&path, "x".repeat(MAX_SOURCE_SIZE + 1)).expect("write source");

        let err = load_source(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("exceeds"), "{}", err);
    }

    #[test]
    fn carriage_returns_are_stripped() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let path = dir.path().join("crlf.sp");
        std::fs::write(&path, "int x;\r\nx = 1;\r\n").expect("write source");

        let src = load_source(path.to_str().unwrap()).expect("load");
        assert_eq!(src, "int x;\nx = 1;\n");
    }
}
