use seaplus_ast::token::{Keyword, LexErrorKind, Token, TokenKind, MAX_LEXEME_LEN};
use std::fmt;

/// Non-fatal conditions noticed while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexWarning {
    UnterminatedComment { line: u32 },
}

impl fmt::Display for LexWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexWarning::UnterminatedComment { line } => {
                write!(f, "unclosed block comment starting at line {}", line)
            }
        }
    }
}

/// What the previously returned token was, as far as the
/// consecutive-operator rule cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prev {
    Start,
    BinaryOp,
    Other,
}

/// Pull-based scanner over one source buffer.
///
/// Each call to [`Scanner::next_token`] consumes exactly the characters of
/// the returned token. [`Scanner::peek_token`] scans ahead on a copy of the
/// cursor, so the shared position is never moved by a lookahead.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    line: u32,
    prev: Prev,
    open: Vec<(char, u32)>,
    warnings: Vec<LexWarning>,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            prev: Prev::Start,
            open: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn warnings(&self) -> &[LexWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<LexWarning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn next_token(&mut self) -> Token {
        let tok = self.scan();
        self.prev = match tok.kind {
            TokenKind::Operator if tok.lexeme != "!" => Prev::BinaryOp,
            TokenKind::Comparison => Prev::BinaryOp,
            _ => Prev::Other,
        };
        tok
    }

    pub fn peek_token(&self) -> Token {
        self.clone().next_token()
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek2(&self) -> Option<char> {
        let mut it = self.src[self.pos..].chars();
        it.next();
        it.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_ws_and_comments(&mut self) {
        loop {
            while matches!(self.peek(), Some(c) if c.is_whitespace()) {
                self.bump();
            }
            // line comment: # ...
            if self.peek() == Some('#') {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
                continue;
            }
            // block comment: /* ... */
            if self.peek() == Some('/') && self.peek2() == Some('*') {
                let start_line = self.line;
                self.bump();
                self.bump();
                loop {
                    match self.peek() {
                        None => {
                            self.warnings
                                .push(LexWarning::UnterminatedComment { line: start_line });
                            break;
                        }
                        Some('*') if self.peek2() == Some('/') => {
                            self.bump();
                            self.bump();
                            break;
                        }
                        Some(_) => {
                            self.bump();
                        }
                    }
                }
                continue;
            }
            break;
        }
    }

    fn scan(&mut self) -> Token {
        self.skip_ws_and_comments();
        let line = self.line;
        let Some(c) = self.peek() else {
            return self.end_of_input();
        };

        if c.is_ascii_digit() {
            return self.number(line);
        }
        if c == '_' && !matches!(self.peek2(), Some(n) if is_ident_char(n)) {
            self.bump();
            return Token::new(TokenKind::Special, "_", line);
        }
        if c.is_ascii_alphabetic() || c == '_' {
            return self.ident_or_keyword(line);
        }
        if c == '&' && self.peek2() != Some('&') {
            self.bump();
            return Token::new(TokenKind::Special, "&", line);
        }
        if c == '"' {
            return self.string(line);
        }
        if c == '\'' {
            return self.char_lit(line);
        }
        if matches!(
            c,
            '$' | '+' | '-' | '*' | '/' | '%' | '=' | '!' | '|' | '^' | '&' | '<' | '>'
        ) {
            return self.operator(c, line);
        }

        self.bump();
        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            _ => return Token::error(LexErrorKind::InvalidChar, c.to_string(), line),
        };
        match c {
            '(' | '{' | '[' => self.open.push((c, line)),
            ')' | '}' | ']' => {
                if matches!(self.open.last(), Some((o, _)) if closes(*o, c)) {
                    self.open.pop();
                }
            }
            _ => {}
        }
        Token::new(kind, c.to_string(), line)
    }

    fn end_of_input(&mut self) -> Token {
        if let Some(&(open, line)) = self.open.last() {
            self.open.clear();
            return Token::error(LexErrorKind::OpenDelimiter, open.to_string(), line);
        }
        Token::new(TokenKind::Eof, "EOF", self.line)
    }

    fn number(&mut self, line: u32) -> Token {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        // `10x` is a malformed number, not a number followed by an identifier
        if matches!(self.peek(), Some(c) if is_ident_char(c)) {
            while matches!(self.peek(), Some(c) if is_ident_char(c)) {
                self.bump();
            }
            let text = bounded(&self.src[start..self.pos]);
            return Token::error(LexErrorKind::InvalidNumber, text, line);
        }
        let text = &self.src[start..self.pos];
        if text.parse::<i64>().is_err() {
            return Token::error(LexErrorKind::InvalidNumber, bounded(text), line);
        }
        Token::new(TokenKind::Number, text, line)
    }

    fn ident_or_keyword(&mut self, line: u32) -> Token {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if is_ident_char(c)) {
            self.bump();
        }
        let text = &self.src[start..self.pos];
        if text.len() > MAX_LEXEME_LEN {
            return Token::error(LexErrorKind::LexemeOverflow, bounded(text), line);
        }
        match Keyword::lookup(text) {
            Some(kw) => Token::new(TokenKind::Keyword(kw), text, line),
            None => Token::new(TokenKind::Identifier, text, line),
        }
    }

    fn string(&mut self, line: u32) -> Token {
        self.bump(); // opening quote
        let mut buf = LexemeBuf::default();
        let mut bad_escape = false;
        loop {
            let Some(c) = self.bump() else {
                return Token::error(LexErrorKind::UnterminatedString, buf.text, line);
            };
            match c {
                '"' => break,
                '\\' => {
                    let Some(esc) = self.bump() else {
                        return Token::error(LexErrorKind::UnterminatedString, buf.text, line);
                    };
                    match unescape(esc) {
                        Some(real) => buf.push(real),
                        None => {
                            bad_escape = true;
                            buf.push('\\');
                            buf.push(esc);
                        }
                    }
                }
                _ => buf.push(c),
            }
        }
        if buf.overflowed {
            Token::error(LexErrorKind::StringOverflow, buf.text, line)
        } else if bad_escape {
            Token::error(LexErrorKind::InvalidEscapeCharacter, buf.text, line)
        } else {
            Token::new(TokenKind::StringLiteral, buf.text, line)
        }
    }

    fn char_lit(&mut self, line: u32) -> Token {
        self.bump(); // opening quote
        match self.peek() {
            None | Some('\n') => Token::error(LexErrorKind::UnterminatedCharacter, "'", line),
            Some('\\') => {
                self.bump();
                let esc = match self.peek() {
                    Some(e) if e != '\n' => e,
                    _ => return Token::error(LexErrorKind::UnterminatedCharacter, "\\", line),
                };
                self.bump();
                let raw = format!("\\{}", esc);
                if self.peek() != Some('\'') {
                    return Token::error(LexErrorKind::UnterminatedCharacter, raw, line);
                }
                self.bump();
                match unescape(esc) {
                    Some(real) => Token::new(TokenKind::CharLiteral, real.to_string(), line),
                    None => Token::error(LexErrorKind::InvalidEscapeCharacter, raw, line),
                }
            }
            Some(c) => {
                self.bump();
                if self.peek() != Some('\'') {
                    return Token::error(LexErrorKind::UnterminatedCharacter, c.to_string(), line);
                }
                self.bump();
                Token::new(TokenKind::CharLiteral, c.to_string(), line)
            }
        }
    }

    fn operator(&mut self, c: char, line: u32) -> Token {
        // `!` and `$` are prefix-compatible and may follow another operator
        if self.prev == Prev::BinaryOp && c != '!' && c != '$' {
            self.bump();
            return Token::error(LexErrorKind::ConsecutiveOperators, c.to_string(), line);
        }
        let next = self.peek2();
        self.bump();
        match c {
            '+' | '-' | '*' | '/' | '%' => Token::new(TokenKind::Operator, c.to_string(), line),
            '=' | '!' | '<' | '>' if next == Some('=') => {
                self.bump();
                Token::new(TokenKind::Comparison, format!("{}=", c), line)
            }
            '=' => Token::new(TokenKind::Assign, "=", line),
            '!' => Token::new(TokenKind::Operator, "!", line),
            '<' | '>' => Token::new(TokenKind::Comparison, c.to_string(), line),
            '|' | '^' | '&' if next == Some(c) => {
                self.bump();
                Token::new(TokenKind::Operator, format!("{}{}", c, c), line)
            }
            '$' => Token::new(TokenKind::Factorial, "$", line),
            _ => Token::error(LexErrorKind::InvalidChar, c.to_string(), line),
        }
    }
}

/// Scan `src` to completion. The returned tokens end with `Eof`.
pub fn tokenize(src: &str) -> (Vec<Token>, Vec<LexWarning>) {
    let mut scanner = Scanner::new(src);
    let mut tokens = Vec::new();
    loop {
        let tok = scanner.next_token();
        let done = tok.kind == TokenKind::Eof;
        tokens.push(tok);
        if done {
            break;
        }
    }
    (tokens, scanner.take_warnings())
}

/// String literal content, capped at `MAX_LEXEME_LEN` characters.
#[derive(Default)]
struct LexemeBuf {
    text: String,
    len: usize,
    overflowed: bool,
}

impl LexemeBuf {
    fn push(&mut self, c: char) {
        if self.len >= MAX_LEXEME_LEN {
            self.overflowed = true;
        } else {
            self.text.push(c);
            self.len += 1;
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn closes(open: char, close: char) -> bool {
    matches!((open, close), ('(', ')') | ('{', '}') | ('[', ']'))
}

fn unescape(esc: char) -> Option<char> {
    match esc {
        '\\' => Some('\\'),
        '\'' => Some('\''),
        '"' => Some('"'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        _ => None,
    }
}

fn bounded(text: &str) -> String {
    text.chars().take(MAX_LEXEME_LEN).collect()
}
