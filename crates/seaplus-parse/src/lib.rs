#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

mod error;
mod lexer;
mod parser;

pub use error::{ParseError, ParseErrorKind};
pub use lexer::{tokenize, LexWarning, Scanner};
pub use parser::{parse_str, Parsed, MAX_NESTING_DEPTH};
