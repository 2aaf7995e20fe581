#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
#![forbid(unsafe_code)]

mod analyzer;
mod diagnostic;
mod symbols;


pub use analyzer::{analyze, Analysis, Analyzer};
pub use diagnostic::{Diagnostic, SemanticErrorKind, Severity};
pub use symbols::{Symbol, SymbolTable, TypeTag};
