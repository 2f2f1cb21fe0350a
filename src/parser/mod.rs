//! Parser for `{{placeholder}}` template text

pub mod ast;
mod grammar;
pub mod lexer;

pub use ast::*;
pub use grammar::{parse_text, parse_text_lenient};
