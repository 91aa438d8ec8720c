//! SQL Lexer/Tokenizer
//!
//! This module provides a hand-written lexer for SQLite's SQL that produces a
//! stream of tokens terminated by a single EOF token.

mod span;
mod token;
mod tokenizer;

pub use span::Span;
pub use token::{Keyword, Operator, Terminal, Token, TokenKind};
pub use tokenizer::Lexer;
