//! SQL Parser
//!
//! A hand-written recursive descent parser with Pratt expression parsing.
//! Grammar rules live next to their AST types as [`Node`](crate::ast::Node)
//! implementations; this module provides the token cursor they share.

mod context;
#[allow(clippy::module_inception)]
mod parser;
pub(crate) mod pratt;

pub use context::{ParserConfig, ParserContext, Snapshot, DEFAULT_MAX_DEPTH};
pub use parser::Parser;
