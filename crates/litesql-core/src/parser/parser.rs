//! SQL Parser entry point.

use core::any::type_name;

use tracing::debug;

use super::context::{ParserConfig, ParserContext};
use crate::ast::{Node, Statement};
use crate::error::Result;

/// SQL Parser.
///
/// Parses one complete statement, or any single grammar rule, from a string.
/// Every call lexes the input and runs a fresh [`ParserContext`].
#[derive(Debug, Clone, Copy)]
pub struct Parser<'a> {
    input: &'a str,
    config: ParserConfig,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self::with_config(input, ParserConfig::new())
    }

    /// Creates a new parser with an explicit configuration.
    #[must_use]
    pub const fn with_config(input: &'a str, config: ParserConfig) -> Self {
        Self { input, config }
    }

    /// Parses a single SQL statement, optionally followed by `;`.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not exactly one supported
    /// statement.
    pub fn parse_statement(&self) -> Result<Statement> {
        self.parse_rule()
    }

    /// Parses the whole input as one instance of grammar rule `T`.
    ///
    /// ```rust
    /// use litesql_core::ast::TypeDefinition;
    /// use litesql_core::Parser;
    ///
    /// let ty: TypeDefinition = Parser::new("CHAR(10,2)").parse_rule().unwrap();
    /// assert_eq!(ty.to_string(), "CHAR(10, 2)");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a valid `T` or if input
    /// remains after it.
    pub fn parse_rule<T: Node>(&self) -> Result<T> {
        let mut ctx = ParserContext::from_sql(self.input, self.config)?;
        debug!(
            rule = type_name::<T>(),
            tokens = ctx.remaining(),
            "parsing"
        );
        let node = ctx.parse::<T>()?;
        ctx.expect_end()?;
        Ok(node)
    }
}
