//! # litesql-core
//!
//! A recursive-descent parser, AST and canonical emitter for the SQLite
//! dialect of SQL.
//!
//! This crate provides:
//! - A lexer producing keyword, identifier, literal and operator tokens
//! - A backtracking parser built from small combinators, with Pratt
//!   expression parsing
//! - AST nodes that both parse and emit themselves, so that emitted SQL
//!   parses back to an equal tree
//! - Typestate builders for INSERT and SELECT statements
//!
//! ## Parsing
//!
//! ```rust
//! use litesql_core::{Parser, Statement};
//!
//! let statement = Parser::new("select id , name from users where id=1")
//!     .parse_statement()
//!     .unwrap();
//!
//! assert!(matches!(statement, Statement::Select(_)));
//! assert_eq!(
//!     statement.to_string(),
//!     "SELECT id, name FROM users WHERE id = 1"
//! );
//! ```
//!
//! ## Errors
//!
//! A failed parse reports what was expected and where:
//!
//! ```rust
//! use litesql_core::{ParseError, Parser};
//!
//! let err = Parser::new("SELECT FROM t").parse_statement().unwrap_err();
//! assert!(matches!(err, ParseError::UnexpectedToken { .. }));
//! ```
//!
//! ## SQL Injection Prevention
//!
//! Builders bind values through `?` placeholders:
//!
//! ```rust
//! use litesql_core::builder::{InsertBuilder, SqlValue};
//!
//! let user_input = "'; DROP TABLE users; --";
//! let (sql, params) = InsertBuilder::new()
//!     .into_table("users")
//!     .columns(&["name"])
//!     .value(user_input)
//!     .build_sql();
//!
//! assert_eq!(sql, "INSERT INTO users (name) VALUES (?)");
//! assert_eq!(params, [SqlValue::Text(user_input.into())]);
//! ```

pub mod ast;
pub mod builder;
pub mod dialect;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::{Expr, Node, Statement};
pub use builder::{InsertBuilder, SelectBuilder, SqlBuilder, SqlValue};
pub use error::{ParseError, Result};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{Parser, ParserConfig};
