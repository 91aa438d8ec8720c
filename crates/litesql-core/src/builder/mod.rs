//! SQL emission and statement builders.
//!
//! [`SqlBuilder`] turns AST nodes back into canonical SQL text. The
//! statement builders assemble AST nodes programmatically and use the
//! typestate pattern so that incomplete statements do not compile.
//!
//! # Example
//!
//! ```rust
//! use litesql_core::builder::{InsertBuilder, SqlValue};
//!
//! let (sql, params) = InsertBuilder::new()
//!     .into_table("users")
//!     .columns(&["id", "name"])
//!     .value(1)
//!     .value("Alice")
//!     .build_sql();
//!
//! assert_eq!(sql, "INSERT INTO users (id, name) VALUES (?, ?)");
//! assert_eq!(params, [SqlValue::Int(1), SqlValue::Text("Alice".into())]);
//! ```

mod insert;
mod select;
mod sql;
pub mod value;

pub use insert::{HasTable, HasValues, InsertBuilder, NoTable, NoValues};
pub use select::{HasColumns, HasFrom, NoColumns, NoFrom, SelectBuilder};
pub use sql::SqlBuilder;
pub use value::{SqlValue, ToSqlValue};
