//! SQL Dialect support.
//!
//! The emitter consults a dialect for identifier quoting and parameter
//! placeholders. [`SqliteDialect`] is the default.

mod sqlite;

pub use sqlite::SqliteDialect;

use crate::lexer::Keyword;

/// Trait for SQL dialect-specific behavior.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character (e.g., `"` for standard SQL, `` ` `` for MySQL).
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Returns the parameter placeholder style.
    fn parameter_placeholder(&self) -> &'static str {
        "?"
    }

    /// Returns true if `name` must be quoted to lex back as the same identifier.
    fn needs_quoting(&self, name: &str) -> bool {
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return true;
        };
        if !(first.is_alphabetic() || first == '_') {
            return true;
        }
        if !chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
            return true;
        }
        Keyword::from_str(name).is_some()
    }

    /// Quotes an identifier, doubling embedded quote characters.
    fn quote_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        let mut quoted = String::with_capacity(name.len() + 2);
        quoted.push(quote);
        for c in name.chars() {
            if c == quote {
                quoted.push(quote);
            }
            quoted.push(c);
        }
        quoted.push(quote);
        quoted
    }
}
