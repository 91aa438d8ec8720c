//! Canonical SQL text emitter.

use crate::ast::Node;
use crate::dialect::{Dialect, SqliteDialect};
use crate::lexer::Keyword;

static SQLITE: SqliteDialect = SqliteDialect::new();

/// Accumulates SQL text for [`Node::to_sql`].
///
/// Successive words are separated by exactly one space. Nothing is emitted
/// before `,` or `)`, and nothing after `(` or `.`.
///
/// # Example
///
/// ```rust
/// use litesql_core::builder::SqlBuilder;
/// use litesql_core::lexer::Keyword;
///
/// let mut out = SqlBuilder::new();
/// out.keywords(&[Keyword::Drop, Keyword::Table])
///     .identifier("main")
///     .dot()
///     .identifier("order");
/// assert_eq!(out.finish(), "DROP TABLE main.\"order\"");
/// ```
pub struct SqlBuilder<'d> {
    sql: String,
    glue: bool,
    dialect: &'d dyn Dialect,
}

impl SqlBuilder<'static> {
    /// Creates an emitter for the SQLite dialect.
    #[must_use]
    pub fn new() -> Self {
        Self::with_dialect(&SQLITE)
    }
}

impl Default for SqlBuilder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'d> SqlBuilder<'d> {
    /// Creates an emitter quoting identifiers the way `dialect` does.
    #[must_use]
    pub fn with_dialect(dialect: &'d dyn Dialect) -> Self {
        Self {
            sql: String::new(),
            glue: true,
            dialect,
        }
    }

    /// Returns the dialect used for quoting.
    #[must_use]
    pub fn dialect(&self) -> &'d dyn Dialect {
        self.dialect
    }

    /// Appends a word, preceded by a space unless glued.
    fn word(&mut self, text: &str) -> &mut Self {
        if !self.glue {
            self.sql.push(' ');
        }
        self.sql.push_str(text);
        self.glue = false;
        self
    }

    /// Appends punctuation that attaches to the previous word.
    fn attach(&mut self, text: &str) -> &mut Self {
        self.sql.push_str(text);
        self.glue = false;
        self
    }

    /// Appends a keyword.
    pub fn keyword(&mut self, keyword: Keyword) -> &mut Self {
        self.word(keyword.as_str())
    }

    /// Appends several keywords.
    pub fn keywords(&mut self, keywords: &[Keyword]) -> &mut Self {
        for keyword in keywords {
            self.keyword(*keyword);
        }
        self
    }

    /// Appends an infix operator such as `=` or `||`.
    pub fn operator(&mut self, op: &str) -> &mut Self {
        self.word(op)
    }

    /// Appends a prefix operator; the next word attaches to it.
    pub fn prefix(&mut self, op: &str) -> &mut Self {
        self.word(op);
        self.glue = true;
        self
    }

    /// Appends an identifier, quoted only if it would not lex back as itself.
    pub fn identifier(&mut self, name: &str) -> &mut Self {
        if self.dialect.needs_quoting(name) {
            let quoted = self.dialect.quote_identifier(name);
            self.word(&quoted)
        } else {
            self.word(name)
        }
    }

    /// Appends comma-separated identifiers.
    pub fn identifiers(&mut self, names: &[String]) -> &mut Self {
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.comma();
            }
            self.identifier(name);
        }
        self
    }

    /// Appends text verbatim as one word (numbers, `*`).
    pub fn raw(&mut self, text: &str) -> &mut Self {
        self.word(text)
    }

    /// Appends a string literal, doubling embedded single quotes.
    pub fn string_literal(&mut self, value: &str) -> &mut Self {
        let escaped = value.replace('\'', "''");
        self.word(&format!("'{escaped}'"))
    }

    /// Appends a blob literal in `X'..'` form.
    pub fn blob_literal(&mut self, bytes: &[u8]) -> &mut Self {
        let hex: String = bytes.iter().map(|byte| format!("{byte:02X}")).collect();
        self.word(&format!("X'{hex}'"))
    }

    /// Appends the dialect's parameter placeholder.
    pub fn placeholder(&mut self) -> &mut Self {
        let placeholder = self.dialect.parameter_placeholder();
        self.word(placeholder)
    }

    /// Appends `(` as a word of its own, e.g. before a column list.
    pub fn open_paren(&mut self) -> &mut Self {
        self.word("(");
        self.glue = true;
        self
    }

    /// Appends `(` attached to the previous word, e.g. in `count(`.
    pub fn call_paren(&mut self) -> &mut Self {
        self.sql.push('(');
        self.glue = true;
        self
    }

    /// Appends `)`.
    pub fn close_paren(&mut self) -> &mut Self {
        self.attach(")")
    }

    /// Appends `,`.
    pub fn comma(&mut self) -> &mut Self {
        self.attach(",")
    }

    /// Appends `.`; the next word attaches to it.
    pub fn dot(&mut self) -> &mut Self {
        self.sql.push('.');
        self.glue = true;
        self
    }

    /// Appends `;`.
    pub fn semicolon(&mut self) -> &mut Self {
        self.attach(";")
    }

    /// Appends `[schema .] name`.
    pub fn qualified_name(&mut self, schema: Option<&str>, name: &str) -> &mut Self {
        if let Some(schema) = schema {
            self.identifier(schema).dot();
        }
        self.identifier(name)
    }

    /// Appends a node.
    pub fn node<N: Node>(&mut self, node: &N) -> &mut Self {
        node.to_sql(self);
        self
    }

    /// Appends comma-separated nodes.
    pub fn list<N: Node>(&mut self, nodes: &[N]) -> &mut Self {
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                self.comma();
            }
            self.node(node);
        }
        self
    }

    /// Appends `( nodes )`.
    pub fn paren_list<N: Node>(&mut self, nodes: &[N]) -> &mut Self {
        self.open_paren().list(nodes).close_paren()
    }

    /// Appends `( names )`.
    pub fn paren_identifiers(&mut self, names: &[String]) -> &mut Self {
        self.open_paren().identifiers(names).close_paren()
    }

    /// Returns the text emitted so far.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.sql
    }

    /// Returns the emitted SQL.
    #[must_use]
    pub fn finish(self) -> String {
        self.sql
    }
}
