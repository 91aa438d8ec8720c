//! SQL statement AST types.

use super::{
    AlterTableStatement, ConflictResolution, CreateIndexStatement, CreateTableStatement,
    CreateTriggerStatement, CreateViewStatement, DropStatement, Expr, Node, SelectStatement,
};
use crate::builder::SqlBuilder;
use crate::error::Result;
use crate::lexer::{Keyword, Operator};
use crate::parser::ParserContext;

/// A top-level SQL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// SELECT statement.
    Select(SelectStatement),
    /// INSERT or REPLACE statement.
    Insert(InsertStatement),
    /// UPDATE statement.
    Update(UpdateStatement),
    /// DELETE statement.
    Delete(DeleteStatement),
    /// CREATE TABLE statement.
    CreateTable(CreateTableStatement),
    /// CREATE INDEX statement.
    CreateIndex(CreateIndexStatement),
    /// CREATE VIEW statement.
    CreateView(CreateViewStatement),
    /// CREATE TRIGGER statement.
    CreateTrigger(CreateTriggerStatement),
    /// DROP TABLE, INDEX, VIEW or TRIGGER.
    Drop(DropStatement),
    /// ALTER TABLE statement.
    AlterTable(AlterTableStatement),
}

impl Statement {
    /// Fails at the object keyword of an unrecognized `CREATE`.
    fn unknown_create(ctx: &mut ParserContext) -> Result<Self> {
        ctx.consume(Keyword::Create)?;
        let _ = ctx.try_consume(Keyword::Temp)
            || ctx.try_consume(Keyword::Temporary)
            || ctx.try_consume(Keyword::Unique);
        Err(ctx.unexpected(&["TABLE", "INDEX", "VIEW", "TRIGGER"]))
    }
}

impl Node for Statement {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        match ctx.current().as_keyword() {
            Some(Keyword::Select) => Ok(Self::Select(ctx.parse()?)),
            Some(Keyword::With) => Err(ctx.unsupported("common table expression")),
            Some(Keyword::Insert | Keyword::Replace) => Ok(Self::Insert(ctx.parse()?)),
            Some(Keyword::Update) => Ok(Self::Update(ctx.parse()?)),
            Some(Keyword::Delete) => Ok(Self::Delete(ctx.parse()?)),
            Some(Keyword::Create) => {
                let modifier = ctx.peek(1).as_keyword();
                let object = if matches!(
                    modifier,
                    Some(Keyword::Temp | Keyword::Temporary | Keyword::Unique)
                ) {
                    ctx.peek(2).as_keyword()
                } else {
                    modifier
                };
                match object {
                    Some(Keyword::Table) => Ok(Self::CreateTable(ctx.parse()?)),
                    Some(Keyword::Index) => Ok(Self::CreateIndex(ctx.parse()?)),
                    Some(Keyword::View) => Ok(Self::CreateView(ctx.parse()?)),
                    Some(Keyword::Trigger) => Ok(Self::CreateTrigger(ctx.parse()?)),
                    _ => Self::unknown_create(ctx),
                }
            }
            Some(Keyword::Drop) => Ok(Self::Drop(ctx.parse()?)),
            Some(Keyword::Alter) => Ok(Self::AlterTable(ctx.parse()?)),
            _ => Err(ctx.unexpected(&[
                "SELECT", "INSERT", "REPLACE", "UPDATE", "DELETE", "CREATE", "DROP", "ALTER",
            ])),
        }
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        match self {
            Self::Select(s) => out.node(s),
            Self::Insert(s) => out.node(s),
            Self::Update(s) => out.node(s),
            Self::Delete(s) => out.node(s),
            Self::CreateTable(s) => out.node(s),
            Self::CreateIndex(s) => out.node(s),
            Self::CreateView(s) => out.node(s),
            Self::CreateTrigger(s) => out.node(s),
            Self::Drop(s) => out.node(s),
            Self::AlterTable(s) => out.node(s),
        };
    }
}

macro_rules! statement_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Statement {
                fn from(stmt: $ty) -> Self {
                    Self::$variant(stmt)
                }
            }
        )*
    };
}

statement_from!(
    Select(SelectStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    CreateTable(CreateTableStatement),
    CreateIndex(CreateIndexStatement),
    CreateView(CreateViewStatement),
    CreateTrigger(CreateTriggerStatement),
    Drop(DropStatement),
    AlterTable(AlterTableStatement),
);

/// The verb that starts an INSERT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertVerb {
    /// `INSERT`
    Insert,
    /// `REPLACE`
    Replace,
    /// `INSERT OR resolution`
    InsertOr(ConflictResolution),
}

/// Rows inserted by an INSERT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertSource {
    /// `VALUES (..), (..)`; every row is non-empty.
    Values(Vec<Vec<Expr>>),
    /// `SELECT ...`
    Select(Box<SelectStatement>),
    /// `DEFAULT VALUES`
    DefaultValues,
}

/// An INSERT statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    pub verb: InsertVerb,
    /// Schema name.
    pub schema: Option<String>,
    /// Table name.
    pub table: String,
    /// Target columns; empty means all columns in table order.
    pub columns: Vec<String>,
    pub source: InsertSource,
}

impl Node for InsertStatement {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        let verb = if ctx.try_consume(Keyword::Replace) {
            InsertVerb::Replace
        } else {
            ctx.consume(Keyword::Insert)?;
            if ctx.try_consume(Keyword::Or) {
                InsertVerb::InsertOr(ConflictResolution::parse_keyword(ctx)?)
            } else {
                InsertVerb::Insert
            }
        };
        ctx.consume(Keyword::Into)?;
        let (schema, table) = ctx.qualified_name()?;
        let columns = if ctx.current_is(Operator::LeftParen) {
            ctx.identifier_list()?
        } else {
            Vec::new()
        };

        let source = if ctx.try_consume_all(&[Keyword::Default.into(), Keyword::Values.into()]) {
            InsertSource::DefaultValues
        } else if ctx.try_consume(Keyword::Values) {
            InsertSource::Values(ctx.parse_list(Operator::Comma, |ctx| {
                ctx.parenthesized(|ctx| {
                    ctx.parse_list(Operator::Comma, ParserContext::parse::<Expr>)
                })
            })?)
        } else if ctx.current_is(Keyword::Select) || ctx.current_is(Keyword::With) {
            InsertSource::Select(Box::new(ctx.parse()?))
        } else {
            return Err(ctx.unexpected(&["VALUES", "SELECT", "DEFAULT"]));
        };

        Ok(Self {
            verb,
            schema,
            table,
            columns,
            source,
        })
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        match self.verb {
            InsertVerb::Insert => out.keyword(Keyword::Insert),
            InsertVerb::Replace => out.keyword(Keyword::Replace),
            InsertVerb::InsertOr(resolution) => {
                out.keywords(&[Keyword::Insert, Keyword::Or, resolution.keyword()])
            }
        };
        out.keyword(Keyword::Into)
            .qualified_name(self.schema.as_deref(), &self.table);
        if !self.columns.is_empty() {
            out.paren_identifiers(&self.columns);
        }
        match &self.source {
            InsertSource::Values(rows) => {
                out.keyword(Keyword::Values);
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        out.comma();
                    }
                    out.paren_list(row);
                }
            }
            InsertSource::Select(select) => {
                out.node(select.as_ref());
            }
            InsertSource::DefaultValues => {
                out.keywords(&[Keyword::Default, Keyword::Values]);
            }
        }
    }
}

/// `column = value` in an UPDATE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Column name.
    pub column: String,
    /// Value expression.
    pub value: Expr,
}

impl Assignment {
    /// Creates an assignment.
    #[must_use]
    pub fn new(column: impl Into<String>, value: Expr) -> Self {
        Self {
            column: column.into(),
            value,
        }
    }
}

impl Node for Assignment {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        let column = ctx.consume_identifier()?;
        ctx.consume(Operator::Eq)?;
        let value = ctx.parse()?;
        Ok(Self { column, value })
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        out.identifier(&self.column).operator("=").node(&self.value);
    }
}

/// An UPDATE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatement {
    /// `OR resolution`, if written.
    pub or_conflict: Option<ConflictResolution>,
    /// Schema name.
    pub schema: Option<String>,
    /// Table name.
    pub table: String,
    /// SET assignments, at least one.
    pub assignments: Vec<Assignment>,
    /// WHERE clause.
    pub where_clause: Option<Expr>,
}

impl Node for UpdateStatement {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        ctx.consume(Keyword::Update)?;
        let or_conflict = if ctx.try_consume(Keyword::Or) {
            Some(ConflictResolution::parse_keyword(ctx)?)
        } else {
            None
        };
        let (schema, table) = ctx.qualified_name()?;
        ctx.consume(Keyword::Set)?;
        let assignments = ctx.parse_list(Operator::Comma, ParserContext::parse::<Assignment>)?;
        let where_clause = if ctx.try_consume(Keyword::Where) {
            Some(ctx.parse()?)
        } else {
            None
        };
        Ok(Self {
            or_conflict,
            schema,
            table,
            assignments,
            where_clause,
        })
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        out.keyword(Keyword::Update);
        if let Some(resolution) = self.or_conflict {
            out.keywords(&[Keyword::Or, resolution.keyword()]);
        }
        out.qualified_name(self.schema.as_deref(), &self.table)
            .keyword(Keyword::Set)
            .list(&self.assignments);
        if let Some(expr) = &self.where_clause {
            out.keyword(Keyword::Where).node(expr);
        }
    }
}

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteStatement {
    /// Schema name.
    pub schema: Option<String>,
    /// Table name.
    pub table: String,
    /// WHERE clause.
    pub where_clause: Option<Expr>,
}

impl Node for DeleteStatement {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        ctx.consume_all(&[Keyword::Delete.into(), Keyword::From.into()])?;
        let (schema, table) = ctx.qualified_name()?;
        let where_clause = if ctx.try_consume(Keyword::Where) {
            Some(ctx.parse()?)
        } else {
            None
        };
        Ok(Self {
            schema,
            table,
            where_clause,
        })
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        out.keywords(&[Keyword::Delete, Keyword::From])
            .qualified_name(self.schema.as_deref(), &self.table);
        if let Some(expr) = &self.where_clause {
            out.keyword(Keyword::Where).node(expr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOp;
    use crate::error::ParseError;
    use crate::parser::Parser;

    fn parse(sql: &str) -> Statement {
        Parser::new(sql).parse_statement().unwrap()
    }

    #[test]
    fn test_insert_forms() {
        let stmt = parse("INSERT INTO t (a, b) VALUES (1, 'x'), (2, NULL)");
        let Statement::Insert(insert) = &stmt else {
            panic!("expected insert");
        };
        assert_eq!(insert.columns, ["a", "b"]);
        let InsertSource::Values(rows) = &insert.source else {
            panic!("expected values");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(
            stmt.to_string(),
            "INSERT INTO t (a, b) VALUES (1, 'x'), (2, NULL)"
        );

        assert_eq!(
            parse("insert or ignore into main.t default values").to_string(),
            "INSERT OR IGNORE INTO main.t DEFAULT VALUES"
        );
        assert_eq!(
            parse("REPLACE INTO t SELECT * FROM u").to_string(),
            "REPLACE INTO t SELECT * FROM u"
        );
    }

    #[test]
    fn test_update() {
        let stmt = parse("UPDATE OR ROLLBACK t SET a = 1, b = b + 1 WHERE id = ?");
        let Statement::Update(update) = &stmt else {
            panic!("expected update");
        };
        assert_eq!(update.or_conflict, Some(ConflictResolution::Rollback));
        assert_eq!(
            update.assignments[1],
            Assignment::new("b", Expr::column("b").binary(BinaryOp::Add, Expr::integer(1)))
        );
        assert_eq!(
            stmt.to_string(),
            "UPDATE OR ROLLBACK t SET a = 1, b = b + 1 WHERE id = ?"
        );
    }

    #[test]
    fn test_delete() {
        assert_eq!(
            parse("DELETE FROM t WHERE a IS NULL;").to_string(),
            "DELETE FROM t WHERE a IS NULL"
        );
    }

    #[test]
    fn test_insert_requires_source() {
        let err = Parser::new("INSERT INTO t (a)")
            .parse_statement()
            .unwrap_err();
        assert_eq!(err.expected(), ["VALUES", "SELECT", "DEFAULT"]);
    }

    #[test]
    fn test_unknown_statement() {
        let err = Parser::new("VACUUM").parse_statement().unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
        assert_eq!(err.expected().len(), 8);
    }

    #[test]
    fn test_unknown_create_object() {
        let err = Parser::new("CREATE TEMP SEQUENCE s")
            .parse_statement()
            .unwrap_err();
        assert_eq!(err.expected(), ["TABLE", "INDEX", "VIEW", "TRIGGER"]);
        assert_eq!(err.span().start, 12);
    }

    #[test]
    fn test_with_is_unsupported() {
        let err = Parser::new("WITH x AS (SELECT 1) DELETE FROM t")
            .parse_statement()
            .unwrap_err();
        assert!(matches!(
            err,
            ParseError::Unsupported {
                construct: "common table expression",
                ..
            }
        ));
    }
}
