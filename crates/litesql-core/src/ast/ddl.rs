//! Schema statements: CREATE, DROP and ALTER TABLE.

use super::{
    ColumnDefinition, Expr, IndexedColumn, Node, SelectStatement, Statement, TableConstraint,
};
use crate::builder::SqlBuilder;
use crate::error::Result;
use crate::lexer::{Keyword, Operator, Terminal};
use crate::parser::ParserContext;

const IF_NOT_EXISTS: [Terminal; 3] = [
    Terminal::Keyword(Keyword::If),
    Terminal::Keyword(Keyword::Not),
    Terminal::Keyword(Keyword::Exists),
];

/// Parses `CREATE [TEMP | TEMPORARY] object [IF NOT EXISTS]`, returning the
/// two flags.
fn create_prefix(ctx: &mut ParserContext, object: Keyword) -> Result<(bool, bool)> {
    ctx.consume(Keyword::Create)?;
    let temporary = ctx.try_consume(Keyword::Temp) || ctx.try_consume(Keyword::Temporary);
    ctx.consume(object)?;
    Ok((temporary, ctx.try_consume_all(&IF_NOT_EXISTS)))
}

fn write_create_prefix(
    out: &mut SqlBuilder<'_>,
    temporary: bool,
    object: Keyword,
    if_not_exists: bool,
) {
    out.keyword(Keyword::Create);
    if temporary {
        out.keyword(Keyword::Temp);
    }
    out.keyword(object);
    if if_not_exists {
        out.keywords(&[Keyword::If, Keyword::Not, Keyword::Exists]);
    }
}

/// Table body of a CREATE TABLE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateTableBody {
    /// `(columns [, constraints]) [WITHOUT ROWID]`
    Columns {
        /// Column definitions, at least one.
        columns: Vec<ColumnDefinition>,
        /// Table constraints.
        constraints: Vec<TableConstraint>,
        /// Whether `WITHOUT ROWID` was specified.
        without_rowid: bool,
    },
    /// `AS SELECT ...`
    AsSelect(Box<SelectStatement>),
}

/// A CREATE TABLE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTableStatement {
    /// Whether TEMP or TEMPORARY was specified.
    pub temporary: bool,
    /// Whether IF NOT EXISTS was specified.
    pub if_not_exists: bool,
    /// Schema name.
    pub schema: Option<String>,
    /// Table name.
    pub name: String,
    pub body: CreateTableBody,
}

impl CreateTableStatement {
    /// Creates `CREATE TABLE name (columns)`.
    #[must_use]
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDefinition>) -> Self {
        Self {
            temporary: false,
            if_not_exists: false,
            schema: None,
            name: name.into(),
            body: CreateTableBody::Columns {
                columns,
                constraints: Vec::new(),
                without_rowid: false,
            },
        }
    }

    /// Returns the column definitions, empty for `AS SELECT`.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDefinition] {
        match &self.body {
            CreateTableBody::Columns { columns, .. } => columns,
            CreateTableBody::AsSelect(_) => &[],
        }
    }
}

impl Node for CreateTableStatement {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        let (temporary, if_not_exists) = create_prefix(ctx, Keyword::Table)?;
        let (schema, name) = ctx.qualified_name()?;

        let body = if ctx.try_consume(Keyword::As) {
            CreateTableBody::AsSelect(Box::new(ctx.parse()?))
        } else {
            ctx.consume(Operator::LeftParen)?;
            let mut columns = vec![ctx.parse::<ColumnDefinition>()?];
            let mut constraints = Vec::new();
            while ctx.try_consume(Operator::Comma) {
                if TableConstraint::starts_at(ctx) {
                    constraints =
                        ctx.parse_list(Operator::Comma, ParserContext::parse::<TableConstraint>)?;
                    break;
                }
                columns.push(ctx.parse()?);
            }
            ctx.consume(Operator::RightParen)?;

            let without_rowid = if ctx.try_consume(Keyword::Without) {
                ctx.consume_word("ROWID")?;
                true
            } else {
                false
            };
            CreateTableBody::Columns {
                columns,
                constraints,
                without_rowid,
            }
        };

        Ok(Self {
            temporary,
            if_not_exists,
            schema,
            name,
            body,
        })
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        write_create_prefix(out, self.temporary, Keyword::Table, self.if_not_exists);
        out.qualified_name(self.schema.as_deref(), &self.name);
        match &self.body {
            CreateTableBody::Columns {
                columns,
                constraints,
                without_rowid,
            } => {
                out.open_paren().list(columns);
                for constraint in constraints {
                    out.comma().node(constraint);
                }
                out.close_paren();
                if *without_rowid {
                    out.keyword(Keyword::Without).raw("ROWID");
                }
            }
            CreateTableBody::AsSelect(select) => {
                out.keyword(Keyword::As).node(select.as_ref());
            }
        }
    }
}

/// A CREATE INDEX statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIndexStatement {
    /// Whether UNIQUE was specified.
    pub unique: bool,
    /// Whether IF NOT EXISTS was specified.
    pub if_not_exists: bool,
    /// Schema name.
    pub schema: Option<String>,
    /// Index name.
    pub name: String,
    /// Indexed table.
    pub table: String,
    /// Indexed columns, at least one.
    pub columns: Vec<IndexedColumn>,
    /// Partial index condition.
    pub where_clause: Option<Expr>,
}

impl Node for CreateIndexStatement {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        ctx.consume(Keyword::Create)?;
        let unique = ctx.try_consume(Keyword::Unique);
        ctx.consume(Keyword::Index)?;
        let if_not_exists = ctx.try_consume_all(&IF_NOT_EXISTS);
        let (schema, name) = ctx.qualified_name()?;
        ctx.consume(Keyword::On)?;
        let table = ctx.consume_identifier()?;
        let columns = ctx.parenthesized(|ctx| {
            ctx.parse_list(Operator::Comma, ParserContext::parse::<IndexedColumn>)
        })?;
        let where_clause = if ctx.try_consume(Keyword::Where) {
            Some(ctx.parse()?)
        } else {
            None
        };
        Ok(Self {
            unique,
            if_not_exists,
            schema,
            name,
            table,
            columns,
            where_clause,
        })
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        out.keyword(Keyword::Create);
        if self.unique {
            out.keyword(Keyword::Unique);
        }
        out.keyword(Keyword::Index);
        if self.if_not_exists {
            out.keywords(&[Keyword::If, Keyword::Not, Keyword::Exists]);
        }
        out.qualified_name(self.schema.as_deref(), &self.name)
            .keyword(Keyword::On)
            .identifier(&self.table)
            .paren_list(&self.columns);
        if let Some(expr) = &self.where_clause {
            out.keyword(Keyword::Where).node(expr);
        }
    }
}

/// A CREATE VIEW statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateViewStatement {
    /// Whether TEMP or TEMPORARY was specified.
    pub temporary: bool,
    /// Whether IF NOT EXISTS was specified.
    pub if_not_exists: bool,
    /// Schema name.
    pub schema: Option<String>,
    /// View name.
    pub name: String,
    /// Column names; empty to use the SELECT's.
    pub columns: Vec<String>,
    pub select: Box<SelectStatement>,
}

impl Node for CreateViewStatement {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        let (temporary, if_not_exists) = create_prefix(ctx, Keyword::View)?;
        let (schema, name) = ctx.qualified_name()?;
        let columns = if ctx.current_is(Operator::LeftParen) {
            ctx.identifier_list()?
        } else {
            Vec::new()
        };
        ctx.consume(Keyword::As)?;
        let select = Box::new(ctx.parse()?);
        Ok(Self {
            temporary,
            if_not_exists,
            schema,
            name,
            columns,
            select,
        })
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        write_create_prefix(out, self.temporary, Keyword::View, self.if_not_exists);
        out.qualified_name(self.schema.as_deref(), &self.name);
        if !self.columns.is_empty() {
            out.paren_identifiers(&self.columns);
        }
        out.keyword(Keyword::As).node(self.select.as_ref());
    }
}

/// When a trigger fires relative to its event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerTiming {
    Before,
    After,
    InsteadOf,
}

/// The event a trigger fires on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    Delete,
    Insert,
    /// `UPDATE [OF columns]`
    Update { columns: Vec<String> },
}

/// A CREATE TRIGGER statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTriggerStatement {
    /// Whether TEMP or TEMPORARY was specified.
    pub temporary: bool,
    /// Whether IF NOT EXISTS was specified.
    pub if_not_exists: bool,
    /// Schema name.
    pub schema: Option<String>,
    /// Trigger name.
    pub name: String,
    pub timing: Option<TriggerTiming>,
    pub event: TriggerEvent,
    /// Table the trigger is attached to.
    pub table: String,
    /// Whether FOR EACH ROW was specified.
    pub for_each_row: bool,
    /// WHEN condition.
    pub when: Option<Expr>,
    /// Body statements: INSERT, UPDATE, DELETE or SELECT, at least one.
    pub body: Vec<Statement>,
}

impl CreateTriggerStatement {
    fn parse_step(ctx: &mut ParserContext) -> Result<Statement> {
        match ctx.current().as_keyword() {
            Some(Keyword::Insert | Keyword::Replace) => Ok(Statement::Insert(ctx.parse()?)),
            Some(Keyword::Update) => Ok(Statement::Update(ctx.parse()?)),
            Some(Keyword::Delete) => Ok(Statement::Delete(ctx.parse()?)),
            Some(Keyword::Select) => Ok(Statement::Select(ctx.parse()?)),
            Some(Keyword::With) => Err(ctx.unsupported("common table expression")),
            _ => Err(ctx.unexpected(&["INSERT", "REPLACE", "UPDATE", "DELETE", "SELECT"])),
        }
    }
}

impl Node for CreateTriggerStatement {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        let (temporary, if_not_exists) = create_prefix(ctx, Keyword::Trigger)?;
        let (schema, name) = ctx.qualified_name()?;

        let timing = if ctx.try_consume(Keyword::Before) {
            Some(TriggerTiming::Before)
        } else if ctx.try_consume(Keyword::After) {
            Some(TriggerTiming::After)
        } else if ctx.try_consume(Keyword::Instead) {
            ctx.consume(Keyword::Of)?;
            Some(TriggerTiming::InsteadOf)
        } else {
            None
        };

        let event = match ctx.current().as_keyword() {
            Some(Keyword::Delete) => {
                ctx.advance();
                TriggerEvent::Delete
            }
            Some(Keyword::Insert) => {
                ctx.advance();
                TriggerEvent::Insert
            }
            Some(Keyword::Update) => {
                ctx.advance();
                let columns = if ctx.try_consume(Keyword::Of) {
                    ctx.parse_list(Operator::Comma, ParserContext::consume_identifier)?
                } else {
                    Vec::new()
                };
                TriggerEvent::Update { columns }
            }
            _ => return Err(ctx.unexpected(&["DELETE", "INSERT", "UPDATE"])),
        };

        ctx.consume(Keyword::On)?;
        let table = ctx.consume_identifier()?;
        let for_each_row = ctx.try_consume_all(&[
            Keyword::For.into(),
            Keyword::Each.into(),
            Keyword::Row.into(),
        ]);
        let when = if ctx.try_consume(Keyword::When) {
            Some(ctx.parse()?)
        } else {
            None
        };

        ctx.consume(Keyword::Begin)?;
        let mut body = Vec::new();
        loop {
            body.push(ctx.nested(Self::parse_step)?);
            ctx.consume(Operator::Semicolon)?;
            if ctx.try_consume(Keyword::End) {
                break;
            }
        }

        Ok(Self {
            temporary,
            if_not_exists,
            schema,
            name,
            timing,
            event,
            table,
            for_each_row,
            when,
            body,
        })
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        write_create_prefix(out, self.temporary, Keyword::Trigger, self.if_not_exists);
        out.qualified_name(self.schema.as_deref(), &self.name);
        match self.timing {
            Some(TriggerTiming::Before) => out.keyword(Keyword::Before),
            Some(TriggerTiming::After) => out.keyword(Keyword::After),
            Some(TriggerTiming::InsteadOf) => out.keywords(&[Keyword::Instead, Keyword::Of]),
            None => out,
        };
        match &self.event {
            TriggerEvent::Delete => {
                out.keyword(Keyword::Delete);
            }
            TriggerEvent::Insert => {
                out.keyword(Keyword::Insert);
            }
            TriggerEvent::Update { columns } => {
                out.keyword(Keyword::Update);
                if !columns.is_empty() {
                    out.keyword(Keyword::Of).identifiers(columns);
                }
            }
        }
        out.keyword(Keyword::On).identifier(&self.table);
        if self.for_each_row {
            out.keywords(&[Keyword::For, Keyword::Each, Keyword::Row]);
        }
        if let Some(when) = &self.when {
            out.keyword(Keyword::When).node(when);
        }
        out.keyword(Keyword::Begin);
        for step in &self.body {
            out.node(step).semicolon();
        }
        out.keyword(Keyword::End);
    }
}

/// Object kind of a DROP statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    Table,
    Index,
    View,
    Trigger,
}

impl DropKind {
    /// Returns the keyword naming the object kind.
    #[must_use]
    pub const fn keyword(self) -> Keyword {
        match self {
            Self::Table => Keyword::Table,
            Self::Index => Keyword::Index,
            Self::View => Keyword::View,
            Self::Trigger => Keyword::Trigger,
        }
    }
}

/// `DROP {TABLE | INDEX | VIEW | TRIGGER} [IF EXISTS] [schema .] name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropStatement {
    pub kind: DropKind,
    /// Whether IF EXISTS was specified.
    pub if_exists: bool,
    /// Schema name.
    pub schema: Option<String>,
    /// Object name.
    pub name: String,
}

impl Node for DropStatement {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        ctx.consume(Keyword::Drop)?;
        let kind = match ctx.current().as_keyword() {
            Some(Keyword::Table) => DropKind::Table,
            Some(Keyword::Index) => DropKind::Index,
            Some(Keyword::View) => DropKind::View,
            Some(Keyword::Trigger) => DropKind::Trigger,
            _ => return Err(ctx.unexpected(&["TABLE", "INDEX", "VIEW", "TRIGGER"])),
        };
        ctx.advance();
        let if_exists = ctx.try_consume_all(&[Keyword::If.into(), Keyword::Exists.into()]);
        let (schema, name) = ctx.qualified_name()?;
        Ok(Self {
            kind,
            if_exists,
            schema,
            name,
        })
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        out.keywords(&[Keyword::Drop, self.kind.keyword()]);
        if self.if_exists {
            out.keywords(&[Keyword::If, Keyword::Exists]);
        }
        out.qualified_name(self.schema.as_deref(), &self.name);
    }
}

/// The change made by an ALTER TABLE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterTableAction {
    /// `RENAME TO name`
    RenameTo { name: String },
    /// `ADD [COLUMN] column-def`
    AddColumn(ColumnDefinition),
}

/// An ALTER TABLE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterTableStatement {
    /// Schema name.
    pub schema: Option<String>,
    /// Table name.
    pub table: String,
    pub action: AlterTableAction,
}

impl Node for AlterTableStatement {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        ctx.consume_all(&[Keyword::Alter.into(), Keyword::Table.into()])?;
        let (schema, table) = ctx.qualified_name()?;

        let action = match ctx.current().as_keyword() {
            Some(Keyword::Rename) => {
                ctx.consume_all(&[Keyword::Rename.into(), Keyword::To.into()])?;
                AlterTableAction::RenameTo {
                    name: ctx.consume_identifier()?,
                }
            }
            Some(Keyword::Add) => {
                ctx.advance();
                ctx.try_consume(Keyword::Column);
                AlterTableAction::AddColumn(ctx.parse()?)
            }
            _ => return Err(ctx.unexpected(&["RENAME", "ADD"])),
        };

        Ok(Self {
            schema,
            table,
            action,
        })
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        out.keywords(&[Keyword::Alter, Keyword::Table])
            .qualified_name(self.schema.as_deref(), &self.table);
        match &self.action {
            AlterTableAction::RenameTo { name } => {
                out.keywords(&[Keyword::Rename, Keyword::To]).identifier(name);
            }
            AlterTableAction::AddColumn(column) => {
                out.keywords(&[Keyword::Add, Keyword::Column]).node(column);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ColumnConstraintKind, TableConstraintKind, TypeDefinition};
    use crate::parser::Parser;

    fn parse<T: Node>(sql: &str) -> T {
        Parser::new(sql).parse_rule().unwrap()
    }

    #[test]
    fn test_create_table_with_constraints() {
        let sql = "CREATE TABLE IF NOT EXISTS main.users (id INTEGER PRIMARY KEY, \
                   email TEXT NOT NULL UNIQUE, org INTEGER, \
                   CONSTRAINT fk FOREIGN KEY (org) REFERENCES orgs (id), CHECK (id > 0)) \
                   WITHOUT ROWID";
        let create: CreateTableStatement = parse(sql);
        assert!(create.if_not_exists);
        assert_eq!(create.schema.as_deref(), Some("main"));
        assert_eq!(create.columns().len(), 3);
        let CreateTableBody::Columns {
            constraints,
            without_rowid,
            ..
        } = &create.body
        else {
            panic!("expected column body");
        };
        assert!(*without_rowid);
        assert_eq!(constraints.len(), 2);
        assert!(matches!(
            constraints[1].kind,
            TableConstraintKind::Check(_)
        ));
        assert_eq!(create.to_string(), sql);
    }

    #[test]
    fn test_create_temp_table_as_select() {
        let create: CreateTableStatement = parse("create temporary table t as select 1");
        assert!(create.temporary);
        assert_eq!(create.to_string(), "CREATE TEMP TABLE t AS SELECT 1");
    }

    #[test]
    fn test_without_requires_rowid() {
        let err = Parser::new("CREATE TABLE t (a) WITHOUT x")
            .parse_rule::<CreateTableStatement>()
            .unwrap_err();
        assert_eq!(err.expected(), ["ROWID"]);
    }

    #[test]
    fn test_create_index() {
        let sql = "CREATE UNIQUE INDEX IF NOT EXISTS ix ON t (a, b DESC) WHERE a IS NOT NULL";
        let index: CreateIndexStatement = parse(sql);
        assert!(index.unique);
        assert_eq!(index.columns.len(), 2);
        assert_eq!(index.to_string(), sql);
    }

    #[test]
    fn test_create_view() {
        let sql = "CREATE VIEW v (a, b) AS SELECT x, y FROM t";
        let view: CreateViewStatement = parse(sql);
        assert_eq!(view.columns, ["a", "b"]);
        assert_eq!(view.to_string(), sql);
    }

    #[test]
    fn test_create_trigger() {
        let sql = "CREATE TRIGGER trg AFTER UPDATE OF a, b ON t FOR EACH ROW WHEN new.a > 0 \
                   BEGIN INSERT INTO log VALUES (new.a); DELETE FROM t WHERE a < 0; END";
        let trigger: CreateTriggerStatement = parse(sql);
        assert_eq!(trigger.timing, Some(TriggerTiming::After));
        assert_eq!(
            trigger.event,
            TriggerEvent::Update {
                columns: vec![String::from("a"), String::from("b")]
            }
        );
        assert_eq!(trigger.body.len(), 2);
        assert_eq!(trigger.to_string(), sql);
    }

    #[test]
    fn test_trigger_body_rejects_ddl() {
        let err = Parser::new("CREATE TRIGGER x DELETE ON t BEGIN DROP TABLE t; END")
            .parse_rule::<CreateTriggerStatement>()
            .unwrap_err();
        assert_eq!(
            err.expected(),
            ["INSERT", "REPLACE", "UPDATE", "DELETE", "SELECT"]
        );
    }

    #[test]
    fn test_drop_kinds() {
        for (sql, kind) in [
            ("DROP TABLE t", DropKind::Table),
            ("DROP INDEX IF EXISTS s.i", DropKind::Index),
            ("DROP VIEW v", DropKind::View),
            ("DROP TRIGGER trg", DropKind::Trigger),
        ] {
            let drop: DropStatement = parse(sql);
            assert_eq!(drop.kind, kind);
            assert_eq!(drop.to_string(), sql);
        }
    }

    #[test]
    fn test_alter_table_rename() {
        let alter: AlterTableStatement = parse("ALTER TABLE t RENAME TO u");
        assert_eq!(alter.table, "t");
        assert_eq!(
            alter.action,
            AlterTableAction::RenameTo {
                name: String::from("u")
            }
        );
        assert_eq!(alter.to_string(), "ALTER TABLE t RENAME TO u");
    }

    #[test]
    fn test_alter_table_add_column() {
        let alter: AlterTableStatement = parse("ALTER TABLE s.t ADD c INTEGER DEFAULT 0");
        assert_eq!(alter.schema.as_deref(), Some("s"));
        let AlterTableAction::AddColumn(column) = &alter.action else {
            panic!("expected add column");
        };
        assert_eq!(column.name, "c");
        assert_eq!(column.data_type, Some(TypeDefinition::new("INTEGER")));
        assert!(matches!(
            column.constraints[0].kind,
            ColumnConstraintKind::Default(_)
        ));
        assert_eq!(
            alter.to_string(),
            "ALTER TABLE s.t ADD COLUMN c INTEGER DEFAULT 0"
        );
    }

    #[test]
    fn test_alter_table_commits_after_keyword() {
        let err = Parser::new("ALTER TABLE t DROP COLUMN c")
            .parse_rule::<AlterTableStatement>()
            .unwrap_err();
        assert_eq!(err.expected(), ["RENAME", "ADD"]);
        assert_eq!(err.span().start, 14);

        let err = Parser::new("ALTER TABLE t RENAME c")
            .parse_rule::<AlterTableStatement>()
            .unwrap_err();
        assert_eq!(err.expected(), ["TO"]);
    }
}
