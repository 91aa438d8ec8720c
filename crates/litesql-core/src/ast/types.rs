//! Column definitions, type names and constraints.

use super::{Expr, Literal, Node, OrderDirection};
use crate::builder::SqlBuilder;
use crate::error::Result;
use crate::lexer::{Keyword, Operator, TokenKind};
use crate::parser::ParserContext;

/// A number with an optional explicit sign, kept as written (`-1`, `+2.5`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedNumber(pub String);

impl SignedNumber {
    /// Returns the literal text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if a signed number starts at the cursor.
    fn starts_at(ctx: &ParserContext) -> bool {
        matches!(ctx.current_kind(), TokenKind::Number(_))
            || ((ctx.current_is(Operator::Plus) || ctx.current_is(Operator::Minus))
                && matches!(ctx.peek(1).kind, TokenKind::Number(_)))
    }
}

impl From<&str> for SignedNumber {
    fn from(text: &str) -> Self {
        Self(String::from(text))
    }
}

impl Node for SignedNumber {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        let sign = if ctx.try_consume(Operator::Minus) {
            "-"
        } else if ctx.try_consume(Operator::Plus) {
            "+"
        } else {
            ""
        };
        match ctx.current_kind() {
            TokenKind::Number(text) => {
                let number = format!("{sign}{text}");
                ctx.advance();
                Ok(Self(number))
            }
            _ => Err(ctx.unexpected(&["number"])),
        }
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        out.raw(&self.0);
    }
}

/// A column type: `NAME [(length [, scale])]`.
///
/// Only the first word of a multi-word type name is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefinition {
    /// Type name as written.
    pub name: String,
    /// Length or precision.
    pub length: Option<SignedNumber>,
    /// Scale; only present with a length.
    pub scale: Option<SignedNumber>,
}

impl TypeDefinition {
    /// Creates a type without arguments.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            length: None,
            scale: None,
        }
    }

    /// Sets the length argument.
    #[must_use]
    pub fn with_length(mut self, length: impl Into<SignedNumber>) -> Self {
        self.length = Some(length.into());
        self
    }

    /// Sets the scale argument.
    #[must_use]
    pub fn with_scale(mut self, scale: impl Into<SignedNumber>) -> Self {
        self.scale = Some(scale.into());
        self
    }
}

impl Node for TypeDefinition {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        let name = ctx.consume_identifier()?;
        while ctx.opt_identifier().is_some() {}

        let mut length = None;
        let mut scale = None;
        if ctx.try_consume(Operator::LeftParen) {
            length = Some(ctx.parse()?);
            if ctx.try_consume(Operator::Comma) {
                scale = Some(ctx.parse()?);
            }
            ctx.consume(Operator::RightParen)?;
        }

        Ok(Self {
            name,
            length,
            scale,
        })
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        out.identifier(&self.name);
        if let Some(length) = &self.length {
            out.call_paren().node(length);
            if let Some(scale) = &self.scale {
                out.comma().node(scale);
            }
            out.close_paren();
        }
    }
}

/// Conflict resolution algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictResolution {
    Rollback,
    Abort,
    Fail,
    Ignore,
    Replace,
}

impl ConflictResolution {
    /// Returns the resolution a keyword names.
    #[must_use]
    pub const fn from_keyword(keyword: Keyword) -> Option<Self> {
        match keyword {
            Keyword::Rollback => Some(Self::Rollback),
            Keyword::Abort => Some(Self::Abort),
            Keyword::Fail => Some(Self::Fail),
            Keyword::Ignore => Some(Self::Ignore),
            Keyword::Replace => Some(Self::Replace),
            _ => None,
        }
    }

    /// Returns the keyword naming this resolution.
    #[must_use]
    pub const fn keyword(self) -> Keyword {
        match self {
            Self::Rollback => Keyword::Rollback,
            Self::Abort => Keyword::Abort,
            Self::Fail => Keyword::Fail,
            Self::Ignore => Keyword::Ignore,
            Self::Replace => Keyword::Replace,
        }
    }

    /// Parses one of the resolution keywords.
    pub(crate) fn parse_keyword(ctx: &mut ParserContext) -> Result<Self> {
        match ctx.current().as_keyword().and_then(Self::from_keyword) {
            Some(resolution) => {
                ctx.advance();
                Ok(resolution)
            }
            None => Err(ctx.unexpected(&["ROLLBACK", "ABORT", "FAIL", "IGNORE", "REPLACE"])),
        }
    }
}

/// `ON CONFLICT resolution`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictClause(pub ConflictResolution);

impl ConflictClause {
    /// Parses the clause if `ON CONFLICT` is next.
    pub(crate) fn parse_opt(ctx: &mut ParserContext) -> Result<Option<Self>> {
        if ctx.current_is(Keyword::On) && ctx.next_is(Keyword::Conflict) {
            Ok(Some(ctx.parse()?))
        } else {
            Ok(None)
        }
    }
}

impl Node for ConflictClause {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        ctx.consume_all(&[Keyword::On.into(), Keyword::Conflict.into()])?;
        Ok(Self(ConflictResolution::parse_keyword(ctx)?))
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        out.keywords(&[Keyword::On, Keyword::Conflict, self.0.keyword()]);
    }
}

/// Action taken on a referenced row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyAction {
    SetNull,
    SetDefault,
    Cascade,
    Restrict,
    NoAction,
}

impl ForeignKeyAction {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        if ctx.try_consume(Keyword::Set) {
            if ctx.try_consume(Keyword::Null) {
                return Ok(Self::SetNull);
            }
            ctx.consume(Keyword::Default)?;
            return Ok(Self::SetDefault);
        }
        if ctx.try_consume(Keyword::Cascade) {
            return Ok(Self::Cascade);
        }
        if ctx.try_consume(Keyword::Restrict) {
            return Ok(Self::Restrict);
        }
        if ctx.try_consume_all(&[Keyword::No.into(), Keyword::Action.into()]) {
            return Ok(Self::NoAction);
        }
        Err(ctx.unexpected(&["SET", "CASCADE", "RESTRICT", "NO ACTION"]))
    }

    const fn keywords(self) -> &'static [Keyword] {
        match self {
            Self::SetNull => &[Keyword::Set, Keyword::Null],
            Self::SetDefault => &[Keyword::Set, Keyword::Default],
            Self::Cascade => &[Keyword::Cascade],
            Self::Restrict => &[Keyword::Restrict],
            Self::NoAction => &[Keyword::No, Keyword::Action],
        }
    }
}

/// One `ON DELETE`, `ON UPDATE` or `MATCH` rule of a foreign key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForeignKeyRule {
    OnDelete(ForeignKeyAction),
    OnUpdate(ForeignKeyAction),
    Match(String),
}

/// `INITIALLY DEFERRED` or `INITIALLY IMMEDIATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initially {
    Deferred,
    Immediate,
}

/// `[NOT] DEFERRABLE [INITIALLY ...]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deferrable {
    /// Whether NOT was specified.
    pub not: bool,
    pub initially: Option<Initially>,
}

impl Deferrable {
    fn starts_at(ctx: &ParserContext) -> bool {
        ctx.current_is(Keyword::Deferrable)
            || (ctx.current_is(Keyword::Not) && ctx.next_is(Keyword::Deferrable))
    }

    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        let not = ctx.try_consume(Keyword::Not);
        ctx.consume(Keyword::Deferrable)?;
        let initially = if ctx.try_consume(Keyword::Initially) {
            if ctx.try_consume(Keyword::Deferred) {
                Some(Initially::Deferred)
            } else {
                ctx.consume(Keyword::Immediate)?;
                Some(Initially::Immediate)
            }
        } else {
            None
        };
        Ok(Self { not, initially })
    }

    fn to_sql(self, out: &mut SqlBuilder<'_>) {
        if self.not {
            out.keyword(Keyword::Not);
        }
        out.keyword(Keyword::Deferrable);
        match self.initially {
            Some(Initially::Deferred) => out.keywords(&[Keyword::Initially, Keyword::Deferred]),
            Some(Initially::Immediate) => out.keywords(&[Keyword::Initially, Keyword::Immediate]),
            None => out,
        };
    }
}

/// `REFERENCES table [(columns)] rules* [deferrable]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyClause {
    /// Referenced table.
    pub table: String,
    /// Referenced columns; empty means the primary key.
    pub columns: Vec<String>,
    pub rules: Vec<ForeignKeyRule>,
    pub deferrable: Option<Deferrable>,
}

impl ForeignKeyClause {
    /// Creates a reference to `table`'s primary key.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            rules: Vec::new(),
            deferrable: None,
        }
    }

    /// Adds referenced columns.
    #[must_use]
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Adds an `ON DELETE` action.
    #[must_use]
    pub fn on_delete(mut self, action: ForeignKeyAction) -> Self {
        self.rules.push(ForeignKeyRule::OnDelete(action));
        self
    }

    /// Adds an `ON UPDATE` action.
    #[must_use]
    pub fn on_update(mut self, action: ForeignKeyAction) -> Self {
        self.rules.push(ForeignKeyRule::OnUpdate(action));
        self
    }
}

impl Node for ForeignKeyClause {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        ctx.consume(Keyword::References)?;
        let table = ctx.consume_identifier()?;
        let columns = if ctx.current_is(Operator::LeftParen) {
            ctx.identifier_list()?
        } else {
            Vec::new()
        };

        let mut rules = Vec::new();
        loop {
            if ctx.try_consume_all(&[Keyword::On.into(), Keyword::Delete.into()]) {
                rules.push(ForeignKeyRule::OnDelete(ForeignKeyAction::parse(ctx)?));
            } else if ctx.try_consume_all(&[Keyword::On.into(), Keyword::Update.into()]) {
                rules.push(ForeignKeyRule::OnUpdate(ForeignKeyAction::parse(ctx)?));
            } else if ctx.try_consume(Keyword::Match) {
                rules.push(ForeignKeyRule::Match(ctx.consume_identifier()?));
            } else {
                break;
            }
        }

        let deferrable = if Deferrable::starts_at(ctx) {
            Some(Deferrable::parse(ctx)?)
        } else {
            None
        };

        Ok(Self {
            table,
            columns,
            rules,
            deferrable,
        })
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        out.keyword(Keyword::References).identifier(&self.table);
        if !self.columns.is_empty() {
            out.paren_identifiers(&self.columns);
        }
        for rule in &self.rules {
            match rule {
                ForeignKeyRule::OnDelete(action) => out
                    .keywords(&[Keyword::On, Keyword::Delete])
                    .keywords(action.keywords()),
                ForeignKeyRule::OnUpdate(action) => out
                    .keywords(&[Keyword::On, Keyword::Update])
                    .keywords(action.keywords()),
                ForeignKeyRule::Match(name) => out.keyword(Keyword::Match).identifier(name),
            };
        }
        if let Some(deferrable) = self.deferrable {
            deferrable.to_sql(out);
        }
    }
}

/// Parses an optional `ASC` or `DESC`.
pub(crate) fn parse_direction(ctx: &mut ParserContext) -> Option<OrderDirection> {
    if ctx.try_consume(Keyword::Asc) {
        Some(OrderDirection::Asc)
    } else if ctx.try_consume(Keyword::Desc) {
        Some(OrderDirection::Desc)
    } else {
        None
    }
}

/// A column of an index or key: `name [COLLATE collation] [ASC|DESC]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedColumn {
    pub name: String,
    pub collation: Option<String>,
    pub order: Option<OrderDirection>,
}

impl IndexedColumn {
    /// Creates an indexed column with no collation or order.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collation: None,
            order: None,
        }
    }
}

impl Node for IndexedColumn {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        let name = ctx.consume_identifier()?;
        let collation = if ctx.try_consume(Keyword::Collate) {
            Some(ctx.consume_identifier()?)
        } else {
            None
        };
        let order = parse_direction(ctx);
        Ok(Self {
            name,
            collation,
            order,
        })
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        out.identifier(&self.name);
        if let Some(collation) = &self.collation {
            out.keyword(Keyword::Collate).identifier(collation);
        }
        if let Some(order) = self.order {
            out.keyword(order.keyword());
        }
    }
}

/// Value of a `DEFAULT` column constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// `DEFAULT -1`.
    Signed(SignedNumber),
    /// `DEFAULT 'text'`, `DEFAULT NULL`, `DEFAULT CURRENT_TIMESTAMP`.
    Literal(Literal),
    /// `DEFAULT (expr)`.
    Expr(Expr),
}

/// Kinds of column constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnConstraintKind {
    PrimaryKey {
        order: Option<OrderDirection>,
        on_conflict: Option<ConflictClause>,
        autoincrement: bool,
    },
    NotNull {
        on_conflict: Option<ConflictClause>,
    },
    Unique {
        on_conflict: Option<ConflictClause>,
    },
    Check(Expr),
    Default(DefaultValue),
    Collate(String),
    ForeignKey(ForeignKeyClause),
}

/// A column constraint with its optional `CONSTRAINT name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnConstraint {
    pub name: Option<String>,
    pub kind: ColumnConstraintKind,
}

impl ColumnConstraint {
    /// Returns true if a column constraint starts at the cursor.
    fn starts_at(ctx: &ParserContext) -> bool {
        matches!(
            ctx.current_kind(),
            TokenKind::Keyword(
                Keyword::Constraint
                    | Keyword::Primary
                    | Keyword::Not
                    | Keyword::Unique
                    | Keyword::Check
                    | Keyword::Default
                    | Keyword::Collate
                    | Keyword::References
            )
        )
    }
}

impl From<ColumnConstraintKind> for ColumnConstraint {
    fn from(kind: ColumnConstraintKind) -> Self {
        Self { name: None, kind }
    }
}

impl Node for ColumnConstraint {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        let name = if ctx.try_consume(Keyword::Constraint) {
            Some(ctx.consume_identifier()?)
        } else {
            None
        };

        let kind = match ctx.current().as_keyword() {
            Some(Keyword::Primary) => {
                ctx.consume_all(&[Keyword::Primary.into(), Keyword::Key.into()])?;
                let order = parse_direction(ctx);
                let on_conflict = ConflictClause::parse_opt(ctx)?;
                let autoincrement = ctx.try_consume(Keyword::Autoincrement);
                ColumnConstraintKind::PrimaryKey {
                    order,
                    on_conflict,
                    autoincrement,
                }
            }
            Some(Keyword::Not) => {
                ctx.consume_all(&[Keyword::Not.into(), Keyword::Null.into()])?;
                ColumnConstraintKind::NotNull {
                    on_conflict: ConflictClause::parse_opt(ctx)?,
                }
            }
            Some(Keyword::Unique) => {
                ctx.advance();
                ColumnConstraintKind::Unique {
                    on_conflict: ConflictClause::parse_opt(ctx)?,
                }
            }
            Some(Keyword::Check) => {
                ctx.advance();
                ColumnConstraintKind::Check(ctx.parenthesized(ParserContext::parse::<Expr>)?)
            }
            Some(Keyword::Default) => {
                ctx.advance();
                let value = if SignedNumber::starts_at(ctx) {
                    DefaultValue::Signed(ctx.parse()?)
                } else if ctx.current_is(Operator::LeftParen) {
                    DefaultValue::Expr(ctx.parenthesized(ParserContext::parse::<Expr>)?)
                } else {
                    DefaultValue::Literal(ctx.parse()?)
                };
                ColumnConstraintKind::Default(value)
            }
            Some(Keyword::Collate) => {
                ctx.advance();
                ColumnConstraintKind::Collate(ctx.consume_identifier()?)
            }
            Some(Keyword::References) => ColumnConstraintKind::ForeignKey(ctx.parse()?),
            _ => {
                return Err(ctx.unexpected(&[
                    "PRIMARY",
                    "NOT",
                    "UNIQUE",
                    "CHECK",
                    "DEFAULT",
                    "COLLATE",
                    "REFERENCES",
                ]))
            }
        };

        Ok(Self { name, kind })
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        if let Some(name) = &self.name {
            out.keyword(Keyword::Constraint).identifier(name);
        }
        match &self.kind {
            ColumnConstraintKind::PrimaryKey {
                order,
                on_conflict,
                autoincrement,
            } => {
                out.keywords(&[Keyword::Primary, Keyword::Key]);
                if let Some(order) = order {
                    out.keyword(order.keyword());
                }
                if let Some(clause) = on_conflict {
                    out.node(clause);
                }
                if *autoincrement {
                    out.keyword(Keyword::Autoincrement);
                }
            }
            ColumnConstraintKind::NotNull { on_conflict } => {
                out.keywords(&[Keyword::Not, Keyword::Null]);
                if let Some(clause) = on_conflict {
                    out.node(clause);
                }
            }
            ColumnConstraintKind::Unique { on_conflict } => {
                out.keyword(Keyword::Unique);
                if let Some(clause) = on_conflict {
                    out.node(clause);
                }
            }
            ColumnConstraintKind::Check(expr) => {
                out.keyword(Keyword::Check).open_paren().node(expr).close_paren();
            }
            ColumnConstraintKind::Default(value) => {
                out.keyword(Keyword::Default);
                match value {
                    DefaultValue::Signed(number) => out.node(number),
                    DefaultValue::Literal(literal) => out.node(literal),
                    DefaultValue::Expr(expr) => out.open_paren().node(expr).close_paren(),
                };
            }
            ColumnConstraintKind::Collate(collation) => {
                out.keyword(Keyword::Collate).identifier(collation);
            }
            ColumnConstraintKind::ForeignKey(clause) => {
                out.node(clause);
            }
        }
    }
}

/// A column definition: `name [type] constraint*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Declared type; SQLite columns may omit it.
    pub data_type: Option<TypeDefinition>,
    /// Constraints in source order.
    pub constraints: Vec<ColumnConstraint>,
}

impl ColumnDefinition {
    /// Creates a new column definition.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: TypeDefinition) -> Self {
        Self {
            name: name.into(),
            data_type: Some(data_type),
            constraints: Vec::new(),
        }
    }

    /// Appends a constraint.
    #[must_use]
    pub fn constraint(mut self, kind: ColumnConstraintKind) -> Self {
        self.constraints.push(kind.into());
        self
    }

    /// Sets the column as NOT NULL.
    #[must_use]
    pub fn not_null(self) -> Self {
        self.constraint(ColumnConstraintKind::NotNull { on_conflict: None })
    }

    /// Sets the column as PRIMARY KEY.
    #[must_use]
    pub fn primary_key(self) -> Self {
        self.constraint(ColumnConstraintKind::PrimaryKey {
            order: None,
            on_conflict: None,
            autoincrement: false,
        })
    }

    /// Sets the column as UNIQUE.
    #[must_use]
    pub fn unique(self) -> Self {
        self.constraint(ColumnConstraintKind::Unique { on_conflict: None })
    }

    /// Sets a default value expression.
    #[must_use]
    pub fn default_expr(self, expr: Expr) -> Self {
        self.constraint(ColumnConstraintKind::Default(DefaultValue::Expr(expr)))
    }

    /// Returns true if the column has a NOT NULL or PRIMARY KEY constraint.
    #[must_use]
    pub fn is_not_null(&self) -> bool {
        self.constraints.iter().any(|c| {
            matches!(
                c.kind,
                ColumnConstraintKind::NotNull { .. } | ColumnConstraintKind::PrimaryKey { .. }
            )
        })
    }
}

impl Node for ColumnDefinition {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        let name = ctx.consume_identifier()?;
        let data_type = if ctx.current_is_identifier() {
            Some(ctx.parse()?)
        } else {
            None
        };
        let mut constraints = Vec::new();
        while ColumnConstraint::starts_at(ctx) {
            constraints.push(ctx.parse()?);
        }
        Ok(Self {
            name,
            data_type,
            constraints,
        })
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        out.identifier(&self.name);
        if let Some(data_type) = &self.data_type {
            out.node(data_type);
        }
        for constraint in &self.constraints {
            out.node(constraint);
        }
    }
}

/// Key kind of a table-level index constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    PrimaryKey,
    Unique,
}

/// Kinds of table constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableConstraintKind {
    /// `PRIMARY KEY (...)` or `UNIQUE (...)`.
    Index {
        kind: IndexKind,
        columns: Vec<IndexedColumn>,
        on_conflict: Option<ConflictClause>,
    },
    /// `CHECK (expr)`.
    Check(Expr),
    /// `FOREIGN KEY (columns) REFERENCES ...`.
    ForeignKey {
        columns: Vec<String>,
        clause: ForeignKeyClause,
    },
}

/// A table constraint with its optional `CONSTRAINT name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConstraint {
    pub name: Option<String>,
    pub kind: TableConstraintKind,
}

impl TableConstraint {
    /// Returns true if a table constraint starts at the cursor.
    pub(crate) fn starts_at(ctx: &ParserContext) -> bool {
        matches!(
            ctx.current_kind(),
            TokenKind::Keyword(
                Keyword::Constraint
                    | Keyword::Primary
                    | Keyword::Unique
                    | Keyword::Check
                    | Keyword::Foreign
            )
        )
    }

    /// Creates an unnamed `PRIMARY KEY (columns)` constraint.
    #[must_use]
    pub fn primary_key<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            kind: TableConstraintKind::Index {
                kind: IndexKind::PrimaryKey,
                columns: columns.into_iter().map(IndexedColumn::new).collect(),
                on_conflict: None,
            },
        }
    }
}

impl Node for TableConstraint {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        let name = if ctx.try_consume(Keyword::Constraint) {
            Some(ctx.consume_identifier()?)
        } else {
            None
        };

        let kind = match ctx.current().as_keyword() {
            Some(keyword @ (Keyword::Primary | Keyword::Unique)) => {
                let kind = if keyword == Keyword::Primary {
                    ctx.consume_all(&[Keyword::Primary.into(), Keyword::Key.into()])?;
                    IndexKind::PrimaryKey
                } else {
                    ctx.advance();
                    IndexKind::Unique
                };
                let columns = ctx.parenthesized(|ctx| {
                    ctx.parse_list(Operator::Comma, ParserContext::parse::<IndexedColumn>)
                })?;
                let on_conflict = ConflictClause::parse_opt(ctx)?;
                TableConstraintKind::Index {
                    kind,
                    columns,
                    on_conflict,
                }
            }
            Some(Keyword::Check) => {
                ctx.advance();
                TableConstraintKind::Check(ctx.parenthesized(ParserContext::parse::<Expr>)?)
            }
            Some(Keyword::Foreign) => {
                ctx.consume_all(&[Keyword::Foreign.into(), Keyword::Key.into()])?;
                let columns = ctx.identifier_list()?;
                let clause = ctx.parse()?;
                TableConstraintKind::ForeignKey { columns, clause }
            }
            _ => return Err(ctx.unexpected(&["PRIMARY", "UNIQUE", "CHECK", "FOREIGN"])),
        };

        Ok(Self { name, kind })
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        if let Some(name) = &self.name {
            out.keyword(Keyword::Constraint).identifier(name);
        }
        match &self.kind {
            TableConstraintKind::Index {
                kind,
                columns,
                on_conflict,
            } => {
                match kind {
                    IndexKind::PrimaryKey => out.keywords(&[Keyword::Primary, Keyword::Key]),
                    IndexKind::Unique => out.keyword(Keyword::Unique),
                };
                out.paren_list(columns);
                if let Some(clause) = on_conflict {
                    out.node(clause);
                }
            }
            TableConstraintKind::Check(expr) => {
                out.keyword(Keyword::Check).open_paren().node(expr).close_paren();
            }
            TableConstraintKind::ForeignKey { columns, clause } => {
                out.keywords(&[Keyword::Foreign, Keyword::Key])
                    .paren_identifiers(columns)
                    .node(clause);
            }
        }
    }
}
