//! SELECT statement and its clauses.

use super::types::parse_direction;
use super::{Expr, Node};
use crate::builder::SqlBuilder;
use crate::error::Result;
use crate::lexer::{Keyword, Operator, TokenKind};
use crate::parser::ParserContext;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl OrderDirection {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.keyword().as_str()
    }

    /// Returns the keyword for this direction.
    #[must_use]
    pub const fn keyword(&self) -> Keyword {
        match self {
            Self::Asc => Keyword::Asc,
            Self::Desc => Keyword::Desc,
        }
    }
}

/// An ORDER BY term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingTerm {
    /// The expression to order by.
    pub expr: Expr,
    /// Explicit direction, if written.
    pub direction: Option<OrderDirection>,
}

impl OrderingTerm {
    /// Creates an ascending ordering term.
    #[must_use]
    pub const fn asc(expr: Expr) -> Self {
        Self {
            expr,
            direction: Some(OrderDirection::Asc),
        }
    }

    /// Creates a descending ordering term.
    #[must_use]
    pub const fn desc(expr: Expr) -> Self {
        Self {
            expr,
            direction: Some(OrderDirection::Desc),
        }
    }
}

impl Node for OrderingTerm {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        let expr = ctx.parse()?;
        let direction = parse_direction(ctx);
        Ok(Self { expr, direction })
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        out.node(&self.expr);
        if let Some(direction) = self.direction {
            out.keyword(direction.keyword());
        }
    }
}

/// `LIMIT limit [OFFSET offset]`.
///
/// `LIMIT a, b` is parsed as offset `a` and limit `b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limit {
    pub limit: Expr,
    pub offset: Option<Expr>,
}

/// A column in a SELECT list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultColumn {
    /// `*`
    All,
    /// `table.*`
    TableAll(String),
    /// `expr [AS alias]`
    Expr {
        /// The expression.
        expr: Expr,
        /// Optional alias.
        alias: Option<String>,
    },
}

impl ResultColumn {
    /// Creates a result column without an alias.
    #[must_use]
    pub const fn expr(expr: Expr) -> Self {
        Self::Expr { expr, alias: None }
    }

    /// Creates an aliased result column.
    #[must_use]
    pub fn aliased(expr: Expr, alias: impl Into<String>) -> Self {
        Self::Expr {
            expr,
            alias: Some(alias.into()),
        }
    }
}

impl Node for ResultColumn {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        if ctx.try_consume(Operator::Star) {
            return Ok(Self::All);
        }
        if ctx.current_is_identifier()
            && ctx.next_is(Operator::Dot)
            && matches!(ctx.peek(2).kind, TokenKind::Operator(Operator::Star))
        {
            let table = ctx.consume_identifier()?;
            ctx.consume_all(&[Operator::Dot.into(), Operator::Star.into()])?;
            return Ok(Self::TableAll(table));
        }

        let expr = ctx.parse()?;
        let alias = if ctx.try_consume(Keyword::As) {
            Some(ctx.consume_identifier()?)
        } else {
            ctx.opt_identifier()
        };
        Ok(Self::Expr { expr, alias })
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        match self {
            Self::All => {
                out.raw("*");
            }
            Self::TableAll(table) => {
                out.identifier(table).dot().raw("*");
            }
            Self::Expr { expr, alias } => {
                out.node(expr);
                if let Some(alias) = alias {
                    out.keyword(Keyword::As).identifier(alias);
                }
            }
        }
    }
}

/// `INDEXED BY name` or `NOT INDEXED`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexHint {
    IndexedBy(String),
    NotIndexed,
}

/// A named table in a FROM clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSource {
    /// Schema name.
    pub schema: Option<String>,
    /// Table name.
    pub table: String,
    /// Optional alias.
    pub alias: Option<String>,
    /// Optional index hint.
    pub index_hint: Option<IndexHint>,
}

impl TableSource {
    /// Creates a table source with no schema, alias or hint.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            schema: None,
            table: table.into(),
            alias: None,
            index_hint: None,
        }
    }

    /// Sets the alias.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

impl Node for TableSource {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        if ctx.current_is(Operator::LeftParen) {
            return Err(ctx.unsupported("sub-query table source"));
        }
        let (schema, table) = ctx.qualified_name()?;
        let alias = if ctx.try_consume(Keyword::As) {
            Some(ctx.consume_identifier()?)
        } else {
            ctx.opt_identifier()
        };
        let index_hint = if ctx.try_consume_all(&[Keyword::Indexed.into(), Keyword::By.into()]) {
            Some(IndexHint::IndexedBy(ctx.consume_identifier()?))
        } else if ctx.try_consume_all(&[Keyword::Not.into(), Keyword::Indexed.into()]) {
            Some(IndexHint::NotIndexed)
        } else {
            None
        };
        Ok(Self {
            schema,
            table,
            alias,
            index_hint,
        })
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        out.qualified_name(self.schema.as_deref(), &self.table);
        if let Some(alias) = &self.alias {
            out.keyword(Keyword::As).identifier(alias);
        }
        match &self.index_hint {
            Some(IndexHint::IndexedBy(index)) => {
                out.keywords(&[Keyword::Indexed, Keyword::By]).identifier(index);
            }
            Some(IndexHint::NotIndexed) => {
                out.keywords(&[Keyword::Not, Keyword::Indexed]);
            }
            None => {}
        }
    }
}

/// A join between sources. Joins are not supported, so no value of this
/// type can exist; its grammar rule only recognizes and rejects them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinClause {}

impl JoinClause {
    /// Returns true if the current token starts or continues a join.
    pub(crate) fn starts_at(ctx: &ParserContext) -> bool {
        matches!(
            ctx.current_kind(),
            TokenKind::Keyword(
                Keyword::Join
                    | Keyword::Inner
                    | Keyword::Left
                    | Keyword::Outer
                    | Keyword::Cross
                    | Keyword::Natural
                    | Keyword::On
                    | Keyword::Using
            )
        )
    }
}

impl Node for JoinClause {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        if Self::starts_at(ctx)
            || ctx.current_is_identifier()
            || ctx.current_is(Operator::LeftParen)
        {
            Err(ctx.unsupported("JOIN clause"))
        } else {
            Err(ctx.unexpected(&["JOIN"]))
        }
    }

    fn to_sql(&self, _out: &mut SqlBuilder<'_>) {
        match *self {}
    }
}

/// An entry of a FROM clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectSource {
    Table(TableSource),
    Join(JoinClause),
}

impl Node for SelectSource {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        fn table(ctx: &mut ParserContext) -> Result<SelectSource> {
            Ok(SelectSource::Table(ctx.parse()?))
        }
        fn join(ctx: &mut ParserContext) -> Result<SelectSource> {
            Ok(SelectSource::Join(ctx.parse()?))
        }
        ctx.alternatives(&[table, join])
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        match self {
            Self::Table(table) => {
                out.node(table);
            }
            Self::Join(join) => match *join {},
        }
    }
}

impl From<TableSource> for SelectSource {
    fn from(table: TableSource) -> Self {
        Self::Table(table)
    }
}

/// A SELECT statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStatement {
    /// Whether DISTINCT was specified.
    pub distinct: bool,
    /// Result columns, at least one.
    pub columns: Vec<ResultColumn>,
    /// FROM sources; empty without a FROM clause.
    pub from: Vec<SelectSource>,
    /// WHERE clause.
    pub where_clause: Option<Expr>,
    /// GROUP BY expressions.
    pub group_by: Vec<Expr>,
    /// HAVING clause; only with GROUP BY.
    pub having: Option<Expr>,
    /// ORDER BY terms.
    pub order_by: Vec<OrderingTerm>,
    /// LIMIT clause.
    pub limit: Option<Limit>,
}

impl SelectStatement {
    /// Creates `SELECT columns` with no other clauses.
    #[must_use]
    pub const fn new(columns: Vec<ResultColumn>) -> Self {
        Self {
            distinct: false,
            columns,
            from: Vec::new(),
            where_clause: None,
            group_by: Vec::new(),
            having: None,
            order_by: Vec::new(),
            limit: None,
        }
    }

    fn reject_compound(ctx: &ParserContext) -> Result<()> {
        if ctx.current_is(Keyword::Union)
            || ctx.current_is(Keyword::Intersect)
            || ctx.current_is(Keyword::Except)
        {
            Err(ctx.unsupported("compound SELECT"))
        } else {
            Ok(())
        }
    }
}

impl Node for SelectStatement {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        if ctx.current_is(Keyword::With) {
            return Err(ctx.unsupported("common table expression"));
        }
        ctx.consume(Keyword::Select)?;

        let distinct = if ctx.try_consume(Keyword::Distinct) {
            true
        } else {
            ctx.try_consume(Keyword::All);
            false
        };
        let columns = ctx.parse_list(Operator::Comma, ParserContext::parse::<ResultColumn>)?;

        let mut from = Vec::new();
        if ctx.try_consume(Keyword::From) {
            from = ctx.parse_list(Operator::Comma, ParserContext::parse::<SelectSource>)?;
            if JoinClause::starts_at(ctx) {
                return Err(ctx.unsupported("JOIN clause"));
            }
        }

        let where_clause = if ctx.try_consume(Keyword::Where) {
            Some(ctx.parse()?)
        } else {
            None
        };

        let mut group_by = Vec::new();
        let mut having = None;
        if ctx.try_consume_all(&[Keyword::Group.into(), Keyword::By.into()]) {
            group_by = ctx.parse_list(Operator::Comma, ParserContext::parse::<Expr>)?;
            if ctx.try_consume(Keyword::Having) {
                having = Some(ctx.parse()?);
            }
        }
        Self::reject_compound(ctx)?;

        let mut order_by = Vec::new();
        if ctx.try_consume_all(&[Keyword::Order.into(), Keyword::By.into()]) {
            order_by = ctx.parse_list(Operator::Comma, ParserContext::parse::<OrderingTerm>)?;
        }

        let limit = if ctx.try_consume(Keyword::Limit) {
            let first: Expr = ctx.parse()?;
            if ctx.try_consume(Keyword::Offset) {
                Some(Limit {
                    limit: first,
                    offset: Some(ctx.parse()?),
                })
            } else if ctx.try_consume(Operator::Comma) {
                Some(Limit {
                    limit: ctx.parse()?,
                    offset: Some(first),
                })
            } else {
                Some(Limit {
                    limit: first,
                    offset: None,
                })
            }
        } else {
            None
        };
        Self::reject_compound(ctx)?;

        Ok(Self {
            distinct,
            columns,
            from,
            where_clause,
            group_by,
            having,
            order_by,
            limit,
        })
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        out.keyword(Keyword::Select);
        if self.distinct {
            out.keyword(Keyword::Distinct);
        }
        out.list(&self.columns);

        if !self.from.is_empty() {
            out.keyword(Keyword::From).list(&self.from);
        }
        if let Some(expr) = &self.where_clause {
            out.keyword(Keyword::Where).node(expr);
        }
        if !self.group_by.is_empty() {
            out.keywords(&[Keyword::Group, Keyword::By]).list(&self.group_by);
            if let Some(having) = &self.having {
                out.keyword(Keyword::Having).node(having);
            }
        }
        if !self.order_by.is_empty() {
            out.keywords(&[Keyword::Order, Keyword::By]).list(&self.order_by);
        }
        if let Some(limit) = &self.limit {
            out.keyword(Keyword::Limit).node(&limit.limit);
            if let Some(offset) = &limit.offset {
                out.keyword(Keyword::Offset).node(offset);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use crate::parser::Parser;

    fn parse(sql: &str) -> SelectStatement {
        Parser::new(sql).parse_rule().unwrap()
    }

    fn unsupported(sql: &str) -> &'static str {
        match Parser::new(sql).parse_rule::<SelectStatement>() {
            Err(ParseError::Unsupported { construct, .. }) => construct,
            other => panic!("expected unsupported construct, got {other:?}"),
        }
    }

    #[test]
    fn test_simple_select() {
        let select = parse("SELECT id, name FROM users");
        assert_eq!(select.columns.len(), 2);
        assert_eq!(
            select.from,
            [SelectSource::Table(TableSource::new("users"))]
        );
        assert_eq!(select.to_string(), "SELECT id, name FROM users");
    }

    #[test]
    fn test_select_all_clauses() {
        let sql = "SELECT DISTINCT t.*, count(*) AS n FROM main.t AS x INDEXED BY ix \
                   WHERE a > 1 GROUP BY a HAVING n > 2 ORDER BY a DESC, b LIMIT 10 OFFSET 5";
        let select = parse(sql);
        assert!(select.distinct);
        assert_eq!(select.columns[0], ResultColumn::TableAll(String::from("t")));
        assert_eq!(select.to_string(), sql);
    }

    #[test]
    fn test_alias_without_as() {
        let select = parse("SELECT a b FROM t u");
        assert_eq!(select.to_string(), "SELECT a AS b FROM t AS u");
    }

    #[test]
    fn test_limit_comma_form_is_offset_first() {
        let select = parse("SELECT a FROM t LIMIT 5, 10");
        let limit = select.limit.unwrap();
        assert_eq!(limit.limit, Expr::integer(10));
        assert_eq!(limit.offset, Some(Expr::integer(5)));
    }

    #[test]
    fn test_select_all_keyword() {
        assert_eq!(parse("SELECT ALL a").to_string(), "SELECT a");
    }

    #[test]
    fn test_not_indexed() {
        assert_eq!(
            parse("SELECT * FROM t NOT INDEXED").to_string(),
            "SELECT * FROM t NOT INDEXED"
        );
    }

    #[test]
    fn test_unsupported_constructs() {
        assert_eq!(
            unsupported("WITH x AS (SELECT 1) SELECT * FROM x"),
            "common table expression"
        );
        assert_eq!(unsupported("SELECT * FROM a JOIN b"), "JOIN clause");
        assert_eq!(unsupported("SELECT * FROM a LEFT OUTER JOIN b ON 1"), "JOIN clause");
        assert_eq!(
            unsupported("SELECT * FROM (SELECT 1)"),
            "sub-query table source"
        );
        assert_eq!(unsupported("SELECT 1 UNION SELECT 2"), "compound SELECT");
        assert_eq!(
            unsupported("SELECT a FROM t ORDER BY a EXCEPT SELECT 1"),
            "compound SELECT"
        );
    }

    #[test]
    fn test_missing_source_merges_expected() {
        let err = Parser::new("SELECT a FROM WHERE")
            .parse_rule::<SelectStatement>()
            .unwrap_err();
        assert_eq!(err.expected(), ["identifier", "JOIN"]);
    }
}
