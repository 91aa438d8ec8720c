//! SELECT statement builder using the typestate pattern.
//!
//! Invalid SQL constructs are caught at compile time: a statement can only
//! be built once it has result columns, and WHERE can only follow FROM.

use std::marker::PhantomData;

use crate::ast::{
    Expr, Limit, OrderingTerm, ResultColumn, SelectSource, SelectStatement, TableSource,
};

// Typestate markers (zero-sized types)

/// Marker: No columns specified yet.
pub struct NoColumns;
/// Marker: Columns have been specified.
pub struct HasColumns;
/// Marker: No FROM clause specified yet.
pub struct NoFrom;
/// Marker: FROM clause has been specified.
pub struct HasFrom;

/// Builds a [`SelectStatement`] clause by clause.
///
/// Uses the typestate pattern to ensure that:
/// - `build()` is only available once columns are specified
/// - `where_clause()` is only available after FROM is specified
///
/// # Example
///
/// ```rust
/// use litesql_core::ast::Expr;
/// use litesql_core::builder::SelectBuilder;
///
/// let sql = SelectBuilder::new()
///     .columns(&["id", "name"])
///     .from("users")
///     .where_clause(Expr::column("active").eq(Expr::integer(1)))
///     .build_sql();
///
/// assert_eq!(sql, "SELECT id, name FROM users WHERE active = 1");
/// ```
pub struct SelectBuilder<Cols, From> {
    statement: SelectStatement,
    limit: Option<u64>,
    offset: Option<u64>,
    _state: PhantomData<(Cols, From)>,
}

impl SelectBuilder<NoColumns, NoFrom> {
    /// Creates a new SELECT builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            statement: SelectStatement::new(Vec::new()),
            limit: None,
            offset: None,
            _state: PhantomData,
        }
    }
}

impl Default for SelectBuilder<NoColumns, NoFrom> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Cols, From> SelectBuilder<Cols, From> {
    fn into_state<C, F>(self) -> SelectBuilder<C, F> {
        SelectBuilder {
            statement: self.statement,
            limit: self.limit,
            offset: self.offset,
            _state: PhantomData,
        }
    }

    /// Adds GROUP BY expressions.
    #[must_use]
    pub fn group_by(mut self, exprs: impl IntoIterator<Item = Expr>) -> Self {
        self.statement.group_by.extend(exprs);
        self
    }

    /// Sets the HAVING condition. It is only emitted with a GROUP BY.
    #[must_use]
    pub fn having(mut self, condition: Expr) -> Self {
        self.statement.having = Some(condition);
        self
    }

    /// Adds an ORDER BY term.
    #[must_use]
    pub fn order_by(mut self, term: OrderingTerm) -> Self {
        self.statement.order_by.push(term);
        self
    }

    /// Sets the LIMIT.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets the OFFSET. Without a limit, `LIMIT -1` is emitted.
    #[must_use]
    pub const fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }
}

// Transition: NoColumns -> HasColumns
impl<From> SelectBuilder<NoColumns, From> {
    /// Selects columns by name; `"*"` selects all columns.
    #[must_use]
    pub fn columns(self, cols: &[&str]) -> SelectBuilder<HasColumns, From> {
        let columns = cols
            .iter()
            .map(|col| match *col {
                "*" => ResultColumn::All,
                name => ResultColumn::expr(Expr::column(name)),
            })
            .collect();
        self.result_columns(columns)
    }

    /// Selects all columns (`SELECT *`).
    #[must_use]
    pub fn all(self) -> SelectBuilder<HasColumns, From> {
        self.result_columns(vec![ResultColumn::All])
    }

    /// Selects arbitrary result columns.
    #[must_use]
    pub fn result_columns(mut self, columns: Vec<ResultColumn>) -> SelectBuilder<HasColumns, From> {
        self.statement.columns = columns;
        self.into_state()
    }
}

impl<From> SelectBuilder<HasColumns, From> {
    /// Adds DISTINCT.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.statement.distinct = true;
        self
    }

    /// Builds the SELECT statement.
    #[must_use]
    pub fn build(self) -> SelectStatement {
        let mut statement = self.statement;
        statement.limit = match (self.limit, self.offset) {
            (None, None) => None,
            (limit, offset) => Some(Limit {
                limit: limit.map_or_else(|| Expr::integer(-1), count),
                offset: offset.map(count),
            }),
        };
        statement
    }

    /// Builds the SELECT statement and returns its SQL.
    #[must_use]
    pub fn build_sql(self) -> String {
        self.build().to_string()
    }
}

// Transition: NoFrom -> HasFrom
impl<Cols> SelectBuilder<Cols, NoFrom> {
    /// Specifies the table to select from.
    #[must_use]
    pub fn from(self, table: &str) -> SelectBuilder<Cols, HasFrom> {
        self.from_source(TableSource::new(table))
    }

    /// Specifies the FROM source.
    #[must_use]
    pub fn from_source(mut self, source: impl Into<SelectSource>) -> SelectBuilder<Cols, HasFrom> {
        self.statement.from.push(source.into());
        self.into_state()
    }
}

impl<Cols> SelectBuilder<Cols, HasFrom> {
    /// Sets the WHERE condition, replacing any previous one.
    #[must_use]
    pub fn where_clause(mut self, condition: Expr) -> Self {
        self.statement.where_clause = Some(condition);
        self
    }

    /// Combines `condition` with the current WHERE condition using AND.
    #[must_use]
    pub fn and_where(mut self, condition: Expr) -> Self {
        self.statement.where_clause = Some(match self.statement.where_clause.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }
}

fn count(n: u64) -> Expr {
    Expr::integer(i64::try_from(n).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_select() {
        let sql = SelectBuilder::new()
            .columns(&["id", "name"])
            .from("users")
            .build_sql();
        assert_eq!(sql, "SELECT id, name FROM users");
    }

    #[test]
    fn test_select_without_from() {
        let sql = SelectBuilder::new()
            .result_columns(vec![ResultColumn::expr(Expr::integer(1))])
            .build_sql();
        assert_eq!(sql, "SELECT 1");
    }

    #[test]
    fn test_select_star_and_distinct() {
        let sql = SelectBuilder::new().all().distinct().from("t").build_sql();
        assert_eq!(sql, "SELECT DISTINCT * FROM t");

        let sql = SelectBuilder::new().columns(&["*"]).from("t").build_sql();
        assert_eq!(sql, "SELECT * FROM t");
    }

    #[test]
    fn test_and_where_combines_conditions() {
        let sql = SelectBuilder::new()
            .all()
            .from("users")
            .and_where(Expr::column("active").eq(Expr::integer(1)))
            .and_where(Expr::column("age").gt(Expr::integer(18)))
            .build_sql();
        assert_eq!(sql, "SELECT * FROM users WHERE active = 1 AND age > 18");
    }

    #[test]
    fn test_select_with_all_clauses() {
        let sql = SelectBuilder::new()
            .result_columns(vec![
                ResultColumn::expr(Expr::column("status")),
                ResultColumn::aliased(Expr::count_star(), "n"),
            ])
            .from_source(TableSource::new("orders").alias("o"))
            .where_clause(Expr::column("total").gt(Expr::integer(100)))
            .group_by([Expr::column("status")])
            .having(Expr::count_star().gt(Expr::integer(5)))
            .order_by(OrderingTerm::desc(Expr::column("n")))
            .limit(10)
            .offset(20)
            .build_sql();
        assert_eq!(
            sql,
            "SELECT status, count(*) AS n FROM orders AS o WHERE total > 100 \
             GROUP BY status HAVING count(*) > 5 ORDER BY n DESC LIMIT 10 OFFSET 20"
        );
    }

    #[test]
    fn test_offset_without_limit() {
        let statement = SelectBuilder::new().all().from("t").offset(5).build();
        let limit = statement.limit.as_ref().map(|l| l.limit.to_string());
        assert_eq!(limit.as_deref(), Some("-1"));
        assert_eq!(statement.to_string(), "SELECT * FROM t LIMIT -1 OFFSET 5");
    }

    #[test]
    fn test_reserved_identifiers_are_quoted() {
        let sql = SelectBuilder::new()
            .columns(&["select"])
            .from("order")
            .build_sql();
        assert_eq!(sql, "SELECT \"select\" FROM \"order\"");
    }
}
