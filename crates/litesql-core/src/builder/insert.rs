//! INSERT statement builder using the typestate pattern.
//!
//! The builder is the mutable side of an INSERT: values are collected one
//! at a time and [`InsertBuilder::build`] produces an immutable
//! [`InsertStatement`] with one `?` placeholder per value.

use std::marker::PhantomData;

use super::value::{SqlValue, ToSqlValue};
use crate::ast::{ConflictResolution, Expr, InsertSource, InsertStatement, InsertVerb};

// Typestate markers

/// Marker: No table specified yet.
pub struct NoTable;
/// Marker: Table has been specified.
pub struct HasTable;
/// Marker: No values specified yet.
pub struct NoValues;
/// Marker: Values have been specified.
pub struct HasValues;

/// Builds a single-row INSERT whose values are bound by position.
///
/// # Example
///
/// ```rust
/// use litesql_core::builder::{InsertBuilder, SqlValue};
///
/// let (sql, params) = InsertBuilder::new()
///     .into_table("users")
///     .columns(&["name", "email"])
///     .value("Alice")
///     .value("alice@example.com")
///     .build_sql();
///
/// assert_eq!(sql, "INSERT INTO users (name, email) VALUES (?, ?)");
/// assert_eq!(params[0], SqlValue::Text(String::from("Alice")));
/// ```
pub struct InsertBuilder<Table, Values> {
    verb: InsertVerb,
    schema: Option<String>,
    table: String,
    columns: Vec<String>,
    values: Vec<SqlValue>,
    _state: PhantomData<(Table, Values)>,
}

impl InsertBuilder<NoTable, NoValues> {
    /// Creates a new INSERT builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            verb: InsertVerb::Insert,
            schema: None,
            table: String::new(),
            columns: vec![],
            values: vec![],
            _state: PhantomData,
        }
    }
}

impl Default for InsertBuilder<NoTable, NoValues> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Table, Values> InsertBuilder<Table, Values> {
    fn into_state<T, V>(self) -> InsertBuilder<T, V> {
        InsertBuilder {
            verb: self.verb,
            schema: self.schema,
            table: self.table,
            columns: self.columns,
            values: self.values,
            _state: PhantomData,
        }
    }

    /// Writes `INSERT OR resolution` instead of `INSERT`.
    #[must_use]
    pub fn or(mut self, resolution: ConflictResolution) -> Self {
        self.verb = InsertVerb::InsertOr(resolution);
        self
    }

    /// Writes `REPLACE` instead of `INSERT`.
    #[must_use]
    pub fn replace(mut self) -> Self {
        self.verb = InsertVerb::Replace;
        self
    }

    /// Stores `value` at `index`, padding any gap with NULL.
    fn set(&mut self, index: usize, value: SqlValue) {
        if index >= self.values.len() {
            self.values.resize(index + 1, SqlValue::Null);
        }
        self.values[index] = value;
    }
}

// Transition: NoTable -> HasTable
impl<Values> InsertBuilder<NoTable, Values> {
    /// Specifies the table to insert into.
    #[must_use]
    pub fn into_table(mut self, table: &str) -> InsertBuilder<HasTable, Values> {
        self.table = String::from(table);
        self.into_state()
    }
}

// Methods available after specifying table
impl<Values> InsertBuilder<HasTable, Values> {
    /// Qualifies the table with a schema name.
    #[must_use]
    pub fn schema(mut self, schema: &str) -> Self {
        self.schema = Some(String::from(schema));
        self
    }

    /// Specifies the columns to insert into.
    #[must_use]
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = cols.iter().map(|s| String::from(*s)).collect();
        self
    }
}

// Transition: NoValues -> HasValues
impl<Table> InsertBuilder<Table, NoValues> {
    /// Appends the first value.
    #[must_use]
    pub fn value<T: ToSqlValue>(mut self, value: T) -> InsertBuilder<Table, HasValues> {
        self.values.push(value.to_sql_value());
        self.into_state()
    }

    /// Sets the value at `index`; earlier positions are NULL.
    #[must_use]
    pub fn value_at<T: ToSqlValue>(
        mut self,
        index: usize,
        value: T,
    ) -> InsertBuilder<Table, HasValues> {
        self.set(index, value.to_sql_value());
        self.into_state()
    }
}

// Methods available after adding values
impl<Table> InsertBuilder<Table, HasValues> {
    /// Appends a value.
    #[must_use]
    pub fn value<T: ToSqlValue>(mut self, value: T) -> Self {
        self.values.push(value.to_sql_value());
        self
    }

    /// Sets or replaces the value at `index`, padding any gap with NULL.
    #[must_use]
    pub fn value_at<T: ToSqlValue>(mut self, index: usize, value: T) -> Self {
        self.set(index, value.to_sql_value());
        self
    }
}

impl InsertBuilder<HasTable, HasValues> {
    /// Builds the INSERT statement and returns it with its parameters.
    ///
    /// The single VALUES row holds one `?` per value, in value order.
    #[must_use]
    pub fn build(self) -> (InsertStatement, Vec<SqlValue>) {
        let row = self.values.iter().map(|_| Expr::placeholder()).collect();
        let statement = InsertStatement {
            verb: self.verb,
            schema: self.schema,
            table: self.table,
            columns: self.columns,
            source: InsertSource::Values(vec![row]),
        };
        (statement, self.values)
    }

    /// Builds the INSERT statement and returns SQL with parameters.
    #[must_use]
    pub fn build_sql(self) -> (String, Vec<SqlValue>) {
        let (statement, params) = self.build();
        (statement.to_string(), params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_insert() {
        let (sql, params) = InsertBuilder::new()
            .into_table("users")
            .columns(&["name", "email"])
            .value("Alice")
            .value("alice@example.com")
            .build_sql();

        assert_eq!(sql, "INSERT INTO users (name, email) VALUES (?, ?)");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_insert_without_columns() {
        let (sql, params) = InsertBuilder::new()
            .into_table("users")
            .value(1_i64)
            .build_sql();

        assert_eq!(sql, "INSERT INTO users VALUES (?)");
        assert_eq!(params, [SqlValue::Int(1)]);
    }

    #[test]
    fn test_value_at_pads_with_null() {
        let (statement, params) = InsertBuilder::new()
            .into_table("t")
            .value_at(2, "c")
            .value_at(0, 10_i32)
            .build();

        assert_eq!(
            params,
            [
                SqlValue::Int(10),
                SqlValue::Null,
                SqlValue::Text(String::from("c")),
            ]
        );
        let InsertSource::Values(rows) = &statement.source else {
            panic!("expected VALUES");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 3);
    }

    #[test]
    fn test_values_can_precede_table() {
        let (sql, _) = InsertBuilder::new()
            .value(true)
            .into_table("flags")
            .schema("main")
            .or(ConflictResolution::Replace)
            .build_sql();
        assert_eq!(sql, "INSERT OR REPLACE INTO main.flags VALUES (?)");
    }

    #[test]
    fn test_replace_verb_and_quoting() {
        let (sql, _) = InsertBuilder::new()
            .into_table("order")
            .columns(&["group"])
            .replace()
            .value(None::<i32>)
            .build_sql();
        assert_eq!(sql, "REPLACE INTO \"order\" (\"group\") VALUES (?)");
    }

    #[test]
    fn test_insert_sql_injection_prevention() {
        let malicious = "'; DROP TABLE users; --";
        let (sql, params) = InsertBuilder::new()
            .into_table("users")
            .columns(&["name"])
            .value(malicious)
            .build_sql();

        assert_eq!(sql, "INSERT INTO users (name) VALUES (?)");
        assert!(matches!(&params[0], SqlValue::Text(s) if s == malicious));
    }
}
