//! Tests for the INSERT and SELECT builders.

mod common;
use common::*;

use litesql_core::ast::{ConflictResolution, Expr, OrderingTerm, ResultColumn, Statement};
use litesql_core::builder::{InsertBuilder, SelectBuilder, SqlValue};

#[test]
fn insert_builder_output_parses_back() {
    let (statement, params) = InsertBuilder::new()
        .into_table("users")
        .columns(&["id", "name", "score"])
        .value(7_i64)
        .value("Bob")
        .value(1.5_f64)
        .build();

    let sql = statement.to_string();
    assert_eq!(sql, "INSERT INTO users (id, name, score) VALUES (?, ?, ?)");
    assert_eq!(parse(&sql), Statement::Insert(statement));
    assert_eq!(
        params,
        [
            SqlValue::Int(7),
            SqlValue::Text(String::from("Bob")),
            SqlValue::Float(1.5),
        ]
    );
}

#[test]
fn insert_builder_value_at() {
    let (sql, params) = InsertBuilder::new()
        .into_table("t")
        .columns(&["a", "b", "c"])
        .value_at(1, "middle")
        .value_at(2, Some(3_i32))
        .build_sql();
    assert_eq!(sql, "INSERT INTO t (a, b, c) VALUES (?, ?, ?)");
    assert_eq!(
        params,
        [
            SqlValue::Null,
            SqlValue::Text(String::from("middle")),
            SqlValue::Int(3),
        ]
    );
}

#[test]
fn insert_builder_conflict_resolution() {
    let (sql, params) = InsertBuilder::new()
        .into_table("kv")
        .or(ConflictResolution::Ignore)
        .value(vec![1_u8, 2, 3])
        .build_sql();
    assert_eq!(sql, "INSERT OR IGNORE INTO kv VALUES (?)");
    assert_eq!(params, [SqlValue::Blob(vec![1, 2, 3])]);
    round_trip(&sql);
}

#[test]
fn inline_values_parse_as_literals() {
    for value in [
        SqlValue::Null,
        SqlValue::Int(-12),
        SqlValue::Float(0.25),
        SqlValue::Text(String::from("O'Brien")),
        SqlValue::Blob(vec![0xDE, 0xAD]),
    ] {
        let sql = format!("SELECT {}", value.to_sql_inline());
        let select = parse_select(&sql);
        assert_eq!(select.columns, [ResultColumn::expr(value.to_expr())], "{sql}");
    }
}

#[test]
fn select_builder_output_parses_back() {
    let statement = SelectBuilder::new()
        .columns(&["id", "email"])
        .distinct()
        .from("users")
        .where_clause(Expr::column("age").gt_eq(Expr::integer(21)))
        .and_where(Expr::column("email").like(Expr::string("%@example.com")))
        .order_by(OrderingTerm::asc(Expr::column("id")))
        .limit(50)
        .build();

    let sql = statement.to_string();
    assert_eq!(
        sql,
        "SELECT DISTINCT id, email FROM users WHERE age >= 21 AND email LIKE '%@example.com' \
         ORDER BY id ASC LIMIT 50"
    );
    assert_eq!(parse(&sql), Statement::Select(statement));
}

#[test]
fn select_builder_group_by() {
    let sql = SelectBuilder::new()
        .result_columns(vec![
            ResultColumn::expr(Expr::column("kind")),
            ResultColumn::aliased(Expr::count_star(), "total"),
        ])
        .from("events")
        .group_by([Expr::column("kind")])
        .having(Expr::count_star().gt(Expr::integer(1)))
        .build_sql();
    assert_eq!(
        sql,
        "SELECT kind, count(*) AS total FROM events GROUP BY kind HAVING count(*) > 1"
    );
    round_trip(&sql);
}
