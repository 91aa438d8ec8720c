//! Tests for INSERT, UPDATE and DELETE parsing.

mod common;
use common::*;

use litesql_core::ast::{
    Assignment, ConflictResolution, Expr, InsertSource, InsertVerb,
};

#[test]
fn insert_values_rows() {
    let insert = parse_insert("INSERT INTO users (id, name) VALUES (1, 'a'), (2, 'b')");
    assert_eq!(insert.verb, InsertVerb::Insert);
    assert_eq!(insert.table, "users");
    assert_eq!(insert.columns, ["id", "name"]);
    let InsertSource::Values(rows) = &insert.source else {
        panic!("expected VALUES");
    };
    assert_eq!(
        rows,
        &[
            vec![Expr::integer(1), Expr::string("a")],
            vec![Expr::integer(2), Expr::string("b")],
        ]
    );
}

#[test]
fn insert_verbs() {
    assert_eq!(parse_insert("REPLACE INTO t VALUES (1)").verb, InsertVerb::Replace);
    for (sql, resolution) in [
        ("INSERT OR ROLLBACK INTO t VALUES (1)", ConflictResolution::Rollback),
        ("INSERT OR ABORT INTO t VALUES (1)", ConflictResolution::Abort),
        ("INSERT OR FAIL INTO t VALUES (1)", ConflictResolution::Fail),
        ("INSERT OR IGNORE INTO t VALUES (1)", ConflictResolution::Ignore),
        ("INSERT OR REPLACE INTO t VALUES (1)", ConflictResolution::Replace),
    ] {
        let insert = parse_insert(sql);
        assert_eq!(insert.verb, InsertVerb::InsertOr(resolution));
        assert_eq!(insert.to_string(), sql);
    }
}

#[test]
fn insert_default_values_and_select() {
    let insert = parse_insert("INSERT INTO main.t DEFAULT VALUES");
    assert_eq!(insert.schema.as_deref(), Some("main"));
    assert_eq!(insert.source, InsertSource::DefaultValues);

    let insert = parse_insert("INSERT INTO t (a) SELECT b FROM u WHERE b > 0");
    assert!(matches!(insert.source, InsertSource::Select(_)));
    assert_eq!(
        insert.to_string(),
        "INSERT INTO t (a) SELECT b FROM u WHERE b > 0"
    );
}

#[test]
fn insert_requires_a_source() {
    let err = parse_err("INSERT INTO t (a)");
    assert_eq!(err.expected(), ["VALUES", "SELECT", "DEFAULT"]);
}

#[test]
fn update_with_assignments() {
    let update = parse_update("UPDATE OR IGNORE t SET a = 1, b = b + 1 WHERE id = ?");
    assert_eq!(update.or_conflict, Some(ConflictResolution::Ignore));
    assert_eq!(
        update.assignments,
        [
            Assignment::new("a", Expr::integer(1)),
            Assignment::new(
                "b",
                Expr::column("b").binary(litesql_core::ast::BinaryOp::Add, Expr::integer(1))
            ),
        ]
    );
    assert_eq!(
        update.where_clause,
        Some(Expr::column("id").eq(Expr::placeholder()))
    );
}

#[test]
fn update_requires_set() {
    let err = parse_err("UPDATE t a = 1");
    assert_eq!(err.expected(), ["SET"]);
}

#[test]
fn delete_forms() {
    let delete = parse_delete("DELETE FROM t");
    assert_eq!(delete.table, "t");
    assert_eq!(delete.where_clause, None);

    let delete = parse_delete("delete from s.t where a is null");
    assert_eq!(delete.schema.as_deref(), Some("s"));
    assert_eq!(delete.where_clause, Some(Expr::column("a").is_null()));
    assert_eq!(delete.to_string(), "DELETE FROM s.t WHERE a IS NULL");
}

#[test]
fn dml_round_trips() {
    for sql in [
        "INSERT INTO t VALUES (1, -2.5, 'x''y', X'00FF', NULL)",
        "INSERT INTO \"order\" (\"group\") VALUES (:name)",
        "REPLACE INTO t (a, b) SELECT * FROM u",
        "UPDATE t SET a = CASE WHEN b THEN 1 ELSE 0 END",
        "UPDATE OR FAIL main.t SET a = NULL WHERE a NOT IN (SELECT b FROM u)",
        "DELETE FROM t WHERE a LIKE 'x%' ESCAPE '\\' AND b GLOB 'y*'",
    ] {
        round_trip(sql);
    }
}
