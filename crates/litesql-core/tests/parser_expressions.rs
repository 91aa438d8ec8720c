//! Tests for expression parsing, precedence and emission.

mod common;
use common::*;

use litesql_core::ast::{BinaryOp, Expr, Literal, UnaryOp};

fn expr(sql: &str) -> Expr {
    parse_rule(sql)
}

fn emit(sql: &str) -> String {
    expr(sql).to_string()
}

#[test]
fn literals() {
    assert_eq!(expr("42"), Expr::integer(42));
    assert_eq!(expr("'it''s'"), Expr::string("it's"));
    assert_eq!(expr("NULL"), Expr::null());
    assert_eq!(expr("X'CAFE'"), Expr::Literal(Literal::Blob(vec![0xCA, 0xFE])));
    assert_eq!(emit("1.5e3"), "1.5e3");
    assert_eq!(emit("0x1F"), "0x1F");
    assert_eq!(emit("'it''s'"), "'it''s'");
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(
        expr("a + b * c"),
        Expr::column("a").binary(
            BinaryOp::Add,
            Expr::column("b").binary(BinaryOp::Mul, Expr::column("c"))
        )
    );
}

#[test]
fn binary_operators_are_left_associative() {
    assert_eq!(
        expr("a - b - c"),
        Expr::column("a")
            .binary(BinaryOp::Sub, Expr::column("b"))
            .binary(BinaryOp::Sub, Expr::column("c"))
    );
    assert_eq!(emit("a - b - c"), "a - b - c");
}

#[test]
fn and_binds_tighter_than_or() {
    assert_eq!(
        expr("a OR b AND c"),
        Expr::column("a").or(Expr::column("b").and(Expr::column("c")))
    );
}

#[test]
fn unary_operators() {
    assert!(matches!(
        expr("-a"),
        Expr::Unary {
            op: UnaryOp::Neg,
            ..
        }
    ));
    assert!(matches!(
        expr("~a"),
        Expr::Unary {
            op: UnaryOp::BitNot,
            ..
        }
    ));
    assert_eq!(expr("NOT a"), Expr::column("a").not());
}

#[test]
fn concatenation_and_bitwise_operators() {
    assert_eq!(emit("a||b"), "a || b");
    assert_eq!(emit("a<<2|b&c"), "a << 2 | b & c");
    assert_eq!(emit("a%b"), "a % b");
}

#[test]
fn comparison_spellings() {
    assert_eq!(emit("a == b"), "a = b");
    assert_eq!(emit("a <> b"), "a != b");
    assert_eq!(emit("a<=b"), "a <= b");
}

#[test]
fn like_family() {
    assert_eq!(
        expr("name LIKE 'a%'"),
        Expr::column("name").like(Expr::string("a%"))
    );
    assert_eq!(emit("a NOT GLOB 'x'"), "a NOT GLOB 'x'");
    assert_eq!(emit("a MATCH 'x'"), "a MATCH 'x'");
    assert_eq!(emit("a REGEXP 'x'"), "a REGEXP 'x'");
}

#[test]
fn between_and_in() {
    assert_eq!(
        expr("a BETWEEN 1 AND 5"),
        Expr::column("a").between(Expr::integer(1), Expr::integer(5))
    );
    assert_eq!(
        expr("a IN (1, 2)"),
        Expr::column("a").in_list(vec![Expr::integer(1), Expr::integer(2)])
    );
    assert_eq!(
        expr("a NOT IN (1)"),
        Expr::column("a").not_in_list(vec![Expr::integer(1)])
    );
}

#[test]
fn functions() {
    assert_eq!(
        expr("coalesce(a, 0)"),
        Expr::function("coalesce", vec![Expr::column("a"), Expr::integer(0)])
    );
    assert_eq!(expr("count(*)"), Expr::count_star());
    assert_eq!(emit("sum(DISTINCT price)"), "sum(DISTINCT price)");
    assert_eq!(emit("like(a, b)"), "like(a, b)");
}

#[test]
fn programmatic_trees_emit_parentheses() {
    let tree = Expr::column("a")
        .or(Expr::column("b"))
        .and(Expr::column("c"));
    let sql = tree.to_string();
    assert_eq!(sql, "(a OR b) AND c");
    assert_eq!(expr(&sql).to_string(), sql);

    let tree = Expr::column("a").binary(
        BinaryOp::Div,
        Expr::column("b").binary(BinaryOp::Mul, Expr::column("c")),
    );
    assert_eq!(tree.to_string(), "a / (b * c)");
}

#[test]
fn expression_round_trips() {
    for sql in [
        "SELECT -(a + b), - -c, NOT NOT d",
        "SELECT a * (b + c) / d",
        "SELECT (a = 1) = (b = 2)",
        "SELECT a IS NOT b, a IS NULL, a NOT NULL",
        "SELECT CAST(a AS INTEGER) + 1",
        "SELECT a COLLATE nocase = b",
        "SELECT CASE a WHEN 1 THEN 'x' END",
        "SELECT a BETWEEN b AND c AND d",
        "SELECT a NOT BETWEEN 1 + 1 AND 2 * 3",
        "SELECT 1 WHERE NOT EXISTS (SELECT 1)",
        "SELECT a IN (), b NOT IN (SELECT c FROM t)",
        "SELECT :a, @b, $c, ?1, ?",
        "SELECT CURRENT_DATE, CURRENT_TIME, CURRENT_TIMESTAMP",
    ] {
        round_trip(sql);
    }
}
