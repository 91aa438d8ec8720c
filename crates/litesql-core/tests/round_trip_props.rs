//! Property tests: emitted SQL parses back and emits identically.

mod common;

use litesql_core::ast::{BinaryOp, Expr, ResultColumn};
use litesql_core::builder::SelectBuilder;
use litesql_core::Parser;
use proptest::prelude::*;

fn leaf() -> impl Strategy<Value = Expr> {
    prop_oneof![
        prop::sample::select(vec!["a", "b", "c", "price", "name"])
            .prop_map(|name| Expr::column(name)),
        (0_i64..1000).prop_map(Expr::integer),
        "[a-z' ]{0,6}".prop_map(|text| Expr::string(text)),
        Just(Expr::null()),
        Just(Expr::placeholder()),
    ]
}

fn binary_op() -> impl Strategy<Value = BinaryOp> {
    prop::sample::select(vec![
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Concat,
        BinaryOp::Eq,
        BinaryOp::Lt,
        BinaryOp::GtEq,
        BinaryOp::And,
        BinaryOp::Or,
    ])
}

fn expr() -> impl Strategy<Value = Expr> {
    leaf().prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), binary_op(), inner.clone())
                .prop_map(|(left, op, right)| left.binary(op, right)),
            inner.clone().prop_map(Expr::negate),
            inner.clone().prop_map(Expr::not),
            inner.clone().prop_map(Expr::is_null),
            (inner.clone(), inner.clone(), inner)
                .prop_map(|(value, low, high)| value.between(low, high)),
        ]
    })
}

fn reparse(sql: &str) -> Expr {
    Parser::new(sql)
        .parse_rule()
        .unwrap_or_else(|e| panic!("emitted SQL does not parse: {sql}\nError: {e}"))
}

proptest! {
    #[test]
    fn emitted_expressions_reach_a_fixed_point(tree in expr()) {
        let first = tree.to_string();
        let second = reparse(&first).to_string();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn parsed_expressions_survive_round_trip(tree in expr()) {
        let parsed = reparse(&tree.to_string());
        prop_assert_eq!(reparse(&parsed.to_string()), parsed);
    }

    #[test]
    fn built_selects_round_trip(
        condition in expr(),
        limit in prop::option::of(0_u64..100),
    ) {
        let mut builder = SelectBuilder::new()
            .result_columns(vec![ResultColumn::All])
            .from("t")
            .where_clause(condition);
        if let Some(n) = limit {
            builder = builder.limit(n);
        }
        let sql = builder.build_sql();
        common::round_trip(&sql);
    }
}
