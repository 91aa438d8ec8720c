//! Pratt expression parser for operator precedence.
//!
//! Levels from loosest to tightest:
//!
//! | binding power | operators                                              |
//! |---------------|--------------------------------------------------------|
//! | 1, 2          | `OR`                                                   |
//! | 3, 4          | `AND`                                                  |
//! | 5             | prefix `NOT`                                           |
//! | 7, 8          | `= == != <> IS [NOT] IN LIKE GLOB REGEXP MATCH BETWEEN ISNULL NOTNULL` |
//! | 9, 10         | `< <= > >=`                                            |
//! | 11, 12        | `& \| << >>`                                           |
//! | 13, 14        | `+ -`                                                  |
//! | 15, 16        | `* / %`                                                |
//! | 17, 18        | `\|\|`                                                 |
//! | 19            | postfix `COLLATE`                                      |
//! | 21            | prefix `- + ~`                                         |

use crate::ast::{BinaryOp, LikeOp, UnaryOp};
use crate::lexer::{Keyword, Operator, TokenKind};

/// Left binding power shared by the equality-like operators.
pub const EQUALITY_BP: u8 = 7;
/// Binding power of postfix `COLLATE`.
pub const COLLATE_BP: u8 = 19;
/// Binding power of the operand of prefix `NOT`.
pub const NOT_BP: u8 = 5;
/// Binding power of the operand of prefix `-`, `+` and `~`.
pub const UNARY_BP: u8 = 21;
/// Precedence of expressions that never need parentheses.
pub const ATOM_BP: u8 = u8::MAX;

/// Returns the prefix binding power for a token.
///
/// Returns `None` if the token is not a prefix operator.
#[must_use]
pub const fn prefix_binding_power(kind: &TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Operator(Operator::Minus | Operator::Plus | Operator::BitNot) => Some(UNARY_BP),
        TokenKind::Keyword(Keyword::Not) => Some(NOT_BP),
        _ => None,
    }
}

/// Returns the infix binding power for a token.
///
/// Returns `(left_bp, right_bp)` where:
/// - Higher binding power = binds tighter
/// - Left associative: `left_bp < right_bp`
///
/// Returns `None` if the token is not an infix or postfix operator. `NOT`
/// is only infix in front of `LIKE`, `IN`, `BETWEEN`, `NULL` and friends,
/// which the caller checks.
#[must_use]
pub const fn infix_binding_power(kind: &TokenKind) -> Option<(u8, u8)> {
    match kind {
        TokenKind::Keyword(Keyword::Or) => Some((1, 2)),
        TokenKind::Keyword(Keyword::And) => Some((3, 4)),

        TokenKind::Operator(Operator::Eq | Operator::NotEq)
        | TokenKind::Keyword(
            Keyword::Is
            | Keyword::In
            | Keyword::Like
            | Keyword::Glob
            | Keyword::Regexp
            | Keyword::Match
            | Keyword::Between
            | Keyword::Isnull
            | Keyword::Notnull
            | Keyword::Not,
        ) => Some((EQUALITY_BP, EQUALITY_BP + 1)),

        TokenKind::Operator(Operator::Lt | Operator::LtEq | Operator::Gt | Operator::GtEq) => {
            Some((9, 10))
        }

        TokenKind::Operator(
            Operator::BitAnd | Operator::BitOr | Operator::LeftShift | Operator::RightShift,
        ) => Some((11, 12)),

        TokenKind::Operator(Operator::Plus | Operator::Minus) => Some((13, 14)),

        TokenKind::Operator(Operator::Star | Operator::Slash | Operator::Percent) => {
            Some((15, 16))
        }

        TokenKind::Operator(Operator::Concat) => Some((17, 18)),

        TokenKind::Keyword(Keyword::Collate) => Some((COLLATE_BP, COLLATE_BP + 1)),

        _ => None,
    }
}

/// Returns `(left_bp, right_bp)` for a binary operator.
#[must_use]
pub const fn binary_op_binding_power(op: BinaryOp) -> (u8, u8) {
    match op {
        BinaryOp::Or => (1, 2),
        BinaryOp::And => (3, 4),
        BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::Is | BinaryOp::IsNot => {
            (EQUALITY_BP, EQUALITY_BP + 1)
        }
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => (9, 10),
        BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::LeftShift | BinaryOp::RightShift => {
            (11, 12)
        }
        BinaryOp::Add | BinaryOp::Sub => (13, 14),
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => (15, 16),
        BinaryOp::Concat => (17, 18),
    }
}

/// Converts a token to a binary operator.
#[must_use]
pub const fn token_to_binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Operator(op) => match op {
            Operator::Plus => Some(BinaryOp::Add),
            Operator::Minus => Some(BinaryOp::Sub),
            Operator::Star => Some(BinaryOp::Mul),
            Operator::Slash => Some(BinaryOp::Div),
            Operator::Percent => Some(BinaryOp::Mod),
            Operator::Eq => Some(BinaryOp::Eq),
            Operator::NotEq => Some(BinaryOp::NotEq),
            Operator::Lt => Some(BinaryOp::Lt),
            Operator::LtEq => Some(BinaryOp::LtEq),
            Operator::Gt => Some(BinaryOp::Gt),
            Operator::GtEq => Some(BinaryOp::GtEq),
            Operator::Concat => Some(BinaryOp::Concat),
            Operator::BitAnd => Some(BinaryOp::BitAnd),
            Operator::BitOr => Some(BinaryOp::BitOr),
            Operator::LeftShift => Some(BinaryOp::LeftShift),
            Operator::RightShift => Some(BinaryOp::RightShift),
            _ => None,
        },
        TokenKind::Keyword(Keyword::And) => Some(BinaryOp::And),
        TokenKind::Keyword(Keyword::Or) => Some(BinaryOp::Or),
        _ => None,
    }
}

/// Converts a token to a unary operator.
#[must_use]
pub const fn token_to_unary_op(kind: &TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Operator(Operator::Minus) => Some(UnaryOp::Neg),
        TokenKind::Operator(Operator::Plus) => Some(UnaryOp::Pos),
        TokenKind::Operator(Operator::BitNot) => Some(UnaryOp::BitNot),
        TokenKind::Keyword(Keyword::Not) => Some(UnaryOp::Not),
        _ => None,
    }
}

/// Converts a token to a pattern-matching operator.
#[must_use]
pub const fn token_to_like_op(kind: &TokenKind) -> Option<LikeOp> {
    match kind {
        TokenKind::Keyword(Keyword::Like) => Some(LikeOp::Like),
        TokenKind::Keyword(Keyword::Glob) => Some(LikeOp::Glob),
        TokenKind::Keyword(Keyword::Regexp) => Some(LikeOp::Regexp),
        TokenKind::Keyword(Keyword::Match) => Some(LikeOp::Match),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(op: Operator) -> TokenKind {
        TokenKind::Operator(op)
    }

    fn kw(kw: Keyword) -> TokenKind {
        TokenKind::Keyword(kw)
    }

    #[test]
    fn test_precedence_ordering() {
        let add_bp = infix_binding_power(&op(Operator::Plus)).unwrap();
        let mul_bp = infix_binding_power(&op(Operator::Star)).unwrap();
        assert!(mul_bp.0 > add_bp.0);

        let and_bp = infix_binding_power(&kw(Keyword::And)).unwrap();
        let or_bp = infix_binding_power(&kw(Keyword::Or)).unwrap();
        assert!(and_bp.0 > or_bp.0);

        let eq_bp = infix_binding_power(&op(Operator::Eq)).unwrap();
        let lt_bp = infix_binding_power(&op(Operator::Lt)).unwrap();
        assert!(eq_bp.0 > and_bp.0);
        assert!(lt_bp.0 > eq_bp.0);

        let concat_bp = infix_binding_power(&op(Operator::Concat)).unwrap();
        assert!(concat_bp.0 > mul_bp.0);
    }

    #[test]
    fn test_not_sits_between_and_and_equality() {
        let and_bp = infix_binding_power(&kw(Keyword::And)).unwrap();
        assert!(NOT_BP > and_bp.1);
        assert!(NOT_BP < EQUALITY_BP);
    }

    #[test]
    fn test_left_associativity() {
        let (left, right) = infix_binding_power(&op(Operator::Minus)).unwrap();
        assert!(left < right);
    }

    #[test]
    fn test_binary_op_binding_power_matches_tokens() {
        for operator in [
            Operator::Plus,
            Operator::Star,
            Operator::Eq,
            Operator::LtEq,
            Operator::Concat,
            Operator::LeftShift,
        ] {
            let kind = op(operator);
            let binary = token_to_binary_op(&kind).unwrap();
            assert_eq!(
                Some(binary_op_binding_power(binary)),
                infix_binding_power(&kind)
            );
        }
    }

    #[test]
    fn test_token_to_unary_op() {
        assert_eq!(token_to_unary_op(&op(Operator::Minus)), Some(UnaryOp::Neg));
        assert_eq!(token_to_unary_op(&kw(Keyword::Not)), Some(UnaryOp::Not));
        assert_eq!(token_to_unary_op(&op(Operator::Star)), None);
    }

    #[test]
    fn test_token_to_like_op() {
        assert_eq!(token_to_like_op(&kw(Keyword::Glob)), Some(LikeOp::Glob));
        assert_eq!(token_to_like_op(&kw(Keyword::In)), None);
    }
}
