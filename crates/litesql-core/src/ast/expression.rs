//! Expression AST types.

use super::{Node, SelectStatement, TypeDefinition};
use crate::builder::SqlBuilder;
use crate::error::{ParseError, Result};
use crate::lexer::{Keyword, Operator, TokenKind};
use crate::parser::pratt::{
    binary_op_binding_power, infix_binding_power, prefix_binding_power, token_to_binary_op,
    token_to_like_op, token_to_unary_op, ATOM_BP, COLLATE_BP, EQUALITY_BP, NOT_BP, UNARY_BP,
};
use crate::parser::ParserContext;

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Numeric literal, kept as written (`42`, `1.5e3`, `0xFF`).
    Number(String),
    /// String literal.
    String(String),
    /// Blob literal.
    Blob(Vec<u8>),
    /// NULL literal.
    Null,
    /// `CURRENT_TIME`.
    CurrentTime,
    /// `CURRENT_DATE`.
    CurrentDate,
    /// `CURRENT_TIMESTAMP`.
    CurrentTimestamp,
}

impl Literal {
    /// Returns the literal a token denotes, if any.
    #[must_use]
    pub fn from_token(kind: &TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Number(text) => Some(Self::Number(text.clone())),
            TokenKind::String(value) => Some(Self::String(value.clone())),
            TokenKind::Blob(bytes) => Some(Self::Blob(bytes.clone())),
            TokenKind::Keyword(Keyword::Null) => Some(Self::Null),
            TokenKind::Keyword(Keyword::CurrentTime) => Some(Self::CurrentTime),
            TokenKind::Keyword(Keyword::CurrentDate) => Some(Self::CurrentDate),
            TokenKind::Keyword(Keyword::CurrentTimestamp) => Some(Self::CurrentTimestamp),
            _ => None,
        }
    }
}

impl Node for Literal {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        match Self::from_token(ctx.current_kind()) {
            Some(literal) => {
                ctx.advance();
                Ok(literal)
            }
            None => Err(ctx.unexpected(&["literal value"])),
        }
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        match self {
            Self::Number(text) => out.raw(text),
            Self::String(value) => out.string_literal(value),
            Self::Blob(bytes) => out.blob_literal(bytes),
            Self::Null => out.keyword(Keyword::Null),
            Self::CurrentTime => out.keyword(Keyword::CurrentTime),
            Self::CurrentDate => out.keyword(Keyword::CurrentDate),
            Self::CurrentTimestamp => out.keyword(Keyword::CurrentTimestamp),
        };
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Is,
    IsNot,

    // Logical
    And,
    Or,

    // String
    Concat,

    // Bitwise
    BitAnd,
    BitOr,
    LeftShift,
    RightShift,
}

impl BinaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Is => "IS",
            Self::IsNot => "IS NOT",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Concat => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
        }
    }

    /// Returns the precedence of the operator (higher = binds tighter).
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        binary_op_binding_power(*self).0
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Negation (-)
    Neg,
    /// Unary plus (+)
    Pos,
    /// Logical NOT
    Not,
    /// Bitwise NOT (~)
    BitNot,
}

impl UnaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Pos => "+",
            Self::Not => "NOT",
            Self::BitNot => "~",
        }
    }
}

/// Pattern-matching operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOp {
    Like,
    Glob,
    Regexp,
    Match,
}

impl LikeOp {
    /// Returns the keyword spelling the operator.
    #[must_use]
    pub const fn keyword(&self) -> Keyword {
        match self {
            Self::Like => Keyword::Like,
            Self::Glob => Keyword::Glob,
            Self::Regexp => Keyword::Regexp,
            Self::Match => Keyword::Match,
        }
    }
}

/// Right-hand side of `IN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InList {
    /// `IN (a, b, c)`; may be empty.
    Values(Vec<Expr>),
    /// `IN (SELECT ...)`.
    Select(Box<SelectStatement>),
}

/// Arguments of a function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionArgs {
    /// `f(*)`.
    Star,
    /// `f([DISTINCT] a, b)`; may be empty.
    List {
        /// Whether DISTINCT was specified.
        distinct: bool,
        /// The arguments.
        args: Vec<Expr>,
    },
}

/// A function call expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    /// The function name.
    pub name: String,
    /// The arguments.
    pub args: FunctionArgs,
}

/// A `WHEN condition THEN result` arm of a CASE expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhenClause {
    pub condition: Expr,
    pub result: Expr,
}

/// An SQL expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A bind parameter, as written (`?`, `?2`, `:name`).
    Parameter(String),

    /// A column reference, optionally qualified.
    Column {
        /// Schema name (only with a table).
        schema: Option<String>,
        /// Table name or alias.
        table: Option<String>,
        /// Column name.
        name: String,
    },

    /// A unary expression.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },

    /// A binary expression.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
    },

    /// `[NOT] LIKE | GLOB | REGEXP | MATCH` with optional ESCAPE.
    Like {
        /// The expression to match.
        expr: Box<Expr>,
        /// Operator.
        op: LikeOp,
        /// The pattern.
        pattern: Box<Expr>,
        /// Escape character expression.
        escape: Option<Box<Expr>>,
        /// Whether NOT was specified.
        negated: bool,
    },

    /// `IS [NOT] NULL`, `ISNULL`, `NOTNULL` and `NOT NULL`.
    IsNull {
        /// The expression to check.
        expr: Box<Expr>,
        /// Whether this is IS NOT NULL.
        negated: bool,
    },

    /// BETWEEN expression.
    Between {
        /// The expression to check.
        expr: Box<Expr>,
        /// Lower bound.
        low: Box<Expr>,
        /// Upper bound.
        high: Box<Expr>,
        /// Whether this is NOT BETWEEN.
        negated: bool,
    },

    /// IN expression.
    In {
        /// The expression to check.
        expr: Box<Expr>,
        /// The list of values or subquery.
        list: InList,
        /// Whether this is NOT IN.
        negated: bool,
    },

    /// A function call.
    Function(FunctionCall),

    /// CAST expression.
    Cast {
        /// Expression to cast.
        expr: Box<Expr>,
        /// Target type.
        type_def: TypeDefinition,
    },

    /// CASE expression.
    Case {
        /// The operand (if any).
        operand: Option<Box<Expr>>,
        /// WHEN/THEN arms, at least one.
        when_clauses: Vec<WhenClause>,
        /// ELSE clause.
        else_clause: Option<Box<Expr>>,
    },

    /// Postfix `COLLATE name`.
    Collate {
        /// The collated expression.
        expr: Box<Expr>,
        /// Collation name.
        collation: String,
    },

    /// `EXISTS (SELECT ...)`.
    Exists(Box<SelectStatement>),

    /// A scalar subquery.
    Subquery(Box<SelectStatement>),

    /// Parenthesized expression.
    Paren(Box<Expr>),
}

impl Expr {
    /// Creates a new column reference.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column {
            schema: None,
            table: None,
            name: name.into(),
        }
    }

    /// Creates a new qualified column reference.
    #[must_use]
    pub fn qualified_column(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Column {
            schema: None,
            table: Some(table.into()),
            name: name.into(),
        }
    }

    /// Creates an integer literal; negative values become a negation.
    #[must_use]
    pub fn integer(value: i64) -> Self {
        let literal = Self::Literal(Literal::Number(value.unsigned_abs().to_string()));
        if value < 0 {
            literal.negate()
        } else {
            literal
        }
    }

    /// Creates a numeric literal from its text.
    #[must_use]
    pub fn number(text: impl Into<String>) -> Self {
        Self::Literal(Literal::Number(text.into()))
    }

    /// Creates a new string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    /// Creates a NULL literal.
    #[must_use]
    pub const fn null() -> Self {
        Self::Literal(Literal::Null)
    }

    /// Creates an anonymous `?` parameter.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::Parameter(String::from("?"))
    }

    /// Creates a function call.
    #[must_use]
    pub fn function(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::Function(FunctionCall {
            name: name.into(),
            args: FunctionArgs::List {
                distinct: false,
                args,
            },
        })
    }

    /// Creates `count(*)`.
    #[must_use]
    pub fn count_star() -> Self {
        Self::Function(FunctionCall {
            name: String::from("count"),
            args: FunctionArgs::Star,
        })
    }

    /// Wraps the expression in parentheses.
    #[must_use]
    pub fn paren(self) -> Self {
        Self::Paren(Box::new(self))
    }

    /// Creates a unary expression.
    #[must_use]
    pub fn unary(op: UnaryOp, operand: Self) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Creates a negation.
    #[must_use]
    pub fn negate(self) -> Self {
        Self::unary(UnaryOp::Neg, self)
    }

    /// Creates a logical NOT.
    #[must_use]
    pub fn not(self) -> Self {
        Self::unary(UnaryOp::Not, self)
    }

    /// Creates a binary expression.
    #[must_use]
    pub fn binary(self, op: BinaryOp, right: Self) -> Self {
        Self::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }

    /// Creates an equality expression.
    #[must_use]
    pub fn eq(self, right: Self) -> Self {
        self.binary(BinaryOp::Eq, right)
    }

    /// Creates an inequality expression.
    #[must_use]
    pub fn not_eq(self, right: Self) -> Self {
        self.binary(BinaryOp::NotEq, right)
    }

    /// Creates a less-than expression.
    #[must_use]
    pub fn lt(self, right: Self) -> Self {
        self.binary(BinaryOp::Lt, right)
    }

    /// Creates a less-than-or-equal expression.
    #[must_use]
    pub fn lt_eq(self, right: Self) -> Self {
        self.binary(BinaryOp::LtEq, right)
    }

    /// Creates a greater-than expression.
    #[must_use]
    pub fn gt(self, right: Self) -> Self {
        self.binary(BinaryOp::Gt, right)
    }

    /// Creates a greater-than-or-equal expression.
    #[must_use]
    pub fn gt_eq(self, right: Self) -> Self {
        self.binary(BinaryOp::GtEq, right)
    }

    /// Creates an AND expression.
    #[must_use]
    pub fn and(self, right: Self) -> Self {
        self.binary(BinaryOp::And, right)
    }

    /// Creates an OR expression.
    #[must_use]
    pub fn or(self, right: Self) -> Self {
        self.binary(BinaryOp::Or, right)
    }

    /// Creates a LIKE expression.
    #[must_use]
    pub fn like(self, pattern: Self) -> Self {
        Self::Like {
            expr: Box::new(self),
            op: LikeOp::Like,
            pattern: Box::new(pattern),
            escape: None,
            negated: false,
        }
    }

    /// Creates an IS NULL expression.
    #[must_use]
    pub fn is_null(self) -> Self {
        Self::IsNull {
            expr: Box::new(self),
            negated: false,
        }
    }

    /// Creates an IS NOT NULL expression.
    #[must_use]
    pub fn is_not_null(self) -> Self {
        Self::IsNull {
            expr: Box::new(self),
            negated: true,
        }
    }

    /// Creates a BETWEEN expression.
    #[must_use]
    pub fn between(self, low: Self, high: Self) -> Self {
        Self::Between {
            expr: Box::new(self),
            low: Box::new(low),
            high: Box::new(high),
            negated: false,
        }
    }

    /// Creates a NOT BETWEEN expression.
    #[must_use]
    pub fn not_between(self, low: Self, high: Self) -> Self {
        Self::Between {
            expr: Box::new(self),
            low: Box::new(low),
            high: Box::new(high),
            negated: true,
        }
    }

    /// Creates an IN expression.
    #[must_use]
    pub fn in_list(self, list: Vec<Self>) -> Self {
        Self::In {
            expr: Box::new(self),
            list: InList::Values(list),
            negated: false,
        }
    }

    /// Creates a NOT IN expression.
    #[must_use]
    pub fn not_in_list(self, list: Vec<Self>) -> Self {
        Self::In {
            expr: Box::new(self),
            list: InList::Values(list),
            negated: true,
        }
    }

    /// Creates a COLLATE expression.
    #[must_use]
    pub fn collate(self, collation: impl Into<String>) -> Self {
        Self::Collate {
            expr: Box::new(self),
            collation: collation.into(),
        }
    }

    /// Returns the binding power of the outermost operator.
    ///
    /// An operand whose precedence is lower than its parent's operator must be
    /// parenthesized when emitted.
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Binary { op, .. } => op.precedence(),
            Self::Like { .. } | Self::IsNull { .. } | Self::Between { .. } | Self::In { .. } => {
                EQUALITY_BP
            }
            Self::Collate { .. } => COLLATE_BP,
            Self::Unary {
                op: UnaryOp::Not, ..
            } => NOT_BP,
            Self::Unary { .. } => UNARY_BP,
            _ => ATOM_BP,
        }
    }
}

impl Node for Expr {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        parse_expr(ctx, 0)
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        match self {
            Self::Literal(literal) => {
                out.node(literal);
            }
            Self::Parameter(marker) => {
                out.raw(marker);
            }
            Self::Column {
                schema,
                table,
                name,
            } => {
                if let Some(schema) = schema {
                    out.identifier(schema).dot();
                }
                if let Some(table) = table {
                    out.identifier(table).dot();
                }
                out.identifier(name);
            }
            Self::Unary { op, operand } => {
                match op {
                    UnaryOp::Not => out.keyword(Keyword::Not),
                    // keep "- -x" from becoming a "--" comment
                    UnaryOp::Neg
                        if matches!(
                            operand.as_ref(),
                            Self::Unary {
                                op: UnaryOp::Neg,
                                ..
                            }
                        ) =>
                    {
                        out.operator(op.as_str())
                    }
                    _ => out.prefix(op.as_str()),
                };
                let min = if *op == UnaryOp::Not { NOT_BP } else { UNARY_BP };
                write_right_operand(out, operand, min);
            }
            Self::Binary { left, op, right } => {
                let (left_bp, right_bp) = binary_op_binding_power(*op);
                write_left_operand(out, left, left_bp);
                out.operator(op.as_str());
                write_right_operand(out, right, right_bp);
            }
            Self::Like {
                expr,
                op,
                pattern,
                escape,
                negated,
            } => {
                write_left_operand(out, expr, EQUALITY_BP);
                if *negated {
                    out.keyword(Keyword::Not);
                }
                out.keyword(op.keyword());
                write_right_operand(out, pattern, EQUALITY_BP + 1);
                if let Some(escape) = escape {
                    out.keyword(Keyword::Escape);
                    write_right_operand(out, escape, EQUALITY_BP + 1);
                }
            }
            Self::IsNull { expr, negated } => {
                write_left_operand(out, expr, EQUALITY_BP);
                out.keyword(Keyword::Is);
                if *negated {
                    out.keyword(Keyword::Not);
                }
                out.keyword(Keyword::Null);
            }
            Self::Between {
                expr,
                low,
                high,
                negated,
            } => {
                write_left_operand(out, expr, EQUALITY_BP);
                if *negated {
                    out.keyword(Keyword::Not);
                }
                out.keyword(Keyword::Between);
                write_right_operand(out, low, EQUALITY_BP + 1);
                out.keyword(Keyword::And);
                write_right_operand(out, high, EQUALITY_BP + 1);
            }
            Self::In {
                expr,
                list,
                negated,
            } => {
                write_left_operand(out, expr, EQUALITY_BP);
                if *negated {
                    out.keyword(Keyword::Not);
                }
                out.keyword(Keyword::In);
                match list {
                    InList::Values(values) => out.paren_list(values),
                    InList::Select(select) => out.open_paren().node(select.as_ref()).close_paren(),
                };
            }
            Self::Function(call) => {
                out.node(call);
            }
            Self::Cast { expr, type_def } => {
                out.keyword(Keyword::Cast)
                    .call_paren()
                    .node(expr.as_ref())
                    .keyword(Keyword::As)
                    .node(type_def)
                    .close_paren();
            }
            Self::Case {
                operand,
                when_clauses,
                else_clause,
            } => {
                out.keyword(Keyword::Case);
                if let Some(operand) = operand {
                    out.node(operand.as_ref());
                }
                for clause in when_clauses {
                    out.keyword(Keyword::When)
                        .node(&clause.condition)
                        .keyword(Keyword::Then)
                        .node(&clause.result);
                }
                if let Some(else_clause) = else_clause {
                    out.keyword(Keyword::Else).node(else_clause.as_ref());
                }
                out.keyword(Keyword::End);
            }
            Self::Collate { expr, collation } => {
                write_left_operand(out, expr, COLLATE_BP);
                out.keyword(Keyword::Collate).identifier(collation);
            }
            Self::Exists(select) => {
                out.keyword(Keyword::Exists)
                    .open_paren()
                    .node(select.as_ref())
                    .close_paren();
            }
            Self::Subquery(select) => {
                out.open_paren().node(select.as_ref()).close_paren();
            }
            Self::Paren(inner) => {
                out.open_paren().node(inner.as_ref()).close_paren();
            }
        }
    }
}

/// Returns the lowest binding power an operator written after `expr` needs
/// to be absorbed into it on re-parse. Only an unparenthesized prefix `NOT`
/// at the tail leaves the expression open.
fn tail_binding_power(expr: &Expr) -> u8 {
    match expr {
        Expr::Unary {
            op: UnaryOp::Not,
            operand,
        } => NOT_BP.min(tail_binding_power(operand)),
        Expr::Unary { operand, .. } => tail_binding_power(operand),
        Expr::Binary { right, .. } => tail_binding_power(right),
        Expr::Like {
            pattern, escape, ..
        } => tail_binding_power(escape.as_deref().unwrap_or(pattern)),
        Expr::Between { high, .. } => tail_binding_power(high),
        _ => ATOM_BP,
    }
}

/// Writes an operand that precedes an operator of left binding power `min_bp`.
fn write_left_operand(out: &mut SqlBuilder<'_>, expr: &Expr, min_bp: u8) {
    if expr.precedence() >= min_bp && tail_binding_power(expr) > min_bp {
        out.node(expr);
    } else {
        out.open_paren().node(expr).close_paren();
    }
}

/// Writes an operand that follows its operator.
///
/// Prefix operators start a fresh operand when re-parsed, so they are written
/// without parentheses even when they bind loosely.
fn write_right_operand(out: &mut SqlBuilder<'_>, expr: &Expr, min_bp: u8) {
    if matches!(expr, Expr::Unary { .. }) || expr.precedence() >= min_bp {
        out.node(expr);
    } else {
        out.open_paren().node(expr).close_paren();
    }
}

/// Keywords that double as SQLite function names (`replace(...)`).
const fn is_function_keyword(keyword: Keyword) -> bool {
    matches!(
        keyword,
        Keyword::Replace | Keyword::Like | Keyword::Glob | Keyword::Match | Keyword::Regexp
    )
}

/// Returns true if `NOT` at the cursor starts a negated infix operator.
fn not_starts_infix(ctx: &ParserContext) -> bool {
    matches!(
        ctx.peek(1).kind,
        TokenKind::Keyword(
            Keyword::Like
                | Keyword::Glob
                | Keyword::Regexp
                | Keyword::Match
                | Keyword::Between
                | Keyword::In
                | Keyword::Null
        )
    )
}

/// Parses an expression using Pratt parsing.
pub(crate) fn parse_expr(ctx: &mut ParserContext, min_bp: u8) -> Result<Expr> {
    ctx.nested(|ctx| {
        let mut lhs = parse_prefix(ctx)?;

        while let Some((l_bp, r_bp)) = infix_binding_power(ctx.current_kind()) {
            if l_bp < min_bp {
                break;
            }
            if ctx.current_is(Keyword::Not) && !not_starts_infix(ctx) {
                break;
            }
            lhs = parse_infix(ctx, lhs, r_bp)?;
        }

        Ok(lhs)
    })
}

/// Parses the operator at the cursor and its right-hand side.
fn parse_infix(ctx: &mut ParserContext, lhs: Expr, r_bp: u8) -> Result<Expr> {
    let negated = ctx.try_consume(Keyword::Not);
    let token = ctx.advance();
    let expr = Box::new(lhs);

    if let Some(op) = token_to_like_op(&token.kind) {
        let pattern = Box::new(parse_expr(ctx, r_bp)?);
        let escape = if ctx.try_consume(Keyword::Escape) {
            Some(Box::new(parse_expr(ctx, r_bp)?))
        } else {
            None
        };
        return Ok(Expr::Like {
            expr,
            op,
            pattern,
            escape,
            negated,
        });
    }

    match token.kind {
        TokenKind::Keyword(Keyword::Is) => {
            let not = ctx.try_consume(Keyword::Not);
            let right = parse_expr(ctx, r_bp)?;
            if right == Expr::null() {
                Ok(Expr::IsNull { expr, negated: not })
            } else {
                let op = if not { BinaryOp::IsNot } else { BinaryOp::Is };
                Ok(Expr::Binary {
                    left: expr,
                    op,
                    right: Box::new(right),
                })
            }
        }
        TokenKind::Keyword(Keyword::Isnull) => Ok(Expr::IsNull {
            expr,
            negated: false,
        }),
        TokenKind::Keyword(Keyword::Notnull) => Ok(Expr::IsNull {
            expr,
            negated: true,
        }),
        TokenKind::Keyword(Keyword::Null) => Ok(Expr::IsNull {
            expr,
            negated: true,
        }),
        TokenKind::Keyword(Keyword::In) => {
            let list = parse_in_list(ctx)?;
            Ok(Expr::In {
                expr,
                list,
                negated,
            })
        }
        TokenKind::Keyword(Keyword::Between) => {
            let low = Box::new(parse_expr(ctx, r_bp)?);
            ctx.consume(Keyword::And)?;
            let high = Box::new(parse_expr(ctx, r_bp)?);
            Ok(Expr::Between {
                expr,
                low,
                high,
                negated,
            })
        }
        TokenKind::Keyword(Keyword::Collate) => {
            let collation = ctx.consume_identifier()?;
            Ok(Expr::Collate { expr, collation })
        }
        kind => match token_to_binary_op(&kind) {
            Some(op) => {
                let right = Box::new(parse_expr(ctx, r_bp)?);
                Ok(Expr::Binary {
                    left: expr,
                    op,
                    right,
                })
            }
            None => Err(ParseError::unexpected(
                vec![String::from("operator")],
                kind,
                token.span,
            )),
        },
    }
}

/// Parses a prefix expression.
fn parse_prefix(ctx: &mut ParserContext) -> Result<Expr> {
    if let Some(op) = token_to_unary_op(ctx.current_kind()) {
        let bp = prefix_binding_power(ctx.current_kind()).unwrap_or(UNARY_BP);
        ctx.advance();
        let operand = parse_expr(ctx, bp)?;
        return Ok(Expr::unary(op, operand));
    }

    parse_primary(ctx)
}

/// Parses a primary expression.
fn parse_primary(ctx: &mut ParserContext) -> Result<Expr> {
    if let Some(literal) = Literal::from_token(ctx.current_kind()) {
        ctx.advance();
        return Ok(Expr::Literal(literal));
    }

    match ctx.current_kind() {
        TokenKind::Parameter(marker) => {
            let marker = marker.clone();
            ctx.advance();
            Ok(Expr::Parameter(marker))
        }

        TokenKind::Identifier(_) if ctx.next_is(Operator::LeftParen) => {
            Ok(Expr::Function(ctx.parse()?))
        }
        TokenKind::Keyword(kw) if is_function_keyword(*kw) && ctx.next_is(Operator::LeftParen) => {
            Ok(Expr::Function(ctx.parse()?))
        }
        TokenKind::Identifier(_) => parse_column_ref(ctx),

        TokenKind::Keyword(Keyword::Cast) => {
            ctx.advance();
            ctx.parenthesized(|ctx| {
                let expr = Box::new(ctx.parse::<Expr>()?);
                ctx.consume(Keyword::As)?;
                let type_def = ctx.parse()?;
                Ok(Expr::Cast { expr, type_def })
            })
        }

        TokenKind::Keyword(Keyword::Case) => parse_case(ctx),

        TokenKind::Keyword(Keyword::Exists) => {
            ctx.advance();
            let select = ctx.parenthesized(ParserContext::parse::<SelectStatement>)?;
            Ok(Expr::Exists(Box::new(select)))
        }

        TokenKind::Operator(Operator::LeftParen) => ctx.parenthesized(|ctx| {
            if ctx.current_is(Keyword::Select) || ctx.current_is(Keyword::With) {
                Ok(Expr::Subquery(Box::new(ctx.parse()?)))
            } else {
                Ok(Expr::Paren(Box::new(ctx.parse()?)))
            }
        }),

        _ => Err(ctx.unexpected(&["expression"])),
    }
}

/// Parses `[[schema .] table .] column`.
fn parse_column_ref(ctx: &mut ParserContext) -> Result<Expr> {
    let first = ctx.consume_identifier()?;
    if !ctx.try_consume(Operator::Dot) {
        return Ok(Expr::column(first));
    }
    let second = ctx.consume_identifier()?;
    if !ctx.try_consume(Operator::Dot) {
        return Ok(Expr::qualified_column(first, second));
    }
    let name = ctx.consume_identifier()?;
    Ok(Expr::Column {
        schema: Some(first),
        table: Some(second),
        name,
    })
}

/// Parses `CASE [operand] WHEN .. THEN .. [ELSE ..] END`.
fn parse_case(ctx: &mut ParserContext) -> Result<Expr> {
    ctx.consume(Keyword::Case)?;
    let operand = if ctx.current_is(Keyword::When) {
        None
    } else {
        Some(Box::new(ctx.parse::<Expr>()?))
    };

    let mut when_clauses = Vec::new();
    loop {
        if when_clauses.is_empty() {
            ctx.consume(Keyword::When)?;
        } else if !ctx.try_consume(Keyword::When) {
            break;
        }
        let condition = ctx.parse()?;
        ctx.consume(Keyword::Then)?;
        let result = ctx.parse()?;
        when_clauses.push(WhenClause { condition, result });
    }

    let else_clause = if ctx.try_consume(Keyword::Else) {
        Some(Box::new(ctx.parse::<Expr>()?))
    } else {
        None
    };
    ctx.consume(Keyword::End)?;

    Ok(Expr::Case {
        operand,
        when_clauses,
        else_clause,
    })
}

/// Parses the parenthesized right-hand side of IN.
fn parse_in_list(ctx: &mut ParserContext) -> Result<InList> {
    ctx.parenthesized(|ctx| {
        if ctx.current_is(Keyword::Select) || ctx.current_is(Keyword::With) {
            Ok(InList::Select(Box::new(ctx.parse()?)))
        } else if ctx.current_is(Operator::RightParen) {
            Ok(InList::Values(Vec::new()))
        } else {
            Ok(InList::Values(
                ctx.parse_list(Operator::Comma, ParserContext::parse::<Expr>)?,
            ))
        }
    })
}

impl Node for FunctionCall {
    fn parse(ctx: &mut ParserContext) -> Result<Self> {
        let token = ctx.current().clone();
        let name = match token.kind {
            TokenKind::Identifier(name) => name,
            TokenKind::Keyword(kw) if is_function_keyword(kw) => token.lexeme,
            _ => return Err(ctx.unexpected(&["function name"])),
        };
        ctx.advance();

        let args = ctx.parenthesized(|ctx| {
            if ctx.try_consume(Operator::Star) {
                Ok(FunctionArgs::Star)
            } else if ctx.current_is(Operator::RightParen) {
                Ok(FunctionArgs::List {
                    distinct: false,
                    args: Vec::new(),
                })
            } else {
                let distinct = ctx.try_consume(Keyword::Distinct);
                let args = ctx.parse_list(Operator::Comma, ParserContext::parse::<Expr>)?;
                Ok(FunctionArgs::List { distinct, args })
            }
        })?;

        Ok(Self { name, args })
    }

    fn to_sql(&self, out: &mut SqlBuilder<'_>) {
        if Keyword::from_str(&self.name).is_some_and(is_function_keyword) {
            out.raw(&self.name);
        } else {
            out.identifier(&self.name);
        }
        out.call_paren();
        match &self.args {
            FunctionArgs::Star => {
                out.raw("*");
            }
            FunctionArgs::List { distinct, args } => {
                if *distinct {
                    out.keyword(Keyword::Distinct);
                }
                out.list(args);
            }
        }
        out.close_paren();
    }
}
