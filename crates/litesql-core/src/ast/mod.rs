//! Abstract Syntax Tree (AST) types for SQL statements.
//!
//! Every type here is a [`Node`]: it knows how to parse itself from a
//! [`ParserContext`] and how to write itself back through a [`SqlBuilder`].
//! Emitted text re-parses under the same rule to an equal tree.

mod ddl;
mod expression;
mod select;
mod statement;
mod types;

pub use ddl::{
    AlterTableAction, AlterTableStatement, CreateIndexStatement, CreateTableBody,
    CreateTableStatement, CreateTriggerStatement, CreateViewStatement, DropKind, DropStatement,
    TriggerEvent, TriggerTiming,
};
pub use expression::{
    BinaryOp, Expr, FunctionArgs, FunctionCall, InList, LikeOp, Literal, UnaryOp, WhenClause,
};
pub use select::{
    IndexHint, JoinClause, Limit, OrderDirection, OrderingTerm, ResultColumn, SelectSource,
    SelectStatement, TableSource,
};
pub use statement::{
    Assignment, DeleteStatement, InsertSource, InsertStatement, InsertVerb, Statement,
    UpdateStatement,
};
pub use types::{
    ColumnConstraint, ColumnConstraintKind, ColumnDefinition, ConflictClause, ConflictResolution,
    Deferrable, DefaultValue, ForeignKeyAction, ForeignKeyClause, ForeignKeyRule, IndexKind,
    IndexedColumn, Initially, SignedNumber, TableConstraint, TableConstraintKind,
    TypeDefinition,
};

use crate::builder::SqlBuilder;
use crate::error::Result;
use crate::parser::ParserContext;

/// A grammar rule with a matching emitter.
pub trait Node: Sized {
    /// Parses one instance of this rule starting at the current token.
    ///
    /// On success the cursor sits just past the rule. Nested rules should be
    /// parsed through [`ParserContext::parse`] so the depth guard applies.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the tokens do not form this rule.
    fn parse(ctx: &mut ParserContext) -> Result<Self>;

    /// Writes the canonical SQL text of this node.
    fn to_sql(&self, out: &mut SqlBuilder<'_>);

    /// Returns the canonical SQL text of this node.
    fn to_sql_string(&self) -> String {
        let mut out = SqlBuilder::new();
        self.to_sql(&mut out);
        out.finish()
    }
}

macro_rules! display_via_sql {
    ($($ty:ty),* $(,)?) => {
        $(
            impl core::fmt::Display for $ty {
                fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                    f.write_str(&self.to_sql_string())
                }
            }
        )*
    };
}

display_via_sql!(
    Statement,
    SelectStatement,
    InsertStatement,
    UpdateStatement,
    DeleteStatement,
    CreateTableStatement,
    CreateIndexStatement,
    CreateViewStatement,
    CreateTriggerStatement,
    DropStatement,
    AlterTableStatement,
    Expr,
    Literal,
    FunctionCall,
    ResultColumn,
    SelectSource,
    TableSource,
    OrderingTerm,
    Assignment,
    ColumnDefinition,
    ColumnConstraint,
    TableConstraint,
    TypeDefinition,
    SignedNumber,
    ConflictClause,
    ForeignKeyClause,
    IndexedColumn,
);
