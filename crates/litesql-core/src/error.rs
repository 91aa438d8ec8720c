//! Error types for lexing and parsing.

use thiserror::Error;

use crate::lexer::{Span, TokenKind};

/// A lexing or parsing failure.
///
/// Every variant carries the [`Span`] of the offending input. A failed parse
/// never yields a partial tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input could not be split into tokens.
    #[error("{message} at position {}", .span.start)]
    Lex {
        /// What went wrong.
        message: String,
        /// Where the malformed token starts.
        span: Span,
    },

    /// A required token, or every one of a set of alternatives, did not match.
    #[error(
        "expected {} but found {found} at position {}",
        format_expected(.expected),
        .span.start
    )]
    UnexpectedToken {
        /// Human-readable descriptions of what would have been accepted.
        expected: Vec<String>,
        /// The token that was found instead.
        found: TokenKind,
        /// Location of the found token.
        span: Span,
    },

    /// Valid SQLite the parser deliberately rejects.
    #[error("unsupported construct: {construct} at position {}", .span.start)]
    Unsupported {
        /// Name of the rejected construct.
        construct: &'static str,
        /// Location of the token introducing it.
        span: Span,
    },

    /// Nesting exceeded [`ParserConfig::max_depth`](crate::parser::ParserConfig).
    #[error("nesting deeper than {limit} levels at position {}", .span.start)]
    TooDeep {
        /// The configured limit.
        limit: usize,
        /// Location where the limit was hit.
        span: Span,
    },
}

impl ParseError {
    /// Creates a lexer error.
    #[must_use]
    pub fn lex(message: impl Into<String>, span: Span) -> Self {
        Self::Lex {
            message: message.into(),
            span,
        }
    }

    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected(expected: Vec<String>, found: TokenKind, span: Span) -> Self {
        Self::UnexpectedToken {
            expected,
            found,
            span,
        }
    }

    /// Creates an "unsupported construct" error.
    #[must_use]
    pub const fn unsupported(construct: &'static str, span: Span) -> Self {
        Self::Unsupported { construct, span }
    }

    /// Returns the location of the error.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Lex { span, .. }
            | Self::UnexpectedToken { span, .. }
            | Self::Unsupported { span, .. }
            | Self::TooDeep { span, .. } => *span,
        }
    }

    /// Returns the accepted alternatives for an unexpected-token error.
    #[must_use]
    pub fn expected(&self) -> &[String] {
        match self {
            Self::UnexpectedToken { expected, .. } => expected,
            _ => &[],
        }
    }

    /// Returns true if this is an unexpected-token error located at `offset`.
    ///
    /// A production that fails this way consumed nothing, so the caller may
    /// restore its snapshot and try something else.
    #[must_use]
    pub const fn is_mismatch_at(&self, offset: usize) -> bool {
        matches!(self, Self::UnexpectedToken { span, .. } if span.start == offset)
    }
}

fn format_expected(expected: &[String]) -> String {
    match expected {
        [] => String::from("something else"),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {last}", init.join(", ")),
    }
}

/// Result type alias for parse operations.
pub type Result<T> = std::result::Result<T, ParseError>;
