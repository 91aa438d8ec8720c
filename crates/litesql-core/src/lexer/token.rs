//! Token types for the SQL lexer.

use core::fmt;

use super::Span;

/// SQL keywords recognized by the lexer.
///
/// Keywords are reserved: a bare word spelled like one of these is never an
/// identifier. Quote it (`"order"`) to use it as a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Queries
    Select,
    From,
    Where,
    Group,
    By,
    Having,
    Order,
    Limit,
    Offset,
    Distinct,
    All,
    As,
    Indexed,

    // Joins (recognized so they can be rejected)
    Join,
    Inner,
    Left,
    Outer,
    Cross,
    Natural,
    On,
    Using,

    // Compound selects (recognized so they can be rejected)
    Union,
    Intersect,
    Except,

    // Data manipulation
    Insert,
    Replace,
    Into,
    Values,
    Default,
    Update,
    Set,
    Delete,

    // Data definition
    Create,
    Alter,
    Drop,
    Table,
    Index,
    View,
    Trigger,
    Temp,
    Temporary,
    If,
    Exists,
    Rename,
    To,
    Add,
    Column,
    Without,

    // Constraints
    Constraint,
    Primary,
    Key,
    Unique,
    Check,
    Foreign,
    References,
    Collate,
    Autoincrement,
    Conflict,
    Rollback,
    Abort,
    Fail,
    Ignore,
    Cascade,
    Restrict,
    Action,
    No,
    Match,
    Deferrable,
    Initially,
    Deferred,
    Immediate,

    // Triggers
    Before,
    After,
    Instead,
    Of,
    For,
    Each,
    Row,
    When,
    Begin,
    End,

    // Expressions
    And,
    Or,
    Not,
    Is,
    In,
    Like,
    Glob,
    Regexp,
    Between,
    Escape,
    Isnull,
    Notnull,
    Null,
    Case,
    Then,
    Else,
    Cast,
    CurrentDate,
    CurrentTime,
    CurrentTimestamp,

    // Ordering
    Asc,
    Desc,

    // Common table expressions (recognized so they can be rejected)
    With,
    Recursive,
}

impl Keyword {
    /// Attempts to parse a keyword from a string (case-insensitive).
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SELECT" => Some(Self::Select),
            "FROM" => Some(Self::From),
            "WHERE" => Some(Self::Where),
            "GROUP" => Some(Self::Group),
            "BY" => Some(Self::By),
            "HAVING" => Some(Self::Having),
            "ORDER" => Some(Self::Order),
            "LIMIT" => Some(Self::Limit),
            "OFFSET" => Some(Self::Offset),
            "DISTINCT" => Some(Self::Distinct),
            "ALL" => Some(Self::All),
            "AS" => Some(Self::As),
            "INDEXED" => Some(Self::Indexed),
            "JOIN" => Some(Self::Join),
            "INNER" => Some(Self::Inner),
            "LEFT" => Some(Self::Left),
            "OUTER" => Some(Self::Outer),
            "CROSS" => Some(Self::Cross),
            "NATURAL" => Some(Self::Natural),
            "ON" => Some(Self::On),
            "USING" => Some(Self::Using),
            "UNION" => Some(Self::Union),
            "INTERSECT" => Some(Self::Intersect),
            "EXCEPT" => Some(Self::Except),
            "INSERT" => Some(Self::Insert),
            "REPLACE" => Some(Self::Replace),
            "INTO" => Some(Self::Into),
            "VALUES" => Some(Self::Values),
            "DEFAULT" => Some(Self::Default),
            "UPDATE" => Some(Self::Update),
            "SET" => Some(Self::Set),
            "DELETE" => Some(Self::Delete),
            "CREATE" => Some(Self::Create),
            "ALTER" => Some(Self::Alter),
            "DROP" => Some(Self::Drop),
            "TABLE" => Some(Self::Table),
            "INDEX" => Some(Self::Index),
            "VIEW" => Some(Self::View),
            "TRIGGER" => Some(Self::Trigger),
            "TEMP" => Some(Self::Temp),
            "TEMPORARY" => Some(Self::Temporary),
            "IF" => Some(Self::If),
            "EXISTS" => Some(Self::Exists),
            "RENAME" => Some(Self::Rename),
            "TO" => Some(Self::To),
            "ADD" => Some(Self::Add),
            "COLUMN" => Some(Self::Column),
            "WITHOUT" => Some(Self::Without),
            "CONSTRAINT" => Some(Self::Constraint),
            "PRIMARY" => Some(Self::Primary),
            "KEY" => Some(Self::Key),
            "UNIQUE" => Some(Self::Unique),
            "CHECK" => Some(Self::Check),
            "FOREIGN" => Some(Self::Foreign),
            "REFERENCES" => Some(Self::References),
            "COLLATE" => Some(Self::Collate),
            "AUTOINCREMENT" => Some(Self::Autoincrement),
            "CONFLICT" => Some(Self::Conflict),
            "ROLLBACK" => Some(Self::Rollback),
            "ABORT" => Some(Self::Abort),
            "FAIL" => Some(Self::Fail),
            "IGNORE" => Some(Self::Ignore),
            "CASCADE" => Some(Self::Cascade),
            "RESTRICT" => Some(Self::Restrict),
            "ACTION" => Some(Self::Action),
            "NO" => Some(Self::No),
            "MATCH" => Some(Self::Match),
            "DEFERRABLE" => Some(Self::Deferrable),
            "INITIALLY" => Some(Self::Initially),
            "DEFERRED" => Some(Self::Deferred),
            "IMMEDIATE" => Some(Self::Immediate),
            "BEFORE" => Some(Self::Before),
            "AFTER" => Some(Self::After),
            "INSTEAD" => Some(Self::Instead),
            "OF" => Some(Self::Of),
            "FOR" => Some(Self::For),
            "EACH" => Some(Self::Each),
            "ROW" => Some(Self::Row),
            "WHEN" => Some(Self::When),
            "BEGIN" => Some(Self::Begin),
            "END" => Some(Self::End),
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            "NOT" => Some(Self::Not),
            "IS" => Some(Self::Is),
            "IN" => Some(Self::In),
            "LIKE" => Some(Self::Like),
            "GLOB" => Some(Self::Glob),
            "REGEXP" => Some(Self::Regexp),
            "BETWEEN" => Some(Self::Between),
            "ESCAPE" => Some(Self::Escape),
            "ISNULL" => Some(Self::Isnull),
            "NOTNULL" => Some(Self::Notnull),
            "NULL" => Some(Self::Null),
            "CASE" => Some(Self::Case),
            "THEN" => Some(Self::Then),
            "ELSE" => Some(Self::Else),
            "CAST" => Some(Self::Cast),
            "CURRENT_DATE" => Some(Self::CurrentDate),
            "CURRENT_TIME" => Some(Self::CurrentTime),
            "CURRENT_TIMESTAMP" => Some(Self::CurrentTimestamp),
            "ASC" => Some(Self::Asc),
            "DESC" => Some(Self::Desc),
            "WITH" => Some(Self::With),
            "RECURSIVE" => Some(Self::Recursive),
            _ => None,
        }
    }

    /// Returns the keyword as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::Group => "GROUP",
            Self::By => "BY",
            Self::Having => "HAVING",
            Self::Order => "ORDER",
            Self::Limit => "LIMIT",
            Self::Offset => "OFFSET",
            Self::Distinct => "DISTINCT",
            Self::All => "ALL",
            Self::As => "AS",
            Self::Indexed => "INDEXED",
            Self::Join => "JOIN",
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Outer => "OUTER",
            Self::Cross => "CROSS",
            Self::Natural => "NATURAL",
            Self::On => "ON",
            Self::Using => "USING",
            Self::Union => "UNION",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
            Self::Insert => "INSERT",
            Self::Replace => "REPLACE",
            Self::Into => "INTO",
            Self::Values => "VALUES",
            Self::Default => "DEFAULT",
            Self::Update => "UPDATE",
            Self::Set => "SET",
            Self::Delete => "DELETE",
            Self::Create => "CREATE",
            Self::Alter => "ALTER",
            Self::Drop => "DROP",
            Self::Table => "TABLE",
            Self::Index => "INDEX",
            Self::View => "VIEW",
            Self::Trigger => "TRIGGER",
            Self::Temp => "TEMP",
            Self::Temporary => "TEMPORARY",
            Self::If => "IF",
            Self::Exists => "EXISTS",
            Self::Rename => "RENAME",
            Self::To => "TO",
            Self::Add => "ADD",
            Self::Column => "COLUMN",
            Self::Without => "WITHOUT",
            Self::Constraint => "CONSTRAINT",
            Self::Primary => "PRIMARY",
            Self::Key => "KEY",
            Self::Unique => "UNIQUE",
            Self::Check => "CHECK",
            Self::Foreign => "FOREIGN",
            Self::References => "REFERENCES",
            Self::Collate => "COLLATE",
            Self::Autoincrement => "AUTOINCREMENT",
            Self::Conflict => "CONFLICT",
            Self::Rollback => "ROLLBACK",
            Self::Abort => "ABORT",
            Self::Fail => "FAIL",
            Self::Ignore => "IGNORE",
            Self::Cascade => "CASCADE",
            Self::Restrict => "RESTRICT",
            Self::Action => "ACTION",
            Self::No => "NO",
            Self::Match => "MATCH",
            Self::Deferrable => "DEFERRABLE",
            Self::Initially => "INITIALLY",
            Self::Deferred => "DEFERRED",
            Self::Immediate => "IMMEDIATE",
            Self::Before => "BEFORE",
            Self::After => "AFTER",
            Self::Instead => "INSTEAD",
            Self::Of => "OF",
            Self::For => "FOR",
            Self::Each => "EACH",
            Self::Row => "ROW",
            Self::When => "WHEN",
            Self::Begin => "BEGIN",
            Self::End => "END",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Is => "IS",
            Self::In => "IN",
            Self::Like => "LIKE",
            Self::Glob => "GLOB",
            Self::Regexp => "REGEXP",
            Self::Between => "BETWEEN",
            Self::Escape => "ESCAPE",
            Self::Isnull => "ISNULL",
            Self::Notnull => "NOTNULL",
            Self::Null => "NULL",
            Self::Case => "CASE",
            Self::Then => "THEN",
            Self::Else => "ELSE",
            Self::Cast => "CAST",
            Self::CurrentDate => "CURRENT_DATE",
            Self::CurrentTime => "CURRENT_TIME",
            Self::CurrentTimestamp => "CURRENT_TIMESTAMP",
            Self::Asc => "ASC",
            Self::Desc => "DESC",
            Self::With => "WITH",
            Self::Recursive => "RECURSIVE",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operators and punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// = or ==
    Eq,
    /// != or <>
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// ||
    Concat,
    /// &
    BitAnd,
    /// |
    BitOr,
    /// ~
    BitNot,
    /// <<
    LeftShift,
    /// >>
    RightShift,
    /// (
    LeftParen,
    /// )
    RightParen,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
}

impl Operator {
    /// Returns the canonical spelling of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Concat => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitNot => "~",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Dot => ".",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// SQL keyword.
    Keyword(Keyword),
    /// Operator or punctuation.
    Operator(Operator),
    /// Identifier, bare or quoted (quotes removed, escapes resolved).
    Identifier(String),
    /// Numeric literal, kept as written.
    Number(String),
    /// String literal (e.g., 'hello'), escapes resolved.
    String(String),
    /// Blob literal (e.g., X'1234').
    Blob(Vec<u8>),
    /// Bind parameter marker (`?`, `?1`, `:name`, `@name`, `$name`).
    Parameter(String),
    /// End of input.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(kw) => write!(f, "keyword {kw}"),
            Self::Operator(op) => write!(f, "'{op}'"),
            Self::Identifier(name) => write!(f, "identifier \"{name}\""),
            Self::Number(text) => write!(f, "number {text}"),
            Self::String(value) => write!(f, "string '{value}'"),
            Self::Blob(bytes) => write!(f, "blob of {} bytes", bytes.len()),
            Self::Parameter(marker) => write!(f, "parameter {marker}"),
            Self::Eof => f.write_str("end of input"),
        }
    }
}

/// A token with its lexeme and span in the source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The source text the token was scanned from.
    pub lexeme: String,
    /// The location in the source code.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// Creates the end-of-input token at `offset`.
    #[must_use]
    pub fn eof(offset: usize) -> Self {
        Self::new(TokenKind::Eof, "", Span::point(offset))
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    /// Returns the identifier value if this is an identifier token.
    #[must_use]
    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

/// A fixed token the grammar can expect: a keyword or an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminal {
    /// A keyword.
    Keyword(Keyword),
    /// An operator or punctuation mark.
    Operator(Operator),
}

impl Terminal {
    /// Returns true if `kind` is this terminal.
    #[must_use]
    pub fn matches(&self, kind: &TokenKind) -> bool {
        match (self, kind) {
            (Self::Keyword(expected), TokenKind::Keyword(actual)) => expected == actual,
            (Self::Operator(expected), TokenKind::Operator(actual)) => expected == actual,
            _ => false,
        }
    }

    /// Returns the spelling of the terminal.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword(kw) => kw.as_str(),
            Self::Operator(op) => op.as_str(),
        }
    }
}

impl From<Keyword> for Terminal {
    fn from(kw: Keyword) -> Self {
        Self::Keyword(kw)
    }
}

impl From<Operator> for Terminal {
    fn from(op: Operator) -> Self {
        Self::Operator(op)
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_from_str() {
        assert_eq!(Keyword::from_str("SELECT"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("select"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("SeLeCt"), Some(Keyword::Select));
        assert_eq!(
            Keyword::from_str("current_timestamp"),
            Some(Keyword::CurrentTimestamp)
        );
        assert_eq!(Keyword::from_str("integer"), None);
        assert_eq!(Keyword::from_str("not_a_keyword"), None);
    }

    #[test]
    fn test_keyword_as_str_round_trips() {
        for kw in [
            Keyword::Select,
            Keyword::Autoincrement,
            Keyword::Deferrable,
            Keyword::CurrentDate,
            Keyword::Notnull,
        ] {
            assert_eq!(Keyword::from_str(kw.as_str()), Some(kw));
        }
    }

    #[test]
    fn test_token_is_eof() {
        let eof = Token::eof(0);
        let select = Token::new(TokenKind::Keyword(Keyword::Select), "SELECT", Span::new(0, 6));
        assert!(eof.is_eof());
        assert!(!select.is_eof());
    }

    #[test]
    fn test_token_as_keyword() {
        let select = Token::new(TokenKind::Keyword(Keyword::Select), "select", Span::new(0, 6));
        let plus = Token::new(TokenKind::Operator(Operator::Plus), "+", Span::new(0, 1));
        assert_eq!(select.as_keyword(), Some(Keyword::Select));
        assert_eq!(plus.as_keyword(), None);
    }

    #[test]
    fn test_terminal_matches() {
        let rename: Terminal = Keyword::Rename.into();
        let dot: Terminal = Operator::Dot.into();
        assert!(rename.matches(&TokenKind::Keyword(Keyword::Rename)));
        assert!(!rename.matches(&TokenKind::Identifier(String::from("rename"))));
        assert!(dot.matches(&TokenKind::Operator(Operator::Dot)));
        assert!(!dot.matches(&TokenKind::Operator(Operator::Comma)));
    }

    #[test]
    fn test_token_kind_display() {
        assert_eq!(TokenKind::Eof.to_string(), "end of input");
        assert_eq!(
            TokenKind::Keyword(Keyword::From).to_string(),
            "keyword FROM"
        );
        assert_eq!(TokenKind::Operator(Operator::Comma).to_string(), "','");
    }
}
