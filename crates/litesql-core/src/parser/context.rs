//! Token cursor and parsing combinators shared by every grammar rule.

use tracing::{debug, trace};

use crate::ast::Node;
use crate::error::{ParseError, Result};
use crate::lexer::{Lexer, Operator, Terminal, Token, TokenKind};

/// Default limit for nested rules and expressions.
pub const DEFAULT_MAX_DEPTH: usize = 200;

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum nesting of grammar rules and sub-expressions before the parse
    /// fails with [`ParseError::TooDeep`].
    pub max_depth: usize,
}

impl ParserConfig {
    /// Creates the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A saved cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot(usize);

/// Cursor over the tokens of one parse call.
///
/// Grammar rules read tokens through the lookahead methods and consume them
/// through the combinators. A failed probe (`try_consume*`, `alternatives`,
/// `parse_list_into`) leaves the cursor where it started.
#[derive(Debug)]
pub struct ParserContext {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    config: ParserConfig,
}

impl ParserContext {
    /// Creates a context over `tokens`, appending an EOF token if missing.
    #[must_use]
    pub fn new(mut tokens: Vec<Token>, config: ParserConfig) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let end = tokens.last().map_or(0, |t| t.span.end);
            tokens.push(Token::eof(end));
        }
        Self {
            tokens,
            pos: 0,
            depth: 0,
            config,
        }
    }

    /// Tokenizes `input` and creates a context over the result.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Lex`] if the input cannot be tokenized.
    pub fn from_sql(input: &str, config: ParserConfig) -> Result<Self> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Self::new(tokens, config))
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }

    // Lookahead

    /// Returns the current token.
    #[must_use]
    pub fn current(&self) -> &Token {
        self.peek(0)
    }

    /// Returns the token `offset` positions ahead, clamped at EOF.
    #[must_use]
    pub fn peek(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + offset).min(last)]
    }

    /// Returns the kind of the current token.
    #[must_use]
    pub fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    /// Returns true if the current token is `terminal`.
    #[must_use]
    pub fn current_is(&self, terminal: impl Into<Terminal>) -> bool {
        terminal.into().matches(self.current_kind())
    }

    /// Returns true if the token after the current one is `terminal`.
    #[must_use]
    pub fn next_is(&self, terminal: impl Into<Terminal>) -> bool {
        terminal.into().matches(&self.peek(1).kind)
    }

    /// Returns true if the current token is an identifier.
    #[must_use]
    pub fn current_is_identifier(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Identifier(_))
    }

    /// Returns the number of tokens left before EOF.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.tokens.len() - 1 - self.pos
    }

    /// Returns true if all input has been consumed.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.current().is_eof()
    }

    // Cursor

    /// Saves the cursor position.
    #[must_use]
    pub const fn snapshot(&self) -> Snapshot {
        Snapshot(self.pos)
    }

    /// Moves the cursor back to a saved position.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.pos = snapshot.0;
    }

    /// Returns the current token and moves past it. EOF is never passed.
    pub fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if !token.is_eof() {
            self.pos += 1;
        }
        token
    }

    // Errors

    /// Builds an "unexpected token" error at the current token.
    #[must_use]
    pub fn unexpected<S: AsRef<str>>(&self, expected: &[S]) -> ParseError {
        let token = self.current();
        ParseError::unexpected(
            expected.iter().map(|e| String::from(e.as_ref())).collect(),
            token.kind.clone(),
            token.span,
        )
    }

    /// Builds an "unsupported construct" error at the current token.
    #[must_use]
    pub fn unsupported(&self, construct: &'static str) -> ParseError {
        let span = self.current().span;
        debug!(construct, offset = span.start, "rejecting unsupported construct");
        ParseError::unsupported(construct, span)
    }

    // Consuming

    /// Consumes `terminal` or fails.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnexpectedToken`] if the current token differs.
    pub fn consume(&mut self, terminal: impl Into<Terminal>) -> Result<Token> {
        let terminal = terminal.into();
        if terminal.matches(self.current_kind()) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&[terminal.as_str()]))
        }
    }

    /// Consumes every terminal of `sequence` in order or fails at the first
    /// one that does not match.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnexpectedToken`] naming the missing terminal.
    pub fn consume_all(&mut self, sequence: &[Terminal]) -> Result<()> {
        for terminal in sequence {
            self.consume(*terminal)?;
        }
        Ok(())
    }

    /// Consumes `terminal` if it is the current token.
    pub fn try_consume(&mut self, terminal: impl Into<Terminal>) -> bool {
        if terminal.into().matches(self.current_kind()) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes `sequence` only if every terminal of it matches.
    pub fn try_consume_all(&mut self, sequence: &[Terminal]) -> bool {
        let matched = sequence
            .iter()
            .enumerate()
            .all(|(i, terminal)| terminal.matches(&self.peek(i).kind));
        if matched {
            self.pos = (self.pos + sequence.len()).min(self.tokens.len() - 1);
        }
        matched
    }

    /// Consumes an identifier, returning its unquoted name.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnexpectedToken`] if the current token is not an
    /// identifier.
    pub fn consume_identifier(&mut self) -> Result<String> {
        self.opt_identifier()
            .ok_or_else(|| self.unexpected(&["identifier"]))
    }

    /// Consumes an identifier if there is one.
    pub fn opt_identifier(&mut self) -> Option<String> {
        let TokenKind::Identifier(name) = self.current_kind() else {
            return None;
        };
        let name = name.clone();
        self.advance();
        Some(name)
    }

    /// Consumes an identifier spelled `word` (ASCII case-insensitive), for
    /// contextual words such as `ROWID` that are not reserved.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnexpectedToken`] if the word is missing.
    pub fn consume_word(&mut self, word: &str) -> Result<()> {
        match self.current_kind() {
            TokenKind::Identifier(name) if name.eq_ignore_ascii_case(word) => {
                self.advance();
                Ok(())
            }
            _ => Err(self.unexpected(&[word])),
        }
    }

    /// Parses `[schema .] name`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnexpectedToken`] if either name is missing.
    pub fn qualified_name(&mut self) -> Result<(Option<String>, String)> {
        let first = self.consume_identifier()?;
        if self.try_consume(Operator::Dot) {
            let name = self.consume_identifier()?;
            Ok((Some(first), name))
        } else {
            Ok((None, first))
        }
    }

    // Combinators

    /// Parses a nested grammar rule under the depth guard.
    ///
    /// # Errors
    ///
    /// Returns whatever the rule returns, or [`ParseError::TooDeep`].
    pub fn parse<T: Node>(&mut self) -> Result<T> {
        self.nested(T::parse)
    }

    /// Runs `rule` one nesting level deeper.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::TooDeep`] when the configured depth is exceeded,
    /// otherwise whatever `rule` returns.
    pub fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= self.config.max_depth {
            return Err(ParseError::TooDeep {
                limit: self.config.max_depth,
                span: self.current().span,
            });
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    /// Parses `( rule )`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnexpectedToken`] if a parenthesis is missing, or
    /// whatever `rule` returns.
    pub fn parenthesized<T>(&mut self, rule: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.consume(Operator::LeftParen)?;
        let value = rule(self)?;
        self.consume(Operator::RightParen)?;
        Ok(value)
    }

    /// Parses one or more `element`s separated by `separator`.
    ///
    /// # Errors
    ///
    /// Returns the first element failure.
    pub fn parse_list<T, F>(&mut self, separator: impl Into<Terminal>, mut element: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        let separator = separator.into();
        let mut items = vec![element(self)?];
        while self.try_consume(separator) {
            items.push(element(self)?);
        }
        Ok(items)
    }

    /// Parses `( identifier [, identifier]* )`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnexpectedToken`] on malformed lists.
    pub fn identifier_list(&mut self) -> Result<Vec<String>> {
        self.parenthesized(|ctx| ctx.parse_list(Operator::Comma, Self::consume_identifier))
    }

    /// Appends a separated list to `out`, returning whether anything matched.
    ///
    /// When the first element fails without consuming anything the cursor is
    /// restored and `false` is returned so the caller can try another
    /// production. Failures after the first element are fatal.
    ///
    /// # Errors
    ///
    /// Returns any element failure other than a mismatch on the first one.
    pub fn parse_list_into<T, F>(
        &mut self,
        out: &mut Vec<T>,
        separator: impl Into<Terminal>,
        mut element: F,
    ) -> Result<bool>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        let start = self.snapshot();
        let probe = self.current().span.start;
        match element(self) {
            Ok(first) => out.push(first),
            Err(err) if err.is_mismatch_at(probe) => {
                trace!(offset = probe, "list did not start here, backtracking");
                self.restore(start);
                return Ok(false);
            }
            Err(err) => return Err(err),
        }

        let separator = separator.into();
        while self.try_consume(separator) {
            out.push(element(self)?);
        }
        Ok(true)
    }

    /// Tries each production in order and returns the first that succeeds.
    ///
    /// A production that fails before consuming anything is abandoned and the
    /// next one is tried from the same position. Any other failure is fatal.
    /// If nothing matches, the expected sets of all productions are merged.
    ///
    /// # Errors
    ///
    /// Returns the first fatal failure or the merged mismatch.
    pub fn alternatives<T>(&mut self, productions: &[fn(&mut Self) -> Result<T>]) -> Result<T> {
        let start = self.snapshot();
        let probe = self.current().span.start;
        let mut expected: Vec<String> = Vec::new();

        for production in productions {
            match production(self) {
                Ok(node) => return Ok(node),
                Err(err) if err.is_mismatch_at(probe) => {
                    trace!(offset = probe, "alternative did not match, backtracking");
                    self.restore(start);
                    for item in err.expected() {
                        if !expected.contains(item) {
                            expected.push(item.clone());
                        }
                    }
                }
                Err(err) => return Err(err),
            }
        }

        Err(self.unexpected(expected.as_slice()))
    }

    /// Accepts an optional trailing `;` and requires end of input.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnexpectedToken`] if input remains.
    pub fn expect_end(&mut self) -> Result<()> {
        self.try_consume(Operator::Semicolon);
        if self.at_end() {
            Ok(())
        } else {
            Err(self.unexpected(&["end of input"]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Keyword;

    fn ctx(sql: &str) -> ParserContext {
        ParserContext::from_sql(sql, ParserConfig::default()).unwrap()
    }

    #[test]
    fn test_peek_is_clamped_at_eof() {
        let ctx = ctx("a");
        assert_eq!(ctx.current().as_identifier(), Some("a"));
        assert!(ctx.peek(1).is_eof());
        assert!(ctx.peek(10).is_eof());
    }

    #[test]
    fn test_advance_stops_at_eof() {
        let mut ctx = ctx("a");
        ctx.advance();
        assert!(ctx.advance().is_eof());
        assert!(ctx.at_end());
    }

    #[test]
    fn test_consume_reports_expected() {
        let mut ctx = ctx("RENAME x");
        let err = ctx.consume(Keyword::Add).unwrap_err();
        assert_eq!(err.expected(), ["ADD"]);
        assert!(err.is_mismatch_at(0));
        assert!(ctx.consume(Keyword::Rename).is_ok());
    }

    #[test]
    fn test_try_consume_all_is_atomic() {
        let mut ctx = ctx("IF NOT x");
        let sequence = [
            Terminal::from(Keyword::If),
            Terminal::from(Keyword::Not),
            Terminal::from(Keyword::Exists),
        ];
        assert!(!ctx.try_consume_all(&sequence));
        assert!(ctx.current_is(Keyword::If));

        let mut ctx = self::ctx("IF NOT EXISTS x");
        assert!(ctx.try_consume_all(&sequence));
        assert_eq!(ctx.current().as_identifier(), Some("x"));
    }

    #[test]
    fn test_consume_all_fails_on_partial_match() {
        let mut ctx = ctx("ALTER VIEW");
        let err = ctx
            .consume_all(&[Keyword::Alter.into(), Keyword::Table.into()])
            .unwrap_err();
        assert_eq!(err.expected(), ["TABLE"]);
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(
            ctx("main.users").qualified_name().unwrap(),
            (Some(String::from("main")), String::from("users"))
        );
        assert_eq!(
            ctx("users WHERE").qualified_name().unwrap(),
            (None, String::from("users"))
        );
        assert!(ctx("main.").qualified_name().is_err());
    }

    #[test]
    fn test_opt_identifier() {
        let mut ctx = ctx("SELECT");
        assert_eq!(ctx.opt_identifier(), None);
        assert!(ctx.current_is(Keyword::Select));
    }

    #[test]
    fn test_parse_list() {
        let mut ctx = ctx("a, b, c)");
        let names = ctx
            .parse_list(Operator::Comma, ParserContext::consume_identifier)
            .unwrap();
        assert_eq!(names, ["a", "b", "c"]);
        assert!(ctx.current_is(Operator::RightParen));
    }

    #[test]
    fn test_parse_list_into_restores_on_mismatch() {
        let mut ctx = ctx("PRIMARY KEY");
        let mut names = Vec::new();
        let matched = ctx
            .parse_list_into(&mut names, Operator::Comma, ParserContext::consume_identifier)
            .unwrap();
        assert!(!matched);
        assert!(names.is_empty());
        assert!(ctx.current_is(Keyword::Primary));
    }

    #[test]
    fn test_parse_list_into_fails_after_first_element() {
        let mut ctx = ctx("a, PRIMARY");
        let mut names = Vec::new();
        assert!(ctx
            .parse_list_into(&mut names, Operator::Comma, ParserContext::consume_identifier)
            .is_err());
    }

    fn rename(ctx: &mut ParserContext) -> Result<&'static str> {
        ctx.consume(Keyword::Rename)?;
        ctx.consume(Keyword::To)?;
        Ok("rename")
    }

    fn add(ctx: &mut ParserContext) -> Result<&'static str> {
        ctx.consume(Keyword::Add)?;
        Ok("add")
    }

    #[test]
    fn test_alternatives_picks_matching_production() {
        let mut ctx = ctx("ADD");
        assert_eq!(ctx.alternatives(&[rename, add]).unwrap(), "add");
        assert!(ctx.at_end());
    }

    #[test]
    fn test_alternatives_merges_expected_sets() {
        let mut ctx = ctx("DROP");
        let err = ctx.alternatives(&[rename, add]).unwrap_err();
        assert_eq!(err.expected(), ["RENAME", "ADD"]);
        assert!(ctx.current_is(Keyword::Drop));
    }

    #[test]
    fn test_alternatives_do_not_backtrack_after_commitment() {
        let mut ctx = ctx("RENAME x");
        let err = ctx.alternatives(&[rename, add]).unwrap_err();
        assert_eq!(err.expected(), ["TO"]);
        assert_eq!(err.span().start, 7);
    }

    #[test]
    fn test_nested_depth_limit() {
        let mut ctx = ParserContext::from_sql("x", ParserConfig::new().with_max_depth(2)).unwrap();
        let ok = ctx.nested(|c| c.nested(|_| Ok(())));
        assert!(ok.is_ok());
        let err = ctx.nested(|c| c.nested(|c| c.nested(|_| Ok(())))).unwrap_err();
        assert!(matches!(err, ParseError::TooDeep { limit: 2, .. }));
    }

    #[test]
    fn test_expect_end_accepts_semicolon() {
        let mut ctx = ctx(";");
        assert!(ctx.expect_end().is_ok());
        let mut ctx = self::ctx("; x");
        assert!(ctx.expect_end().is_err());
    }

    #[test]
    fn test_new_appends_missing_eof() {
        let ctx = ParserContext::new(Vec::new(), ParserConfig::default());
        assert!(ctx.at_end());
    }
}
