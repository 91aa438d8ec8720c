//! SQL Tokenizer implementation.

use super::{Keyword, Operator, Span, Token, TokenKind};
use crate::error::{ParseError, Result};

/// A lexer that tokenizes SQL input.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Advances past `c` if it is the current character.
    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Advances while `pred` holds for the current character.
    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let from = self.pos;
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
        self.pos - from
    }

    /// Skips whitespace and comments.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.eat_while(char::is_whitespace);

            // -- line comment
            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                self.eat_while(|c| c != '\n');
                continue;
            }

            // /* block comment */, unterminated runs to end of input
            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.advance();
                self.advance();
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        None => break,
                        _ => {}
                    }
                }
                continue;
            }

            break;
        }
    }

    /// Creates a span from start to current position.
    const fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    /// Creates a token with the current span and lexeme.
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, &self.input[self.start..self.pos], self.make_span())
    }

    fn operator(&self, op: Operator) -> Result<Token> {
        Ok(self.make_token(TokenKind::Operator(op)))
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T> {
        Err(ParseError::lex(message, self.make_span()))
    }

    /// Scans an identifier or keyword.
    fn scan_identifier(&mut self) -> Token {
        self.eat_while(is_identifier_char);
        let text = &self.input[self.start..self.pos];

        match Keyword::from_str(text) {
            Some(keyword) => self.make_token(TokenKind::Keyword(keyword)),
            None => self.make_token(TokenKind::Identifier(String::from(text))),
        }
    }

    /// Scans a quoted identifier: `"name"`, `` `name` `` or `[name]`.
    ///
    /// A doubled closing quote is an escaped quote; brackets have no escape.
    fn scan_quoted_identifier(&mut self, close: char) -> Result<Token> {
        let escapable = close != ']';
        let mut value = String::new();

        loop {
            match self.advance() {
                Some(c) if c == close => {
                    if escapable && self.peek() == Some(close) {
                        self.advance();
                        value.push(close);
                    } else {
                        break;
                    }
                }
                Some(c) => value.push(c),
                None => return self.error("unterminated quoted identifier"),
            }
        }

        Ok(self.make_token(TokenKind::Identifier(value)))
    }

    /// Scans a numeric literal, keeping its text as written.
    fn scan_number(&mut self) -> Result<Token> {
        let first = self.peek();
        if first == Some('0') && matches!(self.peek_next(), Some('x' | 'X')) {
            self.advance();
            self.advance();
            if self.eat_while(|c| c.is_ascii_hexdigit()) == 0 {
                return self.error("malformed hexadecimal literal");
            }
        } else {
            self.eat_while(|c| c.is_ascii_digit());
            if self.eat('.') {
                self.eat_while(|c| c.is_ascii_digit());
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                self.advance();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.advance();
                }
                if self.eat_while(|c| c.is_ascii_digit()) == 0 {
                    return self.error("malformed exponent in numeric literal");
                }
            }
        }

        if self.peek().is_some_and(is_identifier_char) {
            self.eat_while(is_identifier_char);
            return self.error("malformed numeric literal");
        }

        let text = &self.input[self.start..self.pos];
        Ok(self.make_token(TokenKind::Number(String::from(text))))
    }

    /// Scans a string literal. The opening quote has been consumed.
    fn scan_string(&mut self) -> Result<Token> {
        let mut value = String::new();

        loop {
            match self.advance() {
                Some('\'') => {
                    if self.eat('\'') {
                        value.push('\'');
                    } else {
                        break;
                    }
                }
                Some(c) => value.push(c),
                None => return self.error("unterminated string literal"),
            }
        }

        Ok(self.make_token(TokenKind::String(value)))
    }

    /// Scans a blob literal. `X'` has been consumed.
    fn scan_blob(&mut self) -> Result<Token> {
        let content_start = self.pos;

        loop {
            match self.advance() {
                Some('\'') => break,
                Some(c) if c.is_ascii_hexdigit() => {}
                Some(_) => {
                    self.eat_while(|c| c != '\'');
                    self.advance();
                    return self.error("invalid character in blob literal");
                }
                None => return self.error("unterminated blob literal"),
            }
        }

        let hex = &self.input[content_start..self.pos - 1];
        if hex.len() % 2 != 0 {
            return self.error("odd number of hex digits in blob literal");
        }

        let bytes = hex
            .as_bytes()
            .chunks(2)
            .map(|pair| (hex_value(pair[0]) << 4) | hex_value(pair[1]))
            .collect();
        Ok(self.make_token(TokenKind::Blob(bytes)))
    }

    /// Scans a bind parameter. The sigil has been consumed.
    fn scan_parameter(&mut self, sigil: char) -> Result<Token> {
        if sigil == '?' {
            self.eat_while(|c| c.is_ascii_digit());
        } else if self.eat_while(|c| c.is_alphanumeric() || c == '_') == 0 {
            return self.error(format!("parameter name expected after '{sigil}'"));
        }

        let text = &self.input[self.start..self.pos];
        Ok(self.make_token(TokenKind::Parameter(String::from(text))))
    }

    /// Scans the next token.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Lex`] for malformed literals and characters that
    /// cannot start a token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();
        self.start = self.pos;

        let Some(c) = self.advance() else {
            return Ok(self.make_token(TokenKind::Eof));
        };

        match c {
            // Single-character tokens
            '(' => self.operator(Operator::LeftParen),
            ')' => self.operator(Operator::RightParen),
            ',' => self.operator(Operator::Comma),
            ';' => self.operator(Operator::Semicolon),
            '+' => self.operator(Operator::Plus),
            '-' => self.operator(Operator::Minus),
            '*' => self.operator(Operator::Star),
            '/' => self.operator(Operator::Slash),
            '%' => self.operator(Operator::Percent),
            '~' => self.operator(Operator::BitNot),
            '&' => self.operator(Operator::BitAnd),

            // Potentially multi-character tokens
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                self.pos = self.start;
                self.scan_number()
            }
            '.' => self.operator(Operator::Dot),
            '=' => {
                self.eat('=');
                self.operator(Operator::Eq)
            }
            '<' => {
                if self.eat('=') {
                    self.operator(Operator::LtEq)
                } else if self.eat('>') {
                    self.operator(Operator::NotEq)
                } else if self.eat('<') {
                    self.operator(Operator::LeftShift)
                } else {
                    self.operator(Operator::Lt)
                }
            }
            '>' => {
                if self.eat('=') {
                    self.operator(Operator::GtEq)
                } else if self.eat('>') {
                    self.operator(Operator::RightShift)
                } else {
                    self.operator(Operator::Gt)
                }
            }
            '!' => {
                if self.eat('=') {
                    self.operator(Operator::NotEq)
                } else {
                    self.error("unexpected character '!'")
                }
            }
            '|' => {
                if self.eat('|') {
                    self.operator(Operator::Concat)
                } else {
                    self.operator(Operator::BitOr)
                }
            }

            // Literals
            '\'' => self.scan_string(),
            'X' | 'x' if self.peek() == Some('\'') => {
                self.advance();
                self.scan_blob()
            }
            c if c.is_ascii_digit() => {
                self.pos = self.start;
                self.scan_number()
            }

            // Quoted identifiers
            '"' => self.scan_quoted_identifier('"'),
            '`' => self.scan_quoted_identifier('`'),
            '[' => self.scan_quoted_identifier(']'),

            // Parameters
            '?' | ':' | '@' | '$' => self.scan_parameter(c),

            // Identifiers and keywords
            c if c.is_alphabetic() || c == '_' => Ok(self.scan_identifier()),

            _ => self.error(format!("unexpected character '{c}'")),
        }
    }

    /// Tokenizes the entire input. The result always ends with one EOF token.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError::Lex`] encountered.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

const fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}
