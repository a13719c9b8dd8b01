// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Filter expression parsing and matching.
//!
//! Implements the RFC 4515 subset understood by the simulator:
//!
//! ```text
//! filter := '(' (('&'|'|') filter+ | '!' filter | test) ')'
//! test   := attr '=' value
//! ```
//!
//! Only equality tests are supported. `~=`, `<=`, and `>=` are rejected as
//! [`FilterError::Unsupported`], as is a `*` embedded in a value with other
//! characters (substring matching is unimplemented). A lone `*` value means
//! "attribute present with at least one value". Values decode `\XX` hex
//! escapes before comparison, so an escaped `\2a` is a literal asterisk.

use crate::store::Attrs;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Matches `attr op value` with a lazy attribute group so the first operator
/// found wins.
static TEST_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^(.+?)([~<>]?=)(.+)$").expect("test expression pattern is valid")
});

/// One `\XX` hex escape inside a filter value.
static UNESCAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"\\([0-9a-fA-F]{2})").expect("hex escape pattern is valid")
});

/// Failures produced by [`parse`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The text does not match the filter grammar.
    #[error("malformed filter: {0}")]
    Malformed(String),

    /// The text is grammatical but uses an unimplemented construct.
    #[error("unsupported filter construct: {0}")]
    Unsupported(String),
}

/// Parsed filter expression tree. Immutable after parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    /// True iff all children match. Always has at least one child.
    And(Vec<Expr>),
    /// True iff any child matches. Always has at least one child.
    Or(Vec<Expr>),
    /// Negates its single child.
    Not(Box<Expr>),
    /// Attribute test leaf.
    Test(Test),
}

/// Equality or presence test against one attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Test {
    /// Attribute name, looked up case-insensitively.
    pub attr: String,
    /// Comparison target.
    pub value: TestValue,
}

/// The right-hand side of a test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TestValue {
    /// `attr=*`: attribute present with at least one value.
    Present,
    /// Exact string match against the attribute's value list.
    Literal(String),
}

impl Expr {
    /// Evaluate the expression against an entry's attributes.
    ///
    /// A test against a missing attribute is false, never an error.
    pub fn matches(&self, attrs: &Attrs) -> bool {
        match self {
            Expr::And(children) => children.iter().all(|c| c.matches(attrs)),
            Expr::Or(children) => children.iter().any(|c| c.matches(attrs)),
            Expr::Not(child) => !child.matches(attrs),
            Expr::Test(test) => test.matches(attrs),
        }
    }

    /// Render a filter string that parses back to an equivalent tree.
    pub fn unparse(&self) -> String {
        match self {
            Expr::And(children) => {
                let inner: String = children.iter().map(Expr::unparse).collect();
                format!("(&{})", inner)
            }
            Expr::Or(children) => {
                let inner: String = children.iter().map(Expr::unparse).collect();
                format!("(|{})", inner)
            }
            Expr::Not(child) => format!("(!{})", child.unparse()),
            Expr::Test(test) => match &test.value {
                TestValue::Present => format!("({}=*)", test.attr),
                TestValue::Literal(value) => {
                    format!("({}={})", test.attr, escape_value(value))
                }
            },
        }
    }
}

impl Test {
    fn matches(&self, attrs: &Attrs) -> bool {
        match attrs.get(&self.attr) {
            None => false,
            Some(values) => match &self.value {
                TestValue::Present => !values.is_empty(),
                TestValue::Literal(value) => values.iter().any(|v| v == value),
            },
        }
    }
}

/// Escape the characters that are structural in filter values.
pub fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | '(' | ')' | '*' | '\0' => {
                out.push_str(&format!("\\{:02x}", c as u32));
            }
            _ => out.push(c),
        }
    }
    out
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Token<'a> {
    LParen,
    RParen,
    Amp,
    Pipe,
    Bang,
    Text(&'a str, usize),
}

/// Split the input on parens and on `&`/`|`/`!` immediately after a left
/// paren; everything else accumulates into text runs.
fn tokenize(input: &str) -> Vec<Token<'_>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            b')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            b'&' | b'|' | b'!' if matches!(tokens.last(), Some(Token::LParen)) => {
                tokens.push(match bytes[i] {
                    b'&' => Token::Amp,
                    b'|' => Token::Pipe,
                    _ => Token::Bang,
                });
                i += 1;
            }
            _ => {
                let start = i;
                while i < bytes.len() && bytes[i] != b'(' && bytes[i] != b')' {
                    i += 1;
                }
                tokens.push(Token::Text(&input[start..i], start));
            }
        }
    }

    tokens
}

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    input: &'a str,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn expect(&mut self, token: Token<'a>) -> Result<(), FilterError> {
        if self.peek() == Some(token) {
            self.advance();
            Ok(())
        } else {
            Err(FilterError::Malformed(format!(
                "unbalanced or misplaced parentheses in {:?}",
                self.input
            )))
        }
    }

    fn filter(&mut self) -> Result<Expr, FilterError> {
        self.expect(Token::LParen)?;

        let expr = match self.peek() {
            Some(Token::Amp) => {
                self.advance();
                Expr::And(self.one_plus()?)
            }
            Some(Token::Pipe) => {
                self.advance();
                Expr::Or(self.one_plus()?)
            }
            Some(Token::Bang) => {
                self.advance();
                Expr::Not(Box::new(self.filter()?))
            }
            Some(Token::Text(content, pos)) => {
                self.advance();
                Expr::Test(parse_test(content, pos)?)
            }
            _ => {
                return Err(FilterError::Malformed(format!(
                    "empty filter component in {:?}",
                    self.input
                )))
            }
        };

        self.expect(Token::RParen)?;
        Ok(expr)
    }

    fn one_plus(&mut self) -> Result<Vec<Expr>, FilterError> {
        let mut children = Vec::new();
        while self.peek() != Some(Token::RParen) && self.peek().is_some() {
            children.push(self.filter()?);
        }
        if children.is_empty() {
            return Err(FilterError::Malformed(format!(
                "operator with no operands in {:?}",
                self.input
            )));
        }
        Ok(children)
    }
}

/// Parse a filter string into an expression tree.
pub fn parse(input: &str) -> Result<Expr, FilterError> {
    let mut parser = Parser {
        tokens: tokenize(input),
        pos: 0,
        input,
    };

    let expr = parser.filter()?;
    if parser.pos != parser.tokens.len() {
        return Err(FilterError::Malformed(format!(
            "unexpected trailing input in {:?}",
            input
        )));
    }

    Ok(expr)
}

fn parse_test(content: &str, pos: usize) -> Result<Test, FilterError> {
    let caps = TEST_RE.captures(content).ok_or_else(|| {
        FilterError::Malformed(format!(
            "failed to parse filter item {:?} at position {}",
            content, pos
        ))
    })?;

    let attr = &caps[1];
    let op = &caps[2];
    let raw_value = &caps[3];

    if op != "=" {
        return Err(FilterError::Unsupported(format!(
            "operation {:?} is not supported",
            op
        )));
    }

    // Wildcard detection runs before unescaping, so `\2a` stays a literal.
    if raw_value.contains('*') && raw_value != "*" {
        return Err(FilterError::Unsupported(format!(
            "wildcard matches are not supported in {:?}",
            raw_value
        )));
    }

    let value = if raw_value == "*" {
        TestValue::Present
    } else {
        TestValue::Literal(unescape(raw_value))
    };

    Ok(Test {
        attr: attr.to_string(),
        value,
    })
}

/// Decode `\XX` hex escapes to the corresponding byte.
fn unescape(value: &str) -> String {
    UNESCAPE_RE
        .replace_all(value, |caps: &regex::Captures<'_>| {
            hex::decode(&caps[1])
                .ok()
                .and_then(|bytes| bytes.first().copied())
                .map(|b| char::from(b).to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
