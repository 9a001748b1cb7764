//! CIMI `$filter` expressions.
//!
//! ```text
//! filter     := and_expr ("or" and_expr)*
//! and_expr   := comparison ("and" comparison)*
//! comparison := "(" filter ")" | attribute op literal | literal op attribute
//! attribute  := name | "property" "[" string "]"
//! op         := "=" | "!=" | "<" | "<=" | ">" | ">="
//! literal    := integer | string | date | "true" | "false"
//! ```
//!
//! A parsed [`Filter`] prints back in canonical form, which is what gets
//! sent to the server.

mod lexer;
mod parser;

use std::fmt;

use chrono::{DateTime, FixedOffset};

pub use parser::{parse_bool, parse_date, parse_int, parse_string};

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Op {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// Left- or right-hand side naming a resource attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    Name(String),
    /// `property['key']`
    Property(String),
}

/// Literal value compared against an attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Bool(bool),
    Str(String),
    /// Original text plus the instant it denotes. Date-only values are
    /// midnight UTC.
    Date {
        text: String,
        at: DateTime<FixedOffset>,
    },
}

/// One side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Attribute(Attribute),
    Literal(Literal),
}

/// `attribute op literal`, in either order.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub left: Operand,
    pub op: Op,
    pub right: Operand,
}

impl Comparison {
    /// The attribute side of the comparison.
    #[must_use]
    pub fn attribute(&self) -> Option<&Attribute> {
        match (&self.left, &self.right) {
            (Operand::Attribute(attr), _) | (_, Operand::Attribute(attr)) => Some(attr),
            (Operand::Literal(_), Operand::Literal(_)) => None,
        }
    }
}

/// A parsed filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Comparison(Comparison),
    And(Box<Filter>, Box<Filter>),
    Or(Box<Filter>, Box<Filter>),
}

impl Filter {
    /// Parse a complete filter expression.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] describing the first offending token.
    pub fn parse(input: &str) -> Result<Self, FilterError> {
        parser::parse_filter(input)
    }

    /// Number of comparisons in the expression.
    #[must_use]
    pub fn comparison_count(&self) -> usize {
        match self {
            Self::Comparison(_) => 1,
            Self::And(a, b) | Self::Or(a, b) => a.comparison_count() + b.comparison_count(),
        }
    }
}

/// Why a filter (or a single literal) failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("unexpected character `{ch}` at {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("unterminated string starting at {pos}")]
    UnterminatedString { pos: usize },

    #[error("expected {expected}, found {found} at {pos}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        pos: usize,
    },

    #[error("expected {expected}, found end of input")]
    UnexpectedEnd { expected: &'static str },

    #[error("integer `{0}` out of range")]
    IntegerOutOfRange(String),

    #[error("invalid date `{text}`: {reason}")]
    InvalidDate { text: String, reason: String },

    #[error("comparison at {pos} needs exactly one attribute")]
    NoSingleAttribute { pos: usize },
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Property(key) => write!(f, "property[{}]", quote(key)),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Str(s) => f.write_str(&quote(s)),
            Self::Date { text, .. } => f.write_str(text),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute(attr) => attr.fmt(f),
            Self::Literal(lit) => lit.fmt(f),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.left, self.op.as_str(), self.right)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comparison(c) => c.fmt(f),
            Self::Or(a, b) => write!(f, "{a} or {b}"),
            Self::And(a, b) => {
                for (i, side) in [a, b].into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(" and ")?;
                    }
                    if matches!(**side, Self::Or(..)) {
                        write!(f, "({side})")?;
                    } else {
                        write!(f, "{side}")?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Single-quote `s`, escaping backslashes and single quotes.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}
