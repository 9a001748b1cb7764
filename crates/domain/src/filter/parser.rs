//! Recursive-descent parser over the token stream.

use chrono::{DateTime, FixedOffset, NaiveDate};

use super::lexer::{Lexer, Spanned, Token};
use super::{Attribute, Comparison, Filter, FilterError, Literal, Op, Operand};

const PROPERTY: &str = "property";

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Result<Self, FilterError> {
        Ok(Self {
            tokens: Lexer::new(input).tokenize()?,
            pos: 0,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn bump(&mut self, expected: &'static str) -> Result<Spanned, FilterError> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(FilterError::UnexpectedEnd { expected })?;
        self.pos += 1;
        Ok(token)
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if matches!(self.peek(), Some(Token::Ident(word)) if word == keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn finish(&self) -> Result<(), FilterError> {
        match self.tokens.get(self.pos) {
            None => Ok(()),
            Some((pos, token)) => Err(FilterError::UnexpectedToken {
                expected: "end of input",
                found: token.describe(),
                pos: *pos,
            }),
        }
    }

    fn filter(&mut self) -> Result<Filter, FilterError> {
        let mut left = self.and_expr()?;
        while self.eat_keyword("or") {
            let right = self.and_expr()?;
            left = Filter::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<Filter, FilterError> {
        let mut left = self.comparison()?;
        while self.eat_keyword("and") {
            let right = self.comparison()?;
            left = Filter::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn comparison(&mut self) -> Result<Filter, FilterError> {
        if self.peek() == Some(&Token::LParen) {
            self.pos += 1;
            let inner = self.filter()?;
            self.expect(&Token::RParen, "`)`")?;
            return Ok(inner);
        }

        let start = self
            .tokens
            .get(self.pos)
            .map_or(0, |(pos, _)| *pos);
        let left = self.operand()?;
        let op = self.op()?;
        let right = self.operand()?;

        match (&left, &right) {
            (Operand::Attribute(_), Operand::Literal(_))
            | (Operand::Literal(_), Operand::Attribute(_)) => {
                Ok(Filter::Comparison(Comparison { left, op, right }))
            }
            _ => Err(FilterError::NoSingleAttribute { pos: start }),
        }
    }

    fn expect(&mut self, token: &Token, expected: &'static str) -> Result<(), FilterError> {
        let (pos, found) = self.bump(expected)?;
        if &found == token {
            Ok(())
        } else {
            Err(FilterError::UnexpectedToken {
                expected,
                found: found.describe(),
                pos,
            })
        }
    }

    fn op(&mut self) -> Result<Op, FilterError> {
        const EXPECTED: &str = "comparison operator";
        let (pos, token) = self.bump(EXPECTED)?;
        match token {
            Token::Op("=") => Ok(Op::Eq),
            Token::Op("!=") => Ok(Op::Ne),
            Token::Op("<") => Ok(Op::Lt),
            Token::Op("<=") => Ok(Op::Le),
            Token::Op(">") => Ok(Op::Gt),
            Token::Op(">=") => Ok(Op::Ge),
            other => Err(FilterError::UnexpectedToken {
                expected: EXPECTED,
                found: other.describe(),
                pos,
            }),
        }
    }

    fn operand(&mut self) -> Result<Operand, FilterError> {
        const EXPECTED: &str = "attribute or value";
        let (pos, token) = self.bump(EXPECTED)?;
        let operand = match token {
            Token::Int(text) => Operand::Literal(Literal::Int(to_int(&text)?)),
            Token::Str(s) => Operand::Literal(Literal::Str(s)),
            Token::Date(text) => {
                let at = to_date(&text)?;
                Operand::Literal(Literal::Date { text, at })
            }
            Token::Ident(word) if word == "true" => Operand::Literal(Literal::Bool(true)),
            Token::Ident(word) if word == "false" => Operand::Literal(Literal::Bool(false)),
            Token::Ident(word) if word == PROPERTY && self.peek() == Some(&Token::LBracket) => {
                self.pos += 1;
                let key = match self.bump("property key")? {
                    (_, Token::Str(key)) => key,
                    (key_pos, other) => return Err(unexpected("property key", &other, key_pos)),
                };
                self.expect(&Token::RBracket, "`]`")?;
                Operand::Attribute(Attribute::Property(key))
            }
            Token::Ident(word) if word != "and" && word != "or" => {
                Operand::Attribute(Attribute::Name(word))
            }
            other => {
                return Err(FilterError::UnexpectedToken {
                    expected: EXPECTED,
                    found: other.describe(),
                    pos,
                });
            }
        };
        Ok(operand)
    }

    /// Parse a single token of the given shape covering the whole input.
    fn single<T>(
        mut self,
        expected: &'static str,
        convert: impl FnOnce(Token, usize) -> Result<T, FilterError>,
    ) -> Result<T, FilterError> {
        let (pos, token) = self.bump(expected)?;
        let value = convert(token, pos)?;
        self.finish()?;
        Ok(value)
    }
}

fn to_int(text: &str) -> Result<i64, FilterError> {
    text.parse()
        .map_err(|_| FilterError::IntegerOutOfRange(text.to_string()))
}

fn to_date(text: &str) -> Result<DateTime<FixedOffset>, FilterError> {
    let invalid = |reason: String| FilterError::InvalidDate {
        text: text.to_string(),
        reason,
    };
    if text.contains('T') {
        DateTime::parse_from_rfc3339(text).map_err(|err| invalid(err.to_string()))
    } else {
        let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map_err(|err| invalid(err.to_string()))?;
        date.and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc().fixed_offset())
            .ok_or_else(|| invalid("no midnight on this date".to_string()))
    }
}

fn unexpected(expected: &'static str, token: &Token, pos: usize) -> FilterError {
    FilterError::UnexpectedToken {
        expected,
        found: token.describe(),
        pos,
    }
}

pub(super) fn parse_filter(input: &str) -> Result<Filter, FilterError> {
    let mut parser = Parser::new(input)?;
    let filter = parser.filter()?;
    parser.finish()?;
    Ok(filter)
}

/// Parse an integer literal such as `0`, `01` or `9999`.
///
/// # Errors
///
/// Returns [`FilterError`] if `input` is not exactly one integer.
pub fn parse_int(input: &str) -> Result<i64, FilterError> {
    Parser::new(input)?.single("integer", |token, pos| match token {
        Token::Int(text) => to_int(&text),
        other => Err(unexpected("integer", &other, pos)),
    })
}

/// Parse `true` or `false`.
///
/// # Errors
///
/// Returns [`FilterError`] if `input` is not exactly one boolean.
pub fn parse_bool(input: &str) -> Result<bool, FilterError> {
    Parser::new(input)?.single("boolean", |token, pos| match token {
        Token::Ident(word) if word == "true" => Ok(true),
        Token::Ident(word) if word == "false" => Ok(false),
        other => Err(unexpected("boolean", &other, pos)),
    })
}

/// Parse a single- or double-quoted string, resolving escapes.
///
/// # Errors
///
/// Returns [`FilterError`] if `input` is not exactly one string.
pub fn parse_string(input: &str) -> Result<String, FilterError> {
    Parser::new(input)?.single("string", |token, pos| match token {
        Token::Str(s) => Ok(s),
        other => Err(unexpected("string", &other, pos)),
    })
}

/// Parse a date (`YYYY-MM-DD`) or date-time (RFC 3339).
///
/// # Errors
///
/// Returns [`FilterError::InvalidDate`] for anything that is not a valid date.
pub fn parse_date(input: &str) -> Result<DateTime<FixedOffset>, FilterError> {
    Parser::new(input)?.single("date", |token, pos| match token {
        Token::Date(text) => to_date(&text),
        Token::Int(text) => Err(FilterError::InvalidDate {
            text,
            reason: "expected YYYY-MM-DD".to_string(),
        }),
        other => Err(unexpected("date", &other, pos)),
    })
}
