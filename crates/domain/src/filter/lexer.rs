//! Tokenizer for `$filter` expressions.

use std::iter::Peekable;
use std::str::CharIndices;

use super::FilterError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    LParen,
    RParen,
    LBracket,
    RBracket,
    Op(&'static str),
    Ident(String),
    Str(String),
    /// A run of digits only.
    Int(String),
    /// A run starting with a digit that contains date/time punctuation.
    Date(String),
}

impl Token {
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::LParen => "`(`".to_string(),
            Self::RParen => "`)`".to_string(),
            Self::LBracket => "`[`".to_string(),
            Self::RBracket => "`]`".to_string(),
            Self::Op(op) => format!("`{op}`"),
            Self::Ident(name) => format!("`{name}`"),
            Self::Str(_) => "string".to_string(),
            Self::Int(text) | Self::Date(text) => format!("`{text}`"),
        }
    }
}

/// A token and the byte offset it starts at.
pub(crate) type Spanned = (usize, Token);

pub(crate) struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

fn is_date_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '-' | ':' | 'T' | '.' | 'Z' | '+')
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// Tokenize the whole input.
    pub(crate) fn tokenize(mut self) -> Result<Vec<Spanned>, FilterError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Option<Spanned>, FilterError> {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}

        let Some((pos, c)) = self.chars.next() else {
            return Ok(None);
        };

        let token = match c {
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            '=' => Token::Op("="),
            '!' => {
                if self.chars.next_if(|(_, c)| *c == '=').is_some() {
                    Token::Op("!=")
                } else {
                    return Err(FilterError::UnexpectedChar { ch: c, pos });
                }
            }
            '<' | '>' => {
                let eq = self.chars.next_if(|(_, c)| *c == '=').is_some();
                Token::Op(match (c, eq) {
                    ('<', false) => "<",
                    ('<', true) => "<=",
                    (_, false) => ">",
                    (_, true) => ">=",
                })
            }
            '\'' | '"' => Token::Str(self.read_string(c, pos)?),
            c if c.is_ascii_digit() => {
                let end = self.consume_while(is_date_char);
                let text = &self.input[pos..end];
                if text.bytes().all(|b| b.is_ascii_digit()) {
                    Token::Int(text.to_string())
                } else {
                    Token::Date(text.to_string())
                }
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let end = self.consume_while(|c| c.is_ascii_alphanumeric() || c == '_');
                Token::Ident(self.input[pos..end].to_string())
            }
            other => return Err(FilterError::UnexpectedChar { ch: other, pos }),
        };
        Ok(Some((pos, token)))
    }

    /// Consume characters matching `pred`; returns the end byte offset.
    fn consume_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        while self.chars.next_if(|(_, c)| pred(*c)).is_some() {}
        self.chars.peek().map_or(self.input.len(), |(i, _)| *i)
    }

    /// Read a quoted string; the opening quote is already consumed.
    ///
    /// A backslash makes the next character literal, so `\\` is a backslash
    /// and `\'` (or `\"`) is the quote itself.
    fn read_string(&mut self, quote: char, start: usize) -> Result<String, FilterError> {
        let mut out = String::new();
        loop {
            match self.chars.next() {
                None => return Err(FilterError::UnterminatedString { pos: start }),
                Some((_, c)) if c == quote => return Ok(out),
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, escaped)) => out.push(escaped),
                    None => return Err(FilterError::UnterminatedString { pos: start }),
                },
                Some((_, c)) => out.push(c),
            }
        }
    }
}
