use crate::position::Span;
use std::fmt;
use strum_macros::Display;

#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenKind {
    Operator, LogicalOp, CompOp,
    Number, String,
    Paren, Bracket, Brace,
    Ident, Keyword, Symbol,
    Comment,
    EOF,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Text(String),
    Empty,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(x) => write!(f, "{}", x),
            Literal::Text(x) => write!(f, "{:?}", x),
            Literal::Empty => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: Literal,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, literal: Literal, span: Span) -> Token {
        Token {
            kind,
            literal,
            span,
        }
    }

    /// True when this token is of `kind` and its text literal is `text`.
    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text() == Some(text)
    }

    pub fn text(&self) -> Option<&str> {
        match &self.literal {
            Literal::Text(x) => Some(x.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} [{}: {}]",
            self.span.left.line + 1,
            self.span.left.column + 1,
            self.kind,
            self.literal
        )
    }
}
