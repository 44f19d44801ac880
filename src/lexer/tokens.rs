//! Token definitions for the Eva lexer

use crate::common::Span;
use logos::Logos;
use serde::{Deserialize, Serialize};

/// A token with its kind, span, and text
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, text: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
        }
    }
}

/// Token kinds recognized by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos, Serialize, Deserialize)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r";[^\n]*")]
pub enum TokenKind {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,

    // Literals
    #[regex(r"-?[0-9]+(\.[0-9]+)?", priority = 3)]
    Number,
    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    /// Identifiers and operator names alike: `x`, `+`, `<=`, `++`, `set`
    #[regex(r#"[^ \t\r\n\f()";0-9][^ \t\r\n\f()";]*"#)]
    Symbol,

    // Special
    Eof,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Number => "<number>",
            TokenKind::String => "<string>",
            TokenKind::Symbol => "<symbol>",
            TokenKind::Eof => "<eof>",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
