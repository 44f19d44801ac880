//! Lexer for Eva source text
//!
//! Produces a flat token stream terminated by an `Eof` token.

mod tokens;

pub use tokens::{Token, TokenKind};

use logos::Logos;

use crate::common::Span;
use crate::diagnostics::SyntaxError;

/// Tokenize `source`.
///
/// The returned stream always ends with an `Eof` token whose span sits at the
/// end of the input.
pub fn lex(source: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::from(lexer.span());
        match result {
            Ok(kind) => tokens.push(Token::new(kind, span, lexer.slice())),
            Err(()) => {
                return Err(SyntaxError::invalid_token(source, lexer.slice(), span));
            }
        }
    }

    tokens.push(Token::new(TokenKind::Eof, Span::point(source.len()), ""));
    tracing::trace!("lexed {} tokens", tokens.len());
    Ok(tokens)
}
