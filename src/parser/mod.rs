//! Parser for Eva
//!
//! A recursive descent parser that turns a token stream into [`Expr`] trees.

use crate::ast::Expr;
use crate::common::Span;
use crate::diagnostics::SyntaxError;
use crate::lexer::{Token, TokenKind};
use crate::stack::ensure_sufficient_stack;

type Result<T> = std::result::Result<T, SyntaxError>;

/// Parse every top-level expression in the token stream
pub fn parse(tokens: &[Token], source: &str) -> Result<Vec<Expr>> {
    let mut parser = Parser::new(tokens, source);
    parser.parse_all()
}

/// Parse a whole program and wrap it in `(begin ...)`
pub fn program(tokens: &[Token], source: &str) -> Result<Expr> {
    Ok(Expr::block(parse(tokens, source)?))
}

/// Parse exactly one expression; anything after it is an error
pub fn parse_expr(tokens: &[Token], source: &str) -> Result<Expr> {
    let mut parser = Parser::new(tokens, source);
    if parser.at(TokenKind::Eof) {
        return Err(SyntaxError::unexpected_eof(source, parser.span()));
    }
    let expr = parser.parse_expr()?;
    if !parser.at(TokenKind::Eof) {
        return Err(SyntaxError::trailing_input(source, parser.span()));
    }
    Ok(expr)
}

/// Parser state
struct Parser<'a> {
    tokens: &'a [Token],
    source: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], source: &'a str) -> Self {
        Self {
            tokens,
            source,
            pos: 0,
        }
    }

    fn peek(&self) -> TokenKind {
        self.tokens
            .get(self.pos)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    fn span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| t.span)
            .unwrap_or_else(|| Span::point(self.source.len()))
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn parse_all(&mut self) -> Result<Vec<Expr>> {
        let mut exprs = Vec::new();
        while !self.at(TokenKind::Eof) {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        ensure_sufficient_stack(|| self.parse_expr_inner())
    }

    fn parse_expr_inner(&mut self) -> Result<Expr> {
        let span = self.span();
        let Some(token) = self.advance() else {
            return Err(SyntaxError::unexpected_eof(self.source, span));
        };

        match token.kind {
            TokenKind::Number => {
                // The lexer's number pattern always parses as f64
                let n = token
                    .text
                    .parse::<f64>()
                    .map_err(|_| SyntaxError::invalid_token(self.source, &token.text, span))?;
                Ok(Expr::Number(n))
            }
            TokenKind::String => Ok(Expr::Str(unescape(&token.text))),
            TokenKind::Symbol => Ok(Expr::Symbol(token.text.clone())),
            TokenKind::LParen => self.parse_list(span),
            TokenKind::RParen => Err(SyntaxError::unexpected_close(self.source, span)),
            TokenKind::Eof => {
                self.pos -= 1;
                Err(SyntaxError::unexpected_eof(self.source, span))
            }
        }
    }

    /// Parse list items after the opening paren at `open`
    fn parse_list(&mut self, open: Span) -> Result<Expr> {
        let mut items = Vec::new();
        loop {
            match self.peek() {
                TokenKind::RParen => {
                    self.advance();
                    return Ok(Expr::List(items));
                }
                TokenKind::Eof => return Err(SyntaxError::unclosed_list(self.source, open)),
                _ => items.push(self.parse_expr()?),
            }
        }
    }
}

/// Strip quotes and resolve escapes in a string token
fn unescape(text: &str) -> String {
    let inner = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
