//! Diagnostic reporting with source locations
//!
//! Syntax errors carry the source text and a labelled span so `miette` can
//! render them with context.

use crate::common::Span;
use miette::{Diagnostic, NamedSource, SourceSpan};
use std::sync::Arc;
use thiserror::Error;

/// Source file for error reporting
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub content: Arc<str>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Arc::from(content.into()),
        }
    }

    pub fn to_named_source(&self) -> NamedSource<String> {
        NamedSource::new(self.name.clone(), self.content.to_string())
    }
}

/// Convert our Span to miette's SourceSpan
impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        SourceSpan::new(span.start.into(), span.len())
    }
}

fn named(source: &str) -> NamedSource<String> {
    NamedSource::new("<source>", source.to_string())
}

/// Errors produced while turning text into expressions
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum SyntaxError {
    #[error("Invalid token `{text}`")]
    #[diagnostic(
        code(syntax::invalid_token),
        help("strings must be closed with `\"`")
    )]
    InvalidToken {
        text: String,
        #[label("not a valid token")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },

    #[error("Unexpected `)`")]
    #[diagnostic(code(syntax::unexpected_close))]
    UnexpectedCloseParen {
        #[label("no matching `(`")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },

    #[error("Unclosed list")]
    #[diagnostic(code(syntax::unclosed_list), help("add the missing `)`"))]
    UnclosedList {
        #[label("this `(` is never closed")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },

    #[error("Unexpected end of input")]
    #[diagnostic(code(syntax::unexpected_eof))]
    UnexpectedEof {
        #[label("expected an expression")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },

    #[error("Unexpected input after expression")]
    #[diagnostic(code(syntax::trailing_input))]
    TrailingInput {
        #[label("expected end of input")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },
}

impl SyntaxError {
    pub fn invalid_token(source: &str, text: &str, span: Span) -> Self {
        SyntaxError::InvalidToken {
            text: text.to_string(),
            span: span.into(),
            src: named(source),
        }
    }

    pub fn unexpected_close(source: &str, span: Span) -> Self {
        SyntaxError::UnexpectedCloseParen {
            span: span.into(),
            src: named(source),
        }
    }

    pub fn unclosed_list(source: &str, span: Span) -> Self {
        SyntaxError::UnclosedList {
            span: span.into(),
            src: named(source),
        }
    }

    pub fn unexpected_eof(source: &str, span: Span) -> Self {
        SyntaxError::UnexpectedEof {
            span: span.into(),
            src: named(source),
        }
    }

    pub fn trailing_input(source: &str, span: Span) -> Self {
        SyntaxError::TrailingInput {
            span: span.into(),
            src: named(source),
        }
    }

    /// Whether more input could complete the program (used by the REPL)
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self,
            SyntaxError::UnclosedList { .. } | SyntaxError::UnexpectedEof { .. }
        )
    }

    /// Location of the error within its source
    pub fn span(&self) -> SourceSpan {
        match self {
            SyntaxError::InvalidToken { span, .. }
            | SyntaxError::UnexpectedCloseParen { span, .. }
            | SyntaxError::UnclosedList { span, .. }
            | SyntaxError::UnexpectedEof { span, .. }
            | SyntaxError::TrailingInput { span, .. } => *span,
        }
    }

    /// Re-attach the error to a named file
    pub fn with_source(self, file: &SourceFile) -> Self {
        let src = file.to_named_source();
        match self {
            SyntaxError::InvalidToken { text, span, .. } => {
                SyntaxError::InvalidToken { text, span, src }
            }
            SyntaxError::UnexpectedCloseParen { span, .. } => {
                SyntaxError::UnexpectedCloseParen { span, src }
            }
            SyntaxError::UnclosedList { span, .. } => SyntaxError::UnclosedList { span, src },
            SyntaxError::UnexpectedEof { span, .. } => SyntaxError::UnexpectedEof { span, src },
            SyntaxError::TrailingInput { span, .. } => SyntaxError::TrailingInput { span, src },
        }
    }
}

// Source text is not compared; the same error at the same place is equal
impl PartialEq for SyntaxError {
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
            && self.span() == other.span()
            && self.to_string() == other.to_string()
    }
}
