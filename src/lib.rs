//! Eva Programming Language
//!
//! A minimal S-expression language evaluated by walking the tree:
//! - Lexically scoped closures over chained environments
//! - Classes, instances and modules that are themselves environments
//! - Syntactic sugar (`def`, `switch`, `for`, `++`, `--`, `+=`, `-=`) rewritten to core forms
//!
//! # Architecture
//!
//! ```text
//! Source → Lexer → Parser → Expr → Forms → Interpreter
//!                                    ↑
//!                               Transformer
//! ```
//!
//! # Example
//!
//! ```eva
//! (class Point null
//!   (begin
//!     (def constructor (this x y)
//!       (begin
//!         (set (prop this x) x)
//!         (set (prop this y) y)))
//!     (def calc (this)
//!       (+ (prop this x) (prop this y)))))
//!
//! (var p (new Point 10 20))
//! ((prop p calc) p)
//! ```

pub mod ast;
pub mod common;
pub mod config;
pub mod diagnostics;
pub mod forms;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod stack;
pub mod transform;

// Re-export diagnostics for convenience
pub use diagnostics::{SourceFile, SyntaxError};

// Re-exports for convenience
pub use ast::Expr;
pub use config::Config;
pub use interp::{Interpreter, RuntimeError, Value};

/// Language version, also bound to `VERSION` in the prelude
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse source code into a `(begin ...)` program
pub fn parse(source: &str) -> miette::Result<Expr> {
    let tokens = lexer::lex(source)?;
    Ok(parser::program(&tokens, source)?)
}

/// Interpret source code in a fresh interpreter
pub fn interpret(source: &str) -> miette::Result<Value> {
    let mut interpreter = Interpreter::new();
    interpreter.run(source)
}
