//! Runtime errors raised during evaluation

use miette::Diagnostic;
use thiserror::Error;

use crate::diagnostics::SyntaxError;

/// Everything that can abort an evaluation
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("Variable `{name}` is not defined")]
    #[diagnostic(
        code(runtime::unbound_variable),
        help("declare it first with `(var {name} ...)`")
    )]
    UnboundVariable { name: String },

    #[error("Unimplemented form: {form}")]
    #[diagnostic(code(runtime::unimplemented_form))]
    UnimplementedForm { form: String },

    #[error("Malformed `{keyword}`: expected {expected}")]
    #[diagnostic(code(runtime::malformed_form), help("found `{form}`"))]
    MalformedForm {
        keyword: &'static str,
        expected: &'static str,
        form: String,
    },

    #[error("Division by zero")]
    #[diagnostic(code(runtime::division_by_zero))]
    DivisionByZero,

    #[error("Stack exhausted after {depth} nested calls")]
    #[diagnostic(
        code(runtime::stack_exhausted),
        help("raise `limits.max_call_depth` if the recursion is intentional")
    )]
    StackExhausted { depth: usize },

    #[error("`{operation}` expected {expected}, found {found}")]
    #[diagnostic(code(runtime::type_mismatch))]
    TypeMismatch {
        operation: String,
        expected: &'static str,
        found: String,
    },

    #[error("Value {found} is not callable")]
    #[diagnostic(code(runtime::not_callable))]
    NotCallable { found: String },

    #[error("`{callee}` expects {expected} argument(s), got {found}")]
    #[diagnostic(code(runtime::arity_mismatch))]
    ArityMismatch {
        callee: String,
        expected: String,
        found: usize,
    },

    #[error("Module `{name}` not found")]
    #[diagnostic(
        code(runtime::module_not_found),
        help("check `modules.search_paths` in eva.toml or pass --module-path")
    )]
    ModuleNotFound { name: String },

    #[error("Failed to load module `{name}`: {reason}")]
    #[diagnostic(code(runtime::module_load))]
    ModuleLoad { name: String, reason: String },

    #[error("Module `{name}` does not parse")]
    #[diagnostic(code(runtime::module_syntax))]
    ModuleSyntax {
        name: String,
        #[source]
        #[diagnostic_source]
        error: SyntaxError,
    },

    #[error("Circular import: {chain}")]
    #[diagnostic(
        code(runtime::circular_import),
        help("a module cannot import itself, directly or through other modules")
    )]
    CircularImport { chain: String },
}

impl RuntimeError {
    pub fn unbound(name: impl Into<String>) -> Self {
        RuntimeError::UnboundVariable { name: name.into() }
    }

    pub fn type_mismatch(
        operation: impl Into<String>,
        expected: &'static str,
        found: impl Into<String>,
    ) -> Self {
        RuntimeError::TypeMismatch {
            operation: operation.into(),
            expected,
            found: found.into(),
        }
    }
}
