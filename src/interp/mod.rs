//! Tree-walking interpreter
//!
//! Evaluates [`Expr`](crate::ast::Expr) trees directly against chained
//! environments.

pub mod builder;
pub mod env;
pub mod error;
pub mod eval;
pub mod modules;
pub mod native;
pub mod value;

pub use builder::InterpreterBuilder;
pub use env::{Environment, ScopeKind};
pub use error::RuntimeError;
pub use eval::Interpreter;
pub use modules::{FileModuleSource, MemoryModuleSource, ModuleSource};
pub use native::{Arity, NativeContext, NativeFn, Output, Prelude};
pub use value::{Closure, Value};
