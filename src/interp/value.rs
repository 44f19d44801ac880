//! Runtime values for the interpreter

use std::fmt;
use std::rc::Rc;

use crate::ast::{Expr, format_number};

use super::env::{Environment, ScopeKind};
use super::native::NativeFn;

/// Runtime value
#[derive(Clone)]
pub enum Value {
    /// Result of an empty block or a loop that never ran
    Undefined,
    /// The `null` constant
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit float
    Number(f64),
    /// String
    Str(String),
    /// Host-provided function
    Native(Rc<NativeFn>),
    /// User function with its captured environment
    Closure(Rc<Closure>),
    /// Class, instance, module or any other environment
    Scope(Environment),
}

/// A `lambda` value
pub struct Closure {
    pub params: Vec<String>,
    pub body: Expr,
    /// Environment the lambda was evaluated in
    pub env: Environment,
}

impl Closure {
    pub fn new(params: Vec<String>, body: Expr, env: Environment) -> Self {
        Closure { params, body, env }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<lambda ({})>", self.params.join(" "))
    }
}

impl Value {
    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Native(_) => "native function",
            Value::Closure(_) => "function",
            Value::Scope(env) => match env.kind() {
                ScopeKind::Class { .. } => "class",
                ScopeKind::Instance => "instance",
                ScopeKind::Module { .. } => "module",
                ScopeKind::Global | ScopeKind::Block | ScopeKind::Activation => "scope",
            },
        }
    }

    /// Try to get as number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_scope(&self) -> Option<&Environment> {
        match self {
            Value::Scope(env) => Some(env),
            _ => None,
        }
    }

    /// Only the boolean `true` selects the consequent of `if` and keeps `while` going
    pub fn is_true(&self) -> bool {
        matches!(self, Value::Bool(true))
    }

    /// Short description used in error messages: `number 3`, `string "a"`
    pub fn describe(&self) -> String {
        match self {
            Value::Undefined | Value::Null => self.type_name().to_string(),
            Value::Str(s) => format!("string {:?}", s),
            other => format!("{} {}", other.type_name(), other),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Str(s) => write!(f, "{}", s),
            Value::Native(native) => write!(f, "<native {}>", native.name()),
            Value::Closure(closure) => write!(f, "{}", closure),
            Value::Scope(env) => match env.kind() {
                ScopeKind::Class { name } => write!(f, "<class {}>", name),
                ScopeKind::Instance => match env.class_name() {
                    Some(class) => write!(f, "<{} instance>", class),
                    None => write!(f, "<instance>"),
                },
                ScopeKind::Module { name } => write!(f, "<module {}>", name),
                ScopeKind::Global => write!(f, "<global scope>"),
                ScopeKind::Block | ScopeKind::Activation => write!(f, "<scope>"),
            },
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{:?}", s),
            other => write!(f, "{}", other),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(a, b),
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            (Value::Scope(a), Value::Scope(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Number(10.0).to_string(), "10");
        assert_eq!(Value::from("hi").to_string(), "hi");
        assert_eq!(format!("{:?}", Value::from("hi")), "\"hi\"");
    }

    #[test]
    fn test_no_truthiness() {
        assert!(Value::Bool(true).is_true());
        assert!(!Value::Number(1.0).is_true());
        assert!(!Value::from("true").is_true());
    }

    #[test]
    fn test_scope_equality_is_identity() {
        let a = Environment::global();
        let b = Environment::global();
        assert_eq!(Value::Scope(a.clone()), Value::Scope(a));
        assert_ne!(Value::Scope(b), Value::Scope(Environment::global()));
    }
}
