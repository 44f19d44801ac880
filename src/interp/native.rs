//! Native functions and the prelude
//!
//! Arithmetic, comparison and output are ordinary values bound in the global
//! environment rather than special forms. A [`Prelude`] is the data object
//! describing those bindings; each interpreter installs its own copy, so two
//! interpreters never share globals.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::env::Environment;
use super::error::RuntimeError;
use super::value::Value;

/// How many arguments a native accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    Range(usize, usize),
}

impl Arity {
    pub fn accepts(&self, n: usize) -> bool {
        match *self {
            Arity::Exact(k) => n == k,
            Arity::AtLeast(k) => n >= k,
            Arity::Range(lo, hi) => n >= lo && n <= hi,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Arity::Exact(k) => write!(f, "{}", k),
            Arity::AtLeast(k) => write!(f, "at least {}", k),
            Arity::Range(lo, hi) => write!(f, "{} to {}", lo, hi),
        }
    }
}

/// Where `print` writes
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Output {
    #[default]
    Stdout,
    /// Collect lines in memory (tests, embedding)
    Capture(Vec<String>),
}

impl Output {
    pub fn emit(&mut self, line: String) {
        match self {
            Output::Stdout => println!("{}", line),
            Output::Capture(lines) => lines.push(line),
        }
    }

    pub fn captured(&self) -> &[String] {
        match self {
            Output::Stdout => &[],
            Output::Capture(lines) => lines,
        }
    }

    pub fn clear(&mut self) {
        if let Output::Capture(lines) = self {
            lines.clear();
        }
    }
}

/// What a native can reach besides its arguments
pub struct NativeContext<'a> {
    output: &'a mut Output,
}

impl<'a> NativeContext<'a> {
    pub fn new(output: &'a mut Output) -> Self {
        NativeContext { output }
    }

    pub fn print(&mut self, line: String) {
        self.output.emit(line);
    }
}

type NativeImpl = dyn Fn(&[Value], &mut NativeContext<'_>) -> Result<Value, RuntimeError>;

/// A host function callable from Eva code
pub struct NativeFn {
    name: String,
    arity: Arity,
    func: Box<NativeImpl>,
}

impl NativeFn {
    pub fn new(
        name: impl Into<String>,
        arity: Arity,
        func: impl Fn(&[Value], &mut NativeContext<'_>) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        NativeFn {
            name: name.into(),
            arity,
            func: Box::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Check the argument count, then run
    pub fn call(&self, args: &[Value], ctx: &mut NativeContext<'_>) -> Result<Value, RuntimeError> {
        if !self.arity.accepts(args.len()) {
            return Err(RuntimeError::ArityMismatch {
                callee: self.name.clone(),
                expected: self.arity.to_string(),
                found: args.len(),
            });
        }
        (self.func)(args, ctx)
    }
}

/// Native functions and constants installed into a fresh global environment
#[derive(Clone)]
pub struct Prelude {
    entries: IndexMap<String, Value>,
}

impl Prelude {
    /// No bindings at all
    pub fn empty() -> Self {
        Prelude {
            entries: IndexMap::new(),
        }
    }

    /// Arithmetic, comparison, equality, `print` and the constants
    pub fn standard() -> Self {
        Prelude::empty()
            .constant("null", Value::Null)
            .constant("true", Value::Bool(true))
            .constant("false", Value::Bool(false))
            .constant("VERSION", Value::from(crate::VERSION))
            .native("+", Arity::AtLeast(1), add)
            .native("-", Arity::Range(1, 2), sub)
            .native("*", Arity::AtLeast(1), mul)
            .native("/", Arity::Exact(2), div)
            .native("%", Arity::Exact(2), rem)
            .native("<", Arity::Exact(2), |args, _| compare("<", args, |a, b| a < b))
            .native("<=", Arity::Exact(2), |args, _| compare("<=", args, |a, b| a <= b))
            .native(">", Arity::Exact(2), |args, _| compare(">", args, |a, b| a > b))
            .native(">=", Arity::Exact(2), |args, _| compare(">=", args, |a, b| a >= b))
            .native("=", Arity::Exact(2), |args, _| Ok(Value::Bool(args[0] == args[1])))
            .native("==", Arity::Exact(2), |args, _| Ok(Value::Bool(args[0] == args[1])))
            .native("!=", Arity::Exact(2), |args, _| Ok(Value::Bool(args[0] != args[1])))
            .native("print", Arity::AtLeast(0), print)
    }

    /// Add or replace a native function
    pub fn native(
        mut self,
        name: &str,
        arity: Arity,
        func: impl Fn(&[Value], &mut NativeContext<'_>) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        let native = NativeFn::new(name, arity, func);
        self.entries
            .insert(name.to_string(), Value::Native(Rc::new(native)));
        self
    }

    /// Add or replace a constant
    pub fn constant(mut self, name: &str, value: Value) -> Self {
        self.entries.insert(name.to_string(), value);
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Define every entry in `env`
    pub fn install(&self, env: &Environment) {
        for (name, value) in &self.entries {
            env.define(name.clone(), value.clone());
        }
    }
}

impl Default for Prelude {
    fn default() -> Self {
        Prelude::standard()
    }
}

fn numbers(operation: &str, args: &[Value]) -> Result<Vec<f64>, RuntimeError> {
    args.iter()
        .map(|v| {
            v.as_number()
                .ok_or_else(|| RuntimeError::type_mismatch(operation, "a number", v.describe()))
        })
        .collect()
}

fn add(args: &[Value], _: &mut NativeContext<'_>) -> Result<Value, RuntimeError> {
    if args.iter().all(|v| matches!(v, Value::Str(_))) {
        let joined: String = args.iter().filter_map(Value::as_str).collect();
        return Ok(Value::Str(joined));
    }
    Ok(Value::Number(numbers("+", args)?.into_iter().sum()))
}

fn sub(args: &[Value], _: &mut NativeContext<'_>) -> Result<Value, RuntimeError> {
    match numbers("-", args)?.as_slice() {
        [a] => Ok(Value::Number(-a)),
        [a, b] => Ok(Value::Number(a - b)),
        other => Err(RuntimeError::ArityMismatch {
            callee: "-".to_string(),
            expected: Arity::Range(1, 2).to_string(),
            found: other.len(),
        }),
    }
}

fn mul(args: &[Value], _: &mut NativeContext<'_>) -> Result<Value, RuntimeError> {
    Ok(Value::Number(numbers("*", args)?.into_iter().product()))
}

fn div(args: &[Value], _: &mut NativeContext<'_>) -> Result<Value, RuntimeError> {
    let n = numbers("/", args)?;
    if n[1] == 0.0 {
        return Err(RuntimeError::DivisionByZero);
    }
    Ok(Value::Number(n[0] / n[1]))
}

fn rem(args: &[Value], _: &mut NativeContext<'_>) -> Result<Value, RuntimeError> {
    let n = numbers("%", args)?;
    if n[1] == 0.0 {
        return Err(RuntimeError::DivisionByZero);
    }
    Ok(Value::Number(n[0] % n[1]))
}

fn compare(
    op: &str,
    args: &[Value],
    cmp: impl Fn(f64, f64) -> bool,
) -> Result<Value, RuntimeError> {
    let n = numbers(op, args)?;
    Ok(Value::Bool(cmp(n[0], n[1])))
}

fn print(args: &[Value], ctx: &mut NativeContext<'_>) -> Result<Value, RuntimeError> {
    let line = args
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    ctx.print(line);
    Ok(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
        let prelude = Prelude::standard();
        let Some(Value::Native(native)) = prelude.get(name) else {
            panic!("{} is not a native", name);
        };
        let mut output = Output::Capture(Vec::new());
        native.call(args, &mut NativeContext::new(&mut output))
    }

    #[test]
    fn test_division() {
        assert_eq!(call("/", &[Value::Number(5.0), Value::Number(2.0)]), Ok(Value::Number(2.5)));
        assert_eq!(
            call("/", &[Value::Number(5.0), Value::Number(0.0)]),
            Err(RuntimeError::DivisionByZero)
        );
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(call("-", &[Value::Number(4.0)]), Ok(Value::Number(-4.0)));
    }

    #[test]
    fn test_string_concat() {
        assert_eq!(
            call("+", &[Value::from("ab"), Value::from("cd")]),
            Ok(Value::from("abcd"))
        );
    }

    #[test]
    fn test_mixed_add_is_type_error() {
        assert!(matches!(
            call("+", &[Value::from("ab"), Value::Number(1.0)]),
            Err(RuntimeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_arity_checked() {
        assert!(matches!(
            call("<", &[Value::Number(1.0)]),
            Err(RuntimeError::ArityMismatch { found: 1, .. })
        ));
    }

    #[test]
    fn test_print_captures() {
        let prelude = Prelude::standard();
        let Some(Value::Native(print)) = prelude.get("print") else {
            panic!("print missing");
        };
        let mut output = Output::Capture(Vec::new());
        let result = print
            .call(
                &[Value::from("x ="), Value::Number(3.0)],
                &mut NativeContext::new(&mut output),
            )
            .unwrap();
        assert_eq!(result, Value::Null);
        assert_eq!(output.captured(), &["x = 3".to_string()]);
    }

    #[test]
    fn test_override_entry() {
        let prelude = Prelude::standard().constant("VERSION", Value::from("custom"));
        assert_eq!(prelude.get("VERSION"), Some(&Value::from("custom")));
    }
}
