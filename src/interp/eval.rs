//! Tree-walking evaluator

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::ast::Expr;
use crate::config::Config;
use crate::diagnostics::SourceFile;
use crate::forms::{Form, SetTarget};
use crate::stack::ensure_sufficient_stack;
use crate::{lexer, parser, transform};

use super::builder::InterpreterBuilder;
use super::env::{Environment, ScopeKind};
use super::error::RuntimeError;
use super::modules::ModuleSource;
use super::native::{NativeContext, Output};
use super::value::{Closure, Value};

type Result<T> = std::result::Result<T, RuntimeError>;

/// Tree-walking interpreter
pub struct Interpreter {
    /// Root of every scope chain; imports always land here
    global: Environment,
    config: Config,
    modules: Box<dyn ModuleSource>,
    /// Evaluated modules by name, when `modules.memoize` is on
    module_cache: FxHashMap<String, Environment>,
    output: Output,
    /// Closure activations currently on the stack
    depth: usize,
    /// Modules whose bodies are being evaluated, outermost first
    importing: Vec<String>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Create an interpreter with the standard prelude and default settings
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    pub(super) fn from_parts(
        global: Environment,
        config: Config,
        modules: Box<dyn ModuleSource>,
        output: Output,
    ) -> Self {
        Interpreter {
            global,
            config,
            modules,
            module_cache: FxHashMap::default(),
            output,
            depth: 0,
            importing: Vec::new(),
        }
    }

    pub fn global(&self) -> &Environment {
        &self.global
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get captured output (for testing)
    pub fn get_output(&self) -> &[String] {
        self.output.captured()
    }

    /// Clear output buffer
    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    /// Parse and run `source` as a program in the global environment
    pub fn run(&mut self, source: &str) -> miette::Result<Value> {
        let tokens = lexer::lex(source)?;
        let program = parser::program(&tokens, source)?;
        Ok(self.eval_global(&program)?)
    }

    /// Evaluate a program at top level.
    ///
    /// A `(begin ...)` program runs directly in the global environment, so its
    /// declarations become globals and survive between calls.
    pub fn eval_global(&mut self, program: &Expr) -> Result<Value> {
        let global = self.global.clone();
        self.eval_body(program, &global)
    }

    /// Evaluate `expr` in `env`
    pub fn eval(&mut self, expr: &Expr, env: &Environment) -> Result<Value> {
        ensure_sufficient_stack(|| self.eval_form(expr, env))
    }

    fn eval_form(&mut self, expr: &Expr, env: &Environment) -> Result<Value> {
        match Form::classify(expr)? {
            Form::Number(n) => Ok(Value::Number(n)),

            Form::Str(s) => Ok(Value::Str(s.to_string())),

            Form::Begin(body) => {
                let block = env.child(ScopeKind::Block);
                self.eval_sequence(body, &block)
            }

            Form::Var { name, value } => {
                let value = self.eval(value, env)?;
                Ok(env.define(name, value))
            }

            Form::Set {
                target: SetTarget::Prop { object, name },
                value,
            } => {
                let object = self.eval_scope(object, env, "set")?;
                let value = self.eval(value, env)?;
                Ok(object.define(name, value))
            }

            Form::Set {
                target: SetTarget::Name(name),
                value,
            } => {
                let value = self.eval(value, env)?;
                env.assign(name, value)
            }

            Form::Symbol(name) => env.lookup(name),

            Form::If {
                condition,
                consequent,
                alternate,
            } => {
                if self.eval(condition, env)?.is_true() {
                    self.eval(consequent, env)
                } else {
                    self.eval(alternate, env)
                }
            }

            Form::While { condition, body } => {
                let mut result = Value::Undefined;
                while self.eval(condition, env)?.is_true() {
                    result = self.eval(body, env)?;
                }
                Ok(result)
            }

            Form::Sugar(sugar) => {
                let core = transform::desugar(&sugar);
                self.eval(&core, env)
            }

            Form::Lambda { params, body } => Ok(Value::Closure(Rc::new(Closure::new(
                params.into_iter().map(String::from).collect(),
                body.clone(),
                env.clone(),
            )))),

            Form::Class { name, parent, body } => self.eval_class(name, parent, body, env),

            Form::Super { class } => {
                let class = self.expect_class(env.lookup(class)?, "super")?;
                Ok(class
                    .parent()
                    .cloned()
                    .map(Value::Scope)
                    .unwrap_or(Value::Null))
            }

            Form::New { class, args } => self.eval_new(class, args, env),

            Form::Prop { object, name } => {
                let object = self.eval_scope(object, env, "prop")?;
                object.lookup(name)
            }

            Form::Module { name, body } => {
                let module = env.child(ScopeKind::Module {
                    name: name.to_string(),
                });
                self.eval_body(body, &module)?;
                tracing::debug!("Declared module {}", name);
                Ok(env.define(name, Value::Scope(module)))
            }

            Form::Import { name } => self.eval_import(name),

            Form::Apply { callee, args } => {
                let callee = self.eval(callee, env)?;
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval(arg, env)?);
                }
                self.call(&callee, values)
            }
        }
    }

    /// Call a function value with already-evaluated arguments
    pub fn call(&mut self, callee: &Value, args: Vec<Value>) -> Result<Value> {
        match callee {
            Value::Native(native) => {
                let mut ctx = NativeContext::new(&mut self.output);
                native.call(&args, &mut ctx)
            }
            Value::Closure(closure) => self.call_closure(closure, args),
            other => Err(RuntimeError::NotCallable {
                found: other.describe(),
            }),
        }
    }

    fn call_closure(&mut self, closure: &Closure, args: Vec<Value>) -> Result<Value> {
        if args.len() != closure.arity() {
            return Err(RuntimeError::ArityMismatch {
                callee: closure.to_string(),
                expected: closure.arity().to_string(),
                found: args.len(),
            });
        }
        if self.depth >= self.config.limits.max_call_depth {
            return Err(RuntimeError::StackExhausted { depth: self.depth });
        }

        // Parented to the captured environment, not the caller's
        let activation = closure.env.child(ScopeKind::Activation);
        for (param, arg) in closure.params.iter().zip(args) {
            activation.define(param.clone(), arg);
        }

        self.depth += 1;
        tracing::trace!(depth = self.depth, "call {}", closure);
        let result = self.eval_body(&closure.body, &activation);
        self.depth -= 1;
        result
    }

    /// Run a function, class or module body directly in `env`. A `begin` body
    /// does not open another scope, so its declarations land in `env` itself.
    fn eval_body(&mut self, body: &Expr, env: &Environment) -> Result<Value> {
        match body.as_list() {
            Some([head, rest @ ..]) if head.as_symbol() == Some("begin") => {
                self.eval_sequence(rest, env)
            }
            _ => self.eval(body, env),
        }
    }

    fn eval_sequence(&mut self, exprs: &[Expr], env: &Environment) -> Result<Value> {
        let mut result = Value::Undefined;
        for expr in exprs {
            result = self.eval(expr, env)?;
        }
        Ok(result)
    }

    fn eval_class(
        &mut self,
        name: &str,
        parent: &Expr,
        body: &Expr,
        env: &Environment,
    ) -> Result<Value> {
        let parent = match self.eval(parent, env)? {
            Value::Null => env.clone(),
            Value::Scope(scope) if scope.is_class() => scope,
            other => {
                return Err(RuntimeError::type_mismatch(
                    format!("class {}", name),
                    "a class or null",
                    other.describe(),
                ));
            }
        };

        let class = parent.child(ScopeKind::Class {
            name: name.to_string(),
        });
        self.eval_body(body, &class)?;
        tracing::debug!("Declared class {}", name);
        Ok(env.define(name, Value::Scope(class)))
    }

    fn eval_new(&mut self, class: &Expr, args: &[Expr], env: &Environment) -> Result<Value> {
        let class_value = self.eval(class, env)?;
        let class = self.expect_class(class_value, "new")?;
        let instance = class.child(ScopeKind::Instance);

        let mut values = Vec::with_capacity(args.len() + 1);
        values.push(Value::Scope(instance.clone()));
        for arg in args {
            values.push(self.eval(arg, env)?);
        }

        // A class without a constructor can still be instantiated bare
        match class.lookup("constructor") {
            Ok(constructor) => {
                self.call(&constructor, values)?;
            }
            Err(_) if args.is_empty() => {}
            Err(e) => return Err(e),
        }

        Ok(Value::Scope(instance))
    }

    fn eval_import(&mut self, name: &str) -> Result<Value> {
        if self.config.modules.memoize {
            if let Some(module) = self.module_cache.get(name) {
                tracing::debug!("Reusing module {}", name);
                return Ok(self.global.define(name, Value::Scope(module.clone())));
            }
        }

        if self.importing.iter().any(|loading| loading == name) {
            let chain: Vec<&str> = self
                .importing
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(name))
                .collect();
            return Err(RuntimeError::CircularImport {
                chain: chain.join(" -> "),
            });
        }
        if self.importing.len() >= self.config.limits.max_call_depth {
            return Err(RuntimeError::StackExhausted {
                depth: self.importing.len(),
            });
        }

        self.importing.push(name.to_string());
        let result = self.load_module(name);
        self.importing.pop();
        let module = result?;

        if self.config.modules.memoize {
            if let Value::Scope(env) = &module {
                self.module_cache.insert(name.to_string(), env.clone());
            }
        }
        Ok(module)
    }

    /// Load, parse and evaluate `name` as a module bound in the global scope
    fn load_module(&mut self, name: &str) -> Result<Value> {
        let source = self.modules.load(name)?;
        let body = lexer::lex(&source)
            .and_then(|tokens| parser::program(&tokens, &source))
            .map_err(|error| RuntimeError::ModuleSyntax {
                name: name.to_string(),
                error: error.with_source(&SourceFile::new(name, source.as_str())),
            })?;

        let form = Expr::form("module", [Expr::symbol(name), body]);
        let global = self.global.clone();
        tracing::debug!("Importing module {}", name);
        self.eval(&form, &global)
    }

    fn eval_scope(
        &mut self,
        expr: &Expr,
        env: &Environment,
        operation: &str,
    ) -> Result<Environment> {
        match self.eval(expr, env)? {
            Value::Scope(scope) => Ok(scope),
            other => Err(RuntimeError::type_mismatch(
                operation,
                "an object",
                other.describe(),
            )),
        }
    }

    fn expect_class(&self, value: Value, operation: &str) -> Result<Environment> {
        match value {
            Value::Scope(scope) if scope.is_class() => Ok(scope),
            other => Err(RuntimeError::type_mismatch(
                operation,
                "a class",
                other.describe(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::MemoryModuleSource;

    fn eval(source: &str) -> Result<Value> {
        let tokens = lexer::lex(source).unwrap();
        let program = parser::program(&tokens, source).unwrap();
        Interpreter::new().eval_global(&program)
    }

    #[test]
    fn test_empty_block_is_undefined() {
        assert_eq!(eval("(begin)"), Ok(Value::Undefined));
        assert_eq!(eval(""), Ok(Value::Undefined));
    }

    #[test]
    fn test_while_without_iterations_is_undefined() {
        assert_eq!(eval("(while false 1)"), Ok(Value::Undefined));
    }

    #[test]
    fn test_if_requires_boolean_true() {
        assert_eq!(eval("(if 1 \"yes\" \"no\")"), Ok(Value::from("no")));
        assert_eq!(eval("(if true \"yes\" \"no\")"), Ok(Value::from("yes")));
    }

    #[test]
    fn test_top_level_var_is_global() {
        let mut interp = Interpreter::new();
        interp.run("(var x 1)").unwrap();
        assert_eq!(interp.global().lookup("x"), Ok(Value::Number(1.0)));
        assert_eq!(interp.run("(+ x 1)").unwrap(), Value::Number(2.0));
    }

    #[test]
    fn test_activation_parent_is_captured_env() {
        let result = eval(
            r#"
            (var x "global")
            (def get () x)
            (def caller () (begin (var x "local") (get)))
            (caller)
            "#,
        );
        assert_eq!(result, Ok(Value::from("global")));
    }

    #[test]
    fn test_not_callable() {
        assert!(matches!(
            eval("(5 1)"),
            Err(RuntimeError::NotCallable { .. })
        ));
    }

    #[test]
    fn test_depth_restored_after_error() {
        let mut interp = Interpreter::new();
        assert!(interp.run("(def f (x) (/ x 0)) (f 1)").is_err());
        assert_eq!(interp.depth, 0);
    }

    #[test]
    fn test_import_stack_restored_after_error() {
        let mut interp = Interpreter::builder()
            .modules(MemoryModuleSource::new().with("Bad", "(/ 1 0)"))
            .build();
        assert!(interp.run("(import Bad)").is_err());
        assert!(interp.importing.is_empty());
    }
}
