//! Chained lexical environments
//!
//! One implementation backs every kind of scope: blocks, call activations,
//! classes, instances and modules. A class is an environment holding its
//! methods whose parent is the superclass; an instance is an environment
//! holding its fields whose parent is the class. Property lookup therefore
//! falls through to inherited methods with no extra machinery.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::error::RuntimeError;
use super::value::Value;

/// What an environment is being used as
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Block,
    Activation,
    Class { name: String },
    Instance,
    Module { name: String },
}

struct Scope {
    kind: ScopeKind,
    record: RefCell<IndexMap<String, Value>>,
    parent: Option<Environment>,
}

/// Shared handle to a scope. Cloning is a reference-count bump.
#[derive(Clone)]
pub struct Environment {
    scope: Rc<Scope>,
}

impl Environment {
    /// Create a root environment
    pub fn global() -> Self {
        Self::with_parent(ScopeKind::Global, None)
    }

    fn with_parent(kind: ScopeKind, parent: Option<Environment>) -> Self {
        Environment {
            scope: Rc::new(Scope {
                kind,
                record: RefCell::new(IndexMap::new()),
                parent,
            }),
        }
    }

    /// Create an empty environment whose parent is `self`
    pub fn child(&self, kind: ScopeKind) -> Self {
        Self::with_parent(kind, Some(self.clone()))
    }

    pub fn kind(&self) -> &ScopeKind {
        &self.scope.kind
    }

    pub fn parent(&self) -> Option<&Environment> {
        self.scope.parent.as_ref()
    }

    pub fn is_class(&self) -> bool {
        matches!(self.scope.kind, ScopeKind::Class { .. })
    }

    /// Create or overwrite `name` in this environment's own record
    pub fn define(&self, name: impl Into<String>, value: Value) -> Value {
        self.scope
            .record
            .borrow_mut()
            .insert(name.into(), value.clone());
        value
    }

    /// Value of `name` in the nearest environment that has it
    pub fn lookup(&self, name: &str) -> Result<Value, RuntimeError> {
        let mut env = self;
        loop {
            if let Some(value) = env.scope.record.borrow().get(name) {
                return Ok(value.clone());
            }
            match &env.scope.parent {
                Some(parent) => env = parent,
                None => return Err(RuntimeError::unbound(name)),
            }
        }
    }

    /// The nearest environment (self or an ancestor) that owns `name`
    pub fn resolve(&self, name: &str) -> Result<Environment, RuntimeError> {
        let mut env = self;
        loop {
            if env.has_own(name) {
                return Ok(env.clone());
            }
            match &env.scope.parent {
                Some(parent) => env = parent,
                None => return Err(RuntimeError::unbound(name)),
            }
        }
    }

    /// Overwrite an existing binding wherever it lives. Never declares.
    pub fn assign(&self, name: &str, value: Value) -> Result<Value, RuntimeError> {
        let owner = self.resolve(name)?;
        owner
            .scope
            .record
            .borrow_mut()
            .insert(name.to_string(), value.clone());
        Ok(value)
    }

    pub fn has_own(&self, name: &str) -> bool {
        self.scope.record.borrow().contains_key(name)
    }

    /// Snapshot of this environment's own bindings, in definition order
    pub fn bindings(&self) -> Vec<(String, Value)> {
        self.scope
            .record
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.scope.record.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.scope, &other.scope)
    }

    /// Name of the class this environment is, or is an instance of
    pub fn class_name(&self) -> Option<&str> {
        match &self.scope.kind {
            ScopeKind::Class { name } => Some(name),
            ScopeKind::Instance => self.parent().and_then(Environment::class_name),
            _ => None,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::global()
    }
}

impl fmt::Debug for Environment {
    // Values can point back at their environment, so only names are shown
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.scope.record.borrow();
        f.debug_struct("Environment")
            .field("kind", &self.scope.kind)
            .field("names", &record.keys().collect::<Vec<_>>())
            .field("has_parent", &self.scope.parent.is_some())
            .finish()
    }
}
