//! Scope chain implementation
//!
//! An [`Environment`] is a shared handle to one scope: a name → value map plus
//! an optional link to the enclosing scope. Handles are reference counted, so
//! a function value can keep the scope it was declared in alive after that
//! scope's block or call has finished, and several closures can read and write
//! the same captured variables.
//!
//! # Resolution Rules
//!
//! - Lookups walk outward from the innermost scope until the name is found.
//! - Assignments update the nearest scope that already holds the name; a name
//!   held by no scope is defined in the scope the assignment started from.

use super::value::Value;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

struct Scope {
    values: FxHashMap<String, Value>,
    enclosing: Option<Environment>,
}

/// Shared handle to a scope in the environment chain
#[derive(Clone)]
pub struct Environment {
    scope: Rc<RefCell<Scope>>,
}

impl Environment {
    /// Create an outermost (global) scope
    pub fn new() -> Self {
        Self::with_enclosing(None)
    }

    fn with_enclosing(enclosing: Option<Environment>) -> Self {
        Environment {
            scope: Rc::new(RefCell::new(Scope {
                values: FxHashMap::default(),
                enclosing,
            })),
        }
    }

    /// Create a new scope nested inside this one
    pub fn enclosed(&self) -> Self {
        Self::with_enclosing(Some(self.clone()))
    }

    /// Bind `name` in this scope, replacing any existing binding here
    pub fn define(&self, name: &str, value: Value) {
        self.scope.borrow_mut().values.insert(name.to_string(), value);
    }

    /// Look `name` up through the chain
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            let scope = env.scope.borrow();
            if let Some(value) = scope.values.get(name) {
                return Some(value.clone());
            }
            current = scope.enclosing.clone();
        }
        None
    }

    /// Update the nearest binding of `name`, or define it here if none exists
    pub fn assign(&self, name: &str, value: Value) {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            let mut scope = env.scope.borrow_mut();
            if let Some(slot) = scope.values.get_mut(name) {
                *slot = value;
                return;
            }
            current = scope.enclosing.clone();
        }
        self.define(name, value);
    }

    /// Number of scopes from this one out to the global scope, inclusive
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.scope.borrow().enclosing.clone();
        while let Some(env) = current {
            depth += 1;
            current = env.scope.borrow().enclosing.clone();
        }
        depth
    }

    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.scope, &other.scope)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.scope.borrow();
        let mut names: Vec<&str> = scope.values.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Environment")
            .field("names", &names)
            .field("depth", &self.depth())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_walks_outward() {
        let global = Environment::new();
        global.define("x", Value::Integer(1));
        let inner = global.enclosed().enclosed();

        assert_eq!(inner.get("x"), Some(Value::Integer(1)));
        assert_eq!(inner.get("missing"), None);
        assert_eq!(inner.depth(), 3);
    }

    #[test]
    fn test_assign_updates_nearest_binding() {
        let global = Environment::new();
        global.define("x", Value::Integer(1));
        let inner = global.enclosed();

        inner.assign("x", Value::Integer(2));
        assert_eq!(global.get("x"), Some(Value::Integer(2)));
    }

    #[test]
    fn test_assign_to_unknown_name_defines_innermost() {
        let global = Environment::new();
        let inner = global.enclosed();

        inner.assign("fresh", Value::Boolean(true));
        assert_eq!(inner.get("fresh"), Some(Value::Boolean(true)));
        assert_eq!(global.get("fresh"), None);
    }

    #[test]
    fn test_shadowing_and_shared_handles() {
        let global = Environment::new();
        global.define("x", Value::Integer(1));
        let inner = global.enclosed();
        inner.define("x", Value::Integer(10));

        let alias = inner.clone();
        alias.assign("x", Value::Integer(11));

        assert!(alias.ptr_eq(&inner));
        assert_eq!(inner.get("x"), Some(Value::Integer(11)));
        assert_eq!(global.get("x"), Some(Value::Integer(1)));
    }
}
