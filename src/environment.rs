use crate::value::Value;
use log::trace;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// A shared handle to one scope. Cloning the handle aliases the scope, so a
/// closure and the block that declared it see the same bindings.
#[derive(Clone)]
pub struct Environment {
    scope: Rc<RefCell<Scope>>,
}

struct Scope {
    bindings: BTreeMap<String, Value>,
    parent: Option<Environment>,
}

impl Environment {
    pub fn new() -> Environment {
        Environment {
            scope: Rc::new(RefCell::new(Scope {
                bindings: BTreeMap::new(),
                parent: None,
            })),
        }
    }
    pub fn new_child(&self) -> Environment {
        trace!("opening child scope");
        Environment {
            scope: Rc::new(RefCell::new(Scope {
                bindings: BTreeMap::new(),
                parent: Some(self.clone()),
            })),
        }
    }
    pub fn parent(&self) -> Option<Environment> {
        self.scope.borrow().parent.clone()
    }

    /// Binds `name` in this scope only. Returns false, leaving the scope
    /// untouched, when this scope already binds `name`.
    pub fn declare(&self, name: &str, value: Value) -> bool {
        let mut scope = self.scope.borrow_mut();
        if scope.bindings.contains_key(name) {
            return false;
        }
        scope.bindings.insert(name.to_string(), value);
        true
    }

    /// Overwrites the innermost binding of `name`. Returns false when no
    /// scope in the chain binds it.
    pub fn assign(&self, name: &str, value: Value) -> bool {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            {
                let mut scope = env.scope.borrow_mut();
                if let Some(slot) = scope.bindings.get_mut(name) {
                    *slot = value;
                    return true;
                }
            }
            current = env.parent();
        }
        false
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            let found = env.scope.borrow().bindings.get(name).cloned();
            if found.is_some() {
                return found;
            }
            current = env.parent();
        }
        None
    }

    /// Names bound directly in this scope, sorted.
    pub fn names(&self) -> Vec<String> {
        self.scope.borrow().bindings.keys().cloned().collect()
    }

    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.scope, &other.scope)
    }
}

impl Default for Environment {
    fn default() -> Environment {
        Environment::new()
    }
}

// Bindings may hold closures that point back at this scope, so only the
// names are printed.
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("names", &self.names())
            .field("has_parent", &self.parent().is_some())
            .finish()
    }
}
