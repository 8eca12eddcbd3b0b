//! Lexical scopes for the Lugha interpreter.
//!
//! A scope is one level of name→value bindings with an optional parent.
//! Lookup walks the parent chain; writes and removals touch the current
//! level only, so a binding in a child scope shadows (and never mutates)
//! a parent binding.
//!
//! Scopes use Rc<RefCell<...>> so that closures can keep their defining
//! scope alive and observe later bindings made in it.

use crate::Value;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

struct ScopeInner {
    bindings: FxHashMap<String, Value>,
    /// Enclosing lexical scope, if any
    parent: Option<Rc<RefCell<ScopeInner>>>,
}

/// A lexically-nested symbol table.
#[derive(Clone)]
pub struct Scope {
    inner: Rc<RefCell<ScopeInner>>,
}

impl Scope {
    /// Create a new root scope.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ScopeInner {
                bindings: FxHashMap::default(),
                parent: None,
            })),
        }
    }

    /// Create a child scope with this scope as parent.
    ///
    /// The parent is shared via Rc, so bindings added to the parent after
    /// the child is created are still visible through the child.
    pub fn child(&self) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ScopeInner {
                bindings: FxHashMap::default(),
                parent: Some(Rc::clone(&self.inner)),
            })),
        }
    }

    /// Look up a name in this scope or, failing that, the parent chain.
    pub fn get(&self, name: &str) -> Option<Value> {
        Self::get_from_inner(&self.inner, name)
    }

    /// Helper to look up a name in a ScopeInner chain.
    fn get_from_inner(inner_rc: &Rc<RefCell<ScopeInner>>, name: &str) -> Option<Value> {
        let inner = inner_rc.borrow();
        if let Some(value) = inner.bindings.get(name) {
            Some(value.clone())
        } else if let Some(parent) = &inner.parent {
            let parent_rc = Rc::clone(parent);
            drop(inner);
            Self::get_from_inner(&parent_rc, name)
        } else {
            None
        }
    }

    /// Bind a name in this scope only, overwriting any existing binding at
    /// this level. Never walks up.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.inner.borrow_mut().bindings.insert(name.into(), value);
    }

    /// Remove a binding from this scope only. Parent bindings of the same
    /// name become visible again.
    pub fn remove(&self, name: &str) -> Option<Value> {
        self.inner.borrow_mut().bindings.remove(name)
    }

    /// Check if a name is bound in this scope (not parents).
    pub fn has_local(&self, name: &str) -> bool {
        self.inner.borrow().bindings.contains_key(name)
    }

    /// Check if two handles refer to the same scope.
    pub fn ptr_eq(&self, other: &Scope) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

// The scope graph may contain cycles (a scope holding a function that
// captured it), so Debug prints local names only.
impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        let mut names: Vec<&String> = inner.bindings.keys().collect();
        names.sort();
        f.debug_struct("Scope")
            .field("bindings", &names)
            .field("has_parent", &inner.parent.is_some())
            .finish()
    }
}
