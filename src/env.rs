//! ABOUTME: Lexically-scoped environment — identifier to value bindings with an outer chain

use crate::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct Environment {
    store: RefCell<HashMap<String, Object>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new root environment with no outer scope.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            store: RefCell::new(HashMap::new()),
            outer: None,
        })
    }

    /// Creates a new environment enclosed over `outer` — the shape a
    /// function call and a macro expansion both use to extend a captured
    /// closure environment.
    pub fn enclosed(outer: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            store: RefCell::new(HashMap::new()),
            outer: Some(outer),
        })
    }

    /// Looks up `name`, walking toward the outer scope on a local miss.
    pub fn get(&self, name: &str) -> Option<Object> {
        if let Some(value) = self.store.borrow().get(name) {
            return Some(value.clone());
        }
        self.outer.as_ref().and_then(|outer| outer.get(name))
    }

    /// Binds `name` to `value` in this frame only.
    pub fn set(&self, name: impl Into<String>, value: Object) {
        self.store.borrow_mut().insert(name.into(), value);
    }
}
