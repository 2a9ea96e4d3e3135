use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::prelude::Value;

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Environment {
    pub store: HashMap<String, Value>,
    pub outer: Option<Rc<RefCell<Environment>>>
}

impl Environment {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            outer: None
        }
    }

    pub fn new_enclosed(outer: Rc<RefCell<Environment>>) -> Self {
        Self {
            store: HashMap::new(),
            outer: Some(outer)
        }
    }

    /// Looks a name up in this environment, falling back to the enclosing
    /// chain when it is not bound locally.
    pub fn get(&self, name: &String) -> Option<Value> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => match &self.outer {
                Some(outer) => outer.borrow().get(name),
                None => None
            }
        }
    }

    /// Binds a name in this environment, never in an enclosing one.
    pub fn set(&mut self, name: String, value: Value) {
        self.store.insert(name, value);
    }
}
