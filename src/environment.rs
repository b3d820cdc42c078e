use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::object::Object;
use crate::token::Token;

/// A single lexical scope: a name→value map plus a link to the scope it is
/// nested in. Environments are reference-counted and interior-mutable so
/// that closures captured at different times can share and observe
/// mutations to the same frame.
#[derive(Debug)]
pub struct Environment {
    enclosing: Option<Rc<RefCell<Environment>>>,
    values: HashMap<String, Object>,
}

impl Environment {
    pub fn new(enclosing: Option<Rc<RefCell<Environment>>>) -> Self {
        Environment { enclosing, values: HashMap::new() }
    }

    pub fn global() -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment::new(None)))
    }

    /// Unconditionally binds `name` in the current frame, shadowing any
    /// binding of the same name in an enclosing frame.
    pub fn define(&mut self, name: &str, value: Object) {
        self.values.insert(name.to_string(), value);
    }

    /// Reads `name` from this frame only, without walking `enclosing`.
    /// Used to read back a binding (e.g. `this`) known to live directly in
    /// a particular frame rather than somewhere up the chain.
    pub fn get_own(&self, name: &str) -> Option<Object> {
        self.values.get(name).cloned()
    }

    pub fn get(&self, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }

        Err(RuntimeError::new(name.clone(), format!("Undefined variable '{}'", name.lexeme)))
    }

    pub fn assign(&mut self, name: &Token, value: Object) -> Result<(), RuntimeError> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }

        Err(RuntimeError::new(name.clone(), format!("Undefined variable '{}'", name.lexeme)))
    }

    /// Walks exactly `distance` `enclosing` links up from `env`.
    fn ancestor(env: &Rc<RefCell<Environment>>, distance: usize) -> Rc<RefCell<Environment>> {
        let mut current = Rc::clone(env);
        for _ in 0..distance {
            let next = current
                .borrow()
                .enclosing
                .clone()
                .expect("resolver-recorded depth to match the live environment chain");
            current = next;
        }
        current
    }

    /// Reads from exactly the `distance`-th enclosing frame, per the
    /// depth the resolver recorded — it must never walk further than that,
    /// even if the name would also be found in an outer frame.
    pub fn get_at(this: &Rc<RefCell<Environment>>, distance: usize, name: &Token) -> Result<Object, RuntimeError> {
        let target = Self::ancestor(this, distance);
        let borrowed = target.borrow();
        borrowed
            .values
            .get(&name.lexeme)
            .cloned()
            .ok_or_else(|| RuntimeError::new(name.clone(), format!("Undefined variable '{}'", name.lexeme)))
    }

    pub fn assign_at(
        this: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &Token,
        value: Object,
    ) -> Result<(), RuntimeError> {
        let target = Self::ancestor(this, distance);
        target.borrow_mut().values.insert(name.lexeme.clone(), value);
        Ok(())
    }
}
