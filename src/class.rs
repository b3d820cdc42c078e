use std::collections::HashMap;
use std::fmt::{self, Display};
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::function::{Callable, Function};
use crate::interpreter::Interpreter;
use crate::object::Object;
use crate::token::Token;

/// A class value. Immutable once constructed — nothing mutates `methods`
/// after `Interpreter::execute_class`, so plain `Rc` sharing (no
/// `RefCell`) is enough even though classes, their superclass, and their
/// methods' closures form a reference cycle in principle.
#[derive(Debug)]
pub struct Class {
    pub name: String,
    pub superclass: Option<Rc<Class>>,
    pub methods: HashMap<String, Function>,
}

impl Class {
    pub fn new(name: String, superclass: Option<Rc<Class>>, methods: HashMap<String, Function>) -> Self {
        Class { name, superclass, methods }
    }

    /// Searches this class's own methods, then its superclass chain.
    pub fn find_method(&self, name: &str) -> Option<Function> {
        if let Some(method) = self.methods.get(name) {
            return Some(method.clone());
        }

        self.superclass.as_ref()?.find_method(name)
    }
}

impl Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class {}>", self.name)
    }
}

impl Class {
    pub fn arity(&self) -> usize {
        self.find_method("init").map_or(0, |init| init.arity())
    }

    /// Instantiates this class, routing through `init` when it declares one.
    /// Takes the class's own `Rc` (rather than deriving one from `&self`)
    /// so the fresh [`Instance`] can hold a strong reference to it.
    pub fn instantiate(
        class: &Rc<Class>,
        interpreter: &mut Interpreter<'_>,
        arguments: Vec<Object>,
    ) -> Result<Object, RuntimeError> {
        let instance = Rc::new(std::cell::RefCell::new(Instance::new(Rc::clone(class))));

        if let Some(initializer) = class.find_method("init") {
            let bound = initializer.bind(Object::Instance(Rc::clone(&instance)));
            bound.call(interpreter, arguments)?;
        }

        Ok(Object::Instance(instance))
    }
}

/// An instance of a [`Class`]. Fields live in a plain `HashMap` (the
/// instance itself, not each field, is what needs interior mutability —
/// see [`Object::Instance`]).
#[derive(Debug)]
pub struct Instance {
    pub class: Rc<Class>,
    pub fields: HashMap<String, Object>,
}

impl Instance {
    pub fn new(class: Rc<Class>) -> Self {
        Instance { class, fields: HashMap::new() }
    }

    /// Fields shadow methods: a field named the same as a method is read
    /// (and can be reassigned) independently of the class's method table.
    pub fn get(this: &Rc<std::cell::RefCell<Instance>>, name: &Token) -> Result<Object, RuntimeError> {
        let borrowed = this.borrow();
        if let Some(value) = borrowed.fields.get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(method) = borrowed.class.find_method(&name.lexeme) {
            return Ok(Object::Function(Rc::new(method.bind(Object::Instance(Rc::clone(this))))));
        }

        Err(RuntimeError::new(name.clone(), format!("Undefined property '{}'", name.lexeme)))
    }

    pub fn set(&mut self, name: &Token, value: Object) {
        self.fields.insert(name.lexeme.clone(), value);
    }
}

impl Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<instance {}>", self.class.name)
    }
}
