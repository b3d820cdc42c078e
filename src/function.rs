use std::cell::RefCell;
use std::fmt::{self, Debug, Display};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::environment::Environment;
use crate::error::{RuntimeError, Signal};
use crate::interpreter::Interpreter;
use crate::object::Object;
use crate::stmt;

/// Anything that can appear on the left of a `(...)` call expression.
pub trait Callable: Debug {
    fn call(&self, interpreter: &mut Interpreter<'_>, arguments: Vec<Object>) -> Result<Object, RuntimeError>;
    fn arity(&self) -> usize;
}

/// A user-defined function or method. `declaration` is reference-counted so
/// that binding a method to an instance (see [`Function::bind`]) is a cheap
/// clone rather than a deep copy of the body statements.
#[derive(Debug, Clone)]
pub struct Function {
    pub declaration: Rc<stmt::Function>,
    pub closure: Rc<RefCell<Environment>>,
    pub is_initializer: bool,
}

impl Function {
    pub fn new(declaration: Rc<stmt::Function>, closure: Rc<RefCell<Environment>>, is_initializer: bool) -> Self {
        Function { declaration, closure, is_initializer }
    }

    /// Returns a new function value whose closure adds a scope binding
    /// `this` to `instance`. Each call to `bind` produces a fresh
    /// [`Function`]; repeated access to the same method therefore yields
    /// values that are equal by declaration but not by reference.
    pub fn bind(&self, instance: Object) -> Function {
        let environment = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.closure)))));
        environment.borrow_mut().define("this", instance);
        Function::new(Rc::clone(&self.declaration), environment, self.is_initializer)
    }

    /// The instance this function is bound to, if any. `bind` always
    /// defines `this` directly in the closure it hands back, so a plain,
    /// unbound function (no `this` in its own frame) reads back `None`
    /// here even if it happens to close over an outer `this`.
    fn bound_this(&self) -> Option<Object> {
        self.closure.borrow().get_own("this")
    }
}

impl Callable for Function {
    fn call(&self, interpreter: &mut Interpreter<'_>, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let environment = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.closure)))));

        for (param, arg) in self.declaration.params.iter().zip(arguments.into_iter()) {
            environment.borrow_mut().define(&param.lexeme, arg);
        }

        match interpreter.execute_block(&self.declaration.body, environment) {
            Ok(()) => {
                if self.is_initializer {
                    self.return_this()
                } else {
                    Ok(Object::Nil)
                }
            }
            Err(Signal::Return(value)) => {
                if self.is_initializer {
                    self.return_this()
                } else {
                    Ok(value)
                }
            }
            Err(Signal::Error(error)) => Err(error),
        }
    }

    fn arity(&self) -> usize {
        self.declaration.params.len()
    }
}

impl Function {
    /// An initializer always yields `this`, regardless of how its body
    /// returned, so both the fall-through and explicit-`return;` paths above
    /// funnel through here. `this` is always bound at depth 0 in the call's
    /// environment because `bind` defines it directly in the closure that
    /// wraps every method body.
    fn return_this(&self) -> Result<Object, RuntimeError> {
        let this = self
            .closure
            .borrow()
            .get(&crate::token::Token::from("this"))
            .expect("initializer's closure to have 'this' bound by Function::bind");
        Ok(this)
    }
}

/// Two functions are equal when they come from the same declaration and,
/// if bound, are bound to the same instance — not when they happen to
/// share a closure `Rc`, since `bind` allocates a fresh one on every call.
impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.declaration, &other.declaration) && self.bound_this() == other.bound_this()
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.declaration.name.lexeme)
    }
}

/// A builtin implemented in Rust rather than Lox. The interpreter's globals
/// are seeded with these; `spec.md` requires exactly one: `clock()`.
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    #[allow(clippy::type_complexity)]
    pub function: fn(&mut Interpreter<'_>, Vec<Object>) -> Result<Object, RuntimeError>,
}

impl NativeFunction {
    pub fn globals() -> Vec<NativeFunction> {
        vec![NativeFunction {
            name: "clock",
            arity: 0,
            function: |_, _| {
                let now = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .expect("system clock to be after the epoch")
                    .as_secs_f64();
                Ok(Object::Number(now))
            },
        }]
    }
}

impl Callable for NativeFunction {
    fn call(&self, interpreter: &mut Interpreter<'_>, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        (self.function)(interpreter, arguments)
    }

    fn arity(&self) -> usize {
        self.arity
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}
