use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use crate::class::{Class, Instance};
use crate::diagnostics::Diagnostics;
use crate::environment::Environment;
use crate::error::{RuntimeError, Signal, Unwind};
use crate::expr::{Expr, LiteralValue, NodeId};
use crate::function::{Callable, Function, NativeFunction};
use crate::object::Object;
use crate::stmt::{self, Stmt};
use crate::token::{Token, Type};

/// Walks the AST and evaluates it directly, one node at a time, with no
/// separate compilation step. `print` writes through a borrowed `dyn Write`
/// rather than straight to stdout, so tests can capture output into an
/// in-memory buffer the same way the real binary writes to stdout.
pub struct Interpreter<'out> {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<NodeId, usize>,
    output: &'out mut dyn Write,
}

impl<'out> Interpreter<'out> {
    pub fn new(output: &'out mut dyn Write) -> Self {
        let globals = Environment::global();
        for native in NativeFunction::globals() {
            globals.borrow_mut().define(native.name, Object::NativeFunction(Rc::new(native)));
        }

        Interpreter { globals: Rc::clone(&globals), environment: globals, locals: HashMap::new(), output }
    }

    /// Records the number of scopes between a variable use and its
    /// declaration, as computed by [`crate::resolver::Resolver`].
    pub fn resolve(&mut self, id: NodeId, depth: usize) {
        self.locals.insert(id, depth);
    }

    pub fn interpret(&mut self, statements: &[Stmt], diagnostics: &mut Diagnostics) {
        for statement in statements {
            if let Err(signal) = self.execute(statement) {
                match signal {
                    Signal::Error(error) => {
                        diagnostics.report_runtime_error(&error);
                        return;
                    }
                    Signal::Return(_) => {
                        unreachable!("a return statement can only unwind as far as the nearest function call")
                    }
                }
            }
        }
    }

    fn execute(&mut self, stmt: &Stmt) -> Unwind<()> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(())
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.output, "{value}").expect("write to output sink to succeed");
                Ok(())
            }
            Stmt::Var(var) => {
                let value = match &var.initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => Object::Nil,
                };
                self.environment.borrow_mut().define(&var.name.lexeme, value);
                Ok(())
            }
            Stmt::Block(block) => {
                let scope = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
                self.execute_block(&block.statements, scope)
            }
            Stmt::If(stmt) => {
                if self.evaluate(&stmt.condition)?.is_truthy() {
                    self.execute(&stmt.then_branch)
                } else if let Some(else_branch) = &stmt.else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }
            Stmt::While(stmt) => {
                while self.evaluate(&stmt.condition)?.is_truthy() {
                    self.execute(&stmt.body)?;
                }
                Ok(())
            }
            Stmt::Function(declaration) => {
                let function = Function::new(Rc::new(declaration.clone()), Rc::clone(&self.environment), false);
                self.environment.borrow_mut().define(&declaration.name.lexeme, Object::Function(Rc::new(function)));
                Ok(())
            }
            Stmt::Return(stmt) => {
                let value = match &stmt.value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Object::Nil,
                };
                Err(Signal::Return(value))
            }
            Stmt::Class(class) => self.execute_class(class),
        }
    }

    /// Runs `statements` in a fresh child scope, then restores the caller's
    /// environment even if a signal unwinds through — used both for plain
    /// `{ ... }` blocks and for function call frames.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: Rc<RefCell<Environment>>) -> Unwind<()> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let result = (|| {
            for statement in statements {
                self.execute(statement)?;
            }
            Ok(())
        })();

        self.environment = previous;
        result
    }

    fn execute_class(&mut self, class: &stmt::Class) -> Unwind<()> {
        let superclass = match &class.superclass {
            Some(expr) => {
                let value = self.evaluate(expr)?;
                match value {
                    Object::Class(class) => Some(class),
                    _ => {
                        let Expr::Variable(_, name) = expr else {
                            unreachable!("the resolver only allows a bare name as a superclass expression")
                        };
                        return Err(RuntimeError::new(name.clone(), "Superclass must be a class").into());
                    }
                }
            }
            None => None,
        };

        self.environment.borrow_mut().define(&class.name.lexeme, Object::Nil);

        let environment = if let Some(superclass) = &superclass {
            let environment = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
            environment.borrow_mut().define("super", Object::Class(Rc::clone(superclass)));
            environment
        } else {
            Rc::clone(&self.environment)
        };

        let previous = std::mem::replace(&mut self.environment, environment);
        let mut methods = HashMap::new();
        for method in &class.methods {
            let is_initializer = method.name.lexeme == "init";
            let function = Function::new(Rc::new(method.clone()), Rc::clone(&self.environment), is_initializer);
            methods.insert(method.name.lexeme.clone(), function);
        }
        self.environment = previous;

        let class_value = Class::new(class.name.lexeme.clone(), superclass, methods);
        self.environment.borrow_mut().assign(&class.name, Object::Class(Rc::new(class_value)))?;
        Ok(())
    }

    fn evaluate(&mut self, expr: &Expr) -> Unwind<Object> {
        match expr {
            Expr::Literal(_, value) => Ok(Self::literal(value)),
            Expr::Grouping(_, inner) => self.evaluate(inner),
            Expr::Unary(_, unary) => self.evaluate_unary(unary),
            Expr::Binary(_, binary) => self.evaluate_binary(binary),
            Expr::Logical(_, logical) => self.evaluate_logical(logical),
            Expr::Variable(id, name) => self.look_up_variable(*id, name),
            Expr::Assign(id, assign) => self.evaluate_assign(*id, assign),
            Expr::Call(_, call) => self.evaluate_call(call),
            Expr::Get(_, get) => self.evaluate_get(get),
            Expr::Set(_, set) => self.evaluate_set(set),
            Expr::This(id, keyword) => self.look_up_variable(*id, keyword),
            Expr::Super(id, sup) => self.evaluate_super(*id, sup),
        }
    }

    fn literal(value: &LiteralValue) -> Object {
        match value {
            LiteralValue::Nil => Object::Nil,
            LiteralValue::Bool(b) => Object::Bool(*b),
            LiteralValue::Number(n) => Object::Number(*n),
            LiteralValue::String(s) => Object::String(s.clone()),
        }
    }

    fn evaluate_unary(&mut self, unary: &crate::expr::Unary) -> Unwind<Object> {
        let operand = self.evaluate(&unary.operand)?;

        match unary.operator.kind {
            Type::Minus => {
                let n = Self::as_number(&unary.operator, &operand)?;
                Ok(Object::Number(-n))
            }
            Type::Bang => Ok(Object::Bool(!operand.is_truthy())),
            _ => unreachable!("the parser never produces a unary operator other than '-' or '!'"),
        }
    }

    fn evaluate_binary(&mut self, binary: &crate::expr::Binary) -> Unwind<Object> {
        let left = self.evaluate(&binary.left)?;
        let right = self.evaluate(&binary.right)?;
        let op = &binary.operator;

        let result = match op.kind {
            Type::Minus => Object::Number(Self::as_number(op, &left)? - Self::as_number(op, &right)?),
            Type::Slash => {
                let divisor = Self::as_number(op, &right)?;
                if divisor == 0.0 {
                    return Err(RuntimeError::new(op.clone(), "Division by zero").into());
                }
                Object::Number(Self::as_number(op, &left)? / divisor)
            }
            Type::Star => Object::Number(Self::as_number(op, &left)? * Self::as_number(op, &right)?),
            Type::Plus => match (&left, &right) {
                (Object::Number(a), Object::Number(b)) => Object::Number(a + b),
                (Object::String(a), Object::String(b)) => Object::String(format!("{a}{b}")),
                _ => {
                    return Err(RuntimeError::new(
                        op.clone(),
                        "Operands must be two numbers or two strings",
                    )
                    .into())
                }
            },
            Type::Greater => Object::Bool(Self::as_number(op, &left)? > Self::as_number(op, &right)?),
            Type::GreaterEqual => Object::Bool(Self::as_number(op, &left)? >= Self::as_number(op, &right)?),
            Type::Less => Object::Bool(Self::as_number(op, &left)? < Self::as_number(op, &right)?),
            Type::LessEqual => Object::Bool(Self::as_number(op, &left)? <= Self::as_number(op, &right)?),
            Type::EqualEqual => Object::Bool(left == right),
            Type::BangEqual => Object::Bool(left != right),
            _ => unreachable!("the parser never produces a binary operator outside this set"),
        };

        Ok(result)
    }

    fn evaluate_logical(&mut self, logical: &crate::expr::Logical) -> Unwind<Object> {
        let left = self.evaluate(&logical.left)?;

        if logical.operator.kind == Type::Or {
            if left.is_truthy() {
                return Ok(left);
            }
        } else if !left.is_truthy() {
            return Ok(left);
        }

        self.evaluate(&logical.right)
    }

    fn evaluate_assign(&mut self, id: NodeId, assign: &crate::expr::Assign) -> Unwind<Object> {
        let value = self.evaluate(&assign.value)?;

        match self.locals.get(&id) {
            Some(&distance) => Environment::assign_at(&self.environment, distance, &assign.name, value.clone())?,
            None => self.globals.borrow_mut().assign(&assign.name, value.clone())?,
        }

        Ok(value)
    }

    fn evaluate_call(&mut self, call: &crate::expr::Call) -> Unwind<Object> {
        let callee = self.evaluate(&call.callee)?;

        let mut arguments = Vec::with_capacity(call.arguments.len());
        for argument in &call.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        let arity = match &callee {
            Object::Function(function) => function.arity(),
            Object::NativeFunction(function) => function.arity(),
            Object::Class(class) => class.arity(),
            _ => return Err(RuntimeError::new(call.paren.clone(), "Can only call functions and classes").into()),
        };

        if arguments.len() != arity {
            return Err(RuntimeError::new(
                call.paren.clone(),
                format!("Expected {arity} arguments but got {}", arguments.len()),
            )
            .into());
        }

        let result = match &callee {
            Object::Function(function) => function.call(self, arguments),
            Object::NativeFunction(function) => function.call(self, arguments),
            Object::Class(class) => Class::instantiate(class, self, arguments),
            _ => unreachable!("callee kind already checked above"),
        };

        result.map_err(Signal::Error)
    }

    fn evaluate_get(&mut self, get: &crate::expr::Get) -> Unwind<Object> {
        let object = self.evaluate(&get.object)?;

        match object {
            Object::Instance(instance) => Instance::get(&instance, &get.name).map_err(Signal::Error),
            _ => Err(RuntimeError::new(get.name.clone(), "Only instances have properties").into()),
        }
    }

    fn evaluate_set(&mut self, set: &crate::expr::Set) -> Unwind<Object> {
        let object = self.evaluate(&set.object)?;

        let Object::Instance(instance) = object else {
            return Err(RuntimeError::new(set.name.clone(), "Only instances have fields").into());
        };

        let value = self.evaluate(&set.value)?;
        instance.borrow_mut().set(&set.name, value.clone());
        Ok(value)
    }

    fn evaluate_super(&mut self, id: NodeId, sup: &crate::expr::Super) -> Unwind<Object> {
        let distance = *self.locals.get(&id).expect("resolver always records a depth for 'super'");
        let superclass = Environment::get_at(&self.environment, distance, &sup.keyword)?;
        let Object::Class(superclass) = superclass else {
            unreachable!("'super' always resolves to the class bound by execute_class")
        };

        let this_token = Token::from("this");
        let instance = Environment::get_at(&self.environment, distance - 1, &this_token)?;

        let method = superclass.find_method(&sup.method.lexeme).ok_or_else(|| {
            RuntimeError::new(sup.method.clone(), format!("Undefined property '{}'", sup.method.lexeme))
        })?;

        Ok(Object::Function(Rc::new(method.bind(instance))))
    }

    fn look_up_variable(&mut self, id: NodeId, name: &Token) -> Unwind<Object> {
        let value = match self.locals.get(&id) {
            Some(&distance) => Environment::get_at(&self.environment, distance, name)?,
            None => self.globals.borrow().get(name)?,
        };
        Ok(value)
    }

    fn as_number(token: &Token, object: &Object) -> Unwind<f64> {
        match object {
            Object::Number(n) => Ok(*n),
            _ => Err(RuntimeError::new(token.clone(), "Operand must be a number").into()),
        }
    }
}
