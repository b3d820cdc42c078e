use std::collections::HashMap;

use crate::diagnostics::Diagnostics;
use crate::error::ResolveError;
use crate::expr::{Expr, NodeId};
use crate::interpreter::Interpreter;
use crate::stmt::{self, Stmt};
use crate::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
    Initializer,
    Method,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

/// A static pass between parsing and evaluation that resolves every
/// variable reference to the number of scopes between its use and its
/// declaration, so the interpreter can look it up by depth instead of
/// walking the environment chain and hoping for the best. Also enforces
/// scope-related errors the parser alone cannot catch (reading a local
/// in its own initializer, `return` outside a function, and so on).
pub struct Resolver<'a, 'out> {
    interpreter: &'a mut Interpreter<'out>,
    scopes: Vec<HashMap<String, bool>>,
    current_function: FunctionType,
    current_class: ClassType,
}

impl<'a, 'out> Resolver<'a, 'out> {
    pub fn new(interpreter: &'a mut Interpreter<'out>) -> Self {
        Resolver {
            interpreter,
            scopes: Vec::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
        }
    }

    pub fn resolve(&mut self, statements: &[Stmt], diagnostics: &mut Diagnostics) {
        self.resolve_statements(statements, diagnostics);
    }

    fn resolve_statements(&mut self, statements: &[Stmt], diagnostics: &mut Diagnostics) {
        for statement in statements {
            self.resolve_statement(statement, diagnostics);
        }
    }

    fn error(&self, token: &Token, message: &str, diagnostics: &mut Diagnostics) {
        diagnostics.report_resolve_error(&ResolveError::new(token.clone(), message));
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Marks `name` as declared-but-not-yet-defined in the innermost scope,
    /// so a reference to it inside its own initializer is caught as an error
    /// rather than silently shadowing an outer binding.
    fn declare(&mut self, name: &Token, diagnostics: &mut Diagnostics) {
        let Some(scope) = self.scopes.last_mut() else { return };

        if scope.contains_key(&name.lexeme) {
            self.error(name, "Already a variable with this name in this scope", diagnostics);
        }

        scope.insert(name.lexeme.clone(), false);
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    fn resolve_local(&mut self, id: NodeId, name: &Token) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.interpreter.resolve(id, depth);
                return;
            }
        }
        // Unresolved names are assumed global; the interpreter looks them
        // up in the global environment at runtime.
    }

    fn resolve_function(&mut self, function: &stmt::Function, kind: FunctionType, diagnostics: &mut Diagnostics) {
        let enclosing_function = self.current_function;
        self.current_function = kind;

        self.begin_scope();
        for param in &function.params {
            self.declare(param, diagnostics);
            self.define(param);
        }
        self.resolve_statements(&function.body, diagnostics);
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn resolve_statement(&mut self, statement: &Stmt, diagnostics: &mut Diagnostics) {
        match statement {
            Stmt::Expression(expr) => self.resolve_expr(expr, diagnostics),
            Stmt::Print(expr) => self.resolve_expr(expr, diagnostics),
            Stmt::Var(var) => {
                self.declare(&var.name, diagnostics);
                if let Some(initializer) = &var.initializer {
                    self.resolve_expr(initializer, diagnostics);
                }
                self.define(&var.name);
            }
            Stmt::Block(block) => {
                self.begin_scope();
                self.resolve_statements(&block.statements, diagnostics);
                self.end_scope();
            }
            Stmt::If(stmt) => {
                self.resolve_expr(&stmt.condition, diagnostics);
                self.resolve_statement(&stmt.then_branch, diagnostics);
                if let Some(else_branch) = &stmt.else_branch {
                    self.resolve_statement(else_branch, diagnostics);
                }
            }
            Stmt::While(stmt) => {
                self.resolve_expr(&stmt.condition, diagnostics);
                self.resolve_statement(&stmt.body, diagnostics);
            }
            Stmt::Function(function) => {
                self.declare(&function.name, diagnostics);
                self.define(&function.name);
                self.resolve_function(function, FunctionType::Function, diagnostics);
            }
            Stmt::Return(stmt) => {
                if self.current_function == FunctionType::None {
                    self.error(&stmt.keyword, "Can't return from top-level code", diagnostics);
                }
                if let Some(value) = &stmt.value {
                    if self.current_function == FunctionType::Initializer {
                        self.error(&stmt.keyword, "Can't return a value from an initializer", diagnostics);
                    }
                    self.resolve_expr(value, diagnostics);
                }
            }
            Stmt::Class(class) => self.resolve_class(class, diagnostics),
        }
    }

    fn resolve_class(&mut self, class: &stmt::Class, diagnostics: &mut Diagnostics) {
        let enclosing_class = self.current_class;
        self.current_class = ClassType::Class;

        self.declare(&class.name, diagnostics);
        self.define(&class.name);

        if let Some(superclass) = &class.superclass {
            if let Expr::Variable(_, name) = superclass {
                if name.lexeme == class.name.lexeme {
                    self.error(name, "A class can't inherit from itself", diagnostics);
                }
            }
            self.current_class = ClassType::Subclass;
            self.resolve_expr(superclass, diagnostics);

            self.begin_scope();
            self.scopes.last_mut().expect("scope just pushed").insert("super".to_string(), true);
        }

        self.begin_scope();
        self.scopes.last_mut().expect("scope just pushed").insert("this".to_string(), true);

        for method in &class.methods {
            let kind = if method.name.lexeme == "init" { FunctionType::Initializer } else { FunctionType::Method };
            self.resolve_function(method, kind, diagnostics);
        }

        self.end_scope();

        if class.superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }

    fn resolve_expr(&mut self, expr: &Expr, diagnostics: &mut Diagnostics) {
        match expr {
            Expr::Literal(..) => {}
            Expr::Grouping(_, inner) => self.resolve_expr(inner, diagnostics),
            Expr::Unary(_, unary) => self.resolve_expr(&unary.operand, diagnostics),
            Expr::Binary(_, binary) => {
                self.resolve_expr(&binary.left, diagnostics);
                self.resolve_expr(&binary.right, diagnostics);
            }
            Expr::Logical(_, logical) => {
                self.resolve_expr(&logical.left, diagnostics);
                self.resolve_expr(&logical.right, diagnostics);
            }
            Expr::Variable(id, name) => {
                if let Some(scope) = self.scopes.last() {
                    if scope.get(&name.lexeme) == Some(&false) {
                        self.error(name, "Can't read local variable in its own initializer", diagnostics);
                    }
                }
                self.resolve_local(*id, name);
            }
            Expr::Assign(id, assign) => {
                self.resolve_expr(&assign.value, diagnostics);
                self.resolve_local(*id, &assign.name);
            }
            Expr::Call(_, call) => {
                self.resolve_expr(&call.callee, diagnostics);
                for argument in &call.arguments {
                    self.resolve_expr(argument, diagnostics);
                }
            }
            Expr::Get(_, get) => self.resolve_expr(&get.object, diagnostics),
            Expr::Set(_, set) => {
                self.resolve_expr(&set.value, diagnostics);
                self.resolve_expr(&set.object, diagnostics);
            }
            Expr::This(id, keyword) => {
                if self.current_class == ClassType::None {
                    self.error(keyword, "Can't use 'this' outside of a class", diagnostics);
                    return;
                }
                self.resolve_local(*id, keyword);
            }
            Expr::Super(id, sup) => {
                if self.current_class == ClassType::None {
                    self.error(&sup.keyword, "Can't use 'super' outside of a class", diagnostics);
                } else if self.current_class != ClassType::Subclass {
                    self.error(&sup.keyword, "Can't use 'super' in a class with no superclass", diagnostics);
                }
                self.resolve_local(*id, &sup.keyword);
            }
        }
    }
}
