//! A tree-walking interpreter for the Lox programming language, following
//! the pipeline from Bob Nystrom's *Crafting Interpreters*: scan source
//! text into tokens, parse tokens into an AST, resolve variable scoping
//! statically, then walk the AST to evaluate it directly. There is no
//! bytecode stage and no separate compilation step.
//!
//! ## Pipeline
//!
//! `source -> Scanner -> [Token] -> Parser -> [Stmt] -> Resolver -> (depth table) -> Interpreter`
//!
//! Each stage reports its own category of error through a shared
//! [`Diagnostics`] context rather than a global flag, so two [`Lox`]
//! instances never interfere with each other even in the same process
//! (this is what lets the test suite run many interpreters in parallel).

use std::io::Write;

pub mod ast;
pub mod class;
pub mod diagnostics;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use diagnostics::Diagnostics;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// The top-level driver: owns one [`Interpreter`] across however many
/// times `run` is called, so a REPL session's variables and classes
/// persist from line to line the same way the book's `Lox` class does.
pub struct Lox<'out> {
    interpreter: Interpreter<'out>,
    diagnostics: Diagnostics,
}

impl<'out> Lox<'out> {
    pub fn new(output: &'out mut dyn Write) -> Self {
        Lox { interpreter: Interpreter::new(output), diagnostics: Diagnostics::new() }
    }

    pub fn had_error(&self) -> bool {
        self.diagnostics.had_error()
    }

    pub fn had_runtime_error(&self) -> bool {
        self.diagnostics.had_runtime_error()
    }

    /// Runs one complete source unit: a whole file in file mode, or one
    /// line in REPL mode. Stops early at whichever stage first reports an
    /// error — scanning always hands its tokens on to the parser even if
    /// it found a bad token (matching the book's "report and keep going"
    /// behavior), but a parse or resolve error skips execution entirely.
    pub fn run(&mut self, source: &str) {
        let scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens(&mut self.diagnostics);

        let mut parser = Parser::new(&tokens);
        let statements = parser.parse(&mut self.diagnostics);

        if self.diagnostics.had_error() {
            return;
        }

        let mut resolver = Resolver::new(&mut self.interpreter);
        resolver.resolve(&statements, &mut self.diagnostics);

        if self.diagnostics.had_error() {
            return;
        }

        self.interpreter.interpret(&statements, &mut self.diagnostics);
    }

    /// Clears both error flags so one bad REPL line doesn't poison the
    /// session for the next one.
    pub fn reset_diagnostics(&mut self) {
        self.diagnostics.reset();
    }
}
