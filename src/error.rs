use std::fmt::{self, Display};

use crate::object::Object;
use crate::token::{Token, Type};

/// Renders the shared `[line N] Error at '<lexeme>': <message>` shape that
/// `ParseError` and `ResolveError` both report, or `Error at end` for the
/// `EOF` token.
fn fmt_at(f: &mut fmt::Formatter<'_>, token: &Token, message: &str) -> fmt::Result {
    if token.kind == Type::EOF {
        write!(f, "[line {}] Error at end: {message}", token.line)
    } else {
        write!(f, "[line {}] Error at '{}': {message}", token.line, token.lexeme)
    }
}

/// A malformed token: an unexpected character, an unterminated string, or
/// an unterminated block comment. Carries only a line, since scanning
/// hasn't produced a token to point at yet.
#[derive(Debug, Clone)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl ScanError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        ScanError { line, message: message.into() }
    }
}

impl Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error: {}", self.line, self.message)
    }
}

/// A token where none was expected, or a grammar rule that can't continue.
/// Carries the offending token so the report can point at its line and
/// lexeme (or "at end" for `EOF`).
#[derive(Debug, Clone)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl ParseError {
    pub fn new(token: Token, message: impl Into<String>) -> Self {
        ParseError { token, message: message.into() }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_at(f, &self.token, &self.message)
    }
}

/// A scope/flow rule violation caught by the resolver: double declaration
/// in one scope, `return`/`this`/`super` used where they're not allowed,
/// self-inheritance, or reading a local in its own initializer.
#[derive(Debug, Clone)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl ResolveError {
    pub fn new(token: Token, message: impl Into<String>) -> Self {
        ResolveError { token, message: message.into() }
    }
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_at(f, &self.token, &self.message)
    }
}

/// A language-level failure: type mismatch, bad arity, undefined name, and
/// so on. Carries the offending token so the diagnostics context can report
/// its line and lexeme.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl RuntimeError {
    pub fn new(token: Token, message: impl Into<String>) -> Self {
        RuntimeError { token, message: message.into() }
    }
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n[line {}]", self.message, self.token.line)
    }
}

/// What can interrupt normal statement-by-statement execution.
///
/// `Return` is not an error — it is the control-flow signal a `return`
/// statement raises to unwind exactly to its enclosing function call. Folding
/// it into the same `Result` as `RuntimeError` (rather than a second,
/// separately-propagated mechanism) means every block/loop/call site that
/// already has to propagate errors with `?` also correctly propagates a
/// pending return without extra bookkeeping.
#[derive(Debug, Clone)]
pub enum Signal {
    Return(Object),
    Error(RuntimeError),
}

impl From<RuntimeError> for Signal {
    fn from(error: RuntimeError) -> Self {
        Signal::Error(error)
    }
}

pub type Unwind<T> = Result<T, Signal>;
