use crate::error::{ParseError, ResolveError, RuntimeError, ScanError};

/// Tracks whether any error has been reported so far during one `run`.
///
/// Owned by the top-level [`crate::Lox`] driver and threaded by mutable
/// reference into the scanner, parser, resolver, and interpreter, instead of
/// the `static mut` flags a naive port of the book reaches for. Two `Lox`
/// instances (e.g. two tests running in the same process) never share state.
#[derive(Debug, Default)]
pub struct Diagnostics {
    had_error: bool,
    had_runtime_error: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    pub fn reset(&mut self) {
        self.had_error = false;
        self.had_runtime_error = false;
    }

    pub fn report_scan_error(&mut self, error: &ScanError) {
        eprintln!("{error}");
        self.had_error = true;
    }

    pub fn report_parse_error(&mut self, error: &ParseError) {
        eprintln!("{error}");
        self.had_error = true;
    }

    pub fn report_resolve_error(&mut self, error: &ResolveError) {
        eprintln!("{error}");
        self.had_error = true;
    }

    pub fn report_runtime_error(&mut self, error: &RuntimeError) {
        eprintln!("{error}");
        self.had_runtime_error = true;
    }
}
