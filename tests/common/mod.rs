use lox::Lox;

/// Runs one Lox program through the full pipeline and returns what it
/// printed, plus whether scanning/parsing/resolving or execution reported
/// an error. Mirrors how the CLI drives `Lox`, just with an in-memory sink
/// instead of stdout, so assertions can compare strings directly.
pub struct Run {
    pub output: String,
    pub had_error: bool,
    pub had_runtime_error: bool,
}

pub fn run(source: &str) -> Run {
    let mut buffer = Vec::new();
    let mut lox = Lox::new(&mut buffer);
    lox.run(source);
    let had_error = lox.had_error();
    let had_runtime_error = lox.had_runtime_error();
    drop(lox);
    Run { output: String::from_utf8(buffer).expect("program output to be valid UTF-8"), had_error, had_runtime_error }
}

/// Asserts a program runs cleanly and prints exactly the given lines.
#[macro_export]
macro_rules! assert_prints {
    ($source:expr, $($line:expr),* $(,)?) => {{
        let result = $crate::common::run($source);
        let mut expected = vec![$($line),*];
        expected.push("");
        assert!(!result.had_error, "unexpected static error for: {}", $source);
        assert!(!result.had_runtime_error, "unexpected runtime error for: {}", $source);
        assert_eq!(result.output, expected.join("\n"));
    }};
}
