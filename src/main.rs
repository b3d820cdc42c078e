use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;
use std::{env, fs};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use lox::Lox;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    match args.len() {
        0 => run_prompt(),
        1 => run_file(&args[0]),
        _ => {
            println!("Usage: lox [script]");
            process::exit(64);
        }
    }
}

fn run_file(path: &str) {
    let mut source = String::new();
    let mut file = fs::File::open(path).unwrap_or_else(|error| {
        eprintln!("Could not open '{path}': {error}");
        process::exit(64);
    });
    file.read_to_string(&mut source).unwrap_or_else(|error| {
        eprintln!("Could not read '{path}': {error}");
        process::exit(64);
    });

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let mut lox = Lox::new(&mut handle);
    lox.run(&source);

    if lox.had_error() {
        process::exit(65);
    }
    if lox.had_runtime_error() {
        process::exit(70);
    }
}

fn history_path() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(".lox_history"))
}

fn run_prompt() {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let mut lox = Lox::new(&mut handle);

    let mut editor = DefaultEditor::new().expect("failed to initialize line editor");
    let history = history_path();
    if let Some(path) = &history {
        let _ = editor.load_history(path);
    }

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                if line.is_empty() {
                    break;
                }
                let _ = editor.add_history_entry(line.as_str());
                lox.run(&line);
                lox.reset_diagnostics();
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => break,
            Err(error) => {
                eprintln!("Readline error: {error}");
                break;
            }
        }
    }

    if let Some(path) = &history {
        let _ = editor.save_history(path);
    }
}
