mod common;

use lox::diagnostics::Diagnostics;
use lox::scanner::Scanner;
use lox::token::{Literal, Type};

fn scan(source: &str) -> (Vec<Type>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let scanner = Scanner::new(source);
    let tokens = scanner.scan_tokens(&mut diagnostics);
    (tokens.into_iter().map(|t| t.kind).collect(), diagnostics)
}

#[test]
fn single_and_double_char_operators() {
    let (kinds, diagnostics) = scan("! != = == > >= < <=");
    assert_eq!(
        kinds,
        vec![
            Type::Bang,
            Type::BangEqual,
            Type::Equal,
            Type::EqualEqual,
            Type::Greater,
            Type::GreaterEqual,
            Type::Less,
            Type::LessEqual,
            Type::EOF,
        ]
    );
    assert!(!diagnostics.had_error());
}

#[test]
fn keywords_are_distinguished_from_identifiers() {
    let (kinds, _) = scan("class fun forest and or print");
    assert_eq!(
        kinds,
        vec![Type::Class, Type::Fun, Type::Identifier, Type::And, Type::Or, Type::Print, Type::EOF]
    );
}

#[test]
fn line_comment_is_discarded() {
    let mut diagnostics = Diagnostics::new();
    let scanner = Scanner::new("1 // a comment\n+ 2");
    let tokens = scanner.scan_tokens(&mut diagnostics);
    let kinds: Vec<Type> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![Type::Number, Type::Plus, Type::Number, Type::EOF]);
    assert_eq!(tokens[2].line, 2);
}

#[test]
fn block_comment_is_discarded_and_not_nestable() {
    let (kinds, diagnostics) = scan("1 /* block\ncomment */ + 2");
    assert_eq!(kinds, vec![Type::Number, Type::Plus, Type::Number, Type::EOF]);
    assert!(!diagnostics.had_error());
}

#[test]
fn unterminated_block_comment_is_a_scan_error() {
    let (_, diagnostics) = scan("1 /* never closes");
    assert!(diagnostics.had_error());
}

#[test]
fn string_literal_captures_content_without_quotes() {
    let mut diagnostics = Diagnostics::new();
    let scanner = Scanner::new("\"hello\\n\"");
    let tokens = scanner.scan_tokens(&mut diagnostics);
    match &tokens[0].literal {
        Some(Literal::String(s)) => assert_eq!(s, "hello\\n"),
        other => panic!("expected string literal, got {other:?}"),
    }
}

#[test]
fn multi_line_string_tracks_line_number_of_following_token() {
    let mut diagnostics = Diagnostics::new();
    let scanner = Scanner::new("\"a\nb\" 1");
    let tokens = scanner.scan_tokens(&mut diagnostics);
    assert_eq!(tokens[0].kind, Type::String);
    assert_eq!(tokens[1].line, 2);
}

#[test]
fn unterminated_string_is_a_scan_error() {
    let (_, diagnostics) = scan("\"never closes");
    assert!(diagnostics.had_error());
}

#[test]
fn number_literal_parses_integer_and_fractional_parts() {
    let mut diagnostics = Diagnostics::new();
    let scanner = Scanner::new("123 45.67");
    let tokens = scanner.scan_tokens(&mut diagnostics);
    assert_eq!(tokens[0].literal, Some(Literal::Number(123.0)));
    assert_eq!(tokens[1].literal, Some(Literal::Number(45.67)));
}

#[test]
fn trailing_dot_without_digits_is_not_part_of_number() {
    // `123.` has no digit after the dot, so the dot is its own token.
    let (kinds, _) = scan("123.");
    assert_eq!(kinds, vec![Type::Number, Type::Dot, Type::EOF]);
}

#[test]
fn unexpected_character_is_a_scan_error_but_scanning_continues() {
    let (kinds, diagnostics) = scan("1 @ 2");
    assert!(diagnostics.had_error());
    assert_eq!(kinds, vec![Type::Number, Type::Number, Type::EOF]);
}

#[test]
fn empty_source_yields_only_eof() {
    let (kinds, diagnostics) = scan("");
    assert_eq!(kinds, vec![Type::EOF]);
    assert!(!diagnostics.had_error());
}
