use std::str::Chars;

use peekmore::{PeekMore, PeekMoreIterator};

use crate::diagnostics::Diagnostics;
use crate::error::ScanError;
use crate::token::{Literal, Token, Type};

/// Converts source text into a flat token stream, reporting lex errors
/// through the shared [`Diagnostics`] context and continuing past them.
pub struct Scanner<'a> {
    source: PeekMoreIterator<Chars<'a>>,
    tokens: Vec<Token>,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source: source.chars().peekmore(),
            tokens: Vec::new(),
            line: 1,
        }
    }

    /// Scans the whole source and returns its tokens, always terminated by
    /// a single `EOF` token.
    pub fn scan_tokens(mut self, diagnostics: &mut Diagnostics) -> Vec<Token> {
        while !self.is_at_end() {
            self.scan_token(diagnostics);
        }

        self.tokens.push(Token::new(Type::EOF, String::new(), None, self.line));
        self.tokens
    }

    fn is_at_end(&mut self) -> bool {
        self.source.peek().is_none()
    }

    fn advance(&mut self) -> char {
        self.source.next().expect("advance called past end of source")
    }

    fn peek(&mut self) -> char {
        self.source.peek().copied().unwrap_or('\0')
    }

    /// Looks one character past `peek()` without consuming either. Resets
    /// the underlying peek cursor afterwards so a following `peek()` still
    /// reports the immediate next character.
    fn peek_next(&mut self) -> char {
        let c = self.source.peek_next().copied().unwrap_or('\0');
        self.source.reset_cursor();
        c
    }

    /// Consumes the next character if it matches `expected`.
    fn advance_if(&mut self, expected: char) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn scan_token(&mut self, diagnostics: &mut Diagnostics) {
        let c = self.advance();
        match c {
            '(' => self.emit(Type::LeftParen, c.to_string(), None),
            ')' => self.emit(Type::RightParen, c.to_string(), None),
            '{' => self.emit(Type::LeftBrace, c.to_string(), None),
            '}' => self.emit(Type::RightBrace, c.to_string(), None),
            ',' => self.emit(Type::Comma, c.to_string(), None),
            '.' => self.emit(Type::Dot, c.to_string(), None),
            '-' => self.emit(Type::Minus, c.to_string(), None),
            '+' => self.emit(Type::Plus, c.to_string(), None),
            ';' => self.emit(Type::Semicolon, c.to_string(), None),
            '*' => self.emit(Type::Star, c.to_string(), None),

            '!' => {
                if self.advance_if('=') {
                    self.emit(Type::BangEqual, "!=".to_string(), None);
                } else {
                    self.emit(Type::Bang, "!".to_string(), None);
                }
            }
            '=' => {
                if self.advance_if('=') {
                    self.emit(Type::EqualEqual, "==".to_string(), None);
                } else {
                    self.emit(Type::Equal, "=".to_string(), None);
                }
            }
            '<' => {
                if self.advance_if('=') {
                    self.emit(Type::LessEqual, "<=".to_string(), None);
                } else {
                    self.emit(Type::Less, "<".to_string(), None);
                }
            }
            '>' => {
                if self.advance_if('=') {
                    self.emit(Type::GreaterEqual, ">=".to_string(), None);
                } else {
                    self.emit(Type::Greater, ">".to_string(), None);
                }
            }
            '/' => {
                if self.advance_if('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else if self.advance_if('*') {
                    self.block_comment(diagnostics);
                } else {
                    self.emit(Type::Slash, "/".to_string(), None);
                }
            }

            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,

            '"' => self.string(diagnostics),

            c if c.is_ascii_digit() => self.number(c),
            c if c.is_alphabetic() || c == '_' => self.identifier(c),

            other => {
                diagnostics.report_scan_error(&ScanError::new(self.line, format!("Unexpected character '{other}'")))
            }
        }
    }

    /// Emits a token whose lexeme was built up by the caller (rather than
    /// re-sliced from the source, since the scanner is a pure char
    /// iterator with no random access into the original string).
    fn emit(&mut self, kind: Type, lexeme: String, literal: Option<Literal>) {
        self.tokens.push(Token::new(kind, lexeme, literal, self.line));
    }

    fn block_comment(&mut self, diagnostics: &mut Diagnostics) {
        let start_line = self.line;
        loop {
            if self.is_at_end() {
                diagnostics.report_scan_error(&ScanError::new(start_line, "Unterminated block comment"));
                return;
            }

            if self.peek() == '*' && self.peek_next() == '/' {
                self.advance();
                self.advance();
                return;
            }

            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }
    }

    fn string(&mut self, diagnostics: &mut Diagnostics) {
        let start_line = self.line;
        let mut value = String::new();

        while self.peek() != '"' && !self.is_at_end() {
            let c = self.advance();
            if c == '\n' {
                self.line += 1;
            }
            value.push(c);
        }

        if self.is_at_end() {
            diagnostics.report_scan_error(&ScanError::new(start_line, "Unterminated string"));
            return;
        }

        self.advance(); // closing quote

        let lexeme = format!("\"{value}\"");
        self.emit(Type::String, lexeme, Some(Literal::String(value)));
    }

    fn number(&mut self, first: char) {
        let mut value = String::from(first);

        while self.peek().is_ascii_digit() {
            value.push(self.advance());
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            value.push(self.advance()); // consume the '.'
            while self.peek().is_ascii_digit() {
                value.push(self.advance());
            }
        }

        let number: f64 = value.parse().expect("scanned number literal to be valid");
        self.emit(Type::Number, value, Some(Literal::Number(number)));
    }

    fn identifier(&mut self, first: char) {
        let mut value = String::from(first);

        while self.peek().is_alphanumeric() || self.peek() == '_' {
            value.push(self.advance());
        }

        let kind = match value.as_str() {
            "and" => Type::And,
            "class" => Type::Class,
            "else" => Type::Else,
            "false" => Type::False,
            "for" => Type::For,
            "fun" => Type::Fun,
            "if" => Type::If,
            "nil" => Type::Nil,
            "or" => Type::Or,
            "print" => Type::Print,
            "return" => Type::Return,
            "super" => Type::Super,
            "this" => Type::This,
            "true" => Type::True,
            "var" => Type::Var,
            "while" => Type::While,
            _ => Type::Identifier,
        };

        self.emit(kind, value, None);
    }
}
