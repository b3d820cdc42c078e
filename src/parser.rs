use crate::diagnostics::Diagnostics;
use crate::error::ParseError;
use crate::expr::{self, Expr, LiteralValue, NodeId};
use crate::stmt::{self, Stmt};
use crate::token::{Literal, Token, Type};

type ParseResult<T> = Result<T, ParseError>;

/// Returns whether the next token is any of the given types, consuming it
/// if so.
macro_rules! matches_type {
    ( $self:ident, $( $type:expr ),+ ) => {
        {
            if $( $self.check($type) )||+ {
                $self.advance();
                true
            } else {
                false
            }
        }
    }
}

/// A hand-written recursive-descent parser producing an AST from a flat
/// token stream. Precedence climbs from `assignment` (loosest) down to
/// `primary` (tightest), one method per grammar rule:
///
/// - `program      -> declaration* EOF`
/// - `declaration  -> classDecl | funDecl | varDecl | statement`
/// - `classDecl    -> "class" IDENTIFIER ( "<" IDENTIFIER )? "{" function* "}"`
/// - `funDecl      -> "fun" function`
/// - `function     -> IDENTIFIER "(" parameters? ")" block`
/// - `varDecl      -> "var" IDENTIFIER ( "=" expression )? ";"`
/// - `statement    -> exprStmt | forStmt | ifStmt | printStmt | returnStmt | whileStmt | block`
/// - `forStmt      -> "for" "(" ( varDecl | exprStmt | ";" ) expression? ";" expression? ")" statement`
/// - `ifStmt       -> "if" "(" expression ")" statement ( "else" statement )?`
/// - `whileStmt    -> "while" "(" expression ")" statement`
/// - `expression   -> assignment`
/// - `assignment   -> ( call "." )? IDENTIFIER "=" assignment | logic_or`
/// - `logic_or     -> logic_and ( "or" logic_and )*`
/// - `logic_and    -> equality ( "and" equality )*`
/// - `equality     -> comparison ( ( "!=" | "==" ) comparison )*`
/// - `comparison   -> term ( ( ">" | ">=" | "<" | "<=" ) term )*`
/// - `term         -> factor ( ( "+" | "-" ) factor )*`
/// - `factor       -> unary ( ( "/" | "*" ) unary )*`
/// - `unary        -> ( "!" | "-" ) unary | call`
/// - `call         -> primary ( "(" arguments? ")" | "." IDENTIFIER )*`
/// - `primary      -> NUMBER | STRING | "true" | "false" | "nil" | "this"`
///   `             | "(" expression ")" | IDENTIFIER | "super" "." IDENTIFIER`
pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
    node_counter: u32,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser { tokens, current: 0, node_counter: 0 }
    }

    fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.node_counter);
        self.node_counter += 1;
        id
    }

    pub fn parse(&mut self, diagnostics: &mut Diagnostics) -> Vec<Stmt> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            if let Some(stmt) = self.declaration(diagnostics) {
                statements.push(stmt);
            }
        }
        statements
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == Type::EOF
    }

    fn check(&self, kind: Type) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn consume(&mut self, kind: Type, message: &str, diagnostics: &mut Diagnostics) -> ParseResult<Token> {
        if self.check(kind) {
            return Ok(self.advance().clone());
        }
        Err(self.error(self.peek().clone(), message, diagnostics))
    }

    /// Builds a [`ParseError`] for `token`, reports it immediately, and hands
    /// it back so the caller can decide whether to bail via `Err(..)` or,
    /// for the non-fatal 255-parameter/argument limits, keep parsing.
    fn error(&self, token: Token, message: &str, diagnostics: &mut Diagnostics) -> ParseError {
        let error = ParseError::new(token, message);
        diagnostics.report_parse_error(&error);
        error
    }

    fn declaration(&mut self, diagnostics: &mut Diagnostics) -> Option<Stmt> {
        let result = if matches_type!(self, Type::Class) {
            self.class_declaration(diagnostics)
        } else if matches_type!(self, Type::Fun) {
            self.function("function", diagnostics)
        } else if matches_type!(self, Type::Var) {
            self.var_declaration(diagnostics)
        } else {
            self.statement(diagnostics)
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(_) => {
                self.synchronize();
                None
            }
        }
    }

    fn class_declaration(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, "Expect class name", diagnostics)?;

        let superclass = if matches_type!(self, Type::Less) {
            self.consume(Type::Identifier, "Expect superclass name", diagnostics)?;
            Some(Expr::Variable(self.next_id(), self.previous().clone()))
        } else {
            None
        };

        self.consume(Type::LeftBrace, "Expect '{' before class body", diagnostics)?;

        let mut methods = Vec::new();
        while !self.check(Type::RightBrace) && !self.is_at_end() {
            let Stmt::Function(method) = self.function("method", diagnostics)? else {
                unreachable!("function() always produces Stmt::Function")
            };
            methods.push(method);
        }

        self.consume(Type::RightBrace, "Expect '}' after class body", diagnostics)?;

        Ok(Stmt::Class(stmt::Class { name, superclass, methods }))
    }

    fn var_declaration(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, "Expect variable name", diagnostics)?;

        let initializer =
            if matches_type!(self, Type::Equal) { Some(self.expression(diagnostics)?) } else { None };

        self.consume(Type::Semicolon, "Expect ';' after variable declaration", diagnostics)?;
        Ok(Stmt::Var(stmt::Var { name, initializer }))
    }

    fn function(&mut self, kind: &str, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, &format!("Expect {kind} name"), diagnostics)?;

        self.consume(Type::LeftParen, &format!("Expect '(' after {kind} name"), diagnostics)?;

        let mut params = Vec::new();
        if !self.check(Type::RightParen) {
            loop {
                if params.len() >= 255 {
                    self.error(self.peek().clone(), "Can't have more than 255 parameters", diagnostics);
                }
                params.push(self.consume(Type::Identifier, "Expect parameter name", diagnostics)?);

                if !matches_type!(self, Type::Comma) {
                    break;
                }
            }
        }
        self.consume(Type::RightParen, "Expect ')' after parameters", diagnostics)?;

        self.consume(Type::LeftBrace, &format!("Expect '{{' before {kind} body"), diagnostics)?;
        let body = self.block(diagnostics)?;

        Ok(Stmt::Function(stmt::Function { name, params, body }))
    }

    fn statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        if matches_type!(self, Type::For) {
            return self.for_statement(diagnostics);
        }
        if matches_type!(self, Type::If) {
            return self.if_statement(diagnostics);
        }
        if matches_type!(self, Type::Print) {
            return self.print_statement(diagnostics);
        }
        if matches_type!(self, Type::Return) {
            return self.return_statement(diagnostics);
        }
        if matches_type!(self, Type::While) {
            return self.while_statement(diagnostics);
        }
        if matches_type!(self, Type::LeftBrace) {
            return Ok(Stmt::Block(stmt::Block { statements: self.block(diagnostics)? }));
        }
        self.expression_statement(diagnostics)
    }

    /// Desugars `for (init; cond; incr) body` into a `while` wrapped in the
    /// blocks needed to scope `init` and run `incr` after every iteration —
    /// there is no dedicated `For` AST node.
    fn for_statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'for'", diagnostics)?;

        let initializer = if matches_type!(self, Type::Semicolon) {
            None
        } else if matches_type!(self, Type::Var) {
            Some(self.var_declaration(diagnostics)?)
        } else {
            Some(self.expression_statement(diagnostics)?)
        };

        let condition =
            if !self.check(Type::Semicolon) { Some(self.expression(diagnostics)?) } else { None };
        self.consume(Type::Semicolon, "Expect ';' after loop condition", diagnostics)?;

        let increment =
            if !self.check(Type::RightParen) { Some(self.expression(diagnostics)?) } else { None };
        self.consume(Type::RightParen, "Expect ')' after for clauses", diagnostics)?;

        let mut body = self.statement(diagnostics)?;

        if let Some(increment) = increment {
            body = Stmt::Block(stmt::Block { statements: vec![body, Stmt::Expression(increment)] });
        }

        let condition = condition.unwrap_or(Expr::Literal(self.next_id(), LiteralValue::Bool(true)));
        body = Stmt::While(stmt::While { condition, body: Box::new(body) });

        if let Some(initializer) = initializer {
            body = Stmt::Block(stmt::Block { statements: vec![initializer, body] });
        }

        Ok(body)
    }

    fn if_statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'if'", diagnostics)?;
        let condition = self.expression(diagnostics)?;
        self.consume(Type::RightParen, "Expect ')' after if condition", diagnostics)?;

        let then_branch = Box::new(self.statement(diagnostics)?);
        let else_branch =
            if matches_type!(self, Type::Else) { Some(Box::new(self.statement(diagnostics)?)) } else { None };

        Ok(Stmt::If(stmt::If { condition, then_branch, else_branch }))
    }

    fn print_statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        let value = self.expression(diagnostics)?;
        self.consume(Type::Semicolon, "Expect ';' after value", diagnostics)?;
        Ok(Stmt::Print(value))
    }

    fn return_statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();
        let value = if !self.check(Type::Semicolon) { Some(self.expression(diagnostics)?) } else { None };
        self.consume(Type::Semicolon, "Expect ';' after return value", diagnostics)?;
        Ok(Stmt::Return(stmt::Return { keyword, value }))
    }

    fn while_statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'while'", diagnostics)?;
        let condition = self.expression(diagnostics)?;
        self.consume(Type::RightParen, "Expect ')' after condition", diagnostics)?;
        let body = Box::new(self.statement(diagnostics)?);
        Ok(Stmt::While(stmt::While { condition, body }))
    }

    fn expression_statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        let expr = self.expression(diagnostics)?;
        self.consume(Type::Semicolon, "Expect ';' after expression", diagnostics)?;
        Ok(Stmt::Expression(expr))
    }

    fn block(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();
        while !self.check(Type::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration(diagnostics) {
                statements.push(stmt);
            }
        }
        self.consume(Type::RightBrace, "Expect '}' after block", diagnostics)?;
        Ok(statements)
    }

    fn expression(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        self.assignment(diagnostics)
    }

    fn assignment(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let expr = self.or(diagnostics)?;

        if matches_type!(self, Type::Equal) {
            let equals = self.previous().clone();
            let value = self.assignment(diagnostics)?;

            return match expr {
                Expr::Variable(_, name) => Ok(Expr::Assign(self.next_id(), expr::Assign { name, value: Box::new(value) })),
                Expr::Get(_, get) => {
                    Ok(Expr::Set(self.next_id(), expr::Set { object: get.object, name: get.name, value: Box::new(value) }))
                }
                _ => Err(self.error(equals, "Invalid assignment target", diagnostics)),
            };
        }

        Ok(expr)
    }

    fn or(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let mut expr = self.and(diagnostics)?;

        while matches_type!(self, Type::Or) {
            let operator = self.previous().clone();
            let right = self.and(diagnostics)?;
            expr = Expr::Logical(self.next_id(), expr::Logical { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn and(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let mut expr = self.equality(diagnostics)?;

        while matches_type!(self, Type::And) {
            let operator = self.previous().clone();
            let right = self.equality(diagnostics)?;
            expr = Expr::Logical(self.next_id(), expr::Logical { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn equality(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let mut expr = self.comparison(diagnostics)?;

        while matches_type!(self, Type::BangEqual, Type::EqualEqual) {
            let operator = self.previous().clone();
            let right = self.comparison(diagnostics)?;
            expr = Expr::Binary(self.next_id(), expr::Binary { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn comparison(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let mut expr = self.term(diagnostics)?;

        while matches_type!(self, Type::Greater, Type::GreaterEqual, Type::Less, Type::LessEqual) {
            let operator = self.previous().clone();
            let right = self.term(diagnostics)?;
            expr = Expr::Binary(self.next_id(), expr::Binary { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn term(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let mut expr = self.factor(diagnostics)?;

        while matches_type!(self, Type::Minus, Type::Plus) {
            let operator = self.previous().clone();
            let right = self.factor(diagnostics)?;
            expr = Expr::Binary(self.next_id(), expr::Binary { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn factor(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let mut expr = self.unary(diagnostics)?;

        while matches_type!(self, Type::Slash, Type::Star) {
            let operator = self.previous().clone();
            let right = self.unary(diagnostics)?;
            expr = Expr::Binary(self.next_id(), expr::Binary { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn unary(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        if matches_type!(self, Type::Bang, Type::Minus) {
            let operator = self.previous().clone();
            let operand = self.unary(diagnostics)?;
            return Ok(Expr::Unary(self.next_id(), expr::Unary { operator, operand: Box::new(operand) }));
        }

        self.call(diagnostics)
    }

    fn finish_call(&mut self, callee: Expr, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let mut arguments = Vec::new();

        if !self.check(Type::RightParen) {
            loop {
                if arguments.len() >= 255 {
                    self.error(self.peek().clone(), "Can't have more than 255 arguments", diagnostics);
                }
                arguments.push(self.expression(diagnostics)?);
                if !matches_type!(self, Type::Comma) {
                    break;
                }
            }
        }

        let paren = self.consume(Type::RightParen, "Expect ')' after arguments", diagnostics)?;

        Ok(Expr::Call(self.next_id(), expr::Call { callee: Box::new(callee), paren, arguments }))
    }

    fn call(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let mut expr = self.primary(diagnostics)?;

        loop {
            if matches_type!(self, Type::LeftParen) {
                expr = self.finish_call(expr, diagnostics)?;
            } else if matches_type!(self, Type::Dot) {
                let name = self.consume(Type::Identifier, "Expect property name after '.'", diagnostics)?;
                expr = Expr::Get(self.next_id(), expr::Get { object: Box::new(expr), name });
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn primary(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        if matches_type!(self, Type::False) {
            return Ok(Expr::Literal(self.next_id(), LiteralValue::Bool(false)));
        }
        if matches_type!(self, Type::True) {
            return Ok(Expr::Literal(self.next_id(), LiteralValue::Bool(true)));
        }
        if matches_type!(self, Type::Nil) {
            return Ok(Expr::Literal(self.next_id(), LiteralValue::Nil));
        }
        if matches_type!(self, Type::Number, Type::String) {
            let literal = self.previous().literal.clone().expect("number or string token to carry a literal");
            let value = match literal {
                Literal::Number(n) => LiteralValue::Number(n),
                Literal::String(s) => LiteralValue::String(s),
            };
            return Ok(Expr::Literal(self.next_id(), value));
        }
        if matches_type!(self, Type::Super) {
            let keyword = self.previous().clone();
            self.consume(Type::Dot, "Expect '.' after 'super'", diagnostics)?;
            let method = self.consume(Type::Identifier, "Expect superclass method name", diagnostics)?;
            return Ok(Expr::Super(self.next_id(), expr::Super { keyword, method }));
        }
        if matches_type!(self, Type::This) {
            return Ok(Expr::This(self.next_id(), self.previous().clone()));
        }
        if matches_type!(self, Type::Identifier) {
            return Ok(Expr::Variable(self.next_id(), self.previous().clone()));
        }
        if matches_type!(self, Type::LeftParen) {
            let expr = self.expression(diagnostics)?;
            self.consume(Type::RightParen, "Expect ')' after expression", diagnostics)?;
            return Ok(Expr::Grouping(self.next_id(), Box::new(expr)));
        }

        Err(self.error(self.peek().clone(), "Expect expression", diagnostics))
    }

    /// Discards tokens until the start of what looks like the next
    /// statement, so one syntax error doesn't prevent reporting others in
    /// the same source.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == Type::Semicolon {
                return;
            }

            match self.peek().kind {
                Type::Class | Type::Fun | Type::Var | Type::For | Type::If | Type::While | Type::Print | Type::Return => {
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }
}
