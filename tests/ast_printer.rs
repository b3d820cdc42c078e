use lox::ast;
use lox::diagnostics::Diagnostics;
use lox::parser::Parser;
use lox::scanner::Scanner;
use lox::stmt::Stmt;

fn parse_single_expression(source: &str) -> lox::expr::Expr {
    let mut diagnostics = Diagnostics::new();
    let scanner = Scanner::new(source);
    let tokens = scanner.scan_tokens(&mut diagnostics);
    let mut parser = Parser::new(&tokens);
    let mut statements = parser.parse(&mut diagnostics);
    assert!(!diagnostics.had_error());
    assert_eq!(statements.len(), 1);
    match statements.remove(0) {
        Stmt::Expression(expr) => expr,
        other => panic!("expected a bare expression statement, got {other:?}"),
    }
}

#[test]
fn binary_expression_prints_as_a_parenthesized_prefix_form() {
    let expr = parse_single_expression("1 + 2 * 3;");
    assert_eq!(ast::print(&expr), "(+ 1 (* 2 3))");
}

#[test]
fn grouping_is_wrapped_in_a_group_node() {
    let expr = parse_single_expression("(1 + 2) * 3;");
    assert_eq!(ast::print(&expr), "(* (group (+ 1 2)) 3)");
}

#[test]
fn unary_minus_and_negation_print_with_their_operator_lexeme() {
    let expr = parse_single_expression("!-5;");
    assert_eq!(ast::print(&expr), "(! (- 5))");
}

#[test]
fn super_call_prints_callee_then_empty_argument_list() {
    // The pretty-printer only needs node shape, not resolution, so it works
    // on unresolved ASTs too.
    let expr = parse_single_expression("super.method();");
    assert_eq!(ast::print(&expr), "(super method)()");
}

#[test]
fn comparison_and_equality_share_the_same_printer_shape() {
    let expr = parse_single_expression("1 < 2 == true;");
    assert_eq!(ast::print(&expr), "(== (< 1 2) true)");
}
