//! A parenthesized pretty-printer for expressions, used by the round-trip
//! property tests (print, re-parse, compare) and handy for debugging.

use crate::expr::{Expr, LiteralValue};

/// Wraps `name` and the printed form of each sub-expression in parens, e.g.
/// `(+ 1 2)`.
macro_rules! parenthesize {
    ( $name:expr, $( $x:expr ),+ ) => {
        {
            let mut string = String::new();
            string += "(";
            string += $name;
            $(
                string += " ";
                string += &print(&$x);
            )*
            string += ")";
            string
        }
    };
}

/// Renders `expr` as a fully-parenthesized, side-effect-free string.
pub fn print(expr: &Expr) -> String {
    match expr {
        Expr::Literal(_, value) => match value {
            LiteralValue::Nil => "nil".to_string(),
            LiteralValue::Bool(b) => b.to_string(),
            LiteralValue::Number(n) => n.to_string(),
            LiteralValue::String(s) => s.clone(),
        },
        Expr::Grouping(_, inner) => parenthesize!("group", **inner),
        Expr::Unary(_, data) => parenthesize!(&data.operator.lexeme, *data.operand),
        Expr::Binary(_, data) => parenthesize!(&data.operator.lexeme, *data.left, *data.right),
        Expr::Logical(_, data) => parenthesize!(&data.operator.lexeme, *data.left, *data.right),
        Expr::Variable(_, name) => name.lexeme.clone(),
        Expr::Assign(_, data) => parenthesize!(&format!("= {}", data.name.lexeme), *data.value),
        Expr::Call(_, data) => {
            let mut string = print(&data.callee);
            string += "(";
            let args: Vec<String> = data.arguments.iter().map(print).collect();
            string += &args.join(" ");
            string += ")";
            string
        }
        Expr::Get(_, data) => format!("(. {} {})", print(&data.object), data.name.lexeme),
        Expr::Set(_, data) => {
            format!("(= (. {} {}) {})", print(&data.object), data.name.lexeme, print(&data.value))
        }
        Expr::This(_, _) => "this".to_string(),
        Expr::Super(_, data) => format!("(super {})", data.method.lexeme),
    }
}
