#[macro_use]
mod common;

use crate::common::run;

#[test]
fn arithmetic_precedence() {
    assert_prints!("print 1 + 2 * 3;", "7");
}

#[test]
fn string_concatenation() {
    assert_prints!(r#"print "a" + "b";"#, "ab");
}

#[test]
fn mixing_string_and_number_with_plus_is_a_runtime_error() {
    let result = run(r#"print "a" + 1;"#);
    assert!(result.had_runtime_error);
}

#[test]
fn division_by_zero_is_a_runtime_error() {
    let result = run("print 1 / 0;");
    assert!(result.had_runtime_error);
}

#[test]
fn zero_numerator_is_not_an_error() {
    assert_prints!("print 0 / 5;", "0");
}

#[test]
fn integral_numbers_print_without_trailing_zero() {
    assert_prints!("print 6 / 2;", "3");
}

#[test]
fn uninitialized_var_is_nil() {
    assert_prints!("var x; print x;", "nil");
}

#[test]
fn block_scoping_shadows_without_mutating_outer() {
    assert_prints!(
        r#"
        var a = "global";
        {
            var a = "block";
            print a;
        }
        print a;
        "#,
        "block",
        "global"
    );
}

#[test]
fn closure_captures_the_binding_present_at_declaration_time() {
    assert_prints!(
        r#"
        var a = "global";
        {
            fun show() { print a; }
            var a = "block";
            show();
        }
        "#,
        "global"
    );
}

#[test]
fn closure_observes_later_assignment_to_the_same_binding() {
    assert_prints!(
        r#"
        fun makeCounter() {
            var count = 0;
            fun increment() {
                count = count + 1;
                print count;
            }
            return increment;
        }
        var counter = makeCounter();
        counter();
        counter();
        "#,
        "1",
        "2"
    );
}

#[test]
fn fibonacci_recursion() {
    assert_prints!(
        r#"
        fun fib(n) {
            if (n < 2) return n;
            return fib(n - 1) + fib(n - 2);
        }
        print fib(10);
        "#,
        "55"
    );
}

#[test]
fn for_loop_desugars_to_a_while_loop() {
    assert_prints!(
        "for (var i = 0; i < 3; i = i + 1) print i;",
        "0",
        "1",
        "2"
    );
}

#[test]
fn for_loop_with_all_clauses_omitted_needs_a_break_path() {
    // `for (;;)` loops forever without a condition; guard it with an `if`/
    // `return` inside a function instead of looping unconditionally.
    assert_prints!(
        r#"
        fun f() {
            for (;;) {
                print "once";
                return;
            }
        }
        f();
        "#,
        "once"
    );
}

#[test]
fn and_returns_the_operand_value_not_a_coerced_boolean() {
    assert_prints!(r#"print "hi" and "there";"#, "there");
    assert_prints!("print false and 1;", "false");
}

#[test]
fn or_returns_the_operand_value_not_a_coerced_boolean() {
    assert_prints!("print nil or 2;", "2");
    assert_prints!(r#"print "a" or "b";"#, "a");
}

#[test]
fn truthiness_treats_zero_and_empty_string_as_truthy() {
    assert_prints!(r#"if (0) print "yes"; else print "no";"#, "yes");
    assert_prints!(r#"if ("") print "yes"; else print "no";"#, "yes");
    assert_prints!(r#"if (nil) print "yes"; else print "no";"#, "no");
    assert_prints!(r#"if (false) print "yes"; else print "no";"#, "no");
}

#[test]
fn calling_a_non_callable_is_a_runtime_error() {
    let result = run("var x = 1; x();");
    assert!(result.had_runtime_error);
}

#[test]
fn wrong_arity_is_a_runtime_error() {
    let result = run("fun f(a, b) { return a + b; } f(1);");
    assert!(result.had_runtime_error);
}

#[test]
fn clock_returns_a_number() {
    assert_eq!(run("print clock() >= 0;").output.trim(), "true");
}

#[test]
fn globals_persist_across_successive_run_calls_like_a_repl_session() {
    let mut buffer = Vec::new();
    let mut lox = lox::Lox::new(&mut buffer);
    lox.run("var x = 1;");
    lox.run("print x;");
    drop(lox);
    assert_eq!(String::from_utf8(buffer).unwrap(), "1\n");
}

#[test]
fn a_runtime_error_in_one_repl_line_does_not_poison_the_next() {
    let mut buffer = Vec::new();
    let mut lox = lox::Lox::new(&mut buffer);
    lox.run("print 1 / 0;");
    assert!(lox.had_runtime_error());
    lox.reset_diagnostics();
    lox.run("print 42;");
    assert!(!lox.had_runtime_error());
    drop(lox);
    assert_eq!(String::from_utf8(buffer).unwrap(), "42\n");
}
