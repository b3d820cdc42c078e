#[macro_use]
mod common;

use crate::common::run;

#[test]
fn fields_are_set_and_read() {
    assert_prints!(
        r#"
        class Point {
            init(x, y) {
                this.x = x;
                this.y = y;
            }
        }
        var p = Point(3, 4);
        print p.x;
        print p.y;
        "#,
        "3",
        "4"
    );
}

#[test]
fn init_always_returns_the_instance_even_with_a_bare_return() {
    assert_prints!(
        r#"
        class Thing {
            init() {
                this.value = 1;
                return;
            }
        }
        var t = Thing();
        print t.value;
        print t.init() == t;
        "#,
        "1",
        "true"
    );
}

#[test]
fn method_binding_rebinds_this_on_each_access_but_same_declaration() {
    assert_prints!(
        r#"
        class Egotist {
            speak() { print this; }
        }
        var e = Egotist();
        var m1 = e.speak;
        var m2 = e.speak;
        m1();
        m2();
        "#,
        "<instance Egotist>",
        "<instance Egotist>"
    );
}

#[test]
fn bound_methods_from_the_same_instance_are_equal() {
    assert_prints!(
        r#"
        class Egotist {
            speak() { print this; }
        }
        var e = Egotist();
        print e.speak == e.speak;
        var m1 = e.speak;
        var m2 = e.speak;
        print m1 == m2;
        "#,
        "true",
        "true"
    );
}

#[test]
fn bound_methods_from_different_instances_are_not_equal() {
    assert_prints!(
        r#"
        class Egotist {
            speak() { print this; }
        }
        var a = Egotist();
        var b = Egotist();
        print a.speak == b.speak;
        "#,
        "false"
    );
}

#[test]
fn methods_close_over_the_instance_as_this() {
    assert_prints!(
        r#"
        class Cake {
            taste() {
                var adjective = "delicious";
                print "The " + this.flavor + " cake is " + adjective + "!";
            }
        }
        var cake = Cake();
        cake.flavor = "German chocolate";
        cake.taste();
        "#,
        "The German chocolate cake is delicious!"
    );
}

#[test]
fn single_inheritance_and_method_override_with_super() {
    assert_prints!(
        r#"
        class A {
            greet() { print "A"; }
        }
        class B < A {
            greet() {
                super.greet();
                print "B";
            }
        }
        B().greet();
        "#,
        "A",
        "B"
    );
}

#[test]
fn super_skips_the_current_classes_own_override() {
    assert_prints!(
        r#"
        class A {
            method() { print "A method"; }
        }
        class B < A {
            method() { print "B method"; }
            test() { super.method(); }
        }
        class C < B {}
        C().test();
        "#,
        "A method"
    );
}

#[test]
fn inherited_initializer_is_used_when_subclass_has_none() {
    assert_prints!(
        r#"
        class A {
            init(value) { this.value = value; }
        }
        class B < A {}
        var b = B(5);
        print b.value;
        "#,
        "5"
    );
}

#[test]
fn class_can_inherit_from_itself_is_a_static_error() {
    let result = run("class Oops < Oops {}");
    assert!(result.had_error);
    assert!(!result.had_runtime_error);
}

#[test]
fn inheriting_from_a_non_class_is_a_runtime_error() {
    let result = run(
        r#"
        var NotAClass = "I am not a class";
        class Sub < NotAClass {}
        "#,
    );
    assert!(result.had_runtime_error);
}

#[test]
fn calling_a_class_with_wrong_arity_is_a_runtime_error() {
    let result = run(
        r#"
        class Pair {
            init(a, b) { this.a = a; this.b = b; }
        }
        Pair(1);
        "#,
    );
    assert!(result.had_runtime_error);
}

#[test]
fn calling_a_class_with_no_init_requires_zero_arguments() {
    let result = run("class Empty {} Empty(1);");
    assert!(result.had_runtime_error);
}

#[test]
fn accessing_an_undefined_property_is_a_runtime_error() {
    let result = run("class Box {} var b = Box(); print b.nothing;");
    assert!(result.had_runtime_error);
}

#[test]
fn setting_a_field_on_a_non_instance_is_a_runtime_error() {
    let result = run("var n = 1; n.x = 2;");
    assert!(result.had_runtime_error);
}

#[test]
fn this_outside_a_class_is_a_static_error() {
    let result = run("print this;");
    assert!(result.had_error);
}

#[test]
fn super_outside_a_class_is_a_static_error() {
    let result = run("super.foo();");
    assert!(result.had_error);
}

#[test]
fn super_in_a_class_with_no_superclass_is_a_static_error() {
    let result = run("class A { foo() { super.foo(); } }");
    assert!(result.had_error);
}

#[test]
fn fields_shadow_methods_of_the_same_name() {
    assert_prints!(
        r#"
        class Box {
            value() { return "method"; }
        }
        var b = Box();
        print b.value();
        b.value = "field";
        print b.value;
        "#,
        "method",
        "field"
    );
}

#[test]
fn class_name_can_be_referenced_inside_its_own_methods_before_the_class_is_fully_bound() {
    assert_prints!(
        r#"
        class Tree {
            grow() { return Tree; }
        }
        print Tree().grow() == Tree;
        "#,
        "true"
    );
}
