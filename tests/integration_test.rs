//! ABOUTME: End-to-end tests driving source text through lex/parse/macro/eval

use wisp::env::Environment;
use wisp::eval::eval_program;
use wisp::lexer::Lexer;
use wisp::macros::{define_macros, expand_macros};
use wisp::object::Object;
use wisp::parser::Parser;

fn run(input: &str) -> Object {
    let (mut program, errors) = Parser::new(Lexer::new(input)).parse_program();
    assert!(errors.is_empty(), "parser errors: {errors:?}");

    let env = Environment::new();
    let macro_env = Environment::new();
    define_macros(&mut program, &macro_env);
    let program = expand_macros(program, &macro_env);

    eval_program(&program.statements, env)
}

#[test]
fn closures_and_higher_order_functions() {
    let input = r#"
        let makeGreeter = fn(greeting) {
            fn(name) { greeting + ", " + name + "!" }
        };
        let hello = makeGreeter("Hello");
        hello("world");
    "#;
    assert!(matches!(run(input), Object::String(s) if s == "Hello, world!"));
}

#[test]
fn recursive_functions_via_let_binding() {
    let input = r#"
        let fibonacci = fn(x) {
            if (x == 0) {
                0
            } else {
                if (x == 1) {
                    1
                } else {
                    fibonacci(x - 1) + fibonacci(x - 2)
                }
            }
        };
        fibonacci(10);
    "#;
    assert!(matches!(run(input), Object::Integer(55)));
}

#[test]
fn array_and_hash_literals_with_builtins() {
    let input = r#"
        let people = [{"name": "Anna", "age": 24}, {"name": "Bob", "age": 25}];
        people[0]["name"];
    "#;
    assert!(matches!(run(input), Object::String(s) if s == "Anna"));

    let input = r#"
        let map = fn(arr, f) {
            let iter = fn(arr, accumulated) {
                if (len(arr) == 0) {
                    accumulated
                } else {
                    iter(rest(arr), push(accumulated, f(first(arr))))
                }
            };
            iter(arr, [])
        };
        let double = fn(x) { x * 2 };
        map([1, 2, 3, 4], double);
    "#;
    match run(input) {
        Object::Array(elements) => assert_eq!(
            elements,
            vec![
                Object::Integer(2),
                Object::Integer(4),
                Object::Integer(6),
                Object::Integer(8),
            ]
        ),
        other => panic!("expected Array, got {other:?}"),
    }
}

#[test]
fn reduce_built_from_map_style_recursion() {
    let input = r#"
        let reduce = fn(arr, initial, f) {
            let iter = fn(arr, result) {
                if (len(arr) == 0) {
                    result
                } else {
                    iter(rest(arr), f(result, first(arr)))
                }
            };
            iter(arr, initial)
        };
        let sum = fn(arr) {
            reduce(arr, 0, fn(initial, el) { initial + el });
        };
        sum([1, 2, 3, 4, 5]);
    "#;
    assert!(matches!(run(input), Object::Integer(15)));
}

#[test]
fn macro_reverse_subtraction_swaps_unevaluated_operands() {
    let input = r#"
        let reverse = macro(a, b) { quote(unquote(b) - unquote(a)); };
        reverse(2 + 2, 10 - 5);
    "#;
    assert!(matches!(run(input), Object::Integer(1)));
}

#[test]
fn macro_unless_inverts_the_condition() {
    let input = r#"
        let unless = macro(condition, consequence, alternative) {
            quote(if (!(unquote(condition))) {
                unquote(consequence);
            } else {
                unquote(alternative);
            });
        };
        unless(10 > 5, puts("not greater"), puts("greater"));
    "#;
    assert!(matches!(run(input), Object::Null));
}

#[test]
fn runtime_errors_surface_as_error_objects_not_panics() {
    match run("foobar + 5;") {
        Object::Error(message) => assert_eq!(message, "identifier not found: foobar"),
        other => panic!("expected Error, got {other:?}"),
    }

    match run(r#""five" - "five";"#) {
        Object::Error(message) => assert_eq!(message, "unknown operation: STRING - STRING"),
        other => panic!("expected Error, got {other:?}"),
    }

    match run("5(1, 2);") {
        Object::Error(message) => assert_eq!(message, "not a function: 5"),
        other => panic!("expected Error, got {other:?}"),
    }
}

#[test]
fn parser_reports_errors_but_still_returns_a_usable_program() {
    let (program, errors) = Parser::new(Lexer::new("let x 5;")).parse_program();
    assert!(!errors.is_empty());
    assert!(errors[0].contains("Invalid next token type"));
    let _ = program;
}
