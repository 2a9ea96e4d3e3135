use crate::{
    environment::prelude::{HashKey, Value, NULL},
    parser::prelude::parse_program,
    utils::prelude::Error
};

use super::{eval, eval_from_stream, Evaluator};

fn eval_input(input: &str) -> Value {
    let parsed = parse_program(input);

    assert!(
        parsed.errors.is_empty(),
        "unexpected parse errors for {input:?}: {:?}",
        parsed.errors
    );

    Evaluator::new().eval_program(parsed.program)
}

fn integer(value: i64) -> Value {
    Value::Integer { value }
}

fn boolean(value: bool) -> Value {
    Value::Boolean { value }
}

fn string(value: &str) -> Value {
    Value::String { value: value.to_string() }
}

fn error(message: &str) -> Value {
    Value::Error { message: message.to_string() }
}

#[test]
fn test_integer_expressions() {
    let cases = vec![
        ("5", 5),
        ("10", 10),
        ("-5", -5),
        ("-10", -10),
        ("5 + 5 + 5 + 5 - 10", 10),
        ("2 * 2 * 2 * 2 * 2", 32),
        ("-50 + 100 + -50", 0),
        ("5 * 2 + 10", 20),
        ("5 + 2 * 10", 25),
        ("20 + 2 * -10", 0),
        ("50 / 2 * 2 + 10", 60),
        ("2 * (5 + 10)", 30),
        ("3 * 3 * 3 + 10", 37),
        ("3 * (3 * 3) + 10", 37),
        ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50),
    ];

    for (input, expected) in cases {
        assert_eq!(eval_input(input), integer(expected), "input: {input}");
    }
}

#[test]
fn test_boolean_expressions() {
    let cases = vec![
        ("true", true),
        ("false", false),
        ("1 < 2", true),
        ("1 > 2", false),
        ("1 < 1", false),
        ("1 > 1", false),
        ("1 == 1", true),
        ("1 != 1", false),
        ("1 == 2", false),
        ("1 != 2", true),
        ("true == true", true),
        ("false == false", true),
        ("true == false", false),
        ("true != false", true),
        ("false != true", true),
        ("(1 < 2) == true", true),
        ("(1 < 2) == false", false),
        ("(1 > 2) == true", false),
        ("(1 > 2) == false", true),
    ];

    for (input, expected) in cases {
        assert_eq!(eval_input(input), boolean(expected), "input: {input}");
    }
}

#[test]
fn test_bang_operator() {
    let cases = vec![
        ("!true", false),
        ("!false", true),
        ("!5", false),
        ("!!true", true),
        ("!!false", false),
        ("!!5", true),
    ];

    for (input, expected) in cases {
        assert_eq!(eval_input(input), boolean(expected), "input: {input}");
    }
}

#[test]
fn test_if_else_expressions() {
    let cases = vec![
        ("if (true) { 10 }", integer(10)),
        ("if (false) { 10 }", NULL),
        ("if (1) { 10 }", integer(10)),
        ("if (1 < 2) { 10 }", integer(10)),
        ("if (1 > 2) { 10 }", NULL),
        ("if (1 > 2) { 10 } else { 20 }", integer(20)),
        ("if (1 < 2) { 10 } else { 20 }", integer(10)),
        // 0 and the empty string are truthy.
        ("if (0) { 1 } else { 2 }", integer(1)),
        (r#"if ("") { 1 } else { 2 }"#, integer(1)),
    ];

    for (input, expected) in cases {
        assert_eq!(eval_input(input), expected, "input: {input}");
    }
}

#[test]
fn test_return_statements() {
    let cases = vec![
        ("return 10;", 10),
        ("return 10; 9;", 10),
        ("return 2 * 5; 9;", 10),
        ("9; return 2 * 5; 9;", 10),
        ("if (10 > 1) { if (10 > 1) { return 10; } return 1; }", 10),
    ];

    for (input, expected) in cases {
        assert_eq!(eval_input(input), integer(expected), "input: {input}");
    }
}

#[test]
fn test_error_handling() {
    let cases = vec![
        ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
        ("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN"),
        ("-true", "unknown operator: -BOOLEAN"),
        ("true + false;", "unknown operator: BOOLEAN + BOOLEAN"),
        ("5; true + false; 5", "unknown operator: BOOLEAN + BOOLEAN"),
        ("if (10 > 1) { true + false; }", "unknown operator: BOOLEAN + BOOLEAN"),
        (
            "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
            "unknown operator: BOOLEAN + BOOLEAN",
        ),
        ("foobar", "identifier not found: foobar"),
        (r#""Hello" - "World""#, "unknown operator: STRING - STRING"),
        (r#""a" == "a""#, "unknown operator: STRING == STRING"),
        (r#"5 == "abc""#, "type mismatch: INTEGER == STRING"),
        ("5 / 0", "division by zero"),
        (r#"{"name": "Monkey"}[fn(x) { x }];"#, "unusable as hash key: FUNCTION"),
        (r#"{fn(x) { x }: "Monkey"}"#, "unusable as hash key: FUNCTION"),
        (r#"[1, 2, 3]["0"]"#, "array index must be an integer"),
        ("5[0]", "index operator not supported: INTEGER"),
        ("5(3)", "not a function: INTEGER"),
    ];

    for (input, expected) in cases {
        assert_eq!(eval_input(input), error(expected), "input: {input}");
    }
}

#[test]
fn test_let_statements() {
    let cases = vec![
        ("let a = 5; a;", 5),
        ("let a = 5 * 5; a;", 25),
        ("let a = 5; let b = a; b;", 5),
        ("let a = 5; let b = a; let c = a + b + 5; c;", 15),
        // A let statement yields the bound value.
        ("let a = 5;", 5),
    ];

    for (input, expected) in cases {
        assert_eq!(eval_input(input), integer(expected), "input: {input}");
    }
}

#[test]
fn test_function_values() {
    match eval_input("fn(x) { x + 2; };") {
        Value::Function { parameters, body, .. } => {
            assert_eq!(parameters, vec!["x".to_string()]);
            assert_eq!(body.to_string(), "(x + 2)");
        },
        value => panic!("expected function, got {value:?}")
    }
}

#[test]
fn test_function_application() {
    let cases = vec![
        ("let identity = fn(x) { x; }; identity(5);", 5),
        ("let identity = fn(x) { return x; }; identity(5);", 5),
        ("let double = fn(x) { x * 2; }; double(5);", 10),
        ("let add = fn(x, y) { x + y; }; add(5, 5);", 10),
        ("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));", 20),
        ("fn(x) { x; }(5)", 5),
    ];

    for (input, expected) in cases {
        assert_eq!(eval_input(input), integer(expected), "input: {input}");
    }
}

#[test]
fn test_wrong_argument_count() {
    let cases = vec![
        ("fn(x) { x; }(1, 2)", "wrong number of arguments: expected 1, got 2"),
        ("fn(x, y) { x + y; }(1)", "wrong number of arguments: expected 2, got 1"),
        ("fn() { 0; }(1)", "wrong number of arguments: expected 0, got 1"),
    ];

    for (input, expected) in cases {
        assert_eq!(eval_input(input), error(expected), "input: {input}");
    }
}

#[test]
fn test_closures() {
    let input = "
        let newAdder = fn(x) { fn(y) { x + y } };
        let addTwo = newAdder(2);
        addTwo(3);
    ";

    assert_eq!(eval_input(input), integer(5));
}

#[test]
fn test_closures_read_their_defining_environment() {
    // The function closes over the global environment itself, so a later
    // rebinding of x is visible through the closure.
    let input = "
        let x = 5;
        let double = fn() { x * 2 };
        let x = 10;
        double()
    ";

    assert_eq!(eval_input(input), integer(20));
}

#[test]
fn test_call_environment_does_not_leak() {
    let input = "
        let x = 5;
        fn() { let x = 9; x }();
        x
    ";

    assert_eq!(eval_input(input), integer(5));
}

#[test]
fn test_recursive_functions() {
    let cases = vec![
        (
            "let fact = fn(n) { if (n < 2) { return 1; } return n * fact(n - 1); }; fact(5)",
            120,
        ),
        (
            "let fib = fn(n) { if (n < 2) { n } else { fib(n - 1) + fib(n - 2) } }; fib(10)",
            55,
        ),
    ];

    for (input, expected) in cases {
        assert_eq!(eval_input(input), integer(expected), "input: {input}");
    }
}

#[test]
fn test_string_literals() {
    assert_eq!(eval_input(r#""Hello World!""#), string("Hello World!"));
}

#[test]
fn test_string_concatenation() {
    assert_eq!(
        eval_input(r#""Hello" + " " + "World!""#),
        string("Hello World!")
    );
}

#[test]
fn test_builtin_functions() {
    let cases = vec![
        (r#"len("")"#, integer(0)),
        (r#"len("four")"#, integer(4)),
        (r#"len("hello world")"#, integer(11)),
        ("len([1, 2, 3])", integer(3)),
        ("len([])", integer(0)),
        ("len(1)", error("argument to `len` not supported, got INTEGER")),
        (r#"len("one", "two")"#, error("wrong number of arguments: expected 1, got 2")),
        ("first([1, 2, 3])", integer(1)),
        ("first([])", NULL),
        ("first(1)", error("argument to `first` must be ARRAY, got INTEGER")),
        ("last([1, 2, 3])", integer(3)),
        ("last([])", NULL),
        ("rest([1, 2, 3])", Value::Array { elements: vec![integer(2), integer(3)] }),
        ("rest([1])", Value::Array { elements: vec![] }),
        ("rest([])", NULL),
        ("push([], 1)", Value::Array { elements: vec![integer(1)] }),
        ("push(1, 1)", error("argument to `push` must be ARRAY, got INTEGER")),
        ("push([1], 2, 3)", error("wrong number of arguments: expected 2, got 3")),
    ];

    for (input, expected) in cases {
        assert_eq!(eval_input(input), expected, "input: {input}");
    }
}

#[test]
fn test_push_does_not_mutate_its_argument() {
    let input = "
        let a = [1, 2];
        let b = push(a, 3);
        len(a)
    ";

    assert_eq!(eval_input(input), integer(2));
}

#[test]
fn test_array_literals() {
    assert_eq!(
        eval_input("[1, 2 * 2, 3 + 3]"),
        Value::Array { elements: vec![integer(1), integer(4), integer(6)] }
    );
}

#[test]
fn test_array_index_expressions() {
    let cases = vec![
        ("[1, 2, 3][0]", integer(1)),
        ("[1, 2, 3][1]", integer(2)),
        ("[1, 2, 3][2]", integer(3)),
        ("let i = 0; [1][i];", integer(1)),
        ("[1, 2, 3][1 + 1];", integer(3)),
        ("let myArray = [1, 2, 3]; myArray[2];", integer(3)),
        (
            "let myArray = [1, 2, 3]; myArray[0] + myArray[1] + myArray[2];",
            integer(6),
        ),
        ("let myArray = [1, 2, 3]; let i = myArray[0]; myArray[i]", integer(2)),
        ("[1, 2, 3][3]", NULL),
        ("[1, 2, 3][-1]", NULL),
    ];

    for (input, expected) in cases {
        assert_eq!(eval_input(input), expected, "input: {input}");
    }
}

#[test]
fn test_hash_literals() {
    let input = r#"
        let two = "two";
        {
            "one": 10 - 9,
            two: 1 + 1,
            "thr" + "ee": 6 / 2,
            4: 4,
            true: 5,
            false: 6
        }
    "#;

    match eval_input(input) {
        Value::Hash { pairs } => {
            let expected = vec![
                (HashKey::String("one".to_string()), 1),
                (HashKey::String("two".to_string()), 2),
                (HashKey::String("three".to_string()), 3),
                (HashKey::Integer(4), 4),
                (HashKey::Boolean(true), 5),
                (HashKey::Boolean(false), 6),
            ];

            assert_eq!(pairs.len(), expected.len());

            for (key, value) in expected {
                match pairs.get(&key) {
                    Some((_, found)) => assert_eq!(found, &integer(value), "key: {key:?}"),
                    None => panic!("missing key {key:?}")
                }
            }
        },
        value => panic!("expected hash, got {value:?}")
    }
}

#[test]
fn test_hash_index_expressions() {
    let cases = vec![
        (r#"{"foo": 5}["foo"]"#, integer(5)),
        (r#"{"foo": 5}["bar"]"#, NULL),
        (r#"let key = "foo"; {"foo": 5}[key]"#, integer(5)),
        (r#"{}["foo"]"#, NULL),
        ("{5: 5}[5]", integer(5)),
        ("{true: 5}[true]", integer(5)),
        ("{false: 5}[false]", integer(5)),
    ];

    for (input, expected) in cases {
        assert_eq!(eval_input(input), expected, "input: {input}");
    }
}

#[test]
fn test_while_loops() {
    let cases = vec![
        ("let i = 0; while (i < 5) { let i = i + 1; }; i", integer(5)),
        ("while (false) { 1 }", NULL),
        ("let f = fn() { while (true) { return 7; } }; f()", integer(7)),
        ("while (1 + true) { 1 }", error("type mismatch: INTEGER + BOOLEAN")),
    ];

    for (input, expected) in cases {
        assert_eq!(eval_input(input), expected, "input: {input}");
    }
}

#[test]
fn test_for_loops() {
    let cases = vec![
        (
            "let sum = 0; for (let i = 0; i < 5; let i = i + 1) { let sum = sum + i; }; sum",
            integer(10),
        ),
        ("for (let i = 0; i < 3; let i = i + 1) { i }", NULL),
        ("let n = 1; for (n; n < 100; let n = n * 2) { n }; n", integer(128)),
        (
            "for (let i = 0; true; i + unknown) { 1 }",
            error("identifier not found: unknown"),
        ),
        (
            "let f = fn() { for (let i = 0; true; i) { return 42; } }; f()",
            integer(42),
        ),
    ];

    for (input, expected) in cases {
        assert_eq!(eval_input(input), expected, "input: {input}");
    }
}

#[test]
fn test_end_to_end_scenarios() {
    let cases = vec![
        ("5 + 5 * 2", "15"),
        ("let x = 10; let y = x * 2; y - 3", "17"),
        ("let add = fn(a,b){ a + b }; add(2,3)", "5"),
        ("let mkAdder = fn(x){ fn(y){ x + y } }; let inc = mkAdder(1); inc(4)", "5"),
        ("let a = [1,2,3]; push(a, 4)", "[1, 2, 3, 4]"),
        (r#"let h = {"name":"m", "age":1}; h["name"]"#, "m"),
        ("5 + true", "ERROR: type mismatch: INTEGER + BOOLEAN"),
        ("foobar", "ERROR: identifier not found: foobar"),
        ("if (10 > 1) { if (10 > 1) { return 10; } return 1; }", "10"),
    ];

    for (input, expected) in cases {
        assert_eq!(eval_input(input).to_string(), expected, "input: {input}");
    }
}

#[test]
fn test_value_rendering() {
    let cases = vec![
        ("5", "5"),
        ("true", "true"),
        ("if (false) { 1 }", "null"),
        (r#""hello""#, "hello"),
        ("[1, 2 * 2, 3]", "[1, 4, 3]"),
        (r#"{"a": 1}"#, "{a: 1}"),
        ("len", "builtin function"),
        ("fn(x) { x + 2; };", "fn(x) {\n(x + 2)\n}"),
    ];

    for (input, expected) in cases {
        assert_eq!(eval_input(input).to_string(), expected, "input: {input}");
    }
}

#[test]
fn test_session_state_persists_across_programs() {
    let mut evaluator = Evaluator::new();

    let lines = vec![
        ("let x = 5;", "5"),
        ("let double = fn(n) { n * 2 };", "fn(n) {\n(n * 2)\n}"),
        ("double(x)", "10"),
        ("x", "5")
    ];

    for (input, expected) in lines {
        let parsed = parse_program(input);
        assert!(parsed.errors.is_empty());

        let value = evaluator.eval_program(parsed.program);
        assert_eq!(value.to_string(), expected, "input: {input}");
    }
}

#[test]
fn test_closure_environments_survive_collection() {
    let mut evaluator = Evaluator::new();

    let parsed = parse_program(
        "let newAdder = fn(x) { fn(y) { x + y } }; let addTwo = newAdder(2);"
    );
    assert!(parsed.errors.is_empty());

    evaluator.eval_program(parsed.program);
    evaluator.collect_garbage();

    let parsed = parse_program("addTwo(3)");
    assert!(parsed.errors.is_empty());

    assert_eq!(evaluator.eval_program(parsed.program), integer(5));
}

#[test]
fn test_collection_reclaims_unreachable_cycles() {
    let mut evaluator = Evaluator::new();

    // make() returns a function that captures the environment it is bound
    // in, forming a reference cycle. Rebinding `cycle` makes it unreachable.
    let parsed = parse_program(
        "let make = fn() { let f = fn(x) { f(x) }; f }; let cycle = make(); let cycle = 0;"
    );
    assert!(parsed.errors.is_empty());

    evaluator.eval_program(parsed.program);

    assert_eq!(evaluator.envs.len(), 2);

    evaluator.collect_garbage();

    assert_eq!(evaluator.envs.len(), 1);
}

#[test]
fn test_collection_triggers_between_statements() {
    let mut evaluator = Evaluator::new();

    let parsed = parse_program(
        "let noop = fn() { 0 }; let i = 0; while (i < 1100) { noop(); let i = i + 1; }; 2;"
    );
    assert!(parsed.errors.is_empty());

    assert_eq!(evaluator.eval_program(parsed.program), integer(2));

    assert_eq!(evaluator.allocations, 0);
    assert_eq!(evaluator.envs.len(), 1);
}

#[test]
fn test_eval_source_file() {
    let path = std::env::temp_dir().join("monkey_eval_test.monkey");
    std::fs::write(&path, "let x = 5; x + 3;").unwrap();

    let evaluated = eval(path.clone()).unwrap();

    assert_eq!(evaluated.program.statements.len(), 2);
    assert_eq!(evaluated.value, integer(8));

    let _ = std::fs::remove_file(path);
}

#[test]
fn test_eval_from_stream_source_file() {
    let path = std::env::temp_dir().join("monkey_eval_stream_test.monkey");
    std::fs::write(&path, "let double = fn(x) { x * 2 }; double(21);").unwrap();

    let evaluated = eval_from_stream(path.clone()).unwrap();

    assert_eq!(evaluated.value, integer(42));

    let _ = std::fs::remove_file(path);
}

#[test]
fn test_eval_from_stream_reports_parse_errors() {
    let path = std::env::temp_dir().join("monkey_eval_error_test.monkey");
    std::fs::write(&path, "let x 5;").unwrap();

    let parse_error = eval_from_stream(path.clone()).unwrap_err();

    match parse_error {
        Error::Parse { src, errors, .. } => {
            assert_eq!(src, "let x 5;");
            assert!(!errors.is_empty());
        },
        other => panic!("expected a parse error, got {other:?}")
    }

    let _ = std::fs::remove_file(path);
}

#[test]
fn test_eval_missing_file() {
    let path = std::env::temp_dir().join("monkey_eval_missing_test.monkey");
    let _ = std::fs::remove_file(&path);

    match eval(path) {
        Err(Error::StdIo { err }) => assert_eq!(err, std::io::ErrorKind::NotFound),
        other => panic!("expected an io error, got {other:?}")
    }
}
