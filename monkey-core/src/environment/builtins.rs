use super::prelude::{Environment, Value, NULL};

/// Installs the built-in functions into the global environment.
pub fn install(env: &mut Environment) {
    let builtins: [(&'static str, fn(Vec<Value>) -> Value); 5] = [
        ("len", len),
        ("first", first),
        ("last", last),
        ("rest", rest),
        ("push", push)
    ];

    for (name, func) in builtins {
        env.set(name.to_string(), Value::Builtin { name, func });
    }
}

fn len(arguments: Vec<Value>) -> Value {
    if arguments.len() != 1 {
        return wrong_argument_count(1, arguments.len());
    }

    match &arguments[0] {
        Value::String { value } => Value::Integer { value: value.len() as i64 },
        Value::Array { elements } => Value::Integer { value: elements.len() as i64 },
        value => Value::Error {
            message: format!("argument to `len` not supported, got {}", value._type())
        }
    }
}

fn first(arguments: Vec<Value>) -> Value {
    if arguments.len() != 1 {
        return wrong_argument_count(1, arguments.len());
    }

    match &arguments[0] {
        Value::Array { elements } => elements.first().cloned().unwrap_or(NULL),
        value => Value::Error {
            message: format!("argument to `first` must be ARRAY, got {}", value._type())
        }
    }
}

fn last(arguments: Vec<Value>) -> Value {
    if arguments.len() != 1 {
        return wrong_argument_count(1, arguments.len());
    }

    match &arguments[0] {
        Value::Array { elements } => elements.last().cloned().unwrap_or(NULL),
        value => Value::Error {
            message: format!("argument to `last` must be ARRAY, got {}", value._type())
        }
    }
}

fn rest(arguments: Vec<Value>) -> Value {
    if arguments.len() != 1 {
        return wrong_argument_count(1, arguments.len());
    }

    match &arguments[0] {
        Value::Array { elements } => {
            if elements.is_empty() {
                NULL
            } else {
                Value::Array { elements: elements[1..].to_vec() }
            }
        },
        value => Value::Error {
            message: format!("argument to `rest` must be ARRAY, got {}", value._type())
        }
    }
}

fn push(arguments: Vec<Value>) -> Value {
    if arguments.len() != 2 {
        return wrong_argument_count(2, arguments.len());
    }

    match &arguments[0] {
        Value::Array { elements } => {
            let mut elements = elements.clone();
            elements.push(arguments[1].clone());

            Value::Array { elements }
        },
        value => Value::Error {
            message: format!("argument to `push` must be ARRAY, got {}", value._type())
        }
    }
}

fn wrong_argument_count(expected: usize, got: usize) -> Value {
    Value::Error {
        message: format!("wrong number of arguments: expected {expected}, got {got}")
    }
}
