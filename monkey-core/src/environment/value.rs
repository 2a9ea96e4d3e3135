use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Display;
use std::rc::Rc;

use crate::parser::prelude::Block;

use super::prelude::Environment;

pub const TRUE: Value = Value::Boolean { value: true };
pub const FALSE: Value = Value::Boolean { value: false };
pub const NULL: Value = Value::Null;

#[derive(Clone)]
pub enum Value {
    Integer {
        value: i64
    },
    Boolean {
        value: bool
    },
    String {
        value: String
    },
    Null,
    ReturnValue {
        value: Box<Value>
    },
    Error {
        message: String
    },
    Function {
        parameters: Vec<String>,
        body: Block,
        env: Rc<RefCell<Environment>>
    },
    Builtin {
        name: &'static str,
        func: fn(Vec<Value>) -> Value
    },
    Array {
        elements: Vec<Value>
    },
    Hash {
        pairs: HashMap<HashKey, (Value, Value)>
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer { value } => write!(f, "{value}"),
            Value::Boolean { value } => write!(f, "{value}"),
            Value::String { value } => write!(f, "{value}"),
            Value::Null => write!(f, "null"),
            Value::ReturnValue { value } => write!(f, "{value}"),
            Value::Error { message } => write!(f, "ERROR: {message}"),
            Value::Function { parameters, body, .. } => {
                write!(f, "fn({}) {{\n{}\n}}", parameters.join(", "), body)
            },
            Value::Builtin { .. } => write!(f, "builtin function"),
            Value::Array { elements } => {
                let elements = elements.iter()
                    .map(|element| element.to_string())
                    .collect::<Vec<String>>();

                write!(f, "[{}]", elements.join(", "))
            },
            Value::Hash { pairs } => {
                let pairs = pairs.values()
                    .map(|(key, value)| format!("{key}: {value}"))
                    .collect::<Vec<String>>();

                write!(f, "{{{}}}", pairs.join(", "))
            }
        }
    }
}

// A function's captured environment can transitively contain the function
// itself, so neither Debug nor PartialEq may descend into it.
impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self._type(), self)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer { value: left }, Value::Integer { value: right }) => left == right,
            (Value::Boolean { value: left }, Value::Boolean { value: right }) => left == right,
            (Value::String { value: left }, Value::String { value: right }) => left == right,
            (Value::Null, Value::Null) => true,
            (Value::ReturnValue { value: left }, Value::ReturnValue { value: right }) => {
                left == right
            },
            (Value::Error { message: left }, Value::Error { message: right }) => left == right,
            (
                Value::Function { parameters: left, body: left_body, env: left_env },
                Value::Function { parameters: right, body: right_body, env: right_env }
            ) => left == right && left_body == right_body && Rc::ptr_eq(left_env, right_env),
            (Value::Builtin { name: left, .. }, Value::Builtin { name: right, .. }) => {
                left == right
            },
            (Value::Array { elements: left }, Value::Array { elements: right }) => left == right,
            (Value::Hash { pairs: left }, Value::Hash { pairs: right }) => left == right,
            _ => false
        }
    }
}

impl Value {
    pub fn _type(&self) -> ValueType {
        match self {
            Self::Integer { .. } => ValueType::Integer,
            Self::Boolean { .. } => ValueType::Boolean,
            Self::String { .. } => ValueType::String,
            Self::Null => ValueType::Null,
            Self::ReturnValue { .. } => ValueType::ReturnValue,
            Self::Error { .. } => ValueType::Error,
            Self::Function { .. } => ValueType::Function,
            Self::Builtin { .. } => ValueType::Builtin,
            Self::Array { .. } => ValueType::Array,
            Self::Hash { .. } => ValueType::Hash
        }
    }

    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Self::Integer { value } => Some(HashKey::Integer(*value)),
            Self::Boolean { value } => Some(HashKey::Boolean(*value)),
            Self::String { value } => Some(HashKey::String(value.clone())),
            _ => None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    Integer,
    Boolean,
    String,
    Null,
    ReturnValue,
    Error,
    Function,
    Builtin,
    Array,
    Hash
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Integer => write!(f, "INTEGER"),
            ValueType::Boolean => write!(f, "BOOLEAN"),
            ValueType::String => write!(f, "STRING"),
            ValueType::Null => write!(f, "NULL"),
            ValueType::ReturnValue => write!(f, "RETURN_VALUE"),
            ValueType::Error => write!(f, "ERROR"),
            ValueType::Function => write!(f, "FUNCTION"),
            ValueType::Builtin => write!(f, "BUILTIN"),
            ValueType::Array => write!(f, "ARRAY"),
            ValueType::Hash => write!(f, "HASH")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    String(String)
}
