#[cfg(test)]
mod tests;

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::{cell::RefCell, rc::{Rc, Weak}};

use utf8_chars::BufReadCharsExt;

use crate::{
    environment::builtins,
    environment::prelude::{Environment, Value, FALSE, NULL, TRUE},
    lexer::prelude::Token,
    parser::prelude::{
        parse_program, parse_program_from_stream, Block, CallExpression, Expression,
        ForExpression, HashLiteral, Identifier, IfExpression, IndexExpression, Infix,
        LetExpression, Prefix, Program, Statement, WhileExpression
    },
    utils::prelude::Error
};

const GC_THRESHOLD: usize = 1000;

/// The outcome of running a source file: the parsed program together with
/// the value its final statement produced.
#[derive(Debug)]
pub struct Evaluated {
    pub program: Program,
    pub value: Value
}

/// Evaluates the source file at `path`.
pub fn eval(path: PathBuf) -> Result<Evaluated, Error> {
    let src = match std::fs::read_to_string(path.clone()) {
        Ok(src) => src,
        Err(err) => return Err(Error::StdIo { err: err.kind() })
    };

    let parsed = parse_program(&src);

    if !parsed.errors.is_empty() {
        return Err(Error::Parse { path, src, errors: parsed.errors });
    }

    let program = parsed.program;
    let value = Evaluator::new().eval_program(program.clone());

    Ok(Evaluated { program, value })
}

/// Evaluates the source file at `path` without reading it into memory up
/// front. The source text is still accumulated on the side so that parse
/// errors can be reported with their surrounding context.
pub fn eval_from_stream(path: PathBuf) -> Result<Evaluated, Error> {
    let file = match std::fs::File::open(path.clone()) {
        Ok(file) => file,
        Err(err) => return Err(Error::StdIo { err: err.kind() })
    };

    let file_size = file.metadata()
        .map_err(|err| Error::StdIo { err: err.kind() })?.len() as usize;

    let mut src = String::with_capacity(file_size);
    let mut reader = std::io::BufReader::new(file);
    let stream = reader.chars()
        .map(|c| {
            let c = c.unwrap();
            src.push(c);
            c
        });

    let parsed = parse_program_from_stream(stream);

    if !parsed.errors.is_empty() {
        return Err(Error::Parse { path, src, errors: parsed.errors });
    }

    let program = parsed.program;
    let value = Evaluator::new().eval_program(program.clone());

    Ok(Evaluated { program, value })
}

/// A tree-walking evaluator.
///
/// Holds the global environment plus a registry of every environment it has
/// ever allocated, so that a mark-and-sweep pass can reclaim environment
/// cycles created by closures that reference themselves.
pub struct Evaluator {
    env: Rc<RefCell<Environment>>,
    envs: Vec<Weak<RefCell<Environment>>>,
    allocations: usize
}

impl Evaluator {
    pub fn new() -> Self {
        let mut global = Environment::new();

        builtins::install(&mut global);

        let env = Rc::new(RefCell::new(global));

        Self {
            envs: vec![Rc::downgrade(&env)],
            env,
            allocations: 0
        }
    }

    pub fn eval_program(&mut self, program: Program) -> Value {
        let mut result = NULL;

        for statement in program.statements {
            if self.allocations > GC_THRESHOLD {
                self.mark_and_sweep(&result);
            }

            result = self.eval_statement(statement, self.env.clone());

            match result {
                Value::ReturnValue { value } => return *value,
                Value::Error { .. } => return result,
                _ => {}
            }
        }

        result
    }

    fn eval_statement(&mut self, statement: Statement, env: Rc<RefCell<Environment>>) -> Value {
        match statement {
            Statement::Let(statement) => {
                let value = self.eval_expression(statement.value, env.clone());

                if let Value::Error { .. } = value {
                    return value;
                }

                env.borrow_mut().set(statement.name.value, value.clone());

                value
            },
            Statement::Return(statement) => {
                let value = self.eval_expression(statement.value, env);

                if let Value::Error { .. } = value {
                    return value;
                }

                Value::ReturnValue { value: Box::new(value) }
            },
            Statement::Expression(statement) => self.eval_expression(statement.expression, env)
        }
    }

    fn eval_block(&mut self, block: Block, env: Rc<RefCell<Environment>>) -> Value {
        let mut result = NULL;

        for statement in block.statements {
            result = self.eval_statement(statement, env.clone());

            match result {
                Value::ReturnValue { .. } | Value::Error { .. } => return result,
                _ => {}
            }
        }

        result
    }

    fn eval_expression(&mut self, expression: Expression, env: Rc<RefCell<Environment>>) -> Value {
        match expression {
            Expression::Identifier(identifier) => self.eval_identifier(identifier, env),
            Expression::Integer(literal) => Value::Integer { value: literal.value },
            Expression::Boolean(literal) => {
                if literal.value { TRUE } else { FALSE }
            },
            Expression::String(literal) => Value::String { value: literal.value },
            Expression::Array(literal) => {
                match self.eval_expressions(literal.elements, env) {
                    Ok(elements) => Value::Array { elements },
                    Err(error) => error
                }
            },
            Expression::Hash(literal) => self.eval_hash_literal(literal, env),
            Expression::Prefix(prefix) => self.eval_prefix(prefix, env),
            Expression::Infix(infix) => self.eval_infix(infix, env),
            Expression::If(expression) => self.eval_if(expression, env),
            Expression::While(expression) => self.eval_while(expression, env),
            Expression::For(expression) => self.eval_for(expression, env),
            Expression::Let(expression) => self.eval_let_expression(expression, env),
            Expression::Function(literal) => {
                let parameters = literal.parameters.into_iter()
                    .map(|parameter| parameter.value)
                    .collect::<Vec<String>>();

                Value::Function {
                    parameters,
                    body: literal.body,
                    env
                }
            },
            Expression::Call(call) => self.eval_call(call, env),
            Expression::Index(index) => self.eval_index(index, env)
        }
    }

    fn eval_identifier(&self, identifier: Identifier, env: Rc<RefCell<Environment>>) -> Value {
        match env.borrow().get(&identifier.value) {
            Some(value) => value,
            None => Value::Error {
                message: format!("identifier not found: {}", identifier.value)
            }
        }
    }

    fn eval_expressions(
        &mut self,
        expressions: Vec<Expression>,
        env: Rc<RefCell<Environment>>
    ) -> Result<Vec<Value>, Value> {
        let mut values = Vec::with_capacity(expressions.len());

        for expression in expressions {
            let value = self.eval_expression(expression, env.clone());

            if let Value::Error { .. } = value {
                return Err(value);
            }

            values.push(value);
        }

        Ok(values)
    }

    fn eval_hash_literal(&mut self, literal: HashLiteral, env: Rc<RefCell<Environment>>) -> Value {
        let mut pairs = HashMap::new();

        for (key_expression, value_expression) in literal.pairs {
            let key = self.eval_expression(key_expression, env.clone());

            if let Value::Error { .. } = key {
                return key;
            }

            let hash_key = match key.hash_key() {
                Some(hash_key) => hash_key,
                None => return Value::Error {
                    message: format!("unusable as hash key: {}", key._type())
                }
            };

            let value = self.eval_expression(value_expression, env.clone());

            if let Value::Error { .. } = value {
                return value;
            }

            pairs.insert(hash_key, (key, value));
        }

        Value::Hash { pairs }
    }

    fn eval_prefix(&mut self, prefix: Prefix, env: Rc<RefCell<Environment>>) -> Value {
        let right = self.eval_expression(*prefix.right, env);

        if let Value::Error { .. } = right {
            return right;
        }

        match prefix.operator {
            Token::Bang => {
                if is_truthy(&right) { FALSE } else { TRUE }
            },
            Token::Minus => match right {
                Value::Integer { value } => Value::Integer { value: value.wrapping_neg() },
                right => Value::Error {
                    message: format!("unknown operator: -{}", right._type())
                }
            },
            operator => Value::Error {
                message: format!("unknown operator: {}{}", operator.as_literal(), right._type())
            }
        }
    }

    fn eval_infix(&mut self, infix: Infix, env: Rc<RefCell<Environment>>) -> Value {
        let left = self.eval_expression(*infix.left, env.clone());

        if let Value::Error { .. } = left {
            return left;
        }

        let right = self.eval_expression(*infix.right, env);

        if let Value::Error { .. } = right {
            return right;
        }

        match (left, right) {
            (
                Value::Integer { value: left_value },
                Value::Integer { value: right_value }
            ) => {
                match infix.operator {
                    Token::Plus => Value::Integer { value: left_value.wrapping_add(right_value) },
                    Token::Minus => Value::Integer { value: left_value.wrapping_sub(right_value) },
                    Token::Asterisk => Value::Integer { value: left_value.wrapping_mul(right_value) },
                    Token::Slash => {
                        if right_value == 0 {
                            Value::Error { message: "division by zero".to_string() }
                        } else {
                            Value::Integer { value: left_value.wrapping_div(right_value) }
                        }
                    },
                    Token::LessThan => Value::Boolean { value: left_value < right_value },
                    Token::GreaterThan => Value::Boolean { value: left_value > right_value },
                    Token::Equal => Value::Boolean { value: left_value == right_value },
                    Token::NotEqual => Value::Boolean { value: left_value != right_value },
                    operator => Value::Error {
                        message: format!("unknown operator: INTEGER {} INTEGER", operator.as_literal())
                    }
                }
            },
            (
                Value::Boolean { value: left_value },
                Value::Boolean { value: right_value }
            ) => {
                match infix.operator {
                    Token::Equal => Value::Boolean { value: left_value == right_value },
                    Token::NotEqual => Value::Boolean { value: left_value != right_value },
                    operator => Value::Error {
                        message: format!("unknown operator: BOOLEAN {} BOOLEAN", operator.as_literal())
                    }
                }
            },
            (
                Value::String { value: left_value },
                Value::String { value: right_value }
            ) => {
                match infix.operator {
                    Token::Plus => Value::String { value: format!("{left_value}{right_value}") },
                    operator => Value::Error {
                        message: format!("unknown operator: STRING {} STRING", operator.as_literal())
                    }
                }
            },
            (left, right) => {
                if left._type() != right._type() {
                    Value::Error {
                        message: format!(
                            "type mismatch: {} {} {}",
                            left._type(),
                            infix.operator.as_literal(),
                            right._type()
                        )
                    }
                } else {
                    Value::Error {
                        message: format!(
                            "unknown operator: {} {} {}",
                            left._type(),
                            infix.operator.as_literal(),
                            right._type()
                        )
                    }
                }
            }
        }
    }

    fn eval_if(&mut self, expression: IfExpression, env: Rc<RefCell<Environment>>) -> Value {
        let condition = self.eval_expression(*expression.condition, env.clone());

        if let Value::Error { .. } = condition {
            return condition;
        }

        if is_truthy(&condition) {
            self.eval_block(expression.consequence, env)
        } else {
            match expression.alternative {
                Some(alternative) => self.eval_block(alternative, env),
                None => NULL
            }
        }
    }

    fn eval_while(&mut self, expression: WhileExpression, env: Rc<RefCell<Environment>>) -> Value {
        loop {
            let condition = self.eval_expression(*expression.condition.clone(), env.clone());

            if let Value::Error { .. } = condition {
                return condition;
            }

            if !is_truthy(&condition) {
                return NULL;
            }

            let result = self.eval_block(expression.body.clone(), env.clone());

            match result {
                Value::ReturnValue { .. } | Value::Error { .. } => return result,
                _ => {}
            }
        }
    }

    fn eval_for(&mut self, expression: ForExpression, env: Rc<RefCell<Environment>>) -> Value {
        let init = self.eval_expression(*expression.init, env.clone());

        if let Value::Error { .. } = init {
            return init;
        }

        loop {
            let condition = self.eval_expression(*expression.condition.clone(), env.clone());

            if let Value::Error { .. } = condition {
                return condition;
            }

            if !is_truthy(&condition) {
                return NULL;
            }

            let result = self.eval_block(expression.body.clone(), env.clone());

            match result {
                Value::ReturnValue { .. } | Value::Error { .. } => return result,
                _ => {}
            }

            let update = self.eval_expression(*expression.update.clone(), env.clone());

            if let Value::Error { .. } = update {
                return update;
            }
        }
    }

    fn eval_let_expression(&mut self, expression: LetExpression, env: Rc<RefCell<Environment>>) -> Value {
        let value = self.eval_expression(*expression.value, env.clone());

        if let Value::Error { .. } = value {
            return value;
        }

        env.borrow_mut().set(expression.name.value, value.clone());

        value
    }

    fn eval_call(&mut self, call: CallExpression, env: Rc<RefCell<Environment>>) -> Value {
        let function = self.eval_expression(*call.function, env.clone());

        if let Value::Error { .. } = function {
            return function;
        }

        let arguments = match self.eval_expressions(call.arguments, env) {
            Ok(arguments) => arguments,
            Err(error) => return error
        };

        self.apply_function(function, arguments)
    }

    fn apply_function(&mut self, function: Value, arguments: Vec<Value>) -> Value {
        match function {
            Value::Function { parameters, body, env } => {
                if parameters.len() != arguments.len() {
                    return Value::Error {
                        message: format!(
                            "wrong number of arguments: expected {}, got {}",
                            parameters.len(),
                            arguments.len()
                        )
                    };
                }

                // The call environment encloses the function's captured
                // environment, not the caller's.
                let call_env = self.new_enclosed(env);

                for (parameter, argument) in parameters.into_iter().zip(arguments) {
                    call_env.borrow_mut().set(parameter, argument);
                }

                let result = self.eval_block(body, call_env);

                match result {
                    Value::ReturnValue { value } => *value,
                    result => result
                }
            },
            Value::Builtin { func, .. } => func(arguments),
            function => Value::Error {
                message: format!("not a function: {}", function._type())
            }
        }
    }

    fn eval_index(&mut self, index: IndexExpression, env: Rc<RefCell<Environment>>) -> Value {
        let left = self.eval_expression(*index.left, env.clone());

        if let Value::Error { .. } = left {
            return left;
        }

        let key = self.eval_expression(*index.index, env);

        if let Value::Error { .. } = key {
            return key;
        }

        match (left, key) {
            (Value::Array { elements }, Value::Integer { value }) => {
                if value < 0 || value as usize >= elements.len() {
                    NULL
                } else {
                    elements[value as usize].clone()
                }
            },
            (Value::Array { .. }, _) => Value::Error {
                message: "array index must be an integer".to_string()
            },
            (Value::Hash { pairs }, key) => match key.hash_key() {
                Some(hash_key) => match pairs.get(&hash_key) {
                    Some((_, value)) => value.clone(),
                    None => NULL
                },
                None => Value::Error {
                    message: format!("unusable as hash key: {}", key._type())
                }
            },
            (left, _) => Value::Error {
                message: format!("index operator not supported: {}", left._type())
            }
        }
    }

    fn new_enclosed(&mut self, outer: Rc<RefCell<Environment>>) -> Rc<RefCell<Environment>> {
        let env = Rc::new(RefCell::new(Environment::new_enclosed(outer)));

        self.envs.push(Rc::downgrade(&env));
        self.allocations += 1;

        env
    }

    pub fn collect_garbage(&mut self) {
        self.mark_and_sweep(&NULL);
    }

    /// Marks every environment reachable from the global environment (and
    /// from `last_result`, which the program loop still holds), then clears
    /// the rest. Clearing breaks the reference cycles a closure forms when
    /// it captures the environment it is stored in.
    fn mark_and_sweep(&mut self, last_result: &Value) {
        let mut marked = HashSet::new();

        mark_environment(&self.env, &mut marked);
        mark_value(last_result, &mut marked);

        for weak in &self.envs {
            if let Some(env) = weak.upgrade() {
                if !marked.contains(&Rc::as_ptr(&env)) {
                    let mut env = env.borrow_mut();

                    env.store.clear();
                    env.outer = None;
                }
            }
        }

        self.envs.retain(|weak| match weak.upgrade() {
            Some(env) => marked.contains(&Rc::as_ptr(&env)),
            None => false
        });

        self.allocations = 0;
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Boolean { value } => *value,
        Value::Null => false,
        _ => true
    }
}

fn mark_environment(
    env: &Rc<RefCell<Environment>>,
    marked: &mut HashSet<*const RefCell<Environment>>
) {
    if !marked.insert(Rc::as_ptr(env)) {
        return;
    }

    let env = env.borrow();

    for value in env.store.values() {
        mark_value(value, marked);
    }

    if let Some(outer) = &env.outer {
        mark_environment(outer, marked);
    }
}

fn mark_value(value: &Value, marked: &mut HashSet<*const RefCell<Environment>>) {
    match value {
        Value::Function { env, .. } => mark_environment(env, marked),
        Value::ReturnValue { value } => mark_value(value, marked),
        Value::Array { elements } => {
            for element in elements {
                mark_value(element, marked);
            }
        },
        Value::Hash { pairs } => {
            for (key, value) in pairs.values() {
                mark_value(key, marked);
                mark_value(value, marked);
            }
        },
        _ => {}
    }
}
