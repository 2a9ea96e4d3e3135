use std::fmt::Display;

use crate::{
    lexer::prelude::{LexResult, Token},
    parser::prelude::{parse_error, InfixParse, Parse, ParseError, ParseErrorType, Precedence},
    utils::prelude::SrcSpan
};

#[derive(Debug)]
pub struct Parsed {
    pub program: Program,
    pub errors: Vec<ParseError>,
}

// program -> { <statement> [;] }
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub location: SrcSpan
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let statements = self.statements.iter()
            .map(|statement| statement.to_string())
            .collect::<Vec<String>>();

        write!(f, "{}", statements.join(""))
    }
}

// statement -> (<let_statement> | <return_statement> | <expression_statement>)
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let(LetStatement),
    Return(ReturnStatement),
    Expression(ExpressionStatement),
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Statement {
    fn parse(
        parser: &mut crate::parser::prelude::Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, crate::parser::prelude::ParseError> {
        let res = match &parser.current_token {
            Some((_, token, _)) => match token {
                Token::Let => Self::Let(LetStatement::parse(parser, None)?),
                Token::Return => Self::Return(ReturnStatement::parse(parser, None)?),
                _ => Self::Expression(ExpressionStatement::parse(parser, None)?)
            },
            None => return parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: 0, end: 0 }
            )
        };

        Ok(res)
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Let(statement) => write!(f, "{statement}"),
            Self::Return(statement) => write!(f, "{statement}"),
            Self::Expression(statement) => write!(f, "{statement}")
        }
    }
}

impl Statement {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Let(statement) => statement.location,
            Self::Return(statement) => statement.location,
            Self::Expression(statement) => statement.location
        }
    }

    /// Statements whose final token is a closing `}` terminate themselves,
    /// no separator is required after them.
    pub fn ends_with_block(&self) -> bool {
        match self {
            Self::Expression(statement) => matches!(
                statement.expression,
                Expression::If(_)
                    | Expression::While(_)
                    | Expression::For(_)
                    | Expression::Function(_)
            ),
            _ => false
        }
    }
}

// let_statement -> let <identifier> = <expression> ;
#[derive(Debug, Clone, PartialEq)]
pub struct LetStatement {
    pub name: Identifier,
    pub value: Expression,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for LetStatement {
    fn parse(
        parser: &mut crate::parser::prelude::Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, crate::parser::prelude::ParseError> {
        let (start, _) = parser.expect_one(Token::Let)?;

        let name = Identifier::from(parser.expect_ident()?);

        parser.expect_one(Token::Assign)?;

        let value = Expression::parse(parser, None)?;
        let end = value.location().end;

        Ok(Self {
            name,
            value,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for LetStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "let {} = {};", self.name, self.value)
    }
}

// return_statement -> return <expression> ;
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub value: Expression,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ReturnStatement {
    fn parse(
        parser: &mut crate::parser::prelude::Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, crate::parser::prelude::ParseError> {
        let (start, _) = parser.expect_one(Token::Return)?;

        let value = Expression::parse(parser, None)?;
        let end = value.location().end;

        Ok(Self {
            value,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for ReturnStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "return {};", self.value)
    }
}

// expression_statement -> <expression> ;
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expression: Expression,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ExpressionStatement {
    fn parse(
        parser: &mut crate::parser::prelude::Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, crate::parser::prelude::ParseError> {
        let expression = Expression::parse(parser, None)?;
        let location = expression.location();

        Ok(Self {
            expression,
            location
        })
    }
}

impl Display for ExpressionStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.expression)
    }
}

// block -> { { <statement> [;] } }
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Block {
    fn parse(
        parser: &mut crate::parser::prelude::Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, crate::parser::prelude::ParseError> {
        let (start, _) = parser.expect_one(Token::LBrace)?;

        let mut statements = vec![];

        loop {
            match &parser.current_token {
                Some((_, Token::RBrace, _)) => break,
                Some((start, Token::Eof, end)) => return parse_error(
                    ParseErrorType::UnexpectedToken {
                        token: Token::Eof,
                        expected: "}",
                    },
                    SrcSpan { start: *start, end: *end }
                ),
                None => return parse_error(
                    ParseErrorType::UnexpectedEof,
                    SrcSpan { start: 0, end: 0 }
                ),
                _ => {}
            }

            let statement = Statement::parse(parser, None)?;
            let ends_with_block = statement.ends_with_block();

            statements.push(statement);

            parser.eat_statement_separator(ends_with_block);
        }

        let (_, end) = parser.expect_one(Token::RBrace)?;

        Ok(Self {
            statements,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let statements = self.statements.iter()
            .map(|statement| statement.to_string())
            .collect::<Vec<String>>();

        write!(f, "{}", statements.join(""))
    }
}

// expression -> <identifier> | <literal> | <prefix> | <infix> | "(" <expression> ")"
//             | <if> | <while> | <for> | <function> | <call> | <index>
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Integer(IntegerLiteral),
    Boolean(BooleanLiteral),
    String(StringLiteral),
    Array(ArrayLiteral),
    Hash(HashLiteral),
    Prefix(Prefix),
    Infix(Infix),
    If(IfExpression),
    While(WhileExpression),
    For(ForExpression),
    Let(LetExpression),
    Function(FunctionLiteral),
    Call(CallExpression),
    Index(IndexExpression),
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Expression {
    fn parse(
        parser: &mut crate::parser::prelude::Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, crate::parser::prelude::ParseError> {
        let mut expr = match &parser.current_token {
            Some((start, token, end)) => match token {
                Token::Ident(_) => {
                    let ident = parser.expect_ident()?;

                    Self::Identifier(Identifier::from(ident))
                },
                Token::Int(_) => Self::Integer(IntegerLiteral::parse(parser, None)?),
                Token::String(_) => {
                    let (start, value, end) = parser.expect_string()?;

                    Self::String(StringLiteral {
                        value,
                        location: SrcSpan { start, end }
                    })
                },
                Token::True => {
                    let (start, end) = parser.expect_one(Token::True)?;

                    Self::Boolean(BooleanLiteral {
                        value: true,
                        location: SrcSpan { start, end }
                    })
                },
                Token::False => {
                    let (start, end) = parser.expect_one(Token::False)?;

                    Self::Boolean(BooleanLiteral {
                        value: false,
                        location: SrcSpan { start, end }
                    })
                },
                Token::Bang | Token::Minus => Self::Prefix(Prefix::parse(parser, None)?),
                Token::LParen => {
                    parser.expect_one(Token::LParen)?;

                    let expression = Expression::parse(parser, None)?;

                    parser.expect_one(Token::RParen)?;

                    expression
                },
                Token::LSBracket => Self::Array(ArrayLiteral::parse(parser, None)?),
                Token::LBrace => Self::Hash(HashLiteral::parse(parser, None)?),
                Token::If => Self::If(IfExpression::parse(parser, None)?),
                Token::While => Self::While(WhileExpression::parse(parser, None)?),
                Token::For => Self::For(ForExpression::parse(parser, None)?),
                Token::Function => Self::Function(FunctionLiteral::parse(parser, None)?),
                _ => return parse_error(
                    ParseErrorType::NoPrefixParseFn { token: token.clone() },
                    SrcSpan { start: *start, end: *end }
                )
            },
            None => return parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: 0, end: 0 }
            )
        };

        while parser.current_token.as_ref()
            .is_some_and(|token| token.1 != Token::Semicolon) &&
            precedence.unwrap_or(Precedence::Lowest) < parser.current_precedence()
        {
            expr = match &parser.current_token {
                Some((_, next_token, _)) => match next_token {
                    Token::Plus | Token::Minus | Token::Slash |
                    Token::Asterisk | Token::Equal | Token::NotEqual |
                    Token::LessThan | Token::GreaterThan => {
                        Self::Infix(Infix::parse(parser, expr, precedence)?)
                    },
                    Token::LParen => {
                        Self::Call(CallExpression::parse(parser, expr, precedence)?)
                    },
                    Token::LSBracket => {
                        Self::Index(IndexExpression::parse(parser, expr, precedence)?)
                    },
                    _ => break
                },
                None => break
            }
        }

        Ok(expr)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(ident) => write!(f, "{ident}"),
            Self::Integer(literal) => write!(f, "{literal}"),
            Self::Boolean(literal) => write!(f, "{literal}"),
            Self::String(literal) => write!(f, "{literal}"),
            Self::Array(literal) => write!(f, "{literal}"),
            Self::Hash(literal) => write!(f, "{literal}"),
            Self::Prefix(prefix) => write!(f, "{prefix}"),
            Self::Infix(infix) => write!(f, "{infix}"),
            Self::If(expression) => write!(f, "{expression}"),
            Self::While(expression) => write!(f, "{expression}"),
            Self::For(expression) => write!(f, "{expression}"),
            Self::Let(expression) => write!(f, "{expression}"),
            Self::Function(literal) => write!(f, "{literal}"),
            Self::Call(expression) => write!(f, "{expression}"),
            Self::Index(expression) => write!(f, "{expression}")
        }
    }
}

impl Expression {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Identifier(ident) => ident.location,
            Self::Integer(literal) => literal.location,
            Self::Boolean(literal) => literal.location,
            Self::String(literal) => literal.location,
            Self::Array(literal) => literal.location,
            Self::Hash(literal) => literal.location,
            Self::Prefix(prefix) => prefix.location,
            Self::Infix(infix) => infix.location,
            Self::If(expression) => expression.location,
            Self::While(expression) => expression.location,
            Self::For(expression) => expression.location,
            Self::Let(expression) => expression.location,
            Self::Function(literal) => literal.location,
            Self::Call(expression) => expression.location,
            Self::Index(expression) => expression.location
        }
    }
}

// identifier -> <letter_or_underscore> { <letter_or_underscore> }
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub value: String,
    pub location: SrcSpan
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl From<(u32, String, u32)> for Identifier {
    fn from(value: (u32, String, u32)) -> Self {
        Identifier {
            value: value.1,
            location: SrcSpan { start: value.0, end: value.2 }
        }
    }
}

// integer_literal -> <digit> { <digit> }
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerLiteral {
    pub value: i64,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for IntegerLiteral {
    fn parse(
        parser: &mut crate::parser::prelude::Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, crate::parser::prelude::ParseError> {
        let (start, literal, end) = parser.expect_int()?;

        let value = match literal.parse::<i64>() {
            Ok(value) => value,
            Err(_) => return parse_error(
                ParseErrorType::InvalidIntegerLiteral { literal },
                SrcSpan { start, end }
            )
        };

        Ok(Self {
            value,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for IntegerLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

// boolean_literal -> true | false
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub value: bool,
    pub location: SrcSpan
}

impl Display for BooleanLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

// string_literal -> " { <character> } "
#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: String,
    pub location: SrcSpan
}

impl Display for StringLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.value)
    }
}

// array_literal -> [ [<expression> {, <expression> }] ]
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub elements: Vec<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ArrayLiteral {
    fn parse(
        parser: &mut crate::parser::prelude::Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, crate::parser::prelude::ParseError> {
        let (start, _) = parser.expect_one(Token::LSBracket)?;

        let mut elements = vec![];

        match &parser.current_token {
            Some((_, Token::RSBracket, _)) => {},
            _ => {
                elements.push(Expression::parse(parser, None)?);

                while let Ok(_) = parser.expect_one(Token::Comma) {
                    elements.push(Expression::parse(parser, None)?);
                }
            }
        }

        let (_, end) = parser.expect_one(Token::RSBracket)?;

        Ok(Self {
            elements,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for ArrayLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let elements = self.elements.iter()
            .map(|element| element.to_string())
            .collect::<Vec<String>>();

        write!(f, "[{}]", elements.join(", "))
    }
}

// hash_literal -> { [<expression> : <expression> {, <expression> : <expression> }] }
#[derive(Debug, Clone, PartialEq)]
pub struct HashLiteral {
    pub pairs: Vec<(Expression, Expression)>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for HashLiteral {
    fn parse(
        parser: &mut crate::parser::prelude::Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, crate::parser::prelude::ParseError> {
        let (start, _) = parser.expect_one(Token::LBrace)?;

        let mut pairs = vec![];

        match &parser.current_token {
            Some((_, Token::RBrace, _)) => {},
            _ => {
                pairs.push(Self::parse_pair(parser)?);

                while let Ok(_) = parser.expect_one(Token::Comma) {
                    pairs.push(Self::parse_pair(parser)?);
                }
            }
        }

        let (_, end) = parser.expect_one(Token::RBrace)?;

        Ok(Self {
            pairs,
            location: SrcSpan { start, end }
        })
    }
}

impl HashLiteral {
    fn parse_pair<T: Iterator<Item = LexResult>>(
        parser: &mut crate::parser::prelude::Parser<T>
    ) -> Result<(Expression, Expression), ParseError> {
        let key = Expression::parse(parser, None)?;

        parser.expect_one(Token::Colon)?;

        let value = Expression::parse(parser, None)?;

        Ok((key, value))
    }
}

impl Display for HashLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pairs = self.pairs.iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect::<Vec<String>>();

        write!(f, "{{{}}}", pairs.join(", "))
    }
}

// prefix -> (! | -) <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Prefix {
    pub operator: Token,
    pub right: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Prefix {
    fn parse(
        parser: &mut crate::parser::prelude::Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, crate::parser::prelude::ParseError> {
        let (start, operator, _) = match parser.next_token() {
            Some(token) => token,
            None => return parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: 0, end: 0 }
            )
        };

        let right = Expression::parse(parser, Some(Precedence::Prefix))?;
        let end = right.location().end;

        Ok(Self {
            operator,
            right: Box::new(right),
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}{})", self.operator.as_literal(), self.right)
    }
}

// infix -> <expression> <operator> <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Infix {
    pub left: Box<Expression>,
    pub operator: Token,
    pub right: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for Infix {
    fn parse(
        parser: &mut crate::parser::prelude::Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, crate::parser::prelude::ParseError> {
        let precedence = parser.current_precedence();

        let SrcSpan { start, .. } = left.location();

        let operator = match parser.next_token() {
            Some((_, token, _)) => token,
            None => return parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: 0, end: 0 }
            )
        };

        let right = Expression::parse(parser, Some(precedence))?;

        let SrcSpan { end, .. } = right.location();

        Ok(Self {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Infix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator.as_literal(), self.right)
    }
}

// if -> if ( <expression> ) <block> [else <block>]
#[derive(Debug, Clone, PartialEq)]
pub struct IfExpression {
    pub condition: Box<Expression>,
    pub consequence: Block,
    pub alternative: Option<Block>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for IfExpression {
    fn parse(
        parser: &mut crate::parser::prelude::Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, crate::parser::prelude::ParseError> {
        let (start, _) = parser.expect_one(Token::If)?;

        parser.expect_one(Token::LParen)?;

        let condition = Box::new(Expression::parse(parser, None)?);

        parser.expect_one(Token::RParen)?;

        let consequence = Block::parse(parser, None)?;

        let mut end = consequence.location.end;

        let alternative = match parser.expect_one(Token::Else) {
            Ok(_) => {
                let alternative = Block::parse(parser, None)?;

                end = alternative.location.end;

                Some(alternative)
            },
            Err(_) => None
        };

        Ok(Self {
            condition,
            consequence,
            alternative,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for IfExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "if{} {}", self.condition, self.consequence)?;

        if let Some(alternative) = &self.alternative {
            write!(f, "else {}", alternative)?;
        }

        Ok(())
    }
}

// while -> while ( <expression> ) <block>
#[derive(Debug, Clone, PartialEq)]
pub struct WhileExpression {
    pub condition: Box<Expression>,
    pub body: Block,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for WhileExpression {
    fn parse(
        parser: &mut crate::parser::prelude::Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, crate::parser::prelude::ParseError> {
        let (start, _) = parser.expect_one(Token::While)?;

        parser.expect_one(Token::LParen)?;

        let condition = Box::new(Expression::parse(parser, None)?);

        parser.expect_one(Token::RParen)?;

        let body = Block::parse(parser, None)?;
        let end = body.location.end;

        Ok(Self {
            condition,
            body,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for WhileExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "while{} {}", self.condition, self.body)
    }
}

// for -> for ( <loop_clause> ; <expression> ; <loop_clause> ) <block>
#[derive(Debug, Clone, PartialEq)]
pub struct ForExpression {
    pub init: Box<Expression>,
    pub condition: Box<Expression>,
    pub update: Box<Expression>,
    pub body: Block,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ForExpression {
    fn parse(
        parser: &mut crate::parser::prelude::Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, crate::parser::prelude::ParseError> {
        let (start, _) = parser.expect_one(Token::For)?;

        parser.expect_one(Token::LParen)?;

        let init = Box::new(parse_loop_clause(parser)?);

        parser.expect_one(Token::Semicolon)?;

        let condition = Box::new(Expression::parse(parser, None)?);

        parser.expect_one(Token::Semicolon)?;

        let update = Box::new(parse_loop_clause(parser)?);

        parser.expect_one(Token::RParen)?;

        let body = Block::parse(parser, None)?;
        let end = body.location.end;

        Ok(Self {
            init,
            condition,
            update,
            body,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for ForExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "for ({}; {}; {}) {}", self.init, self.condition, self.update, self.body)
    }
}

// loop_clause -> <let_expression> | <expression>
fn parse_loop_clause<T: Iterator<Item = LexResult>>(
    parser: &mut crate::parser::prelude::Parser<T>
) -> Result<Expression, ParseError> {
    match &parser.current_token {
        Some((_, Token::Let, _)) => Ok(Expression::Let(LetExpression::parse(parser, None)?)),
        _ => Expression::parse(parser, None)
    }
}

// let_expression -> let <identifier> = <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct LetExpression {
    pub name: Identifier,
    pub value: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for LetExpression {
    fn parse(
        parser: &mut crate::parser::prelude::Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, crate::parser::prelude::ParseError> {
        let (start, _) = parser.expect_one(Token::Let)?;

        let name = Identifier::from(parser.expect_ident()?);

        parser.expect_one(Token::Assign)?;

        let value = Box::new(Expression::parse(parser, None)?);
        let end = value.location().end;

        Ok(Self {
            name,
            value,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for LetExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "let {} = {}", self.name, self.value)
    }
}

// function_literal -> fn ( [<identifier> {, <identifier> }] ) <block>
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub parameters: Vec<Identifier>,
    pub body: Block,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for FunctionLiteral {
    fn parse(
        parser: &mut crate::parser::prelude::Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, crate::parser::prelude::ParseError> {
        let (start, _) = parser.expect_one(Token::Function)?;

        parser.expect_one(Token::LParen)?;

        let mut parameters = vec![];

        match &parser.current_token {
            Some((_, Token::RParen, _)) => {},
            _ => {
                parameters.push(Identifier::from(parser.expect_ident()?));

                while let Ok(_) = parser.expect_one(Token::Comma) {
                    parameters.push(parser.expect_ident()?.into());
                }
            }
        }

        parser.expect_one(Token::RParen)?;

        let body = Block::parse(parser, None)?;
        let end = body.location.end;

        Ok(Self {
            parameters,
            body,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for FunctionLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parameters = self.parameters.iter()
            .map(|parameter| parameter.to_string())
            .collect::<Vec<String>>();

        write!(f, "fn({}) {}", parameters.join(", "), self.body)
    }
}

// call -> <expression> ( [<expression> {, <expression> }] )
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for CallExpression {
    fn parse(
        parser: &mut crate::parser::prelude::Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, crate::parser::prelude::ParseError> {
        let SrcSpan { start, .. } = left.location();

        parser.expect_one(Token::LParen)?;

        let mut arguments = vec![];

        match &parser.current_token {
            Some((_, Token::RParen, _)) => {},
            _ => {
                arguments.push(Expression::parse(parser, None)?);

                while let Ok(_) = parser.expect_one(Token::Comma) {
                    arguments.push(Expression::parse(parser, None)?);
                }
            }
        }

        let (_, end) = parser.expect_one(Token::RParen)?;

        Ok(Self {
            function: Box::new(left),
            arguments,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for CallExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arguments = self.arguments.iter()
            .map(|argument| argument.to_string())
            .collect::<Vec<String>>();

        write!(f, "{}({})", self.function, arguments.join(", "))
    }
}

// index -> <expression> [ <expression> ]
#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpression {
    pub left: Box<Expression>,
    pub index: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for IndexExpression {
    fn parse(
        parser: &mut crate::parser::prelude::Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, crate::parser::prelude::ParseError> {
        let SrcSpan { start, .. } = left.location();

        parser.expect_one(Token::LSBracket)?;

        let index = Expression::parse(parser, None)?;

        let (_, end) = parser.expect_one(Token::RSBracket)?;

        Ok(Self {
            left: Box::new(left),
            index: Box::new(index),
            location: SrcSpan { start, end }
        })
    }
}

impl Display for IndexExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}[{}])", self.left, self.index)
    }
}
