use crate::{lexer::prelude::{LexResult, LexicalError, Lexer, Spanned, Token}, utils::prelude::SrcSpan};
use super::error::{ParseError, ParseErrorType};
use super::ast::{Expression, Parsed, Program, Statement};

pub trait Parse<T: Iterator<Item = LexResult>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

pub trait InfixParse<T: Iterator<Item = LexResult>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

pub struct Parser<T: Iterator<Item = LexResult>> {
    pub current_token: Option<Spanned>,
    pub next_token: Option<Spanned>,
    pub lex_errors: Vec<LexicalError>,
    pub errors: Vec<ParseError>,

    tokens: T,
}

impl<T: Iterator<Item = LexResult>> Parser<T> {
    pub fn new(input: T) -> Self {
        let mut parser = Self {
            current_token: None,
            next_token: None,
            lex_errors: vec![],
            errors: vec![],

            tokens: input,
        };

        parser.step();
        parser.step();

        parser
    }

    pub fn step(&mut self) {
        let _ = self.next_token();
    }

    pub fn next_token(&mut self) -> Option<Spanned> {
        let t = self.current_token.take();
        let mut next = None;

        match self.tokens.next() {
            Some(Ok(tok)) => {
                next = Some(tok);
            },
            Some(Err(err)) => {
                self.lex_errors.push(err);
            },
            None => {}
        }

        self.current_token = self.next_token.take();
        self.next_token = next.take();

        t
    }

    pub fn record(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    pub fn current_precedence(&self) -> Precedence {
        match &self.current_token {
            Some((_, token, _)) => Precedence::from(token),
            None => Precedence::Lowest
        }
    }

    /// Parses statements until end of input. Recovery is per statement: a
    /// failed statement is recorded and the loop advances one token, so the
    /// returned program holds everything that did parse.
    pub fn parse(&mut self) -> Parsed {
        let start = match &self.current_token {
            Some((start, _, _)) => *start,
            None => 0
        };

        let mut statements: Vec<Statement> = vec![];
        let mut end = start;

        loop {
            match &self.current_token {
                None | Some((_, Token::Eof, _)) => break,
                _ => {}
            }

            match Statement::parse(self, None) {
                Ok(statement) => {
                    end = statement.location().end;

                    let ends_with_block = statement.ends_with_block();
                    statements.push(statement);

                    self.eat_statement_separator(ends_with_block);
                },
                Err(error) => {
                    self.record(error);
                    self.step();
                }
            }
        }

        let program = Program {
            statements,
            location: SrcSpan { start, end }
        };

        let mut errors: Vec<ParseError> = self.lex_errors.drain(..)
            .map(|error| ParseError {
                error: ParseErrorType::LexError { error },
                span: error.location
            })
            .collect();

        errors.append(&mut self.errors);

        Parsed { program, errors }
    }

    /// Consumes the `;` between two statements in a sequence. The separator
    /// is optional before `}` and end of input, and after a statement that
    /// already ends in a block.
    pub fn eat_statement_separator(&mut self, ends_with_block: bool) {
        match &self.current_token {
            Some((_, Token::Semicolon, _)) => self.step(),
            Some((_, Token::Eof | Token::RBrace, _)) | None => {},
            Some((start, token, end)) => {
                if !ends_with_block {
                    let error = ParseError {
                        error: ParseErrorType::MissingSemicolon { token: token.clone() },
                        span: SrcSpan { start: *start, end: *end }
                    };

                    self.record(error);
                }
            }
        }
    }

    pub fn expect_one(&mut self, token: Token) -> Result<(u32, u32), ParseError> {
        match self.current_token.take() {
            Some((start, tok, end)) if tok == token => {
                self.step();
                Ok((start, end))
            },
            Some(t) => {
                let (start, tok, end) = t.clone();
                self.current_token = Some(t);

                parse_error(
                    ParseErrorType::UnexpectedToken {
                        token: tok,
                        expected: token.kind(),
                    },
                    SrcSpan { start, end }
                )
            },
            None => {
                parse_error(
                    ParseErrorType::UnexpectedEof,
                    SrcSpan { start: 0, end: 0 }
                )
            }
        }
    }

    pub fn expect_ident(&mut self) -> Result<(u32, String, u32), ParseError> {
        match self.current_token.take() {
            Some((start, Token::Ident(value), end)) => {
                self.step();
                Ok((start, value, end))
            },
            Some(t) => {
                let (start, tok, end) = t.clone();
                self.current_token = Some(t);

                parse_error(
                    ParseErrorType::UnexpectedToken {
                        token: tok,
                        expected: "IDENT",
                    },
                    SrcSpan { start, end }
                )
            },
            None => {
                parse_error(
                    ParseErrorType::UnexpectedEof,
                    SrcSpan { start: 0, end: 0 }
                )
            }
        }
    }

    pub fn expect_int(&mut self) -> Result<(u32, String, u32), ParseError> {
        match self.current_token.take() {
            Some((start, Token::Int(literal), end)) => {
                self.step();
                Ok((start, literal, end))
            },
            Some(t) => {
                let (start, tok, end) = t.clone();
                self.current_token = Some(t);

                parse_error(
                    ParseErrorType::UnexpectedToken {
                        token: tok,
                        expected: "INT",
                    },
                    SrcSpan { start, end }
                )
            },
            None => {
                parse_error(
                    ParseErrorType::UnexpectedEof,
                    SrcSpan { start: 0, end: 0 }
                )
            }
        }
    }

    pub fn expect_string(&mut self) -> Result<(u32, String, u32), ParseError> {
        match self.current_token.take() {
            Some((start, Token::String(value), end)) => {
                self.step();
                Ok((start, value, end))
            },
            Some(t) => {
                let (start, tok, end) = t.clone();
                self.current_token = Some(t);

                parse_error(
                    ParseErrorType::UnexpectedToken {
                        token: tok,
                        expected: "STRING",
                    },
                    SrcSpan { start, end }
                )
            },
            None => {
                parse_error(
                    ParseErrorType::UnexpectedEof,
                    SrcSpan { start: 0, end: 0 }
                )
            }
        }
    }

}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

impl From<&Token> for Precedence {
    fn from(value: &Token) -> Self {
        match value {
            Token::Equal | Token::NotEqual => Self::Equals,
            Token::LessThan | Token::GreaterThan => Self::LessGreater,
            Token::Plus | Token::Minus => Self::Sum,
            Token::Asterisk | Token::Slash => Self::Product,
            Token::LParen => Self::Call,
            Token::LSBracket => Self::Index,
            _ => Self::Lowest,
        }
    }
}

pub fn parse_program(src: &str) -> Parsed {
    let lexer = Lexer::new(src.char_indices().map(|(i, c)| (i as u32, c)));
    let mut parser = Parser::new(lexer);

    parser.parse()
}

pub fn parse_program_from_stream(stream: impl Iterator<Item = char>) -> Parsed {
    let lexer = Lexer::new(stream
        .scan(0, |pos, c| {
            *pos += c.len_utf8() as u32;
            Some((*pos - c.len_utf8() as u32, c))
        })
    );
    let mut parser = Parser::new(lexer);

    parser.parse()
}

pub fn parse_error<T>(error: ParseErrorType, span: SrcSpan) -> Result<T, ParseError> {
    Err(ParseError { error, span })
}
