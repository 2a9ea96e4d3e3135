use crate::{lexer::prelude::{LexicalError, Token}, utils::prelude::SrcSpan};

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    UnexpectedToken {
        token: Token,
        expected: &'static str,
    },
    NoPrefixParseFn {
        token: Token,
    },
    MissingSemicolon {
        token: Token,
    },
    InvalidIntegerLiteral {
        literal: String,
    },
    UnexpectedEof,
    LexError { error: LexicalError },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub error: ParseErrorType,
    pub span: SrcSpan
}

impl ParseError {
    /// The one-line form the interactive loops print. Tests depend on the
    /// exact wording.
    pub fn message(&self) -> String {
        match &self.error {
            ParseErrorType::UnexpectedToken { token, expected } => {
                format!("expected next token to be {}, got {} instead", expected, token.kind())
            },
            ParseErrorType::NoPrefixParseFn { token } => {
                format!("no prefix parse function for {} found", token.kind())
            },
            ParseErrorType::MissingSemicolon { token } => {
                format!("expected next token to be ;, got {} instead", token.kind())
            },
            ParseErrorType::InvalidIntegerLiteral { literal } => {
                format!("could not parse {} as integer", literal)
            },
            ParseErrorType::UnexpectedEof => "unexpected end of input".to_string(),
            ParseErrorType::LexError { error } => error.details().0.to_string()
        }
    }

    /// Label text and extra help lines for span diagnostics.
    pub fn details(&self) -> (String, Vec<String>) {
        match &self.error {
            ParseErrorType::UnexpectedToken { .. } => (self.message(), vec![]),
            ParseErrorType::NoPrefixParseFn { .. } => (
                self.message(),
                vec!["This token cannot begin an expression.".to_string()]
            ),
            ParseErrorType::MissingSemicolon { .. } => (
                self.message(),
                vec!["Statements are separated by `;`.".to_string()]
            ),
            ParseErrorType::InvalidIntegerLiteral { .. } => (
                self.message(),
                vec!["Integers are signed 64-bit values.".to_string()]
            ),
            ParseErrorType::UnexpectedEof => (self.message(), vec![]),
            ParseErrorType::LexError { error } => {
                let (label, extra) = error.details();

                (label.to_string(), extra)
            }
        }
    }
}
