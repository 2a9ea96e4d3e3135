#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // <letter|_>{<letter>|_}
    Ident(String),
    // {/ <digit> /}, value kept as source text
    Int(String),
    // "interior text", quotes stripped
    String(String),
    // anything the lexer does not recognize
    Illegal(char),

    // Operators
    Assign, // =
    Plus, // +
    Minus, // -
    Bang, // !
    Asterisk, // *
    Slash, // /

    LessThan, // <
    GreaterThan, // >
    Equal, // ==
    NotEqual, // !=

    // Delimiters
    Comma, // ,
    Semicolon, // ;
    Colon, // :
    LParen, // (
    RParen, // )
    LBrace, // {
    RBrace, // }
    LSBracket, // [
    RSBracket, // ]

    // Keywords
    Function, // fn
    Let, // let
    True, // true
    False, // false
    If, // if
    Else, // else
    Return, // return
    While, // while
    For, // for

    Eof,
}

impl Token {
    /// The kind name used in parser error messages, e.g.
    /// "expected next token to be ), got EOF instead".
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Ident(_) => "IDENT",
            Token::Int(_) => "INT",
            Token::String(_) => "STRING",
            Token::Illegal(_) => "ILLEGAL",

            Token::Assign => "=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Bang => "!",
            Token::Asterisk => "*",
            Token::Slash => "/",

            Token::LessThan => "<",
            Token::GreaterThan => ">",
            Token::Equal => "==",
            Token::NotEqual => "!=",

            Token::Comma => ",",
            Token::Semicolon => ";",
            Token::Colon => ":",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::LSBracket => "[",
            Token::RSBracket => "]",

            Token::Function => "FUNCTION",
            Token::Let => "LET",
            Token::True => "TRUE",
            Token::False => "FALSE",
            Token::If => "IF",
            Token::Else => "ELSE",
            Token::Return => "RETURN",
            Token::While => "WHILE",
            Token::For => "FOR",

            Token::Eof => "EOF",
        }
    }

    /// The source spelling of the token, as it would appear in a program.
    pub fn as_literal(&self) -> String {
        match self {
            Token::Ident(value) => value.clone(),
            Token::Int(value) => value.clone(),
            Token::String(value) => value.clone(),
            Token::Illegal(value) => value.to_string(),

            Token::Assign => "=".to_string(),
            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Bang => "!".to_string(),
            Token::Asterisk => "*".to_string(),
            Token::Slash => "/".to_string(),

            Token::LessThan => "<".to_string(),
            Token::GreaterThan => ">".to_string(),
            Token::Equal => "==".to_string(),
            Token::NotEqual => "!=".to_string(),

            Token::Comma => ",".to_string(),
            Token::Semicolon => ";".to_string(),
            Token::Colon => ":".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::LBrace => "{".to_string(),
            Token::RBrace => "}".to_string(),
            Token::LSBracket => "[".to_string(),
            Token::RSBracket => "]".to_string(),

            Token::Function => "fn".to_string(),
            Token::Let => "let".to_string(),
            Token::True => "true".to_string(),
            Token::False => "false".to_string(),
            Token::If => "if".to_string(),
            Token::Else => "else".to_string(),
            Token::Return => "return".to_string(),
            Token::While => "while".to_string(),
            Token::For => "for".to_string(),

            Token::Eof => "\0".to_string(),
        }
    }
}
