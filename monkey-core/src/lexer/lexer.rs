use super::error::{LexicalError, LexicalErrorType};
use super::token::Token;
use std::fmt::Display;
use crate::utils::prelude::SrcSpan;

pub type Spanned = (u32, Token, u32);
pub type LexResult = std::result::Result<Spanned, LexicalError>;

pub fn str_to_keyword(word: &str) -> Option<Token> {
	Some(match word {
		"fn" => Token::Function,
		"let" => Token::Let,
		"true" => Token::True,
		"false" => Token::False,
		"if" => Token::If,
		"else" => Token::Else,
		"return" => Token::Return,
		"while" => Token::While,
		"for" => Token::For,

		_ => return None
	})
}

#[derive(Debug)]
pub struct Lexer<T: Iterator<Item = (u32, char)>> {
	position: u32,
	next_position: u32,
	ch: Option<char>,
	next_ch: Option<char>,
	input: T,
}

impl<T: Iterator<Item = (u32, char)>> Display for Lexer<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f,
			"Lexer {{\n\tposition: {},\n\tnext_position: {},\n\tch: {:?}, next_ch: {:?}\n}}",
			self.position, self.next_position, self.ch, self.next_ch
		)
	}
}

impl<T: Iterator<Item = (u32, char)>> Lexer<T> {
	pub fn new(input: T) -> Self {
        let mut lexer = Self {
            position: 0,
            next_position: 0,
            ch: None,
			next_ch: None,
            input,
        };

        lexer.next_char();
        lexer.next_char();

        return lexer;
    }

    pub fn next_token(&mut self) -> LexResult {
		while matches!(self.ch, Some(' ' | '\t' | '\r' | '\n' | '\x0C')) {
			self.next_char();
		}

		let span = match self.ch {
			Some(ch) => match ch {
				'=' => if self.next_ch == Some('=') {
					self.eat_two_chars(Token::Equal)
				} else {
					self.eat_one_char(Token::Assign)
				},
				'!' => if self.next_ch == Some('=') {
					self.eat_two_chars(Token::NotEqual)
				} else {
					self.eat_one_char(Token::Bang)
				},
				'+' => self.eat_one_char(Token::Plus),
				'-' => self.eat_one_char(Token::Minus),
				'*' => self.eat_one_char(Token::Asterisk),
				'/' => self.eat_one_char(Token::Slash),
				'<' => self.eat_one_char(Token::LessThan),
				'>' => self.eat_one_char(Token::GreaterThan),
				',' => self.eat_one_char(Token::Comma),
				';' => self.eat_one_char(Token::Semicolon),
				':' => self.eat_one_char(Token::Colon),
				'(' => self.eat_one_char(Token::LParen),
				')' => self.eat_one_char(Token::RParen),
				'{' => self.eat_one_char(Token::LBrace),
				'}' => self.eat_one_char(Token::RBrace),
				'[' => self.eat_one_char(Token::LSBracket),
				']' => self.eat_one_char(Token::RSBracket),
				'"' => return self.lex_string(),
				'a'..='z' | 'A'..='Z' | '_' => {
					return Ok(self.lex_ident());
				},
				'0'..='9' => {
					return Ok(self.lex_number());
				},
				c => self.eat_one_char(Token::Illegal(c)),
			},
			None => (self.position, Token::Eof, self.position)
		};

		Ok(span)
    }

	fn next_char(&mut self) -> Option<char> {
		let ch = self.ch;

		let next = match self.input.next() {
			Some((pos, ch)) => {
				self.position = self.next_position;
				self.next_position = pos;

				Some(ch)
			},
			None => {
				self.position = self.next_position;
				self.next_position += 1;

				None
			}
		};

		self.ch = self.next_ch;
		self.next_ch = next;

		ch
	}

	fn eat_one_char(&mut self, token: Token) -> Spanned {
		let start_pos = self.position;
		self.next_char();
		let end_pos = self.position;

		(start_pos, token, end_pos)
	}

	fn eat_two_chars(&mut self, token: Token) -> Spanned {
		let start_pos = self.position;
		self.next_char();
		self.next_char();
		let end_pos = self.position;

		(start_pos, token, end_pos)
	}

	fn lex_ident(&mut self) -> Spanned {
        let start_pos = self.position;
		let mut ident = String::new();

		loop {
			match self.ch {
				// digits do not occur in identifiers in this language
				Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {
					ident.push(ch);
					self.next_char();
				},
				_ => break
			}
		}

        let end_pos = self.position;

        match str_to_keyword(&ident) {
			Some(token) => (start_pos, token, end_pos),
			None => (start_pos, Token::Ident(ident), end_pos)
        }
	}

	fn lex_number(&mut self) -> Spanned {
		let start_pos = self.position;
		let mut digits = String::new();

		loop {
			match self.ch {
				Some(ch) if ch.is_ascii_digit() => {
					digits.push(ch);
					self.next_char();
				},
				_ => break
			}
		}

		let end_pos = self.position;

		(start_pos, Token::Int(digits), end_pos)
	}

	fn lex_string(&mut self) -> LexResult {
		let start_pos = self.position;

		self.next_char(); // skip opening quote

		let mut value = String::new();

		loop {
			match self.ch {
				Some('"') => break,
				Some(ch) => {
					value.push(ch);
					self.next_char();
				},
				None => return Err(LexicalError {
					error: LexicalErrorType::UnterminatedStringLiteral,
					location: SrcSpan::from(start_pos, self.position)
				})
			}
		}

		self.next_char(); // skip closing quote

		let end_pos = self.position;

		Ok((start_pos, Token::String(value), end_pos))
	}
}

impl<T: Iterator<Item = (u32, char)>> Iterator for Lexer<T> {
	type Item = LexResult;

	fn next(&mut self) -> Option<Self::Item> {
		let token = self.next_token();

		Some(token)
	}
}
