use crate::errors::{PbcError, PbcResult};
use crate::frontend::token::Token;
use crate::LineNumber;
use std::{iter::Peekable, str::Chars};

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    state: &'a mut LineNumber,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, state: &'a mut LineNumber) -> Self {
        Self {
            chars: source.chars().peekable(),
            state,
        }
    }

    pub fn scan(mut self) -> PbcResult<Vec<(Token, usize)>> {
        let mut tokens = Vec::new();
        while self.chars.peek().is_some() {
            self.skip_whitespace();
            if self.chars.peek().is_some() {
                let line = self.state.line;
                if let Some(token) = self.scan_token()? {
                    tokens.push((token, line));
                }
            }
        }
        Ok(tokens)
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                if ch == '\n' {
                    self.state.line += 1;
                }
                self.chars.next();
            } else {
                break;
            }
        }
    }

    fn scan_token(&mut self) -> PbcResult<Option<Token>> {
        match self.chars.peek() {
            None => Ok(None),
            Some(&ch) if ch.is_ascii_alphabetic() || ch == '_' => Ok(Some(self.scan_identifier())),
            Some(&ch) if ch.is_ascii_digit() => Ok(Some(self.scan_number()?)),
            Some(&'=') => Ok(Some(self.scan_equal())),
            Some(&ch) => self.scan_single_char_token(ch),
        }
    }

    fn scan_identifier(&mut self) -> Token {
        let mut identifier = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                identifier.push(ch);
                self.chars.next();
            } else {
                break;
            }
        }
        self.keyword_or_identifier(identifier)
    }

    fn keyword_or_identifier(&self, identifier: String) -> Token {
        match identifier.as_str() {
            "if" => Token::If,
            _ => Token::Ident(identifier),
        }
    }

    fn scan_number(&mut self) -> PbcResult<Token> {
        let mut number_str = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_digit() {
                number_str.push(ch);
                self.chars.next();
            } else {
                break;
            }
        }
        number_str.parse::<i64>()
            .map(Token::Number)
            .map_err(|_| PbcError::InvalidNumber { number: number_str, line: self.state.line })
    }

    fn scan_equal(&mut self) -> Token {
        self.chars.next(); // Consume '='
        if self.chars.peek() == Some(&'=') {
            self.chars.next(); // Consume second '='
            Token::IsEqual
        } else {
            Token::Equal
        }
    }

    fn scan_single_char_token(&mut self, ch: char) -> PbcResult<Option<Token>> {
        self.chars.next(); // Consume the character
        let token = match ch {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBrack,
            ']' => Token::RBrack,
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '$' => Token::Dollar,
            ';' => Token::Semicolon,
            _ => {
                // Unrecognized characters are reported and skipped; scanning
                // resumes at the next character.
                eprintln!("illegal character '{}' at line {}", ch, self.state.line);
                return Ok(None);
            }
        };
        Ok(Some(token))
    }
}

// Convenience function wrapping the lexer for one source string
pub fn scan(state: &mut LineNumber, source: &str) -> PbcResult<Vec<(Token, usize)>> {
    let lexer = Lexer::new(source, state);
    lexer.scan()
}
