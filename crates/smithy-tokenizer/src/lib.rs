//! Character-level lexer for the Smithy IDL.
//!
//! Every byte of the input ends up in exactly one token, trivia included,
//! and the stream always ends with a single zero-width `EOF` token.

mod cursor;
mod literal;

use cursor::Cursor;
pub use smithy_tree::{Literal, Number, TokenKind};
use smithy_tree::TokenKind::*;
use text_size::{TextRange, TextSize};

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
    pub literal: Option<Literal>,
    pub error: Option<Box<str>>,
}

pub struct Tokenizer<'a> {
    text: &'a str,
    cursor: Cursor<'a>,
    literal: Option<Literal>,
    error: Option<Box<str>>,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, cursor: Cursor::new(text), literal: None, error: None, finished: false }
    }

    fn offset(&self) -> TextSize {
        TextSize::of(self.text) - self.cursor.len()
    }

    fn range(&self) -> TextRange {
        let end = self.offset();
        TextRange::new(end - self.cursor.pos_within_token(), end)
    }

    fn text(&self) -> &'a str {
        &self.text[self.range()]
    }

    /// Scans the next token. Keeps returning `EOF` once the input is exhausted.
    pub fn next_token(&mut self) -> Token {
        let kind = self.scan();
        let range = self.range();
        self.cursor.reset_pos_within_token();

        Token { kind, range, literal: self.literal.take(), error: self.error.take() }
    }

    fn scan(&mut self) -> TokenKind {
        if self.cursor.is_eof() {
            return EOF;
        }

        match self.cursor.advance() {
            ' ' | '\t' => {
                self.cursor.advance_while(|c| c == ' ' || c == '\t');
                SPACE
            }
            '\n' => NEWLINE,
            '\r' => {
                if self.cursor.matches('\n') {
                    self.cursor.advance();
                }
                NEWLINE
            }
            ',' => COMMA,
            '@' => AT,
            '$' => DOLLAR,
            '#' => POUND,
            '.' => DOT,
            '=' => EQUAL,
            ':' if self.cursor.matches('=') => {
                self.cursor.advance();
                WALRUS
            }
            ':' => COLON,
            '{' => LBRACE,
            '}' => RBRACE,
            '[' => LBRACKET,
            ']' => RBRACKET,
            '(' => LPAREN,
            ')' => RPAREN,
            '/' => self.comment(),
            '"' => self.quoted(),
            '-' if self.cursor.peek().is_ascii_digit() => {
                self.cursor.advance();
                self.number()
            }
            '-' => self.error("Expected a digit after '-'"),
            '0'..='9' => self.number(),
            'A'..='Z' | 'a'..='z' | '_' => {
                self.cursor.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
                IDENTIFIER
            }
            c => self.error(format!("Unexpected character: '{}'", c.escape_debug())),
        }
    }

    fn error(&mut self, message: impl Into<Box<str>>) -> TokenKind {
        self.error = Some(message.into());
        ERROR
    }

    fn comment(&mut self) -> TokenKind {
        if !self.cursor.matches('/') {
            return self.error("Expected a '/' to follow '/' to form a comment");
        }
        self.cursor.advance();

        let kind = if self.cursor.matches('/') { DOC_COMMENT } else { COMMENT };
        self.cursor.advance_while(|c| c != '\n' && c != '\r');
        kind
    }

    fn quoted(&mut self) -> TokenKind {
        if self.cursor.peek() == '"' && self.cursor.second() == '"' {
            self.cursor.advance();
            self.cursor.advance();
            return self.text_block();
        }

        loop {
            if self.cursor.is_eof() {
                return self.error("Unclosed quoted string");
            }
            match self.cursor.advance() {
                '"' => break,
                '\\' => {
                    self.cursor.advance();
                }
                _ => {}
            }
        }

        let text = self.text();
        match literal::unescape(&text[1..text.len() - 1]) {
            Ok(value) => self.string(STRING, value),
            Err(message) => self.error(message),
        }
    }

    fn text_block(&mut self) -> TokenKind {
        loop {
            if self.cursor.is_eof() {
                return self.error("Unclosed text block");
            }
            match self.cursor.advance() {
                '"' if self.cursor.peek() == '"' && self.cursor.second() == '"' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    break;
                }
                '\\' => {
                    self.cursor.advance();
                }
                _ => {}
            }
        }

        let text = self.text();
        match literal::text_block(&text[3..text.len() - 3]) {
            Ok(value) => self.string(TEXT_BLOCK, value),
            Err(message) => self.error(message),
        }
    }

    fn string(&mut self, kind: TokenKind, value: String) -> TokenKind {
        self.literal = Some(Literal::String(value.into()));
        kind
    }

    fn number(&mut self) -> TokenKind {
        self.cursor.advance_while(|c| c.is_ascii_digit());
        let mut integer = true;

        if self.cursor.matches('.') && self.cursor.second().is_ascii_digit() {
            self.cursor.advance();
            self.cursor.advance_while(|c| c.is_ascii_digit());
            integer = false;
        }

        if self.cursor.matches('e') || self.cursor.matches('E') {
            let exponent = match self.cursor.second() {
                '+' | '-' => self.cursor.third().is_ascii_digit(),
                c => c.is_ascii_digit(),
            };
            if exponent {
                self.cursor.advance();
                if matches!(self.cursor.peek(), '+' | '-') {
                    self.cursor.advance();
                }
                self.cursor.advance_while(|c| c.is_ascii_digit());
                integer = false;
            }
        }

        let text = self.text();
        let value = match text.parse::<i64>() {
            Ok(value) if integer => Number::Int(value),
            _ => match text.parse::<f64>() {
                Ok(value) => Number::Float(value),
                Err(err) => return self.error(format!("Invalid number '{text}': {err}")),
            },
        };

        self.literal = Some(Literal::Number(value));
        NUMBER
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    /// Yields every token up to and including `EOF`, then stops.
    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        self.finished = token.kind == EOF;
        Some(token)
    }
}
