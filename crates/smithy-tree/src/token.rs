use std::fmt;

use text_size::TextRange;

/// Lexical category of a [`CapturedToken`].
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum TokenKind {
    IDENTIFIER,
    STRING,
    TEXT_BLOCK,
    NUMBER,
    SPACE,
    NEWLINE,
    COMMA,
    COMMENT,
    DOC_COMMENT,
    AT,
    DOLLAR,
    POUND,
    DOT,
    COLON,
    WALRUS,
    EQUAL,
    LBRACE,
    RBRACE,
    LBRACKET,
    RBRACKET,
    LPAREN,
    RPAREN,
    ERROR,
    EOF,
}

impl TokenKind {
    pub const ALL: [Self; 24] = [
        Self::IDENTIFIER,
        Self::STRING,
        Self::TEXT_BLOCK,
        Self::NUMBER,
        Self::SPACE,
        Self::NEWLINE,
        Self::COMMA,
        Self::COMMENT,
        Self::DOC_COMMENT,
        Self::AT,
        Self::DOLLAR,
        Self::POUND,
        Self::DOT,
        Self::COLON,
        Self::WALRUS,
        Self::EQUAL,
        Self::LBRACE,
        Self::RBRACE,
        Self::LBRACKET,
        Self::RBRACKET,
        Self::LPAREN,
        Self::RPAREN,
        Self::ERROR,
        Self::EOF,
    ];

    /// Commas are insignificant separators, so they count as whitespace.
    pub fn is_whitespace(self) -> bool {
        matches!(self, Self::SPACE | Self::NEWLINE | Self::COMMA | Self::COMMENT)
    }

    pub fn is_trivia(self) -> bool {
        self.is_whitespace() || self == Self::DOC_COMMENT
    }

    /// Fixed source text of punctuation kinds.
    pub fn punctuation(self) -> Option<&'static str> {
        Some(match self {
            Self::COMMA => ",",
            Self::AT => "@",
            Self::DOLLAR => "$",
            Self::POUND => "#",
            Self::DOT => ".",
            Self::COLON => ":",
            Self::WALRUS => ":=",
            Self::EQUAL => "=",
            Self::LBRACE => "{",
            Self::RBRACE => "}",
            Self::LBRACKET => "[",
            Self::RBRACKET => "]",
            Self::LPAREN => "(",
            Self::RPAREN => ")",
            _ => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.punctuation() {
            Some(text) => write!(f, "{self:?}('{text}')"),
            None => write!(f, "{self:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

/// Decoded value of a string, text block or number token.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(Box<str>),
    Number(Number),
}

/// 1-based line and column. Columns count bytes from the start of the line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.line, self.column)
    }
}

/// Immutable snapshot of one lexical unit.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedToken {
    pub kind: TokenKind,
    pub range: TextRange,
    pub start: Position,
    pub end: Position,
    pub lexeme: Box<str>,
    pub literal: Option<Literal>,
    pub error: Option<Box<str>>,
}

impl CapturedToken {
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn string_value(&self) -> Option<&str> {
        match &self.literal {
            Some(Literal::String(value)) => Some(value),
            _ => None,
        }
    }

    pub fn number_value(&self) -> Option<Number> {
        match self.literal {
            Some(Literal::Number(value)) => Some(value),
            _ => None,
        }
    }

    pub fn is_identifier(&self, text: &str) -> bool {
        self.kind == TokenKind::IDENTIFIER && &*self.lexeme == text
    }

    /// `KIND('lexeme')`, as used in messages and tree dumps.
    pub fn debug(&self) -> String {
        match self.kind {
            TokenKind::EOF => "EOF".to_owned(),
            kind => format!("{kind:?}('{}')", self.lexeme.escape_debug()),
        }
    }
}
