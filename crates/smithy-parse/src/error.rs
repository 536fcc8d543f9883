use text_size::TextRange;

/// A grammar violation, located at the token where it was detected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Syntax error at {filename} [{line}, {column}]: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub filename: String,
    pub line: u32,
    pub column: u32,
    pub range: TextRange,
}

pub(crate) type PResult<T> = Result<T, SyntaxError>;
