//! Error types for the Tiger lexer

use crate::lexer::Position;
use thiserror::Error;

/// Lexer errors
#[derive(Error, Debug)]
pub enum Error {
    /// The source text is not lexically valid
    #[error(transparent)]
    Lex(#[from] LexError),

    /// Reading the input source failed
    ///
    /// **Triggered by:** an I/O failure of a reader-backed source, or input
    /// that is not valid UTF-8
    #[error("I/O error while reading source: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the lexical error, if this is one
    pub fn as_lex(&self) -> Option<&LexError> {
        match self {
            Error::Lex(err) => Some(err),
            Error::Io(_) => None,
        }
    }
}

/// What went wrong during a lexical pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    /// A scanned buffer cannot be classified and no shorter prefix matched
    ///
    /// **Example:** `x := 3 ! 4`, `a */ b`
    MalformedToken,
    /// Input ended inside a block comment
    ///
    /// **Example:** `/* never closed`
    UnterminatedComment,
    /// Input ended inside a string literal
    ///
    /// **Example:** `"abc`
    UnterminatedString,
}

impl LexErrorKind {
    /// Whether the error was caused by input ending too early
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            LexErrorKind::UnterminatedComment | LexErrorKind::UnterminatedString
        )
    }
}

/// A positioned lexical error. Terminates the token stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("LEX ERROR at {position}: {message}")]
pub struct LexError {
    /// Error category
    pub kind: LexErrorKind,
    /// Human readable description
    pub message: String,
    /// Where the failure was detected
    pub position: Position,
}

impl LexError {
    /// Create a lexical error
    pub fn new(kind: LexErrorKind, message: impl Into<String>, position: Position) -> Self {
        LexError {
            kind,
            message: message.into(),
            position,
        }
    }

    /// Create a malformed-token error
    pub fn malformed(message: impl Into<String>, position: Position) -> Self {
        Self::new(LexErrorKind::MalformedToken, message, position)
    }
}

/// Result type for lexer operations
pub type Result<T> = std::result::Result<T, Error>;
