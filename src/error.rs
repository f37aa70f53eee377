//! Error types for the rules engine.
//!
//! Every user-facing failure carries a kind and a message. Internal
//! consistency breaks are not represented here; they panic.

use std::fmt;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// Syntax violation in FEN or SAN text.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Well-formed FEN describing a board that cannot occur.
    #[error("illegal position: {0}")]
    IllegalPosition(String),

    /// Well-formed move that is not legal here.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// Well-formed move matching more than one legal move.
    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),

    /// Search configuration that cannot be used.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ErrorKind {
    MalformedInput,
    IllegalPosition,
    IllegalMove,
    AmbiguousMove,
    InvalidConfig,
}

impl ChessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChessError::MalformedInput(_) => ErrorKind::MalformedInput,
            ChessError::IllegalPosition(_) => ErrorKind::IllegalPosition,
            ChessError::IllegalMove(_) => ErrorKind::IllegalMove,
            ChessError::AmbiguousMove(_) => ErrorKind::AmbiguousMove,
            ChessError::InvalidConfig(_) => ErrorKind::InvalidConfig,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ChessError::MalformedInput(m)
            | ChessError::IllegalPosition(m)
            | ChessError::IllegalMove(m)
            | ChessError::AmbiguousMove(m)
            | ChessError::InvalidConfig(m) => m,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::MalformedInput => "malformed input",
            ErrorKind::IllegalPosition => "illegal position",
            ErrorKind::IllegalMove => "illegal move",
            ErrorKind::AmbiguousMove => "ambiguous move",
            ErrorKind::InvalidConfig => "invalid config",
        };
        f.write_str(name)
    }
}

pub type Result<T> = std::result::Result<T, ChessError>;
