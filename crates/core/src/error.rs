use std::fmt::{Display, Formatter};

/// Errors surfaced by the replay engine (op lexer + reset classifier + replayers).
#[derive(Debug)]
pub enum Error {
    /// The op lexer could not decode an operation string.
    OperationMalformed { detail: String },
    /// A Retain/Delete advanced past the end of the pre-image, or a Delete's
    /// payload did not match the bytes at the cursor.
    OperationDoesNotMatchState { detail: String },
    /// Reading or writing the working tree failed.
    Io {
        context: &'static str,
        source: std::io::Error,
    },
}

impl Error {
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::OperationMalformed {
            detail: detail.into(),
        }
    }

    pub fn state_mismatch(detail: impl Into<String>) -> Self {
        Self::OperationDoesNotMatchState {
            detail: detail.into(),
        }
    }

    pub fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OperationMalformed { detail } => {
                write!(f, "operation malformed: {detail}")
            }
            Self::OperationDoesNotMatchState { detail } => {
                write!(f, "operation does not match state: {detail}")
            }
            Self::Io { context, source } => write!(f, "{context}: {source}"),
        }
    }
}

impl std::error::Error for Error {}
