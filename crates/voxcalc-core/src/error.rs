//! Error types for the voxcalc core
//!
//! All fallible operations return `Result<T, Error>`.
//! Every failure is classified and carries a human-readable reason;
//! none of them is fatal, callers display the message and allow a retry.

use std::fmt;

/// Voxcalc error taxonomy
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Speech capture or synthesis is not available (collaborator-reported)
    #[error("Speech support unavailable: {0}")]
    UnsupportedEnvironment(String),

    /// Transcription failed or was aborted (collaborator-reported)
    #[error("Recognition error: {0}")]
    Recognition(String),

    /// Nothing left to evaluate after normalization
    #[error("Empty expression: nothing to calculate")]
    EmptyExpression,

    /// Operand outside the domain of an operation (factorial of a negative)
    #[error("Domain error: {0}")]
    Domain(String),

    /// Operand too large for an exact result (factorial above 170)
    #[error("Overflow: {0}")]
    Overflow(String),

    /// Canonical expression does not parse under the closed grammar
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// Evaluated value is NaN (or infinite, depending on policy)
    #[error("Invalid result: {0}")]
    InvalidResult(String),
}

/// Stable discriminant of an [`Error`], used in JSON output and bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnsupportedEnvironment,
    Recognition,
    EmptyExpression,
    Domain,
    Overflow,
    Syntax,
    InvalidResult,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnsupportedEnvironment(_) => ErrorKind::UnsupportedEnvironment,
            Error::Recognition(_) => ErrorKind::Recognition,
            Error::EmptyExpression => ErrorKind::EmptyExpression,
            Error::Domain(_) => ErrorKind::Domain,
            Error::Overflow(_) => ErrorKind::Overflow,
            Error::Syntax(_) => ErrorKind::Syntax,
            Error::InvalidResult(_) => ErrorKind::InvalidResult,
        }
    }

    /// True for failures reported by the speech collaborators rather than the core
    pub fn is_collaborator_error(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedEnvironment(_) | Error::Recognition(_)
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ErrorKind::UnsupportedEnvironment => "UnsupportedEnvironmentError",
            ErrorKind::Recognition => "RecognitionError",
            ErrorKind::EmptyExpression => "EmptyExpressionError",
            ErrorKind::Domain => "DomainError",
            ErrorKind::Overflow => "OverflowError",
            ErrorKind::Syntax => "SyntaxError",
            ErrorKind::InvalidResult => "InvalidResultError",
        };
        f.write_str(name)
    }
}

/// Result type alias for voxcalc operations
pub type Result<T> = std::result::Result<T, Error>;
