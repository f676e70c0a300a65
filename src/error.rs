//! Error type shared by every engine operation
//!
//! All errors are raised at the point of detection and propagate unchanged to the
//! caller. `Cancelled` is the expected outcome of an abandoned computation and is
//! normally discarded rather than shown.

use thiserror::Error;

/// Errors produced by parsing, arithmetic and formatting
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A precondition on an argument was violated
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Division of a decimal float by an exact zero
    #[error("Division by zero")]
    DivideByZero,
    /// The resulting exponent grew beyond the safety cap
    #[error("Resulting exponent too large")]
    Overflow,
    /// The cancellation token was observed set
    #[error("Operation cancelled")]
    Cancelled,
    /// The digit budget cannot hold even the minimal form of the value
    #[error("The number components are too large for {max_digits} digits")]
    InsufficientDigitBudget { max_digits: usize },
    /// The input text does not match any accepted notation
    #[error("Parse error: {message} in '{input}'")]
    Parse { input: String, message: String },
    /// Configuration data could not be read
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True when the computation was abandoned because a newer one is in flight
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
