//! The classified error value.

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};

use crate::{Failure, Operation};

/// A failure reshaped into the stable taxonomy.
///
/// Holds the operation that produced it, the failure identifier and the
/// bounded, redacted text of the original error. The original error is not
/// retained, so nothing unredacted is reachable through [`source`].
///
/// When it has to travel through an `io::Result` (the dialer and connection
/// traits speak `std::io`), it is boxed inside an [`io::Error`] whose kind is
/// [`Failure::io_kind`]; [`ClassifiedError::from_io_error`] gets it back.
///
/// [`source`]: std::error::Error::source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassifiedError {
    operation: Operation,
    failure: Failure,
    message: String,
}

impl ClassifiedError {
    /// Build a classified error.
    ///
    /// `message` is kept as given; callers outside the classifier must pass
    /// text that is already safe to retain.
    pub fn new(operation: Operation, failure: Failure, message: impl Into<String>) -> Self {
        Self {
            operation,
            failure,
            message: message.into(),
        }
    }

    /// The operation that produced the failure.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// The failure identifier.
    pub fn failure(&self) -> Failure {
        self.failure
    }

    /// Redacted description of the original error.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Same failure, attributed to another operation.
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = operation;
        self
    }

    /// Extract the classified error carried by an `io::Error`, if any.
    pub fn from_io_error(err: &io::Error) -> Option<&ClassifiedError> {
        err.get_ref()?.downcast_ref::<ClassifiedError>()
    }

    /// Whether an `io::Error` carries a classified error.
    pub fn is_classified(err: &io::Error) -> bool {
        Self::from_io_error(err).is_some()
    }
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.failure {
            Failure::Unknown if !self.message.is_empty() => {
                write!(f, "{}: {}", self.failure, self.message)
            }
            failure => write!(f, "{failure}"),
        }
    }
}

impl std::error::Error for ClassifiedError {}

impl PartialEq<Failure> for ClassifiedError {
    fn eq(&self, other: &Failure) -> bool {
        self.failure == *other
    }
}

impl From<ClassifiedError> for io::Error {
    fn from(err: ClassifiedError) -> Self {
        io::Error::new(err.failure.io_kind(), err)
    }
}
