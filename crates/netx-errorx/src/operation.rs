//! Connection lifecycle operations.

use std::fmt;

use netx_core::failures::{CLOSE_OPERATION, CONNECT_OPERATION, READ_OPERATION, WRITE_OPERATION};
use serde::{Deserialize, Serialize};

/// The lifecycle phase that produced an error.
///
/// Assigned by the caller at the point where the raw outcome is obtained;
/// the classifier never infers it from the error itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Establishing a connection.
    Connect,
    /// Reading from an established connection.
    Read,
    /// Writing to (or flushing) an established connection.
    Write,
    /// Shutting down a connection.
    Close,
}

impl Operation {
    /// Every operation, in lifecycle order.
    pub const ALL: [Operation; 4] = [
        Operation::Connect,
        Operation::Read,
        Operation::Write,
        Operation::Close,
    ];

    /// Stable string form, as serialized.
    pub const fn as_str(self) -> &'static str {
        match self {
            Operation::Connect => CONNECT_OPERATION,
            Operation::Read => READ_OPERATION,
            Operation::Write => WRITE_OPERATION,
            Operation::Close => CLOSE_OPERATION,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
