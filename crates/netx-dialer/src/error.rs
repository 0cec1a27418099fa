//! Error types for the dialer crate.

use std::io;

use thiserror::Error;

/// Dialer failures that do not originate from the operating system.
///
/// They are surfaced to callers as `io::Error` like every other dial
/// failure, so they pass through the classifier unchanged in shape.
#[derive(Error, Debug)]
pub enum DialerError {
    #[error("unsupported network: {0}")]
    UnsupportedNetwork(String),

    #[error("no {network} address found for {address}")]
    NoAddresses { network: &'static str, address: String },

    #[error("dial cancelled")]
    Cancelled,

    #[error("connect timed out")]
    TimedOut,
}

impl From<DialerError> for io::Error {
    fn from(err: DialerError) -> Self {
        let kind = match &err {
            DialerError::UnsupportedNetwork(_) => io::ErrorKind::InvalidInput,
            DialerError::NoAddresses { .. } => io::ErrorKind::AddrNotAvailable,
            DialerError::Cancelled => io::ErrorKind::Interrupted,
            DialerError::TimedOut => io::ErrorKind::TimedOut,
        };
        io::Error::new(kind, err)
    }
}
