//! Errors from building a classifier.

/// Errors that can occur while constructing a classifier.
///
/// Classification itself never fails; only its construction can.
#[derive(Debug, thiserror::Error)]
pub enum ErrorxError {
    /// A configured redaction pattern is not a valid regular expression.
    #[error("invalid redaction pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Configuration value out of range.
    #[error("invalid classifier config: {0}")]
    InvalidConfig(String),
}
