//! Default configuration values.
//!
//! Centralized default constants for use across all crates.

// ============================================================================
// Dialer Defaults
// ============================================================================

/// Default connect timeout in seconds (0 = no timeout).
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 15;
/// Default TCP_NODELAY (disable Nagle's algorithm for lower latency).
pub const DEFAULT_TCP_NO_DELAY: bool = true;
/// Default TCP Keep-Alive interval in seconds (0 = disabled).
pub const DEFAULT_TCP_KEEPALIVE_SECS: u64 = 0;

// ============================================================================
// Classifier Defaults
// ============================================================================

/// Default upper bound on the raw error text retained by the classifier.
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 256;
/// Smallest accepted `max_message_bytes`.
pub const MIN_MESSAGE_BYTES: usize = 16;
/// Largest accepted `max_message_bytes`.
pub const MAX_MESSAGE_BYTES: usize = 64 * 1024;
/// Default replacement for redacted substrings.
pub const DEFAULT_REDACTION_PLACEHOLDER: &str = "[scrubbed]";

// ============================================================================
// CLI Defaults
// ============================================================================

/// Default network name for `netx dial`.
pub const DEFAULT_NETWORK: &str = "tcp";
/// Default number of bytes `netx dial` tries to read.
pub const DEFAULT_READ_BYTES: usize = 0;
/// Largest read buffer `netx dial` will allocate.
pub const MAX_READ_BYTES: usize = 1 << 20;
/// How long `netx dial` waits for the first bytes before giving up.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 10;
