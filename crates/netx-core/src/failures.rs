//! Stable operation and failure strings.
//!
//! These strings are what ends up in serialized measurement results, so
//! they must never change once published.

// ============================================================================
// Operations
// ============================================================================

/// Establishing a connection.
pub const CONNECT_OPERATION: &str = "connect";
/// Reading from an established connection.
pub const READ_OPERATION: &str = "read";
/// Writing to an established connection.
pub const WRITE_OPERATION: &str = "write";
/// Closing a connection.
pub const CLOSE_OPERATION: &str = "close";

// ============================================================================
// Failures
// ============================================================================

/// The peer actively refused the connection.
pub const FAILURE_CONNECTION_REFUSED: &str = "connection_refused";
/// The peer reset the connection.
pub const FAILURE_CONNECTION_RESET: &str = "connection_reset";
/// The connection was aborted locally.
pub const FAILURE_CONNECTION_ABORTED: &str = "connection_aborted";
/// Any timeout, whatever layer produced it.
pub const FAILURE_GENERIC_TIMEOUT: &str = "generic_timeout_error";
/// No route to the destination host.
pub const FAILURE_HOST_UNREACHABLE: &str = "host_unreachable";
/// The destination network is unreachable.
pub const FAILURE_NETWORK_UNREACHABLE: &str = "network_unreachable";
/// The name does not resolve.
pub const FAILURE_DNS_NXDOMAIN: &str = "dns_nxdomain_error";
/// The peer closed the stream before the expected data arrived.
pub const FAILURE_EOF: &str = "eof_error";
/// The operation was cancelled or interrupted.
pub const FAILURE_INTERRUPTED: &str = "interrupted";
/// Write on a connection whose read side was closed by the peer.
pub const FAILURE_BROKEN_PIPE: &str = "broken_pipe";
/// Operation on a socket that is not (or no longer) connected.
pub const FAILURE_NOT_CONNECTED: &str = "not_connected";
/// The requested local address cannot be used.
pub const FAILURE_ADDRESS_NOT_AVAILABLE: &str = "address_not_available";
/// Catch-all for anything no rule recognizes.
pub const FAILURE_UNKNOWN: &str = "unknown_failure";
