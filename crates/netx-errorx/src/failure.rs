//! The closed set of failure identifiers.

use std::fmt;
use std::io;

use netx_core::failures::*;
use serde::{Deserialize, Serialize};

/// Stable classification identifier of a failed operation.
///
/// The string forms are part of the measurement data format; see
/// [`netx_core::failures`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Failure {
    #[serde(rename = "connection_refused")]
    ConnectionRefused,
    #[serde(rename = "connection_reset")]
    ConnectionReset,
    #[serde(rename = "connection_aborted")]
    ConnectionAborted,
    #[serde(rename = "generic_timeout_error")]
    Timeout,
    #[serde(rename = "host_unreachable")]
    HostUnreachable,
    #[serde(rename = "network_unreachable")]
    NetworkUnreachable,
    #[serde(rename = "dns_nxdomain_error")]
    DnsNxdomain,
    #[serde(rename = "eof_error")]
    Eof,
    #[serde(rename = "interrupted")]
    Interrupted,
    #[serde(rename = "broken_pipe")]
    BrokenPipe,
    #[serde(rename = "not_connected")]
    NotConnected,
    #[serde(rename = "address_not_available")]
    AddressNotAvailable,
    /// No rule matched.
    #[serde(rename = "unknown_failure")]
    Unknown,
}

impl Failure {
    /// Stable string form, as serialized.
    pub const fn as_str(self) -> &'static str {
        match self {
            Failure::ConnectionRefused => FAILURE_CONNECTION_REFUSED,
            Failure::ConnectionReset => FAILURE_CONNECTION_RESET,
            Failure::ConnectionAborted => FAILURE_CONNECTION_ABORTED,
            Failure::Timeout => FAILURE_GENERIC_TIMEOUT,
            Failure::HostUnreachable => FAILURE_HOST_UNREACHABLE,
            Failure::NetworkUnreachable => FAILURE_NETWORK_UNREACHABLE,
            Failure::DnsNxdomain => FAILURE_DNS_NXDOMAIN,
            Failure::Eof => FAILURE_EOF,
            Failure::Interrupted => FAILURE_INTERRUPTED,
            Failure::BrokenPipe => FAILURE_BROKEN_PIPE,
            Failure::NotConnected => FAILURE_NOT_CONNECTED,
            Failure::AddressNotAvailable => FAILURE_ADDRESS_NOT_AVAILABLE,
            Failure::Unknown => FAILURE_UNKNOWN,
        }
    }

    /// The `io::ErrorKind` a classified error of this kind travels under.
    pub const fn io_kind(self) -> io::ErrorKind {
        match self {
            Failure::ConnectionRefused => io::ErrorKind::ConnectionRefused,
            Failure::ConnectionReset => io::ErrorKind::ConnectionReset,
            Failure::ConnectionAborted => io::ErrorKind::ConnectionAborted,
            Failure::Timeout => io::ErrorKind::TimedOut,
            Failure::HostUnreachable => io::ErrorKind::HostUnreachable,
            Failure::NetworkUnreachable => io::ErrorKind::NetworkUnreachable,
            Failure::DnsNxdomain => io::ErrorKind::NotFound,
            Failure::Eof => io::ErrorKind::UnexpectedEof,
            Failure::Interrupted => io::ErrorKind::Interrupted,
            Failure::BrokenPipe => io::ErrorKind::BrokenPipe,
            Failure::NotConnected => io::ErrorKind::NotConnected,
            Failure::AddressNotAvailable => io::ErrorKind::AddrNotAvailable,
            Failure::Unknown => io::ErrorKind::Other,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
