//! Configuration type definitions for the dialer, classifier, and logging.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults::*;

/// Socket options and timeouts for the system TCP dialer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TcpDialerConfig {
    /// Connect timeout in seconds, covering resolution and every attempt
    /// (0 = no timeout).
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Disable Nagle's algorithm (TCP_NODELAY). Default: true.
    #[serde(default = "default_tcp_no_delay")]
    pub no_delay: bool,
    /// TCP Keep-Alive idle time in seconds (0 = disabled).
    #[serde(default = "default_tcp_keepalive_secs")]
    pub keepalive_secs: u64,
}

impl TcpDialerConfig {
    pub fn connect_timeout(&self) -> Option<Duration> {
        (self.connect_timeout_secs > 0).then(|| Duration::from_secs(self.connect_timeout_secs))
    }
}

impl Default for TcpDialerConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            no_delay: default_tcp_no_delay(),
            keepalive_secs: default_tcp_keepalive_secs(),
        }
    }
}

/// Error classifier configuration.
///
/// When omitted from config files, all fields use the defaults (built-in
/// rule table, `[scrubbed]` placeholder, 256-byte message bound).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Upper bound on the raw error text kept per classified error, in bytes.
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,
    /// Text that replaces every redacted substring.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    /// Additional regular expressions whose matches are redacted, applied
    /// after the built-in endpoint and credential patterns.
    ///
    /// Example: `["(?i)token=[^&\\s]+"]`
    #[serde(default)]
    pub extra_redactions: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_message_bytes: default_max_message_bytes(),
            placeholder: default_placeholder(),
            extra_redactions: Vec::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: Option<String>,
    /// Log format: json, pretty, or compact. Default: pretty.
    pub format: Option<String>,
    /// Output target: stdout or stderr. Default: stderr.
    pub output: Option<String>,
    /// Per-module log level filters (e.g., {"netx_dialer": "trace"}).
    #[serde(default)]
    pub filters: HashMap<String, String>,
}
