//! CLI override definitions and application logic.

use clap::Parser;

use crate::Config;

#[derive(Debug, Clone, Parser, Default)]
pub struct CliOverrides {
    /// Override connect timeout in seconds (0 = no timeout)
    #[arg(long)]
    pub connect_timeout_secs: Option<u64>,
    /// Set TCP_NODELAY on dialed connections
    #[arg(long)]
    pub tcp_no_delay: Option<bool>,
    /// TCP Keep-Alive idle time in seconds (0 = disabled)
    #[arg(long)]
    pub tcp_keepalive_secs: Option<u64>,
    /// Override the classifier's message bound (bytes)
    #[arg(long)]
    pub max_message_bytes: Option<usize>,
    /// Override the redaction placeholder
    #[arg(long)]
    pub redaction_placeholder: Option<String>,
    /// Extra redaction patterns (repeatable or comma-separated)
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    pub redact: Option<Vec<String>>,
    /// Override log level (trace/debug/info/warn/error)
    #[arg(long)]
    pub log_level: Option<String>,
    /// Override log format (json/pretty/compact)
    #[arg(long)]
    pub log_format: Option<String>,
}

pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) {
    if let Some(v) = overrides.connect_timeout_secs {
        config.dialer.connect_timeout_secs = v;
    }
    if let Some(v) = overrides.tcp_no_delay {
        config.dialer.no_delay = v;
    }
    if let Some(v) = overrides.tcp_keepalive_secs {
        config.dialer.keepalive_secs = v;
    }
    if let Some(v) = overrides.max_message_bytes {
        config.classifier.max_message_bytes = v;
    }
    if let Some(v) = &overrides.redaction_placeholder {
        config.classifier.placeholder = v.clone();
    }
    // Patterns from the command line extend the configured ones.
    if let Some(v) = &overrides.redact {
        config.classifier.extra_redactions.extend(v.iter().cloned());
    }
    if let Some(v) = &overrides.log_level {
        config.logging.level = Some(v.clone());
    }
    if let Some(v) = &overrides.log_format {
        config.logging.format = Some(v.clone());
    }
}
