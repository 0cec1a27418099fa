//! Default value functions for serde deserialization.
//!
//! These functions forward to constants defined in `netx_core::defaults`.

use netx_core::defaults;

/// Generate default value functions that forward to netx_core::defaults constants.
macro_rules! default_fns {
    // For Copy types (integers, bool, etc.)
    ($($fn_name:ident => $const_name:ident : $ty:ty),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> $ty {
                defaults::$const_name
            }
        )*
    };
}

/// Generate default value functions that return String from &str constants.
macro_rules! default_string_fns {
    ($($fn_name:ident => $const_name:ident),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> String {
                defaults::$const_name.to_string()
            }
        )*
    };
}

default_fns! {
    // Dialer
    default_connect_timeout_secs => DEFAULT_CONNECT_TIMEOUT_SECS: u64,
    default_tcp_no_delay         => DEFAULT_TCP_NO_DELAY: bool,
    default_tcp_keepalive_secs   => DEFAULT_TCP_KEEPALIVE_SECS: u64,
    // Classifier
    default_max_message_bytes    => DEFAULT_MAX_MESSAGE_BYTES: usize,
    min_message_bytes            => MIN_MESSAGE_BYTES: usize,
    max_message_bytes            => MAX_MESSAGE_BYTES: usize,
}

default_string_fns! {
    default_placeholder => DEFAULT_REDACTION_PLACEHOLDER,
}
