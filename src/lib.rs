//! # netx
//!
//! Network dialing with classified, redacted errors.
//!
//! Every failure observed while connecting, reading, writing or closing is
//! reshaped into a stable failure identifier tagged with the operation that
//! produced it, with local endpoints scrubbed from its message.
//!
//! ## Crates
//!
//! - [`netx_core`] - Default values and stable identifier strings
//! - [`netx_errorx`] - Classifier, rule table and redaction
//! - [`netx_dialer`] - Dialer and connection traits, TCP dialer, decorators
//! - [`netx_config`] - Configuration loading and validation

pub mod cli;

pub use netx_config as config;
pub use netx_core as core;
pub use netx_dialer as dialer;
pub use netx_errorx as errorx;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use netx_config::{Config, load_config, validate_config};
    pub use netx_dialer::{
        Connection, Dialer, ErrorWrapperConn, ErrorWrapperDialer, LoggingDialer, TcpDialer,
    };
    pub use netx_errorx::{ClassifiedError, Classifier, Classify, ClassifyExt, Failure, Operation};
    pub use tokio_util::sync::CancellationToken;
}
