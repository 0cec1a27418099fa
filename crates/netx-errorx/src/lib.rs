//! Error classification for network measurements.
//!
//! Raw transport errors differ between platforms and stacks, and their text
//! may carry local endpoints or credentials. This crate reshapes any such
//! error into a [`ClassifiedError`]: the [`Operation`] that produced it, a
//! stable [`Failure`] identifier, and a bounded, redacted message.
//!
//! # Usage
//!
//! ```rust
//! use std::io;
//! use netx_errorx::{Classifier, ClassifyExt, ClassifiedError, Failure, Operation};
//!
//! let classifier = Classifier::default();
//! let raw: io::Result<()> = Err(io::Error::new(
//!     io::ErrorKind::ConnectionRefused,
//!     "connect to 192.0.2.1:443 refused",
//! ));
//!
//! let err = classifier.classify_io(raw, Operation::Connect).unwrap_err();
//! let classified = ClassifiedError::from_io_error(&err).unwrap();
//! assert_eq!(classified.failure(), Failure::ConnectionRefused);
//! assert!(!classified.message().contains("192.0.2.1"));
//! ```

pub mod classified;
pub mod classifier;
pub mod error;
pub mod failure;
pub mod operation;
pub mod redact;
pub mod rules;

pub use classified::ClassifiedError;
pub use classifier::{Classifier, Classify, ClassifyExt};
pub use netx_config::ClassifierConfig;
pub use error::ErrorxError;
pub use failure::Failure;
pub use operation::Operation;
pub use redact::Redactor;
pub use rules::{Matcher, Rule, RuleSet};
