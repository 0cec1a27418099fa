//! The classification contract and its default implementation.

use std::error::Error as StdError;
use std::fmt::{self, Write as _};
use std::io;

use netx_config::ClassifierConfig;
use netx_core::defaults::{DEFAULT_MAX_MESSAGE_BYTES, MAX_MESSAGE_BYTES, MIN_MESSAGE_BYTES};

use crate::error::ErrorxError;
use crate::redact::Redactor;
use crate::rules::{MatchContext, RuleSet};
use crate::{ClassifiedError, Operation};

/// How far down an error's `source()` chain the classifier looks.
const MAX_CHAIN_DEPTH: usize = 16;

/// Maps a raw error plus the operation that produced it to a
/// [`ClassifiedError`].
///
/// Implementations must be total: every input yields a classified error
/// tagged with `operation`, and nothing may panic. Absent errors are handled
/// by [`ClassifyExt`], never by implementations.
pub trait Classify: Send + Sync {
    fn classify(&self, err: &(dyn StdError + 'static), operation: Operation) -> ClassifiedError;
}

impl<K: Classify + ?Sized> Classify for std::sync::Arc<K> {
    fn classify(&self, err: &(dyn StdError + 'static), operation: Operation) -> ClassifiedError {
        (**self).classify(err, operation)
    }
}

impl<K: Classify + ?Sized> Classify for &K {
    fn classify(&self, err: &(dyn StdError + 'static), operation: Operation) -> ClassifiedError {
        (**self).classify(err, operation)
    }
}

/// Passthrough helpers available on every [`Classify`] implementation.
pub trait ClassifyExt: Classify {
    /// Classify `err` if there is one. Success never becomes an error.
    fn maybe_classify(
        &self,
        err: Option<&(dyn StdError + 'static)>,
        operation: Operation,
    ) -> Option<ClassifiedError> {
        err.map(|err| self.classify(err, operation))
    }

    /// Leave `Ok` untouched; replace an `Err` with an `io::Error` carrying
    /// the classified error.
    fn classify_io<T>(&self, result: io::Result<T>, operation: Operation) -> io::Result<T> {
        result.map_err(|err| self.classify(&err, operation).into())
    }
}

impl<K: Classify + ?Sized> ClassifyExt for K {}

/// Rule-table classifier with redaction.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: RuleSet,
    redactor: Redactor,
    max_message_bytes: usize,
}

impl Classifier {
    pub fn new(rules: RuleSet, redactor: Redactor) -> Self {
        Self {
            rules,
            redactor,
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
        }
    }

    /// Bound on the raw error text examined and retained, clamped to
    /// `MIN_MESSAGE_BYTES..=MAX_MESSAGE_BYTES`.
    pub fn with_max_message_bytes(mut self, max: usize) -> Self {
        self.max_message_bytes = max.clamp(MIN_MESSAGE_BYTES, MAX_MESSAGE_BYTES);
        self
    }

    /// Built-in rules plus the configured redaction settings.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ErrorxError> {
        if !(MIN_MESSAGE_BYTES..=MAX_MESSAGE_BYTES).contains(&config.max_message_bytes) {
            return Err(ErrorxError::InvalidConfig(format!(
                "max_message_bytes must be {MIN_MESSAGE_BYTES}..={MAX_MESSAGE_BYTES}"
            )));
        }
        let redactor =
            Redactor::new(config.placeholder.clone()).with_patterns(&config.extra_redactions)?;
        Ok(Self::new(RuleSet::builtin(), redactor).with_max_message_bytes(config.max_message_bytes))
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn redactor(&self) -> &Redactor {
        &self.redactor
    }

    pub fn max_message_bytes(&self) -> usize {
        self.max_message_bytes
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(RuleSet::builtin(), Redactor::default())
    }
}

impl Classify for Classifier {
    fn classify(&self, err: &(dyn StdError + 'static), operation: Operation) -> ClassifiedError {
        if let Some(done) = find_classified(err) {
            return done.clone().with_operation(operation);
        }

        let mut text = BoundedText::new(self.max_message_bytes);
        let mut kinds = Vec::new();
        let mut current = Some(err);
        for depth in 0..MAX_CHAIN_DEPTH {
            let Some(e) = current else { break };
            if let Some(io_err) = e.downcast_ref::<io::Error>() {
                kinds.push(io_err.kind());
            }
            if depth > 0 {
                let _ = text.write_str(": ");
            }
            let _ = write!(text, "{e}");
            current = e.source();
        }

        let text = text.finish();
        let lowered = text.to_ascii_lowercase();
        let failure = self.rules.classify(&MatchContext {
            kinds: &kinds,
            lowered_text: &lowered,
        });
        ClassifiedError::new(operation, failure, self.redactor.redact(&text))
    }
}

/// Finds an already-classified error at the head of, or inside, the chain.
fn find_classified<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a ClassifiedError> {
    let mut current = Some(err);
    for _ in 0..MAX_CHAIN_DEPTH {
        let e = current?;
        if let Some(done) = e.downcast_ref::<ClassifiedError>() {
            return Some(done);
        }
        // `io::Error::source` skips the payload of a custom error.
        if let Some(io_err) = e.downcast_ref::<io::Error>()
            && let Some(done) = ClassifiedError::from_io_error(io_err)
        {
            return Some(done);
        }
        current = e.source();
    }
    None
}

/// `fmt::Write` sink that stops accepting text at `limit` bytes, so an
/// oversized `Display` impl cannot make us allocate more than that.
struct BoundedText {
    buf: String,
    limit: usize,
    truncated: bool,
}

impl BoundedText {
    fn new(limit: usize) -> Self {
        Self {
            buf: String::new(),
            limit,
            truncated: false,
        }
    }

    /// The collected text. When truncated, the trailing partial token is
    /// dropped so half an address never reaches the redactor.
    fn finish(mut self) -> String {
        if self.truncated {
            let keep = self.buf.rfind(char::is_whitespace).unwrap_or(0);
            self.buf.truncate(keep);
        }
        self.buf
    }
}

impl fmt::Write for BoundedText {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Err(fmt::Error);
        }
        let room = self.limit - self.buf.len();
        if s.len() <= room {
            self.buf.push_str(s);
            return Ok(());
        }
        let mut cut = room;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        self.buf.push_str(&s[..cut]);
        self.truncated = true;
        Err(fmt::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Failure;

    #[derive(Debug)]
    struct Wrapped {
        msg: &'static str,
        source: io::Error,
    }

    impl fmt::Display for Wrapped {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.msg)
        }
    }

    impl StdError for Wrapped {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.source)
        }
    }

    #[test]
    fn kind_in_source_chain_is_found() {
        let err = Wrapped {
            msg: "handshake failed",
            source: io::Error::from(io::ErrorKind::ConnectionReset),
        };
        let classified = Classifier::default().classify(&err, Operation::Read);
        assert_eq!(classified.failure(), Failure::ConnectionReset);
        assert!(classified.message().starts_with("handshake failed: "));
    }

    #[test]
    fn oversized_message_is_bounded() {
        let huge = "x".repeat(100_000);
        let err = io::Error::other(format!("boom {huge}"));
        let classifier = Classifier::default().with_max_message_bytes(64);
        let classified = classifier.classify(&err, Operation::Write);
        assert!(classified.message().len() <= 64);
        assert_eq!(classified.message(), "boom");
        assert_eq!(classified.failure(), Failure::Unknown);
    }

    #[test]
    fn truncation_never_leaves_partial_address() {
        let err = io::Error::other("refused by peer at 203.0.113.200:443");
        // Limit falls in the middle of the address.
        let classifier = Classifier::default().with_max_message_bytes(26);
        let classified = classifier.classify(&err, Operation::Connect);
        assert_eq!(classified.message(), "refused by peer at");
        assert!(!classified.message().contains("203"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let err = io::Error::other("é".repeat(40));
        let classifier = Classifier::default().with_max_message_bytes(17);
        // Must not panic on a multi-byte boundary.
        let classified = classifier.classify(&err, Operation::Read);
        assert!(classified.message().len() <= 17);
    }

    #[test]
    fn max_message_bytes_is_clamped() {
        assert_eq!(
            Classifier::default().with_max_message_bytes(0).max_message_bytes(),
            MIN_MESSAGE_BYTES
        );
        assert_eq!(
            Classifier::default()
                .with_max_message_bytes(usize::MAX)
                .max_message_bytes(),
            MAX_MESSAGE_BYTES
        );
    }

    #[test]
    fn from_config_rejects_out_of_range_bound() {
        let config = ClassifierConfig {
            max_message_bytes: 1,
            ..ClassifierConfig::default()
        };
        assert!(matches!(
            Classifier::from_config(&config),
            Err(ErrorxError::InvalidConfig(_))
        ));
    }

    #[test]
    fn from_config_applies_placeholder_and_patterns() {
        let config = ClassifierConfig {
            placeholder: "<redacted>".into(),
            extra_redactions: vec!["user=[a-z]+".into()],
            ..ClassifierConfig::default()
        };
        let classifier = Classifier::from_config(&config).unwrap();
        let err = io::Error::other("user=bob at 10.1.1.1:80");
        let classified = classifier.classify(&err, Operation::Connect);
        assert_eq!(classified.message(), "<redacted> at <redacted>");
    }

    #[test]
    fn classify_io_passes_ok_through() {
        let classifier = Classifier::default();
        let ok: io::Result<usize> = Ok(12);
        assert_eq!(classifier.classify_io(ok, Operation::Read).unwrap(), 12);
    }

    #[test]
    fn maybe_classify_none_is_none() {
        assert!(
            Classifier::default()
                .maybe_classify(None, Operation::Close)
                .is_none()
        );
    }
}
