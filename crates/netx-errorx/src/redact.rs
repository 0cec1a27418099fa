//! Removal of caller-identifying substrings from error text.
//!
//! Built-in patterns cover network endpoints (IPv4 and IPv6, with or
//! without a port) and URL user-info credentials. Endpoint candidates are
//! confirmed with `std::net` parsers before they are replaced, so text that
//! merely looks like an address (`std::io`, `12:30:45`) is kept.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

use netx_core::defaults::DEFAULT_REDACTION_PLACEHOLDER;
use regex::{Captures, NoExpand, Regex, RegexBuilder};

use crate::error::ErrorxError;

/// Compiled-size cap for user-supplied patterns.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

static BRACKETED_V6: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([0-9A-Fa-f:.]+)(?:%[0-9A-Za-z._-]+)?\](?::\d{1,5})?")
        .expect("bracketed ipv6 pattern is valid")
});

static BARE_V6: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:[0-9A-Fa-f]{0,4}:){2,7}(?:\d{1,3}(?:\.\d{1,3}){3}|[0-9A-Fa-f]{0,4})(?:%[0-9A-Za-z._-]+)?",
    )
    .expect("bare ipv6 pattern is valid")
});

static IPV4_ENDPOINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,3}(?:\.\d{1,3}){3})(?::\d{1,5}\b)?").expect("ipv4 pattern is valid")
});

static URL_USERINFO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([a-z][a-z0-9+.-]*://)[^\s/@]+@").expect("userinfo pattern is valid")
});

/// Replaces sensitive substrings with a fixed placeholder.
#[derive(Debug, Clone)]
pub struct Redactor {
    placeholder: String,
    extra: Vec<Regex>,
}

impl Redactor {
    /// Redactor with the built-in patterns only.
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            extra: Vec::new(),
        }
    }

    /// Add user patterns, applied after the built-in ones in the given order.
    pub fn with_patterns<I, S>(mut self, patterns: I) -> Result<Self, ErrorxError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let re = RegexBuilder::new(pattern)
                .size_limit(PATTERN_SIZE_LIMIT)
                .build()
                .map_err(|source| ErrorxError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })?;
            self.extra.push(re);
        }
        Ok(self)
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Return `text` with every sensitive substring replaced.
    pub fn redact(&self, text: &str) -> String {
        let placeholder = self.placeholder.as_str();

        let out = replace_confirmed(&BRACKETED_V6, text, placeholder, |caps| {
            let inner = caps.get(1)?;
            inner
                .as_str()
                .parse::<Ipv6Addr>()
                .is_ok()
                .then(|| caps[0].len())
        });
        let out = URL_USERINFO
            .replace_all(&out, |caps: &Captures<'_>| {
                format!("{}{}@", &caps[1], placeholder)
            })
            .into_owned();
        let out = replace_confirmed(&BARE_V6, &out, placeholder, |caps| {
            confirm_bare_v6(&caps[0])
        });
        let mut out = replace_confirmed(&IPV4_ENDPOINT, &out, placeholder, |caps| {
            let host = caps.get(1)?;
            host.as_str()
                .parse::<Ipv4Addr>()
                .is_ok()
                .then(|| caps[0].len())
        });

        for re in &self.extra {
            out = re.replace_all(&out, NoExpand(placeholder)).into_owned();
        }
        out
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(DEFAULT_REDACTION_PLACEHOLDER)
    }
}

/// Replace matches of `re` that `confirm` accepts and that are not glued
/// to a neighbouring letter or digit.
///
/// `confirm` returns how many bytes from the start of the match to replace,
/// which lets a candidate shed trailing punctuation the pattern swallowed.
/// A rejected candidate is retried one character later, since the real
/// address may start inside it (`addr:2001:db8::5` first matches as
/// `:2001:db8::5`).
fn replace_confirmed(
    re: &Regex,
    text: &str,
    placeholder: &str,
    confirm: impl Fn(&Captures<'_>) -> Option<usize>,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut pos = 0;
    while pos < text.len() {
        let Some(caps) = re.captures_at(text, pos) else { break };
        let Some(m) = caps.get(0) else { break };
        let accepted = confirm(&caps)
            .filter(|&len| len > 0)
            .map(|len| m.start() + len)
            .filter(|&end| {
                let before = text[..m.start()].chars().next_back();
                let after = text[end..].chars().next();
                !before.is_some_and(is_glue) && !after.is_some_and(is_glue)
            });
        match accepted {
            Some(end) => {
                out.push_str(&text[last..m.start()]);
                out.push_str(placeholder);
                last = end;
                pos = end;
            }
            None => {
                pos = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }
    out.push_str(&text[last..]);
    out
}

/// A bare IPv6 candidate may have swallowed a trailing `:` separator
/// (`2001:db8::1: reset`); retry without it.
fn confirm_bare_v6(candidate: &str) -> Option<usize> {
    let parses = |s: &str| {
        let addr = s.split('%').next().unwrap_or_default();
        addr.bytes().any(|b| b.is_ascii_hexdigit()) && addr.parse::<Ipv6Addr>().is_ok()
    };
    if parses(candidate) {
        return Some(candidate.len());
    }
    let trimmed = candidate.strip_suffix(':')?;
    parses(trimmed).then_some(trimmed.len())
}

fn is_glue(c: char) -> bool {
    c.is_ascii_alphanumeric()
}
