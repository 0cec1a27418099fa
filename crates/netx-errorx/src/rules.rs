//! Ordered classification rules.

use std::borrow::Cow;
use std::io;

use crate::Failure;

/// What a rule looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Any `io::Error` in the error chain has this kind.
    Kind(io::ErrorKind),
    /// The error text contains this substring (ASCII case-insensitive).
    Contains(Cow<'static, str>),
}

/// A single rule: when the matcher fires, the error gets `failure`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    matcher: Matcher,
    failure: Failure,
}

impl Rule {
    /// Match on an `io::ErrorKind` anywhere in the chain.
    pub const fn kind(kind: io::ErrorKind, failure: Failure) -> Self {
        Self {
            matcher: Matcher::Kind(kind),
            failure,
        }
    }

    /// Match on a substring of the error text.
    pub fn contains(needle: impl Into<Cow<'static, str>>, failure: Failure) -> Self {
        let needle = needle.into();
        let needle = if needle.bytes().any(|b| b.is_ascii_uppercase()) {
            Cow::Owned(needle.to_ascii_lowercase())
        } else {
            needle
        };
        Self {
            matcher: Matcher::Contains(needle),
            failure,
        }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn failure(&self) -> Failure {
        self.failure
    }

    fn matches(&self, facts: &MatchContext<'_>) -> bool {
        match &self.matcher {
            Matcher::Kind(kind) => facts.kinds.contains(kind),
            Matcher::Contains(needle) => facts.lowered_text.contains(needle.as_ref()),
        }
    }
}

/// What is known about a raw error when rules are evaluated.
#[derive(Debug)]
pub struct MatchContext<'a> {
    /// Kinds of every `io::Error` found in the chain, outermost first.
    pub kinds: &'a [io::ErrorKind],
    /// Bounded error text, ASCII-lowercased.
    pub lowered_text: &'a str,
}

/// An immutable, ordered list of rules. The first matching rule wins;
/// nothing matching means [`Failure::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Build a rule set from rules in priority order.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// A rule set that classifies everything as unknown.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The built-in table.
    ///
    /// Structured `io::ErrorKind` evidence comes first; text rules catch
    /// errors that only describe the failure in their message (resolver
    /// errors, errors wrapped by other libraries).
    pub fn builtin() -> Self {
        use Failure::*;
        use io::ErrorKind as K;

        Self::new(vec![
            Rule::kind(K::TimedOut, Timeout),
            Rule::kind(K::ConnectionRefused, ConnectionRefused),
            Rule::kind(K::ConnectionReset, ConnectionReset),
            Rule::kind(K::ConnectionAborted, ConnectionAborted),
            Rule::kind(K::HostUnreachable, HostUnreachable),
            Rule::kind(K::NetworkUnreachable, NetworkUnreachable),
            Rule::kind(K::UnexpectedEof, Eof),
            Rule::kind(K::BrokenPipe, BrokenPipe),
            Rule::kind(K::NotConnected, NotConnected),
            Rule::kind(K::AddrNotAvailable, AddressNotAvailable),
            Rule::kind(K::Interrupted, Interrupted),
            Rule::contains("connection refused", ConnectionRefused),
            Rule::contains("connection reset", ConnectionReset),
            Rule::contains("connection aborted", ConnectionAborted),
            Rule::contains("software caused connection abort", ConnectionAborted),
            Rule::contains("timed out", Timeout),
            Rule::contains("timeout", Timeout),
            Rule::contains("deadline has elapsed", Timeout),
            Rule::contains("no route to host", HostUnreachable),
            Rule::contains("host is unreachable", HostUnreachable),
            Rule::contains("network is unreachable", NetworkUnreachable),
            Rule::contains("name or service not known", DnsNxdomain),
            Rule::contains("no such host", DnsNxdomain),
            Rule::contains("nodename nor servname provided", DnsNxdomain),
            Rule::contains("no address associated with hostname", DnsNxdomain),
            Rule::contains("nxdomain", DnsNxdomain),
            Rule::contains("unexpected eof", Eof),
            Rule::contains("end of file", Eof),
            Rule::contains("broken pipe", BrokenPipe),
            Rule::contains("not connected", NotConnected),
            Rule::contains("cannot assign requested address", AddressNotAvailable),
            Rule::contains("operation canceled", Interrupted),
            Rule::contains("operation cancelled", Interrupted),
        ])
    }

    /// First matching failure, or [`Failure::Unknown`].
    pub fn classify(&self, ctx: &MatchContext<'_>) -> Failure {
        self.rules
            .iter()
            .find(|rule| rule.matches(ctx))
            .map(Rule::failure)
            .unwrap_or(Failure::Unknown)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(rules: &RuleSet, kinds: &[io::ErrorKind], text: &str) -> Failure {
        let lowered = text.to_ascii_lowercase();
        rules.classify(&MatchContext {
            kinds,
            lowered_text: &lowered,
        })
    }

    #[test]
    fn kind_evidence_wins_over_text() {
        let rules = RuleSet::builtin();
        let got = classify(
            &rules,
            &[io::ErrorKind::ConnectionRefused],
            "connection reset by peer",
        );
        assert_eq!(got, Failure::ConnectionRefused);
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = RuleSet::new(vec![
            Rule::contains("boom", Failure::Eof),
            Rule::contains("boom", Failure::BrokenPipe),
        ]);
        assert_eq!(classify(&rules, &[], "big boom"), Failure::Eof);
    }

    #[test]
    fn text_rules_are_case_insensitive() {
        let rules = RuleSet::new(vec![Rule::contains("No Such Host", Failure::DnsNxdomain)]);
        assert_eq!(
            classify(&rules, &[], "lookup example.invalid: NO SUCH HOST"),
            Failure::DnsNxdomain
        );
    }

    #[test]
    fn unmatched_is_unknown() {
        let rules = RuleSet::builtin();
        assert_eq!(
            classify(&rules, &[io::ErrorKind::Other], "something odd"),
            Failure::Unknown
        );
        assert_eq!(classify(&RuleSet::empty(), &[], "timeout"), Failure::Unknown);
    }

    #[test]
    fn resolver_messages_map_to_nxdomain() {
        let rules = RuleSet::builtin();
        assert_eq!(
            classify(
                &rules,
                &[io::ErrorKind::Other],
                "failed to lookup address information: Name or service not known"
            ),
            Failure::DnsNxdomain
        );
    }

    #[test]
    fn tokio_elapsed_is_timeout() {
        let rules = RuleSet::builtin();
        assert_eq!(classify(&rules, &[], "deadline has elapsed"), Failure::Timeout);
    }
}
