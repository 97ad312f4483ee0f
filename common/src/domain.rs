//! # Domain Model
//!
//! A [`Domain`] is the canonical hostname the whole pipeline works with:
//! lowercase, trimmed, without scheme, port or path, never an IP literal
//! and never a loopback alias.
//!
//! The only way to build one is [`Domain::parse`], which also decides what
//! "looks like a domain" for hosts-file tokens:
//! * every label is 1-63 characters of `[a-z0-9_-]` and does not start or
//!   end with a hyphen,
//! * there are at least two labels and the last one is not numeric,
//! * the name is not itself an ICANN public suffix (`co.uk`). Suffixes from
//!   the private section of the list (`github.io`, `cloudfront.net`) are
//!   real hosts and qualify, and TLDs unknown to the list count as TLD-like.

use std::collections::BTreeSet;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SieveError;

const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Names that hosts files map to loopback for the local machine itself.
const LOCAL_ALIASES: &[&str] = &[
    "localhost",
    "localhost.localdomain",
    "localdomain",
    "local",
    "broadcasthost",
    "ip6-localhost",
    "ip6-loopback",
    "ip6-localnet",
    "ip6-mcastprefix",
    "ip6-allnodes",
    "ip6-allrouters",
    "ip6-allhosts",
];

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Domain(String);

impl Domain {
    /// Validates `candidate` and returns its canonical form.
    ///
    /// A single trailing root dot is accepted and removed. Returns `None`
    /// for anything that is not a plausible public hostname.
    pub fn parse(candidate: &str) -> Option<Self> {
        let trimmed: &str = candidate.trim();
        let trimmed: &str = trimmed.strip_suffix('.').unwrap_or(trimmed);
        let host: String = trimmed.to_ascii_lowercase();

        if is_ip_literal(&host)
            || is_local_alias(&host)
            || !is_hostname(&host)
            || is_bare_public_suffix(&host)
        {
            return None;
        }

        Some(Self(host))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Domain {
    type Err = SieveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::parse(s).ok_or_else(|| SieveError::invalid_argument(format!("not a domain: {s}")))
    }
}

impl TryFrom<String> for Domain {
    type Error = SieveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Domain> for String {
    fn from(domain: Domain) -> Self {
        domain.0
    }
}

/// True for IPv4 and IPv6 literals, including bracketed IPv6 (`[::1]`).
pub fn is_ip_literal(token: &str) -> bool {
    let unbracketed: &str = token
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .unwrap_or(token);
    unbracketed.parse::<IpAddr>().is_ok()
}

pub fn is_local_alias(host: &str) -> bool {
    LOCAL_ALIASES.contains(&host) || host.ends_with(".localhost")
}

fn is_bare_public_suffix(host: &str) -> bool {
    psl::suffix(host.as_bytes()).is_some_and(|suffix| {
        matches!(suffix.typ(), Some(psl::Type::Icann)) && suffix.as_bytes() == host.as_bytes()
    })
}

fn is_hostname(host: &str) -> bool {
    if host.is_empty() || host.len() > MAX_DOMAIN_LEN {
        return false;
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 || !labels.iter().all(|label| is_label(label)) {
        return false;
    }

    labels
        .last()
        .is_some_and(|tld| !tld.bytes().all(|b| b.is_ascii_digit()))
}

fn is_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
}

/// Deduplicated collection of domains.
///
/// Iteration order is an implementation detail; consumers must not rely on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DomainSet(BTreeSet<Domain>);

impl DomainSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, domain: &Domain) -> bool {
        self.0.contains(domain)
    }

    /// Returns `true` when `domain` was not yet present.
    pub fn insert(&mut self, domain: Domain) -> bool {
        self.0.insert(domain)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Domain> {
        self.0.iter()
    }

    pub fn to_vec(&self) -> Vec<Domain> {
        self.0.iter().cloned().collect()
    }
}

impl FromIterator<Domain> for DomainSet {
    fn from_iter<I: IntoIterator<Item = Domain>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Domain> for DomainSet {
    fn extend<I: IntoIterator<Item = Domain>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for DomainSet {
    type Item = Domain;
    type IntoIter = std::collections::btree_set::IntoIter<Domain>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a DomainSet {
    type Item = &'a Domain;
    type IntoIter = std::collections::btree_set::Iter<'a, Domain>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
