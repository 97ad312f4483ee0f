use std::fmt;
use std::net::IpAddr;

use serde::Serialize;

use crate::domain::Domain;

/// Status code recorded when an HTTP probe obtained no response at all.
pub const NO_RESPONSE: u16 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    Dns,
    Http,
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeKind::Dns => f.write_str("dns"),
            ProbeKind::Http => f.write_str("http"),
        }
    }
}

/// Outcome of one probe against one domain.
///
/// Failures are values, not errors: a DNS failure is an empty address list
/// and an HTTP failure is a status code of [`NO_RESPONSE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProbeResult {
    Dns {
        domain: Domain,
        resolved_addresses: Vec<IpAddr>,
    },
    Http {
        domain: Domain,
        status_code: u16,
    },
}

impl ProbeResult {
    pub fn dns(domain: Domain, resolved_addresses: Vec<IpAddr>) -> Self {
        ProbeResult::Dns {
            domain,
            resolved_addresses,
        }
    }

    pub fn http(domain: Domain, status_code: u16) -> Self {
        ProbeResult::Http {
            domain,
            status_code,
        }
    }

    /// The result a probe of `kind` reports when it could not obtain anything.
    pub fn failed(kind: ProbeKind, domain: Domain) -> Self {
        match kind {
            ProbeKind::Dns => ProbeResult::dns(domain, Vec::new()),
            ProbeKind::Http => ProbeResult::http(domain, NO_RESPONSE),
        }
    }

    pub fn domain(&self) -> &Domain {
        match self {
            ProbeResult::Dns { domain, .. } | ProbeResult::Http { domain, .. } => domain,
        }
    }

    pub fn kind(&self) -> ProbeKind {
        match self {
            ProbeResult::Dns { .. } => ProbeKind::Dns,
            ProbeResult::Http { .. } => ProbeKind::Http,
        }
    }

    /// True when the probe produced no evidence at all, independent of any policy.
    pub fn is_failure(&self) -> bool {
        match self {
            ProbeResult::Dns {
                resolved_addresses, ..
            } => resolved_addresses.is_empty(),
            ProbeResult::Http { status_code, .. } => *status_code == NO_RESPONSE,
        }
    }
}

/// Final alive / not-alive decision for one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LivenessVerdict {
    pub domain: Domain,
    pub is_alive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain(s: &str) -> Domain {
        Domain::parse(s).unwrap()
    }

    #[test]
    fn failed_results_carry_no_evidence() {
        let dns = ProbeResult::failed(ProbeKind::Dns, domain("gone.example.com"));
        let http = ProbeResult::failed(ProbeKind::Http, domain("gone.example.com"));
        assert!(dns.is_failure());
        assert!(http.is_failure());
        assert_eq!(dns.kind(), ProbeKind::Dns);
        assert_eq!(http.kind(), ProbeKind::Http);
    }

    #[test]
    fn error_class_http_response_is_not_a_failure() {
        let result = ProbeResult::http(domain("ads.example.com"), 503);
        assert!(!result.is_failure());
        assert_eq!(result.domain().as_str(), "ads.example.com");
    }
}
