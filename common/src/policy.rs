//! # Aliveness Policy
//!
//! Combines the outcome of the enabled probe kinds into one verdict.
//!
//! * DNS succeeds when at least one address was resolved.
//! * HTTP succeeds according to [`HttpThreshold`]: by default any response
//!   (status `>= 100`, error classes included) proves the host exists and
//!   answers. [`HttpThreshold::SuccessOnly`] narrows this to 2xx.
//! * With both kinds enabled, [`Requirement`] decides whether one success is
//!   enough or every enabled kind must succeed.
//!
//! Evidence for a kind that is not enabled is ignored. A missing result for
//! an enabled kind counts as a failure of that kind.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use crate::probe::ProbeKind;

/// Which probe kinds a batch dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeSelection {
    #[default]
    Dns,
    Http,
    Both,
}

impl ProbeSelection {
    pub fn kinds(&self) -> &'static [ProbeKind] {
        match self {
            ProbeSelection::Dns => &[ProbeKind::Dns],
            ProbeSelection::Http => &[ProbeKind::Http],
            ProbeSelection::Both => &[ProbeKind::Dns, ProbeKind::Http],
        }
    }
}

impl FromStr for ProbeSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dns" => Ok(ProbeSelection::Dns),
            "http" => Ok(ProbeSelection::Http),
            "both" | "dns+http" => Ok(ProbeSelection::Both),
            _ => Err(format!("invalid probe selection '{s}' (expected dns, http or both)")),
        }
    }
}

impl fmt::Display for ProbeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeSelection::Dns => f.write_str("dns"),
            ProbeSelection::Http => f.write_str("http"),
            ProbeSelection::Both => f.write_str("both"),
        }
    }
}

/// How outcomes of several enabled kinds are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Requirement {
    /// Alive if at least one enabled kind succeeded.
    #[default]
    Any,
    /// Alive only if every enabled kind succeeded.
    All,
}

impl FromStr for Requirement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "any" | "either" => Ok(Requirement::Any),
            "all" | "both" => Ok(Requirement::All),
            _ => Err(format!("invalid requirement '{s}' (expected any or all)")),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Any => f.write_str("any"),
            Requirement::All => f.write_str("all"),
        }
    }
}

/// Status codes that count as a successful HTTP probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpThreshold {
    /// Any response, `>= 100`.
    #[default]
    AnyResponse,
    /// Only 2xx responses.
    SuccessOnly,
}

impl HttpThreshold {
    pub fn accepts(&self, status_code: u16) -> bool {
        match self {
            HttpThreshold::AnyResponse => status_code >= 100,
            HttpThreshold::SuccessOnly => (200..300).contains(&status_code),
        }
    }
}

impl FromStr for HttpThreshold {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "any" | "any-response" => Ok(HttpThreshold::AnyResponse),
            "success" | "2xx" => Ok(HttpThreshold::SuccessOnly),
            _ => Err(format!("invalid http threshold '{s}' (expected any or success)")),
        }
    }
}

impl fmt::Display for HttpThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpThreshold::AnyResponse => f.write_str("any response"),
            HttpThreshold::SuccessOnly => f.write_str("2xx only"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlivenessPolicy {
    pub probes: ProbeSelection,
    pub requirement: Requirement,
    pub http_threshold: HttpThreshold,
}

impl AlivenessPolicy {
    /// Keeps domains with at least one resolved address.
    pub fn dns_only() -> Self {
        Self {
            probes: ProbeSelection::Dns,
            ..Self::default()
        }
    }

    /// Keeps domains whose HTTP probe obtained a response accepted by `http_threshold`.
    pub fn http_only(http_threshold: HttpThreshold) -> Self {
        Self {
            probes: ProbeSelection::Http,
            http_threshold,
            ..Self::default()
        }
    }

    pub fn combined(requirement: Requirement, http_threshold: HttpThreshold) -> Self {
        Self {
            probes: ProbeSelection::Both,
            requirement,
            http_threshold,
        }
    }

    pub fn enabled_kinds(&self) -> &'static [ProbeKind] {
        self.probes.kinds()
    }

    pub fn is_enabled(&self, kind: ProbeKind) -> bool {
        self.enabled_kinds().contains(&kind)
    }

    pub fn dns_succeeded(&self, resolved_addresses: &[IpAddr]) -> bool {
        !resolved_addresses.is_empty()
    }

    pub fn http_succeeded(&self, status_code: u16) -> bool {
        self.http_threshold.accepts(status_code)
    }

    /// Combines per-kind outcomes. `None` means no result was seen for that kind.
    pub fn judge(&self, dns_ok: Option<bool>, http_ok: Option<bool>) -> bool {
        let mut outcomes = self.enabled_kinds().iter().map(|kind| match kind {
            ProbeKind::Dns => dns_ok.unwrap_or(false),
            ProbeKind::Http => http_ok.unwrap_or(false),
        });

        match self.requirement {
            Requirement::Any => outcomes.any(|ok| ok),
            Requirement::All => outcomes.all(|ok| ok),
        }
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
