//! # Result Filter
//!
//! Reduces probe results to the domains an [`AlivenessPolicy`] judges alive.
//! Pure and deterministic: no I/O, and the output only depends on the set
//! of results and the policy, never on their arrival order.

use std::collections::BTreeMap;

use hostsieve_common::{AlivenessPolicy, Domain, DomainSet, LivenessVerdict, ProbeResult};

/// Per-domain outcome of each probe kind. `None` means no result was seen.
#[derive(Debug, Default, Clone, Copy)]
struct Evidence {
    dns_ok: Option<bool>,
    http_ok: Option<bool>,
}

fn merge(slot: &mut Option<bool>, ok: bool) {
    *slot = Some(slot.unwrap_or(false) || ok);
}

fn collect_evidence<'a>(
    results: &'a [ProbeResult],
    policy: &AlivenessPolicy,
) -> BTreeMap<&'a Domain, Evidence> {
    let mut evidence: BTreeMap<&Domain, Evidence> = BTreeMap::new();

    for result in results {
        let entry: &mut Evidence = evidence.entry(result.domain()).or_default();
        match result {
            ProbeResult::Dns {
                resolved_addresses, ..
            } => merge(&mut entry.dns_ok, policy.dns_succeeded(resolved_addresses)),
            ProbeResult::Http { status_code, .. } => {
                merge(&mut entry.http_ok, policy.http_succeeded(*status_code))
            }
        }
    }

    evidence
}

/// One verdict per domain that appears in `results`, sorted by domain.
pub fn verdicts(results: &[ProbeResult], policy: &AlivenessPolicy) -> Vec<LivenessVerdict> {
    collect_evidence(results, policy)
        .into_iter()
        .map(|(domain, evidence)| LivenessVerdict {
            domain: domain.clone(),
            is_alive: policy.judge(evidence.dns_ok, evidence.http_ok),
        })
        .collect()
}

/// Domains judged alive under `policy`.
pub fn filter_alive(results: &[ProbeResult], policy: &AlivenessPolicy) -> DomainSet {
    verdicts(results, policy)
        .into_iter()
        .filter(|verdict| verdict.is_alive)
        .map(|verdict| verdict.domain)
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use hostsieve_common::{HttpThreshold, Requirement};
    use std::net::{IpAddr, Ipv4Addr};

    const ADDR: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7));

    fn d(name: &str) -> Domain {
        Domain::parse(name).unwrap()
    }

    fn names(set: &DomainSet) -> Vec<&str> {
        set.iter().map(Domain::as_str).collect()
    }

    fn sample() -> Vec<ProbeResult> {
        vec![
            ProbeResult::dns(d("resolves.example.com"), vec![ADDR]),
            ProbeResult::dns(d("nxdomain.example.com"), vec![]),
            ProbeResult::http(d("resolves.example.com"), 0),
            ProbeResult::http(d("nxdomain.example.com"), 0),
            ProbeResult::dns(d("answers.example.org"), vec![]),
            ProbeResult::http(d("answers.example.org"), 503),
            ProbeResult::dns(d("healthy.example.net"), vec![ADDR]),
            ProbeResult::http(d("healthy.example.net"), 200),
        ]
    }

    #[test]
    fn dns_filter_drops_domains_without_addresses() {
        let alive = filter_alive(&sample(), &AlivenessPolicy::dns_only());
        assert_eq!(names(&alive), ["healthy.example.net", "resolves.example.com"]);
    }

    #[test]
    fn http_filter_drops_domains_without_response() {
        let alive = filter_alive(&sample(), &AlivenessPolicy::http_only(HttpThreshold::AnyResponse));
        assert_eq!(names(&alive), ["answers.example.org", "healthy.example.net"]);

        let strict = filter_alive(&sample(), &AlivenessPolicy::http_only(HttpThreshold::SuccessOnly));
        assert_eq!(names(&strict), ["healthy.example.net"]);
    }

    #[test]
    fn combined_requirements() {
        let any = AlivenessPolicy::combined(Requirement::Any, HttpThreshold::AnyResponse);
        assert_eq!(
            names(&filter_alive(&sample(), &any)),
            ["answers.example.org", "healthy.example.net", "resolves.example.com"]
        );

        let all = AlivenessPolicy::combined(Requirement::All, HttpThreshold::AnyResponse);
        assert_eq!(names(&filter_alive(&sample(), &all)), ["healthy.example.net"]);
    }

    #[test]
    fn missing_kind_fails_an_all_policy() {
        let results = vec![ProbeResult::dns(d("dns-only.example.com"), vec![ADDR])];
        let all = AlivenessPolicy::combined(Requirement::All, HttpThreshold::AnyResponse);
        assert!(filter_alive(&results, &all).is_empty());
    }

    #[test]
    fn verdicts_cover_every_domain_and_ignore_order() {
        let mut reversed = sample();
        reversed.reverse();
        let policy = AlivenessPolicy::dns_only();

        let forward = verdicts(&sample(), &policy);
        assert_eq!(forward.len(), 4);
        assert_eq!(forward, verdicts(&reversed, &policy));
        assert!(
            forward
                .iter()
                .any(|v| v.domain.as_str() == "nxdomain.example.com" && !v.is_alive)
        );
    }

    #[test]
    fn empty_results_give_empty_set() {
        assert!(filter_alive(&[], &AlivenessPolicy::default()).is_empty());
    }
}
