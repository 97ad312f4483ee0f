use std::collections::{HashMap, HashSet};
use std::future;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use async_trait::async_trait;

use hostsieve_common::{Domain, ProbeSettings};
use hostsieve_core::prober::{DnsLookup, HttpStatusProbe, LivenessProber};

pub const ADDR: IpAddr = IpAddr::V4(Ipv4Addr::new(198, 51, 100, 10));

/// Resolves a fixed set of names; everything else is NXDOMAIN.
pub struct ZoneDns {
    pub names: HashSet<String>,
}

#[async_trait]
impl DnsLookup for ZoneDns {
    async fn lookup(&self, domain: &Domain) -> anyhow::Result<Vec<IpAddr>> {
        if self.names.contains(domain.as_str()) {
            Ok(vec![ADDR])
        } else {
            anyhow::bail!("NXDOMAIN {domain}")
        }
    }
}

/// Fixed status per host. Hosts listed in `hang` never answer.
pub struct StaticHttp {
    pub statuses: HashMap<String, u16>,
    pub hang: HashSet<String>,
}

#[async_trait]
impl HttpStatusProbe for StaticHttp {
    async fn status(&self, url: &str) -> anyhow::Result<u16> {
        let host: &str = url
            .trim_start_matches("http://")
            .trim_end_matches('/');
        if self.hang.contains(host) {
            return future::pending().await;
        }
        match self.statuses.get(host) {
            Some(status) => Ok(*status),
            None => anyhow::bail!("connection refused"),
        }
    }
}

pub fn strings(names: &[&str]) -> HashSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

pub fn prober(dns: ZoneDns, http: StaticHttp, settings: ProbeSettings) -> LivenessProber {
    LivenessProber::new(Arc::new(dns), Arc::new(http), settings)
}
