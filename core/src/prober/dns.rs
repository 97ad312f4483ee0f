use std::net::IpAddr;

use async_trait::async_trait;
use trust_dns_resolver::{
    TokioAsyncResolver,
    config::{ResolverConfig, ResolverOpts},
};
use tracing::warn;

use hostsieve_common::Domain;

/// Address resolution used by DNS liveness probes.
///
/// An `Err` or an empty list both mean "no evidence of life"; the prober
/// turns either into an empty address list.
#[async_trait]
pub trait DnsLookup: Send + Sync {
    async fn lookup(&self, domain: &Domain) -> anyhow::Result<Vec<IpAddr>>;
}

/// Resolver backed by the host's resolver configuration.
pub struct SystemResolver {
    resolver: TokioAsyncResolver,
}

impl SystemResolver {
    /// Uses `/etc/resolv.conf` (or the platform equivalent) and falls back to
    /// public resolvers when the system configuration cannot be read.
    pub fn new() -> Self {
        let resolver: TokioAsyncResolver = match TokioAsyncResolver::tokio_from_system_conf() {
            Ok(resolver) => resolver,
            Err(e) => {
                warn!("System resolver configuration unavailable ({e}), using defaults");
                TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
            }
        };
        Self { resolver }
    }
}

impl Default for SystemResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DnsLookup for SystemResolver {
    async fn lookup(&self, domain: &Domain) -> anyhow::Result<Vec<IpAddr>> {
        // Fully qualified, so resolv.conf search domains are never appended.
        let fqdn: String = format!("{domain}.");
        let response = self.resolver.lookup_ip(fqdn).await?;
        Ok(response.iter().collect())
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
