//! Renders a final domain set into a blocklist format.
//!
//! The exporter never reorders: domains are written in the order given,
//! which for a [`DomainSet`](hostsieve_common::DomainSet) is sorted order.

use std::fmt;
use std::fmt::Write as _;
use std::net::IpAddr;
use std::str::FromStr;

use serde::Serialize;

use hostsieve_common::config::DEFAULT_BLOCK_IP;
use hostsieve_common::{Domain, Result, SieveError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// `/etc/hosts` syntax.
    #[default]
    Hosts,
    /// Unbound `local-zone` / `local-data` configuration.
    Unbound,
    Json,
    Yaml,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &str = match self {
            ExportFormat::Hosts => "hosts",
            ExportFormat::Unbound => "unbound",
            ExportFormat::Json => "json",
            ExportFormat::Yaml => "yaml",
        };
        f.write_str(s)
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hosts" => Ok(ExportFormat::Hosts),
            "unbound" => Ok(ExportFormat::Unbound),
            "json" => Ok(ExportFormat::Json),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            other => Err(format!(
                "unknown export format '{other}' (expected hosts, unbound, json or yaml)"
            )),
        }
    }
}

#[derive(Serialize)]
struct Blocklist<'a> {
    block_ip: String,
    domains: &'a [Domain],
}

/// Serializes `domains` as `format`, pointing every entry at `block_ip`.
///
/// An empty `block_ip` means `0.0.0.0`.
pub fn export(domains: &[Domain], block_ip: &str, format: ExportFormat) -> Result<Vec<u8>> {
    let ip: IpAddr = resolve_block_ip(block_ip)?;

    match format {
        ExportFormat::Hosts => Ok(render_hosts(domains, ip).into_bytes()),
        ExportFormat::Unbound => Ok(render_unbound(domains, ip).into_bytes()),
        ExportFormat::Json => {
            let doc = Blocklist {
                block_ip: ip.to_string(),
                domains,
            };
            let mut out: Vec<u8> = serde_json::to_vec_pretty(&doc)
                .map_err(|e| SieveError::export(format.to_string(), e.to_string()))?;
            out.push(b'\n');
            Ok(out)
        }
        ExportFormat::Yaml => {
            let doc = Blocklist {
                block_ip: ip.to_string(),
                domains,
            };
            serde_yaml::to_string(&doc)
                .map(String::into_bytes)
                .map_err(|e| SieveError::export(format.to_string(), e.to_string()))
        }
    }
}

fn resolve_block_ip(block_ip: &str) -> Result<IpAddr> {
    let raw: &str = match block_ip.trim() {
        "" => DEFAULT_BLOCK_IP,
        other => other,
    };
    raw.parse::<IpAddr>()
        .map_err(|_| SieveError::invalid_argument(format!("'{raw}' is not an IP address")))
}

fn render_hosts(domains: &[Domain], ip: IpAddr) -> String {
    let mut out: String = String::new();
    for domain in domains {
        let _ = writeln!(out, "{ip} {domain}");
    }
    out
}

fn render_unbound(domains: &[Domain], ip: IpAddr) -> String {
    let record: &str = if ip.is_ipv6() { "AAAA" } else { "A" };
    let mut out: String = String::from("server:\n");
    for domain in domains {
        let _ = writeln!(out, "  local-zone: \"{domain}\" redirect");
        let _ = writeln!(out, "  local-data: \"{domain} {record} {ip}\"");
    }
    out
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
