use std::path::PathBuf;
use std::time::Duration;

use crate::policy::AlivenessPolicy;

pub const DEFAULT_CONCURRENCY: usize = 64;
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_BLOCK_IP: &str = "0.0.0.0";

/// Limits applied to network work (liveness probes and source downloads).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    /// Maximum number of probes in flight at any moment.
    pub concurrency: usize,
    /// Per-request timeout for HTTP probes.
    pub http_timeout: Duration,
    /// Deadline for a whole probe batch.
    ///
    /// When it expires, in-flight probes are cancelled and report not-alive.
    pub batch_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            batch_timeout: None,
            user_agent: format!("hostsieve/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Run configuration, passed explicitly to every stage.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding fetched hosts files, one file per source.
    pub sources_dir: PathBuf,
    /// YAML file listing the sources to fetch.
    pub catalog_path: PathBuf,
    pub probe: ProbeSettings,
    pub policy: AlivenessPolicy,
    /// Address written next to every blocked domain on export.
    pub block_ip: String,
    /// Suppresses decorative output when > 0.
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources_dir: PathBuf::from("sources"),
            catalog_path: PathBuf::from("sources.yml"),
            probe: ProbeSettings::default(),
            policy: AlivenessPolicy::default(),
            block_ip: DEFAULT_BLOCK_IP.to_string(),
            quiet: 0,
        }
    }
}
