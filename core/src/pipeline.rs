//! One batch run: parse the sources directory, probe, filter.
//!
//! The batch is the unit of work the CLI drives. Parsing is CPU-bound and
//! runs on the blocking pool; probing runs on the async runtime.

use tokio_util::sync::CancellationToken;
use tracing::info;

use hostsieve_common::{Config, DomainSet, Result, SieveError};

use crate::aggregator::{self, DirectoryReport};
use crate::filter;
use crate::prober::{LivenessProber, ProbeBatch};

/// Counters and output of a finished batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub alive: DomainSet,
    pub unique_domains: usize,
    pub files_parsed: usize,
    pub files_failed: usize,
    pub lines_total: usize,
    pub lines_parsed: usize,
    pub probes_dispatched: usize,
    pub probes_failed: usize,
    pub cancelled: bool,
}

impl BatchReport {
    fn from_parts(parsed: &DirectoryReport, probes: &ProbeBatch, alive: DomainSet) -> Self {
        Self {
            alive,
            unique_domains: parsed.domains.len(),
            files_parsed: parsed.files_parsed,
            files_failed: parsed.files_failed(),
            lines_total: parsed.stats.lines_total,
            lines_parsed: parsed.stats.lines_parsed,
            probes_dispatched: probes.dispatched,
            probes_failed: probes.failures() + probes.lost,
            cancelled: probes.cancelled,
        }
    }
}

/// Parses `cfg.sources_dir` without probing.
pub async fn parse_sources(cfg: &Config) -> Result<DirectoryReport> {
    let dir = cfg.sources_dir.clone();
    tokio::task::spawn_blocking(move || aggregator::parse_directory(&dir))
        .await
        .map_err(|e| SieveError::internal(format!("parser task failed: {e}")))?
}

/// Full batch. Only a sources directory that cannot be opened is an error.
pub async fn run_batch(
    cfg: &Config,
    prober: &LivenessProber,
    cancel: &CancellationToken,
) -> Result<BatchReport> {
    let parsed: DirectoryReport = parse_sources(cfg).await?;

    let probes: ProbeBatch = prober
        .probe_liveness(&parsed.domains, &cfg.policy, cancel)
        .await;
    let alive: DomainSet = filter::filter_alive(&probes.results, &cfg.policy);

    info!(
        unique = parsed.domains.len(),
        alive = alive.len(),
        cancelled = probes.cancelled,
        "batch finished"
    );

    Ok(BatchReport::from_parts(&parsed, &probes, alive))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
