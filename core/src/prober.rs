//! # Liveness Prober
//!
//! Checks whether the domains of a [`DomainSet`] still exist, using DNS
//! resolution, an HTTP request, or both.
//!
//! **Concurrency model:**
//! * One task per domain per enabled [`ProbeKind`], spawned on a [`JoinSet`].
//! * A [`Semaphore`] caps how many of them touch the network at once.
//! * Every task writes exactly one [`ProbeResult`] into a shared channel,
//!   including when it fails or is cancelled, so per-domain identity is
//!   never lost.
//! * The batch only hands out results after every task has been joined
//!   (completion barrier). Partial results are never exposed.
//! * A [`CancellationToken`] (external, or fired by the batch deadline)
//!   makes waiting and in-flight tasks report "not alive" immediately.
//!
//! Probe failures are never errors: DNS failures become empty address lists,
//! HTTP failures become status code 0.

use std::future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use hostsieve_common::{
    AlivenessPolicy, Domain, DomainSet, ProbeKind, ProbeResult, ProbeSettings,
};

mod dns;
mod http;

pub use dns::{DnsLookup, SystemResolver};
pub use http::{HttpStatusProbe, ReqwestProbe, target_url};

/// Called with the number of finished probes after each completion.
pub type ProgressCallback = Arc<dyn Fn(usize) + Send + Sync>;

/// Everything a finished batch produced.
#[derive(Debug, Default)]
pub struct ProbeBatch {
    /// One entry per dispatched probe that reported back, in arrival order.
    pub results: Vec<ProbeResult>,
    pub dispatched: usize,
    /// Tasks that terminated without reporting (panicked).
    pub lost: usize,
    /// Whether the batch was cut short by cancellation or its deadline.
    pub cancelled: bool,
}

impl ProbeBatch {
    /// Probes that produced no evidence of life.
    pub fn failures(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }
}

pub struct LivenessProber {
    dns: Arc<dyn DnsLookup>,
    http: Arc<dyn HttpStatusProbe>,
    settings: ProbeSettings,
    on_progress: Option<ProgressCallback>,
}

impl LivenessProber {
    pub fn new(
        dns: Arc<dyn DnsLookup>,
        http: Arc<dyn HttpStatusProbe>,
        settings: ProbeSettings,
    ) -> Self {
        Self {
            dns,
            http,
            settings,
            on_progress: None,
        }
    }

    /// Prober using the system resolver and a `reqwest` client.
    pub fn from_settings(settings: &ProbeSettings) -> anyhow::Result<Self> {
        let dns: Arc<dyn DnsLookup> = Arc::new(SystemResolver::new());
        let http: Arc<dyn HttpStatusProbe> = Arc::new(ReqwestProbe::new(settings)?);
        Ok(Self::new(dns, http, settings.clone()))
    }

    pub fn with_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    /// Probes every domain with every kind enabled by `policy`.
    ///
    /// Returns once all dispatched probes have reported. Cancelling `cancel`
    /// (or reaching the configured batch deadline) makes the remaining
    /// probes report failure promptly instead of hanging the barrier.
    pub async fn probe_liveness(
        &self,
        domains: &DomainSet,
        policy: &AlivenessPolicy,
        cancel: &CancellationToken,
    ) -> ProbeBatch {
        let kinds: &[ProbeKind] = policy.enabled_kinds();
        let batch_token: CancellationToken = cancel.child_token();
        let permits: Arc<Semaphore> = Arc::new(Semaphore::new(self.settings.concurrency.max(1)));
        let completed: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));
        let (sink, mut results_rx) = mpsc::unbounded_channel::<ProbeResult>();
        let mut workers: JoinSet<()> = JoinSet::new();

        for domain in domains {
            for &kind in kinds {
                let task = ProbeTask {
                    kind,
                    domain: domain.clone(),
                    dns: Arc::clone(&self.dns),
                    http: Arc::clone(&self.http),
                    http_timeout: self.settings.http_timeout,
                };
                let permits = Arc::clone(&permits);
                let token = batch_token.clone();
                let sink = sink.clone();
                let completed = Arc::clone(&completed);
                let on_progress = self.on_progress.clone();

                workers.spawn(async move {
                    let result: ProbeResult = task.run(&permits, &token).await;
                    // The receiver is only dropped after every worker is joined.
                    let _ = sink.send(result);

                    let done: usize = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(cb) = on_progress {
                        cb(done);
                    }
                });
            }
        }
        drop(sink);

        let dispatched: usize = workers.len();
        debug!(
            dispatched,
            concurrency = self.settings.concurrency,
            "probe batch dispatched"
        );

        let lost: usize = join_all(&mut workers, &batch_token, self.settings.batch_timeout).await;

        let mut results: Vec<ProbeResult> = Vec::with_capacity(dispatched);
        while let Some(result) = results_rx.recv().await {
            results.push(result);
        }

        ProbeBatch {
            results,
            dispatched,
            lost,
            cancelled: batch_token.is_cancelled(),
        }
    }
}

/// Completion barrier: waits for every worker, firing `token` at the deadline.
///
/// Returns the number of workers that ended without reporting.
async fn join_all(
    workers: &mut JoinSet<()>,
    token: &CancellationToken,
    batch_timeout: Option<Duration>,
) -> usize {
    let deadline = async move {
        match batch_timeout {
            Some(limit) => tokio::time::sleep(limit).await,
            None => future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    let mut deadline_armed: bool = true;
    let mut lost: usize = 0;

    loop {
        tokio::select! {
            joined = workers.join_next() => match joined {
                Some(Ok(())) => {}
                Some(Err(e)) => {
                    lost += 1;
                    warn!("Probe task ended without a result: {e}");
                }
                None => break,
            },
            _ = &mut deadline, if deadline_armed => {
                deadline_armed = false;
                warn!("Probe batch deadline reached, cancelling in-flight probes");
                token.cancel();
            }
        }
    }

    lost
}

struct ProbeTask {
    kind: ProbeKind,
    domain: Domain,
    dns: Arc<dyn DnsLookup>,
    http: Arc<dyn HttpStatusProbe>,
    http_timeout: Duration,
}

impl ProbeTask {
    async fn run(&self, permits: &Semaphore, token: &CancellationToken) -> ProbeResult {
        let _permit = tokio::select! {
            biased;
            _ = token.cancelled() => return self.cancelled(),
            permit = permits.acquire() => match permit {
                Ok(permit) => permit,
                Err(_) => return self.cancelled(),
            },
        };

        tokio::select! {
            biased;
            _ = token.cancelled() => self.cancelled(),
            result = self.probe() => result,
        }
    }

    async fn probe(&self) -> ProbeResult {
        match self.kind {
            ProbeKind::Dns => match self.dns.lookup(&self.domain).await {
                Ok(addresses) => {
                    if addresses.is_empty() {
                        debug!(domain = %self.domain, "DNS probe resolved no addresses");
                    }
                    ProbeResult::dns(self.domain.clone(), addresses)
                }
                Err(e) => {
                    debug!(domain = %self.domain, error = %e, "DNS probe failed");
                    ProbeResult::failed(ProbeKind::Dns, self.domain.clone())
                }
            },
            ProbeKind::Http => {
                let url: String = target_url(&self.domain);
                match timeout(self.http_timeout, self.http.status(&url)).await {
                    Ok(Ok(status_code)) => ProbeResult::http(self.domain.clone(), status_code),
                    Ok(Err(e)) => {
                        debug!(domain = %self.domain, error = %e, "HTTP probe failed");
                        ProbeResult::failed(ProbeKind::Http, self.domain.clone())
                    }
                    Err(_elapsed) => {
                        debug!(domain = %self.domain, "HTTP probe timed out");
                        ProbeResult::failed(ProbeKind::Http, self.domain.clone())
                    }
                }
            }
        }
    }

    fn cancelled(&self) -> ProbeResult {
        debug!(domain = %self.domain, kind = %self.kind, "probe cancelled");
        ProbeResult::failed(self.kind, self.domain.clone())
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
