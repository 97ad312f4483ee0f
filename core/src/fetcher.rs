//! Downloads catalog sources into the local sources directory.
//!
//! Each source ends up in `<dir>/<name>`. Downloads run concurrently, capped
//! by [`ProbeSettings::concurrency`], and fail independently: one broken
//! mirror is recorded in the [`SyncReport`] while the others proceed.
//!
//! A server that stops sending for longer than the HTTP timeout fails its
//! source; large lists that keep streaming are not cut off.
//!
//! Content is first written to a hidden `.part` sibling and then renamed,
//! so a failed download never clobbers a previously fetched list.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::Client;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use hostsieve_common::{IoResultExt, ProbeSettings, Result, SieveError, Source};

#[derive(Debug, Default)]
pub struct SyncReport {
    pub fetched: Vec<PathBuf>,
    pub failed: Vec<SieveError>,
}

/// Fetches every source into `dir`, creating it if needed.
///
/// Only failing to create `dir` or to build the HTTP client is fatal.
pub async fn sync_sources(
    sources: &[Source],
    dir: &Path,
    settings: &ProbeSettings,
) -> Result<SyncReport> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_path(dir, "create directory")?;

    let client: Client = Client::builder()
        .connect_timeout(settings.http_timeout)
        .read_timeout(settings.http_timeout)
        .user_agent(settings.user_agent.as_str())
        .build()
        .map_err(|e| SieveError::internal(format!("cannot build HTTP client: {e}")))?;

    let permits: Arc<Semaphore> = Arc::new(Semaphore::new(settings.concurrency.max(1)));
    let mut downloads: JoinSet<Result<PathBuf>> = JoinSet::new();

    for source in sources {
        let client = client.clone();
        let permits = Arc::clone(&permits);
        let source = source.clone();
        let target: PathBuf = dir.join(&source.name);

        downloads.spawn(async move {
            let _permit = permits
                .acquire()
                .await
                .map_err(|e| SieveError::internal(e.to_string()))?;
            info!("Processing URL: {}", source.url);
            fetch_one(&client, &source, &target).await?;
            Ok(target)
        });
    }

    let mut report: SyncReport = SyncReport::default();
    while let Some(joined) = downloads.join_next().await {
        match joined {
            Ok(Ok(path)) => report.fetched.push(path),
            Ok(Err(e)) => {
                warn!("{e}");
                report.failed.push(e);
            }
            Err(e) => report
                .failed
                .push(SieveError::internal(format!("download task failed: {e}"))),
        }
    }

    Ok(report)
}

async fn fetch_one(client: &Client, source: &Source, target: &Path) -> Result<()> {
    let fetch_err = |reason: String| SieveError::fetch(&source.name, &source.url, reason);

    let response = client
        .get(&source.url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| fetch_err(e.to_string()))?;
    let body = response.bytes().await.map_err(|e| fetch_err(e.to_string()))?;

    let partial: PathBuf = partial_path(target);
    tokio::fs::write(&partial, &body)
        .await
        .with_path(&partial, "write")?;
    tokio::fs::rename(&partial, target)
        .await
        .with_path(target, "rename")?;

    Ok(())
}

fn partial_path(target: &Path) -> PathBuf {
    let name: String = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.part"))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
