use std::time::Instant;

use colored::*;
use tracing::info;

use hostsieve_common::{Config, Source};
use hostsieve_core::catalog;
use hostsieve_core::fetcher::{self, SyncReport};

use crate::sprint;
use crate::terminal::print;

pub async fn sync(cfg: &Config) -> anyhow::Result<()> {
    let sources: Vec<Source> = catalog::load_catalog(&cfg.catalog_path)?;
    info!(
        "Fetching {} sources into {}",
        sources.len(),
        cfg.sources_dir.display()
    );

    let start_time: Instant = Instant::now();
    let report: SyncReport = fetcher::sync_sources(&sources, &cfg.sources_dir, &cfg.probe).await?;

    print::header("Source Sync", cfg.quiet);
    print::aligned_line("Sources", sources.len());
    print::aligned_line("Fetched", report.fetched.len().to_string().green());
    print::aligned_line("Failed", report.failed.len());

    if !report.failed.is_empty() && cfg.quiet < 2 {
        sprint!();
        for (idx, err) in report.failed.iter().enumerate() {
            print::tree_head(idx, &err.to_string());
        }
    }

    let elapsed: ColoredString = format!("{:.2}s", start_time.elapsed().as_secs_f64()).bold().yellow();
    print::summary(
        &format!(
            "Sync Complete: {} of {} sources in {}",
            report.fetched.len().to_string().bold().green(),
            sources.len(),
            elapsed
        ),
        cfg.quiet,
    );
    Ok(())
}
