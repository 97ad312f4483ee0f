use std::time::Instant;

use anyhow::Context;
use colored::*;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use hostsieve_common::Config;
use hostsieve_core::pipeline::{self, BatchReport};
use hostsieve_core::prober::LivenessProber;

use crate::commands::ExportArgs;
use crate::terminal::print;
use crate::terminal::spinner::ProbeSpinner;

pub async fn verify(cfg: &Config, export: &ExportArgs) -> anyhow::Result<()> {
    let cancel: CancellationToken = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let spinner: ProbeSpinner = ProbeSpinner::start("Probing domains...", cfg.quiet);
    let prober: LivenessProber = LivenessProber::from_settings(&cfg.probe)
        .context("cannot set up liveness probes")?
        .with_progress(spinner.progress_callback());

    let start_time: Instant = Instant::now();
    let outcome = pipeline::run_batch(cfg, &prober, &cancel).await;
    spinner.finish();
    let report: BatchReport = outcome?;

    if report.cancelled {
        warn!("Batch was cut short; unfinished probes count as dead");
    }

    print::header("Liveness Check", cfg.quiet);
    print::aligned_line("Policy", format!("{} ({})", cfg.policy.probes, cfg.policy.requirement));
    print::aligned_line("Files parsed", report.files_parsed);
    print::aligned_line("Files failed", report.files_failed);
    print::aligned_line("Lines read", report.lines_total);
    print::aligned_line("Lines skipped", report.lines_total - report.lines_parsed);
    print::aligned_line("Unique domains", report.unique_domains);
    print::aligned_line("Probes sent", report.probes_dispatched);
    print::aligned_line("Probes failed", report.probes_failed);
    print::aligned_line("Alive", report.alive.len().to_string().green());

    export.emit(&report.alive, cfg)?;

    let elapsed: ColoredString = format!("{:.2}s", start_time.elapsed().as_secs_f64()).bold().yellow();
    print::summary(
        &format!(
            "Verify Complete: {} of {} domains alive in {}",
            report.alive.len().to_string().bold().green(),
            report.unique_domains,
            elapsed
        ),
        cfg.quiet,
    );
    Ok(())
}

/// Cancels the batch on the first Ctrl-C.
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing in-flight probes as failed");
            cancel.cancel();
        }
    });
}
