use std::time::Instant;

use colored::*;

use hostsieve_common::Config;
use hostsieve_core::aggregator::DirectoryReport;
use hostsieve_core::pipeline;

use crate::commands::ExportArgs;
use crate::terminal::print;

pub async fn parse(cfg: &Config, export: &ExportArgs) -> anyhow::Result<()> {
    let start_time: Instant = Instant::now();
    let report: DirectoryReport = pipeline::parse_sources(cfg).await?;

    print::header("Parsed Sources", cfg.quiet);
    print_counts(&report);
    export.emit(&report.domains, cfg)?;

    let elapsed: ColoredString = format!("{:.2}s", start_time.elapsed().as_secs_f64()).bold().yellow();
    print::summary(
        &format!(
            "Parse Complete: {} unique domains in {}",
            report.domains.len().to_string().bold().green(),
            elapsed
        ),
        cfg.quiet,
    );
    Ok(())
}

fn print_counts(report: &DirectoryReport) {
    print::aligned_line("Files parsed", report.files_parsed);
    print::aligned_line("Files failed", report.files_failed());
    print::aligned_line("Lines read", report.stats.lines_total);
    print::aligned_line("Lines skipped", report.stats.lines_skipped());
    print::aligned_line("Domains", report.domains_total);
    print::aligned_line("Duplicates", report.duplicates());
    print::aligned_line("Unique domains", report.domains.len());
}
