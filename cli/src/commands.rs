pub mod line;
pub mod parse;
pub mod sync;
pub mod verify;

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use hostsieve_common::config::DEFAULT_BLOCK_IP;
use hostsieve_common::{
    AlivenessPolicy, Config, Domain, DomainSet, HttpThreshold, ProbeSelection, ProbeSettings,
    Requirement,
};
use hostsieve_core::exporter::{self, ExportFormat};

use crate::terminal::print;

#[derive(Parser)]
#[command(name = "hostsieve")]
#[command(version, about = "Merge ad/tracking block-lists and keep only live domains.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding one hosts file per source
    #[arg(long, global = true, default_value = "sources")]
    pub sources_dir: PathBuf,

    /// YAML catalog of sources to fetch
    #[arg(long, global = true, default_value = "sources.yml")]
    pub catalog: PathBuf,

    /// Maximum number of probes or downloads in flight
    #[arg(long, global = true, default_value_t = 64)]
    pub concurrency: usize,

    /// Per-request HTTP timeout, in seconds
    #[arg(long, global = true, default_value_t = 10)]
    pub http_timeout: u64,

    /// Deadline for a whole probe batch, in seconds
    #[arg(long, global = true)]
    pub batch_timeout: Option<u64>,

    /// Probe kinds to run: dns, http or both
    #[arg(long, global = true, default_value = "dns")]
    pub probe: ProbeSelection,

    /// With both probes: alive if any succeeds, or only if all do
    #[arg(long, global = true, default_value = "any")]
    pub require: Requirement,

    /// HTTP statuses that count as alive: any response, or 2xx only
    #[arg(long, global = true, default_value = "any")]
    pub http_alive: HttpThreshold,

    /// Address written next to every blocked domain
    #[arg(long, global = true, default_value = DEFAULT_BLOCK_IP)]
    pub block_ip: String,

    /// Less decoration; repeat to only print the summary
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// More diagnostics; repeat for trace output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download every source listed in the catalog
    #[command(alias = "s")]
    Sync,
    /// Merge the sources directory into one deduplicated list
    #[command(alias = "p")]
    Parse {
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Merge, probe and keep only live domains
    #[command(alias = "v")]
    Verify {
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Show which domain, if any, a single line yields
    #[command(alias = "l")]
    Line { text: String },
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output format: hosts, unbound, json or yaml
    #[arg(long, default_value = "hosts")]
    pub format: ExportFormat,

    /// Write the list here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Config {
        let policy: AlivenessPolicy = AlivenessPolicy {
            probes: self.probe,
            requirement: self.require,
            http_threshold: self.http_alive,
        };

        Config {
            sources_dir: self.sources_dir.clone(),
            catalog_path: self.catalog.clone(),
            probe: ProbeSettings {
                concurrency: self.concurrency,
                http_timeout: Duration::from_secs(self.http_timeout),
                batch_timeout: self.batch_timeout.map(Duration::from_secs),
                ..ProbeSettings::default()
            },
            policy,
            block_ip: self.block_ip.clone(),
            quiet: self.quiet,
        }
    }
}

impl ExportArgs {
    /// Renders `domains` and writes them to `--output` or stdout.
    pub fn emit(&self, domains: &DomainSet, cfg: &Config) -> anyhow::Result<()> {
        let ordered: Vec<Domain> = domains.to_vec();
        let bytes: Vec<u8> = exporter::export(&ordered, &cfg.block_ip, self.format)?;

        match &self.output {
            Some(path) => {
                fs::write(path, &bytes)
                    .with_context(|| format!("cannot write {}", path.display()))?;
                print::aligned_line("Written to", path.display().to_string());
            }
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(&bytes)?;
                stdout.flush()?;
            }
        }
        Ok(())
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_library_config() {
        let cli = CommandLine::try_parse_from(["hostsieve", "parse"]).unwrap();
        let cfg = cli.to_config();
        let default = Config::default();

        assert_eq!(cfg.sources_dir, default.sources_dir);
        assert_eq!(cfg.probe, default.probe);
        assert_eq!(cfg.policy, default.policy);
        assert_eq!(cfg.block_ip, default.block_ip);
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = CommandLine::try_parse_from([
            "hostsieve",
            "verify",
            "--probe",
            "both",
            "--require",
            "all",
            "--http-alive",
            "2xx",
            "--batch-timeout",
            "30",
            "--format",
            "unbound",
            "-qq",
        ])
        .unwrap();
        let cfg = cli.to_config();

        assert_eq!(cfg.policy.probes, ProbeSelection::Both);
        assert_eq!(cfg.policy.requirement, Requirement::All);
        assert_eq!(cfg.policy.http_threshold, HttpThreshold::SuccessOnly);
        assert_eq!(cfg.probe.batch_timeout, Some(Duration::from_secs(30)));
        assert_eq!(cfg.quiet, 2);
        assert!(matches!(
            cli.command,
            Commands::Verify { export: ExportArgs { format: ExportFormat::Unbound, .. } }
        ));
    }

    #[test]
    fn rejects_unknown_probe_kind() {
        assert!(CommandLine::try_parse_from(["hostsieve", "verify", "--probe", "icmp"]).is_err());
    }
}
