#![cfg(test)]
use std::collections::{HashMap, HashSet};
use std::fs;
use std::time::Duration;

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use hostsieve_common::{
    AlivenessPolicy, Config, Domain, DomainSet, HttpThreshold, ProbeSettings, Requirement,
};
use hostsieve_core::exporter::{self, ExportFormat};
use hostsieve_core::pipeline::{self, BatchReport};

use super::fakes::{StaticHttp, ZoneDns, prober, strings};

const LIST_A: &str = "\
# Title: list a
127.0.0.1\tlocalhost
127.0.0.1 005.free-counter.co.uk
0.0.0.0 http://ads1.msn.com
#0.0.0.0 anetno.tradedoubler.com
beatyhousesupporte.su
";

const LIST_B: &str = "\
0.0.0.0 ads1.msn.com
0.0.0.0 tracker.example.org
127.0.0.1\t005.free-counter.co.uk
::1 ip6-localhost
";

fn sources() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("list-a"), LIST_A).unwrap();
    fs::write(dir.path().join("list-b"), LIST_B).unwrap();
    fs::create_dir(dir.path().join("archive")).unwrap();
    fs::write(dir.path().join("archive").join("old"), "ignored.example.net\n").unwrap();
    dir
}

fn config(dir: &TempDir, policy: AlivenessPolicy) -> Config {
    Config {
        sources_dir: dir.path().to_path_buf(),
        policy,
        ..Config::default()
    }
}

fn names(set: &DomainSet) -> Vec<&str> {
    set.iter().map(Domain::as_str).collect()
}

fn no_http() -> StaticHttp {
    StaticHttp {
        statuses: HashMap::new(),
        hang: HashSet::new(),
    }
}

#[tokio::test]
async fn overlapping_lists_collapse_to_their_union() {
    let dir = sources();
    let report = pipeline::parse_sources(&config(&dir, AlivenessPolicy::default()))
        .await
        .unwrap();

    assert_eq!(
        names(&report.domains),
        [
            "005.free-counter.co.uk",
            "ads1.msn.com",
            "beatyhousesupporte.su",
            "tracker.example.org",
        ]
    );
    assert_eq!(report.files_parsed, 2);
    assert_eq!(report.domains_total, 6);
    assert_eq!(report.duplicates(), 2);
    assert_eq!(report.stats.lines_total, 10);
    assert_eq!(report.stats.lines_skipped(), 4);
    assert!(report.failures.is_empty());
}

#[tokio::test]
async fn dns_batch_exports_resolving_domains() {
    let dir = sources();
    let dns = ZoneDns {
        names: strings(&["ads1.msn.com", "tracker.example.org"]),
    };
    let prober = prober(dns, no_http(), ProbeSettings::default());
    let cfg = config(&dir, AlivenessPolicy::dns_only());

    let report: BatchReport = pipeline::run_batch(&cfg, &prober, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.unique_domains, 4);
    assert_eq!(report.probes_dispatched, 4);
    assert_eq!(report.probes_failed, 2);

    let hosts = exporter::export(&report.alive.to_vec(), &cfg.block_ip, ExportFormat::Hosts).unwrap();
    assert_eq!(
        String::from_utf8(hosts).unwrap(),
        "0.0.0.0 ads1.msn.com\n0.0.0.0 tracker.example.org\n"
    );
}

#[tokio::test]
async fn combined_policy_requirement_changes_the_outcome() {
    let dir = sources();
    let make_prober = || {
        let dns = ZoneDns {
            names: strings(&["ads1.msn.com", "tracker.example.org"]),
        };
        let http = StaticHttp {
            statuses: HashMap::from([
                ("ads1.msn.com".to_string(), 200),
                ("beatyhousesupporte.su".to_string(), 502),
            ]),
            hang: HashSet::new(),
        };
        prober(dns, http, ProbeSettings::default())
    };

    let any = config(
        &dir,
        AlivenessPolicy::combined(Requirement::Any, HttpThreshold::AnyResponse),
    );
    let report = pipeline::run_batch(&any, &make_prober(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(report.probes_dispatched, 8);
    assert_eq!(
        names(&report.alive),
        ["ads1.msn.com", "beatyhousesupporte.su", "tracker.example.org"]
    );

    let all = config(
        &dir,
        AlivenessPolicy::combined(Requirement::All, HttpThreshold::SuccessOnly),
    );
    let report = pipeline::run_batch(&all, &make_prober(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(names(&report.alive), ["ads1.msn.com"]);
}

#[tokio::test]
async fn batch_deadline_releases_hanging_probes() {
    let dir = sources();
    let http = StaticHttp {
        statuses: HashMap::from([("ads1.msn.com".to_string(), 301)]),
        hang: strings(&[
            "005.free-counter.co.uk",
            "beatyhousesupporte.su",
            "tracker.example.org",
        ]),
    };
    let settings = ProbeSettings {
        http_timeout: Duration::from_secs(3600),
        batch_timeout: Some(Duration::from_millis(200)),
        ..ProbeSettings::default()
    };
    let prober = prober(ZoneDns { names: HashSet::new() }, http, settings);
    let cfg = config(&dir, AlivenessPolicy::http_only(HttpThreshold::AnyResponse));

    let report = tokio::time::timeout(
        Duration::from_secs(10),
        pipeline::run_batch(&cfg, &prober, &CancellationToken::new()),
    )
    .await
    .expect("batch deadline did not release the barrier")
    .unwrap();

    assert!(report.cancelled);
    assert_eq!(names(&report.alive), ["ads1.msn.com"]);
    assert_eq!(report.probes_failed, 3);
}

#[tokio::test]
async fn unreadable_bytes_do_not_poison_a_file() {
    let dir = TempDir::new().unwrap();
    let mut content: Vec<u8> = b"0.0.0.0 good.example.com\n".to_vec();
    content.extend_from_slice(&[0xff, 0xfe, b'\n']);
    content.extend_from_slice(b"0.0.0.0 after.example.com\n");
    fs::write(dir.path().join("latin1"), content).unwrap();

    let report = pipeline::parse_sources(&config(&dir, AlivenessPolicy::default()))
        .await
        .unwrap();
    assert_eq!(names(&report.domains), ["after.example.com", "good.example.com"]);
    assert_eq!(report.stats.lines_total, 3);
}
