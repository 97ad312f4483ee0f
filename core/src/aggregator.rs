//! # File Aggregator
//!
//! Runs the line parser over hosts files and folds the results into one
//! deduplicated [`DomainSet`].
//!
//! Files are read line by line and never held in memory as a whole. Bytes
//! that are not valid UTF-8 are replaced rather than rejected, since list
//! maintainers do not agree on encodings either.
//!
//! Failure isolation:
//! * [`parse_file`] fails only for its own file.
//! * [`parse_directory`] fails only if the directory itself cannot be read;
//!   broken files are recorded in the [`DirectoryReport`] and skipped.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::ops::AddAssign;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use hostsieve_common::{Domain, DomainSet, IoResultExt, Result, SieveError};

use crate::parser;

/// Line counters for one file, or summed over many.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub lines_total: usize,
    pub lines_parsed: usize,
}

impl ParseStats {
    pub fn lines_skipped(&self) -> usize {
        self.lines_total - self.lines_parsed
    }
}

impl AddAssign for ParseStats {
    fn add_assign(&mut self, other: Self) {
        self.lines_total += other.lines_total;
        self.lines_parsed += other.lines_parsed;
    }
}

/// Outcome of a directory pass.
#[derive(Debug, Default)]
pub struct DirectoryReport {
    pub domains: DomainSet,
    /// Number of domains extracted before deduplication.
    pub domains_total: usize,
    pub files_parsed: usize,
    pub failures: Vec<SieveError>,
    pub stats: ParseStats,
}

impl DirectoryReport {
    pub fn files_failed(&self) -> usize {
        self.failures.len()
    }

    pub fn duplicates(&self) -> usize {
        self.domains_total - self.domains.len()
    }
}

/// Parses every line of `path`, keeping extracted domains in encounter order.
pub fn parse_file(path: &Path) -> Result<(Vec<Domain>, ParseStats)> {
    let file: File = File::open(path).with_path(path, "open")?;
    let (domains, stats) = parse_reader(BufReader::new(file)).with_path(path, "read")?;

    debug!(
        file = %path.display(),
        lines_total = stats.lines_total,
        lines_parsed = stats.lines_parsed,
        "file parsed"
    );

    Ok((domains, stats))
}

/// Parses hosts-file content from any buffered reader.
pub fn parse_reader<R: BufRead>(mut reader: R) -> io::Result<(Vec<Domain>, ParseStats)> {
    let mut domains: Vec<Domain> = Vec::new();
    let mut stats: ParseStats = ParseStats::default();
    let mut buf: Vec<u8> = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        stats.lines_total += 1;

        let line = String::from_utf8_lossy(&buf);
        if let Some(domain) = parser::parse_line(&line) {
            domains.push(domain);
            stats.lines_parsed += 1;
        }
    }

    Ok((domains, stats))
}

/// Parses every regular file directly inside `dir` and deduplicates the union.
///
/// Subdirectories are not descended into. Files are parsed in parallel;
/// the resulting set does not depend on directory iteration order.
pub fn parse_directory(dir: &Path) -> Result<DirectoryReport> {
    info!("Parsing directory {}", dir.display());

    let entries = fs::read_dir(dir).map_err(|e| SieveError::directory(dir, e))?;
    let mut report: DirectoryReport = DirectoryReport::default();
    let mut files: Vec<PathBuf> = Vec::new();

    for entry in entries {
        match entry {
            Ok(entry) => {
                let path: PathBuf = entry.path();
                // Follows symlinks; FIFOs, sockets and devices are left alone.
                match fs::metadata(&path) {
                    Ok(meta) if meta.is_file() => files.push(path),
                    Ok(_) => debug!("Skipping {}: not a regular file", path.display()),
                    Err(e) => report.failures.push(SieveError::io(&path, "stat", e)),
                }
            }
            Err(e) => report.failures.push(SieveError::io(dir, "list", e)),
        }
    }

    let parsed: Vec<(PathBuf, Result<(Vec<Domain>, ParseStats)>)> = files
        .into_par_iter()
        .map(|path| {
            let result = parse_file(&path);
            (path, result)
        })
        .collect();

    for (path, result) in parsed {
        match result {
            Ok((domains, stats)) => {
                report.files_parsed += 1;
                report.stats += stats;
                report.domains_total += domains.len();
                report.domains.extend(domains);
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping unreadable file");
                report.failures.push(e);
            }
        }
    }

    info!("Total hosts parsed: {}", report.domains_total);
    info!("Unique hosts: {}", report.domains.len());

    Ok(report)
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
    use std::io::Cursor;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn reader_counts_total_and_parsed_lines() {
        let content = "# header\n127.0.0.1 localhost\n0.0.0.0 ads.example.com\n\n0.0.0.0 ads.example.com\n";
        let (domains, stats) = parse_reader(Cursor::new(content)).unwrap();

        assert_eq!(stats, ParseStats { lines_total: 5, lines_parsed: 2 });
        assert_eq!(stats.lines_skipped(), 3);
        assert_eq!(domains.len(), 2, "parse_file keeps duplicates in encounter order");
    }

    #[test]
    fn reader_tolerates_invalid_utf8_and_crlf() {
        let mut content: Vec<u8> = b"0.0.0.0 tracker.example.net\r\n".to_vec();
        content.extend_from_slice(b"0.0.0.0 caf\xe9.example.com\n0.0.0.0 last.example.org");
        let (domains, stats) = parse_reader(Cursor::new(content)).unwrap();

        assert_eq!(stats.lines_total, 3);
        let names: Vec<&str> = domains.iter().map(Domain::as_str).collect();
        assert_eq!(names, ["tracker.example.net", "last.example.org"]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let err = parse_file(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, SieveError::Io { ref operation, .. } if operation == "open"));
    }

    #[test]
    fn directory_union_collapses_duplicates() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a", "0.0.0.0 one.example.com\n0.0.0.0 two.example.com\n");
        write(&dir, "b", "127.0.0.1\ttwo.example.com\n127.0.0.1\tthree.example.com\n");
        fs::create_dir(dir.path().join("nested")).unwrap();
        write(&dir, "nested/ignored", "0.0.0.0 nested.example.com\n");

        let report = parse_directory(dir.path()).unwrap();

        let names: Vec<&str> = report.domains.iter().map(Domain::as_str).collect();
        assert_eq!(names.len(), 3);
        for expected in ["one.example.com", "two.example.com", "three.example.com"] {
            assert!(names.contains(&expected), "missing {expected}");
        }
        assert_eq!(report.files_parsed, 2);
        assert_eq!(report.domains_total, 4);
        assert_eq!(report.duplicates(), 1);
        assert!(report.domains.len() <= report.domains_total);
    }

    #[test]
    fn missing_directory_is_escalated() {
        let dir = TempDir::new().unwrap();
        let err = parse_directory(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, SieveError::Directory { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_is_skipped_not_fatal() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        write(&dir, "good", "0.0.0.0 good.example.com\n");
        let bad = write(&dir, "bad", "0.0.0.0 bad.example.com\n");
        fs::set_permissions(&bad, fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores file permissions; nothing to assert in that case.
        if File::open(&bad).is_ok() {
            return;
        }

        let report = parse_directory(dir.path()).unwrap();
        assert_eq!(report.files_parsed, 1);
        assert_eq!(report.files_failed(), 1);
        assert_eq!(report.domains.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn special_files_are_not_opened() {
        use std::os::unix::net::UnixListener;

        let dir = TempDir::new().unwrap();
        write(&dir, "hosts", "0.0.0.0 ads.example.com\n");
        let _socket = UnixListener::bind(dir.path().join("control.sock")).unwrap();

        let report = parse_directory(dir.path()).unwrap();
        assert_eq!(report.files_parsed, 1);
        assert_eq!(report.files_failed(), 0);
        assert!(report.domains.iter().any(|d| d.as_str() == "ads.example.com"));
    }
}
