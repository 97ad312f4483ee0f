//! Source catalog loading.
//!
//! The catalog is a YAML sequence of sources:
//!
//! ```yaml
//! - name: someonewhocares
//!   url: http://someonewhocares.org/hosts/zero/hosts
//!   description: Dan Pollock's hosts file
//! - name: adaway
//!   url: https://adaway.org/hosts.txt
//! ```
//!
//! A malformed catalog is fatal: nothing can be fetched without it.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::debug;

use hostsieve_common::{IoResultExt, Result, SieveError, Source};

pub fn load_catalog(path: &Path) -> Result<Vec<Source>> {
    let content: String = fs::read_to_string(path).with_path(path, "read")?;
    let sources: Vec<Source> = parse_catalog(&content, path)?;
    debug!(catalog = %path.display(), sources = sources.len(), "catalog loaded");
    Ok(sources)
}

/// Parses and validates catalog text. `origin` is only used in error messages.
pub fn parse_catalog(content: &str, origin: &Path) -> Result<Vec<Source>> {
    let sources: Vec<Source> =
        serde_yaml::from_str(content).map_err(|e| SieveError::catalog(origin, e.to_string()))?;

    let mut seen: HashSet<&str> = HashSet::new();
    for source in &sources {
        validate(source, origin)?;
        if !seen.insert(source.name.as_str()) {
            return Err(SieveError::catalog(
                origin,
                format!("duplicate source name '{}'", source.name),
            ));
        }
    }

    Ok(sources)
}

fn validate(source: &Source, origin: &Path) -> Result<()> {
    let name: &str = source.name.as_str();
    if name.trim().is_empty() {
        return Err(SieveError::catalog(origin, "source with empty name"));
    }
    if name.trim() != name {
        return Err(SieveError::catalog(
            origin,
            format!("source name '{name}' has surrounding whitespace"),
        ));
    }
    // The name becomes a file name inside the sources directory.
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(SieveError::catalog(
            origin,
            format!("source name '{name}' is not a valid file name"),
        ));
    }
    if !(source.url.starts_with("http://") || source.url.starts_with("https://")) {
        return Err(SieveError::catalog(
            origin,
            format!("source '{name}' has unsupported url '{}'", source.url),
        ));
    }
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
