//! Error model shared by every hostsieve crate.
//!
//! Failures are isolated per file, per source and per domain. Only the
//! variants that leave no room for partial work ([`SieveError::Directory`],
//! [`SieveError::Catalog`]) are meant to be escalated to the caller; the
//! rest are collected into batch reports.
//!
//! Network failures of liveness probes never become a `SieveError`; they are
//! recorded as "no evidence of life" inside the probe result itself.

use std::io;
use std::path::Path;

use thiserror::Error;

/// Coarse classification used in summaries and exit handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Io,
    Network,
    Internal,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCategory::Input => "input",
            ErrorCategory::Io => "io",
            ErrorCategory::Network => "network",
            ErrorCategory::Internal => "internal",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug)]
pub enum SieveError {
    // ------------------------------ I/O -------------------------------------
    #[error("I/O error during {operation} on {path}: {source}")]
    Io {
        path: String,
        operation: String,
        #[source]
        source: io::Error,
    },

    #[error("cannot read directory {path}: {source}")]
    Directory {
        path: String,
        #[source]
        source: io::Error,
    },

    // ---------------------------- Input -------------------------------------
    #[error("invalid source catalog {path}: {reason}")]
    Catalog { path: String, reason: String },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("cannot export as {format}: {reason}")]
    Export { format: String, reason: String },

    // ---------------------------- Network -----------------------------------
    #[error("failed to fetch source '{name}' from {url}: {reason}")]
    Fetch {
        name: String,
        url: String,
        reason: String,
    },

    // ---------------------------- Internal ----------------------------------
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl SieveError {
    pub fn category(&self) -> ErrorCategory {
        use SieveError::*;
        match self {
            Io { .. } | Directory { .. } => ErrorCategory::Io,
            Catalog { .. } | InvalidArgument { .. } | Export { .. } => ErrorCategory::Input,
            Fetch { .. } => ErrorCategory::Network,
            Internal { .. } => ErrorCategory::Internal,
        }
    }

    pub fn io(path: impl AsRef<Path>, operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            operation: operation.into(),
            source,
        }
    }

    pub fn directory(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Directory {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    pub fn catalog(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::Catalog {
            path: path.as_ref().display().to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn export(format: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Export {
            format: format.into(),
            reason: reason.into(),
        }
    }

    pub fn fetch(
        name: impl Into<String>,
        url: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Fetch {
            name: name.into(),
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SieveError>;

/// Attaches a path and an operation name to a bare `io::Error`.
pub trait IoResultExt<T> {
    fn with_path(self, path: impl AsRef<Path>, operation: impl Into<String>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::result::Result<T, io::Error> {
    fn with_path(self, path: impl AsRef<Path>, operation: impl Into<String>) -> Result<T> {
        self.map_err(|e| SieveError::io(path, operation, e))
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
    fn category_mapping() {
        assert_eq!(
            SieveError::catalog("sources.yml", "empty").category(),
            ErrorCategory::Input
        );
        assert_eq!(
            SieveError::fetch("adaway", "https://example.org/hosts", "404").category(),
            ErrorCategory::Network
        );
        let not_found = io::Error::new(io::ErrorKind::NotFound, "missing");
        assert_eq!(
            SieveError::directory("/nope", not_found).category(),
            ErrorCategory::Io
        );
    }

    #[test]
    fn io_context_is_attached() {
        let res: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        match res.with_path("/tmp/hosts", "open").unwrap_err() {
            SieveError::Io {
                path, operation, ..
            } => {
                assert_eq!(path, "/tmp/hosts");
                assert_eq!(operation, "open");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn display_mentions_source_name() {
        let e = SieveError::fetch("someonewhocares", "http://someonewhocares.org/hosts", "timeout");
        let s = e.to_string();
        assert!(s.contains("someonewhocares"));
        assert!(s.contains("timeout"));
    }
}
