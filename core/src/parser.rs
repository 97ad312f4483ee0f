//! # Hosts Line Parser
//!
//! Extracts at most one [`Domain`] from a single line of a third-party
//! block-list. Sources disagree on format (`IP<tab>host`, `IP host`, bare
//! hosts, `http://` prefixed hosts, trailing comments), so the parser is
//! deliberately forgiving and never fails: a line without a usable domain
//! simply yields `None`.
//!
//! When several tokens qualify, the **last** one wins. In a hosts file the
//! hostname is the last column, which also makes `IP host` lines pick the
//! host and never the address.

use hostsieve_common::Domain;
use tracing::trace;

const COMMENT_PREFIX: char = '#';
const SCHEMES: [&str; 2] = ["http://", "https://"];

/// Returns the domain carried by `raw`, if any.
pub fn parse_line(raw: &str) -> Option<Domain> {
    let line: String = raw.trim().to_lowercase();

    if line.starts_with(COMMENT_PREFIX) {
        return None;
    }

    let domain: Option<Domain> = tokenize(&line)
        .into_iter()
        .map(str::trim)
        .filter_map(|token| Domain::parse(clean_token(token)))
        .last();

    if let Some(domain) = &domain {
        trace!(line = raw, %domain, "extracted domain");
    }
    domain
}

/// Tab separated lines are split on tabs only; everything else on whitespace runs.
fn tokenize(line: &str) -> Vec<&str> {
    if line.contains('\t') {
        line.split('\t').collect()
    } else {
        line.split_whitespace().collect()
    }
}

/// Strips a scheme prefix, any path after the host and an inline comment.
fn clean_token(token: &str) -> &str {
    let token: &str = token.trim();
    let token: &str = SCHEMES
        .iter()
        .find_map(|scheme| token.strip_prefix(scheme))
        .unwrap_or(token);
    let token: &str = token.split(COMMENT_PREFIX).next().unwrap_or(token);
    let token: &str = token.split('/').next().unwrap_or(token);
    token.trim()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
