use serde::{Deserialize, Serialize};

/// One remote hosts file listed in the source catalog.
///
/// `name` doubles as the file name the fetched content is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
