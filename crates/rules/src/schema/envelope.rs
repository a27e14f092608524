//! Policy envelope for lightweight first-pass deserialization.

use serde::{Deserialize, Serialize};

/// Reads only the header fields of a policy document.
///
/// Used during two-pass loading: check `kind` first, then deserialize the
/// full document so a wrong kind is reported as such instead of as a list of
/// unknown fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyEnvelope {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
}

impl PolicyEnvelope {
    /// API group part of `apiVersion` (before the `/`).
    pub fn api_group(&self) -> &str {
        self.api_version
            .split_once('/')
            .map(|(group, _)| group)
            .unwrap_or("")
    }
}
