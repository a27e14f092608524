//! The policy document: an ordered list of status condition hooks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::StatusConditionHook;

/// Document `kind` accepted by the loader.
pub const POLICY_KIND: &str = "StatusTransformation";

/// API group the policy schema is published under.
pub const POLICY_API_GROUP: &str = "function-status-transformer.fn.crossplane.io";

/// Top-level policy document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct StatusTransformation {
    pub api_version: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PolicyMetadata>,
    #[serde(default)]
    pub status_condition_hooks: Vec<StatusConditionHook>,
}

/// Object metadata. Policies are often stored as cluster objects, so any
/// other metadata field (`uid`, `resourceVersion`, ...) is accepted and
/// ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PolicyMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl StatusTransformation {
    /// Hooks in declaration order.
    pub fn hooks(&self) -> &[StatusConditionHook] {
        &self.status_condition_hooks
    }

    /// Human-readable name for logs: `metadata.name`, or the kind.
    pub fn display_name(&self) -> &str {
        self.metadata
            .as_ref()
            .and_then(|m| m.name.as_deref())
            .unwrap_or(&self.kind)
    }

    /// Serialize this document to YAML.
    pub fn to_yaml(&self) -> std::result::Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
