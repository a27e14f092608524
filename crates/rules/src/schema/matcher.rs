//! Matcher types: quantifier, resource selection and condition predicates.

use serde::{Deserialize, Serialize};
use status_hooks_core::ConditionStatus;

/// How the resource selection and the condition predicates of a matcher
/// combine.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Quantifier {
    #[serde(rename = "AnyResourceMatchesAnyCondition", alias = "AnyResourceAnyCondition")]
    AnyResourceAnyCondition,
    #[serde(rename = "AnyResourceMatchesAllConditions", alias = "AnyResourceAllConditions")]
    AnyResourceAllConditions,
    #[serde(rename = "AllResourcesMatchAnyCondition", alias = "AllResourcesAnyCondition")]
    AllResourcesAnyCondition,
    #[default]
    #[serde(rename = "AllResourcesMatchAllConditions", alias = "AllResourcesAllConditions")]
    AllResourcesAllConditions,
}

impl Quantifier {
    /// Wire names, in declaration order.
    pub const NAMES: &'static [&'static str] = &[
        "AnyResourceMatchesAnyCondition",
        "AnyResourceMatchesAllConditions",
        "AllResourcesMatchAnyCondition",
        "AllResourcesMatchAllConditions",
    ];
}

impl std::fmt::Display for Quantifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Quantifier::AnyResourceAnyCondition => Self::NAMES[0],
            Quantifier::AnyResourceAllConditions => Self::NAMES[1],
            Quantifier::AllResourcesAnyCondition => Self::NAMES[2],
            Quantifier::AllResourcesAllConditions => Self::NAMES[3],
        };
        write!(f, "{}", name)
    }
}

/// A quantified rule selecting resources and testing their conditions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Matcher {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub quantifier: Quantifier,
    #[serde(default)]
    pub resources: Vec<ResourceMatcher>,
    #[serde(default)]
    pub conditions: Vec<ConditionMatcher>,
    /// Also match against the observed composite resource.
    #[serde(default, alias = "includeSelfAsResource", deserialize_with = "super::null_as_false")]
    pub include_composite_as_resource: bool,
    /// Also match the resource-name patterns against extra resources.
    #[serde(default, deserialize_with = "super::null_as_false")]
    pub include_extra_resources: bool,
}

/// Selects observed resources whose key matches `name` (a regular expression).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ResourceMatcher {
    pub name: String,
}

/// A single type/status/reason/message test. Omitted fields are wildcards.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConditionMatcher {
    #[serde(rename = "type")]
    pub condition_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ConditionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Regular expression searched in the condition message. Named capture
    /// groups become template values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
