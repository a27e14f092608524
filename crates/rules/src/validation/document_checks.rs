//! Envelope checks: apiVersion and kind.

use crate::schema::{StatusTransformation, POLICY_API_GROUP, POLICY_KIND};

use super::fuzzy::fuzzy_match;
use super::ValidationResult;

pub(super) fn validate_document(policy: &StatusTransformation, result: &mut ValidationResult) {
    if policy.kind != POLICY_KIND {
        match fuzzy_match(&policy.kind, &[POLICY_KIND]) {
            Some(suggestion) => result.error_with_suggestion(
                "kind",
                format!("kind must be '{POLICY_KIND}', got '{}'", policy.kind),
                suggestion,
            ),
            None => result.error("kind", format!("kind must be '{POLICY_KIND}', got '{}'", policy.kind)),
        }
    }

    match policy.api_version.split_once('/') {
        Some((group, _)) if group == POLICY_API_GROUP => {}
        _ => result.warn(
            "apiVersion",
            format!(
                "apiVersion '{}' is not in group '{POLICY_API_GROUP}'",
                policy.api_version
            ),
        ),
    }

    if policy.hooks().is_empty() {
        result.warn("statusConditionHooks", "policy has no hooks");
    }
}
