//! The four any/all combinations of resources and condition predicates.

use std::collections::BTreeMap;

use status_hooks_core::ObservedObject;
use tracing::debug;

use crate::schema::{ConditionMatcher, Quantifier};

use super::error::MatchError;
use super::predicate;
use super::CapturedGroups;

/// Evaluate `conditions` over `selection` under `quantifier`.
///
/// An empty selection or an empty predicate list never matches. Resources
/// are visited in key order. Captured groups are merged with later entries
/// overwriting earlier ones of the same name.
pub fn evaluate(
    quantifier: Quantifier,
    conditions: &[ConditionMatcher],
    selection: &BTreeMap<String, &ObservedObject>,
) -> Result<Option<CapturedGroups>, MatchError> {
    if selection.is_empty() || conditions.is_empty() {
        debug!(
            resources = selection.len(),
            conditions = conditions.len(),
            "nothing to match against"
        );
        return Ok(None);
    }

    match quantifier {
        Quantifier::AnyResourceAnyCondition => any_resource_any_condition(conditions, selection),
        Quantifier::AnyResourceAllConditions => any_resource_all_conditions(conditions, selection),
        Quantifier::AllResourcesAnyCondition => all_resources_any_condition(conditions, selection),
        Quantifier::AllResourcesAllConditions => all_resources_all_conditions(conditions, selection),
    }
}

fn any_resource_any_condition(
    conditions: &[ConditionMatcher],
    selection: &BTreeMap<String, &ObservedObject>,
) -> Result<Option<CapturedGroups>, MatchError> {
    for (key, object) in selection {
        for (condition_index, condition) in conditions.iter().enumerate() {
            if let Some(groups) = predicate::matches(condition, object)? {
                debug!(resource = %key, condition_index, "resource matched condition");
                return Ok(Some(groups));
            }
        }
    }
    Ok(None)
}

fn any_resource_all_conditions(
    conditions: &[ConditionMatcher],
    selection: &BTreeMap<String, &ObservedObject>,
) -> Result<Option<CapturedGroups>, MatchError> {
    'resources: for (key, object) in selection {
        let mut captured = CapturedGroups::new();
        for condition in conditions {
            match predicate::matches(condition, object)? {
                Some(groups) => captured.extend(groups),
                None => continue 'resources,
            }
        }
        debug!(resource = %key, "resource matched all conditions");
        return Ok(Some(captured));
    }
    Ok(None)
}

fn all_resources_any_condition(
    conditions: &[ConditionMatcher],
    selection: &BTreeMap<String, &ObservedObject>,
) -> Result<Option<CapturedGroups>, MatchError> {
    let mut captured = CapturedGroups::new();
    for (key, object) in selection {
        let mut first = None;
        for condition in conditions {
            if let Some(groups) = predicate::matches(condition, object)? {
                first = Some(groups);
                break;
            }
        }
        match first {
            Some(groups) => captured.extend(groups),
            None => {
                debug!(resource = %key, "resource matched no condition");
                return Ok(None);
            }
        }
    }
    Ok(Some(captured))
}

fn all_resources_all_conditions(
    conditions: &[ConditionMatcher],
    selection: &BTreeMap<String, &ObservedObject>,
) -> Result<Option<CapturedGroups>, MatchError> {
    let mut captured = CapturedGroups::new();
    for (key, object) in selection {
        for (condition_index, condition) in conditions.iter().enumerate() {
            match predicate::matches(condition, object)? {
                Some(groups) => captured.extend(groups),
                None => {
                    debug!(resource = %key, condition_index, "resource did not match condition");
                    return Ok(None);
                }
            }
        }
    }
    Ok(Some(captured))
}
