//! Single condition predicate against one object.

use regex::Regex;
use status_hooks_core::ObservedObject;
use tracing::debug;

use crate::schema::ConditionMatcher;

use super::error::MatchError;
use super::CapturedGroups;

/// Test `predicate` against the condition of its type on `object`.
///
/// Returns `Ok(None)` on no match, `Ok(Some(groups))` on a match. The groups
/// hold one entry per named capture group in the message pattern; groups that
/// did not take part in the match map to an empty string. A message pattern
/// that does not compile is an error, never a non-match.
pub fn matches(
    predicate: &ConditionMatcher,
    object: &ObservedObject,
) -> Result<Option<CapturedGroups>, MatchError> {
    let condition = object.get_condition(&predicate.condition_type);

    if let Some(reason) = &predicate.reason {
        if *reason != condition.reason {
            debug!(expected = %reason, actual = %condition.reason, "condition reason did not match");
            return Ok(None);
        }
    }

    if let Some(status) = predicate.status {
        if status != condition.status {
            debug!(expected = %status, actual = %condition.status, "condition status did not match");
            return Ok(None);
        }
    }

    let Some(pattern) = &predicate.message else {
        return Ok(Some(CapturedGroups::new()));
    };

    let re = Regex::new(pattern).map_err(MatchError::MessagePattern)?;
    let Some(caps) = re.captures(&condition.message) else {
        debug!(pattern = %pattern, message = %condition.message, "condition message did not match");
        return Ok(None);
    };

    let groups: CapturedGroups = re
        .capture_names()
        .flatten()
        .map(|name| {
            let value = caps.name(name).map(|m| m.as_str()).unwrap_or_default();
            (name.to_string(), value.to_string())
        })
        .collect();

    debug!(captured = groups.len(), "condition matched");
    Ok(Some(groups))
}
