//! Resolves which objects a matcher applies to.

use std::collections::BTreeMap;

use regex::Regex;
use status_hooks_core::ObservedObject;

use crate::extra::ExtraResource;
use crate::schema::Matcher;

use super::error::MatchError;

/// Synthetic key the composite resource is selected under.
pub const COMPOSITE_RESOURCE_KEY: &str = "status-hooks.reserved-keys.composite-resource";

/// Select the objects `matcher` applies to, keyed by id.
///
/// Each resource pattern is matched (unanchored) against the observed keys
/// and, when the matcher asks for them, against the keys of the extra
/// resources. The composite is added under [`COMPOSITE_RESOURCE_KEY`]
/// regardless of patterns. Keys are ordered, so iteration is lexicographic.
///
/// `rejected` holds observed keys whose objects could not be converted, with
/// the reason. Selecting one of them fails the matcher; unselected ones are
/// never looked at.
pub fn select<'a>(
    matcher: &Matcher,
    observed: &'a BTreeMap<String, ObservedObject>,
    rejected: &BTreeMap<String, String>,
    composite: &'a ObservedObject,
    extra: &'a [ExtraResource],
) -> Result<BTreeMap<String, &'a ObservedObject>, MatchError> {
    let mut selected = BTreeMap::new();

    for (index, resource) in matcher.resources.iter().enumerate() {
        let re = Regex::new(&resource.name)
            .map_err(|source| MatchError::ResourcePattern { index, source })?;

        if let Some((key, reason)) = rejected.iter().find(|(key, _)| re.is_match(key)) {
            return Err(MatchError::ObjectConversion {
                index,
                key: key.clone(),
                reason: reason.clone(),
            });
        }

        for (key, object) in observed {
            if re.is_match(key) {
                selected.insert(key.clone(), object);
            }
        }

        if matcher.include_extra_resources {
            for resource in extra {
                let key = resource.key();
                if re.is_match(&key) {
                    selected.insert(key, &resource.object);
                }
            }
        }
    }

    if matcher.include_composite_as_resource {
        selected.insert(COMPOSITE_RESOURCE_KEY.to_string(), composite);
    }

    Ok(selected)
}
