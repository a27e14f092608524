//! Matcher checks: patterns compile, and the matcher can match at all.

use regex::Regex;

use crate::schema::Matcher;

use super::ValidationResult;

pub(super) fn validate_matcher(matcher: &Matcher, path: &str, result: &mut ValidationResult) {
    for (index, resource) in matcher.resources.iter().enumerate() {
        if let Err(e) = Regex::new(&resource.name) {
            result.error(
                format!("{path}.resources[{index}].name"),
                format!("cannot compile resource key regex: {e}"),
            );
        }
    }

    let selects_nothing = matcher.resources.is_empty() && !matcher.include_composite_as_resource;
    if selects_nothing {
        result.warn(
            format!("{path}.resources"),
            "matcher selects no resources and will never match",
        );
    }
    if matcher.resources.is_empty() && matcher.include_extra_resources && !matcher.include_composite_as_resource {
        result.warn(
            format!("{path}.includeExtraResources"),
            "extra resources are only selected through resource name patterns",
        );
    }

    if matcher.conditions.is_empty() {
        result.warn(
            format!("{path}.conditions"),
            "matcher has no conditions and will never match",
        );
    }

    for (index, condition) in matcher.conditions.iter().enumerate() {
        if condition.condition_type.is_empty() {
            result.error(format!("{path}.conditions[{index}].type"), "condition type is required");
        }
        if let Some(message) = &condition.message {
            if let Err(e) = Regex::new(message) {
                result.error(
                    format!("{path}.conditions[{index}].message"),
                    format!("cannot compile message regex: {e}"),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::{ConditionMatcher, ResourceMatcher};

    use super::*;

    fn condition(message: Option<&str>) -> ConditionMatcher {
        ConditionMatcher {
            condition_type: "Synced".to_string(),
            message: message.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn composite_only_matcher_is_fine() {
        let matcher = Matcher {
            include_composite_as_resource: true,
            conditions: vec![condition(None)],
            ..Default::default()
        };
        let mut result = ValidationResult::new();
        validate_matcher(&matcher, "m", &mut result);
        assert!(result.valid);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn empty_matcher_warns_twice() {
        let mut result = ValidationResult::new();
        validate_matcher(&Matcher::default(), "m", &mut result);
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn lookaround_is_rejected() {
        let matcher = Matcher {
            resources: vec![ResourceMatcher { name: "mr".to_string() }],
            conditions: vec![condition(Some("a bad regex (?!)"))],
            ..Default::default()
        };
        let mut result = ValidationResult::new();
        validate_matcher(&matcher, "m", &mut result);
        assert!(!result.valid);
        assert_eq!(result.errors[0].path, "m.conditions[0].message");
    }
}
