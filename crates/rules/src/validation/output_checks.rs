//! Setter and event creator checks.

use crate::schema::StatusConditionHook;
use crate::templating::MessageRenderer;

use super::fuzzy::fuzzy_match;
use super::ValidationResult;

const STATUSES: &[&str] = &["True", "False", "Unknown"];
const EVENT_TYPES: &[&str] = &["Normal", "Warning"];

pub(super) fn validate_outputs(hook: &StatusConditionHook, path: &str, result: &mut ValidationResult) {
    let renderer = MessageRenderer::new();

    for (index, setter) in hook.set_conditions.iter().enumerate() {
        let path = format!("{path}.setConditions[{index}].condition");
        let condition = &setter.condition;

        if condition.condition_type.is_empty() {
            result.error(format!("{path}.type"), "condition type is required");
        }

        if !STATUSES.contains(&condition.status.as_str()) {
            let hint = fuzzy_match(&condition.status, STATUSES)
                .map(|s| format!(" (did you mean '{s}'?)"))
                .unwrap_or_default();
            result.warn(
                format!("{path}.status"),
                format!("status '{}' will be reported as Unknown{hint}", condition.status),
            );
        }

        if let Some(message) = &condition.message {
            if let Err(e) = renderer.validate(message) {
                result.error(format!("{path}.message"), e.to_string());
            }
        }
    }

    for (index, creator) in hook.create_events.iter().enumerate() {
        let path = format!("{path}.createEvents[{index}].event");
        let event = &creator.event;

        if let Some(event_type) = &event.event_type {
            if !EVENT_TYPES.contains(&event_type.as_str()) {
                let message = format!("invalid type {event_type}, must be one of [Normal, Warning]");
                match fuzzy_match(event_type, EVENT_TYPES) {
                    Some(suggestion) => result.error_with_suggestion(format!("{path}.type"), message, suggestion),
                    None => result.error(format!("{path}.type"), message),
                }
            }
        }

        if let Err(e) = renderer.validate(&event.message) {
            result.error(format!("{path}.message"), e.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use status_hooks_core::Target;

    use super::*;
    use crate::schema::{ConditionSetter, EventCreator, EventSpec, SetConditionSpec};

    fn hook_with_event(event_type: &str) -> StatusConditionHook {
        StatusConditionHook {
            create_events: vec![EventCreator {
                target: Target::Composite,
                event: EventSpec {
                    event_type: Some(event_type.to_string()),
                    reason: None,
                    message: "msg".to_string(),
                },
            }],
            ..Default::default()
        }
    }

    #[test]
    fn unknown_event_type_without_suggestion() {
        let mut result = ValidationResult::new();
        validate_outputs(&hook_with_event("Bogus"), "h", &mut result);
        assert!(!result.valid);
        assert!(result.errors[0].suggestion.is_none());
        assert_eq!(result.errors[0].message, "invalid type Bogus, must be one of [Normal, Warning]");
    }

    #[test]
    fn empty_status_warns() {
        let hook = StatusConditionHook {
            set_conditions: vec![ConditionSetter {
                target: Target::Composite,
                force: false,
                condition: SetConditionSpec {
                    condition_type: "Ready".to_string(),
                    status: String::new(),
                    reason: String::new(),
                    message: None,
                },
            }],
            ..Default::default()
        };
        let mut result = ValidationResult::new();
        validate_outputs(&hook, "h", &mut result);
        assert!(result.valid);
        assert_eq!(result.warnings[0].path, "h.setConditions[0].condition.status");
    }
}
