//! Turns the setters and event creators of a fired hook into output items.

use status_hooks_core::{ConditionStatus, OutputCondition, OutputEvent, Severity};

use crate::evaluator::CapturedGroups;
use crate::schema::{ConditionSetter, EventCreator};
use crate::templating::{MessageRenderer, TemplateError};

/// Errors from rendering a single condition or event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("invalid type {0}, must be one of [Normal, Warning]")]
    InvalidEventType(String),
}

/// Renders [`ConditionSetter`]s and [`EventCreator`]s against the groups
/// captured by a hook's matchers.
#[derive(Debug, Default)]
pub struct Transformer {
    renderer: MessageRenderer,
}

impl Transformer {
    pub fn new() -> Self {
        Self {
            renderer: MessageRenderer::new(),
        }
    }

    /// Build the condition a setter describes.
    pub fn render_condition(
        &self,
        setter: &ConditionSetter,
        groups: &CapturedGroups,
    ) -> Result<OutputCondition, RenderError> {
        let spec = &setter.condition;
        let message = self.template_message(spec.message.as_deref(), groups)?;

        Ok(OutputCondition {
            condition_type: spec.condition_type.clone(),
            status: ConditionStatus::from_lossy(&spec.status),
            reason: spec.reason.clone(),
            message,
            target: setter.target,
        })
    }

    /// Build the event a creator describes. The type must be `Normal`,
    /// `Warning` or omitted (Normal).
    pub fn render_event(
        &self,
        creator: &EventCreator,
        groups: &CapturedGroups,
    ) -> Result<OutputEvent, RenderError> {
        let spec = &creator.event;
        let severity = match spec.event_type.as_deref() {
            None | Some("Normal") => Severity::Normal,
            Some("Warning") => Severity::Warning,
            Some(other) => return Err(RenderError::InvalidEventType(other.to_string())),
        };

        let message = self.renderer.render(&spec.message, groups)?;

        Ok(OutputEvent {
            severity,
            reason: spec.reason.clone(),
            message,
            target: creator.target,
        })
    }

    fn template_message(
        &self,
        message: Option<&str>,
        groups: &CapturedGroups,
    ) -> Result<Option<String>, TemplateError> {
        message
            .map(|m| self.renderer.render(m, groups))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{EventSpec, SetConditionSpec};
    use status_hooks_core::Target;

    fn setter(status: &str, message: Option<&str>) -> ConditionSetter {
        ConditionSetter {
            target: Target::default(),
            force: false,
            condition: SetConditionSpec {
                condition_type: "CustomReady".to_string(),
                status: status.to_string(),
                reason: "InternalError".to_string(),
                message: message.map(str::to_string),
            },
        }
    }

    fn creator(event_type: Option<&str>, message: &str) -> EventCreator {
        EventCreator {
            target: Target::CompositeAndClaim,
            event: EventSpec {
                event_type: event_type.map(str::to_string),
                reason: Some("InternalError".to_string()),
                message: message.to_string(),
            },
        }
    }

    fn groups(pairs: &[(&str, &str)]) -> CapturedGroups {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn condition_status_mapping() {
        let t = Transformer::new();
        let none = CapturedGroups::new();
        assert_eq!(t.render_condition(&setter("True", None), &none).unwrap().status, ConditionStatus::True);
        assert_eq!(t.render_condition(&setter("False", None), &none).unwrap().status, ConditionStatus::False);
        assert_eq!(t.render_condition(&setter("", None), &none).unwrap().status, ConditionStatus::Unknown);
        assert_eq!(t.render_condition(&setter("Sideways", None), &none).unwrap().status, ConditionStatus::Unknown);
    }

    #[test]
    fn condition_defaults_to_composite_target() {
        let t = Transformer::new();
        let c = t.render_condition(&setter("True", None), &CapturedGroups::new()).unwrap();
        assert_eq!(c.target, Target::Composite);
        assert!(c.message.is_none());
    }

    #[test]
    fn condition_message_uses_groups() {
        let t = Transformer::new();
        let c = t
            .render_condition(&setter("False", Some("{{ .Error }}")), &groups(&[("Error", "boom")]))
            .unwrap();
        assert_eq!(c.message.as_deref(), Some("boom"));
    }

    #[test]
    fn condition_template_error_propagates() {
        let t = Transformer::new();
        let err = t
            .render_condition(&setter("False", Some("{{ .Error }")), &groups(&[("Error", "boom")]))
            .unwrap_err();
        assert!(matches!(err, RenderError::Template(TemplateError::Parse(_))));
    }

    #[test]
    fn event_type_defaults_to_normal() {
        let t = Transformer::new();
        let e = t.render_event(&creator(None, "hello"), &CapturedGroups::new()).unwrap();
        assert_eq!(e.severity, Severity::Normal);
        assert_eq!(e.target, Target::CompositeAndClaim);
        assert_eq!(e.message, "hello");
    }

    #[test]
    fn warning_event() {
        let t = Transformer::new();
        let e = t
            .render_event(&creator(Some("Warning"), "{{ .Error }}"), &groups(&[("Error", "boom")]))
            .unwrap();
        assert_eq!(e.severity, Severity::Warning);
        assert_eq!(e.message, "boom");
    }

    #[test]
    fn invalid_event_type_is_rejected() {
        let t = Transformer::new();
        let err = t
            .render_event(&creator(Some("Bogus"), "x"), &CapturedGroups::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid type Bogus, must be one of [Normal, Warning]");
    }
}
