//! Status condition hooks and the conditions/events they emit.

use serde::{Deserialize, Serialize};
use status_hooks_core::Target;

use super::Matcher;

/// One ordered rule: when every matcher succeeds, set the conditions and
/// create the events.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct StatusConditionHook {
    #[serde(default)]
    pub matchers: Vec<Matcher>,
    #[serde(default)]
    pub set_conditions: Vec<ConditionSetter>,
    #[serde(default)]
    pub create_events: Vec<EventCreator>,
}

/// Sets a condition on the target when its hook fires.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConditionSetter {
    #[serde(default)]
    pub target: Target,
    /// Override a condition of the same type set earlier in the run.
    #[serde(default, deserialize_with = "super::null_as_false")]
    pub force: bool,
    pub condition: SetConditionSpec,
}

/// Condition fields to set. `message` may be a template over captured groups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SetConditionSpec {
    #[serde(rename = "type")]
    pub condition_type: String,
    /// `True`, `False` or `Unknown`; anything else renders as `Unknown`.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Creates an event on the target when its hook fires.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EventCreator {
    #[serde(default)]
    pub target: Target,
    pub event: EventSpec,
}

/// Event fields to emit. `type` is checked at render time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EventSpec {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub message: String,
}
