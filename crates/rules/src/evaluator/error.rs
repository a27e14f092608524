use crate::transform::RenderError;

/// Errors that abort a single matcher evaluation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MatchError {
    #[error("cannot compile resource key regex, resourcesIndex: {index}: {source}")]
    ResourcePattern {
        index: usize,
        #[source]
        source: regex::Error,
    },

    #[error("cannot convert resource to object, resourcesIndex: {index}, observedMapKey: {key}: {reason}")]
    ObjectConversion {
        index: usize,
        key: String,
        reason: String,
    },

    #[error("cannot compile message regex: {0}")]
    MessagePattern(#[source] regex::Error),
}

/// A non-fatal failure recorded during a run, with its position in the
/// policy.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RunFailure {
    #[error("cannot match resources, statusConditionHookIndex: {hook}, matchConditionIndex: {matcher}: {source}")]
    Match {
        hook: usize,
        matcher: usize,
        source: MatchError,
    },

    #[error("cannot set condition, statusConditionHookIndex: {hook}, setConditionIndex: {index}: {source}")]
    SetCondition {
        hook: usize,
        index: usize,
        source: RenderError,
    },

    #[error("cannot create event, statusConditionHookIndex: {hook}, createEventIndex: {index}: {source}")]
    CreateEvent {
        hook: usize,
        index: usize,
        source: RenderError,
    },
}

impl RunFailure {
    /// Condition reason reported for this failure.
    pub fn reason(&self) -> &'static str {
        match self {
            RunFailure::Match { .. } => super::REASON_MATCH_FAILURE,
            RunFailure::SetCondition { .. } | RunFailure::CreateEvent { .. } => {
                super::REASON_SET_CONDITION_FAILURE
            }
        }
    }

    pub fn hook_index(&self) -> usize {
        match self {
            RunFailure::Match { hook, .. }
            | RunFailure::SetCondition { hook, .. }
            | RunFailure::CreateEvent { hook, .. } => *hook,
        }
    }
}
