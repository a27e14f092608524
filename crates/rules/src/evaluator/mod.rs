//! Status condition hook evaluator.
//!
//! Walks the hooks of a policy in declaration order. A hook fires when every
//! one of its matchers matches; its setters and event creators then run in
//! order against the capture groups merged across those matchers.
//!
//! Failures inside a matcher abandon only that hook, failures inside a setter
//! or event creator abandon only that item. Both are recorded and the run
//! continues. The only fatal error is failing to fetch extra resources.

mod error;
pub mod predicate;
pub mod quantifier;
pub mod selector;
mod state;


use std::collections::BTreeMap;

use status_hooks_core::{ObservedObject, OutputCondition, OutputEvent};
use tracing::{debug, info, warn};

use crate::diagnostics::{DiagnosticEntry, Diagnostics, LogLevel, Phase};
use crate::extra::{ExtraResource, ExtraResourceError, ExtraResourceSource, LazyExtraResources};
use crate::schema::{Matcher, StatusConditionHook};
use crate::transform::Transformer;

pub use error::{MatchError, RunFailure};
pub use selector::COMPOSITE_RESOURCE_KEY;
use state::RunState;

/// Named capture groups collected from message patterns.
pub type CapturedGroups = BTreeMap<String, String>;

// ── Condition vocabulary ────────────────────────────────────────────

/// Type of the condition summarising the run.
pub const SUCCESS_CONDITION_TYPE: &str = "StatusTransformationSuccess";

pub const REASON_AVAILABLE: &str = "Available";
pub const REASON_INPUT_FAILURE: &str = "InputFailure";
pub const REASON_MATCH_FAILURE: &str = "MatchFailure";
pub const REASON_SET_CONDITION_FAILURE: &str = "SetConditionFailure";
pub const REASON_OBSERVED_COMPOSITE_FAILURE: &str = "ObservedCompositeFailure";

// ── Inputs and outputs ──────────────────────────────────────────────

static NO_REJECTED: BTreeMap<String, String> = BTreeMap::new();

/// Everything a run reads besides the hooks themselves.
pub struct EvaluationInput<'a> {
    /// Observed objects keyed by id.
    pub observed: &'a BTreeMap<String, ObservedObject>,
    /// Observed ids whose objects could not be converted, with the reason.
    /// Only matchers that select one of them fail.
    pub rejected: &'a BTreeMap<String, String>,
    /// The composite resource, selectable via `includeCompositeAsResource`.
    pub composite: &'a ObservedObject,
    /// Consulted at most once, on the first matcher that wants extra resources.
    pub extra_resources: &'a dyn ExtraResourceSource,
}

impl<'a> EvaluationInput<'a> {
    pub fn new(
        observed: &'a BTreeMap<String, ObservedObject>,
        composite: &'a ObservedObject,
        extra_resources: &'a dyn ExtraResourceSource,
    ) -> Self {
        Self {
            observed,
            rejected: &NO_REJECTED,
            composite,
            extra_resources,
        }
    }

    pub fn with_rejected(mut self, rejected: &'a BTreeMap<String, String>) -> Self {
        self.rejected = rejected;
        self
    }
}

/// Result of a completed run.
#[derive(Debug)]
pub struct EvaluationOutcome {
    /// Emitted conditions in run order, failure conditions inline, the
    /// summary condition last.
    pub conditions: Vec<OutputCondition>,
    pub events: Vec<OutputEvent>,
    pub failures: Vec<RunFailure>,
    pub diagnostics: Diagnostics,
}

impl EvaluationOutcome {
    pub fn succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// The summary condition appended at the end of the run.
    pub fn summary(&self) -> Option<&OutputCondition> {
        self.conditions.last()
    }
}

// ── Hook evaluator ──────────────────────────────────────────────────

/// Evaluates status condition hooks against observed objects.
pub struct HookEvaluator;

impl HookEvaluator {
    /// Run every hook in order.
    ///
    /// Returns an error only when extra resources are needed and cannot be
    /// fetched; no outputs are produced in that case.
    pub fn evaluate(
        hooks: &[StatusConditionHook],
        input: &EvaluationInput<'_>,
    ) -> Result<EvaluationOutcome, ExtraResourceError> {
        let transformer = Transformer::new();
        let mut extra = LazyExtraResources::new(input.extra_resources);
        let mut state = RunState::new();

        for (hook_index, hook) in hooks.iter().enumerate() {
            let Some(groups) = Self::match_hook(hook_index, hook, input, &mut extra, &mut state)? else {
                continue;
            };

            state.note(DiagnosticEntry::new(
                LogLevel::Info,
                Phase::Match,
                hook_index,
                format!("hook matched with {} captured groups", groups.len()),
            ));

            for (index, setter) in hook.set_conditions.iter().enumerate() {
                let condition_type = &setter.condition.condition_type;
                if state.is_blocked(condition_type, setter.force) {
                    state.note(
                        DiagnosticEntry::new(
                            LogLevel::Debug,
                            Phase::SetCondition,
                            hook_index,
                            format!("condition {} already set and setter is not forceful", condition_type),
                        )
                        .item(index),
                    );
                    continue;
                }

                match transformer.render_condition(setter, &groups) {
                    Ok(condition) => {
                        debug!(hook_index, set_condition_index = index, condition_type = %condition_type, "setting condition");
                        state.emit_condition(condition);
                    }
                    Err(source) => state.record_failure(RunFailure::SetCondition {
                        hook: hook_index,
                        index,
                        source,
                    }),
                }
            }

            for (index, creator) in hook.create_events.iter().enumerate() {
                match transformer.render_event(creator, &groups) {
                    Ok(event) => {
                        debug!(hook_index, create_event_index = index, severity = %event.severity, "creating event");
                        state.emit_event(event);
                    }
                    Err(source) => state.record_failure(RunFailure::CreateEvent {
                        hook: hook_index,
                        index,
                        source,
                    }),
                }
            }
        }

        let outcome = state.finish();
        info!(
            hooks = hooks.len(),
            conditions = outcome.conditions.len(),
            events = outcome.events.len(),
            failures = outcome.failures.len(),
            "evaluated status condition hooks"
        );
        Ok(outcome)
    }

    /// AND every matcher of a hook. `Ok(None)` means the hook does not fire,
    /// which includes a hook with no matchers and a matcher that failed.
    fn match_hook(
        hook_index: usize,
        hook: &StatusConditionHook,
        input: &EvaluationInput<'_>,
        extra: &mut LazyExtraResources<'_>,
        state: &mut RunState,
    ) -> Result<Option<CapturedGroups>, ExtraResourceError> {
        if hook.matchers.is_empty() {
            debug!(hook_index, "hook has no matchers");
            return Ok(None);
        }

        let mut groups = CapturedGroups::new();
        for (matcher_index, matcher) in hook.matchers.iter().enumerate() {
            let extra_resources = if matcher.include_extra_resources {
                let first_fetch = !extra.is_loaded();
                match extra.get() {
                    Ok(resources) => {
                        if first_fetch {
                            state.note(
                                DiagnosticEntry::new(
                                    LogLevel::Info,
                                    Phase::ExtraResources,
                                    hook_index,
                                    format!("loaded {} extra resources", resources.len()),
                                )
                                .matcher(matcher_index),
                            );
                        }
                        resources
                    }
                    Err(e) => {
                        warn!(hook_index, matcher_index, error = %e, "cannot load extra-resources");
                        return Err(e);
                    }
                }
            } else {
                &[]
            };

            match Self::match_one(matcher, input, extra_resources) {
                Ok(Some(matched)) => groups.extend(matched),
                Ok(None) => {
                    debug!(hook_index, matcher_index, matcher = ?matcher.name, "matcher did not match");
                    return Ok(None);
                }
                Err(source) => {
                    state.record_failure(RunFailure::Match {
                        hook: hook_index,
                        matcher: matcher_index,
                        source,
                    });
                    return Ok(None);
                }
            }
        }

        Ok(Some(groups))
    }

    fn match_one(
        matcher: &Matcher,
        input: &EvaluationInput<'_>,
        extra_resources: &[ExtraResource],
    ) -> Result<Option<CapturedGroups>, MatchError> {
        let selection = selector::select(matcher, input.observed, input.rejected, input.composite, extra_resources)?;
        quantifier::evaluate(matcher.quantifier, &matcher.conditions, &selection)
    }
}
