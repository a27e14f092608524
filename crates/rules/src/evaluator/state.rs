//! Mutable state of a single evaluation run.

use std::collections::HashSet;

use status_hooks_core::{ConditionStatus, OutputCondition, OutputEvent};

use crate::diagnostics::{DiagnosticEntry, Diagnostics, LogLevel, Phase};

use super::error::RunFailure;
use super::{EvaluationOutcome, REASON_AVAILABLE, SUCCESS_CONDITION_TYPE};

/// Outputs and the override table threaded through every hook of one run.
///
/// `conditions_set` is keyed by condition type and shared by all hooks: once
/// a type is set, only a forceful setter may set it again.
#[derive(Debug, Default)]
pub(crate) struct RunState {
    conditions_set: HashSet<String>,
    conditions: Vec<OutputCondition>,
    events: Vec<OutputEvent>,
    failures: Vec<RunFailure>,
    diagnostics: Diagnostics,
}

impl RunState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Whether a setter of `condition_type` must be skipped.
    pub(crate) fn is_blocked(&self, condition_type: &str, force: bool) -> bool {
        !force && self.conditions_set.contains(condition_type)
    }

    pub(crate) fn emit_condition(&mut self, condition: OutputCondition) {
        self.conditions_set.insert(condition.condition_type.clone());
        self.conditions.push(condition);
    }

    pub(crate) fn emit_event(&mut self, event: OutputEvent) {
        self.events.push(event);
    }

    /// Record a non-fatal failure. A failure condition is emitted in place so
    /// every failure stays visible in run order.
    pub(crate) fn record_failure(&mut self, failure: RunFailure) {
        let message = failure.to_string();
        let entry = match &failure {
            RunFailure::Match { hook, matcher, .. } => {
                DiagnosticEntry::new(LogLevel::Error, Phase::Match, *hook, message.clone())
                    .matcher(*matcher)
            }
            RunFailure::SetCondition { hook, index, .. } => {
                DiagnosticEntry::new(LogLevel::Error, Phase::SetCondition, *hook, message.clone())
                    .item(*index)
            }
            RunFailure::CreateEvent { hook, index, .. } => {
                DiagnosticEntry::new(LogLevel::Error, Phase::CreateEvent, *hook, message.clone())
                    .item(*index)
            }
        };
        self.diagnostics.push(entry);

        self.conditions.push(
            OutputCondition::new(SUCCESS_CONDITION_TYPE, ConditionStatus::False, failure.reason())
                .with_message(message),
        );
        self.failures.push(failure);
    }

    pub(crate) fn note(&mut self, entry: DiagnosticEntry) {
        self.diagnostics.push(entry);
    }

    /// Close the run, appending the overall summary condition last.
    pub(crate) fn finish(mut self) -> EvaluationOutcome {
        let summary = match self.failures.last() {
            None => OutputCondition::new(SUCCESS_CONDITION_TYPE, ConditionStatus::True, REASON_AVAILABLE),
            Some(last) => {
                OutputCondition::new(SUCCESS_CONDITION_TYPE, ConditionStatus::False, last.reason())
                    .with_message(last.to_string())
            }
        };
        self.conditions.push(summary);

        EvaluationOutcome {
            conditions: self.conditions,
            events: self.events,
            failures: self.failures,
            diagnostics: self.diagnostics,
        }
    }
}
