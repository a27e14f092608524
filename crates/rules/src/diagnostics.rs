//! Structured record of what happened during one evaluation.
//!
//! The evaluator returns this alongside its outputs instead of writing to a
//! logger handed in by the caller. Every entry is also emitted as a
//! `tracing` event with the same fields.

use serde::{Deserialize, Serialize};

/// Severity level for diagnostic entries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// Stage of the run that produced the entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Match,
    SetCondition,
    CreateEvent,
    ExtraResources,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Match => write!(f, "match"),
            Phase::SetCondition => write!(f, "set_condition"),
            Phase::CreateEvent => write!(f, "create_event"),
            Phase::ExtraResources => write!(f, "extra_resources"),
        }
    }
}

/// A single diagnostic entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticEntry {
    pub level: LogLevel,
    pub phase: Phase,
    pub hook_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_index: Option<usize>,
    pub message: String,
}

impl DiagnosticEntry {
    pub fn new(level: LogLevel, phase: Phase, hook_index: usize, message: impl Into<String>) -> Self {
        Self {
            level,
            phase,
            hook_index,
            matcher_index: None,
            item_index: None,
            message: message.into(),
        }
    }

    pub fn matcher(mut self, index: usize) -> Self {
        self.matcher_index = Some(index);
        self
    }

    pub fn item(mut self, index: usize) -> Self {
        self.item_index = Some(index);
        self
    }
}

/// Ordered diagnostics for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub entries: Vec<DiagnosticEntry>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and mirror it to `tracing`.
    pub fn push(&mut self, entry: DiagnosticEntry) {
        let phase = entry.phase;
        let hook_index = entry.hook_index;
        let matcher_index = entry.matcher_index;
        let item_index = entry.item_index;
        match entry.level {
            LogLevel::Debug => {
                tracing::debug!(%phase, hook_index, ?matcher_index, ?item_index, "{}", entry.message)
            }
            LogLevel::Info => {
                tracing::info!(%phase, hook_index, ?matcher_index, ?item_index, "{}", entry.message)
            }
            LogLevel::Warning => {
                tracing::warn!(%phase, hook_index, ?matcher_index, ?item_index, "{}", entry.message)
            }
            LogLevel::Error => {
                tracing::error!(%phase, hook_index, ?matcher_index, ?item_index, "{}", entry.message)
            }
        }
        self.entries.push(entry);
    }

    /// Entries at or above `min_level`, optionally restricted to one phase.
    pub fn query(&self, min_level: LogLevel, phase: Option<Phase>) -> Vec<&DiagnosticEntry> {
        self.entries
            .iter()
            .filter(|e| e.level >= min_level)
            .filter(|e| phase.is_none_or(|p| e.phase == p))
            .collect()
    }

    /// Number of error-level entries.
    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.level == LogLevel::Error)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_filters_by_level_and_phase() {
        let mut d = Diagnostics::new();
        d.push(DiagnosticEntry::new(LogLevel::Debug, Phase::Match, 0, "hook matched"));
        d.push(DiagnosticEntry::new(LogLevel::Error, Phase::SetCondition, 0, "bad template").item(1));
        d.push(DiagnosticEntry::new(LogLevel::Warning, Phase::Match, 1, "skipped").matcher(2));

        assert_eq!(d.len(), 3);
        assert_eq!(d.query(LogLevel::Warning, None).len(), 2);
        assert_eq!(d.query(LogLevel::Debug, Some(Phase::Match)).len(), 2);
        assert_eq!(d.query(LogLevel::Error, Some(Phase::Match)).len(), 0);
        assert_eq!(d.error_count(), 1);
    }

    #[test]
    fn entry_serializes_without_missing_indices() {
        let e = DiagnosticEntry::new(LogLevel::Info, Phase::CreateEvent, 3, "ok");
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["phase"], "create_event");
        assert_eq!(json["level"], "info");
        assert!(json.get("matcher_index").is_none());
    }
}
