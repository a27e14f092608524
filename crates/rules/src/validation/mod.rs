//! Static policy validation with structured errors and suggestions.
//!
//! Catches at load time what would otherwise only surface as failure
//! conditions during a run: patterns that do not compile, templates that do
//! not parse, unknown event types. Returns a [`ValidationResult`] with errors
//! (the policy will fail at runtime) and warnings (it runs, but probably not
//! as intended).

mod document_checks;
mod matcher_checks;
mod output_checks;

pub mod fuzzy;

use serde::{Deserialize, Serialize};

use crate::loader::PolicyLoader;
use crate::schema::StatusTransformation;

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A blocking validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// JSON-path-like location, e.g. `"statusConditionHooks[0].matchers[1]"`.
    pub path: String,
    pub message: String,
    /// Optional "Did you mean …?" suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// A result holding a single error, e.g. for a document that did not parse.
    pub fn failed(message: impl Into<String>) -> Self {
        let mut result = Self::new();
        result.error("", message);
        result
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        });
    }

    pub(crate) fn error_with_suggestion(
        &mut self,
        path: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: Some(suggestion.into()),
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Validate a parsed [`StatusTransformation`].
pub fn validate_policy(policy: &StatusTransformation) -> ValidationResult {
    let mut result = ValidationResult::new();
    document_checks::validate_document(policy, &mut result);

    for (hook_index, hook) in policy.hooks().iter().enumerate() {
        let path = format!("statusConditionHooks[{hook_index}]");
        if hook.matchers.is_empty() {
            result.warn(&path, "hook has no matchers and will never fire");
        }
        for (matcher_index, matcher) in hook.matchers.iter().enumerate() {
            matcher_checks::validate_matcher(matcher, &format!("{path}.matchers[{matcher_index}]"), &mut result);
        }
        output_checks::validate_outputs(hook, &path, &mut result);
    }

    result
}

/// Parse YAML or JSON text and validate. Parse errors become validation errors.
pub fn validate_yaml(yaml: &str) -> ValidationResult {
    match PolicyLoader::parse_str(yaml) {
        Ok(policy) => validate_policy(&policy),
        Err(e) => ValidationResult::failed(format!("parse error: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "apiVersion: function-status-transformer.fn.crossplane.io/v1beta1\nkind: StatusTransformation\n";

    fn validate(body: &str) -> ValidationResult {
        validate_yaml(&format!("{HEADER}{body}"))
    }

    #[test]
    fn clean_policy_is_valid() {
        let result = validate(
            r#"
statusConditionHooks:
  - matchers:
      - resources:
          - name: example-mr
        conditions:
          - type: Synced
            status: "False"
            message: "Something went wrong: (?P<Error>.+)"
    setConditions:
      - condition:
          type: CustomReady
          status: "False"
          reason: InternalError
          message: "{{ .Error }}"
    createEvents:
      - event:
          type: Warning
          message: "{{ .Error }}"
"#,
        );
        assert!(result.valid, "{:?}", result.errors);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn parse_error_is_reported() {
        let result = validate_yaml("kind: [");
        assert!(!result.valid);
        assert!(result.errors[0].message.starts_with("parse error"));
    }

    #[test]
    fn all_problems_are_collected() {
        let result = validate(
            r#"
statusConditionHooks:
  - matchers:
      - resources:
          - name: "(unclosed"
        conditions:
          - type: Synced
            message: "(?!x)"
    setConditions:
      - condition:
          type: CustomReady
          status: "Flase"
          message: "{{ .Error }"
    createEvents:
      - event:
          type: Warnign
          message: hi
  - setConditions:
      - condition:
          type: Other
          status: "True"
"#,
        );
        assert!(!result.valid);
        let paths: Vec<_> = result.errors.iter().map(|e| e.path.as_str()).collect();
        assert!(paths.contains(&"statusConditionHooks[0].matchers[0].resources[0].name"));
        assert!(paths.contains(&"statusConditionHooks[0].matchers[0].conditions[0].message"));
        assert!(paths.contains(&"statusConditionHooks[0].setConditions[0].condition.message"));
        assert!(paths.contains(&"statusConditionHooks[0].createEvents[0].event.type"));

        let event_error = result
            .errors
            .iter()
            .find(|e| e.path.ends_with("event.type"))
            .unwrap();
        assert_eq!(event_error.suggestion.as_deref(), Some("Warning"));

        let warning_paths: Vec<_> = result.warnings.iter().map(|w| w.path.as_str()).collect();
        assert!(warning_paths.contains(&"statusConditionHooks[0].setConditions[0].condition.status"));
        assert!(warning_paths.contains(&"statusConditionHooks[1]"));
    }
}
