//! Minijinja rendering of condition and event message templates.
//!
//! Template values are the named capture groups collected while matching.
//! Placeholders may be written Go-style (`{{ .Error }}`) or plain
//! (`{{ Error }}`); the leading dot is stripped before parsing. Only `{{ }}`
//! is template syntax: `{%` and `{#` in a message are literal text, and a
//! trailing newline is kept.
//!
//! Templates are arbitrary strings (not pre-registered), so a fresh
//! [`minijinja::Environment`] is created per render call.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Matches the opening of a Go-style field placeholder: `{{ .Name`, `{{- .Name`.
static DOT_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"\{\{(-?)(\s*)\.([A-Za-z_][A-Za-z0-9_]*)") {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    }
});

/// Block and comment openers, which messages treat as literal text.
static LITERAL_OPENER_RE: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"\{[%#]") {
    Ok(re) => re,
    Err(_) => unreachable!("static regex pattern"),
});

/// Errors produced while parsing or executing a message template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("cannot parse template: {0}")]
    Parse(String),

    #[error("cannot execute template: {0}")]
    Execute(String),
}

/// Renders message templates against captured groups.
#[derive(Debug, Default)]
pub struct MessageRenderer {
    _private: (),
}

impl MessageRenderer {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Build a minijinja environment with the filters templates may use.
    fn build_env() -> minijinja::Environment<'static> {
        let mut env = minijinja::Environment::new();
        env.set_keep_trailing_newline(true);
        env.add_filter("lower", lower_filter);
        env.add_filter("upper", upper_filter);
        env.add_filter("trim", trim_filter);
        env
    }

    /// Render `template` with `values` in scope.
    ///
    /// With no values the template is returned unchanged: there is nothing
    /// to substitute, and literal braces in a plain message stay intact.
    ///
    /// A placeholder naming a group that was not captured renders as an
    /// empty string, not as `<no value>`.
    pub fn render(&self, template: &str, values: &BTreeMap<String, String>) -> Result<String, TemplateError> {
        if values.is_empty() {
            return Ok(template.to_string());
        }

        let source = normalize_placeholders(template);
        let env = Self::build_env();
        let tmpl = env
            .template_from_str(&source)
            .map_err(|e| TemplateError::Parse(e.to_string()))?;
        tmpl.render(values)
            .map_err(|e| TemplateError::Execute(e.to_string()))
    }

    /// Validate that a template string parses, without evaluating it.
    pub fn validate(&self, template: &str) -> Result<(), TemplateError> {
        let source = normalize_placeholders(template);
        let env = Self::build_env();
        env.template_from_str(&source)
            .map_err(|e| TemplateError::Parse(e.to_string()))?;
        Ok(())
    }
}

/// Rewrite `{{ .Name }}` into `{{ Name }}` and quote `{%` and `{#` so they
/// render as themselves.
pub(crate) fn normalize_placeholders(template: &str) -> Cow<'_, str> {
    let quoted = LITERAL_OPENER_RE.replace_all(template, "{{ '${0}' }}");
    let rewritten = match DOT_FIELD_RE.replace_all(&quoted, "{{${1}${2}${3}") {
        Cow::Borrowed(_) => None,
        Cow::Owned(rewritten) => Some(rewritten),
    };
    match rewritten {
        Some(rewritten) => Cow::Owned(rewritten),
        None => quoted,
    }
}

fn lower_filter(value: String) -> String {
    value.to_lowercase()
}

fn upper_filter(value: String) -> String {
    value.to_uppercase()
}

fn trim_filter(value: String) -> String {
    value.trim().to_string()
}
