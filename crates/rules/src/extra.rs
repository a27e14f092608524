//! Extra resources: objects supplied alongside the observed set, addressed
//! by a composite key built from their grouping label and coordinates.

use serde_json::Value;
use status_hooks_core::ObservedObject;
use tracing::debug;

/// Request-context key holding the extra resources, grouped by label.
pub const EXTRA_RESOURCES_CONTEXT_KEY: &str = "apiextensions.crossplane.io/extra-resources";

/// Errors while obtaining extra resources. Fatal for the run.
#[derive(Debug, thiserror::Error)]
pub enum ExtraResourceError {
    #[error("unexpected extra-resources type: {0}")]
    UnexpectedType(String),

    #[error("unexpected extra-resources value type for {key}: {found}")]
    UnexpectedValue { key: String, found: String },

    #[error("unexpected extra-resources value type for {key} [{index}]: {reason}")]
    UnexpectedItem {
        key: String,
        index: usize,
        reason: String,
    },
}

/// An extra resource and the label it was grouped under.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraResource {
    pub into: String,
    pub object: ObservedObject,
}

impl ExtraResource {
    pub fn new(into: impl Into<String>, object: ObservedObject) -> Self {
        Self {
            into: into.into(),
            object,
        }
    }

    /// Key matched by resource-name patterns, e.g.
    /// `extra-resource.deployments.apps.Deployment.default.web`.
    pub fn key(&self) -> String {
        [
            "extra-resource",
            self.into.as_str(),
            self.object.group(),
            self.object.kind.as_str(),
            self.object.namespace.as_str(),
            self.object.name.as_str(),
        ]
        .join(".")
    }
}

/// Supplies extra resources on demand.
pub trait ExtraResourceSource {
    fn fetch(&self) -> Result<Vec<ExtraResource>, ExtraResourceError>;
}

impl ExtraResourceSource for Vec<ExtraResource> {
    fn fetch(&self) -> Result<Vec<ExtraResource>, ExtraResourceError> {
        Ok(self.clone())
    }
}

/// No extra resources at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoExtraResources;

impl ExtraResourceSource for NoExtraResources {
    fn fetch(&self) -> Result<Vec<ExtraResource>, ExtraResourceError> {
        Ok(Vec::new())
    }
}

/// Extra resources read from a request context map.
pub struct ContextExtraResources<'a> {
    context: &'a serde_json::Map<String, Value>,
}

impl<'a> ContextExtraResources<'a> {
    pub fn new(context: &'a serde_json::Map<String, Value>) -> Self {
        Self { context }
    }
}

impl ExtraResourceSource for ContextExtraResources<'_> {
    fn fetch(&self) -> Result<Vec<ExtraResource>, ExtraResourceError> {
        let Some(raw) = self.context.get(EXTRA_RESOURCES_CONTEXT_KEY) else {
            return Ok(Vec::new());
        };

        let groups = raw
            .as_object()
            .ok_or_else(|| ExtraResourceError::UnexpectedType(json_kind(raw).to_string()))?;

        let mut resources = Vec::new();
        for (into, items) in groups {
            let items = items.as_array().ok_or_else(|| ExtraResourceError::UnexpectedValue {
                key: into.clone(),
                found: json_kind(items).to_string(),
            })?;
            for (index, item) in items.iter().enumerate() {
                let object = ObservedObject::from_unstructured(item).map_err(|e| {
                    ExtraResourceError::UnexpectedItem {
                        key: into.clone(),
                        index,
                        reason: e.to_string(),
                    }
                })?;
                resources.push(ExtraResource::new(into.clone(), object));
            }
        }

        debug!(count = resources.len(), "loaded extra resources");
        Ok(resources)
    }
}

/// Fetches from a source at most once, the first time it is asked.
pub struct LazyExtraResources<'a> {
    source: &'a dyn ExtraResourceSource,
    loaded: Option<Vec<ExtraResource>>,
}

impl<'a> LazyExtraResources<'a> {
    pub fn new(source: &'a dyn ExtraResourceSource) -> Self {
        Self {
            source,
            loaded: None,
        }
    }

    /// Resources from the source, fetched on first call and cached.
    pub fn get(&mut self) -> Result<&[ExtraResource], ExtraResourceError> {
        if self.loaded.is_none() {
            self.loaded = Some(self.source.fetch()?);
        }
        Ok(self.loaded.as_deref().unwrap_or_default())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
