use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};

/// Status of a condition, as reported by the object that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

impl ConditionStatus {
    /// Map a raw status string. Anything that is not `True` or `False`
    /// becomes `Unknown`.
    pub fn from_lossy(s: &str) -> Self {
        match s {
            "True" => ConditionStatus::True,
            "False" => ConditionStatus::False,
            _ => ConditionStatus::Unknown,
        }
    }
}

impl std::fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConditionStatus::True => write!(f, "True"),
            ConditionStatus::False => write!(f, "False"),
            ConditionStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Observed statuses are not validated: `"true"` or `"Maybe"` read as
/// `Unknown` rather than failing the whole object.
fn lossy_status<'de, D>(deserializer: D) -> std::result::Result<ConditionStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(ConditionStatus::from_lossy).unwrap_or_default())
}

/// One named status fact on an observed object.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    #[serde(default, deserialize_with = "lossy_status")]
    pub status: ConditionStatus,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
}

impl Condition {
    /// The condition reported for a type the object does not carry.
    pub fn unknown(condition_type: &str) -> Self {
        Self {
            condition_type: condition_type.to_string(),
            ..Default::default()
        }
    }
}

/// An object whose status conditions are matched by hooks.
///
/// Only the coordinates needed to address the object and its
/// `status.conditions` are kept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedObject {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl ObservedObject {
    /// Build an object carrying only conditions.
    pub fn with_conditions(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            ..Default::default()
        }
    }

    /// Convert an unstructured object (`apiVersion`, `kind`, `metadata`,
    /// `status.conditions`) into an [`ObservedObject`].
    pub fn from_unstructured(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| CoreError::ObjectConversion(format!("expected an object, got {}", kind_of(value))))?;

        let str_field = |v: Option<&Value>, field: &str| -> Result<String> {
            match v {
                None | Some(Value::Null) => Ok(String::new()),
                Some(Value::String(s)) => Ok(s.clone()),
                Some(other) => Err(CoreError::ObjectConversion(format!(
                    "{} must be a string, got {}",
                    field,
                    kind_of(other)
                ))),
            }
        };

        let metadata = obj.get("metadata");
        let conditions = match obj.get("status").and_then(|s| s.get("conditions")) {
            None | Some(Value::Null) => Vec::new(),
            Some(raw) => serde_json::from_value::<Vec<Condition>>(raw.clone())
                .map_err(|e| CoreError::ObjectConversion(format!("status.conditions: {}", e)))?,
        };

        Ok(Self {
            api_version: str_field(obj.get("apiVersion"), "apiVersion")?,
            kind: str_field(obj.get("kind"), "kind")?,
            namespace: str_field(metadata.and_then(|m| m.get("namespace")), "metadata.namespace")?,
            name: str_field(metadata.and_then(|m| m.get("name")), "metadata.name")?,
            conditions,
        })
    }

    /// API group, i.e. the part of `apiVersion` before the `/`. Core objects
    /// (`v1`) have an empty group.
    pub fn group(&self) -> &str {
        match self.api_version.split_once('/') {
            Some((group, _)) => group,
            None => "",
        }
    }

    /// Condition of the given type, or an `Unknown` condition with empty
    /// reason and message when the object does not carry one.
    pub fn get_condition(&self, condition_type: &str) -> Condition {
        self.conditions
            .iter()
            .find(|c| c.condition_type == condition_type)
            .cloned()
            .unwrap_or_else(|| Condition::unknown(condition_type))
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
