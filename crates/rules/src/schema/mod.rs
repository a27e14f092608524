//! Policy schema types with serde deserialization.
//!
//! Defines the type hierarchy for policy documents:
//! - `PolicyEnvelope`: lightweight first-pass header (apiVersion, kind)
//! - `StatusTransformation`: the policy root holding ordered hooks
//! - `StatusConditionHook`: matchers plus the conditions/events to emit
//! - `Matcher` / `ConditionMatcher`: quantified resource and condition tests

mod document;
mod envelope;
mod hook;
mod matcher;

pub use document::*;
pub use envelope::*;
pub use hook::*;
pub use matcher::*;

use serde::{Deserialize, Deserializer};

/// Optional flags may be written as `null`, which reads as `false`.
pub(crate) fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}
