//! Status condition hook engine.
//!
//! This crate provides:
//! - YAML/JSON `StatusTransformation` policy schema and filesystem loader
//! - Quantified matching of condition predicates over observed objects
//! - Message templating of emitted conditions and events from regex captures
//! - A request/response runner that never fails, reporting errors as conditions
//! - Static policy validation with suggestions

pub mod diagnostics;
pub mod evaluator;
pub mod extra;
pub mod function;
pub mod loader;
pub mod schema;
pub mod templating;
pub mod transform;
pub mod validation;

pub use evaluator::{CapturedGroups, EvaluationInput, EvaluationOutcome, HookEvaluator};
pub use function::{run_function, FunctionRunner, RunRequest, RunResponse};
pub use loader::PolicyLoader;
pub use schema::StatusTransformation;
