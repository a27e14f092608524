//! Policy loading from strings, function input values and the filesystem.
//!
//! Every entry point runs the same two-pass parse (PolicyEnvelope ->
//! StatusTransformation) so a document of the wrong kind is reported
//! as such.

mod core;
mod error;


pub use self::core::PolicyLoader;
pub use self::error::{ConfigError, LoadResult, LoadStatus, Result};
