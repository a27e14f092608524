//! Error types and load result structures for the policy loader.

use std::path::PathBuf;

/// Errors that can occur while loading a policy. Any of these is fatal for
/// a run: no hook is evaluated.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse/deserialization error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// JSON deserialization error (function input).
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Document is well-formed but not a policy we understand.
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result alias for policy loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Outcome of loading a single policy file.
#[derive(Debug)]
pub struct LoadResult {
    /// Path to the file that was loaded.
    pub path: PathBuf,
    /// Status of the load attempt.
    pub status: LoadStatus,
}

/// Status of a single file load attempt.
#[derive(Debug)]
pub enum LoadStatus {
    /// Policy was successfully loaded.
    Loaded { hooks: usize },
    /// File was skipped (dotfile, unsupported extension).
    Skipped { reason: String },
    /// Parse or validation error occurred.
    Failed { error: String },
}
