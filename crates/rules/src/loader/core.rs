//! Core [`PolicyLoader`]: parse policies from text, values or a directory tree.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::schema::{PolicyEnvelope, StatusTransformation, POLICY_API_GROUP, POLICY_KIND};

use super::error::{ConfigError, LoadResult, LoadStatus, Result};

/// File extensions recognised as policy documents.
const POLICY_EXTENSIONS: &[&str] = &["yml", "yaml", "json"];

/// Filesystem-backed policy loader.
///
/// Scans a directory (recursively) for policy files and keeps the parsed
/// documents keyed by path. Keys are ordered, so [`PolicyLoader::merged`]
/// yields hooks in lexicographic path order, then declaration order.
pub struct PolicyLoader {
    /// Root directory containing policy files.
    policies_dir: PathBuf,
    /// Parsed documents keyed by file path.
    documents: BTreeMap<PathBuf, StatusTransformation>,
}

impl PolicyLoader {
    /// Create a loader for the given directory. Nothing is read until
    /// [`PolicyLoader::load_all`].
    pub fn new(policies_dir: PathBuf) -> Self {
        Self {
            policies_dir,
            documents: BTreeMap::new(),
        }
    }

    /// Parse a policy from YAML or JSON text.
    pub fn parse_str(contents: &str) -> Result<StatusTransformation> {
        // First pass: extract envelope (apiVersion + kind).
        let envelope: PolicyEnvelope = serde_yaml::from_str(contents)?;
        check_envelope(&envelope)?;

        // Second pass: the full document.
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Parse a policy from an already-decoded JSON value, e.g. the input
    /// field of a function request.
    pub fn from_value(value: &serde_json::Value) -> Result<StatusTransformation> {
        let envelope: PolicyEnvelope = serde_json::from_value(value.clone())?;
        check_envelope(&envelope)?;

        Ok(serde_json::from_value(value.clone())?)
    }

    /// Read and parse a single policy file.
    pub fn load_file(path: &Path) -> Result<StatusTransformation> {
        let contents = fs::read_to_string(path)?;
        Self::parse_str(&contents)
    }

    /// Load a policy from a file or, if `path` is a directory, merge every
    /// policy found below it.
    pub fn load_path(path: &Path) -> Result<StatusTransformation> {
        if !path.is_dir() {
            return Self::load_file(path);
        }

        let mut loader = Self::new(path.to_path_buf());
        let results = loader.load_all()?;
        if let Some(failed) = results.iter().find_map(|r| match &r.status {
            LoadStatus::Failed { error } => Some((r.path.clone(), error.clone())),
            _ => None,
        }) {
            return Err(ConfigError::Validation(format!(
                "failed to load policy '{}': {}",
                failed.0.display(),
                failed.1
            )));
        }
        Ok(loader.merged())
    }

    /// Recursively scan the policies directory and load all policy files.
    ///
    /// Dotfiles and files with other extensions are skipped. Parse errors
    /// are reported per file but do not abort the scan.
    pub fn load_all(&mut self) -> Result<Vec<LoadResult>> {
        let mut results = Vec::new();
        let dir = self.policies_dir.clone();
        self.scan_dir_recursive(&dir, &mut results)?;
        Ok(results)
    }

    fn scan_dir_recursive(&mut self, dir: &Path, results: &mut Vec<LoadResult>) -> Result<()> {
        let mut entries = fs::read_dir(dir)?
            .map(|e| e.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();

        for path in entries {
            // Skip dotfiles/dotdirs
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    if path.is_file() {
                        results.push(LoadResult {
                            path,
                            status: LoadStatus::Skipped {
                                reason: "dotfile".to_string(),
                            },
                        });
                    }
                    continue;
                }
            }

            if path.is_dir() {
                self.scan_dir_recursive(&path, results)?;
                continue;
            }

            let supported = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| POLICY_EXTENSIONS.contains(&e))
                .unwrap_or(false);

            if !supported {
                results.push(LoadResult {
                    path,
                    status: LoadStatus::Skipped {
                        reason: "not a YAML or JSON file".to_string(),
                    },
                });
                continue;
            }

            match Self::load_file(&path) {
                Ok(doc) => {
                    let hooks = doc.hooks().len();
                    info!(policy = %doc.display_name(), hooks, path = %path.display(), "loaded policy");
                    self.documents.insert(path.clone(), doc);
                    results.push(LoadResult {
                        path,
                        status: LoadStatus::Loaded { hooks },
                    });
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load policy file");
                    results.push(LoadResult {
                        path,
                        status: LoadStatus::Failed {
                            error: e.to_string(),
                        },
                    });
                }
            }
        }

        Ok(())
    }

    /// Get the policies directory path.
    pub fn policies_dir(&self) -> &Path {
        &self.policies_dir
    }

    /// Loaded documents keyed by path.
    pub fn documents(&self) -> &BTreeMap<PathBuf, StatusTransformation> {
        &self.documents
    }

    /// A single policy holding the hooks of every loaded document, in path
    /// order.
    pub fn merged(&self) -> StatusTransformation {
        let api_version = self
            .documents
            .values()
            .next()
            .map(|d| d.api_version.clone())
            .unwrap_or_else(|| format!("{}/v1beta1", POLICY_API_GROUP));

        StatusTransformation {
            api_version,
            kind: POLICY_KIND.to_string(),
            metadata: None,
            status_condition_hooks: self
                .documents
                .values()
                .flat_map(|d| d.status_condition_hooks.iter().cloned())
                .collect(),
        }
    }
}

fn check_envelope(envelope: &PolicyEnvelope) -> Result<()> {
    if envelope.kind != POLICY_KIND {
        return Err(ConfigError::Validation(format!(
            "unsupported kind '{}', expected '{}'",
            envelope.kind, POLICY_KIND
        )));
    }
    if envelope.api_group() != POLICY_API_GROUP {
        warn!(api_version = %envelope.api_version, "unexpected policy apiVersion");
    }
    Ok(())
}
