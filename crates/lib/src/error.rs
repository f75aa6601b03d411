//! Error types for build descriptor resolution

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a resolution.
///
/// All of these are build-time configuration errors. None are retried.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// A collaborator library, or one of the values it must provide, is unavailable.
  #[error("missing dependency {dependency}: {detail}")]
  MissingDependency { dependency: String, detail: String },

  /// A provider helper program exited unsuccessfully.
  #[error("{program} failed to answer {query} (exit code {code:?}): {stderr}")]
  CommandFailed {
    program: String,
    query: String,
    code: Option<i32>,
    stderr: String,
  },

  /// A provider helper program printed something other than a JSON string or string list.
  #[error("{program} returned invalid output for {query}: {source}")]
  InvalidOutput {
    program: String,
    query: String,
    source: serde_json::Error,
  },
}

impl ResolveError {
  pub fn missing(dependency: impl Into<String>, detail: impl Into<String>) -> Self {
    Self::MissingDependency {
      dependency: dependency.into(),
      detail: detail.into(),
    }
  }
}

/// Errors that can occur while loading a project file.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read project file {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to parse project file {}: {source}", path.display())]
  Parse { path: PathBuf, source: toml::de::Error },

  #[error("project file {} declares no extensions", path.display())]
  NoExtensions { path: PathBuf },
}
