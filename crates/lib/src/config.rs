//! Project file loading.
//!
//! A project file (`extspec.toml` by default) declares the package metadata,
//! one or more `[[extension]]` tables and where the core and numeric libraries
//! are found:
//!
//! ```toml
//! [package]
//! name = "pvclient"
//! version = "0.0.0a1"
//!
//! [[extension]]
//! name = "pvclient._ext"
//! sources = ["python/pvclient/_ext.pyx"]
//! dsos = ["corelibs.lib.Com"]
//!
//! [core]
//! kind = "command"
//! program = "python3"
//! args = ["tools/core_config.py"]
//!
//! [numeric]
//! kind = "table"
//! version = "1.24.0"
//! include_dirs = ["third_party/numpy/include"]
//! ```
//!
//! Relative include paths in `table` sources are taken relative to the
//! directory containing the project file. `command` helpers run in that
//! directory and relative paths they report are resolved against it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ConfigError, ResolveError};
use crate::extension::ExtensionDef;
use crate::package::PackageMetadata;
use crate::provider::{
  CommandNumeric, CommandProvider, ConfigVar, DependencyProvider, NumericLibrary, TableNumeric, TableProvider,
};

/// Where the core library's build configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CoreSource {
  Table(TableProvider),
  Command(CommandProvider),
}

impl DependencyProvider for CoreSource {
  fn name(&self) -> &str {
    match self {
      Self::Table(p) => p.name(),
      Self::Command(p) => p.name(),
    }
  }

  fn config_var(&self, var: ConfigVar) -> Result<Vec<String>, ResolveError> {
    match self {
      Self::Table(p) => p.config_var(var),
      Self::Command(p) => p.config_var(var),
    }
  }

  fn include_path(&self) -> Result<PathBuf, ResolveError> {
    match self {
      Self::Table(p) => p.include_path(),
      Self::Command(p) => p.include_path(),
    }
  }

  fn abi_requires(&self) -> Result<String, ResolveError> {
    match self {
      Self::Table(p) => p.abi_requires(),
      Self::Command(p) => p.abi_requires(),
    }
  }
}

/// Where the numeric library is found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NumericSource {
  Table(TableNumeric),
  Command(CommandNumeric),
}

impl NumericLibrary for NumericSource {
  fn name(&self) -> &str {
    match self {
      Self::Table(n) => n.name(),
      Self::Command(n) => n.name(),
    }
  }

  fn include_dirs(&self) -> Result<Vec<PathBuf>, ResolveError> {
    match self {
      Self::Table(n) => n.include_dirs(),
      Self::Command(n) => n.include_dirs(),
    }
  }

  fn version(&self) -> Result<String, ResolveError> {
    match self {
      Self::Table(n) => n.version(),
      Self::Command(n) => n.version(),
    }
  }
}

/// Parsed project file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
  pub package: PackageMetadata,
  #[serde(rename = "extension")]
  pub extensions: Vec<ExtensionDef>,
  pub core: CoreSource,
  pub numeric: NumericSource,
}

impl ProjectConfig {
  /// Read and parse a project file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
      path: path.to_path_buf(),
      source: e,
    })?;
    let base = match path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };
    let config = Self::parse(&content, path, base)?;

    info!(
      path = %path.display(),
      package = %config.package.name,
      extensions = config.extensions.len(),
      "loaded project file"
    );
    Ok(config)
  }

  /// Parse project file content, resolving relative paths against `base`.
  ///
  /// `path` is only used in error messages.
  pub fn parse(content: &str, path: &Path, base: &Path) -> Result<Self, ConfigError> {
    let mut config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
      path: path.to_path_buf(),
      source: e,
    })?;

    if config.extensions.is_empty() {
      return Err(ConfigError::NoExtensions {
        path: path.to_path_buf(),
      });
    }

    match &mut config.core {
      CoreSource::Table(table) => table.rebase(base),
      CoreSource::Command(cmd) => cmd.command.rebase(base),
    }
    match &mut config.numeric {
      NumericSource::Table(table) => table.rebase(base),
      NumericSource::Command(cmd) => cmd.command.rebase(base),
    }

    Ok(config)
  }
}
