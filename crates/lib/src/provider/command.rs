//! Providers backed by a helper program.
//!
//! The helper is invoked as `<program> <args...> <query>` once per query and
//! must print JSON on stdout: a string, or an array of strings for list
//! queries. A bare string answering a list query is split on whitespace, the
//! way `pkg-config` style tools print flags. Output that is not valid UTF-8
//! JSON is rejected.
//!
//! When loaded from a project file the helper runs in the project directory,
//! and relative directories it reports are taken relative to that directory.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{ConfigVar, DependencyProvider, NumericLibrary, existing_dir};
use crate::error::ResolveError;

pub const QUERY_INCLUDE_PATH: &str = "include_path";
pub const QUERY_ABI_REQUIRES: &str = "abi_requires";
pub const QUERY_INCLUDE_DIRS: &str = "include_dirs";
pub const QUERY_VERSION: &str = "version";

#[derive(Deserialize)]
#[serde(untagged)]
enum ListAnswer {
  Many(Vec<String>),
  One(String),
}

/// Helper program invocation shared by both command providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelperCommand {
  pub program: String,
  #[serde(default)]
  pub args: Vec<String>,
  /// Working directory for the helper and base for relative paths it reports
  #[serde(skip)]
  pub base: Option<PathBuf>,
}

impl HelperCommand {
  pub fn new(program: &str, args: &[&str]) -> Self {
    Self {
      program: program.to_string(),
      args: args.iter().map(|a| a.to_string()).collect(),
      base: None,
    }
  }

  pub fn rebase(&mut self, base: &Path) {
    self.base = Some(base.to_path_buf());
  }

  /// Directory reported by the helper, made absolute against the base
  fn reported_dir(&self, dependency: &str, dir: &str) -> Result<PathBuf, ResolveError> {
    let dir = Path::new(dir);
    match &self.base {
      Some(base) if dir.is_relative() => existing_dir(dependency, &base.join(dir)),
      _ => existing_dir(dependency, dir),
    }
  }

  fn run(&self, dependency: &str, query: &str) -> Result<Vec<u8>, ResolveError> {
    info!(program = %self.program, query = %query, "querying helper");

    let mut command = Command::new(&self.program);
    command.args(&self.args).arg(query);
    if let Some(base) = &self.base {
      command.current_dir(base);
    }

    let output = command
      .output()
      .map_err(|e| ResolveError::missing(dependency, format!("cannot run {}: {}", self.program, e)))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
      if !stderr.is_empty() {
        debug!(stderr = %stderr, "helper stderr");
      }
      return Err(ResolveError::CommandFailed {
        program: self.program.clone(),
        query: query.to_string(),
        code: output.status.code(),
        stderr,
      });
    }

    debug!(stdout = %String::from_utf8_lossy(&output.stdout).trim(), "helper output");
    Ok(output.stdout)
  }

  fn query_list(&self, dependency: &str, query: &str) -> Result<Vec<String>, ResolveError> {
    let stdout = self.run(dependency, query)?;
    let answer: ListAnswer = serde_json::from_slice(&stdout).map_err(|e| self.invalid(query, e))?;
    Ok(match answer {
      ListAnswer::Many(values) => values,
      ListAnswer::One(value) => value.split_whitespace().map(str::to_string).collect(),
    })
  }

  fn query_string(&self, dependency: &str, query: &str) -> Result<String, ResolveError> {
    let stdout = self.run(dependency, query)?;
    let value: String = serde_json::from_slice(&stdout).map_err(|e| self.invalid(query, e))?;
    if value.trim().is_empty() {
      return Err(ResolveError::missing(dependency, format!("{} returned an empty {}", self.program, query)));
    }
    Ok(value)
  }

  fn invalid(&self, query: &str, source: serde_json::Error) -> ResolveError {
    ResolveError::InvalidOutput {
      program: self.program.clone(),
      query: query.to_string(),
      source,
    }
  }
}

fn default_core_name() -> String {
  "core".to_string()
}

fn default_numeric_name() -> String {
  "numpy".to_string()
}

/// Core-library provider that asks a helper program for each value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandProvider {
  #[serde(default = "default_core_name")]
  pub name: String,
  #[serde(flatten)]
  pub command: HelperCommand,
}

impl CommandProvider {
  pub fn new(name: &str, command: HelperCommand) -> Self {
    Self {
      name: name.to_string(),
      command,
    }
  }
}

impl DependencyProvider for CommandProvider {
  fn name(&self) -> &str {
    &self.name
  }

  fn config_var(&self, var: ConfigVar) -> Result<Vec<String>, ResolveError> {
    self.command.query_list(&self.name, var.as_str())
  }

  fn include_path(&self) -> Result<PathBuf, ResolveError> {
    let path = self.command.query_string(&self.name, QUERY_INCLUDE_PATH)?;
    self.command.reported_dir(&self.name, &path)
  }

  fn abi_requires(&self) -> Result<String, ResolveError> {
    self.command.query_string(&self.name, QUERY_ABI_REQUIRES)
  }
}

/// Numeric library located by a helper program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandNumeric {
  #[serde(default = "default_numeric_name")]
  pub name: String,
  #[serde(flatten)]
  pub command: HelperCommand,
}

impl CommandNumeric {
  pub fn new(name: &str, command: HelperCommand) -> Self {
    Self {
      name: name.to_string(),
      command,
    }
  }
}

impl NumericLibrary for CommandNumeric {
  fn name(&self) -> &str {
    &self.name
  }

  fn include_dirs(&self) -> Result<Vec<PathBuf>, ResolveError> {
    self
      .command
      .query_list(&self.name, QUERY_INCLUDE_DIRS)?
      .iter()
      .map(|dir| self.command.reported_dir(&self.name, dir))
      .collect()
  }

  fn version(&self) -> Result<String, ResolveError> {
    self.command.query_string(&self.name, QUERY_VERSION)
  }
}
