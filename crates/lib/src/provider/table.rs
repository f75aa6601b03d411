//! Providers whose answers are declared inline in the project file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ConfigVar, DependencyProvider, NumericLibrary, existing_dir};
use crate::error::ResolveError;

fn default_core_name() -> String {
  "core".to_string()
}

fn default_numeric_name() -> String {
  "numpy".to_string()
}

/// Core-library configuration written out by hand.
///
/// `vars` is keyed by the category names (`CPPFLAGS`, `CXXFLAGS`, `LDFLAGS`,
/// `LDADD`). Every category the resolver asks for must be present, even if
/// its list is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableProvider {
  #[serde(default = "default_core_name")]
  pub name: String,
  pub include_path: PathBuf,
  #[serde(default)]
  pub abi_requires: String,
  #[serde(default)]
  pub vars: BTreeMap<String, Vec<String>>,
}

impl TableProvider {
  pub fn new(name: &str, include_path: impl Into<PathBuf>, abi_requires: &str) -> Self {
    Self {
      name: name.to_string(),
      include_path: include_path.into(),
      abi_requires: abi_requires.to_string(),
      vars: BTreeMap::new(),
    }
  }

  pub fn with_var(mut self, var: ConfigVar, values: &[&str]) -> Self {
    self
      .vars
      .insert(var.as_str().to_string(), values.iter().map(|v| v.to_string()).collect());
    self
  }

  /// Resolve a relative include path against the project directory
  pub fn rebase(&mut self, base: &Path) {
    if self.include_path.is_relative() {
      self.include_path = base.join(&self.include_path);
    }
  }
}

impl DependencyProvider for TableProvider {
  fn name(&self) -> &str {
    &self.name
  }

  fn config_var(&self, var: ConfigVar) -> Result<Vec<String>, ResolveError> {
    let values = self
      .vars
      .get(var.as_str())
      .cloned()
      .ok_or_else(|| ResolveError::missing(&self.name, format!("no value declared for {}", var)))?;
    debug!(provider = %self.name, var = %var, count = values.len(), "table provider answered");
    Ok(values)
  }

  fn include_path(&self) -> Result<PathBuf, ResolveError> {
    existing_dir(&self.name, &self.include_path)
  }

  fn abi_requires(&self) -> Result<String, ResolveError> {
    if self.abi_requires.trim().is_empty() {
      return Err(ResolveError::missing(&self.name, "no ABI requirement declared"));
    }
    Ok(self.abi_requires.clone())
  }
}

/// Numeric library described inline in the project file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableNumeric {
  #[serde(default = "default_numeric_name")]
  pub name: String,
  pub version: String,
  #[serde(default)]
  pub include_dirs: Vec<PathBuf>,
}

impl TableNumeric {
  pub fn new(name: &str, version: &str) -> Self {
    Self {
      name: name.to_string(),
      version: version.to_string(),
      include_dirs: Vec::new(),
    }
  }

  pub fn with_include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.include_dirs.push(dir.into());
    self
  }

  pub fn rebase(&mut self, base: &Path) {
    for dir in &mut self.include_dirs {
      if dir.is_relative() {
        *dir = base.join(&*dir);
      }
    }
  }
}

impl NumericLibrary for TableNumeric {
  fn name(&self) -> &str {
    &self.name
  }

  fn include_dirs(&self) -> Result<Vec<PathBuf>, ResolveError> {
    self.include_dirs.iter().map(|dir| existing_dir(&self.name, dir)).collect()
  }

  fn version(&self) -> Result<String, ResolveError> {
    Ok(self.version.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn answers_declared_vars_in_order() {
    let provider = TableProvider::new("core", "/nonexistent", "core==7.0").with_var(ConfigVar::CxxFlags, &["-O2", "-Wall"]);

    assert_eq!(provider.config_var(ConfigVar::CxxFlags).unwrap(), vec!["-O2", "-Wall"]);
  }

  #[test]
  fn undeclared_var_is_missing_dependency() {
    let provider = TableProvider::new("core", "/nonexistent", "core==7.0");

    let err = provider.config_var(ConfigVar::LdAdd).unwrap_err();
    assert!(matches!(err, ResolveError::MissingDependency { .. }));
    assert!(err.to_string().contains("LDADD"));
  }

  #[test]
  fn empty_declared_var_is_not_an_error() {
    let provider = TableProvider::new("core", "/nonexistent", "core==7.0").with_var(ConfigVar::LdFlags, &[]);
    assert!(provider.config_var(ConfigVar::LdFlags).unwrap().is_empty());
  }

  #[test]
  fn blank_abi_requirement_is_missing_dependency() {
    let provider = TableProvider::new("core", "/nonexistent", "  ");
    assert!(provider.abi_requires().is_err());
  }

  #[test]
  fn rebase_only_touches_relative_paths() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("include")).unwrap();

    let mut provider = TableProvider::new("core", "include", "core==7.0");
    provider.rebase(temp.path());
    assert_eq!(
      provider.include_path().unwrap(),
      dunce::canonicalize(temp.path().join("include")).unwrap()
    );

    let mut absolute = TableProvider::new("core", "/opt/core/include", "core==7.0");
    absolute.rebase(temp.path());
    assert_eq!(absolute.include_path, PathBuf::from("/opt/core/include"));
  }

  #[test]
  fn numeric_include_dirs_must_exist() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("numeric")).unwrap();

    let present = TableNumeric::new("numpy", "1.24.0").with_include_dir(temp.path().join("numeric"));
    assert_eq!(present.include_dirs().unwrap().len(), 1);

    let absent = TableNumeric::new("numpy", "1.24.0").with_include_dir(temp.path().join("gone"));
    assert!(matches!(
      absent.include_dirs().unwrap_err(),
      ResolveError::MissingDependency { .. }
    ));
  }

  #[test]
  fn deserializes_with_defaults() {
    let provider: TableProvider = toml::from_str(
      r#"
include_path = "/opt/core/include"
abi_requires = "core >=7.0.7,<7.0.8"

[vars]
CPPFLAGS = ["-DUSE_TYPED_RSET"]
LDADD = ["Com"]
"#,
    )
    .unwrap();

    assert_eq!(provider.name, "core");
    assert_eq!(provider.config_var(ConfigVar::LdAdd).unwrap(), vec!["Com"]);
  }
}
