//! Installable package descriptor.
//!
//! The descriptor is fixed metadata from the project file plus two computed
//! install constraints:
//!
//! 1. the core library's ABI requirement, taken verbatim from its provider;
//! 2. a minimum version of the numeric library equal to the version the
//!    extension was compiled against.
//!
//! The second constraint assumes every later numeric library release stays
//! ABI compatible with extensions built against an earlier one. That is an
//! upstream promise, not something checked here; consumers relying on strict
//! compatibility should pin the numeric library themselves.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ResolveError;
use crate::extension::BuildSpecification;
use crate::util::hash::Hashable;

/// Package metadata as declared in the project file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
  pub name: String,
  pub version: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub url: Option<String>,
  #[serde(default)]
  pub author: Option<String>,
  #[serde(default)]
  pub author_email: Option<String>,
  #[serde(default)]
  pub license: Option<String>,
  #[serde(default)]
  pub keywords: Vec<String>,
  #[serde(default)]
  pub classifiers: Vec<String>,
  #[serde(default)]
  pub python_requires: Option<String>,
  #[serde(default)]
  pub packages: Vec<String>,
  /// Logical package name → source directory (`""` is the root package)
  #[serde(default)]
  pub package_dir: BTreeMap<String, String>,
  #[serde(default)]
  pub zip_safe: bool,
}

/// Resolved, ready-to-install package manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
  pub name: String,
  pub version: String,
  pub description: String,
  pub url: Option<String>,
  pub author: Option<String>,
  pub author_email: Option<String>,
  pub license: Option<String>,
  pub keywords: Vec<String>,
  pub classifiers: Vec<String>,
  pub python_requires: Option<String>,
  pub packages: Vec<String>,
  pub package_dir: BTreeMap<String, String>,
  /// Extension module path → source files
  pub ext_modules: BTreeMap<String, Vec<String>>,
  pub install_requires: Vec<String>,
  pub zip_safe: bool,
}

impl Hashable for PackageDescriptor {}

/// Install constraint on the numeric library: same or newer than the build-time version.
pub fn numeric_requirement(name: &str, version: &str) -> Result<String, ResolveError> {
  let version = version.trim();
  if version.is_empty() {
    return Err(ResolveError::missing(name, "resolved version is empty"));
  }
  Ok(format!("{} >={}", name, version))
}

/// Assemble the package descriptor.
///
/// `install_requires` holds the ABI constraint followed by the numeric
/// library constraint. Neither is validated.
pub fn build_package_descriptor(
  metadata: &PackageMetadata,
  abi_requires: &str,
  numeric_name: &str,
  numeric_version: &str,
  extensions: &[BuildSpecification],
) -> Result<PackageDescriptor, ResolveError> {
  let install_requires = vec![abi_requires.to_string(), numeric_requirement(numeric_name, numeric_version)?];

  let ext_modules = extensions
    .iter()
    .map(|spec| (spec.name.clone(), spec.sources.clone()))
    .collect();

  debug!(package = %metadata.name, requires = ?install_requires, "resolved package descriptor");

  Ok(PackageDescriptor {
    name: metadata.name.clone(),
    version: metadata.version.clone(),
    description: metadata.description.clone(),
    url: metadata.url.clone(),
    author: metadata.author.clone(),
    author_email: metadata.author_email.clone(),
    license: metadata.license.clone(),
    keywords: metadata.keywords.clone(),
    classifiers: metadata.classifiers.clone(),
    python_requires: metadata.python_requires.clone(),
    packages: metadata.packages.clone(),
    package_dir: metadata.package_dir.clone(),
    ext_modules,
    install_requires,
    zip_safe: metadata.zip_safe,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn metadata() -> PackageMetadata {
    PackageMetadata {
      name: "pvclient".to_string(),
      version: "0.0.0a1".to_string(),
      description: "Protocol client bindings".to_string(),
      license: Some("BSD".to_string()),
      packages: vec!["pvclient".to_string()],
      package_dir: BTreeMap::from([(String::new(), "python".to_string())]),
      ..Default::default()
    }
  }

  fn spec(name: &str, source: &str) -> BuildSpecification {
    BuildSpecification {
      name: name.to_string(),
      sources: vec![source.to_string()],
      include_dirs: Vec::new(),
      define_macros: Vec::new(),
      extra_compile_args: Vec::new(),
      extra_link_args: Vec::new(),
      libraries: Vec::new(),
      dsos: Vec::new(),
    }
  }

  #[test]
  fn numeric_constraint_uses_build_time_version() {
    assert_eq!(numeric_requirement("numeric-lib", "1.24.0").unwrap(), "numeric-lib >=1.24.0");
  }

  #[test]
  fn empty_numeric_version_is_missing_dependency() {
    assert!(matches!(
      numeric_requirement("numpy", " ").unwrap_err(),
      ResolveError::MissingDependency { .. }
    ));
  }

  #[test]
  fn install_requires_lists_abi_then_numeric() {
    let pkg = build_package_descriptor(&metadata(), "core >=7.0.7,<7.0.8", "numpy", "1.24.0", &[]).unwrap();
    assert_eq!(pkg.install_requires, vec!["core >=7.0.7,<7.0.8", "numpy >=1.24.0"]);
  }

  #[test]
  fn abi_constraint_is_not_validated() {
    let pkg = build_package_descriptor(&metadata(), "not a constraint!", "numpy", "1.24.0", &[]).unwrap();
    assert_eq!(pkg.install_requires[0], "not a constraint!");
  }

  #[test]
  fn ext_modules_map_module_to_sources() {
    let specs = [
      spec("pvclient._ext", "python/pvclient/_ext.pyx"),
      spec("pvclient._util", "python/pvclient/_util.pyx"),
    ];
    let pkg = build_package_descriptor(&metadata(), "core", "numpy", "1.24.0", &specs).unwrap();

    assert_eq!(pkg.ext_modules.len(), 2);
    assert_eq!(pkg.ext_modules["pvclient._ext"], vec!["python/pvclient/_ext.pyx"]);
    assert_eq!(pkg.package_dir[""], "python");
  }

  #[test]
  fn metadata_is_carried_over() {
    let pkg = build_package_descriptor(&metadata(), "core", "numpy", "1.24.0", &[]).unwrap();

    assert_eq!(pkg.name, "pvclient");
    assert_eq!(pkg.version, "0.0.0a1");
    assert_eq!(pkg.license.as_deref(), Some("BSD"));
    assert!(!pkg.zip_safe);
  }
}
