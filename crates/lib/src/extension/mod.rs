//! Native extension build specifications.
//!
//! A [`BuildSpecification`] is everything a compiler driver needs to build one
//! extension module: sources, include directories, macros, compile and link
//! flags, libraries and DSOs. It is produced by merging the core library's
//! provider answers with the platform flag policy.
//!
//! Every flag list keeps the provider's baseline first and appends platform
//! additions after it. Order matters to the toolchain, so nothing is ever
//! replaced or reordered.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ResolveError;
use crate::platform::{Platform, resolve_platform_flags};
use crate::provider::{ConfigVar, DependencyProvider, NumericLibrary};
use crate::util::hash::Hashable;

/// Extension module as declared in the project file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionDef {
  /// Dotted module path, e.g. `pkg._ext`
  pub name: String,
  pub sources: Vec<String>,
  /// Shared libraries from other installed packages, by module path
  #[serde(default)]
  pub dsos: Vec<String>,
}

impl ExtensionDef {
  pub fn new(name: &str, sources: &[&str]) -> Self {
    Self {
      name: name.to_string(),
      sources: sources.iter().map(|s| s.to_string()).collect(),
      dsos: Vec::new(),
    }
  }

  pub fn with_dso(mut self, dso: &str) -> Self {
    self.dsos.push(dso.to_string());
    self
  }
}

/// Fully resolved, ready-to-compile description of one extension module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSpecification {
  pub name: String,
  pub sources: Vec<String>,
  pub include_dirs: Vec<PathBuf>,
  pub define_macros: Vec<String>,
  pub extra_compile_args: Vec<String>,
  pub extra_link_args: Vec<String>,
  pub libraries: Vec<String>,
  pub dsos: Vec<String>,
}

impl Hashable for BuildSpecification {}

/// Resolve the build specification for one extension.
///
/// Include directories are the numeric library's followed by the core
/// library's, with later duplicates dropped. Any provider failure aborts the
/// resolution.
pub fn build_extension_spec<P, N>(
  extension: &ExtensionDef,
  provider: &P,
  numeric: &N,
  platform: &Platform,
) -> Result<BuildSpecification, ResolveError>
where
  P: DependencyProvider + ?Sized,
  N: NumericLibrary + ?Sized,
{
  debug!(extension = %extension.name, provider = provider.name(), "resolving extension");

  let mut include_dirs = Vec::new();
  for dir in numeric
    .include_dirs()?
    .into_iter()
    .chain(std::iter::once(provider.include_path()?))
  {
    if !include_dirs.contains(&dir) {
      include_dirs.push(dir);
    }
  }

  let define_macros = provider.config_var(ConfigVar::CppFlags)?;
  let platform_flags = resolve_platform_flags(platform);

  let mut extra_compile_args = provider.config_var(ConfigVar::CxxFlags)?;
  extra_compile_args.extend(platform_flags.compile);

  let mut extra_link_args = provider.config_var(ConfigVar::LdFlags)?;
  extra_link_args.extend(platform_flags.link);

  let libraries = provider.config_var(ConfigVar::LdAdd)?;

  let spec = BuildSpecification {
    name: extension.name.clone(),
    sources: extension.sources.clone(),
    include_dirs,
    define_macros,
    extra_compile_args,
    extra_link_args,
    libraries,
    dsos: extension.dsos.clone(),
  };

  info!(
    extension = %spec.name,
    platform = %platform,
    compile_args = spec.extra_compile_args.len(),
    link_args = spec.extra_link_args.len(),
    "resolved extension"
  );
  Ok(spec)
}
