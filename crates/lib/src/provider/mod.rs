//! Collaborator libraries queried during resolution.
//!
//! The core library is reached through a [`DependencyProvider`], the numeric
//! array library through a [`NumericLibrary`]. Neither is owned or cached by
//! the resolver; each query goes straight to the backing source.
//!
//! # Submodules
//!
//! - [`table`] - values declared inline in the project file
//! - [`command`] - values obtained by running a helper program

pub mod command;
pub mod table;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

pub use command::{CommandNumeric, CommandProvider};
pub use table::{TableNumeric, TableProvider};

/// Build-configuration categories a core-library provider answers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfigVar {
  /// Preprocessor macro definitions
  #[serde(rename = "CPPFLAGS")]
  CppFlags,
  /// Extra compiler flags
  #[serde(rename = "CXXFLAGS")]
  CxxFlags,
  /// Extra linker flags
  #[serde(rename = "LDFLAGS")]
  LdFlags,
  /// Libraries to link
  #[serde(rename = "LDADD")]
  LdAdd,
}

impl ConfigVar {
  pub const ALL: [ConfigVar; 4] = [Self::CppFlags, Self::CxxFlags, Self::LdFlags, Self::LdAdd];

  pub const fn as_str(&self) -> &'static str {
    match self {
      Self::CppFlags => "CPPFLAGS",
      Self::CxxFlags => "CXXFLAGS",
      Self::LdFlags => "LDFLAGS",
      Self::LdAdd => "LDADD",
    }
  }
}

impl fmt::Display for ConfigVar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Source of compiler and linker configuration for the core library.
pub trait DependencyProvider {
  /// Name used in logs and error messages
  fn name(&self) -> &str;

  /// Ordered values for one configuration category.
  ///
  /// A provider that cannot answer for a category must fail rather than
  /// return an empty list.
  fn config_var(&self, var: ConfigVar) -> Result<Vec<String>, ResolveError>;

  /// Directory holding the core library headers
  fn include_path(&self) -> Result<PathBuf, ResolveError>;

  /// Install-time requirement pinning the core library ABI the extension is built against
  fn abi_requires(&self) -> Result<String, ResolveError>;
}

/// The numeric array library the extension compiles against.
pub trait NumericLibrary {
  /// Distribution name used in install constraints
  fn name(&self) -> &str;

  fn include_dirs(&self) -> Result<Vec<PathBuf>, ResolveError>;

  /// Version resolved at build time
  fn version(&self) -> Result<String, ResolveError>;
}

impl<T: DependencyProvider + ?Sized> DependencyProvider for Box<T> {
  fn name(&self) -> &str {
    (**self).name()
  }

  fn config_var(&self, var: ConfigVar) -> Result<Vec<String>, ResolveError> {
    (**self).config_var(var)
  }

  fn include_path(&self) -> Result<PathBuf, ResolveError> {
    (**self).include_path()
  }

  fn abi_requires(&self) -> Result<String, ResolveError> {
    (**self).abi_requires()
  }
}

impl<T: NumericLibrary + ?Sized> NumericLibrary for Box<T> {
  fn name(&self) -> &str {
    (**self).name()
  }

  fn include_dirs(&self) -> Result<Vec<PathBuf>, ResolveError> {
    (**self).include_dirs()
  }

  fn version(&self) -> Result<String, ResolveError> {
    (**self).version()
  }
}

/// Canonicalize a directory reported by a provider, failing if it is absent.
pub(crate) fn existing_dir(dependency: &str, path: &std::path::Path) -> Result<PathBuf, ResolveError> {
  let canonical = dunce::canonicalize(path)
    .map_err(|e| ResolveError::missing(dependency, format!("{}: {}", path.display(), e)))?;
  if !canonical.is_dir() {
    return Err(ResolveError::missing(
      dependency,
      format!("{} is not a directory", canonical.display()),
    ));
  }
  Ok(canonical)
}
