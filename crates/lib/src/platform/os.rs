use std::fmt;

use serde::{Deserialize, Serialize};

/// Operating system a native extension is built for
///
/// Identifiers that are not recognised are kept verbatim in `Other` so that
/// they can still be reported, they simply receive no platform flags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Os {
  Linux,
  Darwin,
  Windows,
  Other(String),
}

impl Os {
  /// Parse an OS identifier as reported by a toolchain or interpreter.
  ///
  /// Matching is case-insensitive. Legacy identifiers such as `linux2` and
  /// `win32` are accepted.
  pub fn from_identifier(id: &str) -> Self {
    match id.trim().to_ascii_lowercase().as_str() {
      "linux" | "linux2" => Self::Linux,
      "darwin" | "macos" => Self::Darwin,
      "windows" | "win32" => Self::Windows,
      _ => Self::Other(id.trim().to_string()),
    }
  }

  /// Detect the host operating system at runtime
  pub fn current() -> Self {
    Self::from_identifier(std::env::consts::OS)
  }

  /// Returns the identifier for this OS
  pub fn as_str(&self) -> &str {
    match self {
      Self::Linux => "linux",
      Self::Darwin => "Darwin",
      Self::Windows => "Windows",
      Self::Other(id) => id,
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl From<String> for Os {
  fn from(id: String) -> Self {
    Self::from_identifier(&id)
  }
}

impl From<Os> for String {
  fn from(os: Os) -> Self {
    os.as_str().to_string()
  }
}
