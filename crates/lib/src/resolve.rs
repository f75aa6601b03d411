//! One-pass resolution of a whole project.
//!
//! Queries the collaborators, builds every extension's specification and the
//! package descriptor. Nothing is cached between calls, so concurrent callers
//! resolving different targets only need their own [`Platform`].

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ProjectConfig;
use crate::error::ResolveError;
use crate::extension::{BuildSpecification, ExtensionDef, build_extension_spec};
use crate::package::{PackageDescriptor, PackageMetadata, build_package_descriptor};
use crate::platform::Platform;
use crate::provider::{DependencyProvider, NumericLibrary};
use crate::util::hash::Hashable;

/// Everything resolved for one build invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
  pub platform: Platform,
  pub extensions: Vec<BuildSpecification>,
  pub package: PackageDescriptor,
}

impl Hashable for Resolution {}

pub fn resolve<P, N>(
  metadata: &PackageMetadata,
  extensions: &[ExtensionDef],
  provider: &P,
  numeric: &N,
  platform: &Platform,
) -> Result<Resolution, ResolveError>
where
  P: DependencyProvider + ?Sized,
  N: NumericLibrary + ?Sized,
{
  let specs = extensions
    .iter()
    .map(|ext| build_extension_spec(ext, provider, numeric, platform))
    .collect::<Result<Vec<_>, _>>()?;

  let abi_requires = provider.abi_requires()?;
  let numeric_version = numeric.version()?;
  let package = build_package_descriptor(metadata, &abi_requires, numeric.name(), &numeric_version, &specs)?;

  info!(package = %package.name, version = %package.version, platform = %platform, "resolution complete");

  Ok(Resolution {
    platform: platform.clone(),
    extensions: specs,
    package,
  })
}

impl ProjectConfig {
  /// Resolve this project for `platform`.
  pub fn resolve(&self, platform: &Platform) -> Result<Resolution, ResolveError> {
    resolve(&self.package, &self.extensions, &self.core, &self.numeric, platform)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::platform::os::Os;
  use crate::platform::{DARWIN_HEADERPAD_FLAG, LINUX_NO_DEBUG_FLAG};
  use crate::provider::{ConfigVar, TableNumeric, TableProvider};
  use tempfile::TempDir;

  struct Fixture {
    _temp: TempDir,
    core: TableProvider,
    numeric: TableNumeric,
  }

  fn fixture() -> Fixture {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("core")).unwrap();
    std::fs::create_dir_all(temp.path().join("numpy")).unwrap();

    let core = TableProvider::new("core", temp.path().join("core"), "core >=7.0.7,<7.0.8")
      .with_var(ConfigVar::CppFlags, &["-DUSE_TYPED_RSET"])
      .with_var(ConfigVar::CxxFlags, &["-O2"])
      .with_var(ConfigVar::LdFlags, &["-L/opt/core/lib"])
      .with_var(ConfigVar::LdAdd, &["Com"]);
    let numeric = TableNumeric::new("numpy", "1.24.0").with_include_dir(temp.path().join("numpy"));

    Fixture {
      _temp: temp,
      core,
      numeric,
    }
  }

  fn metadata() -> PackageMetadata {
    PackageMetadata {
      name: "pvclient".to_string(),
      version: "0.0.0a1".to_string(),
      ..Default::default()
    }
  }

  fn extensions() -> Vec<ExtensionDef> {
    vec![ExtensionDef::new("pvclient._ext", &["python/pvclient/_ext.pyx"])]
  }

  #[test]
  fn resolves_extensions_and_package() {
    let f = fixture();
    let platform = Platform::new(Os::Linux, false);

    let resolution = resolve(&metadata(), &extensions(), &f.core, &f.numeric, &platform).unwrap();

    assert_eq!(resolution.extensions.len(), 1);
    assert_eq!(resolution.extensions[0].extra_compile_args, vec!["-O2", LINUX_NO_DEBUG_FLAG]);
    assert_eq!(resolution.extensions[0].include_dirs.len(), 2);
    assert_eq!(
      resolution.package.install_requires,
      vec!["core >=7.0.7,<7.0.8", "numpy >=1.24.0"]
    );
    assert!(resolution.package.ext_modules.contains_key("pvclient._ext"));
  }

  #[test]
  fn darwin_resolution_only_touches_link_flags() {
    let f = fixture();
    let platform = Platform::new(Os::Darwin, true);

    let resolution = resolve(&metadata(), &extensions(), &f.core, &f.numeric, &platform).unwrap();
    let spec = &resolution.extensions[0];

    assert_eq!(spec.extra_compile_args, vec!["-O2"]);
    assert_eq!(spec.extra_link_args, vec!["-L/opt/core/lib", DARWIN_HEADERPAD_FLAG]);
  }

  #[test]
  fn identical_inputs_give_identical_fingerprints() {
    let f = fixture();
    let platform = Platform::new(Os::Windows, false);

    let a = resolve(&metadata(), &extensions(), &f.core, &f.numeric, &platform).unwrap();
    let b = resolve(&metadata(), &extensions(), &f.core, &f.numeric, &platform).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.compute_hash().unwrap(), b.compute_hash().unwrap());
  }

  #[test]
  fn missing_core_headers_abort_resolution() {
    let f = fixture();
    let mut core = f.core.clone();
    core.include_path = core.include_path.join("missing");

    let err = resolve(&metadata(), &extensions(), &core, &f.numeric, &Platform::new(Os::Linux, false)).unwrap_err();
    assert!(matches!(err, ResolveError::MissingDependency { .. }));
  }

  #[test]
  fn boxed_providers_resolve() {
    let f = fixture();
    let core: Box<dyn DependencyProvider> = Box::new(f.core.clone());
    let numeric: Box<dyn NumericLibrary> = Box::new(f.numeric.clone());

    let resolution = resolve(&metadata(), &extensions(), &core, &numeric, &Platform::new(Os::Linux, true)).unwrap();
    assert_eq!(resolution.extensions[0].extra_compile_args, vec!["-O2"]);
  }

  #[cfg(unix)]
  mod command_project {
    use super::*;
    use std::path::Path;

    // `sh -c <script> <query>` binds the query to $0
    const CORE_HELPER: &str = r#"case "$0" in
  CPPFLAGS) echo '[]' ;;
  CXXFLAGS) echo '["-O2"]' ;;
  LDFLAGS) echo '"-L/opt/core/lib"' ;;
  LDADD) echo '["Com"]' ;;
  include_path) echo '"core/include"' ;;
  abi_requires) echo '"core >=7.0.7,<7.0.8"' ;;
  *) exit 1 ;;
esac"#;

    fn project(numeric_dirs: &str) -> String {
      let numeric_helper = format!(
        r#"case "$0" in
  include_dirs) echo '{numeric_dirs}' ;;
  version) echo '"1.24.0"' ;;
  *) exit 1 ;;
esac"#
      );
      format!(
        r#"
[package]
name = "pvclient"
version = "0.0.0a1"

[[extension]]
name = "pvclient._ext"
sources = ["python/pvclient/_ext.pyx"]

[core]
kind = "command"
program = "sh"
args = ["-c", '''{CORE_HELPER}''']

[numeric]
kind = "command"
program = "sh"
args = ["-c", '''{numeric_helper}''']
"#
      )
    }

    fn project_dir() -> TempDir {
      let temp = TempDir::new().unwrap();
      std::fs::create_dir_all(temp.path().join("core/include")).unwrap();
      std::fs::create_dir_all(temp.path().join("numpy/include")).unwrap();
      temp
    }

    #[test]
    fn resolves_project_through_helpers() {
      let temp = project_dir();
      let content = project(r#"["numpy/include"]"#);
      let config = ProjectConfig::parse(&content, Path::new("extspec.toml"), temp.path()).unwrap();

      let resolution = config.resolve(&Platform::new(Os::Linux, false)).unwrap();
      let spec = &resolution.extensions[0];

      assert_eq!(
        spec.include_dirs,
        vec![
          dunce::canonicalize(temp.path().join("numpy/include")).unwrap(),
          dunce::canonicalize(temp.path().join("core/include")).unwrap(),
        ]
      );
      assert_eq!(spec.extra_compile_args, vec!["-O2", LINUX_NO_DEBUG_FLAG]);
      assert_eq!(spec.extra_link_args, vec!["-L/opt/core/lib"]);
      assert_eq!(spec.libraries, vec!["Com"]);
      assert_eq!(
        resolution.package.install_requires,
        vec!["core >=7.0.7,<7.0.8", "numpy >=1.24.0"]
      );
    }

    #[test]
    fn helper_reporting_absent_include_dir_aborts_resolution() {
      let temp = project_dir();
      let content = project(r#"["numpy/missing"]"#);
      let config = ProjectConfig::parse(&content, Path::new("extspec.toml"), temp.path()).unwrap();

      match config.resolve(&Platform::new(Os::Darwin, false)).unwrap_err() {
        ResolveError::MissingDependency { dependency, detail } => {
          assert_eq!(dependency, "numpy");
          assert!(detail.contains("numpy/missing"), "{detail}");
        }
        other => panic!("expected MissingDependency, got {other:?}"),
      }
    }
  }
}
