//! extspec-lib: build descriptor resolution for native extensions
//!
//! This crate resolves what a compiler driver and a packaging tool need to
//! build a thin native extension around a pre-built core library:
//! - `Platform`: target OS and interpreter debug flag, plus the flag policy
//! - `DependencyProvider` / `NumericLibrary`: collaborator libraries
//! - `BuildSpecification`: resolved compile/link description of one extension
//! - `PackageDescriptor`: resolved install manifest
//! - `Resolution`: all of the above for one build invocation

pub mod config;
pub mod consts;
pub mod error;
pub mod extension;
pub mod package;
pub mod platform;
pub mod provider;
pub mod resolve;
pub mod util;

pub use error::{ConfigError, ResolveError};
