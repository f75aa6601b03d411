mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use extspec_lib::consts::DEFAULT_CONFIG_FILE;
use extspec_lib::platform::Platform;
use extspec_lib::platform::os::Os;

use crate::output::{OutputFormat, print_error};

/// extspec - resolve native extension build descriptors
#[derive(Parser)]
#[command(name = "extspec")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Increase log verbosity (-v info, -vv debug)
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

/// Target platform selection shared by all commands
#[derive(Args, Debug, Clone)]
struct PlatformArgs {
  /// Target OS identifier (defaults to the host, or EXTSPEC_OS)
  #[arg(long)]
  os: Option<String>,

  /// Target interpreter is a debug build
  #[arg(long)]
  debug: bool,

  /// Target interpreter is a release build, even if EXTSPEC_INTERP_DEBUG is set
  #[arg(long, conflicts_with = "debug")]
  no_debug: bool,

  /// Output format
  #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
  format: OutputFormat,
}

impl PlatformArgs {
  fn platform(&self) -> Platform {
    let detected = Platform::detect();
    let platform = Platform::new(
      self.os.as_deref().map(Os::from_identifier).unwrap_or(detected.os),
      self.debug_override().unwrap_or(detected.debug),
    );
    debug!(platform = %platform, "target platform");
    platform
  }

  fn debug_override(&self) -> Option<bool> {
    match (self.debug, self.no_debug) {
      (true, _) => Some(true),
      (_, true) => Some(false),
      _ => None,
    }
  }
}

#[derive(Subcommand)]
enum Commands {
  /// Print the resolved build specification of every extension
  Resolve {
    /// Path to the project file
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(flatten)]
    target: PlatformArgs,
  },

  /// Print the resolved package descriptor
  Package {
    /// Path to the project file
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(flatten)]
    target: PlatformArgs,
  },

  /// Show the target platform and its flag additions
  Info {
    #[command(flatten)]
    target: PlatformArgs,
  },
}

fn main() {
  let cli = Cli::parse();

  let default_level = match cli.verbose {
    0 => "warn",
    1 => "info",
    _ => "debug",
  };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  if let Err(err) = run(cli.command) {
    print_error(&format!("{:#}", err));
    std::process::exit(1);
  }
}

fn run(command: Commands) -> Result<()> {
  match command {
    Commands::Resolve { config, target } => cmd::cmd_resolve(&config, &target.platform(), target.format),
    Commands::Package { config, target } => cmd::cmd_package(&config, &target.platform(), target.format),
    Commands::Info { target } => cmd::cmd_info(&target.platform(), target.format),
  }
}
