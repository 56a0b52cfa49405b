mod cmd;
mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{cmd_create, cmd_info, cmd_resolve};
use output::{OutputFormat, print_error};

/// torchpkg - fetch and repackage prebuilt libtorch distributions
#[derive(Parser)]
#[command(name = "torchpkg")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose (debug) logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

/// Target selection shared by every subcommand that resolves an archive
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
  /// Target operating system: Windows, Linux or Macos (default: host)
  #[arg(long)]
  pub os: Option<String>,

  /// Fetch the CUDA 11.1 build and link the CUDA libraries
  #[arg(long)]
  pub cuda: bool,

  /// Distribution root to download from (default: $TORCHPKG_MIRROR or download.pytorch.org)
  #[arg(long)]
  pub mirror: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the upstream archive URL for a target
  Resolve {
    #[command(flatten)]
    target: TargetArgs,
  },

  /// Fetch, stage and describe a libtorch package
  Create {
    #[command(flatten)]
    target: TargetArgs,

    /// Target architecture: x86_64 or aarch64 (default: host)
    #[arg(long)]
    arch: Option<String>,

    /// Build type recorded in the package metadata
    #[arg(long, default_value = "Release")]
    build_type: String,

    /// Record the package as static (upstream only ships shared builds)
    #[arg(long = "static")]
    static_: bool,

    /// Use a local archive instead of downloading
    #[arg(long)]
    archive: Option<PathBuf>,

    /// Package output directory (default: $TORCHPKG_ROOT/<name>)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Fail when a copy pattern matches no files
    #[arg(long)]
    strict: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    output: OutputFormat,
  },

  /// Show host platform and link metadata
  Info {
    /// Include the CUDA libraries
    #[arg(long, conflicts_with = "package")]
    cuda: bool,

    /// Read metadata from an existing package instead
    #[arg(long)]
    package: Option<PathBuf>,

    /// Print Cargo build-script directives
    #[arg(long)]
    cargo: bool,
  },
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Resolve { target } => cmd_resolve(&target),
    Commands::Create {
      target,
      arch,
      build_type,
      static_,
      archive,
      output_dir,
      strict,
      output,
    } => cmd_create(cmd::CreateArgs {
      target,
      arch,
      build_type,
      shared: !static_,
      archive,
      output_dir,
      strict,
      output,
    }),
    Commands::Info { cuda, package, cargo } => cmd_info(cuda, package.as_deref(), cargo),
  };

  if let Err(err) = result {
    print_error(&format!("{:#}", err));
    std::process::exit(1);
  }
}
