mod commands;
mod core;
mod gmm;
mod release;
mod relocate;
mod ui;
mod utils;

use clap::{Parser, Subcommand};
use core::error::{PublishError, print_error};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use utils::ChecksumAlgorithm;

/// Publish Gradle module publications as GitHub release assets
#[derive(Parser)]
#[command(name = "gh-asset-publish")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  verbose: u8,

  /// Path to gap.toml (default: search the current directory)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Relocation
  // ============================================================================
  /// Flatten a module file and everything it references into one directory
  Prepare {
    /// Root .module file
    module_file: PathBuf,
    /// Output directory (deleted and recreated)
    #[arg(short, long)]
    destination: PathBuf,
    /// Additional .module files to relocate alongside the root
    #[arg(long = "with", value_name = "MODULE_FILE")]
    with: Vec<PathBuf>,
    /// Output the relocation report in JSON format
    #[arg(long)]
    json: bool,
  },

  // ============================================================================
  // Releases
  // ============================================================================
  /// Upload a prepared directory as assets of a GitHub release
  Upload {
    /// GitHub repository (owner/repo)
    #[arg(long)]
    repo: String,
    /// Release tag (the publication version)
    #[arg(long)]
    tag: String,
    /// Directory whose files are uploaded
    #[arg(long)]
    release_dir: PathBuf,
    /// Create a draft release when the tag has none
    #[arg(long)]
    create_if_missing: bool,
    /// Release tool executable
    #[arg(long, default_value = "gh")]
    release_tool: String,
  },

  /// Prepare and upload every enabled publication in gap.toml
  Publish {
    /// Prepare only and list what would be uploaded
    #[arg(long)]
    dry_run: bool,
  },

  // ============================================================================
  // Utilities
  // ============================================================================
  /// Print the checksum of a file
  Checksum {
    file: PathBuf,
    #[arg(short, long, value_enum, default_value = "sha256")]
    algorithm: ChecksumAlgorithm,
  },

  /// Create a gap.toml in the current directory
  Init,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn init_tracing(verbose: u8) {
  let filter = match verbose {
    0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    1 => EnvFilter::new("info"),
    2 => EnvFilter::new("debug"),
    _ => EnvFilter::new("trace"),
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);
  tracing::debug!(version = env!("CARGO_PKG_VERSION"), "gh-asset-publish starting");

  let result = match cli.command {
    Commands::Prepare {
      module_file,
      destination,
      with,
      json,
    } => commands::run_prepare(module_file, destination, with, cli.config, json),
    Commands::Upload {
      repo,
      tag,
      release_dir,
      create_if_missing,
      release_tool,
    } => commands::run_upload(repo, tag, release_dir, create_if_missing, release_tool),
    Commands::Publish { dry_run } => commands::run_publish(cli.config, dry_run),
    Commands::Checksum { file, algorithm } => commands::run_checksum(file, algorithm),
    Commands::Init => commands::run_init(),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: PublishError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
