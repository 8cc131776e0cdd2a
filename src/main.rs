mod commands;
mod core;
mod logging;
mod release;

use crate::core::config::VcsKind;
use crate::core::context::{Overrides, RepoContext};
use crate::core::error::{PortError, print_error};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Keep a derived port's build number in step with its upstream release
#[derive(Parser)]
#[command(name = "port-rail")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Commands,

  /// Project root containing both source trees (default: current directory)
  #[arg(long, global = true)]
  root: Option<PathBuf>,

  /// Version-control backend: auto, git or hg (overrides port-rail.toml)
  #[arg(long, global = true)]
  vcs: Option<VcsKind>,

  /// Maximum first-parent ancestors to search for a released upstream version
  #[arg(long, global = true)]
  max_depth: Option<usize>,

  /// Increase log verbosity (-v debug, -vv trace)
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
  /// Bump the derived version if the working copy has local changes
  Sync,

  /// Show the resolved upstream version and next build without writing
  Resolve {
    /// Output the plan in JSON format
    #[arg(long)]
    json: bool,
  },
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

fn main() {
  let cli = Cli::parse();
  logging::init_tracing(cli.verbose);

  let root = match cli.root {
    Some(root) => root,
    None => match std::env::current_dir() {
      Ok(dir) => dir,
      Err(e) => handle_error(PortError::message(format!("Failed to get current directory: {}", e))),
    },
  };

  let overrides = Overrides {
    vcs: cli.vcs,
    max_depth: cli.max_depth,
  };

  let ctx = match RepoContext::build(&root, &overrides) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::Sync => commands::run_sync(&ctx),
    Commands::Resolve { json } => commands::run_resolve(&ctx, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: PortError) -> ! {
  tracing::debug!(error = ?err, "aborting");
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
