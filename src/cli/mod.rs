//! CLI module for marketlens.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Version display
//! - Running a research session or a health check in the foreground
//!
//! # Usage
//!
//! ```ignore
//! use marketlens::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! let status = runtime.block_on(run_cli_command(command))?;
//! std::process::exit(status);
//! ```

pub mod args;
pub mod research;
pub mod version;

pub use args::{parse_args, CliCommand, ResearchArgs, USAGE};
pub use research::{run_health, run_research, ProgressLine, ProgressTracker};
pub use version::{handle_version_command, VERSION};

use color_eyre::Result;

/// Exit status for unusable arguments.
pub const EXIT_USAGE: i32 = 2;

/// Run a CLI command and return the process exit status.
///
/// # Note
///
/// The `Version` command never returns as it calls `std::process::exit(0)`.
pub async fn run_cli_command(command: CliCommand) -> Result<i32> {
    match command {
        CliCommand::Version => handle_version_command(),
        CliCommand::Help => {
            println!("{}", USAGE);
            Ok(0)
        }
        CliCommand::Invalid(message) => {
            eprintln!("error: {}", message);
            eprintln!();
            eprintln!("{}", USAGE);
            Ok(EXIT_USAGE)
        }
        CliCommand::Health { base_url, .. } => run_health(base_url.as_deref()).await,
        CliCommand::Research(args) => run_research(&args).await,
    }
}
