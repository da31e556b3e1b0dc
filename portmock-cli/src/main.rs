//! Main entry point for the portmock CLI.
//!
//! `portmock serve` runs the mock port allocator daemon:
//! - `GET /test/{port}` reserves a port or suggests a free one
//! - `GET /list`, `/status`, `/ping` report state
//! - `GET /reset`, `/timeout/{seconds}`, `/stop` control the daemon
//!
//! The daemon exits by itself once it has been idle for the configured
//! timeout.

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use error::CliError;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    // Execute the command
    let result = if global.verbose && global.quiet {
        Err(CliError::InvalidArguments(
            "--verbose and --quiet cannot be used together".to_string(),
        ))
    } else {
        match cli.command {
            cli::Command::Serve(cmd) => cmd.execute(&global),
            cli::Command::Validate(cmd) => cmd.execute(&global),
            cli::Command::Completions(cmd) => cmd.execute(&global),
        }
    };

    portmock::logging::flush();

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
