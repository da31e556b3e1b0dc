//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{CompletionsCommand, ServeCommand, ValidateCommand};
use clap::{Parser, Subcommand};

/// Mock port allocator daemon for test harnesses.
#[derive(Parser)]
#[command(name = "portmock")]
#[command(version, about = "Mock port allocator for test harnesses", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Run the daemon
    Serve(ServeCommand),

    /// Resolve the configuration and print it
    Validate(ValidateCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
