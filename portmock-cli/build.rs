//! Build script for portmock-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Arguments shared by `serve` and `validate`.
fn config_args() -> Vec<Arg> {
    let value = |name: &'static str, value_name: &'static str, help: &'static str| {
        Arg::new(name).long(name).value_name(value_name).help(help)
    };

    vec![
        Arg::new("config")
            .value_name("CONFIG")
            .help("Configuration file (default: portmock.json)"),
        value("port", "PORT", "Port the daemon listens on"),
        value("min-port", "PORT", "Lower bound of the allocation range"),
        value("max-port", "PORT", "Upper bound of the allocation range"),
        value("min-timeout", "SECONDS", "Smallest idle timeout a client may set"),
        value("max-timeout", "SECONDS", "Largest idle timeout a client may set"),
        value("timeout", "SECONDS", "Idle timeout applied at startup"),
        value("log-file", "PATH", "Append log output to this file instead of stderr"),
        Arg::new("no-env")
            .long("no-env")
            .help("Ignore PORTMOCK_* environment variables")
            .action(ArgAction::SetTrue),
    ]
}

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs and
/// src/utils.rs. When adding/removing/modifying commands, update both files.
fn build_cli() -> Command {
    Command::new("portmock")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Mock port allocator for test harnesses")
        .long_about(
            "HTTP daemon that hands out collision-free port numbers to test harnesses \
             and exits by itself once left idle",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommands(vec![
            Command::new("serve")
                .about("Run the daemon")
                .long_about("Serve the port allocator over HTTP until stopped or left idle")
                .args(config_args()),
            Command::new("validate")
                .about("Resolve the configuration and print it")
                .long_about("Merge file, environment and flags, validate, and print the result")
                .args(config_args()),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    // Generate man pages at build time
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let app = build_cli();
    let man = Man::new(app);
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("portmock.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/utils.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
