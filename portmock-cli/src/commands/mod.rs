//! CLI command implementations.
//!
//! - `serve`: Run the daemon
//! - `validate`: Resolve and print the configuration
//! - `completions`: Generate shell completion scripts

pub mod completions;
pub mod serve;
pub mod validate;

pub use completions::CompletionsCommand;
pub use serve::ServeCommand;
pub use validate::ValidateCommand;
