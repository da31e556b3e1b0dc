//! Command to validate the daemon configuration.

use crate::error::CliError;
use crate::utils::{ConfigArgs, GlobalOptions};
use clap::Args;
use portmock::logging::{init_logger, resolve_level};

/// Resolve the configuration and print it without starting the daemon.
#[derive(Args)]
pub struct ValidateCommand {
    #[command(flatten)]
    pub config: ConfigArgs,
}

impl ValidateCommand {
    /// Execute the validate command.
    ///
    /// Prints the resolved `CFG{...}` line on success.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        init_logger(resolve_level(global.verbose, global.quiet, false), None);

        let settings = self.config.load()?;
        if let Some(ref source) = settings.source {
            log::info!("Loaded {}", source.display());
        }
        println!("{settings}");
        Ok(())
    }
}
