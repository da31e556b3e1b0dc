//! Command to run the mock port allocator daemon.

use crate::error::CliError;
use crate::utils::{self, ConfigArgs, GlobalOptions};
use clap::Args;
use portmock::idle::DEFAULT_POLL_INTERVAL;
use portmock::logging::{init_logger, resolve_level};
use portmock::{server, AppState, Settings};

/// Run the daemon until it is stopped or left idle.
#[derive(Args)]
pub struct ServeCommand {
    #[command(flatten)]
    pub config: ConfigArgs,
}

impl ServeCommand {
    /// Execute the serve command.
    ///
    /// Returns once the server has shut down after `/stop` or a signal. Idle
    /// expiry ends the process directly with status 0.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let settings = self.config.load()?;

        let level = resolve_level(global.verbose, global.quiet, settings.debug);
        init_logger(level, settings.log_file.as_deref());

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        runtime.block_on(run(settings))
    }
}

async fn run(settings: Settings) -> Result<(), CliError> {
    let port = settings.server_port;
    log::info!("Server will start on port {port}");
    log::info!("To stop the server http://localhost:{port}/stop");
    log::debug!("{settings}");

    let state = AppState::new(&settings, &utils::server_name());
    let listener = server::bind(port).await?;

    let watchdog = state.supervisor.spawn_watchdog(
        DEFAULT_POLL_INTERVAL,
        state.shutdown.clone(),
        || std::process::exit(0),
    );

    let shutdown = state.shutdown.clone();
    tokio::spawn(async move {
        match utils::wait_for_shutdown_signal().await {
            Ok(()) => {
                log::info!("Shutdown signal received");
                shutdown.cancel();
            }
            Err(e) => log::warn!("Cannot listen for shutdown signals: {e}"),
        }
    });

    let result = server::serve(listener, state.clone()).await;

    state.shutdown.cancel();
    if let Err(e) = watchdog.await {
        log::warn!("Idle watchdog ended abnormally: {e}");
    }

    result?;
    log::info!("Server stopped");
    Ok(())
}
