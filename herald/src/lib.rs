//! Process wiring for the herald dispatcher.

pub mod config;

use std::sync::Arc;

use herald_common::{ActivityLog, Signal};
use herald_dispatch::Dispatcher;
use herald_http::ApiServer;
use herald_smtp::{Mailer, SmtpsMailer};
use tokio::sync::broadcast;

pub use config::{Config, ConfigError};

/// The assembled application.
pub struct Herald {
    config: Config,
}

impl Herald {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the dispatcher and API server until a termination signal.
    ///
    /// # Errors
    ///
    /// Returns an error if startup fails; runtime failures are handled
    /// in place and never tear the process down.
    pub async fn run(self) -> anyhow::Result<()> {
        let log = Arc::new(ActivityLog::new());
        let dispatcher = Arc::new(Dispatcher::new(
            self.config.tenants,
            Arc::clone(&log),
            self.config.dispatcher,
        )?);

        let (shutdown_tx, _) = broadcast::channel::<Signal>(64);

        let mailer: Arc<dyn Mailer> = Arc::new(SmtpsMailer::new());
        let workers = dispatcher.spawn_workers(mailer, &shutdown_tx);

        let server = ApiServer::new(self.config.http, Arc::clone(&dispatcher)).await?;
        let server_handle = tokio::spawn(server.serve(shutdown_tx.subscribe()));

        log.info("System", "System started. Workers ready.");

        shutdown_signal().await?;

        let _ = shutdown_tx.send(Signal::Shutdown);

        for worker in workers {
            let _ = worker.await;
        }
        server_handle.await??;

        tracing::info!("Shutdown complete");
        Ok(())
    }
}

/// Wait for CTRL+C or SIGTERM.
async fn shutdown_signal() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        let mut terminate =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("CTRL+C received, shutting down");
            }
            _ = terminate.recv() => {
                tracing::info!("Terminate signal received, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}
