//! The per-tenant dispatch loop
//!
//! One worker runs per tenant for the lifetime of the process. Each
//! iteration resolves the head task to exactly one of three outcomes:
//! sent (recorded and removed), permanently failed (logged and removed),
//! or rate-limited (retained at the head, re-checked after a backoff).
//! The shutdown signal is observed between iterations; an in-flight send
//! is allowed to finish first.

use std::{sync::Arc, time::Duration};

use herald_common::{ActivityLog, SendTask, Signal};
use herald_smtp::Mailer;
use tokio::sync::broadcast;

use crate::{dispatcher::TenantHandle, render::render};

/// Long-lived dispatch loop for a single tenant.
pub struct DispatchWorker {
    handle: Arc<TenantHandle>,
    log: Arc<ActivityLog>,
    mailer: Arc<dyn Mailer>,
    known_cids: Arc<Vec<String>>,
    idle_interval: Duration,
    backoff_interval: Duration,
}

impl DispatchWorker {
    #[must_use]
    pub fn new(
        handle: Arc<TenantHandle>,
        log: Arc<ActivityLog>,
        mailer: Arc<dyn Mailer>,
        known_cids: Arc<Vec<String>>,
        idle_interval: Duration,
        backoff_interval: Duration,
    ) -> Self {
        Self {
            handle,
            log,
            mailer,
            known_cids,
            idle_interval,
            backoff_interval,
        }
    }

    /// Run until the shutdown signal arrives.
    ///
    /// Tasks still queued when the signal arrives are abandoned; nothing
    /// is persisted.
    pub async fn serve(self, mut shutdown: broadcast::Receiver<Signal>) {
        let tenant = self.handle.config.name.clone();
        tracing::info!(tenant = %tenant, "Dispatch worker started");

        loop {
            match shutdown.try_recv() {
                Ok(Signal::Shutdown) | Err(broadcast::error::TryRecvError::Closed) => break,
                Err(
                    broadcast::error::TryRecvError::Empty
                    | broadcast::error::TryRecvError::Lagged(_),
                ) => {}
            }

            let Some(task) = self.handle.queue.peek_head() else {
                if pause(&mut shutdown, self.idle_interval).await {
                    break;
                }
                continue;
            };

            if !self.handle.limiter.admit() {
                self.log.warning(
                    &tenant,
                    format!(
                        "Rate limit hit ({} per {}s). Pausing...",
                        self.handle.config.limit, self.handle.config.window_secs
                    ),
                );
                if pause(&mut shutdown, self.backoff_interval).await {
                    break;
                }
                continue;
            }

            self.process(&task).await;
            self.handle.queue.pop_head();
        }

        tracing::info!(tenant = %tenant, "Dispatch worker stopped");
    }

    /// Render and transmit one admitted task.
    ///
    /// Every outcome is terminal: the caller removes the task afterwards
    /// regardless of success, so a poison task cannot block the queue.
    async fn process(&self, task: &SendTask) {
        let tenant = &self.handle.config.name;
        let preview = task.subject_preview();

        let rendered = match render(task, &self.handle.config, &self.known_cids).await {
            Ok(rendered) => rendered,
            Err(e) => {
                self.log.error(
                    tenant,
                    format!("Failed \"{preview}\" to {}: {e}", task.recipient),
                );
                return;
            }
        };

        for warning in &rendered.warnings {
            self.log.warning(tenant, warning.clone());
        }

        match self
            .mailer
            .send(&self.handle.config, &rendered.envelope, &rendered.message)
            .await
        {
            Ok(()) => {
                self.handle.limiter.record();
                self.log.success(
                    tenant,
                    format!("Sent \"{preview}\" to {}", task.recipient),
                );
            }
            Err(e) => {
                self.log.error(
                    tenant,
                    format!("Failed \"{preview}\" to {}: {e}", task.recipient),
                );
            }
        }
    }
}

/// Sleep for `duration`, waking early on shutdown.
///
/// Returns `true` when the worker should exit.
async fn pause(shutdown: &mut broadcast::Receiver<Signal>, duration: Duration) -> bool {
    tokio::select! {
        () = tokio::time::sleep(duration) => false,
        sig = shutdown.recv() => matches!(
            sig,
            Ok(Signal::Shutdown) | Err(broadcast::error::RecvError::Closed)
        ),
    }
}
