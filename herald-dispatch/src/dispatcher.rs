//! Dispatcher facade: tenant routing, worker lifecycle, and reporting
//!
//! The dispatcher owns one queue and one rate limiter per tenant plus the
//! shared activity log. Tenants are fully independent: a worker only ever
//! touches its own tenant's state, so there is no cross-tenant locking.

use std::{sync::Arc, time::Duration};

use herald_common::{ActivityLog, SendTask, Signal, TenantConfig};
use herald_smtp::Mailer;
use serde::Deserialize;
use thiserror::Error;
use tokio::{sync::broadcast, task::JoinHandle};

use crate::{queue::TenantQueue, rate_limiter::RateLimiter, stats::TenantStats, worker::DispatchWorker};

/// Errors raised while assembling the dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The configuration contained no tenants.
    #[error("at least one tenant must be configured")]
    NoTenants,
}

const fn default_idle_interval() -> u64 {
    1
}

const fn default_backoff_interval() -> u64 {
    10
}

/// Tunables for the worker loops.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatcherConfig {
    /// How long a worker sleeps when its queue is empty (in seconds).
    #[serde(default = "default_idle_interval")]
    pub idle_interval_secs: u64,

    /// How long a rate-limited worker backs off before re-checking the
    /// head task (in seconds).
    #[serde(default = "default_backoff_interval")]
    pub backoff_interval_secs: u64,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            idle_interval_secs: default_idle_interval(),
            backoff_interval_secs: default_backoff_interval(),
        }
    }
}

/// Everything owned by a single tenant: its immutable configuration, its
/// task queue, and its rate-limit history.
#[derive(Debug)]
pub struct TenantHandle {
    pub config: TenantConfig,
    pub(crate) queue: TenantQueue,
    pub(crate) limiter: RateLimiter,
}

impl TenantHandle {
    fn new(config: TenantConfig) -> Self {
        let limiter = RateLimiter::new(config.limit, config.window());
        Self {
            config,
            queue: TenantQueue::new(),
            limiter,
        }
    }

    /// Append a task to this tenant's queue.
    pub fn enqueue(&self, task: SendTask) {
        self.queue.enqueue(task);
    }

    /// Current queue depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.queue.depth()
    }

    fn stats(&self) -> TenantStats {
        TenantStats {
            name: self.config.name.clone(),
            queue_depth: self.queue.depth(),
            sent_in_window: self.limiter.sent_in_window(),
            limit: self.limiter.limit(),
        }
    }
}

/// The dispatch engine for all configured tenants.
pub struct Dispatcher {
    tenants: Vec<Arc<TenantHandle>>,
    log: Arc<ActivityLog>,
    known_cids: Arc<Vec<String>>,
    config: DispatcherConfig,
}

impl Dispatcher {
    /// Build a dispatcher from tenant configurations.
    ///
    /// The first tenant becomes the primary routing fallback.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NoTenants`] when `tenants` is empty.
    pub fn new(
        tenants: Vec<TenantConfig>,
        log: Arc<ActivityLog>,
        config: DispatcherConfig,
    ) -> Result<Self, DispatchError> {
        if tenants.is_empty() {
            return Err(DispatchError::NoTenants);
        }

        let known_cids = Arc::new(tenants.iter().map(|t| t.cid.clone()).collect::<Vec<_>>());
        let tenants = tenants
            .into_iter()
            .map(|config| Arc::new(TenantHandle::new(config)))
            .collect();

        Ok(Self {
            tenants,
            log,
            known_cids,
            config,
        })
    }

    /// Resolve a brand name to its tenant, case-insensitively.
    ///
    /// An unrecognised or absent brand routes to the primary tenant.
    #[must_use]
    pub fn route(&self, brand: Option<&str>) -> &Arc<TenantHandle> {
        brand
            .and_then(|brand| {
                self.tenants
                    .iter()
                    .find(|handle| handle.config.matches(brand))
            })
            .unwrap_or(&self.tenants[0])
    }

    /// All tenants, in configuration order.
    pub fn tenants(&self) -> impl Iterator<Item = &Arc<TenantHandle>> {
        self.tenants.iter()
    }

    /// The shared activity log.
    #[must_use]
    pub fn activity(&self) -> &Arc<ActivityLog> {
        &self.log
    }

    /// Per-tenant queue depth and window-bounded send counts.
    ///
    /// Read-only; never mutates limiter state.
    #[must_use]
    pub fn report(&self) -> Vec<TenantStats> {
        self.tenants.iter().map(|handle| handle.stats()).collect()
    }

    /// Start one worker task per tenant.
    ///
    /// Workers run until `shutdown` broadcasts [`Signal::Shutdown`];
    /// whatever is still queued at that point is abandoned.
    #[must_use]
    pub fn spawn_workers(
        &self,
        mailer: Arc<dyn Mailer>,
        shutdown: &broadcast::Sender<Signal>,
    ) -> Vec<JoinHandle<()>> {
        let idle = Duration::from_secs(self.config.idle_interval_secs);
        let backoff = Duration::from_secs(self.config.backoff_interval_secs);

        self.tenants
            .iter()
            .map(|handle| {
                let worker = DispatchWorker::new(
                    Arc::clone(handle),
                    Arc::clone(&self.log),
                    Arc::clone(&mailer),
                    Arc::clone(&self.known_cids),
                    idle,
                    backoff,
                );
                tokio::spawn(worker.serve(shutdown.subscribe()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant(name: &str, cid: &str) -> TenantConfig {
        TenantConfig {
            name: name.to_string(),
            server: "mail.example.com".to_string(),
            port: 465,
            user: format!("{}@mail.example.com", name.to_lowercase()),
            pass: "secret".to_string(),
            logo: None,
            cid: cid.to_string(),
            limit: 150,
            window_secs: 3600,
        }
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(
            vec![
                tenant("Talrn", "talrn_logo"),
                tenant("Leadersfirst", "leaders_logo"),
            ],
            Arc::new(ActivityLog::new()),
            DispatcherConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn empty_tenant_list_is_rejected() {
        let result = Dispatcher::new(
            Vec::new(),
            Arc::new(ActivityLog::new()),
            DispatcherConfig::default(),
        );
        assert!(matches!(result, Err(DispatchError::NoTenants)));
    }

    #[test]
    fn routing_is_case_insensitive() {
        let dispatcher = dispatcher();
        assert_eq!(
            dispatcher.route(Some("LEADERSFIRST")).config.name,
            "Leadersfirst"
        );
        assert_eq!(dispatcher.route(Some("talrn")).config.name, "Talrn");
    }

    #[test]
    fn unknown_or_absent_brand_routes_to_primary() {
        let dispatcher = dispatcher();
        assert_eq!(dispatcher.route(Some("nobody")).config.name, "Talrn");
        assert_eq!(dispatcher.route(None).config.name, "Talrn");
    }

    #[test]
    fn report_covers_every_tenant() {
        let dispatcher = dispatcher();
        let handle = dispatcher.route(Some("Talrn"));
        handle.enqueue(SendTask {
            recipient: "a@x.com".to_string(),
            subject: "Hi".to_string(),
            body: String::new(),
            is_html: false,
            reply_to: None,
            tenant: "Talrn".to_string(),
        });

        let report = dispatcher.report();
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].name, "Talrn");
        assert_eq!(report[0].queue_depth, 1);
        assert_eq!(report[0].sent_in_window, 0);
        assert_eq!(report[1].name, "Leadersfirst");
        assert_eq!(report[1].queue_depth, 0);
    }

    #[test]
    fn config_defaults() {
        let config: DispatcherConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.idle_interval_secs, 1);
        assert_eq!(config.backoff_interval_secs, 10);
    }
}
