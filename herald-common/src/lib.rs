//! Shared types for the herald dispatcher: tenant configuration, send
//! tasks, the bounded activity log, and process-wide signalling.

pub mod activity;
pub mod logging;
pub mod task;
pub mod tenant;

pub use activity::{ActivityLog, LogEntry, Severity};
pub use task::SendTask;
pub use tenant::TenantConfig;

/// Process-wide control signal, broadcast to every long-running task.
#[derive(Debug, Clone, Copy)]
pub enum Signal {
    Shutdown,
}
