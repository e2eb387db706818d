//! Dispatch engine for outbound mail
//!
//! This crate is the concurrent core of herald:
//! - Track queued send tasks per tenant, strictly FIFO
//! - Gate delivery through a per-tenant sliding-window rate limit
//! - Run one long-lived worker per tenant, isolated from the others
//! - Resolve every task exactly once: sent, permanently failed, or
//!   retained while rate limited
//!
//! A failed send is discarded after a single attempt so a poison task can
//! never block its tenant's queue.

mod dispatcher;
mod queue;
mod rate_limiter;
mod render;
mod stats;
mod worker;

pub use dispatcher::{DispatchError, Dispatcher, DispatcherConfig, TenantHandle};
pub use queue::TenantQueue;
pub use rate_limiter::RateLimiter;
pub use render::{Rendered, render, rewrite_placeholders};
pub use stats::TenantStats;
pub use worker::DispatchWorker;
