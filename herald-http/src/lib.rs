//! HTTP surface for herald
//!
//! A thin transport over the dispatch engine: submissions are validated
//! and enqueued, outcomes are observed by polling the activity log and
//! stats endpoints. Nothing here blocks on delivery.
//!
//! # Endpoints
//!
//! - **`POST /send-email`** - Validate and enqueue one task per recipient
//! - **`GET /get-new-logs`** - Snapshot of the activity ring
//! - **`GET /stats`** - Per-brand queue depth and window-bounded sends
//! - **`GET /`**, **`GET /tool`** - Operator UI pages

mod error;
mod server;

pub use error::ApiError;
pub use server::{ApiServer, HttpConfig};
