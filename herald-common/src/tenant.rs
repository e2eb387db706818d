//! Tenant (brand) configuration
//!
//! One `TenantConfig` exists per sending identity. Instances are loaded at
//! startup and never mutated afterwards; everything that varies at runtime
//! (queue contents, rate-limit history) lives elsewhere.

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

/// Immutable configuration for a single sending brand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    /// Display name of the brand, also used for routing and as the
    /// `From` display part.
    pub name: String,

    /// Hostname of the brand's outbound SMTP server.
    pub server: String,

    /// Port for the implicit-TLS SMTP endpoint.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Username for SMTP authentication, doubling as the sender address.
    pub user: String,

    /// Password for SMTP authentication.
    pub pass: String,

    /// Path to the brand logo attached inline to HTML mail, if any.
    #[serde(default)]
    pub logo: Option<PathBuf>,

    /// Content-ID token linking the HTML body to the inline logo.
    pub cid: String,

    /// Maximum number of sends within one rate window.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Length of the sliding rate window, in seconds.
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

const fn default_port() -> u16 {
    465
}

const fn default_limit() -> usize {
    150
}

const fn default_window_secs() -> u64 {
    3600
}

impl TenantConfig {
    /// Whether `brand` names this tenant, ignoring case and surrounding
    /// whitespace.
    #[must_use]
    pub fn matches(&self, brand: &str) -> bool {
        self.name.eq_ignore_ascii_case(brand.trim())
    }

    /// The `host:port` address of the tenant's SMTP endpoint.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.server, self.port)
    }

    /// The `From` header value, e.g. `Acme <hello@mail.acme.example>`.
    #[must_use]
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.name, self.user)
    }

    /// The sliding rate window as a [`Duration`].
    #[must_use]
    pub const fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}
