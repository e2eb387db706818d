//! On-demand per-tenant statistics.

use serde::Serialize;

/// A point-in-time view of one tenant's dispatch state.
///
/// Field names on the wire match what the operator UI expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantStats {
    /// Brand name.
    pub name: String,

    /// Tasks currently waiting in the tenant's queue.
    #[serde(rename = "queueDepth")]
    pub queue_depth: usize,

    /// Sends recorded inside the current rate window.
    #[serde(rename = "sentInWindow")]
    pub sent_in_window: usize,

    /// The tenant's configured rate limit.
    pub limit: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_ui_field_names() {
        let stats = TenantStats {
            name: "Acme".to_string(),
            queue_depth: 4,
            sent_in_window: 2,
            limit: 150,
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["name"], "Acme");
        assert_eq!(json["queueDepth"], 4);
        assert_eq!(json["sentInWindow"], 2);
        assert_eq!(json["limit"], 150);
    }
}
