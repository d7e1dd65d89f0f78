//! Settings for the dashboard and the finance service connection.

use std::time::Duration;

use crate::toast::DEFAULT_TOAST_TTL;

/// How often the dashboard refreshes the balance and transaction list.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// How many transactions the unfiltered dashboard view shows.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// The finance service used when no other URL is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// The config that controls the dashboard's refresh schedule and notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardConfig {
    /// The period of the background refresh of balance and transactions.
    pub refresh_interval: Duration,
    /// The number of transactions to request for the unfiltered view.
    pub recent_limit: usize,
    /// How long notifications stay visible unless dismissed.
    pub toast_ttl: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            recent_limit: DEFAULT_RECENT_LIMIT,
            toast_ttl: DEFAULT_TOAST_TTL,
        }
    }
}

/// Where to find the finance service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// The scheme, host and optional path prefix, e.g. "http://localhost:8080".
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_owned(),
        }
    }
}
