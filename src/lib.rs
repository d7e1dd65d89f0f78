//! A personal finance dashboard client.
//!
//! The dashboard shows the logged in user's balance, their recent or filtered
//! transactions and their profile, all fetched from a finance service over
//! HTTP. While mounted it refreshes the balance and transactions on a timer
//! and reloads everything whenever the user navigates back to it. Outcomes of
//! the user's actions are reported through a queue of self-expiring toasts.
//!
//! The dashboard only depends on the [TransactionGateway], [UserGateway] and
//! [SessionProvider] traits. The [http] module implements the gateways over
//! the service's JSON API.

#![warn(missing_docs)]

use tokio::signal;

mod cache;
mod config;
mod dashboard;
mod datetime;
mod endpoints;
mod error;
pub mod format;
mod gateway;
pub mod http;
mod logging;
mod navigation;
mod news;
mod session;
mod toast;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use cache::{CachedValue, Clock, SystemClock, TtlCache, is_stale};
pub use config::{
    ApiConfig, DEFAULT_API_BASE_URL, DEFAULT_RECENT_LIMIT, DEFAULT_REFRESH_INTERVAL,
    DashboardConfig,
};
pub use dashboard::{Dashboard, DashboardPhase, DashboardScope, DashboardState};
pub use datetime::{format_transport_datetime, local_input_to_transport, parse_transport_datetime};
pub use endpoints::{DASHBOARD_VIEW, LOG_IN_VIEW, is_dashboard_route};
pub use error::{Error, ValidationError};
pub use gateway::{TransactionGateway, UserGateway};
pub use logging::{LOG_BODY_LENGTH_LIMIT, redact_secrets};
pub use navigation::{NavigationEnd, Navigator};
pub use news::{NEWS_CACHE_TTL, NewsArticle, NewsCategory, NewsFeed, NewsSource};
pub use session::{Session, SessionProvider};
pub use toast::{DEFAULT_TOAST_TTL, Toast, ToastId, ToastKind, ToastQueue};
pub use transaction::{
    NewTransactionDraft, Transaction, TransactionFilter, TransactionId, TransactionKind,
    TransactionView, coerce_amount,
};
pub use user::{ProfileDraft, ProfileUpdate, UserID, UserProfile};

/// Waits for either the ctrl+c or terminate signal, whichever comes first.
///
/// If a signal handler cannot be installed the error is logged and that
/// signal is never received.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("Failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
        },
    }
}
