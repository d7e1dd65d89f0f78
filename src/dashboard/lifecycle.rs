//! Mounting the dashboard: the initial load, the refresh timer and reloading
//! when the user navigates back to the dashboard.

use std::sync::{Arc, atomic::Ordering};

use tokio::{
    sync::broadcast::{self, error::RecvError},
    task::AbortHandle,
    time::{Instant, MissedTickBehavior},
};

use crate::{
    Error,
    endpoints::is_dashboard_route,
    navigation::NavigationEnd,
};

use super::Dashboard;

impl Dashboard {
    /// Start the dashboard.
    ///
    /// Loads the profile, balance and transactions, refreshes the balance and
    /// transactions every `refresh_interval` and reloads everything whenever
    /// the user navigates to the dashboard. All of this stops when the
    /// returned scope is dropped.
    ///
    /// # Errors
    /// Returns [Error::AlreadyMounted] if the dashboard has been mounted
    /// before, or [Error::Inactive] if the session has already ended.
    ///
    /// # Panics
    /// Panics if called outside of a tokio runtime.
    pub fn mount(self: &Arc<Self>) -> Result<DashboardScope, Error> {
        if !self.is_active() {
            return Err(Error::Inactive);
        }

        if self.mounted.swap(true, Ordering::SeqCst) {
            return Err(Error::AlreadyMounted);
        }

        // Subscribe before spawning anything so no navigation is missed.
        let navigation = self.navigator.subscribe();

        tokio::spawn({
            let dashboard = Arc::clone(self);
            async move { dashboard.reload().await }
        });

        let mut tasks = Vec::with_capacity(2);

        let period = self.config.refresh_interval;
        if period.is_zero() {
            tracing::info!("Periodic refresh is disabled.");
        } else {
            tasks.push(tokio::spawn(refresh_loop(Arc::clone(self))).abort_handle());
        }

        tasks.push(tokio::spawn(navigation_loop(Arc::clone(self), navigation)).abort_handle());

        tracing::debug!("Mounted the dashboard.");

        Ok(DashboardScope {
            dashboard: Arc::clone(self),
            tasks,
        })
    }
}

/// Owns the refresh timer and navigation subscription of a mounted dashboard.
///
/// Dropping the scope stops both and unmounts the dashboard, after which any
/// response that arrives is ignored.
#[must_use = "dropping the scope unmounts the dashboard"]
pub struct DashboardScope {
    dashboard: Arc<Dashboard>,
    tasks: Vec<AbortHandle>,
}

impl DashboardScope {
    /// The mounted dashboard.
    pub fn dashboard(&self) -> &Arc<Dashboard> {
        &self.dashboard
    }

    /// Unmount the dashboard.
    pub fn unmount(self) {}
}

impl Drop for DashboardScope {
    fn drop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }

        self.dashboard.mark_unmounted();
        tracing::debug!("Unmounted the dashboard.");
    }
}

async fn refresh_loop(dashboard: Arc<Dashboard>) {
    let period = dashboard.config.refresh_interval;
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        if !dashboard.is_active() {
            tracing::debug!("Stopping the refresh timer, the dashboard is no longer active.");
            break;
        }

        tracing::debug!("Refreshing the balance and transactions.");
        dashboard.refresh().await;
    }
}

async fn navigation_loop(
    dashboard: Arc<Dashboard>,
    mut navigation: broadcast::Receiver<NavigationEnd>,
) {
    loop {
        let reload = match navigation.recv().await {
            Ok(NavigationEnd { url }) => is_dashboard_route(&url),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("Missed {skipped} navigation events.");
                is_dashboard_route(&dashboard.navigator.current_url())
            }
            Err(RecvError::Closed) => break,
        };

        if !dashboard.is_active() {
            break;
        }

        if reload {
            tracing::debug!("Navigated to the dashboard, reloading.");
            dashboard.reload().await;
        }
    }
}
