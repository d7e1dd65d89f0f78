//! Tracks the current route and broadcasts navigation events.
//!
//! The dashboard subscribes to these events to reload when the user returns to
//! it, and navigates to the log in page when the session is rejected.

use std::sync::Mutex;

use tokio::sync::broadcast;

/// How many navigation events a slow subscriber may fall behind before it
/// starts missing them.
const EVENT_CAPACITY: usize = 16;

/// Emitted after the current route has changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEnd {
    /// The route navigated to, e.g. "/dashboard".
    pub url: String,
}

/// The application's router state.
#[derive(Debug)]
pub struct Navigator {
    current_url: Mutex<String>,
    events: broadcast::Sender<NavigationEnd>,
}

impl Navigator {
    /// Create a navigator that starts at `initial_url`.
    pub fn new(initial_url: &str) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            current_url: Mutex::new(initial_url.to_owned()),
            events,
        }
    }

    /// Change the current route and notify subscribers.
    pub fn navigate(&self, url: &str) {
        {
            let mut current_url = self
                .current_url
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            current_url.clear();
            current_url.push_str(url);
        }

        tracing::debug!("Navigated to {url}");

        // An error only means nobody is listening.
        let _ = self.events.send(NavigationEnd {
            url: url.to_owned(),
        });
    }

    /// The current route.
    pub fn current_url(&self) -> String {
        self.current_url
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Receive every navigation from now on.
    ///
    /// Dropping the receiver releases the subscription.
    pub fn subscribe(&self) -> broadcast::Receiver<NavigationEnd> {
        self.events.subscribe()
    }

    /// The number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }
}
