//! Holds the bearer token for the logged in user.

use std::sync::RwLock;

/// Supplies the bearer token for requests and ends the session.
pub trait SessionProvider: Send + Sync {
    /// The current bearer token, if the user is logged in.
    fn token(&self) -> Option<String>;

    /// Forget the token.
    fn logout(&self);
}

/// An in-memory [SessionProvider].
#[derive(Debug, Default)]
pub struct Session {
    token: RwLock<Option<String>>,
}

impl Session {
    /// Create a session, optionally starting with a token from an earlier log in.
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token.filter(|token| !token.is_empty())),
        }
    }

    /// Store the token returned by a successful log in.
    pub fn set_token(&self, token: String) {
        let mut guard = self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(token);
    }
}

impl SessionProvider for Session {
    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn logout(&self) {
        let mut guard = self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if guard.take().is_some() {
            tracing::info!("Logged out, session token cleared.");
        }
    }
}
