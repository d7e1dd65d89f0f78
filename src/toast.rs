//! A process-wide queue of transient notifications ("toasts").
//!
//! Each toast expires on its own timer. The current queue can be read with
//! [ToastQueue::snapshot] or watched with [ToastQueue::subscribe] to re-render
//! whenever it changes.

use std::{
    collections::HashMap,
    fmt::Display,
    sync::{
        Arc, Mutex, Weak,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::{sync::watch, task::AbortHandle, time::Instant};

/// How long a toast stays visible when no other duration is given.
pub const DEFAULT_TOAST_TTL: Duration = Duration::from_millis(3500);

/// Toast types for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// An action completed.
    Success,
    /// An action failed.
    Error,
    /// Something the user should know, e.g. why an action was blocked.
    Info,
}

/// The identifier of a toast, strictly increasing in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(u64);

impl Display for ToastId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A message shown to the user until it expires or is dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// The identifier used to dismiss the toast.
    pub id: ToastId,
    /// How the toast should be styled.
    pub kind: ToastKind,
    /// The message.
    pub text: String,
    /// How long the toast is shown for. Zero means until dismissed.
    pub ttl: Duration,
}

/// A cheaply cloneable handle to the notification queue.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    counter: AtomicU64,
    default_ttl: Duration,
    toasts: watch::Sender<Vec<Toast>>,
    timers: Mutex<HashMap<ToastId, AbortHandle>>,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_TTL)
    }
}

impl ToastQueue {
    /// Create an empty queue whose toasts expire after `default_ttl` unless
    /// emitted with a different duration.
    pub fn new(default_ttl: Duration) -> Self {
        let (toasts, _) = watch::channel(Vec::new());

        Self {
            inner: Arc::new(Inner {
                counter: AtomicU64::new(0),
                default_ttl,
                toasts,
                timers: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Append a toast to the queue.
    ///
    /// `ttl` defaults to the queue's default duration. A zero `ttl` keeps the
    /// toast until it is dismissed. Each toast has its own timer, so emitting
    /// later toasts never delays the expiry of earlier ones.
    pub fn emit(&self, kind: ToastKind, text: impl Into<String>, ttl: Option<Duration>) -> ToastId {
        let id = ToastId(self.inner.counter.fetch_add(1, Ordering::Relaxed) + 1);
        let ttl = ttl.unwrap_or(self.inner.default_ttl);
        let toast = Toast {
            id,
            kind,
            text: text.into(),
            ttl,
        };

        tracing::debug!("Showing {kind:?} toast {id}: {}", toast.text);
        self.inner.toasts.send_modify(|toasts| toasts.push(toast));

        if !ttl.is_zero() {
            self.schedule_expiry(id, ttl);
        }

        id
    }

    /// Show a success toast.
    pub fn success(&self, text: impl Into<String>, ttl: Option<Duration>) -> ToastId {
        self.emit(ToastKind::Success, text, ttl)
    }

    /// Show an error toast.
    pub fn error(&self, text: impl Into<String>, ttl: Option<Duration>) -> ToastId {
        self.emit(ToastKind::Error, text, ttl)
    }

    /// Show an informational toast.
    pub fn info(&self, text: impl Into<String>, ttl: Option<Duration>) -> ToastId {
        self.emit(ToastKind::Info, text, ttl)
    }

    /// Remove the toast with `id` and cancel its timer.
    ///
    /// Does nothing if the toast has already expired or been dismissed.
    pub fn dismiss(&self, id: ToastId) {
        if let Some(timer) = self.lock_timers().remove(&id) {
            timer.abort();
        }

        self.remove(id);
    }

    /// Remove every toast and cancel all pending timers.
    pub fn clear(&self) {
        for (_, timer) in self.lock_timers().drain() {
            timer.abort();
        }

        self.inner.toasts.send_if_modified(|toasts| {
            let had_toasts = !toasts.is_empty();
            toasts.clear();
            had_toasts
        });
    }

    /// The toasts currently shown, oldest first.
    pub fn snapshot(&self) -> Vec<Toast> {
        self.inner.toasts.borrow().clone()
    }

    /// Watch the queue for changes.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.inner.toasts.subscribe()
    }

    fn remove(&self, id: ToastId) {
        self.inner.toasts.send_if_modified(|toasts| {
            let before = toasts.len();
            toasts.retain(|toast| toast.id != id);
            toasts.len() != before
        });
    }

    fn schedule_expiry(&self, id: ToastId, ttl: Duration) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime available, toast {id} will not expire on its own.");
            return;
        };

        // The countdown starts at emit, not when the timer task first runs.
        let deadline = Instant::now() + ttl;

        // Held until the handle is stored so a timer that fires immediately
        // still finds its own entry to remove.
        let mut timers = self.lock_timers();
        let queue: Weak<Inner> = Arc::downgrade(&self.inner);
        let timer = runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;

            if let Some(inner) = queue.upgrade() {
                let queue = ToastQueue { inner };
                queue.lock_timers().remove(&id);
                queue.remove(id);
            }
        });

        timers.insert(id, timer.abort_handle());
    }

    fn lock_timers(&self) -> std::sync::MutexGuard<'_, HashMap<ToastId, AbortHandle>> {
        self.inner
            .timers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[cfg(test)]
    fn pending_timers(&self) -> usize {
        self.lock_timers().len()
    }
}
