//! Rendering adapters subscribe to cart changes here.

use std::sync::{Arc, Mutex};

use super::CartSummary;

/// Receives the cart after every committed mutation.
pub trait CartObserver: Send {
    /// Redraw from the new summary.
    fn cart_changed(&mut self, summary: &CartSummary);

    /// Show a transient message such as "added to cart".
    fn notify(&mut self, _message: &str) {}
}

/// Observer that keeps the last summary and every notification.
///
/// Clones share state, so a caller can hand one to the cart and read the
/// other.
#[derive(Debug, Clone, Default)]
pub struct SnapshotObserver {
    inner: Arc<Mutex<Snapshot>>,
}

#[derive(Debug, Default)]
struct Snapshot {
    last: Option<CartSummary>,
    renders: usize,
    notifications: Vec<String>,
}

impl SnapshotObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent summary, if any change happened.
    #[must_use]
    pub fn last(&self) -> Option<CartSummary> {
        self.inner.lock().ok().and_then(|s| s.last.clone())
    }

    /// How many times the cart re-rendered.
    #[must_use]
    pub fn renders(&self) -> usize {
        self.inner.lock().map_or(0, |s| s.renders)
    }

    /// Notifications in arrival order.
    #[must_use]
    pub fn notifications(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|s| s.notifications.clone())
            .unwrap_or_default()
    }
}

impl CartObserver for SnapshotObserver {
    fn cart_changed(&mut self, summary: &CartSummary) {
        if let Ok(mut s) = self.inner.lock() {
            s.last = Some(summary.clone());
            s.renders += 1;
        }
    }

    fn notify(&mut self, message: &str) {
        if let Ok(mut s) = self.inner.lock() {
            s.notifications.push(message.to_string());
        }
    }
}
