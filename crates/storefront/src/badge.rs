//! Debounced cart-count badge updates.
//!
//! Mutations can arrive in rapid bursts (quantity spinners, repeated adds).
//! [`BadgeUpdater`] coalesces them: each `schedule()` call arms a timer for
//! the quiescent window and aborts any timer already pending, so the badge
//! is written at most once per burst, from the cart state read at fire time.

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use aurora_core::Cart;

/// A visible count badge (the DOM node analog).
///
/// Implementations expose the currently displayed text so the updater can
/// skip writes that would not change anything.
pub trait CountBadge: Send + Sync {
    /// The text currently displayed.
    fn text(&self) -> String;

    /// Replace the displayed text.
    fn set_text(&self, text: &str);

    /// Show or hide the badge.
    fn set_visible(&self, visible: bool);
}

/// Debounced updater for one or more count badges.
///
/// `schedule` and `cancel` are the only operations; the pending timer is an
/// explicit resource, replaced on every schedule (last call wins).
pub struct BadgeUpdater {
    cart: Arc<Mutex<Cart>>,
    badges: Vec<Arc<dyn CountBadge>>,
    delay: Duration,
    pending: StdMutex<Option<JoinHandle<()>>>,
}

impl BadgeUpdater {
    /// Create an updater over the shared cart state.
    #[must_use]
    pub fn new(cart: Arc<Mutex<Cart>>, badges: Vec<Arc<dyn CountBadge>>, delay: Duration) -> Self {
        Self {
            cart,
            badges,
            delay,
            pending: StdMutex::new(None),
        }
    }

    /// Schedule a badge update after the quiescent window.
    ///
    /// Invalidates any pending update and reschedules; the eventual write
    /// reads the cart state at execution time, not at call time.
    pub fn schedule(&self) {
        let cart = Arc::clone(&self.cart);
        let badges = self.badges.clone();
        let delay = self.delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let count = cart.lock().await.item_count();
            apply(&badges, count);
        });

        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    /// Abort any pending update.
    pub fn cancel(&self) {
        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }
}

impl Drop for BadgeUpdater {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Write the count to every badge whose displayed text differs.
fn apply(badges: &[Arc<dyn CountBadge>], count: u64) {
    let text = count.to_string();
    for badge in badges {
        if badge.text() != text {
            badge.set_text(&text);
            badge.set_visible(count > 0);
        }
    }
}
