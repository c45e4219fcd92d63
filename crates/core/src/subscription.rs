//! Disposable handles for live snapshot streams.
//!
//! A subscription owns a background task that re-fetches a snapshot every
//! time the change feed reports a write to the watched venue, and hands it
//! to the subscriber's callback. Once [`Subscription::unsubscribe`] returns,
//! no callback runs again; a snapshot whose fetch was already in flight is
//! dropped on the floor.

use std::cell::Cell;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::DeskResult;
use crate::store::{ChangeEvent, Collection};

pub type Callback<T> = Arc<dyn Fn(DeskResult<T>) + Send + Sync>;

static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    // Subscription whose callback is running on this thread, if any.
    static DELIVERING: Cell<Option<u64>> = const { Cell::new(None) };
}

struct SubscriptionState {
    id: u64,
    cancelled: AtomicBool,
    delivery: Mutex<()>,
    token: CancellationToken,
}

struct DeliveringGuard;

impl DeliveringGuard {
    fn enter(id: u64) -> Self {
        DELIVERING.with(|current| current.set(Some(id)));
        DeliveringGuard
    }
}

impl Drop for DeliveringGuard {
    fn drop(&mut self) {
        DELIVERING.with(|current| current.set(None));
    }
}

impl SubscriptionState {
    fn new() -> Self {
        Self {
            id: NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed),
            cancelled: AtomicBool::new(false),
            delivery: Mutex::new(()),
            token: CancellationToken::new(),
        }
    }

    /// Runs `callback` unless the subscription has been torn down.
    /// Returns false when delivery was refused.
    fn deliver(&self, callback: impl FnOnce()) -> bool {
        let _delivery = self.delivery.lock().unwrap_or_else(PoisonError::into_inner);
        if self.cancelled.load(Ordering::Acquire) {
            return false;
        }
        let _guard = DeliveringGuard::enter(self.id);
        callback();
        true
    }

    fn cancel(&self) {
        if self.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }
        self.token.cancel();

        // Called from our own callback: that delivery is the last one.
        let reentrant = DELIVERING.with(|current| current.get() == Some(self.id));
        if !reentrant {
            // Wait out a callback running on another thread.
            drop(self.delivery.lock().unwrap_or_else(PoisonError::into_inner));
        }
        debug!("Subscription {} cancelled", self.id);
    }
}

/// Handle to a live snapshot stream. Dropping it unsubscribes.
#[must_use = "dropping a Subscription cancels it"]
pub struct Subscription {
    state: Arc<SubscriptionState>,
}

impl Subscription {
    /// Stops delivery. Safe to call repeatedly and from inside the
    /// subscription's own callback.
    pub fn unsubscribe(&self) {
        self.state.cancel();
    }

    pub fn is_active(&self) -> bool {
        !self.state.cancelled.load(Ordering::Acquire)
    }

    /// Spawns the snapshot task on the current Tokio runtime.
    ///
    /// An initial snapshot is fetched immediately; afterwards every change
    /// event for (`collection`, `venue_id`) triggers a re-fetch. A lagging
    /// receiver re-fetches too, since snapshots supersede each other.
    pub fn spawn<T, F, Fut>(
        mut changes: broadcast::Receiver<ChangeEvent>,
        collection: Collection,
        venue_id: String,
        fetch: F,
        on_change: Callback<T>,
    ) -> Self
    where
        T: Send + 'static,
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = DeskResult<T>> + Send,
    {
        let state = Arc::new(SubscriptionState::new());
        let task_state = Arc::clone(&state);

        debug!(
            "Subscription {} watching {} for venue {}",
            state.id, collection, venue_id
        );

        tokio::spawn(async move {
            let token = task_state.token.clone();
            let mut stale = true;

            loop {
                if stale {
                    stale = false;
                    let snapshot = tokio::select! {
                        _ = token.cancelled() => break,
                        snapshot = fetch() => snapshot,
                    };
                    if let Err(err) = &snapshot {
                        warn!("Subscription {} fetch failed: {}", task_state.id, err);
                    }
                    if !task_state.deliver(|| on_change(snapshot)) {
                        break;
                    }
                }

                tokio::select! {
                    _ = token.cancelled() => break,
                    event = changes.recv() => match event {
                        Ok(event) => {
                            stale = event.collection == collection && event.venue_id == venue_id;
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            debug!("Subscription {} lagged by {} events", task_state.id, skipped);
                            stale = true;
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }

            debug!("Subscription {} task finished", task_state.id);
        });

        Self { state }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.state.cancel();
    }
}
