//! Debounced count of tags currently on screen.
//!
//! Enabling a tag counts it immediately. Finishing one only uncounts it after
//! a delay, so a tag whose detector track is handed over to a fresh track for
//! the same physical object does not make the count dip to zero and back.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::presentation::TokenId;
use crate::sync::lock;

type CountListener = Box<dyn Fn(usize) + Send + Sync>;

#[derive(Default)]
struct VisibilityState {
    /// Enabled tags and the epoch of their latest enable.
    enabled: HashMap<TokenId, u64>,
    pending: HashMap<TokenId, JoinHandle<()>>,
    next_epoch: u64,
    closed: bool,
}

struct Shared {
    state: Mutex<VisibilityState>,
    delay: Duration,
    on_count_changed: CountListener,
}

/// Aggregates enabled tags across all trackers of a session.
#[derive(Clone)]
pub struct VisibilityCoordinator {
    shared: Arc<Shared>,
    runtime: Handle,
}

impl VisibilityCoordinator {
    /// `on_count_changed` runs with the coordinator's lock held, so calls are
    /// serialized and arrive in order. It must not call back into the
    /// coordinator.
    pub fn new(
        delay: Duration,
        runtime: Handle,
        on_count_changed: impl Fn(usize) + Send + Sync + 'static,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(VisibilityState::default()),
                delay,
                on_count_changed: Box::new(on_count_changed),
            }),
            runtime,
        }
    }

    /// Count `id` as visible and report the new count.
    ///
    /// Cancels a pending removal of the same id.
    pub fn on_tracker_enabled(&self, id: TokenId) {
        let mut state = lock(&self.shared.state);
        if state.closed {
            return;
        }
        if let Some(timer) = state.pending.remove(&id) {
            timer.abort();
        }
        let epoch = state.next_epoch;
        state.next_epoch += 1;
        state.enabled.insert(id, epoch);

        let count = state.enabled.len();
        tracing::debug!(id, count, "Tracker enabled");
        (self.shared.on_count_changed)(count);
    }

    /// Stop counting `id` once the debounce delay has passed.
    pub fn on_tracker_done(&self, id: TokenId) {
        let mut state = lock(&self.shared.state);
        if state.closed {
            return;
        }
        let Some(&epoch) = state.enabled.get(&id) else {
            return;
        };

        let shared = Arc::clone(&self.shared);
        let timer = self.runtime.spawn(async move {
            tokio::time::sleep(shared.delay).await;
            shared.expire(id, epoch);
        });
        if let Some(previous) = state.pending.insert(id, timer) {
            previous.abort();
        }
    }

    pub fn current_count(&self) -> usize {
        lock(&self.shared.state).enabled.len()
    }

    /// Cancel all pending removals. Later calls are ignored.
    pub fn shutdown(&self) {
        let mut state = lock(&self.shared.state);
        state.closed = true;
        for (_, timer) in state.pending.drain() {
            timer.abort();
        }
    }
}

impl Shared {
    fn expire(&self, id: TokenId, epoch: u64) {
        let mut state = lock(&self.state);
        // Re-enabled or torn down since the removal was scheduled.
        if state.closed || state.enabled.get(&id) != Some(&epoch) {
            return;
        }
        state.enabled.remove(&id);
        state.pending.remove(&id);

        let count = state.enabled.len();
        tracing::debug!(id, count, "Tracker no longer visible");
        (self.on_count_changed)(count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinator() -> (VisibilityCoordinator, Arc<Mutex<Vec<usize>>>) {
        let counts = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&counts);
        let coordinator = VisibilityCoordinator::new(
            Duration::from_millis(2000),
            Handle::current(),
            move |count| sink.lock().unwrap().push(count),
        );
        (coordinator, counts)
    }

    #[tokio::test(start_paused = true)]
    async fn test_enable_reports_immediately() {
        let (coordinator, counts) = coordinator();
        coordinator.on_tracker_enabled(1);
        coordinator.on_tracker_enabled(2);
        assert_eq!(*counts.lock().unwrap(), vec![1, 2]);
        assert_eq!(coordinator.current_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_done_is_debounced() {
        let (coordinator, counts) = coordinator();
        coordinator.on_tracker_enabled(1);
        coordinator.on_tracker_done(1);

        tokio::time::sleep(Duration::from_millis(1900)).await;
        assert_eq!(coordinator.current_count(), 1);
        assert_eq!(*counts.lock().unwrap(), vec![1]);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(coordinator.current_count(), 0);
        assert_eq!(*counts.lock().unwrap(), vec![1, 0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reenable_cancels_pending_removal() {
        let (coordinator, counts) = coordinator();
        coordinator.on_tracker_enabled(1);
        coordinator.on_tracker_done(1);
        tokio::time::sleep(Duration::from_millis(500)).await;
        coordinator.on_tracker_enabled(1);

        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert_eq!(coordinator.current_count(), 1);
        assert_eq!(*counts.lock().unwrap(), vec![1, 1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_done_for_unknown_id_is_ignored() {
        let (coordinator, counts) = coordinator();
        coordinator.on_tracker_done(9);
        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert!(counts.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_removals() {
        let (coordinator, counts) = coordinator();
        coordinator.on_tracker_enabled(1);
        coordinator.on_tracker_done(1);
        coordinator.shutdown();

        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert_eq!(*counts.lock().unwrap(), vec![1]);
        coordinator.on_tracker_enabled(2);
        assert_eq!(coordinator.current_count(), 1);
    }
}
