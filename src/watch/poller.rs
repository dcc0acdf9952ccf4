//! Polling scheduler that drives automatic rebuilds.

use crate::core::{DelegateBuilder, HotswapFactory};
use crate::watch::ChangeTracker;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error};

/// Periodically checks the configuration sources for timestamp changes and
/// refreshes the factory when any source moved.
///
/// One poller drives one factory handle. All ticks run on a single Tokio
/// task with serial awaits, so ticks never overlap; if a rebuild outlasts
/// the interval, the ticks it covered are skipped rather than fired in a
/// burst.
///
/// The tracker carrying last-observed timestamps outlives the tick task:
/// changing the interval restarts the task but keeps the accumulated watch
/// state, so an interval toggle alone never causes a false-positive
/// rebuild.
///
/// Errors from a rebuild are caught and logged; a single failed attempt
/// never disables subsequent polling. Source read failures are absorbed one
/// level down, in [`ChangeTracker::has_any_changed`].
///
/// The builder wires a poller into every factory handle it constructs;
/// constructing one directly is only needed when driving a bare
/// [`HotswapFactory`] by hand.
pub struct Poller<B: DelegateBuilder> {
    factory: HotswapFactory<B>,
    tracker: Arc<Mutex<ChangeTracker>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<B: DelegateBuilder> Poller<B> {
    /// Create a stopped poller driving the given factory handle.
    pub fn new(factory: HotswapFactory<B>) -> Self {
        Self {
            factory,
            tracker: Arc::new(Mutex::new(ChangeTracker::new())),
            task: Mutex::new(None),
        }
    }

    /// Cancel the tick task. Idempotent; a tick already in flight runs to
    /// completion, but no future tick fires.
    pub fn stop(&self) {
        if let Some(task) = self.task.lock().take() {
            task.abort();
        }
    }

    /// Whether a tick task is currently scheduled.
    pub fn is_running(&self) -> bool {
        self.task.lock().as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Discard accumulated watch state; used when the source set is
    /// replaced wholesale.
    pub(crate) fn reset_watch_state(&self) {
        self.tracker.lock().reset();
    }
}

impl<B: DelegateBuilder + 'static> Poller<B> {
    /// Start ticking every `every`, first tick immediate.
    ///
    /// A zero interval leaves the poller stopped — polling disabled is a
    /// valid configuration, not an error. Restarting an already-running
    /// poller replaces its schedule while keeping the watch state. Must be
    /// called within a Tokio runtime.
    pub fn start(&self, every: Duration) {
        self.stop();
        if every.is_zero() {
            return;
        }
        debug!(interval_ms = every.as_millis() as u64, "starting poll schedule");
        let task = tokio::spawn(poll_loop(
            self.factory.clone(),
            Arc::clone(&self.tracker),
            every,
        ));
        *self.task.lock() = Some(task);
    }

    /// Replace the schedule with a new interval, preserving watch state.
    ///
    /// Zero stops the poller; a positive interval (re-)starts it.
    pub fn set_interval(&self, every: Duration) {
        self.start(every);
    }
}

impl<B: DelegateBuilder> Drop for Poller<B> {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_loop<B: DelegateBuilder + 'static>(
    factory: HotswapFactory<B>,
    tracker: Arc<Mutex<ChangeTracker>>,
    every: Duration,
) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        let sources = factory.sources();
        let changed = tracker.lock().has_any_changed(&sources);
        if !changed {
            continue;
        }
        debug!("configuration sources changed, rebuilding delegate");
        if let Err(error) = factory.refresh() {
            error!(%error, "delegate rebuild failed; keeping previous delegate");
        }
    }
}
