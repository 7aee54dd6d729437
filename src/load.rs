//! Sequenced list loads.
//!
//! A screen reloads whenever its filters change, and nothing orders the
//! responses: a slow answer to an old filter can arrive after the answer to
//! the new one. Each load therefore takes a [`LoadTicket`] carrying a
//! monotonically increasing sequence number. Starting a load cancels the
//! previous ticket, and [`LoadSlot::complete`] only applies a result whose
//! ticket is still the newest.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// Handle for one in-flight load.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    seq: u64,
    cancelled: Arc<AtomicBool>,
}

impl LoadTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Last applied result of a slot.
#[derive(Debug, Clone)]
pub struct LoadState<T> {
    pub items: Vec<T>,
    /// Message from the most recent failed load. Items are left as they were.
    pub error: Option<String>,
    pub loading: bool,
    /// Sequence number of the load that produced `items` (0 = never loaded).
    pub applied_seq: u64,
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            error: None,
            loading: false,
            applied_seq: 0,
        }
    }
}

pub struct LoadSlot<T> {
    next_seq: AtomicU64,
    inflight: Mutex<Option<Arc<AtomicBool>>>,
    state: RwLock<LoadState<T>>,
}

impl<T: Clone> Default for LoadSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> LoadSlot<T> {
    pub fn new() -> Self {
        Self {
            next_seq: AtomicU64::new(0),
            inflight: Mutex::new(None),
            state: RwLock::new(LoadState::default()),
        }
    }

    /// Start a load, superseding whatever was in flight.
    pub fn begin(&self) -> LoadTicket {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let cancelled = Arc::new(AtomicBool::new(false));

        if let Ok(mut inflight) = self.inflight.lock() {
            if let Some(previous) = inflight.replace(Arc::clone(&cancelled)) {
                previous.store(true, Ordering::SeqCst);
            }
        }
        if let Ok(mut state) = self.state.write() {
            state.loading = true;
        }

        LoadTicket { seq, cancelled }
    }

    /// Apply a finished load. Returns `false` when the result was stale or
    /// cancelled and has been discarded.
    pub fn complete(&self, ticket: &LoadTicket, result: Result<Vec<T>, String>) -> bool {
        if ticket.is_cancelled() || ticket.seq != self.latest_seq() {
            tracing::debug!(seq = ticket.seq, latest = self.latest_seq(), "Discarding stale load");
            return false;
        }
        let Ok(mut state) = self.state.write() else {
            return false;
        };
        if ticket.seq <= state.applied_seq {
            return false;
        }

        match result {
            Ok(items) => {
                state.items = items;
                state.error = None;
            }
            Err(message) => {
                tracing::warn!(seq = ticket.seq, error = %message, "Load failed");
                state.error = Some(message);
            }
        }
        state.loading = false;
        state.applied_seq = ticket.seq;

        if let Ok(mut inflight) = self.inflight.lock() {
            *inflight = None;
        }
        true
    }

    /// Cancel the in-flight load, if any.
    pub fn cancel(&self) {
        if let Ok(mut inflight) = self.inflight.lock() {
            if let Some(flag) = inflight.take() {
                flag.store(true, Ordering::SeqCst);
            }
        }
        if let Ok(mut state) = self.state.write() {
            state.loading = false;
        }
    }

    pub fn latest_seq(&self) -> u64 {
        self.next_seq.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> LoadState<T> {
        self.state
            .read()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn items(&self) -> Vec<T> {
        self.state
            .read()
            .map(|s| s.items.clone())
            .unwrap_or_default()
    }
}

/// Run `job` on the blocking pool and apply its result through `slot`.
///
/// Returns whether the result was applied. The job is skipped entirely when
/// a newer load supersedes it before it starts.
pub async fn spawn_load<T, F>(slot: Arc<LoadSlot<T>>, job: F) -> bool
where
    T: Clone + Send + Sync + 'static,
    F: FnOnce() -> Result<Vec<T>, String> + Send + 'static,
{
    let ticket = slot.begin();
    let guard = ticket.clone();

    let outcome = tokio::task::spawn_blocking(move || {
        if guard.is_cancelled() {
            return None;
        }
        Some(job())
    })
    .await;

    match outcome {
        Ok(Some(result)) => slot.complete(&ticket, result),
        Ok(None) => false,
        Err(e) => {
            tracing::error!(error = %e, "Load task failed");
            slot.complete(&ticket, Err(format!("load task failed: {e}")))
        }
    }
}
