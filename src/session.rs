//! Per-session smoothing and metrics state.
//!
//! Each stream of frames gets its own smoother and metrics windows so one
//! client's emotional history never bleeds into another's results. Sessions
//! are created on first use and removed explicitly or after idling.

use crate::{
    metrics::{MetricsSnapshot, MetricsTracker},
    smoothing::TemporalSmoother,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Mutable state owned by one session
#[derive(Debug)]
pub struct SessionState {
    pub smoother: TemporalSmoother,
    pub metrics: MetricsTracker,
    last_used: Instant,
}

impl SessionState {
    #[must_use]
    pub fn new(smoothing_window: usize, metrics_window: usize) -> Self {
        Self {
            smoother: TemporalSmoother::new(smoothing_window),
            metrics: MetricsTracker::new(metrics_window),
            last_used: Instant::now(),
        }
    }

    /// Mark the session as used now
    pub fn touch(&mut self) {
        self.last_used = Instant::now();
    }

    /// Clear both the smoothing and the metrics windows
    pub fn reset(&mut self) {
        self.smoother.reset();
        self.metrics.reset();
    }

    #[must_use]
    pub fn idle_for(&self) -> Duration {
        self.last_used.elapsed()
    }

    #[must_use]
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            smoothing_samples: self.smoother.len(),
            frame_samples: self.metrics.frame_samples(),
            inference_samples: self.metrics.inference_samples(),
            metrics: self.metrics.snapshot(),
            idle: self.idle_for(),
        }
    }
}

/// Read-only view of a session's buffers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionStats {
    pub smoothing_samples: usize,
    pub frame_samples: usize,
    pub inference_samples: usize,
    pub metrics: MetricsSnapshot,
    pub idle: Duration,
}

/// Shared handle to one session's state
pub type SessionHandle = Arc<Mutex<SessionState>>;

/// Lock a session, recovering the state if a previous holder panicked
///
/// Every mutation under the lock is a complete ring-buffer push or clear, so
/// the state is consistent even after a poisoning panic.
pub fn lock_session(session: &SessionHandle) -> MutexGuard<'_, SessionState> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Map from session id to session state
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SessionHandle>>,
    smoothing_window: usize,
    metrics_window: usize,
}

impl SessionRegistry {
    #[must_use]
    pub fn new(smoothing_window: usize, metrics_window: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            smoothing_window,
            metrics_window,
        }
    }

    /// Existing session, if any
    #[must_use]
    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Existing session, or a fresh one registered under `id`
    pub fn get_or_create(&self, id: &str) -> SessionHandle {
        if let Some(session) = self.get(id) {
            return session;
        }

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions
            .entry(id.to_string())
            .or_insert_with(|| self.create(id))
            .clone()
    }

    /// Run `f` on the state of session `id`, creating the session if needed
    ///
    /// The registry lock is held until `f` returns, so `remove` and
    /// `evict_idle` see the session either before or after the update,
    /// never in between.
    pub fn update<R>(&self, id: &str, f: impl FnOnce(&mut SessionState) -> R) -> R {
        {
            let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(session) = sessions.get(id) {
                let result = f(&mut lock_session(session));
                return result;
            }
        }

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let session = sessions.entry(id.to_string()).or_insert_with(|| self.create(id));
        let result = f(&mut lock_session(session));
        result
    }

    fn create(&self, id: &str) -> SessionHandle {
        log::info!("Creating session '{id}'");
        Arc::new(Mutex::new(SessionState::new(self.smoothing_window, self.metrics_window)))
    }

    /// Drop a session; returns whether it existed
    pub fn remove(&self, id: &str) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .is_some();
        if removed {
            log::info!("Ended session '{id}'");
        }
        removed
    }

    /// Drop every session unused for longer than `max_idle`
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|id, session| {
            let keep = lock_session(session).idle_for() <= max_idle;
            if !keep {
                log::warn!("Evicting idle session '{id}'");
            }
            keep
        });
        before - sessions.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of all live sessions, sorted
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}
