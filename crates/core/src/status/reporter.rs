//! Status reporter and the busy guard.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;

use super::types::{Outcome, OutcomeKind, UiState, IDLE_STATUS};

/// Message recorded when a guard is dropped without an explicit outcome
/// (early return or panic unwinding through the submission).
const UNFINISHED_MESSAGE: &str = "An error occurred during processing.";

/// Returned by [`StatusReporter::begin`] while another submission holds the
/// reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a submission is already in progress")]
pub struct ReporterBusy;

/// Cloneable handle to the process-wide [`UiState`].
///
/// Every change is published on a watch channel so the console can stream it.
#[derive(Debug, Clone)]
pub struct StatusReporter {
    tx: Arc<watch::Sender<UiState>>,
}

impl Default for StatusReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusReporter {
    /// Create a reporter in the idle state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(UiState::idle());
        Self { tx: Arc::new(tx) }
    }

    /// Current state.
    pub fn snapshot(&self) -> UiState {
        self.tx.borrow().clone()
    }

    /// Receive every subsequent change.
    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.tx.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.tx.borrow().busy
    }

    /// Take ownership of the reporter for one submission.
    ///
    /// Fails with [`ReporterBusy`] if a guard is already alive. The previous
    /// outcome is cleared.
    pub fn begin(&self, status_text: &str) -> Result<BusyGuard, ReporterBusy> {
        let mut acquired = false;
        self.tx.send_if_modified(|state| {
            if state.busy {
                return false;
            }
            state.busy = true;
            state.progress_percent = 0;
            state.status_text = status_text.to_string();
            state.last_outcome = None;
            acquired = true;
            true
        });

        if acquired {
            debug!("Status reporter acquired: {}", status_text);
            Ok(BusyGuard {
                reporter: self.clone(),
                outcome: None,
            })
        } else {
            Err(ReporterBusy)
        }
    }
}

/// Exclusive write access to the reporter for one submission.
///
/// Dropping the guard resets progress, status text and the busy flag to
/// idle. This happens exactly once per guard, whichever way the submission
/// exits.
#[derive(Debug)]
pub struct BusyGuard {
    reporter: StatusReporter,
    outcome: Option<Outcome>,
}

impl BusyGuard {
    /// Set progress and status text together.
    pub fn update(&self, percent: u8, status_text: impl Into<String>) {
        let status_text = status_text.into();
        debug!("Progress {}%: {}", percent.min(100), status_text);
        self.reporter.tx.send_modify(|state| {
            state.progress_percent = percent.min(100);
            state.status_text = status_text;
        });
    }

    pub fn set_progress(&self, percent: u8) {
        self.reporter.tx.send_modify(|state| {
            state.progress_percent = percent.min(100);
        });
    }

    /// Current progress.
    pub fn progress(&self) -> u8 {
        self.reporter.tx.borrow().progress_percent
    }

    /// Record the outcome surfaced once the guard is released.
    pub fn finish(&mut self, kind: OutcomeKind, message: impl Into<String>) {
        self.outcome = Some(Outcome {
            kind,
            message: message.into(),
        });
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        let outcome = self.outcome.take().unwrap_or_else(|| Outcome {
            kind: OutcomeKind::Failure,
            message: UNFINISHED_MESSAGE.to_string(),
        });
        debug!("Status reporter released ({:?})", outcome.kind);
        self.reporter.tx.send_modify(|state| {
            state.progress_percent = 0;
            state.status_text = IDLE_STATUS.to_string();
            state.busy = false;
            state.last_outcome = Some(outcome);
        });
    }
}
