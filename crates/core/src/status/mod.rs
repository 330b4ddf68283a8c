//! Progress/status reporting for the in-flight submission.
//!
//! [`StatusReporter`] is the single progress sink shared by the router,
//! both pipeline drivers and the job poller. A submission takes ownership of
//! it through [`StatusReporter::begin`], which hands out a [`BusyGuard`];
//! dropping the guard restores the idle state on every exit path.

mod reporter;
mod types;

pub use reporter::{BusyGuard, ReporterBusy, StatusReporter};
pub use types::{Outcome, OutcomeKind, UiState, IDLE_STATUS};
