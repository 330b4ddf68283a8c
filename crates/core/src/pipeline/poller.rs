//! Bounded polling loop for ETL jobs.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::cancel::CancelToken;
use super::config::PollerConfig;
use crate::metrics;
use crate::services::{EtlResult, EtlService, JobStatus, ServiceError};
use crate::status::BusyGuard;

/// How a polling run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TerminalState {
    /// The job completed and its result was fetched.
    Completed(EtlResult),
    /// The ETL service reported the job as failed.
    Failed { message: String },
    /// The attempt budget ran out.
    TimedOut,
    /// Cancellation was requested between attempts.
    Cancelled,
}

impl TerminalState {
    fn label(&self) -> &'static str {
        match self {
            TerminalState::Completed(_) => COMPLETED_LABEL,
            TerminalState::Failed { .. } => "failed",
            TerminalState::TimedOut => "timed_out",
            TerminalState::Cancelled => "cancelled",
        }
    }
}

const COMPLETED_LABEL: &str = "completed";

/// Terminal state plus the number of status queries issued.
#[derive(Debug, Clone, PartialEq)]
pub struct PollReport {
    pub state: TerminalState,
    pub attempts: u32,
}

/// Polls one job until a terminal state or the attempt budget is spent.
///
/// A failed status query is transient: it is logged, counts as an attempt
/// and the loop continues.
pub struct JobPoller {
    etl: Arc<dyn EtlService>,
    config: PollerConfig,
}

impl JobPoller {
    pub fn new(etl: Arc<dyn EtlService>, config: PollerConfig) -> Self {
        Self { etl, config }
    }

    /// Run the loop for `job_id`, reporting progress through `guard`.
    ///
    /// At most `max_attempts` status queries are issued. The result is
    /// fetched exactly once, after a `completed` status. Only that fetch can
    /// fail the call.
    pub async fn poll(
        &self,
        job_id: &str,
        guard: &BusyGuard,
        cancel: &CancelToken,
    ) -> Result<PollReport, ServiceError> {
        let interval = Duration::from_millis(self.config.interval_ms);
        let max_attempts = self.config.max_attempts;
        let mut attempts: u32 = 0;

        info!(job_id = %job_id, max_attempts, "Polling ETL job");

        let state = loop {
            if attempts >= max_attempts {
                warn!(job_id = %job_id, attempts, "Job did not finish within attempt budget");
                break TerminalState::TimedOut;
            }
            if cancel.is_cancelled() {
                info!(job_id = %job_id, attempts, "Polling cancelled");
                break TerminalState::Cancelled;
            }

            attempts += 1;
            metrics::POLL_ATTEMPTS.inc();

            match self.etl.job_status(job_id).await {
                Ok(report) if report.status.is_terminal() => {
                    if report.status == JobStatus::Failed {
                        let message = report
                            .error_message
                            .unwrap_or_else(|| "Unknown error".to_string());
                        warn!(job_id = %job_id, attempts, error = %message, "Job failed");
                        break TerminalState::Failed { message };
                    }

                    guard.update(100, "ETL processing complete.");
                    let result = match self.etl.job_result(job_id).await {
                        Ok(result) => result,
                        Err(e) => {
                            record_terminal(COMPLETED_LABEL);
                            return Err(e);
                        }
                    };
                    info!(job_id = %job_id, attempts, "Job completed");
                    break TerminalState::Completed(result);
                }
                Ok(report) => {
                    let status = report.status;
                    debug!(job_id = %job_id, attempt = attempts, status = %status, "Job still in progress");
                    guard.update(
                        self.config.progress_for_attempt(attempts),
                        format!("Status: {}", status),
                    );
                }
                Err(e) => {
                    metrics::POLL_TRANSIENT_ERRORS.inc();
                    warn!(job_id = %job_id, attempt = attempts, error = %e, "Status query failed, will retry");
                }
            }

            if attempts < max_attempts {
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    _ = tokio::time::sleep(interval) => {}
                }
            }
        };

        record_terminal(state.label());

        Ok(PollReport { state, attempts })
    }
}

fn record_terminal(label: &str) {
    metrics::POLL_TERMINAL.with_label_values(&[label]).inc();
}
