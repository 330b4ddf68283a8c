//! Mock ETL service.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::lock;
use crate::services::{
    EtlResult, EtlService, JobHandle, JobStatus, JobStatusReport, JobSummary, ProcessRequest,
    ServiceError,
};

/// One scripted answer to a status query.
#[derive(Debug, Clone)]
pub enum ScriptedStatus {
    Report(JobStatusReport),
    /// The query fails at the transport level.
    Error,
}

impl ScriptedStatus {
    pub fn status(status: JobStatus) -> Self {
        ScriptedStatus::Report(JobStatusReport::new(status))
    }

    pub fn completed() -> Self {
        Self::status(JobStatus::Completed)
    }

    pub fn failed(message: impl Into<String>) -> Self {
        ScriptedStatus::Report(JobStatusReport::failed(message))
    }
}

/// Mock implementation of the EtlService trait.
///
/// Status queries consume the scripted queue first, then answer with the
/// default status (`completed` unless changed).
#[derive(Debug)]
pub struct MockEtlService {
    job_id: Mutex<Option<String>>,
    script: Mutex<VecDeque<ScriptedStatus>>,
    default_status: Mutex<JobStatus>,
    result: Mutex<serde_json::Value>,
    result_failure: Mutex<Option<String>>,
    submit_failure: Mutex<Option<(u16, String)>>,
    submitted: Mutex<Vec<ProcessRequest>>,
    jobs: Mutex<Vec<JobSummary>>,
    unhealthy: Mutex<bool>,
    status_calls: AtomicU32,
    result_calls: AtomicU32,
}

impl Default for MockEtlService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEtlService {
    pub fn new() -> Self {
        Self {
            job_id: Mutex::new(None),
            script: Mutex::new(VecDeque::new()),
            default_status: Mutex::new(JobStatus::Completed),
            result: Mutex::new(serde_json::json!({"status": "completed"})),
            result_failure: Mutex::new(None),
            submit_failure: Mutex::new(None),
            submitted: Mutex::new(Vec::new()),
            jobs: Mutex::new(Vec::new()),
            unhealthy: Mutex::new(false),
            status_calls: AtomicU32::new(0),
            result_calls: AtomicU32::new(0),
        }
    }

    /// Answer submissions with a fixed job id.
    pub fn set_job_id(&self, job_id: impl Into<String>) {
        *lock(&self.job_id) = Some(job_id.into());
    }

    /// Queue answers for the next status queries.
    pub fn script_statuses(&self, statuses: Vec<ScriptedStatus>) {
        lock(&self.script).extend(statuses);
    }

    /// Answer used once the script is exhausted.
    pub fn set_default_status(&self, status: JobStatus) {
        *lock(&self.default_status) = status;
    }

    pub fn set_result(&self, payload: serde_json::Value) {
        *lock(&self.result) = payload;
    }

    /// Make result fetches fail with a 500 carrying `message`.
    pub fn fail_results(&self, message: impl Into<String>) {
        *lock(&self.result_failure) = Some(message.into());
    }

    pub fn fail_submit(&self, status: u16, message: impl Into<String>) {
        *lock(&self.submit_failure) = Some((status, message.into()));
    }

    pub fn set_jobs(&self, jobs: Vec<JobSummary>) {
        *lock(&self.jobs) = jobs;
    }

    pub fn set_healthy(&self, healthy: bool) {
        *lock(&self.unhealthy) = !healthy;
    }

    /// Every process request received, failed ones included.
    pub fn submitted(&self) -> Vec<ProcessRequest> {
        lock(&self.submitted).clone()
    }

    pub fn submit_calls(&self) -> usize {
        lock(&self.submitted).len()
    }

    pub fn status_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn result_calls(&self) -> u32 {
        self.result_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EtlService for MockEtlService {
    fn name(&self) -> &str {
        "mock-etl"
    }

    async fn submit(&self, request: &ProcessRequest) -> Result<JobHandle, ServiceError> {
        let count = {
            let mut submitted = lock(&self.submitted);
            submitted.push(request.clone());
            submitted.len()
        };

        if let Some((status, message)) = lock(&self.submit_failure).clone() {
            return Err(ServiceError::Http { status, message });
        }

        let job_id = lock(&self.job_id)
            .clone()
            .unwrap_or_else(|| format!("mock-job-{}", count));
        Ok(JobHandle { job_id })
    }

    async fn job_status(&self, _job_id: &str) -> Result<JobStatusReport, ServiceError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);

        let next = lock(&self.script).pop_front();
        match next {
            Some(ScriptedStatus::Report(report)) => Ok(report),
            Some(ScriptedStatus::Error) => Err(ServiceError::Transport(
                "scripted network error".to_string(),
            )),
            None => Ok(JobStatusReport::new(lock(&self.default_status).clone())),
        }
    }

    async fn job_result(&self, _job_id: &str) -> Result<EtlResult, ServiceError> {
        self.result_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = lock(&self.result_failure).clone() {
            return Err(ServiceError::Http {
                status: 500,
                message,
            });
        }
        Ok(EtlResult(lock(&self.result).clone()))
    }

    async fn recent_jobs(&self, per_page: u32) -> Result<Vec<JobSummary>, ServiceError> {
        Ok(lock(&self.jobs)
            .iter()
            .take(per_page as usize)
            .cloned()
            .collect())
    }

    async fn health(&self) -> Result<serde_json::Value, ServiceError> {
        if *lock(&self.unhealthy) {
            return Err(ServiceError::Http {
                status: 503,
                message: "Health check failed: 503".to_string(),
            });
        }
        Ok(serde_json::json!({"status": "healthy"}))
    }
}
