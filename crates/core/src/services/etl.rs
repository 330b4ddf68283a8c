//! ETL service client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::http::{build_client, decode_json, map_send_error, normalize_base_url};
use super::types::JobListResponse;
use super::{
    EtlResult, EtlService, JobHandle, JobStatusReport, JobSummary, ProcessRequest, ServiceError,
};

/// reqwest-backed [`EtlService`].
pub struct HttpEtlService {
    client: Client,
    base_url: String,
}

impl HttpEtlService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: normalize_base_url(base_url),
        })
    }

    fn job_url(&self, job_id: &str) -> String {
        format!("{}/jobs/{}", self.base_url, urlencoding::encode(job_id))
    }
}

#[async_trait]
impl EtlService for HttpEtlService {
    fn name(&self) -> &str {
        "etl"
    }

    async fn submit(&self, request: &ProcessRequest) -> Result<JobHandle, ServiceError> {
        let url = format!("{}/process", self.base_url);
        debug!(
            "ETL submit: file_id={}, language={}",
            request.file_id, request.language
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(map_send_error)?;

        decode_json(response, "ETL submit failed").await
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatusReport, ServiceError> {
        let response = self
            .client
            .get(self.job_url(job_id))
            .send()
            .await
            .map_err(map_send_error)?;

        decode_json(response, "Job status request failed").await
    }

    async fn job_result(&self, job_id: &str) -> Result<EtlResult, ServiceError> {
        let response = self
            .client
            .get(self.job_url(job_id))
            .send()
            .await
            .map_err(map_send_error)?;

        decode_json(response, "Failed to load ETL results").await
    }

    async fn recent_jobs(&self, per_page: u32) -> Result<Vec<JobSummary>, ServiceError> {
        let url = format!("{}/jobs", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("per_page", per_page)])
            .send()
            .await
            .map_err(map_send_error)?;

        let list: JobListResponse = decode_json(response, "Failed to list jobs").await?;
        Ok(list.jobs)
    }

    async fn health(&self) -> Result<serde_json::Value, ServiceError> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await.map_err(map_send_error)?;
        decode_json(response, "Health check failed").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_url_encodes_id() {
        let service = HttpEtlService::new("http://etl:8002/", Duration::from_secs(1)).unwrap();
        assert_eq!(service.job_url("j9"), "http://etl:8002/jobs/j9");
        assert_eq!(service.job_url("a/b c"), "http://etl:8002/jobs/a%2Fb%20c");
    }
}
