//! Collaborator health and catalog endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use docflow_core::{load_language_options, JobSummary, LanguageOption, ServiceHealth};

use super::error::ApiError;
use crate::state::AppState;

/// Upper bound for the recent jobs page size.
const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Serialize)]
pub struct ServicesHealthResponse {
    pub all_available: bool,
    pub services: Vec<ServiceHealth>,
}

/// Probe all collaborators now.
pub async fn services_health(State(state): State<Arc<AppState>>) -> Json<ServicesHealthResponse> {
    let services = state.prober().probe_all().await;
    Json(ServicesHealthResponse {
        all_available: services.iter().all(|s| s.available),
        services,
    })
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub languages: Vec<LanguageOption>,
}

/// OCR language options; falls back to English when the OCR service is down.
pub async fn list_languages(State(state): State<Arc<AppState>>) -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: load_language_options(state.ocr()).await,
    })
}

#[derive(Debug, Deserialize)]
pub struct JobsParams {
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct JobsResponse {
    pub jobs: Vec<JobSummary>,
}

/// Most recent ETL jobs.
pub async fn list_jobs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<JobsParams>,
) -> Result<Json<JobsResponse>, ApiError> {
    let per_page = params
        .per_page
        .unwrap_or(state.config().etl.recent_jobs_limit)
        .clamp(1, MAX_PER_PAGE);

    let jobs = state
        .etl()
        .recent_jobs(per_page)
        .await
        .map_err(|e| ApiError::bad_gateway(e.to_string()))?;

    Ok(Json(JobsResponse { jobs }))
}
