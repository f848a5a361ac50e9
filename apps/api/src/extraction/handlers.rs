//! Axum route handlers for the job extraction API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::{AppError, AppJson};
use crate::extraction::JobDescription;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractJobRequest {
    #[serde(default)]
    pub job_description: Option<String>,
}

/// POST /api/v1/jobs/extract
///
/// Returns the structured fields of a job posting.
pub async fn handle_extract_job(
    State(state): State<AppState>,
    AppJson(request): AppJson<ExtractJobRequest>,
) -> Result<Json<JobDescription>, AppError> {
    let job_description = request
        .job_description
        .filter(|jd| !jd.trim().is_empty())
        .ok_or_else(|| AppError::Validation("No job description provided".to_string()))?;

    let fields = state.job_extractor.extract(&job_description).await?;
    Ok(Json(fields))
}
