//! Axum route handlers for the Ranking API.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{AppError, AppJson};
use crate::models::resume::{load_corpus, validate_records, Corpus, RejectedRecord};
use crate::ranking::embedding::fallback_rng;
use crate::ranking::engine::{rank_resumes, RankOptions, RankedRecord};
use crate::ranking::export::save_ranking;
use crate::ranking::RankingWarning;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct RankRequest {
    #[serde(default)]
    pub job_description: Option<String>,
    /// Takes precedence over `job_description` when present, even if empty.
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    /// Inline corpus. Falls back to the configured corpus file when absent.
    #[serde(default)]
    pub resumes: Option<Vec<Value>>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub export: bool,
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub skills: Vec<String>,
    pub ranked: Vec<RankedRecord>,
    pub warnings: Vec<RankingWarning>,
    pub rejected: Vec<RejectedRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported_to: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/rank
///
/// Ranks the inline or configured corpus against skills taken from the request
/// or extracted from its job description.
pub async fn handle_rank_resumes(
    State(state): State<AppState>,
    AppJson(request): AppJson<RankRequest>,
) -> Result<Json<RankResponse>, AppError> {
    let skills = match request.skills {
        Some(skills) => skills,
        None => {
            let job_description = request
                .job_description
                .filter(|jd| !jd.trim().is_empty())
                .ok_or_else(|| {
                    AppError::Validation("Provide either skills or a job_description".to_string())
                })?;
            state.job_extractor.extract(&job_description).await?.skills
        }
    };

    let limit = request.limit;
    let export = request.export;
    let inline_resumes = request.resumes;

    // Corpus I/O and scoring are synchronous.
    let mut response = tokio::task::spawn_blocking(move || -> Result<RankResponse, AppError> {
        let corpus: Corpus = match inline_resumes {
            Some(elements) => validate_records(elements),
            None => load_corpus(&state.config.corpus_path)?,
        };

        let options = RankOptions {
            dimension_policy: state.config.dimension_policy,
            ..Default::default()
        };
        let mut rng = fallback_rng(state.config.noise_seed);
        let ranking = rank_resumes(
            &corpus.records,
            &skills,
            state.embedder.as_deref(),
            &options,
            &mut rng,
        )?;

        let exported_to = if export {
            save_ranking(&ranking.records, &state.config.output_path)?;
            Some(state.config.output_path.display().to_string())
        } else {
            None
        };

        Ok(RankResponse {
            skills,
            ranked: ranking.records,
            warnings: ranking.warnings,
            rejected: corpus.rejected,
            exported_to,
        })
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Ranking task failed: {e}")))??;

    if let Some(limit) = limit {
        response.ranked.truncate(limit);
    }

    Ok(Json(response))
}

/// GET /api/v1/ranking/log
///
/// Returns the log of the most recent batch ranking run as plain text.
pub async fn handle_ranking_log(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let content = match tokio::fs::read_to_string(&state.config.log_path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound("Ranking log file not found".to_string()));
        }
        Err(e) => return Err(AppError::Internal(e.into())),
    };

    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], content))
}
