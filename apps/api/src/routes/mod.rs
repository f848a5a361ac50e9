pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::extraction::handlers as extraction;
use crate::ranking::handlers as ranking;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Job extraction API
        .route("/api/v1/jobs/extract", post(extraction::handle_extract_job))
        // Ranking API
        .route("/api/v1/resumes/rank", post(ranking::handle_rank_resumes))
        .route("/api/v1/ranking/log", get(ranking::handle_ranking_log))
        .with_state(state)
}
