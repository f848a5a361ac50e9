use std::path::Path;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use ranker_api::config::Config;
use ranker_api::ranking::{DimensionPolicy, SkillEmbedder};
use ranker_api::routes::build_router;
use ranker_api::state::AppState;

fn test_config(dir: &Path) -> Config {
    Config {
        corpus_path: dir.join("final_finale.json"),
        output_path: dir.join("ranked_resumes.json"),
        log_path: dir.join("resume_ranking.log"),
        noise_seed: Some(1),
        ..Config::default()
    }
}

fn write_corpus(dir: &Path) {
    let corpus = json!([
        {"unique_id": "A", "embedding_vector": [1.0, 0.0],
         "meta": {"name": "Ada", "position": "Python Developer"}},
        {"unique_id": "B", "embedding_vector": [0.0, 1.0],
         "meta": {"name": "Grace", "position": "SQL Analyst"}}
    ]);
    std::fs::write(dir.join("final_finale.json"), corpus.to_string()).unwrap();
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn health_reports_ok() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(AppState::new(test_config(dir.path())));

    let (status, body) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "ranker-api");
}

#[tokio::test]
async fn extract_job_returns_fields_and_rejects_blank_input() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(AppState::new(test_config(dir.path())));

    let (status, body) = post_json(
        app.clone(),
        "/api/v1/jobs/extract",
        json!({"job_description": "Cloud engineer needed with AWS and Azure. Location: Lisbon"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Cloud engineer");
    assert_eq!(body["skills"], json!(["AWS", "Azure"]));
    assert_eq!(body["location"], "Lisbon");

    let (status, body) = post_json(app, "/api/v1/jobs/extract", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn rank_with_inline_resumes_and_embedder() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = AppState::new(test_config(dir.path()));
    let embedder: Arc<dyn SkillEmbedder> = Arc::new(|_: &str| vec![1.0, 0.0]);
    state.embedder = Some(embedder);
    let app = build_router(state);

    let (status, body) = post_json(
        app,
        "/api/v1/resumes/rank",
        json!({
            "skills": ["X"],
            "resumes": [
                {"unique_id": "B", "embedding_vector": [0.0, 1.0]},
                {"unique_id": "A", "embedding_vector": [1.0, 0.0]},
                {"unique_id": "bad"}
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["skills"], json!(["X"]));
    assert_eq!(body["ranked"][0]["unique_id"], "A");
    assert_eq!(body["ranked"][0]["match_score"], 100.0);
    assert_eq!(body["ranked"][1]["unique_id"], "B");
    assert_eq!(body["ranked"][1]["match_score"], 0.0);
    assert_eq!(body["rejected"][0]["index"], 2);
    assert!(body.get("exported_to").is_none());
}

#[tokio::test]
async fn rank_from_job_description_uses_configured_corpus_and_exports() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    let config = test_config(dir.path());
    let output_path = config.output_path.clone();
    let app = build_router(AppState::new(config));

    let (status, body) = post_json(
        app,
        "/api/v1/resumes/rank",
        json!({
            "job_description": "SQL analyst needed for reporting",
            "export": true,
            "limit": 1
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["skills"], json!(["SQL"]));
    assert_eq!(body["ranked"].as_array().unwrap().len(), 1);
    assert_eq!(body["ranked"][0]["unique_id"], "B");

    let exported: Value =
        serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(exported.as_array().unwrap().len(), 2);
    assert_eq!(exported[0]["unique_id"], "B");
}

#[tokio::test]
async fn rank_without_skills_or_description_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(AppState::new(test_config(dir.path())));

    let (status, body) = post_json(app, "/api/v1/resumes/rank", json!({"limit": 3})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn rank_with_wrongly_typed_fields_is_400_error_object() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(AppState::new(test_config(dir.path())));

    for body in [json!({"skills": "Python"}), json!({"limit": -1})] {
        let (status, body) = post_json(app.clone(), "/api/v1/resumes/rank", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    let (status, body) =
        post_json(app, "/api/v1/jobs/extract", json!({"job_description": 42})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn rank_strict_policy_dimension_mismatch_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        dimension_policy: DimensionPolicy::Strict,
        ..test_config(dir.path())
    };
    let mut state = AppState::new(config);
    let embedder: Arc<dyn SkillEmbedder> = Arc::new(|_: &str| vec![1.0, 0.0]);
    state.embedder = Some(embedder);
    let app = build_router(state);

    let (status, body) = post_json(
        app,
        "/api/v1/resumes/rank",
        json!({
            "skills": ["X"],
            "resumes": [
                {"unique_id": "A", "embedding_vector": [1.0, 0.0]},
                {"unique_id": "C", "embedding_vector": [1.0, 0.0, 0.0]}
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "DIMENSION_MISMATCH");
}

#[tokio::test]
async fn rank_empty_inline_corpus_without_embedder_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(AppState::new(test_config(dir.path())));

    let (status, body) = post_json(
        app,
        "/api/v1/resumes/rank",
        json!({"skills": ["Python"], "resumes": []}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "EMPTY_CORPUS");
}

#[tokio::test]
async fn rank_with_missing_corpus_file_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(AppState::new(test_config(dir.path())));

    let (status, body) =
        post_json(app, "/api/v1/resumes/rank", json!({"skills": ["Python"]})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "RANKING_ERROR");
}

#[tokio::test]
async fn ranking_log_is_404_until_written() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let log_path = config.log_path.clone();
    let app = build_router(AppState::new(config));

    let (status, _) = get(app.clone(), "/api/v1/ranking/log").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    std::fs::write(&log_path, "Starting resume ranking workflow\n").unwrap();
    let (status, body) = get(app, "/api/v1/ranking/log").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Starting resume ranking workflow"));
}
