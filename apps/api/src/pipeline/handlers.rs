//! Axum route handlers for the pipeline API.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::pipeline::{run_pipeline, PipelineOutput};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RawResumeRequest {
    pub raw_text: String,
}

/// POST /parse_resume
///
/// Proxies the resume-parsing capability through the Stage Invoker. A
/// failed capability call returns the uniform error shape, not an HTTP
/// error.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    Json(request): Json<RawResumeRequest>,
) -> Result<Json<Value>, AppError> {
    if request.raw_text.trim().is_empty() {
        return Err(AppError::Validation("raw_text cannot be empty".to_string()));
    }

    let result = state
        .invoker
        .invoke(
            &state.config.resume_parser_url,
            &json!({ "raw_text": request.raw_text }),
        )
        .await;

    Ok(Json(result))
}

/// POST /rank_jobs
///
/// In-process ranking engine over a free-form payload: `{resume, jobs?}`,
/// or the resume itself as the top-level object. Input-shape problems come
/// back as `{"error": ...}` values.
pub async fn handle_rank_jobs(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Json<Value> {
    Json(state.ranker.rank_payload(&payload).await)
}

/// POST /process_resume
///
/// Full pipeline: Parse → Rank → Search → Draft. Always returns all four
/// keys; a failed stage's key carries its error shape and the caller
/// interprets partial results.
pub async fn handle_process_resume(
    State(state): State<AppState>,
    Json(request): Json<RawResumeRequest>,
) -> Result<Json<PipelineOutput>, AppError> {
    if request.raw_text.trim().is_empty() {
        return Err(AppError::Validation("raw_text cannot be empty".to_string()));
    }

    let output = run_pipeline(
        &state.invoker,
        state.ranker.as_ref(),
        &state.config,
        &request.raw_text,
    )
    .await;

    Ok(Json(output))
}
