pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pipeline::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/parse_resume", post(handlers::handle_parse_resume))
        .route("/rank_jobs", post(handlers::handle_rank_jobs))
        .route("/process_resume", post(handlers::handle_process_resume))
        .with_state(state)
}
