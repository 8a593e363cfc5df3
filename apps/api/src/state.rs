use std::sync::Arc;

use crate::config::Config;
use crate::pipeline::invoker::StageInvoker;
use crate::ranking::RankEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// One HTTP client shared by every capability call.
    pub invoker: StageInvoker,
    /// Ranking strategy chain: generative primary, keyword fallback.
    pub ranker: Arc<RankEngine>,
}
