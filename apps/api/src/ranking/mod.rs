// Ranking Engine — primary generative strategy with a deterministic fallback.
// Strategies share one trait and are tried in order until one returns a
// valid outcome; the last link is pure and cannot fail.

pub mod fallback;
pub mod gemini;
pub mod prompts;
pub mod titles;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::llm_client::GeminiClient;
use crate::models::resume::{normalize_resume, resume_text_view};
use crate::models::{coerce_string, normalize_jobs, JobListing, RankedJob, ResumeProfile};
use crate::ranking::titles::{suggest_titles, DEFAULT_LIMIT};

/// Engine label for the analysis-only terminal shape (no jobs to rank).
pub const ANALYZER_ENGINE: &str = "resume-analyzer";

const PAYLOAD_MISSING: &str = "Expected JSON payload with resume (and optional jobs).";
const PAYLOAD_NOT_OBJECT: &str = "Payload must be JSON object with resume (and optional jobs).";

/// Output of a successful ranking strategy. `engine` names the strategy
/// that actually produced `ranked_jobs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankOutcome {
    #[serde(default)]
    pub engine: String,
    #[serde(default)]
    pub ranked_jobs: Vec<RankedJob>,
    #[serde(default)]
    pub suggested_titles: Vec<String>,
}

/// Terminal shape when there are no jobs to rank: the normalized resume plus
/// suggested titles. Distinct from a zero-length ranked list.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeAnalysis {
    pub engine: String,
    pub resume: ResumeProfile,
    pub suggested_titles: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RankResponse {
    Ranked(RankOutcome),
    Analysis(ResumeAnalysis),
}

#[derive(Debug, Error)]
pub enum RankError {
    #[error("strategy unavailable: {0}")]
    Unavailable(&'static str),
    #[error("strategy failed: {0}")]
    Strategy(String),
}

/// One link in the ranking chain. Implementations must not panic; anything
/// that goes wrong is an `Err` the chain recovers from.
#[async_trait]
pub trait RankStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn rank(
        &self,
        profile: &ResumeProfile,
        resume_text: &str,
        jobs: &[JobListing],
    ) -> Result<RankOutcome, RankError>;
}

/// Ordered strategy chain over one shared scoring interface.
pub struct RankEngine {
    strategies: Vec<Arc<dyn RankStrategy>>,
}

impl RankEngine {
    pub fn new(strategies: Vec<Arc<dyn RankStrategy>>) -> Self {
        Self { strategies }
    }

    /// Default chain: generative primary, keyword fallback.
    pub fn with_default_chain(client: Option<GeminiClient>) -> Self {
        Self::new(vec![
            Arc::new(gemini::GeminiRankStrategy::new(client)),
            Arc::new(fallback::KeywordRankStrategy),
        ])
    }

    /// Ranks `jobs` for the candidate, or returns the analysis-only shape
    /// when the job list is empty. Total: always produces a response.
    pub async fn run(
        &self,
        profile: &ResumeProfile,
        resume_text: &str,
        jobs: &[JobListing],
    ) -> RankResponse {
        if jobs.is_empty() {
            return RankResponse::Analysis(ResumeAnalysis {
                engine: ANALYZER_ENGINE.to_string(),
                resume: profile.clone(),
                suggested_titles: suggest_titles(profile, DEFAULT_LIMIT),
            });
        }

        for strategy in &self.strategies {
            match strategy.rank(profile, resume_text, jobs).await {
                Ok(outcome) => return RankResponse::Ranked(outcome),
                Err(e) => warn!("ranking strategy '{}' failed: {e}", strategy.name()),
            }
        }

        // Custom chains may exhaust without the keyword link; stay total.
        RankResponse::Ranked(fallback::rank_by_keyword_overlap(profile, jobs))
    }

    /// Full `/rank_jobs` semantics over a free-form payload: resolves the
    /// resume (inline object, JSON string, or free text), normalizes jobs,
    /// and runs the chain. Input-shape problems become the uniform
    /// `{"error": ...}` value instead of an HTTP failure.
    pub async fn rank_payload(&self, payload: &Value) -> Value {
        let obj: Map<String, Value> = match payload {
            Value::Object(map) => map.clone(),
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(map)) => map,
                _ => return json!({ "error": PAYLOAD_NOT_OBJECT }),
            },
            Value::Null => return json!({ "error": PAYLOAD_MISSING }),
            _ => return json!({ "error": PAYLOAD_NOT_OBJECT }),
        };

        // A payload without a "resume" key is itself the resume.
        let resume_raw = obj
            .get("resume")
            .cloned()
            .unwrap_or_else(|| Value::Object(obj.clone()));
        let jobs_raw = obj
            .get("jobs")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let (profile, resume_text) = resolve_resume(&resume_raw);
        let jobs = normalize_jobs(&jobs_raw);

        match serde_json::to_value(self.run(&profile, &resume_text, &jobs).await) {
            Ok(value) => value,
            Err(e) => json!({ "error": e.to_string() }),
        }
    }
}

/// Resolves a resume value into a profile plus its textual view. A string
/// that parses to an object is normalized; any other string is kept verbatim
/// as the textual signal with an empty profile.
fn resolve_resume(raw: &Value) -> (ResumeProfile, String) {
    match raw {
        Value::Object(_) => {
            let profile = normalize_resume(raw);
            let text = resume_text_view(&profile);
            (profile, text)
        }
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(parsed @ Value::Object(_)) => {
                let profile = normalize_resume(&parsed);
                let view = resume_text_view(&profile);
                (profile, view)
            }
            _ => (ResumeProfile::default(), text.clone()),
        },
        other => (ResumeProfile::default(), coerce_string(Some(other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct AlwaysFails;

    #[async_trait]
    impl RankStrategy for AlwaysFails {
        fn name(&self) -> &'static str {
            "always-fails"
        }

        async fn rank(
            &self,
            _profile: &ResumeProfile,
            _resume_text: &str,
            _jobs: &[JobListing],
        ) -> Result<RankOutcome, RankError> {
            Err(RankError::Strategy("boom".to_string()))
        }
    }

    fn engine_without_credential() -> RankEngine {
        RankEngine::with_default_chain(None)
    }

    #[tokio::test]
    async fn test_primary_failure_falls_back_to_keyword_engine() {
        let engine = engine_without_credential();
        let payload = json!({
            "resume": {"skills": ["python", "aws"]},
            "jobs": [
                {"title": "Cloud Engineer", "description": "aws terraform", "requirements": ""},
                {"title": "Writer", "description": "poetry", "requirements": ""},
            ],
        });

        let value = engine.rank_payload(&payload).await;
        assert_eq!(value["engine"], "fallback-keyword");
        assert_eq!(value["ranked_jobs"][0]["title"], "Cloud Engineer");
        assert_eq!(value["ranked_jobs"][0]["score"], 0.5);
    }

    #[tokio::test]
    async fn test_empty_job_list_yields_analysis_only_shape() {
        let engine = engine_without_credential();
        let payload = json!({"resume": {"skills": ["aws"]}});

        let value = engine.rank_payload(&payload).await;
        assert_eq!(value["engine"], ANALYZER_ENGINE);
        assert!(value.get("ranked_jobs").is_none());
        assert_eq!(value["resume"]["skills"][0], "aws");
        assert_eq!(value["suggested_titles"][0], "Cloud Engineer");
    }

    #[tokio::test]
    async fn test_jobs_that_normalize_away_yield_analysis_only() {
        let engine = engine_without_credential();
        let payload = json!({
            "resume": {"skills": ["aws"]},
            "jobs": [{"title": "", "description": ""}],
        });

        let value = engine.rank_payload(&payload).await;
        assert_eq!(value["engine"], ANALYZER_ENGINE);
    }

    #[tokio::test]
    async fn test_top_level_resume_without_wrapper_key() {
        let engine = engine_without_credential();
        let payload = json!({"skills": ["sql"], "experience": [], "summary": ""});

        let value = engine.rank_payload(&payload).await;
        assert_eq!(value["engine"], ANALYZER_ENGINE);
        assert_eq!(value["resume"]["skills"][0], "sql");
    }

    #[tokio::test]
    async fn test_null_payload_is_input_shape_error() {
        let engine = engine_without_credential();
        let value = engine.rank_payload(&Value::Null).await;
        assert_eq!(value["error"], PAYLOAD_MISSING);
    }

    #[tokio::test]
    async fn test_scalar_payload_is_input_shape_error() {
        let engine = engine_without_credential();
        let value = engine.rank_payload(&json!(42)).await;
        assert_eq!(value["error"], PAYLOAD_NOT_OBJECT);
    }

    #[tokio::test]
    async fn test_string_payload_containing_object_is_accepted() {
        let engine = engine_without_credential();
        let payload = json!(r#"{"resume": {"skills": ["aws"]}}"#);

        let value = engine.rank_payload(&payload).await;
        assert_eq!(value["engine"], ANALYZER_ENGINE);
    }

    #[tokio::test]
    async fn test_string_resume_used_as_free_text_signal() {
        let (profile, text) = resolve_resume(&json!("Ten years of embedded C"));
        assert_eq!(profile, ResumeProfile::default());
        assert_eq!(text, "Ten years of embedded C");
    }

    #[tokio::test]
    async fn test_exhausted_custom_chain_stays_total() {
        let engine = RankEngine::new(vec![Arc::new(AlwaysFails)]);
        let profile = ResumeProfile {
            skills: vec!["rust".to_string()],
            ..ResumeProfile::default()
        };
        let jobs = vec![JobListing {
            title: "Backend".to_string(),
            description: "rust".to_string(),
            ..JobListing::default()
        }];

        let response = engine.run(&profile, "", &jobs).await;
        match response {
            RankResponse::Ranked(outcome) => {
                assert_eq!(outcome.engine, fallback::ENGINE_NAME);
                assert_eq!(outcome.ranked_jobs.len(), 1);
            }
            RankResponse::Analysis(_) => panic!("expected ranked response"),
        }
    }
}
