//! Generative ranking strategy backed by the Gemini client.
//!
//! Fails soft: a missing credential, transport error, unparseable response,
//! or a response without `ranked_jobs` is a strategy failure handled by the
//! chain — never a fatal error of the ranking engine itself.

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::llm_client::GeminiClient;
use crate::models::{JobListing, ResumeProfile};
use crate::ranking::prompts::{RANK_SCHEMA_HINT, RANK_SYSTEM};
use crate::ranking::titles::{suggest_titles, DEFAULT_LIMIT};
use crate::ranking::{RankError, RankOutcome, RankStrategy};

pub const ENGINE_NAME: &str = "gemini";

pub struct GeminiRankStrategy {
    client: Option<GeminiClient>,
}

impl GeminiRankStrategy {
    /// `None` means no credential was configured; every rank attempt then
    /// fails fast and the chain moves on.
    pub fn new(client: Option<GeminiClient>) -> Self {
        Self { client }
    }

    fn build_prompt(profile: &ResumeProfile, resume_text: &str, jobs: &[JobListing]) -> String {
        let payload = json!({
            "resume": profile,
            "resume_text": resume_text,
            "jobs": jobs,
        });
        let payload_text = serde_json::to_string_pretty(&payload).unwrap_or_default();

        format!(
            "Return JSON matching this shape (fields optional but keep data types):\n\
             {RANK_SCHEMA_HINT}\n\
             Never include commentary outside JSON.\n\n\
             Structured Input:\n{payload_text}\n\n\
             Output JSON:"
        )
    }
}

#[async_trait]
impl RankStrategy for GeminiRankStrategy {
    fn name(&self) -> &'static str {
        ENGINE_NAME
    }

    async fn rank(
        &self,
        profile: &ResumeProfile,
        resume_text: &str,
        jobs: &[JobListing],
    ) -> Result<RankOutcome, RankError> {
        let Some(client) = &self.client else {
            return Err(RankError::Unavailable(
                "missing GEMINI_API_KEY/GOOGLE_API_KEY",
            ));
        };

        let prompt = Self::build_prompt(profile, resume_text, jobs);
        let mut outcome: RankOutcome = client
            .generate_json(&prompt, RANK_SYSTEM)
            .await
            .map_err(|e| RankError::Strategy(e.to_string()))?;

        // Well-formed only when ranked_jobs is non-empty.
        if outcome.ranked_jobs.is_empty() {
            return Err(RankError::Strategy(
                "generative response missing ranked_jobs".to_string(),
            ));
        }

        if outcome.engine.is_empty() {
            outcome.engine = ENGINE_NAME.to_string();
        }
        if outcome.suggested_titles.is_empty() {
            outcome.suggested_titles = suggest_titles(profile, DEFAULT_LIMIT);
        }

        info!(
            "gemini ranking succeeded: {} ranked jobs",
            outcome.ranked_jobs.len()
        );
        Ok(outcome)
    }
}
