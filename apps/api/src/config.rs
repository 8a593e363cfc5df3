use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_MODEL;

/// Application configuration loaded from environment variables.
/// Everything has a default; the generative-model credential is optional and
/// its absence disables the primary ranking strategy.
#[derive(Debug, Clone)]
pub struct Config {
    pub resume_parser_url: String,
    pub job_search_url: String,
    pub cover_letter_url: String,
    pub stage_timeout_secs: u64,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            resume_parser_url: env_or(
                "RESUME_PARSER_URL",
                "http://127.0.0.1:9000/parse_resume",
            ),
            job_search_url: env_or("JOB_SEARCH_URL", "http://127.0.0.1:9200/match_jobs"),
            cover_letter_url: env_or(
                "COVER_LETTER_URL",
                "http://127.0.0.1:9400/generate_cover_letter",
            ),
            stage_timeout_secs: env_or("STAGE_TIMEOUT_SECS", "30")
                .parse::<u64>()
                .context("STAGE_TIMEOUT_SECS must be a number of seconds")?,
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("GOOGLE_API_KEY"))
                .ok(),
            gemini_model: env_or("GEMINI_MODEL", DEFAULT_MODEL),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
