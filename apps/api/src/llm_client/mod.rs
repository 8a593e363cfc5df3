/// Gemini client — the single point of entry for all generative-model calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All generative interactions MUST go through this module.
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Model returned empty content")]
    EmptyContent,

    #[error("No JSON object in model output")]
    MissingJson,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Extracts the first text part of the first candidate.
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .iter()
            .flat_map(|candidate| candidate.content.parts.iter())
            .find_map(|part| part.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct GeminiApiError {
    error: GeminiApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiApiErrorBody {
    message: String,
}

/// Wraps the Gemini generateContent API with retry logic and a structured
/// output helper.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            model,
        }
    }

    /// Makes a raw call to the Gemini API, returning the full response
    /// object. Retries on 429 (rate limit) and 5xx errors with exponential
    /// backoff.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<GenerateResponse, GeminiError> {
        let url = format!("{GEMINI_API_BASE}/{}:generateContent", self.model);
        let request_body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            system_instruction: (!system.is_empty()).then(|| Content {
                parts: vec![Part { text: system }],
            }),
        };

        let mut last_error: Option<GeminiError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Gemini call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(GeminiError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Gemini API returned {}: {}", status, body);
                last_error = Some(GeminiError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<GeminiApiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(GeminiError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let generate_response: GenerateResponse = response.json().await?;

            debug!(
                "Gemini call succeeded: {} candidates",
                generate_response.candidates.len()
            );

            return Ok(generate_response);
        }

        Err(last_error.unwrap_or(GeminiError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    /// Calls the model and deserializes the first JSON object found in its
    /// text output. The prompt must instruct the model to return JSON.
    pub async fn generate_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, GeminiError> {
        let response = self.call(prompt, system).await?;

        let text = response.text().ok_or(GeminiError::EmptyContent)?;
        let slice = extract_json_object(text).ok_or(GeminiError::MissingJson)?;

        serde_json::from_str(slice).map_err(GeminiError::Parse)
    }
}

/// Slices the first `{` through the last `}` out of model output. Tolerates
/// markdown code fences and commentary around the JSON object.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}
