// Pipeline Orchestrator — Parse → Rank → Search → Draft, best effort.
// Every stage may fail; its key then carries the error shape and later
// stages work with whatever data is left. Each stage runs exactly once per
// invocation: no retries, no rollback.

pub mod handlers;
pub mod invoker;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::models::resume::{normalize_resume, resume_text_view};
use crate::models::ResumeProfile;
use crate::pipeline::invoker::StageInvoker;
use crate::ranking::RankEngine;

pub const NO_JOB_DATA_ERROR: &str = "No job data available for cover letter generation.";

/// Composite result of one pipeline run. All four keys are always present;
/// a failed stage's key holds `{"error": ...}` instead of its usual shape.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub parsed_resume: Value,
    pub ranked_jobs: Value,
    pub job_search: Value,
    pub cover_letter: Value,
}

/// Runs the four stages in order, threading each stage's output into the
/// next. Strictly sequential: every suspension point is a capability call.
pub async fn run_pipeline(
    invoker: &StageInvoker,
    ranker: &RankEngine,
    config: &Config,
    raw_text: &str,
) -> PipelineOutput {
    let run_id = Uuid::new_v4();
    info!(%run_id, "pipeline run started");

    let parsed_resume = parse_stage(invoker, config, raw_text).await;

    // Whatever the parser produced — including an error shape — normalizes
    // into a total profile; downstream stages never see a partial record.
    let profile = normalize_resume(&parsed_resume);
    let ranked_jobs = rank_stage(ranker, &profile).await;

    let suggested_titles = extract_titles(&ranked_jobs);
    let job_search = search_stage(invoker, config, &profile, &suggested_titles).await;

    let cover_letter = draft_stage(invoker, config, &profile, &job_search, &ranked_jobs).await;

    info!(%run_id, "pipeline run finished");
    PipelineOutput {
        parsed_resume,
        ranked_jobs,
        job_search,
        cover_letter,
    }
}

async fn parse_stage(invoker: &StageInvoker, config: &Config, raw_text: &str) -> Value {
    invoker
        .invoke(
            &config.resume_parser_url,
            &json!({ "raw_text": raw_text }),
        )
        .await
}

/// The rank stage runs in-process — this repository hosts the engine. With
/// no job list yet, the engine returns the analysis-only shape whose
/// suggested titles feed the search stage.
async fn rank_stage(ranker: &RankEngine, profile: &ResumeProfile) -> Value {
    let resume_text = resume_text_view(profile);
    let response = ranker.run(profile, &resume_text, &[]).await;
    serde_json::to_value(response).unwrap_or_else(|e| json!({ "error": e.to_string() }))
}

async fn search_stage(
    invoker: &StageInvoker,
    config: &Config,
    profile: &ResumeProfile,
    suggested_titles: &[String],
) -> Value {
    invoker
        .invoke(
            &config.job_search_url,
            &json!({ "resume": profile, "suggested_titles": suggested_titles }),
        )
        .await
}

async fn draft_stage(
    invoker: &StageInvoker,
    config: &Config,
    profile: &ResumeProfile,
    job_search: &Value,
    ranked_jobs: &Value,
) -> Value {
    let Some(job) = select_candidate(job_search, ranked_jobs) else {
        // Drafting is only attempted when at least one candidate job exists.
        return json!({ "error": NO_JOB_DATA_ERROR });
    };

    invoker
        .invoke(
            &config.cover_letter_url,
            &json!({ "resume": profile, "job": job }),
        )
        .await
}

fn extract_titles(ranked_jobs: &Value) -> Vec<String> {
    ranked_jobs
        .get("suggested_titles")
        .and_then(Value::as_array)
        .map(|titles| {
            titles
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Draft input selection: prefer the first live search hit, fall back to the
/// top ranked job.
fn select_candidate<'a>(job_search: &'a Value, ranked_jobs: &'a Value) -> Option<&'a Value> {
    job_search
        .pointer("/results/jobs/0")
        .filter(|candidate| candidate.is_object())
        .or_else(|| {
            ranked_jobs
                .pointer("/ranked_jobs/0")
                .filter(|candidate| candidate.is_object())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn config_for(base: &str) -> Config {
        Config {
            resume_parser_url: format!("{base}/parse_resume"),
            job_search_url: format!("{base}/match_jobs"),
            cover_letter_url: format!("{base}/generate_cover_letter"),
            stage_timeout_secs: 5,
            gemini_api_key: None,
            gemini_model: "gemini-2.0-flash-exp".to_string(),
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    fn invoker() -> StageInvoker {
        StageInvoker::new(std::time::Duration::from_secs(5))
    }

    #[test]
    fn test_candidate_prefers_search_results() {
        let job_search = json!({"results": {"jobs": [{"title": "From Search"}]}});
        let ranked_jobs = json!({"ranked_jobs": [{"title": "From Ranking"}]});
        let candidate = select_candidate(&job_search, &ranked_jobs).unwrap();
        assert_eq!(candidate["title"], "From Search");
    }

    #[test]
    fn test_candidate_falls_back_to_ranked_jobs() {
        let job_search = json!({"error": "search down"});
        let ranked_jobs = json!({"ranked_jobs": [{"title": "From Ranking"}]});
        let candidate = select_candidate(&job_search, &ranked_jobs).unwrap();
        assert_eq!(candidate["title"], "From Ranking");
    }

    #[test]
    fn test_no_candidate_when_both_sources_empty() {
        let job_search = json!({"results": {"jobs": []}});
        let ranked_jobs = json!({"engine": "resume-analyzer"});
        assert!(select_candidate(&job_search, &ranked_jobs).is_none());
    }

    #[test]
    fn test_non_object_candidates_are_ignored() {
        let job_search = json!({"results": {"jobs": ["just a string"]}});
        let ranked_jobs = json!({"ranked_jobs": [42]});
        assert!(select_candidate(&job_search, &ranked_jobs).is_none());
    }

    #[test]
    fn test_extract_titles_filters_non_strings() {
        let ranked = json!({"suggested_titles": ["Cloud Engineer", 7, null, "AI Engineer"]});
        assert_eq!(extract_titles(&ranked), vec!["Cloud Engineer", "AI Engineer"]);
        assert!(extract_titles(&json!({"error": "down"})).is_empty());
    }

    #[tokio::test]
    async fn test_full_pipeline_happy_path() {
        let router = Router::new()
            .route(
                "/parse_resume",
                post(|| async {
                    Json(json!({
                        "skills": ["python", "aws"],
                        "experience": [],
                        "education": [],
                        "projects": [],
                        "summary": "Cloud builder",
                    }))
                }),
            )
            .route(
                "/match_jobs",
                post(|Json(payload): Json<Value>| async move {
                    // The search stage must receive the normalized resume and
                    // the titles extracted from the rank stage.
                    assert_eq!(payload["resume"]["skills"][0], "python");
                    assert_eq!(payload["suggested_titles"][0], "Cloud Engineer");
                    Json(json!({
                        "query": "Cloud Engineer jobs",
                        "results": {"jobs": [{"title": "Cloud Engineer", "company": "Acme"}]},
                    }))
                }),
            )
            .route(
                "/generate_cover_letter",
                post(|Json(payload): Json<Value>| async move {
                    assert_eq!(payload["job"]["title"], "Cloud Engineer");
                    Json(json!({ "cover_letter_text": "Dear Hiring Manager", "used_engine": "template" }))
                }),
            );
        let base = serve(router).await;
        let config = config_for(&base);
        let ranker = RankEngine::with_default_chain(None);

        let output = run_pipeline(&invoker(), &ranker, &config, "resume text").await;

        assert_eq!(output.parsed_resume["skills"][0], "python");
        assert_eq!(output.ranked_jobs["engine"], "resume-analyzer");
        assert_eq!(output.job_search["query"], "Cloud Engineer jobs");
        assert_eq!(output.cover_letter["cover_letter_text"], "Dear Hiring Manager");
    }

    #[tokio::test]
    async fn test_pipeline_degrades_without_halting() {
        // No routes at all: every capability call fails, yet all four keys
        // come back and the draft stage writes its fixed error value.
        let base = serve(Router::new()).await;
        let config = config_for(&base);
        let ranker = RankEngine::with_default_chain(None);

        let output = run_pipeline(&invoker(), &ranker, &config, "resume text").await;

        assert!(output.parsed_resume.get("error").is_some());
        // The rank stage still produces the analysis-only shape from an
        // empty profile, with the default title.
        assert_eq!(output.ranked_jobs["engine"], "resume-analyzer");
        assert_eq!(output.ranked_jobs["suggested_titles"][0], "Software Engineer");
        assert!(output.job_search.get("error").is_some());
        assert_eq!(output.cover_letter, json!({ "error": NO_JOB_DATA_ERROR }));
    }

    #[tokio::test]
    async fn test_draft_skipped_entirely_without_candidates() {
        let router = Router::new()
            .route(
                "/parse_resume",
                post(|| async { Json(json!({ "skills": ["rust"] })) }),
            )
            .route(
                "/match_jobs",
                post(|| async { Json(json!({ "query": "rust", "results": {"jobs": []} })) }),
            )
            .route(
                "/generate_cover_letter",
                post(|| async {
                    panic!("draft capability must not be invoked without a candidate");
                    #[allow(unreachable_code)]
                    ()
                }),
            );
        let base = serve(router).await;
        let config = config_for(&base);
        let ranker = RankEngine::with_default_chain(None);

        let output = run_pipeline(&invoker(), &ranker, &config, "resume text").await;
        assert_eq!(output.cover_letter["error"], NO_JOB_DATA_ERROR);
    }
}
