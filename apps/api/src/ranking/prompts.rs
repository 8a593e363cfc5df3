// Prompt constants for the ranking module. All generative calls go through
// llm_client — these are the only prompt strings in the crate.

/// System prompt for generative job ranking — enforces strict JSON output.
pub const RANK_SYSTEM: &str = "You evaluate candidate -> job fit. \
    Given structured resume data and job listings, respond with STRICT JSON only. \
    Rank jobs by fit score between 0 and 1. Always include all provided jobs. \
    For each ranked job, copy the exact title and company text from the input list \
    and do not invent new roles. \
    Provide concise reasoning and highlight skills that align or are missing. \
    Also produce a `suggested_titles` list (3-5 items) of role titles that match \
    the candidate's experience.";

/// Response shape example sent alongside the instructions. Fields are
/// optional but data types must hold; `ranked_jobs` is the validity gate.
pub const RANK_SCHEMA_HINT: &str = r#"{
  "engine": "gemini",
  "ranked_jobs": [
    {
      "id": "job-1",
      "title": "Cloud Engineer",
      "company": "Acme",
      "score": 0.82,
      "fit_summary": "Strong cloud and IaC overlap",
      "skill_alignment": ["aws", "terraform"],
      "gaps": ["fintech domain experience"]
    }
  ],
  "suggested_titles": ["Cloud Engineer", "AI Engineer", "Backend Engineer"]
}"#;
