//! Title Suggestion Engine — ordered keyword-set → title rules over the
//! resume signal blob. The table is data; the matcher is one function, so
//! rules can be extended without touching control flow.

use crate::models::resume::{resume_signal_text, ResumeProfile};

pub const DEFAULT_TITLE: &str = "Software Engineer";
pub const DEFAULT_LIMIT: usize = 5;

/// Ordered rule table: a rule fires when any of its keywords appears as a
/// substring of the blob. Earlier rules are strictly preferred; evaluation
/// stops as soon as `limit` titles are collected, so later rules may never
/// be reached.
const SUGGESTION_RULES: &[(&[&str], &str)] = &[
    (&["cloud", "azure", "aws", "gcp", "terraform"], "Cloud Engineer"),
    (&["kubernetes", "docker", "devops", "ci/cd"], "DevOps Engineer"),
    (
        &["machine learning", "ml", "tensorflow", "pytorch"],
        "Machine Learning Engineer",
    ),
    (&["ai", "rag", "langchain", "llm"], "AI Engineer"),
    (
        &["data", "analytics", "sql", "etl", "warehouse"],
        "Data Engineer",
    ),
    (
        &["backend", "fastapi", "django", "golang", "go", "python", "api"],
        "Backend Engineer",
    ),
    (
        &["full stack", "react", "next.js", "typescript", "javascript"],
        "Full Stack Engineer",
    ),
    (
        &["frontend", "ui", "ux", "react", "javascript"],
        "Frontend Engineer",
    ),
    (
        &["web3", "blockchain", "solidity", "polygon", "nft"],
        "Blockchain Engineer",
    ),
    (&["security", "iam", "cybersecurity"], "Security Engineer"),
    (&["product", "manager", "roadmap"], "Product Manager"),
];

/// Derives candidate role titles from resume content. Never returns an empty
/// sequence: a resume with no textual signal gets the single default title.
pub fn suggest_titles(profile: &ResumeProfile, limit: usize) -> Vec<String> {
    let blob = resume_signal_text(profile);
    if blob.is_empty() {
        return vec![DEFAULT_TITLE.to_string()];
    }

    let mut suggestions: Vec<String> = Vec::new();
    for (keywords, title) in SUGGESTION_RULES {
        if keywords.iter().any(|keyword| blob.contains(keyword))
            && !suggestions.iter().any(|existing| existing == title)
        {
            suggestions.push((*title).to_string());
        }
        // Early stop: once the limit fills, later rules are never evaluated.
        if suggestions.len() >= limit {
            break;
        }
    }

    if suggestions.is_empty() {
        suggestions.push(DEFAULT_TITLE.to_string());
    }
    suggestions.truncate(limit);
    suggestions
}
