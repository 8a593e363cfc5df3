//! Keyword-overlap ranking — the deterministic strategy of last resort.
//!
//! Pure, fast, no generative call, cannot fail. Scores are the fraction of
//! the candidate's distinct skills found as substrings of the job text.

use async_trait::async_trait;

use crate::models::{JobListing, RankedJob, ResumeProfile};
use crate::ranking::titles::{suggest_titles, DEFAULT_LIMIT};
use crate::ranking::{RankError, RankOutcome, RankStrategy};

pub const ENGINE_NAME: &str = "fallback-keyword";
const FIT_SUMMARY: &str = "Keyword overlap heuristic";

pub struct KeywordRankStrategy;

#[async_trait]
impl RankStrategy for KeywordRankStrategy {
    fn name(&self) -> &'static str {
        ENGINE_NAME
    }

    async fn rank(
        &self,
        profile: &ResumeProfile,
        _resume_text: &str,
        jobs: &[JobListing],
    ) -> Result<RankOutcome, RankError> {
        Ok(rank_by_keyword_overlap(profile, jobs))
    }
}

/// Scores each job by skill overlap and sorts descending. The sort is
/// stable: ties keep the input job order.
pub fn rank_by_keyword_overlap(profile: &ResumeProfile, jobs: &[JobListing]) -> RankOutcome {
    let skills = distinct_lowercase_skills(profile);

    let mut ranked: Vec<RankedJob> = jobs
        .iter()
        .map(|job| {
            let blob = job_text(job);
            let overlap: Vec<String> = skills
                .iter()
                .filter(|skill| blob.contains(skill.as_str()))
                .cloned()
                .collect();
            let score = if skills.is_empty() {
                0.0
            } else {
                round2(overlap.len() as f64 / skills.len() as f64)
            };

            RankedJob {
                id: job.id.clone(),
                title: job.title.clone(),
                company: job.company.clone(),
                score,
                fit_summary: FIT_SUMMARY.to_string(),
                skill_alignment: overlap,
                gaps: Vec::new(),
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    RankOutcome {
        engine: ENGINE_NAME.to_string(),
        ranked_jobs: ranked,
        suggested_titles: suggest_titles(profile, DEFAULT_LIMIT),
    }
}

fn job_text(job: &JobListing) -> String {
    [
        job.title.as_str(),
        job.description.as_str(),
        job.requirements.as_str(),
    ]
    .iter()
    .filter(|piece| !piece.is_empty())
    .copied()
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

/// Lowercased skills, deduplicated preserving first-occurrence order, so
/// both the score denominator and the alignment order are deterministic.
fn distinct_lowercase_skills(profile: &ResumeProfile) -> Vec<String> {
    let mut skills: Vec<String> = Vec::new();
    for skill in &profile.skills {
        let lowered = skill.to_lowercase();
        if !lowered.is_empty() && !skills.contains(&lowered) {
            skills.push(lowered);
        }
    }
    skills
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
