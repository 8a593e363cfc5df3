//! JobListing and RankedJob — canonical job records.
//!
//! `normalize_jobs` accepts the mixed bag real producers emit: raw objects,
//! JSON-encoded strings, and stray scalars. A listing with neither title nor
//! description carries no matchable signal and is dropped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{coerce_string, first_truthy};

/// Id fallback: when no explicit identifier exists, slice the title.
const ID_SLICE_LEN: usize = 40;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub location: String,
}

/// A job annotated with a fit score and rationale. Every field defaults so
/// partial generative output still deserializes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedJob {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub fit_summary: String,
    #[serde(default)]
    pub skill_alignment: Vec<String>,
    #[serde(default)]
    pub gaps: Vec<String>,
}

/// Canonicalizes a heterogeneous job sequence into `JobListing`s.
///
/// Objects go through field-priority selection; strings are parsed as JSON
/// and fall back to a single free-text job (the string as both title and
/// description); other scalars are coerced to strings first; arrays and
/// nulls are dropped. Listings with both empty title and empty description
/// are excluded from the output.
pub fn normalize_jobs(raw: &[Value]) -> Vec<JobListing> {
    let mut jobs = Vec::new();

    for item in raw {
        let listing = match item {
            Value::Object(obj) => listing_from_object(obj),
            Value::String(text) => listing_from_text(text),
            Value::Array(_) | Value::Null => continue,
            scalar => listing_from_text(&coerce_string(Some(scalar))),
        };

        if listing.title.is_empty() && listing.description.is_empty() {
            continue;
        }
        jobs.push(listing);
    }

    jobs
}

fn listing_from_text(text: &str) -> JobListing {
    if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(text) {
        return listing_from_object(&obj);
    }

    // Unparseable string: a single free-text job.
    let free_text = Value::String(text.to_string());
    let obj = Map::from_iter([
        ("title".to_string(), free_text.clone()),
        ("description".to_string(), free_text),
    ]);
    listing_from_object(&obj)
}

fn listing_from_object(obj: &Map<String, Value>) -> JobListing {
    let title = first_truthy(obj, &["title", "role"]);
    let description = first_truthy(obj, &["description", "summary"]);
    let identifier = first_truthy(obj, &["id", "job_id", "slug", "title"]);
    let id = if identifier.is_empty() {
        // Title slice; description slice when the title is empty too, so
        // every listing that survives the signal filter keeps a usable id.
        let source = if title.is_empty() { &description } else { &title };
        source.chars().take(ID_SLICE_LEN).collect()
    } else {
        identifier
    };

    JobListing {
        id,
        title,
        company: first_truthy(obj, &["company", "employer"]),
        description,
        requirements: first_truthy(obj, &["requirements", "responsibilities", "skills"]),
        location: first_truthy(obj, &["location"]),
    }
}
