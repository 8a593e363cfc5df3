//! ResumeProfile — canonical candidate record and its normalizer.
//!
//! `normalize_resume` never fails: whatever shape the parser capability (or a
//! caller) produced, every field comes out present and correctly typed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{coerce_string, first_truthy};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceItem {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub years: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationItem {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub years: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tech: Vec<String>,
}

/// Canonical candidate record. Every field is always present with the
/// correct container type, even when the raw input omits or malforms it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeProfile {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceItem>,
    #[serde(default)]
    pub education: Vec<EducationItem>,
    #[serde(default)]
    pub projects: Vec<ProjectItem>,
    #[serde(default)]
    pub summary: String,
}

/// Canonicalizes an arbitrary structure into a `ResumeProfile`.
///
/// Extraneous keys are ignored, non-object list items are dropped, scalar
/// values are coerced to strings, and absent or wrong-typed collections
/// default to empty sequences.
pub fn normalize_resume(raw: &Value) -> ResumeProfile {
    let Some(obj) = raw.as_object() else {
        return ResumeProfile::default();
    };

    ResumeProfile {
        skills: string_items(obj.get("skills")),
        experience: object_items(obj.get("experience"))
            .map(|entry| ExperienceItem {
                company: coerce_string(entry.get("company")),
                role: coerce_string(entry.get("role")),
                years: coerce_string(entry.get("years")),
                description: coerce_string(entry.get("description")),
            })
            .collect(),
        education: object_items(obj.get("education"))
            .map(|entry| EducationItem {
                degree: coerce_string(entry.get("degree")),
                institution: coerce_string(entry.get("institution")),
                years: coerce_string(entry.get("years")),
            })
            .collect(),
        projects: object_items(obj.get("projects"))
            .map(|entry| ProjectItem {
                name: coerce_string(entry.get("name")),
                description: coerce_string(entry.get("description")),
                tech: string_items(entry.get("tech")),
            })
            .collect(),
        summary: first_truthy(obj, &["summary", "headline"]),
    }
}

/// Labeled multi-line rendering of the profile, fed to the generative
/// ranking prompt as `resume_text`.
pub fn resume_text_view(profile: &ResumeProfile) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !profile.summary.is_empty() {
        parts.push(format!("Summary: {}", profile.summary));
    }
    if !profile.skills.is_empty() {
        parts.push(format!("Skills: {}", profile.skills.join(", ")));
    }
    for exp in &profile.experience {
        parts.push(format!(
            "Experience: {}",
            join_nonempty(&[&exp.role, &exp.company, &exp.years, &exp.description])
        ));
    }
    for edu in &profile.education {
        parts.push(format!(
            "Education: {}",
            join_nonempty(&[&edu.degree, &edu.institution, &edu.years])
        ));
    }
    for project in &profile.projects {
        let tech = project.tech.join(", ");
        parts.push(format!(
            "Project: {}",
            join_nonempty(&[&project.name, &project.description, &tech])
        ));
    }

    parts.join("\n")
}

/// Lowercase blob of every textual resume field, used for keyword matching
/// in title suggestion. Education years are deliberately excluded — they
/// carry no role signal.
pub fn resume_signal_text(profile: &ResumeProfile) -> String {
    let mut pieces: Vec<&str> = Vec::new();

    pieces.extend(profile.skills.iter().map(String::as_str));
    for exp in &profile.experience {
        pieces.extend([
            exp.role.as_str(),
            exp.company.as_str(),
            exp.years.as_str(),
            exp.description.as_str(),
        ]);
    }
    for project in &profile.projects {
        pieces.extend([project.name.as_str(), project.description.as_str()]);
        pieces.extend(project.tech.iter().map(String::as_str));
    }
    for edu in &profile.education {
        pieces.extend([edu.degree.as_str(), edu.institution.as_str()]);
    }

    pieces.retain(|piece| !piece.is_empty());
    pieces.join(" ").to_lowercase()
}

fn join_nonempty(pieces: &[&str]) -> String {
    pieces
        .iter()
        .filter(|piece| !piece.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

fn string_items(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| coerce_string(Some(item)))
                .filter(|item| !item.trim().is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn object_items(value: Option<&Value>) -> impl Iterator<Item = &serde_json::Map<String, Value>> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}
