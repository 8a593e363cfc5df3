// Canonical data model + normalization layer.
// Upstream producers (parser capability, generative output, search API,
// hand-typed text) are untrusted; normalization is the single point where
// unknown shapes become fixed shapes, so downstream code assumes total
// field presence.

pub mod job;
pub mod resume;

pub use job::{normalize_jobs, JobListing, RankedJob};
pub use resume::{normalize_resume, ResumeProfile};

use serde_json::{Map, Value};

/// Lossless-enough string coercion: scalars render as themselves, containers
/// as compact JSON text, null/missing as the empty string. Never fails.
pub(crate) fn coerce_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Truthiness for field-priority selection: empty strings, empty containers,
/// zero, `false`, and null all count as absent.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// First truthy source wins; keys are a fixed priority order per target field.
pub(crate) fn first_truthy(obj: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| is_truthy(value))
        .map(|value| coerce_string(Some(value)))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_string_scalars() {
        assert_eq!(coerce_string(Some(&json!("text"))), "text");
        assert_eq!(coerce_string(Some(&json!(3))), "3");
        assert_eq!(coerce_string(Some(&json!(true))), "true");
        assert_eq!(coerce_string(Some(&json!(null))), "");
        assert_eq!(coerce_string(None), "");
    }

    #[test]
    fn test_coerce_string_containers_render_as_json() {
        assert_eq!(coerce_string(Some(&json!(["a", "b"]))), r#"["a","b"]"#);
    }

    #[test]
    fn test_first_truthy_skips_empty_sources() {
        let obj = json!({"title": "", "role": "Engineer"});
        let map = obj.as_object().unwrap();
        assert_eq!(first_truthy(map, &["title", "role"]), "Engineer");
    }

    #[test]
    fn test_first_truthy_all_missing_is_empty() {
        let obj = json!({});
        let map = obj.as_object().unwrap();
        assert_eq!(first_truthy(map, &["title", "role"]), "");
    }
}
