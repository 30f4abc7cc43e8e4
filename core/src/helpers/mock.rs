#![deny(missing_docs)]

//! # Mock Response Synthesis
//!
//! Builds a plausible mock JSON body from a response definition's
//! pre-generated example: record arrays are padded to two entries,
//! pagination fields are pinned to stable values and identifier-like
//! fields get fresh unique tokens so repeated renders stay distinct.

use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counter; keeps generated identifier tokens distinct
/// across renders.
static TOKEN_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Keys whose values are pinned to null in mock bodies.
const NULLED_KEYS: [&str; 4] = ["pageIndex", "pageSize", "sort", "totalPages"];

fn unique_token(key: &str) -> String {
    format!("{}{}", key, TOKEN_COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Synthesizes a mock JSON body for a response definition.
///
/// Reads the example at `content.application/json.schema.generatedExample`
/// and returns `"{}"` when none is present. Otherwise the example is
/// rewritten: arrays of records become two copies of their first element;
/// pagination keys are nulled; `totalElements` becomes 50; id/name/code
/// keys get fresh tokens; the scalar placeholder `"string"` becomes the
/// field's own key name and the scalar `0` becomes `1`.
pub fn resolve_mock_response(response: &Value) -> String {
    let example = response
        .get("content")
        .and_then(|content| content.get("application/json"))
        .and_then(|media| media.get("schema"))
        .and_then(|schema| schema.get("generatedExample"));

    let data = match example {
        None | Some(Value::Null) => return "{}".to_string(),
        Some(data) => data.clone(),
    };

    let padded = pad_record_arrays(data);
    let body = rewrite(padded, None);
    serde_json::to_string_pretty(&body).unwrap_or_else(|_| "{}".to_string())
}

/// Replaces any array whose first element is a record with two copies of
/// that element.
fn pad_record_arrays(value: Value) -> Value {
    match value {
        Value::Array(mut entries) => {
            if matches!(entries.first(), Some(Value::Object(_))) {
                let first = entries.swap_remove(0);
                Value::Array(vec![first.clone(), first])
            } else {
                Value::Array(entries.into_iter().map(pad_record_arrays).collect())
            }
        }
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, entry)| (key, pad_record_arrays(entry)))
                .collect(),
        ),
        scalar => scalar,
    }
}

/// Applies the key- and value-level rewrite rules, depth-first. Key rules
/// take precedence over value rules.
fn rewrite(value: Value, key: Option<&str>) -> Value {
    if let Some(key) = key {
        if NULLED_KEYS.contains(&key) {
            return Value::Null;
        }
        if key == "totalElements" {
            return Value::from(50);
        }
        if is_identifier_key(key) {
            return Value::String(unique_token(key));
        }
    }

    match value {
        Value::String(text) if text == "string" => {
            Value::String(key.unwrap_or_default().to_string())
        }
        Value::Number(number) if number.as_f64() == Some(0.0) => Value::from(1),
        Value::Array(entries) => Value::Array(
            entries
                .into_iter()
                .map(|entry| rewrite(entry, None))
                .collect(),
        ),
        Value::Object(map) => {
            let mut rewritten = Map::with_capacity(map.len());
            for (entry_key, entry) in map {
                let entry = rewrite(entry, Some(&entry_key));
                rewritten.insert(entry_key, entry);
            }
            Value::Object(rewritten)
        }
        scalar => scalar,
    }
}

fn is_identifier_key(key: &str) -> bool {
    key == "id"
        || key.ends_with("Id")
        || key == "name"
        || key.ends_with("Name")
        || key == "code"
        || key.ends_with("Code")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response_with_example(example: Value) -> Value {
        json!({
            "content": {
                "application/json": {
                    "schema": { "generatedExample": example }
                }
            }
        })
    }

    fn parse(body: &str) -> Value {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_missing_example_yields_empty_body() {
        assert_eq!(resolve_mock_response(&json!({})), "{}");
        assert_eq!(
            resolve_mock_response(&json!({"content": {"application/json": {}}})),
            "{}"
        );
        assert_eq!(resolve_mock_response(&response_with_example(json!(null))), "{}");
    }

    #[test]
    fn test_identifier_keys_get_fresh_tokens() {
        let response = response_with_example(json!({"id": "x", "petName": "y"}));
        let body = parse(&resolve_mock_response(&response));

        let id = body["id"].as_str().unwrap();
        assert_ne!(id, "x");
        assert!(id.starts_with("id"));
        assert!(body["petName"].as_str().unwrap().starts_with("petName"));
    }

    #[test]
    fn test_tokens_are_unique_across_renders() {
        let response = response_with_example(json!({"id": "x"}));
        let first = parse(&resolve_mock_response(&response));
        let second = parse(&resolve_mock_response(&response));
        assert_ne!(first["id"], second["id"]);
    }

    #[test]
    fn test_pagination_keys_are_pinned() {
        let response = response_with_example(json!({
            "pageIndex": 3,
            "pageSize": 20,
            "sort": "asc",
            "totalPages": 7,
            "totalElements": 0
        }));
        let body = parse(&resolve_mock_response(&response));

        assert_eq!(body["pageIndex"], Value::Null);
        assert_eq!(body["pageSize"], Value::Null);
        assert_eq!(body["sort"], Value::Null);
        assert_eq!(body["totalPages"], Value::Null);
        assert_eq!(body["totalElements"], json!(50));
    }

    #[test]
    fn test_placeholder_scalars_are_rewritten() {
        let response = response_with_example(json!({"tag": "string", "count": 0}));
        let body = parse(&resolve_mock_response(&response));

        assert_eq!(body["tag"], json!("tag"));
        assert_eq!(body["count"], json!(1));
    }

    #[test]
    fn test_record_arrays_are_padded_to_two() {
        let response = response_with_example(json!({
            "items": [{"tag": "string"}, {"tag": "other"}, {"tag": "third"}]
        }));
        let body = parse(&resolve_mock_response(&response));

        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["tag"], json!("tag"));
        assert_eq!(items[1]["tag"], json!("tag"));
    }

    #[test]
    fn test_scalar_arrays_are_left_alone() {
        let response = response_with_example(json!({"tags": ["a", "b", "c"]}));
        let body = parse(&resolve_mock_response(&response));
        assert_eq!(body["tags"], json!(["a", "b", "c"]));
    }
}
