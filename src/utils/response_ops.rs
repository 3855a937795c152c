//! Read-only accessors over Apiframe response bodies.
//!
//! The client returns bodies verbatim; these helpers pull out the handful of
//! fields callers usually look at without committing to a full schema.
use serde_json::Value;

/// `errors[0].msg`, the message the service puts first on failure.
pub fn first_error_message(v: &Value) -> Option<&str> {
    v.get("errors")?.as_array()?.first()?.get("msg")?.as_str()
}

pub fn task_id(v: &Value) -> Option<&str> {
    v.get("task_id").and_then(|t| t.as_str())
}

/// `status` of a fetched task (e.g. `pending`, `processing`, `finished`, `failed`).
pub fn task_status(v: &Value) -> Option<&str> {
    v.get("status").and_then(|s| s.as_str())
}

/// Every image URL in the body, without duplicates.
///
/// Picks up `image_url`, `original_image_url` and the entries of any
/// `image_urls` array, at any depth, so it works for both `fetch` and
/// `fetch_many` responses.
pub fn collect_image_urls(v: &Value) -> Vec<String> {
    let mut out = Vec::new();
    collect_urls(v, &mut out);
    out
}

fn collect_urls(v: &Value, out: &mut Vec<String>) {
    match v {
        Value::Object(map) => {
            for (k, vv) in map.iter() {
                match (k.as_str(), vv) {
                    ("image_url" | "original_image_url", Value::String(s)) => push_unique(out, s),
                    ("image_urls", Value::Array(arr)) => {
                        for s in arr.iter().filter_map(|x| x.as_str()) {
                            push_unique(out, s);
                        }
                    }
                    _ => collect_urls(vv, out),
                }
            }
        }
        Value::Array(arr) => {
            for vv in arr {
                collect_urls(vv, out);
            }
        }
        _ => {}
    }
}

fn push_unique(out: &mut Vec<String>, s: &str) {
    if !out.iter().any(|x| x == s) {
        out.push(s.to_string());
    }
}
