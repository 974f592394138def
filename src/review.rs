// src/review.rs
//! Review records: the human-feedback corpus the reranker is trained from.
//!
//! Records arrive as a JSON array written by the review-collecting frontend
//! (camelCase field names). The corpus is owned elsewhere; this module only
//! reads it, and reads it leniently: a missing or broken file yields an empty
//! list, a malformed entry is skipped, and a malformed rating value is
//! treated as absent. Training must never fail because one reviewer typed
//! "five" into a number field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_REVIEWS_PATH: &str = "reviews.json";
pub const ENV_REVIEWS_PATH: &str = "RERANK_REVIEWS_PATH";

/// Resolve the review corpus location: `RERANK_REVIEWS_PATH` env override,
/// else `reviews.json` in the working directory.
pub fn reviews_path() -> PathBuf {
    std::env::var(ENV_REVIEWS_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_REVIEWS_PATH))
}

/// One stored review of an assistant reply.
///
/// Ratings are kept as raw JSON values and coerced on access, so a bad value
/// in one field never invalidates the rest of the record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// The assistant reply text this review rates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant_text: Option<String>,
    /// Top-level 1–5 rating; a number or numeric string on the wire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Value>,
    /// Per-criterion 1–5 ratings, e.g. `{"clarity": 5, "ethics": 3}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authenticated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authenticated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authenticated_at: Option<String>,
    /// Submission time as stored (ISO 8601 string); parse via [`Self::timestamp`].
    #[serde(rename = "timestamp", skip_serializing_if = "Option::is_none")]
    pub timestamp_raw: Option<String>,
}

impl ReviewRecord {
    /// The reply text, or `""` when absent.
    pub fn text(&self) -> &str {
        self.assistant_text.as_deref().unwrap_or("")
    }

    /// Rating this review contributes to `criterion`:
    /// the per-criterion value when present and numeric, else the top-level
    /// rating, else `None` (no contribution).
    pub fn rating_for(&self, criterion: &str) -> Option<f32> {
        if let Some(Value::Object(map)) = &self.criteria {
            if let Some(v) = map.get(criterion) {
                if let Some(r) = as_rating(v) {
                    return Some(r);
                }
            }
        }
        self.rating.as_ref().and_then(as_rating)
    }

    /// Parsed submission time, if the stored string is valid RFC 3339.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp_raw
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Coerce a JSON value into a rating. Numbers and numeric strings qualify;
/// everything else (bool, null, arrays, objects) is treated as absent.
fn as_rating(v: &Value) -> Option<f32> {
    let r = match v {
        Value::Number(n) => n.as_f64().map(|f| f as f32),
        Value::String(s) => s.trim().parse::<f32>().ok(),
        _ => None,
    };
    r.filter(|f| f.is_finite())
}

/// Read a JSON array of reviews from `path`.
///
/// Missing file, unreadable file, or non-array JSON → empty list. Entries
/// that do not look like review objects are skipped individually.
pub fn load_reviews<P: AsRef<Path>>(path: P) -> Vec<ReviewRecord> {
    let raw = match fs::read_to_string(path.as_ref()) {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };
    let values: Vec<Value> = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(_) => return Vec::new(),
    };

    let reviews: Vec<ReviewRecord> = values
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();
    debug!(count = reviews.len(), path = %path.as_ref().display(), "loaded reviews");
    reviews
}
