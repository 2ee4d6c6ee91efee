//! Exact and near-duplicate dedup (spec §4.1). Both are pure functions over
//! already-validated events; `Normalizer` in `lib.rs` owns the sliding
//! per-source bucket state these are called from.

use chrono::{DateTime, Utc};
use narrative_common::text::title_similarity;
use narrative_types::SignalEvent;
use sha2::{Digest, Sha256};

/// `sha256(lower(normalize_ws(title)) || url || floor(timestamp / bucket))`,
/// hex-encoded (spec §4.1). `bucket_minutes` is configured, not hardcoded,
/// but defaults to the spec's 5 minutes.
pub fn exact_key(event: &SignalEvent, bucket_minutes: i64) -> String {
    let normalized_title = narrative_common::text::normalize_ws(&event.title).to_lowercase();
    let url = event.url.as_deref().unwrap_or("");
    let bucket = floor_to_bucket(event.timestamp, bucket_minutes);

    let mut hasher = Sha256::new();
    hasher.update(normalized_title.as_bytes());
    hasher.update(b"\0");
    hasher.update(url.as_bytes());
    hasher.update(b"\0");
    hasher.update(bucket.to_le_bytes());
    hex::encode(hasher.finalize())
}

fn floor_to_bucket(ts: DateTime<Utc>, bucket_minutes: i64) -> i64 {
    ts.timestamp() / (bucket_minutes * 60).max(1)
}

/// True if `candidate`'s title is a near-duplicate (Jaccard similarity >=
/// `threshold`) of any title already retained in the sliding bucket.
pub fn is_near_duplicate(candidate_title: &str, retained_titles: &[String], threshold: f64) -> bool {
    retained_titles
        .iter()
        .any(|retained| title_similarity(candidate_title, retained) >= threshold)
}
