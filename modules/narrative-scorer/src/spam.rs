//! SpamPenalty: the max of two independent detectors — burst activity and
//! single-author dominance (spec §4.3).

use chrono::{DateTime, Utc};

/// Maximum fraction of members falling inside any 1-hour sliding window.
/// `timestamps` need not be sorted; the function sorts its own copy.
fn max_burst_fraction(timestamps: &[DateTime<Utc>]) -> f64 {
    if timestamps.is_empty() {
        return 0.0;
    }
    let mut sorted = timestamps.to_vec();
    sorted.sort();
    let n = sorted.len();
    let window = chrono::Duration::hours(1);

    let mut best = 0usize;
    let mut left = 0usize;
    for right in 0..n {
        while sorted[right] - sorted[left] > window {
            left += 1;
        }
        best = best.max(right - left + 1);
    }
    best as f64 / n as f64
}

/// `burst` penalty: 0 below the threshold, scaling linearly to 1.0 as the
/// max 1-hour concentration approaches 100% (spec default threshold 0.5,
/// slope 2.0 so `burst = 1.0` maps to penalty `1.0`).
fn burst_penalty(timestamps: &[DateTime<Utc>], threshold: f64) -> f64 {
    let burst = max_burst_fraction(timestamps);
    if burst > threshold {
        ((burst - threshold) * 2.0).min(1.0)
    } else {
        0.0
    }
}

/// `author dominance` penalty: 0 below the threshold, scaling at 2.5x past
/// it (spec default threshold 0.6).
fn author_dominance_penalty(authors: &[Option<&str>], threshold: f64) -> f64 {
    use std::collections::HashMap;
    let total = authors.len();
    if total == 0 {
        return 0.0;
    }
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for author in authors.iter().flatten() {
        *counts.entry(*author).or_insert(0) += 1;
    }
    let max_share = counts
        .values()
        .copied()
        .max()
        .map(|c| c as f64 / total as f64)
        .unwrap_or(0.0);
    if max_share > threshold {
        ((max_share - threshold) * 2.5).min(1.0)
    } else {
        0.0
    }
}

pub fn spam_penalty(
    timestamps: &[DateTime<Utc>],
    authors: &[Option<&str>],
    burst_threshold: f64,
    author_dominance_threshold: f64,
) -> f64 {
    burst_penalty(timestamps, burst_threshold)
        .max(author_dominance_penalty(authors, author_dominance_threshold))
}
