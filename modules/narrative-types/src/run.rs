//! `RunContext` (input) and `RunArtifact` (output), spec §3 and §6.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::SourceTag;
use crate::narrative::RankedNarrative;

/// The analysis window and its baseline, carried read-only through every
/// stage (spec §3). `baseline.1 == window.0` and `|baseline| >= |window|`
/// are invariants enforced by `RunContext::new`, not re-checked per stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunContext {
    pub window: (DateTime<Utc>, DateTime<Utc>),
    pub baseline: (DateTime<Utc>, DateTime<Utc>),
    pub run_id: uuid::Uuid,
    pub generated_at: DateTime<Utc>,
}

impl RunContext {
    /// Build a context, deriving the baseline as `ratio` times the window
    /// length ending exactly at `window.0` (spec §3 default: 3x).
    pub fn new(
        window: (DateTime<Utc>, DateTime<Utc>),
        baseline_ratio: f64,
        run_id: uuid::Uuid,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let window_len = window.1 - window.0;
        let baseline_len_secs = (window_len.num_seconds() as f64 * baseline_ratio).round() as i64;
        let baseline_start = window.0 - chrono::Duration::seconds(baseline_len_secs);
        Self {
            window,
            baseline: (baseline_start, window.0),
            run_id,
            generated_at,
        }
    }

    pub fn window_days(&self) -> f64 {
        (self.window.1 - self.window.0).num_seconds() as f64 / 86_400.0
    }

    pub fn baseline_days(&self) -> f64 {
        (self.baseline.1 - self.baseline.0).num_seconds() as f64 / 86_400.0
    }
}

/// Per-stage recoverable-issue counters (spec §7's "aggregated into counters").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub malformed_dropped: u64,
    pub exact_duplicates_dropped: u64,
    pub near_duplicates_dropped: u64,
    pub unanchored: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub ingested: usize,
    pub after_dedup: usize,
    pub candidates: usize,
    pub ranked: usize,
}

pub type SourceSummary = BTreeMap<SourceTag, usize>;

/// The single deterministic output of a pipeline run (spec §3, §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunArtifact {
    pub run_id: uuid::Uuid,
    pub generated_at: DateTime<Utc>,
    pub window: (DateTime<Utc>, DateTime<Utc>),
    pub baseline: (DateTime<Utc>, DateTime<Utc>),
    pub source_summary: SourceSummary,
    pub totals: Totals,
    pub counters: Counters,
    pub narratives: Vec<RankedNarrative>,
    /// Set when the run produced zero narratives because the window was
    /// empty after dedup (spec §7) — not an error, just an explanation.
    pub notes: Option<String>,
}
