//! `Narrative` (candidate, pre-scoring) and `RankedNarrative` (output), spec §3.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A candidate narrative produced by the clusterer, before scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    pub label: String,
    pub entities: BTreeSet<String>,
    /// Ordered list of member `SignalEvent` ids. Order of first insertion is
    /// preserved; ranking and evidence selection happen downstream.
    pub members: Vec<String>,
    pub window: (DateTime<Utc>, DateTime<Utc>),
}

/// Per-feature score in [0,1] (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Features {
    pub velocity: f64,
    pub breadth: f64,
    pub cross: f64,
    pub novelty: f64,
    pub credibility: f64,
    pub spam_penalty: f64,
    pub single_source_penalty: f64,
}

/// Unclamped per-term contribution to the composite score (spec §4.3),
/// reported alongside the clamped `score` so the explanation can show its
/// work without anyone having to recompute it from `features` and the
/// configured weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub velocity: f64,
    pub breadth: f64,
    pub cross: f64,
    pub novelty: f64,
    pub credibility: f64,
    pub spam_penalty: f64,
    pub single_source_penalty: f64,
    /// Sum of the seven terms above, before the [0,1] clamp.
    pub raw_total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    Low,
    Moderate,
    Strong,
}

impl std::fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfidenceTier::Low => write!(f, "low"),
            ConfidenceTier::Moderate => write!(f, "moderate"),
            ConfidenceTier::Strong => write!(f, "strong"),
        }
    }
}

/// Confidence tier plus the 0-100 numeric score it was bucketed from (spec §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    pub tier: ConfidenceTier,
    pub value: f64,
}

/// A scored, explained narrative — the pipeline's final output unit (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedNarrative {
    pub label: String,
    pub entities: BTreeSet<String>,
    pub members: Vec<String>,
    pub window: (DateTime<Utc>, DateTime<Utc>),
    pub features: Features,
    pub score: f64,
    pub confidence: Confidence,
    pub evidence: Vec<String>,
    pub why_now: String,
    pub score_breakdown: ScoreBreakdown,
}
