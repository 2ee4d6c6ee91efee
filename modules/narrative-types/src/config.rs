//! `PipelineConfig`: every tunable the spec names explicitly (§4.3, §6, §9),
//! with defaults set to the spec's literal numbers. Loaded from TOML the
//! way `rootsignal-common::config` loads its environment — a single
//! `from_file`/`from_toml_str` pair plus a `validate()` that turns bad
//! input into a `PipelineError::Config` before any stage runs.

use std::collections::BTreeMap;

use narrative_common::PipelineError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub velocity: f64,
    pub breadth: f64,
    pub cross: f64,
    pub novelty: f64,
    pub credibility: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            velocity: 0.25,
            breadth: 0.20,
            cross: 0.20,
            novelty: 0.20,
            credibility: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Penalties {
    pub spam: f64,
    pub single_source: f64,
}

impl Default for Penalties {
    fn default() -> Self {
        Self {
            spam: 0.10,
            single_source: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    pub min_entity_support: usize,
    pub edge_threshold: f64,
    pub text_distance_threshold: f64,
    pub min_text_support: usize,
    pub min_cluster_size: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            min_entity_support: 2,
            edge_threshold: 0.30,
            text_distance_threshold: 0.55,
            min_text_support: 3,
            min_cluster_size: 3,
        }
    }
}

/// Weights for the three diversity terms inside `breadth` (spec §4.3);
/// must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiversityConfig {
    pub entities: f64,
    pub sources: f64,
    pub authors: f64,
}

impl Default for DiversityConfig {
    fn default() -> Self {
        Self {
            entities: 0.40,
            sources: 0.30,
            authors: 0.30,
        }
    }
}

/// The caps each raw diversity count is normalized against before the
/// `min(1, count / cap)` clamp (spec §4.3: 8 entities, 5 sources, 10 authors).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiversityCaps {
    pub entities: f64,
    pub sources: f64,
    pub authors: f64,
}

impl Default for DiversityCaps {
    fn default() -> Self {
        Self {
            entities: 8.0,
            sources: 5.0,
            authors: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Acceleration above which velocity saturates at 1.0 (spec §4.3).
    pub velocity_a_max: f64,
    pub diversity: DiversityConfig,
    pub diversity_caps: DiversityCaps,
    pub novelty_floor: f64,
    /// Minimum distinct offchain source tags before the cross-domain
    /// subtype-spread term saturates at 1.0 (spec §4.3: 3).
    pub offchain_subtype_cap: f64,
    /// Fraction-of-members-in-a-1h-window above which the burst detector
    /// starts penalizing (spec §4.3: 0.5).
    pub burst_threshold: f64,
    /// Share of members from one author above which author dominance
    /// starts penalizing (spec §4.3: 0.6).
    pub author_dominance_threshold: f64,
    /// Share of members from one source tag above which the single-source
    /// penalty kicks in (spec §4.3: 0.7).
    pub single_source_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            velocity_a_max: 10.0,
            diversity: DiversityConfig::default(),
            diversity_caps: DiversityCaps::default(),
            novelty_floor: 0.2,
            offchain_subtype_cap: 3.0,
            burst_threshold: 0.5,
            author_dominance_threshold: 0.6,
            single_source_threshold: 0.7,
        }
    }
}

/// Per-event credibility prior inputs (spec §4.3). Unlike clustering and
/// scoring weights, credibility isn't a flat per-`SourceTag` table: twitter,
/// rss_blog, and github priors each depend on event-level context (follower
/// count, an "official" list membership, URL host), so this config only
/// holds the thresholds and base values the scorer combines with that
/// per-event context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredibilityConfig {
    /// Flat prior for `tx_activity`, `program_deploy`, `token_activity`.
    pub onchain_prior: f64,
    pub twitter_follower_threshold: f64,
    pub twitter_high: f64,
    pub twitter_low: f64,
    /// URLs or hosts considered "official" blogs.
    pub official_blogs: Vec<String>,
    pub blog_official: f64,
    pub blog_other: f64,
    pub github_base: f64,
    /// Domains whose presence in a github event's URL host earns the bonus.
    pub github_allowlist: Vec<String>,
    pub github_allowlist_bonus: f64,
}

impl Default for CredibilityConfig {
    fn default() -> Self {
        Self {
            onchain_prior: 0.90,
            twitter_follower_threshold: 10_000.0,
            twitter_high: 0.85,
            twitter_low: 0.55,
            official_blogs: Vec::new(),
            blog_official: 0.75,
            blog_other: 0.60,
            github_base: 0.70,
            github_allowlist: Vec::new(),
            github_allowlist_bonus: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    pub bucket_minutes: i64,
    pub near_sim_threshold: f64,
    pub near_dup_window_hours: i64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            bucket_minutes: 5,
            near_sim_threshold: 0.85,
            near_dup_window_hours: 6,
        }
    }
}

/// Canonical entity name -> surface forms that should resolve to it
/// (spec §4.1). Matching is case-insensitive and word-boundary anchored;
/// this table only holds the mapping, not the matching logic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable(pub BTreeMap<String, Vec<String>>);

impl AliasTable {
    pub fn canonical_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub weights: Weights,
    pub penalties: Penalties,
    pub clustering: ClusteringConfig,
    pub scoring: ScoringConfig,
    pub credibility: CredibilityConfig,
    pub dedup: DedupConfig,
    pub aliases: AliasTable,
    /// Ratio of baseline window length to analysis window length (spec §3).
    pub baseline_ratio: f64,
}

impl PipelineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, PipelineError> {
        let cfg: Self =
            toml::from_str(s).map_err(|e| PipelineError::Config(format!("invalid TOML: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &std::path::Path) -> Result<Self, PipelineError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    /// Reject configuration that would make the composite score meaningless
    /// before a single event is processed (spec §7: config errors are fatal
    /// and reported before the run starts).
    pub fn validate(&self) -> Result<(), PipelineError> {
        let w = &self.weights;
        let weight_sum = w.velocity + w.breadth + w.cross + w.novelty + w.credibility;
        if (weight_sum - 1.0).abs() > 1e-6 {
            return Err(PipelineError::Config(format!(
                "feature weights must sum to 1.0, got {weight_sum}"
            )));
        }

        let d = &self.scoring.diversity;
        let diversity_sum = d.entities + d.sources + d.authors;
        if (diversity_sum - 1.0).abs() > 1e-6 {
            return Err(PipelineError::Config(format!(
                "breadth diversity weights must sum to 1.0, got {diversity_sum}"
            )));
        }

        for (name, v) in [
            ("clustering.edge_threshold", self.clustering.edge_threshold),
            (
                "clustering.text_distance_threshold",
                self.clustering.text_distance_threshold,
            ),
            ("dedup.near_sim_threshold", self.dedup.near_sim_threshold),
            ("scoring.novelty_floor", self.scoring.novelty_floor),
            ("scoring.burst_threshold", self.scoring.burst_threshold),
            (
                "scoring.author_dominance_threshold",
                self.scoring.author_dominance_threshold,
            ),
            (
                "scoring.single_source_threshold",
                self.scoring.single_source_threshold,
            ),
            ("credibility.onchain_prior", self.credibility.onchain_prior),
            ("credibility.blog_official", self.credibility.blog_official),
            ("credibility.blog_other", self.credibility.blog_other),
            ("credibility.github_base", self.credibility.github_base),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(PipelineError::Config(format!(
                    "{name} must be in [0, 1], got {v}"
                )));
            }
        }

        if self.scoring.velocity_a_max <= 0.0 {
            return Err(PipelineError::Config(
                "scoring.velocity_a_max must be positive".into(),
            ));
        }

        if self.scoring.offchain_subtype_cap <= 0.0 {
            return Err(PipelineError::Config(
                "scoring.offchain_subtype_cap must be positive".into(),
            ));
        }

        if self.baseline_ratio <= 0.0 {
            return Err(PipelineError::Config(
                "baseline_ratio must be positive".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        PipelineConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_weights_not_summing_to_one() {
        let mut cfg = PipelineConfig::default();
        cfg.weights.velocity = 0.9;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_diversity_weights_not_summing_to_one() {
        let mut cfg = PipelineConfig::default();
        cfg.scoring.diversity.entities = 0.9;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let mut cfg = PipelineConfig::default();
        cfg.clustering.edge_threshold = 1.5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_velocity_a_max() {
        let mut cfg = PipelineConfig::default();
        cfg.scoring.velocity_a_max = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn from_toml_str_round_trips_defaults() {
        let cfg = PipelineConfig::default();
        let s = toml::to_string(&cfg).unwrap();
        let parsed = PipelineConfig::from_toml_str(&s).unwrap();
        assert_eq!(cfg, parsed);
    }
}
