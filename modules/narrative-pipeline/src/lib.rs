//! The orchestrator (spec §4.5): applies Normalizer -> Clusterer -> Scorer
//! -> Explainer in sequence against a `RunContext`, pure with respect to
//! I/O — callers materialize the event vector and hand it in.

use std::collections::{BTreeSet, HashMap};

use narrative_common::PipelineError;
use narrative_normalizer::raw::RawEvent;
use narrative_normalizer::{NormalizeReport, NormalizerConfig};
use narrative_types::config::PipelineConfig;
use narrative_types::run::{RunArtifact, RunContext, SourceSummary, Totals};
use narrative_types::SignalEvent;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Run the full pipeline. `raw_events` and `baseline_events` are both
/// pre-materialized — connectors and storage are out of scope here
/// (spec §5: "the orchestrator receives a fully materialized event vector").
/// `baseline_events` have already been normalized by the caller the same
/// way as `raw_events`; they exist only to support velocity and novelty.
pub fn run(
    raw_events: Vec<RawEvent>,
    baseline_events: Vec<SignalEvent>,
    ctx: RunContext,
    cfg: &PipelineConfig,
    cancel: &CancellationToken,
) -> Result<RunArtifact, PipelineError> {
    cfg.validate()?;

    let ingested = raw_events.len();
    check_cancelled(cancel, "normalizer")?;

    let normalizer_cfg = NormalizerConfig {
        aliases: &cfg.aliases,
        bucket_minutes: cfg.dedup.bucket_minutes,
        near_sim_threshold: cfg.dedup.near_sim_threshold,
        near_dup_window_hours: cfg.dedup.near_dup_window_hours,
    };
    let (events, report) = narrative_normalizer::normalize(raw_events, &normalizer_cfg);
    let after_dedup = events.len();

    if events.is_empty() {
        info!("no events survived normalization, emitting empty run artifact");
        return Ok(empty_artifact(&ctx, &events, report, "zero events after dedup"));
    }

    check_cancelled(cancel, "clusterer")?;
    let clusterer_cfg = narrative_clusterer::ClustererConfig {
        min_entity_support: cfg.clustering.min_entity_support,
        edge_threshold: cfg.clustering.edge_threshold,
        text_distance_threshold: cfg.clustering.text_distance_threshold,
        min_text_support: cfg.clustering.min_text_support,
        min_cluster_size: cfg.clustering.min_cluster_size,
    };
    let candidates = narrative_clusterer::cluster(&events, &clusterer_cfg);
    let candidate_count = candidates.len();

    for candidate in &candidates {
        if candidate.members.is_empty() {
            return Err(PipelineError::Internal {
                stage: "clusterer",
                detail: format!("cluster `{}` has no members", candidate.label),
            });
        }
    }

    check_cancelled(cancel, "scorer")?;
    let events_by_id: HashMap<&str, &SignalEvent> =
        events.iter().map(|e| (e.id.as_str(), e)).collect();
    let scoring_ctx = narrative_scorer::ScoringContext {
        baseline_events: &baseline_events,
        window_days: ctx.window_days(),
        baseline_days: ctx.baseline_days(),
    };
    let scored = narrative_scorer::score_all(&candidates, &events_by_id, &scoring_ctx, cfg);
    let ranked = narrative_scorer::rank(scored);

    check_cancelled(cancel, "explainer")?;
    let explained: Vec<_> = ranked
        .into_iter()
        .map(|narrative| {
            let members: Vec<&SignalEvent> = narrative
                .members
                .iter()
                .filter_map(|id| events_by_id.get(id.as_str()).copied())
                .collect();
            narrative_explainer::explain(narrative, &members, &cfg.scoring.diversity_caps)
        })
        .collect();

    let source_summary = source_summary(&events);
    let totals = Totals {
        ingested,
        after_dedup,
        candidates: candidate_count,
        ranked: explained.len(),
    };

    Ok(RunArtifact {
        run_id: ctx.run_id,
        generated_at: ctx.generated_at,
        window: ctx.window,
        baseline: ctx.baseline,
        source_summary,
        totals,
        counters: report.into_counters(),
        narratives: explained,
        notes: None,
    })
}

fn check_cancelled(cancel: &CancellationToken, stage: &'static str) -> Result<(), PipelineError> {
    if cancel.is_cancelled() {
        Err(PipelineError::Cancelled { stage })
    } else {
        Ok(())
    }
}

fn source_summary(events: &[SignalEvent]) -> SourceSummary {
    let mut summary = SourceSummary::new();
    for event in events {
        *summary.entry(event.source).or_insert(0) += 1;
    }
    summary
}

fn empty_artifact(
    ctx: &RunContext,
    events: &[SignalEvent],
    report: NormalizeReport,
    note: &str,
) -> RunArtifact {
    RunArtifact {
        run_id: ctx.run_id,
        generated_at: ctx.generated_at,
        window: ctx.window,
        baseline: ctx.baseline,
        source_summary: source_summary(events),
        totals: Totals {
            ingested: 0,
            after_dedup: 0,
            candidates: 0,
            ranked: 0,
        },
        counters: report.into_counters(),
        narratives: Vec::new(),
        notes: Some(note.to_string()),
    }
}

/// Entities seen anywhere in the baseline window, used by the scorer's
/// novelty feature. Exposed so callers building `ScoringContext`-adjacent
/// data don't have to reimplement the traversal.
pub fn baseline_entity_set(baseline_events: &[SignalEvent]) -> BTreeSet<String> {
    baseline_events
        .iter()
        .flat_map(|e| e.entities.iter().cloned())
        .collect()
}
