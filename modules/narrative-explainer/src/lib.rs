//! Stage 4 of the pipeline (spec §4.4): enrich ranked narratives with
//! evidence, prose, and a confidence tier — never touching `score`.

pub mod confidence;
pub mod evidence;
pub mod why_now;

use std::collections::HashSet;

use narrative_types::config::DiversityCaps;
use narrative_types::{Domain, RankedNarrative, SignalEvent, SourceTag};
use tracing::debug;

/// Fill in `evidence`, `why_now`, and `confidence` for one already-scored
/// narrative. `members` must be the same event set the scorer used.
pub fn explain(mut narrative: RankedNarrative, members: &[&SignalEvent], caps: &DiversityCaps) -> RankedNarrative {
    narrative.evidence = evidence::select_evidence(members);

    let n_on = members.iter().filter(|e| e.domain == Domain::Onchain).count();
    let n_off = members.len() - n_on;
    let distinct_authors: HashSet<&str> = members.iter().filter_map(|e| e.author.as_deref()).collect();
    let author_diversity = (distinct_authors.len() as f64 / caps.authors).min(1.0);
    let most_recent = members.iter().max_by_key(|e| e.timestamp).copied();

    narrative.why_now = why_now::compose(&why_now::WhyNowInputs {
        features: &narrative.features,
        n_on,
        n_off,
        author_diversity,
        most_recent,
    });

    let distinct_source_tags: HashSet<SourceTag> = members.iter().map(|e| e.source).collect();
    narrative.confidence = confidence::score(
        &confidence::ConfidenceInputs {
            member_count: members.len(),
            both_domains_present: n_on > 0 && n_off > 0,
            distinct_source_tags: distinct_source_tags.len(),
        },
        &narrative.features,
    );

    debug!(
        label = %narrative.label,
        confidence = narrative.confidence.value,
        evidence_count = narrative.evidence.len(),
        "narrative explained"
    );

    narrative
}
