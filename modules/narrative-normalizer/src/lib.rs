//! Stage 1 of the pipeline (spec §4.1): turn raw, possibly malformed,
//! possibly duplicated events into a clean multiset of canonicalized
//! `SignalEvent`s.

pub mod alias;
pub mod dedup;
pub mod raw;

use std::collections::{BTreeMap, HashSet};

use chrono::Duration;
use narrative_types::config::AliasTable;
use narrative_types::run::Counters;
use narrative_types::{SignalEvent, SourceTag};
use raw::RawEvent;
use tracing::debug;

/// Recoverable-issue counters for a normalization pass, folded into the
/// run's `Counters` by the orchestrator (spec §7).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub malformed_dropped: u64,
    pub exact_duplicates_dropped: u64,
    pub near_duplicates_dropped: u64,
    pub unanchored: u64,
}

impl NormalizeReport {
    pub fn into_counters(self) -> Counters {
        Counters {
            malformed_dropped: self.malformed_dropped,
            exact_duplicates_dropped: self.exact_duplicates_dropped,
            near_duplicates_dropped: self.near_duplicates_dropped,
            unanchored: self.unanchored,
        }
    }
}

/// Configuration the normalizer needs, deliberately narrower than the full
/// `PipelineConfig` so this crate doesn't have to know about scoring or
/// clustering knobs.
pub struct NormalizerConfig<'a> {
    pub aliases: &'a AliasTable,
    pub bucket_minutes: i64,
    pub near_sim_threshold: f64,
    pub near_dup_window_hours: i64,
}

/// Validate, canonicalize, and deduplicate a batch of raw events. Order of
/// `raw` determines "first occurrence wins" for both dedup passes, so
/// callers should feed events already sorted by timestamp — the
/// orchestrator does this before invoking the stage.
pub fn normalize(raw: Vec<RawEvent>, cfg: &NormalizerConfig<'_>) -> (Vec<SignalEvent>, NormalizeReport) {
    let mut report = NormalizeReport::default();
    let mut events = Vec::with_capacity(raw.len());

    for r in raw {
        match validate(r) {
            Some(event) => events.push(event),
            None => report.malformed_dropped += 1,
        }
    }

    let events = resolve_all_entities(events, cfg.aliases, &mut report);
    let events = dedup_exact(events, cfg.bucket_minutes, &mut report);
    let events = dedup_near(events, cfg.near_sim_threshold, cfg.near_dup_window_hours, &mut report);

    debug!(
        malformed = report.malformed_dropped,
        exact_dups = report.exact_duplicates_dropped,
        near_dups = report.near_duplicates_dropped,
        unanchored = report.unanchored,
        retained = events.len(),
        "normalization complete"
    );

    (events, report)
}

/// A raw event with no timestamp or no text is malformed (spec §4.1) and is
/// dropped here rather than propagated as a `Result` error — per-event
/// failures are never fatal.
fn validate(r: RawEvent) -> Option<SignalEvent> {
    let timestamp = r.timestamp?;
    let text = r.text.filter(|t| !t.trim().is_empty())?;
    let title = r.title.unwrap_or_else(|| text.clone());

    let mut event = SignalEvent::new(r.id, r.source, timestamp, title, text, r.relevance);
    if let Some(url) = r.url {
        event = event.with_url(url);
    }
    if let Some(author) = r.author {
        event = event.with_author(author);
    }
    for (name, value) in r.metrics {
        event = event.with_metric(name, value);
    }
    Some(event)
}

fn resolve_all_entities(
    events: Vec<SignalEvent>,
    aliases: &AliasTable,
    report: &mut NormalizeReport,
) -> Vec<SignalEvent> {
    events
        .into_iter()
        .map(|event| {
            let haystack = format!("{} {}", event.title, event.text);
            let entities = alias::resolve_entities(&haystack, aliases);
            if entities.is_empty() {
                report.unanchored += 1;
            }
            event.with_canonical_entities(entities)
        })
        .collect()
}

fn dedup_exact(
    mut events: Vec<SignalEvent>,
    bucket_minutes: i64,
    report: &mut NormalizeReport,
) -> Vec<SignalEvent> {
    events.sort_by_key(|e| e.timestamp);
    let mut seen: HashSet<String> = HashSet::new();
    let mut retained = Vec::with_capacity(events.len());
    for event in events {
        let key = dedup::exact_key(&event, bucket_minutes);
        if seen.insert(key) {
            retained.push(event);
        } else {
            report.exact_duplicates_dropped += 1;
        }
    }
    retained
}

/// Sliding 6-hour (configurable) per-source bucket of retained titles
/// (spec §4.1). Events older than the window fall out of comparison as the
/// sorted-by-timestamp scan advances.
fn dedup_near(
    events: Vec<SignalEvent>,
    threshold: f64,
    window_hours: i64,
    report: &mut NormalizeReport,
) -> Vec<SignalEvent> {
    let window = Duration::hours(window_hours);
    let mut buckets: BTreeMap<SourceTag, Vec<(chrono::DateTime<chrono::Utc>, String)>> =
        BTreeMap::new();
    let mut retained = Vec::with_capacity(events.len());

    for event in events {
        let bucket = buckets.entry(event.source).or_default();
        bucket.retain(|(ts, _)| event.timestamp - *ts <= window);

        let titles: Vec<String> = bucket.iter().map(|(_, t)| t.clone()).collect();
        if dedup::is_near_duplicate(&event.title, &titles, threshold) {
            report.near_duplicates_dropped += 1;
            continue;
        }

        bucket.push((event.timestamp, event.title.clone()));
        retained.push(event);
    }

    retained
}
