//! Evidence selection (spec §4.4): up to 8 members, round-robin across
//! source tags in canonical order so one noisy channel can't crowd out the
//! rest, highest relevance first within each tag.

use narrative_types::{SignalEvent, SourceTag};

const MAX_EVIDENCE: usize = 8;

pub fn select_evidence(members: &[&SignalEvent]) -> Vec<String> {
    let mut by_tag: std::collections::BTreeMap<SourceTag, Vec<&SignalEvent>> =
        std::collections::BTreeMap::new();
    for member in members {
        by_tag.entry(member.source).or_default().push(member);
    }
    for bucket in by_tag.values_mut() {
        bucket.sort_by(|a, b| {
            b.relevance
                .partial_cmp(&a.relevance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    let mut cursors: std::collections::BTreeMap<SourceTag, usize> = std::collections::BTreeMap::new();
    let mut selected = Vec::with_capacity(MAX_EVIDENCE);

    'outer: loop {
        let mut progressed = false;
        for tag in SourceTag::ALL {
            if selected.len() >= MAX_EVIDENCE {
                break 'outer;
            }
            let Some(bucket) = by_tag.get(&tag) else {
                continue;
            };
            let cursor = cursors.entry(tag).or_insert(0);
            if let Some(event) = bucket.get(*cursor) {
                selected.push(event.id.clone());
                *cursor += 1;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }

    selected
}
