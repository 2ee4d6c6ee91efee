//! The as-ingested event shape, before the "missing timestamp or text are
//! malformed" check from spec §4.1 has been applied. Connectors (out of
//! scope here) are expected to produce this; the normalizer's first job is
//! turning it into a well-formed `SignalEvent` or dropping it with a count.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use narrative_types::SourceTag;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub id: String,
    pub source: SourceTag,
    pub timestamp: Option<DateTime<Utc>>,
    pub title: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
    #[serde(default = "default_relevance")]
    pub relevance: f64,
}

fn default_relevance() -> f64 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_minimal_event() {
        let json = r#"{
            "id": "e1",
            "source": "github",
            "timestamp": "2024-01-01T00:00:00Z",
            "title": "Foo",
            "text": "Foo bar"
        }"#;
        let raw: RawEvent = serde_json::from_str(json).unwrap();
        assert_eq!(raw.relevance, 1.0);
        assert!(raw.url.is_none());
    }
}
