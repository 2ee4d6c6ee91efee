//! The `SignalEvent` data model (spec §3). Events are immutable after
//! normalization: every field here is set once at construction; stages that
//! need to attach derived information (canonical entities, unanchored flag)
//! return a fresh `SignalEvent`, they never mutate one in place.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of signal producers (spec §3). New source kinds require a
/// code change here, not configuration — the set is closed by design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    TxActivity,
    ProgramDeploy,
    TokenActivity,
    Github,
    Twitter,
    RssBlog,
}

impl SourceTag {
    /// All source tags in the canonical order used for evidence round-robin
    /// selection (spec §4.4) and for the configured source-credibility table.
    pub const ALL: [SourceTag; 6] = [
        SourceTag::TxActivity,
        SourceTag::ProgramDeploy,
        SourceTag::TokenActivity,
        SourceTag::Github,
        SourceTag::Twitter,
        SourceTag::RssBlog,
    ];

    /// `domain` is a pure function of `source` (spec §3 invariant).
    pub fn domain(self) -> Domain {
        match self {
            SourceTag::TxActivity | SourceTag::ProgramDeploy | SourceTag::TokenActivity => {
                Domain::Onchain
            }
            SourceTag::Github | SourceTag::Twitter | SourceTag::RssBlog => Domain::Offchain,
        }
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SourceTag::TxActivity => "tx_activity",
            SourceTag::ProgramDeploy => "program_deploy",
            SourceTag::TokenActivity => "token_activity",
            SourceTag::Github => "github",
            SourceTag::Twitter => "twitter",
            SourceTag::RssBlog => "rss_blog",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for SourceTag {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tx_activity" => Ok(Self::TxActivity),
            "program_deploy" => Ok(Self::ProgramDeploy),
            "token_activity" => Ok(Self::TokenActivity),
            "github" => Ok(Self::Github),
            "twitter" => Ok(Self::Twitter),
            "rss_blog" => Ok(Self::RssBlog),
            other => Err(format!("unknown SourceTag: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Onchain,
    Offchain,
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Domain::Onchain => write!(f, "onchain"),
            Domain::Offchain => write!(f, "offchain"),
        }
    }
}

/// One observed signal (spec §3). `entities` is only populated with
/// canonical names once the normalizer has run; before that it is empty and
/// `unanchored` is `false` by convention (the normalizer is the only stage
/// authorized to flip it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub id: String,
    pub source: SourceTag,
    pub domain: Domain,
    pub timestamp: DateTime<Utc>,
    pub title: String,
    pub text: String,
    pub url: Option<String>,
    pub author: Option<String>,
    pub entities: BTreeSet<String>,
    pub metrics: BTreeMap<String, f64>,
    pub relevance: f64,
    /// Set by the normalizer: true when no alias matched this event's text.
    pub unanchored: bool,
}

impl SignalEvent {
    /// Construct a raw (pre-normalization) event. `domain` is derived from
    /// `source`, never passed separately, so the invariant in spec §3 can't
    /// be violated by a caller.
    pub fn new(
        id: impl Into<String>,
        source: SourceTag,
        timestamp: DateTime<Utc>,
        title: impl Into<String>,
        text: impl Into<String>,
        relevance: f64,
    ) -> Self {
        Self {
            id: id.into(),
            source,
            domain: source.domain(),
            timestamp,
            title: title.into(),
            text: text.into(),
            url: None,
            author: None,
            entities: BTreeSet::new(),
            metrics: BTreeMap::new(),
            relevance: relevance.clamp(0.0, 1.0),
            unanchored: false,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    /// Return a copy with canonical entities and the unanchored flag set.
    /// The only way normalized identity is attached to an event — consumers
    /// never mutate `entities` directly.
    pub fn with_canonical_entities(mut self, entities: BTreeSet<String>) -> Self {
        self.unanchored = entities.is_empty();
        self.entities = entities;
        self
    }
}
