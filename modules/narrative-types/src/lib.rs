pub mod config;
pub mod event;
pub mod narrative;
pub mod run;

pub use config::PipelineConfig;
pub use event::{Domain, SignalEvent, SourceTag};
pub use narrative::{
    Confidence, ConfidenceTier, Features, Narrative, RankedNarrative, ScoreBreakdown,
};
pub use run::{Counters, RunArtifact, RunContext, SourceSummary, Totals};
