use thiserror::Error;

/// Fatal pipeline failures. Per-event recoverable issues never surface here —
/// they are aggregated into a stage's counters instead (spec §7).
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("internal inconsistency in stage `{stage}`: {detail}")]
    Internal { stage: &'static str, detail: String },

    #[error("run cancelled before stage `{stage}`")]
    Cancelled { stage: &'static str },
}
