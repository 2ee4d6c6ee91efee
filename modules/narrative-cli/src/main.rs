//! Command-line entry point: load events and configuration from disk, run
//! the pipeline once, print the resulting `RunArtifact` as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use narrative_normalizer::raw::RawEvent;
use narrative_types::config::PipelineConfig;
use narrative_types::run::RunContext;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "narrative-cli")]
#[command(about = "Run the narrative detection pipeline over a batch of signal events")]
struct Cli {
    /// JSON file containing an array of raw signal events to analyze.
    #[arg(long)]
    events: PathBuf,

    /// JSON file containing an array of raw signal events forming the
    /// baseline window (for velocity and novelty). Optional — an empty
    /// baseline is valid input (spec §8: zero baseline -> velocity 1.0).
    #[arg(long)]
    baseline_events: Option<PathBuf>,

    /// TOML configuration file. Falls back to built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Analysis window start (RFC 3339).
    #[arg(long, value_parser = parse_rfc3339)]
    window_start: DateTime<Utc>,

    /// Analysis window end (RFC 3339).
    #[arg(long, value_parser = parse_rfc3339)]
    window_end: DateTime<Utc>,

    /// Baseline window length as a multiple of the analysis window.
    #[arg(long, default_value_t = 3.0)]
    baseline_ratio: f64,

    #[arg(long, default_value_t = false)]
    debug: bool,
}

fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 timestamp `{s}`: {e}"))
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let filter = if args.debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cfg = match &args.config {
        Some(path) => PipelineConfig::from_file(path).context("loading configuration")?,
        None => PipelineConfig::default(),
    };

    let raw_events = load_raw_events(&args.events)?;
    let baseline_raw = match &args.baseline_events {
        Some(path) => load_raw_events(path)?,
        None => Vec::new(),
    };

    let normalizer_cfg = narrative_normalizer::NormalizerConfig {
        aliases: &cfg.aliases,
        bucket_minutes: cfg.dedup.bucket_minutes,
        near_sim_threshold: cfg.dedup.near_sim_threshold,
        near_dup_window_hours: cfg.dedup.near_dup_window_hours,
    };
    let (baseline_events, _baseline_report) =
        narrative_normalizer::normalize(baseline_raw, &normalizer_cfg);

    let ctx = RunContext::new(
        (args.window_start, args.window_end),
        args.baseline_ratio,
        uuid::Uuid::new_v4(),
        Utc::now(),
    );

    info!(
        events = raw_events.len(),
        baseline_events = baseline_events.len(),
        "starting pipeline run"
    );

    let cancel = CancellationToken::new();
    let artifact = narrative_pipeline::run(raw_events, baseline_events, ctx, &cfg, &cancel)
        .context("running pipeline")?;

    println!("{}", serde_json::to_string_pretty(&artifact)?);
    Ok(())
}

fn load_raw_events(path: &PathBuf) -> Result<Vec<RawEvent>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}
