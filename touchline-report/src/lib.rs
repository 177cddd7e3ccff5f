//! Touchline Report Library
//!
//! Loads recorded matches, runs the analysis and turns the result into
//! scoreboards and a serializable report. Exposed as a library for
//! integration testing; the `touchline` binary is a thin wrapper.

pub mod json_replay;
pub mod report;
pub mod scoreboard;

use anyhow::{Context, Result};
use std::path::Path;
use touchline_analysis::{analyze, AnalysisConfig, MatchRecording};
use touchline_core::ReplaySource;
use tracing::info;

pub use json_replay::{JsonReplay, RecordedMatch};
pub use report::MatchReport;
pub use scoreboard::{PlayerScoreboard, TeamScoreboard};

/// Loads an analysis config from a JSON file
pub fn load_config(path: &Path) -> Result<AnalysisConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    AnalysisConfig::from_json(&json)
        .with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// Extracts, analyzes and reports one match
pub fn run_report(source: &mut dyn ReplaySource, config: &AnalysisConfig) -> Result<MatchReport> {
    info!("Analyzing {}", source.name());

    let recording = MatchRecording::from_source(source)?;
    let analysis = analyze(&recording, config)
        .with_context(|| format!("Failed to analyze {}", recording.source_name))?;

    let report = MatchReport::new(&recording, &analysis);
    info!(
        "{}: {} touches, {} players",
        report.replay_name,
        report.touches.len(),
        report.players.len()
    );
    Ok(report)
}
