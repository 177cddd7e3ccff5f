//! Serializable match report

use crate::scoreboard::{build_scoreboards, PlayerScoreboard, TeamScoreboard};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use touchline_analysis::{MatchAnalysis, MatchRecording};
use touchline_core::units::Seconds;
use touchline_core::BallTouch;

/// Everything the `touchline` command reports about one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub generated_at: DateTime<Utc>,
    pub replay_name: String,
    /// Name of the source the match was read from
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_name: Option<String>,
    pub match_length: Seconds,
    pub record_fps: f32,
    pub touches: Vec<BallTouch>,
    pub players: Vec<PlayerScoreboard>,
    pub teams: Vec<TeamScoreboard>,
}

impl MatchReport {
    pub fn new(recording: &MatchRecording, analysis: &MatchAnalysis) -> Self {
        let (players, teams) = build_scoreboards(recording, &analysis.possession);
        Self {
            generated_at: Utc::now(),
            replay_name: recording.metadata.replay_name().to_string(),
            source: recording.source_name.clone(),
            map_name: recording.metadata.map_name().map(str::to_string),
            match_length: Seconds(recording.match_length),
            record_fps: recording.record_fps,
            touches: analysis.touches.clone(),
            players,
            teams,
        }
    }

    /// Writes the report as pretty JSON
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self).context("Failed to serialize match report")
    }

    /// Writes the report to `path`; the parent directory must exist
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create report: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        self.write_json(&mut writer)?;
        writer
            .flush()
            .with_context(|| format!("Failed to write report: {}", path.display()))
    }
}
