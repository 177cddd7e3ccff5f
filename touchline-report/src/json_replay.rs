//! Replay source for matches recorded as JSON
//!
//! A recording file holds the replay header and every frame:
//!
//! ```json
//! {
//!   "name": "kickoff drill",
//!   "metadata": {"RecordFPS": {"type": "float", "value": 30.0}},
//!   "frames": [{"time": 0.0, "updates": []}]
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use touchline_core::{MatchMetadata, ReplayFrame, ReplaySource};

/// On-disk recording layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub metadata: MatchMetadata,
    pub frames: Vec<ReplayFrame>,
}

impl RecordedMatch {
    /// Drains `source` into memory
    pub fn capture(source: &mut dyn ReplaySource) -> Result<Self> {
        let mut frames = Vec::new();
        while let Some(frame) = source
            .next_frame()
            .with_context(|| format!("Failed to read frame {} of {}", frames.len(), source.name()))?
        {
            frames.push(frame);
        }

        Ok(RecordedMatch {
            name: Some(source.name().to_string()),
            metadata: source.metadata().clone(),
            frames,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create recording: {}", path.display()))?;
        serde_json::to_writer(BufWriter::new(file), self)
            .with_context(|| format!("Failed to write recording: {}", path.display()))
    }
}

/// [`ReplaySource`] over a recording loaded from disk
pub struct JsonReplay {
    name: String,
    metadata: MatchMetadata,
    frames: std::vec::IntoIter<ReplayFrame>,
    total_frames: usize,
}

impl JsonReplay {
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open recording: {}", path.display()))?;
        let recorded: RecordedMatch = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse recording: {}", path.display()))?;

        // Unnamed recordings are named after the file
        let fallback = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::from_recorded(recorded, fallback))
    }

    pub fn from_recorded(recorded: RecordedMatch, fallback_name: impl Into<String>) -> Self {
        let total_frames = recorded.frames.len();
        Self {
            name: recorded.name.unwrap_or_else(|| fallback_name.into()),
            metadata: recorded.metadata,
            frames: recorded.frames.into_iter(),
            total_frames,
        }
    }

    pub fn total_frames(&self) -> usize {
        self.total_frames
    }
}

impl ReplaySource for JsonReplay {
    fn name(&self) -> &str {
        &self.name
    }

    fn metadata(&self) -> &MatchMetadata {
        &self.metadata
    }

    fn next_frame(&mut self) -> Result<Option<ReplayFrame>> {
        Ok(self.frames.next())
    }
}
