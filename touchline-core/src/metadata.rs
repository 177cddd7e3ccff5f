//! Typed match metadata
//!
//! Replay headers carry a handful of loosely typed properties (scores,
//! names, frame rate). They are kept in a map keyed by a closed set of known
//! keys, with typed accessors and the defaults the game itself uses.

use crate::error::AnalysisError;
use crate::model::{PlayerInfo, Team};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Recording rate used when the replay does not state one
pub const DEFAULT_RECORD_FPS: f32 = 30.0;

/// Replay name used when the player never named the replay
pub const UNNAMED_REPLAY: &str = "Unnamed";

/// Known replay header properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MetadataKey {
    ReplayName,
    Team0Score,
    Team1Score,
    #[serde(rename = "RecordFPS")]
    RecordFps,
    TotalSecondsPlayed,
    MapName,
    Date,
    PlayerStats,
}

/// Tagged metadata value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum MetadataValue {
    Int(i64),
    Float(f32),
    Str(String),
    Object(serde_json::Value),
}

impl MetadataValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetadataValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            MetadataValue::Float(v) => Some(*v),
            MetadataValue::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&serde_json::Value> {
        match self {
            MetadataValue::Object(v) => Some(v),
            _ => None,
        }
    }
}

/// Replay header properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchMetadata {
    values: BTreeMap<MetadataKey, MetadataValue>,
}

impl MatchMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: MetadataKey, value: MetadataValue) -> Option<MetadataValue> {
        self.values.insert(key, value)
    }

    /// Builder-style insert
    pub fn with(mut self, key: MetadataKey, value: MetadataValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: MetadataKey) -> Option<&MetadataValue> {
        self.values.get(&key)
    }

    pub fn contains(&self, key: MetadataKey) -> bool {
        self.values.contains_key(&key)
    }

    /// Name the replay was saved under
    pub fn replay_name(&self) -> &str {
        self.get(MetadataKey::ReplayName)
            .and_then(MetadataValue::as_str)
            .unwrap_or(UNNAMED_REPLAY)
    }

    /// Goals scored by `team` at the end of the replay
    pub fn team_score(&self, team: Team) -> i64 {
        let key = match team {
            Team::Blue => MetadataKey::Team0Score,
            Team::Orange => MetadataKey::Team1Score,
        };
        self.get(key).and_then(MetadataValue::as_i64).unwrap_or(0)
    }

    /// Samples per second the replay was recorded at
    pub fn record_fps(&self) -> f32 {
        self.get(MetadataKey::RecordFps)
            .and_then(MetadataValue::as_f32)
            .filter(|fps| fps.is_finite() && *fps > 0.0)
            .unwrap_or(DEFAULT_RECORD_FPS)
    }

    /// Match duration in seconds, if the header records it
    pub fn total_seconds_played(&self) -> Option<f32> {
        self.get(MetadataKey::TotalSecondsPlayed)
            .and_then(MetadataValue::as_f32)
    }

    pub fn map_name(&self) -> Option<&str> {
        self.get(MetadataKey::MapName).and_then(MetadataValue::as_str)
    }

    /// Player roster decoded from the `PlayerStats` object
    ///
    /// A replay without player stats has an empty roster.
    pub fn roster(&self) -> Result<Vec<PlayerInfo>, AnalysisError> {
        let Some(value) = self.get(MetadataKey::PlayerStats) else {
            return Ok(Vec::new());
        };

        let object = value.as_object().ok_or_else(|| {
            AnalysisError::InvalidMetadata("PlayerStats is not an object".to_string())
        })?;

        serde_json::from_value(object.clone())
            .map_err(|e| AnalysisError::InvalidMetadata(format!("PlayerStats: {}", e)))
    }
}
