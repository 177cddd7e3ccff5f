//! Tunable thresholds for interpolation and touch detection

use serde::{Deserialize, Serialize};

/// Speed below which an object is treated as resting (km/h)
pub const REST_SPEED_KMH: f32 = 0.6;

/// Maximum car to ball distance for a touch (meters)
pub const PROXIMITY_THRESHOLD_M: f32 = 2.5;

/// Minimum ball speed change for a touch (km/h between samples)
pub const ACCELERATION_THRESHOLD_KMH: f32 = 1.0;

/// Frames searched on each side of a ball sample for car states
pub const WINDOW_RADIUS: u32 = 2;

/// Ball samples inspected for a speed change, starting at the candidate
pub const ACCELERATION_FRAMES: usize = 4;

/// All analysis settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub interpolation: InterpolationConfig,
    pub detection: DetectionConfig,
}

impl AnalysisConfig {
    /// Parse a JSON config; missing fields keep their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Frame interpolation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolationConfig {
    pub rest_speed_kmh: f32,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            rest_speed_kmh: REST_SPEED_KMH,
        }
    }
}

/// Contact detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// A touch needs a car strictly closer than this (meters)
    pub proximity_threshold_m: f32,

    /// A touch needs a ball speed change strictly above this (km/h)
    pub acceleration_threshold_kmh: f32,

    pub window_radius: u32,

    pub acceleration_frames: usize,

    /// Candidates whose peak speed change differs from the previous one by at
    /// most this much are the same contact. Zero means exact equality.
    pub dedup_tolerance: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            proximity_threshold_m: PROXIMITY_THRESHOLD_M,
            acceleration_threshold_kmh: ACCELERATION_THRESHOLD_KMH,
            window_radius: WINDOW_RADIUS,
            acceleration_frames: ACCELERATION_FRAMES,
            dedup_tolerance: 0.0,
        }
    }
}
