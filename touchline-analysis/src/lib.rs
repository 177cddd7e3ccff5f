//! Trajectory reconstruction and ball touch analysis for Touchline

pub mod config;
pub mod demo;
pub mod extract;
pub mod interpolate;
pub mod pipeline;
pub mod possession;
pub mod touches;

pub use config::{AnalysisConfig, DetectionConfig, InterpolationConfig};
pub use demo::DemoReplay;
pub use extract::MatchRecording;
pub use interpolate::Interpolator;
pub use pipeline::{analyze, MatchAnalysis};
pub use possession::{aggregate_possession, PlayerTouchRecord, PossessionReport, TeamTouchTotals};
pub use touches::ContactDetector;
