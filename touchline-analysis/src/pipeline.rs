//! End-to-end match analysis
//!
//! interpolate -> detect -> aggregate, in that order, over one recording.

use crate::config::AnalysisConfig;
use crate::extract::MatchRecording;
use crate::interpolate::Interpolator;
use crate::possession::{aggregate_possession, PossessionReport};
use crate::touches::ContactDetector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use touchline_core::{ActorId, AnalysisError, BallTouch, GameObjectState};
use tracing::info;

/// Output of [`analyze`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchAnalysis {
    /// Ball trajectory with one sample per frame
    pub ball: Vec<GameObjectState>,
    /// Vehicle trajectories with one sample per frame
    pub vehicles: BTreeMap<ActorId, Vec<GameObjectState>>,
    /// Touches in match order
    pub touches: Vec<BallTouch>,
    pub possession: PossessionReport,
}

/// Runs every analysis stage over `recording`
pub fn analyze(
    recording: &MatchRecording,
    config: &AnalysisConfig,
) -> Result<MatchAnalysis, AnalysisError> {
    let interpolator = Interpolator::with_config(recording.record_fps, &config.interpolation);

    let ball = interpolator.interpolate(&recording.ball)?;
    let vehicles = interpolator.interpolate_all(&recording.vehicles)?;
    info!(
        "Interpolated ball ({} samples) and {} vehicles",
        ball.len(),
        vehicles.len()
    );

    let detector = ContactDetector::new(config.detection.clone());
    let touches = detector.detect(&ball, &vehicles, recording.match_length);
    info!("Detected {} ball touches", touches.len());

    let possession = aggregate_possession(&touches, &recording.actor_players, &recording.roster);
    if possession.unattributed_touches > 0 {
        info!(
            "{} touches could not be attributed to a roster player",
            possession.unattributed_touches
        );
    }

    Ok(MatchAnalysis {
        ball,
        vehicles,
        touches,
        possession,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ball_trajectory_is_invalid() {
        let recording = MatchRecording::default();
        let result = analyze(&recording, &AnalysisConfig::default());
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }
}
