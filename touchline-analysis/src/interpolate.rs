//! Frame interpolation of sparsely recorded trajectories
//!
//! Replays only record an actor when its replicated state changes, so a
//! trajectory has frame gaps. The interpolator fills every gap by
//! extrapolating the sample before it: constant linear and angular
//! velocity, except for objects slower than the rest speed, which are held
//! in place.

use crate::config::InterpolationConfig;
use rayon::prelude::*;
use std::collections::BTreeMap;
use touchline_core::{ActorId, AnalysisError, GameObjectState};
use tracing::debug;

/// Fills frame gaps in per-object trajectories
#[derive(Debug, Clone)]
pub struct Interpolator {
    record_fps: f32,
    rest_speed_kmh: f32,
}

impl Interpolator {
    /// Interpolator for a replay recorded at `record_fps` samples per second
    pub fn new(record_fps: f32) -> Self {
        Self::with_config(record_fps, &InterpolationConfig::default())
    }

    pub fn with_config(record_fps: f32, config: &InterpolationConfig) -> Self {
        Self {
            record_fps,
            rest_speed_kmh: config.rest_speed_kmh,
        }
    }

    pub fn record_fps(&self) -> f32 {
        self.record_fps
    }

    /// Synthesizes the state `index` frames after `previous`
    pub fn extrapolate(&self, previous: &GameObjectState, index: u32) -> GameObjectState {
        let time_delta = index as f32 / self.record_fps;
        let source = previous.rigid_body;

        let rigid_body = if source.speed_kmh().0 < self.rest_speed_kmh {
            source.at_rest()
        } else {
            let mut body = source;
            body.position = source.position + source.linear_velocity * time_delta;
            body.rotation = source
                .rotation
                .rotated_by_angular_velocity(source.angular_velocity, time_delta);
            body
        };

        GameObjectState::new(
            rigid_body,
            previous.frame_number + index,
            previous.time + time_delta,
            previous.actor_id,
        )
    }

    /// Returns a trajectory with one sample per frame from the first recorded
    /// frame to the last. Recorded samples are kept as they are.
    pub fn interpolate(
        &self,
        states: &[GameObjectState],
    ) -> Result<Vec<GameObjectState>, AnalysisError> {
        if !(self.record_fps.is_finite() && self.record_fps > 0.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "recording rate must be positive, got {}",
                self.record_fps
            )));
        }

        let (first, last) = match (states.first(), states.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(AnalysisError::InvalidInput(
                    "cannot interpolate an empty trajectory".to_string(),
                ))
            }
        };

        if let Some(pair) = states
            .windows(2)
            .find(|pair| pair[1].frame_number <= pair[0].frame_number)
        {
            return Err(AnalysisError::InvalidInput(format!(
                "frame numbers of {} are not increasing ({} then {})",
                pair[0].actor_id, pair[0].frame_number, pair[1].frame_number
            )));
        }

        let capacity = (last.frame_number - first.frame_number) as usize + 1;
        let mut dense = Vec::with_capacity(capacity);

        for pair in states.windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            dense.push(current.clone());

            let frame_delta = next.frame_number - current.frame_number;
            for index in 1..frame_delta {
                dense.push(self.extrapolate(current, index));
            }
        }
        dense.push(last.clone());

        debug!(
            "Interpolated {}: {} recorded -> {} samples",
            first.actor_id,
            states.len(),
            dense.len()
        );

        Ok(dense)
    }

    /// Interpolates every vehicle trajectory independently, in parallel
    pub fn interpolate_all(
        &self,
        trajectories: &BTreeMap<ActorId, Vec<GameObjectState>>,
    ) -> Result<BTreeMap<ActorId, Vec<GameObjectState>>, AnalysisError> {
        trajectories
            .par_iter()
            .map(|(actor_id, states)| self.interpolate(states).map(|dense| (*actor_id, dense)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use touchline_core::model::{Quaternion, RigidBodyState, Vector3};

    fn sample(frame: u32, position: Vector3, velocity: Option<Vector3>) -> GameObjectState {
        GameObjectState::new(
            RigidBodyState::new(position, Quaternion::IDENTITY, velocity, None),
            frame,
            frame as f32 / 30.0,
            ActorId(1),
        )
    }

    #[test]
    fn test_empty_trajectory_is_invalid() {
        let result = Interpolator::new(30.0).interpolate(&[]);
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn test_bad_record_rate_is_invalid() {
        let states = vec![sample(0, Vector3::ZERO, None)];
        assert!(Interpolator::new(0.0).interpolate(&states).is_err());
        assert!(Interpolator::new(f32::NAN).interpolate(&states).is_err());
    }

    #[test]
    fn test_unordered_frames_are_invalid() {
        let states = vec![sample(5, Vector3::ZERO, None), sample(5, Vector3::ZERO, None)];
        assert!(Interpolator::new(30.0).interpolate(&states).is_err());
    }

    #[test]
    fn test_single_sample_is_unchanged() {
        let states = vec![sample(12, Vector3::new(1.0, 2.0, 3.0), None)];
        let dense = Interpolator::new(30.0).interpolate(&states).unwrap();
        assert_eq!(dense, states);
    }

    #[test]
    fn test_contiguous_input_is_unchanged() {
        let states: Vec<_> = (3..8)
            .map(|f| sample(f, Vector3::new(f as f32, 0.0, 0.0), Some(Vector3::new(500.0, 0.0, 0.0))))
            .collect();
        let dense = Interpolator::new(30.0).interpolate(&states).unwrap();
        assert_eq!(dense, states);
    }

    #[test]
    fn test_fills_every_frame_and_keeps_recorded_samples() {
        let velocity = Some(Vector3::new(900.0, -300.0, 0.0));
        let states = vec![
            sample(10, Vector3::ZERO, velocity),
            sample(14, Vector3::new(120.0, -40.0, 0.0), velocity),
            sample(15, Vector3::new(150.0, -50.0, 0.0), velocity),
            sample(21, Vector3::new(330.0, -110.0, 0.0), velocity),
        ];
        let dense = Interpolator::new(30.0).interpolate(&states).unwrap();

        assert_eq!(dense.len(), 12);
        for (offset, state) in dense.iter().enumerate() {
            assert_eq!(state.frame_number, 10 + offset as u32);
            assert_eq!(state.actor_id, ActorId(1));
        }
        assert_eq!(dense.first(), states.first());
        assert_eq!(dense.last(), states.last());
        assert_eq!(dense[4], states[1]);
        assert_eq!(dense[5], states[2]);
    }

    #[test]
    fn test_constant_velocity_motion() {
        let velocity = Vector3::new(1200.0, 0.0, -300.0);
        let start = Vector3::new(100.0, 200.0, 300.0);
        let states = vec![
            sample(0, start, Some(velocity)),
            sample(6, Vector3::new(9999.0, 0.0, 0.0), None),
        ];
        let dense = Interpolator::new(30.0).interpolate(&states).unwrap();

        for j in 1..6u32 {
            let dt = j as f32 / 30.0;
            let state = &dense[j as usize];
            let expected = start + velocity * dt;
            assert_abs_diff_eq!(state.rigid_body.position.x, expected.x, epsilon = 1e-3);
            assert_abs_diff_eq!(state.rigid_body.position.y, expected.y, epsilon = 1e-3);
            assert_abs_diff_eq!(state.rigid_body.position.z, expected.z, epsilon = 1e-3);
            assert_abs_diff_eq!(state.time, dt, epsilon = 1e-6);
            assert_eq!(state.rigid_body.linear_velocity, velocity);
            assert_eq!(state.rigid_body.rotation, Quaternion::IDENTITY);
        }
    }

    #[test]
    fn test_uses_match_record_rate() {
        let states = vec![
            sample(0, Vector3::ZERO, Some(Vector3::new(600.0, 0.0, 0.0))),
            sample(2, Vector3::ZERO, None),
        ];
        let dense = Interpolator::new(60.0).interpolate(&states).unwrap();
        assert_abs_diff_eq!(dense[1].time, 1.0 / 60.0, epsilon = 1e-6);
        assert_abs_diff_eq!(dense[1].rigid_body.position.x, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_rest_clamp_holds_pose() {
        // 10 units/s is 0.36 km/h, under the 0.6 km/h rest speed
        let rotation = Quaternion::new(0.0, 0.0, 0.3826834, 0.9238795);
        let body = RigidBodyState::new(
            Vector3::new(50.0, 60.0, 17.0),
            rotation,
            Some(Vector3::new(10.0, 0.0, 0.0)),
            Some(Vector3::new(0.0, 0.0, 2.0)),
        );
        let states = vec![
            GameObjectState::new(body, 0, 0.0, ActorId(4)),
            GameObjectState::new(body, 5, 5.0 / 30.0, ActorId(4)),
        ];
        let dense = Interpolator::new(30.0).interpolate(&states).unwrap();

        for state in &dense[1..5] {
            assert_eq!(state.rigid_body.position, body.position);
            assert_eq!(state.rigid_body.rotation, rotation);
            assert_eq!(state.rigid_body.linear_velocity, Vector3::ZERO);
            assert_eq!(state.rigid_body.angular_velocity, Vector3::ZERO);
            assert!(state.rigid_body.sleeping);
        }
    }

    #[test]
    fn test_missing_velocity_holds_pose() {
        let states = vec![
            sample(0, Vector3::new(1.0, 1.0, 1.0), None),
            sample(3, Vector3::new(5.0, 5.0, 5.0), None),
        ];
        let dense = Interpolator::new(30.0).interpolate(&states).unwrap();
        assert_eq!(dense[1].rigid_body.position, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(dense[2].rigid_body.position, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_spinning_object_rotates() {
        let body = RigidBodyState::new(
            Vector3::ZERO,
            Quaternion::IDENTITY,
            Some(Vector3::new(1000.0, 0.0, 0.0)),
            Some(Vector3::new(0.0, 0.0, 3.0)),
        );
        let states = vec![
            GameObjectState::new(body, 0, 0.0, ActorId(2)),
            GameObjectState::new(body, 2, 2.0 / 30.0, ActorId(2)),
        ];
        let dense = Interpolator::new(30.0).interpolate(&states).unwrap();

        let expected = Quaternion::IDENTITY.rotated_by_angular_velocity(Vector3::new(0.0, 0.0, 3.0), 1.0 / 30.0);
        assert_eq!(dense[1].rigid_body.rotation, expected);
        assert!(dense[1].rigid_body.rotation.z > 0.0);
    }

    #[test]
    fn test_rest_speed_is_configurable() {
        let config = InterpolationConfig { rest_speed_kmh: 100.0 };
        let states = vec![
            sample(0, Vector3::ZERO, Some(Vector3::new(1000.0, 0.0, 0.0))),
            sample(2, Vector3::ZERO, None),
        ];
        let dense = Interpolator::with_config(30.0, &config).interpolate(&states).unwrap();
        assert_eq!(dense[1].rigid_body.position, Vector3::ZERO);
    }

    #[test]
    fn test_interpolate_all_vehicles() {
        let mut trajectories = BTreeMap::new();
        trajectories.insert(ActorId(1), vec![sample(0, Vector3::ZERO, None), sample(4, Vector3::ZERO, None)]);
        trajectories.insert(ActorId(2), vec![sample(2, Vector3::ZERO, None)]);

        let dense = Interpolator::new(30.0).interpolate_all(&trajectories).unwrap();
        assert_eq!(dense[&ActorId(1)].len(), 5);
        assert_eq!(dense[&ActorId(2)].len(), 1);
    }

    #[test]
    fn test_interpolate_all_surfaces_empty_trajectory() {
        let mut trajectories = BTreeMap::new();
        trajectories.insert(ActorId(9), Vec::new());
        assert!(Interpolator::new(30.0).interpolate_all(&trajectories).is_err());
    }
}
