//! Ball touch detection
//!
//! A touch is a ball sample where some vehicle is close to the ball and the
//! ball's speed changes sharply within the next few samples. A single
//! physical contact trips the heuristic on several consecutive samples, all
//! sharing the same peak speed change; those are folded into one touch,
//! keeping the sample where the vehicle was closest.

use crate::config::DetectionConfig;
use std::collections::{BTreeMap, HashMap};
use touchline_core::units::{KilometersPerHour, Meters, Seconds};
use touchline_core::{ActorId, AnalysisError, BallTouch, GameObjectState};
use tracing::{debug, trace};

/// Scans a dense ball trajectory for vehicle contacts
#[derive(Debug, Clone, Default)]
pub struct ContactDetector {
    config: DetectionConfig,
}

impl ContactDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Detects touches in ball-sample order and assigns each its possession
    /// time. Both trajectories are expected to be dense.
    pub fn detect(
        &self,
        ball: &[GameObjectState],
        vehicles: &BTreeMap<ActorId, Vec<GameObjectState>>,
        match_length: f32,
    ) -> Vec<BallTouch> {
        if ball.len() < 2 {
            return Vec::new();
        }

        let pool = VehiclePool::new(vehicles, self.config.window_radius);
        let mut touches: Vec<BallTouch> = Vec::new();
        let mut last_max_acceleration = KilometersPerHour(0.0);
        let mut skipped = 0usize;

        for (index, ball_state) in ball.iter().enumerate() {
            let (distance, closest_car) = match pool.closest_car(ball_state) {
                Ok(closest) => closest,
                Err(e) => {
                    trace!("Skipping ball sample: {}", e);
                    skipped += 1;
                    continue;
                }
            };

            if distance.0 >= self.config.proximity_threshold_m {
                continue;
            }

            let acceleration = max_acceleration(ball, index, self.config.acceleration_frames);
            if acceleration.0 <= self.config.acceleration_threshold_kmh {
                continue;
            }

            let candidate = BallTouch {
                frame_number: ball_state.frame_number,
                time: ball_state.time,
                actor_id: closest_car.actor_id,
                ball_rigid_body: ball_state.rigid_body,
                distance,
                time_until_next_touch: Seconds(0.0),
            };

            let same_contact =
                (acceleration.0 - last_max_acceleration.0).abs() <= self.config.dedup_tolerance;
            last_max_acceleration = acceleration;

            match touches.last_mut() {
                Some(previous) if same_contact => {
                    if candidate.distance <= previous.distance {
                        trace!(
                            "Frame {} replaces touch at frame {} ({} closer)",
                            candidate.frame_number,
                            previous.frame_number,
                            closest_car.actor_id
                        );
                        *previous = candidate;
                    }
                }
                _ => touches.push(candidate),
            }
        }

        assign_possession_times(&mut touches, match_length);

        debug!(
            "Detected {} touches over {} ball samples ({} without nearby vehicles)",
            touches.len(),
            ball.len(),
            skipped
        );

        touches
    }
}

/// Vehicle samples indexed by frame, in actor order within a frame
struct VehiclePool<'a> {
    by_frame: HashMap<u32, Vec<&'a GameObjectState>>,
    radius: u32,
}

impl<'a> VehiclePool<'a> {
    fn new(vehicles: &'a BTreeMap<ActorId, Vec<GameObjectState>>, radius: u32) -> Self {
        let mut by_frame: HashMap<u32, Vec<&GameObjectState>> = HashMap::new();
        for state in vehicles.values().flatten() {
            by_frame.entry(state.frame_number).or_default().push(state);
        }
        Self { by_frame, radius }
    }

    /// Vehicle samples within the window around `frame`
    fn around(&self, frame: u32) -> impl Iterator<Item = &'a GameObjectState> + '_ {
        let first = frame.saturating_sub(self.radius);
        let last = frame.saturating_add(self.radius);
        (first..=last)
            .filter_map(move |f| self.by_frame.get(&f))
            .flat_map(|states| states.iter().copied())
    }

    /// Nearest vehicle sample to the ball; ties keep the first in pool order
    fn closest_car(
        &self,
        ball: &GameObjectState,
    ) -> Result<(Meters, &'a GameObjectState), AnalysisError> {
        let mut closest: Option<(Meters, &GameObjectState)> = None;
        for car in self.around(ball.frame_number) {
            let distance =
                Meters::from_units(car.rigid_body.position.distance(&ball.rigid_body.position));
            match closest {
                Some((best, _)) if distance >= best => {}
                _ => closest = Some((distance, car)),
            }
        }
        closest.ok_or(AnalysisError::NoCandidates {
            frame: ball.frame_number,
        })
    }
}

/// Largest absolute speed change between consecutive ball samples among the
/// `frames` samples starting at `index`. Zero with fewer than two samples.
pub fn max_acceleration(ball: &[GameObjectState], index: usize, frames: usize) -> KilometersPerHour {
    let end = index.saturating_add(frames).min(ball.len());
    let window = ball.get(index..end).unwrap_or_default();

    let peak = window
        .windows(2)
        .map(|pair| (pair[1].rigid_body.speed_kmh().0 - pair[0].rigid_body.speed_kmh().0).abs())
        .fold(0.0_f32, f32::max);

    KilometersPerHour(peak)
}

/// Credits each touch with the time until the next one; the final touch is
/// credited with the rest of the match.
pub fn assign_possession_times(touches: &mut [BallTouch], match_length: f32) {
    let next_times: Vec<f32> = touches
        .iter()
        .skip(1)
        .map(|touch| touch.time)
        .chain(std::iter::once(match_length))
        .collect();

    for (touch, next_time) in touches.iter_mut().zip(next_times) {
        touch.time_until_next_touch = Seconds(next_time - touch.time);
    }
}
