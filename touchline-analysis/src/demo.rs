//! Demo replay that generates a synthetic match for testing
//!
//! Two parked cars face each other across the field and rally the ball
//! back and forth. Each rally leg has a different pace, so every hit
//! changes the ball's speed. The stream is sparse like a real replay: the
//! ball is recorded every other frame and on every hit, the cars every
//! fifth frame.

use anyhow::Result;
use serde_json::json;
use std::f32::consts::PI;
use touchline_core::metadata::{MetadataKey, MetadataValue};
use touchline_core::model::{Quaternion, Vector3};
use touchline_core::{
    ActorId, ActorKind, ActorProperty, ActorUpdate, MatchMetadata, ReplayFrame, ReplaySource,
    RigidBodyState, Team,
};

// =============================================================================
// Field layout
// =============================================================================

/// Recording rate of the demo
pub const DEMO_FPS: f32 = 30.0;

/// Default match length in seconds
pub const DEMO_SECONDS: f32 = 60.0;

pub const BALL_ACTOR: ActorId = ActorId(1);
pub const BLUE_ACTOR: ActorId = ActorId(10);
pub const ORANGE_ACTOR: ActorId = ActorId(11);

pub const BLUE_PLAYER: &str = "Blue Demo";
pub const ORANGE_PLAYER: &str = "Orange Demo";

/// Ball turning points are at +/- this (native units)
const RALLY_HALF_WIDTH: f32 = 1500.0;

/// Gap between a turning point and the car standing behind it
const CAR_OFFSET: f32 = 100.0;

const BALL_HEIGHT: f32 = 93.0;
const CAR_HEIGHT: f32 = 17.0;

/// Ball rests on the blue side until the first hit
const KICKOFF_FRAME: u32 = 30;

const BALL_EVERY: u32 = 2;
const CAR_EVERY: u32 = 5;

/// Frames per rally leg, cycled
const LEG_FRAMES: [u32; 3] = [60, 75, 90];

// =============================================================================
// Rally schedule
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct Leg {
    start_frame: u32,
    frames: u32,
    /// +1 from blue to orange, -1 back
    direction: f32,
}

impl Leg {
    fn hitter(&self) -> Team {
        if self.direction > 0.0 {
            Team::Blue
        } else {
            Team::Orange
        }
    }

    fn start_x(&self) -> f32 {
        -self.direction * RALLY_HALF_WIDTH
    }

    fn velocity_x(&self) -> f32 {
        self.direction * 2.0 * RALLY_HALF_WIDTH * DEMO_FPS / self.frames as f32
    }

    fn contains(&self, frame: u32) -> bool {
        frame >= self.start_frame && frame < self.start_frame + self.frames
    }
}

fn rally_schedule(total_frames: u32) -> Vec<Leg> {
    let mut legs = Vec::new();
    let mut start_frame = KICKOFF_FRAME;
    let mut direction = 1.0;

    while start_frame < total_frames {
        let frames = LEG_FRAMES[legs.len() % LEG_FRAMES.len()];
        legs.push(Leg {
            start_frame,
            frames,
            direction,
        });
        start_frame += frames;
        direction = -direction;
    }
    legs
}

fn car_body(team: Team) -> RigidBodyState {
    let (x, yaw) = match team {
        Team::Blue => (-(RALLY_HALF_WIDTH + CAR_OFFSET), 0.0),
        Team::Orange => (RALLY_HALF_WIDTH + CAR_OFFSET, PI),
    };
    RigidBodyState::new(
        Vector3::new(x, 0.0, CAR_HEIGHT),
        Quaternion::from_axis_angle(Vector3::new(0.0, 0.0, 1.0), yaw),
        Some(Vector3::ZERO),
        Some(Vector3::ZERO),
    )
}

fn demo_metadata(seconds: f32) -> MatchMetadata {
    MatchMetadata::new()
        .with(
            MetadataKey::ReplayName,
            MetadataValue::Str("Touchline Demo".to_string()),
        )
        .with(MetadataKey::Team0Score, MetadataValue::Int(1))
        .with(MetadataKey::Team1Score, MetadataValue::Int(2))
        .with(MetadataKey::RecordFps, MetadataValue::Float(DEMO_FPS))
        .with(MetadataKey::TotalSecondsPlayed, MetadataValue::Float(seconds))
        .with(MetadataKey::MapName, MetadataValue::Str("Stadium_P".to_string()))
        .with(
            MetadataKey::Date,
            MetadataValue::Str("2024-05-04 18-30-00".to_string()),
        )
        .with(
            MetadataKey::PlayerStats,
            MetadataValue::Object(json!([
                {"Name": BLUE_PLAYER, "Team": 0, "Score": 230, "Goals": 1, "Assists": 0, "Saves": 2, "Shots": 3},
                {"Name": ORANGE_PLAYER, "Team": 1, "Score": 310, "Goals": 2, "Assists": 0, "Saves": 1, "Shots": 4}
            ])),
        )
}

// =============================================================================
// DemoReplay
// =============================================================================

/// Synthetic [`ReplaySource`]
pub struct DemoReplay {
    metadata: MatchMetadata,
    legs: Vec<Leg>,
    next_frame: u32,
    total_frames: u32,
}

impl DemoReplay {
    pub fn new() -> Self {
        Self::with_duration(DEMO_SECONDS)
    }

    /// Demo match lasting `seconds`
    pub fn with_duration(seconds: f32) -> Self {
        let total_frames = (seconds * DEMO_FPS).round().max(0.0) as u32;
        Self {
            metadata: demo_metadata(seconds),
            legs: rally_schedule(total_frames),
            next_frame: 0,
            total_frames,
        }
    }

    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    /// Frames where a car hits the ball
    pub fn hit_frames(&self) -> Vec<u32> {
        self.legs.iter().map(|leg| leg.start_frame).collect()
    }

    fn leg_at(&self, frame: u32) -> Option<&Leg> {
        self.legs.iter().find(|leg| leg.contains(frame))
    }

    fn ball_body(&self, frame: u32) -> RigidBodyState {
        let Some(leg) = self.leg_at(frame) else {
            // Waiting for kickoff
            return RigidBodyState::new(
                Vector3::new(-RALLY_HALF_WIDTH, 0.0, BALL_HEIGHT),
                Quaternion::IDENTITY,
                Some(Vector3::ZERO),
                Some(Vector3::ZERO),
            );
        };

        let velocity_x = leg.velocity_x();
        let elapsed = (frame - leg.start_frame) as f32 / DEMO_FPS;
        RigidBodyState::new(
            Vector3::new(leg.start_x() + velocity_x * elapsed, 0.0, BALL_HEIGHT),
            Quaternion::IDENTITY,
            Some(Vector3::new(velocity_x, 0.0, 0.0)),
            // Topspin about y
            Some(Vector3::new(0.0, leg.direction * 6.0, 0.0)),
        )
    }

    fn generate_frame(&self, frame: u32) -> ReplayFrame {
        let mut updates = Vec::new();
        let last_frame = frame + 1 == self.total_frames;
        let hit = self.legs.iter().find(|leg| leg.start_frame == frame);

        if frame % BALL_EVERY == 0 || hit.is_some() || last_frame {
            updates.push(ActorUpdate {
                actor_id: BALL_ACTOR,
                kind: ActorKind::Ball,
                property: ActorProperty::RigidBody(self.ball_body(frame)),
            });
        }

        if let Some(leg) = hit {
            updates.push(ActorUpdate {
                actor_id: BALL_ACTOR,
                kind: ActorKind::Ball,
                property: ActorProperty::BallHitTeam(leg.hitter()),
            });
        }

        if frame % CAR_EVERY == 0 || last_frame {
            for (actor_id, player, team) in [
                (BLUE_ACTOR, BLUE_PLAYER, Team::Blue),
                (ORANGE_ACTOR, ORANGE_PLAYER, Team::Orange),
            ] {
                updates.push(ActorUpdate {
                    actor_id,
                    kind: ActorKind::Vehicle {
                        player: player.to_string(),
                    },
                    property: ActorProperty::RigidBody(car_body(team)),
                });
            }
        }

        ReplayFrame {
            time: frame as f32 / DEMO_FPS,
            updates,
        }
    }
}

impl Default for DemoReplay {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplaySource for DemoReplay {
    fn name(&self) -> &str {
        "Demo"
    }

    fn metadata(&self) -> &MatchMetadata {
        &self.metadata
    }

    fn next_frame(&mut self) -> Result<Option<ReplayFrame>> {
        if self.next_frame >= self.total_frames {
            return Ok(None);
        }
        let frame = self.generate_frame(self.next_frame);
        self.next_frame += 1;
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_alternates_sides() {
        let legs = rally_schedule(600);
        assert_eq!(legs[0].start_frame, KICKOFF_FRAME);
        assert_eq!(legs[0].hitter(), Team::Blue);
        assert_eq!(legs[1].hitter(), Team::Orange);
        assert_eq!(legs[1].start_frame, KICKOFF_FRAME + 60);
        assert!(legs.iter().all(|leg| leg.start_frame < 600));
    }

    #[test]
    fn test_ball_reaches_turning_points_on_hits() {
        let demo = DemoReplay::new();
        for frame in demo.hit_frames() {
            let x = demo.ball_body(frame).position.x;
            assert!((x.abs() - RALLY_HALF_WIDTH).abs() < 1e-3, "ball at {} on hit frame {}", x, frame);
        }
    }

    #[test]
    fn test_every_hit_changes_speed() {
        let demo = DemoReplay::new();
        for frame in demo.hit_frames() {
            let before = demo.ball_body(frame - 1).speed_kmh().0;
            let after = demo.ball_body(frame).speed_kmh().0;
            assert!((after - before).abs() > 1.0);
        }
    }
}
