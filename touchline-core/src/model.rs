//! Replay telemetry data model
//!
//! Defines the per-sample rigid body snapshot, the trajectory sample that
//! wraps it, and the touch events derived from trajectories.
//!
//! Positions are in native replay units, velocities in native units per
//! second, angular velocities in radians per second.

use crate::units::*;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// 3D vector in native replay units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn magnitude(&self) -> f32 {
        self.z
            .mul_add(self.z, self.x.mul_add(self.x, self.y * self.y))
            .sqrt()
    }

    pub fn distance(&self, other: &Vector3) -> f32 {
        (*self - *other).magnitude()
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Self) -> Self::Output {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Self) -> Self::Output {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Vector3;

    fn mul(self, rhs: f32) -> Self::Output {
        Vector3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Orientation quaternion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    /// Unit quaternion in the same direction, or identity for a zero quaternion
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        if mag < f32::EPSILON {
            return Self::IDENTITY;
        }
        Self::new(self.x / mag, self.y / mag, self.z / mag, self.w / mag)
    }

    /// Rotation of `angle` radians about a unit `axis`
    pub fn from_axis_angle(axis: Vector3, angle: f32) -> Self {
        let (sin, cos) = (angle * 0.5).sin_cos();
        Self::new(axis.x * sin, axis.y * sin, axis.z * sin, cos)
    }

    /// Orientation after spinning at a constant world-frame angular velocity
    /// (rad/s) for `dt` seconds.
    pub fn rotated_by_angular_velocity(&self, angular_velocity: Vector3, dt: f32) -> Self {
        let rate = angular_velocity.magnitude();
        let angle = rate * dt;
        if angle.abs() < f32::EPSILON {
            return *self;
        }

        let axis = angular_velocity * (1.0 / rate);
        (Self::from_axis_angle(axis, angle) * *self).normalized()
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    /// Hamilton product: `self * rhs` applies `rhs` first
    fn mul(self, rhs: Self) -> Self::Output {
        Quaternion::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }
}

/// Treats an absent or `null` vector as zero
fn zero_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vector3, D::Error> {
    Ok(Option::<Vector3>::deserialize(deserializer)?.unwrap_or(Vector3::ZERO))
}

/// Physics snapshot of one object at one sample
///
/// Replays leave velocities out for objects the engine considers idle.
/// Those arrive as zero vectors; the substitution happens here at ingestion
/// so the rest of the pipeline never deals with missing velocities.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RigidBodyState {
    /// Whether the physics engine considers the object at rest
    #[serde(default)]
    pub sleeping: bool,

    pub position: Vector3,

    #[serde(default)]
    pub rotation: Quaternion,

    #[serde(default, deserialize_with = "zero_if_null")]
    pub linear_velocity: Vector3,

    #[serde(default, deserialize_with = "zero_if_null")]
    pub angular_velocity: Vector3,
}

impl RigidBodyState {
    pub fn new(
        position: Vector3,
        rotation: Quaternion,
        linear_velocity: Option<Vector3>,
        angular_velocity: Option<Vector3>,
    ) -> Self {
        Self {
            sleeping: false,
            position,
            rotation,
            linear_velocity: linear_velocity.unwrap_or_default(),
            angular_velocity: angular_velocity.unwrap_or_default(),
        }
    }

    /// Linear speed in km/h
    pub fn speed_kmh(&self) -> KilometersPerHour {
        KilometersPerHour::from_units_per_second(self.linear_velocity.magnitude())
    }

    /// Same pose with both velocities zeroed
    pub fn at_rest(&self) -> Self {
        Self {
            sleeping: true,
            linear_velocity: Vector3::ZERO,
            angular_velocity: Vector3::ZERO,
            ..*self
        }
    }
}

/// Identifier of an in-match actor, stable for the actor's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

/// One recorded or synthesized sample of one tracked object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameObjectState {
    pub rigid_body: RigidBodyState,
    pub frame_number: u32,
    /// Match-relative time in seconds
    pub time: f32,
    pub actor_id: ActorId,
}

impl GameObjectState {
    pub fn new(rigid_body: RigidBodyState, frame_number: u32, time: f32, actor_id: ActorId) -> Self {
        Self {
            rigid_body,
            frame_number,
            time,
            actor_id,
        }
    }

    /// Time left in a match of `match_length` seconds when this sample occurs
    pub fn remaining_time(&self, match_length: f32) -> Seconds {
        Seconds(match_length - self.time)
    }
}

/// A detected contact between a vehicle and the ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallTouch {
    pub frame_number: u32,
    pub time: f32,
    /// Vehicle deemed to have caused the contact
    pub actor_id: ActorId,
    /// Ball state at the touch
    pub ball_rigid_body: RigidBodyState,
    /// Vehicle to ball separation at detection (diagnostic only)
    pub distance: Meters,
    /// Possession attributed to this touch
    pub time_until_next_touch: Seconds,
}

/// Team assignment for a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Team {
    #[default]
    Blue,
    Orange,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Blue, Team::Orange];

    /// Display name used on scoreboards
    pub fn display_name(&self) -> &'static str {
        match self {
            Team::Blue => "Blue Team",
            Team::Orange => "Orange Team",
        }
    }
}

impl TryFrom<u8> for Team {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Team::Blue),
            1 => Ok(Team::Orange),
            other => Err(format!("Unknown team number: {}", other)),
        }
    }
}

impl From<Team> for u8 {
    fn from(team: Team) -> Self {
        match team {
            Team::Blue => 0,
            Team::Orange => 1,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Classification of an actor, supplied by the replay source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActorKind {
    Ball,
    /// A car driven by the named player
    Vehicle { player: String },
    Other,
}

/// Player roster entry with the scoreboard stats recorded by the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerInfo {
    pub name: String,
    pub team: Team,
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub goals: i32,
    #[serde(default)]
    pub assists: i32,
    #[serde(default)]
    pub saves: i32,
    #[serde(default)]
    pub shots: i32,
}

impl PlayerInfo {
    pub fn new(name: impl Into<String>, team: Team) -> Self {
        Self {
            name: name.into(),
            team,
            score: 0,
            goals: 0,
            assists: 0,
            saves: 0,
            shots: 0,
        }
    }
}

/// Ball hit marker recorded by the game itself
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallHit {
    pub frame_number: u32,
    pub time: f32,
    pub team: Team,
}
