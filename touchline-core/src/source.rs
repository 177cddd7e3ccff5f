//! Replay source trait definition

use crate::metadata::MatchMetadata;
use crate::model::{ActorId, ActorKind, RigidBodyState, Team};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A property update carried by one actor in one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorProperty {
    /// Physics snapshot of the actor
    RigidBody(RigidBodyState),
    /// The game flagged a ball hit by this team
    BallHitTeam(Team),
}

/// One actor's update within a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorUpdate {
    pub actor_id: ActorId,
    pub kind: ActorKind,
    pub property: ActorProperty,
}

/// One recorded network frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReplayFrame {
    /// Match-relative time in seconds
    pub time: f32,
    pub updates: Vec<ActorUpdate>,
}

/// Trait for replay deserializers
///
/// Each source is responsible for:
/// - Exposing the replay header as typed metadata
/// - Yielding frames in recording order
/// - Tagging every actor as ball, vehicle (with its driver) or other
pub trait ReplaySource {
    /// Get the name of this source (e.g., a file name, "Demo")
    fn name(&self) -> &str;

    /// Replay header properties
    fn metadata(&self) -> &MatchMetadata;

    /// Read the next frame
    ///
    /// Returns:
    /// - `Ok(Some(frame))` while frames remain
    /// - `Ok(None)` once the recording is exhausted
    /// - `Err(_)` if the recording could not be decoded
    fn next_frame(&mut self) -> Result<Option<ReplayFrame>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Vector3;

    #[test]
    fn test_actor_update_json_shape() {
        let update = ActorUpdate {
            actor_id: ActorId(7),
            kind: ActorKind::Ball,
            property: ActorProperty::BallHitTeam(Team::Orange),
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["actor_id"], 7);
        assert_eq!(value["kind"]["type"], "ball");
        assert_eq!(value["property"]["ball_hit_team"], 1);
    }

    #[test]
    fn test_actor_update_parses_rigid_body() {
        let json = r#"{
            "actor_id": 12,
            "kind": {"type": "vehicle", "player": "Jstn"},
            "property": {"rigid_body": {"position": {"x": 0.0, "y": 10.0, "z": 17.0}}}
        }"#;
        let update: ActorUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(update.actor_id, ActorId(12));
        match update.property {
            ActorProperty::RigidBody(body) => {
                assert_eq!(body.position, Vector3::new(0.0, 10.0, 17.0));
                assert_eq!(body.linear_velocity, Vector3::ZERO);
            }
            other => panic!("unexpected property {:?}", other),
        }
    }
}
