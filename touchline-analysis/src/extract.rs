//! Trajectory extraction from a replay source
//!
//! Drains a [`ReplaySource`] and sorts its rigid body updates into one sparse
//! trajectory for the ball and one per vehicle actor. Frames are numbered by
//! their position in the recording, starting at 0.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use touchline_core::model::BallHit;
use touchline_core::{
    ActorId, ActorKind, ActorProperty, GameObjectState, MatchMetadata, PlayerInfo, ReplaySource,
    RigidBodyState, Team,
};
use tracing::{debug, info, warn};

/// Everything the analysis needs from one recorded match
#[derive(Debug, Clone, Default)]
pub struct MatchRecording {
    /// Name of the source the match was read from
    pub source_name: String,
    pub metadata: MatchMetadata,
    pub roster: Vec<PlayerInfo>,
    /// Sparse ball trajectory
    pub ball: Vec<GameObjectState>,
    /// Sparse trajectory per vehicle actor
    pub vehicles: BTreeMap<ActorId, Vec<GameObjectState>>,
    /// Driver of each vehicle actor
    pub actor_players: HashMap<ActorId, String>,
    /// Ball hits flagged by the game
    pub ball_hits: Vec<BallHit>,
    pub frame_count: u32,
    /// Match duration in seconds
    pub match_length: f32,
    pub record_fps: f32,
}

impl MatchRecording {
    /// Reads every frame of `source`
    pub fn from_source(source: &mut dyn ReplaySource) -> Result<Self> {
        let source_name = source.name().to_string();
        let metadata = source.metadata().clone();
        let roster = metadata
            .roster()
            .with_context(|| format!("Failed to read the roster of {}", source_name))?;

        let mut recording = MatchRecording {
            source_name,
            record_fps: metadata.record_fps(),
            metadata,
            roster,
            ..Default::default()
        };

        let mut last_time = 0.0_f32;
        loop {
            let frame_number = recording.frame_count;
            let frame = source.next_frame().with_context(|| {
                format!(
                    "Failed to read frame {} of {}",
                    frame_number, recording.source_name
                )
            })?;
            let Some(frame) = frame else {
                break;
            };

            for update in frame.updates {
                match update.property {
                    ActorProperty::RigidBody(body) => {
                        let state = GameObjectState::new(body, frame_number, frame.time, update.actor_id);
                        recording.record_state(&update.kind, state);
                    }
                    ActorProperty::BallHitTeam(team) => recording.ball_hits.push(BallHit {
                        frame_number,
                        time: frame.time,
                        team,
                    }),
                }
            }

            last_time = frame.time;
            recording.frame_count += 1;
        }

        recording.match_length = recording
            .metadata
            .total_seconds_played()
            .unwrap_or(last_time);

        for player in recording.unrostered_players() {
            warn!(
                "Player {} drives a vehicle but is not on the roster; their touches will not count",
                player
            );
        }

        info!(
            "Extracted {}: {} frames, {} ball samples, {} vehicles, {:.1}s at {} fps",
            recording.source_name,
            recording.frame_count,
            recording.ball.len(),
            recording.vehicles.len(),
            recording.match_length,
            recording.record_fps
        );

        Ok(recording)
    }

    fn record_state(&mut self, kind: &ActorKind, state: GameObjectState) {
        let trajectory = match kind {
            ActorKind::Ball => &mut self.ball,
            ActorKind::Vehicle { player } => {
                self.actor_players
                    .entry(state.actor_id)
                    .or_insert_with(|| player.clone());
                self.vehicles.entry(state.actor_id).or_default()
            }
            ActorKind::Other => return,
        };

        // Several updates for one actor in one frame: the last one wins
        match trajectory.last_mut() {
            Some(last) if last.frame_number == state.frame_number => {
                debug!(
                    "{} updated twice in frame {}",
                    state.actor_id, state.frame_number
                );
                *last = state;
            }
            _ => trajectory.push(state),
        }
    }

    /// Team of a roster player
    pub fn player_team(&self, name: &str) -> Option<Team> {
        self.roster.iter().find(|p| p.name == name).map(|p| p.team)
    }

    /// Vehicle drivers with no roster entry, sorted by name
    pub fn unrostered_players(&self) -> Vec<&str> {
        let mut players: Vec<&str> = self
            .actor_players
            .values()
            .map(String::as_str)
            .filter(|name| self.player_team(name).is_none())
            .collect();
        players.sort_unstable();
        players.dedup();
        players
    }

    /// Latest ball rigid body state, if the ball was ever recorded
    pub fn final_ball_state(&self) -> Option<&RigidBodyState> {
        self.ball.last().map(|state| &state.rigid_body)
    }
}
