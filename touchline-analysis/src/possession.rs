//! Per-player and per-team possession statistics
//!
//! Every touch owns the ball until the next touch by anyone. A player's
//! possession time is the sum over their touches; shares are relative to
//! the player's own team.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use touchline_core::units::{Percent, Seconds};
use touchline_core::{ActorId, AnalysisError, BallTouch, PlayerInfo, Team};
use tracing::{debug, warn};

/// Touches that follow each other closer than this count as one chain
const CHAIN_TIME_TOLERANCE: f32 = 1e-4;

/// Touch and possession statistics for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerTouchRecord {
    pub name: String,
    pub team: Team,
    /// Touches attributed to the player, in match order
    pub touches: Vec<BallTouch>,
    pub touch_count: usize,
    pub possession_time: Seconds,
    /// Share of the team's touches
    pub touch_share_percent: Percent,
    /// Share of the team's possession time
    pub possession_time_share_percent: Percent,
    /// Mean length of the player's uninterrupted possession chains
    pub average_possession_time: Seconds,
}

/// Touch totals for one team
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamTouchTotals {
    pub team: Team,
    pub touches: usize,
    pub possession_time: Seconds,
}

/// Aggregated possession statistics for a match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PossessionReport {
    /// One record per roster entry, in roster order
    pub players: Vec<PlayerTouchRecord>,
    /// Blue then Orange
    pub teams: Vec<TeamTouchTotals>,
    /// Touches dropped because the vehicle had no player or the player was
    /// not on the roster
    pub unattributed_touches: usize,
}

impl PossessionReport {
    pub fn player(&self, name: &str) -> Option<&PlayerTouchRecord> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn team(&self, team: Team) -> Option<&TeamTouchTotals> {
        self.teams.iter().find(|t| t.team == team)
    }
}

/// Name of the player driving `actor_id`
pub fn resolve_player<'a>(
    actor_players: &'a HashMap<ActorId, String>,
    actor_id: ActorId,
) -> Result<&'a str, AnalysisError> {
    actor_players
        .get(&actor_id)
        .map(String::as_str)
        .ok_or(AnalysisError::UnknownActor(actor_id))
}

/// Attributes touches to roster players and computes team-relative shares
pub fn aggregate_possession(
    touches: &[BallTouch],
    actor_players: &HashMap<ActorId, String>,
    roster: &[PlayerInfo],
) -> PossessionReport {
    let mut by_player: HashMap<&str, Vec<BallTouch>> = HashMap::new();
    let mut unattributed = 0;

    for touch in touches {
        let name = match resolve_player(actor_players, touch.actor_id) {
            Ok(name) => name,
            Err(e) => {
                debug!("Dropping touch at frame {}: {}", touch.frame_number, e);
                unattributed += 1;
                continue;
            }
        };
        by_player.entry(name).or_default().push(touch.clone());
    }

    for (name, player_touches) in &by_player {
        if !roster.iter().any(|p| p.name == *name) {
            warn!(
                "Player {} is not on the roster, dropping {} touches",
                name,
                player_touches.len()
            );
            unattributed += player_touches.len();
        }
    }

    let mut players: Vec<PlayerTouchRecord> = roster
        .iter()
        .map(|info| {
            let player_touches = by_player.remove(info.name.as_str()).unwrap_or_default();
            PlayerTouchRecord {
                name: info.name.clone(),
                team: info.team,
                touch_count: player_touches.len(),
                possession_time: player_touches.iter().map(|t| t.time_until_next_touch).sum(),
                touch_share_percent: Percent::default(),
                possession_time_share_percent: Percent::default(),
                average_possession_time: average_possession_time(&player_touches),
                touches: player_touches,
            }
        })
        .collect();

    let mut totals: BTreeMap<Team, TeamTouchTotals> = Team::ALL
        .iter()
        .map(|&team| {
            (
                team,
                TeamTouchTotals {
                    team,
                    touches: 0,
                    possession_time: Seconds(0.0),
                },
            )
        })
        .collect();

    for player in &players {
        if let Some(total) = totals.get_mut(&player.team) {
            total.touches += player.touch_count;
            total.possession_time += player.possession_time;
        }
    }

    for player in &mut players {
        if let Some(total) = totals.get(&player.team) {
            player.touch_share_percent = Percent::of(player.touch_count as f32, total.touches as f32);
            player.possession_time_share_percent =
                Percent::of(player.possession_time.0, total.possession_time.0);
        }
    }

    PossessionReport {
        players,
        teams: totals.into_values().collect(),
        unattributed_touches: unattributed,
    }
}

/// Average length of a player's possession chains
///
/// A chain continues while the player's next touch is also the next touch
/// of the match, i.e. it happens exactly when the current possession ends.
pub fn average_possession_time(touches: &[BallTouch]) -> Seconds {
    let mut chains: Vec<Seconds> = Vec::new();
    let mut current = Seconds(0.0);

    for (index, touch) in touches.iter().enumerate() {
        current += touch.time_until_next_touch;

        let continues = touches.get(index + 1).is_some_and(|next| {
            (next.time - (touch.time + touch.time_until_next_touch.0)).abs() <= CHAIN_TIME_TOLERANCE
        });
        if !continues {
            chains.push(current);
            current = Seconds(0.0);
        }
    }

    if chains.is_empty() {
        return Seconds(0.0);
    }
    let total: Seconds = chains.iter().sum();
    Seconds(total.0 / chains.len() as f32)
}
