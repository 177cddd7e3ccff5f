//! Player and team scoreboards
//!
//! Joins the game's own scoreboard stats from the roster with the touch and
//! possession figures computed by the analysis.

use serde::{Deserialize, Serialize};
use touchline_analysis::{MatchRecording, PlayerTouchRecord, PossessionReport};
use touchline_core::units::{Percent, Seconds};
use touchline_core::{PlayerInfo, Team};

/// One scoreboard row per player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerScoreboard {
    pub name: String,
    pub team: Team,
    pub score: i32,
    pub goals: i32,
    pub assists: i32,
    pub saves: i32,
    pub shots: i32,
    pub touches: usize,
    pub touch_share_percent: Percent,
    pub possession_time: Seconds,
    pub possession_time_share_percent: Percent,
    pub average_possession_time: Seconds,
}

impl PlayerScoreboard {
    pub fn new(info: &PlayerInfo, record: Option<&PlayerTouchRecord>) -> Self {
        let mut row = Self {
            name: info.name.clone(),
            team: info.team,
            score: info.score,
            goals: info.goals,
            assists: info.assists,
            saves: info.saves,
            shots: info.shots,
            touches: 0,
            touch_share_percent: Percent::default(),
            possession_time: Seconds::default(),
            possession_time_share_percent: Percent::default(),
            average_possession_time: Seconds::default(),
        };

        if let Some(record) = record {
            row.touches = record.touch_count;
            row.touch_share_percent = record.touch_share_percent;
            row.possession_time = record.possession_time;
            row.possession_time_share_percent = record.possession_time_share_percent;
            row.average_possession_time = record.average_possession_time;
        }
        row
    }
}

/// Team totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamScoreboard {
    pub team: Team,
    pub name: String,
    /// Final score from the replay header
    pub goals: i64,
    pub score: i32,
    pub assists: i32,
    pub saves: i32,
    pub shots: i32,
    pub touches: usize,
    pub possession_time: Seconds,
    /// Ball hits the game itself flagged for this team
    pub recorded_hits: usize,
}

impl TeamScoreboard {
    fn empty(team: Team, goals: i64, recorded_hits: usize) -> Self {
        Self {
            team,
            name: team.display_name().to_string(),
            goals,
            score: 0,
            assists: 0,
            saves: 0,
            shots: 0,
            touches: 0,
            possession_time: Seconds(0.0),
            recorded_hits,
        }
    }

    fn add(&mut self, row: &PlayerScoreboard) {
        self.score += row.score;
        self.assists += row.assists;
        self.saves += row.saves;
        self.shots += row.shots;
        self.touches += row.touches;
        self.possession_time += row.possession_time;
    }
}

/// Builds the player rows, in roster order, and one row per team
pub fn build_scoreboards(
    recording: &MatchRecording,
    possession: &PossessionReport,
) -> (Vec<PlayerScoreboard>, Vec<TeamScoreboard>) {
    let players: Vec<PlayerScoreboard> = recording
        .roster
        .iter()
        .map(|info| PlayerScoreboard::new(info, possession.player(&info.name)))
        .collect();

    let teams = Team::ALL
        .iter()
        .map(|&team| {
            let recorded_hits = recording.ball_hits.iter().filter(|hit| hit.team == team).count();
            let mut row = TeamScoreboard::empty(team, recording.metadata.team_score(team), recorded_hits);
            for player in players.iter().filter(|p| p.team == team) {
                row.add(player);
            }
            row
        })
        .collect();

    (players, teams)
}

#[cfg(test)]
mod tests {
    use super::*;
    use touchline_core::model::BallHit;
    use touchline_core::{MatchMetadata, MetadataKey, MetadataValue};

    fn record(name: &str, team: Team, touches: usize, possession: f32) -> PlayerTouchRecord {
        PlayerTouchRecord {
            name: name.to_string(),
            team,
            touches: Vec::new(),
            touch_count: touches,
            possession_time: Seconds(possession),
            touch_share_percent: Percent(50.0),
            possession_time_share_percent: Percent(40.0),
            average_possession_time: Seconds(1.5),
        }
    }

    fn recording() -> MatchRecording {
        let mut garrett = PlayerInfo::new("Garrett", Team::Blue);
        garrett.goals = 2;
        garrett.shots = 4;
        let mut turbo = PlayerInfo::new("Turbo", Team::Blue);
        turbo.saves = 3;
        MatchRecording {
            metadata: MatchMetadata::new()
                .with(MetadataKey::Team0Score, MetadataValue::Int(2))
                .with(MetadataKey::Team1Score, MetadataValue::Int(0)),
            roster: vec![garrett, turbo, PlayerInfo::new("Kuxir", Team::Orange)],
            ball_hits: vec![
                BallHit { frame_number: 4, time: 0.1, team: Team::Blue },
                BallHit { frame_number: 9, time: 0.3, team: Team::Orange },
                BallHit { frame_number: 20, time: 0.7, team: Team::Blue },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_player_rows_join_roster_and_possession() {
        let possession = PossessionReport {
            players: vec![record("Garrett", Team::Blue, 6, 12.0)],
            ..Default::default()
        };
        let (players, _) = build_scoreboards(&recording(), &possession);

        assert_eq!(players.len(), 3);
        assert_eq!(players[0].name, "Garrett");
        assert_eq!(players[0].goals, 2);
        assert_eq!(players[0].touches, 6);
        assert_eq!(players[0].possession_time, Seconds(12.0));
        assert_eq!(players[0].average_possession_time, Seconds(1.5));
        assert_eq!(players[1].touches, 0);
        assert_eq!(players[1].touch_share_percent, Percent(0.0));
    }

    #[test]
    fn test_team_rows_sum_players() {
        let possession = PossessionReport {
            players: vec![
                record("Garrett", Team::Blue, 6, 12.0),
                record("Turbo", Team::Blue, 4, 8.0),
            ],
            ..Default::default()
        };
        let (_, teams) = build_scoreboards(&recording(), &possession);

        assert_eq!(teams.len(), 2);
        let blue = &teams[0];
        assert_eq!(blue.name, "Blue Team");
        assert_eq!(blue.goals, 2);
        assert_eq!(blue.shots, 4);
        assert_eq!(blue.saves, 3);
        assert_eq!(blue.touches, 10);
        assert_eq!(blue.possession_time, Seconds(20.0));
        assert_eq!(blue.recorded_hits, 2);

        let orange = &teams[1];
        assert_eq!(orange.name, "Orange Team");
        assert_eq!(orange.goals, 0);
        assert_eq!(orange.touches, 0);
        assert_eq!(orange.recorded_hits, 1);
    }
}
