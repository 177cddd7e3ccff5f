//! Integration tests for the DemoReplay

use touchline_analysis::demo::{BLUE_ACTOR, BLUE_PLAYER, DEMO_SECONDS, ORANGE_ACTOR, ORANGE_PLAYER};
use touchline_analysis::DemoReplay;
use touchline_core::{ActorKind, ActorProperty, ReplaySource, Team};

#[test]
fn test_demo_replay_name() {
    let demo = DemoReplay::new();
    assert_eq!(demo.name(), "Demo");
}

#[test]
fn test_demo_replay_metadata() {
    let demo = DemoReplay::new();
    let metadata = demo.metadata();
    assert_eq!(metadata.replay_name(), "Touchline Demo");
    assert_eq!(metadata.record_fps(), 30.0);
    assert_eq!(metadata.total_seconds_played(), Some(DEMO_SECONDS));
    assert_eq!(metadata.team_score(Team::Blue), 1);
    assert_eq!(metadata.team_score(Team::Orange), 2);

    let roster = metadata.roster().expect("demo roster should decode");
    assert_eq!(roster.len(), 2);
    assert_eq!(roster[0].name, BLUE_PLAYER);
    assert_eq!(roster[1].team, Team::Orange);
}

#[test]
fn test_demo_replay_yields_every_frame_then_ends() {
    let mut demo = DemoReplay::with_duration(2.0);
    let mut count = 0;
    let mut last_time = -1.0;
    while let Some(frame) = demo.next_frame().expect("next_frame() should not error") {
        assert!(frame.time > last_time, "frame times should increase");
        last_time = frame.time;
        count += 1;
    }
    assert_eq!(count, 60);
    assert!(demo.next_frame().unwrap().is_none(), "exhausted demo stays exhausted");
}

#[test]
fn test_demo_replay_is_sparse() {
    let mut demo = DemoReplay::with_duration(2.0);
    let mut ball_samples = 0;
    let mut car_samples = 0;
    while let Some(frame) = demo.next_frame().unwrap() {
        for update in frame.updates {
            match (update.kind, update.property) {
                (ActorKind::Ball, ActorProperty::RigidBody(_)) => ball_samples += 1,
                (ActorKind::Vehicle { .. }, ActorProperty::RigidBody(_)) => car_samples += 1,
                _ => {}
            }
        }
    }
    assert!(ball_samples < 60, "ball should not be recorded on every frame");
    assert!(car_samples < ball_samples, "cars are recorded less often than the ball");
}

#[test]
fn test_demo_replay_tags_vehicles() {
    let mut demo = DemoReplay::new();
    let frame = demo.next_frame().unwrap().expect("first frame");
    let drivers: Vec<_> = frame
        .updates
        .iter()
        .filter_map(|update| match &update.kind {
            ActorKind::Vehicle { player } => Some((update.actor_id, player.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        drivers,
        vec![
            (BLUE_ACTOR, BLUE_PLAYER.to_string()),
            (ORANGE_ACTOR, ORANGE_PLAYER.to_string())
        ]
    );
}

#[test]
fn test_demo_replay_flags_hits() {
    let mut demo = DemoReplay::new();
    let hits = demo.hit_frames();
    let mut flagged = Vec::new();
    let mut frame_number = 0;
    while let Some(frame) = demo.next_frame().unwrap() {
        for update in &frame.updates {
            if let ActorProperty::BallHitTeam(team) = update.property {
                flagged.push((frame_number, team));
            }
        }
        frame_number += 1;
    }

    assert_eq!(flagged.len(), hits.len());
    for (i, (frame, team)) in flagged.iter().enumerate() {
        assert_eq!(*frame, hits[i]);
        let expected = if i % 2 == 0 { Team::Blue } else { Team::Orange };
        assert_eq!(*team, expected);
    }
}
