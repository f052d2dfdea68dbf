//! End-to-end scoring flows through the public store API, including a
//! round trip through the JSON data file.

use chrono::{TimeZone, Utc};
use house_cup::model::{Activity, ActivityType};
use house_cup::roster::parse_roster_text;
use house_cup::scoring::{validate_records, PointsSource, ScoringError};
use house_cup::store::{leaderboard, load_data, save_data, HouseCupData, ScoreInput};
use std::env;

fn season() -> HouseCupData {
    let mut data = HouseCupData::new();
    for name in ["Gryphon", "Phoenix", "Kraken"] {
        data.add_house(name, "").unwrap();
    }

    let date = Utc.with_ymd_and_hms(2025, 10, 11, 10, 0, 0).unwrap();
    let relay = Activity::new(1, "Relay", ActivityType::Sports, 1, date);
    let mut quiz = Activity::new(2, "Quiz Bowl", ActivityType::Academics, 1, date);
    quiz.max_points = 77;
    data.upsert_activity(relay).unwrap();
    data.upsert_activity(quiz).unwrap();

    for house in 1..=3 {
        for activity in 1..=2 {
            let roster = parse_roster_text("Ana - Grade 10 (Captain)\nBen - Grade 11\nCleo").unwrap();
            data.import_roster(activity, house, roster).unwrap();
        }
    }
    data
}

#[test]
fn placements_follow_the_distribution() {
    let mut data = season();
    data.record_score(1, 1, ScoreInput::Placement(1), None).unwrap();
    data.record_score(1, 2, ScoreInput::Placement(2), None).unwrap();
    let quiz = data.record_score(2, 3, ScoreInput::Placement(2), None).unwrap();

    assert_eq!(quiz.points, 61);
    assert_eq!(quiz.source, PointsSource::Placement(2));
    assert!(validate_records(&data).is_ok());

    let standings = leaderboard(&data, None);
    let totals: Vec<(&str, u64)> = standings
        .iter()
        .map(|s| (s.house_name.as_str(), s.total_points))
        .collect();
    assert_eq!(totals, vec![("Gryphon", 100), ("Phoenix", 80), ("Kraken", 61)]);
}

#[test]
fn legacy_file_is_repaired_by_batch_normalize() {
    let path = env::temp_dir().join("house_cup_it_legacy.json");
    let json = r#"{
        "version": 1,
        "houses": [{"id": 1, "name": "Gryphon"}],
        "activities": [
            {"id": 1, "name": "Mural", "activity_type": "arts", "house_cup_year": 1,
             "date": "2025-10-11T10:55:00Z", "max_points": 100,
             "points_distribution": {"1": "999"}},
            {"id": 2, "name": "Chess", "activity_type": "other", "house_cup_year": 1,
             "date": "2025-10-12T10:55:00Z", "max_points": 40,
             "points_distribution": {}}
        ],
        "participations": [{"id": 1, "activity": 1, "house": 1}]
    }"#;
    std::fs::write(&path, json).unwrap();

    let mut data = load_data(&path).unwrap();
    assert!(validate_records(&data).is_err());

    assert_eq!(data.normalize_all().unwrap(), 2);
    save_data(&path, &data).unwrap();

    let mut reloaded = load_data(&path).unwrap();
    assert!(validate_records(&reloaded).is_ok());
    assert_eq!(reloaded.normalize_all().unwrap(), 0);

    let mural = reloaded.activity(1).unwrap();
    assert_eq!(mural.points_distribution.get(1), Some(999));
    assert_eq!(mural.points_distribution.get(2), Some(80));
    let chess = reloaded.activity(2).unwrap();
    assert_eq!(chess.points_distribution.to_string(), "1: 40, 2: 32, 3: 24, 4: 16, 5: 8");

    // The preserved override is above max points, so first place cannot be awarded
    let err = reloaded
        .record_score(1, 1, ScoreInput::Placement(1), None)
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ScoringError>(),
        Some(ScoringError::InvariantViolation(_))
    ));
    let second = reloaded.record_score(1, 1, ScoreInput::Placement(2), None).unwrap();
    assert_eq!(second.points, 80);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn captain_changes_keep_one_captain() {
    let mut data = season();
    data.set_captain(1, 2, "Cleo").unwrap();

    let team = data.participation_for(1, 2).unwrap();
    assert_eq!(team.captain_name(), Some("Cleo"));
    assert_eq!(team.captain_count(), 1);

    let err = data.set_captain(1, 2, "Dana").unwrap_err();
    assert_eq!(
        err.downcast_ref::<ScoringError>(),
        Some(&ScoringError::ParticipantNotFound("Dana".to_string()))
    );
    assert_eq!(data.participation_for(1, 2).unwrap().captain_name(), Some("Cleo"));
}

#[test]
fn invalid_placement_is_rejected_without_storing_a_score() {
    let mut data = season();
    let err = data
        .record_score(1, 1, ScoreInput::Placement(6), None)
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<ScoringError>(),
        Some(&ScoringError::InvalidPlacement { placement: 6 })
    );
    assert!(data.scores.is_empty());
}
