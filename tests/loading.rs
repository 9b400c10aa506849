use std::path::PathBuf;

use ipl_analytics::join::{MatchField, join_on_match_id};
use ipl_analytics::query::batter_profile;
use ipl_analytics::{DataConfig, EngineError, ResultType, SchemaError, load_dataset};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn config(deliveries: &str) -> DataConfig {
    DataConfig {
        deliveries: fixture_path(deliveries),
        matches: fixture_path("matches.csv"),
    }
}

#[test]
fn loads_fixture_tables() {
    let data = load_dataset(&config("deliveries.csv")).expect("fixtures should load");
    assert_eq!(data.deliveries().len(), 14);
    assert_eq!(data.matches().len(), 5);

    let tie = data.find_match(3).expect("match 3 exists");
    assert_eq!(tie.result, ResultType::Tie);
    assert_eq!(tie.winner, None, "tied match keeps no winner");

    let abandoned = data.find_match(4).expect("match 4 exists");
    assert_eq!(abandoned.result, ResultType::NoResult);
    assert_eq!(abandoned.player_of_match, None);
    assert_eq!(abandoned.umpire2, None);

    let fifth = data.find_match(5).expect("match 5 exists");
    assert_eq!(fifth.toss_decision.as_deref(), Some("bat"));

    let run_out = &data.deliveries()[5];
    assert!(run_out.is_wicket);
    assert_eq!(run_out.dismissal_kind.as_deref(), Some("run out"));
    assert_eq!(data.deliveries()[0].dismissal_kind, None);
}

#[test]
fn selection_lists_are_sorted_and_unique() {
    let data = load_dataset(&config("deliveries.csv")).expect("fixtures should load");
    assert_eq!(data.teams(), vec!["A", "B", "C"]);
    assert_eq!(data.venues(), vec!["Chepauk", "Kotla", "Wankhede"]);
    assert_eq!(data.seasons(), vec!["2019", "2020"]);
    assert_eq!(data.match_ids(), vec![1, 2, 3, 4, 5]);
    assert_eq!(data.batting_teams_in_match(1), vec!["A", "B"]);
    assert!(data.batting_teams_in_match(4).is_empty());
    assert_eq!(data.batters(), vec!["P1", "P2", "Q1", "Q3", "R1"]);
}

#[test]
fn aliased_headers_are_normalized() {
    let data = load_dataset(&config("deliveries_aliased.csv")).expect("aliased headers should load");
    assert_eq!(data.deliveries().len(), 3);
    assert_eq!(data.deliveries()[2].dismissal_kind.as_deref(), Some("lbw"));
    assert!(data.deliveries()[2].is_wicket);

    let profile = batter_profile(&data, "P1");
    assert_eq!(profile.total_runs, 5);
    assert_eq!(profile.balls_faced, 2);
    assert_eq!(profile.strike_rate, 250.0);
}

#[test]
fn missing_file_is_data_unavailable() {
    let err = load_dataset(&config("no_such_file.csv")).unwrap_err();
    match err {
        EngineError::DataUnavailable { path, .. } => {
            assert!(path.ends_with("no_such_file.csv"));
        }
        other => panic!("expected DataUnavailable, got {other:?}"),
    }
}

#[test]
fn missing_columns_are_named() {
    let err = load_dataset(&config("deliveries_missing_columns.csv")).unwrap_err();
    let schema = match err {
        EngineError::Schema(schema) => schema,
        other => panic!("expected a schema error, got {other:?}"),
    };
    assert_eq!(schema.missing_fields(), ["bowler", "total_runs"]);
    assert!(schema.to_string().contains("bowler, total_runs"));
}

#[test]
fn unparseable_runs_report_the_row() {
    let err = load_dataset(&config("deliveries_bad_runs.csv")).unwrap_err();
    let schema = match err {
        EngineError::Schema(schema) => schema,
        other => panic!("expected a schema error, got {other:?}"),
    };
    assert_eq!(
        schema,
        SchemaError::InvalidValue {
            table: "deliveries",
            row: 2,
            field: "batter_runs",
            value: "four".to_string(),
        }
    );
}

#[test]
fn join_keeps_every_delivery() {
    let data = load_dataset(&config("deliveries.csv")).expect("fixtures should load");
    let joined = join_on_match_id(data.deliveries(), data.matches(), &[MatchField::Winner]);
    assert_eq!(joined.len(), data.deliveries().len());

    let orphan = joined.last().expect("fixture is not empty");
    assert_eq!(orphan.delivery.match_id, 99);
    assert!(!orphan.has_match());
    assert_eq!(orphan.match_field(MatchField::Winner), None);
    assert_eq!(joined[0].match_field(MatchField::Winner), Some("A"));
}
