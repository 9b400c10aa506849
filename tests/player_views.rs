use std::path::PathBuf;

use ipl_analytics::query::{CountRow, RunsBucket, batter_profile, bowler_profile};
use ipl_analytics::{DataConfig, Dataset, Delivery, Match, ResultType, load_dataset};

fn fixture_dataset() -> Dataset {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures");
    load_dataset(&DataConfig::in_dir(dir)).expect("fixtures should load")
}

fn rows(pairs: &[(&str, i64)]) -> Vec<CountRow> {
    pairs.iter().map(|(label, n)| CountRow::new(*label, *n)).collect()
}

fn ball(batter: &str, runs: u32) -> Delivery {
    Delivery {
        match_id: 1,
        inning: 1,
        over: 0,
        ball: 1,
        batting_team: "X".to_string(),
        bowling_team: "Y".to_string(),
        batter: batter.to_string(),
        bowler: "B".to_string(),
        batter_runs: runs,
        total_runs: runs,
        is_wicket: false,
        dismissal_kind: None,
    }
}

#[test]
fn two_ball_innings_strike_rate() {
    let fixture = Match {
        id: 1,
        season: None,
        team1: "X".to_string(),
        team2: "Y".to_string(),
        venue: None,
        date: None,
        toss_winner: None,
        toss_decision: None,
        winner: Some("X".to_string()),
        result: ResultType::Normal,
        player_of_match: None,
        umpire1: None,
        umpire2: None,
    };
    let data = Dataset::new(vec![ball("A", 4), ball("A", 0)], vec![fixture]);
    let profile = batter_profile(&data, "A");
    assert_eq!(profile.total_runs, 4);
    assert_eq!(profile.balls_faced, 2);
    assert_eq!(profile.strike_rate, 200.0);
    assert_eq!(profile.runs_vs_opponent, rows(&[("Y", 4)]));
    assert_eq!(
        profile.runs_by_result,
        rows(&[("Won", 4), ("Lost", 0), ("Tie", 0), ("No Result", 0)])
    );
}

#[test]
fn batter_profile_from_fixtures() {
    let data = fixture_dataset();
    let profile = batter_profile(&data, "P1");
    assert_eq!(profile.total_runs, 9);
    assert_eq!(profile.balls_faced, 6);
    assert_eq!(profile.fours, 1);
    assert_eq!(profile.sixes, 0);
    assert_eq!(profile.strike_rate, 150.0);
    assert_eq!(
        profile.runs_distribution,
        vec![
            RunsBucket { runs: 0, balls: 2 },
            RunsBucket { runs: 1, balls: 1 },
            RunsBucket { runs: 2, balls: 2 },
            RunsBucket { runs: 4, balls: 1 },
        ]
    );
    // The ball from match 99 has no fixture, so it has no opponent or result.
    assert_eq!(profile.runs_vs_opponent, rows(&[("B", 7)]));
    assert_eq!(profile.unattributed_balls, 1);
    assert_eq!(
        profile.runs_by_result,
        rows(&[("Won", 4), ("Lost", 2), ("Tie", 1), ("No Result", 0)])
    );
}

#[test]
fn unknown_batter_is_zero_filled() {
    let data = fixture_dataset();
    let profile = batter_profile(&data, "Nobody");
    assert_eq!(profile.total_runs, 0);
    assert_eq!(profile.balls_faced, 0);
    assert_eq!(profile.strike_rate, 0.0);
    assert!(profile.runs_distribution.is_empty());
    assert!(profile.runs_vs_opponent.is_empty());
    assert_eq!(profile.runs_by_result.len(), 4);
    assert!(profile.runs_by_result.iter().all(|row| row.count == 0));
}

#[test]
fn bowler_profile_from_fixtures() {
    let data = fixture_dataset();
    let profile = bowler_profile(&data, "Q2");
    assert_eq!(profile.balls_bowled, 8);
    assert_eq!(profile.runs_conceded, 21);
    assert_eq!(profile.wickets, 1);
    assert_eq!(profile.economy, 15.75);
    assert_eq!(profile.bowling_strike_rate, 8.0);
    assert_eq!(profile.bowling_average, 21.0);
    assert_eq!(profile.wickets_vs_opponent, rows(&[("A", 1)]));
    assert_eq!(
        profile.wickets_by_result,
        rows(&[("Won", 1), ("Lost", 0), ("Tie", 0), ("No Result", 0)])
    );
    assert_eq!(profile.unattributed_balls, 1);
}

#[test]
fn run_outs_count_for_the_bowler() {
    let data = fixture_dataset();
    let profile = bowler_profile(&data, "P3");
    assert_eq!(profile.balls_bowled, 4);
    assert_eq!(profile.wickets, 1);
    assert_eq!(profile.wickets_vs_opponent, rows(&[("B", 1)]));
}

#[test]
fn wicketless_bowler_ratios_are_zero() {
    let data = fixture_dataset();
    let profile = bowler_profile(&data, "R3");
    assert_eq!(profile.balls_bowled, 1);
    assert_eq!(profile.runs_conceded, 3);
    assert_eq!(profile.economy, 18.0);
    assert_eq!(profile.bowling_average, 0.0);
    assert_eq!(profile.bowling_strike_rate, 0.0);
    assert!(profile.wickets_vs_opponent.is_empty());
}
