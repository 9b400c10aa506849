use serde::Serialize;
use tracing::debug;

use crate::aggregate::{
    FieldValue, Fields, GroupRow, GroupedTable, Reducer, group_reduce, value_counts,
};
use crate::dataset::Dataset;
use crate::derive::{MatchResultClass, classify_match_result};
use crate::model::Match;
use crate::rows::{CountRow, PairCountRow, count_rows, pair_rows};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonTeamWins {
    pub season: String,
    pub team: String,
    pub wins: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MostSuccessfulTeam {
    pub leader: Option<CountRow>,
    /// Ranked, most wins first.
    pub table: Vec<CountRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamSeasonRecord {
    pub season: String,
    pub played: i64,
    pub wins: i64,
    pub losses: i64,
    pub ties: i64,
    pub no_results: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct HeadToHeadCounts {
    pub matches: i64,
    pub wins_team1: i64,
    pub wins_team2: i64,
    pub ties: i64,
    pub no_result: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadToHeadSeason {
    pub season: String,
    #[serde(flatten)]
    pub counts: HeadToHeadCounts,
}

/// Contingency between two teams. Every match lands in exactly one bucket, so
/// the four counts add up to `counts.matches`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadToHead {
    pub team1: String,
    pub team2: String,
    #[serde(flatten)]
    pub counts: HeadToHeadCounts,
    pub by_season: Vec<HeadToHeadSeason>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonalSummary {
    /// Ascending by season.
    pub matches_per_season: Vec<CountRow>,
    pub winners_per_season: Vec<SeasonTeamWins>,
    /// Ranked, most wins first.
    pub overall_wins: Vec<CountRow>,
}

fn season_team_wins(table: &GroupedTable) -> Vec<SeasonTeamWins> {
    pair_rows(table, "wins")
        .into_iter()
        .map(|PairCountRow { group, label, count }| SeasonTeamWins {
            season: group,
            team: label,
            wins: count,
        })
        .collect()
}

/// Wins per (season, winner). Matches without a winner are left out.
pub fn team_wins_by_season(data: &Dataset) -> Vec<SeasonTeamWins> {
    let table = group_reduce(data.matches(), &["season", "winner"], &[Reducer::count("wins")]);
    season_team_wins(&table)
}

pub fn most_successful_team(data: &Dataset) -> MostSuccessfulTeam {
    let table: Vec<CountRow> = value_counts(data.matches(), "winner")
        .into_iter()
        .map(|(team, wins)| CountRow::new(team.to_string(), wins))
        .collect();
    MostSuccessfulTeam {
        leader: table.first().cloned(),
        table,
    }
}

/// A match seen from one team's side.
struct TeamMatch<'a> {
    m: &'a Match,
    class: MatchResultClass,
}

impl Fields for TeamMatch<'_> {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "result_class" => FieldValue::Text(self.class.label()),
            _ => self.m.field(name),
        }
    }
}

fn is_won(v: &FieldValue<'_>) -> bool {
    matches!(v, FieldValue::Text("Won"))
}

fn is_lost(v: &FieldValue<'_>) -> bool {
    matches!(v, FieldValue::Text("Lost"))
}

fn is_tie(v: &FieldValue<'_>) -> bool {
    matches!(v, FieldValue::Text("Tie"))
}

fn is_no_result(v: &FieldValue<'_>) -> bool {
    matches!(v, FieldValue::Text("No Result"))
}

/// Season-by-season record for `team`. Seasons the team did not play are
/// absent; an unknown team yields an empty list.
pub fn team_season_performance(data: &Dataset, team: &str) -> Vec<TeamSeasonRecord> {
    let rows: Vec<TeamMatch<'_>> = data
        .matches()
        .iter()
        .filter(|m| m.involves(team))
        .map(|m| TeamMatch {
            m,
            class: classify_match_result(team, m),
        })
        .collect();
    let table = group_reduce(
        &rows,
        &["season"],
        &[
            Reducer::count("played"),
            Reducer::count_matching("wins", "result_class", is_won),
            Reducer::count_matching("losses", "result_class", is_lost),
            Reducer::count_matching("ties", "result_class", is_tie),
            Reducer::count_matching("no_results", "result_class", is_no_result),
        ],
    );
    table
        .rows
        .iter()
        .filter_map(|row| {
            Some(TeamSeasonRecord {
                season: row.key.first()?.to_string(),
                played: table.metric(row, "played"),
                wins: table.metric(row, "wins"),
                losses: table.metric(row, "losses"),
                ties: table.metric(row, "ties"),
                no_results: table.metric(row, "no_results"),
            })
        })
        .collect()
}

const OUTCOME_TEAM1: &str = "team1";
const OUTCOME_TEAM2: &str = "team2";
const OUTCOME_TIE: &str = "tie";
const OUTCOME_NO_RESULT: &str = "no_result";

/// A match between the selected pair, tagged with exactly one outcome.
struct PairMatch<'a> {
    m: &'a Match,
    outcome: &'static str,
}

impl Fields for PairMatch<'_> {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "outcome" => FieldValue::Text(self.outcome),
            _ => self.m.field(name),
        }
    }
}

fn is_team1_win(v: &FieldValue<'_>) -> bool {
    matches!(v, FieldValue::Text(OUTCOME_TEAM1))
}

fn is_team2_win(v: &FieldValue<'_>) -> bool {
    matches!(v, FieldValue::Text(OUTCOME_TEAM2))
}

fn is_pair_tie(v: &FieldValue<'_>) -> bool {
    matches!(v, FieldValue::Text(OUTCOME_TIE))
}

fn is_pair_no_result(v: &FieldValue<'_>) -> bool {
    matches!(v, FieldValue::Text(OUTCOME_NO_RESULT))
}

fn pair_outcome(team1: &str, team2: &str, m: &Match) -> &'static str {
    match classify_match_result(team1, m) {
        MatchResultClass::Won => OUTCOME_TEAM1,
        MatchResultClass::Tie => OUTCOME_TIE,
        MatchResultClass::NoResult => OUTCOME_NO_RESULT,
        MatchResultClass::Lost if m.winner.as_deref() == Some(team2) => OUTCOME_TEAM2,
        MatchResultClass::Lost => {
            debug!(match_id = m.id, winner = ?m.winner, "winner is neither head-to-head side");
            OUTCOME_NO_RESULT
        }
    }
}

fn pair_counts(table: &GroupedTable, row: &GroupRow) -> HeadToHeadCounts {
    HeadToHeadCounts {
        matches: table.metric(row, "matches"),
        wins_team1: table.metric(row, "wins_team1"),
        wins_team2: table.metric(row, "wins_team2"),
        ties: table.metric(row, "ties"),
        no_result: table.metric(row, "no_result"),
    }
}

/// Head-to-head record over every fixture between the two teams, in either
/// home/away order, plus the same contingency per season.
pub fn head_to_head(data: &Dataset, team1: &str, team2: &str) -> HeadToHead {
    let rows: Vec<PairMatch<'_>> = data
        .matches()
        .iter()
        .filter(|m| m.is_between(team1, team2))
        .map(|m| PairMatch {
            m,
            outcome: pair_outcome(team1, team2, m),
        })
        .collect();

    let reducers = [
        Reducer::count("matches"),
        Reducer::count_matching("wins_team1", "outcome", is_team1_win),
        Reducer::count_matching("wins_team2", "outcome", is_team2_win),
        Reducer::count_matching("ties", "outcome", is_pair_tie),
        Reducer::count_matching("no_result", "outcome", is_pair_no_result),
    ];
    let totals = group_reduce(&rows, &[], &reducers);
    let counts = totals
        .rows
        .first()
        .map(|row| pair_counts(&totals, row))
        .unwrap_or_default();

    let seasons = group_reduce(&rows, &["season"], &reducers);
    let by_season = seasons
        .rows
        .iter()
        .filter_map(|row| {
            Some(HeadToHeadSeason {
                season: row.key.first()?.to_string(),
                counts: pair_counts(&seasons, row),
            })
        })
        .collect();

    HeadToHead {
        team1: team1.to_string(),
        team2: team2.to_string(),
        counts,
        by_season,
    }
}

pub fn seasonal_summary(data: &Dataset) -> SeasonalSummary {
    let per_season = group_reduce(data.matches(), &["season"], &[Reducer::count("matches")]);
    SeasonalSummary {
        matches_per_season: count_rows(&per_season, "matches"),
        winners_per_season: team_wins_by_season(data),
        overall_wins: most_successful_team(data).table,
    }
}
