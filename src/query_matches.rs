use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::{FieldValue, Fields, KeyValue, Reducer, group_reduce, percentage, rank_order};
use crate::dataset::Dataset;
use crate::model::{Match, ResultType};
use crate::rows::{CountRow, PairCountRow, count_rows, pair_rows};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub id: u64,
    pub season: Option<String>,
    pub team1: String,
    pub team2: String,
    pub date: Option<NaiveDate>,
    pub venue: Option<String>,
    pub toss_winner: Option<String>,
    pub toss_decision: Option<String>,
    pub winner: Option<String>,
    pub result: ResultType,
    pub player_of_match: Option<String>,
    pub umpires: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueTossRow {
    pub venue: String,
    pub bat: i64,
    pub field: i64,
    /// Decisions other than bat/field.
    pub other: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TossImpact {
    pub matches: i64,
    pub toss_winner_won: i64,
    /// Share of all matches (including no-results) won by the toss winner.
    pub toss_winner_win_pct: f64,
    /// Decided matches per toss decision.
    pub wins_by_decision: Vec<CountRow>,
    /// (decision, winner) counts.
    pub decision_winners: Vec<PairCountRow>,
    /// Ranked by `field` choices, most first.
    pub venue_decisions: Vec<VenueTossRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerOfMatchAwards {
    /// Ranked, most awards first.
    pub awards: Vec<CountRow>,
    /// (season, player) award counts.
    pub by_season: Vec<PairCountRow>,
}

/// Fixture details for one match id; `None` when the id is unknown.
pub fn match_summary(data: &Dataset, match_id: u64) -> Option<MatchSummary> {
    let m = data.find_match(match_id)?;
    Some(MatchSummary {
        id: m.id,
        season: m.season.clone(),
        team1: m.team1.clone(),
        team2: m.team2.clone(),
        date: m.date,
        venue: m.venue.clone(),
        toss_winner: m.toss_winner.clone(),
        toss_decision: m.toss_decision.clone(),
        winner: m.winner.clone(),
        result: m.result,
        player_of_match: m.player_of_match.clone(),
        umpires: [&m.umpire1, &m.umpire2]
            .into_iter()
            .filter_map(|u| u.clone())
            .collect(),
    })
}

struct TossView<'a> {
    m: &'a Match,
    toss_winner_won: bool,
}

impl Fields for TossView<'_> {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "toss_winner_won" => FieldValue::Bool(self.toss_winner_won),
            _ => self.m.field(name),
        }
    }
}

pub fn toss_impact(data: &Dataset) -> TossImpact {
    let views: Vec<TossView<'_>> = data
        .matches()
        .iter()
        .map(|m| TossView {
            m,
            toss_winner_won: m.toss_winner.is_some() && m.toss_winner == m.winner,
        })
        .collect();

    let totals = group_reduce(
        &views,
        &[],
        &[Reducer::count("matches"), Reducer::sum("won", "toss_winner_won")],
    );
    let (matches, toss_winner_won) = totals
        .rows
        .first()
        .map_or((0, 0), |row| (totals.metric(row, "matches"), totals.metric(row, "won")));

    let by_decision = group_reduce(
        &views,
        &["toss_decision"],
        &[Reducer::count_non_absent("wins", "winner")],
    );
    let decision_winners = group_reduce(&views, &["toss_decision", "winner"], &[Reducer::count("wins")]);

    TossImpact {
        matches,
        toss_winner_won,
        toss_winner_win_pct: percentage(toss_winner_won, matches),
        wins_by_decision: count_rows(&by_decision, "wins"),
        decision_winners: pair_rows(&decision_winners, "wins"),
        venue_decisions: venue_decisions(&views),
    }
}

fn venue_decisions(views: &[TossView<'_>]) -> Vec<VenueTossRow> {
    let table = group_reduce(views, &["venue", "toss_decision"], &[Reducer::count("tosses")]);
    let mut out: Vec<VenueTossRow> = Vec::new();
    for row in &table.rows {
        let (Some(KeyValue::Text(venue)), Some(decision)) = (row.key.first(), row.key.get(1)) else {
            continue;
        };
        let count = table.metric(row, "tosses");
        // Rows arrive grouped by venue.
        if out.last().is_none_or(|last| &last.venue != venue) {
            out.push(VenueTossRow {
                venue: venue.clone(),
                bat: 0,
                field: 0,
                other: 0,
            });
        }
        let Some(slot) = out.last_mut() else { continue };
        match decision.as_str() {
            Some("bat") => slot.bat += count,
            Some("field") => slot.field += count,
            _ => slot.other += count,
        }
    }
    out.sort_by(|a, b| rank_order(a.field, &a.venue, b.field, &b.venue));
    out
}

pub fn player_of_match_awards(data: &Dataset) -> PlayerOfMatchAwards {
    let awards = group_reduce(data.matches(), &["player_of_match"], &[Reducer::count("awards")])
        .sorted_by_metric("awards");
    let by_season = group_reduce(
        data.matches(),
        &["season", "player_of_match"],
        &[Reducer::count("awards")],
    );
    PlayerOfMatchAwards {
        awards: count_rows(&awards, "awards"),
        by_season: pair_rows(&by_season, "awards"),
    }
}
