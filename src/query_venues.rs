use serde::Serialize;

use crate::aggregate::{FieldValue, Fields, Reducer, group_reduce, rank_order, value_counts};
use crate::dataset::Dataset;
use crate::rows::{CountRow, PairCountRow, count_rows, pair_rows};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueImpact {
    /// Ranked, busiest venue first.
    pub matches_per_venue: Vec<CountRow>,
    /// (venue, team) wins.
    pub wins_by_venue: Vec<PairCountRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DominantTeam {
    pub venue: String,
    pub team: String,
    pub wins: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueDominance {
    pub venue_wins: Vec<PairCountRow>,
    /// One row per venue with at least one decided match.
    pub dominant: Vec<DominantTeam>,
    /// Ranked count of venues each team dominates.
    pub venues_dominated: Vec<CountRow>,
}

impl Fields for DominantTeam {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "venue" => FieldValue::Text(&self.venue),
            "team" => FieldValue::Text(&self.team),
            "wins" => FieldValue::Int(self.wins),
            _ => FieldValue::Absent,
        }
    }
}

fn venue_team_wins(data: &Dataset) -> Vec<PairCountRow> {
    let table = group_reduce(data.matches(), &["venue", "winner"], &[Reducer::count("wins")]);
    pair_rows(&table, "wins")
}

pub fn venue_impact(data: &Dataset) -> VenueImpact {
    VenueImpact {
        matches_per_venue: value_counts(data.matches(), "venue")
            .into_iter()
            .map(|(venue, n)| CountRow::new(venue.to_string(), n))
            .collect(),
        wins_by_venue: venue_team_wins(data),
    }
}

/// Most-winning team per venue. Equal win counts go to the alphabetically
/// first team.
pub fn venue_dominance(data: &Dataset) -> VenueDominance {
    let venue_wins = venue_team_wins(data);

    let mut dominant: Vec<DominantTeam> = Vec::new();
    for row in &venue_wins {
        let same_venue = dominant.last().is_some_and(|best| best.venue == row.group);
        if !same_venue {
            dominant.push(DominantTeam {
                venue: row.group.clone(),
                team: row.label.clone(),
                wins: row.count,
            });
            continue;
        }
        if let Some(best) = dominant.last_mut()
            && rank_order(row.count, &row.label, best.wins, &best.team).is_lt()
        {
            best.team = row.label.clone();
            best.wins = row.count;
        }
    }

    let venues_dominated = value_counts(&dominant, "team")
        .into_iter()
        .map(|(team, n)| CountRow::new(team.to_string(), n))
        .collect();

    VenueDominance {
        venue_wins,
        dominant,
        venues_dominated,
    }
}

/// Venues where `team` has won, ranked by wins.
pub fn team_venue_wins(data: &Dataset, team: &str) -> Vec<CountRow> {
    let won = data
        .matches()
        .iter()
        .filter(|m| m.winner.as_deref() == Some(team));
    let table = group_reduce(won, &["venue"], &[Reducer::count("wins")]).sorted_by_metric("wins");
    count_rows(&table, "wins")
}
