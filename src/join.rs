use std::collections::HashMap;

use crate::aggregate::{FieldValue, Fields};
use crate::model::{Delivery, Match};

/// Match columns that can be attached to a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchField {
    Season,
    Team1,
    Team2,
    Venue,
    TossWinner,
    TossDecision,
    Winner,
    Result,
    PlayerOfMatch,
}

impl MatchField {
    pub fn name(self) -> &'static str {
        match self {
            MatchField::Season => "season",
            MatchField::Team1 => "team1",
            MatchField::Team2 => "team2",
            MatchField::Venue => "venue",
            MatchField::TossWinner => "toss_winner",
            MatchField::TossDecision => "toss_decision",
            MatchField::Winner => "winner",
            MatchField::Result => "result",
            MatchField::PlayerOfMatch => "player_of_match",
        }
    }

    pub fn from_name(raw: &str) -> Option<Self> {
        [
            MatchField::Season,
            MatchField::Team1,
            MatchField::Team2,
            MatchField::Venue,
            MatchField::TossWinner,
            MatchField::TossDecision,
            MatchField::Winner,
            MatchField::Result,
            MatchField::PlayerOfMatch,
        ]
        .into_iter()
        .find(|f| f.name() == raw)
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }

    fn read(self, m: &Match) -> Option<&str> {
        match self {
            MatchField::Season => m.season.as_deref(),
            MatchField::Team1 => Some(&m.team1),
            MatchField::Team2 => Some(&m.team2),
            MatchField::Venue => m.venue.as_deref(),
            MatchField::TossWinner => m.toss_winner.as_deref(),
            MatchField::TossDecision => m.toss_decision.as_deref(),
            MatchField::Winner => m.winner.as_deref(),
            MatchField::Result => Some(m.result.label()),
            MatchField::PlayerOfMatch => m.player_of_match.as_deref(),
        }
    }
}

/// Set of requested match fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchFields(u16);

impl MatchFields {
    pub fn of(fields: &[MatchField]) -> Self {
        Self(fields.iter().fold(0, |acc, f| acc | f.bit()))
    }

    pub fn contains(self, field: MatchField) -> bool {
        self.0 & field.bit() != 0
    }
}

/// Match lookup keyed by match id. Built once per query from the (small)
/// match side; the first record wins on duplicate ids.
#[derive(Debug, Clone, Default)]
pub struct MatchIndex<'a> {
    by_id: HashMap<u64, &'a Match>,
}

impl<'a> MatchIndex<'a> {
    pub fn build(matches: &'a [Match]) -> Self {
        let mut by_id = HashMap::with_capacity(matches.len());
        for m in matches {
            by_id.entry(m.id).or_insert(m);
        }
        Self { by_id }
    }

    pub fn get(&self, id: u64) -> Option<&'a Match> {
        self.by_id.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// A delivery with the requested subset of its match attached.
#[derive(Debug, Clone, Copy)]
pub struct JoinedDelivery<'a> {
    pub delivery: &'a Delivery,
    matched: Option<&'a Match>,
    fields: MatchFields,
}

impl<'a> JoinedDelivery<'a> {
    /// Absent when the field was not requested or the match is unknown.
    pub fn match_field(&self, field: MatchField) -> Option<&'a str> {
        if !self.fields.contains(field) {
            return None;
        }
        self.matched.and_then(|m| field.read(m))
    }

    pub fn matched(&self) -> Option<&'a Match> {
        self.matched
    }

    pub fn has_match(&self) -> bool {
        self.matched.is_some()
    }
}

impl Fields for JoinedDelivery<'_> {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match MatchField::from_name(name) {
            Some(field) => FieldValue::from_opt(self.match_field(field)),
            None => self.delivery.field(name),
        }
    }
}

/// Left join: every delivery comes out exactly once, in input order, with
/// match fields absent when its match id is unknown.
pub fn join_on_match_id<'a, I>(
    deliveries: I,
    matches: &'a [Match],
    fields: &[MatchField],
) -> Vec<JoinedDelivery<'a>>
where
    I: IntoIterator<Item = &'a Delivery>,
{
    let index = MatchIndex::build(matches);
    join_with_index(deliveries, &index, fields)
}

pub fn join_with_index<'a, I>(
    deliveries: I,
    index: &MatchIndex<'a>,
    fields: &[MatchField],
) -> Vec<JoinedDelivery<'a>>
where
    I: IntoIterator<Item = &'a Delivery>,
{
    let fields = MatchFields::of(fields);
    deliveries
        .into_iter()
        .map(|delivery| JoinedDelivery {
            delivery,
            matched: index.get(delivery.match_id),
            fields,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResultType;

    fn delivery(match_id: u64, batter: &str, runs: u32) -> Delivery {
        Delivery {
            match_id,
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

    fn fixture(id: u64, winner: Option<&str>) -> Match {
        Match {
            id,
            season: Some("2020".to_string()),
            team1: "X".to_string(),
            team2: "Y".to_string(),
            venue: Some("Ground".to_string()),
            date: None,
            toss_winner: None,
            toss_decision: None,
            winner: winner.map(str::to_string),
            result: ResultType::Normal,
            player_of_match: None,
            umpire1: None,
            umpire2: None,
        }
    }

    #[test]
    fn left_join_keeps_every_delivery() {
        let deliveries = vec![delivery(1, "A", 4), delivery(2, "A", 1), delivery(1, "C", 0)];
        let matches = vec![fixture(1, Some("X"))];
        let joined = join_on_match_id(&deliveries, &matches, &[MatchField::Winner]);
        assert_eq!(joined.len(), deliveries.len());
        assert_eq!(joined[0].match_field(MatchField::Winner), Some("X"));
        assert!(!joined[1].has_match());
        assert_eq!(joined[1].match_field(MatchField::Winner), None);
        assert_eq!(joined[1].delivery.batter_runs, 1);
        assert_eq!(joined[2].delivery.batter, "C");
    }

    #[test]
    fn unrequested_fields_are_absent() {
        let deliveries = vec![delivery(1, "A", 4)];
        let matches = vec![fixture(1, Some("X"))];
        let joined = join_on_match_id(&deliveries, &matches, &[MatchField::Team1]);
        assert_eq!(joined[0].match_field(MatchField::Team1), Some("X"));
        assert_eq!(joined[0].match_field(MatchField::Venue), None);
        assert!(joined[0].field("venue").is_absent());
        assert_eq!(joined[0].field("batter"), FieldValue::Text("A"));
    }

    #[test]
    fn duplicate_ids_keep_first_match() {
        let matches = vec![fixture(1, Some("X")), fixture(1, Some("Y"))];
        let index = MatchIndex::build(&matches);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(1).and_then(|m| m.winner.as_deref()), Some("X"));
    }
}
