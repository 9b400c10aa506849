use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregate::{FieldValue, Fields};

/// One ball bowled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub match_id: u64,
    pub inning: u8,
    /// 0-based; 0..=19 in a 20-over innings.
    pub over: i32,
    pub ball: u8,
    pub batting_team: String,
    pub bowling_team: String,
    pub batter: String,
    pub bowler: String,
    pub batter_runs: u32,
    /// Runs off the ball including extras.
    pub total_runs: u32,
    pub is_wicket: bool,
    pub dismissal_kind: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    Normal,
    Tie,
    NoResult,
}

impl ResultType {
    pub fn label(self) -> &'static str {
        match self {
            ResultType::Normal => "normal",
            ResultType::Tie => "tie",
            ResultType::NoResult => "no result",
        }
    }

    /// Source files use `runs`/`wickets`/`normal` for decided games, so only
    /// the two undecided spellings are recognised.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim().to_ascii_lowercase();
        match s.as_str() {
            "tie" => ResultType::Tie,
            "no result" | "no_result" | "noresult" => ResultType::NoResult,
            _ => ResultType::Normal,
        }
    }
}

/// One fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: u64,
    pub season: Option<String>,
    pub team1: String,
    pub team2: String,
    pub venue: Option<String>,
    pub date: Option<NaiveDate>,
    pub toss_winner: Option<String>,
    pub toss_decision: Option<String>,
    /// Always absent for ties and no-results.
    pub winner: Option<String>,
    pub result: ResultType,
    pub player_of_match: Option<String>,
    pub umpire1: Option<String>,
    pub umpire2: Option<String>,
}

impl Match {
    pub fn involves(&self, team: &str) -> bool {
        self.team1 == team || self.team2 == team
    }

    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.team1 == a && self.team2 == b) || (self.team1 == b && self.team2 == a)
    }
}

impl Fields for Delivery {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "match_id" => FieldValue::Int(self.match_id as i64),
            "inning" => FieldValue::Int(i64::from(self.inning)),
            "over" => FieldValue::Int(i64::from(self.over)),
            "ball" => FieldValue::Int(i64::from(self.ball)),
            "batting_team" => FieldValue::Text(&self.batting_team),
            "bowling_team" => FieldValue::Text(&self.bowling_team),
            "batter" => FieldValue::Text(&self.batter),
            "bowler" => FieldValue::Text(&self.bowler),
            "batter_runs" => FieldValue::Int(i64::from(self.batter_runs)),
            "total_runs" => FieldValue::Int(i64::from(self.total_runs)),
            "is_wicket" => FieldValue::Bool(self.is_wicket),
            "dismissal_kind" => FieldValue::from_opt(self.dismissal_kind.as_deref()),
            _ => FieldValue::Absent,
        }
    }
}

/// `date` is not exposed as a field; group on `season` instead.
impl Fields for Match {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "id" => FieldValue::Int(self.id as i64),
            "season" => FieldValue::from_opt(self.season.as_deref()),
            "team1" => FieldValue::Text(&self.team1),
            "team2" => FieldValue::Text(&self.team2),
            "venue" => FieldValue::from_opt(self.venue.as_deref()),
            "toss_winner" => FieldValue::from_opt(self.toss_winner.as_deref()),
            "toss_decision" => FieldValue::from_opt(self.toss_decision.as_deref()),
            "winner" => FieldValue::from_opt(self.winner.as_deref()),
            "result" => FieldValue::Text(self.result.label()),
            "player_of_match" => FieldValue::from_opt(self.player_of_match.as_deref()),
            "umpire1" => FieldValue::from_opt(self.umpire1.as_deref()),
            "umpire2" => FieldValue::from_opt(self.umpire2.as_deref()),
            _ => FieldValue::Absent,
        }
    }
}
