use serde::Serialize;

use crate::model::{Match, ResultType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Phase {
    Powerplay,
    Middle,
    Death,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Powerplay, Phase::Middle, Phase::Death];

    pub fn label(self) -> &'static str {
        match self {
            Phase::Powerplay => "Powerplay (1-6)",
            Phase::Middle => "Middle Overs (7-16)",
            Phase::Death => "Death Overs (17-20)",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Phase::ALL.into_iter().find(|p| p.label() == raw)
    }
}

/// Overs are 0-based. Anything outside 0..=19 has no phase and is left out of
/// phase aggregation.
pub fn compute_phase(over: i32) -> Option<Phase> {
    match over {
        0..=5 => Some(Phase::Powerplay),
        6..=15 => Some(Phase::Middle),
        16..=19 => Some(Phase::Death),
        _ => None,
    }
}

/// The participant that is not `subject`. When `subject` is neither team the
/// answer is `team1`; use [`try_opponent`] where that case must be detected.
pub fn compute_opponent<'a>(subject: &str, team1: &'a str, team2: &'a str) -> &'a str {
    try_opponent(subject, team1, team2).unwrap_or(team1)
}

pub fn try_opponent<'a>(subject: &str, team1: &'a str, team2: &'a str) -> Option<&'a str> {
    if subject == team1 {
        Some(team2)
    } else if subject == team2 {
        Some(team1)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum MatchResultClass {
    Won,
    Lost,
    Tie,
    NoResult,
}

impl MatchResultClass {
    pub const ALL: [MatchResultClass; 4] = [
        MatchResultClass::Won,
        MatchResultClass::Lost,
        MatchResultClass::Tie,
        MatchResultClass::NoResult,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MatchResultClass::Won => "Won",
            MatchResultClass::Lost => "Lost",
            MatchResultClass::Tie => "Tie",
            MatchResultClass::NoResult => "No Result",
        }
    }
}

/// Never yields `Tie`; see [`classify_match_result`].
pub fn classify_result(subject: &str, winner: Option<&str>) -> MatchResultClass {
    match winner {
        None => MatchResultClass::NoResult,
        Some(w) if w == subject => MatchResultClass::Won,
        Some(_) => MatchResultClass::Lost,
    }
}

/// Like [`classify_result`] but separates ties using the match result type.
pub fn classify_match_result(subject: &str, m: &Match) -> MatchResultClass {
    match m.result {
        ResultType::Tie => MatchResultClass::Tie,
        ResultType::NoResult => MatchResultClass::NoResult,
        ResultType::Normal => classify_result(subject, m.winner.as_deref()),
    }
}
