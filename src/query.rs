//! Every dashboard view, one function each. Views take the loaded
//! [`Dataset`](crate::dataset::Dataset) by reference and return plain
//! serializable results; an empty selection yields empty or zero-filled
//! output rather than an error.

pub use crate::query_matches::{
    MatchSummary, PlayerOfMatchAwards, TossImpact, VenueTossRow, match_summary,
    player_of_match_awards, toss_impact,
};
pub use crate::query_phases::{MatchPhaseRow, PhaseStats, match_phase_breakdown, phase_table};
pub use crate::query_players::{BatterProfile, BowlerProfile, RunsBucket, batter_profile, bowler_profile};
pub use crate::query_teams::{
    HeadToHead, HeadToHeadCounts, HeadToHeadSeason, MostSuccessfulTeam, SeasonTeamWins,
    SeasonalSummary, TeamSeasonRecord, head_to_head, most_successful_team, seasonal_summary,
    team_season_performance, team_wins_by_season,
};
pub use crate::query_venues::{
    DominantTeam, VenueDominance, VenueImpact, team_venue_wins, venue_dominance, venue_impact,
};
pub use crate::rows::{CountRow, PairCountRow};
