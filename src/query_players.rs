use serde::Serialize;
use tracing::debug;

use crate::aggregate::{
    FieldValue, Fields, GroupedTable, KeyValue, Reducer, bowling_average, bowling_strike_rate,
    economy, group_reduce, strike_rate,
};
use crate::dataset::Dataset;
use crate::derive::{MatchResultClass, classify_match_result, try_opponent};
use crate::join::{JoinedDelivery, MatchField, join_on_match_id};
use crate::model::Delivery;
use crate::rows::{CountRow, count_rows};

const PROFILE_MATCH_FIELDS: &[MatchField] = &[
    MatchField::Team1,
    MatchField::Team2,
    MatchField::Winner,
    MatchField::Result,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunsBucket {
    pub runs: i64,
    pub balls: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatterProfile {
    pub batter: String,
    pub total_runs: i64,
    pub balls_faced: i64,
    pub fours: i64,
    pub sixes: i64,
    pub strike_rate: f64,
    /// Balls faced per runs-off-the-bat value, ascending by runs.
    pub runs_distribution: Vec<RunsBucket>,
    /// Ranked, most runs first.
    pub runs_vs_opponent: Vec<CountRow>,
    /// Won, Lost, Tie, No Result; zero-filled.
    pub runs_by_result: Vec<CountRow>,
    /// Balls whose match is unknown or whose batting side did not take part in it.
    pub unattributed_balls: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BowlerProfile {
    pub bowler: String,
    pub balls_bowled: i64,
    pub runs_conceded: i64,
    pub wickets: i64,
    pub economy: f64,
    pub bowling_strike_rate: f64,
    pub bowling_average: f64,
    /// Deliveries per total-runs value, ascending by runs.
    pub runs_conceded_distribution: Vec<RunsBucket>,
    pub wickets_vs_opponent: Vec<CountRow>,
    pub wickets_by_result: Vec<CountRow>,
    pub unattributed_balls: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Batting,
    Bowling,
}

/// A delivery seen from one side of the ball: who that side played and how
/// the match ended for it.
struct SideView<'a> {
    joined: JoinedDelivery<'a>,
    opponent: Option<&'a str>,
    result: Option<MatchResultClass>,
}

impl<'a> SideView<'a> {
    fn new(joined: JoinedDelivery<'a>, side: Side) -> Self {
        let team = match side {
            Side::Batting => joined.delivery.batting_team.as_str(),
            Side::Bowling => joined.delivery.bowling_team.as_str(),
        };
        let opponent = match (
            joined.match_field(MatchField::Team1),
            joined.match_field(MatchField::Team2),
        ) {
            (Some(team1), Some(team2)) => try_opponent(team, team1, team2),
            _ => None,
        };
        let result = joined.matched().map(|m| classify_match_result(team, m));
        Self {
            joined,
            opponent,
            result,
        }
    }
}

impl Fields for SideView<'_> {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "opponent" => FieldValue::from_opt(self.opponent),
            "result_class" => FieldValue::from_opt(self.result.map(MatchResultClass::label)),
            _ => self.joined.field(name),
        }
    }
}

fn side_views<'a>(data: &'a Dataset, balls: &[&'a Delivery], side: Side) -> Vec<SideView<'a>> {
    join_on_match_id(balls.iter().copied(), data.matches(), PROFILE_MATCH_FIELDS)
        .into_iter()
        .map(|joined| SideView::new(joined, side))
        .collect()
}

fn is_four(v: &FieldValue<'_>) -> bool {
    matches!(v, FieldValue::Int(4))
}

fn is_six(v: &FieldValue<'_>) -> bool {
    matches!(v, FieldValue::Int(6))
}

fn single_row_metric(table: &GroupedTable, metric: &str) -> i64 {
    table.rows.first().map_or(0, |row| table.metric(row, metric))
}

fn runs_buckets(table: &GroupedTable, metric: &str) -> Vec<RunsBucket> {
    table
        .rows
        .iter()
        .filter_map(|row| {
            Some(RunsBucket {
                runs: row.key.first()?.as_i64()?,
                balls: table.metric(row, metric),
            })
        })
        .collect()
}

fn by_result_class(table: &GroupedTable, metric: &str) -> Vec<CountRow> {
    MatchResultClass::ALL
        .into_iter()
        .map(|class| {
            let key = [KeyValue::text(class.label())];
            let value = table.find(&key).map_or(0, |row| table.metric(row, metric));
            CountRow::new(class.label(), value)
        })
        .collect()
}

/// Career batting record. Opponent and result are taken from the batting
/// side's point of view; an unknown batter yields a zero-filled profile.
pub fn batter_profile(data: &Dataset, batter: &str) -> BatterProfile {
    let balls: Vec<&Delivery> = data
        .deliveries()
        .iter()
        .filter(|d| d.batter == batter)
        .collect();

    let totals = group_reduce(
        &balls,
        &[],
        &[
            Reducer::sum("runs", "batter_runs"),
            Reducer::count("balls"),
            Reducer::count_matching("fours", "batter_runs", is_four),
            Reducer::count_matching("sixes", "batter_runs", is_six),
        ],
    );
    let total_runs = single_row_metric(&totals, "runs");
    let balls_faced = single_row_metric(&totals, "balls");

    let distribution = group_reduce(&balls, &["batter_runs"], &[Reducer::count("balls")]);

    let views = side_views(data, &balls, Side::Batting);
    let vs_opponent = group_reduce(&views, &["opponent"], &[Reducer::sum("runs", "batter_runs")])
        .sorted_by_metric("runs");
    let by_result = group_reduce(&views, &["result_class"], &[Reducer::sum("runs", "batter_runs")]);
    let unattributed_balls = views.iter().filter(|v| v.opponent.is_none()).count() as i64;
    if unattributed_balls > 0 {
        debug!(batter, unattributed_balls, "balls without a resolvable opponent");
    }

    BatterProfile {
        batter: batter.to_string(),
        total_runs,
        balls_faced,
        fours: single_row_metric(&totals, "fours"),
        sixes: single_row_metric(&totals, "sixes"),
        strike_rate: strike_rate(total_runs, balls_faced),
        runs_distribution: runs_buckets(&distribution, "balls"),
        runs_vs_opponent: count_rows(&vs_opponent, "runs"),
        runs_by_result: by_result_class(&by_result, "runs"),
        unattributed_balls,
    }
}

/// Career bowling record. Every recorded dismissal on the bowler's deliveries
/// counts as a wicket; opponent and result are from the bowling side's view.
pub fn bowler_profile(data: &Dataset, bowler: &str) -> BowlerProfile {
    let balls: Vec<&Delivery> = data
        .deliveries()
        .iter()
        .filter(|d| d.bowler == bowler)
        .collect();

    let totals = group_reduce(
        &balls,
        &[],
        &[
            Reducer::count("balls"),
            Reducer::sum("runs", "total_runs"),
            Reducer::count_non_absent("wickets", "dismissal_kind"),
        ],
    );
    let balls_bowled = single_row_metric(&totals, "balls");
    let runs_conceded = single_row_metric(&totals, "runs");
    let wickets = single_row_metric(&totals, "wickets");

    let distribution = group_reduce(&balls, &["total_runs"], &[Reducer::count("balls")]);

    let views = side_views(data, &balls, Side::Bowling);
    let wickets_reducer = [Reducer::count_non_absent("wickets", "dismissal_kind")];
    let vs_opponent = group_reduce(&views, &["opponent"], &wickets_reducer).sorted_by_metric("wickets");
    let by_result = group_reduce(&views, &["result_class"], &wickets_reducer);
    let unattributed_balls = views.iter().filter(|v| v.opponent.is_none()).count() as i64;
    if unattributed_balls > 0 {
        debug!(bowler, unattributed_balls, "balls without a resolvable opponent");
    }

    BowlerProfile {
        bowler: bowler.to_string(),
        balls_bowled,
        runs_conceded,
        wickets,
        economy: economy(runs_conceded, balls_bowled),
        bowling_strike_rate: bowling_strike_rate(balls_bowled, wickets),
        bowling_average: bowling_average(runs_conceded, wickets),
        runs_conceded_distribution: runs_buckets(&distribution, "balls"),
        wickets_vs_opponent: count_rows(&vs_opponent, "wickets")
            .into_iter()
            .filter(|row| row.count > 0)
            .collect(),
        wickets_by_result: by_result_class(&by_result, "wickets"),
        unattributed_balls,
    }
}
