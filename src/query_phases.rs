use serde::Serialize;

use crate::aggregate::{FieldValue, Fields, GroupRow, GroupedTable, Reducer, group_reduce, run_rate};
use crate::dataset::Dataset;
use crate::derive::{Phase, compute_phase};
use crate::model::Delivery;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseStats {
    pub phase: Phase,
    pub label: &'static str,
    pub runs: i64,
    pub balls: i64,
    pub wickets: i64,
    pub run_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchPhaseRow {
    pub match_id: u64,
    pub batting_team: String,
    #[serde(flatten)]
    pub stats: PhaseStats,
}

/// A delivery tagged with its phase. The phase is exposed as its ordinal so
/// grouped rows come out in Powerplay, Middle, Death order.
struct PhasedDelivery<'a> {
    delivery: &'a Delivery,
    phase: Option<Phase>,
}

impl Fields for PhasedDelivery<'_> {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "phase" => self
                .phase
                .map_or(FieldValue::Absent, |p| FieldValue::Int(p as i64)),
            _ => self.delivery.field(name),
        }
    }
}

fn phased<'a>(balls: impl Iterator<Item = &'a Delivery>) -> Vec<PhasedDelivery<'a>> {
    balls
        .map(|delivery| PhasedDelivery {
            delivery,
            phase: compute_phase(delivery.over),
        })
        .collect()
}

fn phase_reducers() -> [Reducer; 3] {
    [
        Reducer::sum("runs", "batter_runs"),
        Reducer::count("balls"),
        Reducer::sum("wickets", "is_wicket"),
    ]
}

fn phase_stats(table: &GroupedTable, row: &GroupRow, phase_col: usize) -> Option<PhaseStats> {
    let ordinal = usize::try_from(row.key.get(phase_col)?.as_i64()?).ok()?;
    let phase = *Phase::ALL.get(ordinal)?;
    let runs = table.metric(row, "runs");
    let balls = table.metric(row, "balls");
    Some(PhaseStats {
        phase,
        label: phase.label(),
        runs,
        balls,
        wickets: table.metric(row, "wickets"),
        run_rate: run_rate(runs, balls),
    })
}

/// Per-phase batting for one side in one match. Phases the side never batted
/// in are left out; overs outside the 20-over range are ignored.
pub fn match_phase_breakdown(data: &Dataset, match_id: u64, batting_team: &str) -> Vec<PhaseStats> {
    let balls = phased(
        data.deliveries()
            .iter()
            .filter(|d| d.match_id == match_id && d.batting_team == batting_team),
    );
    let table = group_reduce(&balls, &["phase"], &phase_reducers());
    table
        .rows
        .iter()
        .filter_map(|row| phase_stats(&table, row, 0))
        .collect()
}

/// The full (match, batting side, phase) table.
pub fn phase_table(data: &Dataset) -> Vec<MatchPhaseRow> {
    let balls = phased(data.deliveries().iter());
    let table = group_reduce(
        &balls,
        &["match_id", "batting_team", "phase"],
        &phase_reducers(),
    );
    table
        .rows
        .iter()
        .filter_map(|row| {
            Some(MatchPhaseRow {
                match_id: u64::try_from(row.key.first()?.as_i64()?).ok()?,
                batting_team: row.key.get(1)?.to_string(),
                stats: phase_stats(&table, row, 2)?,
            })
        })
        .collect()
}
