use serde::Serialize;

use crate::aggregate::GroupedTable;

/// One labelled count, e.g. wins per team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountRow {
    pub label: String,
    pub count: i64,
}

impl CountRow {
    pub fn new(label: impl Into<String>, count: i64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// A count keyed by two labels, e.g. wins per (venue, team).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairCountRow {
    pub group: String,
    pub label: String,
    pub count: i64,
}

/// First key column + `metric`, in table order.
pub fn count_rows(table: &GroupedTable, metric: &str) -> Vec<CountRow> {
    table
        .rows
        .iter()
        .filter_map(|row| {
            let label = row.key.first()?.to_string();
            Some(CountRow::new(label, table.metric(row, metric)))
        })
        .collect()
}

/// First two key columns + `metric`, in table order.
pub fn pair_rows(table: &GroupedTable, metric: &str) -> Vec<PairCountRow> {
    table
        .rows
        .iter()
        .filter_map(|row| {
            let group = row.key.first()?.to_string();
            let label = row.key.get(1)?.to_string();
            Some(PairCountRow {
                group,
                label,
                count: table.metric(row, metric),
            })
        })
        .collect()
}
