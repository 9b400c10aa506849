use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A single field read off a record during grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Absent,
    Int(i64),
    Bool(bool),
    Text(&'a str),
}

impl<'a> FieldValue<'a> {
    pub fn from_opt(value: Option<&'a str>) -> Self {
        value.map_or(FieldValue::Absent, FieldValue::Text)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// Numeric view used by `sum`; booleans count as 0/1.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            FieldValue::Bool(b) => Some(i64::from(*b)),
            FieldValue::Absent | FieldValue::Text(_) => None,
        }
    }

    pub fn to_key(&self) -> Option<KeyValue> {
        match self {
            FieldValue::Absent => None,
            FieldValue::Int(v) => Some(KeyValue::Int(*v)),
            FieldValue::Bool(b) => Some(KeyValue::Bool(*b)),
            FieldValue::Text(s) => Some(KeyValue::Text((*s).to_string())),
        }
    }
}

/// Named-field access for anything that can be grouped.
pub trait Fields {
    fn field(&self, name: &str) -> FieldValue<'_>;
}

impl<T: Fields + ?Sized> Fields for &T {
    fn field(&self, name: &str) -> FieldValue<'_> {
        (**self).field(name)
    }
}

/// Owned group-key component. Ordering is numeric for integers and
/// lexicographic for text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum KeyValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl KeyValue {
    pub fn text(raw: &str) -> Self {
        KeyValue::Text(raw.to_string())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            KeyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            KeyValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Bool(b) => write!(f, "{b}"),
            KeyValue::Int(v) => write!(f, "{v}"),
            KeyValue::Text(s) => f.write_str(s),
        }
    }
}

pub type Predicate = fn(&FieldValue<'_>) -> bool;

#[derive(Clone, Copy)]
pub enum ReduceOp {
    Sum,
    /// Rows in the group, regardless of the source field.
    Count,
    CountNonAbsent,
    CountMatching(Predicate),
}

impl fmt::Debug for ReduceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReduceOp::Sum => f.write_str("Sum"),
            ReduceOp::Count => f.write_str("Count"),
            ReduceOp::CountNonAbsent => f.write_str("CountNonAbsent"),
            ReduceOp::CountMatching(_) => f.write_str("CountMatching(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Reducer {
    pub output: String,
    pub source: String,
    pub op: ReduceOp,
}

impl Reducer {
    pub fn new(output: &str, source: &str, op: ReduceOp) -> Self {
        Self {
            output: output.to_string(),
            source: source.to_string(),
            op,
        }
    }

    pub fn sum(output: &str, source: &str) -> Self {
        Self::new(output, source, ReduceOp::Sum)
    }

    pub fn count(output: &str) -> Self {
        Self::new(output, "", ReduceOp::Count)
    }

    pub fn count_non_absent(output: &str, source: &str) -> Self {
        Self::new(output, source, ReduceOp::CountNonAbsent)
    }

    pub fn count_matching(output: &str, source: &str, predicate: Predicate) -> Self {
        Self::new(output, source, ReduceOp::CountMatching(predicate))
    }

    fn apply(&self, acc: &mut i64, record: &impl Fields) {
        match self.op {
            ReduceOp::Count => *acc += 1,
            ReduceOp::Sum => {
                if let Some(v) = record.field(&self.source).as_i64() {
                    *acc += v;
                }
            }
            ReduceOp::CountNonAbsent => {
                if !record.field(&self.source).is_absent() {
                    *acc += 1;
                }
            }
            ReduceOp::CountMatching(predicate) => {
                if predicate(&record.field(&self.source)) {
                    *acc += 1;
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupRow {
    pub key: Vec<KeyValue>,
    pub metrics: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupedTable {
    pub keys: Vec<String>,
    pub metrics: Vec<String>,
    pub rows: Vec<GroupRow>,
}

impl GroupedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn metric_index(&self, name: &str) -> Option<usize> {
        self.metrics.iter().position(|m| m == name)
    }

    /// 0 when the metric does not exist.
    pub fn metric(&self, row: &GroupRow, name: &str) -> i64 {
        self.metric_index(name)
            .and_then(|idx| row.metrics.get(idx).copied())
            .unwrap_or(0)
    }

    pub fn find(&self, key: &[KeyValue]) -> Option<&GroupRow> {
        self.rows.iter().find(|row| row.key == key)
    }

    /// Descending by `metric`, ties broken by ascending group key.
    pub fn sorted_by_metric(mut self, metric: &str) -> Self {
        if let Some(idx) = self.metric_index(metric) {
            self.rows.sort_by(|a, b| rank_order(a.metrics[idx], &a.key, b.metrics[idx], &b.key));
        }
        self
    }
}

/// Ranking order shared by every sorted view: larger value first, then the
/// smaller key.
pub fn rank_order<K: Ord + ?Sized>(a_value: i64, a_key: &K, b_value: i64, b_key: &K) -> Ordering {
    b_value.cmp(&a_value).then_with(|| a_key.cmp(b_key))
}

/// Groups `records` by `group_keys` (in the given order) and reduces each
/// group with `reducers`. Records whose key fields are absent are skipped.
/// Rows come out in ascending key order.
pub fn group_reduce<I>(records: I, group_keys: &[&str], reducers: &[Reducer]) -> GroupedTable
where
    I: IntoIterator,
    I::Item: Fields,
{
    let mut groups: BTreeMap<Vec<KeyValue>, Vec<i64>> = BTreeMap::new();
    'records: for record in records {
        let mut key = Vec::with_capacity(group_keys.len());
        for name in group_keys {
            let Some(part) = record.field(name).to_key() else {
                continue 'records;
            };
            key.push(part);
        }
        let acc = groups
            .entry(key)
            .or_insert_with(|| vec![0; reducers.len()]);
        for (slot, reducer) in acc.iter_mut().zip(reducers) {
            reducer.apply(slot, &record);
        }
    }

    GroupedTable {
        keys: group_keys.iter().map(|k| (*k).to_string()).collect(),
        metrics: reducers.iter().map(|r| r.output.clone()).collect(),
        rows: groups
            .into_iter()
            .map(|(key, metrics)| GroupRow { key, metrics })
            .collect(),
    }
}

/// Shorthand for a single-key row count, ranked.
pub fn value_counts<I>(records: I, field: &str) -> Vec<(KeyValue, i64)>
where
    I: IntoIterator,
    I::Item: Fields,
{
    group_reduce(records, &[field], &[Reducer::count("count")])
        .sorted_by_metric("count")
        .rows
        .into_iter()
        .filter_map(|row| {
            let count = row.metrics.first().copied()?;
            let key = row.key.into_iter().next()?;
            Some((key, count))
        })
        .collect()
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// `num / den`, or 0 when the denominator is zero.
pub fn safe_ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

/// Runs per 100 balls.
pub fn strike_rate(runs: i64, balls: i64) -> f64 {
    round2(safe_ratio(runs as f64 * 100.0, balls as f64))
}

/// Runs per six balls.
pub fn economy(runs: i64, balls: i64) -> f64 {
    round2(safe_ratio(runs as f64 * 6.0, balls as f64))
}

pub fn run_rate(runs: i64, balls: i64) -> f64 {
    economy(runs, balls)
}

pub fn bowling_average(runs: i64, wickets: i64) -> f64 {
    round2(safe_ratio(runs as f64, wickets as f64))
}

pub fn bowling_strike_rate(balls: i64, wickets: i64) -> f64 {
    round2(safe_ratio(balls as f64, wickets as f64))
}

pub fn percentage(part: i64, whole: i64) -> f64 {
    round2(safe_ratio(part as f64 * 100.0, whole as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        team: &'static str,
        phase: Option<&'static str>,
        runs: i64,
        out: bool,
    }

    impl Fields for Row {
        fn field(&self, name: &str) -> FieldValue<'_> {
            match name {
                "team" => FieldValue::Text(self.team),
                "phase" => FieldValue::from_opt(self.phase),
                "runs" => FieldValue::Int(self.runs),
                "out" => FieldValue::Bool(self.out),
                _ => FieldValue::Absent,
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { team: "B", phase: Some("pp"), runs: 4, out: false },
            Row { team: "A", phase: Some("pp"), runs: 6, out: true },
            Row { team: "B", phase: Some("death"), runs: 2, out: true },
            Row { team: "A", phase: None, runs: 1, out: false },
        ]
    }

    fn is_boundary(v: &FieldValue<'_>) -> bool {
        matches!(v, FieldValue::Int(4) | FieldValue::Int(6))
    }

    #[test]
    fn groups_in_key_order_and_skips_absent_keys() {
        let table = group_reduce(
            &rows(),
            &["team", "phase"],
            &[
                Reducer::sum("runs", "runs"),
                Reducer::count("balls"),
                Reducer::sum("wickets", "out"),
                Reducer::count_matching("boundaries", "runs", is_boundary),
            ],
        );
        assert_eq!(table.keys, vec!["team", "phase"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[0].key, vec![KeyValue::text("A"), KeyValue::text("pp")]);
        assert_eq!(table.rows[0].metrics, vec![6, 1, 1, 1]);
        assert_eq!(table.rows[1].key, vec![KeyValue::text("B"), KeyValue::text("death")]);
        assert_eq!(table.rows[2].metrics, vec![4, 1, 0, 1]);
    }

    #[test]
    fn count_non_absent_ignores_missing_values() {
        let table = group_reduce(&rows(), &["team"], &[Reducer::count_non_absent("phased", "phase")]);
        let a = table.find(&[KeyValue::text("A")]).expect("team A");
        assert_eq!(table.metric(a, "phased"), 1);
    }

    #[test]
    fn equal_metrics_sort_by_ascending_key() {
        let table = group_reduce(&rows(), &["team"], &[Reducer::count("balls")]).sorted_by_metric("balls");
        let keys: Vec<String> = table.rows.iter().map(|r| r.key[0].to_string()).collect();
        assert_eq!(keys, vec!["A", "B"]);

        let table = group_reduce(&rows(), &["team"], &[Reducer::sum("runs", "runs")]).sorted_by_metric("runs");
        assert_eq!(table.rows[0].key, vec![KeyValue::text("A")]);
        assert_eq!(table.metric(&table.rows[0], "runs"), 7);
    }

    #[test]
    fn ratios_guard_zero_denominators() {
        assert_eq!(strike_rate(4, 2), 200.0);
        assert_eq!(strike_rate(10, 0), 0.0);
        assert_eq!(economy(12, 6), 12.0);
        assert_eq!(economy(12, 0), 0.0);
        assert_eq!(bowling_average(30, 0), 0.0);
        assert_eq!(bowling_strike_rate(24, 0), 0.0);
        assert_eq!(bowling_strike_rate(25, 3), 8.33);
        assert_eq!(percentage(1, 3), 33.33);
    }
}
