use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::config::DataConfig;
use crate::error::{EngineError, SchemaError};
use crate::model::{Delivery, Match, ResultType};
use crate::schema::{
    self, DELIVERY_REQUIRED, MATCH_REQUIRED, RawRecord, check_required, is_null_token,
    normalize_headers,
};

const DELIVERIES: &str = "deliveries";
const MATCHES: &str = "matches";

/// The immutable session handle: both tables, loaded once and passed by
/// reference into every query.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    deliveries: Vec<Delivery>,
    matches: Vec<Match>,
}

impl Dataset {
    /// Duplicate match ids keep their first record.
    pub fn new(deliveries: Vec<Delivery>, matches: Vec<Match>) -> Self {
        let mut seen = HashSet::with_capacity(matches.len());
        let before = matches.len();
        let matches: Vec<Match> = matches.into_iter().filter(|m| seen.insert(m.id)).collect();
        if matches.len() != before {
            warn!(
                dropped = before - matches.len(),
                "duplicate match ids in match table; keeping first occurrence"
            );
        }
        Self { deliveries, matches }
    }

    /// Builds a dataset from raw field maps, normalizing names first.
    pub fn from_raw(deliveries: Vec<RawRecord>, matches: Vec<RawRecord>) -> Result<Self, SchemaError> {
        let deliveries = schema::normalize_records(DELIVERIES, deliveries, DELIVERY_REQUIRED)?;
        let matches = schema::normalize_records(MATCHES, matches, MATCH_REQUIRED)?;
        Ok(Self::new(
            deliveries_from_records(&deliveries)?,
            matches_from_records(&matches)?,
        ))
    }

    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn find_match(&self, id: u64) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn batters(&self) -> Vec<String> {
        sorted_unique(self.deliveries.iter().map(|d| d.batter.as_str()))
    }

    pub fn bowlers(&self) -> Vec<String> {
        sorted_unique(self.deliveries.iter().map(|d| d.bowler.as_str()))
    }

    /// Every team that appears on either side of a fixture.
    pub fn teams(&self) -> Vec<String> {
        sorted_unique(
            self.matches
                .iter()
                .flat_map(|m| [m.team1.as_str(), m.team2.as_str()]),
        )
    }

    pub fn venues(&self) -> Vec<String> {
        sorted_unique(self.matches.iter().filter_map(|m| m.venue.as_deref()))
    }

    pub fn seasons(&self) -> Vec<String> {
        sorted_unique(self.matches.iter().filter_map(|m| m.season.as_deref()))
    }

    pub fn match_ids(&self) -> Vec<u64> {
        let ids: BTreeSet<u64> = self.matches.iter().map(|m| m.id).collect();
        ids.into_iter().collect()
    }

    /// Batting sides with at least one delivery in `match_id`.
    pub fn batting_teams_in_match(&self, match_id: u64) -> Vec<String> {
        sorted_unique(
            self.deliveries
                .iter()
                .filter(|d| d.match_id == match_id)
                .map(|d| d.batting_team.as_str()),
        )
    }
}

fn sorted_unique<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    let set: BTreeSet<&str> = items.collect();
    set.into_iter().map(str::to_string).collect()
}

/// Reads both CSV tables. A missing or unreadable file is `DataUnavailable`;
/// a table without its required columns is a `SchemaError`.
pub fn load_dataset(config: &DataConfig) -> Result<Dataset, EngineError> {
    let deliveries = read_csv_table(&config.deliveries, DELIVERIES, DELIVERY_REQUIRED)?;
    let matches = read_csv_table(&config.matches, MATCHES, MATCH_REQUIRED)?;
    let deliveries = deliveries_from_records(&deliveries)?;
    let matches = matches_from_records(&matches)?;
    info!(
        deliveries = deliveries.len(),
        matches = matches.len(),
        "loaded dataset"
    );
    Ok(Dataset::new(deliveries, matches))
}

pub fn read_csv_table(
    path: &Path,
    table: &'static str,
    required: &[&str],
) -> Result<Vec<RawRecord>, EngineError> {
    let unavailable = |reason: String| EngineError::DataUnavailable {
        path: path.to_path_buf(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|err| unavailable(err.to_string()))?;
    let headers = reader
        .headers()
        .map_err(|err| unavailable(err.to_string()))?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    let headers = normalize_headers(&headers);
    check_required(table, &headers, required)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| unavailable(err.to_string()))?;
        let row: RawRecord = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push(row);
    }
    debug!(table, rows = rows.len(), path = %path.display(), "read csv table");
    Ok(rows)
}

pub fn deliveries_from_records(records: &[RawRecord]) -> Result<Vec<Delivery>, SchemaError> {
    records
        .iter()
        .enumerate()
        .map(|(idx, rec)| -> Result<Delivery, SchemaError> {
            let row = Row {
                table: DELIVERIES,
                line: idx + 1,
                rec,
            };
            let dismissal_kind = row.text("dismissal_kind");
            let is_wicket = row
                .text("is_wicket")
                .and_then(|raw| parse_flag(&raw))
                .unwrap_or(dismissal_kind.is_some());
            Ok(Delivery {
                match_id: row.required_num("match_id")?,
                inning: row.optional_num("inning").unwrap_or(1),
                over: row.required_num("over")?,
                ball: row.optional_num("ball").unwrap_or(0),
                batting_team: row.text("batting_team").unwrap_or_default(),
                bowling_team: row.text("bowling_team").unwrap_or_default(),
                batter: row.required_text("batter")?,
                bowler: row.required_text("bowler")?,
                batter_runs: row.required_num("batter_runs")?,
                total_runs: row.required_num("total_runs")?,
                is_wicket,
                dismissal_kind,
            })
        })
        .collect()
}

pub fn matches_from_records(records: &[RawRecord]) -> Result<Vec<Match>, SchemaError> {
    let mut cleared = 0usize;
    let out = records
        .iter()
        .enumerate()
        .map(|(idx, rec)| -> Result<Match, SchemaError> {
            let row = Row {
                table: MATCHES,
                line: idx + 1,
                rec,
            };
            let mut winner = row.text("winner");
            let result = match row.text("result") {
                Some(raw) => ResultType::parse(&raw),
                None if winner.is_none() => ResultType::NoResult,
                None => ResultType::Normal,
            };
            if result != ResultType::Normal && winner.is_some() {
                winner = None;
                cleared += 1;
            }
            Ok(Match {
                id: row.required_num("id")?,
                season: row.text("season"),
                team1: row.required_text("team1")?,
                team2: row.required_text("team2")?,
                venue: row.text("venue"),
                date: row
                    .text("date")
                    .and_then(|raw| NaiveDate::parse_from_str(&raw, "%Y-%m-%d").ok()),
                toss_winner: row.text("toss_winner"),
                toss_decision: row.text("toss_decision").map(|s| s.to_lowercase()),
                winner,
                result,
                player_of_match: row.text("player_of_match"),
                umpire1: row.text("umpire1"),
                umpire2: row.text("umpire2"),
            })
        })
        .collect::<Result<Vec<_>, SchemaError>>()?;
    if cleared > 0 {
        debug!(cleared, "cleared winner on tied or abandoned matches");
    }
    Ok(out)
}

struct Row<'a> {
    table: &'static str,
    line: usize,
    rec: &'a RawRecord,
}

impl Row<'_> {
    fn text(&self, field: &str) -> Option<String> {
        let raw = self.rec.get(field)?;
        if is_null_token(raw) {
            None
        } else {
            Some(raw.trim().to_string())
        }
    }

    fn invalid(&self, field: &'static str) -> SchemaError {
        SchemaError::InvalidValue {
            table: self.table,
            row: self.line,
            field,
            value: self.rec.get(field).cloned().unwrap_or_default(),
        }
    }

    fn required_text(&self, field: &'static str) -> Result<String, SchemaError> {
        self.text(field).ok_or_else(|| self.invalid(field))
    }

    fn required_num<T: FromStr + TryFrom<i64>>(&self, field: &'static str) -> Result<T, SchemaError> {
        self.optional_num(field).ok_or_else(|| self.invalid(field))
    }

    fn optional_num<T: FromStr + TryFrom<i64>>(&self, field: &str) -> Option<T> {
        let raw = self.text(field)?;
        if let Ok(v) = raw.parse::<T>() {
            return Some(v);
        }
        // Some exports write integer columns as floats ("3.0").
        let f = raw.parse::<f64>().ok()?;
        if f.fract() != 0.0 || !f.is_finite() {
            return None;
        }
        T::try_from(f as i64).ok()
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "yes" => Some(true),
        "0" | "0.0" | "false" | "no" => Some(false),
        _ => None,
    }
}
