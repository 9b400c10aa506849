use std::collections::HashMap;

use crate::error::SchemaError;

/// One source row keyed by field name.
pub type RawRecord = HashMap<String, String>;

/// Alternate spellings seen across dataset revisions, in resolution order.
pub const FIELD_ALIASES: &[(&str, &str)] = &[
    ("striker", "batter"),
    ("batsman", "batter"),
    ("batsman_runs", "batter_runs"),
];

pub const DELIVERY_REQUIRED: &[&str] = &[
    "batter",
    "bowler",
    "batter_runs",
    "total_runs",
    "match_id",
    "over",
];

pub const MATCH_REQUIRED: &[&str] = &["id", "team1", "team2"];

pub fn fold_field_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Case-folds every name and renames known aliases. A canonical name that is
/// already present is never overwritten, and the first alias in
/// [`FIELD_ALIASES`] order claims a missing canonical name.
pub fn normalize_headers<S: AsRef<str>>(headers: &[S]) -> Vec<String> {
    let mut out: Vec<String> = headers.iter().map(|h| fold_field_name(h.as_ref())).collect();
    for (alias, canonical) in FIELD_ALIASES {
        if out.iter().any(|h| h == canonical) {
            continue;
        }
        if let Some(slot) = out.iter_mut().find(|h| h.as_str() == *alias) {
            *slot = (*canonical).to_string();
        }
    }
    out
}

pub fn check_required<S: AsRef<str>>(
    table: &'static str,
    headers: &[S],
    required: &[&str],
) -> Result<(), SchemaError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|field| !headers.iter().any(|h| h.as_ref() == **field))
        .map(|field| (*field).to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingFields {
            table,
            fields: missing,
        })
    }
}

/// Canonicalizes the field names of every record and verifies that each
/// record exposes all `required` fields. Missing fields are reported as the
/// union across records, in `required` order.
pub fn normalize_records(
    table: &'static str,
    records: Vec<RawRecord>,
    required: &[&str],
) -> Result<Vec<RawRecord>, SchemaError> {
    let mut missing: Vec<&str> = Vec::new();
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        let (names, values): (Vec<String>, Vec<String>) = record.into_iter().unzip();
        let names = normalize_headers(&names);
        let normalized: RawRecord = names.into_iter().zip(values).collect();
        for field in required {
            if !normalized.contains_key(*field) && !missing.contains(field) {
                missing.push(*field);
            }
        }
        out.push(normalized);
    }
    if !missing.is_empty() {
        let fields = required
            .iter()
            .filter(|f| missing.contains(*f))
            .map(|f| (*f).to_string())
            .collect();
        return Err(SchemaError::MissingFields { table, fields });
    }
    Ok(out)
}

/// Tokens that CSV exports use for a missing cell.
pub fn is_null_token(raw: &str) -> bool {
    let s = raw.trim();
    s.is_empty()
        || s.eq_ignore_ascii_case("na")
        || s.eq_ignore_ascii_case("nan")
        || s.eq_ignore_ascii_case("null")
        || s.eq_ignore_ascii_case("none")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn headers_are_folded_and_aliased() {
        let headers = normalize_headers(&[" Match_ID", "Striker", "BATSMAN_RUNS ", "bowler"]);
        assert_eq!(headers, vec!["match_id", "batter", "batter_runs", "bowler"]);
    }

    #[test]
    fn canonical_name_wins_over_alias() {
        let headers = normalize_headers(&["batter", "batsman"]);
        assert_eq!(headers, vec!["batter", "batsman"]);
    }

    #[test]
    fn first_alias_claims_canonical_name() {
        let headers = normalize_headers(&["batsman", "striker"]);
        assert_eq!(headers, vec!["batsman", "batter"]);
    }

    #[test]
    fn striker_records_expose_batter() {
        let rows = vec![
            record(&[
                ("match_id", "1"),
                ("striker", "A"),
                ("bowler", "B"),
                ("batsman_runs", "4"),
                ("total_runs", "4"),
                ("over", "0"),
            ]),
            record(&[
                ("match_id", "1"),
                ("striker", "C"),
                ("bowler", "B"),
                ("batsman_runs", "0"),
                ("total_runs", "1"),
                ("over", "0"),
            ]),
        ];
        let out = normalize_records("deliveries", rows, DELIVERY_REQUIRED).expect("normalizes");
        let batters: Vec<&str> = out.iter().map(|r| r["batter"].as_str()).collect();
        assert_eq!(batters, vec!["A", "C"]);
        assert!(out.iter().all(|r| !r.contains_key("striker")));
        assert_eq!(out[0]["batter_runs"], "4");
    }

    #[test]
    fn missing_fields_are_named() {
        let rows = vec![record(&[("match_id", "1"), ("batter", "A"), ("over", "0")])];
        let err = normalize_records("deliveries", rows, DELIVERY_REQUIRED).unwrap_err();
        assert_eq!(
            err.missing_fields(),
            &["bowler".to_string(), "batter_runs".to_string(), "total_runs".to_string()]
        );
    }

    #[test]
    fn null_tokens() {
        assert!(is_null_token(""));
        assert!(is_null_token(" NA "));
        assert!(is_null_token("NaN"));
        assert!(!is_null_token("caught"));
    }
}
