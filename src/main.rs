use std::env;

use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use tracing::Level;

use ipl_analytics::config::{DataConfig, flag_value, has_flag};
use ipl_analytics::query;
use ipl_analytics::{Dataset, SyntheticConfig, load_dataset, synthetic_dataset};

const USAGE: &str = "\
usage: ipl_analytics <view> [args] [--data-dir DIR] [--deliveries CSV] [--matches CSV] [--synthetic] [--seed N]

lists:    batters | bowlers | teams | venues | seasons | matches | innings <match_id>
players:  batter <name> | bowler <name>
teams:    team-wins | most-successful | team-seasons <team> | head-to-head <team1> <team2> | seasons-summary
matches:  match <id> | toss | pom
venues:   venue-impact | stadiums | team-venues <team>
phases:   phases <match_id> <batting_team> | phase-table";

/// Flags that consume the following argument.
const VALUE_FLAGS: [&str; 4] = ["--data-dir", "--deliveries", "--matches", "--seed"];

fn log_level() -> Level {
    env::var("IPL_LOG")
        .ok()
        .and_then(|raw| raw.trim().parse::<Level>().ok())
        .unwrap_or(Level::INFO)
}

/// Non-flag arguments, in order.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg.starts_with("--") {
            skip_next = VALUE_FLAGS.contains(&arg.as_str());
            continue;
        }
        out.push(arg.as_str());
    }
    out
}

fn load(args: &[String]) -> Result<Dataset> {
    if has_flag(args, "--synthetic") {
        let mut cfg = SyntheticConfig::default();
        if let Some(raw) = flag_value(args, "--seed") {
            cfg.seed = raw.parse().with_context(|| format!("invalid --seed {raw}"))?;
        }
        return Ok(synthetic_dataset(&cfg));
    }
    let cfg = DataConfig::from_env().with_args(args);
    load_dataset(&cfg).with_context(|| {
        format!(
            "loading {} and {}",
            cfg.deliveries.display(),
            cfg.matches.display()
        )
    })
}

fn arg<'a>(rest: &[&'a str], idx: usize, what: &str) -> Result<&'a str> {
    rest.get(idx)
        .copied()
        .ok_or_else(|| anyhow!("missing <{what}>\n\n{USAGE}"))
}

fn match_id_arg(rest: &[&str], idx: usize) -> Result<u64> {
    let raw = arg(rest, idx, "match_id")?;
    raw.parse().with_context(|| format!("invalid match id {raw}"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_view(data: &Dataset, view: &str, rest: &[&str]) -> Result<()> {
    match view {
        "batters" => print_json(&data.batters()),
        "bowlers" => print_json(&data.bowlers()),
        "teams" => print_json(&data.teams()),
        "venues" => print_json(&data.venues()),
        "seasons" => print_json(&data.seasons()),
        "matches" => print_json(&data.match_ids()),
        "innings" => print_json(&data.batting_teams_in_match(match_id_arg(rest, 0)?)),
        "batter" => print_json(&query::batter_profile(data, arg(rest, 0, "name")?)),
        "bowler" => print_json(&query::bowler_profile(data, arg(rest, 0, "name")?)),
        "team-wins" => print_json(&query::team_wins_by_season(data)),
        "most-successful" => print_json(&query::most_successful_team(data)),
        "team-seasons" => print_json(&query::team_season_performance(data, arg(rest, 0, "team")?)),
        "head-to-head" => print_json(&query::head_to_head(
            data,
            arg(rest, 0, "team1")?,
            arg(rest, 1, "team2")?,
        )),
        "seasons-summary" => print_json(&query::seasonal_summary(data)),
        "match" => {
            let id = match_id_arg(rest, 0)?;
            let summary = query::match_summary(data, id).ok_or_else(|| anyhow!("no match with id {id}"))?;
            print_json(&summary)
        }
        "toss" => print_json(&query::toss_impact(data)),
        "pom" => print_json(&query::player_of_match_awards(data)),
        "venue-impact" => print_json(&query::venue_impact(data)),
        "stadiums" => print_json(&query::venue_dominance(data)),
        "team-venues" => print_json(&query::team_venue_wins(data, arg(rest, 0, "team")?)),
        "phases" => print_json(&query::match_phase_breakdown(
            data,
            match_id_arg(rest, 0)?,
            arg(rest, 1, "batting_team")?,
        )),
        "phase-table" => print_json(&query::phase_table(data)),
        other => bail!("unknown view {other:?}\n\n{USAGE}"),
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(log_level())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let words = positionals(&args);
    let Some((view, rest)) = words.split_first() else {
        bail!("{USAGE}");
    };

    let data = load(&args)?;
    run_view(&data, view, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positionals_skip_flag_values() {
        let args: Vec<String> = ["phases", "--data-dir", "data", "42", "--synthetic", "Mumbai Indians"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(positionals(&args), vec!["phases", "42", "Mumbai Indians"]);
    }

    #[test]
    fn unknown_view_is_an_error() {
        let data = Dataset::default();
        assert!(run_view(&data, "nope", &[]).is_err());
        assert!(run_view(&data, "batter", &[]).is_err());
    }
}
