use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::dataset::Dataset;
use crate::model::{Delivery, Match, ResultType};

const OVERS: i32 = 20;
const BALLS_PER_OVER: u8 = 6;
const WICKETS: u32 = 10;
const BOWLERS_PER_SIDE: usize = 5;
const NO_RESULT_RATE: f64 = 0.02;
const WICKET_RATE: f64 = 0.045;
const EXTRA_RATE: f64 = 0.04;

/// Runs off the bat and their relative weight.
const RUN_WEIGHTS: [(u32, u32); 6] = [(0, 36), (1, 34), (2, 9), (3, 1), (4, 13), (6, 7)];
const DISMISSALS: [&str; 5] = ["caught", "bowled", "lbw", "run out", "stumped"];
const UMPIRES: [&str; 6] = [
    "AK Chaudhary",
    "Nitin Menon",
    "S Ravi",
    "C Shamshuddin",
    "KN Ananthapadmanabhan",
    "RJ Tucker",
];

#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub teams: Vec<String>,
    pub venues: Vec<String>,
    pub first_season: i32,
    pub seasons: u32,
    pub matches_per_season: u32,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        let owned = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect();
        Self {
            teams: owned(&[
                "Chennai Super Kings",
                "Delhi Capitals",
                "Kolkata Knight Riders",
                "Mumbai Indians",
                "Punjab Kings",
                "Rajasthan Royals",
                "Royal Challengers Bangalore",
                "Sunrisers Hyderabad",
            ]),
            venues: owned(&[
                "Eden Gardens",
                "M Chinnaswamy Stadium",
                "MA Chidambaram Stadium",
                "Wankhede Stadium",
                "Arun Jaitley Stadium",
                "Sawai Mansingh Stadium",
            ]),
            first_season: 2008,
            seasons: 3,
            matches_per_season: 24,
            seed: 7,
        }
    }
}

/// One innings worth of deliveries plus the batting side's score.
struct Innings {
    balls: Vec<Delivery>,
    total: u32,
}

struct Fixture<'a> {
    match_id: u64,
    inning: u8,
    batting: &'a str,
    bowling: &'a str,
    /// Chase target; `None` for the first innings.
    target: Option<u32>,
}

fn batter_name(team: &str, slot: u32) -> String {
    format!("{} Batter {}", short_name(team), slot + 1)
}

fn bowler_name(team: &str, slot: usize) -> String {
    format!("{} Bowler {}", short_name(team), slot + 1)
}

/// Initials, e.g. "Mumbai Indians" -> "MI".
fn short_name(team: &str) -> String {
    team.split_whitespace()
        .filter_map(|w| w.chars().next())
        .collect()
}

fn sample_runs(rng: &mut StdRng) -> u32 {
    let total: u32 = RUN_WEIGHTS.iter().map(|(_, w)| w).sum();
    let mut pick = rng.gen_range(0..total);
    for (runs, weight) in RUN_WEIGHTS {
        if pick < weight {
            return runs;
        }
        pick -= weight;
    }
    0
}

fn play_innings(rng: &mut StdRng, fx: &Fixture<'_>) -> Innings {
    let mut balls = Vec::with_capacity((OVERS as usize) * usize::from(BALLS_PER_OVER));
    let mut total = 0u32;
    let mut wickets = 0u32;
    // Batters 0 and 1 open; the next one comes in at each wicket.
    let mut on_strike = 0u32;
    let mut non_striker = 1u32;

    'overs: for over in 0..OVERS {
        let bowler = bowler_name(fx.bowling, over as usize % BOWLERS_PER_SIDE);
        for ball in 1..=BALLS_PER_OVER {
            let is_wicket = rng.gen_bool(WICKET_RATE);
            let batter_runs = if is_wicket { 0 } else { sample_runs(rng) };
            let extras = u32::from(rng.gen_bool(EXTRA_RATE));
            let dismissal_kind = if is_wicket {
                DISMISSALS.choose(rng).map(|kind| kind.to_string())
            } else {
                None
            };
            balls.push(Delivery {
                match_id: fx.match_id,
                inning: fx.inning,
                over,
                ball,
                batting_team: fx.batting.to_string(),
                bowling_team: fx.bowling.to_string(),
                batter: batter_name(fx.batting, on_strike),
                bowler: bowler.clone(),
                batter_runs,
                total_runs: batter_runs + extras,
                is_wicket,
                dismissal_kind,
            });
            total += batter_runs + extras;

            if is_wicket {
                wickets += 1;
                if wickets == WICKETS {
                    break 'overs;
                }
                on_strike = wickets + 1;
            } else if batter_runs % 2 == 1 {
                std::mem::swap(&mut on_strike, &mut non_striker);
            }
            if fx.target.is_some_and(|target| total >= target) {
                break 'overs;
            }
        }
        std::mem::swap(&mut on_strike, &mut non_striker);
    }

    Innings { balls, total }
}

fn top_scorer<'a>(balls: impl Iterator<Item = &'a Delivery>) -> Option<String> {
    let mut runs: HashMap<&str, u32> = HashMap::new();
    for d in balls {
        *runs.entry(d.batter.as_str()).or_default() += d.batter_runs;
    }
    runs.into_iter()
        .max_by(|(a_name, a), (b_name, b)| a.cmp(b).then_with(|| b_name.cmp(a_name)))
        .map(|(name, _)| name.to_string())
}

/// A seeded multi-season tournament with ball-by-ball data. The same config
/// always produces the same dataset.
pub fn synthetic_dataset(config: &SyntheticConfig) -> Dataset {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut deliveries = Vec::new();
    let mut matches = Vec::new();

    if config.teams.len() < 2 {
        debug!(teams = config.teams.len(), "need two teams for a fixture");
        return Dataset::default();
    }

    let mut next_id = 1u64;
    for offset in 0..config.seasons {
        let year = config.first_season + offset as i32;
        let opening = NaiveDate::from_ymd_opt(year, 4, 1);
        for n in 0..config.matches_per_season {
            let mut pair: Vec<&String> = config.teams.choose_multiple(&mut rng, 2).collect();
            pair.shuffle(&mut rng);
            let (team1, team2) = match pair.as_slice() {
                [a, b] => (a.as_str(), b.as_str()),
                _ => continue,
            };
            let venue = config.venues.choose(&mut rng).cloned();
            let toss_winner = if rng.gen_bool(0.5) { team1 } else { team2 };
            let toss_decision = if rng.gen_bool(0.6) { "field" } else { "bat" };
            let (first, second) = match (toss_winner == team1, toss_decision) {
                (true, "bat") | (false, "field") => (team1, team2),
                _ => (team2, team1),
            };

            let match_id = next_id;
            next_id += 1;
            let mut fixture = Match {
                id: match_id,
                season: Some(year.to_string()),
                team1: team1.to_string(),
                team2: team2.to_string(),
                venue,
                date: opening.and_then(|d| d.checked_add_days(Days::new(u64::from(n)))),
                toss_winner: Some(toss_winner.to_string()),
                toss_decision: Some(toss_decision.to_string()),
                winner: None,
                result: ResultType::NoResult,
                player_of_match: None,
                umpire1: UMPIRES.choose(&mut rng).map(|u| u.to_string()),
                umpire2: UMPIRES.choose(&mut rng).map(|u| u.to_string()),
            };

            if rng.gen_bool(NO_RESULT_RATE) {
                matches.push(fixture);
                continue;
            }

            let first_innings = play_innings(
                &mut rng,
                &Fixture {
                    match_id,
                    inning: 1,
                    batting: first,
                    bowling: second,
                    target: None,
                },
            );
            let second_innings = play_innings(
                &mut rng,
                &Fixture {
                    match_id,
                    inning: 2,
                    batting: second,
                    bowling: first,
                    target: Some(first_innings.total + 1),
                },
            );

            fixture.result = ResultType::Normal;
            fixture.winner = match first_innings.total.cmp(&second_innings.total) {
                std::cmp::Ordering::Greater => Some(first.to_string()),
                std::cmp::Ordering::Less => Some(second.to_string()),
                std::cmp::Ordering::Equal => {
                    fixture.result = ResultType::Tie;
                    None
                }
            };
            fixture.player_of_match =
                top_scorer(first_innings.balls.iter().chain(&second_innings.balls));
            deliveries.extend(first_innings.balls);
            deliveries.extend(second_innings.balls);
            matches.push(fixture);
        }
    }

    debug!(
        matches = matches.len(),
        deliveries = deliveries.len(),
        seed = config.seed,
        "generated synthetic dataset"
    );
    Dataset::new(deliveries, matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SyntheticConfig {
        SyntheticConfig {
            seasons: 2,
            matches_per_season: 6,
            ..SyntheticConfig::default()
        }
    }

    #[test]
    fn same_seed_same_dataset() {
        let a = synthetic_dataset(&small());
        let b = synthetic_dataset(&small());
        assert_eq!(a.matches(), b.matches());
        assert_eq!(a.deliveries(), b.deliveries());
    }

    #[test]
    fn fixtures_are_consistent() {
        let data = synthetic_dataset(&small());
        assert_eq!(data.matches().len(), 12);
        for m in data.matches() {
            assert_ne!(m.team1, m.team2);
            if m.result != ResultType::Normal {
                assert!(m.winner.is_none());
            }
            if let Some(w) = &m.winner {
                assert!(m.involves(w));
            }
        }
        for d in data.deliveries() {
            assert!((0..OVERS).contains(&d.over));
            let m = data.find_match(d.match_id).expect("delivery has a fixture");
            assert!(m.involves(&d.batting_team));
            assert!(m.involves(&d.bowling_team));
            assert_eq!(d.is_wicket, d.dismissal_kind.is_some());
        }
    }

    #[test]
    fn single_team_yields_empty_dataset() {
        let cfg = SyntheticConfig {
            teams: vec!["Solo XI".to_string()],
            ..small()
        };
        let data = synthetic_dataset(&cfg);
        assert!(data.matches().is_empty());
        assert!(data.deliveries().is_empty());
    }
}
