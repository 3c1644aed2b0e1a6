//! Medal and participant de-duplication.
//!
//! Team events list every squad member as a medal row. Two keys are used,
//! each for one meaning:
//!
//! - team medal: `(games, event, medal)`, one row per medal awarded;
//! - athlete medal: `(games, event, medal, id)`, one row per medalist.
//!
//! All functions keep the first occurrence and the input order.
use crate::types::{AnonRecord, Medal};
use std::collections::HashSet;
use std::hash::Hash;

fn unique_by<'a, K, F>(rows: &'a [AnonRecord], key: F) -> Vec<AnonRecord>
where
    K: Eq + Hash,
    F: Fn(&'a AnonRecord) -> Option<K>,
{
    let mut seen: HashSet<K> = HashSet::new();
    rows.iter()
        .filter(|r| key(*r).map(|k| seen.insert(k)).unwrap_or(false))
        .cloned()
        .collect()
}

/// One row per medal awarded, regardless of team size.
pub fn unique_team_medals(rows: &[AnonRecord]) -> Vec<AnonRecord> {
    unique_by(rows, |r| {
        r.medal
            .map(|m| (r.games.as_str(), r.event.as_str(), m))
    })
}

/// One row per medal-winning athlete appearance.
pub fn unique_athlete_medals(rows: &[AnonRecord]) -> Vec<AnonRecord> {
    unique_by(rows, |r| {
        r.medal
            .map(|m| (r.games.as_str(), r.event.as_str(), m, r.id))
    })
}

/// One row per athlete per games; the basis for participant counts.
pub fn unique_participants(rows: &[AnonRecord]) -> Vec<AnonRecord> {
    unique_by(rows, |r| Some((r.games.as_str(), r.id)))
}

/// Year encoded in a games label such as `"1956 Winter"`.
pub fn games_year(games: &str) -> Option<i32> {
    games.get(..4)?.parse().ok()
}

/// The games year of a row, falling back to its `Year` column.
pub fn row_year(r: &AnonRecord) -> i32 {
    games_year(&r.games).unwrap_or(r.year)
}

pub fn count_by_medal(rows: &[AnonRecord]) -> [usize; 3] {
    let mut counts = [0usize; 3];
    for r in rows {
        match r.medal {
            Some(Medal::Gold) => counts[0] += 1,
            Some(Medal::Silver) => counts[1] += 1,
            Some(Medal::Bronze) => counts[2] += 1,
            None => {}
        }
    }
    counts
}
