// Row builders shared by the unit tests.
use crate::anonymize::fingerprint;
use crate::types::{AnonRecord, EventRecord, Medal, Season, Sex};

pub fn rec(
    id: u32,
    noc: &str,
    games: &str,
    sport: &str,
    event: &str,
    medal: Option<Medal>,
) -> AnonRecord {
    let year = games[..4].parse().unwrap();
    let season = if games.ends_with("Winter") {
        Season::Winter
    } else {
        Season::Summer
    };
    AnonRecord {
        id,
        fingerprint: fingerprint(&format!("athlete-{}", id)),
        sex: Sex::Male,
        age: 25.0,
        height: 175.0,
        weight: 70.0,
        team: noc.to_string(),
        noc: noc.to_string(),
        games: games.to_string(),
        year,
        season,
        city: "Somewhere".to_string(),
        sport: sport.to_string(),
        event: event.to_string(),
        medal,
    }
}

pub fn aged(mut r: AnonRecord, age: f64) -> AnonRecord {
    r.age = age;
    r
}

pub fn female(mut r: AnonRecord) -> AnonRecord {
    r.sex = Sex::Female;
    r
}

/// A loaded (not yet anonymized) row; women's events get a female athlete.
pub fn event(
    id: u32,
    name: &str,
    noc: &str,
    games: &str,
    sport: &str,
    event: &str,
    medal: Option<Medal>,
) -> EventRecord {
    let r = rec(id, noc, games, sport, event, medal);
    EventRecord {
        id,
        name: name.to_string(),
        sex: if event.contains("Women's") {
            Sex::Female
        } else {
            Sex::Male
        },
        age: r.age,
        height: r.height,
        weight: r.weight,
        team: r.team,
        noc: r.noc,
        games: r.games,
        year: r.year,
        season: r.season,
        city: r.city,
        sport: r.sport,
        event: r.event,
        medal,
    }
}
