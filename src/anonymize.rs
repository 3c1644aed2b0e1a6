use crate::types::{AnonRecord, EventRecord};
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the UTF-8 bytes of `name`.
pub fn fingerprint(name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hex::encode(hasher.finalize())
}

/// Drop the name column, keeping only its fingerprint.
pub fn anonymize(records: Vec<EventRecord>) -> Vec<AnonRecord> {
    records
        .into_iter()
        .map(|r| AnonRecord {
            id: r.id,
            fingerprint: fingerprint(&r.name),
            sex: r.sex,
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
            medal: r.medal,
        })
        .collect()
}
