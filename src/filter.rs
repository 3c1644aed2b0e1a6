//! Country and sport scopes. Each returns a fresh `Vec` in source order; an
//! unknown code simply matches nothing.
use crate::types::AnonRecord;

pub fn scope_to_country(rows: &[AnonRecord], noc: &str) -> Vec<AnonRecord> {
    rows.iter().filter(|r| r.noc == noc).cloned().collect()
}

pub fn scope_to_sport(rows: &[AnonRecord], sport: &str) -> Vec<AnonRecord> {
    rows.iter().filter(|r| r.sport == sport).cloned().collect()
}

/// Every row whose sport is not `sport`.
pub fn exclude_sport(rows: &[AnonRecord], sport: &str) -> Vec<AnonRecord> {
    rows.iter().filter(|r| r.sport != sport).cloned().collect()
}
