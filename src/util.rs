// Utility helpers for parsing and basic statistics.
//
// This module centralizes the "dirty" CSV cell handling so the rest of the
// code can assume clean, typed values.
use num_format::{Locale, ToFormattedString};
use std::cmp::Ordering;

/// `true` for the spellings the dataset uses for a missing cell.
pub fn is_missing(s: Option<&str>) -> bool {
    match s.map(str::trim) {
        None | Some("") => true,
        Some(v) => v.eq_ignore_ascii_case("NA") || v.eq_ignore_ascii_case("NaN"),
    }
}

/// Parse a nullable numeric cell.
///
/// - `Ok(None)` for blank/`NA` cells.
/// - Strips thousands separators like `","` before parsing.
/// - `Err` with a short reason for anything else that does not parse.
pub fn parse_f64_opt(s: Option<&str>) -> Result<Option<f64>, String> {
    if is_missing(s) {
        return Ok(None);
    }
    let raw = s.unwrap_or_default().trim();
    let cleaned = raw.replace(',', "");
    cleaned
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("`{}` is not a number", raw))
}

/// Parse a required integer cell; the field name goes into the error.
pub fn parse_int<T: std::str::FromStr>(s: Option<&str>, field: &str) -> Result<T, String> {
    let s = s.map(str::trim).unwrap_or_default();
    if s.is_empty() {
        return Err(format!("{} is empty", field));
    }
    s.parse::<T>()
        .map_err(|_| format!("{} `{}` is not an integer", field, s))
}

/// Owned, trimmed text cell; blank becomes an empty string.
pub fn text(s: Option<String>) -> String {
    s.map(|v| v.trim().to_string()).unwrap_or_default()
}

pub fn average(v: &[f64]) -> f64 {
    // Standard arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

fn sort_floats(v: &mut [f64]) {
    // NaN never reaches here after parsing, so equality is a fine fallback.
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
}

pub fn median(mut v: Vec<f64>) -> f64 {
    // Taken by value so the sort happens in place.
    if v.is_empty() {
        return 0.0;
    }
    sort_floats(&mut v);
    let mid = v.len() / 2;
    if v.len() % 2 == 1 {
        v[mid]
    } else {
        (v[mid - 1] + v[mid]) / 2.0
    }
}

/// Linear-interpolated quantile of an already sorted slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Min, Q1, median, Q3 and max.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiveNumber {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

pub fn five_number(mut v: Vec<f64>) -> Option<FiveNumber> {
    if v.is_empty() {
        return None;
    }
    sort_floats(&mut v);
    Some(FiveNumber {
        min: v[0],
        q1: quantile_sorted(&v, 0.25),
        median: quantile_sorted(&v, 0.5),
        q3: quantile_sorted(&v, 0.75),
        max: v[v.len() - 1],
    })
}

/// Ages are stored as floats; histograms and pivots bucket them by whole year.
pub fn whole_years(age: f64) -> i32 {
    age.round() as i32
}

pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals with locale-aware thousands separators (`1,234.50`).
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_val: i64 = parts.next().unwrap_or("0").parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = parts.next() {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Counts in console messages, e.g. `271,116 rows loaded`.
    n.to_formatted_string(&Locale::en)
}
