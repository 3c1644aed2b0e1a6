//! Grouped summaries behind every view.
//!
//! Each function is a pure function of its input slice. Output order is
//! always an explicit sort applied after grouping, and an empty input gives
//! an empty `Vec`.
use crate::dedup::{row_year, unique_athlete_medals, unique_participants, unique_team_medals};
use crate::filter::{exclude_sport, scope_to_sport};
use crate::types::{
    ActiveYearsRow, ActivitySpanRow, AgeCountRow, AgeMedalRow, AgeSummaryRow, AnonRecord,
    CountryMedalRow, CountryMedalTypeRow, EventHeatmapRow, GroupAgeRow, GroupMeanAgeRow,
    GroupYearMedalRow, Medal, MedalCountRow, MedalTypeYearRow, MedalistAgeRow, ParticipantRow,
    Season, SeasonMedalRow, Sex, SexYearRow, SportMedalRow, SportYearMedalRow, YearMedalRow,
};
use crate::util::{average, five_number, round1, whole_years};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Comparison group label for "every sport but the selected one".
pub const OTHER_SPORTS: &str = "Other sports";
/// Comparison group label for "every country but the scoped one".
pub const OTHER_COUNTRIES: &str = "Other";

/// Ages of zero or below are placeholders, not ages.
fn has_age(r: &AnonRecord) -> bool {
    r.age > 0.0
}

/// Counts with one column per category, keyed and sorted by `K`.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable<K, C> {
    pub categories: Vec<C>,
    pub rows: Vec<(K, Vec<usize>)>,
}

/// One (key, category, value) cell of a reshaped `WideTable`.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRow<K, C> {
    pub key: K,
    pub category: C,
    pub value: usize,
}

impl<K: Ord + Clone, C: PartialEq + Clone> WideTable<K, C> {
    /// Count `(key, category)` pairs. Pairs whose category is not listed are
    /// dropped.
    pub fn count<I>(categories: Vec<C>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, C)>,
    {
        let mut acc: BTreeMap<K, Vec<usize>> = BTreeMap::new();
        for (key, cat) in pairs {
            if let Some(col) = categories.iter().position(|c| *c == cat) {
                acc.entry(key).or_insert_with(|| vec![0; categories.len()])[col] += 1;
            }
        }
        WideTable {
            categories,
            rows: acc.into_iter().collect(),
        }
    }

    /// Melt to one row per (key, category), zeros included.
    pub fn to_long(&self) -> Vec<LongRow<K, C>> {
        self.rows
            .iter()
            .flat_map(|(key, values)| {
                self.categories
                    .iter()
                    .zip(values)
                    .map(move |(cat, v)| LongRow {
                        key: key.clone(),
                        category: cat.clone(),
                        value: *v,
                    })
            })
            .collect()
    }

    /// Pivot long rows back, summing duplicates.
    pub fn from_long(categories: Vec<C>, long: &[LongRow<K, C>]) -> Self {
        let mut acc: BTreeMap<K, Vec<usize>> = BTreeMap::new();
        for row in long {
            if let Some(col) = categories.iter().position(|c| *c == row.category) {
                acc.entry(row.key.clone())
                    .or_insert_with(|| vec![0; categories.len()])[col] += row.value;
            }
        }
        WideTable {
            categories,
            rows: acc.into_iter().collect(),
        }
    }

    pub fn column_totals(&self) -> Vec<usize> {
        let mut totals = vec![0; self.categories.len()];
        for (_, values) in &self.rows {
            for (t, v) in totals.iter_mut().zip(values) {
                *t += v;
            }
        }
        totals
    }

    pub fn grand_total(&self) -> usize {
        self.column_totals().iter().sum()
    }

}

fn medal_columns() -> Vec<Medal> {
    Medal::ALL.to_vec()
}

/// Medals per NOC over the globally de-duplicated medal set, top `k`.
pub fn medals_by_country_top(
    global_unique: &[AnonRecord],
    k: usize,
    highlight: &str,
) -> Vec<CountryMedalRow> {
    let mut map: HashMap<&str, usize> = HashMap::new();
    for r in global_unique.iter().filter(|r| r.medal.is_some()) {
        *map.entry(r.noc.as_str()).or_default() += 1;
    }
    let mut tmp: Vec<(&str, usize)> = map.into_iter().collect();
    tmp.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    tmp.into_iter()
        .take(k)
        .enumerate()
        .map(|(idx, (noc, medals))| CountryMedalRow {
            rank: idx + 1,
            noc: noc.to_string(),
            medals,
            highlighted: noc == highlight,
        })
        .collect()
}

/// Team medals per games year, de-duplicated within each season; the
/// Summer series comes first, then Winter.
pub fn medals_by_year_and_season(scope: &[AnonRecord]) -> Vec<SeasonMedalRow> {
    let mut rows = Vec::new();
    for season in [Season::Summer, Season::Winter] {
        let in_season: Vec<AnonRecord> =
            scope.iter().filter(|r| r.season == season).cloned().collect();
        let mut by_year: BTreeMap<i32, usize> = BTreeMap::new();
        for r in unique_team_medals(&in_season) {
            *by_year.entry(row_year(&r)).or_default() += 1;
        }
        rows.extend(by_year.into_iter().map(|(year, medals)| SeasonMedalRow {
            year,
            season,
            medals,
        }));
    }
    rows
}

pub fn medals_by_sport(unique: &[AnonRecord]) -> Vec<SportMedalRow> {
    let mut map: HashMap<&str, usize> = HashMap::new();
    for r in unique.iter().filter(|r| r.medal.is_some()) {
        *map.entry(r.sport.as_str()).or_default() += 1;
    }
    let mut rows: Vec<SportMedalRow> = map
        .into_iter()
        .map(|(sport, medals)| SportMedalRow {
            sport: sport.to_string(),
            medals,
        })
        .collect();
    rows.sort_by(|a, b| b.medals.cmp(&a.medals).then_with(|| a.sport.cmp(&b.sport)));
    rows
}

/// Team medals per (sport, year), sorted by sport then year.
pub fn medals_by_year_and_sport(unique: &[AnonRecord]) -> Vec<SportYearMedalRow> {
    let mut map: BTreeMap<(&str, i32), usize> = BTreeMap::new();
    for r in unique.iter().filter(|r| r.medal.is_some()) {
        *map.entry((r.sport.as_str(), row_year(r))).or_default() += 1;
    }
    map.into_iter()
        .map(|((sport, year), medals)| SportYearMedalRow {
            year,
            sport: sport.to_string(),
            medals,
        })
        .collect()
}

/// Keep the timeline rows of the selected sports.
pub fn select_sports<S: AsRef<str>>(
    rows: &[SportYearMedalRow],
    sports: &[S],
) -> Vec<SportYearMedalRow> {
    rows.iter()
        .filter(|r| sports.iter().any(|s| s.as_ref() == r.sport))
        .cloned()
        .collect()
}

/// Athletes per (games year, season, sex); an athlete counts once per games.
pub fn participants_by_year_season_sex(scope: &[AnonRecord]) -> Vec<ParticipantRow> {
    let mut map: BTreeMap<(i32, Season, Sex), usize> = BTreeMap::new();
    for r in unique_participants(scope) {
        *map.entry((row_year(&r), r.season, r.sex)).or_default() += 1;
    }
    map.into_iter()
        .map(|((year, season, sex), participants)| ParticipantRow {
            year,
            season,
            sex,
            participants,
        })
        .collect()
}

/// Five-number age summary per sport, ages above zero only.
pub fn age_distribution_by_sport(scope: &[AnonRecord], highlight: &str) -> Vec<AgeSummaryRow> {
    let mut ages: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in scope.iter().filter(|r| has_age(r)) {
        ages.entry(r.sport.as_str()).or_default().push(r.age);
    }
    ages.into_iter()
        .filter_map(|(sport, values)| {
            let athletes = values.len();
            five_number(values).map(|s| AgeSummaryRow {
                sport: sport.to_string(),
                athletes,
                min: s.min,
                q1: s.q1,
                median: s.median,
                q3: s.q3,
                max: s.max,
                highlighted: sport == highlight,
            })
        })
        .collect()
}

pub fn age_histogram(rows: &[AnonRecord]) -> Vec<AgeCountRow> {
    let mut map: BTreeMap<i32, usize> = BTreeMap::new();
    for r in rows.iter().filter(|r| has_age(r)) {
        *map.entry(whole_years(r.age)).or_default() += 1;
    }
    map.into_iter()
        .map(|(age, athletes)| AgeCountRow { age, athletes })
        .collect()
}

/// Mean age of `sport` against every other sport in the same scope.
pub fn mean_age_vs_other(scope: &[AnonRecord], sport: &str) -> Vec<GroupMeanAgeRow> {
    [
        (sport, scope_to_sport(scope, sport)),
        (OTHER_SPORTS, exclude_sport(scope, sport)),
    ]
    .into_iter()
    .filter_map(|(group, rows)| {
        let ages: Vec<f64> = rows.iter().filter(|r| has_age(r)).map(|r| r.age).collect();
        if ages.is_empty() {
            return None;
        }
        Some(GroupMeanAgeRow {
            group: group.to_string(),
            mean_age: round1(average(&ages)),
        })
    })
    .collect()
}

/// Career span per person, keyed by fingerprint rather than row id.
pub fn activity_spans(rows: &[AnonRecord]) -> Vec<ActivitySpanRow> {
    struct Acc {
        min_age: f64,
        max_age: f64,
        years: HashSet<i32>,
    }
    let mut map: HashMap<&str, Acc> = HashMap::new();
    for r in rows {
        let e = map.entry(r.fingerprint.as_str()).or_insert_with(|| Acc {
            min_age: r.age,
            max_age: r.age,
            years: HashSet::new(),
        });
        e.min_age = e.min_age.min(r.age);
        e.max_age = e.max_age.max(r.age);
        e.years.insert(r.year);
    }
    let mut spans: Vec<ActivitySpanRow> = map
        .into_iter()
        .map(|(fingerprint, acc)| ActivitySpanRow {
            fingerprint: fingerprint.to_string(),
            min_age: acc.min_age,
            max_age: acc.max_age,
            active_years: acc.years.len(),
        })
        .collect();
    spans.sort_by(|a, b| a.fingerprint.cmp(&b.fingerprint));
    spans
}

pub fn active_years_histogram(spans: &[ActivitySpanRow]) -> Vec<ActiveYearsRow> {
    let mut map: BTreeMap<usize, usize> = BTreeMap::new();
    for s in spans {
        *map.entry(s.active_years).or_default() += 1;
    }
    map.into_iter()
        .map(|(active_years, athletes)| ActiveYearsRow {
            active_years,
            athletes,
        })
        .collect()
}

/// Expects rows already de-duplicated by team medal.
pub fn medal_types_wide(unique: &[AnonRecord]) -> WideTable<i32, Medal> {
    WideTable::count(
        medal_columns(),
        unique.iter().filter_map(|r| r.medal.map(|m| (row_year(r), m))),
    )
}

pub fn medal_types_by_year(wide: &WideTable<i32, Medal>) -> Vec<MedalTypeYearRow> {
    wide.rows
        .iter()
        .map(|(year, v)| MedalTypeYearRow {
            year: *year,
            gold: v[0],
            silver: v[1],
            bronze: v[2],
            total: v.iter().sum(),
        })
        .collect()
}

pub fn medal_types_long(wide: &WideTable<i32, Medal>) -> Vec<MedalCountRow> {
    wide.to_long()
        .into_iter()
        .map(|l| MedalCountRow {
            year: l.key,
            medal: l.category,
            count: l.value,
        })
        .collect()
}

pub fn medals_by_year(unique: &[AnonRecord]) -> Vec<YearMedalRow> {
    let mut map: BTreeMap<i32, usize> = BTreeMap::new();
    for r in unique.iter().filter(|r| r.medal.is_some()) {
        *map.entry(row_year(r)).or_default() += 1;
    }
    map.into_iter()
        .map(|(year, medals)| YearMedalRow { year, medals })
        .collect()
}

/// Team medals per NOC within one sport (all countries), top `k` by total.
pub fn medals_by_country_for_sport(
    sport_rows: &[AnonRecord],
    k: usize,
) -> Vec<CountryMedalTypeRow> {
    let unique = unique_team_medals(sport_rows);
    let wide = WideTable::count(
        medal_columns(),
        unique
            .iter()
            .filter_map(|r| r.medal.map(|m| (r.noc.clone(), m))),
    );
    let mut rows: Vec<CountryMedalTypeRow> = wide
        .rows
        .into_iter()
        .map(|(noc, v)| CountryMedalTypeRow {
            noc,
            gold: v[0],
            silver: v[1],
            bronze: v[2],
            total: v.iter().sum(),
        })
        .collect();
    rows.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.noc.cmp(&b.noc)));
    rows.truncate(k);
    rows
}

fn group_of(r: &AnonRecord, noc: &str) -> String {
    if r.noc == noc {
        noc.to_string()
    } else {
        OTHER_COUNTRIES.to_string()
    }
}

/// Scoped country against the rest of the world, team medals per year.
pub fn country_share_by_year(sport_unique: &[AnonRecord], noc: &str) -> Vec<GroupYearMedalRow> {
    let groups = vec![OTHER_COUNTRIES.to_string(), noc.to_string()];
    let wide = WideTable::count(
        groups,
        sport_unique
            .iter()
            .filter(|r| r.medal.is_some())
            .map(|r| (row_year(r), group_of(r, noc))),
    );
    wide.to_long()
        .into_iter()
        .map(|l| GroupYearMedalRow {
            year: l.key,
            group: l.category,
            medals: l.value,
        })
        .collect()
}

/// Medals won per age, one per medalist (team members each count).
pub fn medalists_by_age(sport_rows: &[AnonRecord]) -> Vec<AgeMedalRow> {
    let unique = unique_athlete_medals(sport_rows);
    let wide = WideTable::count(
        medal_columns(),
        unique
            .iter()
            .filter(|r| has_age(r))
            .filter_map(|r| r.medal.map(|m| (whole_years(r.age), m))),
    );
    wide.to_long()
        .into_iter()
        .map(|l| AgeMedalRow {
            age: l.key,
            medal: l.category,
            count: l.value,
        })
        .collect()
}

/// Distinct athletes per age, scoped country against the rest.
pub fn participants_by_age(sport_rows: &[AnonRecord], noc: &str) -> Vec<GroupAgeRow> {
    let distinct: HashSet<(i32, String, u32)> = sport_rows
        .iter()
        .filter(|r| has_age(r))
        .map(|r| (whole_years(r.age), group_of(r, noc), r.id))
        .collect();
    let groups = vec![OTHER_COUNTRIES.to_string(), noc.to_string()];
    let wide = WideTable::count(groups, distinct.into_iter().map(|(age, g, _)| (age, g)));
    wide.to_long()
        .into_iter()
        .map(|l| GroupAgeRow {
            age: l.key,
            group: l.category,
            athletes: l.value,
        })
        .collect()
}

/// Density of (year, age) among medal-winning athletes.
pub fn medalist_age_by_year(unique_athletes: &[AnonRecord]) -> Vec<MedalistAgeRow> {
    let mut map: BTreeMap<(i32, i32), usize> = BTreeMap::new();
    for r in unique_athletes
        .iter()
        .filter(|r| r.medal.is_some() && has_age(r))
    {
        *map.entry((row_year(r), whole_years(r.age))).or_default() += 1;
    }
    map.into_iter()
        .map(|((year, age), medalists)| MedalistAgeRow {
            year,
            age,
            medalists,
        })
        .collect()
}

/// Entries per (year, sex). Years lacking a sex seen elsewhere in the
/// scope get an explicit zero.
pub fn entries_by_sex_and_year(rows: &[AnonRecord]) -> Vec<SexYearRow> {
    let mut sexes: Vec<Sex> = rows
        .iter()
        .map(|r| r.sex)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    sexes.sort();
    let wide = WideTable::count(sexes, rows.iter().map(|r| (r.year, r.sex)));
    wide.to_long()
        .into_iter()
        .map(|l| SexYearRow {
            year: l.key,
            sex: l.category,
            entries: l.value,
        })
        .collect()
}

/// Event name without the sport and gender prefixes:
/// `"Cycling Men's Road Race, Individual"` → `"Road Race, Individual"`.
pub fn base_event(sport: &str, event: &str) -> String {
    let rest = event
        .strip_prefix(sport)
        .map(str::trim_start)
        .unwrap_or(event);
    let rest = rest
        .strip_prefix("Men's ")
        .or_else(|| rest.strip_prefix("Women's "))
        .unwrap_or(rest);
    rest.to_string()
}

/// Entries per (gendered event, year).
///
/// Events are ordered by how many distinct years the men's version was held
/// (most first), men before women, then by year.
pub fn event_heatmap(
    sport_rows: &[AnonRecord],
    sport: &str,
    aliases: &[(&str, &str)],
) -> Vec<EventHeatmapRow> {
    let mut counts: HashMap<(String, Sex, i32), usize> = HashMap::new();
    let mut men_years: HashMap<String, HashSet<i32>> = HashMap::new();
    for r in sport_rows {
        let event = aliases
            .iter()
            .find(|(from, _)| *from == r.event)
            .map(|(_, to)| *to)
            .unwrap_or(r.event.as_str());
        let base = base_event(sport, event);
        if r.sex == Sex::Male {
            men_years.entry(base.clone()).or_default().insert(r.year);
        }
        *counts.entry((base, r.sex, r.year)).or_default() += 1;
    }

    let held = |base: &str| men_years.get(base).map(HashSet::len).unwrap_or(0);
    let mut tmp: Vec<((String, Sex, i32), usize)> = counts.into_iter().collect();
    tmp.sort_by(|(a, _), (b, _)| {
        held(&b.0)
            .cmp(&held(&a.0))
            .then_with(|| a.0.cmp(&b.0))
            .then_with(|| a.1.cmp(&b.1))
            .then_with(|| a.2.cmp(&b.2))
    });
    tmp.into_iter()
        .map(|((base, sex, year), entries)| EventHeatmapRow {
            event: format!(
                "{} {}",
                if sex == Sex::Male { "Men" } else { "Women" },
                base
            ),
            year,
            entries,
        })
        .collect()
}
