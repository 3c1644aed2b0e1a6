//! One-shot construction of every aggregate table.
//!
//! `build_pipeline` runs load-time data through anonymize → scope → dedup →
//! aggregate exactly once and hands back an immutable `PipelineOutputs`.
//! Selections only ever borrow from it.
use crate::aggregate::{
    active_years_histogram, activity_spans, age_distribution_by_sport, age_histogram,
    country_share_by_year, entries_by_sex_and_year, event_heatmap, mean_age_vs_other,
    medal_types_by_year, medal_types_long, medal_types_wide, medalist_age_by_year,
    medalists_by_age, medals_by_country_for_sport, medals_by_country_top, medals_by_sport,
    medals_by_year, medals_by_year_and_season, medals_by_year_and_sport,
    participants_by_age, participants_by_year_season_sex,
};
use crate::anonymize::anonymize;
use crate::config::{Config, SportOptions};
use crate::dedup::{count_by_medal, unique_athlete_medals, unique_team_medals};
use crate::filter::{scope_to_country, scope_to_sport};
use crate::types::{
    ActiveYearsRow, ActivitySpanRow, AgeCountRow, AgeMedalRow, AgeSummaryRow, AnonRecord,
    CountryMedalRow, CountryMedalTypeRow, EventHeatmapRow, EventRecord, GroupAgeRow,
    GroupMeanAgeRow, GroupYearMedalRow, MedalCountRow, MedalTypeYearRow, MedalistAgeRow,
    ParticipantRow, SeasonMedalRow, SexYearRow, SportMedalRow, SportYearMedalRow, SummaryStats,
    YearMedalRow,
};
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashSet};

/// Country-wide overview tables.
#[derive(Debug, Clone)]
pub struct HomeViews {
    pub global_top_countries: Vec<CountryMedalRow>,
    pub medals_by_year_season: Vec<SeasonMedalRow>,
    pub top_sports: Vec<SportMedalRow>,
    pub sport_timeline: Vec<SportYearMedalRow>,
    pub participants: Vec<ParticipantRow>,
}

/// Every table one sport page can show.
#[derive(Debug, Clone)]
pub struct SportViews {
    pub sport: String,
    pub event_heatmap: Vec<EventHeatmapRow>,
    pub age_histogram: Vec<AgeCountRow>,
    pub age_by_sport: Vec<AgeSummaryRow>,
    pub mean_age_vs_other: Vec<GroupMeanAgeRow>,
    pub medalists_by_age: Vec<AgeMedalRow>,
    pub participants_by_age: Vec<GroupAgeRow>,
    pub medalist_age_by_year: Vec<MedalistAgeRow>,
    pub medals_by_year: Vec<YearMedalRow>,
    pub medal_types_by_year: Vec<MedalTypeYearRow>,
    pub medal_types_long: Vec<MedalCountRow>,
    pub medals_by_country: Vec<CountryMedalTypeRow>,
    pub country_share_by_year: Vec<GroupYearMedalRow>,
    pub entries_by_sex: Vec<SexYearRow>,
    pub activity_spans: Vec<ActivitySpanRow>,
    pub active_years_histogram: Vec<ActiveYearsRow>,
}

#[derive(Debug)]
pub struct PipelineOutputs {
    pub country: String,
    /// Anonymized rows of the scoped country.
    pub country_rows: Vec<AnonRecord>,
    pub home: HomeViews,
    pub sports: BTreeMap<String, SportViews>,
    pub summary: SummaryStats,
}

pub fn build_pipeline(records: Vec<EventRecord>, config: &Config) -> PipelineOutputs {
    let total_rows = records.len();
    let all = anonymize(records);
    let country = config.country.as_str();
    let scope = scope_to_country(&all, country);
    debug!("{} rows in scope {}", scope.len(), country);
    if scope.is_empty() {
        warn!("no rows for country {}; country views will be empty", country);
    }

    let global_unique = unique_team_medals(&all);
    let scope_unique = unique_team_medals(&scope);
    debug!(
        "{} unique medals overall, {} for {}",
        global_unique.len(),
        scope_unique.len(),
        country
    );

    let mut top_sports = medals_by_sport(&scope_unique);
    top_sports.truncate(config.top_sports);
    let home = HomeViews {
        global_top_countries: medals_by_country_top(&global_unique, config.top_countries, country),
        medals_by_year_season: medals_by_year_and_season(&scope),
        top_sports,
        sport_timeline: medals_by_year_and_sport(&scope_unique),
        participants: participants_by_year_season_sex(&scope),
    };

    let sports: BTreeMap<String, SportViews> = config
        .sports
        .iter()
        .map(|opts| {
            let views = build_sport_views(&all, &scope, opts, config);
            (opts.name.to_string(), views)
        })
        .collect();

    let [gold, silver, bronze] = count_by_medal(&scope_unique);
    let country_athletes = scope
        .iter()
        .map(|r| r.fingerprint.as_str())
        .collect::<HashSet<_>>()
        .len();
    let summary = SummaryStats {
        country: country.to_string(),
        total_rows,
        country_rows: scope.len(),
        country_athletes,
        unique_medals: scope_unique.len(),
        gold,
        silver,
        bronze,
        generated_at: chrono::Utc::now(),
    };

    info!(
        "pipeline ready: {} rows for {}, {} unique medals, {} sports",
        scope.len(),
        country,
        scope_unique.len(),
        sports.len()
    );
    PipelineOutputs {
        country: country.to_string(),
        country_rows: scope,
        home,
        sports,
        summary,
    }
}

/// The same routine for every sport; only the sport options vary.
fn build_sport_views(
    all: &[AnonRecord],
    scope: &[AnonRecord],
    opts: &SportOptions,
    config: &Config,
) -> SportViews {
    let sport = opts.name;
    let country = config.country.as_str();
    // All countries, this sport.
    let world = scope_to_sport(all, sport);
    let world_unique = unique_team_medals(&world);
    // Scoped country, this sport.
    let local = scope_to_sport(scope, sport);
    let local_unique = unique_team_medals(&local);
    debug!(
        "{}: {} rows worldwide, {} for {}",
        sport,
        world.len(),
        local.len(),
        country
    );
    if local.is_empty() {
        warn!("no {} rows for {}", sport, country);
    }

    let wide = medal_types_wide(&local_unique);
    let spans = activity_spans(&local);
    SportViews {
        sport: sport.to_string(),
        event_heatmap: event_heatmap(&world, sport, &opts.event_aliases),
        age_histogram: age_histogram(&local),
        age_by_sport: age_distribution_by_sport(scope, sport),
        mean_age_vs_other: mean_age_vs_other(scope, sport),
        medalists_by_age: medalists_by_age(&world),
        participants_by_age: participants_by_age(&world, country),
        medalist_age_by_year: medalist_age_by_year(&unique_athlete_medals(&local)),
        medals_by_year: medals_by_year(&local_unique),
        medal_types_by_year: medal_types_by_year(&wide),
        medal_types_long: medal_types_long(&wide),
        medals_by_country: medals_by_country_for_sport(&world, config.top_sport_countries),
        country_share_by_year: country_share_by_year(&world_unique, country),
        entries_by_sex: entries_by_sex_and_year(&local),
        active_years_histogram: active_years_histogram(&spans),
        activity_spans: spans,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::event;
    use crate::types::Medal;

    fn records() -> Vec<EventRecord> {
        vec![
            event(
                1,
                "Anna",
                "ITA",
                "2008 Summer",
                "Cycling",
                "Cycling Women's Team Pursuit",
                Some(Medal::Gold),
            ),
            event(
                2,
                "Bea",
                "ITA",
                "2008 Summer",
                "Cycling",
                "Cycling Women's Team Pursuit",
                Some(Medal::Gold),
            ),
            event(
                3,
                "Carl",
                "GBR",
                "2008 Summer",
                "Cycling",
                "Cycling Men's Sprint",
                Some(Medal::Gold),
            ),
            event(
                4,
                "Dino",
                "ITA",
                "2008 Summer",
                "Fencing",
                "Fencing Men's Foil",
                Some(Medal::Silver),
            ),
            event(
                4,
                "Dino",
                "ITA",
                "2012 Summer",
                "Fencing",
                "Fencing Men's Foil",
                Some(Medal::Bronze),
            ),
            event(5, "Emil", "ITA", "2006 Winter", "Luge", "Luge Men's Singles", None),
        ]
    }

    #[test]
    fn home_views_dedup_team_medals() {
        let out = build_pipeline(records(), &Config::default());
        assert_eq!(out.country_rows.len(), 5);
        assert_eq!(out.summary.unique_medals, 3);
        assert_eq!(out.summary.gold + out.summary.silver + out.summary.bronze, 3);
        assert_eq!(out.summary.country_athletes, 4);

        let ita = out
            .home
            .global_top_countries
            .iter()
            .find(|r| r.noc == "ITA")
            .unwrap();
        assert_eq!(ita.medals, 3);
        assert!(ita.highlighted);
        assert_eq!(out.home.top_sports[0].sport, "Fencing");
    }

    #[test]
    fn every_configured_sport_gets_views() {
        let cfg = Config::default();
        let out = build_pipeline(records(), &cfg);
        assert_eq!(out.sports.len(), cfg.sports.len());

        let cycling = &out.sports["Cycling"];
        assert_eq!(cycling.medals_by_year, vec![YearMedalRow { year: 2008, medals: 1 }]);
        assert_eq!(cycling.medals_by_country.len(), 2);
        assert!(cycling
            .event_heatmap
            .iter()
            .any(|r| r.event == "Women Team Pursuit, 4,000 metres"));

        let fencing = &out.sports["Fencing"];
        let total: usize = fencing.medal_types_long.iter().map(|r| r.count).sum();
        assert_eq!(total, 2);
        assert_eq!(fencing.activity_spans.len(), 1);
        assert_eq!(fencing.activity_spans[0].active_years, 2);

        let swimming = &out.sports["Swimming"];
        assert!(swimming.medals_by_year.is_empty());
        assert!(swimming.age_histogram.is_empty());
    }

    #[test]
    fn unknown_country_gives_empty_views() {
        let cfg = Config {
            country: "XYZ".to_string(),
            ..Config::default()
        };
        let out = build_pipeline(records(), &cfg);
        assert!(out.country_rows.is_empty());
        assert!(out.home.medals_by_year_season.is_empty());
        assert!(out.home.participants.is_empty());
        assert_eq!(out.summary.unique_medals, 0);
        // The world ranking does not depend on the scope.
        assert!(!out.home.global_top_countries.is_empty());
        assert!(out.home.global_top_countries.iter().all(|r| !r.highlighted));
    }
}
