//! Maps a selection (the home page, or one sport and category) to the
//! precomputed tables that answer it, each with the chart it feeds.
use crate::aggregate::select_sports;
use crate::config::Config;
use crate::error::UnknownSelection;
use crate::output::Table;
use crate::pipeline::{PipelineOutputs, SportViews};
use crate::types::{SportYearMedalRow, YearMedalRow};
use log::warn;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Shown when a selection has nothing behind it.
pub const NO_DATA: &str = "No available data yet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    General,
    Age,
    Medals,
    Gender,
    ActiveYears,
}

impl Category {
    pub fn key(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Age => "age",
            Category::Medals => "medals",
            Category::Gender => "gender",
            Category::ActiveYears => "active-years",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Age => "Age",
            Category::Medals => "Medals",
            Category::Gender => "Gender",
            Category::ActiveYears => "Active Years",
        }
    }

    /// Views shown for this category, in page order.
    pub fn views(&self) -> &'static [ViewId] {
        match self {
            Category::General => &[ViewId::EventHeatmap],
            Category::Age => &[
                ViewId::AgeHistogram,
                ViewId::AgeBySport,
                ViewId::MeanAgeVsOther,
                ViewId::MedalistsByAge,
                ViewId::ParticipantsByAge,
                ViewId::MedalistAgeByYear,
            ],
            Category::Medals => &[
                ViewId::MedalsByYear,
                ViewId::MedalTypesByYear,
                ViewId::MedalTypesLong,
                ViewId::MedalsByCountry,
                ViewId::CountryShareByYear,
            ],
            Category::Gender => &[ViewId::EntriesBySex],
            Category::ActiveYears => &[ViewId::ActiveYearsHistogram, ViewId::ActivitySpans],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = UnknownSelection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(Category::General),
            "age" => Ok(Category::Age),
            "medals" => Ok(Category::Medals),
            "gender" => Ok(Category::Gender),
            "active-years" | "active" => Ok(Category::ActiveYears),
            _ => Err(UnknownSelection::Category(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Home,
    Sport { sport: String, category: Category },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    StackedBar,
    GroupedBar,
    Line,
    BoxPlot,
    Histogram,
    Heatmap,
}

/// Which columns a chart reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartBinding {
    pub kind: ChartKind,
    pub x: &'static str,
    pub y: &'static str,
    pub color: Option<&'static str>,
}

const fn chart(
    kind: ChartKind,
    x: &'static str,
    y: &'static str,
    color: Option<&'static str>,
) -> ChartBinding {
    ChartBinding { kind, x, y, color }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    GlobalTopCountries,
    MedalsByYearSeason,
    TopSports,
    SportTimeline,
    Participants,
    EventHeatmap,
    AgeHistogram,
    AgeBySport,
    MeanAgeVsOther,
    MedalistsByAge,
    ParticipantsByAge,
    MedalistAgeByYear,
    MedalsByYear,
    MedalTypesByYear,
    MedalTypesLong,
    MedalsByCountry,
    CountryShareByYear,
    EntriesBySex,
    ActivitySpans,
    ActiveYearsHistogram,
}

pub const HOME_VIEWS: [ViewId; 5] = [
    ViewId::GlobalTopCountries,
    ViewId::MedalsByYearSeason,
    ViewId::TopSports,
    ViewId::SportTimeline,
    ViewId::Participants,
];

impl ViewId {
    /// File stem used when exporting.
    pub fn name(&self) -> &'static str {
        match self {
            ViewId::GlobalTopCountries => "global_top_countries",
            ViewId::MedalsByYearSeason => "medals_by_year_season",
            ViewId::TopSports => "top_sports",
            ViewId::SportTimeline => "sport_timeline",
            ViewId::Participants => "participants",
            ViewId::EventHeatmap => "event_heatmap",
            ViewId::AgeHistogram => "age_histogram",
            ViewId::AgeBySport => "age_by_sport",
            ViewId::MeanAgeVsOther => "mean_age_vs_other",
            ViewId::MedalistsByAge => "medalists_by_age",
            ViewId::ParticipantsByAge => "participants_by_age",
            ViewId::MedalistAgeByYear => "medalist_age_by_year",
            ViewId::MedalsByYear => "medals_by_year",
            ViewId::MedalTypesByYear => "medal_types_by_year",
            ViewId::MedalTypesLong => "medal_types_long",
            ViewId::MedalsByCountry => "medals_by_country",
            ViewId::CountryShareByYear => "country_share_by_year",
            ViewId::EntriesBySex => "entries_by_sex",
            ViewId::ActivitySpans => "activity_spans",
            ViewId::ActiveYearsHistogram => "active_years_histogram",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ViewId::GlobalTopCountries => "Global medal ranking",
            ViewId::MedalsByYearSeason => "Medals per year (Summer and Winter)",
            ViewId::TopSports => "Sports with the most medals",
            ViewId::SportTimeline => "Medals over time by sport",
            ViewId::Participants => "Participants per year by season and sex",
            ViewId::EventHeatmap => "Entries per event and year",
            ViewId::AgeHistogram => "Age distribution",
            ViewId::AgeBySport => "Age distribution by sport",
            ViewId::MeanAgeVsOther => "Mean age against other sports",
            ViewId::MedalistsByAge => "Medals by age",
            ViewId::ParticipantsByAge => "Participants by age",
            ViewId::MedalistAgeByYear => "Medal-winning athletes: age and year",
            ViewId::MedalsByYear => "Total medals per year",
            ViewId::MedalTypesByYear => "Medals per year by type",
            ViewId::MedalTypesLong => "Medal distribution per year",
            ViewId::MedalsByCountry => "Medals per country",
            ViewId::CountryShareByYear => "Medals per year against the rest of the world",
            ViewId::EntriesBySex => "Gender distribution over the years",
            ViewId::ActivitySpans => "Career span per athlete",
            ViewId::ActiveYearsHistogram => "Number of active years",
        }
    }

    /// Caption printed under the table, where the view has one.
    pub fn description(&self) -> Option<&'static str> {
        match self {
            ViewId::GlobalTopCountries => {
                Some("Total medals won by the top countries. The scoped country is highlighted.")
            }
            ViewId::MedalsByYearSeason => {
                Some("Medals won at the Summer and Winter games, one series per season.")
            }
            ViewId::TopSports => Some("Sports ranked by number of medals won."),
            ViewId::AgeHistogram => {
                Some("The range of ages of the country's athletes in this sport.")
            }
            ViewId::AgeBySport => Some(
                "Age distribution of all the country's athletes, with this sport highlighted.",
            ),
            ViewId::MedalistAgeByYear => Some("Ages of the medal-winning athletes, year by year."),
            ViewId::MedalsByYear => Some("Medals won in this sport at each Olympic year."),
            ViewId::MedalTypesByYear => Some("Which medals were won each year."),
            ViewId::MedalistsByAge => Some(
                "How age affects the likelihood of a medal. Endurance athletes still medal into \
                 their 30s, but the chances drop sharply after the mid-20s.",
            ),
            _ => None,
        }
    }

    pub fn binding(&self) -> ChartBinding {
        use ChartKind::*;
        match self {
            ViewId::GlobalTopCountries => chart(Bar, "NOC", "Medals", Some("Highlighted")),
            ViewId::MedalsByYearSeason => chart(Line, "Year", "Medals", Some("Season")),
            ViewId::TopSports => chart(Bar, "Sport", "Medals", None),
            ViewId::SportTimeline => chart(Line, "Year", "Medals", Some("Sport")),
            ViewId::Participants => chart(Line, "Year", "Participants", Some("Sex")),
            ViewId::EventHeatmap => chart(Heatmap, "Year", "Event", Some("Entries")),
            ViewId::AgeHistogram => chart(Histogram, "Age", "Athletes", None),
            ViewId::AgeBySport => chart(BoxPlot, "Sport", "Median", Some("Highlighted")),
            ViewId::MeanAgeVsOther => chart(Bar, "Group", "MeanAge", None),
            ViewId::MedalistsByAge => chart(StackedBar, "Age", "Count", Some("Medal")),
            ViewId::ParticipantsByAge => chart(StackedBar, "Age", "Athletes", Some("Group")),
            ViewId::MedalistAgeByYear => chart(Heatmap, "Year", "Age", Some("Medalists")),
            ViewId::MedalsByYear => chart(Bar, "Year", "Medals", None),
            ViewId::MedalTypesByYear => chart(StackedBar, "Year", "Total", None),
            ViewId::MedalTypesLong => chart(GroupedBar, "Year", "Count", Some("Medal")),
            ViewId::MedalsByCountry => chart(StackedBar, "NOC", "Total", None),
            ViewId::CountryShareByYear => chart(StackedBar, "Year", "Medals", Some("Group")),
            ViewId::EntriesBySex => chart(GroupedBar, "Year", "Entries", Some("Sex")),
            ViewId::ActivitySpans => chart(Bar, "NameHash", "ActiveYears", None),
            ViewId::ActiveYearsHistogram => chart(Histogram, "ActiveYears", "Athletes", None),
        }
    }
}

/// One table ready for display, borrowed from the pipeline outputs.
pub struct View<'a> {
    pub id: ViewId,
    pub title: String,
    pub binding: ChartBinding,
    pub table: &'a dyn Table,
}

impl fmt::Debug for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("rows", &self.table.len())
            .finish()
    }
}

#[derive(Debug)]
pub enum Page<'a> {
    Views(Vec<View<'a>>),
    Placeholder(&'static str),
}

pub struct Router<'a> {
    outputs: &'a PipelineOutputs,
    routes: HashMap<(&'static str, Category), &'static [ViewId]>,
    menus: Vec<(&'static str, Vec<Category>)>,
}

impl Selection {
    /// Build a sport selection from names as typed by the user.
    pub fn from_names(
        config: &Config,
        sport: &str,
        category: &str,
    ) -> Result<Self, UnknownSelection> {
        let opts = config
            .sport(sport)
            .ok_or_else(|| UnknownSelection::Sport(sport.trim().to_string()))?;
        Ok(Selection::Sport {
            sport: opts.name.to_string(),
            category: category.parse()?,
        })
    }
}

impl<'a> Router<'a> {
    /// Build the (sport, category) lookup once from the configured options.
    pub fn new(outputs: &'a PipelineOutputs, config: &Config) -> Self {
        let mut routes = HashMap::new();
        for sport in &config.sports {
            for category in &sport.categories {
                routes.insert((sport.name, *category), category.views());
            }
        }
        let menus = config
            .sports
            .iter()
            .map(|s| (s.name, s.categories.clone()))
            .collect();
        Router {
            outputs,
            routes,
            menus,
        }
    }

    pub fn sports(&self) -> Vec<&'static str> {
        self.menus.iter().map(|(name, _)| *name).collect()
    }

    /// Categories offered for `sport`, in menu order.
    pub fn categories(&self, sport: &str) -> Vec<Category> {
        let sport = sport.trim();
        self.menus
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(sport))
            .map(|(_, cats)| cats.clone())
            .unwrap_or_default()
    }

    fn canonical_sport(&self, sport: &str) -> Option<&'static str> {
        let sport = sport.trim();
        self.menus
            .iter()
            .map(|(name, _)| *name)
            .find(|name| name.eq_ignore_ascii_case(sport))
    }

    pub fn try_resolve(&self, selection: &Selection) -> Result<Vec<View<'a>>, UnknownSelection> {
        match selection {
            Selection::Home => Ok(HOME_VIEWS
                .iter()
                .map(|id| self.home_view(*id))
                .collect()),
            Selection::Sport { sport, category } => {
                let name = self
                    .canonical_sport(sport)
                    .ok_or_else(|| UnknownSelection::Sport(sport.clone()))?;
                let views = self.routes.get(&(name, *category)).ok_or_else(|| {
                    UnknownSelection::Unmapped {
                        sport: name.to_string(),
                        category: category.key().to_string(),
                    }
                })?;
                let outputs: &'a PipelineOutputs = self.outputs;
                let sv = outputs
                    .sports
                    .get(name)
                    .ok_or_else(|| UnknownSelection::Sport(name.to_string()))?;
                Ok(views.iter().map(|id| sport_view(sv, *id)).collect())
            }
        }
    }

    /// Like `try_resolve`, but an unmapped selection becomes a placeholder.
    pub fn resolve(&self, selection: &Selection) -> Page<'a> {
        match self.try_resolve(selection) {
            Ok(views) => Page::Views(views),
            Err(e) => {
                warn!("{}; showing placeholder", e);
                Page::Placeholder(NO_DATA)
            }
        }
    }

    /// Resolve a sport and category typed by the user. Names that match
    /// nothing give the placeholder, the same as an unmapped pair.
    pub fn resolve_names(&self, config: &Config, sport: &str, category: &str) -> Page<'a> {
        match Selection::from_names(config, sport, category) {
            Ok(selection) => self.resolve(&selection),
            Err(e) => {
                warn!("{}; known sports: {}", e, config.sport_names().join(", "));
                Page::Placeholder(NO_DATA)
            }
        }
    }

    /// Every routed view, grouped as `(directory, views)`; home comes first.
    pub fn all_pages(&self) -> Vec<(String, Vec<View<'a>>)> {
        let mut pages = vec![(
            "home".to_string(),
            HOME_VIEWS.iter().map(|id| self.home_view(*id)).collect(),
        )];
        let outputs: &'a PipelineOutputs = self.outputs;
        for sport in self.sports() {
            let Some(sv) = outputs.sports.get(sport) else {
                continue;
            };
            let mut views = Vec::new();
            for category in self.categories(sport) {
                views.extend(category.views().iter().map(|id| sport_view(sv, *id)));
            }
            pages.push((sport.to_lowercase(), views));
        }
        pages
    }

    /// The home timeline restricted to `sports`; `None` when nothing is
    /// selected, so the caller can ask for a sport instead of plotting nothing.
    pub fn timeline<S: AsRef<str>>(&self, sports: &[S]) -> Option<Vec<SportYearMedalRow>> {
        if sports.is_empty() {
            return None;
        }
        Some(select_sports(&self.outputs.home.sport_timeline, sports))
    }

    fn home_view(&self, id: ViewId) -> View<'a> {
        let outputs: &'a PipelineOutputs = self.outputs;
        let home = &outputs.home;
        let table: &'a dyn Table = match id {
            ViewId::GlobalTopCountries => &home.global_top_countries,
            ViewId::MedalsByYearSeason => &home.medals_by_year_season,
            ViewId::TopSports => &home.top_sports,
            ViewId::SportTimeline => &home.sport_timeline,
            ViewId::Participants => &home.participants,
            _ => &EMPTY,
        };
        View {
            id,
            title: format!("{} - {}", outputs.country, id.title()),
            binding: id.binding(),
            table,
        }
    }
}

/// Stand-in for an id asked of the wrong page; renders as `(no rows)`.
static EMPTY: Vec<YearMedalRow> = Vec::new();

fn sport_view(sv: &SportViews, id: ViewId) -> View<'_> {
    let table: &dyn Table = match id {
        ViewId::EventHeatmap => &sv.event_heatmap,
        ViewId::AgeHistogram => &sv.age_histogram,
        ViewId::AgeBySport => &sv.age_by_sport,
        ViewId::MeanAgeVsOther => &sv.mean_age_vs_other,
        ViewId::MedalistsByAge => &sv.medalists_by_age,
        ViewId::ParticipantsByAge => &sv.participants_by_age,
        ViewId::MedalistAgeByYear => &sv.medalist_age_by_year,
        ViewId::MedalsByYear => &sv.medals_by_year,
        ViewId::MedalTypesByYear => &sv.medal_types_by_year,
        ViewId::MedalTypesLong => &sv.medal_types_long,
        ViewId::MedalsByCountry => &sv.medals_by_country,
        ViewId::CountryShareByYear => &sv.country_share_by_year,
        ViewId::EntriesBySex => &sv.entries_by_sex,
        ViewId::ActivitySpans => &sv.activity_spans,
        ViewId::ActiveYearsHistogram => &sv.active_years_histogram,
        _ => &EMPTY,
    };
    View {
        id,
        title: format!("{} - {}", sv.sport, id.title()),
        binding: id.binding(),
        table,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::event;
    use crate::pipeline::build_pipeline;
    use crate::types::Medal;

    fn outputs() -> (PipelineOutputs, Config) {
        let cfg = Config::default();
        let records = vec![
            event(
                1,
                "Anna",
                "ITA",
                "2008 Summer",
                "Swimming",
                "Swimming Women's 400m",
                Some(Medal::Gold),
            ),
            event(2, "Bruno", "ITA", "2008 Summer", "Fencing", "Fencing Men's Foil", None),
        ];
        (build_pipeline(records, &cfg), cfg)
    }

    #[test]
    fn categories_parse_by_key() {
        assert_eq!("medals".parse::<Category>(), Ok(Category::Medals));
        assert_eq!(" Active-Years ".parse::<Category>(), Ok(Category::ActiveYears));
        assert_eq!(
            "weather".parse::<Category>(),
            Err(UnknownSelection::Category("weather".into()))
        );
    }

    #[test]
    fn home_lists_overview_tables() {
        let (out, cfg) = outputs();
        let router = Router::new(&out, &cfg);
        let views = router.try_resolve(&Selection::Home).unwrap();
        let ids: Vec<ViewId> = views.iter().map(|v| v.id).collect();
        assert_eq!(ids, HOME_VIEWS.to_vec());
        assert!(views[0].title.starts_with("ITA"));
        assert_eq!(views[0].table.len(), 1);
    }

    #[test]
    fn sport_selection_maps_to_views() {
        let (out, cfg) = outputs();
        let router = Router::new(&out, &cfg);
        let sel = Selection::Sport {
            sport: "swimming".into(),
            category: Category::Medals,
        };
        let views = router.try_resolve(&sel).unwrap();
        assert_eq!(views.len(), Category::Medals.views().len());
        assert_eq!(views[0].id, ViewId::MedalsByYear);
        assert_eq!(views[0].table.len(), 1);
        assert_eq!(views[0].binding.kind, ChartKind::Bar);
        assert!(views[0].title.starts_with("Swimming"));

        assert_eq!(
            router.categories("Equestrianism"),
            vec![Category::Medals, Category::Gender, Category::Age, Category::ActiveYears]
        );
        assert!(router.categories("Curling").is_empty());
    }

    #[test]
    fn unmapped_selection_falls_back_to_placeholder() {
        let (out, cfg) = outputs();
        let router = Router::new(&out, &cfg);
        let sel = Selection::Sport {
            sport: "Swimming".into(),
            category: Category::Gender,
        };
        assert!(matches!(
            router.try_resolve(&sel),
            Err(UnknownSelection::Unmapped { .. })
        ));
        assert!(matches!(router.resolve(&sel), Page::Placeholder(NO_DATA)));

        let sel = Selection::Sport {
            sport: "Curling".into(),
            category: Category::Age,
        };
        assert!(matches!(router.resolve(&sel), Page::Placeholder(_)));
    }

    #[test]
    fn typed_names_resolve_case_insensitively() {
        let (_, cfg) = outputs();
        assert_eq!(
            Selection::from_names(&cfg, " fencing", "MEDALS"),
            Ok(Selection::Sport {
                sport: "Fencing".into(),
                category: Category::Medals,
            })
        );
        assert_eq!(
            Selection::from_names(&cfg, "Fencing", "weather"),
            Err(UnknownSelection::Category("weather".into()))
        );
        assert_eq!(
            Selection::from_names(&cfg, "Curling", "age"),
            Err(UnknownSelection::Sport("Curling".into()))
        );
    }

    #[test]
    fn unknown_typed_names_fall_back_to_placeholder() {
        let (out, cfg) = outputs();
        let router = Router::new(&out, &cfg);
        assert!(matches!(
            router.resolve_names(&cfg, "Fencing", "weather"),
            Page::Placeholder(NO_DATA)
        ));
        assert!(matches!(
            router.resolve_names(&cfg, "Curling", "age"),
            Page::Placeholder(NO_DATA)
        ));
        assert!(matches!(
            router.resolve_names(&cfg, "Fencing", "gender"),
            Page::Placeholder(NO_DATA)
        ));
        assert!(matches!(
            router.resolve_names(&cfg, "swimming", "age"),
            Page::Views(_)
        ));
    }

    #[test]
    fn captions_cover_the_described_views() {
        assert!(ViewId::MedalistsByAge.description().is_some());
        assert!(ViewId::MedalTypesByYear.description().is_some());
        assert!(ViewId::ActivitySpans.description().is_none());
    }

    #[test]
    fn empty_scope_views_still_resolve() {
        let (out, cfg) = outputs();
        let router = Router::new(&out, &cfg);
        let sel = Selection::Sport {
            sport: "Cycling".into(),
            category: Category::Age,
        };
        match router.resolve(&sel) {
            Page::Views(views) => {
                assert!(views.iter().any(|v| v.table.is_empty()));
                assert_eq!(views[0].table.render(5), "(no rows)");
            }
            Page::Placeholder(_) => panic!("expected views"),
        }
    }

    #[test]
    fn timeline_needs_a_selection() {
        let (out, cfg) = outputs();
        let router = Router::new(&out, &cfg);
        assert!(router.timeline::<&str>(&[]).is_none());
        let rows = router.timeline(&["Swimming"]).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(router.timeline(&["Fencing"]).unwrap().is_empty());
    }

    #[test]
    fn all_pages_cover_every_sport() {
        let (out, cfg) = outputs();
        let router = Router::new(&out, &cfg);
        let pages = router.all_pages();
        assert_eq!(pages.len(), 1 + cfg.sports.len());
        assert_eq!(pages[0].0, "home");
        let swim = pages.iter().find(|(dir, _)| dir == "swimming").unwrap();
        let expected = Category::Age.views().len() + Category::Medals.views().len();
        assert_eq!(swim.1.len(), expected);
    }
}
