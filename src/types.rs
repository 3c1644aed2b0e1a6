use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::Tabled;

/// One CSV row as it appears in `athlete_events.csv`, before any typing.
///
/// Every field is an `Option<String>` so that a blank or `NA` cell never
/// fails deserialization; the loader decides what is missing and what is
/// malformed.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "ID")]
    pub id: Option<String>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Sex")]
    pub sex: Option<String>,
    #[serde(rename = "Age")]
    pub age: Option<String>,
    #[serde(rename = "Height")]
    pub height: Option<String>,
    #[serde(rename = "Weight")]
    pub weight: Option<String>,
    #[serde(rename = "Team")]
    pub team: Option<String>,
    #[serde(rename = "NOC")]
    pub noc: Option<String>,
    #[serde(rename = "Games")]
    pub games: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Season")]
    pub season: Option<String>,
    #[serde(rename = "City")]
    pub city: Option<String>,
    #[serde(rename = "Sport")]
    pub sport: Option<String>,
    #[serde(rename = "Event")]
    pub event: Option<String>,
    #[serde(rename = "Medal")]
    pub medal: Option<String>,
}

/// Header names the loader insists on.
pub const REQUIRED_COLUMNS: [&str; 15] = [
    "ID", "Name", "Sex", "Age", "Height", "Weight", "Team", "NOC", "Games", "Year", "Season",
    "City", "Sport", "Event", "Medal",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    pub fn parse(s: &str) -> Option<Sex> {
        match s.trim() {
            "M" => Some(Sex::Male),
            "F" => Some(Sex::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sex::Male => "M",
            Sex::Female => "F",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Season {
    Summer,
    Winter,
}

impl Season {
    pub fn parse(s: &str) -> Option<Season> {
        match s.trim() {
            "Summer" => Some(Season::Summer),
            "Winter" => Some(Season::Winter),
            _ => None,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Season::Summer => "Summer",
            Season::Winter => "Winter",
        })
    }
}

/// Medal types in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub const ALL: [Medal; 3] = [Medal::Gold, Medal::Silver, Medal::Bronze];

    /// `Ok(None)` for the dataset's "no medal" spellings, `Err` for anything
    /// unrecognised.
    pub fn parse(s: Option<&str>) -> Result<Option<Medal>, String> {
        match s.map(str::trim) {
            None | Some("") | Some("NA") | Some("None") => Ok(None),
            Some("Gold") => Ok(Some(Medal::Gold)),
            Some("Silver") => Ok(Some(Medal::Silver)),
            Some("Bronze") => Ok(Some(Medal::Bronze)),
            Some(other) => Err(format!("unknown medal `{}`", other)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Medal::Gold => "Gold",
            Medal::Silver => "Silver",
            Medal::Bronze => "Bronze",
        }
    }
}

impl fmt::Display for Medal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed, normalized appearance. Age, height and weight are always present
/// after loading because gaps are filled with whole-table medians.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub id: u32,
    pub name: String,
    pub sex: Sex,
    pub age: f64,
    pub height: f64,
    pub weight: f64,
    pub team: String,
    pub noc: String,
    pub games: String,
    pub year: i32,
    pub season: Season,
    pub city: String,
    pub sport: String,
    pub event: String,
    pub medal: Option<Medal>,
}

fn display_medal(m: &Option<Medal>) -> String {
    m.map(|m| m.to_string()).unwrap_or_default()
}

/// An `EventRecord` with the name swapped for its fingerprint. The
/// fingerprint takes the name's place right after `ID`.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct AnonRecord {
    #[serde(rename = "ID")]
    #[tabled(rename = "ID")]
    pub id: u32,
    #[serde(rename = "NameHash")]
    #[tabled(rename = "NameHash")]
    pub fingerprint: String,
    #[serde(rename = "Sex")]
    #[tabled(rename = "Sex")]
    pub sex: Sex,
    #[serde(rename = "Age")]
    #[tabled(rename = "Age")]
    pub age: f64,
    #[serde(rename = "Height")]
    #[tabled(rename = "Height")]
    pub height: f64,
    #[serde(rename = "Weight")]
    #[tabled(rename = "Weight")]
    pub weight: f64,
    #[serde(rename = "Team")]
    #[tabled(rename = "Team")]
    pub team: String,
    #[serde(rename = "NOC")]
    #[tabled(rename = "NOC")]
    pub noc: String,
    #[serde(rename = "Games")]
    #[tabled(rename = "Games")]
    pub games: String,
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Season")]
    #[tabled(rename = "Season")]
    pub season: Season,
    #[serde(rename = "City")]
    #[tabled(rename = "City")]
    pub city: String,
    #[serde(rename = "Sport")]
    #[tabled(rename = "Sport")]
    pub sport: String,
    #[serde(rename = "Event")]
    #[tabled(rename = "Event")]
    pub event: String,
    #[serde(rename = "Medal")]
    #[tabled(rename = "Medal", display_with = "display_medal")]
    pub medal: Option<Medal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct CountryMedalRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "NOC")]
    #[tabled(rename = "NOC")]
    pub noc: String,
    #[serde(rename = "Medals")]
    #[tabled(rename = "Medals")]
    pub medals: usize,
    #[serde(rename = "Highlighted")]
    #[tabled(rename = "Highlighted")]
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct SeasonMedalRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Season")]
    #[tabled(rename = "Season")]
    pub season: Season,
    #[serde(rename = "Medals")]
    #[tabled(rename = "Medals")]
    pub medals: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct SportMedalRow {
    #[serde(rename = "Sport")]
    #[tabled(rename = "Sport")]
    pub sport: String,
    #[serde(rename = "Medals")]
    #[tabled(rename = "Medals")]
    pub medals: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct SportYearMedalRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Sport")]
    #[tabled(rename = "Sport")]
    pub sport: String,
    #[serde(rename = "Medals")]
    #[tabled(rename = "Medals")]
    pub medals: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct ParticipantRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Season")]
    #[tabled(rename = "Season")]
    pub season: Season,
    #[serde(rename = "Sex")]
    #[tabled(rename = "Sex")]
    pub sex: Sex,
    #[serde(rename = "Participants")]
    #[tabled(rename = "Participants")]
    pub participants: usize,
}

/// Box-plot summary of ages for one sport.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct AgeSummaryRow {
    #[serde(rename = "Sport")]
    #[tabled(rename = "Sport")]
    pub sport: String,
    #[serde(rename = "Athletes")]
    #[tabled(rename = "Athletes")]
    pub athletes: usize,
    #[serde(rename = "Min")]
    #[tabled(rename = "Min")]
    pub min: f64,
    #[serde(rename = "Q1")]
    #[tabled(rename = "Q1")]
    pub q1: f64,
    #[serde(rename = "Median")]
    #[tabled(rename = "Median")]
    pub median: f64,
    #[serde(rename = "Q3")]
    #[tabled(rename = "Q3")]
    pub q3: f64,
    #[serde(rename = "Max")]
    #[tabled(rename = "Max")]
    pub max: f64,
    #[serde(rename = "Highlighted")]
    #[tabled(rename = "Highlighted")]
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct AgeCountRow {
    #[serde(rename = "Age")]
    #[tabled(rename = "Age")]
    pub age: i32,
    #[serde(rename = "Athletes")]
    #[tabled(rename = "Athletes")]
    pub athletes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct GroupMeanAgeRow {
    #[serde(rename = "Group")]
    #[tabled(rename = "Group")]
    pub group: String,
    #[serde(rename = "MeanAge")]
    #[tabled(rename = "MeanAge")]
    pub mean_age: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct ActivitySpanRow {
    #[serde(rename = "NameHash")]
    #[tabled(rename = "NameHash")]
    pub fingerprint: String,
    #[serde(rename = "MinAge")]
    #[tabled(rename = "MinAge")]
    pub min_age: f64,
    #[serde(rename = "MaxAge")]
    #[tabled(rename = "MaxAge")]
    pub max_age: f64,
    #[serde(rename = "ActiveYears")]
    #[tabled(rename = "ActiveYears")]
    pub active_years: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct ActiveYearsRow {
    #[serde(rename = "ActiveYears")]
    #[tabled(rename = "ActiveYears")]
    pub active_years: usize,
    #[serde(rename = "Athletes")]
    #[tabled(rename = "Athletes")]
    pub athletes: usize,
}

/// Medal types per year in wide form.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct MedalTypeYearRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Gold")]
    #[tabled(rename = "Gold")]
    pub gold: usize,
    #[serde(rename = "Silver")]
    #[tabled(rename = "Silver")]
    pub silver: usize,
    #[serde(rename = "Bronze")]
    #[tabled(rename = "Bronze")]
    pub bronze: usize,
    #[serde(rename = "Total")]
    #[tabled(rename = "Total")]
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct MedalCountRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Medal")]
    #[tabled(rename = "Medal")]
    pub medal: Medal,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct YearMedalRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Medals")]
    #[tabled(rename = "Medals")]
    pub medals: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct CountryMedalTypeRow {
    #[serde(rename = "NOC")]
    #[tabled(rename = "NOC")]
    pub noc: String,
    #[serde(rename = "Gold")]
    #[tabled(rename = "Gold")]
    pub gold: usize,
    #[serde(rename = "Silver")]
    #[tabled(rename = "Silver")]
    pub silver: usize,
    #[serde(rename = "Bronze")]
    #[tabled(rename = "Bronze")]
    pub bronze: usize,
    #[serde(rename = "Total")]
    #[tabled(rename = "Total")]
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct GroupYearMedalRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Group")]
    #[tabled(rename = "Group")]
    pub group: String,
    #[serde(rename = "Medals")]
    #[tabled(rename = "Medals")]
    pub medals: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct AgeMedalRow {
    #[serde(rename = "Age")]
    #[tabled(rename = "Age")]
    pub age: i32,
    #[serde(rename = "Medal")]
    #[tabled(rename = "Medal")]
    pub medal: Medal,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct GroupAgeRow {
    #[serde(rename = "Age")]
    #[tabled(rename = "Age")]
    pub age: i32,
    #[serde(rename = "Group")]
    #[tabled(rename = "Group")]
    pub group: String,
    #[serde(rename = "Athletes")]
    #[tabled(rename = "Athletes")]
    pub athletes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct MedalistAgeRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Age")]
    #[tabled(rename = "Age")]
    pub age: i32,
    #[serde(rename = "Medalists")]
    #[tabled(rename = "Medalists")]
    pub medalists: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct SexYearRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Sex")]
    #[tabled(rename = "Sex")]
    pub sex: Sex,
    #[serde(rename = "Entries")]
    #[tabled(rename = "Entries")]
    pub entries: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct EventHeatmapRow {
    #[serde(rename = "Event")]
    #[tabled(rename = "Event")]
    pub event: String,
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Entries")]
    #[tabled(rename = "Entries")]
    pub entries: usize,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub country: String,
    pub total_rows: usize,
    pub country_rows: usize,
    pub country_athletes: usize,
    pub unique_medals: usize,
    pub gold: usize,
    pub silver: usize,
    pub bronze: usize,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}
