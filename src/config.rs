//! Startup configuration: command line plus the static sport/category table.
use crate::router::Category;
use clap::Parser;
use once_cell::sync::Lazy;
use std::path::PathBuf;

/// Sports the shell offers and, per sport, the categories in menu order.
pub static SPORT_OPTIONS: Lazy<Vec<SportOptions>> = Lazy::new(|| {
    vec![
        SportOptions {
            name: "Cycling",
            categories: vec![Category::General, Category::Age, Category::Medals],
            event_aliases: vec![(
                "Cycling Women's Team Pursuit",
                "Cycling Women's Team Pursuit, 4,000 metres",
            )],
        },
        SportOptions {
            name: "Equestrianism",
            categories: vec![
                Category::Medals,
                Category::Gender,
                Category::Age,
                Category::ActiveYears,
            ],
            event_aliases: vec![],
        },
        SportOptions {
            name: "Fencing",
            categories: vec![Category::Age, Category::Medals],
            event_aliases: vec![],
        },
        SportOptions {
            name: "Swimming",
            categories: vec![Category::Age, Category::Medals],
            event_aliases: vec![],
        },
    ]
});

#[derive(Debug, Clone, PartialEq)]
pub struct SportOptions {
    pub name: &'static str,
    pub categories: Vec<Category>,
    /// Event names rewritten before grouping, `(from, to)`.
    pub event_aliases: Vec<(&'static str, &'static str)>,
}

#[derive(Debug, Parser)]
#[command(name = "olympic_report", about = "Olympic history reports for one country")]
pub struct Cli {
    /// Path to athlete_events.csv
    #[arg(long, env = "OLYMPICS_DATA", default_value = "athlete_events.csv")]
    pub input: PathBuf,

    /// Three-letter NOC code to report on
    #[arg(long, default_value = "ITA")]
    pub country: String,

    /// Number of countries in the global medal ranking
    #[arg(long, default_value_t = 20)]
    pub top: usize,

    /// Write every view as CSV (plus summary.json) into this directory and exit
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Print the views of one sport and exit (requires --category)
    #[arg(long, requires = "category")]
    pub sport: Option<String>,

    /// Category for --sport, e.g. `age` or `medals`
    #[arg(long, requires = "sport")]
    pub category: Option<String>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub country: String,
    pub top_countries: usize,
    pub top_sports: usize,
    pub top_sport_countries: usize,
    pub sports: Vec<SportOptions>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: PathBuf::from("athlete_events.csv"),
            country: "ITA".to_string(),
            top_countries: 20,
            top_sports: 10,
            top_sport_countries: 15,
            sports: SPORT_OPTIONS.clone(),
        }
    }
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Config {
            input: cli.input.clone(),
            country: cli.country.trim().to_uppercase(),
            top_countries: cli.top,
            ..Config::default()
        }
    }

    /// Case-insensitive lookup of a configured sport.
    pub fn sport(&self, name: &str) -> Option<&SportOptions> {
        let name = name.trim();
        self.sports.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn sport_names(&self) -> Vec<&'static str> {
        self.sports.iter().map(|s| s.name).collect()
    }
}
