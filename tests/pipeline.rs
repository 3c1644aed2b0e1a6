use olympic_report::anonymize::fingerprint;
use olympic_report::config::Config;
use olympic_report::dedup::{count_by_medal, unique_team_medals};
use olympic_report::filter::{scope_to_country, scope_to_sport};
use olympic_report::loader::load_and_normalize;
use olympic_report::router::{Category, Page, Router, Selection, ViewId};
use olympic_report::{build_pipeline, DataLoadError};
use std::io::Write;
use tempfile::NamedTempFile;

const CSV: &str = r#""ID","Name","Sex","Age","Height","Weight","Team","NOC","Games","Year","Season","City","Sport","Event","Medal"
1,"Marco Villa",M,NA,180,72,"Italy",ITA,"2008 Summer",2008,Summer,Beijing,Cycling,"Cycling Men's Team Pursuit, 4,000 metres",Gold
2,"Fabio Masotti",M,26,178,70,"Italy",ITA,"2008 Summer",2008,Summer,Beijing,Cycling,"Cycling Men's Team Pursuit, 4,000 metres",Gold
3,"Bradley Wiggins",M,28,NA,69,"Great Britain",GBR,"2008 Summer",2008,Summer,Beijing,Cycling,"Cycling Men's Individual Pursuit, 4,000 metres",Gold
4,"Valentina Vezzali",F,34,164,NA,"Italy",ITA,"2008 Summer",2008,Summer,Beijing,Fencing,"Fencing Women's Foil, Individual",Gold
4,"Valentina Vezzali",F,38,164,55,"Italy",ITA,"2012 Summer",2012,Summer,London,Fencing,"Fencing Women's Foil, Individual",Bronze
5,"Federica Pellegrini",F,20,179,65,"Italy",ITA,"2008 Summer",2008,Summer,Beijing,Swimming,"Swimming Women's 200 metres Freestyle",Gold
6,"Young Swimmer",F,0,160,50,"Italy",ITA,"2012 Summer",2012,Summer,London,Swimming,"Swimming Women's 100 metres Freestyle",NA
7,"Armin Zoeggeler",M,32,182,90,"Italy",ITA,"2006 Winter",2006,Winter,Torino,Luge,"Luge Men's Singles",Gold
8,"Piero D'Inzeo",M,36,175,68,"Italy",ITA,"1960 Summer",1960,Summer,Roma,Equestrianism,"Equestrianism Mixed Jumping, Individual",Silver
8,"Piero D'Inzeo",M,48,175,68,"Italy",ITA,"1972 Summer",1972,Summer,Munich,Equestrianism,"Equestrianism Mixed Jumping, Individual",NA
"#;

fn dataset() -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    write!(f, "{}", CSV).unwrap();
    f
}

#[test]
fn load_imputes_before_filtering() {
    let f = dataset();
    let (records, report) = load_and_normalize(f.path()).unwrap();
    assert_eq!(records.len(), 10);
    assert_eq!(report.age.missing, 1);
    // Ages present: 26 28 34 38 20 0 32 36 48.
    assert_eq!(report.age.median, 32.0);
    assert_eq!(records[0].age, 32.0);
    assert!(records.iter().all(|r| r.height > 0.0 && r.weight > 0.0));
}

#[test]
fn unknown_country_is_empty_not_an_error() {
    let f = dataset();
    let (records, _) = load_and_normalize(f.path()).unwrap();
    let rows = olympic_report::anonymize::anonymize(records);
    assert!(scope_to_country(&rows, "XYZ").is_empty());
    assert_eq!(rows[0].fingerprint, fingerprint("Marco Villa"));
    assert_eq!(rows[3].fingerprint, rows[4].fingerprint);
}

#[test]
fn team_pursuit_counts_as_one_medal() {
    let f = dataset();
    let (records, _) = load_and_normalize(f.path()).unwrap();
    let rows = olympic_report::anonymize::anonymize(records);
    let cycling = scope_to_sport(&scope_to_country(&rows, "ITA"), "Cycling");
    let unique = unique_team_medals(&cycling);
    assert_eq!(unique.len(), 1);
    let counts = count_by_medal(&unique);
    assert_eq!(counts.iter().sum::<usize>(), unique.len());
}

#[test]
fn full_pipeline_and_routing() {
    let f = dataset();
    let (records, _) = load_and_normalize(f.path()).unwrap();
    let config = Config::default();
    let out = build_pipeline(records, &config);

    // Italy: pursuit gold, foil gold, foil bronze, 200m gold, luge gold, jumping silver.
    assert_eq!(out.summary.unique_medals, 6);
    assert_eq!(out.summary.gold, 4);
    assert_eq!(out.home.global_top_countries[0].noc, "ITA");
    assert!(out.home.global_top_countries[0].highlighted);

    let season_total: usize = out.home.medals_by_year_season.iter().map(|r| r.medals).sum();
    assert_eq!(season_total, out.summary.unique_medals);

    let swim = &out.sports["Swimming"];
    let ages: Vec<i32> = swim.age_histogram.iter().map(|r| r.age).collect();
    assert_eq!(ages, vec![20]);

    let eq = &out.sports["Equestrianism"];
    assert_eq!(eq.activity_spans.len(), 1);
    assert_eq!(eq.activity_spans[0].active_years, 2);
    assert_eq!((eq.activity_spans[0].min_age, eq.activity_spans[0].max_age), (36.0, 48.0));

    let router = Router::new(&out, &config);
    let page = router.resolve(&Selection::Sport {
        sport: "Fencing".into(),
        category: Category::Medals,
    });
    let Page::Views(views) = page else {
        panic!("fencing medals should resolve");
    };
    let wide = views.iter().find(|v| v.id == ViewId::MedalTypesByYear).unwrap();
    assert_eq!(wide.table.len(), 2);

    let page = router.resolve(&Selection::Sport {
        sport: "Fencing".into(),
        category: Category::Gender,
    });
    assert!(matches!(page, Page::Placeholder(_)));
}

#[test]
fn export_writes_headers_for_empty_views() {
    let f = dataset();
    let (records, _) = load_and_normalize(f.path()).unwrap();
    let config = Config {
        country: "XYZ".to_string(),
        ..Config::default()
    };
    let out = build_pipeline(records, &config);
    let router = Router::new(&out, &config);
    let dir = tempfile::tempdir().unwrap();

    for (sub, views) in router.all_pages() {
        let page_dir = dir.path().join(&sub);
        std::fs::create_dir_all(&page_dir).unwrap();
        for v in views {
            v.table
                .write_csv(&page_dir.join(format!("{}.csv", v.id.name())))
                .unwrap();
        }
    }

    let body = std::fs::read_to_string(dir.path().join("home/medals_by_year_season.csv")).unwrap();
    assert_eq!(body.trim_end(), "Year,Season,Medals");

    // World views do not depend on the scoped country.
    let body = std::fs::read_to_string(dir.path().join("cycling/medals_by_country.csv")).unwrap();
    let mut lines = body.lines();
    assert_eq!(lines.next(), Some("NOC,Gold,Silver,Bronze,Total"));
    assert_eq!(lines.count(), 2);
}

#[test]
fn missing_file_fails_to_load() {
    assert!(matches!(
        load_and_normalize("no/such/athlete_events.csv"),
        Err(DataLoadError::Io { .. })
    ));
}
