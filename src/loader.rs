use crate::error::DataLoadError;
use crate::types::{EventRecord, Medal, RawRow, Season, Sex, REQUIRED_COLUMNS};
use crate::util::{format_int, median, parse_f64_opt, parse_int, text};
use csv::ReaderBuilder;
use log::{debug, info};
use std::path::Path;

/// How one numeric column was imputed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Imputation {
    pub missing: usize,
    pub median: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub age: Imputation,
    pub height: Imputation,
    pub weight: Imputation,
}

/// Row with its numeric gaps still open; filled once all medians are known.
struct Partial {
    record: EventRecord,
    age: Option<f64>,
    height: Option<f64>,
    weight: Option<f64>,
}

pub fn load_and_normalize<P: AsRef<Path>>(
    path: P,
) -> Result<(Vec<EventRecord>, LoadReport), DataLoadError> {
    let path = path.as_ref();
    let io_err = |source| DataLoadError::Io {
        path: path.display().to_string(),
        source,
    };
    // Serde matches header names exactly, so padded names are trimmed first.
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(io_err)?;

    let headers = rdr.headers().map_err(io_err)?.clone();
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(DataLoadError::MissingColumn(col));
        }
    }

    let mut partials: Vec<Partial> = Vec::new();
    for (idx, result) in rdr.deserialize::<RawRow>().enumerate() {
        // Header is line 1.
        let line = idx as u64 + 2;
        let row = result.map_err(|e| DataLoadError::Malformed {
            line: e.position().map(|p| p.line()).unwrap_or(line),
            reason: e.to_string(),
        })?;
        let partial =
            parse_row(row).map_err(|reason| DataLoadError::Malformed { line, reason })?;
        partials.push(partial);
    }

    let age = impute(&partials, |p| p.age);
    let height = impute(&partials, |p| p.height);
    let weight = impute(&partials, |p| p.weight);

    let records: Vec<EventRecord> = partials
        .into_iter()
        .map(|p| EventRecord {
            age: p.age.unwrap_or(age.median),
            height: p.height.unwrap_or(height.median),
            weight: p.weight.unwrap_or(weight.median),
            ..p.record
        })
        .collect();

    info!(
        "loaded {} rows from {}",
        format_int(records.len()),
        path.display()
    );
    for (name, imp) in [("Age", age), ("Height", height), ("Weight", weight)] {
        if imp.missing > 0 {
            info!(
                "imputed {} missing {} values with median {}",
                format_int(imp.missing),
                name,
                imp.median
            );
        }
    }

    let report = LoadReport {
        total_rows: records.len(),
        age,
        height,
        weight,
    };
    Ok((records, report))
}

/// Whole-table median of the present values; `0.0` when the column is empty.
fn impute(rows: &[Partial], field: impl Fn(&Partial) -> Option<f64>) -> Imputation {
    let present: Vec<f64> = rows.iter().filter_map(&field).collect();
    let missing = rows.len() - present.len();
    let median = median(present);
    debug!("median over {} values: {}", rows.len() - missing, median);
    Imputation { missing, median }
}

fn parse_row(row: RawRow) -> Result<Partial, String> {
    let id: u32 = parse_int(row.id.as_deref(), "ID")?;
    let year: i32 = parse_int(row.year.as_deref(), "Year")?;
    let sex_raw = row.sex.as_deref().unwrap_or_default();
    let sex = Sex::parse(sex_raw).ok_or_else(|| format!("unknown sex `{}`", sex_raw))?;
    let season_raw = row.season.as_deref().unwrap_or_default();
    let season =
        Season::parse(season_raw).ok_or_else(|| format!("unknown season `{}`", season_raw))?;
    let medal = Medal::parse(row.medal.as_deref())?;
    let age = parse_f64_opt(row.age.as_deref()).map_err(|e| format!("Age {}", e))?;
    let height = parse_f64_opt(row.height.as_deref()).map_err(|e| format!("Height {}", e))?;
    let weight = parse_f64_opt(row.weight.as_deref()).map_err(|e| format!("Weight {}", e))?;

    Ok(Partial {
        record: EventRecord {
            id,
            name: text(row.name),
            sex,
            age: 0.0,
            height: 0.0,
            weight: 0.0,
            team: text(row.team),
            noc: text(row.noc),
            games: text(row.games),
            year,
            season,
            city: text(row.city),
            sport: text(row.sport),
            event: text(row.event),
            medal,
        },
        age,
        height,
        weight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str =
        "\"ID\",\"Name\",\"Sex\",\"Age\",\"Height\",\"Weight\",\"Team\",\"NOC\",\"Games\",\"Year\",\"Season\",\"City\",\"Sport\",\"Event\",\"Medal\"";

    fn csv_file(body: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "{}", HEADER).unwrap();
        write!(f, "{}", body).unwrap();
        f
    }

    #[test]
    fn imputes_whole_table_medians() {
        let f = csv_file(
            "1,\"A\",M,20,180,NA,Italy,ITA,\"2000 Summer\",2000,Summer,Sydney,Fencing,\"Fencing Men's Foil\",NA\n\
             2,\"B\",F,NA,170,60,Italy,ITA,\"2000 Summer\",2000,Summer,Sydney,Fencing,\"Fencing Women's Foil\",Gold\n\
             3,\"C\",F,30,NA,70,France,FRA,\"2002 Winter\",2002,Winter,\"Salt Lake City\",Luge,\"Luge Women's Singles\",NA\n\
             4,\"D\",M,40,160,80,France,FRA,\"2002 Winter\",2002,Winter,\"Salt Lake City\",Luge,\"Luge Men's Singles\",Bronze\n",
        );
        let (records, report) = load_and_normalize(f.path()).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(report.age, Imputation { missing: 1, median: 30.0 });
        assert_eq!(report.height, Imputation { missing: 1, median: 170.0 });
        assert_eq!(report.weight, Imputation { missing: 1, median: 70.0 });

        assert_eq!(records[1].age, 30.0);
        assert_eq!(records[2].height, 170.0);
        assert_eq!(records[0].weight, 70.0);
        assert_eq!(records[1].medal, Some(Medal::Gold));
        assert_eq!(records[0].medal, None);
        assert_eq!(records[2].season, Season::Winter);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_and_normalize("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::Io { .. }));
    }

    #[test]
    fn missing_column_is_an_error() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "ID,Name,Sex").unwrap();
        writeln!(f, "1,A,M").unwrap();
        let err = load_and_normalize(f.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn("Age")));
    }

    #[test]
    fn padded_header_names_still_map() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(
            f,
            "ID, Name,Sex, Age ,Height,Weight,Team,NOC,Games,Year,Season,City,Sport,Event,Medal"
        )
        .unwrap();
        writeln!(f, "1,A,M,27,180,70,Italy,ITA,2000 Summer,2000,Summer,Sydney,Fencing,Foil,NA")
            .unwrap();
        let (records, report) = load_and_normalize(f.path()).unwrap();
        assert_eq!(report.age.missing, 0);
        assert_eq!(records[0].age, 27.0);
        assert_eq!(records[0].name, "A");
    }

    #[test]
    fn malformed_row_reports_line() {
        let f = csv_file(
            "1,\"A\",M,20,180,70,Italy,ITA,\"2000 Summer\",2000,Summer,Sydney,Fencing,Foil,NA\n\
             2,\"B\",X,20,180,70,Italy,ITA,\"2000 Summer\",2000,Summer,Sydney,Fencing,Foil,NA\n",
        );
        match load_and_normalize(f.path()).unwrap_err() {
            DataLoadError::Malformed { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("sex"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
