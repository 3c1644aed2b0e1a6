use crate::error::Result;
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table as TabledTable, Tabled};

/// Write rows as CSV. The header is written even when there are no rows so
/// an empty scope still has its schema on disk.
pub fn write_csv<T, P>(path: P, rows: &[T]) -> Result<()>
where
    T: Serialize + Tabled,
    P: AsRef<Path>,
{
    let mut wtr = csv::Writer::from_path(path)?;
    if rows.is_empty() {
        let headers = T::headers();
        wtr.write_record(headers.iter().map(|h| h.as_bytes()))?;
    }
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Markdown rendering of the first `max_rows` rows, or `(no rows)`.
pub fn render_rows<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    TabledTable::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", render_rows(rows, max_rows));
}

/// Type-erased aggregate table, so views of different row types can sit in
/// one list.
pub trait Table {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn render(&self, max_rows: usize) -> String;

    fn write_csv(&self, path: &Path) -> Result<()>;
}

impl<T> Table for Vec<T>
where
    T: Serialize + Tabled + Clone,
{
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn render(&self, max_rows: usize) -> String {
        render_rows(self, max_rows)
    }

    fn write_csv(&self, path: &Path) -> Result<()> {
        write_csv(path, self)
    }
}
