use thiserror::Error;

/// Failures while reading the source dataset. All of them abort startup.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("line {line}: {reason}")]
    Malformed { line: u64, reason: String },
}

/// A selection the router has no view mapping for.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnknownSelection {
    #[error("unknown sport `{0}`")]
    Sport(String),

    #[error("unknown category `{0}`")]
    Category(String),

    #[error("category `{category}` is not offered for {sport}")]
    Unmapped { sport: String, category: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] DataLoadError),

    #[error(transparent)]
    Selection(#[from] UnknownSelection),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
