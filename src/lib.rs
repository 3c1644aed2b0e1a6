//! Olympic history reports for one country.
//!
//! The CSV is loaded and normalized once, anonymized, scoped to a country and
//! a handful of sports, and aggregated into immutable tables. A router maps a
//! home/sport/category selection onto those tables.
pub mod aggregate;
pub mod anonymize;
pub mod config;
pub mod dedup;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod router;
pub mod types;
pub mod util;

#[cfg(test)]
mod fixtures;

pub use error::{DataLoadError, Error, Result, UnknownSelection};
pub use pipeline::{build_pipeline, PipelineOutputs};
