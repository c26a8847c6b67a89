//! Data loading utilities

use crate::error::{FlightPriceError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Number of rows polars inspects when inferring CSV column types
const INFER_SCHEMA_ROWS: usize = 1000;

/// CSV loader for historical flight data
#[derive(Debug, Clone)]
pub struct DataLoader {
    delimiter: u8,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Set the field delimiter (`,` by default)
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load a CSV file with a header row
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            FlightPriceError::Data(format!("Cannot open {}: {}", path.display(), e))
        })?;

        let parse_opts = CsvParseOptions::default().with_separator(self.delimiter);

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .with_parse_options(parse_opts)
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| FlightPriceError::Data(format!("Cannot parse {}: {}", path.display(), e)))?;

        debug!(path = %path.display(), rows = df.height(), columns = df.width(), "Loaded CSV");
        Ok(df)
    }
}

fn column_series(df: &DataFrame, name: &str, dtype: &DataType) -> Result<Series> {
    let column = df
        .column(name)
        .map_err(|_| FlightPriceError::FeatureNotFound(name.to_string()))?;
    let series = column.as_materialized_series().cast(dtype)?;
    Ok(series)
}

/// Read a column as optional strings, casting non-string columns
pub fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = column_series(df, name, &DataType::String)?;
    let ca = series.str()?;
    Ok(ca.into_iter().map(|v| v.map(str::to_string)).collect())
}

/// Read a column as optional floats. Unparseable cells become `None`.
pub fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = column_series(df, name, &DataType::Float64)?;
    let ca = series.f64()?;
    Ok(ca.into_iter().collect())
}

/// Read a column as optional integers. Unparseable cells become `None`.
pub fn i64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let series = column_series(df, name, &DataType::Int64)?;
    let ca = series.i64()?;
    Ok(ca.into_iter().collect())
}

/// Whether the frame has a column with the given name
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}
