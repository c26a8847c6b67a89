//! Historical trip records read from the training CSV

use crate::error::{FlightPriceError, Result};
use crate::utils::{f64_values, has_column, i64_values, string_values};
use polars::prelude::DataFrame;
use tracing::warn;

/// Columns every training file must carry
pub const REQUIRED_TRIP_COLUMNS: [&str; 5] = ["departure", "arrival", "airline", "to", "price"];

/// One historical flight
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub departure: String,
    pub arrival: String,
    pub airline: String,
    /// Destination airport code
    pub to: String,
    pub stops: Option<i64>,
    pub price: f64,
}

impl TripRecord {
    /// Split a training frame into per-row records.
    ///
    /// A missing required column fails the whole call. Rows with a null
    /// required cell come back as per-row validation errors so the caller
    /// can apply its invalid-row policy.
    pub fn from_frame(df: &DataFrame) -> Result<Vec<Result<TripRecord>>> {
        let missing: Vec<&str> = REQUIRED_TRIP_COLUMNS
            .iter()
            .copied()
            .filter(|c| !has_column(df, c))
            .collect();
        if !missing.is_empty() {
            return Err(FlightPriceError::Data(format!(
                "Training data is missing required columns: {}",
                missing.join(", ")
            )));
        }

        let departure = string_values(df, "departure")?;
        let arrival = string_values(df, "arrival")?;
        let airline = string_values(df, "airline")?;
        let to = string_values(df, "to")?;
        let price = f64_values(df, "price")?;
        let stops_present = has_column(df, "stops");
        let stops = if stops_present {
            i64_values(df, "stops")?
        } else {
            warn!("Training data has no `stops` column, every record gets 0 stops");
            vec![None; df.height()]
        };

        let records = (0..df.height())
            .map(|i| {
                let required = |name: &str, value: &Option<String>| {
                    value.clone().ok_or_else(|| {
                        FlightPriceError::Validation(format!("row {}: missing `{}`", i, name))
                    })
                };
                Ok(TripRecord {
                    departure: required("departure", &departure[i])?,
                    arrival: required("arrival", &arrival[i])?,
                    airline: required("airline", &airline[i])?,
                    to: required("to", &to[i])?,
                    stops: match stops[i] {
                        None if stops_present => {
                            return Err(FlightPriceError::Validation(format!(
                                "row {}: missing or invalid `stops`",
                                i
                            )))
                        }
                        value => value,
                    },
                    price: price[i].filter(|p| p.is_finite()).ok_or_else(|| {
                        FlightPriceError::Validation(format!("row {}: missing or invalid `price`", i))
                    })?,
                })
            })
            .collect();

        Ok(records)
    }
}
