//! Feature extractor shared by training and serving

use super::{parse_timestamp, FeatureVector, TripRecord};
use crate::error::{FlightPriceError, Result};
use chrono::{NaiveDateTime, Timelike};

/// Duration assumed when a request does not supply one
pub const DEFAULT_FLIGHT_DURATION_HOURS: f64 = 2.0;

const MILLIS_PER_DAY: i64 = 86_400_000;
const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// A validated price query: required fields present, optionals not yet defaulted
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuery {
    pub departure_time: String,
    pub airline: String,
    pub arrival_airport: String,
    pub stops: Option<i64>,
    pub flight_duration: Option<f64>,
}

/// Derives [`FeatureVector`]s relative to a fixed reference instant.
///
/// The reference instant is the "now" that `days_until_departure` is
/// measured from. Training captures it once per run; serving passes the
/// request time. A model therefore encodes the instant it was trained at.
#[derive(Debug, Clone, Copy)]
pub struct FeatureExtractor {
    reference: NaiveDateTime,
}

impl FeatureExtractor {
    pub fn new(reference: NaiveDateTime) -> Self {
        Self { reference }
    }

    /// Extract features from a historical trip. Duration is arrival minus departure.
    pub fn from_trip(&self, trip: &TripRecord) -> Result<FeatureVector> {
        let departure = parse_timestamp(&trip.departure)?;
        let arrival = parse_timestamp(&trip.arrival)?;
        if arrival < departure {
            return Err(FlightPriceError::Validation(format!(
                "Arrival {} precedes departure {}",
                trip.arrival, trip.departure
            )));
        }
        let duration_hours = (arrival - departure).num_milliseconds() as f64 / MILLIS_PER_HOUR;

        self.build(
            departure,
            &trip.airline,
            &trip.to,
            trip.stops.unwrap_or(0),
            duration_hours,
        )
    }

    /// Extract features from a price query, applying request defaults.
    pub fn from_query(&self, query: &PriceQuery) -> Result<FeatureVector> {
        let departure = parse_timestamp(&query.departure_time)?;
        let duration_hours = query.flight_duration.unwrap_or(DEFAULT_FLIGHT_DURATION_HOURS);
        if !duration_hours.is_finite() || duration_hours < 0.0 {
            return Err(FlightPriceError::Validation(format!(
                "flight_duration must be a non-negative number of hours, got {}",
                duration_hours
            )));
        }

        self.build(
            departure,
            &query.airline,
            &query.arrival_airport,
            query.stops.unwrap_or(0),
            duration_hours,
        )
    }

    fn build(
        &self,
        departure: NaiveDateTime,
        airline: &str,
        arrival_airport: &str,
        stops: i64,
        flight_duration: f64,
    ) -> Result<FeatureVector> {
        if stops < 0 {
            return Err(FlightPriceError::Validation(format!(
                "stops must be non-negative, got {}",
                stops
            )));
        }

        // Whole days, floored like a negative timedelta's day component
        let until = (departure - self.reference).num_milliseconds();
        let days_until_departure = until.div_euclid(MILLIS_PER_DAY);

        Ok(FeatureVector {
            departure_hour: departure.hour(),
            days_until_departure,
            airline: airline.to_string(),
            arrival_airport: arrival_airport.to_string(),
            stops,
            flight_duration,
        })
    }
}
