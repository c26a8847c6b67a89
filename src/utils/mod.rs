//! Utility functions and types

pub mod data_loader;

pub use data_loader::{f64_values, has_column, i64_values, string_values, DataLoader};

/// Round to two decimal places, as prices are reported
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
