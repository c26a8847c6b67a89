//! Data preprocessing module
//!
//! Turns feature frames into the numeric matrix the regression model
//! consumes:
//! - One-hot encoding of categorical columns, unknown categories ignored
//! - Pass-through of numeric columns
//! - JSON persistence of the fitted vocabulary and column layout

mod encoder;
mod pipeline;

pub use encoder::{CategoryVocabulary, OneHotEncoder};
pub use pipeline::Preprocessor;

use serde::{Deserialize, Serialize};

/// Column data type for preprocessing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Numeric,
    Categorical,
}

/// A declared input column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub dtype: ColumnType,
}

impl ColumnSpec {
    pub fn numeric(name: impl Into<String>) -> Self {
        Self { name: name.into(), dtype: ColumnType::Numeric }
    }

    pub fn categorical(name: impl Into<String>) -> Self {
        Self { name: name.into(), dtype: ColumnType::Categorical }
    }
}
