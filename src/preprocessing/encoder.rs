//! One-hot categorical encoding

use crate::error::{FlightPriceError, Result};
use crate::utils::string_values;
use ndarray::{Array2, ArrayViewMut2};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Fitted categories of one column, sorted lexicographically
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryVocabulary {
    pub column: String,
    pub categories: Vec<String>,
}

impl CategoryVocabulary {
    /// Indicator position of a category, `None` when unseen at fit time
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }

    pub(crate) fn len(&self) -> usize {
        self.categories.len()
    }

    /// Lookups rely on strictly increasing categories
    fn is_strictly_sorted(&self) -> bool {
        self.categories.windows(2).all(|pair| pair[0] < pair[1])
    }

    fn feature_names(&self) -> impl Iterator<Item = String> + '_ {
        self.categories
            .iter()
            .map(move |c| format!("{}_{}", self.column, c))
    }
}

/// One-hot encoder that ignores unknown categories.
///
/// Each fitted category gets one indicator column. A value not seen at fit
/// time, or a null cell, encodes as all zeros for that column's block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OneHotEncoder {
    vocabularies: Vec<CategoryVocabulary>,
    is_fitted: bool,
}

impl OneHotEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn the sorted category set of each column
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        let mut vocabularies = Vec::with_capacity(columns.len());

        for col_name in columns {
            let values = string_values(df, col_name)?;
            let categories: BTreeSet<String> = values.into_iter().flatten().collect();
            vocabularies.push(CategoryVocabulary {
                column: col_name.to_string(),
                categories: categories.into_iter().collect(),
            });
        }

        self.vocabularies = vocabularies;
        self.is_fitted = true;
        Ok(self)
    }

    /// Total number of indicator columns produced
    pub fn n_output_columns(&self) -> usize {
        self.vocabularies.iter().map(CategoryVocabulary::len).sum()
    }

    pub fn vocabularies(&self) -> &[CategoryVocabulary] {
        &self.vocabularies
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Check that a fitted encoder covers `columns`, in order, with
    /// strictly sorted vocabularies
    pub fn validate(&self, columns: &[&str]) -> Result<()> {
        if !self.is_fitted {
            return Err(FlightPriceError::NotFitted);
        }
        let fitted: Vec<&str> = self.vocabularies.iter().map(|v| v.column.as_str()).collect();
        if fitted != columns {
            return Err(FlightPriceError::InvalidArtifact(format!(
                "encoder columns {:?} do not match {:?}",
                fitted, columns
            )));
        }
        if let Some(vocab) = self.vocabularies.iter().find(|v| !v.is_strictly_sorted()) {
            return Err(FlightPriceError::InvalidArtifact(format!(
                "categories of `{}` are not sorted and unique",
                vocab.column
            )));
        }
        Ok(())
    }

    /// Output column names, `<column>_<category>`
    pub fn feature_names(&self) -> Vec<String> {
        self.vocabularies
            .iter()
            .flat_map(|v| v.feature_names())
            .collect()
    }

    /// Encode into a freshly allocated matrix
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        let mut out = Array2::zeros((df.height(), self.n_output_columns()));
        self.transform_into(df, out.view_mut())?;
        Ok(out)
    }

    /// Write indicators into `out`, which must be zeroed and exactly
    /// `n_output_columns()` wide
    pub fn transform_into(&self, df: &DataFrame, mut out: ArrayViewMut2<f64>) -> Result<()> {
        if !self.is_fitted {
            return Err(FlightPriceError::NotFitted);
        }
        if out.ncols() != self.n_output_columns() || out.nrows() != df.height() {
            return Err(FlightPriceError::DimensionMismatch {
                expected: self.n_output_columns(),
                actual: out.ncols(),
            });
        }

        let mut offset = 0;
        for vocab in &self.vocabularies {
            let values = string_values(df, &vocab.column)?;
            for (row, value) in values.iter().enumerate() {
                if let Some(idx) = value.as_deref().and_then(|v| vocab.index_of(v)) {
                    out[[row, offset + idx]] = 1.0;
                }
            }
            offset += vocab.len();
        }

        Ok(())
    }
}
