//! Reference lists of accepted filter values.
//!
//! The set of valid country/region and province/state names is external
//! data: one single-column CSV per dimension, shipped under `data/` by
//! default. Lists are loaded once per [`Validator`] and only ever used for
//! exact, case-sensitive membership tests.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub(crate) const COUNTRY_REGION_FILE: &str = "country_region.csv";
pub(crate) const STATE_PROVINCE_FILE: &str = "state_province.csv";

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Failed to read reference list '{0}'")]
    ListRead(PathBuf, #[source] PolarsError),

    #[error("Reference list '{0}' has no columns")]
    NoColumns(PathBuf),

    #[error("Reference list '{0}' is not a text column")]
    NotText(PathBuf, #[source] PolarsError),

    #[error("Reference list '{0}' is empty")]
    EmptyReference(PathBuf),

    #[error("'{value}' is not a valid {dimension}. Use one of the following values: {accepted:?}")]
    UnknownValue {
        dimension: &'static str,
        value: String,
        accepted: Vec<String>,
    },
}

/// An immutable set of permitted values for one filter dimension.
#[derive(Debug)]
pub struct ReferenceList {
    dimension: &'static str,
    values: Vec<String>,
}

impl ReferenceList {
    /// Loads a one-column CSV (header row included) from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyReference`] when the file parses but
    /// holds zero data rows, and a read error when it cannot be parsed at
    /// all.
    pub fn load(path: &Path, dimension: &'static str) -> Result<Self, ValidationError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .map_err(|e| ValidationError::ListRead(path.to_path_buf(), e))?
            .finish()
            .map_err(|e| ValidationError::ListRead(path.to_path_buf(), e))?;

        let column = df
            .get_columns()
            .first()
            .ok_or_else(|| ValidationError::NoColumns(path.to_path_buf()))?;
        let values: Vec<String> = column
            .str()
            .map_err(|e| ValidationError::NotText(path.to_path_buf(), e))?
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect();

        if values.is_empty() {
            return Err(ValidationError::EmptyReference(path.to_path_buf()));
        }

        Ok(Self { dimension, values })
    }

    /// Exact, case-sensitive membership test. Succeeds silently; failure
    /// carries the rejected value and the full accepted list.
    pub fn check(&self, value: &str) -> Result<(), ValidationError> {
        if self.values.iter().any(|v| v == value) {
            Ok(())
        } else {
            Err(ValidationError::UnknownValue {
                dimension: self.dimension,
                value: value.to_string(),
                accepted: self.values.clone(),
            })
        }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// Validates filter arguments against the two reference lists.
pub struct Validator {
    country_region: ReferenceList,
    province_state: ReferenceList,
}

impl Validator {
    /// Loads `country_region.csv` and `state_province.csv` from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, ValidationError> {
        Ok(Self {
            country_region: ReferenceList::load(&dir.join(COUNTRY_REGION_FILE), "country/region")?,
            province_state: ReferenceList::load(&dir.join(STATE_PROVINCE_FILE), "province/state")?,
        })
    }

    pub fn validate_country_region(&self, name: &str) -> Result<(), ValidationError> {
        self.country_region.check(name)
    }

    pub fn validate_province_state(&self, name: &str) -> Result<(), ValidationError> {
        self.province_state.check(name)
    }
}
