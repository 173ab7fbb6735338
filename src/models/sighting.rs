//! Sighting records and the snapshot of one full-table fetch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;

/// Placeholder the sightings table uses in place of a NULL secondary type.
pub const MISSING_MARKER: &str = "n/a";

/// Returns true when a stored secondary type means "no secondary type".
pub fn is_missing_marker(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(MISSING_MARKER)
}

/// Raw row as stored. Extra columns returned by `SELECT *` are ignored.
#[derive(Debug, Clone, FromRow)]
pub struct SightingRow {
    pub name: String,
    pub primary_type: String,
    pub secondary_type: Option<String>,
    pub lat: f64,
    pub long: f64,
}

/// One Pokémon sighting with the missing-type marker resolved to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sighting {
    pub name: String,
    pub primary_type: String,
    pub secondary_type: Option<String>,
    pub lat: f64,
    pub long: f64,
}

impl Sighting {
    pub fn new(
        name: impl Into<String>,
        primary_type: impl Into<String>,
        secondary_type: Option<&str>,
        lat: f64,
        long: f64,
    ) -> Self {
        Self {
            name: name.into(),
            primary_type: primary_type.into(),
            secondary_type: secondary_type
                .filter(|v| !is_missing_marker(v))
                .map(str::to_string),
            lat,
            long,
        }
    }

    /// Secondary type, treating any leftover marker value as missing.
    pub fn secondary(&self) -> Option<&str> {
        self.secondary_type
            .as_deref()
            .filter(|v| !is_missing_marker(v))
    }
}

impl From<SightingRow> for Sighting {
    fn from(row: SightingRow) -> Self {
        Sighting::new(
            row.name,
            row.primary_type,
            row.secondary_type.as_deref(),
            row.lat,
            row.long,
        )
    }
}

/// Full in-memory copy of the sightings table as of one fetch.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub sightings: Vec<Sighting>,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(sightings: Vec<Sighting>) -> Self {
        Self {
            sightings,
            fetched_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.sightings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sightings.is_empty()
    }

    /// Check every row can be charted. An empty snapshot is valid.
    pub fn validate(&self) -> Result<(), AppError> {
        for (index, s) in self.sightings.iter().enumerate() {
            if s.name.trim().is_empty() {
                return Err(AppError::DataShape(format!("row {index}: blank name")));
            }
            if s.primary_type.trim().is_empty() {
                return Err(AppError::DataShape(format!(
                    "row {index} ({}): blank primary_type",
                    s.name
                )));
            }
            if !s.lat.is_finite() || !s.long.is_finite() {
                return Err(AppError::DataShape(format!(
                    "row {index} ({}): non-finite coordinates ({}, {})",
                    s.name, s.lat, s.long
                )));
            }
        }
        Ok(())
    }
}
