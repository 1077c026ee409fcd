//! Error taxonomy for the load → filter → aggregate pipeline.
//!
//! Load-time errors (`Configuration`, `DataSource`, `MalformedRecord`) abort a
//! whole query run. `MissingColumn` and `EmptyDataset` are scoped to the single
//! statistic group that raised them.

use crate::config::City;

#[derive(Debug, thiserror::Error)]
pub enum ExploreError {
    /// Unknown city identifier or an unusable filter selection.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Source file missing, unreadable, empty, or lacking a required column.
    #[error("data source for {city} ({path}): {reason}")]
    DataSource {
        city: City,
        path: String,
        reason: String,
    },

    /// A required field failed to parse.
    #[error("{city}: row {row} has malformed {field} '{value}'")]
    MalformedRecord {
        city: City,
        row: usize,
        field: &'static str,
        value: String,
    },

    /// An optional column needed by a statistic has no data for this city.
    #[error("{city}: column '{column}' is unavailable")]
    MissingColumn { city: City, column: &'static str },

    /// The filtered view has no records.
    #[error("{city}: no trips match the filter, cannot compute {group}")]
    EmptyDataset { city: City, group: &'static str },
}

impl ExploreError {
    /// True for errors that only invalidate one statistic group.
    pub fn is_scoped(&self) -> bool {
        matches!(
            self,
            ExploreError::MissingColumn { .. } | ExploreError::EmptyDataset { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ExploreError>;
