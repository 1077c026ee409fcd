//! Result types produced by the aggregator.

use serde::Serialize;

/// Most frequent value of a field, with its count out of `total` records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mode<T> {
    pub value: T,
    pub count: usize,
    pub total: usize,
}

/// Busiest month (1-12), weekday (0 = Monday) and start hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeStats {
    pub month: Mode<u32>,
    pub weekday: Mode<u32>,
    pub hour: Mode<u32>,
}

/// Busiest start station, end station, and start/end pair (`"A - B"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationStats {
    pub start: Mode<String>,
    pub end: Mode<String>,
    pub trip: Mode<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub trips: usize,
    /// Trips in the view without a duration; the totals and averages skip them.
    pub missing: usize,
    pub total_seconds: f64,
    pub total_hours: f64,
    pub mean_seconds: f64,
    pub mean_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Counts per distinct value, highest first. `missing` counts records with
/// no value, so `counts` plus `missing` always add up to `total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub counts: Vec<ValueCount>,
    pub missing: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgeRange {
    pub reference_year: i32,
    /// Ages in years, wide enough for any `i32` birth year.
    pub youngest: i64,
    pub oldest: i64,
    pub latest_birth_year: i32,
    pub earliest_birth_year: i32,
}

/// A statistic that was computed, or the reason it was skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Availability<T> {
    Available(T),
    Unavailable { reason: String },
}

impl<T> Availability<T> {
    pub fn available(&self) -> Option<&T> {
        match self {
            Availability::Available(value) => Some(value),
            Availability::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub user_types: Availability<CategoryCounts>,
    pub genders: Availability<CategoryCounts>,
    pub ages: Availability<AgeRange>,
}
