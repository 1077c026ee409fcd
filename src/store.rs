//! In-memory trip records for one city.

use std::cmp::Ordering;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::config::City;
use crate::repair::RepairDiagnostic;

/// One bike-share trip after loading.
///
/// Columns other than `start_time` are optional: a value that was missing in
/// the source and could not be repaired stays `None`. The calendar fields are
/// derived once from `start_time` by [`TripRecord::new`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub duration_seconds: Option<f64>,
    pub start_station: Option<String>,
    pub end_station: Option<String>,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,

    /// 1-12
    pub month: u32,
    /// 0 = Monday .. 6 = Sunday
    pub weekday: u32,
    /// 0-23
    pub hour: u32,
}

impl TripRecord {
    pub fn new(start_time: NaiveDateTime) -> Self {
        Self {
            start_time,
            duration_seconds: None,
            start_station: None,
            end_station: None,
            user_type: None,
            gender: None,
            birth_year: None,
            month: start_time.month(),
            weekday: start_time.weekday().num_days_from_monday(),
            hour: start_time.hour(),
        }
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    pub fn with_stations(mut self, start: &str, end: &str) -> Self {
        self.start_station = Some(start.to_string());
        self.end_station = Some(end.to_string());
        self
    }

    pub fn with_user_type(mut self, user_type: &str) -> Self {
        self.user_type = Some(user_type.to_string());
        self
    }

    pub fn with_gender(mut self, gender: &str) -> Self {
        self.gender = Some(gender.to_string());
        self
    }

    pub fn with_birth_year(mut self, year: i32) -> Self {
        self.birth_year = Some(year);
        self
    }
}

/// Which optional columns the city's source carries. A column is present or
/// absent for the whole store, never per row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Columns {
    pub user_type: bool,
    pub gender: bool,
    pub birth_year: bool,
}

impl Columns {
    pub fn all() -> Self {
        Self {
            user_type: true,
            gender: true,
            birth_year: true,
        }
    }
}

/// Stable ascending sort by duration. Records without a duration go last.
pub fn sort_by_duration(records: &mut [TripRecord]) {
    records.sort_by(|a, b| match (a.duration_seconds, b.duration_seconds) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// A city's trips, sorted ascending by duration.
#[derive(Debug, Clone)]
pub struct TripStore {
    city: City,
    columns: Columns,
    records: Vec<TripRecord>,
    diagnostics: Vec<RepairDiagnostic>,
}

impl TripStore {
    /// Builds a store from already repaired records, applying
    /// [`sort_by_duration`]. Records the loader has sorted keep their order.
    pub fn new(
        city: City,
        columns: Columns,
        mut records: Vec<TripRecord>,
        diagnostics: Vec<RepairDiagnostic>,
    ) -> Self {
        sort_by_duration(&mut records);
        Self {
            city,
            columns,
            records,
            diagnostics,
        }
    }

    pub fn city(&self) -> City {
        self.city
    }

    pub fn columns(&self) -> Columns {
        self.columns
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    /// Columns that still had missing values after repair.
    pub fn diagnostics(&self) -> &[RepairDiagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
