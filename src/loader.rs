//! Dataset loader: a city's CSV source → [`TripStore`].
//!
//! Loading is all-or-nothing. An unreadable source, a missing required
//! column, or a start time that does not parse aborts the load. Rows are then
//! sorted by duration, and other missing values are repaired by forward-fill
//! in that sorted order.

use std::fs::File;
use std::io::Read;

use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::{City, DataConfig};
use crate::error::{ExploreError, Result};
use crate::repair;
use crate::store::{Columns, TripRecord, TripStore, sort_by_duration};

const START_TIME: &str = "Start Time";
const REQUIRED_COLUMNS: &[&str] = &[START_TIME, "Trip Duration", "Start Station", "End Station"];

/// Timestamp layouts seen in the city exports, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// One CSV row as found in the source. Every field is text so that missing
/// or garbled values can be told apart from parse failures of `Start Time`.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: Option<String>,
    #[serde(rename = "Trip Duration", default)]
    trip_duration: Option<String>,
    #[serde(rename = "Start Station", default)]
    start_station: Option<String>,
    #[serde(rename = "End Station", default)]
    end_station: Option<String>,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<String>,
}

impl RawTrip {
    fn into_record(self, city: City, row: usize) -> Result<TripRecord> {
        let raw_start = self.start_time.unwrap_or_default();
        let start_time =
            parse_timestamp(&raw_start).ok_or_else(|| ExploreError::MalformedRecord {
                city,
                row,
                field: START_TIME,
                value: raw_start.clone(),
            })?;

        let mut record = TripRecord::new(start_time);
        record.duration_seconds = present(self.trip_duration).and_then(|v| parse_duration(&v));
        record.start_station = present(self.start_station);
        record.end_station = present(self.end_station);
        record.user_type = present(self.user_type);
        record.gender = present(self.gender);
        record.birth_year = present(self.birth_year).and_then(|v| parse_year(&v));
        Ok(record)
    }
}

/// Loads the CSV configured for `city`.
#[tracing::instrument(skip(config, city), fields(city = %city))]
pub fn load_city(config: &DataConfig, city: City) -> Result<TripStore> {
    let path = config.source_path(city);
    let source = path.display().to_string();
    debug!(path = %source, "Opening trip data");

    let file = File::open(&path).map_err(|e| source_error(city, &source, e.to_string()))?;
    load_from_reader(city, &source, file)
}

/// Loads trips from any CSV reader. `source` only labels errors.
pub fn load_from_reader<R: Read>(city: City, source: &str, reader: R) -> Result<TripStore> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| source_error(city, source, e.to_string()))?
        .clone();
    if headers.is_empty() {
        return Err(source_error(city, source, "source is empty".to_string()));
    }

    let has = |name: &str| headers.iter().any(|h| h == name);
    if let Some(missing) = REQUIRED_COLUMNS.iter().find(|&&c| !has(c)) {
        return Err(source_error(
            city,
            source,
            format!("required column '{missing}' not found"),
        ));
    }
    let columns = Columns {
        user_type: has("User Type"),
        gender: has("Gender"),
        birth_year: has("Birth Year"),
    };
    debug!(?columns, "Optional columns detected");

    let mut records = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        let raw: RawTrip = result.map_err(|e| source_error(city, source, e.to_string()))?;
        records.push(raw.into_record(city, i + 1)?);
    }

    if records.is_empty() {
        return Err(source_error(city, source, "no trip records".to_string()));
    }

    sort_by_duration(&mut records);
    let (repaired, diagnostics) = repair::forward_fill(&records, columns);
    repair::report(&diagnostics);

    let store = TripStore::new(city, columns, repaired, diagnostics);
    info!(rows = store.len(), "Trip data loaded");
    Ok(store)
}

fn source_error(city: City, source: &str, reason: String) -> ExploreError {
    ExploreError::DataSource {
        city,
        path: source.to_string(),
        reason,
    }
}

/// Empty and `NaN` cells count as missing.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("nan"))
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Negative or non-finite durations are treated as missing.
fn parse_duration(value: &str) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
}

/// Exports store years as floats ("1992.0").
fn parse_year(value: &str) -> Option<i32> {
    value
        .parse::<f64>()
        .ok()
        .filter(|y| y.is_finite() && y.abs() < i32::MAX as f64)
        .map(|y| y.trunc() as i32)
}
