//! Console rendering of reports and raw trip rows.
//!
//! Supports a plain-text summary, JSON serialization, and CSV paging of the
//! filtered rows.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::Month;
use csv::WriterBuilder;
use serde::Serialize;
use tracing::debug;

use crate::aggregator::Report;
use crate::aggregator::types::{
    AgeRange, Availability, CategoryCounts, DurationStats, Mode, StationStats, TimeStats,
    UserStats,
};
use crate::filter::{FilteredView, weekday_name};
use crate::store::TripRecord;

/// Rows shown per page when browsing raw data.
pub const PAGE_SIZE: usize = 5;

const RULE: &str = "----------------------------------------";

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &Report) {
    debug!("{:#?}", report);
}

pub fn render_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Renders the four statistic groups as console text. Numbers carry one
/// decimal place.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({} trips)", report.city, report.trips);
    let _ = writeln!(out, "{RULE}");

    section(&mut out, "Most Frequent Times of Travel", &report.time, time_lines);
    section(&mut out, "Most Popular Stations and Trip", &report.stations, station_lines);
    section(&mut out, "Trip Duration", &report.durations, duration_lines);
    section(&mut out, "User Stats", &report.users, user_lines);
    out
}

fn section<T>(
    out: &mut String,
    title: &str,
    group: &Availability<T>,
    lines: fn(&T) -> Vec<String>,
) {
    let _ = writeln!(out, "\n{title}\n");
    match group {
        Availability::Available(stats) => {
            for line in lines(stats) {
                let _ = writeln!(out, "{line}");
            }
        }
        Availability::Unavailable { reason } => {
            let _ = writeln!(out, "Unavailable: {reason}");
        }
    }
    let _ = writeln!(out, "{RULE}");
}

fn out_of<T>(mode: &Mode<T>) -> String {
    format!("({} out of {})", mode.count, mode.total)
}

fn month_label(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_uppercase())
        .unwrap_or_else(|| month.to_string())
}

fn time_lines(stats: &TimeStats) -> Vec<String> {
    let day = weekday_name(stats.weekday.value)
        .map(str::to_uppercase)
        .unwrap_or_else(|| stats.weekday.value.to_string());
    vec![
        format!(
            "Most common month: {} {}",
            month_label(stats.month.value),
            out_of(&stats.month)
        ),
        format!("Most common day of week: {day} {}", out_of(&stats.weekday)),
        format!(
            "Most popular start hour: {}:00 {}",
            stats.hour.value,
            out_of(&stats.hour)
        ),
    ]
}

fn station_lines(stats: &StationStats) -> Vec<String> {
    vec![
        format!("Top used start station: {} {}", stats.start.value, out_of(&stats.start)),
        format!("Top used end station: {} {}", stats.end.value, out_of(&stats.end)),
        format!(
            "Top used combination of start/end stations: {} {}",
            stats.trip.value,
            out_of(&stats.trip)
        ),
    ]
}

fn duration_lines(stats: &DurationStats) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Total travel time: {:.1}s ({:.1}hr)",
            stats.total_seconds, stats.total_hours
        ),
        format!(
            "Average travel time: {:.1}s ({:.1}min)",
            stats.mean_seconds, stats.mean_minutes
        ),
    ];
    if stats.missing > 0 {
        lines.push(format!(
            "{} of {} trips have no duration",
            stats.missing, stats.trips
        ));
    }
    lines
}

fn user_lines(stats: &UserStats) -> Vec<String> {
    let mut lines = Vec::new();
    category_lines(&mut lines, "User type", &stats.user_types);
    lines.push(String::new());
    category_lines(&mut lines, "Gender", &stats.genders);
    lines.push(String::new());
    match &stats.ages {
        Availability::Available(AgeRange { youngest, oldest, .. }) => {
            lines.push(format!("Youngest users: age {youngest}"));
            lines.push(format!("Oldest users: age {oldest}"));
        }
        Availability::Unavailable { reason } => {
            lines.push(format!("Age stats unavailable: {reason}"));
        }
    }
    lines
}

fn category_lines(lines: &mut Vec<String>, label: &str, group: &Availability<CategoryCounts>) {
    match group {
        Availability::Available(counts) => {
            for c in &counts.counts {
                lines.push(format!("{} {}s", c.count, c.value));
            }
            if counts.missing > 0 {
                lines.push(format!("{} with no {}", counts.missing, label.to_lowercase()));
            }
        }
        Availability::Unavailable { reason } => {
            lines.push(format!("{label} stats unavailable: {reason}"));
        }
    }
}

/// One raw trip as shown when paging through the filtered data.
#[derive(Debug, Serialize)]
struct RawRow<'a> {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "Trip Duration")]
    duration_seconds: Option<f64>,
    #[serde(rename = "Start Station")]
    start_station: Option<&'a str>,
    #[serde(rename = "End Station")]
    end_station: Option<&'a str>,
    #[serde(rename = "User Type")]
    user_type: Option<&'a str>,
    #[serde(rename = "Gender")]
    gender: Option<&'a str>,
    #[serde(rename = "Birth Year")]
    birth_year: Option<i32>,
    month: u32,
    day_of_week: u32,
    hour: u32,
}

impl<'a> From<&'a TripRecord> for RawRow<'a> {
    fn from(r: &'a TripRecord) -> Self {
        RawRow {
            start_time: r.start_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            duration_seconds: r.duration_seconds,
            start_station: r.start_station.as_deref(),
            end_station: r.end_station.as_deref(),
            user_type: r.user_type.as_deref(),
            gender: r.gender.as_deref(),
            birth_year: r.birth_year,
            month: r.month,
            day_of_week: r.weekday,
            hour: r.hour,
        }
    }
}

/// Writes up to `count` rows of the view starting at `offset` as CSV with a
/// header line. Returns the number of rows written.
pub fn write_rows<W: Write>(
    view: &FilteredView,
    offset: usize,
    count: usize,
    writer: W,
) -> Result<usize> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);

    let mut written = 0;
    for record in view.records().skip(offset).take(count) {
        writer.serialize(RawRow::from(record))?;
        written += 1;
    }
    writer.flush()?;

    Ok(written)
}

/// Successive [`PAGE_SIZE`] pages of a view, rendered as CSV text.
pub struct Pager<'v, 'a> {
    view: &'v FilteredView<'a>,
    offset: usize,
}

impl<'v, 'a> Pager<'v, 'a> {
    pub fn new(view: &'v FilteredView<'a>) -> Self {
        Self { view, offset: 0 }
    }

    pub fn next_page(&mut self) -> Result<Option<String>> {
        if self.offset >= self.view.len() {
            return Ok(None);
        }
        let mut buf = Vec::new();
        let written = write_rows(self.view, self.offset, PAGE_SIZE, &mut buf)?;
        self.offset += written;
        Ok(Some(String::from_utf8(buf)?))
    }
}
