use serde::Serialize;
use tracing::info;

use crate::aggregator::types::{Availability, DurationStats, StationStats, TimeStats, UserStats};
use crate::aggregator::utility::scoped;
use crate::aggregator::{duration_stats, station_stats, time_stats, user_stats};
use crate::config::City;
use crate::filter::FilteredView;

/// All four statistic groups for one filtered view. A group that failed is
/// `Unavailable` and does not affect the others.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub city: City,
    pub trips: usize,
    pub time: Availability<TimeStats>,
    pub stations: Availability<StationStats>,
    pub durations: Availability<DurationStats>,
    pub users: Availability<UserStats>,
}

impl Report {
    pub fn build(view: &FilteredView, reference_year: i32) -> Self {
        let report = Report {
            city: view.city(),
            trips: view.len(),
            time: scoped("time of travel", time_stats(view)),
            stations: scoped("station popularity", station_stats(view)),
            durations: scoped("trip duration", duration_stats(view)),
            users: scoped("user demographics", user_stats(view, reference_year)),
        };

        info!(
            city = %report.city,
            trips = report.trips,
            time = report.time.is_available(),
            stations = report.stations.is_available(),
            durations = report.durations.is_available(),
            users = report.users.is_available(),
            "Report built"
        );
        report
    }
}
