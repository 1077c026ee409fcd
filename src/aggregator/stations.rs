use crate::aggregator::types::{Mode, StationStats};
use crate::aggregator::utility::{mode_of, require_records};
use crate::error::Result;
use crate::filter::FilteredView;

/// Most used start station, end station, and start/end combination. Ties go
/// to the name that sorts first.
#[tracing::instrument(skip(view), fields(city = %view.city(), trips = view.len()))]
pub fn station_stats(view: &FilteredView) -> Result<StationStats> {
    require_records(view, "station popularity")?;

    let start = mode_of(
        view,
        "Start Station",
        view.records().filter_map(|r| r.start_station.as_deref()),
    )?;
    let end = mode_of(
        view,
        "End Station",
        view.records().filter_map(|r| r.end_station.as_deref()),
    )?;
    // both columns have values here, but no record may carry both
    let trip = mode_of(
        view,
        "Start Station/End Station",
        view.records()
            .filter_map(|r| match (&r.start_station, &r.end_station) {
                (Some(s), Some(e)) => Some(format!("{s} - {e}")),
                _ => None,
            }),
    )?;

    Ok(StationStats {
        start: owned(start),
        end: owned(end),
        trip,
    })
}

fn owned(mode: Mode<&str>) -> Mode<String> {
    Mode {
        value: mode.value.to_string(),
        count: mode.count,
        total: mode.total,
    }
}
