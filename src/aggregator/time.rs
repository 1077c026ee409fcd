use crate::aggregator::types::TimeStats;
use crate::aggregator::utility::{mode_of, require_records};
use crate::error::Result;
use crate::filter::FilteredView;

/// Most common month, weekday and start hour. Ties go to the lower number.
#[tracing::instrument(skip(view), fields(city = %view.city(), trips = view.len()))]
pub fn time_stats(view: &FilteredView) -> Result<TimeStats> {
    require_records(view, "time of travel")?;

    Ok(TimeStats {
        month: mode_of(view, "month", view.records().map(|r| r.month))?,
        weekday: mode_of(view, "weekday", view.records().map(|r| r.weekday))?,
        hour: mode_of(view, "hour", view.records().map(|r| r.hour))?,
    })
}
