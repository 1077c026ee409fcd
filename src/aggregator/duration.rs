use crate::aggregator::types::DurationStats;
use crate::aggregator::utility::{mean, require_records};
use crate::error::{ExploreError, Result};
use crate::filter::FilteredView;

/// Total and average trip duration over the records that have one. Records
/// without a duration are counted in `missing`.
#[tracing::instrument(skip(view), fields(city = %view.city(), trips = view.len()))]
pub fn duration_stats(view: &FilteredView) -> Result<DurationStats> {
    require_records(view, "trip duration")?;

    let durations: Vec<f64> = view.records().filter_map(|r| r.duration_seconds).collect();
    if durations.is_empty() {
        return Err(ExploreError::MissingColumn {
            city: view.city(),
            column: "Trip Duration",
        });
    }
    let total_seconds: f64 = durations.iter().sum();
    let mean_seconds = mean(total_seconds, durations.len());

    Ok(DurationStats {
        trips: view.len(),
        missing: view.len() - durations.len(),
        total_seconds,
        total_hours: total_seconds / 3600.0,
        mean_seconds,
        mean_minutes: mean_seconds / 60.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::City;
    use crate::filter::{FilterSpec, apply};
    use crate::store::{Columns, TripRecord, TripStore};
    use chrono::NaiveDateTime;

    fn store(durations: &[f64]) -> TripStore {
        let start = NaiveDateTime::parse_from_str("2017-02-14 07:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let records = durations
            .iter()
            .map(|d| TripRecord::new(start).with_duration(*d))
            .collect();
        TripStore::new(City::Washington, Columns::default(), records, vec![])
    }

    #[test]
    fn test_duration_stats() {
        let store = store(&[300.0, 100.0]);
        let stats = duration_stats(&apply(&store, &FilterSpec::all())).unwrap();

        assert_eq!(stats.trips, 2);
        assert_eq!(stats.missing, 0);
        assert_eq!(stats.total_seconds, 400.0);
        assert!((stats.total_hours - 0.1111).abs() < 1e-3);
        assert_eq!(stats.mean_seconds, 200.0);
        assert!((stats.mean_minutes - 3.3333).abs() < 1e-3);
    }

    #[test]
    fn test_average_skips_trips_without_duration() {
        let start = NaiveDateTime::parse_from_str("2017-02-14 07:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let records = vec![TripRecord::new(start), TripRecord::new(start).with_duration(300.0)];
        let store = TripStore::new(City::Washington, Columns::default(), records, vec![]);
        let stats = duration_stats(&apply(&store, &FilterSpec::all())).unwrap();

        assert_eq!(stats.trips, 2);
        assert_eq!(stats.missing, 1);
        assert_eq!(stats.total_seconds, 300.0);
        assert_eq!(stats.mean_seconds, 300.0);
        assert_eq!(stats.mean_minutes, 5.0);
    }

    #[test]
    fn test_no_durations_is_a_missing_column() {
        let start = NaiveDateTime::parse_from_str("2017-02-14 07:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let store = TripStore::new(
            City::Washington,
            Columns::default(),
            vec![TripRecord::new(start)],
            vec![],
        );
        let err = duration_stats(&apply(&store, &FilterSpec::all())).unwrap_err();
        assert!(matches!(
            err,
            ExploreError::MissingColumn { column: "Trip Duration", .. }
        ));
    }

    #[test]
    fn test_empty_view() {
        let store = store(&[60.0]);
        let spec = FilterSpec::parse("jan", "all").unwrap();
        let err = duration_stats(&apply(&store, &spec)).unwrap_err();
        assert!(matches!(err, ExploreError::EmptyDataset { .. }));
    }
}
