use bikeshare_explorer::aggregator::types::ValueCount;
use bikeshare_explorer::aggregator::{
    Report, age_range, duration_stats, station_stats, time_stats, user_stats,
};
use bikeshare_explorer::config::{City, DataConfig};
use bikeshare_explorer::error::ExploreError;
use bikeshare_explorer::filter::{FilterSpec, Selection, apply};
use bikeshare_explorer::loader::{load_city, load_from_reader};
use bikeshare_explorer::output::{Pager, render_text};
use bikeshare_explorer::repair::forward_fill;
use bikeshare_explorer::store::TripStore;
use std::collections::HashMap;
use std::env;
use std::fs;

const CHICAGO: &[u8] = include_bytes!("fixtures/chicago.csv");
const WASHINGTON: &[u8] = include_bytes!("fixtures/washington.csv");
const SIX_TRIPS: &[u8] = include_bytes!("fixtures/six_trips.csv");

fn load(city: City, bytes: &[u8]) -> TripStore {
    load_from_reader(city, "fixture", bytes).expect("Failed to load fixture")
}

#[test]
fn test_loading_is_deterministic() {
    let first = load(City::Chicago, CHICAGO);
    let second = load(City::Chicago, CHICAGO);

    assert_eq!(first.records(), second.records());

    let durations: Vec<f64> = first
        .records()
        .iter()
        .map(|r| r.duration_seconds.unwrap())
        .collect();
    assert_eq!(
        durations,
        vec![281.0, 321.0, 350.0, 416.0, 520.0, 534.0, 586.0, 723.0, 802.0, 1610.0]
    );
}

#[test]
fn test_repair_of_loaded_store_is_a_no_op() {
    // The 281s Customer row has no gender or birth year and follows a Male
    // rider in the file, but sorts to the front of the store.
    let store = load(City::Chicago, CHICAGO);
    let first = &store.records()[0];
    assert_eq!(first.duration_seconds, Some(281.0));
    assert_eq!(first.gender, None);
    assert_eq!(first.birth_year, None);

    let (again, diagnostics) = forward_fill(store.records(), store.columns());

    assert_eq!(again.as_slice(), store.records());
    assert_eq!(diagnostics.as_slice(), store.diagnostics());
    let columns: Vec<&str> = diagnostics.iter().map(|d| d.column).collect();
    assert_eq!(columns, vec!["Gender", "Birth Year"]);
}

#[test]
fn test_filter_month_scenario() {
    let store = load(City::Chicago, SIX_TRIPS);
    let spec = FilterSpec::new(Selection::only([1, 3]).unwrap(), Selection::All);
    let view = apply(&store, &spec);

    let stats = time_stats(&view).unwrap();
    assert_eq!(stats.month.value, 3);
    assert_eq!(stats.month.count, 3);
    assert_eq!(stats.month.total, 5);
    // every trip starts on a Monday
    assert_eq!(stats.weekday.value, 0);
    assert_eq!(stats.weekday.count, 5);
}

#[test]
fn test_filter_all_and_composition() {
    let store = load(City::Chicago, CHICAGO);

    let all = apply(&store, &FilterSpec::all());
    assert_eq!(all.len(), store.len());
    assert!(all.records().zip(store.records()).all(|(a, b)| a == b));

    let months = Selection::parse_months("jan,may,jun").unwrap();
    let days = Selection::parse_weekdays("mon,fri,sat").unwrap();
    let both = apply(&store, &FilterSpec::new(months.clone(), days.clone()));
    let by_month = apply(&store, &FilterSpec::new(months, Selection::All));
    let by_day = apply(&store, &FilterSpec::new(Selection::All, days));

    let intersection: Vec<usize> = by_month
        .indices()
        .iter()
        .copied()
        .filter(|i| by_day.indices().contains(i))
        .collect();
    assert_eq!(both.indices(), intersection.as_slice());
    assert!(!both.is_empty());
}

#[test]
fn test_chicago_station_ties_break_by_name() {
    let store = load(City::Chicago, CHICAGO);
    let stats = station_stats(&apply(&store, &FilterSpec::all())).unwrap();

    // Canal St & Madison St and Theater on the Lake both start two trips
    assert_eq!(stats.start.value, "Canal St & Madison St");
    assert_eq!(stats.start.count, 2);
    assert_eq!(stats.start.total, 10);
    assert_eq!(stats.end.value, "Clinton St & Madison St");
    assert_eq!(
        stats.trip.value,
        "Canal St & Madison St - Clinton St & Madison St"
    );
    assert_eq!(stats.trip.count, 2);
}

#[test]
fn test_chicago_user_stats() {
    let store = load(City::Chicago, CHICAGO);
    let view = apply(&store, &FilterSpec::all());
    let stats = user_stats(&view, 2017).unwrap();

    let types = stats.user_types.available().unwrap();
    assert_eq!(
        types.counts,
        vec![
            ValueCount {
                value: "Subscriber".into(),
                count: 8
            },
            ValueCount {
                value: "Customer".into(),
                count: 2
            },
        ]
    );

    // of the two Customer rows without a gender, the 281s trip sorts first
    // and stays missing; the 723s trip follows the 586s Male rider
    let genders = stats.genders.available().unwrap();
    let sum: usize = genders.counts.iter().map(|c| c.count).sum();
    assert_eq!(sum + genders.missing, view.len());
    assert_eq!(genders.missing, 1);
    assert_eq!(genders.counts[0].value, "Male");
    assert_eq!(genders.counts[0].count, 7);

    let ages = age_range(&view, 2017).unwrap();
    assert_eq!(ages.youngest, 25);
    assert_eq!(ages.oldest, 58);
}

#[test]
fn test_implausible_birth_year_still_gives_an_age_range() {
    let data = "\
Start Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
2017-03-01 08:00:00,400,A,B,Subscriber,Male,-2147483000
";
    let store = load(City::Chicago, data.as_bytes());
    let view = apply(&store, &FilterSpec::all());

    let ages = age_range(&view, 2026).unwrap();
    assert_eq!(ages.earliest_birth_year, -2_147_483_000);
    assert_eq!(ages.oldest, 2_147_485_026);
    assert!(render_text(&Report::build(&view, 2026)).contains("Oldest users: age 2147485026"));
}

#[test]
fn test_missing_gender_column_keeps_other_stats() {
    let store = load(City::Washington, WASHINGTON);
    let view = apply(&store, &FilterSpec::all());
    let report = Report::build(&view, 2017);

    let users = report.users.available().unwrap();
    assert!(users.user_types.is_available());
    assert!(!users.genders.is_available());
    assert!(!users.ages.is_available());
    assert!(report.durations.is_available());
    assert!(report.time.is_available());
    assert!(report.stations.is_available());

    let text = render_text(&report);
    assert!(text.contains("4 Subscribers"));
    assert!(text.contains("Gender stats unavailable"));
}

#[test]
fn test_empty_view_fails_per_group() {
    let store = load(City::Washington, WASHINGTON);
    let spec = FilterSpec::parse("jan", "all").unwrap();
    let view = apply(&store, &spec);

    assert!(view.is_empty());
    assert!(matches!(
        station_stats(&view),
        Err(ExploreError::EmptyDataset { .. })
    ));
    assert!(matches!(
        duration_stats(&view),
        Err(ExploreError::EmptyDataset { .. })
    ));
}

#[test]
fn test_duration_scenario() {
    let data = "\
Start Time,Trip Duration,Start Station,End Station
2017-02-01 10:00:00,100,A,B
2017-02-01 11:00:00,300,B,A
";
    let store = load(City::NewYorkCity, data.as_bytes());
    let stats = duration_stats(&apply(&store, &FilterSpec::all())).unwrap();

    assert_eq!(stats.total_seconds, 400.0);
    assert!((stats.total_hours - 0.111).abs() < 1e-3);
    assert_eq!(stats.mean_seconds, 200.0);
    assert!((stats.mean_minutes - 3.33).abs() < 1e-2);
}

#[test]
fn test_raw_pages_follow_store_order() {
    let store = load(City::Chicago, CHICAGO);
    let view = apply(&store, &FilterSpec::all());
    let mut pager = Pager::new(&view);

    let first = pager.next_page().unwrap().unwrap();
    let rows: Vec<&str> = first.lines().skip(1).collect();
    assert_eq!(rows.len(), 5);
    assert!(rows[0].starts_with("2017-05-26 09:41:44,281.0,Daley Center Plaza"));

    assert!(pager.next_page().unwrap().is_some());
    assert!(pager.next_page().unwrap().is_none());
}

#[test]
fn test_load_city_from_configured_path() {
    let dir = env::temp_dir().join("bikeshare_explorer_it_config");
    let _ = fs::remove_dir_all(&dir); // clean up any prior run
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("dc.csv");
    fs::write(&path, WASHINGTON).unwrap();

    let mut overrides = HashMap::new();
    overrides.insert("washington".to_string(), path.display().to_string());
    let config = DataConfig::new(&dir).with_overrides(overrides).unwrap();

    let store = load_city(&config, City::Washington).unwrap();
    assert_eq!(store.len(), 5);
    assert!(!store.columns().gender);

    assert!(matches!(
        load_city(&config, City::Chicago),
        Err(ExploreError::DataSource { .. })
    ));

    fs::remove_dir_all(&dir).unwrap();
}
