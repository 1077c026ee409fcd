//! Forward-fill repair of missing column values.

use serde::Serialize;
use tracing::warn;

use crate::store::{Columns, TripRecord};

/// A column that still has missing values after forward-fill (a leading
/// missing run has no preceding value to copy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairDiagnostic {
    pub column: &'static str,
    pub remaining: usize,
}

/// Returns a copy of `records` where every missing value takes the nearest
/// preceding non-missing value of the same column, in row order.
///
/// `start_time` and the derived calendar fields are never touched, nor are
/// optional columns the source does not carry. Columns that keep missing
/// values are reported, one diagnostic per column.
pub fn forward_fill(
    records: &[TripRecord],
    columns: Columns,
) -> (Vec<TripRecord>, Vec<RepairDiagnostic>) {
    let mut repaired = records.to_vec();
    let mut diagnostics = Vec::new();

    macro_rules! fill_column {
        ($field:ident, $name:expr, $present:expr) => {
            if $present {
                let mut last = None;
                let mut remaining = 0usize;
                for record in repaired.iter_mut() {
                    if let Some(value) = &record.$field {
                        last = Some(value.clone());
                    } else if let Some(value) = &last {
                        record.$field = Some(value.clone());
                    } else {
                        remaining += 1;
                    }
                }
                if remaining > 0 {
                    diagnostics.push(RepairDiagnostic {
                        column: $name,
                        remaining,
                    });
                }
            }
        };
    }

    fill_column!(duration_seconds, "Trip Duration", true);
    fill_column!(start_station, "Start Station", true);
    fill_column!(end_station, "End Station", true);
    fill_column!(user_type, "User Type", columns.user_type);
    fill_column!(gender, "Gender", columns.gender);
    fill_column!(birth_year, "Birth Year", columns.birth_year);

    (repaired, diagnostics)
}

pub fn report(diagnostics: &[RepairDiagnostic]) {
    for d in diagnostics {
        warn!(
            column = d.column,
            remaining = d.remaining,
            "{} column has {} missing values after repair",
            d.column,
            d.remaining
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn trip(minute: u32) -> TripRecord {
        let start = NaiveDateTime::parse_from_str(
            &format!("2017-03-01 08:{minute:02}:00"),
            "%Y-%m-%d %H:%M:%S",
        )
        .unwrap();
        TripRecord::new(start)
    }

    #[test]
    fn test_fills_from_nearest_preceding_value() {
        let records = vec![
            trip(0).with_gender("Male").with_duration(10.0),
            trip(1).with_duration(20.0),
            trip(2).with_gender("Female").with_duration(30.0),
            trip(3).with_duration(40.0),
            trip(4).with_duration(50.0),
        ];
        let (repaired, diagnostics) = forward_fill(&records, Columns::all());

        let genders: Vec<_> = repaired.iter().map(|r| r.gender.as_deref()).collect();
        assert_eq!(
            genders,
            vec![
                Some("Male"),
                Some("Male"),
                Some("Female"),
                Some("Female"),
                Some("Female")
            ]
        );
        // stations, user type and birth year were never set
        assert!(diagnostics.iter().all(|d| d.column != "Gender"));
        assert!(diagnostics.iter().all(|d| d.column != "Trip Duration"));
    }

    #[test]
    fn test_leading_missing_run_is_reported() {
        let records = vec![
            trip(0),
            trip(1),
            trip(2).with_birth_year(1990),
            trip(3),
        ];
        let (repaired, diagnostics) = forward_fill(&records, Columns::all());

        assert_eq!(repaired[0].birth_year, None);
        assert_eq!(repaired[1].birth_year, None);
        assert_eq!(repaired[3].birth_year, Some(1990));

        let birth = diagnostics
            .iter()
            .find(|d| d.column == "Birth Year")
            .unwrap();
        assert_eq!(birth.remaining, 2);
    }

    #[test]
    fn test_absent_columns_are_not_reported() {
        let records = vec![trip(0).with_stations("A", "B").with_duration(1.0), trip(1)];
        let columns = Columns {
            user_type: true,
            gender: false,
            birth_year: false,
        };
        let (_, diagnostics) = forward_fill(&records, columns);

        let names: Vec<_> = diagnostics.iter().map(|d| d.column).collect();
        assert_eq!(names, vec!["User Type"]);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let records = vec![trip(0).with_user_type("Subscriber"), trip(1)];
        let (repaired, _) = forward_fill(&records, Columns::all());

        assert_eq!(records[1].user_type, None);
        assert_eq!(repaired[1].user_type.as_deref(), Some("Subscriber"));
    }

    #[test]
    fn test_repair_is_idempotent() {
        let records = vec![
            trip(0),
            trip(1).with_stations("A", "B").with_duration(5.0),
            trip(2),
            trip(3).with_gender("Male"),
            trip(4),
        ];
        let (once, first) = forward_fill(&records, Columns::all());
        let (twice, second) = forward_fill(&once, Columns::all());

        assert_eq!(once, twice);
        assert_eq!(first, second);
    }
}
