use chrono::{Datelike, Local};

use crate::aggregator::types::{AgeRange, CategoryCounts, UserStats};
use crate::aggregator::utility::{category_counts, require_records, scoped};
use crate::error::{ExploreError, Result};
use crate::filter::FilteredView;

/// Calendar year used as the reference for rider ages.
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Rider counts by user type and gender, plus the age range.
///
/// A column the city does not carry is reported as unavailable for that
/// statistic only; the rest of the group is still computed.
#[tracing::instrument(skip(view), fields(city = %view.city(), trips = view.len()))]
pub fn user_stats(view: &FilteredView, reference_year: i32) -> Result<UserStats> {
    require_records(view, "user demographics")?;

    Ok(UserStats {
        user_types: scoped("user types", user_type_counts(view)),
        genders: scoped("genders", gender_counts(view)),
        ages: scoped("ages", age_range(view, reference_year)),
    })
}

pub fn user_type_counts(view: &FilteredView) -> Result<CategoryCounts> {
    require_records(view, "user types")?;
    if !view.columns().user_type {
        return Err(missing(view, "User Type"));
    }
    Ok(category_counts(
        view,
        view.records().map(|r| r.user_type.as_deref()),
    ))
}

pub fn gender_counts(view: &FilteredView) -> Result<CategoryCounts> {
    require_records(view, "genders")?;
    if !view.columns().gender {
        return Err(missing(view, "Gender"));
    }
    Ok(category_counts(view, view.records().map(|r| r.gender.as_deref())))
}

/// Youngest and oldest rider ages: `reference_year` minus the latest and
/// earliest birth year. Records without a birth year are skipped.
pub fn age_range(view: &FilteredView, reference_year: i32) -> Result<AgeRange> {
    require_records(view, "ages")?;
    if !view.columns().birth_year {
        return Err(missing(view, "Birth Year"));
    }

    let years = || view.records().filter_map(|r| r.birth_year);
    match (years().max(), years().min()) {
        (Some(latest), Some(earliest)) => Ok(AgeRange {
            reference_year,
            youngest: i64::from(reference_year) - i64::from(latest),
            oldest: i64::from(reference_year) - i64::from(earliest),
            latest_birth_year: latest,
            earliest_birth_year: earliest,
        }),
        _ => Err(missing(view, "Birth Year")),
    }
}

fn missing(view: &FilteredView, column: &'static str) -> ExploreError {
    ExploreError::MissingColumn {
        city: view.city(),
        column,
    }
}
