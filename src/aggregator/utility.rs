use std::collections::BTreeMap;

use tracing::warn;

use crate::aggregator::types::{Availability, CategoryCounts, Mode, ValueCount};
use crate::error::{ExploreError, Result};
use crate::filter::FilteredView;

/// Most frequent value and its count. Ties go to the smallest value, so the
/// answer never depends on input order.
pub fn most_frequent<K: Ord>(values: impl IntoIterator<Item = K>) -> Option<(K, usize)> {
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let mut best: Option<(K, usize)> = None;
    for (value, count) in counts {
        if best.as_ref().is_none_or(|(_, top)| count > *top) {
            best = Some((value, count));
        }
    }
    best
}

/// Counts per value, ordered by count descending then value ascending.
pub fn value_counts<K: Ord>(values: impl IntoIterator<Item = K>) -> Vec<(K, usize)> {
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let mut sorted: Vec<(K, usize)> = counts.into_iter().collect();
    // stable: equal counts stay in ascending key order
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted
}

pub fn mean(total: f64, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    total / n as f64
}

/// Fails with `EmptyDataset` for an empty view.
pub(crate) fn require_records(view: &FilteredView, group: &'static str) -> Result<()> {
    if view.is_empty() {
        return Err(ExploreError::EmptyDataset {
            city: view.city(),
            group,
        });
    }
    Ok(())
}

/// [`most_frequent`] over a column of the view, as a [`Mode`] out of all
/// records. A column with no values at all is reported as missing.
pub(crate) fn mode_of<'v, K: Ord>(
    view: &FilteredView<'v>,
    column: &'static str,
    values: impl IntoIterator<Item = K>,
) -> Result<Mode<K>> {
    most_frequent(values)
        .map(|(value, count)| Mode {
            value,
            count,
            total: view.len(),
        })
        .ok_or(ExploreError::MissingColumn {
            city: view.city(),
            column,
        })
}

/// [`value_counts`] over an optional text column of the view.
pub(crate) fn category_counts<'v>(
    view: &FilteredView<'v>,
    values: impl Iterator<Item = Option<&'v str>>,
) -> CategoryCounts {
    let mut missing = 0;
    let present = values.filter_map(|v| {
        if v.is_none() {
            missing += 1;
        }
        v
    });
    let counts = value_counts(present)
        .into_iter()
        .map(|(value, count)| ValueCount {
            value: value.to_string(),
            count,
        })
        .collect();

    CategoryCounts {
        counts,
        missing,
        total: view.len(),
    }
}

/// Turns a group-scoped failure into an [`Availability::Unavailable`] entry.
pub(crate) fn scoped<T>(group: &str, result: Result<T>) -> Availability<T> {
    match result {
        Ok(value) => Availability::Available(value),
        Err(e) => {
            warn!(group, error = %e, "Statistic skipped");
            Availability::Unavailable {
                reason: e.to_string(),
            }
        }
    }
}
