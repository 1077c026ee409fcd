//! Month and weekday filtering over a [`TripStore`].

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::config::City;
use crate::error::{ExploreError, Result};
use crate::store::{Columns, TripRecord, TripStore};

/// Months offered for filtering; index + 1 is the month number.
pub static MONTH_NAMES: &[&str] = &["january", "february", "march", "april", "may", "june"];

/// Index is the weekday number (0 = Monday).
pub static WEEKDAY_NAMES: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Name for a month number, if it is one of [`MONTH_NAMES`].
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month.checked_sub(1)? as usize).copied()
}

pub fn weekday_name(weekday: u32) -> Option<&'static str> {
    WEEKDAY_NAMES.get(weekday as usize).copied()
}

/// Either every value, or a non-empty set of concrete values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    All,
    Only(BTreeSet<u32>),
}

impl Selection {
    pub fn only(values: impl IntoIterator<Item = u32>) -> Result<Self> {
        let set: BTreeSet<u32> = values.into_iter().collect();
        if set.is_empty() {
            return Err(ExploreError::Configuration(
                "a selection needs at least one value".to_string(),
            ));
        }
        Ok(Selection::Only(set))
    }

    pub fn contains(&self, value: u32) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(set) => set.contains(&value),
        }
    }

    /// Parses user input such as `"jan, mar"` or `"all"` against [`MONTH_NAMES`].
    pub fn parse_months(input: &str) -> Result<Self> {
        Self::parse(input, MONTH_NAMES, 1, "month")
    }

    /// Parses user input such as `"sat,sun"` or `"all"` against [`WEEKDAY_NAMES`].
    pub fn parse_weekdays(input: &str) -> Result<Self> {
        Self::parse(input, WEEKDAY_NAMES, 0, "day")
    }

    /// Parses comma-separated user tokens against a name table. A token
    /// matches every name it is a prefix of; `all` anywhere selects all.
    ///
    /// Matching is by prefix, not substring: `t` selects Tuesday and
    /// Thursday but not Saturday, and `day` matches nothing.
    fn parse(input: &str, names: &[&str], offset: u32, kind: &str) -> Result<Self> {
        let tokens: Vec<String> = input
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.iter().any(|t| t == "all") {
            return Ok(Selection::All);
        }

        let mut values = BTreeSet::new();
        for token in &tokens {
            let matched: Vec<u32> = names
                .iter()
                .enumerate()
                .filter(|(_, name)| name.starts_with(token.as_str()))
                .map(|(i, _)| i as u32 + offset)
                .collect();
            if matched.is_empty() {
                return Err(ExploreError::Configuration(format!(
                    "unknown {kind} '{token}'; choose from {}, or \"all\"",
                    names.join(", ")
                )));
            }
            values.extend(matched);
        }
        Self::only(values)
    }
}

/// Month and weekday selections applied together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    pub months: Selection,
    pub weekdays: Selection,
}

impl FilterSpec {
    pub fn all() -> Self {
        Self {
            months: Selection::All,
            weekdays: Selection::All,
        }
    }

    pub fn new(months: Selection, weekdays: Selection) -> Self {
        Self { months, weekdays }
    }

    /// Builds a spec from user input such as `"jan, mar"` and `"all"`.
    pub fn parse(months: &str, weekdays: &str) -> Result<Self> {
        Ok(Self {
            months: Selection::parse_months(months)?,
            weekdays: Selection::parse_weekdays(weekdays)?,
        })
    }

    pub fn matches(&self, record: &TripRecord) -> bool {
        self.months.contains(record.month) && self.weekdays.contains(record.weekday)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("all"),
            Selection::Only(set) => {
                let values: Vec<String> = set.iter().map(u32::to_string).collect();
                f.write_str(&values.join(","))
            }
        }
    }
}

/// Read-only subset of a store, in store order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    store: &'a TripStore,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn city(&self) -> City {
        self.store.city()
    }

    pub fn columns(&self) -> Columns {
        self.store.columns()
    }

    /// Positions of the selected records within the store.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn records(&self) -> impl Iterator<Item = &'a TripRecord> + '_ {
        let records = self.store.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Selects the records of `store` matching both selections of `spec`.
pub fn apply<'a>(store: &'a TripStore, spec: &FilterSpec) -> FilteredView<'a> {
    let indices: Vec<usize> = store
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| spec.matches(record))
        .map(|(i, _)| i)
        .collect();

    info!(
        city = %store.city(),
        months = %spec.months,
        weekdays = %spec.weekdays,
        matched = indices.len(),
        total = store.len(),
        "Filter applied"
    );

    FilteredView { store, indices }
}
