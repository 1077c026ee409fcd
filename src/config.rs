//! City table and data-source configuration.
//!
//! The set of cities is closed. Each city maps to one CSV file under the data
//! directory; a JSON file may override individual paths:
//! ```json
//! {
//!   "chicago": "/srv/bikeshare/chicago_2017.csv",
//!   "washington": "fixtures/washington_small.csv"
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::{ExploreError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

/// `(city, canonical lowercase name, source file name)`
static CITIES: &[(City, &str, &str)] = &[
    (City::Chicago, "chicago", "chicago.csv"),
    (City::NewYorkCity, "new york city", "new_york_city.csv"),
    (City::Washington, "washington", "washington.csv"),
];

impl City {
    pub fn all() -> impl Iterator<Item = City> {
        CITIES.iter().map(|(city, _, _)| *city)
    }

    pub fn name(self) -> &'static str {
        Self::entry(self).1
    }

    pub fn file_name(self) -> &'static str {
        Self::entry(self).2
    }

    fn entry(self) -> &'static (City, &'static str, &'static str) {
        // CITIES is laid out in variant order.
        &CITIES[self as usize]
    }

    /// Names accepted for this city: full name, first three letters, and the
    /// initials of multi-word names ("nyc").
    pub fn aliases(self) -> Vec<String> {
        let name = self.name();
        let mut names = vec![name.to_string(), name.chars().take(3).collect()];
        if name.contains(' ') {
            names.push(name.split(' ').filter_map(|w| w.chars().next()).collect());
        }
        names
    }

    /// Resolves user input to a city, case-insensitively.
    pub fn resolve(input: &str) -> Result<City> {
        let needle = input.trim().to_lowercase();
        City::all()
            .find(|city| city.aliases().iter().any(|alias| *alias == needle))
            .ok_or_else(|| {
                ExploreError::Configuration(format!(
                    "unknown city '{}'; choose from Chicago, New York City, or Washington",
                    input.trim()
                ))
            })
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        };
        f.write_str(label)
    }
}

/// Where city CSV files live.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub data_dir: PathBuf,
    overrides: HashMap<City, PathBuf>,
}

impl DataConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            overrides: HashMap::new(),
        }
    }

    /// Reads `BIKESHARE_DATA_DIR` (default `data`) and, when set, the JSON
    /// override file named by `BIKESHARE_SOURCES`.
    pub fn from_env() -> Result<Self> {
        let data_dir =
            std::env::var("BIKESHARE_DATA_DIR").unwrap_or_else(|_| "data".to_string());
        let config = Self::new(data_dir);
        match std::env::var("BIKESHARE_SOURCES") {
            Ok(path) => config.with_overrides_file(&path),
            Err(_) => Ok(config),
        }
    }

    /// Loads per-city path overrides from a JSON object keyed by city name or alias.
    pub fn with_overrides_file(self, path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ExploreError::Configuration(format!("cannot read source overrides '{path}': {e}"))
        })?;
        let entries: HashMap<String, String> = serde_json::from_str(&content).map_err(|e| {
            ExploreError::Configuration(format!("invalid source overrides '{path}': {e}"))
        })?;
        self.with_overrides(entries)
    }

    pub fn with_overrides(mut self, entries: HashMap<String, String>) -> Result<Self> {
        for (name, file) in entries {
            let city = City::resolve(&name)?;
            self.overrides.insert(city, PathBuf::from(file));
        }
        Ok(self)
    }

    /// Path of the CSV file for `city`.
    pub fn source_path(&self, city: City) -> PathBuf {
        self.overrides
            .get(&city)
            .cloned()
            .unwrap_or_else(|| self.data_dir.join(city.file_name()))
    }
}
