//! Statistics over a filtered view of trips.
//!
//! Four independent groups: time of travel, station popularity, trip
//! durations and rider demographics. Each is a pure function of a
//! [`FilteredView`](crate::filter::FilteredView) and fails with
//! `EmptyDataset` when the view has no records. [`report::Report`] runs all
//! four and keeps a failure in one group from affecting the others.

pub mod duration;
pub mod report;
pub mod stations;
pub mod time;
pub mod types;
pub mod users;
pub mod utility;

pub use duration::duration_stats;
pub use report::Report;
pub use stations::station_stats;
pub use time::time_stats;
pub use users::{age_range, user_stats};
