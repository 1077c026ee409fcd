pub mod aggregator;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod repair;
pub mod store;

pub use error::{ExploreError, Result};
