//! tor-munin Library
//!
//! This module exposes the plugin's components for use in integration
//! tests and as a library.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;

// Re-export commonly used types
pub use application::CountriesService;
pub use config::{load_config, Config, ConnectMethod};
pub use domain::entities::{CountryCount, RelayStatus};
pub use domain::ports::{CacheError, ControlError, GeoResolver, RelaySession, RelaySource, ResultCache};
pub use domain::services::select_top;
pub use domain::value_objects::{simplify, UNKNOWN_COUNTRY};
