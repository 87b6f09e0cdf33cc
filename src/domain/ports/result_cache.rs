//! Result Cache Port
//!
//! Defines the interface for the durable aggregation-result store that
//! keeps separate plugin invocations in agreement.

use crate::domain::entities::CountryCount;
use async_trait::async_trait;

/// Errors from the cache store. All of them mean "no cache available"
/// to the reader, which then recomputes.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache file unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache file malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Durable store for the most recent aggregation result.
///
/// The config invocation writes the record; later fetch invocations read
/// it so both emit the same label set without querying the daemon twice.
/// Writers are not coordinated: the record is overwritten wholesale and
/// the last writer wins. A torn read surfaces as `Malformed`.
#[async_trait]
pub trait ResultCache: Send + Sync {
    /// Overwrite the cached result.
    async fn write(&self, result: &[CountryCount]) -> Result<(), CacheError>;

    /// Read the cached result.
    async fn read(&self) -> Result<Vec<CountryCount>, CacheError>;
}
