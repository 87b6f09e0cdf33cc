//! JSON Result Cache
//!
//! Persists the most recent aggregation result as a JSON array of
//! [label, count] pairs. One config invocation writes, later fetch
//! invocations read; the file is replaced wholesale on every write and
//! the last writer wins.

use crate::domain::entities::CountryCount;
use crate::domain::ports::{CacheError, ResultCache};
use async_trait::async_trait;
use std::path::PathBuf;

/// File-backed result cache.
pub struct JsonResultCache {
    path: PathBuf,
}

impl JsonResultCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl ResultCache for JsonResultCache {
    async fn write(&self, result: &[CountryCount]) -> Result<(), CacheError> {
        let pairs: Vec<(&str, u64)> = result
            .iter()
            .map(|entry| (entry.country.as_str(), entry.count))
            .collect();
        let body = serde_json::to_vec(&pairs)?;
        tokio::fs::write(&self.path, body).await?;
        Ok(())
    }

    async fn read(&self) -> Result<Vec<CountryCount>, CacheError> {
        let body = tokio::fs::read(&self.path).await?;
        let pairs: Vec<(String, u64)> = serde_json::from_slice(&body)?;
        Ok(pairs
            .into_iter()
            .map(|(country, count)| CountryCount { country, count })
            .collect())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn sample() -> Vec<CountryCount> {
        vec![
            CountryCount::new("Germany", 1200),
            CountryCount::new("United_States", 900),
            CountryCount::new("Unknown", 17),
        ]
    }

    #[tokio::test]
    async fn test_write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonResultCache::new(dir.path().join("stats.json"));

        cache.write(&sample()).await.unwrap();
        let read_back = cache.read().await.unwrap();

        assert_eq!(read_back, sample());
    }

    #[tokio::test]
    async fn test_write_overwrites_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonResultCache::new(dir.path().join("stats.json"));

        cache.write(&sample()).await.unwrap();
        let replacement = vec![CountryCount::new("France", 3)];
        cache.write(&replacement).await.unwrap();

        assert_eq!(cache.read().await.unwrap(), replacement);
    }

    #[tokio::test]
    async fn test_read_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonResultCache::new(dir.path().join("absent.json"));

        assert!(matches!(cache.read().await, Err(CacheError::Io(_))));
    }

    #[tokio::test]
    async fn test_read_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        tokio::fs::write(&path, b"[[\"Germany\", 12").await.unwrap();

        let cache = JsonResultCache::new(path);
        assert!(matches!(cache.read().await, Err(CacheError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_write_to_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonResultCache::new(dir.path().join("no-such-dir").join("stats.json"));

        assert!(matches!(cache.write(&sample()).await, Err(CacheError::Io(_))));
    }

    #[tokio::test]
    async fn test_wire_format_is_array_of_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        let cache = JsonResultCache::new(path.clone());

        cache
            .write(&[CountryCount::new("Germany", 3), CountryCount::new("Unknown", 1)])
            .await
            .unwrap();

        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(raw, r#"[["Germany",3],["Unknown",1]]"#);
    }

    #[tokio::test]
    async fn test_empty_result_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonResultCache::new(dir.path().join("stats.json"));

        cache.write(&[]).await.unwrap();
        assert!(cache.read().await.unwrap().is_empty());
    }
}
