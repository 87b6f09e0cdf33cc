//! Countries Service - Main application use case
//!
//! Orchestrates the per-country aggregation: open a control session,
//! resolve relay addresses to countries, rank them, and keep the config
//! and fetch invocations in agreement through the result cache.

use crate::domain::entities::CountryCount;
use crate::domain::ports::{ControlError, GeoResolver, RelaySession, RelaySource, ResultCache};
use crate::domain::services::select_top;
use crate::domain::value_objects::{simplify, UNKNOWN_COUNTRY};
use std::collections::HashMap;
use std::sync::Arc;

/// Country-statistics service - main application use case.
///
/// The service orchestrates:
/// 1. A control session per aggregation attempt (authenticate, enumerate)
/// 2. Geolocation of every relay address, with the "Unknown" sentinel
/// 3. Deterministic top-N selection
/// 4. The cross-invocation result cache
pub struct CountriesService {
    relays: Arc<dyn RelaySource>,
    geo: Option<Arc<dyn GeoResolver>>,
    cache: Option<Arc<dyn ResultCache>>,
    password: Option<String>,
    max_countries: usize,
}

impl CountriesService {
    /// Create a new countries service.
    pub fn new(
        relays: Arc<dyn RelaySource>,
        geo: Option<Arc<dyn GeoResolver>>,
        cache: Option<Arc<dyn ResultCache>>,
        password: Option<String>,
        max_countries: usize,
    ) -> Self {
        Self {
            relays,
            geo,
            cache,
            password,
            max_countries,
        }
    }

    /// Whether the geolocation capability was available at startup.
    ///
    /// Without it the plugin stays inert for the whole process lifetime:
    /// no output lines, no daemon queries, no cache writes.
    pub fn available(&self) -> bool {
        self.geo.is_some()
    }

    /// Compute the top countries from a fresh control-port enumeration.
    ///
    /// Authentication failures are reported to the operator and produce
    /// an empty result; connection and enumeration failures abort the
    /// attempt instead of yielding a truncated count. The session closes
    /// on every path.
    pub async fn top_countries(&self) -> Result<Vec<CountryCount>, ControlError> {
        let Some(geo) = self.geo.as_ref() else {
            return Ok(Vec::new());
        };

        let mut session = self.relays.connect().await?;

        if let Err(e) = session.authenticate(self.password.as_deref()).await {
            if e.is_auth_failure() {
                tracing::warn!("authentication failed ({})", e);
                return Ok(Vec::new());
            }
            return Err(e);
        }

        let statuses = session.network_statuses().await?;

        let mut counts: HashMap<String, u64> = HashMap::new();
        for status in &statuses {
            let label = match geo.resolve(status.address) {
                Some(name) => simplify(&name),
                None => UNKNOWN_COUNTRY.to_string(),
            };
            *counts.entry(label).or_insert(0) += 1;
        }

        Ok(select_top(counts, self.max_countries))
    }

    /// Data for the `config` invocation: always a fresh aggregation,
    /// persisted to the cache for the fetch run that follows.
    ///
    /// Returns None when the subsystem is inert or the attempt failed;
    /// the caller emits nothing in that case. A failed cache write is
    /// only a warning, the metric definitions are still emitted.
    pub async fn config_data(&self) -> Option<Vec<CountryCount>> {
        if !self.available() {
            return None;
        }

        let result = match self.top_countries().await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("country aggregation failed: {}", e);
                return None;
            }
        };

        if let Some(cache) = self.cache.as_ref() {
            if let Err(e) = cache.write(&result).await {
                tracing::warn!("failed to write country cache: {}", e);
            }
        }

        Some(result)
    }

    /// Data for the `fetch` invocation: the cached result when readable,
    /// otherwise a fresh aggregation.
    ///
    /// Any cache failure means "no cache available" and falls back to
    /// recomputing; it is never surfaced as an error.
    pub async fn fetch_data(&self) -> Option<Vec<CountryCount>> {
        if !self.available() {
            return None;
        }

        if let Some(cache) = self.cache.as_ref() {
            match cache.read().await {
                Ok(result) => return Some(result),
                Err(e) => {
                    tracing::debug!("country cache unavailable ({}), recomputing", e)
                }
            }
        }

        match self.top_countries().await {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::error!("country aggregation failed: {}", e);
                None
            }
        }
    }

    /// Connectivity and authentication probe for the `autoconf` mode.
    pub async fn probe(&self) -> Result<(), ControlError> {
        let mut session = self.relays.connect().await?;
        session.authenticate(self.password.as_deref()).await
    }
}
