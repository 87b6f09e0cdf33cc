//! tor-munin - Tor country statistics for the munin monitoring harness
//!
//! This is the composition root that wires together all the components.

mod adapters;
mod application;
mod config;
mod domain;

use crate::adapters::inbound::munin;
use crate::adapters::outbound::{ControlPortSource, JsonResultCache, MaxMindGeoResolver};
use crate::application::CountriesService;
use crate::config::load_config;
use crate::domain::ports::{GeoResolver, RelaySource, ResultCache};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging; stdout carries only munin protocol lines, so all
    // diagnostics go to stderr
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let arg = std::env::args().nth(1);

    // ===== COMPOSITION ROOT =====
    // Wire up all adapters and the service

    // GeoIP resolver (MaxMind); an unopenable database leaves the whole
    // country feature inert for this invocation
    let geo: Option<Arc<dyn GeoResolver>> = match MaxMindGeoResolver::from_file(&cfg.geoip_path) {
        Ok(g) => {
            tracing::debug!("GeoIP DB loaded from {}", cfg.geoip_path.display());
            Some(Arc::new(g) as Arc<dyn GeoResolver>)
        }
        Err(e) => {
            tracing::info!(
                "GeoIP DB not usable at {} ({}), country statistics disabled",
                cfg.geoip_path.display(),
                e
            );
            None
        }
    };

    // Result cache, when a cache directory is configured
    let cache: Option<Arc<dyn ResultCache>> = cfg
        .cache_path()
        .map(|path| Arc::new(JsonResultCache::new(path)) as Arc<dyn ResultCache>);

    // Control-port session factory
    let relays: Arc<dyn RelaySource> = Arc::new(ControlPortSource::new(cfg.connect.clone()));

    let service = CountriesService::new(
        relays,
        geo,
        cache,
        cfg.password.clone(),
        cfg.max_countries,
    );

    let mut stdout = std::io::stdout();
    munin::run(arg.as_deref(), &service, &mut stdout).await?;

    Ok(())
}
