//! MaxMind GeoIP Resolver
//!
//! Implements GeoResolver using a MaxMind GeoLite2 country database.

use crate::domain::ports::GeoResolver;
use maxminddb::Reader;
use serde::Deserialize;
use std::net::IpAddr;
use std::path::Path;

/// MaxMind GeoIP resolver.
///
/// The database is loaded into memory once at startup; lookups
/// afterwards touch no I/O. If the configured file cannot be opened the
/// composition root leaves the whole country feature inert rather than
/// constructing a resolver.
pub struct MaxMindGeoResolver {
    reader: Reader<Vec<u8>>,
}

impl MaxMindGeoResolver {
    /// Load a GeoIP database from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let reader = Reader::open_readfile(path)?;
        Ok(Self { reader })
    }
}

impl GeoResolver for MaxMindGeoResolver {
    fn resolve(&self, ip: IpAddr) -> Option<String> {
        #[derive(Debug, Deserialize)]
        struct Names {
            en: Option<String>,
        }

        #[derive(Debug, Deserialize)]
        struct Country {
            names: Option<Names>,
        }

        #[derive(Debug, Deserialize)]
        struct CountryResp {
            country: Option<Country>,
        }

        let resp: CountryResp = self.reader.lookup(ip).ok()?;
        resp.country?.names?.en
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_nonexistent() {
        let result = MaxMindGeoResolver::from_file("/nonexistent/path/GeoLite2-Country.mmdb");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file_not_a_database() {
        // Any readable non-mmdb file must fail to open, not panic.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.mmdb");
        std::fs::write(&path, b"definitely not a maxmind database").unwrap();

        let result = MaxMindGeoResolver::from_file(&path);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolver_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MaxMindGeoResolver>();
    }
}
