//! GeoIP Resolver Port
//!
//! Defines the interface for resolving IP addresses to countries.

use std::net::IpAddr;

/// Resolver for IP address to country name.
///
/// This is an outbound port that abstracts the geolocation database.
/// Implementations may use MaxMind GeoLite2, IP2Location, or other
/// country-level databases.
pub trait GeoResolver: Send + Sync {
    /// Resolve an IP address to its raw country name (e.g. "Germany").
    ///
    /// Returns None when the database has no match for the address.
    /// Substituting the "Unknown" sentinel is the caller's concern.
    fn resolve(&self, ip: IpAddr) -> Option<String>;
}
