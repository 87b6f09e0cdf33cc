mod geo_resolver;
mod relay_source;
mod result_cache;

pub use geo_resolver::GeoResolver;
pub use relay_source::{ControlError, RelaySession, RelaySource};
pub use result_cache::{CacheError, ResultCache};
