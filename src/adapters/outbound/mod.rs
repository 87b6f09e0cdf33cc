mod control_port_source;
mod json_result_cache;
mod maxmind_geo_resolver;

pub use control_port_source::{ControlPortSource, ControlSession};
pub use json_result_cache::JsonResultCache;
pub use maxmind_geo_resolver::MaxMindGeoResolver;
