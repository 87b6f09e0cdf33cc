use std::path::PathBuf;

/// Name of the cache file created under `torcachedir`.
pub const CACHE_FILE_NAME: &str = "munin_tor_country_stats.json";

/// Default location of the MaxMind country database.
pub const DEFAULT_GEOIP_PATH: &str = "/usr/share/GeoIP/GeoLite2-Country.mmdb";

/// How the plugin reaches the daemon's control interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectMethod {
    /// TCP control port on localhost
    Port(u16),
    /// Unix domain socket path
    Socket(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Transport selector for the control session
    pub connect: ConnectMethod,
    /// Directory holding the aggregation-result cache, if caching is on
    pub cache_dir: Option<PathBuf>,
    /// Number of countries to keep in the ranking
    pub max_countries: usize,
    /// Path of the geolocation database
    pub geoip_path: PathBuf,
    /// Control password, when the daemon requires one
    pub password: Option<String>,
    /// Verbose logging
    pub debug: bool,
}

impl Config {
    /// Full path of the cache file, when a cache directory is configured.
    pub fn cache_path(&self) -> Option<PathBuf> {
        self.cache_dir.as_ref().map(|dir| dir.join(CACHE_FILE_NAME))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connect: ConnectMethod::Port(9051),
            cache_dir: None,
            max_countries: 15,
            geoip_path: PathBuf::from(DEFAULT_GEOIP_PATH),
            password: None,
            debug: false,
        }
    }
}

/// Load configuration from the munin-style environment variables.
///
/// Munin passes `env.foo` plugin settings as plain environment variables,
/// hence the lowercase names. Everything has a default except an invalid
/// `connectmethod`, which is refused outright.
pub fn load_config() -> anyhow::Result<Config> {
    let connect_method =
        std::env::var("connectmethod").unwrap_or_else(|_| "port".to_string());

    let connect = match connect_method.as_str() {
        "port" => {
            let port = std::env::var("port")
                .unwrap_or_else(|_| "9051".to_string())
                .parse()
                .unwrap_or(9051);
            ConnectMethod::Port(port)
        }
        "socket" => {
            let socket = std::env::var("socket")
                .unwrap_or_else(|_| "/var/run/tor/control".to_string());
            ConnectMethod::Socket(PathBuf::from(socket))
        }
        other => anyhow::bail!(
            "connectmethod contains an invalid value {:?}, specify either 'port' or 'socket'",
            other
        ),
    };

    let cache_dir = std::env::var("torcachedir").ok().map(PathBuf::from);

    let max_countries = std::env::var("tormaxcountries")
        .unwrap_or_else(|_| "15".to_string())
        .parse()
        .unwrap_or(15);

    let geoip_path = std::env::var("torgeoippath")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_GEOIP_PATH));

    let password = std::env::var("torpassword").ok();

    let debug = std::env::var("DEBUG").is_ok();

    Ok(Config {
        connect,
        cache_dir,
        max_countries,
        geoip_path,
        password,
        debug,
    })
}
