//! Munin Command Surface
//!
//! Parses the plugin's single positional mode argument and renders the
//! munin text protocol. Metric output goes to the given writer (stdout
//! in production) only; diagnostics are logged to stderr.

use crate::application::CountriesService;
use crate::domain::entities::CountryCount;
use crate::domain::ports::ControlError;
use std::io::{self, Write};

/// Metric names this binary provides, printed by `suggest`.
const SUGGESTIONS: &[&str] = &["countries"];

/// Plugin invocation modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Config,
    Fetch,
    Autoconf,
    Suggest,
}

impl Mode {
    /// Parse the positional argument. Munin calls the plugin without one
    /// for a plain value poll, which maps to `Fetch`.
    pub fn from_arg(arg: Option<&str>) -> Option<Self> {
        match arg {
            None => Some(Self::Fetch),
            Some(s) => match s.to_ascii_lowercase().as_str() {
                "config" => Some(Self::Config),
                "fetch" => Some(Self::Fetch),
                "autoconf" => Some(Self::Autoconf),
                "suggest" => Some(Self::Suggest),
                _ => None,
            },
        }
    }
}

/// Run one plugin invocation against `out`.
///
/// Every daemon-side failure has already been absorbed by the service
/// into empty output plus a logged message; this function only fails on
/// writer errors.
pub async fn run(
    arg: Option<&str>,
    service: &CountriesService,
    out: &mut impl Write,
) -> io::Result<()> {
    match Mode::from_arg(arg) {
        Some(Mode::Config) => {
            if let Some(result) = service.config_data().await {
                write_graph_config(out, &result)?;
            }
        }
        Some(Mode::Fetch) => {
            if let Some(result) = service.fetch_data().await {
                write_values(out, &result)?;
            }
        }
        Some(Mode::Autoconf) => {
            write_autoconf(out, service.probe().await)?;
        }
        Some(Mode::Suggest) => {
            for name in SUGGESTIONS {
                writeln!(out, "{}", name)?;
            }
        }
        None => {
            writeln!(
                out,
                "Unknown parameter {:?}, try \"suggest\" for a list of possible ones.",
                arg.unwrap_or_default()
            )?;
        }
    }
    Ok(())
}

/// Graph metadata plus one field block per selected country.
pub fn write_graph_config(out: &mut impl Write, result: &[CountryCount]) -> io::Result<()> {
    writeln!(out, "graph_title Countries")?;
    writeln!(out, "graph_args -l 0 --base 1000")?;
    writeln!(out, "graph_vlabel countries")?;
    writeln!(out, "graph_category Tor")?;
    writeln!(out, "graph_info Relays by country")?;
    for entry in result {
        writeln!(out, "{}.label {}", entry.country, entry.country)?;
        writeln!(out, "{}.min 0", entry.country)?;
        writeln!(out, "{}.max 25000", entry.country)?;
        writeln!(out, "{}.type GAUGE", entry.country)?;
    }
    Ok(())
}

/// One `.value` line per country.
pub fn write_values(out: &mut impl Write, result: &[CountryCount]) -> io::Result<()> {
    for entry in result {
        writeln!(out, "{}.value {}", entry.country, entry.count)?;
    }
    Ok(())
}

fn write_autoconf(out: &mut impl Write, probe: Result<(), ControlError>) -> io::Result<()> {
    match probe {
        Ok(()) => writeln!(out, "yes"),
        Err(e) if e.is_auth_failure() => writeln!(out, "no (Authentication failed: {})", e),
        Err(e) => writeln!(out, "no (Connection failed: {})", e),
    }
}
