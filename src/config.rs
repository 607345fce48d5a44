//! Runtime settings, built once at startup from defaults and command line flags.

use std::time::Duration;

use crate::cli::Args;
use crate::export::ExportFormat;

pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
pub const GEOCODE_COUNT: u32 = 10;
const USER_AGENT: &str = concat!("wxreport/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints {
    pub geocoding: String,
    pub forecast: String,
    pub archive: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocoding: GEOCODING_URL.to_string(),
            forecast: FORECAST_URL.to_string(),
            archive: ARCHIVE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoints: Endpoints,
    pub timeout: Duration,
    pub geocode_count: u32,
    pub user_agent: String,
    /// Read by the resilient fetch primitive: when set, downgrading to an
    /// unverified connection is logged at debug level instead of as a warning.
    pub silence_insecure_warnings: bool,
    pub format: ExportFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            timeout: REQUEST_TIMEOUT,
            geocode_count: GEOCODE_COUNT,
            user_agent: USER_AGENT.to_string(),
            silence_insecure_warnings: true,
            format: ExportFormat::Xlsx,
        }
    }
}

impl Settings {
    pub fn from_args(args: &Args) -> Self {
        Self {
            silence_insecure_warnings: !args.warn_insecure,
            format: args.format,
            ..Self::default()
        }
    }
}
