use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::config::{Endpoints, Settings};
use crate::error::Result;
use crate::fetch::{HttpTransport, ResilientClient, Transport};

/// Hourly variables requested from the archive, in export column order.
pub const HOURLY_VARIABLES: [&str; 4] = [
    "temperature_2m",
    "windspeed_10m",
    "winddirection_10m",
    "precipitation",
];

pub mod geocoding {
    use super::*;

    #[derive(Deserialize, Debug, Default)]
    pub struct Search {
        #[serde(default)]
        pub results: Option<Vec<Place>>,
    }

    #[derive(Deserialize, Debug, Clone)]
    pub struct Place {
        #[serde(default)]
        pub name: String,

        pub latitude: f64,

        pub longitude: f64,

        pub country: Option<String>,
    }

    pub fn url(base: &str, name: &str, count: u32) -> String {
        format!("{base}?name={}&count={count}", urlencoding::encode(name))
    }
}

pub mod forecast {
    use super::*;

    #[derive(Deserialize, Debug, Default)]
    pub struct Forecast {
        #[serde(default)]
        pub current_weather: Option<CurrentWeather>,
    }

    #[derive(Deserialize, Debug, Clone)]
    pub struct CurrentWeather {
        pub temperature: f64,

        pub windspeed: f64,

        pub winddirection: f64,

        pub time: String,
    }

    pub fn url(base: &str, lat: f64, lon: f64) -> String {
        format!("{base}?latitude={lat}&longitude={lon}&current_weather=true")
    }
}

pub mod archive {
    use super::*;

    #[derive(Deserialize, Debug, Default)]
    pub struct Archive {
        #[serde(default)]
        pub hourly: Option<Hourly>,
    }

    /// Any variable may be missing from the payload, and any single value may be `null`.
    #[derive(Deserialize, Debug, Default, Clone)]
    pub struct Hourly {
        pub time: Vec<String>,

        #[serde(default)]
        pub temperature_2m: Option<Vec<Option<f64>>>,

        #[serde(default)]
        pub windspeed_10m: Option<Vec<Option<f64>>>,

        #[serde(default)]
        pub winddirection_10m: Option<Vec<Option<f64>>>,

        #[serde(default)]
        pub precipitation: Option<Vec<Option<f64>>>,
    }

    pub fn url(base: &str, lat: f64, lon: f64, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{base}?latitude={lat}&longitude={lon}&start_date={}&end_date={}&hourly={}&timezone=auto",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
            HOURLY_VARIABLES.join(","),
        )
    }
}

/// Open-Meteo API access over the resilient fetch primitive.
pub struct OpenMeteo<T = HttpTransport> {
    client: ResilientClient<T>,
    endpoints: Endpoints,
    geocode_count: u32,
}

impl OpenMeteo<HttpTransport> {
    pub fn from_settings(settings: &Settings) -> std::result::Result<Self, reqwest::Error> {
        let transport = HttpTransport::new(settings)?;
        Ok(Self::new(transport, settings))
    }
}

impl<T: Transport> OpenMeteo<T> {
    pub fn new(transport: T, settings: &Settings) -> Self {
        Self {
            client: ResilientClient::new(transport, settings.silence_insecure_warnings),
            endpoints: settings.endpoints.clone(),
            geocode_count: settings.geocode_count,
        }
    }

    pub fn search(&self, name: &str) -> Result<Vec<geocoding::Place>> {
        let url = geocoding::url(&self.endpoints.geocoding, name, self.geocode_count);
        let search: geocoding::Search = self.client.get_json(&url)?;
        let places = search.results.unwrap_or_default();
        debug!(name, candidates = places.len(), "geocoding answered");
        Ok(places)
    }

    pub fn forecast(&self, lat: f64, lon: f64) -> Result<forecast::Forecast> {
        let url = forecast::url(&self.endpoints.forecast, lat, lon);
        self.client.get_json(&url)
    }

    pub fn archive(
        &self,
        lat: f64,
        lon: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<archive::Archive> {
        let url = archive::url(&self.endpoints.archive, lat, lon, start, end);
        self.client.get_json(&url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::ScriptedTransport;

    #[test]
    fn test_geocoding_url_encodes_name() {
        assert_eq!(
            geocoding::url(crate::config::GEOCODING_URL, "São Paulo", 10),
            "https://geocoding-api.open-meteo.com/v1/search?name=S%C3%A3o%20Paulo&count=10"
        );
    }

    #[test]
    fn test_forecast_url() {
        assert_eq!(
            forecast::url(crate::config::FORECAST_URL, 28.65, 77.23),
            "https://api.open-meteo.com/v1/forecast?latitude=28.65&longitude=77.23&current_weather=true"
        );
    }

    #[test]
    fn test_archive_url() {
        let start = NaiveDate::from_ymd_opt(2025, 5, 25).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(
            archive::url(crate::config::ARCHIVE_URL, 28.65, -77.5, start, end),
            "https://archive-api.open-meteo.com/v1/archive?latitude=28.65&longitude=-77.5\
             &start_date=2025-05-25&end_date=2025-06-01\
             &hourly=temperature_2m,windspeed_10m,winddirection_10m,precipitation&timezone=auto"
        );
    }

    #[test]
    fn test_search_without_results_key() {
        let transport = ScriptedTransport::new().json(r#"{"generationtime_ms": 0.4}"#);
        let api = OpenMeteo::new(&transport, &Settings::default());

        assert!(api.search("Nowhere").unwrap().is_empty());
        assert_eq!(
            transport.urls(),
            vec!["https://geocoding-api.open-meteo.com/v1/search?name=Nowhere&count=10"]
        );
    }

    #[test]
    fn test_archive_tolerates_missing_and_null_variables() {
        let body = r#"{
            "latitude": 28.625,
            "hourly": {
                "time": ["2025-06-01T00:00", "2025-06-01T01:00"],
                "temperature_2m": [30.1, null]
            }
        }"#;
        let archive: archive::Archive = serde_json::from_str(body).unwrap();
        let hourly = archive.hourly.unwrap();

        assert_eq!(hourly.time.len(), 2);
        assert_eq!(hourly.temperature_2m, Some(vec![Some(30.1), None]));
        assert!(hourly.windspeed_10m.is_none());
        assert!(hourly.precipitation.is_none());
    }
}
