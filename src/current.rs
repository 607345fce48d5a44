//! Current-Conditions Fetcher.

use tracing::debug;

use crate::error::{Result, WxError};
use crate::fetch::Transport;
use crate::openmeteo::OpenMeteo;
use crate::units::direction::compass_point;
use crate::weather::CurrentObservation;

const RULE: &str = "----------------------------------";

pub fn fetch_current<T: Transport>(
    api: &OpenMeteo<T>,
    lat: f64,
    lon: f64,
    place_label: &str,
) -> Result<String> {
    let observation: CurrentObservation = api
        .forecast(lat, lon)?
        .current_weather
        .ok_or(WxError::NoData {
            what: "current weather",
        })?
        .into();
    debug!(?observation, "current weather");
    Ok(render_report(&observation, place_label))
}

/// `place_label` is shown as the user typed it, not as resolved.
pub fn render_report(observation: &CurrentObservation, place_label: &str) -> String {
    [
        "Current Weather Details".to_string(),
        RULE.to_string(),
        format!("Location: {place_label}"),
        format!("Temperature: {}°C", observation.temperature_c),
        format!("Wind Speed: {} km/h", observation.wind_speed_kmh),
        format!(
            "Wind Direction: {}° ({})",
            observation.wind_direction_deg,
            compass_point(observation.wind_direction_deg)
        ),
        format!("Time: {}", observation.observed_at),
        RULE.to_string(),
    ]
    .join("\n")
}
