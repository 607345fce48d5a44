use crate::openmeteo::{archive, forecast, geocoding};

/// One geocoding match, in provider ranking order.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoCandidate {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub region_name: String,
}

impl From<geocoding::Place> for GeoCandidate {
    fn from(place: geocoding::Place) -> Self {
        Self {
            name: place.name,
            latitude: place.latitude,
            longitude: place.longitude,
            region_name: place.country.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentObservation {
    pub temperature_c: f64,
    pub wind_speed_kmh: f64,
    pub wind_direction_deg: f64,
    pub observed_at: String,
}

impl From<forecast::CurrentWeather> for CurrentObservation {
    fn from(current: forecast::CurrentWeather) -> Self {
        Self {
            temperature_c: current.temperature,
            wind_speed_kmh: current.windspeed,
            wind_direction_deg: current.winddirection,
            observed_at: current.time,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRow {
    pub time: String,
    pub temperature_2m: Option<f64>,
    pub windspeed_10m: Option<f64>,
    pub winddirection_10m: Option<f64>,
    pub precipitation: Option<f64>,
}

impl HourlyRow {
    /// Values in export column order, after `time`.
    pub fn values(&self) -> [Option<f64>; 4] {
        [
            self.temperature_2m,
            self.windspeed_10m,
            self.winddirection_10m,
            self.precipitation,
        ]
    }
}

/// Hourly table with one row per provider timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricalSeries {
    pub rows: Vec<HourlyRow>,
}

impl HistoricalSeries {
    pub const COLUMNS: [&'static str; 5] = [
        "time",
        "temperature_2m",
        "windspeed_10m",
        "winddirection_10m",
        "precipitation",
    ];

    /// Rows follow `time`; a missing variable, or a short array, reads as null.
    pub fn from_hourly(hourly: archive::Hourly) -> Self {
        fn value_at(column: &Option<Vec<Option<f64>>>, i: usize) -> Option<f64> {
            column.as_ref().and_then(|values| values.get(i).copied().flatten())
        }

        let rows = hourly
            .time
            .iter()
            .enumerate()
            .map(|(i, time)| HourlyRow {
                time: time.clone(),
                temperature_2m: value_at(&hourly.temperature_2m, i),
                windspeed_10m: value_at(&hourly.windspeed_10m, i),
                winddirection_10m: value_at(&hourly.winddirection_10m, i),
                precipitation: value_at(&hourly.precipitation, i),
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times(n: usize) -> Vec<String> {
        (0..n).map(|h| format!("2025-06-01T{h:02}:00")).collect()
    }

    #[test]
    fn test_missing_columns_become_nulls() {
        let hourly = archive::Hourly {
            time: times(3),
            temperature_2m: Some(vec![Some(30.0), Some(29.5), Some(29.0)]),
            ..Default::default()
        };
        let series = HistoricalSeries::from_hourly(hourly);

        assert_eq!(series.len(), 3);
        for row in &series.rows {
            assert!(row.temperature_2m.is_some());
            assert_eq!(row.windspeed_10m, None);
            assert_eq!(row.winddirection_10m, None);
            assert_eq!(row.precipitation, None);
        }
    }

    #[test]
    fn test_row_count_follows_time_axis() {
        let hourly = archive::Hourly {
            time: times(4),
            windspeed_10m: Some(vec![Some(1.0), None]),
            precipitation: Some(vec![Some(0.0); 6]),
            ..Default::default()
        };
        let series = HistoricalSeries::from_hourly(hourly);

        assert_eq!(series.len(), 4);
        assert_eq!(series.rows[0].windspeed_10m, Some(1.0));
        assert_eq!(series.rows[1].windspeed_10m, None);
        assert_eq!(series.rows[3].windspeed_10m, None);
        assert_eq!(series.rows[3].precipitation, Some(0.0));
        assert_eq!(series.rows[2].time, "2025-06-01T02:00");
    }

    #[test]
    fn test_empty_time_axis() {
        let series = HistoricalSeries::from_hourly(archive::Hourly::default());
        assert!(series.is_empty());
    }

    #[test]
    fn test_candidate_without_country() {
        let place = geocoding::Place {
            name: "Null Island".to_string(),
            latitude: 0.0,
            longitude: 0.0,
            country: None,
        };
        assert_eq!(GeoCandidate::from(place).region_name, "");
    }
}
