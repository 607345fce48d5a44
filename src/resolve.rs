//! Place Resolver: "City, Country" text to a single ranked geocoding candidate.

use tracing::{debug, info, warn};

use crate::error::{Result, WxError};
use crate::fetch::Transport;
use crate::openmeteo::OpenMeteo;
use crate::weather::GeoCandidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceQuery<'a> {
    pub name: &'a str,
    pub region_hint: Option<&'a str>,
}

impl<'a> PlaceQuery<'a> {
    /// Splits on the first comma. An empty hint counts as no hint.
    pub fn parse(input: &'a str) -> Self {
        match input.split_once(',') {
            Some((name, hint)) => {
                let hint = hint.trim();
                Self {
                    name: name.trim(),
                    region_hint: (!hint.is_empty()).then_some(hint),
                }
            }
            None => Self {
                name: input.trim(),
                region_hint: None,
            },
        }
    }
}

/// Picks the first candidate whose region starts with `hint`, ignoring case.
///
/// A hint that matches nothing falls back to the first candidate overall.
pub fn select<'c>(candidates: &'c [GeoCandidate], hint: Option<&str>) -> Option<&'c GeoCandidate> {
    let first = candidates.first()?;
    let Some(hint) = hint else {
        return Some(first);
    };

    let hint = hint.to_lowercase();
    match candidates
        .iter()
        .find(|c| c.region_name.to_lowercase().starts_with(&hint))
    {
        Some(matched) => Some(matched),
        None => {
            warn!(
                hint = %hint,
                fallback = %first.region_name,
                "region hint matched no candidate, using best-ranked result"
            );
            Some(first)
        }
    }
}

pub fn resolve<T: Transport>(api: &OpenMeteo<T>, input: &str) -> Result<GeoCandidate> {
    let query = PlaceQuery::parse(input);
    debug!(?query, "resolving place");

    let candidates: Vec<GeoCandidate> = api
        .search(query.name)?
        .into_iter()
        .map(GeoCandidate::from)
        .collect();

    let chosen = select(&candidates, query.region_hint).ok_or_else(|| WxError::NotFound {
        query: input.to_string(),
    })?;
    info!(
        name = %chosen.name,
        region = %chosen.region_name,
        lat = chosen.latitude,
        lon = chosen.longitude,
        "resolved place"
    );
    Ok(chosen.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::fetch::testing::ScriptedTransport;
    use rstest::rstest;

    fn candidate(name: &str, region: &str, lat: f64) -> GeoCandidate {
        GeoCandidate {
            name: name.to_string(),
            latitude: lat,
            longitude: 0.0,
            region_name: region.to_string(),
        }
    }

    fn springfields() -> Vec<GeoCandidate> {
        vec![
            candidate("Springfield", "United States", 39.8),
            candidate("Springfield", "Australia", -33.6),
            candidate("Springfield", "United Kingdom", 51.7),
        ]
    }

    #[rstest]
    #[case("Delhi, India", "Delhi", Some("India"))]
    #[case("  Delhi ,  india  ", "Delhi", Some("india"))]
    #[case("Springfield", "Springfield", None)]
    #[case("Delhi,", "Delhi", None)]
    #[case("Portland, Oregon, United States", "Portland", Some("Oregon, United States"))]
    fn test_parse(#[case] input: &str, #[case] name: &str, #[case] hint: Option<&str>) {
        let query = PlaceQuery::parse(input);
        assert_eq!(query.name, name);
        assert_eq!(query.region_hint, hint);
    }

    #[rstest]
    #[case("Delhi, India")]
    #[case("Paris , France")]
    #[case("  Lima,Peru ")]
    fn test_parse_is_idempotent(#[case] input: &str) {
        let first = PlaceQuery::parse(input);
        let rejoined = format!("{}, {}", first.name, first.region_hint.unwrap());
        assert_eq!(PlaceQuery::parse(&rejoined), first);
    }

    #[test]
    fn test_select_without_hint_takes_first() {
        let candidates = springfields();
        assert_eq!(select(&candidates, None), Some(&candidates[0]));
    }

    #[rstest]
    #[case("australia", 1)]
    #[case("United K", 2)]
    #[case("united", 0)]
    fn test_select_by_region_prefix(#[case] hint: &str, #[case] expected: usize) {
        let candidates = springfields();
        assert_eq!(select(&candidates, Some(hint)), Some(&candidates[expected]));
    }

    #[rstest]
    #[case("Canada")]
    #[case("Australia and New Zealand")]
    fn test_select_unmatched_hint_falls_back(#[case] hint: &str) {
        let candidates = springfields();
        assert_eq!(select(&candidates, Some(hint)), Some(&candidates[0]));
    }

    #[test]
    fn test_select_is_deterministic() {
        let candidates = springfields();
        let picks: Vec<_> = (0..5).map(|_| select(&candidates, Some("aus"))).collect();
        assert!(picks.iter().all(|p| *p == Some(&candidates[1])));
    }

    #[test]
    fn test_select_empty() {
        assert_eq!(select(&[], Some("India")), None);
        assert_eq!(select(&[], None), None);
    }

    #[test]
    fn test_resolve_queries_name_only() {
        let transport = ScriptedTransport::new().json(
            r#"{"results": [
                {"name": "Delhi", "latitude": 28.65, "longitude": 77.23, "country": "India"},
                {"name": "Delhi", "latitude": 42.27, "longitude": -74.91, "country": "United States"}
            ]}"#,
        );
        let api = OpenMeteo::new(&transport, &Settings::default());

        let place = resolve(&api, "Delhi, United States").unwrap();
        assert_eq!(place.latitude, 42.27);
        assert_eq!(place.region_name, "United States");
        assert_eq!(
            transport.urls(),
            vec!["https://geocoding-api.open-meteo.com/v1/search?name=Delhi&count=10"]
        );
    }

    #[test]
    fn test_resolve_not_found() {
        let transport = ScriptedTransport::new().json(r#"{"results": []}"#);
        let api = OpenMeteo::new(&transport, &Settings::default());

        let err = resolve(&api, "Atlantis, Ocean").unwrap_err();
        assert!(matches!(err, WxError::NotFound { ref query } if query == "Atlantis, Ocean"));
    }
}
