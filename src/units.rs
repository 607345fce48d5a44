pub mod direction {
    const COMPASS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];

    /// 16-point compass name for a meteorological wind direction (degrees from north).
    pub fn compass_point(deg: f64) -> &'static str {
        let deg = deg.rem_euclid(360.0);
        let idx = (deg / 22.5 + 0.5) as usize % COMPASS.len();
        COMPASS[idx]
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use rstest::rstest;

        #[rstest]
        #[case(0.0, "N")]
        #[case(90.0, "E")]
        #[case(180.0, "S")]
        #[case(270.0, "W")]
        #[case(360.0, "N")]
        #[case(348.75, "N")]
        #[case(33.0, "NNE")]
        #[case(-90.0, "W")]
        fn test_compass_point(#[case] deg: f64, #[case] expected: &str) {
            assert_eq!(compass_point(deg), expected);
        }
    }
}
