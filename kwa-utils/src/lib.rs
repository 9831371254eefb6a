//! Shared utility functions for KWA crates.

/// Date and local timestamp helpers
pub mod dates {
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

    /// Forecast timestamps are local, minute resolution: "YYYY-MM-DDTHH:MM"
    pub const LOCAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

    /// Same as above with seconds, which some responses include
    pub const LOCAL_TIMESTAMP_FORMAT_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?)
    }

    /// Parse a local forecast timestamp ("YYYY-MM-DDTHH:MM", seconds optional)
    pub fn parse_local_timestamp(s: &str) -> anyhow::Result<NaiveDateTime> {
        let s = s.trim();
        match NaiveDateTime::parse_from_str(s, LOCAL_TIMESTAMP_FORMAT) {
            Ok(t) => Ok(t),
            Err(_) => Ok(NaiveDateTime::parse_from_str(
                s,
                LOCAL_TIMESTAMP_FORMAT_SECONDS,
            )?),
        }
    }

    /// Render a timestamp the way it is shown to a paddler: "YYYY-MM-DD HH:MM"
    pub fn display_timestamp(t: &NaiveDateTime) -> String {
        t.format("%Y-%m-%d %H:%M").to_string()
    }

    /// "Today", "Tomorrow", or the ISO date for anything else.
    pub fn day_label(target: &NaiveDate, today: &NaiveDate) -> String {
        if target == today {
            return String::from("Today");
        }
        match today.checked_add_signed(TimeDelta::days(1)) {
            Some(tomorrow) if tomorrow == *target => String::from("Tomorrow"),
            _ => format_date(target),
        }
    }

    /// Resolve a user supplied day: "today", "tomorrow", or "YYYY-MM-DD".
    pub fn resolve_day(s: &str, today: &NaiveDate) -> anyhow::Result<NaiveDate> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(*today),
            "tomorrow" => today
                .checked_add_signed(TimeDelta::days(1))
                .ok_or_else(|| anyhow::anyhow!("date out of range: {}", today)),
            other => parse_date(other),
        }
    }

}

/// Wind speed units accepted by the forecast service
pub mod units {
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use std::str::FromStr;

    use crate::error::UnitError;

    pub const KMH_TO_MPH: f64 = 0.621371;
    pub const MS_TO_MPH: f64 = 2.23694;
    pub const KNOTS_TO_MPH: f64 = 1.15078;

    /// The classifier always works in miles per hour; everything else is
    /// converted at the boundary.
    #[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
    pub enum WindUnit {
        #[default]
        Mph,
        Knots,
        Kmh,
        MetersPerSecond,
    }

    impl WindUnit {
        /// Query parameter code understood by the forecast service
        pub fn api_code(&self) -> &'static str {
            match self {
                WindUnit::Mph => "mph",
                WindUnit::Knots => "kn",
                WindUnit::Kmh => "kmh",
                WindUnit::MetersPerSecond => "ms",
            }
        }

        fn mph_factor(&self) -> f64 {
            match self {
                WindUnit::Mph => 1.0,
                WindUnit::Knots => KNOTS_TO_MPH,
                WindUnit::Kmh => KMH_TO_MPH,
                WindUnit::MetersPerSecond => MS_TO_MPH,
            }
        }

        /// Convert a value in this unit to mph. NaN stays NaN.
        pub fn to_mph(&self, value: f64) -> f64 {
            value * self.mph_factor()
        }

        /// Convert a mph value back into this unit for display.
        pub fn from_mph(&self, mph: f64) -> f64 {
            mph / self.mph_factor()
        }
    }

    impl fmt::Display for WindUnit {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.api_code())
        }
    }

    impl FromStr for WindUnit {
        type Err = UnitError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.trim().to_lowercase().as_str() {
                "mph" => Ok(WindUnit::Mph),
                "kn" | "kt" | "knots" => Ok(WindUnit::Knots),
                "kmh" | "km/h" => Ok(WindUnit::Kmh),
                "ms" | "m/s" => Ok(WindUnit::MetersPerSecond),
                other => Err(UnitError(other.to_string())),
            }
        }
    }

}

/// Compass helpers
pub mod compass {
    const POINTS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];

    /// 16-wind compass point for a direction in degrees.
    pub fn deg_to_compass(deg: f64) -> &'static str {
        let i = (deg / 22.5 + 0.5).floor() as i64;
        POINTS[i.rem_euclid(16) as usize]
    }

    #[cfg(test)]
    mod tests {
        use super::deg_to_compass;

        #[test]
        fn test_deg_to_compass() {
            assert_eq!(deg_to_compass(0.0), "N");
            assert_eq!(deg_to_compass(11.0), "N");
            assert_eq!(deg_to_compass(11.25), "NNE");
            assert_eq!(deg_to_compass(90.0), "E");
            assert_eq!(deg_to_compass(225.0), "SW");
            assert_eq!(deg_to_compass(350.0), "N");
            assert_eq!(deg_to_compass(360.0), "N");
        }
    }
}

/// Error types
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug, PartialEq, Eq)]
    #[error("unknown wind unit: {0} (expected mph, kn, kmh or ms)")]
    pub struct UnitError(pub String);
}
