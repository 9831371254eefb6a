use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One hour of forecast wind for a location, converted to mph.
///
/// Missing or non-numeric wind values arrive as NaN. Such a sample is
/// invalid: it is skipped by worst-hour selection and disqualifies any
/// window containing it, but it is never an error.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct HourlyObservation {
    /// Local time at the location, minute resolution
    pub time: NaiveDateTime,
    pub sustained_mph: f64,
    pub gust_mph: f64,
    /// Degrees from north, 0-360
    pub direction_deg: f64,
    /// Degrees Fahrenheit
    pub temperature_f: Option<f64>,
    /// Percent, 0-100
    pub precipitation_probability: Option<f64>,
}

impl HourlyObservation {
    pub fn new(time: NaiveDateTime, sustained_mph: f64, gust_mph: f64, direction_deg: f64) -> Self {
        HourlyObservation {
            time,
            sustained_mph,
            gust_mph,
            direction_deg,
            temperature_f: None,
            precipitation_probability: None,
        }
    }

    /// Usable for ranking: sustained and gust are finite.
    pub fn is_valid(&self) -> bool {
        self.sustained_mph.is_finite() && self.gust_mph.is_finite()
    }

    /// Usable for the hourly table, which also shows direction.
    pub fn is_displayable(&self) -> bool {
        self.is_valid() && self.direction_deg.is_finite()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::HourlyObservation;
    use chrono::NaiveDate;

    /// Sample at `hour:00` on 2024-06-01.
    pub fn hour(hour: u32, sustained: f64, gust: f64) -> HourlyObservation {
        let time = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        HourlyObservation::new(time, sustained, gust, 200.0)
    }
}
