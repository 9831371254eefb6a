//! Forecast response records and their validation into core types.
//!
//! The forecast service returns parallel arrays keyed by a `time` axis. The
//! wire records below accept whatever arrives; `ForecastResponse::validate`
//! turns them into typed observations, rejecting a response that lacks a
//! required series instead of quietly producing an empty day.

use chrono::{NaiveDate, NaiveDateTime};
use kwa_rating::{DailyConditions, HourlyObservation};
use kwa_utils::dates::{parse_date, parse_local_timestamp};
use kwa_utils::units::WindUnit;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};
use crate::geocode::Coordinates;

/// Open-Meteo forecast endpoint.
pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";

pub const DEFAULT_FORECAST_DAYS: u8 = 3;

pub const HOURLY_VARIABLES: [&str; 7] = [
    "temperature_2m",
    "precipitation_probability",
    "precipitation",
    "weathercode",
    "wind_speed_10m",
    "wind_gusts_10m",
    "wind_direction_10m",
];

pub const DAILY_VARIABLES: [&str; 9] = [
    "temperature_2m_max",
    "temperature_2m_min",
    "precipitation_probability_max",
    "precipitation_sum",
    "wind_speed_10m_max",
    "wind_gusts_10m_max",
    "wind_direction_10m_dominant",
    "sunrise",
    "sunset",
];

/// Parameters of one forecast request.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub coordinates: Coordinates,
    /// IANA zone the hourly timestamps are reported in
    pub timezone: String,
    pub wind_unit: WindUnit,
    pub forecast_days: u8,
}

impl ForecastRequest {
    pub fn new(coordinates: Coordinates, timezone: &str, wind_unit: WindUnit) -> Self {
        ForecastRequest {
            coordinates,
            timezone: timezone.to_string(),
            wind_unit,
            forecast_days: DEFAULT_FORECAST_DAYS,
        }
    }

    /// Query string pairs. Temperatures in Fahrenheit, precipitation in inches.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", self.coordinates.latitude.to_string()),
            ("longitude", self.coordinates.longitude.to_string()),
            ("timezone", self.timezone.clone()),
            ("windspeed_unit", self.wind_unit.api_code().to_string()),
            ("temperature_unit", String::from("fahrenheit")),
            ("precipitation_unit", String::from("inch")),
            ("hourly", HOURLY_VARIABLES.join(",")),
            ("daily", DAILY_VARIABLES.join(",")),
            ("forecast_days", self.forecast_days.to_string()),
        ]
    }
}

/// Hourly block as sent by the service.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct HourlyBlock {
    pub time: Option<Vec<String>>,
    pub wind_speed_10m: Option<Vec<Option<f64>>>,
    pub wind_gusts_10m: Option<Vec<Option<f64>>>,
    pub wind_direction_10m: Option<Vec<Option<f64>>>,
    pub temperature_2m: Option<Vec<Option<f64>>>,
    pub precipitation_probability: Option<Vec<Option<f64>>>,
}

/// Daily block as sent by the service.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DailyBlock {
    pub time: Option<Vec<String>>,
    pub temperature_2m_max: Option<Vec<Option<f64>>>,
    pub temperature_2m_min: Option<Vec<Option<f64>>>,
    pub precipitation_probability_max: Option<Vec<Option<f64>>>,
    pub precipitation_sum: Option<Vec<Option<f64>>>,
    pub wind_speed_10m_max: Option<Vec<Option<f64>>>,
    pub wind_gusts_10m_max: Option<Vec<Option<f64>>>,
    pub wind_direction_10m_dominant: Option<Vec<Option<f64>>>,
    pub sunrise: Option<Vec<Option<String>>>,
    pub sunset: Option<Vec<Option<String>>>,
}

/// Forecast response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub hourly: Option<HourlyBlock>,
    #[serde(default)]
    pub daily: Option<DailyBlock>,
}

/// Daily summary for one date. Wind values are mph.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub temp_max_f: Option<f64>,
    pub temp_min_f: Option<f64>,
    pub precipitation_probability_max: Option<f64>,
    pub precipitation_sum_in: Option<f64>,
    pub wind_max_mph: Option<f64>,
    pub gust_max_mph: Option<f64>,
    pub dominant_direction_deg: Option<f64>,
    pub sunrise: Option<NaiveDateTime>,
    pub sunset: Option<NaiveDateTime>,
}

impl DailySummary {
    /// Inputs for the exposure overlay, if all of them were reported.
    pub fn conditions(&self) -> Option<DailyConditions> {
        Some(DailyConditions {
            temp_hi_f: self.temp_max_f?,
            temp_lo_f: self.temp_min_f?,
            max_wind_mph: self.wind_max_mph?,
        })
    }
}

/// A validated forecast covering every date in the response.
#[derive(Debug, PartialEq, Clone)]
pub struct Forecast {
    pub timezone: Option<String>,
    pub hourly: Vec<HourlyObservation>,
    pub daily: Vec<DailySummary>,
}

/// The slice of a forecast for one local date.
#[derive(Debug, PartialEq, Clone)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub observations: Vec<HourlyObservation>,
    pub summary: Option<DailySummary>,
}

impl DayForecast {
    /// No hourly samples at all for this date.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Check a series against the time axis. A missing optional series becomes
/// all `None`.
fn aligned<T: Clone>(
    name: &'static str,
    values: Option<Vec<Option<T>>>,
    expected: usize,
    required: bool,
) -> Result<Vec<Option<T>>> {
    match values {
        None if required => Err(ForecastError::MissingSeries(name)),
        None => Ok(vec![None; expected]),
        Some(v) if v.len() != expected => Err(ForecastError::SeriesLength {
            series: name,
            expected,
            found: v.len(),
        }),
        Some(v) => Ok(v),
    }
}

fn wind_mph(value: Option<f64>, unit: WindUnit) -> f64 {
    value.map_or(f64::NAN, |v| unit.to_mph(v))
}

impl HourlyBlock {
    fn validate(self, unit: WindUnit) -> Result<Vec<HourlyObservation>> {
        let time = self.time.ok_or(ForecastError::MissingSeries("hourly.time"))?;
        let n = time.len();
        let sustained = aligned("hourly.wind_speed_10m", self.wind_speed_10m, n, true)?;
        let gusts = aligned("hourly.wind_gusts_10m", self.wind_gusts_10m, n, true)?;
        let directions = aligned("hourly.wind_direction_10m", self.wind_direction_10m, n, true)?;
        let temperatures = aligned("hourly.temperature_2m", self.temperature_2m, n, false)?;
        let precipitation = aligned(
            "hourly.precipitation_probability",
            self.precipitation_probability,
            n,
            false,
        )?;

        let mut observations = Vec::with_capacity(n);
        for (i, stamp) in time.iter().enumerate() {
            let Ok(t) = parse_local_timestamp(stamp) else {
                warn!("Skipping hourly sample with unparseable time {:?}", stamp);
                continue;
            };
            observations.push(HourlyObservation {
                time: t,
                sustained_mph: wind_mph(sustained[i], unit),
                gust_mph: wind_mph(gusts[i], unit),
                direction_deg: directions[i].unwrap_or(f64::NAN),
                temperature_f: temperatures[i],
                precipitation_probability: precipitation[i],
            });
        }
        Ok(observations)
    }
}

impl DailyBlock {
    fn validate(self, unit: WindUnit) -> Result<Vec<DailySummary>> {
        let time = self.time.ok_or(ForecastError::MissingSeries("daily.time"))?;
        let n = time.len();
        let temp_max = aligned("daily.temperature_2m_max", self.temperature_2m_max, n, false)?;
        let temp_min = aligned("daily.temperature_2m_min", self.temperature_2m_min, n, false)?;
        let pop = aligned(
            "daily.precipitation_probability_max",
            self.precipitation_probability_max,
            n,
            false,
        )?;
        let psum = aligned("daily.precipitation_sum", self.precipitation_sum, n, false)?;
        let wind_max = aligned("daily.wind_speed_10m_max", self.wind_speed_10m_max, n, false)?;
        let gust_max = aligned("daily.wind_gusts_10m_max", self.wind_gusts_10m_max, n, false)?;
        let direction = aligned(
            "daily.wind_direction_10m_dominant",
            self.wind_direction_10m_dominant,
            n,
            false,
        )?;
        let sunrise = aligned("daily.sunrise", self.sunrise, n, false)?;
        let sunset = aligned("daily.sunset", self.sunset, n, false)?;

        let parse_stamp =
            |s: &Option<String>| s.as_deref().and_then(|s| parse_local_timestamp(s).ok());
        let mut summaries = Vec::with_capacity(n);
        for (i, stamp) in time.iter().enumerate() {
            let Ok(date) = parse_date(stamp) else {
                warn!("Skipping daily summary with unparseable date {:?}", stamp);
                continue;
            };
            summaries.push(DailySummary {
                date,
                temp_max_f: temp_max[i],
                temp_min_f: temp_min[i],
                precipitation_probability_max: pop[i],
                precipitation_sum_in: psum[i],
                wind_max_mph: wind_max[i].map(|v| unit.to_mph(v)),
                gust_max_mph: gust_max[i].map(|v| unit.to_mph(v)),
                dominant_direction_deg: direction[i],
                sunrise: parse_stamp(&sunrise[i]),
                sunset: parse_stamp(&sunset[i]),
            });
        }
        Ok(summaries)
    }
}

impl ForecastResponse {
    /// Parse a response body.
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Validate into typed records, converting wind from `unit` to mph.
    ///
    /// The hourly block with its time axis and the three wind series is
    /// required. The daily block is optional, but when present its series
    /// must line up with its own time axis.
    pub fn validate(self, unit: WindUnit) -> Result<Forecast> {
        let hourly = self
            .hourly
            .ok_or(ForecastError::MissingSeries("hourly"))?
            .validate(unit)?;
        let daily = match self.daily {
            Some(block) => block.validate(unit)?,
            None => Vec::new(),
        };
        debug!(
            "Validated forecast: {} hourly samples, {} daily summaries",
            hourly.len(),
            daily.len()
        );
        Ok(Forecast {
            timezone: self.timezone,
            hourly,
            daily,
        })
    }
}

impl Forecast {
    /// Samples and summary whose local date is `date`.
    pub fn day(&self, date: NaiveDate) -> DayForecast {
        DayForecast {
            date,
            observations: self
                .hourly
                .iter()
                .filter(|o| o.time.date() == date)
                .cloned()
                .collect(),
            summary: self.daily.iter().find(|d| d.date == date).cloned(),
        }
    }
}
