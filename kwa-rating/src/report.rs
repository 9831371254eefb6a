//! Everything shown for one (location, date) query, computed fresh each time.

use chrono::NaiveDateTime;
use kwa_utils::compass::deg_to_compass;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::classifier::classify;
use crate::exposure::{combine, exposure_risk, ExposureConfig, ExposureRisk};
use crate::observation::HourlyObservation;
use crate::thresholds::{Modifiers, RatingConfig};
use crate::tier::AdvisoryTier;
use crate::worst_hour::{select_worst_hour, DaySelection};
use crate::worst_window::{select_worst_window, WorstWindow, DEFAULT_WINDOW_HOURS};

pub const OFFSHORE_NOTE: &str =
    "Offshore wind can push you away from the launch and make return harder.";
pub const BIG_WATER_NOTE: &str =
    "Big water usually means more wave build and fewer safe bailout options.";
pub const GUST_NOTE: &str =
    "Gusts matter. A steady 10 can feel fine, but gusting 20 can turn it into work fast.";

/// One line of the hourly table.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct HourRow {
    pub time: NaiveDateTime,
    pub sustained_mph: f64,
    pub gust_mph: f64,
    pub direction_deg: f64,
    pub compass: String,
    pub tier: AdvisoryTier,
}

/// Daily summary values the exposure overlay needs.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct DailyConditions {
    pub temp_hi_f: f64,
    pub temp_lo_f: f64,
    pub max_wind_mph: f64,
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct ExposureOverlay {
    pub risk: ExposureRisk,
    /// Wind verdict after applying exposure
    pub combined: AdvisoryTier,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct DayReport {
    /// `None` means no usable data, not an all-clear
    pub worst_hour: Option<DaySelection>,
    pub worst_window: Option<WorstWindow>,
    pub table: Vec<HourRow>,
    pub exposure: Option<ExposureOverlay>,
    pub notes: Vec<&'static str>,
}

impl DayReport {
    /// Final advisory for the day, or `None` when there was nothing to rate.
    pub fn verdict(&self) -> Option<AdvisoryTier> {
        let wind = self.worst_hour.as_ref()?.tier;
        Some(self.exposure.map_or(wind, |e| e.combined))
    }
}

/// Table rows for every sample with finite wind and direction.
pub fn hourly_table(
    observations: &[HourlyObservation],
    modifiers: &Modifiers,
    config: &RatingConfig,
) -> Vec<HourRow> {
    observations
        .iter()
        .filter(|o| o.is_displayable())
        .map(|o| HourRow {
            time: o.time,
            sustained_mph: o.sustained_mph,
            gust_mph: o.gust_mph,
            direction_deg: o.direction_deg,
            compass: deg_to_compass(o.direction_deg).to_string(),
            tier: classify(o.sustained_mph, o.gust_mph, modifiers, config).tier,
        })
        .collect()
}

pub fn advisory_notes(modifiers: &Modifiers) -> Vec<&'static str> {
    let mut notes = Vec::new();
    if modifiers.offshore {
        notes.push(OFFSHORE_NOTE);
    }
    if modifiers.big_water {
        notes.push(BIG_WATER_NOTE);
    }
    notes.push(GUST_NOTE);
    notes
}

/// Rate one day of hourly samples.
///
/// The exposure overlay is only computed when the daily summary is present
/// with finite values and there is a wind verdict to combine it with.
pub fn rate_day(
    observations: &[HourlyObservation],
    daily: Option<&DailyConditions>,
    modifiers: &Modifiers,
    config: &RatingConfig,
    exposure_config: &ExposureConfig,
) -> DayReport {
    let worst_hour = select_worst_hour(observations, modifiers, config);
    let worst_window = select_worst_window(observations, DEFAULT_WINDOW_HOURS);
    let exposure = match (&worst_hour, daily) {
        (Some(worst), Some(d))
            if d.temp_hi_f.is_finite()
                && d.temp_lo_f.is_finite()
                && d.max_wind_mph.is_finite() =>
        {
            let risk = exposure_risk(
                d.temp_hi_f,
                d.temp_lo_f,
                d.max_wind_mph,
                modifiers.big_water,
                exposure_config,
            );
            Some(ExposureOverlay {
                risk,
                combined: combine(worst.tier, risk),
            })
        }
        _ => None,
    };
    let valid = observations.iter().filter(|o| o.is_valid()).count();
    debug!(
        "rated {} samples ({} valid): worst hour {:?}, exposure {:?}",
        observations.len(),
        valid,
        worst_hour.as_ref().map(|w| w.tier),
        exposure.map(|e| e.risk)
    );
    DayReport {
        worst_hour,
        worst_window,
        table: hourly_table(observations, modifiers, config),
        exposure,
        notes: advisory_notes(modifiers),
    }
}
