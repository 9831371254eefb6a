//! Cold-exposure overlay.
//!
//! Cold water and air turn a capsize into an emergency, so a cold day can
//! raise the advisory even when the wind is fine. Exposure never lowers a
//! wind verdict and on its own never produces DO NOT GO.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tier::AdvisoryTier;

/// Ordered `Low < Moderate < High`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum ExposureRisk {
    Low,
    Moderate,
    High,
}

impl ExposureRisk {
    /// One step higher, saturating at `High`.
    pub fn escalate(self) -> Self {
        match self {
            ExposureRisk::Low => ExposureRisk::Moderate,
            ExposureRisk::Moderate | ExposureRisk::High => ExposureRisk::High,
        }
    }
}

impl fmt::Display for ExposureRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExposureRisk::Low => "LOW",
            ExposureRisk::Moderate => "MODERATE",
            ExposureRisk::High => "HIGH",
        };
        write!(f, "{s}")
    }
}

/// Temperature bands (degrees F) and wind trigger (mph).
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct ExposureConfig {
    pub high_low_temp: f64,
    pub high_high_temp: f64,
    pub moderate_low_temp: f64,
    pub moderate_high_temp: f64,
    /// Daily max wind at or above this adds one step
    pub wind_escalation_mph: f64,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        ExposureConfig {
            high_low_temp: 28.0,
            high_high_temp: 36.0,
            moderate_low_temp: 38.0,
            moderate_high_temp: 48.0,
            wind_escalation_mph: 15.0,
        }
    }
}

/// Exposure from the day's high/low temperature, max wind and site size.
///
/// The temperature band sets the baseline. Strong wind and big water then
/// each add one step, independently, capped at `High`.
pub fn exposure_risk(
    temp_hi: f64,
    temp_lo: f64,
    max_wind_mph: f64,
    big_water: bool,
    config: &ExposureConfig,
) -> ExposureRisk {
    let mut risk = if temp_lo <= config.high_low_temp || temp_hi <= config.high_high_temp {
        ExposureRisk::High
    } else if temp_lo <= config.moderate_low_temp || temp_hi <= config.moderate_high_temp {
        ExposureRisk::Moderate
    } else {
        ExposureRisk::Low
    };
    if max_wind_mph >= config.wind_escalation_mph {
        risk = risk.escalate();
    }
    if big_water {
        risk = risk.escalate();
    }
    risk
}

/// Merge the wind verdict with exposure.
///
/// Wind DO NOT GO stands; HIGH exposure raises anything below it to CAUTION;
/// otherwise the wind verdict passes through.
pub fn combine(wind_tier: AdvisoryTier, exposure: ExposureRisk) -> AdvisoryTier {
    match (wind_tier, exposure) {
        (AdvisoryTier::DoNotGo, _) => AdvisoryTier::DoNotGo,
        (tier, ExposureRisk::High) => tier.max(AdvisoryTier::Caution),
        (tier, _) => tier,
    }
}
