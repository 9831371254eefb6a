//! Wind and exposure risk rating for kayak days.
//!
//! Everything in this crate is pure: hourly samples in, an advisory out.
//! Acquiring the samples (geocoding, forecast requests) lives in
//! `kwa-forecast`.

pub mod classifier;
pub mod exposure;
pub mod observation;
pub mod report;
pub mod thresholds;
pub mod tier;
pub mod worst_hour;
pub mod worst_window;

pub use classifier::{classify, wind_score, Rating};
pub use exposure::{combine, exposure_risk, ExposureConfig, ExposureRisk};
pub use observation::HourlyObservation;
pub use report::{
    advisory_notes, hourly_table, rate_day, DailyConditions, DayReport, ExposureOverlay, HourRow,
};
pub use thresholds::{
    CautionBoundary, Composition, ModifierBonuses, Modifiers, RatingConfig, ThresholdProfile,
};
pub use tier::AdvisoryTier;
pub use worst_hour::{select_worst_hour, DaySelection};
pub use worst_window::{select_worst_window, WorstWindow, DEFAULT_WINDOW_HOURS};
