use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::classifier::wind_score;
use crate::observation::HourlyObservation;

/// Window length used everywhere so far.
pub const DEFAULT_WINDOW_HOURS: usize = 3;

/// The contiguous run of hours with the highest average wind score.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct WorstWindow {
    /// Index of the first sample of the window
    pub start_index: usize,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Mean of the per-sample wind scores (no modifier bonuses)
    pub avg_score: f64,
    pub sustained_avg: f64,
    pub gust_avg: f64,
}

/// Slide a `window_size` window over the samples in source order.
///
/// A window with any invalid sample is skipped whole; there is no averaging
/// over the valid members only. Equal averages keep the earliest window.
/// `None` if no window qualifies.
pub fn select_worst_window(
    observations: &[HourlyObservation],
    window_size: usize,
) -> Option<WorstWindow> {
    if window_size == 0 {
        return None;
    }
    let mut worst: Option<WorstWindow> = None;
    for (start_index, window) in observations.windows(window_size).enumerate() {
        if !window.iter().all(HourlyObservation::is_valid) {
            continue;
        }
        let n = window_size as f64;
        let avg_score = window
            .iter()
            .map(|o| wind_score(o.sustained_mph, o.gust_mph) as f64)
            .sum::<f64>()
            / n;
        if worst.as_ref().is_some_and(|w| avg_score <= w.avg_score) {
            continue;
        }
        let (first, last) = (&window[0], &window[window_size - 1]);
        worst = Some(WorstWindow {
            start_index,
            start: first.time,
            end: last.time,
            avg_score,
            sustained_avg: window.iter().map(|o| o.sustained_mph).sum::<f64>() / n,
            gust_avg: window.iter().map(|o| o.gust_mph).sum::<f64>() / n,
        });
    }
    worst
}
