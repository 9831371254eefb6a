use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::classifier::classify;
use crate::observation::HourlyObservation;
use crate::thresholds::{Modifiers, RatingConfig};
use crate::tier::AdvisoryTier;

/// The hour that decides the day's advisory.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct DaySelection {
    /// Index into the observations passed to `select_worst_hour`
    pub index: usize,
    pub time: NaiveDateTime,
    pub tier: AdvisoryTier,
    pub score: i64,
    pub reason: String,
}

/// Single pass argmax over `(tier, score)`.
///
/// Invalid samples are skipped. Ties keep the earliest hour. Returns `None`
/// when no valid sample exists, which callers must report as "no data"
/// rather than as GO.
pub fn select_worst_hour(
    observations: &[HourlyObservation],
    modifiers: &Modifiers,
    config: &RatingConfig,
) -> Option<DaySelection> {
    let mut worst: Option<DaySelection> = None;
    for (index, obs) in observations.iter().enumerate() {
        if !obs.is_valid() {
            continue;
        }
        let rating = classify(obs.sustained_mph, obs.gust_mph, modifiers, config);
        let replaces = match &worst {
            None => true,
            Some(current) => (rating.tier, rating.score) > (current.tier, current.score),
        };
        if replaces {
            worst = Some(DaySelection {
                index,
                time: obs.time,
                tier: rating.tier,
                score: rating.score,
                reason: rating.reason,
            });
        }
    }
    worst
}
