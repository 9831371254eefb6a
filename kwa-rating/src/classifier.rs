use serde::{Deserialize, Serialize};

use crate::thresholds::{CautionBoundary, Composition, Modifiers, RatingConfig, ThresholdProfile};
use crate::tier::AdvisoryTier;

/// Outcome of classifying one wind sample.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub tier: AdvisoryTier,
    /// Wind score plus modifier bonuses. Only used to break ties.
    pub score: i64,
    pub reason: String,
}

/// Gust minus sustained, floored at zero.
pub fn gustiness(sustained: f64, gust: f64) -> f64 {
    (gust - sustained).max(0.0)
}

/// `round(4 * sustained + 2 * gustiness)`, ties to even, so 8.5 scores 8.
/// Modifier bonuses are not included.
pub fn wind_score(sustained: f64, gust: f64) -> i64 {
    (4.0 * sustained + 2.0 * gustiness(sustained, gust)).round_ties_even() as i64
}

/// Tier from a single profile, before any modifier escalation.
///
/// DO NOT GO wins if either sustained or gust reaches its limit; CAUTION if
/// either crosses its GO limit.
pub fn base_tier(
    sustained: f64,
    gust: f64,
    profile: &ThresholdProfile,
    boundary: CautionBoundary,
) -> AdvisoryTier {
    if sustained >= profile.nogo_sustained || gust >= profile.nogo_gust {
        return AdvisoryTier::DoNotGo;
    }
    let caution = match boundary {
        CautionBoundary::Exclusive => sustained > profile.go_sustained || gust > profile.go_gust,
        CautionBoundary::Inclusive => sustained >= profile.go_sustained || gust >= profile.go_gust,
    };
    if caution {
        AdvisoryTier::Caution
    } else {
        AdvisoryTier::Go
    }
}

/// "Sustained 12 mph, gusts 18 mph." plus a clause for active modifiers.
pub fn reason(sustained: f64, gust: f64, modifiers: &Modifiers) -> String {
    let mut reason = format!(
        "Sustained {} mph, gusts {} mph.",
        sustained.round_ties_even() as i64,
        gust.round_ties_even() as i64
    );
    let labels = modifiers.active_labels();
    if !labels.is_empty() {
        reason.push_str(" Risk higher due to ");
        reason.push_str(&labels.join(", "));
        reason.push('.');
    }
    reason
}

/// Classify one sample. `sustained` and `gust` are mph and must be finite;
/// filtering NaN samples is the caller's job.
pub fn classify(
    sustained: f64,
    gust: f64,
    modifiers: &Modifiers,
    config: &RatingConfig,
) -> Rating {
    let profile = config.profile_for(modifiers);
    let mut tier = base_tier(sustained, gust, profile, config.caution_boundary);
    if config.composition == Composition::Bump && modifiers.any() {
        tier = tier.escalate();
    }
    Rating {
        tier,
        score: wind_score(sustained, gust) + modifiers.bonus(&config.bonuses),
        reason: reason(sustained, gust, modifiers),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thresholds::{Modifiers, RatingConfig};
    use crate::tier::AdvisoryTier::{Caution, DoNotGo, Go};

    const NONE: Modifiers = Modifiers {
        offshore: false,
        big_water: false,
    };
    const OFFSHORE: Modifiers = Modifiers {
        offshore: true,
        big_water: false,
    };
    const BOTH: Modifiers = Modifiers {
        offshore: true,
        big_water: true,
    };

    fn tier(s: f64, g: f64, m: &Modifiers, c: &RatingConfig) -> AdvisoryTier {
        classify(s, g, m, c).tier
    }

    #[test]
    fn test_boundaries_small_water() {
        let c = RatingConfig::small_water();
        assert_eq!(tier(10.0, 0.0, &NONE, &c), Go);
        assert_eq!(tier(10.1, 0.0, &NONE, &c), Caution);
        assert_eq!(tier(15.9, 0.0, &NONE, &c), Caution);
        assert_eq!(tier(16.0, 0.0, &NONE, &c), DoNotGo);
        assert_eq!(tier(0.0, 15.0, &NONE, &c), Go);
        assert_eq!(tier(0.0, 15.5, &NONE, &c), Caution);
        assert_eq!(tier(0.0, 23.0, &NONE, &c), DoNotGo);
    }

    #[test]
    fn test_inclusive_boundary() {
        let c = RatingConfig {
            caution_boundary: CautionBoundary::Inclusive,
            ..RatingConfig::small_water()
        };
        assert_eq!(tier(10.0, 0.0, &NONE, &c), Caution);
        assert_eq!(tier(9.9, 14.9, &NONE, &c), Go);
    }

    #[test]
    fn test_legacy_matches_canonical_on_whole_mph() {
        let legacy = RatingConfig::legacy_inclusive();
        let canonical = RatingConfig::small_water();
        for s in 0..30 {
            for g in 0..40 {
                let (s, g) = (f64::from(s), f64::from(g));
                assert_eq!(
                    tier(s, g, &NONE, &legacy),
                    tier(s, g, &NONE, &canonical),
                    "sustained {s} gust {g}"
                );
            }
        }
    }

    #[test]
    fn test_monotonic_in_each_input() {
        let configs = [
            RatingConfig::small_water(),
            RatingConfig::big_water_profile(),
            RatingConfig::legacy_inclusive(),
        ];
        for c in &configs {
            for m in [NONE, OFFSHORE, BOTH] {
                for fixed in [0.0, 7.5, 12.0, 20.0] {
                    let mut previous_s = Go;
                    let mut previous_g = Go;
                    for step in 0..120 {
                        let x = f64::from(step) * 0.25;
                        let by_s = tier(x, fixed, &m, c);
                        let by_g = tier(fixed, x, &m, c);
                        assert!(by_s >= previous_s);
                        assert!(by_g >= previous_g);
                        previous_s = by_s;
                        previous_g = by_g;
                    }
                }
            }
        }
    }

    #[test]
    fn test_bump_escalates_once() {
        let c = RatingConfig::small_water();
        assert_eq!(tier(5.0, 8.0, &OFFSHORE, &c), Caution);
        assert_eq!(tier(5.0, 8.0, &BOTH, &c), Caution);
        assert_eq!(tier(12.0, 14.0, &BOTH, &c), DoNotGo);
        assert_eq!(tier(20.0, 30.0, &BOTH, &c), DoNotGo);
    }

    #[test]
    fn test_profile_composition_switches_thresholds() {
        let c = RatingConfig::big_water_profile();
        // 9 mph is GO on small water, CAUTION on big water, no extra bump
        assert_eq!(tier(9.0, 9.0, &NONE, &c), Go);
        assert_eq!(tier(9.0, 9.0, &OFFSHORE, &c), Caution);
        assert_eq!(tier(9.0, 9.0, &BOTH, &c), Caution);
        assert_eq!(tier(13.0, 13.0, &BOTH, &c), DoNotGo);
        assert_eq!(tier(5.0, 8.0, &BOTH, &c), Go);
    }

    #[test]
    fn test_score() {
        let c = RatingConfig::small_water();
        assert_eq!(classify(12.0, 18.0, &NONE, &c).score, 60);
        assert_eq!(classify(12.0, 18.0, &OFFSHORE, &c).score, 70);
        assert_eq!(classify(12.0, 18.0, &BOTH, &c).score, 78);
        // gust below sustained contributes nothing
        assert_eq!(wind_score(10.0, 6.0), 40);
        // 8.5 and 10.5 round to even
        assert_eq!(wind_score(2.125, 2.125), 8);
        assert_eq!(wind_score(2.625, 2.625), 10);
        assert_eq!(wind_score(2.875, 2.875), 12);
    }

    #[test]
    fn test_reason() {
        let c = RatingConfig::small_water();
        assert_eq!(
            classify(11.6, 17.2, &NONE, &c).reason,
            "Sustained 12 mph, gusts 17 mph."
        );
        assert_eq!(
            classify(8.0, 12.0, &BOTH, &c).reason,
            "Sustained 8 mph, gusts 12 mph. Risk higher due to offshore wind, big water."
        );
    }

    #[test]
    fn test_reason_rounds_half_to_even() {
        let c = RatingConfig::small_water();
        assert_eq!(
            classify(12.5, 18.5, &NONE, &c).reason,
            "Sustained 12 mph, gusts 18 mph."
        );
        assert_eq!(
            classify(13.5, 19.5, &NONE, &c).reason,
            "Sustained 14 mph, gusts 20 mph."
        );
    }
}
