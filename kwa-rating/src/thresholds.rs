use serde::{Deserialize, Serialize};

/// Wind thresholds in mph for one kind of water.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct ThresholdProfile {
    /// Sustained wind above this leaves GO
    pub go_sustained: f64,
    /// Gusts above this leave GO
    pub go_gust: f64,
    /// Sustained wind at or above this is DO NOT GO
    pub nogo_sustained: f64,
    /// Gusts at or above this are DO NOT GO
    pub nogo_gust: f64,
}

impl ThresholdProfile {
    /// Small lakes, rivers, sheltered bays.
    pub const SMALL_WATER: ThresholdProfile = ThresholdProfile {
        go_sustained: 10.0,
        go_gust: 15.0,
        nogo_sustained: 16.0,
        nogo_gust: 23.0,
    };

    /// Large lakes and long open-water fetch.
    pub const BIG_WATER: ThresholdProfile = ThresholdProfile {
        go_sustained: 8.0,
        go_gust: 12.0,
        nogo_sustained: 13.0,
        nogo_gust: 19.0,
    };
}

impl Default for ThresholdProfile {
    fn default() -> Self {
        ThresholdProfile::SMALL_WATER
    }
}

/// Comparison used for the GO -> CAUTION boundary.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum CautionBoundary {
    /// `sustained > go_sustained || gust > go_gust`
    #[default]
    Exclusive,
    /// `sustained >= go_sustained || gust >= go_gust`
    Inclusive,
}

/// How the boolean site modifiers affect the tier.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Composition {
    /// Classify with the base profile, then escalate one step if any
    /// modifier is active. Two active modifiers still escalate only once.
    #[default]
    Bump,
    /// Any active modifier swaps in the strict profile wholesale. No bump.
    Profile,
}

/// Score added per active modifier.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct ModifierBonuses {
    pub offshore: i64,
    pub big_water: i64,
}

impl Default for ModifierBonuses {
    fn default() -> Self {
        ModifierBonuses {
            offshore: 10,
            big_water: 8,
        }
    }
}

/// Site risk amplifiers chosen by the paddler.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    /// Wind blowing away from shore
    pub offshore: bool,
    /// Large lake or long fetch
    pub big_water: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.offshore || self.big_water
    }

    /// Human readable names of the active modifiers, always in the same order.
    pub fn active_labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.offshore {
            labels.push("offshore wind");
        }
        if self.big_water {
            labels.push("big water");
        }
        labels
    }

    pub fn bonus(&self, bonuses: &ModifierBonuses) -> i64 {
        let mut bonus = 0;
        if self.offshore {
            bonus += bonuses.offshore;
        }
        if self.big_water {
            bonus += bonuses.big_water;
        }
        bonus
    }
}

/// Everything the classifier needs besides the wind itself.
///
/// Each historical rule set is one value of this struct rather than a
/// separate function; see the preset constructors.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct RatingConfig {
    /// Profile used when no modifier is active (and always, under `Bump`)
    pub base: ThresholdProfile,
    /// Profile swapped in under `Composition::Profile`
    pub strict: ThresholdProfile,
    pub caution_boundary: CautionBoundary,
    pub composition: Composition,
    pub bonuses: ModifierBonuses,
}

impl Default for RatingConfig {
    fn default() -> Self {
        RatingConfig::small_water()
    }
}

impl RatingConfig {
    /// Canonical rules: small-water thresholds, `>` caution boundary,
    /// one-step bump for modifiers.
    pub fn small_water() -> Self {
        RatingConfig {
            base: ThresholdProfile::SMALL_WATER,
            strict: ThresholdProfile::BIG_WATER,
            caution_boundary: CautionBoundary::Exclusive,
            composition: Composition::Bump,
            bonuses: ModifierBonuses::default(),
        }
    }

    /// Modifiers select the big-water profile instead of bumping.
    pub fn big_water_profile() -> Self {
        RatingConfig {
            composition: Composition::Profile,
            ..RatingConfig::small_water()
        }
    }

    /// The hard-coded builds that escalated at "11 sustained or 16 gust"
    /// with `>=`. Classifies identically to `small_water` on whole-mph input.
    pub fn legacy_inclusive() -> Self {
        RatingConfig {
            base: ThresholdProfile {
                go_sustained: 11.0,
                go_gust: 16.0,
                ..ThresholdProfile::SMALL_WATER
            },
            caution_boundary: CautionBoundary::Inclusive,
            ..RatingConfig::small_water()
        }
    }

    /// Profile in force for the given modifiers.
    pub fn profile_for(&self, modifiers: &Modifiers) -> &ThresholdProfile {
        match self.composition {
            Composition::Profile if modifiers.any() => &self.strict,
            _ => &self.base,
        }
    }
}
