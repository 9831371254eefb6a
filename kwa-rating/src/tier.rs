use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Advisory for a day or an hour on the water.
///
/// Variant order is the ranking: `Go < Caution < DoNotGo`. Both threshold
/// escalation and worst-hour selection rely on it.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum AdvisoryTier {
    Go,
    Caution,
    DoNotGo,
}

impl AdvisoryTier {
    /// One step more severe, saturating at `DoNotGo`.
    pub fn escalate(self) -> Self {
        match self {
            AdvisoryTier::Go => AdvisoryTier::Caution,
            AdvisoryTier::Caution | AdvisoryTier::DoNotGo => AdvisoryTier::DoNotGo,
        }
    }

    /// Ordinal used for ranking, 0 for GO through 2 for DO NOT GO.
    pub fn rank(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for AdvisoryTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AdvisoryTier::Go => "GO",
            AdvisoryTier::Caution => "CAUTION",
            AdvisoryTier::DoNotGo => "DO NOT GO",
        };
        write!(f, "{s}")
    }
}

impl FromStr for AdvisoryTier {
    type Err = String;

    /// Accepts the display names plus the "NO GO" spelling used by some
    /// older builds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "GO" => Ok(AdvisoryTier::Go),
            "CAUTION" => Ok(AdvisoryTier::Caution),
            "DO NOT GO" | "NO GO" => Ok(AdvisoryTier::DoNotGo),
            _ => Err(format!("unknown advisory tier: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AdvisoryTier;

    #[test]
    fn test_ordering() {
        assert!(AdvisoryTier::Go < AdvisoryTier::Caution);
        assert!(AdvisoryTier::Caution < AdvisoryTier::DoNotGo);
        assert_eq!(AdvisoryTier::DoNotGo.rank(), 2);
    }

    #[test]
    fn test_escalate_saturates() {
        assert_eq!(AdvisoryTier::Go.escalate(), AdvisoryTier::Caution);
        assert_eq!(AdvisoryTier::Caution.escalate(), AdvisoryTier::DoNotGo);
        assert_eq!(AdvisoryTier::DoNotGo.escalate(), AdvisoryTier::DoNotGo);
    }

    #[test]
    fn test_names() {
        assert_eq!(AdvisoryTier::DoNotGo.to_string(), "DO NOT GO");
        assert_eq!("no go".parse::<AdvisoryTier>(), Ok(AdvisoryTier::DoNotGo));
        assert_eq!("DO_NOT_GO".parse::<AdvisoryTier>(), Ok(AdvisoryTier::DoNotGo));
        assert_eq!("caution".parse::<AdvisoryTier>(), Ok(AdvisoryTier::Caution));
        assert!("maybe".parse::<AdvisoryTier>().is_err());
    }
}
