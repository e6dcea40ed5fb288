//! Tier module - trust stages for artifacts

use std::fmt;

/// Trust tier of an artifact
///
/// Artifacts move forward one step at a time as evidence accumulates, or
/// sideways into `Invalid` when evidence refutes them:
/// - L0: proposed, unverified
/// - L1: verified (passed deduction)
/// - L2: validated (passed induction)
/// - Invalid: rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// Proposed, not yet verified
    L0,

    /// Verified by logical checks
    L1,

    /// Validated by tests or empirical evidence
    L2,

    /// Refuted or superseded
    Invalid,
}

impl Tier {
    /// All tiers, in directory/reporting order
    pub const ALL: [Tier; 4] = [Tier::L0, Tier::L1, Tier::L2, Tier::Invalid];

    /// Get the tier name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::L0 => "L0",
            Tier::L1 => "L1",
            Tier::L2 => "L2",
            Tier::Invalid => "invalid",
        }
    }

    /// Parse a tier from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "l0" => Some(Tier::L0),
            "l1" => Some(Tier::L1),
            "l2" => Some(Tier::L2),
            "invalid" => Some(Tier::Invalid),
            _ => None,
        }
    }

    /// Get the next tier in the hierarchy (for promotion)
    pub fn next(&self) -> Option<Self> {
        match self {
            Tier::L0 => Some(Tier::L1),
            Tier::L1 => Some(Tier::L2),
            Tier::L2 => None,
            Tier::Invalid => None,
        }
    }

    /// Whether moving from this tier to `target` respects the tier invariant
    ///
    /// Legal moves are a single forward step, or any live tier into `Invalid`.
    pub fn can_transition_to(&self, target: Tier) -> bool {
        match target {
            Tier::Invalid => *self != Tier::Invalid,
            _ => self.next() == Some(target),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid tier: {}", s))
    }
}
