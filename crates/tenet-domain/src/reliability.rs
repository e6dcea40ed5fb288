//! Reliability arithmetic
//!
//! Pure scoring functions used by the reliability calculator. Graph
//! traversal, evidence filtering and persistence live in the engine; this
//! module only turns verdicts and component scores into numbers.
//!
//! The score of an artifact is built in two steps:
//! 1. **Local score**: assurance-weighted mean of its live evidence verdicts
//! 2. **Propagation**: each `componentOf` child contributes
//!    `w·r_child + (1−w)·local` with `w = CL/3`, and the mean contribution
//!    is blended with the local score, local dominating

use crate::{AssuranceLevel, CongruenceLevel, Verdict};

/// Score of a passing verdict
pub const PASS_SCORE: f64 = 1.0;

/// Score of a refine verdict
pub const REFINE_SCORE: f64 = 0.5;

/// Score of a failing verdict
pub const FAIL_SCORE: f64 = 0.0;

/// Score of an artifact without live evidence
pub const NO_EVIDENCE_SCORE: f64 = 0.0;

/// Share of the final score owned by local evidence when components exist
pub const LOCAL_WEIGHT: f64 = 0.7;

/// Deepest component chain followed; edges below it are cut
pub const MAX_DEPTH: usize = 64;

/// Scoring constants
#[derive(Debug, Clone, PartialEq)]
pub struct ReliabilityParams {
    /// Score of a `pass` verdict
    pub pass_score: f64,
    /// Score of a `refine` verdict
    pub refine_score: f64,
    /// Score of a `fail` verdict
    pub fail_score: f64,
    /// Score when no live evidence remains
    pub no_evidence_score: f64,
    /// Weight of L0 evidence
    pub weight_l0: f64,
    /// Weight of L1 evidence
    pub weight_l1: f64,
    /// Weight of L2 evidence
    pub weight_l2: f64,
    /// Share of local evidence in a composite score [0.0, 1.0]
    pub local_weight: f64,
    /// Traversal depth bound
    pub max_depth: usize,
}

impl Default for ReliabilityParams {
    fn default() -> Self {
        Self {
            pass_score: PASS_SCORE,
            refine_score: REFINE_SCORE,
            fail_score: FAIL_SCORE,
            no_evidence_score: NO_EVIDENCE_SCORE,
            weight_l0: 1.0,
            weight_l1: 1.5,
            weight_l2: 2.0,
            local_weight: LOCAL_WEIGHT,
            max_depth: MAX_DEPTH,
        }
    }
}

impl ReliabilityParams {
    /// Score assigned to a verdict
    pub fn verdict_score(&self, verdict: Verdict) -> f64 {
        match verdict {
            Verdict::Pass => self.pass_score,
            Verdict::Refine => self.refine_score,
            Verdict::Fail => self.fail_score,
        }
    }

    /// Weight assigned to an assurance level
    pub fn assurance_weight(&self, level: AssuranceLevel) -> f64 {
        match level {
            AssuranceLevel::L0 => self.weight_l0,
            AssuranceLevel::L1 => self.weight_l1,
            AssuranceLevel::L2 => self.weight_l2,
        }
    }
}

/// Assurance-weighted mean of verdict scores
///
/// Returns `None` when there is nothing to score, so callers can report
/// the absence of evidence separately from a genuinely low score.
pub fn local_score(evidence: &[(Verdict, AssuranceLevel)], params: &ReliabilityParams) -> Option<f64> {
    let mut weighted = 0.0;
    let mut total_weight = 0.0;

    for (verdict, level) in evidence {
        let w = params.assurance_weight(*level);
        weighted += params.verdict_score(*verdict) * w;
        total_weight += w;
    }

    if total_weight <= 0.0 {
        return None;
    }

    Some((weighted / total_weight).clamp(0.0, 1.0))
}

/// Contribution of one component to its composite
///
/// At CL 3 the component's score passes through unchanged; at CL 0 the
/// contribution equals the composite's local score (neutral).
pub fn component_contribution(component_score: f64, local: f64, congruence: CongruenceLevel) -> f64 {
    let w = congruence.weight();
    (w * component_score + (1.0 - w) * local).clamp(0.0, 1.0)
}

/// Blend a local score with its component contributions
pub fn blend(local: f64, contributions: &[f64], params: &ReliabilityParams) -> f64 {
    if contributions.is_empty() {
        return local.clamp(0.0, 1.0);
    }

    let propagated = contributions.iter().sum::<f64>() / contributions.len() as f64;
    let lw = params.local_weight.clamp(0.0, 1.0);
    (lw * local + (1.0 - lw) * propagated).clamp(0.0, 1.0)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn verdict() -> impl Strategy<Value = Verdict> {
        prop_oneof![Just(Verdict::Pass), Just(Verdict::Fail), Just(Verdict::Refine)]
    }

    fn level() -> impl Strategy<Value = AssuranceLevel> {
        prop_oneof![
            Just(AssuranceLevel::L0),
            Just(AssuranceLevel::L1),
            Just(AssuranceLevel::L2)
        ]
    }

    proptest! {
        /// Property: local scores stay in [0, 1]
        #[test]
        fn test_local_score_range(evidence in prop::collection::vec((verdict(), level()), 1..16)) {
            let score = local_score(&evidence, &ReliabilityParams::default()).unwrap();
            prop_assert!((0.0..=1.0).contains(&score));
        }

        /// Property: blending never leaves [0, 1]
        #[test]
        fn test_blend_range(
            local in 0.0f64..=1.0,
            children in prop::collection::vec((0.0f64..=1.0, 0u8..=3), 0..8),
        ) {
            let contributions: Vec<f64> = children
                .iter()
                .map(|(r, c)| component_contribution(*r, local, CongruenceLevel::new(*c).unwrap()))
                .collect();
            let score = blend(local, &contributions, &ReliabilityParams::default());
            prop_assert!((0.0..=1.0).contains(&score));
        }

        /// Property: adding a passing verdict never lowers the local score
        #[test]
        fn test_pass_is_monotone(
            evidence in prop::collection::vec((verdict(), level()), 1..8),
            extra in level(),
        ) {
            let p = ReliabilityParams::default();
            let before = local_score(&evidence, &p).unwrap();
            let mut more = evidence.clone();
            more.push((Verdict::Pass, extra));
            let after = local_score(&more, &p).unwrap();
            prop_assert!(after + 1e-12 >= before);
        }
    }
}
