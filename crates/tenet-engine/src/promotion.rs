//! Evidence-gated promotion
//!
//! Decides what a verdict does to an artifact's tier in the current phase,
//! then applies the tier change and records the evidence (evidence row plus
//! a `verifiedBy` relation) as one logical unit.
//!
//! | Phase | Verdict | Assurance | Tier effect |
//! |---|---|---|---|
//! | DEDUCTION | pass | L1, L2 | L0 → L1 |
//! | DEDUCTION | fail, refine | any | L0 → invalid |
//! | INDUCTION | pass | L2 | L1 → L2 (L2 refreshed) |
//! | INDUCTION | fail, refine | any | L1/L2 → invalid |
//! | any | pass | too low | none, reported |
//! | other phases | any | any | none |

use crate::{EngineError, PreconditionError};
use chrono::{DateTime, Utc};
use std::fmt::Display;
use tenet_domain::traits::ArtifactStore;
use tenet_domain::{
    Artifact, ArtifactId, AssuranceLevel, Evidence, Phase, Relation, Tier, Verdict,
};

/// Evidence submitted against an artifact
#[derive(Debug, Clone)]
pub struct EvidenceInput {
    /// Target artifact
    pub artifact_id: ArtifactId,
    /// Evidence type
    pub evidence_type: String,
    /// Free-text content
    pub content: String,
    /// Verdict
    pub verdict: Verdict,
    /// Assurance level
    pub assurance_level: AssuranceLevel,
    /// Carrier reference
    pub carrier_ref: String,
    /// Validity deadline
    pub valid_until: Option<DateTime<Utc>>,
}

/// What a verdict does to the tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierEffect {
    /// Move to a new tier
    Move(Tier),
    /// Pass at a tier that cannot go higher; evidence refreshes it
    Refresh,
    /// Pass with assurance too low to promote
    InsufficientAssurance,
    /// No rule for this phase; evidence is recorded only
    RecordOnly,
}

/// Result of applying evidence
#[derive(Debug, Clone)]
pub struct PromotionOutcome {
    /// Recorded evidence
    pub evidence: Evidence,
    /// Tier before the action
    pub from: Tier,
    /// What happened to the tier
    pub effect: TierEffect,
}

impl PromotionOutcome {
    /// Tier after the action
    pub fn tier(&self) -> Tier {
        match self.effect {
            TierEffect::Move(to) => to,
            _ => self.from,
        }
    }

    /// Human summary of the outcome
    pub fn message(&self) -> String {
        let id = &self.evidence.artifact_id;
        match self.effect {
            TierEffect::Move(Tier::Invalid) => format!("Artifact {} moved to invalid", id),
            TierEffect::Move(to) => format!("Artifact {} promoted to {}", id, to),
            TierEffect::Refresh => format!("Evidence refreshed for {} (stays {})", id, self.from),
            TierEffect::InsufficientAssurance => format!(
                "Evidence recorded for {}, but assurance level {} is insufficient for promotion",
                id, self.evidence.assurance_level
            ),
            TierEffect::RecordOnly => format!("Evidence recorded for {}", id),
        }
    }
}

/// Decide the tier effect of a verdict
///
/// Returns a precondition error when the artifact is at a tier the phase
/// cannot act on (e.g. testing an artifact that was never verified).
pub fn decide_effect(
    operation: &str,
    phase: Phase,
    artifact: &Artifact,
    verdict: Verdict,
    assurance: AssuranceLevel,
) -> Result<TierEffect, PreconditionError> {
    let id = &artifact.id;
    let tier = artifact.tier;

    match (phase, verdict) {
        (Phase::Deduction, _) if tier != Tier::L0 => Err(PreconditionError::new(
            operation,
            format!("artifact '{}' is in {}, not L0", id, tier),
            "Only L0 hypotheses can be verified; propose a new hypothesis instead",
        )),
        (Phase::Deduction, Verdict::Pass) => match assurance {
            AssuranceLevel::L1 | AssuranceLevel::L2 => Ok(TierEffect::Move(Tier::L1)),
            AssuranceLevel::L0 => Ok(TierEffect::InsufficientAssurance),
        },
        (Phase::Deduction, Verdict::Fail | Verdict::Refine) => Ok(TierEffect::Move(Tier::Invalid)),

        (Phase::Induction, _) if tier == Tier::L0 => Err(PreconditionError::new(
            operation,
            format!("artifact '{}' is still in L0", id),
            "Run verify first to promote it to L1 before testing",
        )),
        (Phase::Induction, _) if tier == Tier::Invalid => Err(PreconditionError::new(
            operation,
            format!("artifact '{}' is invalid", id),
            "Invalid artifacts cannot be tested; use loopback to propose a replacement",
        )),
        (Phase::Induction, Verdict::Pass) => match (assurance, tier) {
            (AssuranceLevel::L2, Tier::L1) => Ok(TierEffect::Move(Tier::L2)),
            (AssuranceLevel::L2, _) => Ok(TierEffect::Refresh),
            _ => Ok(TierEffect::InsufficientAssurance),
        },
        (Phase::Induction, Verdict::Fail | Verdict::Refine) => Ok(TierEffect::Move(Tier::Invalid)),

        _ => Ok(TierEffect::RecordOnly),
    }
}

/// Apply evidence: mutate the tier, then record evidence and its link
///
/// If the tier changed and a later step fails, the error is
/// [`EngineError::Inconsistent`] naming the failed step.
pub fn apply_evidence<S: ArtifactStore>(
    store: &mut S,
    operation: &str,
    phase: Phase,
    input: EvidenceInput,
) -> Result<PromotionOutcome, EngineError>
where
    S::Error: Display,
{
    let artifact = store
        .get_artifact(&input.artifact_id)
        .map_err(|e| EngineError::Store(e.to_string()))?
        .ok_or_else(|| {
            PreconditionError::new(
                operation,
                format!("artifact '{}' not found", input.artifact_id),
                "Check the artifact ID",
            )
        })?;

    let effect = decide_effect(operation, phase, &artifact, input.verdict, input.assurance_level)?;

    let evidence = Evidence::new(
        input.artifact_id.clone(),
        input.evidence_type,
        input.content,
        input.verdict,
        input.assurance_level,
        input.carrier_ref,
    )
    .with_valid_until(input.valid_until);

    let mut completed: Vec<&str> = Vec::new();

    if let TierEffect::Move(to) = effect {
        if !artifact.tier.can_transition_to(to) {
            return Err(PreconditionError::new(
                operation,
                format!("artifact '{}' cannot move from {} to {}", artifact.id, artifact.tier, to),
                "Check the artifact's current tier",
            )
            .into());
        }
        store
            .set_artifact_tier(&artifact.id, to)
            .map_err(|e| EngineError::Store(e.to_string()))?;
        completed.push("tier change");
    }

    store
        .add_evidence(evidence.clone())
        .map_err(|e| step_failed("record evidence", &completed, e))?;
    completed.push("evidence");

    store
        .add_relation(Relation::verified_by(&evidence.id, &artifact.id))
        .map_err(|e| step_failed("link evidence", &completed, e))?;

    tracing::info!(
        artifact = %artifact.id,
        phase = %phase,
        verdict = %evidence.verdict,
        effect = ?effect,
        "evidence applied"
    );

    Ok(PromotionOutcome {
        evidence,
        from: artifact.tier,
        effect,
    })
}

fn step_failed(step: &str, completed: &[&str], err: impl Display) -> EngineError {
    if completed.is_empty() {
        EngineError::Store(err.to_string())
    } else {
        EngineError::Inconsistent {
            step: step.to_string(),
            completed: completed.join(", "),
            message: err.to_string(),
        }
    }
}
