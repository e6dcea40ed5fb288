//! Operation preconditions
//!
//! Each check returns a [`PreconditionError`] naming the operation, the
//! condition that failed and a suggested remedy.

use crate::{EngineError, PreconditionError};
use std::fmt::Display;
use tenet_domain::traits::{ArtifactQuery, ArtifactStore};
use tenet_domain::{Artifact, ArtifactId, ArtifactKind, AssuranceLevel, Tier, Verdict};

/// Reject blank required text
pub fn non_empty(operation: &str, field: &str, value: &str) -> Result<(), PreconditionError> {
    if value.trim().is_empty() {
        return Err(PreconditionError::new(
            operation,
            format!("{} is required", field),
            format!("Provide a non-empty {}", field),
        ));
    }
    Ok(())
}

/// Parse a verdict (`PASS`, `FAIL`, `REFINE`, any case)
pub fn verdict(operation: &str, value: &str) -> Result<Verdict, PreconditionError> {
    Verdict::parse(value).ok_or_else(|| {
        PreconditionError::new(
            operation,
            format!("invalid verdict '{}'", value),
            "Use PASS, FAIL or REFINE",
        )
    })
}

/// Parse an assurance level (`L0`, `L1`, `L2`)
pub fn assurance(operation: &str, value: &str) -> Result<AssuranceLevel, PreconditionError> {
    AssuranceLevel::parse(value).ok_or_else(|| {
        PreconditionError::new(
            operation,
            format!("invalid assurance level '{}'", value),
            "Use L0, L1 or L2",
        )
    })
}

/// Parse a hypothesis kind; only `system` and `episteme` are accepted
pub fn hypothesis_kind(operation: &str, value: &str) -> Result<ArtifactKind, PreconditionError> {
    let kind = ArtifactKind::parse(value);
    if !kind.is_hypothesis() {
        return Err(PreconditionError::new(
            operation,
            format!("invalid kind '{}'", value),
            "Use 'system' for code/architecture or 'episteme' for knowledge claims",
        ));
    }
    Ok(kind)
}

/// Load an artifact that must exist
pub fn artifact<S: ArtifactStore>(
    store: &S,
    operation: &str,
    id: &str,
) -> Result<Artifact, EngineError>
where
    S::Error: Display,
{
    non_empty(operation, "artifact ID", id)?;

    let found = store
        .get_artifact(&ArtifactId::new(id))
        .map_err(|e| EngineError::Store(e.to_string()))?;

    found.ok_or_else(|| {
        PreconditionError::new(
            operation,
            format!("artifact '{}' not found", id),
            "Check the artifact ID or propose it first",
        )
        .into()
    })
}

/// Require the artifact to sit in one of `allowed`
pub fn tier_in(
    operation: &str,
    artifact: &Artifact,
    allowed: &[Tier],
    suggestion: &str,
) -> Result<(), PreconditionError> {
    if allowed.contains(&artifact.tier) {
        return Ok(());
    }

    let names: Vec<&str> = allowed.iter().map(Tier::as_str).collect();
    Err(PreconditionError::new(
        operation,
        format!(
            "artifact '{}' is in {}, expected {}",
            artifact.id,
            artifact.tier,
            names.join(" or ")
        ),
        suggestion,
    ))
}

/// Require at least one L2 artifact in the context and return one
pub fn any_validated<S: ArtifactStore>(
    store: &S,
    operation: &str,
    context_id: &str,
) -> Result<Artifact, EngineError>
where
    S::Error: Display,
{
    let query = ArtifactQuery {
        limit: Some(1),
        ..ArtifactQuery::in_tier(context_id, Tier::L2)
    };
    store
        .query_artifacts(&query)
        .map_err(|e| EngineError::Store(e.to_string()))?
        .into_iter()
        .next()
        .ok_or_else(|| {
            PreconditionError::new(
                operation,
                "no L2 hypotheses in this context",
                "Test at least one hypothesis to L2 before deciding",
            )
            .into()
        })
}
