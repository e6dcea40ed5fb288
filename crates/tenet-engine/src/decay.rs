//! Decay pass: rescore every known artifact

use crate::reliability::ReliabilityCalculator;
use crate::EngineError;
use chrono::{DateTime, Utc};
use std::fmt::Display;
use tenet_domain::reliability::ReliabilityParams;
use tenet_domain::traits::ArtifactStore;
use tenet_domain::ArtifactId;

/// Outcome of one decay pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecayReport {
    /// Artifacts scored, with their new score
    pub scored: Vec<(ArtifactId, f64)>,
    /// Artifacts that could not be scored, with the reason
    pub skipped: Vec<(ArtifactId, String)>,
    /// How many scored artifacts fell below the assurance threshold
    pub below_threshold: usize,
    /// Whether scores were written back
    pub persisted: bool,
}

impl DecayReport {
    /// One-line summary
    pub fn summary(&self) -> String {
        let mut s = format!(
            "Decay update complete. Processed {} artifacts ({} skipped, {} below threshold).",
            self.scored.len(),
            self.skipped.len(),
            self.below_threshold
        );
        if !self.persisted {
            s.push_str(" Dry run: scores not saved.");
        }
        s
    }
}

/// Recompute and cache the reliability of every artifact
///
/// Artifacts whose computation fails (the artifact vanished, a store read
/// failed) are skipped and logged; the pass continues. Missing components
/// and cycles do not fail a computation. Store write failures abort.
pub fn run_decay<S: ArtifactStore>(
    store: &mut S,
    params: &ReliabilityParams,
    threshold: f64,
    now: DateTime<Utc>,
    dry_run: bool,
) -> Result<DecayReport, EngineError>
where
    S::Error: Display,
{
    let ids = store
        .list_artifact_ids()
        .map_err(|e| EngineError::Store(e.to_string()))?;

    let mut report = DecayReport {
        persisted: !dry_run,
        ..DecayReport::default()
    };

    {
        let mut calc = ReliabilityCalculator::new(&*store, params.clone(), threshold, now);
        for id in ids {
            match calc.calculate(&id) {
                Ok(r) => {
                    if r.score < threshold {
                        report.below_threshold += 1;
                    }
                    report.scored.push((id, r.score));
                }
                Err(e) => {
                    tracing::warn!(artifact = %id, error = %e, "skipping artifact in decay pass");
                    report.skipped.push((id, e.to_string()));
                }
            }
        }
    }

    if !dry_run {
        for (id, score) in &report.scored {
            store
                .set_cached_reliability(id, *score)
                .map_err(|e| EngineError::Store(e.to_string()))?;
        }
    }

    tracing::info!(
        scored = report.scored.len(),
        skipped = report.skipped.len(),
        below_threshold = report.below_threshold,
        dry_run,
        "decay pass complete"
    );

    Ok(report)
}
