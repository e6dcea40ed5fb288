//! Reliability commands: score, tree and one-off decay.

use crate::cli::{ArtifactArgs, DecayArgs};
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;
use tenet_engine::{Command, Engine};
use tenet_janitor::Janitor;

/// Execute the reliability command.
pub fn execute_reliability(args: ArtifactArgs, root: &Path, formatter: &Formatter) -> Result<String> {
    let mut engine = Engine::open(root)?;
    let report = engine.execute(Command::CalculateReliability { artifact_id: args.id })?;
    formatter.format_report("reliability", &report)
}

/// Execute the tree command.
pub fn execute_tree(args: ArtifactArgs, root: &Path, formatter: &Formatter) -> Result<String> {
    let mut engine = Engine::open(root)?;
    let tree = engine.execute(Command::AuditTree { artifact_id: args.id })?;
    formatter.format_report("tree", &tree)
}

/// Execute the decay command.
///
/// A dry run goes through the janitor so nothing is written, not even the
/// audit entry.
pub fn execute_decay(args: DecayArgs, root: &Path, formatter: &Formatter) -> Result<String> {
    let mut engine = Engine::open(root)?;

    if args.dry_run {
        let mut config = engine.config().clone();
        config.janitor.dry_run = true;
        let metrics = Janitor::from_config(&config).sweep(engine.store_mut())?;
        let summary = format!(
            "Dry run: {} artifacts scored, {} skipped, {} below threshold. Scores not saved.",
            metrics.artifacts_scored, metrics.artifacts_skipped, metrics.below_threshold
        );
        return formatter.format_report("decay", &formatter.info(&summary));
    }

    let report = engine.execute(Command::Decay)?;
    formatter.format_report("decay", &report)
}
