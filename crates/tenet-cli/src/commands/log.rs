//! Audit log listing.

use crate::cli::LogArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;
use tenet_domain::traits::ArtifactStore;
use tenet_engine::Engine;

/// Execute the log command.
pub fn execute_log(args: LogArgs, root: &Path, formatter: &Formatter) -> Result<String> {
    if args.limit == 0 {
        return Err(CliError::InvalidInput("--limit must be at least 1".to_string()));
    }

    let engine = Engine::open(root)?;
    let entries = engine
        .store()
        .list_audit_log(engine.context_id(), args.limit)
        .map_err(|e| CliError::Store(e.to_string()))?;

    formatter.format_audit_log(&entries)
}
