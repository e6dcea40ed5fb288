//! Project lifecycle commands: init, status, actualize and waive.

use crate::cli::WaiveArgs;
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;
use tenet_engine::{Command, Engine};

/// Execute the init command.
pub fn execute_init(root: &Path, formatter: &Formatter) -> Result<String> {
    let mut engine = Engine::open(root)?;
    let report = engine.execute(Command::Init)?;
    formatter.format_report("init", &formatter.success(&report))
}

/// Execute the status command.
pub fn execute_status(root: &Path, formatter: &Formatter) -> Result<String> {
    let mut engine = Engine::open(root)?;
    let report = engine.execute(Command::Status)?;

    if !engine.journal().is_initialized() {
        let hint = formatter.warning("Project not initialized; run `tenet init`");
        return formatter.format_report("status", &format!("{}\n{}", report.trim_end(), hint));
    }
    formatter.format_report("status", &report)
}

/// Execute the actualize command.
pub fn execute_actualize(root: &Path, formatter: &Formatter) -> Result<String> {
    let mut engine = Engine::open(root)?;
    let report = engine.execute(Command::Actualize)?;
    formatter.format_report("actualize", &report)
}

/// Execute the waive command.
pub fn execute_waive(args: WaiveArgs, root: &Path, formatter: &Formatter) -> Result<String> {
    let mut engine = Engine::open(root)?;
    let report = engine.execute(Command::Waive {
        evidence_id: args.evidence_id,
        waived_by: args.by,
        until: args.until,
        rationale: args.rationale,
    })?;
    formatter.format_report("waive", &formatter.success(&report))
}
