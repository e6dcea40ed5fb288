//! Periodic decay passes.

use crate::cli::WatchArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;
use tenet_engine::{Journal, TenetConfig};
use tenet_janitor::JanitorWorker;
use tenet_store::SqliteStore;
use tokio::runtime::Runtime;

/// Execute the watch command; runs until Ctrl+C.
pub fn execute_watch(args: WatchArgs, root: &Path, formatter: &Formatter) -> Result<String> {
    let journal = Journal::new(root);
    if !journal.is_initialized() {
        return Err(CliError::InvalidInput(format!(
            "no Tenet project at {}; run `tenet init` first",
            root.display()
        )));
    }

    let config = watch_config(TenetConfig::load(&journal.config_path())?, &args)?;
    let store = SqliteStore::new(journal.db_path()).map_err(|e| CliError::Store(e.to_string()))?;
    let mut worker = JanitorWorker::from_config(&config)?;

    eprintln!(
        "{}",
        formatter.info(&format!(
            "Watching {} every {} minutes (Ctrl+C to stop)",
            journal.dir().display(),
            config.janitor.sweep_interval_minutes
        ))
    );

    let runtime = Runtime::new()?;
    runtime.block_on(worker.run(store))?;

    Ok(worker.metrics().summary())
}

fn watch_config(mut config: TenetConfig, args: &WatchArgs) -> Result<TenetConfig> {
    if let Some(minutes) = args.interval {
        if minutes == 0 {
            return Err(CliError::InvalidInput("--interval must be at least 1".to_string()));
        }
        config.janitor.sweep_interval_minutes = minutes;
    }
    if args.dry_run {
        config.janitor.dry_run = true;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let args = WatchArgs {
            interval: Some(5),
            dry_run: true,
        };
        let config = watch_config(TenetConfig::default(), &args).unwrap();
        assert_eq!(config.janitor.sweep_interval_minutes, 5);
        assert!(config.janitor.dry_run);

        let args = WatchArgs {
            interval: None,
            dry_run: false,
        };
        let config = watch_config(TenetConfig::default(), &args).unwrap();
        assert_eq!(config.janitor.sweep_interval_minutes, 60);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let args = WatchArgs {
            interval: Some(0),
            dry_run: false,
        };
        assert!(matches!(
            watch_config(TenetConfig::default(), &args),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_requires_initialized_project() {
        let dir = tempfile::tempdir().unwrap();
        let args = WatchArgs {
            interval: None,
            dry_run: false,
        };
        let formatter = Formatter::new(crate::cli::CliFormat::Text, false);
        assert!(execute_watch(args, dir.path(), &formatter).is_err());
    }
}
