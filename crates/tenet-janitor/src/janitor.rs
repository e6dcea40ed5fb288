//! Core Janitor implementation: one decay pass per sweep

use crate::{JanitorError, JanitorMetrics};
use chrono::Utc;
use std::fmt::Display;
use std::time::Instant;
use tenet_domain::reliability::ReliabilityParams;
use tenet_domain::traits::ArtifactStore;
use tenet_engine::{run_decay, JanitorConfig, TenetConfig};

/// Janitor service that keeps cached reliability scores fresh
///
/// Evidence expires and waivers lapse with the passage of time alone, so
/// cached scores drift even when nothing is written. Each sweep rescores
/// every artifact against the threshold of the configured context.
///
/// # Examples
///
/// ```no_run
/// use tenet_janitor::{Janitor, JanitorConfig};
/// use tenet_store::SqliteStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = SqliteStore::new(".tenet/tenet.db")?;
/// let mut janitor = Janitor::new(JanitorConfig::default());
///
/// let metrics = janitor.sweep(&mut store)?;
/// println!("{}", metrics.summary());
/// # Ok(())
/// # }
/// ```
pub struct Janitor {
    config: JanitorConfig,
    params: ReliabilityParams,
    context_id: String,
    metrics: JanitorMetrics,
}

impl Janitor {
    /// Create a Janitor with default scoring for the `default` context
    pub fn new(config: JanitorConfig) -> Self {
        Self {
            config,
            params: ReliabilityParams::default(),
            context_id: "default".to_string(),
            metrics: JanitorMetrics::new(),
        }
    }

    /// Create a Janitor from a project configuration
    pub fn from_config(config: &TenetConfig) -> Self {
        Self {
            config: config.janitor.clone(),
            params: config.reliability.params(),
            context_id: config.engine.context_id.clone(),
            metrics: JanitorMetrics::new(),
        }
    }

    /// Create a Janitor with default configuration
    pub fn default_config() -> Self {
        Self::new(JanitorConfig::default())
    }

    /// Janitor configuration
    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &JanitorMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Perform one decay pass
    ///
    /// Artifacts that cannot be scored are skipped and counted; only
    /// storage failures abort the sweep. Returns the updated metrics.
    pub fn sweep<S: ArtifactStore>(&mut self, store: &mut S) -> Result<JanitorMetrics, JanitorError>
    where
        S::Error: Display,
    {
        let start = Instant::now();

        let threshold = store
            .load_workflow_state(&self.context_id)
            .map_err(|e| JanitorError::Store(e.to_string()))?
            .assurance_threshold;

        let report = run_decay(store, &self.params, threshold, Utc::now(), self.config.dry_run)?;

        for (id, reason) in &report.skipped {
            tracing::warn!(artifact = %id, reason = %reason, "artifact skipped by janitor");
        }

        self.metrics.record_pass(&report);
        self.metrics.record_sweep();
        self.metrics.total_runtime_ms += start.elapsed().as_millis();

        Ok(self.metrics.clone())
    }
}
