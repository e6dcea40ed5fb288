//! Background worker for continuous decay passes

use crate::{Janitor, JanitorConfig, JanitorError, JanitorMetrics};
use tenet_domain::traits::ArtifactStore;
use tenet_engine::TenetConfig;
use tokio::time::{interval, Duration};

/// Background worker that runs Janitor sweeps on a schedule
///
/// # Examples
///
/// ```no_run
/// use tenet_janitor::{JanitorWorker, JanitorConfig};
/// use tenet_store::SqliteStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = SqliteStore::new(".tenet/tenet.db")?;
///     let mut worker = JanitorWorker::new(JanitorConfig::default())?;
///
///     // Run until Ctrl+C
///     worker.run(store).await?;
///     Ok(())
/// }
/// ```
pub struct JanitorWorker {
    janitor: Janitor,
    interval: Duration,
}

impl JanitorWorker {
    /// Create a worker; a zero sweep interval is rejected
    pub fn new(config: JanitorConfig) -> Result<Self, JanitorError> {
        Self::with_janitor(Janitor::new(config))
    }

    /// Create a worker from a project configuration
    pub fn from_config(config: &TenetConfig) -> Result<Self, JanitorError> {
        Self::with_janitor(Janitor::from_config(config))
    }

    fn with_janitor(janitor: Janitor) -> Result<Self, JanitorError> {
        let interval = janitor.config().sweep_interval();
        if interval.is_zero() {
            return Err(JanitorError::Config(
                "sweep_interval_minutes must be at least 1".to_string(),
            ));
        }
        Ok(Self { janitor, interval })
    }

    /// Interval between sweeps
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run sweeps until a shutdown signal (Ctrl+C) is received
    ///
    /// A failed sweep is logged and the worker keeps going.
    pub async fn run<S>(&mut self, mut store: S) -> Result<(), JanitorError>
    where
        S: ArtifactStore,
        S::Error: std::fmt::Display,
    {
        let mut ticker = interval(self.interval);

        tracing::info!(interval = ?self.interval, "janitor worker started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep_once(&mut store);
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("shutdown signal received, stopping janitor");
                    break;
                }
            }
        }

        tracing::info!("Janitor stopped. Final metrics:\n{}", self.janitor.metrics().summary());
        Ok(())
    }

    /// Run a fixed number of sweeps, then return
    ///
    /// The first sweep starts immediately; later ones wait one interval each.
    pub async fn run_cycles<S>(&mut self, store: &mut S, cycles: usize) -> Result<(), JanitorError>
    where
        S: ArtifactStore,
        S::Error: std::fmt::Display,
    {
        let mut ticker = interval(self.interval);

        tracing::info!(cycles, interval = ?self.interval, "janitor worker started");

        for cycle in 0..cycles {
            ticker.tick().await;
            tracing::debug!("Starting sweep cycle {}/{}", cycle + 1, cycles);
            self.sweep_once(store);
        }

        tracing::info!("Janitor finished {} cycles", cycles);
        Ok(())
    }

    fn sweep_once<S>(&mut self, store: &mut S)
    where
        S: ArtifactStore,
        S::Error: std::fmt::Display,
    {
        match self.janitor.sweep(store) {
            Ok(metrics) => {
                tracing::info!(
                    scored = metrics.artifacts_scored,
                    skipped = metrics.artifacts_skipped,
                    below_threshold = metrics.below_threshold,
                    "sweep completed"
                );
            }
            Err(e) => {
                tracing::error!("Sweep failed: {}", e);
            }
        }
    }

    /// Get a reference to the janitor's metrics
    pub fn metrics(&self) -> &JanitorMetrics {
        self.janitor.metrics()
    }

    /// Reset the janitor's metrics
    pub fn reset_metrics(&mut self) {
        self.janitor.reset_metrics();
    }
}
