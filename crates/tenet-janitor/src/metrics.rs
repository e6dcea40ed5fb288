//! Metrics collection for Janitor operations

use tenet_engine::DecayReport;

/// Metrics collected across decay passes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JanitorMetrics {
    /// Artifacts rescored, summed over all passes
    pub artifacts_scored: usize,

    /// Artifacts that could not be scored, summed over all passes
    pub artifacts_skipped: usize,

    /// Artifacts below the assurance threshold in the most recent pass
    pub below_threshold: usize,

    /// Total sweep iterations completed
    pub sweep_count: usize,

    /// Total runtime in milliseconds
    pub total_runtime_ms: u128,

    /// Artifacts skipped in the most recent pass, with the reason
    pub last_skipped: Vec<(String, String)>,
}

impl JanitorMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one decay pass into the counters
    pub fn record_pass(&mut self, report: &DecayReport) {
        self.artifacts_scored += report.scored.len();
        self.artifacts_skipped += report.skipped.len();
        self.below_threshold = report.below_threshold;
        self.last_skipped = report
            .skipped
            .iter()
            .map(|(id, reason)| (id.to_string(), reason.clone()))
            .collect();
    }

    /// Record a sweep cycle completion
    pub fn record_sweep(&mut self) {
        self.sweep_count += 1;
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Janitor Metrics Summary".to_string(),
            "======================".to_string(),
            format!("Sweep cycles: {}", self.sweep_count),
            format!("Total runtime: {}ms", self.total_runtime_ms),
            format!("Artifacts scored: {}", self.artifacts_scored),
            format!("Artifacts skipped: {}", self.artifacts_skipped),
            format!("Below threshold (last pass): {}", self.below_threshold),
        ];

        if !self.last_skipped.is_empty() {
            lines.push(String::new());
            lines.push("Skipped in last pass:".to_string());
            for (id, reason) in &self.last_skipped {
                lines.push(format!("  {}: {}", id, reason));
            }
        }

        lines.join("\n")
    }
}
