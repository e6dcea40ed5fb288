//! Project configuration
//!
//! Loaded from `.tenet/config.toml`; every section and field is optional
//! and falls back to its default.
//!
//! ```toml
//! [engine]
//! context_id = "default"
//! assurance_threshold = 0.8
//!
//! [reliability]
//! pass_score = 1.0
//! refine_score = 0.5
//! fail_score = 0.0
//! no_evidence_score = 0.0
//! weight_l0 = 1.0
//! weight_l1 = 1.5
//! weight_l2 = 2.0
//! local_weight = 0.7
//! max_depth = 64
//!
//! [janitor]
//! sweep_interval_minutes = 60
//! dry_run = false
//! ```

use crate::EngineError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tenet_domain::reliability::ReliabilityParams;
use tenet_domain::DEFAULT_ASSURANCE_THRESHOLD;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TenetConfig {
    /// Engine settings
    pub engine: EngineConfig,

    /// Scoring constants
    pub reliability: ReliabilityConfig,

    /// Decay scheduling
    pub janitor: JanitorConfig,
}

impl TenetConfig {
    /// Load from a TOML file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&text)
    }

    /// Parse from TOML text and validate
    pub fn from_toml(text: &str) -> Result<Self, EngineError> {
        let config: Self = toml::from_str(text).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Reject values outside their documented ranges
    pub fn validate(&self) -> Result<(), EngineError> {
        let unit = |name: &str, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(EngineError::Config(format!("{} must be in [0.0, 1.0], got {}", name, v)))
            }
        };

        unit("engine.assurance_threshold", self.engine.assurance_threshold)?;
        unit("reliability.pass_score", self.reliability.pass_score)?;
        unit("reliability.refine_score", self.reliability.refine_score)?;
        unit("reliability.fail_score", self.reliability.fail_score)?;
        unit("reliability.no_evidence_score", self.reliability.no_evidence_score)?;
        unit("reliability.local_weight", self.reliability.local_weight)?;

        for (name, w) in [
            ("reliability.weight_l0", self.reliability.weight_l0),
            ("reliability.weight_l1", self.reliability.weight_l1),
            ("reliability.weight_l2", self.reliability.weight_l2),
        ] {
            if w <= 0.0 {
                return Err(EngineError::Config(format!("{} must be positive, got {}", name, w)));
            }
        }

        if self.engine.context_id.trim().is_empty() {
            return Err(EngineError::Config("engine.context_id must not be empty".to_string()));
        }

        if self.janitor.sweep_interval_minutes == 0 {
            return Err(EngineError::Config(
                "janitor.sweep_interval_minutes must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Working context the engine operates on
    pub context_id: String,

    /// Threshold written into the workflow state on `init`
    pub assurance_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            context_id: "default".to_string(),
            assurance_threshold: DEFAULT_ASSURANCE_THRESHOLD,
        }
    }
}

/// Reliability scoring constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReliabilityConfig {
    /// Score of a `pass` verdict
    pub pass_score: f64,
    /// Score of a `refine` verdict
    pub refine_score: f64,
    /// Score of a `fail` verdict
    pub fail_score: f64,
    /// Score when no live evidence remains
    pub no_evidence_score: f64,
    /// Weight of L0 evidence
    pub weight_l0: f64,
    /// Weight of L1 evidence
    pub weight_l1: f64,
    /// Weight of L2 evidence
    pub weight_l2: f64,
    /// Share of local evidence in composite scores
    pub local_weight: f64,
    /// Component traversal depth bound
    pub max_depth: usize,
}

impl Default for ReliabilityConfig {
    fn default() -> Self {
        let p = ReliabilityParams::default();
        Self {
            pass_score: p.pass_score,
            refine_score: p.refine_score,
            fail_score: p.fail_score,
            no_evidence_score: p.no_evidence_score,
            weight_l0: p.weight_l0,
            weight_l1: p.weight_l1,
            weight_l2: p.weight_l2,
            local_weight: p.local_weight,
            max_depth: p.max_depth,
        }
    }
}

impl ReliabilityConfig {
    /// Scoring parameters for the calculator
    pub fn params(&self) -> ReliabilityParams {
        ReliabilityParams {
            pass_score: self.pass_score,
            refine_score: self.refine_score,
            fail_score: self.fail_score,
            no_evidence_score: self.no_evidence_score,
            weight_l0: self.weight_l0,
            weight_l1: self.weight_l1,
            weight_l2: self.weight_l2,
            local_weight: self.local_weight,
            max_depth: self.max_depth,
        }
    }
}

/// Scheduled decay settings
///
/// # Examples
///
/// ```
/// use tenet_engine::config::JanitorConfig;
///
/// assert_eq!(JanitorConfig::default().sweep_interval_minutes, 60);
/// assert_eq!(JanitorConfig::aggressive().sweep_interval_minutes, 15);
/// assert_eq!(JanitorConfig::lenient().sweep_interval_minutes, 240);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JanitorConfig {
    /// How often to run the decay pass (in minutes)
    pub sweep_interval_minutes: u64,

    /// Compute scores without writing them back
    pub dry_run: bool,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            sweep_interval_minutes: 60,
            dry_run: false,
        }
    }
}

impl JanitorConfig {
    /// Frequent decay passes (every 15 minutes)
    pub fn aggressive() -> Self {
        Self {
            sweep_interval_minutes: 15,
            dry_run: false,
        }
    }

    /// Infrequent decay passes (every 4 hours)
    pub fn lenient() -> Self {
        Self {
            sweep_interval_minutes: 240,
            dry_run: false,
        }
    }

    /// Get sweep interval as Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_minutes * 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_domain_constants() {
        let config = TenetConfig::default();
        assert_eq!(config.engine.context_id, "default");
        assert_eq!(config.engine.assurance_threshold, 0.8);
        assert_eq!(config.reliability.params(), ReliabilityParams::default());
        assert_eq!(config.janitor.sweep_interval(), Duration::from_secs(3600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = TenetConfig::from_toml(
            "[engine]\ncontext_id = \"api\"\n\n[reliability]\nlocal_weight = 0.5\n",
        )
        .unwrap();

        assert_eq!(config.engine.context_id, "api");
        assert_eq!(config.engine.assurance_threshold, 0.8);
        assert_eq!(config.reliability.local_weight, 0.5);
        assert_eq!(config.reliability.pass_score, 1.0);
        assert_eq!(config.janitor, JanitorConfig::default());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(TenetConfig::from_toml("[engine]\nassurance_threshold = 1.5\n").is_err());
        assert!(TenetConfig::from_toml("[reliability]\nweight_l2 = 0.0\n").is_err());
        assert!(TenetConfig::from_toml("[janitor]\nsweep_interval_minutes = 0\n").is_err());
        assert!(TenetConfig::from_toml("not toml at all [").is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = TenetConfig {
            janitor: JanitorConfig::aggressive(),
            ..TenetConfig::default()
        };
        let text = config.to_toml().unwrap();
        assert_eq!(TenetConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = TenetConfig::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, TenetConfig::default());
    }
}
