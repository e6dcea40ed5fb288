//! Audit log module - write-once records of every engine invocation

use chrono::{DateTime, Utc};
use std::fmt;

/// Outcome of an audited invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditResult {
    /// The action completed
    Success,

    /// The action failed
    Failure,
}

impl AuditResult {
    /// Get the result as its stored string
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditResult::Success => "SUCCESS",
            AuditResult::Failure => "FAILURE",
        }
    }

    /// Parse a stored result
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SUCCESS" => Some(AuditResult::Success),
            "FAILURE" => Some(AuditResult::Failure),
            _ => None,
        }
    }
}

impl fmt::Display for AuditResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit log entry
#[derive(Debug, Clone, PartialEq)]
pub struct AuditLogEntry {
    /// Unique identifier (UUIDv7 string)
    pub id: String,

    /// When the action ran
    pub timestamp: DateTime<Utc>,

    /// Action name (e.g. "propose")
    pub action: String,

    /// Operation performed (e.g. "create_hypothesis")
    pub operation: String,

    /// Role or `System`
    pub actor: String,

    /// Artifact the action was about, if any
    pub target_id: Option<String>,

    /// SHA-256 hex fingerprint of the serialized input
    pub input_hash: String,

    /// Outcome
    pub result: AuditResult,

    /// Free-form details (duration, error message)
    pub details: Option<String>,

    /// Owning context
    pub context_id: String,
}

impl AuditLogEntry {
    /// Create an entry stamped now with a fresh UUIDv7 identifier
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        action: impl Into<String>,
        operation: impl Into<String>,
        actor: impl Into<String>,
        target_id: Option<String>,
        input_hash: impl Into<String>,
        result: AuditResult,
        details: Option<String>,
        context_id: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            timestamp: Utc::now(),
            action: action.into(),
            operation: operation.into(),
            actor: actor.into(),
            target_id,
            input_hash: input_hash.into(),
            result,
            details,
            context_id: context_id.into(),
        }
    }
}
