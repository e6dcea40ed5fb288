//! Waiver module - time-bounded evidence exceptions

use chrono::{DateTime, Utc};

/// An exception for one evidence record
///
/// While unexpired, the referenced evidence counts as satisfied no matter
/// its verdict or its own validity deadline.
#[derive(Debug, Clone, PartialEq)]
pub struct Waiver {
    /// Unique identifier (UUIDv7 string)
    pub id: String,

    /// Evidence record being waived
    pub evidence_id: String,

    /// Who granted the waiver
    pub waived_by: String,

    /// When the waiver stops applying
    pub expires_at: DateTime<Utc>,

    /// Why the exception was granted
    pub rationale: String,

    /// When the waiver was granted
    pub created_at: DateTime<Utc>,
}

impl Waiver {
    /// Create a new waiver with a fresh UUIDv7 identifier
    pub fn new(
        evidence_id: impl Into<String>,
        waived_by: impl Into<String>,
        expires_at: DateTime<Utc>,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            evidence_id: evidence_id.into(),
            waived_by: waived_by.into(),
            expires_at,
            rationale: rationale.into(),
            created_at: Utc::now(),
        }
    }

    /// Whether the waiver still applies at `now`
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}
