//! Evidence module - verdicts recorded against artifacts

use crate::ArtifactId;
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

/// Outcome a piece of evidence asserts about its artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// The artifact held up
    Pass,

    /// The artifact was refuted
    Fail,

    /// The artifact needs revision
    Refine,
}

impl Verdict {
    /// Get the verdict as its stored (lowercase) string
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pass => "pass",
            Verdict::Fail => "fail",
            Verdict::Refine => "refine",
        }
    }

    /// Parse a verdict (case-insensitive, so `PASS` and `pass` both work)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pass" => Some(Verdict::Pass),
            "fail" => Some(Verdict::Fail),
            "refine" => Some(Verdict::Refine),
            _ => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid verdict: {} (expected PASS, FAIL or REFINE)", s))
    }
}

/// How much tier-promotion weight a piece of evidence carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssuranceLevel {
    /// Anecdotal
    L0,

    /// Logically checked
    L1,

    /// Empirically tested
    L2,
}

impl AssuranceLevel {
    /// Get the level as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            AssuranceLevel::L0 => "L0",
            AssuranceLevel::L1 => "L1",
            AssuranceLevel::L2 => "L2",
        }
    }

    /// Parse a level (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "L0" => Some(AssuranceLevel::L0),
            "L1" => Some(AssuranceLevel::L1),
            "L2" => Some(AssuranceLevel::L2),
            _ => None,
        }
    }
}

impl fmt::Display for AssuranceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AssuranceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid assurance level: {} (expected L0, L1 or L2)", s))
    }
}

/// A piece of evidence about an artifact
#[derive(Debug, Clone, PartialEq)]
pub struct Evidence {
    /// Unique identifier (UUIDv7 string)
    pub id: String,

    /// Artifact this evidence is about
    pub artifact_id: ArtifactId,

    /// Evidence type (e.g. "verification", "test_result", "audit_report")
    pub evidence_type: String,

    /// Free-text content
    pub content: String,

    /// Verdict asserted
    pub verdict: Verdict,

    /// Promotion weight
    pub assurance_level: AssuranceLevel,

    /// Who or what produced it (e.g. "internal-logic", "test-runner", "auditor")
    pub carrier_ref: String,

    /// After this instant the evidence no longer counts (unless waived)
    pub valid_until: Option<DateTime<Utc>>,

    /// When this evidence was recorded
    pub created_at: DateTime<Utc>,
}

impl Evidence {
    /// Create a new evidence record with a fresh UUIDv7 identifier
    pub fn new(
        artifact_id: ArtifactId,
        evidence_type: impl Into<String>,
        content: impl Into<String>,
        verdict: Verdict,
        assurance_level: AssuranceLevel,
        carrier_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            artifact_id,
            evidence_type: evidence_type.into(),
            content: content.into(),
            verdict,
            assurance_level,
            carrier_ref: carrier_ref.into(),
            valid_until: None,
            created_at: Utc::now(),
        }
    }

    /// Set the validity deadline
    pub fn with_valid_until(mut self, valid_until: Option<DateTime<Utc>>) -> Self {
        self.valid_until = valid_until;
        self
    }

    /// Whether the validity deadline has passed at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.valid_until, Some(deadline) if deadline < now)
    }
}

/// Parse a validity deadline given as RFC3339 or `YYYY-MM-DD`
///
/// Dates without a time resolve to midnight UTC of that day. Anything
/// unparsable yields `None` ("no deadline") rather than an error.
///
/// # Examples
///
/// ```
/// use tenet_domain::parse_validity_date;
///
/// assert!(parse_validity_date("2030-01-31").is_some());
/// assert!(parse_validity_date("2030-01-31T12:00:00Z").is_some());
/// assert!(parse_validity_date("next tuesday").is_none());
/// ```
pub fn parse_validity_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_verdict_parse_case_insensitive() {
        assert_eq!(Verdict::parse("PASS"), Some(Verdict::Pass));
        assert_eq!(Verdict::parse("Fail"), Some(Verdict::Fail));
        assert_eq!(Verdict::parse("refine"), Some(Verdict::Refine));
        assert_eq!(Verdict::parse("maybe"), None);
    }

    #[test]
    fn test_assurance_level_ordering() {
        assert!(AssuranceLevel::L0 < AssuranceLevel::L1);
        assert!(AssuranceLevel::L1 < AssuranceLevel::L2);
        assert_eq!(AssuranceLevel::parse("l2"), Some(AssuranceLevel::L2));
        assert!("L3".parse::<AssuranceLevel>().is_err());
    }

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_validity_date("2030-05-01T10:30:00+02:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2030, 5, 1, 8, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_plain_date() {
        let dt = parse_validity_date("2030-05-01").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2030, 5, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_unparsable_date_is_no_deadline() {
        assert_eq!(parse_validity_date(""), None);
        assert_eq!(parse_validity_date("2030-13-45"), None);
        assert_eq!(parse_validity_date("soon"), None);
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let ev = Evidence::new(
            ArtifactId::new("h1"),
            "test_result",
            "ok",
            Verdict::Pass,
            AssuranceLevel::L2,
            "test-runner",
        );
        assert!(!ev.is_expired(now));

        let expired = ev.clone().with_valid_until(Some(now - Duration::days(1)));
        assert!(expired.is_expired(now));

        let fresh = ev.with_valid_until(Some(now + Duration::days(1)));
        assert!(!fresh.is_expired(now));
    }
}
