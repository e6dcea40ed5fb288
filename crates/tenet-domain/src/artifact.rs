//! Artifact module - the tracked unit of knowledge ("holon")

use crate::Tier;
use chrono::{DateTime, Utc};
use std::fmt;

/// Stable, slug-shaped identifier of an artifact
///
/// Identifiers are derived from titles (`"Cache the index"` becomes
/// `cache-the-index`) so they double as file names in the journal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactId(String);

impl ArtifactId {
    /// Wrap an existing identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use tenet_domain::ArtifactId;
    ///
    /// let id = ArtifactId::new("redis-cache");
    /// assert_eq!(id.as_str(), "redis-cache");
    /// ```
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Derive an identifier from a human title
    ///
    /// Lowercases the title, collapses every run of non-alphanumeric
    /// characters into a single `-`, and trims leading/trailing dashes.
    ///
    /// # Examples
    ///
    /// ```
    /// use tenet_domain::ArtifactId;
    ///
    /// let id = ArtifactId::from_title("Use Redis  for Caching!");
    /// assert_eq!(id.as_str(), "use-redis-for-caching");
    /// ```
    pub fn from_title(title: &str) -> Self {
        let mut slug = String::with_capacity(title.len());
        let mut pending_dash = false;

        for ch in title.chars() {
            if ch.is_ascii_alphanumeric() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(ch.to_ascii_lowercase());
            } else {
                pending_dash = true;
            }
        }

        Self(slug)
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty (e.g. a title with no alphanumerics)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArtifactId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Kind of artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// A technical hypothesis about the system under work
    System,

    /// A knowledge claim
    Episteme,

    /// Any other stored kind (kept verbatim)
    Other(String),
}

impl ArtifactKind {
    /// Get the kind as a string
    pub fn as_str(&self) -> &str {
        match self {
            ArtifactKind::System => "system",
            ArtifactKind::Episteme => "episteme",
            ArtifactKind::Other(s) => s.as_str(),
        }
    }

    /// Parse a kind; unknown values are preserved as `Other`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "system" => ArtifactKind::System,
            "episteme" => ArtifactKind::Episteme,
            _ => ArtifactKind::Other(s.to_string()),
        }
    }

    /// Whether this is one of the hypothesis-like kinds accepted by proposals
    pub fn is_hypothesis(&self) -> bool {
        matches!(self, ArtifactKind::System | ArtifactKind::Episteme)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An artifact - the unit of knowledge that carries a trust tier
///
/// The cached reliability is a read cache written by the reliability
/// calculus; it can always be recomputed from evidence and graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    /// Stable identifier
    pub id: ArtifactId,

    /// Kind of artifact
    pub kind: ArtifactKind,

    /// Current trust tier
    pub tier: Tier,

    /// Human title
    pub title: String,

    /// Body content
    pub content: String,

    /// Scope the artifact claims to hold in
    pub scope: String,

    /// Owning working context
    pub context_id: String,

    /// Predecessor in the L0 → L1 → L2 lineage chain
    pub parent_id: Option<ArtifactId>,

    /// Last computed reliability score [0.0, 1.0]
    pub cached_reliability: f64,

    /// When this artifact was created
    pub created_at: DateTime<Utc>,

    /// When this artifact was last modified
    pub updated_at: DateTime<Utc>,
}

impl Artifact {
    /// Create a new L0 artifact with a zero cached score
    pub fn new(
        id: ArtifactId,
        kind: ArtifactKind,
        title: String,
        content: String,
        context_id: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            kind,
            tier: Tier::L0,
            title,
            content,
            scope: String::new(),
            context_id,
            parent_id: None,
            cached_reliability: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the scope
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Set the lineage parent
    pub fn with_parent(mut self, parent_id: ArtifactId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Set the tier (used when loading or seeding)
    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_from_title() {
        assert_eq!(ArtifactId::from_title("Hello World").as_str(), "hello-world");
        assert_eq!(ArtifactId::from_title("  --A/B test--  ").as_str(), "a-b-test");
        assert_eq!(ArtifactId::from_title("v2.0 Rollout").as_str(), "v2-0-rollout");
        assert!(ArtifactId::from_title("!!!").is_empty());
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(ArtifactKind::parse("System"), ArtifactKind::System);
        assert_eq!(ArtifactKind::parse("episteme"), ArtifactKind::Episteme);
        assert_eq!(
            ArtifactKind::parse("decision"),
            ArtifactKind::Other("decision".to_string())
        );
        assert!(!ArtifactKind::parse("decision").is_hypothesis());
    }

    #[test]
    fn test_new_artifact_defaults() {
        let a = Artifact::new(
            ArtifactId::new("h1"),
            ArtifactKind::System,
            "H1".to_string(),
            "content".to_string(),
            "default".to_string(),
        )
        .with_scope("backend");

        assert_eq!(a.tier, Tier::L0);
        assert_eq!(a.scope, "backend");
        assert_eq!(a.cached_reliability, 0.0);
        assert!(a.parent_id.is_none());
    }
}
