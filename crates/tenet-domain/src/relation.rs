//! Relation module - directed edges of the artifact graph

use crate::ArtifactId;
use std::fmt;

/// Type of relation between two artifacts
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RelationType {
    /// Source is a component of the target (propagates trust)
    ComponentOf,

    /// Source depends on the target
    DependsOn,

    /// Source is a collection of the target
    CollectionOf,

    /// Source (evidence) verifies the target (artifact)
    VerifiedBy,

    /// Any other stored relation type (kept verbatim)
    Other(String),
}

impl RelationType {
    /// Get the relation type as its stored string
    pub fn as_str(&self) -> &str {
        match self {
            RelationType::ComponentOf => "componentOf",
            RelationType::DependsOn => "dependsOn",
            RelationType::CollectionOf => "collectionOf",
            RelationType::VerifiedBy => "verifiedBy",
            RelationType::Other(s) => s.as_str(),
        }
    }

    /// Parse a relation type; unknown values are preserved as `Other`
    pub fn parse(s: &str) -> Self {
        match s {
            "componentOf" => RelationType::ComponentOf,
            "dependsOn" => RelationType::DependsOn,
            "collectionOf" => RelationType::CollectionOf,
            "verifiedBy" => RelationType::VerifiedBy,
            other => RelationType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How strongly a relation propagates trust, 0 (unrelated) to 3 (fully binding)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CongruenceLevel(u8);

impl CongruenceLevel {
    /// Highest congruence
    pub const MAX: CongruenceLevel = CongruenceLevel(3);

    /// Create a congruence level, rejecting values above 3
    pub fn new(level: u8) -> Result<Self, String> {
        if level > 3 {
            return Err(format!("Congruence level must be in 0..=3, got {}", level));
        }
        Ok(Self(level))
    }

    /// Raw level
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Propagation weight in [0.0, 1.0] (level / 3)
    pub fn weight(&self) -> f64 {
        f64::from(self.0) / 3.0
    }
}

impl Default for CongruenceLevel {
    fn default() -> Self {
        Self::MAX
    }
}

impl fmt::Display for CongruenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CL:{}", self.0)
    }
}

/// A directed relation `source → target`
///
/// Relations may form cycles; consumers must not assume a DAG.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    /// Source identifier (an artifact, or an evidence id for `verifiedBy`)
    pub source_id: String,

    /// Target artifact
    pub target_id: ArtifactId,

    /// Type of relation
    pub relation_type: RelationType,

    /// Trust propagation strength
    pub congruence: CongruenceLevel,
}

impl Relation {
    /// Create a new relation
    pub fn new(
        source_id: impl Into<String>,
        target_id: ArtifactId,
        relation_type: RelationType,
        congruence: CongruenceLevel,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id,
            relation_type,
            congruence,
        }
    }

    /// `component` is a component of `composite`
    pub fn component_of(component: &ArtifactId, composite: &ArtifactId, congruence: CongruenceLevel) -> Self {
        Self::new(component.as_str(), composite.clone(), RelationType::ComponentOf, congruence)
    }

    /// Evidence `evidence_id` verifies `artifact`
    pub fn verified_by(evidence_id: &str, artifact: &ArtifactId) -> Self {
        Self::new(evidence_id, artifact.clone(), RelationType::VerifiedBy, CongruenceLevel::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_congruence_bounds() {
        assert!(CongruenceLevel::new(0).is_ok());
        assert!(CongruenceLevel::new(3).is_ok());
        assert!(CongruenceLevel::new(4).is_err());
        assert_eq!(CongruenceLevel::default().value(), 3);
    }

    #[test]
    fn test_congruence_weight() {
        assert_eq!(CongruenceLevel::new(0).unwrap().weight(), 0.0);
        assert_eq!(CongruenceLevel::new(3).unwrap().weight(), 1.0);
        assert!((CongruenceLevel::new(2).unwrap().weight() - 0.6667).abs() < 0.001);
    }

    #[test]
    fn test_relation_type_round_trip_names() {
        for name in ["componentOf", "dependsOn", "collectionOf", "verifiedBy", "supersedes"] {
            assert_eq!(RelationType::parse(name).as_str(), name);
        }
    }
}
