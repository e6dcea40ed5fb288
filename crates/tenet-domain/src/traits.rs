//! Trait definitions for external interactions
//!
//! The storage contract is the only boundary between the core and
//! persistence. Infrastructure implementations live in other crates.

use crate::{
    Artifact, ArtifactId, ArtifactKind, AuditLogEntry, Evidence, Relation, RelationType, Tier,
    Waiver, WorkflowState,
};
use chrono::{DateTime, Utc};

/// Durable storage of artifacts, evidence, relations, waivers, workflow
/// state and audit entries
///
/// Implemented by the infrastructure layer (tenet-store). Every method is
/// individually atomic; multi-step updates are sequenced by the caller.
pub trait ArtifactStore {
    /// Error type for store operations
    type Error;

    /// Get an artifact by ID
    fn get_artifact(&self, id: &ArtifactId) -> Result<Option<Artifact>, Self::Error>;

    /// Insert a new artifact (rejects duplicates and dangling parents)
    fn create_artifact(&mut self, artifact: Artifact) -> Result<(), Self::Error>;

    /// Change the tier of an existing artifact
    fn set_artifact_tier(&mut self, id: &ArtifactId, tier: Tier) -> Result<(), Self::Error>;

    /// Overwrite the cached reliability score of an artifact
    fn set_cached_reliability(&mut self, id: &ArtifactId, score: f64) -> Result<(), Self::Error>;

    /// Query artifacts matching criteria
    fn query_artifacts(&self, query: &ArtifactQuery) -> Result<Vec<Artifact>, Self::Error>;

    /// Identifiers of every known artifact
    fn list_artifact_ids(&self) -> Result<Vec<ArtifactId>, Self::Error>;

    /// Record evidence
    fn add_evidence(&mut self, evidence: Evidence) -> Result<(), Self::Error>;

    /// All evidence recorded against an artifact, oldest first
    fn get_evidence(&self, artifact_id: &ArtifactId) -> Result<Vec<Evidence>, Self::Error>;

    /// Single evidence record by ID
    fn get_evidence_by_id(&self, id: &str) -> Result<Option<Evidence>, Self::Error>;

    /// Insert or replace a relation (keyed by source, target and type)
    fn add_relation(&mut self, relation: Relation) -> Result<(), Self::Error>;

    /// Relations of a type pointing at `target`
    fn get_relations_targeting(
        &self,
        target: &ArtifactId,
        relation_type: &RelationType,
    ) -> Result<Vec<Relation>, Self::Error>;

    /// Record a waiver
    fn add_waiver(&mut self, waiver: Waiver) -> Result<(), Self::Error>;

    /// A waiver for `evidence_id` still active at `now`, if any
    fn get_active_waiver(
        &self,
        evidence_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Waiver>, Self::Error>;

    /// Workflow state of a context (a fresh `IDLE` state when absent)
    fn load_workflow_state(&self, context_id: &str) -> Result<WorkflowState, Self::Error>;

    /// Persist a workflow state, overwriting the previous record
    fn save_workflow_state(&mut self, state: &WorkflowState) -> Result<(), Self::Error>;

    /// Append an audit entry
    fn append_audit_log(&mut self, entry: AuditLogEntry) -> Result<(), Self::Error>;

    /// Most recent audit entries of a context, newest first
    fn list_audit_log(&self, context_id: &str, limit: usize) -> Result<Vec<AuditLogEntry>, Self::Error>;
}

/// Query criteria for retrieving artifacts
#[derive(Debug, Clone, Default)]
pub struct ArtifactQuery {
    /// Filter by owning context
    pub context_id: Option<String>,

    /// Filter by tier
    pub tier: Option<Tier>,

    /// Filter by kind
    pub kind: Option<ArtifactKind>,

    /// Maximum results to return
    pub limit: Option<usize>,
}

impl ArtifactQuery {
    /// Artifacts of one context at one tier
    pub fn in_tier(context_id: impl Into<String>, tier: Tier) -> Self {
        Self {
            context_id: Some(context_id.into()),
            tier: Some(tier),
            ..Self::default()
        }
    }
}
