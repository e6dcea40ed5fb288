//! Tenet Domain Layer
//!
//! This crate contains the domain model shared by every other Tenet crate.
//! It carries no infrastructure: value objects, the lifecycle tables, the
//! pure reliability arithmetic, and the storage contract that the
//! persistence layer implements.
//!
//! ## Key Concepts
//!
//! - **Artifact**: a unit of hypothesis, knowledge or decision content (a "holon")
//! - **Tier**: trust stage of an artifact (L0 → L1 → L2, or invalid)
//! - **Evidence**: a verdict recorded against an artifact, with an assurance level
//! - **Relation**: a directed, congruence-weighted edge between artifacts
//! - **Waiver**: a time-bounded override for one evidence record
//! - **Workflow state**: the phase/role record of one working context
//!
//! ## Architecture
//!
//! - Only `uuid` and `chrono` as external dependencies
//! - Pure business logic only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod artifact;
pub mod audit;
pub mod evidence;
pub mod relation;
pub mod reliability;
pub mod tier;
pub mod traits;
pub mod waiver;
pub mod workflow;

// Re-exports for convenience
pub use artifact::{Artifact, ArtifactId, ArtifactKind};
pub use audit::{AuditLogEntry, AuditResult};
pub use evidence::{parse_validity_date, AssuranceLevel, Evidence, Verdict};
pub use relation::{CongruenceLevel, Relation, RelationType};
pub use tier::Tier;
pub use waiver::Waiver;
pub use workflow::{Phase, Role, RoleAssignment, WorkflowState, DEFAULT_ASSURANCE_THRESHOLD};
