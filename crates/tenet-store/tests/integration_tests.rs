//! Integration tests for tenet-store
//!
//! These tests exercise the full storage contract against SQLite.

use chrono::{Duration, Utc};
use tenet_domain::traits::{ArtifactQuery, ArtifactStore};
use tenet_domain::{
    Artifact, ArtifactId, ArtifactKind, AssuranceLevel, AuditLogEntry, AuditResult,
    CongruenceLevel, Evidence, Phase, Relation, RelationType, Role, RoleAssignment, Tier,
    Verdict, Waiver, WorkflowState,
};
use tenet_store::{SqliteStore, StoreError};

fn artifact(id: &str) -> Artifact {
    Artifact::new(
        ArtifactId::new(id),
        ArtifactKind::System,
        format!("Title {}", id),
        "content".to_string(),
        "default".to_string(),
    )
}

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
    assert_eq!(store.unwrap().schema_version().unwrap(), 4);
}

#[test]
fn test_create_and_get_artifact() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let a = artifact("h1").with_scope("backend");

    store.create_artifact(a.clone()).unwrap();

    let retrieved = store.get_artifact(&a.id).unwrap().expect("artifact should exist");
    assert_eq!(retrieved.id, a.id);
    assert_eq!(retrieved.kind, ArtifactKind::System);
    assert_eq!(retrieved.tier, Tier::L0);
    assert_eq!(retrieved.title, a.title);
    assert_eq!(retrieved.scope, "backend");
    assert_eq!(retrieved.context_id, "default");
    assert!(retrieved.parent_id.is_none());

    assert!(store.get_artifact(&ArtifactId::new("missing")).unwrap().is_none());
}

#[test]
fn test_duplicate_artifact_rejected() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    store.create_artifact(artifact("h1")).unwrap();

    let result = store.create_artifact(artifact("h1"));
    assert!(matches!(result, Err(StoreError::Duplicate(_))));
}

#[test]
fn test_missing_parent_rejected() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let child = artifact("child").with_parent(ArtifactId::new("ghost"));

    let result = store.create_artifact(child);
    assert!(matches!(result, Err(StoreError::MissingParent(_))));

    store.create_artifact(artifact("parent")).unwrap();
    let child = artifact("child").with_parent(ArtifactId::new("parent"));
    store.create_artifact(child).unwrap();

    let loaded = store.get_artifact(&ArtifactId::new("child")).unwrap().unwrap();
    assert_eq!(loaded.parent_id, Some(ArtifactId::new("parent")));
}

#[test]
fn test_set_tier_and_cached_score() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let id = ArtifactId::new("h1");
    store.create_artifact(artifact("h1")).unwrap();

    store.set_artifact_tier(&id, Tier::L1).unwrap();
    store.set_cached_reliability(&id, 0.42).unwrap();

    let loaded = store.get_artifact(&id).unwrap().unwrap();
    assert_eq!(loaded.tier, Tier::L1);
    assert!((loaded.cached_reliability - 0.42).abs() < 1e-9);

    let missing = store.set_artifact_tier(&ArtifactId::new("nope"), Tier::L1);
    assert!(matches!(missing, Err(StoreError::NotFound(_))));
}

#[test]
fn test_query_artifacts_by_tier() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    store.create_artifact(artifact("a")).unwrap();
    store.create_artifact(artifact("b").with_tier(Tier::L2)).unwrap();
    store.create_artifact(artifact("c").with_tier(Tier::L2)).unwrap();

    let l2 = store.query_artifacts(&ArtifactQuery::in_tier("default", Tier::L2)).unwrap();
    assert_eq!(l2.len(), 2);
    assert!(l2.iter().all(|a| a.tier == Tier::L2));

    let limited = store
        .query_artifacts(&ArtifactQuery {
            limit: Some(1),
            ..ArtifactQuery::default()
        })
        .unwrap();
    assert_eq!(limited.len(), 1);

    let other_ctx = store.query_artifacts(&ArtifactQuery::in_tier("elsewhere", Tier::L2)).unwrap();
    assert!(other_ctx.is_empty());

    assert_eq!(store.list_artifact_ids().unwrap().len(), 3);
}

#[test]
fn test_evidence_round_trip() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let id = ArtifactId::new("h1");
    store.create_artifact(artifact("h1")).unwrap();

    let deadline = Utc::now() + Duration::days(30);
    let ev = Evidence::new(
        id.clone(),
        "test_result",
        "all green",
        Verdict::Pass,
        AssuranceLevel::L2,
        "test-runner",
    )
    .with_valid_until(Some(deadline));

    store.add_evidence(ev.clone()).unwrap();

    let all = store.get_evidence(&id).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].verdict, Verdict::Pass);
    assert_eq!(all[0].assurance_level, AssuranceLevel::L2);
    assert_eq!(all[0].carrier_ref, "test-runner");
    let stored_deadline = all[0].valid_until.unwrap();
    assert!((stored_deadline - deadline).num_milliseconds().abs() < 1);

    let by_id = store.get_evidence_by_id(&ev.id).unwrap().unwrap();
    assert_eq!(by_id.content, "all green");
}

#[test]
fn test_relations_targeting() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let parent = ArtifactId::new("system");
    let cl2 = CongruenceLevel::new(2).unwrap();

    store
        .add_relation(Relation::component_of(&ArtifactId::new("part-a"), &parent, cl2))
        .unwrap();
    store
        .add_relation(Relation::component_of(&ArtifactId::new("part-b"), &parent, CongruenceLevel::MAX))
        .unwrap();
    store.add_relation(Relation::verified_by("ev-1", &parent)).unwrap();

    let components = store
        .get_relations_targeting(&parent, &RelationType::ComponentOf)
        .unwrap();
    assert_eq!(components.len(), 2);

    let verified = store
        .get_relations_targeting(&parent, &RelationType::VerifiedBy)
        .unwrap();
    assert_eq!(verified.len(), 1);
    assert_eq!(verified[0].source_id, "ev-1");

    // Re-adding the same edge updates the congruence instead of duplicating
    store
        .add_relation(Relation::component_of(&ArtifactId::new("part-a"), &parent, CongruenceLevel::new(0).unwrap()))
        .unwrap();
    let components = store
        .get_relations_targeting(&parent, &RelationType::ComponentOf)
        .unwrap();
    assert_eq!(components.len(), 2);
    let part_a = components.iter().find(|r| r.source_id == "part-a").unwrap();
    assert_eq!(part_a.congruence.value(), 0);
}

#[test]
fn test_active_waiver() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let now = Utc::now();

    store
        .add_waiver(Waiver::new("ev-1", "lead", now + Duration::days(1), "known flake"))
        .unwrap();
    store
        .add_waiver(Waiver::new("ev-2", "lead", now - Duration::days(1), "expired"))
        .unwrap();

    let active = store.get_active_waiver("ev-1", now).unwrap();
    assert_eq!(active.unwrap().rationale, "known flake");
    assert!(store.get_active_waiver("ev-2", now).unwrap().is_none());
    assert!(store.get_active_waiver("ev-3", now).unwrap().is_none());
}

#[test]
fn test_workflow_state_defaults_lazily() {
    let store = SqliteStore::new(":memory:").unwrap();
    let state = store.load_workflow_state("fresh").unwrap();

    assert_eq!(state.context_id, "fresh");
    assert_eq!(state.phase, Phase::Idle);
    assert!(state.active_role.is_none());
    assert!(state.last_commit.is_none());
}

#[test]
fn test_workflow_state_round_trip() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let state = WorkflowState {
        context_id: "ctx".to_string(),
        phase: Phase::Deduction,
        active_role: Some(RoleAssignment::new(Role::Deductor, "session-1", "checking")),
        last_commit: Some("abc123".to_string()),
        assurance_threshold: 0.75,
    };
    store.save_workflow_state(&state).unwrap();

    let loaded = store.load_workflow_state("ctx").unwrap();
    assert_eq!(loaded, state);

    // Overwrite on the next accepted transition
    let mut next = loaded.clone();
    next.phase = Phase::Induction;
    next.active_role = Some(RoleAssignment::new(Role::Inductor, "session-1", ""));
    store.save_workflow_state(&next).unwrap();
    assert_eq!(store.load_workflow_state("ctx").unwrap().phase, Phase::Induction);
}

#[test]
fn test_threshold_out_of_range_rejected() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let mut state = WorkflowState::new("ctx");
    state.assurance_threshold = 1.5;

    assert!(store.save_workflow_state(&state).is_err());
}

#[test]
fn test_audit_log_newest_first() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    for (i, result) in [AuditResult::Success, AuditResult::Failure].into_iter().enumerate() {
        store
            .append_audit_log(AuditLogEntry::new(
                format!("action-{}", i),
                "op",
                "System",
                None,
                "deadbeef",
                result,
                None,
                "ctx",
            ))
            .unwrap();
    }

    let entries = store.list_audit_log("ctx", 10).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].action, "action-1");
    assert_eq!(entries[0].result, AuditResult::Failure);
    assert_eq!(store.list_audit_log("ctx", 1).unwrap().len(), 1);
    assert!(store.list_audit_log("other", 10).unwrap().is_empty());
}

#[test]
fn test_persistence_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tenet.db");

    {
        let mut store = SqliteStore::new(&path).unwrap();
        store.create_artifact(artifact("durable")).unwrap();
    }

    let store = SqliteStore::new(&path).unwrap();
    assert!(store.get_artifact(&ArtifactId::new("durable")).unwrap().is_some());
    assert_eq!(store.schema_version().unwrap(), 4);
}
