//! Integration tests for tenet-gatekeeper
//!
//! Covers the transition table, evidence preconditions and state
//! persistence through the SQLite store.

use std::fs;
use std::path::PathBuf;
use tenet_domain::{Phase, Role, RoleAssignment, WorkflowState};
use tenet_gatekeeper::{EvidenceStub, StateMachine, TransitionRejection};
use tenet_store::SqliteStore;

struct Layout {
    _dir: tempfile::TempDir,
    l0_dir: PathBuf,
    l1_file: PathBuf,
    l2_file: PathBuf,
}

fn layout() -> Layout {
    let dir = tempfile::tempdir().unwrap();
    let knowledge = dir.path().join("knowledge");

    let l0_dir = knowledge.join("L0");
    fs::create_dir_all(&l0_dir).unwrap();
    fs::write(l0_dir.join("h1.md"), "hypo").unwrap();

    let l1_dir = knowledge.join("L1");
    fs::create_dir_all(&l1_dir).unwrap();
    let l1_file = l1_dir.join("h1.md");
    fs::write(&l1_file, "hypo").unwrap();

    let l2_dir = knowledge.join("L2");
    fs::create_dir_all(&l2_dir).unwrap();
    let l2_file = l2_dir.join("h1.md");
    fs::write(&l2_file, "hypo").unwrap();

    Layout {
        _dir: dir,
        l0_dir,
        l1_file,
        l2_file,
    }
}

fn ra(role: Role) -> RoleAssignment {
    RoleAssignment::new(role, "test", "test")
}

fn at(phase: Phase) -> StateMachine {
    let mut state = WorkflowState::new("default");
    state.phase = phase;
    StateMachine::new(state)
}

fn stub(path: &PathBuf) -> Option<EvidenceStub> {
    Some(EvidenceStub::new(path, "test"))
}

#[test]
fn test_valid_transitions() {
    let l = layout();
    let any = Some(EvidenceStub::new("any", "test"));

    let cases = [
        ("IdleToAbduction", Phase::Idle, Phase::Abduction, Role::Abductor, any.clone()),
        ("AbductionToDeduction", Phase::Abduction, Phase::Deduction, Role::Deductor, stub(&l.l0_dir)),
        ("DeductionToInduction", Phase::Deduction, Phase::Induction, Role::Inductor, stub(&l.l1_file)),
        ("InductionToDeductionLoopback", Phase::Induction, Phase::Deduction, Role::Deductor, stub(&l.l0_dir)),
        ("InductionToDecision", Phase::Induction, Phase::Decision, Role::Decider, stub(&l.l2_file)),
        ("DecisionToIdle", Phase::Decision, Phase::Idle, Role::Decider, any.clone()),
        ("SelfLoopValid", Phase::Abduction, Phase::Abduction, Role::Abductor, None),
    ];

    for (name, from, to, role, evidence) in cases {
        let fsm = at(from);
        let result = fsm.can_transition(to, &ra(role), evidence.as_ref());
        assert!(result.is_ok(), "{}: {:?}", name, result);
    }
}

#[test]
fn test_invalid_transitions() {
    let l = layout();

    let cases = [
        ("AbductionToInductionDirect", Phase::Abduction, Phase::Induction, Role::Inductor, None),
        ("DeductionToAbduction", Phase::Deduction, Phase::Abduction, Role::Abductor, None),
        ("AbductorInDeduction", Phase::Deduction, Phase::Deduction, Role::Abductor, None),
        ("InvalidRoleForTransition", Phase::Abduction, Phase::Deduction, Role::Abductor, stub(&l.l0_dir)),
        ("InvalidPhaseTransition", Phase::Decision, Phase::Abduction, Role::Decider, None),
        ("MissingEvidenceForDeduction", Phase::Abduction, Phase::Deduction, Role::Deductor, None),
    ];

    for (name, from, to, role, evidence) in cases {
        let fsm = at(from);
        assert!(
            fsm.can_transition(to, &ra(role), evidence.as_ref()).is_err(),
            "{} should be rejected",
            name
        );
    }
}

#[test]
fn test_rejections_name_the_failing_rule() {
    let l = layout();

    let err = at(Phase::Abduction)
        .can_transition(Phase::Deduction, &ra(Role::Abductor), stub(&l.l0_dir).as_ref())
        .unwrap_err();
    assert_eq!(
        err,
        TransitionRejection::RoleNotAllowed {
            role: Role::Abductor,
            phase: Phase::Deduction
        }
    );

    let err = at(Phase::Abduction)
        .can_transition(Phase::Deduction, &ra(Role::Deductor), None)
        .unwrap_err();
    assert_eq!(err, TransitionRejection::MissingEvidence { phase: Phase::Deduction });
    assert!(err.to_string().contains("DEDUCTION"));
}

#[test]
fn test_evidence_must_exist() {
    let l = layout();
    let missing = l.l1_file.with_file_name("ghost.md");

    let err = at(Phase::Deduction)
        .can_transition(Phase::Induction, &ra(Role::Inductor), stub(&missing).as_ref())
        .unwrap_err();
    assert!(matches!(err, TransitionRejection::InvalidEvidence { phase: Phase::Induction, .. }));

    // A directory is not a file
    let err = at(Phase::Induction)
        .can_transition(Phase::Decision, &ra(Role::Decider), stub(&l.l0_dir).as_ref())
        .unwrap_err();
    assert!(matches!(err, TransitionRejection::InvalidEvidence { phase: Phase::Decision, .. }));

    // An empty directory does not open deduction
    let empty = tempfile::tempdir().unwrap();
    let err = at(Phase::Abduction)
        .can_transition(
            Phase::Deduction,
            &ra(Role::Deductor),
            Some(EvidenceStub::new(empty.path(), "dir")).as_ref(),
        )
        .unwrap_err();
    assert!(matches!(err, TransitionRejection::InvalidEvidence { .. }));
}

#[test]
fn test_load_state_defaults_to_idle() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::new(dir.path().join("test.db")).unwrap();

    let fsm = StateMachine::load(&store, "default").unwrap();
    assert_eq!(fsm.phase(), Phase::Idle);
    assert!(fsm.state().active_role.is_none());
}

#[test]
fn test_save_and_load_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = SqliteStore::new(dir.path().join("test.db")).unwrap();

    let mut fsm = StateMachine::load(&store, "default").unwrap();
    fsm.transition(Phase::Abduction, RoleAssignment::new(Role::Abductor, "sess1", "ctx1"), None)
        .unwrap();
    fsm.save(&mut store).unwrap();

    let reloaded = StateMachine::load(&store, "default").unwrap();
    let role = reloaded.state().active_role.clone().unwrap();
    assert_eq!(reloaded.phase(), Phase::Abduction);
    assert_eq!(role.role, Role::Abductor);
    assert_eq!(role.session_id, "sess1");
    assert_eq!(role.context, "ctx1");
}

#[test]
fn test_save_threshold_and_commit() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = SqliteStore::new(dir.path().join("test.db")).unwrap();

    let fsm = StateMachine::new(WorkflowState {
        context_id: "default".to_string(),
        phase: Phase::Deduction,
        active_role: None,
        last_commit: Some("abc123".to_string()),
        assurance_threshold: 0.75,
    });
    fsm.save(&mut store).unwrap();

    let reloaded = StateMachine::load(&store, "default").unwrap();
    assert_eq!(reloaded.phase(), Phase::Deduction);
    assert_eq!(reloaded.state().assurance_threshold, 0.75);
    assert_eq!(reloaded.state().last_commit.as_deref(), Some("abc123"));
}
