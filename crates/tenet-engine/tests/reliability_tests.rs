//! Integration tests for the reliability calculus, audit tree and decay
//!
//! Graphs are built directly in an in-memory store.

use chrono::{Duration, Utc};
use proptest::prelude::*;
use tenet_domain::reliability::ReliabilityParams;
use tenet_domain::traits::ArtifactStore;
use tenet_domain::{
    Artifact, ArtifactId, ArtifactKind, AssuranceLevel, CongruenceLevel, Evidence, Relation,
    Tier, Verdict, Waiver,
};
use tenet_engine::{audit_tree, run_decay, ReliabilityCalculator, ReliabilityError};
use tenet_store::SqliteStore;

const THRESHOLD: f64 = 0.8;

fn store() -> SqliteStore {
    SqliteStore::new(":memory:").unwrap()
}

fn add(store: &mut SqliteStore, id: &str) -> ArtifactId {
    let artifact = Artifact::new(
        ArtifactId::new(id),
        ArtifactKind::System,
        format!("Title {}", id),
        "content".to_string(),
        "default".to_string(),
    );
    store.create_artifact(artifact).unwrap();
    ArtifactId::new(id)
}

fn evidence(store: &mut SqliteStore, id: &ArtifactId, verdict: Verdict, level: AssuranceLevel) -> Evidence {
    let ev = Evidence::new(id.clone(), "test_result", "content", verdict, level, "test-runner");
    store.add_evidence(ev.clone()).unwrap();
    ev
}

fn link(store: &mut SqliteStore, component: &ArtifactId, composite: &ArtifactId, cl: u8) {
    store
        .add_relation(Relation::component_of(component, composite, CongruenceLevel::new(cl).unwrap()))
        .unwrap();
}

fn score(store: &SqliteStore, id: &ArtifactId) -> f64 {
    ReliabilityCalculator::new(store, ReliabilityParams::default(), THRESHOLD, Utc::now())
        .calculate(id)
        .unwrap()
        .score
}

#[test]
fn test_pass_beats_fail_beats_nothing() {
    let mut s = store();
    let passing = add(&mut s, "passing");
    let failing = add(&mut s, "failing");
    let bare = add(&mut s, "bare");
    evidence(&mut s, &passing, Verdict::Pass, AssuranceLevel::L2);
    evidence(&mut s, &failing, Verdict::Fail, AssuranceLevel::L2);

    let (p, f, n) = (score(&s, &passing), score(&s, &failing), score(&s, &bare));
    assert!(p > f);
    assert!(f >= n);
    assert_eq!(p, 1.0);

    let report = ReliabilityCalculator::new(&s, ReliabilityParams::default(), THRESHOLD, Utc::now())
        .calculate(&bare)
        .unwrap();
    assert!(report.factors.iter().any(|f| f == "No valid evidence found"));
    assert!(report.factors.iter().any(|f| f.starts_with("Below assurance threshold")));
}

#[test]
fn test_assurance_weights_mix() {
    let mut s = store();
    let id = add(&mut s, "mixed");
    evidence(&mut s, &id, Verdict::Pass, AssuranceLevel::L2);
    evidence(&mut s, &id, Verdict::Fail, AssuranceLevel::L0);

    // (1.0 * 2.0 + 0.0 * 1.0) / 3.0
    assert!((score(&s, &id) - 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_component_blending_by_congruence() {
    let mut s = store();
    let whole = add(&mut s, "whole");
    let strong = add(&mut s, "strong");
    evidence(&mut s, &whole, Verdict::Pass, AssuranceLevel::L2);
    evidence(&mut s, &strong, Verdict::Fail, AssuranceLevel::L2);

    link(&mut s, &strong, &whole, 3);
    // 0.7 * 1.0 + 0.3 * 0.0
    assert!((score(&s, &whole) - 0.7).abs() < 1e-9);

    link(&mut s, &strong, &whole, 0);
    // CL 0 contributes the local score: neutral
    assert!((score(&s, &whole) - 1.0).abs() < 1e-9);
}

#[test]
fn test_mutual_components_terminate() {
    let mut s = store();
    let a = add(&mut s, "a");
    let b = add(&mut s, "b");
    evidence(&mut s, &a, Verdict::Pass, AssuranceLevel::L2);
    evidence(&mut s, &b, Verdict::Pass, AssuranceLevel::L2);
    link(&mut s, &a, &b, 3);
    link(&mut s, &b, &a, 3);

    let mut calc = ReliabilityCalculator::new(&s, ReliabilityParams::default(), THRESHOLD, Utc::now());
    let seen = calc.trace(&a).unwrap();
    assert!((0.0..=1.0).contains(&seen[&a].score));
    assert!(seen[&b].factors.iter().any(|f| f.contains("Cycle detected at component a")));
    assert!(calc.cached(&b).is_none());

    // Self loop
    link(&mut s, &a, &a, 3);
    let report = ReliabilityCalculator::new(&s, ReliabilityParams::default(), THRESHOLD, Utc::now())
        .calculate(&a)
        .unwrap();
    assert!(report.factors.iter().any(|f| f.contains("Cycle detected at component a")));
}

#[test]
fn test_cyclic_scores_do_not_depend_on_visit_order() {
    let mut s = store();
    let a = add(&mut s, "a");
    let b = add(&mut s, "b");
    evidence(&mut s, &a, Verdict::Pass, AssuranceLevel::L2);
    evidence(&mut s, &b, Verdict::Fail, AssuranceLevel::L2);
    link(&mut s, &a, &b, 3);
    link(&mut s, &b, &a, 3);

    let fresh_b = score(&s, &b);
    // 0.7 * 0.0 + 0.3 * 1.0
    assert!((fresh_b - 0.3).abs() < 1e-9);

    let mut shared = ReliabilityCalculator::new(&s, ReliabilityParams::default(), THRESHOLD, Utc::now());
    let a_first = shared.calculate(&a).unwrap().score;
    assert_eq!(shared.calculate(&b).unwrap().score, fresh_b);
    assert_eq!(shared.calculate(&a).unwrap().score, a_first);
    assert_eq!(score(&s, &a), a_first);

    run_decay(&mut s, &ReliabilityParams::default(), THRESHOLD, Utc::now(), false).unwrap();
    for id in [&a, &b] {
        let cached = s.get_artifact(id).unwrap().unwrap().cached_reliability;
        assert_eq!(cached, score(&s, id));
    }
}

#[test]
fn test_waiver_restores_expired_evidence() {
    let mut s = store();
    let id = add(&mut s, "waived");
    let now = Utc::now();

    let ev = Evidence::new(id.clone(), "test_result", "green", Verdict::Fail, AssuranceLevel::L2, "ci")
        .with_valid_until(Some(now - Duration::days(1)));
    s.add_evidence(ev.clone()).unwrap();

    let before = ReliabilityCalculator::new(&s, ReliabilityParams::default(), THRESHOLD, now)
        .calculate(&id)
        .unwrap();
    assert_eq!(before.score, 0.0);
    assert!(before.factors.iter().any(|f| f.contains("expired")));

    s.add_waiver(Waiver::new(&ev.id, "lead", now + Duration::days(7), "known flake"))
        .unwrap();

    let after = ReliabilityCalculator::new(&s, ReliabilityParams::default(), THRESHOLD, now)
        .calculate(&id)
        .unwrap();
    // A waiver counts the evidence as a pass whatever its verdict
    assert_eq!(after.score, 1.0);
    assert!(after.factors.iter().any(|f| f.contains("waived by lead")));
}

#[test]
fn test_waived_expired_evidence_scores_as_if_live() {
    let now = Utc::now();

    let live = {
        let mut s = store();
        let id = add(&mut s, "target");
        evidence(&mut s, &id, Verdict::Pass, AssuranceLevel::L1);
        evidence(&mut s, &id, Verdict::Fail, AssuranceLevel::L0);
        ReliabilityCalculator::new(&s, ReliabilityParams::default(), THRESHOLD, now)
            .calculate(&id)
            .unwrap()
            .score
    };
    // (1.0 * 1.5 + 0.0 * 1.0) / 2.5
    assert!((live - 0.6).abs() < 1e-9);

    let mut s = store();
    let id = add(&mut s, "target");
    let stale = Evidence::new(id.clone(), "test_result", "green", Verdict::Pass, AssuranceLevel::L1, "ci")
        .with_valid_until(Some(now - Duration::days(3)));
    s.add_evidence(stale.clone()).unwrap();
    evidence(&mut s, &id, Verdict::Fail, AssuranceLevel::L0);

    let expired = ReliabilityCalculator::new(&s, ReliabilityParams::default(), THRESHOLD, now)
        .calculate(&id)
        .unwrap()
        .score;
    assert_eq!(expired, 0.0);

    s.add_waiver(Waiver::new(&stale.id, "lead", now + Duration::days(1), "rerun scheduled"))
        .unwrap();
    let waived = ReliabilityCalculator::new(&s, ReliabilityParams::default(), THRESHOLD, now)
        .calculate(&id)
        .unwrap()
        .score;
    assert!((waived - live).abs() < 1e-9);
}

#[test]
fn test_invalid_artifacts_score_zero() {
    let mut s = store();
    let id = add(&mut s, "refuted");
    evidence(&mut s, &id, Verdict::Pass, AssuranceLevel::L2);
    s.set_artifact_tier(&id, Tier::Invalid).unwrap();

    let report = ReliabilityCalculator::new(&s, ReliabilityParams::default(), THRESHOLD, Utc::now())
        .calculate(&id)
        .unwrap();
    assert_eq!(report.score, 0.0);
    assert!(report.factors.iter().any(|f| f == "Artifact is invalid"));
}

#[test]
fn test_missing_component_is_cut() {
    let mut s = store();
    let top = add(&mut s, "top");
    let mid = add(&mut s, "mid");
    evidence(&mut s, &top, Verdict::Pass, AssuranceLevel::L2);
    evidence(&mut s, &mid, Verdict::Pass, AssuranceLevel::L2);
    link(&mut s, &mid, &top, 3);
    link(&mut s, &ArtifactId::new("ghost"), &mid, 3);

    let mut calc = ReliabilityCalculator::new(&s, ReliabilityParams::default(), THRESHOLD, Utc::now());
    let report = calc.calculate(&top).unwrap();
    assert!((report.score - 1.0).abs() < 1e-9);

    let inner = calc.cached(&mid).unwrap();
    assert_eq!(inner.score, 1.0);
    assert!(inner
        .factors
        .contains(&"Component ghost not found; contribution ignored".to_string()));
    assert!(calc.is_missing(&ArtifactId::new("ghost")));

    let err = calc.calculate(&ArtifactId::new("ghost")).unwrap_err();
    assert_eq!(err, ReliabilityError::MissingArtifact("ghost".to_string()));
}

#[test]
fn test_deep_chains_are_cut_at_the_bound() {
    let mut s = store();
    let ids: Vec<ArtifactId> = (0..70).map(|i| add(&mut s, &format!("c{}", i))).collect();
    for (i, id) in ids.iter().enumerate() {
        evidence(&mut s, id, Verdict::Pass, AssuranceLevel::L2);
        if i > 0 {
            link(&mut s, id, &ids[i - 1], 3);
        }
    }

    let mut calc = ReliabilityCalculator::new(&s, ReliabilityParams::default(), THRESHOLD, Utc::now());
    let seen = calc.trace(&ids[0]).unwrap();
    assert!((seen[&ids[0]].score - 1.0).abs() < 1e-9);
    assert!(seen[&ids[64]]
        .factors
        .contains(&"Depth bound 64 reached at component c65; contribution ignored".to_string()));

    let params = ReliabilityParams {
        max_depth: 2,
        ..ReliabilityParams::default()
    };
    let mut calc = ReliabilityCalculator::new(&s, params, THRESHOLD, Utc::now());
    let tree = audit_tree::render(&mut calc, &ids[0]).unwrap();
    assert!(tree.contains("      [c3] (not scored)"));
}

#[test]
fn test_audit_tree_annotations() {
    let mut s = store();
    let a = add(&mut s, "a");
    let b = add(&mut s, "b");
    evidence(&mut s, &a, Verdict::Pass, AssuranceLevel::L2);
    link(&mut s, &b, &a, 2);
    link(&mut s, &a, &b, 3);

    let mut calc = ReliabilityCalculator::new(&s, ReliabilityParams::default(), THRESHOLD, Utc::now());
    let tree = audit_tree::render(&mut calc, &a).unwrap();
    let lines: Vec<&str> = tree.lines().collect();

    assert!(lines[0].starts_with("[a R:"));
    assert!(lines[0].ends_with("] Title a"));
    assert!(lines.contains(&"  --(CL:2)-->"));
    assert!(lines.iter().any(|l| l.starts_with("  [b R:")));
    assert!(lines.contains(&"    ! No valid evidence found"));
    assert!(lines.contains(&"    --(CL:3)-->"));
    assert!(lines.contains(&"    [a] (cycle, not expanded)"));
}

#[test]
fn test_audit_tree_renders_missing_components_inline() {
    let mut s = store();
    let top = add(&mut s, "top");
    let mid = add(&mut s, "mid");
    evidence(&mut s, &top, Verdict::Pass, AssuranceLevel::L2);
    evidence(&mut s, &mid, Verdict::Pass, AssuranceLevel::L2);
    link(&mut s, &mid, &top, 3);
    link(&mut s, &ArtifactId::new("ghost"), &mid, 3);

    let mut calc = ReliabilityCalculator::new(&s, ReliabilityParams::default(), THRESHOLD, Utc::now());
    let tree = audit_tree::render(&mut calc, &top).unwrap();
    let lines: Vec<&str> = tree.lines().collect();

    assert_eq!(lines[0], "[top R:1.00] Title top");
    assert!(lines.contains(&"  [mid R:1.00] Title mid"));
    assert!(lines.contains(&"    ! Component ghost not found; contribution ignored"));
    assert!(lines.contains(&"    --(CL:3)-->"));
    assert!(lines.contains(&"    [ghost] (not found)"));

    let err = audit_tree::render(&mut calc, &ArtifactId::new("ghost")).unwrap_err();
    assert_eq!(err, ReliabilityError::MissingArtifact("ghost".to_string()));
}

#[test]
fn test_decay_scores_across_broken_edges() {
    let mut s = store();
    let top = add(&mut s, "top");
    let mid = add(&mut s, "mid");
    evidence(&mut s, &top, Verdict::Pass, AssuranceLevel::L2);
    evidence(&mut s, &mid, Verdict::Pass, AssuranceLevel::L2);
    link(&mut s, &mid, &top, 3);
    link(&mut s, &ArtifactId::new("ghost"), &mid, 3);

    let report = run_decay(&mut s, &ReliabilityParams::default(), THRESHOLD, Utc::now(), false).unwrap();
    assert_eq!(report.scored.len(), 2);
    assert!(report.skipped.is_empty());
    assert!(report.persisted);

    for id in [&top, &mid] {
        let cached = s.get_artifact(id).unwrap().unwrap().cached_reliability;
        assert!((cached - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_dry_run_decay_leaves_cache() {
    let mut s = store();
    let id = add(&mut s, "quiet");
    evidence(&mut s, &id, Verdict::Pass, AssuranceLevel::L2);

    let report = run_decay(&mut s, &ReliabilityParams::default(), THRESHOLD, Utc::now(), true).unwrap();
    assert_eq!(report.scored.len(), 1);
    assert!(!report.persisted);
    assert!(report.summary().contains("Dry run"));
    assert_eq!(s.get_artifact(&id).unwrap().unwrap().cached_reliability, 0.0);
}

fn verdict() -> impl Strategy<Value = Verdict> {
    prop_oneof![Just(Verdict::Pass), Just(Verdict::Fail), Just(Verdict::Refine)]
}

fn level() -> impl Strategy<Value = AssuranceLevel> {
    prop_oneof![Just(AssuranceLevel::L0), Just(AssuranceLevel::L1), Just(AssuranceLevel::L2)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: any evidence mix over any component fan-in scores within [0, 1]
    #[test]
    fn test_scores_are_bounded(
        root_ev in prop::collection::vec((verdict(), level()), 0..5),
        children in prop::collection::vec((prop::collection::vec((verdict(), level()), 0..4), 0u8..=3), 0..4),
    ) {
        let mut s = store();
        let root = add(&mut s, "root");
        for (v, l) in root_ev {
            evidence(&mut s, &root, v, l);
        }
        for (i, (evs, cl)) in children.into_iter().enumerate() {
            let child = add(&mut s, &format!("child-{}", i));
            for (v, l) in evs {
                evidence(&mut s, &child, v, l);
            }
            link(&mut s, &child, &root, cl);
        }

        let score = score(&s, &root);
        prop_assert!((0.0..=1.0).contains(&score));
    }
}
