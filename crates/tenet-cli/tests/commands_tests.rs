//! End-to-end tests for the CLI commands against a temporary project

use tenet_cli::cli::{ArtifactArgs, DecayArgs, LogArgs, WaiveArgs};
use tenet_cli::commands;
use tenet_cli::{CliError, CliFormat, Formatter};
use tenet_domain::traits::ArtifactStore;
use tenet_domain::ArtifactId;
use tenet_engine::{Command, Engine};

fn text() -> Formatter {
    Formatter::new(CliFormat::Text, false)
}

/// Initialized project with one verified hypothesis
fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    commands::execute_init(dir.path(), &text()).unwrap();

    let mut engine = Engine::open(dir.path()).unwrap();
    engine
        .execute(Command::Propose {
            title: "Cache the index".to_string(),
            content: "Keep it in memory".to_string(),
            scope: "search".to_string(),
            kind: "system".to_string(),
            rationale: String::new(),
        })
        .unwrap();
    engine
        .execute(Command::Verify {
            hypothesis_id: "cache-the-index".to_string(),
            checks: "consistent with invariants".to_string(),
            verdict: "PASS".to_string(),
        })
        .unwrap();
    dir
}

#[test]
fn test_status_before_and_after_init() {
    let dir = tempfile::tempdir().unwrap();
    let out = commands::execute_status(dir.path(), &text()).unwrap();
    assert!(out.contains("Phase: IDLE"));
    assert!(out.contains("run `tenet init`"));

    commands::execute_init(dir.path(), &text()).unwrap();
    let out = commands::execute_status(dir.path(), &text()).unwrap();
    assert!(out.contains("Phase: ABDUCTION"));
    assert!(!out.contains("tenet init"));
}

#[test]
fn test_reliability_and_tree() {
    let dir = project();

    let out = commands::execute_reliability(
        ArtifactArgs {
            id: "cache-the-index".to_string(),
        },
        dir.path(),
        &text(),
    )
    .unwrap();
    assert!(out.contains("cache-the-index"));

    let engine = Engine::open(dir.path()).unwrap();
    let cached = engine
        .store()
        .get_artifact(&ArtifactId::new("cache-the-index"))
        .unwrap()
        .unwrap()
        .cached_reliability;
    assert_eq!(cached, 1.0);

    let tree = commands::execute_tree(
        ArtifactArgs {
            id: "cache-the-index".to_string(),
        },
        dir.path(),
        &text(),
    )
    .unwrap();
    assert!(tree.starts_with("[cache-the-index R:1.00] Cache the index"));
}

#[test]
fn test_decay_dry_run_leaves_scores() {
    let dir = project();

    let out = commands::execute_decay(DecayArgs { dry_run: true }, dir.path(), &text()).unwrap();
    assert!(out.contains("Dry run: 1 artifacts scored"));

    let engine = Engine::open(dir.path()).unwrap();
    let cached = engine
        .store()
        .get_artifact(&ArtifactId::new("cache-the-index"))
        .unwrap()
        .unwrap()
        .cached_reliability;
    assert_eq!(cached, 0.0);

    let out = commands::execute_decay(DecayArgs { dry_run: false }, dir.path(), &text()).unwrap();
    assert!(out.contains("Decay update complete. Processed 1 artifacts"));
}

#[test]
fn test_waive_rejects_unknown_evidence() {
    let dir = project();

    let err = commands::execute_waive(
        WaiveArgs {
            evidence_id: "missing".to_string(),
            by: "lead".to_string(),
            until: "2999-01-01".to_string(),
            rationale: "flaky".to_string(),
        },
        dir.path(),
        &text(),
    )
    .unwrap_err();
    assert!(matches!(err, CliError::Engine(_)));
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_log_lists_recent_actions() {
    let dir = project();

    let out = commands::execute_log(LogArgs { limit: 10 }, dir.path(), &Formatter::new(CliFormat::Json, false))
        .unwrap();
    let entries: serde_json::Value = serde_json::from_str(&out).unwrap();
    let actions: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["verify", "propose", "init"]);

    let err = commands::execute_log(LogArgs { limit: 0 }, dir.path(), &text()).unwrap_err();
    assert!(matches!(err, CliError::InvalidInput(_)));
}

#[test]
fn test_actualize_without_git() {
    let dir = project();
    let out = commands::execute_actualize(dir.path(), &text()).unwrap();
    assert!(!out.is_empty());
}
