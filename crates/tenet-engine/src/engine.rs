//! Command execution
//!
//! Every command follows the same pipeline: load the workflow state,
//! check preconditions, authorize through the state machine, perform the
//! operation, save the state, and append an audit entry.

use crate::audit_tree;
use crate::command::Command;
use crate::config::TenetConfig;
use crate::decay::run_decay;
use crate::journal::Journal;
use crate::preconditions as pre;
use crate::promotion::{apply_evidence, EvidenceInput, PromotionOutcome, TierEffect};
use crate::reconcile::reconcile;
use crate::reliability::ReliabilityCalculator;
use crate::{EngineError, PreconditionError};
use chrono::Utc;
use std::fmt::Display;
use std::path::PathBuf;
use std::time::Instant;
use tenet_domain::traits::{ArtifactQuery, ArtifactStore};
use tenet_domain::{
    parse_validity_date, Artifact, ArtifactId, ArtifactKind, AssuranceLevel, AuditLogEntry,
    AuditResult, CongruenceLevel, Phase, Relation, Role, RoleAssignment, Tier, Verdict, Waiver,
};
use tenet_gatekeeper::{EvidenceStub, StateMachine};
use tenet_store::SqliteStore;

/// Executes commands against one context of a project
pub struct Engine<S: ArtifactStore> {
    store: S,
    journal: Journal,
    config: TenetConfig,
    session_id: String,
}

impl Engine<SqliteStore> {
    /// Open the project rooted at `root` with its SQLite database
    ///
    /// Creates `.tenet/` if needed; the full layout is created by `init`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, EngineError> {
        let journal = Journal::new(root);
        let config = TenetConfig::load(&journal.config_path())?;
        std::fs::create_dir_all(journal.dir())?;

        let store =
            SqliteStore::new(journal.db_path()).map_err(|e| EngineError::Store(e.to_string()))?;
        Ok(Self::new(store, journal, config))
    }
}

impl<S: ArtifactStore> Engine<S>
where
    S::Error: Display,
{
    /// Create an engine over an existing store
    pub fn new(store: S, journal: Journal, config: TenetConfig) -> Self {
        Self {
            store,
            journal,
            config,
            session_id: uuid::Uuid::now_v7().to_string(),
        }
    }

    /// Underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Project journal
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Loaded configuration
    pub fn config(&self) -> &TenetConfig {
        &self.config
    }

    /// Context this engine works on
    pub fn context_id(&self) -> &str {
        &self.config.engine.context_id
    }

    /// Session identifier recorded in role assignments
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Execute a command and record it in the audit log
    pub fn execute(&mut self, command: Command) -> Result<String, EngineError> {
        let started = Instant::now();
        let action = command.name();
        let operation = command.operation();
        let target = command.target().map(str::to_string);
        let fingerprint = command.fingerprint();

        tracing::debug!(action, target = ?target, "executing command");
        let result = self.dispatch(command);

        let actor = self
            .store
            .load_workflow_state(self.context_id())
            .map(|s| s.actor().to_string())
            .unwrap_or_else(|_| "System".to_string());

        let (audit_result, details) = match &result {
            Ok(_) => (
                AuditResult::Success,
                format!("duration_ms={}", started.elapsed().as_millis()),
            ),
            Err(e) => (AuditResult::Failure, e.to_string()),
        };

        let entry = AuditLogEntry::new(
            action,
            operation,
            actor,
            target,
            fingerprint,
            audit_result,
            Some(details),
            self.context_id(),
        );

        if let Err(e) = self.store.append_audit_log(entry) {
            tracing::warn!(action, error = %e, "failed to append audit entry");
            return match result {
                Ok(_) => Err(EngineError::Store(format!("audit log append failed: {}", e))),
                Err(original) => Err(original),
            };
        }

        match &result {
            Ok(_) => tracing::info!(action, "command succeeded"),
            Err(e) => tracing::warn!(action, error = %e, "command failed"),
        }
        result
    }

    fn dispatch(&mut self, command: Command) -> Result<String, EngineError> {
        match command {
            Command::Status => self.status(),
            Command::Init => self.init(),
            Command::RecordContext {
                vocabulary,
                invariants,
            } => self.record_context(&vocabulary, &invariants),
            Command::Propose {
                title,
                content,
                scope,
                kind,
                rationale,
            } => self.propose(&title, &content, &scope, &kind, &rationale),
            Command::Verify {
                hypothesis_id,
                checks,
                verdict,
            } => self.verify(&hypothesis_id, &checks, &verdict),
            Command::Test {
                hypothesis_id,
                test_type,
                result,
                verdict,
            } => self.test(&hypothesis_id, &test_type, &result, &verdict),
            Command::Audit {
                hypothesis_id,
                risks,
            } => self.audit(&hypothesis_id, &risks),
            Command::AddEvidence {
                target_id,
                evidence_type,
                content,
                verdict,
                assurance_level,
                carrier_ref,
                valid_until,
            } => self.add_evidence(
                &target_id,
                &evidence_type,
                &content,
                &verdict,
                &assurance_level,
                carrier_ref,
                valid_until,
            ),
            Command::CheckEvidence { target_id } => self.check_evidence(&target_id),
            Command::Loopback {
                parent_id,
                insight,
                new_title,
                new_content,
                scope,
            } => self.loopback(&parent_id, &insight, &new_title, &new_content, &scope),
            Command::Decide {
                title,
                winner_id,
                context,
                decision,
                rationale,
                consequences,
                characteristics,
            } => self.decide(DecisionRecord {
                title,
                winner_id,
                context,
                decision,
                rationale,
                consequences,
                characteristics,
            }),
            Command::Waive {
                evidence_id,
                waived_by,
                until,
                rationale,
            } => self.waive(&evidence_id, &waived_by, &until, &rationale),
            Command::CalculateReliability { artifact_id } => self.calculate_reliability(&artifact_id),
            Command::AuditTree { artifact_id } => self.audit_tree(&artifact_id),
            Command::Decay => self.decay(),
            Command::Actualize => self.actualize(),
            Command::Link {
                component_id,
                composite_id,
                congruence,
            } => self.link(&component_id, &composite_id, congruence),
        }
    }

    fn load_fsm(&self) -> Result<StateMachine, EngineError> {
        Ok(StateMachine::load(&self.store, self.context_id())?)
    }

    fn role(&self, role: Role, action: &str) -> RoleAssignment {
        RoleAssignment::new(role, self.session_id.as_str(), action)
    }

    fn status(&mut self) -> Result<String, EngineError> {
        let state = self
            .store
            .load_workflow_state(self.context_id())
            .map_err(|e| EngineError::Store(e.to_string()))?;

        let role = match &state.active_role {
            Some(r) => format!("{} (session {})", r.role, r.session_id),
            None => "none".to_string(),
        };

        let mut counts = Vec::with_capacity(Tier::ALL.len());
        for tier in Tier::ALL {
            let n = self
                .store
                .query_artifacts(&ArtifactQuery::in_tier(self.context_id(), tier))
                .map_err(|e| EngineError::Store(e.to_string()))?
                .len();
            counts.push(format!("{}={}", tier, n));
        }

        Ok(format!(
            "Context: {}\nPhase: {}\nRole: {}\nAssurance threshold: {:.2}\nLast commit: {}\nArtifacts: {}\n",
            state.context_id,
            state.phase,
            role,
            state.assurance_threshold,
            state.last_commit.as_deref().unwrap_or("none"),
            counts.join(" ")
        ))
    }

    fn init(&mut self) -> Result<String, EngineError> {
        self.journal.init_layout()?;

        let config_path = self.journal.config_path();
        if !config_path.exists() {
            std::fs::write(&config_path, self.config.to_toml()?)?;
        }

        let mut fsm = self.load_fsm()?;
        fsm.state_mut().assurance_threshold = self.config.engine.assurance_threshold;
        if fsm.phase() == Phase::Idle {
            fsm.transition(Phase::Abduction, self.role(Role::Abductor, "init"), None)?;
        }
        fsm.save(&mut self.store)?;

        Ok(format!(
            "Initialized Tenet project at {}\nPhase: {}",
            self.journal.dir().display(),
            fsm.phase()
        ))
    }

    fn record_context(&mut self, vocabulary: &str, invariants: &str) -> Result<String, EngineError> {
        let path = self.journal.write_context(vocabulary, invariants)?;
        Ok(format!("Context recorded at {}", path.display()))
    }

    fn propose(
        &mut self,
        title: &str,
        content: &str,
        scope: &str,
        kind: &str,
        rationale: &str,
    ) -> Result<String, EngineError> {
        const OP: &str = "propose";
        pre::non_empty(OP, "title", title)?;
        pre::non_empty(OP, "content", content)?;
        let kind = pre::hypothesis_kind(OP, kind)?;
        let id = self.fresh_id(OP, title)?;

        let mut fsm = self.load_fsm()?;
        fsm.authorize(Phase::Abduction, self.role(Role::Abductor, OP), None)?;

        let artifact = Artifact::new(
            id.clone(),
            kind,
            title.to_string(),
            content.to_string(),
            self.context_id().to_string(),
        )
        .with_scope(scope);

        self.store
            .create_artifact(artifact.clone())
            .map_err(|e| EngineError::Store(e.to_string()))?;
        fsm.save(&mut self.store)?;

        let location = match self.journal.write_artifact(&artifact, rationale) {
            Ok(path) => path.display().to_string(),
            Err(e) => {
                tracing::warn!(artifact = %id, error = %e, "failed to journal hypothesis");
                "not journaled".to_string()
            }
        };

        Ok(format!("Hypothesis {} proposed at L0 ({})", id, location))
    }

    fn verify(&mut self, id: &str, checks: &str, verdict: &str) -> Result<String, EngineError> {
        const OP: &str = "verify";
        let artifact = pre::artifact(&self.store, OP, id)?;
        let verdict = pre::verdict(OP, verdict)?;
        pre::tier_in(
            OP,
            &artifact,
            &[Tier::L0],
            "Only L0 hypotheses can be verified; propose a new hypothesis instead",
        )?;

        let mut fsm = self.load_fsm()?;
        let stub = EvidenceStub::new(self.journal.knowledge_dir(Tier::L0), "directory");
        fsm.authorize(Phase::Deduction, self.role(Role::Deductor, OP), Some(&stub))?;

        let outcome = apply_evidence(
            &mut self.store,
            OP,
            Phase::Deduction,
            EvidenceInput {
                artifact_id: artifact.id,
                evidence_type: "verification".to_string(),
                content: format!("Verification Checks:\n{}", checks),
                verdict,
                assurance_level: AssuranceLevel::L1,
                carrier_ref: "internal-logic".to_string(),
                valid_until: None,
            },
        )?;
        fsm.save(&mut self.store)?;

        self.journal_outcome(&outcome);
        Ok(outcome.message())
    }

    fn test(
        &mut self,
        id: &str,
        test_type: &str,
        result: &str,
        verdict: &str,
    ) -> Result<String, EngineError> {
        const OP: &str = "test";
        let artifact = pre::artifact(&self.store, OP, id)?;
        let verdict = pre::verdict(OP, verdict)?;
        if artifact.tier == Tier::L0 {
            return Err(PreconditionError::new(
                OP,
                format!("hypothesis '{}' is still in L0", id),
                "Run verify to promote it to L1 before testing",
            )
            .into());
        }
        pre::tier_in(
            OP,
            &artifact,
            &[Tier::L1, Tier::L2],
            "Only L1 hypotheses can be tested (L2 can be tested to refresh evidence)",
        )?;

        let mut fsm = self.load_fsm()?;
        let stub = EvidenceStub::new(self.journal.artifact_path(&artifact.id, artifact.tier), "artifact");
        fsm.authorize(Phase::Induction, self.role(Role::Inductor, OP), Some(&stub))?;

        let assurance_level = if verdict == Verdict::Pass {
            AssuranceLevel::L2
        } else {
            AssuranceLevel::L1
        };
        let evidence_type = if test_type.trim().is_empty() {
            "test_result"
        } else {
            test_type
        };

        let outcome = apply_evidence(
            &mut self.store,
            OP,
            Phase::Induction,
            EvidenceInput {
                artifact_id: artifact.id,
                evidence_type: evidence_type.to_string(),
                content: result.to_string(),
                verdict,
                assurance_level,
                carrier_ref: "test-runner".to_string(),
                valid_until: None,
            },
        )?;
        fsm.save(&mut self.store)?;

        self.journal_outcome(&outcome);
        Ok(outcome.message())
    }

    fn audit(&mut self, id: &str, risks: &str) -> Result<String, EngineError> {
        const OP: &str = "audit";
        let artifact = pre::artifact(&self.store, OP, id)?;
        pre::tier_in(
            OP,
            &artifact,
            &[Tier::L2],
            "Only L2 hypotheses can be audited; test it first",
        )?;

        let mut fsm = self.load_fsm()?;
        let stub = EvidenceStub::new(self.journal.artifact_path(&artifact.id, Tier::L2), "artifact");
        fsm.authorize(Phase::Decision, self.role(Role::Auditor, OP), Some(&stub))?;

        let outcome = apply_evidence(
            &mut self.store,
            OP,
            Phase::Decision,
            EvidenceInput {
                artifact_id: artifact.id.clone(),
                evidence_type: "audit_report".to_string(),
                content: risks.to_string(),
                verdict: Verdict::Pass,
                assurance_level: AssuranceLevel::L2,
                carrier_ref: "auditor".to_string(),
                valid_until: None,
            },
        )?;
        fsm.save(&mut self.store)?;

        self.journal_outcome(&outcome);
        Ok(format!("Audit recorded for {}", artifact.id))
    }

    #[allow(clippy::too_many_arguments)]
    fn add_evidence(
        &mut self,
        id: &str,
        evidence_type: &str,
        content: &str,
        verdict: &str,
        assurance_level: &str,
        carrier_ref: Option<String>,
        valid_until: Option<String>,
    ) -> Result<String, EngineError> {
        const OP: &str = "add_evidence";
        let artifact = pre::artifact(&self.store, OP, id)?;
        pre::non_empty(OP, "evidence type", evidence_type)?;
        let verdict = pre::verdict(OP, verdict)?;
        let assurance_level = pre::assurance(OP, assurance_level)?;

        let valid_until = valid_until.as_deref().and_then(|s| {
            let parsed = parse_validity_date(s);
            if parsed.is_none() {
                tracing::debug!(value = s, "unparsable validity date, treating as no deadline");
            }
            parsed
        });

        let mut fsm = self.load_fsm()?;
        let phase = fsm.phase();
        if let Some(active) = fsm.state().active_role.clone() {
            fsm.authorize(phase, self.role(active.role, OP), None)?;
        }

        let outcome = apply_evidence(
            &mut self.store,
            OP,
            phase,
            EvidenceInput {
                artifact_id: artifact.id,
                evidence_type: evidence_type.to_string(),
                content: content.to_string(),
                verdict,
                assurance_level,
                carrier_ref: carrier_ref
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| "manual".to_string()),
                valid_until,
            },
        )?;
        fsm.save(&mut self.store)?;

        self.journal_outcome(&outcome);
        Ok(format!("{} (evidence {})", outcome.message(), outcome.evidence.id))
    }

    fn check_evidence(&mut self, id: &str) -> Result<String, EngineError> {
        let artifact = pre::artifact(&self.store, "check_evidence", id)?;
        let evidence = self
            .store
            .get_evidence(&artifact.id)
            .map_err(|e| EngineError::Store(e.to_string()))?;

        if evidence.is_empty() {
            return Ok(format!("No evidence found for {}", artifact.id));
        }

        let now = Utc::now();
        let mut out = String::new();
        for ev in &evidence {
            let expired = if ev.is_expired(now) { " [expired]" } else { "" };
            out.push_str(&format!(
                "- [{}] {} (L:{}, Ref:{}){}: {} ({})\n",
                ev.verdict, ev.evidence_type, ev.assurance_level, ev.carrier_ref, expired, ev.content, ev.id
            ));
        }
        Ok(out)
    }

    fn loopback(
        &mut self,
        parent_id: &str,
        insight: &str,
        new_title: &str,
        new_content: &str,
        scope: &str,
    ) -> Result<String, EngineError> {
        const OP: &str = "loopback";
        let parent = pre::artifact(&self.store, OP, parent_id)?;
        pre::non_empty(OP, "insight", insight)?;
        pre::non_empty(OP, "new title", new_title)?;
        pre::non_empty(OP, "new content", new_content)?;
        let child_id = self.fresh_id(OP, new_title)?;

        let mut fsm = self.load_fsm()?;
        let deductor = self.role(Role::Deductor, OP);
        let from_induction = match fsm.phase() {
            Phase::Deduction => {
                pre::tier_in(OP, &parent, &[Tier::L0], "Loopback from DEDUCTION applies to L0 hypotheses")?;
                fsm.authorize(Phase::Deduction, deductor.clone(), None)?;
                false
            }
            Phase::Induction => {
                pre::tier_in(OP, &parent, &[Tier::L1], "Loopback from INDUCTION applies to L1 hypotheses")?;
                fsm.check_route(Phase::Deduction, &deductor)?;
                true
            }
            other => {
                return Err(PreconditionError::new(
                    OP,
                    format!("loopback not applicable from phase {}", other),
                    "Loopback is available during DEDUCTION or INDUCTION",
                )
                .into())
            }
        };

        self.store
            .set_artifact_tier(&parent.id, Tier::Invalid)
            .map_err(|e| EngineError::Store(e.to_string()))?;

        let child = Artifact::new(
            child_id.clone(),
            ArtifactKind::System,
            new_title.to_string(),
            new_content.to_string(),
            self.context_id().to_string(),
        )
        .with_scope(scope);

        self.store
            .create_artifact(child.clone())
            .map_err(|e| inconsistent("create replacement", "invalidate parent", e))?;

        if let Err(e) = self.journal.move_artifact(&parent.id, parent.tier, Tier::Invalid) {
            tracing::warn!(artifact = %parent.id, error = %e, "failed to move parent in journal");
        }
        let rationale = serde_json::json!({
            "source": "loopback",
            "parent_id": parent.id.as_str(),
            "insight": insight,
        })
        .to_string();
        let child_path = self.journal.write_artifact(&child, &rationale);
        if let Err(e) = &child_path {
            tracing::warn!(artifact = %child_id, error = %e, "failed to journal replacement");
        }
        if let Err(e) = self.journal.write_loopback(&parent.id, insight, &child_id) {
            tracing::warn!(artifact = %child_id, error = %e, "failed to journal loopback event");
        }

        if from_induction {
            let stub = EvidenceStub::new(self.journal.knowledge_dir(Tier::L0), "directory");
            fsm.transition(Phase::Deduction, deductor, Some(&stub))
                .map_err(|e| inconsistent("phase transition", "invalidate parent, create replacement", e))?;
        }
        fsm.save(&mut self.store)
            .map_err(|e| inconsistent("save workflow state", "invalidate parent, create replacement", e))?;

        Ok(format!(
            "Hypothesis {} moved to invalid; replacement {} proposed at L0{}",
            parent.id,
            child_id,
            child_path
                .map(|p| format!(" ({})", p.display()))
                .unwrap_or_default()
        ))
    }

    fn decide(&mut self, record: DecisionRecord) -> Result<String, EngineError> {
        const OP: &str = "decide";
        pre::non_empty(OP, "title", &record.title)?;
        pre::non_empty(OP, "winner_id", &record.winner_id)?;
        let winner = pre::artifact(&self.store, OP, &record.winner_id)?;
        let validated = pre::any_validated(&self.store, OP, self.context_id())?;
        let l2_id = if winner.tier == Tier::L2 { &winner.id } else { &validated.id };

        let mut fsm = self.load_fsm()?;
        let stub = EvidenceStub::new(self.journal.artifact_path(l2_id, Tier::L2), "artifact");
        fsm.authorize(Phase::Decision, self.role(Role::Decider, OP), Some(&stub))?;

        let path = self.journal.write_decision(&record.title, &record.render())?;
        let mut out = format!("Decision recorded at {}\n", path.display());

        match winner.tier {
            Tier::L1 => match self.store.set_artifact_tier(&winner.id, Tier::L2) {
                Ok(()) => {
                    if let Err(e) = self.journal.move_artifact(&winner.id, Tier::L1, Tier::L2) {
                        tracing::warn!(artifact = %winner.id, error = %e, "failed to move winner in journal");
                    }
                    out.push_str(&format!("Winner {} promoted to L2\n", winner.id));
                }
                Err(e) => {
                    tracing::warn!(artifact = %winner.id, error = %e, "failed to promote winner");
                    out.push_str(&format!("Warning: failed to promote winner {}: {}\n", winner.id, e));
                }
            },
            Tier::L2 => {}
            other => {
                tracing::warn!(artifact = %winner.id, tier = %other, "winner not promotable");
                out.push_str(&format!(
                    "Warning: winner {} is in {}, not promoted\n",
                    winner.id, other
                ));
            }
        }

        fsm.transition(Phase::Idle, self.role(Role::Decider, OP), None)?;
        fsm.save(&mut self.store)?;
        out.push_str("Cycle closed; phase is IDLE");
        Ok(out)
    }

    fn waive(
        &mut self,
        evidence_id: &str,
        waived_by: &str,
        until: &str,
        rationale: &str,
    ) -> Result<String, EngineError> {
        const OP: &str = "waive";
        pre::non_empty(OP, "evidence ID", evidence_id)?;
        pre::non_empty(OP, "waived_by", waived_by)?;
        pre::non_empty(OP, "rationale", rationale)?;

        let evidence = self
            .store
            .get_evidence_by_id(evidence_id)
            .map_err(|e| EngineError::Store(e.to_string()))?;
        if evidence.is_none() {
            return Err(PreconditionError::new(
                OP,
                format!("evidence '{}' not found", evidence_id),
                "Use check_evidence to list evidence IDs",
            )
            .into());
        }

        let expires_at = parse_validity_date(until).ok_or_else(|| {
            PreconditionError::new(
                OP,
                format!("invalid waiver deadline '{}'", until),
                "Use RFC3339 or YYYY-MM-DD",
            )
        })?;
        if expires_at <= Utc::now() {
            return Err(PreconditionError::new(
                OP,
                format!("waiver deadline {} is in the past", until),
                "Choose a deadline in the future",
            )
            .into());
        }

        self.store
            .add_waiver(Waiver::new(evidence_id, waived_by, expires_at, rationale))
            .map_err(|e| EngineError::Store(e.to_string()))?;

        Ok(format!(
            "Evidence {} waived by {} until {}",
            evidence_id,
            waived_by,
            expires_at.to_rfc3339()
        ))
    }

    fn calculate_reliability(&mut self, id: &str) -> Result<String, EngineError> {
        let artifact = pre::artifact(&self.store, "calculate_reliability", id)?;
        let threshold = self.threshold()?;

        let report = {
            let mut calc = ReliabilityCalculator::new(
                &self.store,
                self.config.reliability.params(),
                threshold,
                Utc::now(),
            );
            calc.calculate(&artifact.id)?
        };

        self.store
            .set_cached_reliability(&artifact.id, report.score)
            .map_err(|e| EngineError::Store(e.to_string()))?;

        Ok(report.render())
    }

    fn audit_tree(&mut self, id: &str) -> Result<String, EngineError> {
        let artifact = pre::artifact(&self.store, "audit_tree", id)?;
        let threshold = self.threshold()?;

        let mut calc = ReliabilityCalculator::new(
            &self.store,
            self.config.reliability.params(),
            threshold,
            Utc::now(),
        );
        Ok(audit_tree::render(&mut calc, &artifact.id)?)
    }

    fn decay(&mut self) -> Result<String, EngineError> {
        let threshold = self.threshold()?;
        let params = self.config.reliability.params();
        let report = run_decay(&mut self.store, &params, threshold, Utc::now(), false)?;
        Ok(report.summary())
    }

    fn actualize(&mut self) -> Result<String, EngineError> {
        let mut fsm = self.load_fsm()?;
        let result = reconcile(self.journal.root(), fsm.state().last_commit.as_deref());

        if let Some(commit) = result.new_commit {
            fsm.state_mut().last_commit = Some(commit);
            fsm.save(&mut self.store)?;
        }
        Ok(result.report)
    }

    fn link(&mut self, component_id: &str, composite_id: &str, congruence: u8) -> Result<String, EngineError> {
        const OP: &str = "link";
        let component = pre::artifact(&self.store, OP, component_id)?;
        let composite = pre::artifact(&self.store, OP, composite_id)?;
        if component.id == composite.id {
            return Err(PreconditionError::new(
                OP,
                "an artifact cannot be a component of itself",
                "Link two different artifacts",
            )
            .into());
        }
        let congruence = CongruenceLevel::new(congruence)
            .map_err(|e| PreconditionError::new(OP, e, "Use a congruence level from 0 to 3"))?;

        self.store
            .add_relation(Relation::component_of(&component.id, &composite.id, congruence))
            .map_err(|e| EngineError::Store(e.to_string()))?;

        Ok(format!(
            "Linked {} --({})--> {}",
            component.id, congruence, composite.id
        ))
    }

    fn fresh_id(&self, operation: &str, title: &str) -> Result<ArtifactId, EngineError> {
        let id = ArtifactId::from_title(title);
        if id.is_empty() {
            return Err(PreconditionError::new(
                operation,
                "title has no letters or digits",
                "Use a title that can form an identifier",
            )
            .into());
        }

        let existing = self
            .store
            .get_artifact(&id)
            .map_err(|e| EngineError::Store(e.to_string()))?;
        if existing.is_some() {
            return Err(PreconditionError::new(
                operation,
                format!("artifact '{}' already exists", id),
                "Choose a different title",
            )
            .into());
        }
        Ok(id)
    }

    fn threshold(&self) -> Result<f64, EngineError> {
        self.store
            .load_workflow_state(self.context_id())
            .map(|s| s.assurance_threshold)
            .map_err(|e| EngineError::Store(e.to_string()))
    }

    fn journal_outcome(&self, outcome: &PromotionOutcome) {
        let id = &outcome.evidence.artifact_id;
        if let TierEffect::Move(to) = outcome.effect {
            if let Err(e) = self.journal.move_artifact(id, outcome.from, to) {
                tracing::warn!(artifact = %id, error = %e, "failed to move artifact in journal");
            }
        }
        if let Err(e) = self.journal.write_evidence(&outcome.evidence) {
            tracing::warn!(artifact = %id, error = %e, "failed to journal evidence");
        }
    }
}

fn inconsistent(step: &str, completed: &str, err: impl Display) -> EngineError {
    EngineError::Inconsistent {
        step: step.to_string(),
        completed: completed.to_string(),
        message: err.to_string(),
    }
}

struct DecisionRecord {
    title: String,
    winner_id: String,
    context: String,
    decision: String,
    rationale: String,
    consequences: String,
    characteristics: Option<String>,
}

impl DecisionRecord {
    fn render(&self) -> String {
        let mut body = format!("# {}\n\n", self.title);
        body.push_str(&format!("## Context\n{}\n\n", self.context));
        body.push_str(&format!(
            "## Decision\n**Selected Option:** {}\n\n{}\n\n",
            self.winner_id, self.decision
        ));
        body.push_str(&format!("## Rationale\n{}\n\n", self.rationale));
        if let Some(c) = self.characteristics.as_deref().filter(|c| !c.trim().is_empty()) {
            body.push_str(&format!("### Characteristic Space\n{}\n\n", c));
        }
        body.push_str(&format!("## Consequences\n{}\n", self.consequences));
        body
    }
}
