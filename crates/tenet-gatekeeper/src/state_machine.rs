//! Phase/role state machine

use crate::{EvidenceStub, GatekeeperError, TransitionRejection};
use std::fmt::Display;
use tenet_domain::traits::ArtifactStore;
use tenet_domain::{Phase, RoleAssignment, WorkflowState};

/// Outcome of a successful authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    /// Work within the current phase; no transition happened
    InPhase(Phase),

    /// The workflow moved between phases
    Transition {
        /// Phase before the action
        from: Phase,
        /// Phase after the action
        to: Phase,
    },
}

/// State machine over one context's workflow record
#[derive(Debug, Clone)]
pub struct StateMachine {
    state: WorkflowState,
}

impl StateMachine {
    /// Wrap a workflow state
    pub fn new(state: WorkflowState) -> Self {
        Self { state }
    }

    /// Load the state of `context_id` (a fresh `IDLE` state when absent)
    pub fn load<S: ArtifactStore>(store: &S, context_id: &str) -> Result<Self, GatekeeperError>
    where
        S::Error: Display,
    {
        let state = store
            .load_workflow_state(context_id)
            .map_err(|e| GatekeeperError::Store(e.to_string()))?;
        Ok(Self::new(state))
    }

    /// Persist the current state
    pub fn save<S: ArtifactStore>(&self, store: &mut S) -> Result<(), GatekeeperError>
    where
        S::Error: Display,
    {
        store
            .save_workflow_state(&self.state)
            .map_err(|e| GatekeeperError::Store(e.to_string()))
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Current workflow state
    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Mutable access for fields the state machine does not own
    /// (last reconciled commit, assurance threshold)
    pub fn state_mut(&mut self) -> &mut WorkflowState {
        &mut self.state
    }

    /// Consume the machine, returning its state
    pub fn into_state(self) -> WorkflowState {
        self.state
    }

    /// Check whether moving to `target` is legal, without changing anything
    pub fn can_transition(
        &self,
        target: Phase,
        role: &RoleAssignment,
        evidence: Option<&EvidenceStub>,
    ) -> Result<(), TransitionRejection> {
        self.check_route(target, role)?;
        check_evidence(target, evidence)
    }

    /// Reachability and role checks only
    ///
    /// For actions that produce the transition's evidence themselves and
    /// must know the route is open before mutating anything.
    pub fn check_route(&self, target: Phase, role: &RoleAssignment) -> Result<(), TransitionRejection> {
        let from = self.state.phase;

        if !from.can_reach(target) {
            return Err(TransitionRejection::Unreachable { from, to: target });
        }

        if !target.allows_role(role.role) {
            return Err(TransitionRejection::RoleNotAllowed {
                role: role.role,
                phase: target,
            });
        }

        Ok(())
    }

    /// Check and apply a transition; only phase and active role change
    pub fn transition(
        &mut self,
        target: Phase,
        role: RoleAssignment,
        evidence: Option<&EvidenceStub>,
    ) -> Result<(), TransitionRejection> {
        self.can_transition(target, &role, evidence)?;

        tracing::info!(
            context = %self.state.context_id,
            from = %self.state.phase,
            to = %target,
            role = %role.role,
            "phase transition"
        );

        self.state.phase = target;
        self.state.active_role = Some(role);
        Ok(())
    }

    /// Authorize an action targeting `target`
    ///
    /// When `target` is the current phase the action is work within the
    /// phase: only role legality is checked and the phase is left alone.
    /// Otherwise this is a full [`transition`](Self::transition).
    pub fn authorize(
        &mut self,
        target: Phase,
        role: RoleAssignment,
        evidence: Option<&EvidenceStub>,
    ) -> Result<Authorization, TransitionRejection> {
        let from = self.state.phase;

        if target == from {
            if !target.allows_role(role.role) {
                return Err(TransitionRejection::RoleNotAllowed {
                    role: role.role,
                    phase: target,
                });
            }
            self.state.active_role = Some(role);
            return Ok(Authorization::InPhase(target));
        }

        self.transition(target, role, evidence)?;
        Ok(Authorization::Transition { from, to: target })
    }
}

fn check_evidence(target: Phase, evidence: Option<&EvidenceStub>) -> Result<(), TransitionRejection> {
    let needs_check: fn(&EvidenceStub) -> Result<(), String> = match target {
        Phase::Deduction => EvidenceStub::non_empty_dir,
        Phase::Induction | Phase::Decision => EvidenceStub::existing_file,
        Phase::Idle | Phase::Abduction => return Ok(()),
    };

    let stub = evidence.ok_or(TransitionRejection::MissingEvidence { phase: target })?;
    needs_check(stub).map_err(|reason| TransitionRejection::InvalidEvidence {
        phase: target,
        path: stub.uri.clone(),
        reason,
    })
}
