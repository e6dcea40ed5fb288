//! Workflow module - phases, roles and the per-context workflow record

use std::fmt;

/// Default reliability below which artifacts are flagged
pub const DEFAULT_ASSURANCE_THRESHOLD: f64 = 0.8;

/// Phase of the reasoning cycle
///
/// A cycle runs `IDLE → ABDUCTION → DEDUCTION → INDUCTION → DECISION → IDLE`,
/// with `INDUCTION → DEDUCTION` as the refinement loopback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// No cycle in progress
    #[default]
    Idle,

    /// Generating hypotheses
    Abduction,

    /// Verifying hypotheses logically
    Deduction,

    /// Testing hypotheses empirically
    Induction,

    /// Auditing and deciding
    Decision,
}

impl Phase {
    /// All phases in cycle order
    pub const ALL: [Phase; 5] = [
        Phase::Idle,
        Phase::Abduction,
        Phase::Deduction,
        Phase::Induction,
        Phase::Decision,
    ];

    /// Get the phase as its stored (uppercase) string
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "IDLE",
            Phase::Abduction => "ABDUCTION",
            Phase::Deduction => "DEDUCTION",
            Phase::Induction => "INDUCTION",
            Phase::Decision => "DECISION",
        }
    }

    /// Parse a phase (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "IDLE" => Some(Phase::Idle),
            "ABDUCTION" => Some(Phase::Abduction),
            "DEDUCTION" => Some(Phase::Deduction),
            "INDUCTION" => Some(Phase::Induction),
            "DECISION" => Some(Phase::Decision),
            _ => None,
        }
    }

    /// Whether `target` can be entered directly from this phase
    pub fn can_reach(&self, target: Phase) -> bool {
        matches!(
            (self, target),
            (Phase::Idle, Phase::Abduction)
                | (Phase::Abduction, Phase::Abduction)
                | (Phase::Abduction, Phase::Deduction)
                | (Phase::Deduction, Phase::Induction)
                | (Phase::Induction, Phase::Deduction)
                | (Phase::Induction, Phase::Decision)
                | (Phase::Decision, Phase::Idle)
        )
    }

    /// Whether `role` may act in this phase
    pub fn allows_role(&self, role: Role) -> bool {
        match self {
            Phase::Idle => true,
            Phase::Abduction => role == Role::Abductor,
            Phase::Deduction => role == Role::Deductor,
            Phase::Induction => role == Role::Inductor,
            Phase::Decision => matches!(role, Role::Decider | Role::Auditor),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid phase: {}", s))
    }
}

/// Role acting within a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Proposes hypotheses
    Abductor,

    /// Verifies hypotheses
    Deductor,

    /// Tests hypotheses
    Inductor,

    /// Finalizes decisions
    Decider,

    /// Audits validated hypotheses
    Auditor,
}

impl Role {
    /// All roles
    pub const ALL: [Role; 5] = [
        Role::Abductor,
        Role::Deductor,
        Role::Inductor,
        Role::Decider,
        Role::Auditor,
    ];

    /// Get the role as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Abductor => "Abductor",
            Role::Deductor => "Deductor",
            Role::Inductor => "Inductor",
            Role::Decider => "Decider",
            Role::Auditor => "Auditor",
        }
    }

    /// Parse a role (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "abductor" => Some(Role::Abductor),
            "deductor" => Some(Role::Deductor),
            "inductor" => Some(Role::Inductor),
            "decider" => Some(Role::Decider),
            "auditor" => Some(Role::Auditor),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid role: {}", s))
    }
}

/// A role held by a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    /// Role held
    pub role: Role,

    /// Session holding it
    pub session_id: String,

    /// Role-scoped context string
    pub context: String,
}

impl RoleAssignment {
    /// Create a role assignment
    pub fn new(role: Role, session_id: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            role,
            session_id: session_id.into(),
            context: context.into(),
        }
    }
}

/// Workflow record of one context
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowState {
    /// Owning context
    pub context_id: String,

    /// Current phase
    pub phase: Phase,

    /// Role that performed the last accepted transition
    pub active_role: Option<RoleAssignment>,

    /// Last commit reconciled against the repository
    pub last_commit: Option<String>,

    /// Reliability threshold in [0.0, 1.0]
    pub assurance_threshold: f64,
}

impl WorkflowState {
    /// Fresh `IDLE` state with no role
    pub fn new(context_id: impl Into<String>) -> Self {
        Self {
            context_id: context_id.into(),
            phase: Phase::Idle,
            active_role: None,
            last_commit: None,
            assurance_threshold: DEFAULT_ASSURANCE_THRESHOLD,
        }
    }

    /// Name of the actor for audit purposes (`System` when no role is active)
    pub fn actor(&self) -> &str {
        self.active_role
            .as_ref()
            .map(|r| r.role.as_str())
            .unwrap_or("System")
    }
}
