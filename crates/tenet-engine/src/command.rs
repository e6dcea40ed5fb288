//! The closed set of operations the engine executes

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// An operation request
///
/// Verdicts, assurance levels and dates travel as text and are parsed by
/// the operation's preconditions, so a malformed value is reported as a
/// precondition failure with a suggestion rather than a decoding error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Report phase, role, threshold, last commit and tier counts
    Status,

    /// Create the project layout and open the first cycle
    Init,

    /// Record the bounded context (vocabulary and invariants)
    RecordContext {
        /// Domain vocabulary
        vocabulary: String,
        /// Invariants that must hold
        invariants: String,
    },

    /// Propose a new L0 hypothesis
    Propose {
        /// Hypothesis title (also the source of its identifier)
        title: String,
        /// Hypothesis body
        content: String,
        /// Where the hypothesis claims to hold
        #[serde(default)]
        scope: String,
        /// `system` or `episteme`
        kind: String,
        /// Why it is worth considering
        #[serde(default)]
        rationale: String,
    },

    /// Record logical verification of an L0 hypothesis
    Verify {
        /// Target hypothesis
        hypothesis_id: String,
        /// Checks performed
        checks: String,
        /// `PASS`, `FAIL` or `REFINE`
        verdict: String,
    },

    /// Record empirical validation of an L1/L2 hypothesis
    Test {
        /// Target hypothesis
        hypothesis_id: String,
        /// Kind of test
        test_type: String,
        /// Observed result
        result: String,
        /// `PASS`, `FAIL` or `REFINE`
        verdict: String,
    },

    /// Record an audit of an L2 hypothesis
    Audit {
        /// Target hypothesis
        hypothesis_id: String,
        /// Risks identified
        risks: String,
    },

    /// Record arbitrary evidence in the current phase
    AddEvidence {
        /// Target artifact
        target_id: String,
        /// Evidence type
        evidence_type: String,
        /// Evidence content
        content: String,
        /// `PASS`, `FAIL` or `REFINE`
        verdict: String,
        /// `L0`, `L1` or `L2`
        assurance_level: String,
        /// Carrier reference
        #[serde(default)]
        carrier_ref: Option<String>,
        /// RFC3339 or `YYYY-MM-DD`; anything else means no deadline
        #[serde(default)]
        valid_until: Option<String>,
    },

    /// List the evidence recorded against an artifact
    CheckEvidence {
        /// Target artifact
        target_id: String,
    },

    /// Invalidate a hypothesis and propose its replacement
    Loopback {
        /// Hypothesis being invalidated
        parent_id: String,
        /// What was learned
        insight: String,
        /// Title of the replacement
        new_title: String,
        /// Body of the replacement
        new_content: String,
        /// Scope of the replacement
        #[serde(default)]
        scope: String,
    },

    /// Finalize a decision and close the cycle
    Decide {
        /// Decision record title
        title: String,
        /// Winning hypothesis
        winner_id: String,
        /// Problem context
        context: String,
        /// The decision
        decision: String,
        /// Why this option won
        rationale: String,
        /// Expected consequences
        consequences: String,
        /// Characteristic space of the compared options
        #[serde(default)]
        characteristics: Option<String>,
    },

    /// Waive one evidence record until a deadline
    Waive {
        /// Evidence being waived
        evidence_id: String,
        /// Who grants the waiver
        waived_by: String,
        /// RFC3339 or `YYYY-MM-DD`
        until: String,
        /// Why
        rationale: String,
    },

    /// Compute and cache the reliability of an artifact
    CalculateReliability {
        /// Target artifact
        artifact_id: String,
    },

    /// Render the reliability computation as a tree
    AuditTree {
        /// Root artifact
        artifact_id: String,
    },

    /// Recompute the reliability of every artifact
    Decay,

    /// Reconcile against git
    Actualize,

    /// Declare `component_id` a component of `composite_id`
    Link {
        /// Component artifact
        component_id: String,
        /// Composite artifact
        composite_id: String,
        /// Congruence level 0..=3
        #[serde(default = "default_congruence")]
        congruence: u8,
    },
}

fn default_congruence() -> u8 {
    3
}

impl Command {
    /// Action name, as recorded in the audit log
    pub fn name(&self) -> &'static str {
        match self {
            Command::Status => "status",
            Command::Init => "init",
            Command::RecordContext { .. } => "record_context",
            Command::Propose { .. } => "propose",
            Command::Verify { .. } => "verify",
            Command::Test { .. } => "test",
            Command::Audit { .. } => "audit",
            Command::AddEvidence { .. } => "add_evidence",
            Command::CheckEvidence { .. } => "check_evidence",
            Command::Loopback { .. } => "loopback",
            Command::Decide { .. } => "decide",
            Command::Waive { .. } => "waive",
            Command::CalculateReliability { .. } => "calculate_reliability",
            Command::AuditTree { .. } => "audit_tree",
            Command::Decay => "decay",
            Command::Actualize => "actualize",
            Command::Link { .. } => "link",
        }
    }

    /// Operation family the action belongs to
    pub fn operation(&self) -> &'static str {
        match self {
            Command::Status | Command::CheckEvidence { .. } => "query",
            Command::Init | Command::RecordContext { .. } | Command::Actualize => "setup",
            Command::Propose { .. } | Command::Loopback { .. } | Command::Link { .. } => "hypothesis",
            Command::Verify { .. }
            | Command::Test { .. }
            | Command::Audit { .. }
            | Command::AddEvidence { .. }
            | Command::Waive { .. } => "evidence",
            Command::Decide { .. } => "decision",
            Command::CalculateReliability { .. } | Command::AuditTree { .. } | Command::Decay => {
                "reliability"
            }
        }
    }

    /// Artifact the action targets, if any
    pub fn target(&self) -> Option<&str> {
        match self {
            Command::Verify { hypothesis_id, .. }
            | Command::Test { hypothesis_id, .. }
            | Command::Audit { hypothesis_id, .. } => Some(hypothesis_id),
            Command::AddEvidence { target_id, .. } | Command::CheckEvidence { target_id } => {
                Some(target_id)
            }
            Command::Loopback { parent_id, .. } => Some(parent_id),
            Command::Decide { winner_id, .. } => Some(winner_id),
            Command::CalculateReliability { artifact_id } | Command::AuditTree { artifact_id } => {
                Some(artifact_id)
            }
            Command::Link { composite_id, .. } => Some(composite_id),
            Command::Waive { evidence_id, .. } => Some(evidence_id),
            Command::Status
            | Command::Init
            | Command::RecordContext { .. }
            | Command::Propose { .. }
            | Command::Decay
            | Command::Actualize => None,
        }
    }

    /// SHA-256 of the serialized command, hex encoded
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        match serde_json::to_vec(self) {
            Ok(bytes) => hasher.update(&bytes),
            Err(_) => hasher.update(self.name().as_bytes()),
        }
        hex::encode(hasher.finalize())
    }
}
