//! Gatekeeper error types

use std::path::PathBuf;
use tenet_domain::{Phase, Role};
use thiserror::Error;

/// Why a phase transition was refused
///
/// Each variant names the rule that failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransitionRejection {
    /// Target phase cannot be entered from the current phase
    #[error("Invalid transition from {from} to {to}")]
    Unreachable {
        /// Current phase
        from: Phase,
        /// Requested phase
        to: Phase,
    },

    /// Role may not act in the target phase
    #[error("Role {role} is not allowed in phase {phase}")]
    RoleNotAllowed {
        /// Acting role
        role: Role,
        /// Target phase
        phase: Phase,
    },

    /// Target phase requires evidence and none was supplied
    #[error("Evidence required to enter {phase}")]
    MissingEvidence {
        /// Target phase
        phase: Phase,
    },

    /// Supplied evidence does not satisfy the target phase
    #[error("Evidence for {phase} is invalid ({}): {reason}", .path.display())]
    InvalidEvidence {
        /// Target phase
        phase: Phase,
        /// Referenced path
        path: PathBuf,
        /// What is wrong with it
        reason: String,
    },
}

/// Errors that can occur during gatekeeper operations
#[derive(Error, Debug)]
pub enum GatekeeperError {
    /// Store error while loading or saving workflow state
    #[error("Store error: {0}")]
    Store(String),

    /// Transition refused
    #[error("Transition rejected: {0}")]
    Rejected(#[from] TransitionRejection),
}
