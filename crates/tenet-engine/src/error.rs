//! Engine error types

use std::fmt;
use tenet_gatekeeper::TransitionRejection;
use thiserror::Error;

/// An operation was invoked in a state that cannot satisfy it
///
/// Reported verbatim with a suggested remedy; never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreconditionError {
    /// Operation that refused to run
    pub operation: String,
    /// Condition that does not hold
    pub condition: String,
    /// What the caller can do about it
    pub suggestion: String,
}

impl PreconditionError {
    /// Create a precondition error
    pub fn new(
        operation: impl Into<String>,
        condition: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            operation: operation.into(),
            condition: condition.into(),
            suggestion: suggestion.into(),
        }
    }
}

impl fmt::Display for PreconditionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Precondition failed for {}: {}. Suggestion: {}",
            self.operation, self.condition, self.suggestion
        )
    }
}

impl std::error::Error for PreconditionError {}

/// Failures of the reliability calculus
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReliabilityError {
    /// The artifact being scored does not exist
    #[error("Artifact not found: {0}")]
    MissingArtifact(String),

    /// Storage error while reading the graph
    #[error("Store error: {0}")]
    Store(String),
}

/// Errors that can occur while executing a command
#[derive(Error, Debug)]
pub enum EngineError {
    /// Operation precondition not met
    #[error("{0}")]
    Precondition(#[from] PreconditionError),

    /// State machine refused the action
    #[error("Transition rejected: {0}")]
    Rejected(#[from] TransitionRejection),

    /// Storage error (nothing was changed)
    #[error("Store error: {0}")]
    Store(String),

    /// A storage step failed after an earlier step of the same action succeeded
    #[error("Inconsistent state: {step} failed after {completed}: {message}")]
    Inconsistent {
        /// Step that failed
        step: String,
        /// Steps that had already been applied
        completed: String,
        /// Underlying error
        message: String,
    },

    /// Reliability computation failed
    #[error("Reliability error: {0}")]
    Reliability(#[from] ReliabilityError),

    /// Journal write that is the record of the operation failed
    #[error("Journal error: {0}")]
    Journal(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Git reconciliation failed
    #[error("Git error: {0}")]
    Git(String),
}

impl From<tenet_gatekeeper::GatekeeperError> for EngineError {
    fn from(err: tenet_gatekeeper::GatekeeperError) -> Self {
        match err {
            tenet_gatekeeper::GatekeeperError::Store(msg) => EngineError::Store(msg),
            tenet_gatekeeper::GatekeeperError::Rejected(r) => EngineError::Rejected(r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_message() {
        let err = PreconditionError::new("verify", "hypothesis 'x' not found in L0", "Propose it first");
        assert_eq!(
            err.to_string(),
            "Precondition failed for verify: hypothesis 'x' not found in L0. Suggestion: Propose it first"
        );

        let wrapped: EngineError = err.into();
        assert!(wrapped.to_string().starts_with("Precondition failed for verify"));
    }
}
