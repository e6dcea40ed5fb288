//! Tenet Gatekeeper
//!
//! Authorizes workflow progression. The gatekeeper owns the phase/role
//! state machine of one context and decides whether an action may move the
//! workflow to a target phase.
//!
//! A transition is checked in order:
//! 1. the target phase is reachable from the current one
//! 2. the acting role is legal for the target phase
//! 3. the evidence precondition of the target phase holds
//!
//! # Examples
//!
//! ```
//! use tenet_domain::{Phase, Role, RoleAssignment, WorkflowState};
//! use tenet_gatekeeper::StateMachine;
//!
//! let mut fsm = StateMachine::new(WorkflowState::new("default"));
//! let abductor = RoleAssignment::new(Role::Abductor, "session", "");
//!
//! fsm.transition(Phase::Abduction, abductor, None).unwrap();
//! assert_eq!(fsm.phase(), Phase::Abduction);
//! ```

#![warn(missing_docs)]

mod error;
mod evidence;
mod state_machine;

pub use error::{GatekeeperError, TransitionRejection};
pub use evidence::EvidenceStub;
pub use state_machine::{Authorization, StateMachine};
