//! Tenet Engine
//!
//! Executes the closed set of Tenet commands against one working context.
//! This is where the pieces meet: preconditions are checked, the gatekeeper
//! authorizes the phase change, the promotion rules move artifacts between
//! tiers, the journal mirrors the result as markdown, and every invocation
//! lands in the audit log.
//!
//! # Examples
//!
//! ```no_run
//! use tenet_engine::{Command, Engine};
//!
//! let mut engine = Engine::open(".").unwrap();
//! engine.execute(Command::Init).unwrap();
//!
//! let out = engine
//!     .execute(Command::Propose {
//!         title: "Cache the index".to_string(),
//!         content: "Keep the search index in memory".to_string(),
//!         scope: "search".to_string(),
//!         kind: "system".to_string(),
//!         rationale: "Cold reads dominate latency".to_string(),
//!     })
//!     .unwrap();
//! println!("{}", out);
//! ```

#![warn(missing_docs)]

pub mod audit_tree;
pub mod command;
pub mod config;
pub mod decay;
mod engine;
mod error;
pub mod journal;
pub mod preconditions;
pub mod promotion;
pub mod reconcile;
pub mod reliability;

pub use command::Command;
pub use config::{EngineConfig, JanitorConfig, ReliabilityConfig, TenetConfig};
pub use decay::{run_decay, DecayReport};
pub use engine::Engine;
pub use error::{EngineError, PreconditionError, ReliabilityError};
pub use journal::Journal;
pub use reliability::{ReliabilityCalculator, ReliabilityReport};
