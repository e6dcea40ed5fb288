//! Tenet Janitor
//!
//! Background maintenance that keeps cached reliability scores current.
//!
//! Evidence carries optional validity deadlines and waivers lapse, so an
//! artifact's score changes with the clock even when nobody writes to the
//! store. The Janitor runs the decay pass on a schedule: every artifact is
//! rescored, failures are skipped and counted, and the fresh scores are
//! written back unless the configuration asks for a dry run.
//!
//! # Usage
//!
//! ## One-time Sweep
//!
//! ```no_run
//! use tenet_janitor::Janitor;
//! use tenet_store::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = SqliteStore::new(".tenet/tenet.db")?;
//! let mut janitor = Janitor::default_config();
//!
//! let metrics = janitor.sweep(&mut store)?;
//! println!("{}", metrics.summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration Presets
//!
//! ```
//! use tenet_janitor::JanitorConfig;
//!
//! // Hourly sweeps
//! let config = JanitorConfig::default();
//!
//! // Every 15 minutes
//! let config = JanitorConfig::aggressive();
//!
//! // Every 4 hours
//! let config = JanitorConfig::lenient();
//! ```

#![warn(missing_docs)]

mod error;
mod janitor;
mod metrics;
mod worker;

pub use error::JanitorError;
pub use janitor::Janitor;
pub use metrics::JanitorMetrics;
pub use tenet_engine::JanitorConfig;
pub use worker::JanitorWorker;
