//! Command implementations.
//!
//! Each command returns the text to print; `main` owns stdout.

pub mod log;
pub mod project;
pub mod reliability;
pub mod serve;
pub mod watch;

pub use self::log::execute_log;
pub use self::project::{execute_actualize, execute_init, execute_status, execute_waive};
pub use self::reliability::{execute_decay, execute_reliability, execute_tree};
pub use self::serve::execute_serve;
pub use self::watch::execute_watch;
