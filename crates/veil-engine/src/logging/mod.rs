//! Logging setup.
//!
//! Everything in the workspace logs through the `log` facade; this module owns
//! the one-time `env_logger` initialization.

mod init;

pub use init::{init_logging, LoggingConfig};
