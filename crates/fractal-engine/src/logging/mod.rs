//! Logging utilities.
//!
//! Initializes `env_logger` behind the `log` facade. Library code only ever
//! uses the `log` macros.

mod init;

pub use init::{init_logging, LoggingConfig};
