//! `log` facade setup with `env_logger` as the backend.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER, VERBOSE_FILTER};
