//! Process-level plumbing shared by the user-management server:
//! layered configuration, logging bootstrap, home-directory resolution
//! and shutdown signals.

pub mod config;
pub mod logging;
pub mod paths;
pub mod shutdown;

pub use config::{
    default_logging_config, AppConfig, CliArgs, DatabaseConfig, LoggingConfig, Section,
    ServerConfig,
};
