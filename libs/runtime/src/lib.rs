//! Process-level plumbing shared by the storefront binaries:
//! layered configuration, home directory resolution and logging.

pub mod config;
pub mod logging;
pub mod paths;

pub use config::{AppConfig, CliArgs, DatabaseConfig, LoggingConfig, Section, ServerConfig};
