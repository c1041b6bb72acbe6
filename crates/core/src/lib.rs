pub mod config;
pub mod errors;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LogFormat};
pub use errors::{UpstreamCallFailure, ValidationError};
