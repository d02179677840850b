//! nautobot-settings Library
//!
//! Environment-driven deployment settings for a Nautobot instance running the
//! ChatOps and Panorama plugins.

pub mod env;
pub mod error;
pub mod ordered;
pub mod redis;
pub mod required;
pub mod settings;

pub use env::{EnvReader, EnvSource, ProcessEnv, Secret};
pub use error::{ConfigError, ConfigResult};
pub use ordered::OrderedList;
pub use redis::RedisEndpoint;
pub use required::{ensure_required, missing_required, REQUIRED_VARS};
pub use settings::{LogLevel, LoggingConfig, Settings};
