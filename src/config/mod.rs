//! Configuration: TOML file with defaults, validated on load.

pub mod loader;
pub mod types;

pub use loader::ConfigError;
pub use types::{ApiConfig, Config, StorageConfig};
