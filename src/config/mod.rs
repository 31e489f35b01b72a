//! Configuration module
//!
//! Handles user settings and named settings profiles on disk.

pub mod profiles;
pub mod settings;

pub use profiles::ProfileStore;
pub use settings::Settings;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown setting: {0}")]
    UnknownKey(String),
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
    #[error("Invalid profile name: {0:?}")]
    InvalidProfileName(String),
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),
    #[error("Profile IO failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Profile format error: {0}")]
    Format(#[from] serde_json::Error),
}
