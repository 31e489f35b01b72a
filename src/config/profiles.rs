//! Named settings profiles
//!
//! Each profile is one pretty-printed JSON file `<name>.json` in the store
//! directory.

use std::fs;
use std::path::PathBuf;

use super::{ConfigError, Settings};

const EXTENSION: &str = "json";

/// Directory-backed profile store
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Save settings under `name`, replacing any existing profile
    pub fn save(&self, name: &str, settings: &Settings) -> Result<(), ConfigError> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&path, json)?;
        log::info!("Saved profile '{}' to {}", name, path.display());
        Ok(())
    }

    /// Load and validate the profile `name`
    pub fn load(&self, name: &str) -> Result<Settings, ConfigError> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(ConfigError::ProfileNotFound(name.to_string()));
        }
        let json = fs::read_to_string(&path)?;
        let mut settings: Settings = serde_json::from_str(&json)?;
        settings.validate();
        log::info!("Loaded profile '{}'", name);
        Ok(settings)
    }

    /// Names of all saved profiles, sorted
    pub fn list(&self) -> Result<Vec<String>, ConfigError> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if is_valid_name(stem) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Remove the profile `name`
    pub fn delete(&self, name: &str) -> Result<(), ConfigError> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(ConfigError::ProfileNotFound(name.to_string()));
        }
        fs::remove_file(&path)?;
        log::info!("Deleted profile '{}'", name);
        Ok(())
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, ConfigError> {
        if !is_valid_name(name) {
            return Err(ConfigError::InvalidProfileName(name.to_string()));
        }
        Ok(self.dir.join(format!("{}.{}", name, EXTENSION)))
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
