//! Settings loading functionality.
//!
//! This module provides the [`SettingsLoader`] type for loading engine
//! settings from a YAML file, and the YAML helper shared with the dataset
//! loader.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::EngineSettings;

/// Loads engine settings from YAML.
///
/// # Example
///
/// ```no_run
/// use workforce_compliance::config::SettingsLoader;
///
/// let loader = SettingsLoader::load("./config/settings.yaml")?;
/// println!("Default min headcount: {}", loader.settings().defaults.min_headcount);
/// # Ok::<(), workforce_compliance::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SettingsLoader {
    settings: EngineSettings,
}

impl SettingsLoader {
    /// Loads settings from the specified file.
    ///
    /// Returns an error if the file is missing or is not valid YAML. Fields
    /// absent from the file take their default values.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let settings = load_yaml::<EngineSettings>(path.as_ref())?;
        Ok(Self { settings })
    }

    /// Wraps already-built settings.
    pub fn from_settings(settings: EngineSettings) -> Self {
        Self { settings }
    }

    /// Returns the loaded settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Consumes the loader and returns the settings.
    pub fn into_settings(self) -> EngineSettings {
        self.settings
    }
}

/// Loads and parses a YAML file.
pub(crate) fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
    let path_str = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
        path: path_str.clone(),
    })?;

    serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
        path: path_str,
        message: e.to_string(),
    })
}
