//! Lighting configuration loading from JSON, YAML and TOML.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::ConfigValue;
use crate::error::{Result, SkError};

/// Input format of a lighting configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// Detect the format from a file extension. Unknown extensions are
    /// treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Self::Yaml,
            Some("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// A lighting configuration: key or group names mapped to settings, in
/// input order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct LightingConfig(IndexMap<String, ConfigValue>);

impl LightingConfig {
    pub fn from_json(src: &str) -> Result<Self> {
        serde_json::from_str(src).map_err(|e| SkError::ConfigParse(format!("JSON: {e}")))
    }

    pub fn from_yaml(src: &str) -> Result<Self> {
        serde_yaml::from_str(src).map_err(|e| SkError::ConfigParse(format!("YAML: {e}")))
    }

    pub fn from_toml(src: &str) -> Result<Self> {
        toml::from_str(src).map_err(|e| SkError::ConfigParse(format!("TOML: {e}")))
    }

    pub fn parse(src: &str, format: ConfigFormat) -> Result<Self> {
        match format {
            ConfigFormat::Json => Self::from_json(src),
            ConfigFormat::Yaml => Self::from_yaml(src),
            ConfigFormat::Toml => Self::from_toml(src),
        }
    }

    /// Load a configuration file, detecting its format by extension.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(SkError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let format = ConfigFormat::from_path(path);
        let src = std::fs::read_to_string(path)?;
        let config = Self::parse(&src, format)?;

        debug!(?format, entries = config.len(), "Loaded lighting configuration");
        Ok(config)
    }

    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ConfigValue)> for LightingConfig {
    fn from_iter<I: IntoIterator<Item = (String, ConfigValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
