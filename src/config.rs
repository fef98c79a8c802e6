use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::predict::DEFAULT_TOP_K;

pub const DEFAULT_CONFIG_FILE: &str = "healthmate-server.yaml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub lifestyle: LifestyleConfig,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: ListenConfig::default(),
            models: ModelsConfig::default(),
            lifestyle: LifestyleConfig::default(),
            top_k: default_top_k(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default)]
    pub tlscert: Option<String>,
    #[serde(default)]
    pub tlskey: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            tlscert: None,
            tlskey: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelsConfig {
    #[serde(default = "default_model_dir")]
    pub dir: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            dir: default_model_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LifestyleConfig {
    #[serde(default = "default_recommended_water")]
    pub recommended_water: f64,
    #[serde(default = "default_stress_fallback")]
    pub stress_fallback: String,
}

impl Default for LifestyleConfig {
    fn default() -> Self {
        Self {
            recommended_water: default_recommended_water(),
            stress_fallback: default_stress_fallback(),
        }
    }
}

fn default_port() -> String {
    "5000".to_string()
}

fn default_model_dir() -> String {
    "models".to_string()
}

fn default_recommended_water() -> f64 {
    2.0
}

fn default_stress_fallback() -> String {
    "Moderate".to_string()
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        Self::from_yaml(path, &content)
    }

    pub fn from_yaml(path: &str, content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::ParseError(path.to_string(), e))?;

        if !config.lifestyle.recommended_water.is_finite() {
            return Err(ConfigError::Invalid(
                path.to_string(),
                "lifestyle.recommended_water must be a finite number".to_string(),
            ));
        }

        Ok(config)
    }

    /// Load `path` if given, otherwise the default config file. Only a
    /// missing default file is tolerated, in which case defaults apply.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => {
                tracing::warn!(
                    "Config file {} not found, using defaults",
                    DEFAULT_CONFIG_FILE
                );
                Ok(Self::default())
            }
        }
    }

    pub fn model_dir(&self) -> PathBuf {
        PathBuf::from(&self.models.dir)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
    #[error("Invalid config file {0}: {1}")]
    Invalid(String, String),
}
