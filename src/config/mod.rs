//! Configuration management for graphaudit

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::audit::aggregate::DEFAULT_THRESHOLD_DAYS;
use crate::audit::batch::DEFAULT_BATCH_SIZE;
use crate::audit::{BatchSize, ManagedAppDefinition, builtin_definitions};
use crate::error::{ConfigError, Result};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Directory tenant the token belongs to (informational)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,

    /// Pre-acquired Graph bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Graph base URL override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,

    /// Extra vendor-managed app definitions, checked after the built-in ones
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub managed_apps: Vec<ManagedAppDefinition>,
}

/// User preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    /// Default report window in days
    #[serde(default = "default_threshold_days")]
    pub threshold_days: i64,

    /// Default identifiers per `in` filter
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Default number of batch requests in flight
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_threshold_days() -> i64 {
    DEFAULT_THRESHOLD_DAYS
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_concurrency() -> usize {
    1
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            threshold_days: default_threshold_days(),
            batch_size: default_batch_size(),
            concurrency: default_concurrency(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".graphaudit").join("config.yaml"))
    }

    /// Resolve config path from an override or the default location
    pub fn resolve_path(override_path: Option<&str>) -> Result<PathBuf> {
        match override_path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration, falling back to defaults when no file exists
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load_from(path) {
            Err(crate::error::Error::Config(ConfigError::NotFound)) => {
                log::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(path, contents)?;

        // Tokens live in this file
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Check preference ranges
    pub fn validate(&self) -> Result<()> {
        BatchSize::new(self.preferences.batch_size)?;
        if self.preferences.threshold_days < 0 {
            return Err(ConfigError::Invalid(format!(
                "threshold_days must not be negative, got {}",
                self.preferences.threshold_days
            ))
            .into());
        }
        if self.preferences.concurrency == 0 {
            return Err(ConfigError::Invalid("concurrency must be at least 1".to_string()).into());
        }
        Ok(())
    }

    /// Token from the command line or environment, else from the file
    pub fn resolve_token(&self, override_token: Option<&str>) -> Result<String> {
        override_token
            .or(self.access_token.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .ok_or_else(|| ConfigError::MissingToken.into())
    }

    /// Built-in definitions followed by configured ones
    pub fn managed_app_definitions(&self) -> Vec<ManagedAppDefinition> {
        let mut definitions = builtin_definitions();
        definitions.extend(self.managed_apps.iter().cloned());
        definitions
    }
}
