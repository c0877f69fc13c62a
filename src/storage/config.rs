use super::Result;
use crate::error::{ConfigError, StorageError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    pub default_profile: Option<String>,
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

/// Defaults offered at the interactive prompts
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub org_url: Option<String>,
    /// "1" (username/password) or "2" (client ID)
    pub auth_method: Option<String>,
    pub username: Option<String>,
    pub client_id: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl Config {
    /// Load `config.toml` from `config_dir`, or the platform config directory.
    /// A missing file, or no platform directory at all, yields an empty config.
    pub fn load(config_dir: Option<&Path>) -> Result<Self> {
        match Self::config_file_path(config_dir, dirs::config_dir()) {
            Some(path) => Self::load_file(&path),
            None => Ok(Self::default()),
        }
    }

    fn config_file_path(config_dir: Option<&Path>, platform_dir: Option<PathBuf>) -> Option<PathBuf> {
        match config_dir {
            Some(dir) => Some(dir.join(CONFIG_FILE_NAME)),
            None => platform_dir.map(|dir| dir.join("agol-cli").join(CONFIG_FILE_NAME)),
        }
    }

    fn load_file(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
            message: format!("{}: {}", config_path.to_string_lossy(), e),
        })
    }

    pub fn get_profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// An explicitly requested profile must exist; otherwise fall back to
    /// `default_profile` when it names an existing profile.
    pub fn resolve_profile(
        &self,
        requested: Option<&str>,
    ) -> std::result::Result<Option<Profile>, ConfigError> {
        if let Some(name) = requested {
            return self
                .get_profile(name)
                .cloned()
                .map(Some)
                .ok_or_else(|| ConfigError::ProfileNotFound {
                    name: name.to_string(),
                });
        }

        Ok(self
            .default_profile
            .as_deref()
            .and_then(|name| self.get_profile(name))
            .cloned())
    }
}

impl Profile {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if let Some(method) = &self.auth_method {
            if method != "1" && method != "2" {
                return Err(ConfigError::InvalidValue {
                    field: "auth_method".to_string(),
                    value: method.clone(),
                    reason: "expected \"1\" or \"2\"".to_string(),
                });
            }
        }
        if self.timeout_seconds == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "timeout_seconds".to_string(),
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
