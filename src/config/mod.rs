//! Configuration management for Lexora

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Default API host when none is configured (local backend)
pub const DEFAULT_API_HOST: &str = "http://localhost:8080";

/// API path prefix appended to the host
const API_PATH: &str = "/api/v1";

/// File name of the session storage, kept next to the config file
const SESSION_FILE: &str = "session.yaml";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Lexora API host (scheme + authority, without the `/api/v1` prefix)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,
}

/// User preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    /// Default output format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Books per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Sort order sent with every list request (`field,direction`)
    #[serde(default = "default_sort")]
    pub sort: String,
}

fn default_page_size() -> usize {
    10
}

fn default_sort() -> String {
    "title,asc".to_string()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            format: None,
            page_size: default_page_size(),
            sort: default_sort(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".lexora").join("config.yaml"))
    }

    /// Resolve the config path from an optional override
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Path of the session storage file belonging to a config file
    pub fn session_path(config_path: &Path) -> PathBuf {
        config_path
            .parent()
            .map(|dir| dir.join(SESSION_FILE))
            .unwrap_or_else(|| PathBuf::from(SESSION_FILE))
    }

    /// Load configuration from a specific path.
    ///
    /// A missing file is not an error: the defaults target a local backend.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        write_private(path, &contents)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.preferences.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be at least 1".to_string()).into());
        }
        if let Some(ref host) = self.api_host {
            if !host.starts_with("http://") && !host.starts_with("https://") {
                return Err(ConfigError::Invalid(format!(
                    "api_host must start with http:// or https:// (got {host})"
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Resolve the API host: runtime override, then config file, then default
    pub fn api_host<'a>(&'a self, host_override: Option<&'a str>) -> &'a str {
        host_override
            .or(self.api_host.as_deref())
            .unwrap_or(DEFAULT_API_HOST)
    }

    /// Full API base URL including the version prefix
    pub fn api_base_url(&self, host_override: Option<&str>) -> String {
        format!(
            "{}{}",
            self.api_host(host_override).trim_end_matches('/'),
            API_PATH
        )
    }
}

/// Write a file readable only by the current user, creating parent directories.
pub(crate) fn write_private(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(path, contents)?;

    // Set file permissions to 600 on Unix systems
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        std::fs::set_permissions(path, perms)?;
    }

    Ok(())
}
