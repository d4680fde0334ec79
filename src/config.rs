//! Configuration types for the radio skill.

use crate::catalog::{StreamDescriptor, default_streams};
use crate::error::{Result, SkillError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillConfig {
    /// HTTP host settings.
    pub server: ServerConfig,
    /// Response envelope settings.
    pub skill: SkillSettings,
    /// Profile forwarding settings.
    pub profile: ProfileConfig,
    /// Playable streams. The play intent always starts the first entry.
    pub streams: Vec<StreamDescriptor>,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            skill: SkillSettings::default(),
            profile: ProfileConfig::default(),
            streams: default_streams(),
        }
    }
}

/// HTTP host configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Route the host posts request envelopes to.
    pub path: String,
    /// When set, requests must carry `Authorization: Bearer <token>`.
    pub bearer_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 4090,
            path: "/".to_owned(),
            bearer_token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillSettings {
    /// Custom user agent echoed in every response envelope.
    pub user_agent: Option<String>,
}

impl Default for SkillSettings {
    fn default() -> Self {
        Self {
            user_agent: Some("sample/hello-world/v1.2".to_owned()),
        }
    }
}

/// Profile forwarding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Master switch for the forwarding task.
    pub enabled: bool,
    /// Destination for the combined profile record. Forwarding stays off
    /// while this is unset.
    pub webhook_url: Option<String>,
    /// Per-request timeout for profile reads and the webhook POST.
    pub timeout_secs: u64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            webhook_url: None,
            timeout_secs: 10,
        }
    }
}

impl ProfileConfig {
    /// Webhook URL when forwarding is both enabled and configured.
    #[must_use]
    pub fn active_webhook(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

impl SkillConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| SkillError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SkillError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `<config dir>/radio-skill/config.toml`.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| std::env::temp_dir().join("radio-skill-config"))
            .join("radio-skill")
            .join("config.toml")
    }

    /// Check the settings that would otherwise fail at request time.
    ///
    /// # Errors
    ///
    /// Returns [`SkillError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(SkillError::Config("server.port must be non-zero".to_owned()));
        }
        if !self.server.path.starts_with('/') {
            return Err(SkillError::Config(format!(
                "server.path must start with '/': {}",
                self.server.path
            )));
        }
        if self.server.path == "/health" {
            return Err(SkillError::Config(
                "server.path collides with the health route".to_owned(),
            ));
        }
        if self.profile.timeout_secs == 0 {
            return Err(SkillError::Config(
                "profile.timeout_secs must be non-zero".to_owned(),
            ));
        }
        if let Some(webhook) = self.profile.active_webhook() {
            url::Url::parse(webhook)
                .map_err(|e| SkillError::Config(format!("profile.webhook_url: {e}")))?;
        }

        if self.streams.is_empty() {
            return Err(SkillError::Config("streams must not be empty".to_owned()));
        }
        let mut tokens = HashSet::new();
        for stream in &self.streams {
            if stream.token.trim().is_empty() {
                return Err(SkillError::Config("stream token must not be empty".to_owned()));
            }
            if !tokens.insert(stream.token.as_str()) {
                return Err(SkillError::Config(format!(
                    "duplicate stream token: {}",
                    stream.token
                )));
            }
            url::Url::parse(&stream.url).map_err(|e| {
                SkillError::Config(format!("stream {} has invalid url: {e}", stream.token))
            })?;
        }
        Ok(())
    }
}
