//! Configuration management for jira-describe
//!
//! Settings are read from `~/.config/jira-describe/config.yaml` when it exists,
//! then `JIRA_URL` and `JIRA_TOKEN` from the environment take precedence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::section::{default_sections, Section};

/// The name of the package, used for config directory naming
const PKG_NAME: &str = "jira-describe";

const CONFIG_FILE: &str = "config.yaml";

pub const ENV_JIRA_URL: &str = "JIRA_URL";
pub const ENV_JIRA_TOKEN: &str = "JIRA_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JiraConfig {
    /// Base URL of the Jira instance, without the `/rest/api/2` suffix
    pub url: String,
    /// Bearer token; an empty token surfaces as an auth failure on first call
    pub token: String,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            url: "https://jira.example.com".to_string(),
            token: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AiConfig {
    /// Executable looked up on PATH
    pub command: String,
    /// Arguments passed before the prompt is fed on stdin
    pub args: Vec<String>,
    /// Seconds to wait before the command is killed
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            command: "claude".to_string(),
            args: vec!["--print".to_string()],
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub command: String,
    /// Must make the editor block until the file is closed (e.g., `--wait`)
    pub args: Vec<String>,
    /// Seconds to wait for the editor before giving up
    pub timeout_secs: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            command: "code".to_string(),
            args: vec!["--wait".to_string()],
            timeout_secs: 300,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub jira: JiraConfig,
    pub ai: AiConfig,
    pub editor: EditorConfig,
    /// Ordered section list; order is display and generation order
    pub sections: Vec<Section>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jira: JiraConfig::default(),
            ai: AiConfig::default(),
            editor: EditorConfig::default(),
            sections: default_sections(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the file
    /// doesn't exist, then apply environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.check()?;
        Ok(config)
    }

    /// Read the YAML file only; a missing file yields the defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Apply `JIRA_URL` / `JIRA_TOKEN` overrides using the given lookup
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_JIRA_URL).filter(|v| !v.trim().is_empty()) {
            self.jira.url = url;
        }
        if let Some(token) = lookup(ENV_JIRA_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.jira.token = token;
        }
    }

    /// Reject configurations the session cannot work with
    pub fn check(&self) -> Result<()> {
        if self.sections.is_empty() {
            return Err(Error::Config("at least one section must be defined".into()));
        }

        let mut seen = std::collections::HashSet::new();
        for section in &self.sections {
            if section.name.trim().is_empty() {
                return Err(Error::Config("section names cannot be empty".into()));
            }
            if !seen.insert(section.name.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate section name: {}",
                    section.name
                )));
            }
        }

        if self.jira.url.trim().is_empty() {
            return Err(Error::Config("jira.url cannot be empty".into()));
        }

        Ok(())
    }
}

/// Get the configuration directory path
///
/// Returns the path to `~/.config/jira-describe/`.
pub fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| Error::Config("HOME environment variable not set".into()))?;
    Ok(PathBuf::from(home).join(".config").join(PKG_NAME))
}

/// Get the default path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE))
}
