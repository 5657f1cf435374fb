//! Configuration loading and merging.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::env::{OverlayEnv, ProcessEnv};
use crate::parser::Parser;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Expand `$NAME` / `${NAME}` references.
    pub expand_env: Option<bool>,

    /// Run `` `cmd` `` / `$(cmd)` substitutions.
    pub expand_substitution: Option<bool>,

    /// Working directory for substitutions (defaults to the request cwd).
    pub dir: Option<String>,

    /// Split leading `NAME=value` words into a separate list by default.
    pub split_env: Option<bool>,

    /// Fixed variables layered over the process environment.
    pub env: HashMap<String, String>,

    /// Audit logging settings.
    pub audit: AuditConfig,
}

/// Audit logging configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AuditConfig {
    /// Enable audit logging.
    pub enabled: bool,
    /// Path to audit log file.
    pub path: Option<String>,
}

impl Config {
    /// Load configuration, merging user and project configs.
    pub fn load(cwd: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config()? {
            config = user_config;
        }

        if let Some(cwd) = cwd
            && let Some(project_config) = Self::load_project_config(cwd)?
        {
            config.merge(project_config);
        }

        Ok(config)
    }

    /// Load user-level config from the platform config dir.
    fn load_user_config() -> Result<Option<Self>, ConfigError> {
        match Self::user_config_path() {
            Some(path) if path.exists() => Self::read(&path).map(Some),
            _ => Ok(None),
        }
    }

    /// Load project-level config from .shellwords.toml
    fn load_project_config(cwd: &Path) -> Result<Option<Self>, ConfigError> {
        let path = cwd.join(".shellwords.toml");
        if path.exists() {
            return Self::read(&path).map(Some);
        }
        Ok(None)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Get user config path.
    /// Respects SHELLWORDS_CONFIG env var for testing.
    fn user_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("SHELLWORDS_CONFIG") {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|d| d.join("shellwords/config.toml"))
    }

    /// Merge another config into this one (other takes precedence for scalars).
    fn merge(&mut self, other: Config) {
        self.env.extend(other.env);

        if other.expand_env.is_some() {
            self.expand_env = other.expand_env;
        }
        if other.expand_substitution.is_some() {
            self.expand_substitution = other.expand_substitution;
        }
        if other.split_env.is_some() {
            self.split_env = other.split_env;
        }
        if other.dir.is_some() {
            self.dir = other.dir;
        }
        if other.audit.enabled {
            self.audit.enabled = true;
            if other.audit.path.is_some() {
                self.audit.path = other.audit.path;
            }
        }
    }

    /// Build a parser from this config.
    ///
    /// `overrides` take precedence over the `[env]` table; substitutions run
    /// in `dir`, falling back to `cwd`.
    pub fn build_parser(&self, cwd: Option<&Path>, overrides: &HashMap<String, String>) -> Parser {
        let mut vars = self.env.clone();
        vars.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));

        let parser = Parser::new()
            .expand_env(self.expand_env.unwrap_or(false))
            .expand_substitution(self.expand_substitution.unwrap_or(false))
            .resolver(OverlayEnv::new(vars, ProcessEnv));

        match self.dir.as_deref().map(Path::new).or(cwd) {
            Some(dir) => parser.dir(dir),
            None => parser,
        }
    }
}
