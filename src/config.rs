//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file: `$XDG_CONFIG_HOME/ccd/config.yaml`
//! 3. `.env` in the current directory (`CCD_*` keys only)
//! 4. Environment variables: `CCD_*` prefix

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::DotEnv;

pub const DEFAULT_API_URL: &str = "http://localhost:8001";
pub const DEFAULT_API_KEY: &str = "root";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_PREFIX: &str = "CCD";

/// Keys settable with `ccd cli set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
    #[value(name = "API_URL")]
    ApiUrl,
    #[value(name = "API_KEY")]
    ApiKey,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::ApiUrl => "API_URL",
            ConfigKey::ApiKey => "API_KEY",
        }
    }
}

/// On-disk shape of `config.yaml`. Unknown keys are preserved on write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(rename = "API_URL", default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(rename = "API_KEY", default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl ConfigFile {
    fn with_defaults() -> Self {
        Self {
            api_url: Some(DEFAULT_API_URL.to_string()),
            api_key: Some(DEFAULT_API_KEY.to_string()),
            extra: BTreeMap::new(),
        }
    }

    /// Read a config file. A missing or empty file yields no values.
    pub fn read(path: &Path) -> Result<Self, ApplicationError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
            message: format!("read {}: {}", path.display(), e),
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|e| ApplicationError::Config {
            message: format!("parse {}: {}", path.display(), e),
        })
    }

    pub fn write(&self, path: &Path) -> Result<(), ApplicationError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| ApplicationError::Config {
                message: format!("create {}: {}", dir.display(), e),
            })?;
        }
        let content = serde_yaml::to_string(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })?;
        std::fs::write(path, content).map_err(|e| ApplicationError::Config {
            message: format!("write {}: {}", path.display(), e),
        })
    }

    pub fn set(&mut self, key: ConfigKey, value: &str) {
        match key {
            ConfigKey::ApiUrl => self.api_url = Some(value.to_string()),
            ConfigKey::ApiKey => self.api_key = Some(value.to_string()),
        }
    }

    /// All key/value pairs in display order.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        if let Some(url) = &self.api_url {
            entries.push((ConfigKey::ApiUrl.as_str().to_string(), url.clone()));
        }
        if let Some(key) = &self.api_key {
            entries.push((ConfigKey::ApiKey.as_str().to_string(), key.clone()));
        }
        for (k, v) in &self.extra {
            let value = match v {
                serde_yaml::Value::String(s) => s.clone(),
                other => serde_yaml::to_string(other)
                    .map(|s| s.trim_end().to_string())
                    .unwrap_or_default(),
            };
            entries.push((k.clone(), value));
        }
        entries
    }
}

/// Effective client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// canary-cd base URL, without trailing slash
    pub api_url: String,
    /// Bearer token sent with every request
    pub api_key: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// File the settings were read from
    pub config_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            config_path: default_config_path(),
        }
    }
}

/// Get the XDG config directory for ccd.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ccd").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.yaml"))
}

fn default_config_path() -> PathBuf {
    global_config_path().unwrap_or_else(|| PathBuf::from(".config/ccd/config.yaml"))
}

/// Read a `.env` file for `CCD_*` overrides. `None` when it does not exist.
///
/// Only `CCD_*` keys are used, so lines the parser rejects are skipped
/// rather than failing every command run next to an unrelated `.env`.
pub fn read_dotenv(path: &Path) -> Result<Option<DotEnv>, ApplicationError> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    let (dotenv, skipped) = DotEnv::parse_lenient(&content, path);
    for e in skipped {
        debug!("ignoring .env line: {e}");
    }
    Ok(Some(dotenv))
}

impl Settings {
    /// Load settings from the standard locations.
    ///
    /// Creates the config file with defaults on first use.
    pub fn load() -> Result<Self, ApplicationError> {
        let config_path = default_config_path();
        ensure_config_file(&config_path)?;

        let dotenv = read_dotenv(Path::new(".env"))?;

        Self::load_with(&config_path, dotenv.as_ref(), None)
    }

    /// Load settings from explicit sources.
    ///
    /// `env` replaces the process environment when given (used by tests).
    pub fn load_with(
        config_path: &Path,
        dotenv: Option<&DotEnv>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self {
            config_path: config_path.to_path_buf(),
            ..Self::default()
        };

        let file = ConfigFile::read(config_path)?;
        current.apply_file(&file);

        if let Some(dotenv) = dotenv {
            let prefixed: config::Map<String, String> = dotenv
                .entries
                .iter()
                .filter(|(k, _)| k.starts_with(&format!("{ENV_PREFIX}_")))
                .cloned()
                .collect();
            current = current.apply_env_overrides(Some(prefixed))?;
        }

        current = current.apply_env_overrides(env)?;
        current.api_url = current.api_url.trim_end_matches('/').to_string();

        debug!(
            "settings: api_url={} timeout={:?} config={}",
            current.api_url,
            current.timeout,
            current.config_path.display()
        );
        Ok(current)
    }

    fn apply_file(&mut self, file: &ConfigFile) {
        if let Some(url) = &file.api_url {
            self.api_url = url.clone();
        }
        if let Some(key) = &file.api_key {
            self.api_key = key.clone();
        }
    }

    /// Apply CCD_* variables as explicit overrides.
    ///
    /// `source` of `None` reads the process environment.
    fn apply_env_overrides(
        mut self,
        source: Option<config::Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .source(source),
        );
        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("api_url") {
            self.api_url = val;
        }
        if let Ok(val) = config.get_string("api_key") {
            self.api_key = val;
        }
        if let Ok(val) = config.get_string("timeout") {
            let secs: u64 = val.parse().map_err(|_| ApplicationError::Config {
                message: format!("{ENV_PREFIX}_TIMEOUT must be a number of seconds, got '{val}'"),
            })?;
            self.timeout = Duration::from_secs(secs);
        }

        Ok(self)
    }

    /// Persist one key to the config file.
    pub fn store(config_path: &Path, key: ConfigKey, value: &str) -> Result<(), ApplicationError> {
        let mut file = ConfigFile::read(config_path)?;
        file.set(key, value);
        file.write(config_path)
    }
}

/// Write a default config file if none exists yet.
pub fn ensure_config_file(path: &Path) -> Result<bool, ApplicationError> {
    if path.exists() {
        return Ok(false);
    }
    debug!("creating default config at {}", path.display());
    ConfigFile::with_defaults().write(path)?;
    Ok(true)
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_config_key_when_rendering_then_uses_upper_case_name() {
        assert_eq!(ConfigKey::ApiUrl.as_str(), "API_URL");
        assert_eq!(
            ConfigKey::from_str("API_KEY", false).ok(),
            Some(ConfigKey::ApiKey)
        );
    }

    #[test]
    fn given_yaml_with_extra_keys_when_parsing_then_keeps_them() {
        let file: ConfigFile =
            serde_yaml::from_str("API_URL: https://cd.example.com\nTHEME: dark\n").unwrap();
        assert_eq!(file.api_url.as_deref(), Some("https://cd.example.com"));
        assert_eq!(file.api_key, None);
        assert_eq!(
            file.entries(),
            vec![
                ("API_URL".to_string(), "https://cd.example.com".to_string()),
                ("THEME".to_string(), "dark".to_string()),
            ]
        );
    }

    #[test]
    fn given_defaults_when_serializing_then_writes_upper_case_keys() {
        let yaml = serde_yaml::to_string(&ConfigFile::with_defaults()).unwrap();
        assert!(yaml.contains("API_URL: http://localhost:8001"));
        assert!(yaml.contains("API_KEY: root"));
    }
}
