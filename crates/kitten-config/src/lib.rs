//! Console configuration file.
//!
//! A small TOML file in the platform config directory, layered under
//! `KITTEN_*` environment variables, translated into
//! `kitten_core::ConsoleConfig`. The binary applies CLI flags on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use kitten_core::ConsoleConfig;
use kitten_core::config::DEFAULT_CONTROL_URL;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// Top-level `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Base URL of the proxy's control plane.
    #[serde(default = "default_control_url")]
    pub control_url: String,

    /// Stats poll period in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Samples kept for the traffic graph.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Lines requested from the log endpoints.
    #[serde(default = "default_log_limit")]
    pub log_limit: usize,

    /// Request timeout. Unset means requests wait for the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            control_url: default_control_url(),
            poll_interval_ms: default_poll_interval_ms(),
            history_capacity: default_history_capacity(),
            log_limit: default_log_limit(),
            timeout_secs: None,
        }
    }
}

fn default_control_url() -> String {
    DEFAULT_CONTROL_URL.into()
}
fn default_poll_interval_ms() -> u64 {
    1000
}
fn default_history_capacity() -> usize {
    kitten_core::telemetry::DEFAULT_HISTORY_CAPACITY
}
fn default_log_limit() -> usize {
    200
}

impl Config {
    /// Validate and convert into the core's runtime configuration.
    pub fn to_console_config(&self) -> Result<ConsoleConfig, ConfigError> {
        let url: url::Url = self
            .control_url
            .parse()
            .map_err(|_| invalid("control_url", format!("invalid URL: {}", self.control_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(
                "control_url",
                format!("expected http or https, got '{}'", url.scheme()),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(invalid("poll_interval_ms", "must be greater than zero"));
        }
        if self.history_capacity < 2 {
            return Err(invalid("history_capacity", "must be at least 2"));
        }
        if self.log_limit == 0 {
            return Err(invalid("log_limit", "must be greater than zero"));
        }

        let mut console = ConsoleConfig::new(url);
        console.poll_interval = Duration::from_millis(self.poll_interval_ms);
        console.history_capacity = self.history_capacity;
        console.log_limit = self.log_limit;
        console.timeout = self.timeout_secs.map(Duration::from_secs);
        Ok(console)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "blackkitten", "kitten").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("kitten");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults, then `path` (if present), then `KITTEN_*` variables.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("KITTEN_").only(&[
            "control_url",
            "poll_interval_ms",
            "history_capacity",
            "log_limit",
            "timeout_secs",
        ]));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it is missing or unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(&config_path(), cfg)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_without_file() {
        Jail::expect_with(|jail| {
            let cfg = load_config_from(&jail.directory().join("missing.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(cfg, Config::default());
            assert_eq!(cfg.control_url, "http://127.0.0.1:9797");
            assert_eq!(cfg.poll_interval_ms, 1000);
            assert_eq!(cfg.history_capacity, 60);
            Ok(())
        });
    }

    #[test]
    fn file_then_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    control_url = "http://10.0.0.2:9797"
                    log_limit = 50
                "#,
            )?;
            jail.set_env("KITTEN_LOG_LIMIT", "75");
            jail.set_env("KITTEN_TIMEOUT_SECS", "3");

            let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
            assert_eq!(cfg.control_url, "http://10.0.0.2:9797");
            assert_eq!(cfg.log_limit, 75);
            assert_eq!(cfg.timeout_secs, Some(3));
            assert_eq!(cfg.poll_interval_ms, 1000);
            Ok(())
        });
    }

    #[test]
    fn unrelated_env_is_ignored() {
        Jail::expect_with(|jail| {
            jail.set_env("KITTEN_URL", "http://elsewhere:1");
            let cfg = load_config_from(Path::new("none.toml")).map_err(|e| e.to_string())?;
            assert_eq!(cfg.control_url, DEFAULT_CONTROL_URL);
            Ok(())
        });
    }

    #[test]
    fn converts_to_console_config() {
        let cfg = Config {
            timeout_secs: Some(10),
            poll_interval_ms: 500,
            ..Config::default()
        };
        let console = cfg.to_console_config().unwrap();
        assert_eq!(console.control_url.as_str(), "http://127.0.0.1:9797/");
        assert_eq!(console.poll_interval, Duration::from_millis(500));
        assert_eq!(console.timeout, Some(Duration::from_secs(10)));
        assert_eq!(console.log_limit, 200);
    }

    #[test]
    fn rejects_bad_values() {
        let bad_url = Config {
            control_url: "not a url".into(),
            ..Config::default()
        };
        assert!(matches!(
            bad_url.to_console_config(),
            Err(ConfigError::Validation { ref field, .. }) if field == "control_url"
        ));

        let bad_scheme = Config {
            control_url: "ftp://127.0.0.1".into(),
            ..Config::default()
        };
        assert!(bad_scheme.to_console_config().is_err());

        let zero_poll = Config {
            poll_interval_ms: 0,
            ..Config::default()
        };
        assert!(zero_poll.to_console_config().is_err());

        let tiny_history = Config {
            history_capacity: 1,
            ..Config::default()
        };
        assert!(tiny_history.to_console_config().is_err());
    }

    #[test]
    fn save_then_load() {
        Jail::expect_with(|jail| {
            let path = jail.directory().join("nested").join("config.toml");
            let cfg = Config {
                control_url: "http://127.0.0.1:9000".into(),
                timeout_secs: Some(5),
                ..Config::default()
            };

            save_config_to(&path, &cfg).map_err(|e| e.to_string())?;
            let written = std::fs::read_to_string(&path).map_err(|e| e.to_string())?;
            assert!(written.contains("control_url = \"http://127.0.0.1:9000\""));

            let loaded = load_config_from(&path).map_err(|e| e.to_string())?;
            assert_eq!(loaded, cfg);
            Ok(())
        });
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("config.toml");
        save_config_to(&path, &Config::default()).unwrap();
        assert!(path.exists());
    }
}
