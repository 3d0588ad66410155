//! Runtime configuration for the command line.

use std::path::Path;

use serde::Deserialize;

/// Default `tracing` filter when nothing else is configured.
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings loaded from an optional JSON file, then environment overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// `tracing` filter directive, e.g. `"info"` or `"rastra_codec=debug"`.
    pub log_filter: String,
    /// Print each command before running it.
    pub echo_commands: bool,
    /// Abort a script at the first failing command.
    pub stop_on_error: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            echo_commands: false,
            stop_on_error: false,
        }
    }
}

impl CliConfig {
    /// Read `path` if given, otherwise start from defaults, then apply the
    /// `RASTRA_LOG` and `RASTRA_ECHO` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_json(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(filter) = var("RASTRA_LOG").filter(|s| !s.is_empty()) {
            self.log_filter = filter;
        }
        if let Some(echo) = var("RASTRA_ECHO") {
            self.echo_commands = !matches!(echo.as_str(), "" | "0" | "false");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = CliConfig::from_json(r#"{ "stop_on_error": true }"#).unwrap();
        assert!(config.stop_on_error);
        assert_eq!(config.log_filter, "warn");
        assert!(!config.echo_commands);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            CliConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CliConfig::default();
        config.apply_env(|key| match key {
            "RASTRA_LOG" => Some("debug".into()),
            "RASTRA_ECHO" => Some("1".into()),
            _ => None,
        });
        assert_eq!(config.log_filter, "debug");
        assert!(config.echo_commands);

        config.apply_env(|key| (key == "RASTRA_ECHO").then(|| "false".into()));
        assert!(!config.echo_commands);
        assert_eq!(config.log_filter, "debug");
    }
}
