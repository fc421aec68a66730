//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use lecture_data::ApiConfig;
use lecture_observability::{LogFormat, LogLevel};
use serde::{Deserialize, Serialize};

/// File names searched for, in order, from the working directory upward.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["lecture.toml", ".lecture.toml", "lecture.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Listing API.
    #[serde(default)]
    pub api: ApiConfig,

    /// Session fallback storage.
    #[serde(default)]
    pub session: SessionConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Where the session fallback file lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Relative paths resolve against the working directory.
    #[serde(default = "default_session_path")]
    pub path: String,
}

fn default_session_path() -> String {
    ".lecture/session.json".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: default_session_path(),
        }
    }
}

/// Log configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: LogFormat,
}

/// Generate a default lecture.toml config file.
pub fn generate_default_config() -> String {
    r#"# Lecture listing configuration

[api]
base_url = "http://localhost:3000"
listing_path = "/lectures"
# timeout_ms = 10000
# bearer_token = ""

[session]
path = ".lecture/session.json"

[logging]
level = "info"
format = "human"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses_to_defaults() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config: CliConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://reviews.example.edu/api"
            bearer_token = "abc"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://reviews.example.edu/api");
        assert_eq!(config.api.listing_path, "/lectures");
        assert_eq!(config.api.bearer_token.as_deref(), Some("abc"));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.session.path, ".lecture/session.json");
    }

    #[test]
    fn test_load_json_and_toml() {
        let dir = tempfile::tempdir().unwrap();
        let mut expected = CliConfig::default();
        expected.api.timeout_ms = Some(1500);
        expected.logging.level = LogLevel::Debug;

        let toml_path = dir.path().join("lecture.toml");
        std::fs::write(&toml_path, "[api]\ntimeout_ms = 1500\n\n[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(CliConfig::load(&toml_path).unwrap(), expected);

        let json_path = dir.path().join("lecture.json");
        std::fs::write(
            &json_path,
            r#"{"api":{"timeout_ms":1500},"logging":{"level":"debug"}}"#,
        )
        .unwrap();
        assert_eq!(CliConfig::load(&json_path).unwrap(), expected);
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let err = CliConfig::load("/nonexistent/lecture.toml").unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read config file"));
    }
}
