use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants;
use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub geocoder: GeocoderConfig,
    pub pacing: PacingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Replaces the embedded fallback table when set.
    pub fallback_table: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(constants::DEFAULT_INPUT_PATH),
            output: PathBuf::from(constants::DEFAULT_OUTPUT_PATH),
            fallback_table: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub user_agent: String,
    /// Appended to every query, e.g. "Los Angeles, CA".
    pub locality: String,
    pub expected_state: String,
    pub request_interval_ms: u64,
    pub timeout_seconds: Option<u64>,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: constants::DEFAULT_ENDPOINT.to_string(),
            user_agent: constants::DEFAULT_USER_AGENT.to_string(),
            locality: constants::DEFAULT_LOCALITY.to_string(),
            expected_state: constants::DEFAULT_EXPECTED_STATE.to_string(),
            request_interval_ms: constants::DEFAULT_REQUEST_INTERVAL_MS,
            timeout_seconds: None,
        }
    }
}

impl GeocoderConfig {
    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub row_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            row_delay_ms: constants::DEFAULT_ROW_DELAY_MS,
        }
    }
}

impl PacingConfig {
    pub fn row_delay(&self) -> Duration {
        Duration::from_millis(self.row_delay_ms)
    }
}

impl Config {
    /// Loads the given file, or `config.toml` when no path is given.
    ///
    /// A missing default file falls back to built-in defaults; a missing explicit
    /// file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (config_path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(constants::DEFAULT_CONFIG_PATH), false),
        };

        if !explicit && !config_path.exists() {
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            PipelineError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        Self::from_toml_str(&config_content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let required = [
            ("geocoder.endpoint", &self.geocoder.endpoint),
            ("geocoder.user_agent", &self.geocoder.user_agent),
            ("geocoder.locality", &self.geocoder.locality),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(PipelineError::Config(format!("{} must not be empty", name)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.geocoder.endpoint, constants::DEFAULT_ENDPOINT);
        assert_eq!(config.geocoder.expected_state, "California");
        assert_eq!(config.pacing.row_delay(), Duration::from_secs(2));
        assert_eq!(config.geocoder.request_interval(), Duration::from_secs(2));
        assert!(config.geocoder.timeout().is_none());
        assert!(config.paths.fallback_table.is_none());
    }

    #[test]
    fn partial_sections_override_only_given_fields() {
        let config = Config::from_toml_str(
            r#"
            [paths]
            output = "out/orgs.json"

            [geocoder]
            timeout_seconds = 30

            [pacing]
            row_delay_ms = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.paths.output, PathBuf::from("out/orgs.json"));
        assert_eq!(config.paths.input, PathBuf::from(constants::DEFAULT_INPUT_PATH));
        assert_eq!(config.geocoder.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.geocoder.user_agent, constants::DEFAULT_USER_AGENT);
        assert_eq!(config.pacing.row_delay(), Duration::ZERO);
    }

    #[test]
    fn empty_locality_is_rejected() {
        let err = Config::from_toml_str("[geocoder]\nlocality = \"  \"\n").unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    fn loads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[geocoder]\nexpected_state = \"Nevada\"\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.geocoder.expected_state, "Nevada");
    }
}
