use serde::Deserialize;
use std::fs;
use std::path::Path;
use url::Url;

const ENV_CONFIG_PATH: &str = "ISSUE_LENS_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const ENV_REDMINE_API_KEY: &str = "REDMINE_API_KEY";
const ENV_MANTIS_API_TOKEN: &str = "MANTIS_API_TOKEN";

const DEFAULT_ANALYSIS_TIMEOUT_SECS: u64 = 60;
const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Connection settings for a Redmine instance
#[derive(Debug, Clone, Deserialize)]
pub struct RedmineConfig {
    pub base_url: Url,
    /// Sent as `X-Redmine-API-Key`. Overridden by `REDMINE_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Connection settings for a Mantis instance
#[derive(Debug, Clone, Deserialize)]
pub struct MantisConfig {
    pub base_url: Url,
    /// Sent as `Authorization`. Overridden by `MANTIS_API_TOKEN`.
    #[serde(default)]
    pub api_token: Option<String>,
}

/// Tracker configuration. A tracker without a section is disabled.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub redmine: Option<RedmineConfig>,
    #[serde(default)]
    pub mantis: Option<MantisConfig>,
    /// Maximum results per tracker when searching for similar issues
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            redmine: None,
            mantis: None,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

/// Similar-issues analysis collaborator settings
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Endpoint receiving the `POST` with the issue to analyze
    #[serde(default)]
    pub endpoint: Option<Url>,
    #[serde(default = "default_analysis_timeout")]
    pub timeout_secs: u64,
}

fn default_analysis_timeout() -> u64 {
    DEFAULT_ANALYSIS_TIMEOUT_SECS
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: DEFAULT_ANALYSIS_TIMEOUT_SECS,
        }
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub trackers: TrackerConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub trackers: TrackerConfig,
    pub analysis: AnalysisConfig,
    pub port: u16,
    pub host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trackers: TrackerConfig::default(),
            analysis: AnalysisConfig::default(),
            port: 8080,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let config_path = std::env::var(ENV_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let file = Self::load_config_file(&config_path).unwrap_or_default();
        let mut trackers = file.trackers;
        if trackers.search_limit == 0 {
            trackers.search_limit = DEFAULT_SEARCH_LIMIT;
        }

        // Secrets from the environment win over the file
        if let Some(redmine) = trackers.redmine.as_mut() {
            if let Ok(key) = std::env::var(ENV_REDMINE_API_KEY) {
                redmine.api_key = Some(key);
            }
        }
        if let Some(mantis) = trackers.mantis.as_mut() {
            if let Ok(token) = std::env::var(ENV_MANTIS_API_TOKEN) {
                mantis.api_token = Some(token);
            }
        }

        Self {
            trackers,
            analysis: file.analysis,
            port,
            host,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "Loaded configuration from file");
                    Some(config)
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    /// Parse YAML configuration; an empty document yields defaults
    pub fn parse(contents: &str) -> Result<ConfigFile, serde_yaml::Error> {
        let contents = contents.trim();
        if contents.is_empty() {
            return Ok(ConfigFile::default());
        }
        serde_yaml::from_str(contents)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
