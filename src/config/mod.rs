//! Configuration management.
//!
//! Settings come from an optional TOML file layered under environment
//! variables prefixed with `TEXTBOOK_CATALOGUE`, using `__` between nested
//! keys.
//!
//! # Configuration File Format
//!
//! ```toml
//! [catalogue]
//! base_url = "http://solr.bccampus.ca:8001/bcc/api/"
//! collection_id = "7567d816-90cc-4547-af7a-3dbd43277639"
//! timeout_seconds = 10
//! page_size = 50
//! info = ["basic", "metadata", "detail", "attachment", "drm"]
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```
//!
//! ```bash
//! export TEXTBOOK_CATALOGUE_CATALOGUE__TIMEOUT_SECONDS=30
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalogue::DEFAULT_BASE_URL;
use crate::models::{
    SearchCriteria, SearchMode, DEFAULT_COLLECTION_ID, DEFAULT_INFO, MAX_PAGE_SIZE,
};

/// Prefix of environment variables that override file settings
pub const ENV_PREFIX: &str = "TEXTBOOK_CATALOGUE";

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "textbook-catalogue.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Remote catalogue settings
    #[serde(default)]
    pub catalogue: CatalogueConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where and how to query the catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueConfig {
    /// Root of the REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Collection searched unless a query says otherwise
    #[serde(default = "default_collection_id")]
    pub collection_id: String,

    /// Per-request timeout; there is no deadline across pages
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Records requested per page, clamped to the API limit of 50
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Detail sections requested for each record
    #[serde(default = "default_info")]
    pub info: Vec<String>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            collection_id: default_collection_id(),
            timeout_seconds: default_timeout(),
            page_size: default_page_size(),
            info: default_info(),
            user_agent: None,
        }
    }
}

impl CatalogueConfig {
    /// Criteria for `term` in `mode` using the configured collection, page size and sections
    pub fn criteria(&self, mode: SearchMode, term: impl Into<String>) -> SearchCriteria {
        SearchCriteria::new(mode, term)
            .collection_id(&self.collection_id)
            .page_size(self.page_size)
            .info(self.info.iter().cloned())
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_collection_id() -> String {
    DEFAULT_COLLECTION_ID.to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_page_size() -> usize {
    MAX_PAGE_SIZE
}

fn default_info() -> Vec<String> {
    DEFAULT_INFO.iter().map(|s| s.to_string()).collect()
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `"json"` for structured output, anything else for human-readable lines
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

impl LoggingConfig {
    /// Whether logs should be emitted as JSON
    pub fn is_json(&self) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Load configuration from an optional file plus the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("catalogue.info"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Get the default configuration
pub fn get_config() -> Config {
    Config::default()
}

/// Look for a configuration file in the usual places.
///
/// Checks `./textbook-catalogue.toml`, then
/// `<config dir>/textbook-catalogue/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(env!("CARGO_PKG_NAME")).join("config.toml"))
        .filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = get_config();
        assert_eq!(config.catalogue.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.catalogue.timeout_seconds, 10);
        assert_eq!(config.catalogue.page_size, 50);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[catalogue]
base_url = "http://localhost:8080/api/"
collection_id = "abc-123"
page_size = 20
info = ["basic"]

[logging]
format = "json"
"#,
        )
        .unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.catalogue.base_url, "http://localhost:8080/api/");
        assert_eq!(config.catalogue.collection_id, "abc-123");
        assert_eq!(config.catalogue.page_size, 20);
        assert_eq!(config.catalogue.info, vec!["basic".to_string()]);
        assert!(config.logging.is_json());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");
        std::fs::write(&path, "invalid = toml = content").unwrap();
        assert!(load_config(Some(path.as_path())).is_err());
    }

    #[test]
    fn test_env_override() {
        std::env::set_var("TEXTBOOK_CATALOGUE_CATALOGUE__USER_AGENT", "env-agent/2.0");
        let config = load_config(None);
        std::env::remove_var("TEXTBOOK_CATALOGUE_CATALOGUE__USER_AGENT");

        let config = config.unwrap();
        assert_eq!(config.catalogue.user_agent.as_deref(), Some("env-agent/2.0"));
    }

    #[test]
    fn test_criteria_from_config() {
        let config = CatalogueConfig {
            collection_id: "other".to_string(),
            page_size: 10,
            info: vec!["basic".to_string(), "drm".to_string()],
            ..Default::default()
        };
        let criteria = config.criteria(SearchMode::Keyword, "art");
        assert_eq!(criteria.mode, SearchMode::Keyword);
        assert_eq!(criteria.collection_id, "other");
        assert_eq!(criteria.effective_page_size(), 10);
        assert_eq!(criteria.info.len(), 2);
    }

    #[test]
    fn test_serialize_error_kept() {
        let err: ConfigError = toml::to_string_pretty(&5u8).unwrap_err().into();
        assert!(matches!(err, ConfigError::Serialize(_)));
        assert!(err.to_string().starts_with("Serialize error: "));
    }

    #[test]
    fn test_to_toml_round_trip() {
        let config = Config::default();
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("[catalogue]"));
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
