use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::providers::EdamamCredentials;

/// Main search configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub mealdb: MealDbConfig,
    #[serde(default)]
    pub edamam: EdamamConfig,
}

/// TheMealDB settings
#[derive(Debug, Deserialize, Clone)]
pub struct MealDbConfig {
    #[serde(default = "default_mealdb_base_url")]
    pub base_url: String,
}

/// Edamam settings. Search is silently skipped when either credential is missing.
#[derive(Debug, Deserialize, Clone)]
pub struct EdamamConfig {
    #[serde(default = "default_edamam_base_url")]
    pub base_url: String,
    /// Application id (can also be set via EDAMAM_APP_ID)
    pub app_id: Option<String>,
    /// Application key (can also be set via EDAMAM_APP_KEY)
    pub app_key: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            mealdb: MealDbConfig::default(),
            edamam: EdamamConfig::default(),
        }
    }
}

impl Default for MealDbConfig {
    fn default() -> Self {
        Self {
            base_url: default_mealdb_base_url(),
        }
    }
}

impl Default for EdamamConfig {
    fn default() -> Self {
        Self {
            base_url: default_edamam_base_url(),
            app_id: None,
            app_key: None,
        }
    }
}

// Default value functions
fn default_timeout_ms() -> u64 {
    10_000
}

fn default_mealdb_base_url() -> String {
    "https://www.themealdb.com/api/json/v1/1".to_string()
}

fn default_edamam_base_url() -> String {
    "https://api.edamam.com".to_string()
}

impl SearchConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with MEALPLAN__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: MEALPLAN__EDAMAM__APP_ID
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl EdamamConfig {
    /// Credentials if both halves are configured and non-blank
    pub fn credentials(&self) -> Option<EdamamCredentials> {
        EdamamCredentials::from_parts(self.app_id.as_deref(), self.app_key.as_deref())
    }
}

/// Load configuration from file and environment variables
///
/// Edamam credentials fall back to the plain `EDAMAM_APP_ID` and
/// `EDAMAM_APP_KEY` environment variables when not configured.
pub fn load_config() -> Result<SearchConfig, ConfigError> {
    let mut config = load_from(environment())?;
    if config.edamam.app_id.is_none() {
        config.edamam.app_id = std::env::var("EDAMAM_APP_ID").ok();
    }
    if config.edamam.app_key.is_none() {
        config.edamam.app_key = std::env::var("EDAMAM_APP_KEY").ok();
    }

    Ok(config)
}

// Values stay strings: credentials such as "0123" must not be read as numbers
fn environment() -> Environment {
    // Use double underscore for nested: MEALPLAN__EDAMAM__APP_KEY
    Environment::with_prefix("MEALPLAN")
        .prefix_separator("__")
        .separator("__")
}

fn load_from(environment: Environment) -> Result<SearchConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        .add_source(environment)
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        assert_eq!(default_timeout_ms(), 10_000);
        assert_eq!(
            default_mealdb_base_url(),
            "https://www.themealdb.com/api/json/v1/1"
        );
        assert_eq!(default_edamam_base_url(), "https://api.edamam.com");
    }

    #[test]
    fn test_search_config_default() {
        let config = SearchConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.edamam.credentials().is_none());
    }

    #[test]
    fn test_credentials_require_both_parts() {
        let mut edamam = EdamamConfig {
            app_id: Some("id".to_string()),
            ..Default::default()
        };
        assert!(edamam.credentials().is_none());

        edamam.app_key = Some("   ".to_string());
        assert!(edamam.credentials().is_none());

        edamam.app_key = Some("key".to_string());
        let credentials = edamam.credentials().unwrap();
        assert_eq!(credentials.app_id(), "id");
        assert_eq!(credentials.app_key(), "key");
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let settings = Config::builder()
            .add_source(File::from_str(
                r#"
                timeout_ms = 2500

                [edamam]
                app_id = "abc"
                app_key = "def"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let config: SearchConfig = settings.try_deserialize().unwrap();
        assert_eq!(config.timeout_ms, 2500);
        assert_eq!(config.mealdb.base_url, default_mealdb_base_url());
        assert_eq!(config.edamam.base_url, default_edamam_base_url());
        assert!(config.edamam.credentials().is_some());
    }

    fn env_source(vars: &[(&str, &str)]) -> Environment {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(map))
    }

    #[test]
    fn test_env_credentials_are_kept_verbatim() {
        let config = load_from(env_source(&[
            ("MEALPLAN__EDAMAM__APP_ID", "0123"),
            ("MEALPLAN__EDAMAM__APP_KEY", "12e45678"),
        ]))
        .unwrap();

        let credentials = config.edamam.credentials().unwrap();
        assert_eq!(credentials.app_id(), "0123");
        assert_eq!(credentials.app_key(), "12e45678");
    }

    #[test]
    fn test_env_timeout_parses_from_string() {
        let config = load_from(env_source(&[("MEALPLAN__TIMEOUT_MS", "2500")])).unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(2500));
    }

    #[test]
    fn test_load_config_without_file() {
        // No config.toml in the test directory; defaults must still load
        let result = load_config();
        assert!(result.is_ok());
    }
}
