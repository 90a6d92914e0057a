#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::{ContentError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_NOTION_API_URL: &str = "https://api.notion.com/v1";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";
pub const DEFAULT_CACHE_DIR: &str = ".cache/content";
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_MAX_MEMORY_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Test,
    Production,
}

impl RuntimeEnvironment {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => RuntimeEnvironment::Production,
            "test" => RuntimeEnvironment::Test,
            _ => RuntimeEnvironment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, RuntimeEnvironment::Production)
    }
}

/// Notion 屬性型別：Status 欄位可為 select 或原生 status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusPropertyType {
    #[default]
    Select,
    Status,
}

impl StatusPropertyType {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "select" => Ok(StatusPropertyType::Select),
            "status" => Ok(StatusPropertyType::Status),
            _ => Err(ContentError::InvalidConfigValueError {
                field: "NOTION_STATUS_PROPERTY_TYPE".to_string(),
                value: raw.to_string(),
                reason: "Expected 'select' or 'status'".to_string(),
            }),
        }
    }

    /// Key used in a database query filter.
    pub fn filter_key(&self) -> &'static str {
        match self {
            StatusPropertyType::Select => "select",
            StatusPropertyType::Status => "status",
        }
    }
}

/// Notion database id for each collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseIds {
    pub ventures: Option<String>,
    pub capabilities: Option<String>,
    pub site_copy: Option<String>,
    pub assets: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub enabled: bool,
    pub ttl: Duration,
    pub directory: PathBuf,
    pub max_memory_bytes: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: DEFAULT_CACHE_TTL,
            directory: PathBuf::from(DEFAULT_CACHE_DIR),
            max_memory_bytes: DEFAULT_MAX_MEMORY_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentConfig {
    pub notion_token: Option<String>,
    pub notion_api_url: String,
    pub notion_version: String,
    pub status_property: StatusPropertyType,
    pub databases: DatabaseIds,
    pub cache: CacheSettings,
    pub fallback_enabled: bool,
    pub environment: RuntimeEnvironment,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            notion_token: None,
            notion_api_url: DEFAULT_NOTION_API_URL.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            status_property: StatusPropertyType::default(),
            databases: DatabaseIds::default(),
            cache: CacheSettings::default(),
            fallback_enabled: true,
            environment: RuntimeEnvironment::default(),
        }
    }
}

/// Configuration problems found before a build. Neither list halts the
/// build; they are copied into the build metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl EnvironmentReport {
    pub fn is_ready(&self) -> bool {
        self.errors.is_empty()
    }
}

impl ContentConfig {
    /// 從程序環境變數載入
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 從任意查詢函式載入，空字串視為未設定
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        config.notion_token = get("NOTION_TOKEN").or_else(|| get("NOTION_API_KEY"));
        if let Some(url) = get("NOTION_API_URL") {
            config.notion_api_url = url.trim_end_matches('/').to_string();
        }

        if let Some(raw) = get("NOTION_STATUS_PROPERTY_TYPE") {
            config.status_property = StatusPropertyType::parse(&raw)?;
        }

        config.databases = DatabaseIds {
            ventures: get("NOTION_VENTURES_DATABASE_ID"),
            capabilities: get("NOTION_CAPABILITIES_DATABASE_ID"),
            site_copy: get("NOTION_SITE_COPY_DATABASE_ID"),
            assets: get("NOTION_ASSETS_DATABASE_ID"),
        };

        if let Some(raw) = get("CONTENT_CACHE_ENABLED") {
            config.cache.enabled = validation::parse_bool("CONTENT_CACHE_ENABLED", &raw)?;
        }
        if let Some(raw) = get("CONTENT_CACHE_TTL_SECONDS") {
            let secs: u64 = validation::parse_number("CONTENT_CACHE_TTL_SECONDS", &raw)?;
            config.cache.ttl = Duration::from_secs(secs);
        }
        if let Some(dir) = get("CONTENT_CACHE_DIR") {
            config.cache.directory = PathBuf::from(dir);
        }
        if let Some(raw) = get("CONTENT_CACHE_MAX_MEMORY_BYTES") {
            config.cache.max_memory_bytes =
                validation::parse_number("CONTENT_CACHE_MAX_MEMORY_BYTES", &raw)?;
        }
        if let Some(raw) = get("CONTENT_FALLBACK_ENABLED") {
            config.fallback_enabled = validation::parse_bool("CONTENT_FALLBACK_ENABLED", &raw)?;
        }

        config.environment = get("APP_ENV")
            .or_else(|| get("NODE_ENV"))
            .map(|raw| RuntimeEnvironment::parse(&raw))
            .unwrap_or_default();

        Ok(config)
    }

    /// 檢查建置所需設定。缺少的設定只記錄，不會中止建置
    pub fn check_environment(&self) -> EnvironmentReport {
        let mut report = EnvironmentReport::default();

        if self.notion_token.is_none() {
            let message = "NOTION_TOKEN is not set; fallback content will be used".to_string();
            if self.environment.is_production() {
                report.errors.push(message);
            } else {
                report.warnings.push(message);
            }
        }

        let databases = [
            ("NOTION_VENTURES_DATABASE_ID", &self.databases.ventures),
            ("NOTION_CAPABILITIES_DATABASE_ID", &self.databases.capabilities),
            ("NOTION_SITE_COPY_DATABASE_ID", &self.databases.site_copy),
            ("NOTION_ASSETS_DATABASE_ID", &self.databases.assets),
        ];
        for (name, value) in databases {
            if value.is_none() {
                report.warnings.push(format!("{} is not set", name));
            }
        }

        if !self.cache.enabled {
            report
                .warnings
                .push("Content cache is disabled; every build hits the remote source".to_string());
        }
        if !self.fallback_enabled {
            report.warnings.push(
                "Fallback content is disabled; a remote failure will fail the build".to_string(),
            );
        }

        report
    }
}

impl Validate for ContentConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("notion_api_url", &self.notion_api_url)?;
        validation::validate_non_empty_string("notion_version", &self.notion_version)?;

        if self.cache.enabled {
            validation::validate_ttl("cache.ttl", self.cache.ttl)?;
            let dir = self.cache.directory.to_str().ok_or_else(|| ContentError::ConfigError {
                message: "cache.directory must be valid UTF-8".to_string(),
            })?;
            validation::validate_path("cache.directory", dir)?;
            validation::validate_min("cache.max_memory_bytes", self.cache.max_memory_bytes, 1024)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = ContentConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.notion_token, None);
        assert_eq!(config.notion_api_url, DEFAULT_NOTION_API_URL);
        assert_eq!(config.status_property, StatusPropertyType::Select);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl, Duration::from_secs(3600));
        assert!(config.fallback_enabled);
        assert_eq!(config.environment, RuntimeEnvironment::Development);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reads_all_variables() {
        let config = ContentConfig::from_lookup(lookup_from(&[
            ("NOTION_API_KEY", "secret_abc"),
            ("NOTION_API_URL", "http://127.0.0.1:9000/v1/"),
            ("NOTION_STATUS_PROPERTY_TYPE", "Status"),
            ("NOTION_VENTURES_DATABASE_ID", "db-ventures"),
            ("NOTION_CAPABILITIES_DATABASE_ID", "db-capabilities"),
            ("NOTION_SITE_COPY_DATABASE_ID", "db-copy"),
            ("NOTION_ASSETS_DATABASE_ID", "db-assets"),
            ("CONTENT_CACHE_ENABLED", "false"),
            ("CONTENT_CACHE_TTL_SECONDS", "120"),
            ("CONTENT_CACHE_DIR", "/tmp/ovsia-cache"),
            ("CONTENT_FALLBACK_ENABLED", "no"),
            ("NODE_ENV", "production"),
        ]))
        .unwrap();

        assert_eq!(config.notion_token.as_deref(), Some("secret_abc"));
        assert_eq!(config.notion_api_url, "http://127.0.0.1:9000/v1");
        assert_eq!(config.status_property, StatusPropertyType::Status);
        assert_eq!(config.databases.site_copy.as_deref(), Some("db-copy"));
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.ttl, Duration::from_secs(120));
        assert_eq!(config.cache.directory, PathBuf::from("/tmp/ovsia-cache"));
        assert!(!config.fallback_enabled);
        assert!(config.environment.is_production());
    }

    #[test]
    fn test_app_env_takes_precedence_over_node_env() {
        let config = ContentConfig::from_lookup(lookup_from(&[
            ("APP_ENV", "test"),
            ("NODE_ENV", "production"),
        ]))
        .unwrap();
        assert_eq!(config.environment, RuntimeEnvironment::Test);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let result =
            ContentConfig::from_lookup(lookup_from(&[("CONTENT_CACHE_TTL_SECONDS", "an hour")]));
        assert!(matches!(
            result,
            Err(ContentError::InvalidConfigValueError { .. })
        ));

        let result =
            ContentConfig::from_lookup(lookup_from(&[("NOTION_STATUS_PROPERTY_TYPE", "checkbox")]));
        assert!(matches!(
            result,
            Err(ContentError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_missing_token_is_error_only_in_production() {
        let dev = ContentConfig::default();
        let report = dev.check_environment();
        assert!(report.is_ready());
        assert!(report.warnings.iter().any(|w| w.contains("NOTION_TOKEN")));

        let prod = ContentConfig {
            environment: RuntimeEnvironment::Production,
            ..ContentConfig::default()
        };
        let report = prod.check_environment();
        assert!(!report.is_ready());
        assert!(report.errors[0].contains("NOTION_TOKEN"));
    }

    #[test]
    fn test_zero_ttl_fails_validation() {
        let mut config = ContentConfig::default();
        config.cache.ttl = Duration::ZERO;
        assert!(config.validate().is_err());

        config.cache.enabled = false;
        assert!(config.validate().is_ok());
    }
}
