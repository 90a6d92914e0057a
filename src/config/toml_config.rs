use crate::config::{ContentConfig, RuntimeEnvironment, StatusPropertyType};
use crate::utils::error::{ContentError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

/// Optional TOML overlay for [`ContentConfig`]. Every field is optional;
/// values present in the file override the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub environment: Option<String>,
    pub notion: Option<NotionSection>,
    pub databases: Option<DatabasesSection>,
    pub cache: Option<CacheSection>,
    pub fallback: Option<FallbackSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotionSection {
    pub token: Option<String>,
    pub api_url: Option<String>,
    pub version: Option<String>,
    pub status_property_type: Option<StatusPropertyType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabasesSection {
    pub ventures: Option<String>,
    pub capabilities: Option<String>,
    pub site_copy: Option<String>,
    pub assets: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheSection {
    pub enabled: Option<bool>,
    pub ttl_seconds: Option<u64>,
    pub directory: Option<String>,
    pub max_memory_bytes: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FallbackSection {
    pub enabled: Option<bool>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static regex"))
}

/// 展開後仍為 `${VAR}` 的值代表環境變數未設定，視同未填
fn resolved(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty() && !env_var_pattern().is_match(v))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| ContentError::ConfigError {
            message: format!("Cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed)?)
    }

    /// 替換環境變數 (例如 ${NOTION_TOKEN})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 將檔案中的值覆蓋到既有配置
    pub fn apply_to(self, config: &mut ContentConfig) {
        if let Some(env) = resolved(self.environment) {
            config.environment = RuntimeEnvironment::parse(&env);
        }

        if let Some(notion) = self.notion {
            if let Some(token) = resolved(notion.token) {
                config.notion_token = Some(token);
            }
            if let Some(url) = resolved(notion.api_url) {
                config.notion_api_url = url.trim_end_matches('/').to_string();
            }
            if let Some(version) = resolved(notion.version) {
                config.notion_version = version;
            }
            if let Some(kind) = notion.status_property_type {
                config.status_property = kind;
            }
        }

        if let Some(db) = self.databases {
            let targets = [
                (db.ventures, &mut config.databases.ventures),
                (db.capabilities, &mut config.databases.capabilities),
                (db.site_copy, &mut config.databases.site_copy),
                (db.assets, &mut config.databases.assets),
            ];
            for (value, target) in targets {
                if let Some(id) = resolved(value) {
                    *target = Some(id);
                }
            }
        }

        if let Some(cache) = self.cache {
            if let Some(enabled) = cache.enabled {
                config.cache.enabled = enabled;
            }
            if let Some(secs) = cache.ttl_seconds {
                config.cache.ttl = Duration::from_secs(secs);
            }
            if let Some(dir) = resolved(cache.directory) {
                config.cache.directory = PathBuf::from(dir);
            }
            if let Some(bytes) = cache.max_memory_bytes {
                config.cache.max_memory_bytes = bytes;
            }
        }

        if let Some(enabled) = self.fallback.and_then(|f| f.enabled) {
            config.fallback_enabled = enabled;
        }
    }
}

impl ContentConfig {
    /// 環境變數為基礎，再套用 TOML 檔案
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Some(path) = path {
            tracing::info!("📁 Loading configuration overlay from: {}", path.display());
            TomlConfig::from_file(path)?.apply_to(&mut config);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_overlay_replaces_only_present_values() {
        let toml_content = r#"
environment = "production"

[notion]
token = "secret_from_file"
status_property_type = "status"

[databases]
ventures = "db-ventures"

[cache]
ttl_seconds = 30
directory = "/tmp/ovsia"

[fallback]
enabled = false
"#;

        let mut config = ContentConfig::default();
        config.databases.assets = Some("db-assets-env".to_string());

        TomlConfig::from_toml_str(toml_content)
            .unwrap()
            .apply_to(&mut config);

        assert!(config.environment.is_production());
        assert_eq!(config.notion_token.as_deref(), Some("secret_from_file"));
        assert_eq!(config.status_property, StatusPropertyType::Status);
        assert_eq!(config.databases.ventures.as_deref(), Some("db-ventures"));
        assert_eq!(config.databases.assets.as_deref(), Some("db-assets-env"));
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl, Duration::from_secs(30));
        assert_eq!(config.cache.directory, PathBuf::from("/tmp/ovsia"));
        assert!(!config.fallback_enabled);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("OVSIA_TEST_CAPABILITIES_DB", "db-from-env");

        let toml_content = r#"
[databases]
capabilities = "${OVSIA_TEST_CAPABILITIES_DB}"
site_copy = "${OVSIA_TEST_UNSET_VARIABLE}"
"#;

        let mut config = ContentConfig::default();
        TomlConfig::from_toml_str(toml_content)
            .unwrap()
            .apply_to(&mut config);

        assert_eq!(config.databases.capabilities.as_deref(), Some("db-from-env"));
        assert_eq!(config.databases.site_copy, None);

        std::env::remove_var("OVSIA_TEST_CAPABILITIES_DB");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[cache\nenabled = true").unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[notion]\napi_url = \"http://localhost:4010/v1/\"\n")
            .unwrap();

        let mut config = ContentConfig::default();
        TomlConfig::from_file(temp_file.path())
            .unwrap()
            .apply_to(&mut config);

        assert_eq!(config.notion_api_url, "http://localhost:4010/v1");
    }
}
