use crate::adapters::notion::NotionClient;
use crate::adapters::storage::LocalStorage;
use crate::config::ContentConfig;
use crate::core::cache::{CacheOptions, ContentCache};
use crate::core::content::keys;
use crate::core::fallback;
use crate::core::validate::{validate_site_content, ContentValidationReport};
use crate::domain::model::{CacheMetadata, ContentSource, FetchError, SiteContent, SiteCopy};
use crate::domain::ports::{ContentRepository, Storage};
use crate::utils::error::{ContentError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// 略過快取，直接向遠端取資料
    pub force_fresh: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildMetadata {
    pub build_id: String,
    pub timestamp: DateTime<Utc>,
    pub source: ContentSource,
    pub duration_ms: u64,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// One snapshot per build, with where it came from and what went wrong.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildTimeContent {
    pub content: SiteContent,
    pub metadata: BuildMetadata,
}

impl BuildTimeContent {
    pub fn validation(&self) -> ContentValidationReport {
        validate_site_content(&self.content)
    }
}

fn new_build_id() -> String {
    format!("build-{}", Utc::now().format("%Y%m%d%H%M%S%3f"))
}

/// Coordinates cache lookup, remote fetch, fallback and cache write.
///
/// The remote join is all-or-nothing: if any of the four collections fails,
/// the whole snapshot is replaced by the static fallback content.
pub struct BuildTimeOrchestrator<R: ContentRepository, S: Storage> {
    repository: R,
    cache: ContentCache<S>,
    config: ContentConfig,
}

impl BuildTimeOrchestrator<NotionClient, LocalStorage> {
    /// Notion 來源加上本機磁碟快取
    pub fn from_config(config: ContentConfig) -> Self {
        let repository = NotionClient::new(&config);
        let cache = ContentCache::new(LocalStorage::new(config.cache.directory.clone()), &config.cache);
        Self::new(repository, cache, config)
    }
}

impl<R: ContentRepository, S: Storage> BuildTimeOrchestrator<R, S> {
    pub fn new(repository: R, cache: ContentCache<S>, config: ContentConfig) -> Self {
        Self {
            repository,
            cache,
            config,
        }
    }

    pub fn cache(&self) -> &ContentCache<S> {
        &self.cache
    }

    pub async fn fetch_build_time_content(&self, options: BuildOptions) -> Result<BuildTimeContent> {
        let started = Instant::now();
        let build_id = new_build_id();
        tracing::info!("🚀 Resolving site content ({})", build_id);

        // 1. 環境檢查
        let env_report = self.config.check_environment();
        for error in &env_report.errors {
            tracing::error!("❌ {}", error);
        }
        for warning in &env_report.warnings {
            tracing::warn!("⚠️ {}", warning);
        }
        let mut errors = env_report.errors;
        let mut warnings = env_report.warnings;

        // 2. 快取
        if !options.force_fresh {
            if let Some(content) = self.cache.get::<SiteContent>(keys::BUILD_TIME_CONTENT).await {
                tracing::info!("🗄️ Using cached site content");
                let result = self.finish(content, ContentSource::Cache, build_id, started, errors, warnings);
                return Ok(result);
            }
        } else {
            tracing::info!("🔄 force_fresh set, skipping cache lookup");
        }

        // 3. 遠端
        let (content, source) = match self.fetch_remote().await {
            Ok(content) if !content.is_empty() => (content, ContentSource::Notion),
            Ok(_) => {
                warnings.push("Remote content contained no ventures or capabilities".to_string());
                self.fallback_or_fail(&mut warnings)?
            }
            Err(fetch_errors) => {
                for error in &fetch_errors {
                    tracing::error!("❌ {}", error);
                }
                errors.extend(fetch_errors);
                self.fallback_or_fail(&mut warnings)?
            }
        };

        // 4. 寫入快取
        let metadata = CacheMetadata {
            build_id: Some(build_id.clone()),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
            size: None,
        };
        let cached = self
            .cache
            .store(
                keys::BUILD_TIME_CONTENT,
                &content,
                CacheOptions::new(source).with_metadata(metadata),
            )
            .await;
        if self.cache.is_enabled() && !cached {
            warnings.push("Site content could not be written to the disk cache".to_string());
        }

        // 5. 摘要
        Ok(self.finish(content, source, build_id, started, errors, warnings))
    }

    /// 四個集合並行取得；任何一個失敗就回傳所有錯誤
    async fn fetch_remote(&self) -> std::result::Result<SiteContent, Vec<String>> {
        let (ventures, capabilities, site_copy, assets) = tokio::join!(
            self.repository.fetch_ventures(),
            self.repository.fetch_capabilities(),
            self.repository.fetch_site_copy(),
            self.repository.fetch_assets()
        );

        let mut errors = Vec::new();
        let mut record = |name: &str, error: Option<&FetchError>| {
            if let Some(error) = error {
                errors.push(format!("Failed to fetch {}: {}", name, error));
            }
        };
        record("ventures", ventures.error.as_ref());
        record("capabilities", capabilities.error.as_ref());
        record("site copy", site_copy.error.as_ref());
        record("assets", assets.error.as_ref());

        if !errors.is_empty() {
            return Err(errors);
        }

        match (ventures.data, capabilities.data, site_copy.data, assets.data) {
            (Some(ventures), Some(capabilities), Some(site_copy), Some(assets)) => Ok(SiteContent {
                ventures,
                capabilities,
                site_copy: SiteCopy::from_sections(site_copy),
                assets,
            }),
            _ => Err(vec!["Remote fetch returned neither data nor error".to_string()]),
        }
    }

    fn fallback_or_fail(&self, warnings: &mut Vec<String>) -> Result<(SiteContent, ContentSource)> {
        if !self.config.fallback_enabled {
            return Err(ContentError::NoContentError {
                message: "remote content unavailable and fallback content is disabled".to_string(),
            });
        }
        tracing::warn!("🔁 Substituting static fallback content");
        warnings.push("Using static fallback content".to_string());
        Ok((fallback::site_content(), ContentSource::Fallback))
    }

    fn finish(
        &self,
        content: SiteContent,
        source: ContentSource,
        build_id: String,
        started: Instant,
        errors: Vec<String>,
        mut warnings: Vec<String>,
    ) -> BuildTimeContent {
        let validation = validate_site_content(&content);
        warnings.extend(validation.issues().cloned());

        let metadata = BuildMetadata {
            build_id,
            timestamp: Utc::now(),
            source,
            duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            errors,
            warnings,
        };

        tracing::info!(
            build_id = %metadata.build_id,
            source = %metadata.source,
            ventures = content.ventures.len(),
            capabilities = content.capabilities.len(),
            assets = content.assets.len(),
            errors = metadata.errors.len(),
            warnings = metadata.warnings.len(),
            duration_ms = metadata.duration_ms,
            "✅ Site content resolved"
        );

        BuildTimeContent { content, metadata }
    }
}

fn push_list(report: &mut String, title: &str, items: &[String]) {
    let _ = writeln!(report, "\n## {} ({})\n", title, items.len());
    if items.is_empty() {
        let _ = writeln!(report, "None.");
    }
    for item in items {
        let _ = writeln!(report, "- {}", item);
    }
}

/// Markdown summary of a build for human build logs.
pub fn generate_build_report(build: &BuildTimeContent) -> String {
    let meta = &build.metadata;
    let content = &build.content;
    let validation = build.validation();
    let mut report = String::new();

    let _ = writeln!(report, "# Content Build Report\n");
    let _ = writeln!(report, "- **Build ID:** {}", meta.build_id);
    let _ = writeln!(report, "- **Generated:** {}", meta.timestamp.to_rfc3339());
    let _ = writeln!(report, "- **Source:** {}", meta.source);
    let _ = writeln!(report, "- **Duration:** {} ms", meta.duration_ms);

    let _ = writeln!(report, "\n## Content\n");
    let _ = writeln!(report, "| Collection | Count |");
    let _ = writeln!(report, "|---|---|");
    let _ = writeln!(report, "| Ventures | {} |", content.ventures.len());
    let _ = writeln!(report, "| Capabilities | {} |", content.capabilities.len());
    let _ = writeln!(report, "| Site copy sections | {} |", content.site_copy.sections().len());
    let _ = writeln!(report, "| Assets | {} |", content.assets.len());

    let _ = writeln!(report, "\n## Validation\n");
    let _ = writeln!(report, "| Collection | Valid | Total | Complete |");
    let _ = writeln!(report, "|---|---|---|---|");
    for (name, collection) in validation.collections() {
        let _ = writeln!(
            report,
            "| {} | {} | {} | {} |",
            name,
            collection.valid,
            collection.total,
            if collection.is_complete() { "yes" } else { "no" }
        );
    }

    push_list(&mut report, "Errors", &meta.errors);
    push_list(&mut report, "Warnings", &meta.warnings);
    report
}
