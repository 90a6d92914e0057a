use crate::core::cache::{CacheOptions, ContentCache};
use crate::core::fallback;
use crate::domain::model::{
    Asset, Capability, ContentFetchResult, ContentSource, FetchError, SiteContent, SiteCopy,
    SiteCopySection, Venture,
};
use crate::domain::ports::{ContentRepository, Storage};
use crate::utils::error::{ContentError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;

pub mod keys {
    pub const VENTURES: &str = "ventures";
    pub const CAPABILITIES: &str = "capabilities";
    pub const SITE_COPY: &str = "site-copy";
    pub const ASSETS: &str = "assets";
    pub const BUILD_TIME_CONTENT: &str = "build-time-content";
}

/// Per-collection content access: cache, then the repository, then the
/// static fallback for that collection only. Fallback data is never cached
/// here so the next call retries the repository.
pub struct ContentService<R: ContentRepository, S: Storage> {
    repository: R,
    cache: ContentCache<S>,
    fallback_enabled: bool,
}

impl<R: ContentRepository, S: Storage> ContentService<R, S> {
    pub fn new(repository: R, cache: ContentCache<S>, fallback_enabled: bool) -> Self {
        Self {
            repository,
            cache,
            fallback_enabled,
        }
    }

    pub fn cache(&self) -> &ContentCache<S> {
        &self.cache
    }

    async fn resolve<T, Fut>(
        &self,
        key: &str,
        fetch: Fut,
        fallback: fn() -> T,
    ) -> ContentFetchResult<T>
    where
        T: Serialize + DeserializeOwned,
        Fut: Future<Output = ContentFetchResult<T>>,
    {
        if let Some(cached) = self.cache.get::<T>(key).await {
            return ContentFetchResult::ok(cached, ContentSource::Cache);
        }

        let result = fetch.await;
        if let Some(error) = result.error.as_ref().filter(|_| self.fallback_enabled) {
            tracing::warn!("🔁 Using fallback {} after fetch error: {}", key, error);
            return ContentFetchResult::ok(fallback(), ContentSource::Fallback);
        }
        if result.error.is_some() {
            return result;
        }

        if let Some(data) = &result.data {
            self.cache
                .store(key, data, CacheOptions::new(result.source))
                .await;
        }
        result
    }

    pub async fn get_ventures(&self) -> ContentFetchResult<Vec<Venture>> {
        self.resolve(keys::VENTURES, self.repository.fetch_ventures(), fallback::ventures)
            .await
    }

    pub async fn get_capabilities(&self) -> ContentFetchResult<Vec<Capability>> {
        self.resolve(
            keys::CAPABILITIES,
            self.repository.fetch_capabilities(),
            fallback::capabilities,
        )
        .await
    }

    pub async fn get_site_copy(&self) -> ContentFetchResult<Vec<SiteCopySection>> {
        self.resolve(keys::SITE_COPY, self.repository.fetch_site_copy(), || {
            fallback::site_copy().sections().into_iter().cloned().collect()
        })
        .await
    }

    pub async fn get_assets(&self) -> ContentFetchResult<Vec<Asset>> {
        self.resolve(keys::ASSETS, self.repository.fetch_assets(), fallback::assets)
            .await
    }

    /// 同時取得四個集合並組成 SiteContent；只有在停用 fallback 時才可能失敗
    pub async fn get_all_site_content(&self) -> Result<SiteContent> {
        let (ventures, capabilities, site_copy, assets) = tokio::join!(
            self.get_ventures(),
            self.get_capabilities(),
            self.get_site_copy(),
            self.get_assets()
        );

        let unavailable = |name: &str, error: FetchError| {
            ContentError::NoContentError {
                message: format!("{} unavailable: {}", name, error),
            }
        };

        Ok(SiteContent {
            ventures: ventures.into_result().map_err(|e| unavailable("ventures", e))?,
            capabilities: capabilities
                .into_result()
                .map_err(|e| unavailable("capabilities", e))?,
            site_copy: SiteCopy::from_sections(
                site_copy.into_result().map_err(|e| unavailable("site copy", e))?,
            ),
            assets: assets.into_result().map_err(|e| unavailable("assets", e))?,
        })
    }
}
