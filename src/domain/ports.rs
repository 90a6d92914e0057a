use crate::domain::model::{Asset, Capability, ContentFetchResult, SiteCopySection, Venture};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 快取檔案的底層儲存
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove_file(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
    fn list_files(&self) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
}

/// Remote source of the four content collections. Implementations never
/// return `Err`; every failure is carried inside the envelope.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn fetch_ventures(&self) -> ContentFetchResult<Vec<Venture>>;
    async fn fetch_capabilities(&self) -> ContentFetchResult<Vec<Capability>>;
    async fn fetch_site_copy(&self) -> ContentFetchResult<Vec<SiteCopySection>>;
    async fn fetch_assets(&self) -> ContentFetchResult<Vec<Asset>>;
}
