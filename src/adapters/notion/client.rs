use super::schema::{ApiErrorBody, QueryResponse};
use crate::config::{ContentConfig, StatusPropertyType};
use crate::core::transform;
use crate::domain::model::{
    Asset, Capability, ContentFetchResult, ContentSource, SiteCopySection, Venture,
};
use crate::domain::ports::ContentRepository;
use crate::utils::error::{ContentError, Result};
use crate::utils::validation;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::json;

const PAGE_SIZE: u32 = 100;
const MAX_PAGES: usize = 50;

/// The four Notion databases backing the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Ventures,
    Capabilities,
    SiteCopy,
    Assets,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Ventures => "ventures",
            Collection::Capabilities => "capabilities",
            Collection::SiteCopy => "site copy",
            Collection::Assets => "assets",
        }
    }

    fn env_var(&self) -> &'static str {
        match self {
            Collection::Ventures => "NOTION_VENTURES_DATABASE_ID",
            Collection::Capabilities => "NOTION_CAPABILITIES_DATABASE_ID",
            Collection::SiteCopy => "NOTION_SITE_COPY_DATABASE_ID",
            Collection::Assets => "NOTION_ASSETS_DATABASE_ID",
        }
    }

    fn status_filter(&self) -> &'static str {
        match self {
            Collection::Assets => "Active",
            _ => "Published",
        }
    }

    fn sort_property(&self) -> &'static str {
        match self {
            Collection::Ventures | Collection::Capabilities => "Sort Order",
            Collection::SiteCopy => "Section Name",
            Collection::Assets => "Name",
        }
    }
}

#[derive(Debug, Serialize)]
struct SortSpec<'a> {
    property: &'a str,
    direction: &'a str,
}

/// 欄位順序固定，start_cursor 只在翻頁時出現
#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    filter: serde_json::Value,
    sorts: Vec<SortSpec<'a>>,
    page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_cursor: Option<String>,
}

/// Query adapter for the Notion REST API.
#[derive(Debug, Clone)]
pub struct NotionClient {
    client: Client,
    base_url: String,
    notion_version: String,
    status_property: StatusPropertyType,
    token: Option<String>,
    ventures_db: Option<String>,
    capabilities_db: Option<String>,
    site_copy_db: Option<String>,
    assets_db: Option<String>,
}

impl NotionClient {
    pub fn new(config: &ContentConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.notion_api_url.trim_end_matches('/').to_string(),
            notion_version: config.notion_version.clone(),
            status_property: config.status_property,
            token: config.notion_token.clone(),
            ventures_db: config.databases.ventures.clone(),
            capabilities_db: config.databases.capabilities.clone(),
            site_copy_db: config.databases.site_copy.clone(),
            assets_db: config.databases.assets.clone(),
        }
    }

    fn database_id(&self, collection: Collection) -> Result<&str> {
        let id = match collection {
            Collection::Ventures => &self.ventures_db,
            Collection::Capabilities => &self.capabilities_db,
            Collection::SiteCopy => &self.site_copy_db,
            Collection::Assets => &self.assets_db,
        };
        validation::validate_required_field(collection.env_var(), id).map(String::as_str)
    }

    fn token(&self) -> Result<&str> {
        validation::validate_required_field("NOTION_TOKEN", &self.token).map(String::as_str)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> Result<reqwest::RequestBuilder> {
        let token = self.token()?;
        Ok(self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .header("Notion-Version", &self.notion_version))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<serde_json::Value> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Notion API response status: {}", status);

        if status.is_success() {
            let bytes = response.bytes().await?;
            return serde_json::from_slice(&bytes).map_err(|e| ContentError::ProcessingError {
                message: format!("Malformed Notion response: {}", e),
            });
        }

        let body = response.text().await.unwrap_or_default();
        let parsed: ApiErrorBody = serde_json::from_str(&body).unwrap_or(ApiErrorBody {
            code: "unknown".to_string(),
            message: body,
        });
        Err(ContentError::RemoteError {
            status: status.as_u16(),
            code: parsed.code,
            message: parsed.message,
        })
    }

    /// 查詢資料庫並跟隨 next_cursor 取得所有頁面
    pub async fn query_database(&self, collection: Collection) -> Result<Vec<serde_json::Value>> {
        let database_id = self.database_id(collection)?;
        let path = format!("/databases/{}/query", database_id);
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;

        for page in 1..=MAX_PAGES {
            let body = QueryRequest {
                filter: json!({
                    "property": "Status",
                    self.status_property.filter_key(): { "equals": collection.status_filter() }
                }),
                sorts: vec![SortSpec {
                    property: collection.sort_property(),
                    direction: "ascending",
                }],
                page_size: PAGE_SIZE,
                start_cursor: cursor.take(),
            };

            tracing::debug!("📡 Querying {} (page {})", collection.name(), page);
            let value = self
                .send(self.request(reqwest::Method::POST, &path)?.json(&body))
                .await?;
            let response: QueryResponse =
                serde_json::from_value(value).map_err(|e| ContentError::ProcessingError {
                    message: format!("Unexpected {} query response: {}", collection.name(), e),
                })?;

            records.extend(response.results);

            match (response.has_more, response.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => return Ok(records),
            }
        }

        tracing::warn!(
            "⚠️ {} query stopped after {} pages; remaining records ignored",
            collection.name(),
            MAX_PAGES
        );
        Ok(records)
    }

    async fn fetch_collection<T>(
        &self,
        collection: Collection,
        transform: fn(Vec<serde_json::Value>) -> Result<Vec<T>>,
    ) -> ContentFetchResult<Vec<T>> {
        let result = self
            .query_database(collection)
            .await
            .and_then(transform);

        match result {
            Ok(items) => {
                tracing::info!("📥 Fetched {} {} from Notion", items.len(), collection.name());
                ContentFetchResult::ok(items, ContentSource::Notion)
            }
            Err(e) => {
                tracing::warn!(
                    "⚠️ Failed to fetch {} ({}): {}",
                    collection.name(),
                    e.code(),
                    e
                );
                ContentFetchResult::err(e, ContentSource::Notion)
            }
        }
    }

    /// 以 /users/me 驗證權杖，回傳 bot 名稱
    pub async fn check_connection(&self) -> Result<String> {
        let value = self.send(self.request(reqwest::Method::GET, "/users/me")?).await?;
        Ok(value
            .get("name")
            .and_then(|n| n.as_str())
            .unwrap_or("unnamed integration")
            .to_string())
    }
}

#[async_trait]
impl ContentRepository for NotionClient {
    async fn fetch_ventures(&self) -> ContentFetchResult<Vec<Venture>> {
        self.fetch_collection(Collection::Ventures, transform::transform_ventures)
            .await
    }

    async fn fetch_capabilities(&self) -> ContentFetchResult<Vec<Capability>> {
        self.fetch_collection(Collection::Capabilities, transform::transform_capabilities)
            .await
    }

    async fn fetch_site_copy(&self) -> ContentFetchResult<Vec<SiteCopySection>> {
        self.fetch_collection(Collection::SiteCopy, transform::transform_site_copy_sections)
            .await
    }

    async fn fetch_assets(&self) -> ContentFetchResult<Vec<Asset>> {
        self.fetch_collection(Collection::Assets, transform::transform_assets)
            .await
    }
}
