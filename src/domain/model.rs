use crate::utils::error::ContentError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 內容實際來源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    Notion,
    Fallback,
    Cache,
}

impl std::fmt::Display for ContentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentSource::Notion => write!(f, "notion"),
            ContentSource::Fallback => write!(f, "fallback"),
            ContentSource::Cache => write!(f, "cache"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VentureMetrics {
    pub revenue: String,
    pub users: String,
    pub growth: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venture {
    pub id: String,
    pub name: String,
    pub logo: String,
    pub logo_alt: String,
    pub stat: String,
    pub outcome: String,
    pub description: String,
    pub metrics: VentureMetrics,
    pub site_url: String,
    pub sort_order: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capability {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub features: Vec<String>,
    pub examples: Vec<String>,
    pub technologies: Vec<String>,
    pub sort_order: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyContentType {
    Notion,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteCopySection {
    pub section_name: String,
    pub content_type: CopyContentType,
    pub primary_text: String,
    pub secondary_text: String,
    pub button_text: String,
    pub last_updated: String,
}

/// 佔位區段沒有實際更新時間，固定為 epoch 以保持快照穩定
const PLACEHOLDER_UPDATED: &str = "1970-01-01T00:00:00Z";

impl SiteCopySection {
    /// 缺少的區段以空白佔位補上，不留未定義
    pub fn placeholder(section_name: &str) -> Self {
        Self {
            section_name: section_name.to_string(),
            content_type: CopyContentType::Fallback,
            primary_text: String::new(),
            secondary_text: String::new(),
            button_text: String::new(),
            last_updated: PLACEHOLDER_UPDATED.to_string(),
        }
    }
}

/// Named copy blocks, one per page section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteCopy {
    pub hero: SiteCopySection,
    pub essence: SiteCopySection,
    pub capabilities: SiteCopySection,
    pub proof: SiteCopySection,
    pub cta: SiteCopySection,
    pub footer: SiteCopySection,
}

impl SiteCopy {
    pub const SECTION_NAMES: [&'static str; 6] =
        ["hero", "essence", "capabilities", "proof", "cta", "footer"];

    /// Section names are matched case-insensitively; when a name repeats the
    /// first record wins. Unknown sections are dropped with a debug log.
    pub fn from_sections(sections: Vec<SiteCopySection>) -> Self {
        let mut slots: [Option<SiteCopySection>; 6] = Default::default();

        for section in sections {
            let key = section.section_name.trim().to_ascii_lowercase();
            match Self::SECTION_NAMES.iter().position(|name| *name == key) {
                Some(idx) if slots[idx].is_none() => slots[idx] = Some(section),
                Some(_) => tracing::debug!("Duplicate site copy section '{}' ignored", key),
                None => tracing::debug!("Unknown site copy section '{}' ignored", key),
            }
        }

        let [hero, essence, capabilities, proof, cta, footer] = slots;
        let fill = |slot: Option<SiteCopySection>, name: &str| {
            slot.unwrap_or_else(|| SiteCopySection::placeholder(name))
        };

        Self {
            hero: fill(hero, "hero"),
            essence: fill(essence, "essence"),
            capabilities: fill(capabilities, "capabilities"),
            proof: fill(proof, "proof"),
            cta: fill(cta, "cta"),
            footer: fill(footer, "footer"),
        }
    }

    pub fn sections(&self) -> [&SiteCopySection; 6] {
        [
            &self.hero,
            &self.essence,
            &self.capabilities,
            &self.proof,
            &self.cta,
            &self.footer,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub url: String,
    pub alt_text: String,
    pub usage_context: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContent {
    pub ventures: Vec<Venture>,
    pub capabilities: Vec<Capability>,
    pub site_copy: SiteCopy,
    pub assets: Vec<Asset>,
}

impl SiteContent {
    /// 沒有任何 venture 與 capability 的快照不能用來渲染頁面
    pub fn is_empty(&self) -> bool {
        self.ventures.is_empty() && self.capabilities.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchError {
    pub code: String,
    pub message: String,
    pub status: Option<u16>,
}

impl From<&ContentError> for FetchError {
    fn from(err: &ContentError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            status: err.status(),
        }
    }
}

impl From<ContentError> for FetchError {
    fn from(err: ContentError) -> Self {
        Self::from(&err)
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "[{}] {} (HTTP {})", self.code, self.message, status),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

/// Envelope returned by every fetch function. Exactly one of `data` and
/// `error` is populated; the constructors are the only way to build one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentFetchResult<T> {
    pub data: Option<T>,
    pub error: Option<FetchError>,
    pub timestamp: DateTime<Utc>,
    pub source: ContentSource,
}

impl<T> ContentFetchResult<T> {
    pub fn ok(data: T, source: ContentSource) -> Self {
        Self {
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
            source,
        }
    }

    pub fn err(error: impl Into<FetchError>, source: ContentSource) -> Self {
        Self {
            data: None,
            error: Some(error.into()),
            timestamp: Utc::now(),
            source,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none() && self.data.is_some()
    }

    pub fn into_result(self) -> std::result::Result<T, FetchError> {
        match (self.data, self.error) {
            (_, Some(error)) => Err(error),
            (Some(data), None) => Ok(data),
            (None, None) => Err(FetchError {
                code: "PROCESSING_ERROR".to_string(),
                message: "Result carried neither data nor error".to_string(),
                status: None,
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheMetadata {
    pub build_id: Option<String>,
    pub version: Option<String>,
    pub size: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    /// 寫入時間（毫秒）
    pub timestamp: i64,
    /// 有效期（毫秒）
    pub ttl: u64,
    pub source: ContentSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CacheMetadata>,
}

impl<T> CacheEntry<T> {
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        let ttl = i64::try_from(self.ttl).unwrap_or(i64::MAX);
        now_ms.saturating_sub(self.timestamp) < ttl
    }
}

/// Per-entity validation outcome. Errors mark unusable entities, warnings
/// mark missing recommended fields; neither removes the entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(name: &str, text: &str) -> SiteCopySection {
        SiteCopySection {
            section_name: name.to_string(),
            content_type: CopyContentType::Notion,
            primary_text: text.to_string(),
            secondary_text: String::new(),
            button_text: String::new(),
            last_updated: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_site_copy_synthesizes_missing_sections() {
        let copy = SiteCopy::from_sections(vec![section("Hero", "Build what matters")]);

        assert_eq!(copy.hero.primary_text, "Build what matters");
        assert_eq!(copy.hero.content_type, CopyContentType::Notion);
        assert_eq!(copy.footer.section_name, "footer");
        assert_eq!(copy.footer.content_type, CopyContentType::Fallback);
        assert!(copy.footer.primary_text.is_empty());
    }

    #[test]
    fn test_site_copy_first_duplicate_wins() {
        let copy = SiteCopy::from_sections(vec![
            section("cta", "first"),
            section("CTA", "second"),
            section("sidebar", "unknown"),
        ]);
        assert_eq!(copy.cta.primary_text, "first");
    }

    #[test]
    fn test_cache_entry_validity_window() {
        let entry = CacheEntry {
            data: 1,
            timestamp: 1_000,
            ttl: 500,
            source: ContentSource::Notion,
            metadata: None,
        };
        assert!(entry.is_valid_at(1_499));
        assert!(!entry.is_valid_at(1_500));
        assert!(!entry.is_valid_at(10_000));
    }

    #[test]
    fn test_fetch_result_exactly_one_side() {
        let ok = ContentFetchResult::ok(vec![1, 2], ContentSource::Cache);
        assert!(ok.is_ok());
        assert_eq!(ok.into_result().unwrap(), vec![1, 2]);

        let err: ContentFetchResult<Vec<i32>> = ContentFetchResult::err(
            ContentError::MissingConfigError {
                field: "NOTION_VENTURES_DATABASE_ID".to_string(),
            },
            ContentSource::Notion,
        );
        assert!(!err.is_ok());
        assert!(err.data.is_none());
        assert_eq!(err.into_result().unwrap_err().code, "CONFIG_ERROR");
    }

    #[test]
    fn test_serializes_camel_case() {
        let venture = Venture {
            logo_alt: "Logo".to_string(),
            site_url: "https://example.com".to_string(),
            sort_order: 3,
            ..Default::default()
        };
        let json = serde_json::to_value(&venture).unwrap();
        assert_eq!(json["logoAlt"], "Logo");
        assert_eq!(json["siteUrl"], "https://example.com");
        assert_eq!(json["sortOrder"], 3);

        let asset = Asset {
            asset_type: "image".to_string(),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&asset).unwrap()["type"], "image");
    }
}
