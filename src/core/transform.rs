use crate::adapters::notion::schema::RawPage;
use crate::domain::model::{
    Asset, Capability, CopyContentType, SiteCopySection, Venture, VentureMetrics,
};
use crate::utils::error::{ContentError, Result};
use chrono::Utc;

/// 依 `sort_order` 排序的實體
pub trait SortOrdered {
    fn sort_order(&self) -> i64;
}

impl SortOrdered for Venture {
    fn sort_order(&self) -> i64 {
        self.sort_order
    }
}

impl SortOrdered for Capability {
    fn sort_order(&self) -> i64 {
        self.sort_order
    }
}

/// Ascending by `sort_order`; equal keys keep their fetch order.
pub fn sort_by_order<T: SortOrdered>(items: &mut [T]) {
    items.sort_by_key(|item| item.sort_order());
}

pub fn transform_venture(page: &RawPage) -> Result<Venture> {
    Ok(Venture {
        id: page.id.clone(),
        name: page.text("Name")?,
        logo: page.file_url("Logo")?,
        logo_alt: page.text("Logo Alt")?,
        stat: page.text("Stat")?,
        outcome: page.text("Outcome")?,
        description: page.text("Description")?,
        metrics: VentureMetrics {
            revenue: page.text("Revenue")?,
            users: page.text("Users")?,
            growth: page.text("Growth")?,
        },
        site_url: page.text("Site URL")?,
        sort_order: page.number("Sort Order")?.unwrap_or(0),
    })
}

pub fn transform_capability(page: &RawPage) -> Result<Capability> {
    Ok(Capability {
        id: page.id.clone(),
        title: page.text("Title")?,
        subtitle: page.text("Subtitle")?,
        description: page.text("Description")?,
        features: page.list("Features")?,
        examples: page.list("Examples")?,
        technologies: page.list("Technologies")?,
        sort_order: page.number("Sort Order")?.unwrap_or(0),
    })
}

pub fn transform_site_copy(page: &RawPage) -> Result<SiteCopySection> {
    Ok(SiteCopySection {
        section_name: page.text("Section Name")?.trim().to_ascii_lowercase(),
        content_type: CopyContentType::Notion,
        primary_text: page.text("Primary Text")?,
        secondary_text: page.text("Secondary Text")?,
        button_text: page.text("Button Text")?,
        last_updated: page
            .last_edited_time
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339()),
    })
}

pub fn transform_asset(page: &RawPage) -> Result<Asset> {
    Ok(Asset {
        name: page.text("Name")?,
        asset_type: page.text("Type")?,
        url: page.file_url("File")?,
        alt_text: page.text("Alt Text")?,
        usage_context: page.list("Usage Context")?,
    })
}

/// 逐筆解析並轉換；任何一筆失敗即回傳帶有索引的處理錯誤
fn transform_all<T>(
    collection: &str,
    records: Vec<serde_json::Value>,
    transform: fn(&RawPage) -> Result<T>,
) -> Result<Vec<T>> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            RawPage::parse(record)
                .and_then(|page| transform(&page))
                .map_err(|e| ContentError::ProcessingError {
                    message: format!("{} record #{}: {}", collection, index, e),
                })
        })
        .collect()
}

pub fn transform_ventures(records: Vec<serde_json::Value>) -> Result<Vec<Venture>> {
    let mut ventures = transform_all("ventures", records, transform_venture)?;
    sort_by_order(&mut ventures);
    Ok(ventures)
}

pub fn transform_capabilities(records: Vec<serde_json::Value>) -> Result<Vec<Capability>> {
    let mut capabilities = transform_all("capabilities", records, transform_capability)?;
    sort_by_order(&mut capabilities);
    Ok(capabilities)
}

pub fn transform_site_copy_sections(
    records: Vec<serde_json::Value>,
) -> Result<Vec<SiteCopySection>> {
    transform_all("site copy", records, transform_site_copy)
}

pub fn transform_assets(records: Vec<serde_json::Value>) -> Result<Vec<Asset>> {
    transform_all("assets", records, transform_asset)
}
