//! Strict shapes for the parts of a Notion query response we read.
//!
//! Pages are parsed into these types before any field access, so an
//! unexpected record shape surfaces as a typed error instead of a silent
//! empty value.

use crate::utils::error::{ContentError, Result};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<serde_json::Value>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPage {
    pub id: String,
    #[serde(default)]
    pub last_edited_time: Option<String>,
    pub properties: HashMap<String, PropertyValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileUrl {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileRef {
    External { external: FileUrl },
    File { file: FileUrl },
}

impl FileRef {
    pub fn url(&self) -> &str {
        match self {
            FileRef::External { external } => &external.url,
            FileRef::File { file } => &file.url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title { title: Vec<RichText> },
    RichText { rich_text: Vec<RichText> },
    Number { number: Option<f64> },
    Select { select: Option<SelectOption> },
    Status { status: Option<SelectOption> },
    MultiSelect { multi_select: Vec<SelectOption> },
    Url { url: Option<String> },
    Files { files: Vec<FileRef> },
    Checkbox { checkbox: bool },
    #[serde(other)]
    Unsupported,
}

impl PropertyValue {
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Title { .. } => "title",
            PropertyValue::RichText { .. } => "rich_text",
            PropertyValue::Number { .. } => "number",
            PropertyValue::Select { .. } => "select",
            PropertyValue::Status { .. } => "status",
            PropertyValue::MultiSelect { .. } => "multi_select",
            PropertyValue::Url { .. } => "url",
            PropertyValue::Files { .. } => "files",
            PropertyValue::Checkbox { .. } => "checkbox",
            PropertyValue::Unsupported => "unsupported",
        }
    }
}

fn concat(parts: &[RichText]) -> String {
    parts.iter().map(|p| p.plain_text.as_str()).collect::<String>()
}

fn mismatch(property: &str, expected: &'static str, value: &PropertyValue) -> ContentError {
    ContentError::UnexpectedPropertyError {
        property: property.to_string(),
        expected,
        found: value.kind(),
    }
}

impl RawPage {
    pub fn parse(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ContentError::ProcessingError {
            message: format!("Malformed page record: {}", e),
        })
    }

    /// 文字類屬性攤平成單一字串；屬性不存在時回傳空字串
    pub fn text(&self, property: &str) -> Result<String> {
        let Some(value) = self.properties.get(property) else {
            return Ok(String::new());
        };
        match value {
            PropertyValue::Title { title } => Ok(concat(title)),
            PropertyValue::RichText { rich_text } => Ok(concat(rich_text)),
            PropertyValue::Url { url } => Ok(url.clone().unwrap_or_default()),
            PropertyValue::Select { select } | PropertyValue::Status { status: select } => {
                Ok(select.as_ref().map(|s| s.name.clone()).unwrap_or_default())
            }
            other => Err(mismatch(property, "text", other)),
        }
    }

    /// 取第一個檔案的網址，也接受 url 屬性
    pub fn file_url(&self, property: &str) -> Result<String> {
        let Some(value) = self.properties.get(property) else {
            return Ok(String::new());
        };
        match value {
            PropertyValue::Files { files } => {
                Ok(files.first().map(|f| f.url().to_string()).unwrap_or_default())
            }
            PropertyValue::Url { url } => Ok(url.clone().unwrap_or_default()),
            other => Err(mismatch(property, "files", other)),
        }
    }

    /// multi_select 的選項名稱；rich_text 以換行分隔
    pub fn list(&self, property: &str) -> Result<Vec<String>> {
        let Some(value) = self.properties.get(property) else {
            return Ok(Vec::new());
        };
        match value {
            PropertyValue::MultiSelect { multi_select } => {
                Ok(multi_select.iter().map(|o| o.name.clone()).collect())
            }
            PropertyValue::RichText { rich_text } => Ok(concat(rich_text)
                .lines()
                .map(|line| line.trim().trim_start_matches(&['-', '•'][..]).trim())
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()),
            other => Err(mismatch(property, "multi_select", other)),
        }
    }

    pub fn number(&self, property: &str) -> Result<Option<i64>> {
        let Some(value) = self.properties.get(property) else {
            return Ok(None);
        };
        match value {
            PropertyValue::Number { number } => Ok(number.map(|n| n.round() as i64)),
            other => Err(mismatch(property, "number", other)),
        }
    }
}
