// Adapters layer: concrete implementations for external systems (Notion API, local files).

pub mod notion;
pub mod storage;
