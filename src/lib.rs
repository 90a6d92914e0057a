pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{notion::NotionClient, storage::LocalStorage};
pub use config::ContentConfig;
pub use core::{
    build_time::{generate_build_report, BuildOptions, BuildTimeContent, BuildTimeOrchestrator},
    cache::ContentCache,
    content::ContentService,
};
pub use utils::error::{ContentError, Result};
