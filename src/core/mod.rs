pub mod build_time;
pub mod cache;
pub mod content;
pub mod fallback;
pub mod transform;
pub mod validate;

pub use crate::domain::model::{ContentFetchResult, ContentSource, SiteContent};
pub use crate::domain::ports::{ContentRepository, Storage};
pub use crate::utils::error::Result;
