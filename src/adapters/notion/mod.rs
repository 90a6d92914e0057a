// Notion adapter: raw response schema and the database query client.

pub mod client;
pub mod schema;

pub use client::{Collection, NotionClient};
