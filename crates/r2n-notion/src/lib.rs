//! Notion integration for readme2notion.
//!
//! This crate provides everything needed to publish a markdown document as a
//! Notion database page:
//! - [`NotionClient`]: REST API client authenticated with an integration token
//! - [`resolve`]: find a page by its exact title
//! - [`replace_content`]: clear a page and append new blocks in chunks
//! - [`SyncRunner`](sync::SyncRunner): the full create-or-update workflow
//! - [`MockNotion`] for testing (behind `mock` feature flag)
//!
//! # API Client
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use r2n_notion::{NotionApi, NotionClient, Resolution, resolve};
//!
//! let client = NotionClient::new("https://api.notion.com/v1", "secret_token");
//! let resolution = resolve(&client, "0123abcd-4567-89ab-cdef-0123456789ab", "Name", "host/readme")?;
//! if let Resolution::Found(page_id) = resolution {
//!     let children = client.list_children(&page_id, None)?;
//! }
//! # Ok(())
//! # }
//! ```

// API abstraction
mod api;
pub use api::{LIST_PAGE_SIZE, MAX_CHILDREN_PER_REQUEST, NotionApi};

// API client
mod client;
pub use client::{NOTION_VERSION, NotionClient};

// Types
mod types;
pub use types::{BlockList, ChildBlock, Page, QueryResponse};

// Page properties
mod properties;
pub use properties::PageProperties;

// Page lookup and content replacement
mod replacer;
mod resolver;
pub use replacer::{
    ReplaceError, ReplaceOutcome, chunk_count, list_all_children, plan_chunks, replace_content,
};
pub use resolver::{Resolution, resolve};

// Sync workflow
pub mod sync;
pub use sync::{SyncError, SyncRunner, SyncStage};

// Mock for testing
#[cfg(any(test, feature = "mock"))]
mod mock;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockNotion;

// Errors
pub mod error;
pub use error::NotionError;
