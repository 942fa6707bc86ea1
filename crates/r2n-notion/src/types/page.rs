//! Notion page types.

use serde::{Deserialize, Serialize};

/// Notion page.
///
/// Only the fields used by the sync are decoded.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page {
    /// Page ID.
    pub id: String,
    /// Web URL of the page.
    #[serde(default)]
    pub url: Option<String>,
}

/// Response of a database query.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryResponse {
    /// Matching pages.
    pub results: Vec<Page>,
    /// Whether more results are available.
    #[serde(default)]
    pub has_more: bool,
}
