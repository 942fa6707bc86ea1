//! Notion REST API client.
//!
//! Provides a blocking HTTP client authenticated with an integration token.

mod blocks;
mod databases;
mod pages;

use std::time::Duration;

use r2n_blocks::Block;
use serde_json::Value;
use ureq::http::Response;
use ureq::{Agent, Body};

use crate::api::NotionApi;
use crate::error::NotionError;
use crate::types::{BlockList, Page};

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// API version sent with every request.
pub const NOTION_VERSION: &str = "2022-06-28";

/// Notion REST API client.
pub struct NotionClient {
    agent: Agent,
    base_url: String,
    auth_header: String,
}

impl NotionClient {
    /// Create a client for the given API base URL and integration token.
    #[must_use]
    pub fn new(base_url: &str, token: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            auth_header: format!("Bearer {token}"),
        }
    }

    /// Build a full endpoint URL.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Return the body of a successful response, or the decoded API error.
    fn check_response(response: Response<Body>) -> Result<Body, NotionError> {
        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(NotionError::from_response(status, &error_body));
        }

        Ok(body_reader)
    }
}

impl NotionApi for NotionClient {
    fn query_by_title(
        &self,
        database_id: &str,
        title_property: &str,
        title: &str,
    ) -> Result<Vec<Page>, NotionError> {
        Ok(self
            .query_database(database_id, title_property, title)?
            .results)
    }

    fn create_page(&self, database_id: &str, properties: &Value) -> Result<Page, NotionError> {
        self.post_page(database_id, properties)
    }

    fn update_page_properties(
        &self,
        page_id: &str,
        properties: &Value,
    ) -> Result<Page, NotionError> {
        self.patch_page(page_id, properties)
    }

    fn list_children(
        &self,
        block_id: &str,
        start_cursor: Option<&str>,
    ) -> Result<BlockList, NotionError> {
        self.get_children(block_id, start_cursor)
    }

    fn delete_block(&self, block_id: &str) -> Result<(), NotionError> {
        self.remove_block(block_id)
    }

    fn append_children(&self, block_id: &str, children: &[Block]) -> Result<(), NotionError> {
        self.patch_children(block_id, children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_trims_trailing_slash() {
        let client = NotionClient::new("https://api.notion.com/v1/", "secret");
        assert_eq!(
            client.url("/pages"),
            "https://api.notion.com/v1/pages"
        );
        assert_eq!(client.auth_header, "Bearer secret");
    }
}
