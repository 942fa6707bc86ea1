//! Page operations for Notion API.

use serde_json::{Value, json};
use tracing::info;

use super::{NOTION_VERSION, NotionClient};
use crate::error::NotionError;
use crate::types::Page;

impl NotionClient {
    /// Create a page under a database.
    pub(crate) fn post_page(
        &self,
        database_id: &str,
        properties: &Value,
    ) -> Result<Page, NotionError> {
        let url = self.url("/pages");

        let payload = json!({
            "parent": {"database_id": database_id},
            "properties": properties
        });

        info!("Creating page in database {}", database_id);

        let response = self
            .agent
            .post(&url)
            .header("Authorization", &self.auth_header)
            .header("Notion-Version", NOTION_VERSION)
            .header("Accept", "application/json")
            .send_json(&payload)?;

        let page: Page = Self::check_response(response)?.read_json()?;
        info!("Created page {}", page.id);
        Ok(page)
    }

    /// Overwrite the given properties of a page.
    pub(crate) fn patch_page(&self, page_id: &str, properties: &Value) -> Result<Page, NotionError> {
        let url = self.url(&format!("/pages/{page_id}"));

        let payload = json!({ "properties": properties });

        info!("Updating properties of page {}", page_id);

        let response = self
            .agent
            .patch(&url)
            .header("Authorization", &self.auth_header)
            .header("Notion-Version", NOTION_VERSION)
            .header("Accept", "application/json")
            .send_json(&payload)?;

        Ok(Self::check_response(response)?.read_json()?)
    }
}
