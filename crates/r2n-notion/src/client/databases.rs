//! Database operations for Notion API.

use serde_json::json;
use tracing::info;

use super::{NOTION_VERSION, NotionClient};
use crate::error::NotionError;
use crate::types::QueryResponse;

impl NotionClient {
    /// Query a database for pages whose title equals `title`.
    pub(crate) fn query_database(
        &self,
        database_id: &str,
        title_property: &str,
        title: &str,
    ) -> Result<QueryResponse, NotionError> {
        let url = self.url(&format!("/databases/{database_id}/query"));

        let payload = json!({
            "filter": {
                "property": title_property,
                "title": {"equals": title}
            },
            "page_size": 1
        });

        info!("Querying database {} for page {:?}", database_id, title);

        let response = self
            .agent
            .post(&url)
            .header("Authorization", &self.auth_header)
            .header("Notion-Version", NOTION_VERSION)
            .header("Accept", "application/json")
            .send_json(&payload)?;

        let response: QueryResponse = Self::check_response(response)?.read_json()?;
        info!(
            "Found {} page(s) titled {:?}",
            response.results.len(),
            title
        );
        Ok(response)
    }
}
