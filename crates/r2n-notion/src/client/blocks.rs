//! Block operations for Notion API.

use r2n_blocks::Block;
use serde::Serialize;
use tracing::{debug, info};

use super::{NOTION_VERSION, NotionClient};
use crate::api::LIST_PAGE_SIZE;
use crate::error::NotionError;
use crate::types::BlockList;

#[derive(Serialize)]
struct AppendChildren<'a> {
    children: &'a [Block],
}

impl NotionClient {
    /// Get one page of a block's children.
    pub(crate) fn get_children(
        &self,
        block_id: &str,
        start_cursor: Option<&str>,
    ) -> Result<BlockList, NotionError> {
        let url = self.url(&format!("/blocks/{block_id}/children"));

        debug!("Listing children of block {} (cursor {:?})", block_id, start_cursor);

        let mut request = self
            .agent
            .get(&url)
            .query("page_size", LIST_PAGE_SIZE.to_string())
            .header("Authorization", &self.auth_header)
            .header("Notion-Version", NOTION_VERSION)
            .header("Accept", "application/json");
        if let Some(cursor) = start_cursor {
            request = request.query("start_cursor", cursor);
        }

        Ok(Self::check_response(request.call()?)?.read_json()?)
    }

    /// Delete a block.
    pub(crate) fn remove_block(&self, block_id: &str) -> Result<(), NotionError> {
        let url = self.url(&format!("/blocks/{block_id}"));

        debug!("Deleting block {}", block_id);

        let response = self
            .agent
            .delete(&url)
            .header("Authorization", &self.auth_header)
            .header("Notion-Version", NOTION_VERSION)
            .call()?;

        Self::check_response(response)?;
        Ok(())
    }

    /// Append children to a block.
    pub(crate) fn patch_children(
        &self,
        block_id: &str,
        children: &[Block],
    ) -> Result<(), NotionError> {
        let url = self.url(&format!("/blocks/{block_id}/children"));

        info!("Appending {} block(s) to {}", children.len(), block_id);

        let response = self
            .agent
            .patch(&url)
            .header("Authorization", &self.auth_header)
            .header("Notion-Version", NOTION_VERSION)
            .header("Accept", "application/json")
            .send_json(&AppendChildren { children })?;

        Self::check_response(response)?;
        Ok(())
    }
}
