//! Notion API abstraction.

use r2n_blocks::Block;
use serde_json::Value;

use crate::error::NotionError;
use crate::types::{BlockList, Page};

/// Largest number of children accepted by one append request.
pub const MAX_CHILDREN_PER_REQUEST: usize = r2n_blocks::MAX_CHILDREN;

/// Page size used when listing block children.
pub const LIST_PAGE_SIZE: usize = 100;

/// The subset of the Notion API used to sync a page.
///
/// Implemented by [`NotionClient`](crate::NotionClient) over HTTP and by
/// `MockNotion` in memory.
pub trait NotionApi {
    /// Find pages in a database whose title property equals `title`.
    ///
    /// At most one page is returned.
    fn query_by_title(
        &self,
        database_id: &str,
        title_property: &str,
        title: &str,
    ) -> Result<Vec<Page>, NotionError>;

    /// Create a page under a database with the given properties object.
    fn create_page(&self, database_id: &str, properties: &Value) -> Result<Page, NotionError>;

    /// Overwrite properties of an existing page.
    fn update_page_properties(&self, page_id: &str, properties: &Value)
    -> Result<Page, NotionError>;

    /// List one page of a block's direct children.
    fn list_children(
        &self,
        block_id: &str,
        start_cursor: Option<&str>,
    ) -> Result<BlockList, NotionError>;

    /// Delete (archive) a block.
    fn delete_block(&self, block_id: &str) -> Result<(), NotionError>;

    /// Append blocks to the end of a block's children.
    ///
    /// Callers keep `children` within [`MAX_CHILDREN_PER_REQUEST`] and the
    /// whole payload within [`r2n_blocks::MAX_BLOCKS_PER_REQUEST`].
    fn append_children(&self, block_id: &str, children: &[Block]) -> Result<(), NotionError>;
}
