//! Page content replacement.
//!
//! Content is replaced in two phases. All existing children are deleted one
//! by one (failures are logged and skipped), then the new blocks are appended
//! in order. A chunk holds at most `chunk_size` top-level blocks and at most
//! [`MAX_BLOCKS_PER_REQUEST`] blocks counting nested ones. An append failure
//! stops the run; chunks already sent stay on the page.

use r2n_blocks::{Block, MAX_BLOCKS_PER_REQUEST};
use tracing::{debug, info, warn};

use crate::api::{MAX_CHILDREN_PER_REQUEST, NotionApi};
use crate::error::NotionError;
use crate::types::ChildBlock;

/// Counts reported after a successful replacement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// Existing children deleted.
    pub deleted: usize,
    /// Existing children that could not be deleted.
    pub delete_failures: usize,
    /// New top-level blocks appended.
    pub appended_blocks: usize,
    /// Append requests sent.
    pub append_calls: usize,
}

/// Error while replacing page content.
#[derive(Debug, thiserror::Error)]
pub enum ReplaceError {
    /// Listing the existing children failed.
    #[error("failed to list existing blocks: {0}")]
    Clear(#[source] NotionError),

    /// An append request failed.
    #[error(
        "failed to append blocks after {appended_blocks} block(s) in {appended_chunks} chunk(s): {source}"
    )]
    Append {
        /// Chunks appended before the failure.
        appended_chunks: usize,
        /// Blocks appended before the failure.
        appended_blocks: usize,
        /// Underlying API error.
        #[source]
        source: NotionError,
    },
}

/// Replace all children of `page_id` with `blocks`.
///
/// `chunk_size` is clamped to `1..=100`.
///
/// # Errors
///
/// Returns [`ReplaceError::Clear`] if existing children cannot be listed and
/// [`ReplaceError::Append`] on the first failed append.
pub fn replace_content(
    api: &dyn NotionApi,
    page_id: &str,
    blocks: &[Block],
    chunk_size: usize,
) -> Result<ReplaceOutcome, ReplaceError> {
    let existing = list_all_children(api, page_id).map_err(ReplaceError::Clear)?;
    let (deleted, delete_failures) = delete_all(api, &existing);

    let mut appended_blocks = 0;
    let mut append_calls = 0;
    for chunk in plan_chunks(blocks, chunk_size) {
        debug!(
            "Appending chunk {} ({} block(s)) to {}",
            append_calls + 1,
            chunk.len(),
            page_id
        );
        api.append_children(page_id, chunk)
            .map_err(|source| ReplaceError::Append {
                appended_chunks: append_calls,
                appended_blocks,
                source,
            })?;
        append_calls += 1;
        appended_blocks += chunk.len();
    }

    info!(
        "Replaced content of {}: {} deleted, {} appended in {} request(s)",
        page_id, deleted, appended_blocks, append_calls
    );

    Ok(ReplaceOutcome {
        deleted,
        delete_failures,
        appended_blocks,
        append_calls,
    })
}

/// List every direct child of a block, following pagination cursors.
///
/// # Errors
///
/// Returns the API error of the first failed listing request.
pub fn list_all_children(api: &dyn NotionApi, block_id: &str) -> Result<Vec<ChildBlock>, NotionError> {
    let mut children = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let list = api.list_children(block_id, cursor.as_deref())?;
        children.extend(list.results);
        match list.next_cursor {
            Some(next) if list.has_more => cursor = Some(next),
            _ => break,
        }
    }
    Ok(children)
}

/// Split `blocks` into the slices sent by successive append requests.
///
/// A new chunk starts once the current one holds `chunk_size` blocks or the
/// next block's subtree would push it past [`MAX_BLOCKS_PER_REQUEST`]. A
/// single oversized block still gets a chunk of its own.
#[must_use]
pub fn plan_chunks(blocks: &[Block], chunk_size: usize) -> Vec<&[Block]> {
    let chunk_size = effective_chunk_size(chunk_size);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut total = 0;
    for (i, block) in blocks.iter().enumerate() {
        let size = block.subtree_len();
        let count = i - start;
        if count > 0 && (count == chunk_size || total + size > MAX_BLOCKS_PER_REQUEST) {
            chunks.push(&blocks[start..i]);
            start = i;
            total = 0;
        }
        total += size;
    }
    if start < blocks.len() {
        chunks.push(&blocks[start..]);
    }
    chunks
}

/// Number of append requests needed for `blocks`.
#[must_use]
pub fn chunk_count(blocks: &[Block], chunk_size: usize) -> usize {
    plan_chunks(blocks, chunk_size).len()
}

fn effective_chunk_size(chunk_size: usize) -> usize {
    chunk_size.clamp(1, MAX_CHILDREN_PER_REQUEST)
}

/// Delete each block, returning (deleted, failed) counts.
fn delete_all(api: &dyn NotionApi, blocks: &[ChildBlock]) -> (usize, usize) {
    let mut deleted = 0;
    let mut failed = 0;
    for block in blocks {
        match api.delete_block(&block.id) {
            Ok(()) => deleted += 1,
            Err(e) => {
                warn!("Failed to delete block {}: {}", block.id, e);
                failed += 1;
            }
        }
    }
    if !blocks.is_empty() {
        info!("Deleted {} of {} existing block(s)", deleted, blocks.len());
    }
    (deleted, failed)
}
