//! Result types for sync operations.

use crate::replacer::ReplaceOutcome;

/// What happened to the remote page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// A new page was created.
    Created,
    /// An existing page was updated.
    Updated,
}

/// Result of a successful sync.
#[derive(Debug)]
pub struct SyncResult {
    /// Synced page.
    pub page_id: String,
    /// Page title, `{hostname}/{name}`.
    pub page_name: String,
    /// Whether the page was created or updated.
    pub action: SyncAction,
    /// Content replacement counts.
    pub outcome: ReplaceOutcome,
    /// Conversion warnings.
    pub warnings: Vec<String>,
}

/// Result of a dry run (no changes made).
#[derive(Debug)]
pub struct DryRunResult {
    /// Page title, `{hostname}/{name}`.
    pub page_name: String,
    /// Existing page, or `None` if one would be created.
    pub page_id: Option<String>,
    /// Top-level blocks that would be appended.
    pub block_count: usize,
    /// Blocks including nested children.
    pub total_blocks: usize,
    /// Append requests that would be sent.
    pub chunk_count: usize,
    /// Existing children that would be deleted.
    pub existing_blocks: usize,
    /// Conversion warnings.
    pub warnings: Vec<String>,
}

impl DryRunResult {
    /// Action a real run would take.
    #[must_use]
    pub fn action(&self) -> SyncAction {
        if self.page_id.is_some() {
            SyncAction::Updated
        } else {
            SyncAction::Created
        }
    }
}
