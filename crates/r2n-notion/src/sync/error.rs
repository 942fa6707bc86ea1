//! Error types for the sync workflow.

use std::fmt;

use r2n_blocks::LoadError;
use r2n_config::ConfigError;

use crate::error::NotionError;
use crate::replacer::ReplaceError;

/// Step of the sync workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    /// Reading and converting the markdown document.
    Load,
    /// Looking up the page by name.
    Resolve,
    /// Creating a new page.
    Create,
    /// Updating properties of an existing page.
    UpdateProperties,
    /// Replacing page content.
    Replace,
    /// Saving the page ID to the configuration file.
    Persist,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Load => "load",
            Self::Resolve => "resolve",
            Self::Create => "create",
            Self::UpdateProperties => "update properties",
            Self::Replace => "replace content",
            Self::Persist => "persist",
        };
        f.write_str(name)
    }
}

/// Error during a sync run.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The input document could not be read.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Page lookup failed.
    #[error("failed to look up page: {0}")]
    Resolve(#[source] NotionError),

    /// Page creation failed.
    #[error("failed to create page: {0}")]
    Create(#[source] NotionError),

    /// Property update failed.
    #[error("failed to update properties of page {page_id}: {source}")]
    UpdateProperties {
        /// Target page.
        page_id: String,
        /// Underlying API error.
        #[source]
        source: NotionError,
    },

    /// Content replacement failed.
    #[error("failed to replace content of page {page_id}: {source}")]
    Replace {
        /// Target page.
        page_id: String,
        /// Underlying replacement error.
        #[source]
        source: ReplaceError,
    },

    /// The page was synced but its ID could not be saved.
    #[error("page {page_id} was synced but the configuration could not be saved: {source}")]
    Persist {
        /// Synced page.
        page_id: String,
        /// Underlying configuration error.
        #[source]
        source: ConfigError,
    },
}

impl SyncError {
    /// Stage at which the run failed.
    #[must_use]
    pub fn stage(&self) -> SyncStage {
        match self {
            Self::Load(_) => SyncStage::Load,
            Self::Resolve(_) => SyncStage::Resolve,
            Self::Create(_) => SyncStage::Create,
            Self::UpdateProperties { .. } => SyncStage::UpdateProperties,
            Self::Replace { .. } => SyncStage::Replace,
            Self::Persist { .. } => SyncStage::Persist,
        }
    }
}
