//! Page sync workflow.
//!
//! This module provides the [`SyncRunner`] struct that encapsulates the entire
//! workflow for publishing a markdown file to a Notion page:
//!
//! 1. Read and convert the markdown document
//! 2. Look up the page titled `{hostname}/{name}` in the database
//! 3. Create the page, or update its properties if it exists
//! 4. Replace the page content
//! 5. Save the page ID to the configuration file
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use r2n_config::SyncConfig;
//! use r2n_notion::{NotionClient, SyncRunner};
//!
//! let mut config = SyncConfig::load(None, None)?;
//! let client = NotionClient::new(&config.api_url, &config.token);
//! let runner = SyncRunner::new(&client);
//!
//! // Perform sync
//! let result = runner.sync(&mut config, Path::new("README.md"), "build-01")?;
//!
//! // Or dry-run to preview changes
//! let dry_run = runner.dry_run(&config, Path::new("README.md"), "build-01")?;
//! # Ok(())
//! # }
//! ```

mod error;
mod executor;
mod result;

pub use error::{SyncError, SyncStage};
pub use executor::SyncRunner;
pub use result::{DryRunResult, SyncAction, SyncResult};
