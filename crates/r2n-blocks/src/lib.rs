//! Markdown to Notion block conversion.
//!
//! This crate turns a markdown document into the ordered list of block
//! objects the Notion API accepts as page children. Parsing is done by
//! `pulldown-cmark`; this crate maps parser events onto blocks.
//!
//! # Example
//!
//! ```
//! use r2n_blocks::BlockConverter;
//!
//! let result = BlockConverter::new().convert("# Hello\n\n**Bold** text");
//! assert_eq!(result.blocks.len(), 2);
//! assert_eq!(result.blocks[0].type_name(), "heading_1");
//! ```

mod block;
mod code;
mod converter;
mod rich_text;
mod state;

use std::path::{Path, PathBuf};

pub use block::{
    Block, CodeBlock, ImageBlock, MAX_BLOCKS_PER_REQUEST, MAX_CHILDREN, MAX_NESTING_DEPTH,
    TableBlock, TableRowBlock, TextBlock, ToDoBlock,
};
pub use code::{PLAIN_TEXT, api_language};
pub use converter::{BlockConverter, ConvertResult};
pub use rich_text::{
    Annotations, MAX_RICH_TEXT_ITEMS, MAX_TEXT_LENGTH, RichText, plain_text, split_long,
};

/// Error reading a markdown document.
#[derive(Debug, thiserror::Error)]
#[error("cannot read {}: {source}", .path.display())]
pub struct LoadError {
    /// Path that could not be read.
    pub path: PathBuf,
    /// Underlying I/O error.
    #[source]
    pub source: std::io::Error,
}

/// Read a markdown file and convert it into blocks.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read as UTF-8 text.
pub fn load_file(path: &Path) -> Result<ConvertResult, LoadError> {
    let markdown = std::fs::read_to_string(path).map_err(|source| LoadError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BlockConverter::new().convert(&markdown))
}
