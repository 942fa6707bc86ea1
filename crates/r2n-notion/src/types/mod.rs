//! Notion API types.

mod block;
mod error;
mod page;

pub use block::{BlockList, ChildBlock};
pub(crate) use error::ApiErrorBody;
pub use page::{Page, QueryResponse};
