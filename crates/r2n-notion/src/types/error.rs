//! Notion API error object.

use serde::Deserialize;

/// Error object returned with 4xx/5xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}
