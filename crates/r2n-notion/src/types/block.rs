//! Block listing types.

use serde::{Deserialize, Serialize};

/// Existing child block of a page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChildBlock {
    /// Block ID.
    pub id: String,
    /// Block type (e.g. `paragraph`).
    #[serde(rename = "type", default)]
    pub block_type: String,
}

/// One page of a block children listing.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BlockList {
    /// Child blocks in this page of results.
    pub results: Vec<ChildBlock>,
    /// Whether more results are available.
    #[serde(default)]
    pub has_more: bool,
    /// Cursor for the next page of results.
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_block_list() {
        let json = r#"{
            "object": "list",
            "results": [
                {"object": "block", "id": "b1", "type": "paragraph", "paragraph": {}},
                {"object": "block", "id": "b2", "type": "divider", "divider": {}}
            ],
            "next_cursor": "b3",
            "has_more": true,
            "type": "block",
            "block": {}
        }"#;
        let list: BlockList = serde_json::from_str(json).unwrap();

        assert_eq!(list.results.len(), 2);
        assert_eq!(list.results[1].block_type, "divider");
        assert!(list.has_more);
        assert_eq!(list.next_cursor.as_deref(), Some("b3"));
    }

    #[test]
    fn test_deserialize_last_page() {
        let json = r#"{"object":"list","results":[],"next_cursor":null,"has_more":false}"#;
        let list: BlockList = serde_json::from_str(json).unwrap();
        assert!(list.results.is_empty());
        assert_eq!(list.next_cursor, None);
    }
}
