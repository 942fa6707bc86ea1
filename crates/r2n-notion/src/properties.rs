//! Page property payloads.

use r2n_blocks::{RichText, split_long};
use r2n_config::PropertyNames;
use serde_json::{Map, Value, json};

/// Values written to a page's properties on every sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageProperties {
    /// Page title, `{hostname}/{name}`.
    pub title: String,
    /// Hostname of the machine that ran the sync.
    pub hostname: String,
    /// Commit hash (may be empty).
    pub commit: String,
}

impl PageProperties {
    /// Build the `properties` object for create and update requests.
    ///
    /// Exactly three properties are produced. Empty values become empty
    /// rich text arrays; long values are split into several segments.
    #[must_use]
    pub fn to_json(&self, names: &PropertyNames) -> Value {
        let mut properties = Map::new();
        properties.insert(names.title.clone(), json!({ "title": text(&self.title) }));
        properties.insert(
            names.hostname.clone(),
            json!({ "rich_text": text(&self.hostname) }),
        );
        properties.insert(
            names.commit.clone(),
            json!({ "rich_text": text(&self.commit) }),
        );
        Value::Object(properties)
    }
}

fn text(value: &str) -> Value {
    if value.is_empty() {
        return Value::Array(Vec::new());
    }
    json!(split_long(vec![RichText::plain(value)]))
}

/// Read the plain title from a `properties` object.
#[cfg(any(test, feature = "mock"))]
pub(crate) fn title_of(properties: &Value, title_property: &str) -> Option<String> {
    let items = properties.get(title_property)?.get("title")?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| item.pointer("/text/content").and_then(Value::as_str))
            .collect(),
    )
}
