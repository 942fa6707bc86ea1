//! Rich text segments.
//!
//! A block's text is a list of segments, each carrying its own annotations
//! and optional link. The API limits both the length of a single segment and
//! the number of segments per block, so long content is split rather than
//! truncated.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Maximum length of one segment, in UTF-16 code units.
pub const MAX_TEXT_LENGTH: usize = 2000;

/// Maximum number of segments in a single block.
pub const MAX_RICH_TEXT_ITEMS: usize = 100;

/// Inline formatting applied to a segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Annotations {
    /// Bold text.
    pub bold: bool,
    /// Italic text.
    pub italic: bool,
    /// Struck-through text.
    pub strikethrough: bool,
    /// Inline code.
    pub code: bool,
}

impl Annotations {
    /// Whether no formatting is applied.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

/// A single text segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichText {
    /// Text content.
    pub content: String,
    /// Link target, if the segment is a link.
    pub link: Option<String>,
    /// Formatting.
    pub annotations: Annotations,
}

impl RichText {
    /// Create an unformatted segment.
    #[must_use]
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            link: None,
            annotations: Annotations::default(),
        }
    }

    /// Create a segment with the given formatting and link.
    #[must_use]
    pub fn new(content: impl Into<String>, annotations: Annotations, link: Option<String>) -> Self {
        Self {
            content: content.into(),
            link,
            annotations,
        }
    }

    /// Whether `other` has the same formatting and link as `self`.
    fn same_style(&self, other: &Self) -> bool {
        self.annotations == other.annotations && self.link == other.link
    }
}

impl Serialize for RichText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Link<'a> {
            url: &'a str,
        }

        #[derive(Serialize)]
        struct Text<'a> {
            content: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            link: Option<Link<'a>>,
        }

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", "text")?;
        map.serialize_entry(
            "text",
            &Text {
                content: &self.content,
                link: self.link.as_deref().map(|url| Link { url }),
            },
        )?;
        if !self.annotations.is_plain() {
            map.serialize_entry("annotations", &self.annotations)?;
        }
        map.end()
    }
}

/// Append a segment, merging it into the previous one when styles match.
pub(crate) fn push_merged(segments: &mut Vec<RichText>, segment: RichText) {
    if segment.content.is_empty() {
        return;
    }
    match segments.last_mut() {
        Some(last) if last.same_style(&segment) => last.content.push_str(&segment.content),
        _ => segments.push(segment),
    }
}

/// Split every segment longer than [`MAX_TEXT_LENGTH`] into several segments
/// with the same style.
#[must_use]
pub fn split_long(segments: Vec<RichText>) -> Vec<RichText> {
    let mut out = Vec::with_capacity(segments.len());
    for segment in segments {
        if utf16_len(&segment.content) <= MAX_TEXT_LENGTH {
            out.push(segment);
            continue;
        }
        for part in split_content(&segment.content, MAX_TEXT_LENGTH) {
            out.push(RichText::new(part, segment.annotations, segment.link.clone()));
        }
    }
    out
}

/// Concatenated content of all segments.
#[must_use]
pub fn plain_text(segments: &[RichText]) -> String {
    segments.iter().map(|s| s.content.as_str()).collect()
}

fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

fn split_content(content: &str, max: usize) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut len = 0;
    for ch in content.chars() {
        let width = ch.len_utf16();
        if len + width > max {
            parts.push(std::mem::take(&mut current));
            len = 0;
        }
        current.push(ch);
        len += width;
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_plain_segment_serializes_without_annotations() {
        let value = serde_json::to_value(RichText::plain("hello")).unwrap();
        assert_eq!(
            value,
            json!({"type": "text", "text": {"content": "hello"}})
        );
    }

    #[test]
    fn test_link_and_annotations_serialize() {
        let segment = RichText::new(
            "docs",
            Annotations {
                bold: true,
                ..Annotations::default()
            },
            Some("https://example.com".to_owned()),
        );
        let value = serde_json::to_value(segment).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "text",
                "text": {"content": "docs", "link": {"url": "https://example.com"}},
                "annotations": {"bold": true, "italic": false, "strikethrough": false, "code": false}
            })
        );
    }

    #[test]
    fn test_push_merged_joins_same_style() {
        let mut segments = Vec::new();
        push_merged(&mut segments, RichText::plain("a"));
        push_merged(&mut segments, RichText::plain("b"));
        let bold = Annotations {
            bold: true,
            ..Annotations::default()
        };
        push_merged(&mut segments, RichText::new("c", bold, None));
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].content, "ab");
        assert_eq!(segments[1].content, "c");
    }

    #[test]
    fn test_push_merged_ignores_empty() {
        let mut segments = Vec::new();
        push_merged(&mut segments, RichText::plain(""));
        assert!(segments.is_empty());
    }

    #[test]
    fn test_split_long_keeps_all_content() {
        let content = "x".repeat(MAX_TEXT_LENGTH * 2 + 5);
        let segments = split_long(vec![RichText::plain(content.clone())]);
        assert_eq!(segments.len(), 3);
        assert!(
            segments
                .iter()
                .all(|s| utf16_len(&s.content) <= MAX_TEXT_LENGTH)
        );
        assert_eq!(plain_text(&segments), content);
    }

    #[test]
    fn test_split_long_counts_utf16_units() {
        // Each emoji is two UTF-16 code units.
        let content = "\u{1F600}".repeat(MAX_TEXT_LENGTH);
        let segments = split_long(vec![RichText::plain(content.clone())]);
        assert_eq!(segments.len(), 2);
        assert_eq!(plain_text(&segments), content);
    }

    #[test]
    fn test_split_long_short_segment_unchanged() {
        let segments = split_long(vec![RichText::plain("short")]);
        assert_eq!(segments, vec![RichText::plain("short")]);
    }
}
