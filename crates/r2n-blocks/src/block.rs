//! Notion block model.
//!
//! Blocks serialize to the API's block object shape:
//! `{"object": "block", "type": "<kind>", "<kind>": { ... }}`.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::rich_text::{MAX_RICH_TEXT_ITEMS, RichText, plain_text, split_long};

/// Deepest level at which a block may still carry children in a single
/// append request. Top-level blocks are at depth 0.
pub const MAX_NESTING_DEPTH: usize = 2;

/// Largest children array the API accepts, for a block or a request.
pub const MAX_CHILDREN: usize = 100;

/// Largest number of blocks, nested ones included, in one append request.
pub const MAX_BLOCKS_PER_REQUEST: usize = 1000;

/// A unit of page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Paragraph.
    Paragraph(TextBlock),
    /// Level 1 heading.
    Heading1(TextBlock),
    /// Level 2 heading.
    Heading2(TextBlock),
    /// Level 3 heading (also used for deeper markdown levels).
    Heading3(TextBlock),
    /// Unordered list item.
    BulletedListItem(TextBlock),
    /// Ordered list item.
    NumberedListItem(TextBlock),
    /// Task list item.
    ToDo(ToDoBlock),
    /// Block quote.
    Quote(TextBlock),
    /// Code block.
    Code(CodeBlock),
    /// Horizontal rule.
    Divider,
    /// Externally hosted image.
    Image(ImageBlock),
    /// Table; rows are its children.
    Table(TableBlock),
    /// Table row.
    TableRow(TableRowBlock),
}

/// Payload for blocks made of text plus optional children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextBlock {
    /// Text content.
    pub rich_text: Vec<RichText>,
    /// Nested blocks.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Block>,
}

/// Payload for task list items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToDoBlock {
    /// Text content.
    pub rich_text: Vec<RichText>,
    /// Whether the task is done.
    pub checked: bool,
    /// Nested blocks.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Block>,
}

/// Payload for code blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    /// Code content.
    pub rich_text: Vec<RichText>,
    /// Language name as accepted by the API.
    pub language: String,
}

/// Payload for external images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlock {
    /// Image URL.
    pub url: String,
}

/// Payload for tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableBlock {
    /// Number of columns.
    pub table_width: usize,
    /// Whether the first row is a header row.
    pub has_column_header: bool,
    /// Whether the first column is a header column.
    pub has_row_header: bool,
    /// Rows ([`Block::TableRow`]).
    pub children: Vec<Block>,
}

/// Payload for table rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRowBlock {
    /// One rich text list per cell.
    pub cells: Vec<Vec<RichText>>,
}

impl Serialize for ImageBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct External<'a> {
            url: &'a str,
        }

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", "external")?;
        map.serialize_entry("external", &External { url: &self.url })?;
        map.end()
    }
}

impl Block {
    /// Paragraph with the given text.
    #[must_use]
    pub fn paragraph(rich_text: Vec<RichText>) -> Self {
        Self::Paragraph(TextBlock::new(rich_text))
    }

    /// Heading for a markdown level (1-6). Levels 4-6 collapse to 3.
    #[must_use]
    pub fn heading(level: u8, rich_text: Vec<RichText>) -> Self {
        let payload = TextBlock::new(rich_text);
        match level {
            1 => Self::Heading1(payload),
            2 => Self::Heading2(payload),
            _ => Self::Heading3(payload),
        }
    }

    /// Code block.
    #[must_use]
    pub fn code(content: &str, language: impl Into<String>) -> Self {
        Self::Code(CodeBlock {
            rich_text: split_long(vec![RichText::plain(content)]),
            language: language.into(),
        })
    }

    /// External image.
    #[must_use]
    pub fn image(url: impl Into<String>) -> Self {
        Self::Image(ImageBlock { url: url.into() })
    }

    /// API type name of this block.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Paragraph(_) => "paragraph",
            Self::Heading1(_) => "heading_1",
            Self::Heading2(_) => "heading_2",
            Self::Heading3(_) => "heading_3",
            Self::BulletedListItem(_) => "bulleted_list_item",
            Self::NumberedListItem(_) => "numbered_list_item",
            Self::ToDo(_) => "to_do",
            Self::Quote(_) => "quote",
            Self::Code(_) => "code",
            Self::Divider => "divider",
            Self::Image(_) => "image",
            Self::Table(_) => "table",
            Self::TableRow(_) => "table_row",
        }
    }

    /// Text segments of this block (empty for blocks without text).
    #[must_use]
    pub fn rich_text(&self) -> &[RichText] {
        match self {
            Self::Paragraph(b)
            | Self::Heading1(b)
            | Self::Heading2(b)
            | Self::Heading3(b)
            | Self::BulletedListItem(b)
            | Self::NumberedListItem(b)
            | Self::Quote(b) => &b.rich_text,
            Self::ToDo(b) => &b.rich_text,
            Self::Code(b) => &b.rich_text,
            Self::Divider | Self::Image(_) | Self::Table(_) | Self::TableRow(_) => &[],
        }
    }

    /// Concatenated text of this block (not including children).
    #[must_use]
    pub fn text(&self) -> String {
        plain_text(self.rich_text())
    }

    /// Nested blocks.
    #[must_use]
    pub fn children(&self) -> &[Block] {
        match self {
            Self::Paragraph(b)
            | Self::Heading1(b)
            | Self::Heading2(b)
            | Self::Heading3(b)
            | Self::BulletedListItem(b)
            | Self::NumberedListItem(b)
            | Self::Quote(b) => &b.children,
            Self::ToDo(b) => &b.children,
            Self::Table(b) => &b.children,
            Self::Code(_) | Self::Divider | Self::Image(_) | Self::TableRow(_) => &[],
        }
    }

    /// Total number of blocks in this subtree, including `self`.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.children().iter().map(Block::subtree_len).sum::<usize>()
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Block>> {
        match self {
            Self::Paragraph(b)
            | Self::Heading1(b)
            | Self::Heading2(b)
            | Self::Heading3(b)
            | Self::BulletedListItem(b)
            | Self::NumberedListItem(b)
            | Self::Quote(b) => Some(&mut b.children),
            Self::ToDo(b) => Some(&mut b.children),
            Self::Table(b) => Some(&mut b.children),
            Self::Code(_) | Self::Divider | Self::Image(_) | Self::TableRow(_) => None,
        }
    }

    fn rich_text_mut(&mut self) -> Option<&mut Vec<RichText>> {
        match self {
            Self::Paragraph(b)
            | Self::Heading1(b)
            | Self::Heading2(b)
            | Self::Heading3(b)
            | Self::BulletedListItem(b)
            | Self::NumberedListItem(b)
            | Self::Quote(b) => Some(&mut b.rich_text),
            Self::ToDo(b) => Some(&mut b.rich_text),
            Self::Code(b) => Some(&mut b.rich_text),
            Self::Divider | Self::Image(_) | Self::Table(_) | Self::TableRow(_) => None,
        }
    }

    fn take_children(&mut self) -> Vec<Block> {
        self.children_mut().map(std::mem::take).unwrap_or_default()
    }
}

impl TextBlock {
    /// Create a payload, splitting over-long segments.
    #[must_use]
    pub fn new(rich_text: Vec<RichText>) -> Self {
        Self {
            rich_text: split_long(rich_text),
            children: Vec::new(),
        }
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let name = self.type_name();
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("object", "block")?;
        map.serialize_entry("type", name)?;
        match self {
            Self::Paragraph(b)
            | Self::Heading1(b)
            | Self::Heading2(b)
            | Self::Heading3(b)
            | Self::BulletedListItem(b)
            | Self::NumberedListItem(b)
            | Self::Quote(b) => map.serialize_entry(name, b)?,
            Self::ToDo(b) => map.serialize_entry(name, b)?,
            Self::Code(b) => map.serialize_entry(name, b)?,
            Self::Divider => map.serialize_entry(name, &serde_json::Map::new())?,
            Self::Image(b) => map.serialize_entry(name, b)?,
            Self::Table(b) => map.serialize_entry(name, b)?,
            Self::TableRow(b) => map.serialize_entry(name, b)?,
        }
        map.end()
    }
}

/// Hoist children nested deeper than [`MAX_NESTING_DEPTH`] so they follow
/// their former parent as siblings. Document order is preserved.
///
/// Tables keep their rows. A table that would sit at the deepest level moves
/// up one level instead, right after the block it was nested in.
pub(crate) fn limit_nesting(blocks: Vec<Block>) -> Vec<Block> {
    let mut out = Vec::with_capacity(blocks.len());
    let mut lifted = Vec::new();
    limit_nesting_into(blocks, 0, &mut out, &mut lifted);
    out.append(&mut lifted);
    out
}

fn limit_nesting_into(
    blocks: Vec<Block>,
    depth: usize,
    out: &mut Vec<Block>,
    lifted: &mut Vec<Block>,
) {
    for mut block in blocks {
        if depth >= MAX_NESTING_DEPTH {
            if matches!(block, Block::Table(_)) {
                lifted.push(block);
                continue;
            }
            let children = block.take_children();
            out.push(block);
            limit_nesting_into(children, depth, out, lifted);
        } else {
            let children = block.take_children();
            let mut kept = Vec::with_capacity(children.len());
            let mut lifted_below = Vec::new();
            limit_nesting_into(children, depth + 1, &mut kept, &mut lifted_below);
            if let Some(slot) = block.children_mut() {
                *slot = kept;
            }
            out.push(block);
            out.append(&mut lifted_below);
        }
    }
}

/// Keep every children array within [`MAX_CHILDREN`] and every block's
/// subtree within [`MAX_BLOCKS_PER_REQUEST`].
///
/// Children that don't fit follow their former parent as siblings. Long
/// tables become consecutive tables, each repeating the header row.
pub(crate) fn limit_children(blocks: Vec<Block>) -> Vec<Block> {
    let mut out = Vec::with_capacity(blocks.len());
    for block in blocks {
        let mut block = match block {
            Block::Table(table) => {
                out.extend(split_table(table));
                continue;
            }
            other => other,
        };
        let mut children = limit_children(block.take_children());
        let overflow = children.split_off(fitting_children(&children));
        if let Some(slot) = block.children_mut() {
            *slot = children;
        }
        out.push(block);
        out.extend(overflow);
    }
    out
}

/// Number of leading children that fit under one parent.
fn fitting_children(children: &[Block]) -> usize {
    let mut total = 1;
    let mut keep = 0;
    for child in children.iter().take(MAX_CHILDREN) {
        let size = child.subtree_len();
        if total + size > MAX_BLOCKS_PER_REQUEST {
            break;
        }
        total += size;
        keep += 1;
    }
    keep
}

fn split_table(table: TableBlock) -> Vec<Block> {
    if table.children.len() <= MAX_CHILDREN {
        return vec![Block::Table(table)];
    }
    let TableBlock {
        table_width,
        has_column_header,
        has_row_header,
        children,
    } = table;

    let mut rows = children.into_iter();
    let header = if has_column_header { rows.next() } else { None };
    let per_table = MAX_CHILDREN - usize::from(header.is_some());
    let rows: Vec<Block> = rows.collect();

    rows.chunks(per_table)
        .map(|chunk| {
            let mut children = Vec::with_capacity(chunk.len() + 1);
            children.extend(header.clone());
            children.extend_from_slice(chunk);
            Block::Table(TableBlock {
                table_width,
                has_column_header,
                has_row_header,
                children,
            })
        })
        .collect()
}

/// Move segments beyond [`MAX_RICH_TEXT_ITEMS`] into continuation paragraphs
/// placed right after the block that overflowed.
pub(crate) fn limit_rich_text(blocks: Vec<Block>) -> Vec<Block> {
    let mut out = Vec::with_capacity(blocks.len());
    for mut block in blocks {
        if let Some(children) = block.children_mut() {
            let limited = limit_rich_text(std::mem::take(children));
            *children = limited;
        }

        let overflow = match block.rich_text_mut() {
            Some(rich_text) if rich_text.len() > MAX_RICH_TEXT_ITEMS => {
                rich_text.split_off(MAX_RICH_TEXT_ITEMS)
            }
            _ => Vec::new(),
        };
        out.push(block);

        let mut rest = overflow;
        while !rest.is_empty() {
            let tail = if rest.len() > MAX_RICH_TEXT_ITEMS {
                rest.split_off(MAX_RICH_TEXT_ITEMS)
            } else {
                Vec::new()
            };
            out.push(Block::Paragraph(TextBlock {
                rich_text: rest,
                children: Vec::new(),
            }));
            rest = tail;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn item(text: &str, children: Vec<Block>) -> Block {
        Block::BulletedListItem(TextBlock {
            rich_text: vec![RichText::plain(text)],
            children,
        })
    }

    #[test]
    fn test_paragraph_serializes_as_block_object() {
        let block = Block::paragraph(vec![RichText::plain("Hello")]);
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(
            value,
            json!({
                "object": "block",
                "type": "paragraph",
                "paragraph": {"rich_text": [{"type": "text", "text": {"content": "Hello"}}]}
            })
        );
    }

    #[test]
    fn test_divider_serializes_with_empty_object() {
        let value = serde_json::to_value(Block::Divider).unwrap();
        assert_eq!(
            value,
            json!({"object": "block", "type": "divider", "divider": {}})
        );
    }

    #[test]
    fn test_image_serializes_as_external() {
        let value = serde_json::to_value(Block::image("https://example.com/a.png")).unwrap();
        assert_eq!(
            value,
            json!({
                "object": "block",
                "type": "image",
                "image": {"type": "external", "external": {"url": "https://example.com/a.png"}}
            })
        );
    }

    #[test]
    fn test_heading_levels_clamp_to_three() {
        assert_eq!(Block::heading(1, Vec::new()).type_name(), "heading_1");
        assert_eq!(Block::heading(2, Vec::new()).type_name(), "heading_2");
        assert_eq!(Block::heading(3, Vec::new()).type_name(), "heading_3");
        assert_eq!(Block::heading(6, Vec::new()).type_name(), "heading_3");
    }

    #[test]
    fn test_children_omitted_when_empty() {
        let value = serde_json::to_value(item("a", Vec::new())).unwrap();
        assert!(value["bulleted_list_item"].get("children").is_none());
    }

    #[test]
    fn test_limit_nesting_hoists_deep_children_in_order() {
        // a > b > c > d  becomes  a > b > [c, d]
        let tree = vec![item(
            "a",
            vec![item("b", vec![item("c", vec![item("d", Vec::new())])])],
        )];
        let limited = limit_nesting(tree);

        assert_eq!(limited.len(), 1);
        let b = &limited[0].children()[0];
        let texts: Vec<String> = b.children().iter().map(Block::text).collect();
        assert_eq!(texts, vec!["c", "d"]);
        assert!(b.children()[0].children().is_empty());
    }

    #[test]
    fn test_limit_nesting_keeps_shallow_trees() {
        let tree = vec![item("a", vec![item("b", vec![item("c", Vec::new())])])];
        assert_eq!(limit_nesting(tree.clone()), tree);
    }

    #[test]
    fn test_limit_rich_text_adds_continuation_paragraphs() {
        let segments: Vec<RichText> = (0..250)
            .map(|i| {
                RichText::new(
                    i.to_string(),
                    crate::rich_text::Annotations {
                        bold: i % 2 == 0,
                        ..Default::default()
                    },
                    None,
                )
            })
            .collect();
        let blocks = limit_rich_text(vec![Block::heading(1, segments.clone())]);

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].type_name(), "heading_1");
        assert_eq!(blocks[0].rich_text().len(), 100);
        assert_eq!(blocks[1].type_name(), "paragraph");
        assert_eq!(blocks[1].rich_text().len(), 100);
        assert_eq!(blocks[2].rich_text().len(), 50);

        let rejoined: Vec<RichText> = blocks
            .iter()
            .flat_map(|b| b.rich_text().iter().cloned())
            .collect();
        assert_eq!(rejoined, segments);
    }

    fn table(header: bool, rows: usize) -> Block {
        let row = |text: String| {
            Block::TableRow(TableRowBlock {
                cells: vec![vec![RichText::plain(text)]],
            })
        };
        let mut children = Vec::new();
        if header {
            children.push(row("head".to_owned()));
        }
        children.extend((0..rows).map(|i| row(format!("r{i}"))));
        Block::Table(TableBlock {
            table_width: 1,
            has_column_header: header,
            has_row_header: false,
            children,
        })
    }

    fn row_text(block: &Block) -> String {
        let Block::TableRow(row) = block else {
            panic!("expected table row, got {}", block.type_name());
        };
        plain_text(&row.cells[0])
    }

    #[test]
    fn test_limit_nesting_lifts_deep_table_with_rows() {
        // a > b > table  becomes  a > [b, table]
        let tree = vec![item("a", vec![item("b", vec![table(true, 2)])])];
        let limited = limit_nesting(tree);

        assert_eq!(limited.len(), 1);
        let a_children = limited[0].children();
        let types: Vec<&str> = a_children.iter().map(Block::type_name).collect();
        assert_eq!(types, vec!["bulleted_list_item", "table"]);
        assert!(a_children[0].children().is_empty());
        assert_eq!(a_children[1].children().len(), 3);
    }

    #[test]
    fn test_limit_nesting_keeps_table_rows_at_depth_one() {
        let tree = vec![item("a", vec![table(false, 2)])];
        assert_eq!(limit_nesting(tree.clone()), tree);
    }

    #[test]
    fn test_limit_children_moves_extra_children_after_parent() {
        let children: Vec<Block> = (0..150)
            .map(|i| item(&format!("c{i}"), Vec::new()))
            .collect();
        let limited = limit_children(vec![item("parent", children)]);

        assert_eq!(limited.len(), 51);
        assert_eq!(limited[0].children().len(), MAX_CHILDREN);
        assert_eq!(limited[0].children()[99].text(), "c99");
        assert_eq!(limited[1].text(), "c100");
        assert_eq!(limited[50].text(), "c149");
    }

    #[test]
    fn test_limit_children_splits_table_repeating_header() {
        let limited = limit_children(vec![table(true, 150)]);

        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].children().len(), 100);
        assert_eq!(limited[1].children().len(), 52);
        assert_eq!(row_text(&limited[1].children()[0]), "head");

        let data: Vec<String> = limited
            .iter()
            .flat_map(|t| t.children()[1..].iter().map(row_text))
            .collect();
        let expected: Vec<String> = (0..150).map(|i| format!("r{i}")).collect();
        assert_eq!(data, expected);
    }

    #[test]
    fn test_limit_children_splits_table_without_header() {
        let limited = limit_children(vec![table(false, 250)]);
        let sizes: Vec<usize> = limited.iter().map(|t| t.children().len()).collect();
        assert_eq!(sizes, vec![100, 100, 50]);
        assert_eq!(row_text(&limited[1].children()[0]), "r100");
    }

    #[test]
    fn test_limit_children_caps_subtree_size() {
        let leaves = || -> Vec<Block> {
            (0..60).map(|i| item(&format!("l{i}"), Vec::new())).collect()
        };
        let children: Vec<Block> = (0..20).map(|i| item(&format!("c{i}"), leaves())).collect();
        let limited = limit_children(vec![item("root", children)]);

        assert!(limited[0].subtree_len() <= MAX_BLOCKS_PER_REQUEST);
        assert_eq!(limited[0].children().len(), 16);
        assert_eq!(limited.len(), 5);
        let total: usize = limited.iter().map(Block::subtree_len).sum();
        assert_eq!(total, 1 + 20 * 61);
    }

    #[test]
    fn test_subtree_len_counts_children() {
        let tree = item("a", vec![item("b", Vec::new()), item("c", Vec::new())]);
        assert_eq!(tree.subtree_len(), 3);
    }
}
