//! Conversion state tracked while walking parser events.

use crate::block::{Block, TableBlock, TableRowBlock, TextBlock, ToDoBlock};
use crate::rich_text::{Annotations, RichText, push_merged};

/// Inline text accumulated for the block currently being built.
#[derive(Default)]
pub(crate) struct InlineState {
    segments: Vec<RichText>,
    bold: usize,
    italic: usize,
    strikethrough: usize,
    links: Vec<String>,
}

impl InlineState {
    pub(crate) fn push_text(&mut self, text: &str) {
        let annotations = self.annotations(false);
        let link = self.links.last().cloned();
        push_merged(&mut self.segments, RichText::new(text, annotations, link));
    }

    pub(crate) fn push_code(&mut self, code: &str) {
        let annotations = self.annotations(true);
        let link = self.links.last().cloned();
        push_merged(&mut self.segments, RichText::new(code, annotations, link));
    }

    pub(crate) fn start_bold(&mut self) {
        self.bold += 1;
    }

    pub(crate) fn end_bold(&mut self) {
        self.bold = self.bold.saturating_sub(1);
    }

    pub(crate) fn start_italic(&mut self) {
        self.italic += 1;
    }

    pub(crate) fn end_italic(&mut self) {
        self.italic = self.italic.saturating_sub(1);
    }

    pub(crate) fn start_strikethrough(&mut self) {
        self.strikethrough += 1;
    }

    pub(crate) fn end_strikethrough(&mut self) {
        self.strikethrough = self.strikethrough.saturating_sub(1);
    }

    pub(crate) fn start_link(&mut self, url: &str) {
        self.links.push(url.to_owned());
    }

    pub(crate) fn end_link(&mut self) {
        self.links.pop();
    }

    /// Whether there is any non-whitespace text pending.
    pub(crate) fn has_content(&self) -> bool {
        self.segments
            .iter()
            .any(|s| !s.content.trim().is_empty())
    }

    /// Take the pending segments, trimming whitespace at both ends.
    pub(crate) fn take(&mut self) -> Vec<RichText> {
        let mut segments = std::mem::take(&mut self.segments);

        while let Some(first) = segments.first_mut() {
            let leading = first.content.len() - first.content.trim_start().len();
            first.content.drain(..leading);
            if first.content.is_empty() {
                segments.remove(0);
            } else {
                break;
            }
        }
        while let Some(last) = segments.last_mut() {
            last.content.truncate(last.content.trim_end().len());
            if last.content.is_empty() {
                segments.pop();
            } else {
                break;
            }
        }
        segments
    }

    fn annotations(&self, code: bool) -> Annotations {
        Annotations {
            bold: self.bold > 0,
            italic: self.italic > 0,
            strikethrough: self.strikethrough > 0,
            code,
        }
    }
}

/// A block that is still open and collecting nested content.
pub(crate) enum Container {
    ListItem {
        ordered: bool,
        checked: Option<bool>,
        text: Vec<RichText>,
        children: Vec<Block>,
    },
    Quote {
        text: Vec<RichText>,
        children: Vec<Block>,
    },
}

impl Container {
    pub(crate) fn list_item(ordered: bool) -> Self {
        Self::ListItem {
            ordered,
            checked: None,
            text: Vec::new(),
            children: Vec::new(),
        }
    }

    pub(crate) fn quote() -> Self {
        Self::Quote {
            text: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Offer text to the container. The first run of text becomes the
    /// container's own text; anything later is returned to the caller.
    pub(crate) fn offer_text(&mut self, rich_text: Vec<RichText>) -> Option<Vec<RichText>> {
        let (text, children) = match self {
            Self::ListItem { text, children, .. } | Self::Quote { text, children } => {
                (text, children)
            }
        };
        if text.is_empty() && children.is_empty() {
            *text = rich_text;
            None
        } else {
            Some(rich_text)
        }
    }

    pub(crate) fn push_child(&mut self, block: Block) {
        match self {
            Self::ListItem { children, .. } | Self::Quote { children, .. } => children.push(block),
        }
    }

    pub(crate) fn set_checked(&mut self, value: bool) {
        if let Self::ListItem { checked, .. } = self {
            *checked = Some(value);
        }
    }

    pub(crate) fn into_block(self) -> Block {
        match self {
            Self::ListItem {
                checked: Some(checked),
                text,
                children,
                ..
            } => Block::ToDo(ToDoBlock {
                rich_text: TextBlock::new(text).rich_text,
                checked,
                children,
            }),
            Self::ListItem {
                ordered,
                text,
                children,
                ..
            } => {
                let payload = TextBlock {
                    children,
                    ..TextBlock::new(text)
                };
                if ordered {
                    Block::NumberedListItem(payload)
                } else {
                    Block::BulletedListItem(payload)
                }
            }
            Self::Quote { text, children } => Block::Quote(TextBlock {
                children,
                ..TextBlock::new(text)
            }),
        }
    }
}

/// Table being collected.
pub(crate) struct TableState {
    width: usize,
    has_header: bool,
    in_head: bool,
    rows: Vec<Vec<Vec<RichText>>>,
    row: Vec<Vec<RichText>>,
}

impl TableState {
    pub(crate) fn new(width: usize) -> Self {
        Self {
            width,
            has_header: false,
            in_head: false,
            rows: Vec::new(),
            row: Vec::new(),
        }
    }

    pub(crate) fn start_head(&mut self) {
        self.in_head = true;
        self.has_header = true;
    }

    pub(crate) fn end_head(&mut self) {
        self.in_head = false;
        self.end_row();
    }

    pub(crate) fn push_cell(&mut self, cell: Vec<RichText>) {
        self.row.push(TextBlock::new(cell).rich_text);
    }

    pub(crate) fn end_row(&mut self) {
        let mut row = std::mem::take(&mut self.row);
        row.resize_with(self.width, Vec::new);
        self.rows.push(row);
    }

    pub(crate) fn into_block(self) -> Block {
        Block::Table(TableBlock {
            table_width: self.width,
            has_column_header: self.has_header,
            has_row_header: false,
            children: self
                .rows
                .into_iter()
                .map(|cells| Block::TableRow(TableRowBlock { cells }))
                .collect(),
        })
    }
}

/// Code block being collected.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    active: bool,
    language: Option<String>,
    buffer: String,
}

impl CodeBlockState {
    pub(crate) fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    /// End the block and return (language, content).
    pub(crate) fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        let mut content = std::mem::take(&mut self.buffer);
        if content.ends_with('\n') {
            content.pop();
        }
        (self.language.take(), content)
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// Image alt text capture.
#[derive(Default)]
pub(crate) struct ImageState {
    url: Option<String>,
    alt_text: String,
}

impl ImageState {
    pub(crate) fn start(&mut self, url: &str) {
        self.url = Some(url.to_owned());
        self.alt_text.clear();
    }

    pub(crate) fn is_active(&self) -> bool {
        self.url.is_some()
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }

    /// End capture and return (url, alt text).
    pub(crate) fn end(&mut self) -> (String, String) {
        (
            self.url.take().unwrap_or_default(),
            std::mem::take(&mut self.alt_text),
        )
    }
}
