//! Markdown to block conversion.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::block::{Block, limit_children, limit_nesting, limit_rich_text};
use crate::code::{api_language, parse_fence_info};
use crate::state::{CodeBlockState, Container, ImageState, InlineState, TableState};

/// Result of converting markdown.
#[derive(Clone, Debug, Default)]
pub struct ConvertResult {
    /// Top-level blocks in document order.
    pub blocks: Vec<Block>,
    /// Content that could not be represented (raw HTML, footnotes, ...).
    pub warnings: Vec<String>,
}

impl ConvertResult {
    /// Total number of blocks, including nested ones.
    #[must_use]
    pub fn total_blocks(&self) -> usize {
        self.blocks.iter().map(Block::subtree_len).sum()
    }
}

/// Converts markdown into API blocks.
///
/// Content is never truncated: text longer than the API's per-segment limit
/// is split into several segments, and blocks with too many segments are
/// continued in following paragraphs.
pub struct BlockConverter {
    gfm: bool,
}

impl Default for BlockConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockConverter {
    /// Create a converter with GFM enabled.
    #[must_use]
    pub fn new() -> Self {
        Self { gfm: true }
    }

    /// Enable or disable GitHub Flavored Markdown (tables, strikethrough,
    /// task lists).
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Convert markdown text into blocks.
    #[must_use]
    pub fn convert(&self, markdown: &str) -> ConvertResult {
        let mut state = ConversionState::default();
        for event in Parser::new_ext(markdown, self.parser_options()) {
            state.process_event(event);
        }
        state.finish()
    }
}

#[derive(Default)]
struct ConversionState {
    blocks: Vec<Block>,
    containers: Vec<Container>,
    lists: Vec<bool>,
    inline: InlineState,
    code: CodeBlockState,
    image: ImageState,
    table: Option<TableState>,
    heading: Option<HeadingLevel>,
    skipped_html: usize,
    warnings: Vec<String>,
}

impl ConversionState {
    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                if self.image.is_active() {
                    self.image.push_str(&code);
                } else {
                    self.inline.push_code(&code);
                }
            }
            Event::SoftBreak => self.text(" "),
            Event::HardBreak => self.text("\n"),
            Event::Rule => {
                self.flush_inline();
                self.push_block(Block::Divider);
            }
            Event::TaskListMarker(checked) => {
                if let Some(container) = self.containers.last_mut() {
                    container.set_checked(checked);
                }
            }
            Event::InlineHtml(html) if is_line_break(&html) => self.text("\n"),
            Event::Html(_) | Event::InlineHtml(_) => self.skipped_html += 1,
            Event::FootnoteReference(name) => {
                self.warnings
                    .push(format!("footnote reference [^{name}] rendered as text"));
                self.text(&format!("[{name}]"));
            }
            Event::InlineMath(math) | Event::DisplayMath(math) => self.inline.push_code(&math),
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush_inline();
                self.heading = Some(level);
            }
            Tag::BlockQuote(_) => {
                self.flush_inline();
                self.containers.push(Container::quote());
            }
            Tag::CodeBlock(kind) => {
                self.flush_inline();
                let language = match kind {
                    CodeBlockKind::Fenced(ref info) => parse_fence_info(info).map(str::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.code.start(language);
            }
            Tag::List(start) => {
                self.flush_inline();
                self.lists.push(start.is_some());
            }
            Tag::Item => {
                self.flush_inline();
                let ordered = self.lists.last().copied().unwrap_or(false);
                self.containers.push(Container::list_item(ordered));
            }
            Tag::Table(alignments) => {
                self.flush_inline();
                self.table = Some(TableState::new(alignments.len()));
            }
            Tag::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.start_head();
                }
            }
            Tag::TableCell => {
                // Cells never inherit text from outside the table.
                self.inline.take();
            }
            Tag::Emphasis => self.inline.start_italic(),
            Tag::Strong => self.inline.start_bold(),
            Tag::Strikethrough => self.inline.start_strikethrough(),
            Tag::Link { dest_url, .. } => self.inline.start_link(&dest_url),
            Tag::Image { dest_url, .. } => self.image.start(&dest_url),
            Tag::FootnoteDefinition(name) => {
                self.flush_inline();
                self.warnings
                    .push(format!("footnote definition [^{name}] rendered as paragraph"));
            }
            Tag::Paragraph
            | Tag::TableRow
            | Tag::HtmlBlock
            | Tag::MetadataBlock(_)
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition
            | Tag::Superscript
            | Tag::Subscript => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::FootnoteDefinition => self.flush_inline(),
            TagEnd::Heading(_) => {
                let level = self.heading.take().map_or(1, heading_level_to_num);
                let text = self.inline.take();
                if !text.is_empty() {
                    self.push_block(Block::heading(level, text));
                }
            }
            TagEnd::BlockQuote(_) | TagEnd::Item => {
                self.flush_inline();
                if let Some(container) = self.containers.pop() {
                    self.push_block(container.into_block());
                }
            }
            TagEnd::CodeBlock => {
                let (language, content) = self.code.end();
                self.push_block(Block::code(&content, api_language(language.as_deref())));
            }
            TagEnd::List(_) => {
                self.lists.pop();
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.push_block(table.into_block());
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.end_head();
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    table.end_row();
                }
            }
            TagEnd::TableCell => {
                let cell = self.inline.take();
                if let Some(table) = self.table.as_mut() {
                    table.push_cell(cell);
                }
            }
            TagEnd::Emphasis => self.inline.end_italic(),
            TagEnd::Strong => self.inline.end_bold(),
            TagEnd::Strikethrough => self.inline.end_strikethrough(),
            TagEnd::Link => self.inline.end_link(),
            TagEnd::Image => self.end_image(),
            TagEnd::HtmlBlock
            | TagEnd::MetadataBlock(_)
            | TagEnd::DefinitionList
            | TagEnd::DefinitionListTitle
            | TagEnd::DefinitionListDefinition
            | TagEnd::Superscript
            | TagEnd::Subscript => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.is_active() {
            self.code.push_str(text);
        } else if self.image.is_active() {
            self.image.push_str(text);
        } else {
            self.inline.push_text(text);
        }
    }

    fn end_image(&mut self) {
        let (url, alt) = self.image.end();
        let standalone = self.heading.is_none() && self.table.is_none();
        if standalone && is_external_url(&url) {
            self.flush_inline();
            self.push_block(Block::image(url));
        } else if !alt.is_empty() {
            self.inline.push_text(&alt);
        }
    }

    /// Turn pending inline text into content of the innermost container or a
    /// paragraph.
    fn flush_inline(&mut self) {
        if !self.inline.has_content() {
            self.inline.take();
            return;
        }
        let text = self.inline.take();
        let rest = match self.containers.last_mut() {
            Some(container) => container.offer_text(text),
            None => Some(text),
        };
        if let Some(text) = rest {
            self.push_block(Block::paragraph(text));
        }
    }

    fn push_block(&mut self, block: Block) {
        match self.containers.last_mut() {
            Some(container) => container.push_child(block),
            None => self.blocks.push(block),
        }
    }

    fn finish(mut self) -> ConvertResult {
        self.flush_inline();
        while let Some(container) = self.containers.pop() {
            self.push_block(container.into_block());
        }
        if self.skipped_html > 0 {
            self.warnings.push(format!(
                "skipped {} raw HTML fragment(s)",
                self.skipped_html
            ));
        }
        ConvertResult {
            blocks: limit_children(limit_rich_text(limit_nesting(self.blocks))),
            warnings: self.warnings,
        }
    }
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn is_external_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

fn is_line_break(html: &str) -> bool {
    matches!(
        html.trim().to_ascii_lowercase().as_str(),
        "<br>" | "<br/>" | "<br />"
    )
}
