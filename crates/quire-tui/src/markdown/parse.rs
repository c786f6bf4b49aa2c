use comfy_table::{ContentArrangement, Table, presets};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use unicode_width::UnicodeWidthStr;

use super::wrap::{Indent, wrap};
use crate::common::text::truncate_to_width;
use crate::theme::{Style, StyledLine, StyledSpan};

const QUOTE_BAR: &str = "│ ";
const BULLET: &str = "• ";
const CODE_INDENT: &str = "  ";

/// Renders markdown into styled lines no wider than `width` columns.
///
/// Blocks are separated by one blank line; trailing blank lines are dropped.
/// Raw HTML is skipped so documents cannot inject terminal sequences.
pub fn render_markdown(text: &str, width: usize) -> Vec<StyledLine> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut renderer = Renderer::new(width.max(1));
    for event in Parser::new_ext(text, options) {
        renderer.event(event);
    }
    renderer.finish()
}

/// Cells collected while inside a table, rendered with comfy-table at the end.
#[derive(Debug, Default)]
struct TableCells {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: String,
    in_head: bool,
}

impl TableCells {
    fn end_cell(&mut self) {
        let cell = std::mem::take(&mut self.cell);
        self.row.push(cell.trim().to_string());
    }

    fn end_row(&mut self) {
        let row = std::mem::take(&mut self.row);
        if self.in_head {
            self.header = row;
        } else {
            self.rows.push(row);
        }
    }

    fn render(&self, width: usize) -> Vec<String> {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_width(u16::try_from(width).unwrap_or(u16::MAX));
        if !self.header.is_empty() {
            table.set_header(&self.header);
        }
        for row in &self.rows {
            table.add_row(row);
        }
        table
            .to_string()
            .lines()
            .map(|line| truncate_to_width(line, width))
            .collect()
    }
}

#[derive(Debug)]
struct ListLevel {
    /// Next number for ordered lists, `None` for bullets.
    next: Option<u64>,
    /// Width of this level's marker, used to align continuation paragraphs.
    marker_width: usize,
}

struct Link {
    url: String,
    /// Index into `spans` where the link text starts.
    start: usize,
}

struct Renderer {
    width: usize,
    lines: Vec<StyledLine>,
    spans: Vec<StyledSpan>,
    styles: Vec<Style>,
    quote_depth: usize,
    lists: Vec<ListLevel>,
    /// Marker waiting for the first line of the current list item.
    marker: Option<StyledSpan>,
    code: Option<String>,
    link: Option<Link>,
    table: Option<TableCells>,
}

impl Renderer {
    fn new(width: usize) -> Self {
        Self {
            width,
            lines: Vec::new(),
            spans: Vec::new(),
            styles: Vec::new(),
            quote_depth: 0,
            lists: Vec::new(),
            marker: None,
            code: None,
            link: None,
            table: None,
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or(Style::Normal)
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                if let Some(table) = &mut self.table {
                    table.cell.push_str(&code);
                } else {
                    self.spans.push(StyledSpan::new(code.as_ref(), Style::CodeInline));
                }
            }
            Event::SoftBreak => self.text(" "),
            Event::HardBreak => {
                if let Some(table) = &mut self.table {
                    table.cell.push(' ');
                } else {
                    self.spans.push(StyledSpan::new("\n", self.style()));
                }
            }
            Event::TaskListMarker(done) => {
                let mark = if done { "[x] " } else { "[ ] " };
                self.spans.push(StyledSpan::new(mark, Style::ListBullet));
            }
            Event::Rule => {
                self.flush();
                let lead = self.lead();
                let rule_width = self.width.saturating_sub(spans_width(&lead));
                let mut spans = lead;
                spans.push(StyledSpan::new("─".repeat(rule_width), Style::Muted));
                self.lines.push(StyledLine { spans });
                self.gap();
            }
            Event::Html(_)
            | Event::InlineHtml(_)
            | Event::FootnoteReference(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_) => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                let style = match level {
                    HeadingLevel::H1 => Style::H1,
                    HeadingLevel::H2 => Style::H2,
                    _ => Style::H3,
                };
                if level >= HeadingLevel::H3 {
                    let hashes = "#".repeat(level as usize);
                    self.spans.push(StyledSpan::new(format!("{hashes} "), style));
                }
                self.styles.push(style);
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.quote_depth += 1;
                self.styles.push(Style::BlockQuote);
            }
            Tag::CodeBlock(_) => {
                self.flush();
                self.code = Some(String::new());
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(ListLevel {
                    next: start,
                    marker_width: 0,
                });
            }
            Tag::Item => {
                self.flush();
                let marker = match self.lists.last_mut() {
                    Some(ListLevel {
                        next: Some(n),
                        marker_width,
                    }) => {
                        let text = format!("{n}. ");
                        *n += 1;
                        *marker_width = text.width();
                        StyledSpan::new(text, Style::ListNumber)
                    }
                    Some(level) => {
                        level.marker_width = BULLET.width();
                        StyledSpan::new(BULLET, Style::ListBullet)
                    }
                    None => StyledSpan::new(BULLET, Style::ListBullet),
                };
                self.marker = Some(marker);
            }
            Tag::Emphasis => self.styles.push(Style::Emphasis),
            Tag::Strong => self.styles.push(Style::Strong),
            Tag::Strikethrough => self.styles.push(Style::Strikethrough),
            Tag::Link { dest_url, .. } => {
                self.link = Some(Link {
                    url: dest_url.to_string(),
                    start: self.spans.len(),
                });
                self.styles.push(Style::Link);
            }
            Tag::Image { .. } => {
                self.spans.push(StyledSpan::new("[image: ", Style::Subtle));
                self.styles.push(Style::Subtle);
            }
            Tag::Table(_) => {
                self.flush();
                self.table = Some(TableCells::default());
            }
            Tag::TableHead => {
                if let Some(table) = &mut self.table {
                    table.in_head = true;
                }
            }
            Tag::Paragraph
            | Tag::TableRow
            | Tag::TableCell
            | Tag::FootnoteDefinition(_)
            | Tag::MetadataBlock(_)
            | Tag::HtmlBlock
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition
            | Tag::Superscript
            | Tag::Subscript => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush();
                if self.lists.is_empty() {
                    self.gap();
                }
            }
            TagEnd::Heading(_) => {
                self.flush();
                self.styles.pop();
                self.gap();
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.styles.pop();
                if self.quote_depth == 0 {
                    self.gap();
                }
            }
            TagEnd::CodeBlock => {
                self.flush_code();
                self.gap();
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.gap();
                }
            }
            TagEnd::Item => {
                self.flush();
                self.marker = None;
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            TagEnd::Link => {
                self.styles.pop();
                if let Some(link) = self.link.take() {
                    let label: String = self.spans[link.start.min(self.spans.len())..]
                        .iter()
                        .map(|span| span.text.as_str())
                        .collect();
                    if !link.url.is_empty() && label.trim() != link.url {
                        self.spans
                            .push(StyledSpan::new(format!(" ({})", link.url), Style::Subtle));
                    }
                }
            }
            TagEnd::Image => {
                self.styles.pop();
                self.spans.push(StyledSpan::new("]", Style::Subtle));
            }
            TagEnd::TableCell => {
                if let Some(table) = &mut self.table {
                    table.end_cell();
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = &mut self.table {
                    table.end_row();
                    table.in_head = false;
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = &mut self.table {
                    table.end_row();
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    let lead = self.lead();
                    let inner = self.width.saturating_sub(spans_width(&lead)).max(1);
                    for row in table.render(inner) {
                        let mut spans = lead.clone();
                        spans.push(StyledSpan::new(row, Style::Normal));
                        self.lines.push(StyledLine { spans });
                    }
                }
                self.gap();
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(code) = &mut self.code {
            code.push_str(text);
        } else if let Some(table) = &mut self.table {
            table.cell.push_str(&text.replace('\n', " "));
        } else {
            self.spans.push(StyledSpan::new(text, self.style()));
        }
    }

    /// Prefix shared by every line of the current block: quote bars, then
    /// indentation for enclosing list levels.
    fn lead(&self) -> Vec<StyledSpan> {
        let mut lead = Vec::new();
        if self.quote_depth > 0 {
            lead.push(StyledSpan::new(
                QUOTE_BAR.repeat(self.quote_depth),
                Style::BlockQuote,
            ));
        }
        let nested: usize = self
            .lists
            .iter()
            .rev()
            .skip(1)
            .map(|level| level.marker_width)
            .sum();
        if nested > 0 {
            lead.push(StyledSpan::new(" ".repeat(nested), Style::Plain));
        }
        lead
    }

    fn indent(&mut self) -> Indent {
        let lead = self.lead();
        if let Some(marker) = self.marker.take() {
            return Indent::hanging(&lead, marker);
        }
        let mut prefix = lead;
        if let Some(level) = self.lists.last() {
            prefix.push(StyledSpan::new(" ".repeat(level.marker_width), Style::Plain));
        }
        Indent::uniform(prefix)
    }

    fn flush(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let spans = std::mem::take(&mut self.spans);
        let indent = self.indent();
        self.lines.extend(wrap(&spans, self.width, &indent));
    }

    fn flush_code(&mut self) {
        let Some(code) = self.code.take() else {
            return;
        };
        let mut prefix = self.lead();
        prefix.push(StyledSpan::new(CODE_INDENT, Style::Plain));
        let indent = Indent::uniform(prefix);
        let body = code.trim_end_matches('\n');
        self.lines.extend(wrap(
            &[StyledSpan::new(body, Style::CodeBlock)],
            self.width,
            &indent,
        ));
    }

    /// Blank line between blocks, never doubled.
    fn gap(&mut self) {
        if self.lines.last().is_some_and(|line| !line.is_blank()) {
            self.lines.push(StyledLine::empty());
        }
    }

    fn finish(mut self) -> Vec<StyledLine> {
        self.flush();
        self.flush_code();
        while self.lines.last().is_some_and(StyledLine::is_blank) {
            self.lines.pop();
        }
        self.lines
    }
}

fn spans_width(spans: &[StyledSpan]) -> usize {
    spans.iter().map(|span| span.text.width()).sum()
}
