//! Vertical layout over the classified element sequence.
//!
//! The engine walks elements in document order and maintains a single y
//! cursor. Consecutive content or bullet elements accumulate into a run
//! group and flush as one text node; every boundary (heading, list switch,
//! emphasis, color section, end of stream) flushes the open group first, so
//! node order always matches document order.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use easel_canvas::{
    Canvas, Color, DropShadow, FontRange, FontStyle, FrameNode, LineNode, Point, RectNode,
    TextAlign, TextNode, VisualNode,
};

use crate::classify::{self, ColorEntry, DocumentType};
use crate::element::{ContentElement, ElementKind};
use crate::error::Result;
use crate::fonts::{FontName, FontSet};
use crate::TranscodeOptions;

pub const FRAME_WIDTH: f32 = 800.0;
pub const PADDING: f32 = 40.0;
pub const SWATCH_SIZE: f32 = 80.0;
pub const SWATCH_GAP: f32 = 16.0;
/// Swatch cell height: 80 swatch + hex label + optional name label.
const SWATCH_CELL_HEIGHT: f32 = 120.0;
/// Vertical distance between swatch rows, below the swatch itself.
const SWATCH_ROW_GAP: f32 = 50.0;

/// How many swatches fit in one row of the given content width.
pub fn swatches_per_row(content_width: f32) -> usize {
    let per_row = ((content_width + SWATCH_GAP) / (SWATCH_SIZE + SWATCH_GAP)).floor() as usize;
    per_row.max(1)
}

fn heading_size(level: u8) -> f32 {
    match level {
        1 => 24.0,
        2 => 20.0,
        _ => 18.0,
    }
}

static NUMBERED_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.").unwrap());
/// `Family: sample text` or `Family - sample text`, used to keep font
/// examples rendered in their own family.
static FONT_EXAMPLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^([A-Za-z][A-Za-z ]*?)(?:\s*:\s*|\s+-\s+)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunKind {
    Content,
    Bullets,
}

struct RunGroup {
    kind: RunKind,
    indent: f32,
    lines: Vec<String>,
}

pub struct LayoutEngine<'run, C: Canvas> {
    canvas: &'run mut C,
    fonts: &'run FontSet,
    colors: &'run [ColorEntry],
    doc_type: DocumentType,
    padding: f32,
    content_width: f32,
    y: f32,
    children: Vec<VisualNode>,
    group: Option<RunGroup>,
    in_color_section: bool,
    swatches_emitted: bool,
    in_persona_section: bool,
    mentioned_font: Option<String>,
}

impl<'run, C: Canvas> LayoutEngine<'run, C> {
    pub fn new(
        canvas: &'run mut C,
        fonts: &'run FontSet,
        colors: &'run [ColorEntry],
        doc_type: DocumentType,
        options: &TranscodeOptions,
    ) -> Self {
        let padding = options.padding;
        Self {
            canvas,
            fonts,
            colors,
            doc_type,
            padding,
            content_width: options.frame_width - 2.0 * padding,
            y: padding,
            children: Vec::new(),
            group: None,
            in_color_section: false,
            swatches_emitted: false,
            in_persona_section: false,
            mentioned_font: None,
        }
    }

    /// Consume the element sequence and return the laid-out children plus
    /// the final y cursor (content height without bottom padding).
    pub async fn run(mut self, elements: &[ContentElement]) -> Result<(Vec<VisualNode>, f32)> {
        for element in elements {
            let text = element.text.trim().to_string();
            if text.is_empty() {
                continue;
            }
            if let Some(family) = self.fonts.find_in_text(&text) {
                self.mentioned_font = Some(family.to_string());
            }
            if self.doc_type == DocumentType::Persona && self.persona_element(element, &text).await? {
                continue;
            }
            if let Some(level) = element.kind.heading_level() {
                self.flush_group().await?;
                let fonts = self.fonts;
                let height = self
                    .place_text(&text, &fonts.bold, heading_size(level), self.padding, None)
                    .await?;
                self.y += height + 24.0;
                self.in_color_section = classify::is_color_section(&text);
                if self.in_color_section && !self.colors.is_empty() && !self.swatches_emitted {
                    self.emit_swatch_grid().await?;
                }
                continue;
            }
            if !self.in_color_section && classify::is_color_section(&text) {
                self.flush_group().await?;
                self.in_color_section = true;
                let fonts = self.fonts;
                let height = self
                    .place_text(
                        &text,
                        &fonts.regular,
                        14.0,
                        self.padding,
                        Some(self.content_width),
                    )
                    .await?;
                self.y += height + 16.0;
                if !self.colors.is_empty() && !self.swatches_emitted {
                    self.emit_swatch_grid().await?;
                }
                continue;
            }
            match element.kind {
                ElementKind::BulletList => self.group_push(RunKind::Bullets, 0.0, &text).await?,
                ElementKind::NumberedList => self.numbered_list(&text).await?,
                ElementKind::Strong => {
                    self.flush_group().await?;
                    let font = self.emphasis_font(FontStyle::Bold).await;
                    let height = self.place_text(&text, &font, 14.0, self.padding, None).await?;
                    self.y += height + 16.0;
                }
                ElementKind::Em => {
                    self.flush_group().await?;
                    let font = self.emphasis_font(FontStyle::Italic).await;
                    let height = self.place_text(&text, &font, 14.0, self.padding, None).await?;
                    self.y += height + 16.0;
                }
                ElementKind::Code => {
                    self.flush_group().await?;
                    self.code_block(&text).await?;
                }
                _ => self.group_push(RunKind::Content, 0.0, &text).await?,
            }
        }
        self.flush_group().await?;
        if !self.colors.is_empty() && !self.swatches_emitted {
            self.trailing_palette().await?;
        }
        Ok((self.children, self.y))
    }

    /// Measure, position at the cursor and push a plain text node.
    /// Returns the measured height; the caller advances the cursor.
    async fn place_text(
        &mut self,
        text: &str,
        font: &FontName,
        size: f32,
        x: f32,
        width: Option<f32>,
    ) -> Result<f32> {
        let mut node = TextNode::new(text, &font.family, font.style, size);
        node.x = x;
        node.y = self.y;
        let measured = self
            .canvas
            .measure_text(text, &font.family, font.style, size, width)
            .await?;
        node.width = measured.width;
        node.height = measured.height;
        self.children.push(VisualNode::Text(node));
        Ok(measured.height)
    }

    async fn group_push(&mut self, kind: RunKind, indent: f32, text: &str) -> Result<()> {
        let compatible = self
            .group
            .as_ref()
            .is_some_and(|group| group.kind == kind && group.indent == indent);
        if !compatible {
            self.flush_group().await?;
            self.group = Some(RunGroup {
                kind,
                indent,
                lines: Vec::new(),
            });
        }
        if let Some(group) = &mut self.group {
            group.lines.push(text.to_string());
        }
        Ok(())
    }

    async fn flush_group(&mut self) -> Result<()> {
        let Some(group) = self.group.take() else {
            return Ok(());
        };
        let joined = group.lines.join("\n");
        if joined.trim().is_empty() {
            return Ok(());
        }
        let font = self.group_font(&joined);
        let x = self.padding + group.indent;
        let width = self.content_width - group.indent;
        let height = self.place_text(&joined, &font, 14.0, x, Some(width)).await?;
        self.y += height + 16.0;
        Ok(())
    }

    /// Run groups render in the primary regular face, except font examples
    /// (`Montserrat: The quick brown fox`) which render in their named
    /// family when it loaded.
    fn group_font(&self, text: &str) -> FontName {
        if let Some(caps) = FONT_EXAMPLE.captures(text) {
            let name = caps[1].trim();
            if let Some(family) = self
                .fonts
                .loaded
                .iter()
                .find(|loaded| loaded.eq_ignore_ascii_case(name))
            {
                return FontName {
                    family: family.clone(),
                    style: FontStyle::Regular,
                };
            }
        }
        if let Some(family) = self.fonts.find_in_text(text) {
            return FontName {
                family: family.to_string(),
                style: FontStyle::Regular,
            };
        }
        self.fonts.regular.clone()
    }

    async fn emphasis_font(&mut self, style: FontStyle) -> FontName {
        if let Some(family) = self.mentioned_font.clone() {
            if self.canvas.load_font(&family, style).await.is_ok() {
                return FontName { family, style };
            }
        }
        match style {
            FontStyle::Italic => self.fonts.italic.clone(),
            _ => self.fonts.bold.clone(),
        }
    }

    /// One node per item; the `<rank>. Key` prefix before a colon goes bold.
    async fn numbered_list(&mut self, text: &str) -> Result<()> {
        self.flush_group().await?;
        let fonts = self.fonts;
        let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        for line in lines {
            let mut node = TextNode::new(&line, &fonts.regular.family, fonts.regular.style, 16.0);
            node.x = self.padding;
            node.y = self.y;
            if let Some(colon) = line.chars().position(|ch| ch == ':') {
                node.ranges.push(FontRange {
                    start: 0,
                    end: colon,
                    family: fonts.default_family.clone(),
                    style: FontStyle::Bold,
                });
            }
            let measured = self
                .canvas
                .measure_text(
                    &line,
                    &fonts.regular.family,
                    fonts.regular.style,
                    16.0,
                    Some(self.content_width),
                )
                .await?;
            node.width = measured.width;
            node.height = measured.height;
            self.children.push(VisualNode::Text(node));
            self.y += measured.height + 12.0;
        }
        self.y += 8.0;
        Ok(())
    }

    /// Code spans get a light gray backing rect slightly larger than the
    /// text, pushed before the text so it paints underneath.
    async fn code_block(&mut self, text: &str) -> Result<()> {
        let fonts = self.fonts;
        let measured = self
            .canvas
            .measure_text(
                text,
                &fonts.monospace,
                FontStyle::Regular,
                14.0,
                Some(self.content_width),
            )
            .await?;
        self.children.push(VisualNode::Rect(RectNode {
            x: self.padding - 4.0,
            y: self.y - 2.0,
            width: measured.width + 8.0,
            height: measured.height + 4.0,
            fill: Color::gray(0.95),
            corner_radius: 4.0,
            shadow: None,
        }));
        let mut node = TextNode::new(text, &fonts.monospace, FontStyle::Regular, 14.0);
        node.x = self.padding;
        node.y = self.y;
        node.width = measured.width;
        node.height = measured.height;
        self.children.push(VisualNode::Text(node));
        self.y += measured.height + 16.0;
        Ok(())
    }

    /// Persona documents lay out as labeled fields and indented sections.
    /// Returns true when the element was consumed here.
    async fn persona_element(&mut self, element: &ContentElement, text: &str) -> Result<bool> {
        let header = classify::is_persona_header(element);
        let subheading = !header && classify::is_persona_subheading(text);
        if header || subheading {
            self.flush_group().await?;
            let fonts = self.fonts;
            match classify::split_key_value(text) {
                Some((key, value)) if !value.is_empty() => {
                    let title = format!("{key}:");
                    if header {
                        let height =
                            self.place_text(&title, &fonts.bold, 16.0, self.padding, None).await?;
                        self.y += height + 8.0;
                        let height = self
                            .place_text(
                                &value,
                                &fonts.regular,
                                14.0,
                                self.padding,
                                Some(self.content_width),
                            )
                            .await?;
                        self.y += height + 16.0;
                    } else {
                        let height = self
                            .place_text(&title, &fonts.medium, 14.0, self.padding + 16.0, None)
                            .await?;
                        self.y += height + 8.0;
                        let height = self
                            .place_text(
                                &value,
                                &fonts.regular,
                                14.0,
                                self.padding + 16.0,
                                Some(self.content_width - 16.0),
                            )
                            .await?;
                        self.y += height + 12.0;
                    }
                }
                _ => {
                    if header {
                        let size = element.kind.heading_level().map_or(18.0, heading_size);
                        let height =
                            self.place_text(text, &fonts.bold, size, self.padding, None).await?;
                        self.y += height + 12.0;
                    } else {
                        let height = self
                            .place_text(text, &fonts.medium, 14.0, self.padding + 16.0, None)
                            .await?;
                        self.y += height + 8.0;
                    }
                    self.in_persona_section = true;
                    debug!(section = %text, "opened persona section");
                }
            }
            return Ok(true);
        }
        if self.in_persona_section {
            if NUMBERED_LINE.is_match(text) {
                self.flush_group().await?;
                let fonts = self.fonts;
                let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
                for line in lines {
                    let height = self
                        .place_text(
                            &line,
                            &fonts.regular,
                            14.0,
                            self.padding + 24.0,
                            Some(self.content_width - 24.0),
                        )
                        .await?;
                    self.y += height + 8.0;
                }
            } else if text.starts_with('•') || text.starts_with('-') {
                self.group_push(RunKind::Bullets, 24.0, text).await?;
            } else {
                self.group_push(RunKind::Content, 16.0, text).await?;
            }
            return Ok(true);
        }
        Ok(false)
    }

    /// Separator, fallback heading, then the grid. Used when colors were
    /// detected but no section announced them.
    async fn trailing_palette(&mut self) -> Result<()> {
        self.children.push(VisualNode::Line(LineNode {
            x: self.padding,
            y: self.y,
            length: self.content_width,
            stroke: Color::gray(0.8),
            stroke_weight: 1.0,
        }));
        self.y += 24.0;
        let fonts = self.fonts;
        let height = self
            .place_text("Color Palette", &fonts.bold, 20.0, self.padding, None)
            .await?;
        self.y += height + 24.0;
        self.emit_swatch_grid().await
    }

    /// Swatch cells grouped by category, in first-seen category order.
    async fn emit_swatch_grid(&mut self) -> Result<()> {
        self.swatches_emitted = true;
        let colors: Vec<ColorEntry> = self.colors.to_vec();
        let mut categories: Vec<&str> = Vec::new();
        for color in &colors {
            if !categories.contains(&color.category.as_str()) {
                categories.push(&color.category);
            }
        }
        let per_row = swatches_per_row(self.content_width);
        debug!(colors = colors.len(), categories = categories.len(), per_row, "emitting swatch grid");
        let fonts = self.fonts;
        for category in categories {
            let header = format!("{category} Colors:");
            let height = self
                .place_text(&header, &fonts.medium, 16.0, self.padding, None)
                .await?;
            self.y += height + 16.0;
            let entries: Vec<&ColorEntry> =
                colors.iter().filter(|c| c.category == category).collect();
            for row in entries.chunks(per_row) {
                let row_y = self.y;
                for (col, entry) in row.iter().enumerate() {
                    let mut cell = self.swatch_cell(entry).await?;
                    cell.x = self.padding + col as f32 * (SWATCH_SIZE + SWATCH_GAP);
                    cell.y = row_y;
                    self.children.push(VisualNode::Frame(cell));
                }
                self.y = row_y + SWATCH_SIZE + SWATCH_ROW_GAP;
            }
            self.y += 16.0;
        }
        Ok(())
    }

    async fn swatch_cell(&mut self, entry: &ColorEntry) -> Result<FrameNode> {
        let fonts = self.fonts;
        let mut cell = FrameNode::new(format!("Color: #{}", entry.hex));
        cell.resize(SWATCH_SIZE, SWATCH_CELL_HEIGHT);
        cell.children.push(VisualNode::Rect(RectNode {
            x: 0.0,
            y: 0.0,
            width: SWATCH_SIZE,
            height: SWATCH_SIZE,
            fill: entry.rgb,
            corner_radius: 8.0,
            shadow: Some(DropShadow {
                color: Color::BLACK,
                alpha: 0.1,
                offset: Point::new(0.0, 2.0),
                radius: 4.0,
            }),
        }));
        let hex_label = format!("#{}", entry.hex);
        let mut label = TextNode::new(
            &hex_label,
            &fonts.regular.family,
            fonts.regular.style,
            12.0,
        );
        label.y = SWATCH_SIZE + 8.0;
        label.width = SWATCH_SIZE;
        label.fill = Color::gray(0.4);
        label.align = TextAlign::Center;
        let measured = self
            .canvas
            .measure_text(
                &hex_label,
                &fonts.regular.family,
                fonts.regular.style,
                12.0,
                Some(SWATCH_SIZE),
            )
            .await?;
        label.height = measured.height;
        cell.children.push(VisualNode::Text(label));
        if let Some(name) = &entry.name {
            let display = if name.chars().count() > 15 {
                let short: String = name.chars().take(12).collect();
                format!("{short}...")
            } else {
                name.clone()
            };
            let mut label = TextNode::new(
                &display,
                &fonts.regular.family,
                fonts.regular.style,
                10.0,
            );
            label.y = SWATCH_SIZE + 24.0;
            label.width = SWATCH_SIZE;
            label.fill = Color::gray(0.4);
            label.align = TextAlign::Center;
            let measured = self
                .canvas
                .measure_text(
                    &display,
                    &fonts.regular.family,
                    fonts.regular.style,
                    10.0,
                    Some(SWATCH_SIZE),
                )
                .await?;
            label.height = measured.height;
            cell.children.push(VisualNode::Text(label));
        }
        Ok(cell)
    }
}
