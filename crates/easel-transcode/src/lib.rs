//! HTML-to-canvas transcoding.
//!
//! The pipeline: [`parser`] turns an HTML fragment into classified
//! [`ContentElement`]s, [`classify`] derives document type, palette colors
//! and font mentions from them, [`fonts`] resolves loadable faces against
//! the canvas, and [`layout`] walks the elements top to bottom into a
//! positioned node tree that [`render_html`] commits as one frame.
//!
//! Parsing may cross a process boundary; [`bridge`] wraps that round-trip
//! with a timeout.

pub mod bridge;
pub mod classify;
pub mod element;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod parser;

use tracing::info;

use easel_canvas::{Canvas, Color, FrameNode, TextNode, VisualNode};

pub use bridge::ParserHandle;
pub use classify::{ColorEntry, DocumentType};
pub use element::{ContentElement, ElementKind};
pub use error::{Result, TranscodeError};
pub use fonts::FontSet;
pub use layout::LayoutEngine;

/// Knobs for a transcode run. Defaults match the standard 800pt frame
/// with 40pt padding.
#[derive(Debug, Clone)]
pub struct TranscodeOptions {
    pub frame_width: f32,
    pub padding: f32,
    /// Family every run falls back to; must be loadable.
    pub default_font: String,
    /// Monospace family name used when no candidate loads.
    pub monospace_fallback: String,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            frame_width: layout::FRAME_WIDTH,
            padding: layout::PADDING,
            default_font: "Inter".to_string(),
            monospace_fallback: "Courier New".to_string(),
        }
    }
}

impl TranscodeOptions {
    pub fn content_width(&self) -> f32 {
        self.frame_width - 2.0 * self.padding
    }
}

/// Lay out parsed elements and commit them as a single named frame,
/// centered on the viewport.
pub async fn render_html<C: Canvas>(
    canvas: &mut C,
    text: &str,
    html: &str,
    elements: &[ContentElement],
    options: &TranscodeOptions,
) -> Result<()> {
    let candidates = classify::font_candidates(text, Some(html));
    let fonts = fonts::resolve(canvas, &candidates, options).await?;
    let doc_type = DocumentType::detect(text, Some(html));
    let colors = classify::collect_colors(elements);
    info!(
        doc_type = doc_type.frame_name(),
        elements = elements.len(),
        colors = colors.len(),
        fonts = fonts.loaded.len(),
        "rendering html content"
    );
    let engine = LayoutEngine::new(canvas, &fonts, &colors, doc_type, options);
    let (children, final_y) = engine.run(elements).await?;

    let mut frame = document_frame(doc_type.frame_name(), options);
    frame.children = children;
    frame.resize(options.frame_width, final_y + options.padding);
    center_on_viewport(canvas, &mut frame);
    canvas.commit(frame).await?;
    canvas.notify(doc_type.success_message());
    Ok(())
}

/// Fallback when no HTML arrived with the message: the whole text as one
/// wrapped node in the primary regular face.
pub async fn render_plain<C: Canvas>(
    canvas: &mut C,
    text: &str,
    options: &TranscodeOptions,
) -> Result<()> {
    let candidates = classify::font_candidates(text, None);
    let fonts = fonts::resolve(canvas, &candidates, options).await?;
    info!(chars = text.len(), "rendering plain text");
    let mut node = TextNode::new(text, &fonts.regular.family, fonts.regular.style, 14.0);
    node.x = options.padding;
    node.y = options.padding;
    let measured = canvas
        .measure_text(
            text,
            &fonts.regular.family,
            fonts.regular.style,
            14.0,
            Some(options.content_width()),
        )
        .await?;
    node.width = measured.width;
    node.height = measured.height;

    let mut frame = document_frame(DocumentType::Generic.frame_name(), options);
    frame.children.push(VisualNode::Text(node));
    frame.resize(options.frame_width, measured.height + 2.0 * options.padding);
    center_on_viewport(canvas, &mut frame);
    canvas.commit(frame).await?;
    canvas.notify("Text added to the canvas!");
    Ok(())
}

fn document_frame(name: &str, options: &TranscodeOptions) -> FrameNode {
    let mut frame = FrameNode::new(name);
    frame.fill = Some(Color::WHITE);
    frame.corner_radius = 20.0;
    frame.clips_content = true;
    frame.width = options.frame_width;
    frame
}

fn center_on_viewport<C: Canvas>(canvas: &C, frame: &mut FrameNode) {
    let center = canvas.viewport_center();
    frame.x = center.x - frame.width / 2.0;
    frame.y = center.y - frame.height / 2.0;
}
