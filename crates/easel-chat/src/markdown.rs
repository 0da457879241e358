//! Lightweight markdown-to-HTML for the chat panel.
//!
//! This is a display renderer, not a full markdown implementation: a fixed
//! regex chain covering the constructs assistant replies actually use.
//! Block constructs run first, inline spans second, and any line still
//! bare at the end wraps in a paragraph. Rendering is pure string work and
//! never fails; malformed input passes through as text.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

static STRAY_BANG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^!+").unwrap());
static HR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?:-{3,}|={3,})\s*$").unwrap());
static H4: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^####\s+(.*)$").unwrap());
static H3: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^###\s+(.*)$").unwrap());
static H2: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^##\s+(.*)$").unwrap());
static H1: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#\s+(.*)$").unwrap());
static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\d+)\.\s+(.*)$").unwrap());
static DASHED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[-*]\s+(.*)$").unwrap());
static BOLD_ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*\*(.+?)\*\*\*").unwrap());
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").unwrap());
static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());
static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[0-9A-Fa-f]{6}\b").unwrap());

/// Render one complete markdown string to display HTML.
pub fn render_markdown(input: &str) -> String {
    let mut html = STRAY_BANG.replace_all(input, "").into_owned();
    html = HR.replace_all(&html, "<hr>").into_owned();
    // Longest heading marker first.
    html = H4.replace_all(&html, "<h4>$1</h4>").into_owned();
    html = H3.replace_all(&html, "<h3>$1</h3>").into_owned();
    html = H2.replace_all(&html, "<h2>$1</h2>").into_owned();
    html = H1.replace_all(&html, "<h1>$1</h1>").into_owned();
    html = NUMBERED_ITEM
        .replace_all(&html, r#"<div class="list-item">$1. $2</div>"#)
        .into_owned();
    html = DASHED_ITEM
        .replace_all(&html, r#"<div class="list-item">• $1</div>"#)
        .into_owned();
    html = BOLD_ITALIC
        .replace_all(&html, "<strong><em>$1</em></strong>")
        .into_owned();
    html = BOLD.replace_all(&html, "<strong>$1</strong>").into_owned();
    html = ITALIC.replace_all(&html, "<em>$1</em>").into_owned();
    html = CODE.replace_all(&html, "<code>$1</code>").into_owned();
    html = LINK
        .replace_all(&html, r#"<a href="$2" target="_blank">$1</a>"#)
        .into_owned();
    html = HEX_COLOR
        .replace_all(&html, r#"<span class="color-code">$0</span>"#)
        .into_owned();

    let mut out = String::with_capacity(html.len());
    for line in html.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if starts_with_block_tag(trimmed) {
            out.push_str(trimmed);
        } else {
            out.push_str("<p>");
            out.push_str(trimmed);
            out.push_str("</p>");
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

/// Only the block constructs this chain emits skip the paragraph wrapper;
/// lines opening with an inline span still wrap.
fn starts_with_block_tag(line: &str) -> bool {
    const BLOCK_TAGS: [&str; 6] = ["<h1>", "<h2>", "<h3>", "<h4>", "<hr>", "<div"];
    BLOCK_TAGS.iter().any(|tag| line.starts_with(tag))
}

/// Accumulates streamed chunks and re-renders the whole buffer each time,
/// so constructs split across chunk boundaries heal once the closing
/// delimiter arrives.
#[derive(Debug, Default)]
pub struct ChatStream {
    buffer: String,
}

impl ChatStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return the current rendering of the full buffer.
    pub fn push(&mut self, chunk: &str) -> String {
        self.buffer.push_str(chunk);
        trace!(len = self.buffer.len(), "re-rendering chat buffer");
        render_markdown(&self.buffer)
    }

    pub fn html(&self) -> String {
        render_markdown(&self.buffer)
    }

    pub fn raw(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_render_by_marker_depth() {
        assert_eq!(render_markdown("# Title"), "<h1>Title</h1>");
        assert_eq!(render_markdown("## Sub"), "<h2>Sub</h2>");
        assert_eq!(render_markdown("#### Deep"), "<h4>Deep</h4>");
    }

    #[test]
    fn stray_bang_before_heading_is_dropped() {
        assert_eq!(render_markdown("!# Color Palette"), "<h1>Color Palette</h1>");
    }

    #[test]
    fn list_items_become_divs() {
        let html = render_markdown("1. First\n- Second\n* Third");
        assert_eq!(
            html,
            "<div class=\"list-item\">1. First</div>\n\
             <div class=\"list-item\">• Second</div>\n\
             <div class=\"list-item\">• Third</div>"
        );
    }

    #[test]
    fn horizontal_rules_from_dashes_and_equals() {
        assert_eq!(render_markdown("---"), "<hr>");
        assert_eq!(render_markdown("====="), "<hr>");
    }

    #[test]
    fn inline_spans_nest_correctly() {
        assert_eq!(
            render_markdown("***both*** **bold** *em* `code`"),
            "<p><strong><em>both</em></strong> <strong>bold</strong> <em>em</em> <code>code</code></p>"
        );
    }

    #[test]
    fn links_open_in_a_new_tab() {
        assert_eq!(
            render_markdown("[docs](https://example.com)"),
            r#"<p><a href="https://example.com" target="_blank">docs</a></p>"#
        );
    }

    #[test]
    fn hex_codes_get_a_color_span() {
        let html = render_markdown("Primary is #FF8800 here");
        assert_eq!(
            html,
            r#"<p>Primary is <span class="color-code">#FF8800</span> here</p>"#
        );
    }

    #[test]
    fn lines_opening_with_inline_markup_still_wrap() {
        assert_eq!(
            render_markdown("**Bold** opener"),
            "<p><strong>Bold</strong> opener</p>"
        );
        assert_eq!(
            render_markdown("#FF8800 leads the line"),
            r#"<p><span class="color-code">#FF8800</span> leads the line</p>"#
        );
        // Block output stays unwrapped.
        assert_eq!(render_markdown("## Sub"), "<h2>Sub</h2>");
        assert_eq!(
            render_markdown("- item"),
            r#"<div class="list-item">• item</div>"#
        );
    }

    #[test]
    fn bare_lines_wrap_in_paragraphs() {
        assert_eq!(
            render_markdown("one\n\ntwo"),
            "<p>one</p>\n<p>two</p>"
        );
    }

    #[test]
    fn stream_heals_constructs_split_across_chunks() {
        let mut stream = ChatStream::new();
        let partial = stream.push("Use **bo");
        assert!(!partial.contains("<strong>"));
        let healed = stream.push("ld** text");
        assert_eq!(healed, "<p>Use <strong>bold</strong> text</p>");
        assert_eq!(stream.raw(), "Use **bold** text");
    }
}
