//! HTML structural parser.
//!
//! Walks a sanitized HTML fragment and emits the ordered [`ContentElement`]
//! sequence the layout engine consumes. Adjacent list items and paragraph
//! runs merge into single logical blocks; unknown markup degrades to
//! flattened text. Parsing never fails.

use std::ops::Deref;

use ego_tree::NodeRef;
use scraper::{Html, Node};

use crate::element::{ContentElement, ElementKind};

/// Parse an HTML fragment into classified content elements.
pub fn parse_content(html: &str) -> Vec<ContentElement> {
    let fragment = Html::parse_fragment(html);
    let root = fragment.tree.root();
    let container = root
        .children()
        .find(|child| matches!(child.value(), Node::Element(_)))
        .unwrap_or(root);
    let mut sink = Sink::default();
    walk(container, &mut sink);
    sink.finish()
}

/// Open accumulations mirror the three merge contexts: a paragraph run,
/// a bullet list and a numbered list. At most one is open at a time.
#[derive(Default)]
struct Sink {
    elements: Vec<ContentElement>,
    section: Option<String>,
    bullets: Option<String>,
    numbered: Option<String>,
}

impl Sink {
    fn push(&mut self, kind: ElementKind, text: &str) {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            self.elements.push(ContentElement::new(kind, trimmed));
        }
    }

    fn flush_section(&mut self) {
        if let Some(section) = self.section.take() {
            self.push(ElementKind::Content, &section);
        }
    }

    fn flush_bullets(&mut self) {
        if let Some(bullets) = self.bullets.take() {
            self.push(ElementKind::BulletList, &bullets);
        }
    }

    fn flush_numbered(&mut self) {
        if let Some(numbered) = self.numbered.take() {
            self.push(ElementKind::NumberedList, &numbered);
        }
    }

    fn flush_all(&mut self) {
        self.flush_section();
        self.flush_bullets();
        self.flush_numbered();
    }

    fn open(&self) -> bool {
        self.section.is_some() || self.bullets.is_some() || self.numbered.is_some()
    }

    /// Raw text flows into whatever accumulation is open, or starts a
    /// fresh paragraph run. This is also how unknown markup degrades:
    /// its text lands here after the walk strips the tags.
    fn absorb_text(&mut self, raw: &str) {
        if raw.trim().is_empty() {
            return;
        }
        if let Some(bullets) = &mut self.bullets {
            bullets.push_str(raw);
        } else if let Some(numbered) = &mut self.numbered {
            numbered.push_str(raw);
        } else if let Some(section) = &mut self.section {
            section.push_str(raw);
        } else {
            self.section = Some(raw.to_string());
        }
    }

    fn append_newline(&mut self) {
        if let Some(bullets) = &mut self.bullets {
            bullets.push('\n');
        } else if let Some(numbered) = &mut self.numbered {
            numbered.push('\n');
        } else if let Some(section) = &mut self.section {
            section.push('\n');
        }
    }

    fn push_bullet_line(&mut self, line: &str) {
        if self.bullets.is_none() {
            self.flush_section();
            self.flush_numbered();
        }
        let bullets = self.bullets.get_or_insert_with(String::new);
        if !bullets.is_empty() {
            bullets.push('\n');
        }
        bullets.push_str(line);
    }

    fn push_numbered_line(&mut self, line: &str) {
        if self.numbered.is_none() {
            self.flush_section();
            self.flush_bullets();
        }
        let numbered = self.numbered.get_or_insert_with(String::new);
        if !numbered.is_empty() {
            numbered.push('\n');
        }
        numbered.push_str(line);
    }

    /// Paragraph/div text extends an open list as a continuation line,
    /// otherwise it starts a fresh paragraph run.
    fn paragraph(&mut self, text: &str) {
        if let Some(bullets) = &mut self.bullets {
            if !bullets.trim().is_empty() {
                bullets.push('\n');
            }
            bullets.push_str(text);
        } else if let Some(numbered) = &mut self.numbered {
            if !numbered.trim().is_empty() {
                numbered.push('\n');
            }
            numbered.push_str(text);
        } else {
            self.flush_section();
            if !text.is_empty() {
                self.section = Some(text.to_string());
            }
        }
    }

    /// Flow-level emphasis spans become standalone elements; inside an
    /// accumulating paragraph they flatten to plain text.
    fn emphasis(&mut self, kind: ElementKind, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.open() {
            self.absorb_text(text);
        } else {
            self.push(kind, text);
        }
    }

    fn finish(mut self) -> Vec<ContentElement> {
        self.flush_all();
        self.elements
    }
}

fn walk(container: NodeRef<'_, Node>, sink: &mut Sink) {
    for child in container.children() {
        match child.value() {
            Node::Text(text) => sink.absorb_text(text.deref()),
            Node::Element(element) => {
                let tag = element.name().to_ascii_lowercase();
                match tag.as_str() {
                    "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                        sink.flush_all();
                        let text = normalize_whitespace(&collect_text(&child));
                        let level = tag.as_bytes()[1] - b'0';
                        sink.push(ElementKind::Heading(level), &text);
                    }
                    "ol" => {
                        let mut rank = 0usize;
                        for item in child.children() {
                            if element_name(&item) == Some("li") {
                                rank += 1;
                                let text = normalize_whitespace(&collect_text(&item));
                                sink.push_numbered_line(&format!("{rank}. {text}"));
                            }
                        }
                    }
                    "li" => {
                        let text = normalize_whitespace(&collect_text(&child));
                        if parent_is_ordered(&child) {
                            let rank = ordered_rank(&child);
                            sink.push_numbered_line(&format!("{rank}. {text}"));
                        } else {
                            sink.push_bullet_line(&format!("• {text}"));
                        }
                    }
                    "br" => sink.append_newline(),
                    "p" | "div" => {
                        let text = normalize_whitespace(&collect_text(&child));
                        sink.paragraph(&text);
                    }
                    "strong" | "b" => {
                        let text = normalize_whitespace(&collect_text(&child));
                        sink.emphasis(ElementKind::Strong, &text);
                    }
                    "em" | "i" => {
                        let text = normalize_whitespace(&collect_text(&child));
                        sink.emphasis(ElementKind::Em, &text);
                    }
                    "code" => {
                        let text = normalize_whitespace(&collect_text(&child));
                        sink.emphasis(ElementKind::Code, &text);
                    }
                    // Unknown wrappers degrade to their children.
                    _ => walk(child, sink),
                }
            }
            _ => {}
        }
    }
}

fn element_name<'tree>(node: &NodeRef<'tree, Node>) -> Option<&'tree str> {
    match node.value() {
        Node::Element(element) => Some(element.name()),
        _ => None,
    }
}

fn parent_is_ordered(node: &NodeRef<'_, Node>) -> bool {
    node.parent()
        .and_then(|parent| element_name(&parent).map(|name| name.eq_ignore_ascii_case("ol")))
        .unwrap_or(false)
}

/// 1-based rank among the `<li>` siblings, by position, ignoring any
/// explicit numbering attributes.
fn ordered_rank(node: &NodeRef<'_, Node>) -> usize {
    let Some(parent) = node.parent() else {
        return 1;
    };
    let mut rank = 0;
    for sibling in parent.children() {
        if element_name(&sibling) == Some("li") {
            rank += 1;
        }
        if sibling.id() == node.id() {
            break;
        }
    }
    rank.max(1)
}

fn collect_text(node: &NodeRef<'_, Node>) -> String {
    match node.value() {
        Node::Text(text) => text.deref().to_string(),
        _ => {
            let mut content = String::new();
            for child in node.children() {
                content.push_str(&collect_text(&child));
            }
            content
        }
    }
}

fn normalize_whitespace(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut prev_was_space = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                if !result.is_empty() {
                    result.push(' ');
                }
                prev_was_space = true;
            }
        } else {
            result.push(ch);
            prev_was_space = false;
        }
    }
    result.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(elements: &[ContentElement]) -> Vec<ElementKind> {
        elements.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn emits_one_element_per_heading_in_order() {
        let elements = parse_content("<h1>One</h1><p>body</p><h3>Three</h3><h2>Two</h2>");
        let headings: Vec<_> = elements
            .iter()
            .filter(|e| e.kind.is_heading())
            .collect();
        assert_eq!(headings.len(), 3);
        assert_eq!(headings[0].text, "One");
        assert_eq!(headings[1].text, "Three");
        assert_eq!(headings[2].text, "Two");
        assert_eq!(headings[0].kind, ElementKind::Heading(1));
        assert_eq!(headings[1].kind, ElementKind::Heading(3));
    }

    #[test]
    fn merges_ordered_list_with_positional_ranks() {
        let elements = parse_content("<ol><li>First</li><li>Second</li><li>Third</li></ol>");
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].kind, ElementKind::NumberedList);
        let lines: Vec<_> = elements[0].text.split('\n').collect();
        assert_eq!(lines, vec!["1. First", "2. Second", "3. Third"]);
    }

    #[test]
    fn merges_unordered_list_with_bullet_prefix() {
        let elements = parse_content("<ul><li>Alpha</li><li>Beta</li></ul>");
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].kind, ElementKind::BulletList);
        assert_eq!(elements[0].text, "• Alpha\n• Beta");
    }

    #[test]
    fn paragraph_after_list_continues_the_list() {
        let elements =
            parse_content("<p>Intro</p><ul><li>One</li></ul><p>Outro</p><ol><li>End</li></ol>");
        assert_eq!(
            kinds(&elements),
            vec![
                ElementKind::Content,
                ElementKind::BulletList,
                ElementKind::NumberedList,
            ]
        );
        // The paragraph joins the open bullet run as a continuation line;
        // only the list switch flushes.
        assert_eq!(elements[1].text, "• One\nOutro");
        assert_eq!(elements[2].text, "1. End");
    }

    #[test]
    fn heading_flushes_open_paragraph_run() {
        let elements = parse_content("<p>Before</p><h2>Title</h2><p>After</p>");
        assert_eq!(
            kinds(&elements),
            vec![
                ElementKind::Content,
                ElementKind::Heading(2),
                ElementKind::Content,
            ]
        );
    }

    #[test]
    fn flow_level_emphasis_is_standalone() {
        let elements = parse_content("<strong>Key point</strong><em>aside</em><code>x = 1</code>");
        assert_eq!(
            kinds(&elements),
            vec![ElementKind::Strong, ElementKind::Em, ElementKind::Code]
        );
        assert_eq!(elements[0].text, "Key point");
    }

    #[test]
    fn emphasis_inside_paragraph_flattens_to_text() {
        let elements = parse_content("<p>The <strong>main</strong> goal</p>");
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].kind, ElementKind::Content);
        assert_eq!(elements[0].text, "The main goal");
    }

    #[test]
    fn line_breaks_become_newlines_in_open_run() {
        let elements = parse_content("Line one<br>Line two");
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].text, "Line one\nLine two");
    }

    #[test]
    fn unknown_markup_degrades_to_text() {
        let elements = parse_content("<table><tr><td>cell</td></tr></table>");
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].kind, ElementKind::Content);
        assert_eq!(elements[0].text, "cell");
    }

    #[test]
    fn empty_input_yields_no_elements() {
        assert!(parse_content("").is_empty());
        assert!(parse_content("   \n  ").is_empty());
    }
}
