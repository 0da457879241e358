//! Classified content elements, the unit of exchange between the parser and
//! the layout engine.
//!
//! On the wire (parse round-trip, §bridge) elements serialize as
//! `{"type": "h2", "text": "..."}` records; in process they are a closed
//! tagged type so downstream code can match exhaustively.

use serde::{Deserialize, Serialize};

/// What kind of content an element carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ElementKind {
    /// Heading with its level, 1 through 6.
    Heading(u8),
    /// Paragraph or div text.
    Content,
    /// Merged unordered list, one `• `-prefixed item per line.
    BulletList,
    /// Merged ordered list, one `<rank>. ` line per item.
    NumberedList,
    Strong,
    Em,
    Code,
}

impl ElementKind {
    pub fn is_heading(&self) -> bool {
        matches!(self, ElementKind::Heading(_))
    }

    pub fn heading_level(&self) -> Option<u8> {
        match self {
            ElementKind::Heading(level) => Some(*level),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Heading(1) => "h1",
            ElementKind::Heading(2) => "h2",
            ElementKind::Heading(3) => "h3",
            ElementKind::Heading(4) => "h4",
            ElementKind::Heading(5) => "h5",
            ElementKind::Heading(_) => "h6",
            ElementKind::Content => "content",
            ElementKind::BulletList => "bullet-list",
            ElementKind::NumberedList => "numbered-list",
            ElementKind::Strong => "strong",
            ElementKind::Em => "em",
            ElementKind::Code => "code",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        kind.as_str().to_string()
    }
}

impl TryFrom<String> for ElementKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "h1" => Ok(ElementKind::Heading(1)),
            "h2" => Ok(ElementKind::Heading(2)),
            "h3" => Ok(ElementKind::Heading(3)),
            "h4" => Ok(ElementKind::Heading(4)),
            "h5" => Ok(ElementKind::Heading(5)),
            "h6" => Ok(ElementKind::Heading(6)),
            "content" => Ok(ElementKind::Content),
            "bullet-list" => Ok(ElementKind::BulletList),
            "numbered-list" => Ok(ElementKind::NumberedList),
            "strong" => Ok(ElementKind::Strong),
            "em" => Ok(ElementKind::Em),
            "code" => Ok(ElementKind::Code),
            other => Err(format!("unknown element kind '{other}'")),
        }
    }
}

/// One classified unit of input content. Created once by the parser,
/// immutable thereafter, consumed in document order by the layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentElement {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub text: String,
}

impl ContentElement {
    pub fn new(kind: ElementKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_uses_type_and_text() {
        let element = ContentElement::new(ElementKind::Heading(2), "Overview");
        let json = serde_json::to_string(&element).unwrap();
        assert_eq!(json, r#"{"type":"h2","text":"Overview"}"#);

        let back: ContentElement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, element);
    }

    #[test]
    fn rejects_unknown_kind() {
        let result: Result<ContentElement, _> =
            serde_json::from_str(r#"{"type":"marquee","text":"x"}"#);
        assert!(result.is_err());
    }
}
