//! Content classification: document type, persona section patterns,
//! palette color extraction and font mentions.
//!
//! Color extraction is a single explicit fold over the element sequence —
//! `(current category, current name, accumulated colors)` travel as fold
//! state, so category stickiness has no ordering ambiguity.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use easel_canvas::Color;

use crate::element::ContentElement;

/// What kind of document the response text describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    StyleGuide,
    Persona,
    Generic,
}

impl DocumentType {
    /// Keyword detection over the plain text and the raw HTML.
    /// Style guide wins when both pattern sets match.
    pub fn detect(text: &str, html: Option<&str>) -> Self {
        let mut haystack = text.to_lowercase();
        if let Some(html) = html {
            haystack.push('\n');
            haystack.push_str(&html.to_lowercase());
        }
        if haystack.contains("style guide") {
            return DocumentType::StyleGuide;
        }
        const PERSONA_KEYWORDS: [&str; 4] =
            ["persona", "user profile", "user persona", "user research"];
        if PERSONA_KEYWORDS.iter().any(|kw| haystack.contains(kw)) {
            return DocumentType::Persona;
        }
        DocumentType::Generic
    }

    pub fn frame_name(&self) -> &'static str {
        match self {
            DocumentType::StyleGuide => "Style Guide",
            DocumentType::Persona => "Persona",
            DocumentType::Generic => "AI Response",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            DocumentType::StyleGuide => "Style guide added to the canvas!",
            DocumentType::Persona => "Persona added to the canvas!",
            DocumentType::Generic => "Content added to the canvas!",
        }
    }
}

/// One detected palette color. Accumulated over the full element sequence
/// before any node is created; read-only during layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorEntry {
    /// Canonical uppercase six-digit hex, no `#`, unique per run.
    pub hex: String,
    /// Channel floats in `[0,1]`.
    pub rgb: Color,
    pub category: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

static HEX6: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(#?[0-9A-Fa-f]{6})\b").unwrap());
static HEX3: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#([0-9A-Fa-f]{3})\b").unwrap());
static RGB_FN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"rgb\(\s*\d{1,3}\s*,\s*\d{1,3}\s*,\s*\d{1,3}\s*\)").unwrap());
static DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([^)]*)\)").unwrap());
static COLOR_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]([A-Z][a-z]+(?:\s[A-Z][a-z]+)?)\s*:").unwrap());
static PALETTE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)colou?r\s*palette|\d+\.\s*colou?r").unwrap());
static COLOR_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:primary|secondary|accent|neutral|background|text)\s+colou?r|colou?r\s*palette|\d+\.\s*colou?r")
        .unwrap()
});

/// Category labels paired with their trigger patterns, checked in order.
static CATEGORIES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    ["Primary", "Secondary", "Accent", "Neutral", "Background", "Text"]
        .into_iter()
        .map(|label| {
            let pattern = format!(r"(?i){}.*colou?r", label.to_lowercase());
            (label, Regex::new(&pattern).unwrap())
        })
        .collect()
});

pub const FALLBACK_CATEGORY: &str = "Main";

/// True when the text announces a color-palette section.
pub fn is_color_section(text: &str) -> bool {
    COLOR_SECTION.is_match(text)
}

fn detect_category(text: &str) -> Option<&'static str> {
    CATEGORIES
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
        .map(|(label, _)| *label)
}

/// Extract every palette color from the element sequence, in order.
pub fn collect_colors(elements: &[ContentElement]) -> Vec<ColorEntry> {
    let mut scan = ColorScan::default();
    for element in elements {
        scan.element(element.text.trim());
    }
    scan.colors
}

#[derive(Default)]
struct ColorScan {
    category: Option<String>,
    name: Option<String>,
    colors: Vec<ColorEntry>,
}

impl ColorScan {
    fn element(&mut self, text: &str) {
        if let Some(category) = detect_category(text) {
            self.category = Some(category.to_string());
        } else if self.category.is_none() && PALETTE_HEADING.is_match(text) {
            self.category = Some(FALLBACK_CATEGORY.to_string());
        } else if let Some(caps) = COLOR_NAME.captures(text) {
            // Category headers also look like `Word:`, hence the else.
            self.name = Some(caps[1].to_string());
        }
        let description = DESCRIPTION
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
            .filter(|desc| !desc.is_empty());

        for caps in HEX6.captures_iter(text) {
            let token = caps[1].trim_start_matches('#').to_string();
            self.add(&format!("#{token}"), description.clone());
        }
        for caps in HEX3.captures_iter(text) {
            self.add(&format!("#{}", &caps[1]), description.clone());
        }
        for found in RGB_FN.find_iter(text) {
            self.add(found.as_str(), description.clone());
        }
    }

    fn add(&mut self, token: &str, description: Option<String>) {
        let Ok(parsed) = csscolorparser::parse(token) else {
            debug!(token, "skipping unparsable color token");
            return;
        };
        let [r, g, b, _] = parsed.to_rgba8();
        let hex = format!("{r:02X}{g:02X}{b:02X}");
        // First occurrence wins, case-insensitively.
        if self.colors.iter().any(|c| c.hex.eq_ignore_ascii_case(&hex)) {
            return;
        }
        let category = self
            .category
            .get_or_insert_with(|| FALLBACK_CATEGORY.to_string())
            .clone();
        self.colors.push(ColorEntry {
            hex,
            rgb: Color::from_rgb8(r, g, b),
            category,
            name: self.name.clone(),
            description,
        });
    }
}

static PERSONA_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(Name|Age|Gender|Occupation|Background|Goals|Frustrations|Bio|Needs|Motivations|Behaviors|Challenges|Demographics|Personality|Quote|Skills|Tools|Brands|Influences):",
    )
    .unwrap()
});
static SUBHEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[•\-]\s+)?[A-Z][a-z]+(?:\s[A-Z][a-z]+)*:").unwrap());
static KEY_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^([^:]+):\s*(.*)$").unwrap());
static BULLET_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[•\-]\s+").unwrap());

/// Persona headers: heading elements, or a line opening with a known
/// persona field label.
pub fn is_persona_header(element: &ContentElement) -> bool {
    element.kind.is_heading() || PERSONA_FIELD.is_match(element.text.trim())
}

/// Sub-headings inside a persona section: `Capitalized Words:`, optionally
/// bulleted or dashed.
pub fn is_persona_subheading(text: &str) -> bool {
    SUBHEADING.is_match(text)
}

/// `Key: Value` split with the leading bullet/dash stripped from the key.
/// Returns `None` when the text has no colon.
pub fn split_key_value(text: &str) -> Option<(String, String)> {
    let caps = KEY_VALUE.captures(text)?;
    let key = BULLET_PREFIX.replace(caps[1].trim(), "").to_string();
    Some((key, caps[2].trim().to_string()))
}

static FONT_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:font|typeface|typography)(?:\s+family)?(?:\s*:\s*|\s+is\s+|\s+)["']?([A-Za-z][A-Za-z ]*)"#)
        .unwrap()
});

/// Common sans-serif families checked explicitly on word boundaries.
pub const COMMON_FONTS: [&str; 16] = [
    "Montserrat",
    "Roboto",
    "Open Sans",
    "Lato",
    "Poppins",
    "Raleway",
    "Oswald",
    "Playfair Display",
    "Merriweather",
    "Source Sans Pro",
    "Nunito",
    "Ubuntu",
    "Rubik",
    "Work Sans",
    "Quicksand",
    "Karla",
];

static COMMON_FONTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Multi-word names first so the alternation prefers them.
    let mut names: Vec<&str> = COMMON_FONTS.to_vec();
    names.sort_by_key(|name| std::cmp::Reverse(name.len()));
    let pattern = format!(r"(?i)\b(?:{})\b", names.join("|"));
    Regex::new(&pattern).unwrap()
});

/// Font names mentioned in the text or raw HTML, deduplicated in first-seen
/// order. Candidates only — each must still load to count as mentioned.
pub fn font_candidates(text: &str, html: Option<&str>) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    let mut push = |name: &str, out: &mut Vec<String>| {
        if !name.is_empty() && !out.iter().any(|seen| seen.eq_ignore_ascii_case(name)) {
            out.push(name.to_string());
        }
    };
    for haystack in [Some(text), html].into_iter().flatten() {
        for caps in FONT_PHRASE.captures_iter(haystack) {
            let name = caps[1].trim();
            if !name.to_lowercase().contains("font") {
                push(name, &mut candidates);
            }
        }
    }
    for haystack in [Some(text), html].into_iter().flatten() {
        for found in COMMON_FONTS_RE.find_iter(haystack) {
            let canonical = COMMON_FONTS
                .iter()
                .find(|name| name.eq_ignore_ascii_case(found.as_str()))
                .copied()
                .unwrap_or(found.as_str());
            push(canonical, &mut candidates);
        }
    }
    candidates
}
