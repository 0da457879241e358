//! Font resolution against the host canvas.
//!
//! Everything here is best-effort except the default family: if the default
//! cannot load in regular, medium and bold the run aborts, because no text
//! node could be created at all. Mentioned fonts and monospace candidates
//! degrade to the default with a log line.

use tracing::{debug, warn};

use easel_canvas::{Canvas, CanvasError, FontStyle};

use crate::TranscodeOptions;

/// Tried in order for code spans; the first that loads wins.
pub const MONOSPACE_CANDIDATES: [&str; 10] = [
    "Courier",
    "Courier New",
    "Consolas",
    "Monaco",
    "Menlo",
    "Source Code Pro",
    "Fira Code",
    "Roboto Mono",
    "JetBrains Mono",
    "IBM Plex Mono",
];

/// A loadable family/style pair, verified at resolution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontName {
    pub family: String,
    pub style: FontStyle,
}

impl FontName {
    fn new(family: &str, style: FontStyle) -> Self {
        Self {
            family: family.to_string(),
            style,
        }
    }
}

/// The resolved faces a layout run works with.
#[derive(Debug, Clone)]
pub struct FontSet {
    pub regular: FontName,
    pub medium: FontName,
    pub bold: FontName,
    pub italic: FontName,
    /// Family used for code spans.
    pub monospace: String,
    pub default_family: String,
    /// Mentioned families that actually loaded, in mention order.
    pub loaded: Vec<String>,
}

impl FontSet {
    pub fn is_loaded(&self, family: &str) -> bool {
        self.loaded
            .iter()
            .any(|loaded| loaded.eq_ignore_ascii_case(family))
    }

    /// First loaded family literally named in the text, if any.
    pub fn find_in_text(&self, text: &str) -> Option<&str> {
        self.loaded
            .iter()
            .find(|family| text.contains(family.as_str()))
            .map(String::as_str)
    }
}

/// Load the default faces, probe monospace candidates and the mentioned
/// families, and pick the primary family for the run.
pub async fn resolve<C: Canvas>(
    canvas: &mut C,
    candidates: &[String],
    options: &TranscodeOptions,
) -> Result<FontSet, CanvasError> {
    let default_family = options.default_font.as_str();
    canvas.load_font(default_family, FontStyle::Regular).await?;
    canvas.load_font(default_family, FontStyle::Medium).await?;
    canvas.load_font(default_family, FontStyle::Bold).await?;

    let mut monospace = options.monospace_fallback.clone();
    for candidate in MONOSPACE_CANDIDATES {
        match canvas.load_font(candidate, FontStyle::Regular).await {
            Ok(()) => {
                monospace = candidate.to_string();
                break;
            }
            Err(err) => debug!(family = candidate, %err, "monospace candidate unavailable"),
        }
    }

    let mut loaded = Vec::new();
    let mut styles_ok: Vec<(String, FontStyle)> = Vec::new();
    for candidate in candidates {
        match canvas.load_font(candidate, FontStyle::Regular).await {
            Ok(()) => {
                loaded.push(candidate.clone());
                for style in [FontStyle::Medium, FontStyle::Bold, FontStyle::Italic] {
                    match canvas.load_font(candidate, style).await {
                        Ok(()) => styles_ok.push((candidate.clone(), style)),
                        Err(err) => {
                            debug!(family = %candidate, %style, %err, "style unavailable")
                        }
                    }
                }
            }
            Err(err) => warn!(family = %candidate, %err, "mentioned font failed to load"),
        }
    }

    let primary = loaded
        .iter()
        .find(|family| !family.eq_ignore_ascii_case(default_family))
        .cloned()
        .unwrap_or_else(|| default_family.to_string());

    let styled = |style: FontStyle| {
        if primary.eq_ignore_ascii_case(default_family)
            || styles_ok.iter().any(|(f, s)| f == &primary && *s == style)
        {
            FontName::new(&primary, style)
        } else {
            FontName::new(default_family, style)
        }
    };
    let medium = styled(FontStyle::Medium);
    let bold = styled(FontStyle::Bold);
    // Italic has no default-family fallback; it degrades to regular.
    let italic = if primary.eq_ignore_ascii_case(default_family) {
        match canvas.load_font(&primary, FontStyle::Italic).await {
            Ok(()) => FontName::new(&primary, FontStyle::Italic),
            Err(_) => FontName::new(&primary, FontStyle::Regular),
        }
    } else if styles_ok
        .iter()
        .any(|(f, s)| f == &primary && *s == FontStyle::Italic)
    {
        FontName::new(&primary, FontStyle::Italic)
    } else {
        FontName::new(&primary, FontStyle::Regular)
    };

    Ok(FontSet {
        regular: FontName::new(&primary, FontStyle::Regular),
        medium,
        bold,
        italic,
        monospace,
        default_family: default_family.to_string(),
        loaded,
    })
}
