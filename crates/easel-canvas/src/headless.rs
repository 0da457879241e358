//! Deterministic in-memory canvas.
//!
//! Stands in for the host document in tests and headless runs. Text metrics
//! are a fixed monospaced approximation (0.6em advance, 1.4em line height)
//! so layout output is reproducible across machines.

use std::collections::HashSet;

use tracing::debug;

use crate::canvas::{Canvas, CanvasError, Result};
use crate::geometry::{Point, Size};
use crate::node::{FontStyle, FrameNode};

const CHAR_ADVANCE_EM: f32 = 0.6;
const LINE_HEIGHT_EM: f32 = 1.4;

pub struct HeadlessCanvas {
    families: HashSet<String>,
    missing_styles: HashSet<(String, FontStyle)>,
    viewport_center: Point,
    /// Frames committed so far, oldest first.
    pub committed: Vec<FrameNode>,
    /// Notifications issued so far, oldest first.
    pub notices: Vec<String>,
    /// Every font load attempted, successful or not, in call order.
    pub font_loads: Vec<(String, FontStyle)>,
}

impl HeadlessCanvas {
    pub fn new() -> Self {
        let mut families = HashSet::new();
        families.insert("Inter".to_string());
        Self {
            families,
            missing_styles: HashSet::new(),
            viewport_center: Point::new(0.0, 0.0),
            committed: Vec::new(),
            notices: Vec::new(),
            font_loads: Vec::new(),
        }
    }

    /// Make a font family loadable.
    pub fn with_font(mut self, family: &str) -> Self {
        self.families.insert(family.to_string());
        self
    }

    /// Make one style of an otherwise loadable family fail to load.
    pub fn without_style(mut self, family: &str, style: FontStyle) -> Self {
        self.missing_styles.insert((family.to_string(), style));
        self
    }

    pub fn with_viewport_center(mut self, center: Point) -> Self {
        self.viewport_center = center;
        self
    }

    pub fn last_committed(&self) -> Option<&FrameNode> {
        self.committed.last()
    }

    fn has_face(&self, family: &str, style: FontStyle) -> bool {
        self.families.contains(family) && !self.missing_styles.contains(&(family.to_string(), style))
    }
}

impl Default for HeadlessCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas for HeadlessCanvas {
    async fn load_font(&mut self, family: &str, style: FontStyle) -> Result<()> {
        self.font_loads.push((family.to_string(), style));
        if self.has_face(family, style) {
            Ok(())
        } else {
            Err(CanvasError::FontUnavailable {
                family: family.to_string(),
                style,
            })
        }
    }

    async fn measure_text(
        &self,
        text: &str,
        _family: &str,
        _style: FontStyle,
        size: f32,
        width: Option<f32>,
    ) -> Result<Size> {
        let advance = size * CHAR_ADVANCE_EM;
        let line_height = size * LINE_HEIGHT_EM;
        let columns = width.map(|w| ((w / advance).floor() as usize).max(1));
        let mut lines = 0usize;
        let mut longest = 0usize;
        for line in text.split('\n') {
            let chars = line.chars().count();
            longest = longest.max(chars);
            lines += match columns {
                Some(cols) if chars > 0 => chars.div_ceil(cols),
                _ => 1,
            };
        }
        let measured_width = width.unwrap_or(longest as f32 * advance);
        Ok(Size::new(measured_width, lines as f32 * line_height))
    }

    fn viewport_center(&self) -> Point {
        self.viewport_center
    }

    async fn commit(&mut self, frame: FrameNode) -> Result<()> {
        debug!(name = %frame.name, children = frame.children.len(), "committing frame");
        self.committed.push(frame);
        Ok(())
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_wrapped_lines() {
        let canvas = HeadlessCanvas::new();
        // 14pt: advance 8.4, line height 19.6. Width 84 fits 10 columns.
        let size = pollster::block_on(canvas.measure_text(
            "abcdefghijklmno",
            "Inter",
            FontStyle::Regular,
            14.0,
            Some(84.0),
        ))
        .unwrap();
        assert_eq!(size.height, 2.0 * 14.0 * LINE_HEIGHT_EM);
    }

    #[test]
    fn unknown_family_fails_to_load() {
        let mut canvas = HeadlessCanvas::new();
        let result = pollster::block_on(canvas.load_font("Nope", FontStyle::Regular));
        assert!(matches!(
            result,
            Err(CanvasError::FontUnavailable { .. })
        ));
    }

    #[test]
    fn disabled_style_fails_but_family_loads() {
        let mut canvas = HeadlessCanvas::new()
            .with_font("Montserrat")
            .without_style("Montserrat", FontStyle::Italic);
        assert!(pollster::block_on(canvas.load_font("Montserrat", FontStyle::Regular)).is_ok());
        assert!(pollster::block_on(canvas.load_font("Montserrat", FontStyle::Italic)).is_err());
    }
}
