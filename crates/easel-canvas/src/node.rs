//! The visual-node tree handed to the host on commit.
//!
//! Nodes carry explicit positions and sizes; the layout engine computes
//! coordinates and the host only has to materialize the tree. Positions of
//! children are relative to their parent frame.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::geometry::{Point, Rect};

/// Font style variants the host can load per family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontStyle {
    Regular,
    Medium,
    Bold,
    Italic,
}

impl FontStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            FontStyle::Regular => "Regular",
            FontStyle::Medium => "Medium",
            FontStyle::Bold => "Bold",
            FontStyle::Italic => "Italic",
        }
    }
}

impl std::fmt::Display for FontStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
}

/// A font override for a span of characters within one text node.
/// Offsets are in characters, `start..end` half-open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontRange {
    pub start: usize,
    pub end: usize,
    pub family: String,
    pub style: FontStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub text: String,
    pub family: String,
    pub style: FontStyle,
    pub size: f32,
    pub fill: Color,
    pub align: TextAlign,
    pub ranges: Vec<FontRange>,
}

impl TextNode {
    pub fn new(text: impl Into<String>, family: impl Into<String>, style: FontStyle, size: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            text: text.into(),
            family: family.into(),
            style,
            size,
            fill: Color::BLACK,
            align: TextAlign::Left,
            ranges: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropShadow {
    pub color: Color,
    pub alpha: f32,
    pub offset: Point,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectNode {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fill: Color,
    pub corner_radius: f32,
    pub shadow: Option<DropShadow>,
}

/// A horizontal rule; `length` runs along x.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineNode {
    pub x: f32,
    pub y: f32,
    pub length: f32,
    pub stroke: Color,
    pub stroke_weight: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameNode {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fill: Option<Color>,
    pub corner_radius: f32,
    pub clips_content: bool,
    pub children: Vec<VisualNode>,
}

impl FrameNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            fill: None,
            corner_radius: 0.0,
            clips_content: false,
            children: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Bounds in the parent's coordinate space.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// All text nodes in the subtree, depth-first in child order.
    pub fn texts(&self) -> Vec<&TextNode> {
        let mut out = Vec::new();
        collect_texts(&self.children, &mut out);
        out
    }
}

fn collect_texts<'tree>(children: &'tree [VisualNode], out: &mut Vec<&'tree TextNode>) {
    for child in children {
        match child {
            VisualNode::Text(text) => out.push(text),
            VisualNode::Frame(frame) => collect_texts(&frame.children, out),
            VisualNode::Rect(_) | VisualNode::Line(_) => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VisualNode {
    Frame(FrameNode),
    Text(TextNode),
    Rect(RectNode),
    Line(LineNode),
}

impl VisualNode {
    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            VisualNode::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_frame(&self) -> Option<&FrameNode> {
        match self {
            VisualNode::Frame(frame) => Some(frame),
            _ => None,
        }
    }
}
