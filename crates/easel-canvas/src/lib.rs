//! Host-canvas abstraction for Easel.
//!
//! The host design application owns the real scene graph; this crate models
//! the slice of it the plugin needs: a tree of positioned visual nodes
//! (frames, text, rectangles, lines), text styling with per-range font
//! assignment, and the async [`Canvas`] boundary for font loading, text
//! measurement, viewport queries and committing a finished frame.
//!
//! [`HeadlessCanvas`] is a deterministic in-memory implementation used by
//! tests and headless runs.

pub mod canvas;
pub mod color;
pub mod geometry;
pub mod headless;
pub mod node;

pub use canvas::{Canvas, CanvasError};
pub use color::Color;
pub use geometry::{Point, Rect, Size};
pub use headless::HeadlessCanvas;
pub use node::{
    DropShadow, FontRange, FontStyle, FrameNode, LineNode, RectNode, TextAlign, TextNode,
    VisualNode,
};
