//! The async boundary to the host document.

use thiserror::Error;

use crate::geometry::{Point, Size};
use crate::node::{FontStyle, FrameNode};

/// Result type for canvas operations.
pub type Result<T> = std::result::Result<T, CanvasError>;

/// Errors reported by the host canvas.
#[derive(Error, Debug)]
pub enum CanvasError {
    /// The host has no face for this family/style pair.
    #[error("font unavailable: {family} {style}")]
    FontUnavailable { family: String, style: FontStyle },

    /// Node creation or mutation was rejected by the host.
    #[error("node creation failed: {0}")]
    NodeCreation(String),

    /// The host document went away mid-run.
    #[error("host document unavailable: {0}")]
    DocumentUnavailable(String),
}

/// What the plugin needs from the host document.
///
/// Every method that touches host state is an independent suspension point;
/// callers await them one at a time, in document order. The host never calls
/// back into the plugin through this trait.
pub trait Canvas {
    /// Load a font face. Failure means this family/style pair cannot be
    /// assigned to text nodes; it is never fatal by itself.
    async fn load_font(&mut self, family: &str, style: FontStyle) -> Result<()>;

    /// Measure text as the host would lay it out. `width` constrains the
    /// text to wrap; `None` measures the natural single-line bounds.
    /// The layout engine never computes metrics itself.
    async fn measure_text(
        &self,
        text: &str,
        family: &str,
        style: FontStyle,
        size: f32,
        width: Option<f32>,
    ) -> Result<Size>;

    /// Center of the user's current viewport, in document coordinates.
    fn viewport_center(&self) -> Point;

    /// Append the finished frame to the document, select it and scroll the
    /// viewport to fit it.
    async fn commit(&mut self, frame: FrameNode) -> Result<()>;

    /// Short human-readable toast shown by the host.
    fn notify(&mut self, message: &str);
}
