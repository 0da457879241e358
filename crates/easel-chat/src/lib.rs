//! Chat-panel rendering: streamed assistant markdown to display HTML.

pub mod markdown;

pub use markdown::{render_markdown, ChatStream};
