use easel_canvas::CanvasError;

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("html parse round-trip timed out after {0} ms")]
    ParseTimeout(u64),
    #[error("parse channel closed before a response arrived")]
    ParseChannelClosed,
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

pub type Result<T> = std::result::Result<T, TranscodeError>;
