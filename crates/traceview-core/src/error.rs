use thiserror::Error;

use crate::overlay::OverlayId;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("overlay {0} not found")]
    OverlayNotFound(OverlayId),

    #[error("saved position '{0}' not found")]
    PositionNotFound(String),

    #[error("frame source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("page index {index} out of range (total: {total})")]
    PageOutOfRange { index: usize, total: usize },

    #[error("degenerate viewport: {width}x{height}")]
    DegenerateViewport { width: u32, height: u32 },

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image format error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
