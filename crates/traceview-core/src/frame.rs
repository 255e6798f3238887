use image::RgbImage;

/// A single source bitmap handed to the render pipeline.
///
/// Produced by a document source (one per page) or a frame source (one per
/// capture tick), consumed immutably for one render cycle. `seq` increases
/// monotonically per producer so stale frames can be recognized.
#[derive(Clone, Debug)]
pub struct SourceFrame {
    pub image: RgbImage,
    pub seq: u64,
}

impl SourceFrame {
    pub fn new(image: RgbImage, seq: u64) -> Self {
        Self { image, seq }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
