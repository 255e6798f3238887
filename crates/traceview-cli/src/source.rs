use std::path::Path;

use image::RgbImage;
use traceview_core::document::DocumentSource;
use traceview_core::error::{Result, ViewerError};

/// A plain image file presented as a one-page document.
pub struct SingleImageDocument {
    image: RgbImage,
}

impl SingleImageDocument {
    pub fn open(path: &Path) -> Result<Self> {
        let image = image::open(path)?.to_rgb8();
        Ok(Self { image })
    }
}

impl DocumentSource for SingleImageDocument {
    fn page_count(&self) -> usize {
        1
    }

    fn page_bitmap(&mut self, index: usize) -> Result<RgbImage> {
        if index != 0 {
            return Err(ViewerError::PageOutOfRange { index, total: 1 });
        }
        Ok(self.image.clone())
    }
}
