//! Paged document access. Decoding lives behind [`DocumentSource`] so
//! the engine never links a PDF or EDF decoder; the paginator only
//! manages the cursor and the current bitmap.

use image::RgbImage;
use tracing::{info, warn};

use crate::error::{Result, ViewerError};

/// A decoded, paged document. `page_bitmap` takes `&mut self` so
/// implementations may cache decoded pages.
pub trait DocumentSource {
    fn page_count(&self) -> usize;
    fn page_bitmap(&mut self, index: usize) -> Result<RgbImage>;
}

/// Page cursor over a [`DocumentSource`].
///
/// A failed page decode leaves the cursor and the current bitmap exactly
/// where they were; the error is surfaced to the caller.
pub struct Paginator {
    source: Box<dyn DocumentSource>,
    current: usize,
    bitmap: RgbImage,
}

impl Paginator {
    /// Open a document at its first page.
    pub fn new(mut source: Box<dyn DocumentSource>) -> Result<Self> {
        let total = source.page_count();
        if total == 0 {
            return Err(ViewerError::SourceUnavailable(
                "document has no pages".to_string(),
            ));
        }
        let bitmap = source.page_bitmap(0)?;
        info!(pages = total, "document opened");
        Ok(Self {
            source,
            current: 0,
            bitmap,
        })
    }

    pub fn page_count(&self) -> usize {
        self.source.page_count()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_bitmap(&self) -> &RgbImage {
        &self.bitmap
    }

    /// Jump to a page. Out-of-range indices and decode failures leave the
    /// cursor unmoved.
    pub fn goto(&mut self, index: usize) -> Result<&RgbImage> {
        let total = self.source.page_count();
        if index >= total {
            return Err(ViewerError::PageOutOfRange { index, total });
        }
        match self.source.page_bitmap(index) {
            Ok(bitmap) => {
                self.current = index;
                self.bitmap = bitmap;
                Ok(&self.bitmap)
            }
            Err(err) => {
                warn!(
                    page = index,
                    staying_on = self.current,
                    error = %err,
                    "page decode failed"
                );
                Err(err)
            }
        }
    }

    /// Advance one page; saturates at the last page.
    pub fn next(&mut self) -> Result<&RgbImage> {
        let target = (self.current + 1).min(self.source.page_count().saturating_sub(1));
        self.goto(target)
    }

    /// Step back one page; saturates at the first page.
    pub fn prev(&mut self) -> Result<&RgbImage> {
        self.goto(self.current.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Three pages; page 1 fails to decode.
    struct FlakyDoc;

    impl DocumentSource for FlakyDoc {
        fn page_count(&self) -> usize {
            3
        }

        fn page_bitmap(&mut self, index: usize) -> Result<RgbImage> {
            if index == 1 {
                return Err(ViewerError::SourceUnavailable("corrupt page".into()));
            }
            Ok(RgbImage::from_pixel(8, 8, image::Rgb([index as u8, 0, 0])))
        }
    }

    #[test]
    fn failed_decode_keeps_cursor_and_bitmap() {
        let mut pager = Paginator::new(Box::new(FlakyDoc)).unwrap();
        assert_eq!(pager.current_index(), 0);
        assert!(pager.goto(1).is_err());
        assert_eq!(pager.current_index(), 0);
        assert_eq!(pager.current_bitmap().get_pixel(0, 0).0[0], 0);
        // Page 2 still reachable directly.
        pager.goto(2).unwrap();
        assert_eq!(pager.current_index(), 2);
    }

    #[test]
    fn navigation_saturates_at_ends() {
        let mut pager = Paginator::new(Box::new(FlakyDoc)).unwrap();
        pager.prev().unwrap();
        assert_eq!(pager.current_index(), 0);
        pager.goto(2).unwrap();
        pager.next().unwrap();
        assert_eq!(pager.current_index(), 2);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let mut pager = Paginator::new(Box::new(FlakyDoc)).unwrap();
        assert!(matches!(
            pager.goto(7),
            Err(ViewerError::PageOutOfRange { index: 7, total: 3 })
        ));
    }

    struct EmptyDoc;

    impl DocumentSource for EmptyDoc {
        fn page_count(&self) -> usize {
            0
        }

        fn page_bitmap(&mut self, _index: usize) -> Result<RgbImage> {
            Err(ViewerError::SourceUnavailable("empty".into()))
        }
    }

    #[test]
    fn empty_document_is_unavailable() {
        assert!(matches!(
            Paginator::new(Box::new(EmptyDoc)),
            Err(ViewerError::SourceUnavailable(_))
        ));
    }
}
