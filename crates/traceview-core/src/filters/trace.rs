//! Trace enhancement: a thin-line emphasis pass applied after the
//! contrast mode, built as a grayscale 3x3 max-dilation.

use image::RgbImage;
use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::filters::color::{gray_array_to_rgb, to_gray_array};

/// Emphasize thin bright structures (signal traces) by dilating the
/// grayscale image with a 3x3 max filter. Output dimensions always equal
/// input dimensions; the result is channel-replicated grayscale.
pub fn enhance_traces(image: &RgbImage) -> RgbImage {
    let gray = to_gray_array(image);
    gray_array_to_rgb(&dilate3x3(&gray))
}

fn dilate3x3(data: &Array2<f32>) -> Array2<f32> {
    let (h, w) = data.dim();
    if h == 0 || w == 0 {
        return data.clone();
    }

    let dilate_row = |row: usize| -> Vec<f32> {
        (0..w)
            .map(|col| {
                let mut max = f32::NEG_INFINITY;
                for dr in -1i64..=1 {
                    for dc in -1i64..=1 {
                        let r = (row as i64 + dr).clamp(0, h as i64 - 1) as usize;
                        let c = (col as i64 + dc).clamp(0, w as i64 - 1) as usize;
                        max = max.max(data[[r, c]]);
                    }
                }
                max
            })
            .collect()
    };

    let rows: Vec<Vec<f32>> = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        (0..h).into_par_iter().map(dilate_row).collect()
    } else {
        (0..h).map(dilate_row).collect()
    };

    let mut result = Array2::<f32>::zeros((h, w));
    for (row, row_data) in rows.into_iter().enumerate() {
        for (col, val) in row_data.into_iter().enumerate() {
            result[[row, col]] = val;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dilation_spreads_single_bright_pixel() {
        let mut data = Array2::<f32>::zeros((5, 5));
        data[[2, 2]] = 1.0;
        let out = dilate3x3(&data);
        for r in 1..=3 {
            for c in 1..=3 {
                assert_eq!(out[[r, c]], 1.0);
            }
        }
        assert_eq!(out[[0, 0]], 0.0);
    }

    #[test]
    fn enhancement_preserves_dimensions() {
        let img = RgbImage::from_pixel(33, 17, image::Rgb([200, 10, 10]));
        let out = enhance_traces(&img);
        assert_eq!((out.width(), out.height()), (33, 17));
    }
}
