//! Helpers shared by the CLI, benches and integration tests
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use image::RgbImage;

use crate::utils::grayscale::rgb_to_gray;

/// Synthetic sheet rendering
pub mod synthetic;

pub use synthetic::{SheetBuilder, SheetLayout};

/// Load an image file as RGB
pub fn load_rgb<P: AsRef<Path>>(path: P) -> Result<RgbImage, image::ImageError> {
    Ok(image::open(path)?.to_rgb8())
}

/// Summary statistics for grayscale data.
#[derive(Debug, Clone, Copy)]
pub struct GrayStats {
    /// Minimum grayscale value.
    pub min: u8,
    /// Maximum grayscale value.
    pub max: u8,
    /// Average grayscale value.
    pub avg: u8,
}

/// Compute min/max/avg of the luminance of an RGB image.
pub fn grayscale_stats(image: &RgbImage) -> GrayStats {
    let gray = rgb_to_gray(image);
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    let mut sum: u64 = 0;
    for &v in gray.as_raw() {
        min = min.min(v);
        max = max.max(v);
        sum += v as u64;
    }
    let len = gray.as_raw().len();
    let avg = if len == 0 { 0 } else { (sum / len as u64) as u8 };
    GrayStats { min, max, avg }
}

static SCRATCH_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique path in the system temp directory
///
/// Nothing is created; the caller writes (and removes) the file.
pub fn scratch_path(stem: &str, extension: &str) -> PathBuf {
    let n = SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("omr_{}_{}_{}.{}", stem, std::process::id(), n, extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_scratch_paths_are_unique() {
        let a = scratch_path("sheet", "png");
        let b = scratch_path("sheet", "png");
        assert_ne!(a, b);
        assert_eq!(a.extension().and_then(|e| e.to_str()), Some("png"));
    }

    #[test]
    fn test_grayscale_stats() {
        let mut image = RgbImage::from_pixel(2, 1, Rgb([255, 255, 255]));
        image.put_pixel(0, 0, Rgb([0, 0, 0]));
        let stats = grayscale_stats(&image);
        assert_eq!((stats.min, stats.max, stats.avg), (0, 255, 127));
    }
}
