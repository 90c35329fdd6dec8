//! Local-mean binarization for border and bubble masks
use image::GrayImage;

use crate::models::BoundingBox;

/// Foreground value written into binary masks
pub const FOREGROUND: u8 = 255;

/// Inverse adaptive threshold against the local mean.
///
/// A pixel becomes foreground (255) when it is at least `c` levels darker
/// than the rounded mean of its `block_size` x `block_size` neighbourhood.
/// Samples beyond the image edge replicate the nearest border pixel.
pub fn adaptive_threshold_inv(gray: &GrayImage, block_size: u32, c: i32) -> GrayImage {
    let (width, height) = gray.dimensions();
    let mut binary = GrayImage::new(width, height);
    if width == 0 || height == 0 {
        return binary;
    }

    let means = box_mean(gray, block_size.max(1) | 1);
    for (x, y, pixel) in binary.enumerate_pixels_mut() {
        let src = gray.get_pixel(x, y)[0] as i32;
        let mean = means[(y * width + x) as usize] as i32;
        if src - mean <= -c {
            pixel[0] = FOREGROUND;
        }
    }
    binary
}

/// Rounded box-filter mean with replicated borders, row-major
fn box_mean(gray: &GrayImage, block_size: u32) -> Vec<u8> {
    let (width, height) = gray.dimensions();
    let (w, h) = (width as usize, height as usize);
    let radius = (block_size / 2) as isize;
    let raw = gray.as_raw();

    // Horizontal running sums
    let mut row_sums = vec![0u32; w * h];
    for y in 0..h {
        let row = &raw[y * w..(y + 1) * w];
        let at = |i: isize| row[i.clamp(0, w as isize - 1) as usize] as u32;
        let mut sum: u32 = (-radius..=radius).map(at).sum();
        row_sums[y * w] = sum;
        for x in 1..w as isize {
            sum += at(x + radius);
            sum -= at(x - radius - 1);
            row_sums[y * w + x as usize] = sum;
        }
    }

    // Vertical running sums over the row sums
    let count = block_size * block_size;
    let mut means = vec![0u8; w * h];
    for x in 0..w {
        let at = |i: isize| row_sums[i.clamp(0, h as isize - 1) as usize * w + x];
        let mut sum: u32 = (-radius..=radius).map(at).sum();
        means[x] = ((sum + count / 2) / count) as u8;
        for y in 1..h as isize {
            sum += at(y + radius);
            sum -= at(y - radius - 1);
            means[y as usize * w + x] = ((sum + count / 2) / count) as u8;
        }
    }
    means
}

/// Number of non-zero mask pixels inside `region` (clipped to the mask)
pub fn count_nonzero(mask: &GrayImage, region: &BoundingBox) -> usize {
    let Some(region) = region.clamp_to(mask.width(), mask.height()) else {
        return 0;
    };
    let mut count = 0usize;
    for y in region.y..region.bottom() {
        for x in region.x..region.right() {
            if mask.get_pixel(x as u32, y as u32)[0] != 0 {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_uniform_image_has_no_foreground() {
        let gray = GrayImage::from_pixel(40, 30, Luma([200]));
        let binary = adaptive_threshold_inv(&gray, 21, 15);
        assert!(binary.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_dark_line_becomes_foreground() {
        let mut gray = GrayImage::from_pixel(60, 60, Luma([255]));
        for y in 0..60 {
            gray.put_pixel(30, y, Luma([0]));
        }
        let binary = adaptive_threshold_inv(&gray, 21, 15);
        assert_eq!(binary.get_pixel(30, 10)[0], FOREGROUND);
        assert_eq!(binary.get_pixel(10, 10)[0], 0);
        assert_eq!(binary.get_pixel(50, 59)[0], 0);
    }

    #[test]
    fn test_box_mean_replicates_border() {
        let mut gray = GrayImage::from_pixel(3, 1, Luma([0]));
        gray.put_pixel(0, 0, Luma([90]));
        // Window at x=0 samples [90, 90, 0] on each replicated row
        let means = box_mean(&gray, 3);
        assert_eq!(means[0], 60);
        assert_eq!(means[2], 0);
    }

    #[test]
    fn test_count_nonzero_clips_region() {
        let mut mask = GrayImage::new(10, 10);
        mask.put_pixel(0, 0, Luma([255]));
        mask.put_pixel(9, 9, Luma([255]));
        assert_eq!(count_nonzero(&mask, &BoundingBox::new(-5, -5, 20, 20)), 2);
        assert_eq!(count_nonzero(&mask, &BoundingBox::new(1, 1, 5, 5)), 0);
    }
}
