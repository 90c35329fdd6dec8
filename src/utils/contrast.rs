//! Contrast-limited adaptive histogram equalization (CLAHE)
//!
//! The image is split into a grid of tiles; each tile gets its own clipped
//! histogram-equalization lookup table and pixels are blended bilinearly
//! between the four nearest tile tables.

use image::GrayImage;

const BINS: usize = 256;

/// CLAHE parameters
#[derive(Debug, Clone, Copy)]
pub struct Clahe {
    /// Histogram clip limit, relative to a uniform distribution
    pub clip_limit: f64,
    /// Tiles across
    pub tiles_x: u32,
    /// Tiles down
    pub tiles_y: u32,
}

impl Default for Clahe {
    fn default() -> Self {
        Self {
            clip_limit: 2.0,
            tiles_x: 8,
            tiles_y: 8,
        }
    }
}

impl Clahe {
    /// Equalize `gray`, returning a new image of the same size
    pub fn apply(&self, gray: &GrayImage) -> GrayImage {
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            return gray.clone();
        }

        let tile_w = width.div_ceil(self.tiles_x.max(1)).max(1);
        let tile_h = height.div_ceil(self.tiles_y.max(1)).max(1);
        let nx = width.div_ceil(tile_w) as usize;
        let ny = height.div_ceil(tile_h) as usize;

        let mut luts = Vec::with_capacity(nx * ny);
        for ty in 0..ny as u32 {
            for tx in 0..nx as u32 {
                let x0 = tx * tile_w;
                let y0 = ty * tile_h;
                let x1 = (x0 + tile_w).min(width);
                let y1 = (y0 + tile_h).min(height);
                luts.push(self.tile_lut(gray, x0, y0, x1, y1));
            }
        }

        let mut out = GrayImage::new(width, height);
        let inv_tw = 1.0 / tile_w as f32;
        let inv_th = 1.0 / tile_h as f32;
        for y in 0..height {
            let tyf = y as f32 * inv_th - 0.5;
            let ty1 = tyf.floor();
            let ya = tyf - ty1;
            let ty2 = ((ty1 as isize + 1).min(ny as isize - 1)).max(0) as usize;
            let ty1 = (ty1 as isize).max(0) as usize;

            for x in 0..width {
                let txf = x as f32 * inv_tw - 0.5;
                let tx1 = txf.floor();
                let xa = txf - tx1;
                let tx2 = ((tx1 as isize + 1).min(nx as isize - 1)).max(0) as usize;
                let tx1 = (tx1 as isize).max(0) as usize;

                let v = gray.get_pixel(x, y)[0] as usize;
                let top = luts[ty1 * nx + tx1][v] as f32 * (1.0 - xa)
                    + luts[ty1 * nx + tx2][v] as f32 * xa;
                let bottom = luts[ty2 * nx + tx1][v] as f32 * (1.0 - xa)
                    + luts[ty2 * nx + tx2][v] as f32 * xa;
                let value = top * (1.0 - ya) + bottom * ya;
                out.put_pixel(x, y, image::Luma([value.round().clamp(0.0, 255.0) as u8]));
            }
        }
        out
    }

    fn tile_lut(&self, gray: &GrayImage, x0: u32, y0: u32, x1: u32, y1: u32) -> [u8; BINS] {
        let mut hist = [0u32; BINS];
        for y in y0..y1 {
            for x in x0..x1 {
                hist[gray.get_pixel(x, y)[0] as usize] += 1;
            }
        }
        let area = (x1 - x0) * (y1 - y0);

        let limit = ((self.clip_limit * area as f64 / BINS as f64) as u32).max(1);
        clip_histogram(&mut hist, limit);

        let scale = 255.0 / area as f32;
        let mut lut = [0u8; BINS];
        let mut sum = 0u32;
        for (i, count) in hist.iter().enumerate() {
            sum += count;
            lut[i] = (sum as f32 * scale).round().min(255.0) as u8;
        }
        lut
    }
}

/// Clip every bin at `limit` and spread the excess evenly over all bins
fn clip_histogram(hist: &mut [u32; BINS], limit: u32) {
    let mut excess = 0u32;
    for bin in hist.iter_mut() {
        if *bin > limit {
            excess += *bin - limit;
            *bin = limit;
        }
    }
    if excess == 0 {
        return;
    }

    let batch = excess / BINS as u32;
    let residual = (excess - batch * BINS as u32) as usize;
    for bin in hist.iter_mut() {
        *bin += batch;
    }
    if residual > 0 {
        let step = (BINS / residual).max(1);
        for i in (0..BINS).step_by(step).take(residual) {
            hist[i] += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_white_page_stays_white() {
        let gray = GrayImage::from_pixel(64, 64, Luma([255]));
        let out = Clahe::default().apply(&gray);
        assert!(out.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn test_dark_ink_stays_darker_than_paper() {
        let mut gray = GrayImage::from_pixel(64, 64, Luma([230]));
        for x in 0..64 {
            gray.put_pixel(x, 32, Luma([40]));
        }
        let out = Clahe::default().apply(&gray);
        assert!(out.get_pixel(10, 32)[0] < out.get_pixel(10, 10)[0]);
    }

    #[test]
    fn test_clip_preserves_total_count() {
        let mut hist = [0u32; BINS];
        hist[255] = 1000;
        hist[0] = 24;
        clip_histogram(&mut hist, 8);
        assert_eq!(hist.iter().sum::<u32>(), 1024);
        assert!(hist[255] <= 8 + 4);
    }
}
