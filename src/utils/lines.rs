//! Straight segment extraction from an edge map
//!
//! Candidate lines come from the polar Hough transform. Each line is then
//! walked across the edge map to recover the finite segments lying on it,
//! bridging short gaps and dropping segments that are too short.
use image::GrayImage;
use imageproc::hough::{LineDetectionOptions, PolarLine, detect_lines};

/// Finite line segment with `x1 <= x2`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Start x
    pub x1: i32,
    /// Start y
    pub y1: i32,
    /// End x
    pub x2: i32,
    /// End y
    pub y2: i32,
}

impl Segment {
    /// Build a segment, ordering the endpoints left to right
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        if (x2, y2) < (x1, y1) {
            Self { x1: x2, y1: y2, x2: x1, y2: y1 }
        } else {
            Self { x1, y1, x2, y2 }
        }
    }

    /// Horizontal extent
    pub fn dx(&self) -> i32 {
        self.x2 - self.x1
    }

    /// Vertical extent (signed)
    pub fn dy(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Euclidean length
    pub fn length(&self) -> f64 {
        (self.dx() as f64).hypot(self.dy() as f64)
    }
}

/// Segment extraction parameters
#[derive(Debug, Clone, Copy)]
pub struct SegmentOptions {
    /// Minimum Hough accumulator votes for a candidate line
    pub vote_threshold: u32,
    /// Hough non-maximum suppression radius
    pub suppression_radius: u32,
    /// Segments shorter than this are dropped
    pub min_length: f64,
    /// Longest run of missing edge pixels bridged inside one segment
    pub max_gap: u32,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            vote_threshold: 50,
            suppression_radius: 8,
            min_length: 50.0,
            max_gap: 10,
        }
    }
}

/// Find straight segments in a binary edge map
///
/// Edge pixels are consumed by the first segment that takes them, so a
/// later line cannot reuse them. Each segment is fitted to the pixels it
/// hit rather than to the Hough line that found it.
pub fn extract_segments(edges: &GrayImage, options: &SegmentOptions) -> Vec<Segment> {
    let lines = detect_lines(
        edges,
        LineDetectionOptions {
            vote_threshold: options.vote_threshold,
            suppression_radius: options.suppression_radius,
        },
    );

    let mut claimed = vec![false; edges.width() as usize * edges.height() as usize];
    let mut segments = Vec::new();
    for line in &lines {
        walk_line(edges, &mut claimed, line, options, &mut segments);
    }
    segments
}

fn walk_line(
    edges: &GrayImage,
    claimed: &mut [bool],
    line: &PolarLine,
    options: &SegmentOptions,
    out: &mut Vec<Segment>,
) {
    let (w, h) = (edges.width() as i32, edges.height() as i32);
    let theta = (line.angle_in_degrees as f32).to_radians();
    let (nx, ny) = (theta.cos(), theta.sin());
    let (ox, oy) = (line.r * nx, line.r * ny);
    // Direction along the line
    let (dx, dy) = (-ny, nx);
    let reach = ((w * w + h * h) as f32).sqrt().ceil() as i32;

    let mut run: Vec<(i32, i32)> = Vec::new();
    let mut gap = 0u32;

    for t in -reach..=reach {
        let fx = ox + dx * t as f32;
        let fy = oy + dy * t as f32;
        let hit = [0.0f32, -1.0, 1.0]
            .iter()
            .map(|k| ((fx + k * nx).round() as i32, (fy + k * ny).round() as i32))
            .find(|&(x, y)| {
                x >= 0
                    && y >= 0
                    && x < w
                    && y < h
                    && edges.get_pixel(x as u32, y as u32)[0] > 0
                    && !claimed[(y * w + x) as usize]
            });

        match hit {
            Some(p) => {
                if run.last() != Some(&p) {
                    run.push(p);
                }
                gap = 0;
            }
            None if !run.is_empty() => {
                gap += 1;
                if gap > options.max_gap {
                    accept(&mut run, claimed, w, options, out);
                    gap = 0;
                }
            }
            None => {}
        }
    }
    accept(&mut run, claimed, w, options, out);
}

/// Fit a segment to the run's pixels; keep it and claim them when it is long enough
fn accept(
    run: &mut Vec<(i32, i32)>,
    claimed: &mut [bool],
    width: i32,
    options: &SegmentOptions,
    out: &mut Vec<Segment>,
) {
    let pixels = std::mem::take(run);
    let Some(seg) = fit_segment(&pixels) else {
        return;
    };
    if seg.length() < options.min_length {
        return;
    }
    for (x, y) in pixels {
        claimed[(y * width + x) as usize] = true;
    }
    out.push(seg);
}

/// Principal-axis fit through the pixels, clipped to their extent
fn fit_segment(pixels: &[(i32, i32)]) -> Option<Segment> {
    if pixels.len() < 2 {
        return None;
    }
    let n = pixels.len() as f64;
    let mx = pixels.iter().map(|p| p.0 as f64).sum::<f64>() / n;
    let my = pixels.iter().map(|p| p.1 as f64).sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for &(x, y) in pixels {
        let (ex, ey) = (x as f64 - mx, y as f64 - my);
        sxx += ex * ex;
        syy += ey * ey;
        sxy += ex * ey;
    }
    let angle = 0.5 * (2.0 * sxy).atan2(sxx - syy);
    let (ux, uy) = (angle.cos(), angle.sin());

    let (mut lo, mut hi) = (f64::MAX, f64::MIN);
    for &(x, y) in pixels {
        let t = (x as f64 - mx) * ux + (y as f64 - my) * uy;
        lo = lo.min(t);
        hi = hi.max(t);
    }
    let end = |t: f64| ((mx + t * ux).round() as i32, (my + t * uy).round() as i32);
    let (a, b) = (end(lo), end(hi));
    Some(Segment::new(a.0, a.1, b.0, b.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_segment_orders_endpoints() {
        let s = Segment::new(30, 5, 10, 9);
        assert_eq!((s.x1, s.y1, s.x2, s.y2), (10, 9, 30, 5));
        assert_eq!(s.dy(), -4);
        assert!((Segment::new(0, 0, 3, 4).length() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_extracts_horizontal_segment() {
        let mut edges = GrayImage::new(200, 100);
        for x in 20..180 {
            edges.put_pixel(x, 50, Luma([255]));
        }
        let segments = extract_segments(&edges, &SegmentOptions::default());
        assert!(!segments.is_empty());
        let s = segments.iter().max_by_key(|s| s.dx()).unwrap();
        assert!(s.dx() >= 150);
        assert!(s.dy().abs() <= 1);
    }

    #[test]
    fn test_gap_splits_segment() {
        let mut edges = GrayImage::new(300, 60);
        for x in (10..110).chain(140..240) {
            edges.put_pixel(x, 30, Luma([255]));
        }
        let segments = extract_segments(&edges, &SegmentOptions::default());
        let on_row: Vec<_> = segments.iter().filter(|s| s.dy() == 0).collect();
        assert!(on_row.len() >= 2);
        assert!(on_row.iter().all(|s| s.dx() < 120));
    }

    #[test]
    fn test_fit_follows_hit_pixels() {
        let mut pixels: Vec<(i32, i32)> = (39..=199).map(|y| (54, y)).collect();
        pixels.push((53, 120));
        let s = fit_segment(&pixels).unwrap();
        assert_eq!((s.x1, s.x2), (54, 54));
        assert_eq!((s.y1, s.y2), (39, 199));
        assert!(fit_segment(&pixels[..1]).is_none());
    }

    #[test]
    fn test_edge_pixels_feed_one_segment() {
        let mut edges = GrayImage::new(200, 100);
        for x in 20..180 {
            edges.put_pixel(x, 50, Luma([255]));
        }
        let segments = extract_segments(&edges, &SegmentOptions::default());
        assert!(segments.iter().all(|s| s.dy() == 0), "{segments:?}");
        let covered: i32 = segments.iter().map(|s| s.dx() + 1).sum();
        assert!(covered <= 160, "{segments:?}");
    }

    #[test]
    fn test_blank_map_has_no_segments() {
        let edges = GrayImage::new(64, 64);
        assert!(extract_segments(&edges, &SegmentOptions::default()).is_empty());
    }
}
