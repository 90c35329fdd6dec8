//! Polygon and circle geometry over traced contours
use imageproc::geometry::approximate_polygon_dp;
use imageproc::point::Point as PixelPoint;

use crate::models::Point;

/// Absolute polygon area using the shoelace formula
pub fn polygon_area(points: &[PixelPoint<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0i64;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        twice += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
    }
    (twice as f64 / 2.0).abs()
}

/// Douglas-Peucker simplification of a closed curve
///
/// The curve is split at its first point and the point farthest from it.
/// Each chain is simplified as an open polyline so both split points are
/// always kept, then the chains are joined without repeating them.
pub fn approximate_closed_polygon(points: &[PixelPoint<i32>], epsilon: f64) -> Vec<PixelPoint<i32>> {
    if points.len() < 3 || epsilon <= 0.0 {
        return points.to_vec();
    }

    let start = points[0];
    let far = points
        .iter()
        .enumerate()
        .max_by_key(|(_, p)| {
            let dx = (p.x - start.x) as i64;
            let dy = (p.y - start.y) as i64;
            dx * dx + dy * dy
        })
        .map(|(i, _)| i)
        .unwrap_or(0);
    if far == 0 {
        return vec![start];
    }

    let first = approximate_polygon_dp(&points[..=far], epsilon, false);
    let mut tail = points[far..].to_vec();
    tail.push(start);
    let second = approximate_polygon_dp(&tail, epsilon, false);

    let mut out = Vec::with_capacity(first.len() + second.len());
    out.extend_from_slice(&first[..first.len().saturating_sub(1)]);
    out.extend_from_slice(&second[..second.len().saturating_sub(1)]);
    out
}

/// Smallest circle containing every point, as `(center, radius)`
///
/// Incremental Welzl construction; returns `None` for an empty input.
pub fn min_enclosing_circle(points: &[Point]) -> Option<(Point, f32)> {
    let first = *points.first()?;
    let mut circle = Circle::at(first);

    for i in 1..points.len() {
        if circle.contains(points[i]) {
            continue;
        }
        circle = Circle::at(points[i]);
        for j in 0..i {
            if circle.contains(points[j]) {
                continue;
            }
            circle = Circle::diameter(points[i], points[j]);
            for k in 0..j {
                if !circle.contains(points[k]) {
                    circle = Circle::through(points[i], points[j], points[k]);
                }
            }
        }
    }

    Some((
        Point::new(circle.cx as f32, circle.cy as f32),
        circle.r as f32,
    ))
}

#[derive(Debug, Clone, Copy)]
struct Circle {
    cx: f64,
    cy: f64,
    r: f64,
}

impl Circle {
    const SLACK: f64 = 1e-7;

    fn at(p: Point) -> Self {
        Self {
            cx: p.x as f64,
            cy: p.y as f64,
            r: 0.0,
        }
    }

    fn diameter(a: Point, b: Point) -> Self {
        let cx = (a.x as f64 + b.x as f64) / 2.0;
        let cy = (a.y as f64 + b.y as f64) / 2.0;
        let r = (a.x as f64 - cx).hypot(a.y as f64 - cy);
        Self { cx, cy, r }
    }

    fn through(a: Point, b: Point, c: Point) -> Self {
        let (ax, ay) = (a.x as f64, a.y as f64);
        let (bx, by) = (b.x as f64, b.y as f64);
        let (cx, cy) = (c.x as f64, c.y as f64);
        let d = 2.0 * (ax * (by - cy) + bx * (cy - ay) + cx * (ay - by));
        if d.abs() < 1e-12 {
            // Collinear: the widest pair spans the others
            let candidates = [Self::diameter(a, b), Self::diameter(a, c), Self::diameter(b, c)];
            return candidates
                .into_iter()
                .fold(candidates[0], |best, c| if c.r > best.r { c } else { best });
        }
        let a2 = ax * ax + ay * ay;
        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (a2 * (by - cy) + b2 * (cy - ay) + c2 * (ay - by)) / d;
        let uy = (a2 * (cx - bx) + b2 * (ax - cx) + c2 * (bx - ax)) / d;
        let r = (ax - ux).hypot(ay - uy);
        Self { cx: ux, cy: uy, r }
    }

    fn contains(&self, p: Point) -> bool {
        let d = (p.x as f64 - self.cx).hypot(p.y as f64 - self.cy);
        d <= self.r * (1.0 + Self::SLACK) + Self::SLACK
    }
}
