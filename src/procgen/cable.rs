//! Suspension cable curves.
//!
//! A cable hangs between two anchors as a parabola below the straight chord:
//! `y(t) = lerp(y_start, y_end, t) - sag * t * (1 - t)`. Sag is zero at the
//! anchors and deepest (`sag / 4`) at mid-span.

use crate::core::math::interpolation::lerp;
use nalgebra::Point3;

/// Sampled cable in a plane of constant z.
#[derive(Debug, Clone, PartialEq)]
pub struct SagCurve {
    pub x_start: f32,
    pub x_end: f32,
    pub y_start: f32,
    pub y_end: f32,
    pub sag: f32,
    pub z: f32,
    pub points: Vec<Point3<f32>>,
}

impl SagCurve {
    /// Evaluates the curve at parameter `t` in [0, 1] without sampling.
    pub fn point_at(&self, t: f32) -> Point3<f32> {
        Point3::new(
            lerp(self.x_start, self.x_end, t),
            self.height_at(t),
            self.z,
        )
    }

    pub fn height_at(&self, t: f32) -> f32 {
        lerp(self.y_start, self.y_end, t) - self.sag * t * (1.0 - t)
    }

    /// Height above the world x coordinate, clamped to the span.
    pub fn height_at_x(&self, x: f32) -> f32 {
        let span = self.x_end - self.x_start;
        if span.abs() < f32::EPSILON {
            return self.y_start;
        }
        self.height_at(((x - self.x_start) / span).clamp(0.0, 1.0))
    }
}

/// Samples a sag curve at `sample_count + 1` evenly spaced parameters in
/// the plane `z = 0`. A `sample_count` of zero is treated as one.
pub fn build_sag_curve(
    x_start: f32,
    x_end: f32,
    y_start: f32,
    y_end: f32,
    sag_magnitude: f32,
    sample_count: usize,
) -> Vec<Point3<f32>> {
    build_sag_curve_at(0.0, x_start, x_end, y_start, y_end, sag_magnitude, sample_count).points
}

/// Like [`build_sag_curve`], in the plane of constant `z`.
pub fn build_sag_curve_at(
    z: f32,
    x_start: f32,
    x_end: f32,
    y_start: f32,
    y_end: f32,
    sag_magnitude: f32,
    sample_count: usize,
) -> SagCurve {
    let n = sample_count.max(1);
    let mut curve = SagCurve {
        x_start,
        x_end,
        y_start,
        y_end,
        sag: sag_magnitude,
        z,
        points: Vec::with_capacity(n + 1),
    };
    for i in 0..=n {
        let t = i as f32 / n as f32;
        curve.points.push(curve.point_at(t));
    }
    // Pin the anchors so they are exact regardless of rounding in t.
    curve.points[0] = Point3::new(x_start, y_start, z);
    curve.points[n] = Point3::new(x_end, y_end, z);
    curve
}

/// Two parallel cables `lateral_offset` either side of `z_center`.
/// Returns `(near, far)`, near having the larger z.
#[allow(clippy::too_many_arguments)]
pub fn twin_cables(
    x_start: f32,
    x_end: f32,
    y_start: f32,
    y_end: f32,
    sag_magnitude: f32,
    sample_count: usize,
    z_center: f32,
    lateral_offset: f32,
) -> (SagCurve, SagCurve) {
    let near = build_sag_curve_at(
        z_center + lateral_offset,
        x_start,
        x_end,
        y_start,
        y_end,
        sag_magnitude,
        sample_count,
    );
    let far = build_sag_curve_at(
        z_center - lateral_offset,
        x_start,
        x_end,
        y_start,
        y_end,
        sag_magnitude,
        sample_count,
    );
    (near, far)
}

/// Vertical hanger between the deck and the main cable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hanger {
    pub x: f32,
    pub z: f32,
    pub bottom: f32,
    pub top: f32,
}

impl Hanger {
    pub fn length(&self) -> f32 {
        self.top - self.bottom
    }

    pub fn mid_height(&self) -> f32 {
        self.bottom + self.length() * 0.5
    }
}

/// Hangers at the middle of every `spacing`-wide slot of the span, dropping
/// from the cable to `deck_height`. Spots where the cable dips to or below
/// the deck are skipped.
pub fn hanger_anchors(curve: &SagCurve, deck_height: f32, spacing: f32) -> Vec<Hanger> {
    if spacing <= 0.0 || !spacing.is_finite() {
        return Vec::new();
    }
    let (lo, hi) = if curve.x_start <= curve.x_end {
        (curve.x_start, curve.x_end)
    } else {
        (curve.x_end, curve.x_start)
    };
    if !lo.is_finite() || !hi.is_finite() {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut x = lo + spacing * 0.5;
    while x < hi {
        let top = curve.height_at_x(x);
        if top > deck_height {
            out.push(Hanger {
                x,
                z: curve.z,
                bottom: deck_height,
                top,
            });
        }
        x += spacing;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        let pts = build_sag_curve(-25.0, 25.0, 20.0, 20.0, 8.0, 100);
        assert_eq!(pts.len(), 101);
        assert_eq!(pts[0], Point3::new(-25.0, 20.0, 0.0));
        assert_eq!(pts[100], Point3::new(25.0, 20.0, 0.0));
    }

    #[test]
    fn test_midspan_sag_is_quarter() {
        let pts = build_sag_curve(0.0, 10.0, 4.0, 8.0, 2.0, 10);
        let mid = pts[5];
        assert!((mid.x - 5.0).abs() < 1e-6);
        assert!((mid.y - (6.0 - 0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_single_sample_gives_two_points() {
        let pts = build_sag_curve(1.0, 2.0, 3.0, 4.0, 100.0, 1);
        assert_eq!(pts, vec![Point3::new(1.0, 3.0, 0.0), Point3::new(2.0, 4.0, 0.0)]);
        assert_eq!(build_sag_curve(1.0, 2.0, 3.0, 4.0, 1.0, 0).len(), 2);
    }

    #[test]
    fn test_twin_cables_offset() {
        let (near, far) = twin_cables(-25.0, 25.0, 20.0, 20.0, 8.0, 50, -10.0, 1.5);
        assert_eq!(near.z, -8.5);
        assert_eq!(far.z, -11.5);
        assert_eq!(near.points.len(), far.points.len());
        for (a, b) in near.points.iter().zip(&far.points) {
            assert_eq!(a.y, b.y);
        }
    }

    #[test]
    fn test_hangers_reach_the_cable() {
        let curve = build_sag_curve_at(-8.5, -25.0, 25.0, 25.0, 25.0, 20.0, 100);
        let hangers = hanger_anchors(&curve, 8.5, 2.0);
        // -24, -22, ..., 24
        assert_eq!(hangers.len(), 25);
        assert_eq!(hangers[0].x, -24.0);
        for h in &hangers {
            assert!((h.top - curve.height_at_x(h.x)).abs() < 1e-6);
            assert!(h.length() > 0.0);
            assert_eq!(h.z, -8.5);
        }
        // Shortest at mid-span.
        let mid = hangers.iter().min_by(|a, b| a.top.total_cmp(&b.top)).unwrap();
        assert!(mid.x.abs() < 1e-4);
        assert!((mid.top - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_unbounded_span_gives_no_hangers() {
        let mut curve = build_sag_curve_at(0.0, -25.0, 25.0, 25.0, 25.0, 20.0, 10);
        curve.x_end = f32::INFINITY;
        assert!(hanger_anchors(&curve, 8.5, 2.0).is_empty());
        curve.x_end = 25.0;
        curve.x_start = f32::NAN;
        assert!(hanger_anchors(&curve, 8.5, 2.0).is_empty());
    }
}
