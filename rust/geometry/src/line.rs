// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polyline measures and the self-intersection test used while digitizing.

use nalgebra::Point2;

/// Epsilon for floating point comparisons in 2D operations
pub const EPSILON_2D: f64 = 1e-9;

/// Total length of a path.
pub fn path_length(path: &[Point2<f64>]) -> f64 {
    path.windows(2)
        .map(|w| (w[1] - w[0]).norm())
        .sum()
}

/// Total length across all parts of a multi-part line.
pub fn parts_length(parts: &[Vec<Point2<f64>>]) -> f64 {
    parts.iter().map(|p| path_length(p)).sum()
}

/// Signed area of the triangle (a, b, c), twice over.
/// Positive when c lies left of a->b.
#[inline]
fn orient(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Whether `p` lies on the segment (a, b), assuming collinearity.
#[inline]
fn on_segment(a: Point2<f64>, b: Point2<f64>, p: Point2<f64>) -> bool {
    p.x >= a.x.min(b.x) - EPSILON_2D
        && p.x <= a.x.max(b.x) + EPSILON_2D
        && p.y >= a.y.min(b.y) - EPSILON_2D
        && p.y <= a.y.max(b.y) + EPSILON_2D
}

/// Whether the open segments (p1, p2) and (p3, p4) properly cross.
///
/// Shared endpoints do not count; collinear overlap does.
pub fn segments_cross(
    p1: Point2<f64>,
    p2: Point2<f64>,
    p3: Point2<f64>,
    p4: Point2<f64>,
) -> bool {
    let d1 = orient(p3, p4, p1);
    let d2 = orient(p3, p4, p2);
    let d3 = orient(p1, p2, p3);
    let d4 = orient(p1, p2, p4);

    // Proper crossing: each segment's endpoints straddle the other segment
    if ((d1 > EPSILON_2D && d2 < -EPSILON_2D) || (d1 < -EPSILON_2D && d2 > EPSILON_2D))
        && ((d3 > EPSILON_2D && d4 < -EPSILON_2D) || (d3 < -EPSILON_2D && d4 > EPSILON_2D))
    {
        return true;
    }

    // Collinear overlap: an interior point of one lies on the other
    let touches = |a: Point2<f64>, b: Point2<f64>, p: Point2<f64>, d: f64| {
        d.abs() <= EPSILON_2D && on_segment(a, b, p) && !is_endpoint(a, p) && !is_endpoint(b, p)
    };
    touches(p3, p4, p1, d1)
        || touches(p3, p4, p2, d2)
        || touches(p1, p2, p3, d3)
        || touches(p1, p2, p4, d4)
}

#[inline]
fn is_endpoint(e: Point2<f64>, p: Point2<f64>) -> bool {
    (e - p).norm_squared() <= EPSILON_2D * EPSILON_2D
}

/// Self-intersection test for a (possibly multi-part) polyline.
///
/// Peels the last segment off the collected segment list and tests it
/// against every remaining segment, skipping the immediately adjacent
/// segment of the same part (consecutive segments always share a vertex).
/// A single part with fewer than 3 points cannot self-intersect.
pub fn is_self_intersecting(parts: &[Vec<Point2<f64>>]) -> bool {
    if parts.len() == 1 && parts[0].len() < 3 {
        return false;
    }

    // (part index, segment index, start, end)
    let mut segments: Vec<(usize, usize, Point2<f64>, Point2<f64>)> = Vec::new();
    for (pi, part) in parts.iter().enumerate() {
        for (si, w) in part.windows(2).enumerate() {
            segments.push((pi, si, w[0], w[1]));
        }
    }

    while let Some((pi, si, a1, a2)) = segments.pop() {
        for &(pj, sj, b1, b2) in &segments {
            // Consecutive segments of one part always share a vertex
            if pi == pj && (si == sj + 1 || sj == si + 1) {
                continue;
            }
            if segments_cross(a1, a2, b1, b2) {
                return true;
            }
        }
    }
    false
}

/// Closest point of a path to `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestPoint {
    /// The point on the path.
    pub point: Point2<f64>,
    /// Index of the segment containing it.
    pub segment: usize,
    /// Parameter along that segment in [0, 1].
    pub t: f64,
    /// Distance from `target`.
    pub distance: f64,
}

/// Find the nearest point on `path` to `target`.
///
/// Returns `None` for paths with fewer than two points.
pub fn nearest_point_on_path(path: &[Point2<f64>], target: Point2<f64>) -> Option<NearestPoint> {
    if path.len() < 2 {
        return None;
    }

    let mut best: Option<NearestPoint> = None;
    for (i, w) in path.windows(2).enumerate() {
        let (a, b) = (w[0], w[1]);
        let ab = b - a;
        let len_sq = ab.norm_squared();
        let t = if len_sq <= EPSILON_2D * EPSILON_2D {
            0.0
        } else {
            ((target - a).dot(&ab) / len_sq).clamp(0.0, 1.0)
        };
        let point = a + ab * t;
        let distance = (target - point).norm();
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(NearestPoint {
                point,
                segment: i,
                t,
                distance,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pts(coords: &[[f64; 2]]) -> Vec<Point2<f64>> {
        coords.iter().map(|c| Point2::new(c[0], c[1])).collect()
    }

    #[test]
    fn length_of_l_shape() {
        let path = pts(&[[0.0, 0.0], [10.0, 0.0], [10.0, 5.0]]);
        assert_relative_eq!(path_length(&path), 15.0);
    }

    #[test]
    fn two_point_part_never_self_intersects() {
        let parts = vec![pts(&[[0.0, 0.0], [10.0, 10.0]])];
        assert!(!is_self_intersecting(&parts));
    }

    #[test]
    fn straight_path_is_clean() {
        let parts = vec![pts(&[[0.0, 0.0], [5.0, 0.0], [10.0, 0.0], [10.0, 10.0]])];
        assert!(!is_self_intersecting(&parts));
    }

    #[test]
    fn bowtie_is_self_intersecting() {
        let parts = vec![pts(&[[0.0, 0.0], [10.0, 10.0], [10.0, 0.0], [0.0, 10.0]])];
        assert!(is_self_intersecting(&parts));
    }

    #[test]
    fn closed_loop_is_not_a_crossing() {
        // A circular road closes on its own start point; that is a touch,
        // not a crossing
        let parts = vec![pts(&[
            [0.0, 0.0],
            [10.0, 0.0],
            [10.0, 10.0],
            [0.0, 10.0],
            [0.0, 0.0],
        ])];
        assert!(!is_self_intersecting(&parts));
    }

    #[test]
    fn collinear_overlap_between_parts_is_detected() {
        let parts = vec![
            pts(&[[0.0, 0.0], [10.0, 0.0]]),
            pts(&[[2.0, 0.0], [8.0, 0.0]]),
        ];
        assert!(is_self_intersecting(&parts));
    }

    #[test]
    fn crossing_between_parts_is_detected() {
        let parts = vec![
            pts(&[[0.0, 0.0], [10.0, 10.0]]),
            pts(&[[0.0, 10.0], [10.0, 0.0]]),
        ];
        assert!(is_self_intersecting(&parts));
    }

    #[test]
    fn touching_part_endpoints_are_allowed() {
        let parts = vec![
            pts(&[[0.0, 0.0], [10.0, 0.0]]),
            pts(&[[10.0, 0.0], [20.0, 0.0]]),
        ];
        assert!(!is_self_intersecting(&parts));
    }

    #[test]
    fn nearest_point_mid_segment() {
        let path = pts(&[[0.0, 0.0], [10.0, 0.0]]);
        let nearest = nearest_point_on_path(&path, Point2::new(4.0, 3.0)).unwrap();
        assert_relative_eq!(nearest.point.x, 4.0);
        assert_relative_eq!(nearest.point.y, 0.0);
        assert_relative_eq!(nearest.distance, 3.0);
        assert_eq!(nearest.segment, 0);
    }

    #[test]
    fn nearest_point_clamps_to_vertex() {
        let path = pts(&[[0.0, 0.0], [10.0, 0.0]]);
        let nearest = nearest_point_on_path(&path, Point2::new(-5.0, 1.0)).unwrap();
        assert_relative_eq!(nearest.point.x, 0.0);
        assert_relative_eq!(nearest.t, 0.0);
    }

    #[test]
    fn nearest_point_requires_two_points() {
        assert!(nearest_point_on_path(&pts(&[[1.0, 1.0]]), Point2::new(0.0, 0.0)).is_none());
    }
}
