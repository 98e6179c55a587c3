// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dividing a polyline at a clicked point.
//!
//! The digitizer clicks near an ESU; the cut lands on the nearest point of
//! the line. A divide must produce exactly two pieces or nothing at all: a
//! click at (or beyond) either end of the line would yield one piece, so it
//! is rejected and the original geometry stays untouched.

use crate::error::{Error, Result};
use crate::line::{nearest_point_on_path, NearestPoint, EPSILON_2D};
use nalgebra::{Point2, Vector2};

/// Half-length of the constructed cutting segment.
const CUT_HALF_LEN: f64 = 0.5;

/// The two pieces of a divided polyline.
///
/// `first` ends at the cut point and `second` begins at it; concatenating
/// the pieces (dropping the shared cut point once) reconstructs the original
/// vertex sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct DividedLine {
    pub first: Vec<Point2<f64>>,
    pub second: Vec<Point2<f64>>,
    /// The point both pieces share.
    pub cut_point: Point2<f64>,
    /// The short cutting segment through the cut point, for the digitizing
    /// surface to flash while the divide completes.
    pub cut_segment: [Point2<f64>; 2],
}

/// Construct the short cutting segment through the nearest point.
///
/// The segment runs perpendicular to the local line direction; if the local
/// segment is degenerate (zero length) an axis-aligned vertical cut is used
/// instead.
pub fn cut_segment_through(
    path: &[Point2<f64>],
    at: &NearestPoint,
) -> [Point2<f64>; 2] {
    let direction = path
        .get(at.segment + 1)
        .zip(path.get(at.segment))
        .map(|(b, a)| b - a)
        .unwrap_or_else(Vector2::zeros);

    let normal = if direction.norm_squared() <= EPSILON_2D * EPSILON_2D {
        // Degenerate segment: derive the cut from the axes
        Vector2::new(0.0, 1.0)
    } else {
        let d = direction.normalize();
        Vector2::new(-d.y, d.x)
    };

    [
        at.point - normal * CUT_HALF_LEN,
        at.point + normal * CUT_HALF_LEN,
    ]
}

/// Divide `path` at the point of it nearest to `click`.
///
/// Errors when the cut cannot yield exactly two pieces; the caller treats
/// that as a no-op and leaves the original record unmodified.
pub fn divide_at(path: &[Point2<f64>], click: Point2<f64>) -> Result<DividedLine> {
    if path.len() < 2 {
        return Err(Error::DivideFailed(format!(
            "line has {} points, need at least 2",
            path.len()
        )));
    }

    let nearest = nearest_point_on_path(path, click)
        .ok_or_else(|| Error::DivideFailed("no nearest point".to_string()))?;

    let cut_segment = cut_segment_through(path, &nearest);
    let cut_point = nearest.point;
    let start = path[0];
    let end = path[path.len() - 1];
    if close(cut_point, start) || close(cut_point, end) {
        return Err(Error::DivideFailed(
            "cut at line end would produce one piece".to_string(),
        ));
    }

    let mut first: Vec<Point2<f64>> = path[..=nearest.segment].to_vec();
    if !close(*first.last().expect("non-empty prefix"), cut_point) {
        first.push(cut_point);
    }

    let mut second: Vec<Point2<f64>> = vec![cut_point];
    for &p in &path[nearest.segment + 1..] {
        if !(second.len() == 1 && close(p, cut_point)) {
            second.push(p);
        }
    }

    if first.len() < 2 || second.len() < 2 {
        return Err(Error::DivideFailed(
            "cut did not produce two usable pieces".to_string(),
        ));
    }

    Ok(DividedLine {
        first,
        second,
        cut_point,
        cut_segment,
    })
}

#[inline]
fn close(a: Point2<f64>, b: Point2<f64>) -> bool {
    (a - b).norm_squared() <= EPSILON_2D * EPSILON_2D
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::path_length;
    use approx::assert_relative_eq;

    fn pts(coords: &[[f64; 2]]) -> Vec<Point2<f64>> {
        coords.iter().map(|c| Point2::new(c[0], c[1])).collect()
    }

    #[test]
    fn divide_mid_segment() {
        let path = pts(&[[0.0, 0.0], [10.0, 0.0]]);
        let divided = divide_at(&path, Point2::new(4.0, 3.0)).unwrap();
        assert_eq!(divided.first, pts(&[[0.0, 0.0], [4.0, 0.0]]));
        assert_eq!(divided.second, pts(&[[4.0, 0.0], [10.0, 0.0]]));
    }

    #[test]
    fn divide_at_interior_vertex_reconstructs_original() {
        let path = pts(&[[0.0, 0.0], [10.0, 0.0], [10.0, 5.0], [20.0, 5.0]]);
        let divided = divide_at(&path, Point2::new(10.0, 0.0)).unwrap();

        // Completeness: first ++ second (dropping the shared cut point)
        // equals the original vertex sequence
        let mut rebuilt = divided.first.clone();
        rebuilt.extend_from_slice(&divided.second[1..]);
        assert_eq!(rebuilt, path);
    }

    #[test]
    fn divide_preserves_total_length() {
        let path = pts(&[[0.0, 0.0], [10.0, 0.0], [10.0, 5.0]]);
        let divided = divide_at(&path, Point2::new(6.0, 1.0)).unwrap();
        assert_relative_eq!(
            path_length(&divided.first) + path_length(&divided.second),
            path_length(&path),
            epsilon = 1e-9
        );
    }

    #[test]
    fn click_beyond_line_end_is_rejected() {
        let path = pts(&[[0.0, 0.0], [10.0, 0.0]]);
        assert!(divide_at(&path, Point2::new(15.0, 0.0)).is_err());
        assert!(divide_at(&path, Point2::new(-3.0, 2.0)).is_err());
    }

    #[test]
    fn degenerate_path_is_rejected() {
        assert!(divide_at(&pts(&[[1.0, 1.0]]), Point2::new(0.0, 0.0)).is_err());
    }

    #[test]
    fn cut_segment_is_perpendicular() {
        let path = pts(&[[0.0, 0.0], [10.0, 0.0]]);
        let nearest = nearest_point_on_path(&path, Point2::new(5.0, 2.0)).unwrap();
        let [a, b] = cut_segment_through(&path, &nearest);
        // The line runs along x; the cut must run along y through (5, 0)
        assert_relative_eq!(a.x, 5.0);
        assert_relative_eq!(b.x, 5.0);
        assert_relative_eq!((b - a).norm(), 2.0 * 0.5);
    }
}
