// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D polygon predicates and boolean union via the i_overlay crate.
//!
//! Extent polygons are edited as single rings; merge unions several rings
//! into one shape. Disjoint union results are reported as such so the caller
//! can refuse the merge instead of silently producing a multi-shape extent.

use crate::error::{Error, Result};
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;

/// Minimum area threshold - rings smaller than this are considered degenerate
const MIN_AREA_THRESHOLD: f64 = 1e-10;

/// One polygon shape: an outer ring followed by zero or more holes.
pub type Shape = Vec<Vec<Point2<f64>>>;

/// Compute the signed area of a ring
/// Positive = counter-clockwise, Negative = clockwise
pub fn signed_area(ring: &[Point2<f64>]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = ring.len();
    for i in 0..n {
        let j = (i + 1) % n;
        area += ring[i].x * ring[j].y;
        area -= ring[j].x * ring[i].y;
    }
    area * 0.5
}

/// Absolute area of a shape: outer ring minus holes.
pub fn shape_area(shape: &Shape) -> f64 {
    let mut area = 0.0;
    for (i, ring) in shape.iter().enumerate() {
        let a = signed_area(ring).abs();
        if i == 0 {
            area += a;
        } else {
            area -= a;
        }
    }
    area.max(0.0)
}

/// Check if a ring is valid (has area, not degenerate)
pub fn is_valid_ring(ring: &[Point2<f64>]) -> bool {
    ring.len() >= 3 && signed_area(ring).abs() > MIN_AREA_THRESHOLD
}

/// Ensure counter-clockwise winding (positive area)
pub fn ensure_ccw(ring: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if signed_area(ring) < 0.0 {
        ring.iter().rev().cloned().collect()
    } else {
        ring.to_vec()
    }
}

/// Ensure clockwise winding (for holes)
pub fn ensure_cw(ring: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if signed_area(ring) > 0.0 {
        ring.iter().rev().cloned().collect()
    } else {
        ring.to_vec()
    }
}

/// Check if a point is inside a ring using ray casting
pub fn point_in_ring(point: &Point2<f64>, ring: &[Point2<f64>]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = ring.len();
    let mut j = n - 1;
    for i in 0..n {
        let pi = &ring[i];
        let pj = &ring[j];
        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Union a set of rings into polygon shapes.
///
/// Returns one `Shape` per connected result; overlapping inputs collapse
/// into a single shape, disjoint inputs stay separate. Degenerate rings are
/// filtered before the overlay.
pub fn union_rings(rings: &[Vec<Point2<f64>>]) -> Result<Vec<Shape>> {
    let valid: Vec<&Vec<Point2<f64>>> = rings.iter().filter(|r| is_valid_ring(r)).collect();
    if valid.is_empty() {
        return Err(Error::InvalidPolygon(
            "no valid rings to union".to_string(),
        ));
    }
    if valid.len() == 1 {
        return Ok(vec![vec![ensure_ccw(valid[0])]]);
    }

    // Subject is the first ring, clip is everything else
    let subject: Vec<Vec<[f64; 2]>> = vec![ring_to_path(&ensure_ccw(valid[0]))];
    let clip: Vec<Vec<[f64; 2]>> = valid
        .iter()
        .skip(1)
        .map(|r| ring_to_path(&ensure_ccw(r)))
        .collect();

    // Result is Vec<Vec<Vec<[f64; 2]>>> - Vec of shapes, each shape is Vec of contours
    let result = subject.overlay(&clip, OverlayRule::Union, FillRule::EvenOdd);

    let mut shapes = Vec::new();
    for shape in result {
        let mut converted: Shape = Vec::with_capacity(shape.len());
        for (i, contour) in shape.iter().enumerate() {
            let ring: Vec<Point2<f64>> =
                contour.iter().map(|p| Point2::new(p[0], p[1])).collect();
            if !is_valid_ring(&ring) {
                continue;
            }
            // First contour is the outer boundary, the rest are holes
            if i == 0 {
                converted.push(ensure_ccw(&ring));
            } else {
                converted.push(ensure_cw(&ring));
            }
        }
        if !converted.is_empty() {
            shapes.push(converted);
        }
    }

    if shapes.is_empty() {
        return Err(Error::InvalidPolygon(
            "union produced empty geometry".to_string(),
        ));
    }
    Ok(shapes)
}

fn ring_to_path(ring: &[Point2<f64>]) -> Vec<[f64; 2]> {
    ring.iter().map(|p| [p.x, p.y]).collect()
}
