// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Merging selected geometries into one.
//!
//! Polyline merge chains paths end to end where their endpoints coincide;
//! polygon merge is a boolean union. Either way the result must be a single
//! connected geometry, otherwise the merge is refused and the caller keeps
//! the originals.

use crate::error::{Error, Result};
use crate::line::path_length;
use crate::polygon::{shape_area, union_rings, Shape};
use nalgebra::Point2;

/// Endpoint snap tolerance when chaining polylines.
const JOIN_TOLERANCE: f64 = 1e-6;

/// Merge selected ESU paths into one continuous path.
///
/// Paths may be supplied in any order and direction; each join reverses a
/// path when its far end is the one that matches. Errors when fewer than two
/// paths are given or when the inputs do not chain into a single path.
pub fn merge_paths(paths: &[Vec<Point2<f64>>]) -> Result<Vec<Point2<f64>>> {
    if paths.len() < 2 {
        return Err(Error::MergeFailed(format!(
            "need at least 2 paths, got {}",
            paths.len()
        )));
    }
    if paths.iter().any(|p| p.len() < 2) {
        return Err(Error::MergeFailed(
            "cannot merge a degenerate path".to_string(),
        ));
    }

    let mut remaining: Vec<Vec<Point2<f64>>> = paths.to_vec();
    let mut chain = remaining.swap_remove(0);

    while !remaining.is_empty() {
        let chain_start = chain[0];
        let chain_end = *chain.last().expect("chain is non-empty");

        let mut joined = false;
        for i in 0..remaining.len() {
            let cand_start = remaining[i][0];
            let cand_end = *remaining[i].last().expect("candidate is non-empty");

            if close(chain_end, cand_start) {
                let cand = remaining.swap_remove(i);
                chain.extend_from_slice(&cand[1..]);
            } else if close(chain_end, cand_end) {
                let mut cand = remaining.swap_remove(i);
                cand.reverse();
                chain.extend_from_slice(&cand[1..]);
            } else if close(chain_start, cand_end) {
                let cand = remaining.swap_remove(i);
                let mut new_chain = cand;
                new_chain.extend_from_slice(&chain[1..]);
                chain = new_chain;
            } else if close(chain_start, cand_start) {
                let mut cand = remaining.swap_remove(i);
                cand.reverse();
                cand.extend_from_slice(&chain[1..]);
                chain = cand;
            } else {
                continue;
            }
            joined = true;
            break;
        }

        if !joined {
            return Err(Error::MergeFailed(format!(
                "{} path(s) do not connect to the chain",
                remaining.len()
            )));
        }
    }

    Ok(chain)
}

/// Merge selected extent rings into one polygon shape.
///
/// Errors when the union leaves disjoint shapes: a merged extent must be a
/// single connected polygon.
pub fn merge_rings(rings: &[Vec<Point2<f64>>]) -> Result<Shape> {
    if rings.len() < 2 {
        return Err(Error::MergeFailed(format!(
            "need at least 2 rings, got {}",
            rings.len()
        )));
    }
    let mut shapes = union_rings(rings)?;
    if shapes.len() != 1 {
        return Err(Error::MergeFailed(format!(
            "union produced {} disjoint shapes",
            shapes.len()
        )));
    }
    Ok(shapes.swap_remove(0))
}

#[inline]
fn close(a: Point2<f64>, b: Point2<f64>) -> bool {
    (a - b).norm_squared() <= JOIN_TOLERANCE * JOIN_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pts(coords: &[[f64; 2]]) -> Vec<Point2<f64>> {
        coords.iter().map(|c| Point2::new(c[0], c[1])).collect()
    }

    #[test]
    fn chains_in_order() {
        let merged = merge_paths(&[
            pts(&[[0.0, 0.0], [10.0, 0.0]]),
            pts(&[[10.0, 0.0], [20.0, 0.0]]),
        ])
        .unwrap();
        assert_eq!(merged, pts(&[[0.0, 0.0], [10.0, 0.0], [20.0, 0.0]]));
    }

    #[test]
    fn chains_reversed_and_out_of_order() {
        let merged = merge_paths(&[
            pts(&[[20.0, 0.0], [10.0, 0.0]]),
            pts(&[[20.0, 0.0], [30.0, 5.0]]),
            pts(&[[0.0, 0.0], [10.0, 0.0]]),
        ])
        .unwrap();
        // The chain must visit all four vertices in one pass, whatever its
        // final direction
        assert_eq!(merged.len(), 4);
        let len: f64 = path_length(&merged);
        let expected = 10.0 + 10.0 + (10.0f64 * 10.0 + 5.0 * 5.0).sqrt();
        assert_relative_eq!(len, expected, epsilon = 1e-9);
    }

    #[test]
    fn merged_length_never_shrinks() {
        let inputs = [
            pts(&[[0.0, 0.0], [10.0, 0.0]]),
            pts(&[[10.0, 0.0], [10.0, 8.0]]),
        ];
        let max_input = inputs.iter().map(|p| path_length(p)).fold(0.0, f64::max);
        let merged = merge_paths(&inputs).unwrap();
        assert!(path_length(&merged) >= max_input);
    }

    #[test]
    fn disconnected_paths_are_refused() {
        let err = merge_paths(&[
            pts(&[[0.0, 0.0], [10.0, 0.0]]),
            pts(&[[50.0, 50.0], [60.0, 50.0]]),
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn single_path_is_refused() {
        assert!(merge_paths(&[pts(&[[0.0, 0.0], [1.0, 0.0]])]).is_err());
    }

    #[test]
    fn merge_rings_requires_connected_union() {
        let overlapping = [
            pts(&[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]]),
            pts(&[[1.0, 1.0], [3.0, 1.0], [3.0, 3.0], [1.0, 3.0]]),
        ];
        let shape = merge_rings(&overlapping).unwrap();
        assert_relative_eq!(shape_area(&shape), 7.0, epsilon = 1e-9);

        let disjoint = [
            pts(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]),
            pts(&[[5.0, 5.0], [6.0, 5.0], [6.0, 6.0], [5.0, 6.0]]),
        ];
        assert!(merge_rings(&disjoint).is_err());
    }
}
