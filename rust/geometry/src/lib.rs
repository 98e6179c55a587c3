// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! GazMap 2D Geometry
//!
//! Polyline and polygon computation for gazetteer digitizing, using i_overlay
//! for boolean union and nalgebra for the point types.

pub mod divide;
pub mod error;
pub mod line;
pub mod merge;
pub mod polygon;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Vector2};

pub use divide::{cut_segment_through, divide_at, DividedLine};
pub use error::{Error, Result};
pub use line::{
    is_self_intersecting, nearest_point_on_path, parts_length, path_length, segments_cross,
    NearestPoint, EPSILON_2D,
};
pub use merge::{merge_paths, merge_rings};
pub use polygon::{
    ensure_ccw, ensure_cw, is_valid_ring, point_in_ring, shape_area, signed_area, union_rings,
    Shape,
};
