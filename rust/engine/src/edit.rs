// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry edit handlers: live updates from the digitizing tool.
//!
//! Validation failures are recovered locally: the geometry is flagged
//! invalid and a blocking notice raised, but nothing is committed and the
//! user keeps editing. Divide and merge never partially mutate; on failure
//! the original records are untouched.

use crate::events::{EngineEvent, NoticeSeverity};
use gazmap_geometry::{divide_at, is_self_intersecting, merge_paths, merge_rings, Point2};
use gazmap_model::{parse_wkt, Esu, ProvenanceExtent, WktGeometry};
use tracing::debug;

/// Round a coordinate to 4 decimal places for the coordinate-entry fields.
#[inline]
pub fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

fn to_points(part: &[[f64; 2]]) -> Vec<Point2<f64>> {
    part.iter().map(|c| Point2::new(c[0], c[1])).collect()
}

fn to_coords(points: &[Point2<f64>]) -> Vec<[f64; 2]> {
    points.iter().map(|p| [p.x, p.y]).collect()
}

/// Point drag completed.
pub fn point_moved(x: f64, y: f64) -> EngineEvent {
    EngineEvent::SetCoordinate {
        x: round4(x),
        y: round4(y),
    }
}

/// Outcome of a polyline or polygon update.
#[derive(Debug)]
pub struct EditOutcome {
    /// Drives the valid/invalid symbol on the edit overlay.
    pub valid: bool,
    pub events: Vec<EngineEvent>,
}

/// Polyline vertex added or reshape completed.
///
/// Self-intersecting geometry is flagged and blocked; multi-part input must
/// chain into a single path before it can be stored.
pub fn line_updated(parts: &[Vec<[f64; 2]>]) -> EditOutcome {
    let points: Vec<Vec<Point2<f64>>> = parts.iter().map(|p| to_points(p)).collect();

    if is_self_intersecting(&points) {
        return EditOutcome {
            valid: false,
            events: vec![EngineEvent::Notice {
                severity: NoticeSeverity::Blocking,
                text: "The line cannot cross itself".to_string(),
            }],
        };
    }

    let chained = match points.len() {
        0 => return EditOutcome { valid: true, events: Vec::new() },
        1 => points.into_iter().next().expect("one part"),
        _ => match merge_paths(&points) {
            Ok(chain) => chain,
            Err(err) => {
                debug!(%err, "multi-part line does not chain");
                return EditOutcome {
                    valid: false,
                    events: vec![EngineEvent::Notice {
                        severity: NoticeSeverity::Blocking,
                        text: "The line parts must join into one continuous line".to_string(),
                    }],
                };
            }
        },
    };

    if chained.len() < 2 {
        return EditOutcome { valid: true, events: Vec::new() };
    }

    let wkt = WktGeometry::LineString(to_coords(&chained)).to_wkt();
    EditOutcome {
        valid: true,
        events: vec![EngineEvent::SetLineGeometry { wkt }],
    }
}

/// Polygon reshape completed, or `None` when the polygon was deleted.
///
/// More than one ring means an ungrouped/disjoint polygon, which is not
/// permitted. Deletion emits an explicit cleared signal distinct from "no
/// change".
pub fn polygon_updated(rings: Option<&[Vec<[f64; 2]>]>) -> EditOutcome {
    let Some(rings) = rings else {
        return EditOutcome {
            valid: true,
            events: vec![EngineEvent::SetPolygonGeometry { wkt: None }],
        };
    };

    if rings.len() != 1 {
        return EditOutcome {
            valid: false,
            events: vec![EngineEvent::Notice {
                severity: NoticeSeverity::Blocking,
                text: "The extent must be a single polygon".to_string(),
            }],
        };
    }

    let wkt = WktGeometry::Polygon(rings.to_vec()).to_wkt();
    EditOutcome {
        valid: true,
        events: vec![EngineEvent::SetPolygonGeometry { wkt: Some(wkt) }],
    }
}

/// Divide an ESU at a clicked point.
///
/// On success, both pieces are emitted as a divide event. On failure the
/// operation is a no-op: the original ESU is never silently dropped.
pub fn divide_esu(esu: &Esu, click: [f64; 2]) -> Option<EngineEvent> {
    let wkt = esu.wkt.as_deref()?;
    let path = match parse_wkt(wkt) {
        Some(WktGeometry::LineString(path)) => to_points(&path),
        _ => {
            debug!(esu = %esu.id, "divide target has no line geometry");
            return None;
        }
    };

    match divide_at(&path, Point2::new(click[0], click[1])) {
        Ok(divided) => Some(EngineEvent::EsuDivided {
            first_wkt: WktGeometry::LineString(to_coords(&divided.first)).to_wkt(),
            second_wkt: WktGeometry::LineString(to_coords(&divided.second)).to_wkt(),
        }),
        Err(err) => {
            debug!(esu = %esu.id, %err, "divide produced no cut, leaving ESU unchanged");
            None
        }
    }
}

/// Merge the selected ESUs' paths into one geometry for the lead record.
pub fn merge_esus(selected: &[&Esu]) -> Result<EngineEvent, EngineEvent> {
    let paths: Vec<Vec<Point2<f64>>> = selected
        .iter()
        .filter_map(|e| e.wkt.as_deref())
        .filter_map(parse_wkt)
        .filter_map(|g| match g {
            WktGeometry::LineString(path) => Some(to_points(&path)),
            _ => None,
        })
        .collect();

    match merge_paths(&paths) {
        Ok(chain) => Ok(EngineEvent::SetLineGeometry {
            wkt: WktGeometry::LineString(to_coords(&chain)).to_wkt(),
        }),
        Err(err) => {
            debug!(%err, "ESU merge refused");
            Err(EngineEvent::Notice {
                severity: NoticeSeverity::Warning,
                text: "The selected ESUs cannot be merged into one line".to_string(),
            })
        }
    }
}

/// Merge the selected provenance extents into one polygon for the lead
/// record. The caller brackets this with extent-merge begin/end signals to
/// suppress unrelated re-renders.
pub fn merge_extents(selected: &[&ProvenanceExtent]) -> Result<EngineEvent, EngineEvent> {
    let rings: Vec<Vec<Point2<f64>>> = selected
        .iter()
        .filter_map(|e| e.wkt.as_deref())
        .filter_map(parse_wkt)
        .filter_map(|g| match g {
            WktGeometry::Polygon(rings) => rings.into_iter().next().map(|r| to_points(&r)),
            _ => None,
        })
        .collect();

    match merge_rings(&rings) {
        Ok(shape) => {
            let rings: Vec<Vec<[f64; 2]>> = shape.iter().map(|r| to_coords(r)).collect();
            Ok(EngineEvent::SetPolygonGeometry {
                wkt: Some(WktGeometry::Polygon(rings).to_wkt()),
            })
        }
        Err(err) => {
            debug!(%err, "extent merge refused");
            Err(EngineEvent::Notice {
                severity: NoticeSeverity::Warning,
                text: "The selected extents cannot be merged into one polygon".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazmap_model::{ChangeFlag, EsuId, ExtentKey, ProvenanceCode, Uprn};

    fn esu(id: i64, wkt: &str) -> Esu {
        Esu {
            id: EsuId(id),
            state: None,
            wkt: Some(wkt.to_string()),
            change: ChangeFlag::Unchanged,
        }
    }

    #[test]
    fn coordinates_round_to_four_places() {
        let event = point_moved(431813.123456, 289231.987654);
        assert_eq!(
            event,
            EngineEvent::SetCoordinate {
                x: 431813.1235,
                y: 289231.9877
            }
        );
    }

    #[test]
    fn clean_line_is_emitted() {
        let outcome = line_updated(&[vec![[0.0, 0.0], [10.0, 0.0], [10.0, 5.0]]]);
        assert!(outcome.valid);
        assert_eq!(
            outcome.events,
            vec![EngineEvent::SetLineGeometry {
                wkt: "LINESTRING (0 0, 10 0, 10 5)".to_string()
            }]
        );
    }

    #[test]
    fn self_intersecting_line_is_blocked() {
        let outcome = line_updated(&[vec![
            [0.0, 0.0],
            [10.0, 10.0],
            [10.0, 0.0],
            [0.0, 10.0],
        ]]);
        assert!(!outcome.valid);
        assert!(matches!(
            outcome.events.as_slice(),
            [EngineEvent::Notice {
                severity: NoticeSeverity::Blocking,
                ..
            }]
        ));
    }

    #[test]
    fn two_point_line_is_never_blocked() {
        let outcome = line_updated(&[vec![[0.0, 0.0], [10.0, 10.0]]]);
        assert!(outcome.valid);
    }

    #[test]
    fn polygon_with_extra_ring_is_blocked() {
        let rings = vec![
            vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]],
            vec![[2.0, 2.0], [3.0, 2.0], [3.0, 3.0], [2.0, 3.0]],
        ];
        let outcome = polygon_updated(Some(&rings));
        assert!(!outcome.valid);
    }

    #[test]
    fn polygon_deletion_is_an_explicit_clear() {
        let outcome = polygon_updated(None);
        assert!(outcome.valid);
        assert_eq!(
            outcome.events,
            vec![EngineEvent::SetPolygonGeometry { wkt: None }]
        );
    }

    #[test]
    fn divide_emits_both_pieces() {
        let esu = esu(14, "LINESTRING (0 0, 10 0)");
        let event = divide_esu(&esu, [4.0, 1.0]).unwrap();
        assert_eq!(
            event,
            EngineEvent::EsuDivided {
                first_wkt: "LINESTRING (0 0, 4 0)".to_string(),
                second_wkt: "LINESTRING (4 0, 10 0)".to_string(),
            }
        );
    }

    #[test]
    fn divide_at_endpoint_is_a_no_op() {
        let esu = esu(14, "LINESTRING (0 0, 10 0)");
        assert!(divide_esu(&esu, [-5.0, 0.0]).is_none());
    }

    #[test]
    fn divide_without_geometry_is_a_no_op() {
        let esu = Esu {
            id: EsuId(14),
            state: None,
            wkt: None,
            change: ChangeFlag::Unchanged,
        };
        assert!(divide_esu(&esu, [0.0, 0.0]).is_none());
    }

    #[test]
    fn merge_chains_selected_esus() {
        let a = esu(1, "LINESTRING (0 0, 10 0)");
        let b = esu(2, "LINESTRING (10 0, 20 0)");
        let event = merge_esus(&[&a, &b]).unwrap();
        assert_eq!(
            event,
            EngineEvent::SetLineGeometry {
                wkt: "LINESTRING (0 0, 10 0, 20 0)".to_string()
            }
        );
    }

    #[test]
    fn merge_of_disjoint_esus_is_refused() {
        let a = esu(1, "LINESTRING (0 0, 10 0)");
        let b = esu(2, "LINESTRING (50 50, 60 50)");
        assert!(merge_esus(&[&a, &b]).is_err());
    }

    #[test]
    fn merge_extents_unions_polygons() {
        let make = |key: i64, wkt: &str| ProvenanceExtent {
            key: ExtentKey(key),
            uprn: Uprn(100010001),
            code: ProvenanceCode::Occupancy,
            wkt: Some(wkt.to_string()),
            change: ChangeFlag::Unchanged,
        };
        let a = make(1, "POLYGON ((0 0, 2 0, 2 2, 0 2))");
        let b = make(2, "POLYGON ((1 1, 3 1, 3 3, 1 3))");
        let event = merge_extents(&[&a, &b]).unwrap();
        match event {
            EngineEvent::SetPolygonGeometry { wkt: Some(wkt) } => {
                assert!(wkt.starts_with("POLYGON"));
            }
            other => panic!("expected polygon geometry, got {other:?}"),
        }
    }
}
