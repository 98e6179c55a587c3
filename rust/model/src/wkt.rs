// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Well-Known Text geometry codec using nom
//!
//! The remote API stores all geometry as WKT text. Only the subset the
//! gazetteer produces is supported: POINT, LINESTRING and POLYGON with 2D
//! coordinates. Parsing is tolerant: blank or malformed input yields `None`,
//! never a panic, because records routinely arrive with empty geometry.

use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{char, multispace0, multispace1},
    combinator::map,
    multi::separated_list1,
    sequence::{delimited, preceded, separated_pair, tuple},
    IResult,
};

/// A decoded WKT geometry
#[derive(Debug, Clone, PartialEq)]
pub enum WktGeometry {
    /// POINT (x y)
    Point([f64; 2]),
    /// LINESTRING (x y, x y, ...)
    LineString(Vec<[f64; 2]>),
    /// POLYGON ((x y, ...), (x y, ...))
    Polygon(Vec<Vec<[f64; 2]>>),
}

impl WktGeometry {
    /// Flatten into ring/path arrays regardless of geometry kind.
    ///
    /// A point becomes a single one-coordinate ring so callers can treat all
    /// three kinds uniformly when loading graphics onto the map surface.
    pub fn rings(&self) -> Vec<Vec<[f64; 2]>> {
        match self {
            WktGeometry::Point(p) => vec![vec![*p]],
            WktGeometry::LineString(path) => vec![path.clone()],
            WktGeometry::Polygon(rings) => rings.clone(),
        }
    }

    /// Total number of coordinates across all rings/paths.
    pub fn coordinate_count(&self) -> usize {
        match self {
            WktGeometry::Point(_) => 1,
            WktGeometry::LineString(path) => path.len(),
            WktGeometry::Polygon(rings) => rings.iter().map(Vec::len).sum(),
        }
    }

    /// Serialize back to WKT text.
    ///
    /// Inverse of [`parse_wkt`]; coordinates are written with Rust's shortest
    /// round-trip float formatting so `parse_wkt(g.to_wkt())` reproduces the
    /// same coordinate sequence exactly.
    pub fn to_wkt(&self) -> String {
        match self {
            WktGeometry::Point(p) => format!("POINT ({} {})", p[0], p[1]),
            WktGeometry::LineString(path) => {
                format!("LINESTRING ({})", format_coords(path))
            }
            WktGeometry::Polygon(rings) => {
                let body = rings
                    .iter()
                    .map(|r| format!("({})", format_coords(r)))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("POLYGON ({body})")
            }
        }
    }
}

fn format_coords(coords: &[[f64; 2]]) -> String {
    coords
        .iter()
        .map(|c| format!("{} {}", c[0], c[1]))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse WKT text into a geometry.
///
/// Returns `None` for blank input, unsupported geometry kinds, trailing
/// garbage or any malformed coordinate list.
pub fn parse_wkt(input: &str) -> Option<WktGeometry> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    match wkt_geometry(trimmed) {
        Ok((rest, geometry)) if rest.trim().is_empty() => Some(geometry),
        _ => None,
    }
}

/// Parse WKT text directly into ring/path arrays.
///
/// Convenience wrapper over [`parse_wkt`] + [`WktGeometry::rings`]; this is
/// the form the map surface and geometry validators consume.
pub fn parse_rings(input: &str) -> Option<Vec<Vec<[f64; 2]>>> {
    parse_wkt(input).map(|g| g.rings())
}

/// Parse a float using lexical-core, consuming as many bytes as form a number
fn float_lex(input: &str) -> IResult<&str, f64> {
    match lexical_core::parse_partial::<f64>(input.as_bytes()) {
        Ok((value, consumed)) if consumed > 0 => Ok((&input[consumed..], value)),
        _ => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Float,
        ))),
    }
}

/// Parse an "x y" coordinate pair
fn coord(input: &str) -> IResult<&str, [f64; 2]> {
    map(separated_pair(float_lex, multispace1, float_lex), |(x, y)| {
        [x, y]
    })(input)
}

/// Comma separator with optional surrounding whitespace
fn comma(input: &str) -> IResult<&str, ()> {
    map(tuple((multispace0, char(','), multispace0)), |_| ())(input)
}

/// Parse a comma-separated coordinate list
fn coord_list(input: &str) -> IResult<&str, Vec<[f64; 2]>> {
    separated_list1(comma, coord)(input)
}

/// Parse a parenthesized coordinate list: (x y, x y, ...)
fn paren_coord_list(input: &str) -> IResult<&str, Vec<[f64; 2]>> {
    delimited(
        tuple((multispace0, char('('), multispace0)),
        coord_list,
        tuple((multispace0, char(')'))),
    )(input)
}

fn point(input: &str) -> IResult<&str, WktGeometry> {
    map(
        preceded(
            tag_no_case("POINT"),
            delimited(
                tuple((multispace0, char('('), multispace0)),
                coord,
                tuple((multispace0, char(')'))),
            ),
        ),
        WktGeometry::Point,
    )(input)
}

fn linestring(input: &str) -> IResult<&str, WktGeometry> {
    map(
        preceded(tag_no_case("LINESTRING"), paren_coord_list),
        WktGeometry::LineString,
    )(input)
}

fn polygon(input: &str) -> IResult<&str, WktGeometry> {
    map(
        preceded(
            tag_no_case("POLYGON"),
            delimited(
                tuple((multispace0, char('('), multispace0)),
                separated_list1(comma, paren_coord_list),
                tuple((multispace0, char(')'))),
            ),
        ),
        WktGeometry::Polygon,
    )(input)
}

fn wkt_geometry(input: &str) -> IResult<&str, WktGeometry> {
    preceded(multispace0, alt((point, linestring, polygon)))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_point() {
        let g = parse_wkt("POINT (431813.5 289231.25)").unwrap();
        assert_eq!(g, WktGeometry::Point([431813.5, 289231.25]));
    }

    #[test]
    fn parse_linestring() {
        let g = parse_wkt("LINESTRING (0 0, 10 0, 10 5)").unwrap();
        assert_eq!(
            g,
            WktGeometry::LineString(vec![[0.0, 0.0], [10.0, 0.0], [10.0, 5.0]])
        );
    }

    #[test]
    fn parse_polygon_single_ring() {
        let g = parse_wkt("POLYGON ((0 0, 4 0, 4 4, 0 4, 0 0))").unwrap();
        match g {
            WktGeometry::Polygon(rings) => {
                assert_eq!(rings.len(), 1);
                assert_eq!(rings[0].len(), 5);
            }
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn parse_polygon_with_hole() {
        let g = parse_wkt("POLYGON ((0 0, 10 0, 10 10, 0 10), (4 4, 6 4, 6 6, 4 6))").unwrap();
        assert_eq!(g.rings().len(), 2);
    }

    #[test]
    fn blank_and_malformed_are_none() {
        assert!(parse_wkt("").is_none());
        assert!(parse_wkt("   ").is_none());
        assert!(parse_wkt("LINESTRING ()").is_none());
        assert!(parse_wkt("LINESTRING (1 2,)").is_none());
        assert!(parse_wkt("POLYGON EMPTY").is_none());
        assert!(parse_wkt("CIRCULARSTRING (0 0, 1 1, 2 0)").is_none());
        assert!(parse_wkt("LINESTRING (1 2, 3 4) trailing").is_none());
    }

    #[test]
    fn case_and_whitespace_tolerance() {
        let g = parse_wkt("  linestring( 1 2 ,3   4 )").unwrap();
        assert_eq!(g, WktGeometry::LineString(vec![[1.0, 2.0], [3.0, 4.0]]));
    }

    #[test]
    fn negative_and_exponent_coordinates() {
        let g = parse_wkt("LINESTRING (-1.5 2e3, 0.25 -0.75)").unwrap();
        assert_eq!(
            g,
            WktGeometry::LineString(vec![[-1.5, 2000.0], [0.25, -0.75]])
        );
    }

    #[test]
    fn round_trip_law() {
        let cases = [
            "POINT (381212.12 214562.4)",
            "LINESTRING (0 0, 10.25 0.5, 20 -4)",
            "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0), (2 2, 3 2, 3 3, 2 3, 2 2))",
        ];
        for case in cases {
            let parsed = parse_wkt(case).unwrap();
            let rewritten = parsed.to_wkt();
            let reparsed = parse_wkt(&rewritten).unwrap();
            assert_eq!(parsed, reparsed, "round trip failed for {case}");
        }
    }

    #[test]
    fn rings_flatten_uniformly() {
        assert_eq!(
            parse_rings("POINT (1 2)").unwrap(),
            vec![vec![[1.0, 2.0]]]
        );
        assert_eq!(
            parse_rings("LINESTRING (1 2, 3 4)").unwrap(),
            vec![vec![[1.0, 2.0], [3.0, 4.0]]]
        );
    }
}
