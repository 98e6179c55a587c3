// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shapefile main-file decoding for uploaded reference layers.
//!
//! Decodes the ESRI shapefile header and the Point / PolyLine / Polygon
//! record types into a generic geometry collection. Anything else is a
//! decode error: reference files are user uploads, so every length and index
//! is validated before use.

use crate::error::{Error, Result};

/// Shapefile magic number (big-endian file code).
const FILE_CODE: i32 = 9994;
/// The only shapefile version ever published.
const VERSION: i32 = 1000;
/// Fixed header length in bytes.
const HEADER_LEN: usize = 100;

/// One decoded shape.
#[derive(Debug, Clone, PartialEq)]
pub enum RefShape {
    Point([f64; 2]),
    /// One or more line parts.
    PolyLine(Vec<Vec<[f64; 2]>>),
    /// One or more rings.
    Polygon(Vec<Vec<[f64; 2]>>),
}

impl RefShape {
    /// Ring/path arrays, uniform across shape kinds.
    pub fn rings(&self) -> Vec<Vec<[f64; 2]>> {
        match self {
            RefShape::Point(p) => vec![vec![*p]],
            RefShape::PolyLine(parts) | RefShape::Polygon(parts) => parts.clone(),
        }
    }
}

/// A decoded reference file: a titled collection of generic shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryCollection {
    pub title: String,
    /// Bounding box from the file header: [xmin, ymin, xmax, ymax].
    pub bounds: [f64; 4],
    pub shapes: Vec<RefShape>,
}

/// Little/big-endian cursor over the record buffer
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(Error::InvalidShapefile(format!(
                "truncated {what} at offset {}",
                self.pos
            )));
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn i32_be(&mut self, what: &str) -> Result<i32> {
        let b = self.take(4, what)?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn i32_le(&mut self, what: &str) -> Result<i32> {
        let b = self.take(4, what)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn f64_le(&mut self, what: &str) -> Result<f64> {
        let b = self.take(8, what)?;
        Ok(f64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    fn skip(&mut self, len: usize, what: &str) -> Result<()> {
        self.take(len, what).map(|_| ())
    }
}

/// Decode a shapefile main-file buffer into a geometry collection.
///
/// `title` is the display name of the uploaded file, carried through so
/// failure notices can reference it.
pub fn decode_shapefile(title: &str, bytes: &[u8]) -> Result<GeometryCollection> {
    if bytes.len() < HEADER_LEN {
        return Err(Error::InvalidShapefile(format!(
            "'{title}': header requires {HEADER_LEN} bytes, got {}",
            bytes.len()
        )));
    }

    let mut reader = Reader::new(bytes);
    let file_code = reader.i32_be("file code")?;
    if file_code != FILE_CODE {
        return Err(Error::InvalidShapefile(format!(
            "'{title}': bad file code {file_code}"
        )));
    }
    reader.skip(20, "reserved header words")?;
    let file_len_words = reader.i32_be("file length")?;
    let declared_len = file_len_words as usize * 2;
    if declared_len > bytes.len() {
        return Err(Error::InvalidShapefile(format!(
            "'{title}': declared length {declared_len} exceeds buffer {}",
            bytes.len()
        )));
    }
    let version = reader.i32_le("version")?;
    if version != VERSION {
        return Err(Error::InvalidShapefile(format!(
            "'{title}': unsupported version {version}"
        )));
    }
    let file_shape_type = reader.i32_le("shape type")?;
    validate_shape_type(title, file_shape_type)?;

    let xmin = reader.f64_le("xmin")?;
    let ymin = reader.f64_le("ymin")?;
    let xmax = reader.f64_le("xmax")?;
    let ymax = reader.f64_le("ymax")?;
    // Z/M ranges are present in the header even for 2D shapes
    reader.skip(32, "z/m range")?;

    let mut shapes = Vec::new();
    while reader.remaining() >= 8 {
        let _record_number = reader.i32_be("record number")?;
        let content_words = reader.i32_be("record content length")?;
        if content_words < 2 {
            return Err(Error::InvalidShapefile(format!(
                "'{title}': record content length {content_words} too small"
            )));
        }
        let content = reader.take(content_words as usize * 2, "record content")?;
        if let Some(shape) = decode_record(title, content)? {
            shapes.push(shape);
        }
    }

    Ok(GeometryCollection {
        title: title.to_string(),
        bounds: [xmin, ymin, xmax, ymax],
        shapes,
    })
}

fn validate_shape_type(title: &str, shape_type: i32) -> Result<()> {
    match shape_type {
        0 | 1 | 3 | 5 => Ok(()),
        other => Err(Error::InvalidShapefile(format!(
            "'{title}': unsupported shape type {other}"
        ))),
    }
}

/// Decode one record's content; null shapes yield `None`.
fn decode_record(title: &str, content: &[u8]) -> Result<Option<RefShape>> {
    let mut reader = Reader::new(content);
    let shape_type = reader.i32_le("record shape type")?;
    match shape_type {
        0 => Ok(None),
        1 => {
            let x = reader.f64_le("point x")?;
            let y = reader.f64_le("point y")?;
            Ok(Some(RefShape::Point([x, y])))
        }
        3 => decode_parts(title, &mut reader).map(|parts| Some(RefShape::PolyLine(parts))),
        5 => decode_parts(title, &mut reader).map(|parts| Some(RefShape::Polygon(parts))),
        other => Err(Error::InvalidShapefile(format!(
            "'{title}': unsupported record shape type {other}"
        ))),
    }
}

/// Decode the shared PolyLine/Polygon layout: bbox, part index table, points.
fn decode_parts(title: &str, reader: &mut Reader<'_>) -> Result<Vec<Vec<[f64; 2]>>> {
    reader.skip(32, "record bbox")?;
    let num_parts = reader.i32_le("part count")?;
    let num_points = reader.i32_le("point count")?;
    if num_parts <= 0 || num_points <= 0 {
        return Err(Error::InvalidShapefile(format!(
            "'{title}': invalid part/point counts {num_parts}/{num_points}"
        )));
    }
    let num_parts = num_parts as usize;
    let num_points = num_points as usize;

    let mut part_starts = Vec::with_capacity(num_parts);
    for _ in 0..num_parts {
        let start = reader.i32_le("part index")?;
        if start < 0 || start as usize >= num_points {
            return Err(Error::InvalidShapefile(format!(
                "'{title}': part index {start} out of range"
            )));
        }
        part_starts.push(start as usize);
    }
    // Part indices must be strictly ascending or part ranges overlap
    if part_starts.windows(2).any(|w| w[0] >= w[1]) {
        return Err(Error::InvalidShapefile(format!(
            "'{title}': part indices not ascending"
        )));
    }

    let mut points = Vec::with_capacity(num_points);
    for _ in 0..num_points {
        let x = reader.f64_le("point x")?;
        let y = reader.f64_le("point y")?;
        points.push([x, y]);
    }

    let mut parts = Vec::with_capacity(num_parts);
    for (i, &start) in part_starts.iter().enumerate() {
        let end = part_starts.get(i + 1).copied().unwrap_or(num_points);
        parts.push(points[start..end].to_vec());
    }
    Ok(parts)
}
