// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Uploaded reference files as always-on layers.
//!
//! A reference file arrives as a zipped shapefile, is decoded into a generic
//! geometry collection and rendered as its own layer with user-driven
//! visibility, opacity and snap participation. Nothing here persists across
//! a session reload.

use crate::feature::{Feature, FeatureGeometry, FieldDef, LayerDef, Renderer, SymbolEntry};
use crate::layers::LayerKind;
use crate::symbology::{LinePattern, MarkerShape, Style};
use gazmap_model::{decode_shapefile, extract_member, GeometryCollection, RefShape};

/// A loaded reference file and its per-layer flags.
#[derive(Debug, Clone)]
pub struct ReferenceLayer {
    pub index: u32,
    pub title: String,
    pub collection: GeometryCollection,
    pub visible: bool,
    pub opacity: f64,
    pub snappable: bool,
}

/// Decode a zipped shapefile into a geometry collection.
///
/// The `.shp` member carries the geometry; everything else in the archive is
/// ignored. Errors reference `title` so the failure notice can name the
/// file.
pub fn decode_reference_file(
    title: &str,
    zip_bytes: &[u8],
) -> gazmap_model::Result<GeometryCollection> {
    let member = extract_member(zip_bytes, ".shp")?;
    decode_shapefile(title, &member.data)
}

const REFERENCE_STYLE: Style = Style {
    color: [96, 96, 96, 200],
    line: LinePattern::Solid,
    marker: Some(MarkerShape::Circle),
    width: 1.0,
};

const REFERENCE_FIELDS: &[FieldDef] = &[FieldDef {
    name: "title",
    alias: "Reference file",
}];

/// Build the layer definition for a loaded reference file.
pub fn reference_layer_def(layer: &ReferenceLayer) -> LayerDef {
    let features = layer
        .collection
        .shapes
        .iter()
        .enumerate()
        .map(|(i, shape)| {
            let geometry = match shape {
                RefShape::Point(p) => FeatureGeometry::Point(*p),
                RefShape::PolyLine(parts) => FeatureGeometry::Line(parts.clone()),
                RefShape::Polygon(rings) => FeatureGeometry::Polygon(rings.clone()),
            };
            Feature::new(format!("{}:{i}", layer.index), geometry)
                .with_attr("title", layer.title.clone())
        })
        .collect();

    LayerDef {
        kind: LayerKind::ReferenceFile(layer.index),
        features,
        fields: REFERENCE_FIELDS.to_vec(),
        renderer: Renderer {
            discriminant_field: "title",
            symbols: vec![SymbolEntry {
                key: layer.title.clone(),
                style: REFERENCE_STYLE,
            }],
            default_style: REFERENCE_STYLE,
        },
        popup: None,
        opacity: layer.opacity,
        clustered: false,
    }
}
