// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layer projection: domain snapshot to renderable layer definitions.
//!
//! Projection is pure: it reads the snapshot and produces `LayerDef`s, never
//! touching the surface. Identity de-duplication guarantees a record never
//! appears on both a background and a foreground layer in the same pass.

pub mod asd;
pub mod extents;
pub mod properties;
pub mod streets;

use crate::feature::{Feature, FeatureGeometry, LayerDef, Renderer, SymbolEntry};
use crate::layers::LayerKind;
use crate::ports::UserRightsPort;
use crate::snapping::{snap_layers_for, SnapConfig};
use crate::snapshot::{Snapshot, ZoomTarget};
use crate::symbology::{property_style, street_style, Style};
use gazmap_model::parse_rings;
use rustc_hash::FxHashMap;

/// The full desired layer set for one render pass.
#[derive(Debug)]
pub struct Projection {
    pub layers: Vec<LayerDef>,
}

/// Project the snapshot into the desired layer set.
///
/// Layers currently acting as snap targets are produced unclustered, so the
/// digitizing tool can snap to individual features.
pub fn project(
    snapshot: &Snapshot,
    rights: &dyn UserRightsPort,
    snap_config: &SnapConfig,
) -> Projection {
    let snap_targets = snap_layers_for(snapshot.editing.as_ref(), snap_config);
    let unclustered = |kind: LayerKind| snap_targets.contains(&kind);

    let mut layers = Vec::with_capacity(12);
    layers.push(streets::background_street_layer(snapshot));
    layers.push(streets::unassigned_esu_layer(snapshot));
    layers.push(extents::background_provenance_layer(snapshot));
    layers.push(properties::background_property_layer(
        snapshot,
        rights,
        !unclustered(LayerKind::BackgroundProperties),
    ));
    layers.push(streets::foreground_street_layer(snapshot, rights));
    layers.push(streets::llpg_street_layer(snapshot, rights));
    layers.extend(asd::asd_layers(snapshot));
    layers.push(extents::extent_layer(snapshot));
    layers.push(properties::property_layer(
        snapshot,
        rights,
        !unclustered(LayerKind::Property),
    ));
    layers.push(zoom_highlight_layer(snapshot));

    Projection { layers }
}

/// Overlay carrying the single object the view is zoomed to.
fn zoom_highlight_layer(snapshot: &Snapshot) -> LayerDef {
    let mut symbols = SymbolTable::new();
    let mut features = Vec::new();

    match snapshot.zoom_to {
        Some(ZoomTarget::Street(usrn)) => {
            let street = snapshot
                .streets
                .iter()
                .chain(snapshot.llpg_streets.iter())
                .chain(snapshot.background_streets.iter())
                .find(|s| s.usrn == usrn);
            if let Some(street) = street {
                for esu in street.displayable_esus() {
                    if let Some(geometry) = line_geometry(esu.wkt.as_deref()) {
                        let code = "zoomStreet";
                        symbols.note(code, street_style(street.state, true));
                        features.push(
                            Feature::new(esu.id.to_string(), geometry)
                                .with_attr("usrn", usrn.value())
                                .with_attr("symbolCode", code),
                        );
                    }
                }
            }
        }
        Some(ZoomTarget::Property(uprn)) => {
            let property = snapshot
                .properties
                .iter()
                .chain(snapshot.background_properties.iter())
                .find(|p| p.uprn == uprn);
            if let Some(property) = property {
                let code = "zoomProperty";
                symbols.note(
                    code,
                    property_style(property.display_logical_status(), &property.classification, true),
                );
                features.push(
                    Feature::new(uprn.to_string(), FeatureGeometry::Point(property.position()))
                        .with_attr("uprn", uprn.value())
                        .with_attr("symbolCode", code),
                );
            }
        }
        None => {}
    }

    LayerDef {
        kind: LayerKind::ZoomHighlight,
        features,
        fields: vec![],
        renderer: symbols.into_renderer("symbolCode", street_style(None, true)),
        popup: None,
        opacity: LayerKind::ZoomHighlight.default_opacity(),
        clustered: false,
    }
}

/// Parse stored WKT into line geometry; blank or malformed input skips the
/// record rather than failing the batch.
pub(crate) fn line_geometry(wkt: Option<&str>) -> Option<FeatureGeometry> {
    let rings = parse_rings(wkt?)?;
    if rings.iter().all(|r| r.len() < 2) {
        return None;
    }
    Some(FeatureGeometry::Line(rings))
}

/// Parse stored WKT into polygon geometry.
pub(crate) fn polygon_geometry(wkt: Option<&str>) -> Option<FeatureGeometry> {
    let rings = parse_rings(wkt?)?;
    if rings.iter().all(|r| r.len() < 3) {
        return None;
    }
    Some(FeatureGeometry::Polygon(rings))
}

/// Accumulates the symbol codes a layer actually uses, with their styles.
pub(crate) struct SymbolTable {
    map: FxHashMap<String, Style>,
}

impl SymbolTable {
    pub(crate) fn new() -> Self {
        Self {
            map: FxHashMap::default(),
        }
    }

    pub(crate) fn note(&mut self, code: &str, style: Style) {
        self.map.entry(code.to_string()).or_insert(style);
    }

    pub(crate) fn into_renderer(
        self,
        discriminant_field: &'static str,
        default_style: Style,
    ) -> Renderer {
        let mut symbols: Vec<SymbolEntry> = self
            .map
            .into_iter()
            .map(|(key, style)| SymbolEntry { key, style })
            .collect();
        symbols.sort_by(|a, b| a.key.cmp(&b.key));
        Renderer {
            discriminant_field,
            symbols,
            default_style,
        }
    }
}
