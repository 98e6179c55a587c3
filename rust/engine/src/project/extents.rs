// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Provenance extent layer projection.

use super::{polygon_geometry, SymbolTable};
use crate::feature::{Feature, FieldDef, LayerDef, PopupSpec};
use crate::layers::LayerKind;
use crate::snapshot::Snapshot;
use crate::symbology::{provenance_label, provenance_style};
use gazmap_model::{ExtentKey, ProvenanceCode, ProvenanceExtent};
use rustc_hash::FxHashSet;

const EXTENT_FIELDS: &[FieldDef] = &[
    FieldDef { name: "uprn", alias: "UPRN" },
    FieldDef { name: "provenance", alias: "Provenance" },
    FieldDef { name: "symbolCode", alias: "Symbol" },
];

fn extent_features(rows: &[&ProvenanceExtent], symbols: &mut SymbolTable) -> Vec<Feature> {
    let mut features = Vec::with_capacity(rows.len());
    for extent in rows {
        let Some(geometry) = polygon_geometry(extent.wkt.as_deref()) else {
            continue;
        };
        let symbol_code = extent.code.code().to_string();
        symbols.note(&symbol_code, provenance_style(extent.code, false));
        features.push(
            Feature::new(extent.selection_token(), geometry)
                .with_attr("uprn", extent.uprn.value())
                .with_attr("provenance", provenance_label(extent.code))
                .with_attr("symbolCode", symbol_code),
        );
    }
    features
}

fn make_layer(kind: LayerKind, rows: Vec<&ProvenanceExtent>) -> LayerDef {
    let mut symbols = SymbolTable::new();
    let features = extent_features(&rows, &mut symbols);
    LayerDef {
        kind,
        features,
        fields: EXTENT_FIELDS.to_vec(),
        renderer: symbols.into_renderer(
            "symbolCode",
            provenance_style(ProvenanceCode::Occupancy, false),
        ),
        popup: Some(PopupSpec {
            title_field: "provenance",
            fields: EXTENT_FIELDS.to_vec(),
            actions: vec![],
        }),
        opacity: kind.default_opacity(),
        clustered: false,
    }
}

/// Extents of the record currently open for editing.
pub fn extent_layer(snapshot: &Snapshot) -> LayerDef {
    let rows: Vec<&ProvenanceExtent> = snapshot
        .extents
        .iter()
        .filter(|e| e.is_displayable())
        .collect();
    make_layer(LayerKind::Extent, rows)
}

/// Background provenance, excluding extents the foreground layer shows.
pub fn background_provenance_layer(snapshot: &Snapshot) -> LayerDef {
    let foreground: FxHashSet<ExtentKey> = snapshot.extents.iter().map(|e| e.key).collect();
    let rows: Vec<&ProvenanceExtent> = snapshot
        .background_extents
        .iter()
        .filter(|e| e.is_displayable() && !foreground.contains(&e.key))
        .collect();
    make_layer(LayerKind::BackgroundProvenance, rows)
}
