// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ASD overlay projection: one layer per sub-type present.
//!
//! Overlays are materialized only for the street currently open for editing
//! or a newly created street, and only for the record kinds the configured
//! jurisdiction legalizes. Whole-road records have no geometry of their own
//! and inherit the street's ESU lines.

use super::{line_geometry, SymbolTable};
use crate::actions::ActionId;
use crate::feature::{Feature, FeatureGeometry, FieldDef, LayerDef, PopupSpec};
use crate::layers::LayerKind;
use crate::snapshot::Snapshot;
use crate::symbology::{asd_label, asd_style, whole_road_label};
use gazmap_model::{AsdKind, Street};

const ASD_FIELDS: &[FieldDef] = &[
    FieldDef { name: "usrn", alias: "USRN" },
    FieldDef { name: "seq", alias: "Record" },
    FieldDef { name: "kind", alias: "Record type" },
    FieldDef { name: "wholeRoad", alias: "Whole road / Part of road" },
    FieldDef { name: "authority", alias: "Authority" },
    FieldDef { name: "symbolCode", alias: "Symbol" },
];

/// Whether this street's ASD overlays should render at all.
fn asd_materialized(street: &Street, snapshot: &Snapshot) -> bool {
    street.is_new() || snapshot.open_street == Some(street.usrn)
}

/// Geometry for one ASD record: its own line, or the street's ESUs for a
/// whole-road record.
fn asd_geometry(record: &gazmap_model::AsdRecord, street: &Street) -> Option<FeatureGeometry> {
    if let Some(geometry) = line_geometry(record.wkt.as_deref()) {
        return Some(geometry);
    }
    if !record.whole_road {
        return None;
    }
    let parts: Vec<Vec<[f64; 2]>> = street
        .displayable_esus()
        .filter_map(|esu| line_geometry(esu.wkt.as_deref()))
        .flat_map(|g| match g {
            FeatureGeometry::Line(parts) => parts,
            _ => Vec::new(),
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(FeatureGeometry::Line(parts))
    }
}

/// One layer per ASD kind that has displayable records.
pub fn asd_layers(snapshot: &Snapshot) -> Vec<LayerDef> {
    let mut layers = Vec::new();
    for kind in AsdKind::ALL {
        if let Some(jurisdiction) = snapshot.jurisdiction {
            if !kind.legal_in(jurisdiction) {
                continue;
            }
        }

        let mut symbols = SymbolTable::new();
        let mut features = Vec::new();
        for street in snapshot
            .streets
            .iter()
            .filter(|s| asd_materialized(s, snapshot))
        {
            for record in street
                .asd
                .iter()
                .filter(|r| r.kind == kind && r.is_displayable())
            {
                let Some(geometry) = asd_geometry(record, street) else {
                    continue;
                };
                let symbol_code =
                    format!("{}_{}", kind.code(), record.detail_code.unwrap_or(0));
                symbols.note(&symbol_code, asd_style(kind, false));
                features.push(
                    Feature::new(format!("{}|{}|{}", kind.code(), street.usrn, record.seq), geometry)
                        .with_attr("usrn", street.usrn.value())
                        .with_attr("seq", record.seq)
                        .with_attr("kind", asd_label(kind))
                        .with_attr("wholeRoad", whole_road_label(record.whole_road))
                        .with_attr(
                            "authority",
                            record.authority_code.map(|c| c.to_string()).unwrap_or_default(),
                        )
                        .with_attr("symbolCode", symbol_code),
                );
            }
        }

        layers.push(LayerDef {
            kind: LayerKind::Asd(kind),
            features,
            fields: ASD_FIELDS.to_vec(),
            renderer: symbols.into_renderer("symbolCode", asd_style(kind, false)),
            popup: Some(PopupSpec {
                title_field: "kind",
                fields: ASD_FIELDS.to_vec(),
                actions: vec![ActionId::OpenAsdRecord(kind)],
            }),
            opacity: LayerKind::Asd(kind).default_opacity(),
            clustered: false,
        });
    }
    layers
}
