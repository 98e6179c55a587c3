// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property layer projection.
//!
//! A UPRN may arrive as several rows (cross-language LPIs, result merges);
//! clustering layers display one feature per UPRN carrying the numerically
//! lowest logical status among its rows.

use super::SymbolTable;
use crate::actions::ActionId;
use crate::feature::{Feature, FeatureGeometry, FieldDef, LayerDef, PopupSpec};
use crate::layers::LayerKind;
use crate::ports::UserRightsPort;
use crate::snapshot::{Snapshot, ZoomTarget};
use crate::symbology::{classification_label, logical_status_label, property_style};
use gazmap_model::{LogicalStatus, Property, Uprn};
use rustc_hash::{FxHashMap, FxHashSet};

const PROPERTY_FIELDS: &[FieldDef] = &[
    FieldDef { name: "uprn", alias: "UPRN" },
    FieldDef { name: "address", alias: "Address" },
    FieldDef { name: "postcode", alias: "Postcode" },
    FieldDef { name: "logicalStatus", alias: "Status" },
    FieldDef { name: "classification", alias: "Classification" },
    FieldDef { name: "displayStatus", alias: "Display status" },
    FieldDef { name: "symbolCode", alias: "Symbol" },
];

fn property_popup(rights: &dyn UserRightsPort) -> PopupSpec {
    let mut actions = vec![ActionId::OpenPropertyRecord, ActionId::PropertyStreetView];
    if rights.can_edit_property() {
        actions.push(ActionId::AddChild);
        actions.push(ActionId::AddRangeChildren);
    }
    PopupSpec {
        title_field: "address",
        fields: PROPERTY_FIELDS.to_vec(),
        actions,
    }
}

/// Group rows by UPRN, keeping the representative with the lowest display
/// logical status (the "most live" row wins).
fn dedup_by_display_status(rows: &[Property]) -> Vec<&Property> {
    let mut best: FxHashMap<Uprn, &Property> = FxHashMap::default();
    for row in rows {
        best.entry(row.uprn)
            .and_modify(|current| {
                if row.display_logical_status() < current.display_logical_status() {
                    *current = row;
                }
            })
            .or_insert(row);
    }
    let mut out: Vec<&Property> = best.into_values().collect();
    out.sort_by_key(|p| p.uprn);
    out
}

fn property_features(rows: &[&Property], symbols: &mut SymbolTable) -> Vec<Feature> {
    let mut features = Vec::with_capacity(rows.len());
    for property in rows {
        let display_status = property.display_logical_status();
        let class_initial = property.classification.chars().next().unwrap_or('U');
        let symbol_code = format!("{}{class_initial}", display_status.code());
        symbols.note(
            &symbol_code,
            property_style(display_status, &property.classification, false),
        );
        features.push(
            Feature::new(
                property.uprn.to_string(),
                FeatureGeometry::Point(property.position()),
            )
            .with_attr("uprn", property.uprn.value())
            .with_attr("address", property.display_address().unwrap_or_default())
            .with_attr(
                "postcode",
                property
                    .lpis
                    .iter()
                    .find_map(|l| l.postcode.clone())
                    .unwrap_or_default(),
            )
            .with_attr("logicalStatus", logical_status_label(property.logical_status))
            .with_attr(
                "classification",
                classification_label(&property.classification),
            )
            .with_attr("displayStatus", display_status.code())
            .with_attr("symbolCode", symbol_code),
        );
    }
    features
}

fn foreground_uprns(snapshot: &Snapshot) -> FxHashSet<Uprn> {
    let mut uprns: FxHashSet<Uprn> = snapshot.properties.iter().map(|p| p.uprn).collect();
    if let Some(ZoomTarget::Property(uprn)) = snapshot.zoom_to {
        uprns.insert(uprn);
    }
    uprns
}

/// Properties of the currently open street/record set, excluding the one
/// the zoom-highlight overlay already shows.
pub fn property_layer(
    snapshot: &Snapshot,
    rights: &dyn UserRightsPort,
    clustered: bool,
) -> LayerDef {
    let zoomed = match snapshot.zoom_to {
        Some(ZoomTarget::Property(uprn)) => Some(uprn),
        _ => None,
    };
    let mut rows = dedup_by_display_status(&snapshot.properties);
    rows.retain(|p| Some(p.uprn) != zoomed);
    let mut symbols = SymbolTable::new();
    let features = property_features(&rows, &mut symbols);
    LayerDef {
        kind: LayerKind::Property,
        features,
        fields: PROPERTY_FIELDS.to_vec(),
        renderer: symbols
            .into_renderer("symbolCode", property_style(LogicalStatus::Approved, "", false)),
        popup: Some(property_popup(rights)),
        opacity: LayerKind::Property.default_opacity(),
        clustered,
    }
}

/// Properties not open for editing, excluding UPRNs a foreground layer
/// already shows.
pub fn background_property_layer(
    snapshot: &Snapshot,
    rights: &dyn UserRightsPort,
    clustered: bool,
) -> LayerDef {
    let excluded = foreground_uprns(snapshot);
    let rows: Vec<Property> = snapshot
        .background_properties
        .iter()
        .filter(|p| !excluded.contains(&p.uprn))
        .cloned()
        .collect();
    let rows = dedup_by_display_status(&rows);
    let mut symbols = SymbolTable::new();
    let features = property_features(&rows, &mut symbols);
    LayerDef {
        kind: LayerKind::BackgroundProperties,
        features,
        fields: PROPERTY_FIELDS.to_vec(),
        renderer: symbols
            .into_renderer("symbolCode", property_style(LogicalStatus::Approved, "", false)),
        popup: Some(property_popup(rights)),
        opacity: LayerKind::BackgroundProperties.default_opacity(),
        clustered,
    }
}
