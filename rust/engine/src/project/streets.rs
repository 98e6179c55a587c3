// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Street layer projection: foreground, LLPG-only, background, unassigned.

use super::{line_geometry, SymbolTable};
use crate::actions::ActionId;
use crate::feature::{Feature, FieldDef, LayerDef, PopupSpec};
use crate::layers::LayerKind;
use crate::ports::UserRightsPort;
use crate::snapshot::{Snapshot, ZoomTarget};
use crate::symbology::{street_state_label, street_style, street_type_label};
use gazmap_model::{title_case, Street, Usrn};
use rustc_hash::FxHashSet;

const STREET_FIELDS: &[FieldDef] = &[
    FieldDef { name: "usrn", alias: "USRN" },
    FieldDef { name: "esuId", alias: "ESU" },
    FieldDef { name: "description", alias: "Description" },
    FieldDef { name: "state", alias: "State" },
    FieldDef { name: "recordType", alias: "Type" },
    FieldDef { name: "symbolCode", alias: "Symbol" },
];

fn street_popup(rights: &dyn UserRightsPort) -> PopupSpec {
    let mut actions = vec![ActionId::OpenStreetRecord, ActionId::StreetStreetView];
    if rights.can_edit_street() {
        actions.push(ActionId::DivideEsu);
        actions.push(ActionId::AssignEsu);
    }
    if rights.can_edit_property() {
        actions.push(ActionId::AddProperty);
        actions.push(ActionId::AddRangeProperties);
    }
    PopupSpec {
        title_field: "description",
        fields: STREET_FIELDS.to_vec(),
        actions,
    }
}

/// One feature per displayable ESU of the street.
fn street_features(street: &Street, symbols: &mut SymbolTable, features: &mut Vec<Feature>) {
    let description = street
        .english_descriptor()
        .map(|d| title_case(&d.text))
        .unwrap_or_default();
    let state_code = street.state.map(|s| s.code()).unwrap_or(0);
    let symbol_code = format!("{}{}", street.record_type.code(), state_code);

    for esu in street.displayable_esus() {
        let Some(geometry) = line_geometry(esu.wkt.as_deref()) else {
            continue;
        };
        symbols.note(&symbol_code, street_style(street.state, false));
        features.push(
            Feature::new(esu.id.to_string(), geometry)
                .with_attr("usrn", street.usrn.value())
                .with_attr("esuId", esu.id.value())
                .with_attr("description", description.clone())
                .with_attr("state", street_state_label(street.state))
                .with_attr("recordType", street_type_label(street.record_type))
                .with_attr("symbolCode", symbol_code.clone()),
        );
    }
}

/// The street currently owned by the zoom-highlight overlay, if any.
fn zoomed_street(snapshot: &Snapshot) -> Option<Usrn> {
    match snapshot.zoom_to {
        Some(ZoomTarget::Street(usrn)) => Some(usrn),
        _ => None,
    }
}

/// USRNs already claimed by a foreground layer, including the zoomed street.
fn foreground_usrns(snapshot: &Snapshot) -> FxHashSet<Usrn> {
    let mut usrns: FxHashSet<Usrn> = snapshot
        .streets
        .iter()
        .chain(snapshot.llpg_streets.iter())
        .map(|s| s.usrn)
        .collect();
    usrns.extend(zoomed_street(snapshot));
    usrns
}

/// Currently open streets, excluding the LLPG-only record type and the
/// street the zoom-highlight overlay already shows.
pub fn foreground_street_layer(snapshot: &Snapshot, rights: &dyn UserRightsPort) -> LayerDef {
    let zoomed = zoomed_street(snapshot);
    let mut symbols = SymbolTable::new();
    let mut features = Vec::new();
    for street in snapshot
        .streets
        .iter()
        .filter(|s| !s.record_type.is_llpg_only() && Some(s.usrn) != zoomed)
    {
        street_features(street, &mut symbols, &mut features);
    }
    LayerDef {
        kind: LayerKind::Street,
        features,
        fields: STREET_FIELDS.to_vec(),
        renderer: symbols.into_renderer("symbolCode", street_style(None, false)),
        popup: Some(street_popup(rights)),
        opacity: LayerKind::Street.default_opacity(),
        clustered: false,
    }
}

/// Type-9 (LLPG access) streets on their own layer.
pub fn llpg_street_layer(snapshot: &Snapshot, rights: &dyn UserRightsPort) -> LayerDef {
    let zoomed = zoomed_street(snapshot);
    let mut symbols = SymbolTable::new();
    let mut features = Vec::new();
    for street in snapshot
        .streets
        .iter()
        .filter(|s| s.record_type.is_llpg_only())
        .chain(snapshot.llpg_streets.iter())
        .filter(|s| Some(s.usrn) != zoomed)
    {
        street_features(street, &mut symbols, &mut features);
    }
    LayerDef {
        kind: LayerKind::LlpgStreet,
        features,
        fields: STREET_FIELDS.to_vec(),
        renderer: symbols.into_renderer("symbolCode", street_style(None, false)),
        popup: Some(street_popup(rights)),
        opacity: LayerKind::LlpgStreet.default_opacity(),
        clustered: false,
    }
}

/// Streets not open for editing, excluding any USRN a foreground layer
/// already shows.
pub fn background_street_layer(snapshot: &Snapshot) -> LayerDef {
    let excluded = foreground_usrns(snapshot);
    let mut symbols = SymbolTable::new();
    let mut features = Vec::new();
    for street in snapshot
        .background_streets
        .iter()
        .filter(|s| !excluded.contains(&s.usrn))
    {
        street_features(street, &mut symbols, &mut features);
    }
    LayerDef {
        kind: LayerKind::BackgroundStreets,
        features,
        fields: STREET_FIELDS.to_vec(),
        renderer: symbols.into_renderer("symbolCode", street_style(None, false)),
        popup: Some(PopupSpec {
            title_field: "description",
            fields: STREET_FIELDS.to_vec(),
            actions: vec![ActionId::OpenStreetRecord, ActionId::StreetStreetView],
        }),
        opacity: LayerKind::BackgroundStreets.default_opacity(),
        clustered: false,
    }
}

const UNASSIGNED_FIELDS: &[FieldDef] = &[
    FieldDef { name: "esuId", alias: "ESU" },
    FieldDef { name: "state", alias: "State" },
    FieldDef { name: "symbolCode", alias: "Symbol" },
];

/// ESUs owned by no street.
pub fn unassigned_esu_layer(snapshot: &Snapshot) -> LayerDef {
    let mut symbols = SymbolTable::new();
    let mut features = Vec::new();
    for esu in snapshot.unassigned_esus.iter().filter(|e| e.is_displayable()) {
        let Some(geometry) = line_geometry(esu.wkt.as_deref()) else {
            continue;
        };
        let symbol_code = format!("u{}", esu.state.map(|s| s.code()).unwrap_or(0));
        symbols.note(&symbol_code, street_style(esu.state, false));
        features.push(
            Feature::new(esu.id.to_string(), geometry)
                .with_attr("esuId", esu.id.value())
                .with_attr("state", street_state_label(esu.state))
                .with_attr("symbolCode", symbol_code),
        );
    }
    LayerDef {
        kind: LayerKind::UnassignedEsus,
        features,
        fields: UNASSIGNED_FIELDS.to_vec(),
        renderer: symbols.into_renderer("symbolCode", street_style(None, false)),
        popup: Some(PopupSpec {
            title_field: "esuId",
            fields: UNASSIGNED_FIELDS.to_vec(),
            actions: vec![ActionId::AssignEsu],
        }),
        opacity: LayerKind::UnassignedEsus.default_opacity(),
        clustered: false,
    }
}
