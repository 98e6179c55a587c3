// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recording fake of the map surface plus snapshot builders shared by the
//! integration suites.
#![allow(dead_code)]

use gazmap_engine::{
    CreateTool, EditGraphic, LayerDef, LayerKind, MapSurface, RecordEditingPort, UserRightsPort,
};
use gazmap_model::{
    AsdKind, AsdRecord, ChangeFlag, Esu, EsuId, Language, LogicalStatus, Lpi, Property, Street,
    StreetDescriptor, StreetRecordType, StreetState, Uprn, Usrn,
};
use smallvec::smallvec;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One recorded surface mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    AddLayer(LayerKind, usize),
    RemoveLayer(LayerKind),
    CreateEditOverlay,
    SetEditGraphic(Option<(usize, bool)>),
    SetVisibility(LayerKind, bool),
    SetOpacity(LayerKind, f64),
    SetPopups(LayerKind, bool),
    SetOrder(Vec<LayerKind>),
    SetHighlight(LayerKind, Vec<String>),
    ClearHighlight(LayerKind),
    ArmCreateTool(CreateTool),
    DisarmTool,
    SetToolVisible(bool),
    SetSnapLayers(Vec<LayerKind>),
    Destroy,
}

#[derive(Default)]
pub struct SurfaceState {
    pub calls: Vec<Call>,
    /// Feature ids per live layer, for highlight queries.
    pub features: HashMap<LayerKind, Vec<String>>,
    pub loaded: bool,
}

impl SurfaceState {
    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn last_order(&self) -> Option<&Vec<LayerKind>> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::SetOrder(order) => Some(order),
            _ => None,
        })
    }

    pub fn has_layer(&self, kind: LayerKind) -> bool {
        self.features.contains_key(&kind)
    }
}

/// A `MapSurface` that records every call and shares its state with the
/// test via `Rc`.
pub struct RecordingSurface {
    pub state: Rc<RefCell<SurfaceState>>,
}

impl RecordingSurface {
    pub fn new() -> (Self, Rc<RefCell<SurfaceState>>) {
        let state = Rc::new(RefCell::new(SurfaceState {
            loaded: true,
            ..SurfaceState::default()
        }));
        (
            Self {
                state: Rc::clone(&state),
            },
            state,
        )
    }
}

impl MapSurface for RecordingSurface {
    fn is_ready(&self) -> bool {
        true
    }

    fn add_layer(&mut self, def: &LayerDef) {
        let mut state = self.state.borrow_mut();
        let ids: Vec<String> = def.features.iter().map(|f| f.id.clone()).collect();
        state.calls.push(Call::AddLayer(def.kind, ids.len()));
        state.features.insert(def.kind, ids);
    }

    fn remove_layer(&mut self, kind: LayerKind) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::RemoveLayer(kind));
        state.features.remove(&kind);
    }

    fn create_edit_overlay(&mut self) {
        self.state.borrow_mut().calls.push(Call::CreateEditOverlay);
    }

    fn set_edit_graphic(&mut self, graphic: Option<EditGraphic>) {
        self.state
            .borrow_mut()
            .calls
            .push(Call::SetEditGraphic(graphic.map(|g| (g.rings.len(), g.valid))));
    }

    fn set_visibility(&mut self, kind: LayerKind, visible: bool) {
        self.state
            .borrow_mut()
            .calls
            .push(Call::SetVisibility(kind, visible));
    }

    fn set_opacity(&mut self, kind: LayerKind, opacity: f64) {
        self.state
            .borrow_mut()
            .calls
            .push(Call::SetOpacity(kind, opacity));
    }

    fn set_popups_enabled(&mut self, kind: LayerKind, enabled: bool) {
        self.state
            .borrow_mut()
            .calls
            .push(Call::SetPopups(kind, enabled));
    }

    fn set_layer_order(&mut self, bottom_to_top: &[LayerKind]) {
        self.state
            .borrow_mut()
            .calls
            .push(Call::SetOrder(bottom_to_top.to_vec()));
    }

    fn layer_loaded(&self, _kind: LayerKind) -> bool {
        self.state.borrow().loaded
    }

    fn query_feature_ids(&self, kind: LayerKind, ids: &[String]) -> Vec<String> {
        let state = self.state.borrow();
        let Some(present) = state.features.get(&kind) else {
            return Vec::new();
        };
        ids.iter().filter(|id| present.contains(id)).cloned().collect()
    }

    fn set_highlight(&mut self, kind: LayerKind, ids: &[String]) {
        self.state
            .borrow_mut()
            .calls
            .push(Call::SetHighlight(kind, ids.to_vec()));
    }

    fn clear_highlight(&mut self, kind: LayerKind) {
        self.state.borrow_mut().calls.push(Call::ClearHighlight(kind));
    }

    fn arm_create_tool(&mut self, tool: CreateTool) {
        self.state.borrow_mut().calls.push(Call::ArmCreateTool(tool));
    }

    fn disarm_tool(&mut self) {
        self.state.borrow_mut().calls.push(Call::DisarmTool);
    }

    fn set_tool_visible(&mut self, visible: bool) {
        self.state
            .borrow_mut()
            .calls
            .push(Call::SetToolVisible(visible));
    }

    fn set_snap_layers(&mut self, kinds: &[LayerKind]) {
        self.state
            .borrow_mut()
            .calls
            .push(Call::SetSnapLayers(kinds.to_vec()));
    }

    fn destroy(&mut self) {
        self.state.borrow_mut().calls.push(Call::Destroy);
    }
}

/// All rights granted, verbose logging off.
pub struct FullRights;

impl UserRightsPort for FullRights {
    fn can_edit_street(&self) -> bool {
        true
    }
    fn can_edit_property(&self) -> bool {
        true
    }
    fn can_edit_asd(&self) -> bool {
        true
    }
    fn verbose_logging(&self) -> bool {
        false
    }
}

/// No edit rights at all.
pub struct ReadOnlyRights;

impl UserRightsPort for ReadOnlyRights {
    fn can_edit_street(&self) -> bool {
        false
    }
    fn can_edit_property(&self) -> bool {
        false
    }
    fn can_edit_asd(&self) -> bool {
        false
    }
    fn verbose_logging(&self) -> bool {
        false
    }
}

pub struct CleanRecords;

impl RecordEditingPort for CleanRecords {
    fn has_unsaved_changes(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Domain builders
// ---------------------------------------------------------------------------

pub fn esu(id: i64, wkt: &str) -> Esu {
    Esu {
        id: EsuId(id),
        state: Some(StreetState::Open),
        wkt: Some(wkt.to_string()),
        change: ChangeFlag::Unchanged,
    }
}

pub fn esu_without_geometry(id: i64) -> Esu {
    Esu {
        id: EsuId(id),
        state: Some(StreetState::Open),
        wkt: None,
        change: ChangeFlag::Unchanged,
    }
}

pub fn street(usrn: i64, esus: Vec<Esu>) -> Street {
    Street {
        usrn: Usrn(usrn),
        record_type: StreetRecordType::OfficialDesignated,
        state: Some(StreetState::Open),
        descriptors: smallvec![StreetDescriptor {
            language: Language::Eng,
            text: "HIGH STREET".into(),
            locality: None,
            town: Some("ANYTOWN".into()),
        }],
        esus,
        asd: Vec::new(),
    }
}

pub fn asd_record(kind: AsdKind, usrn: i64, seq: u32, whole_road: bool, wkt: Option<&str>) -> AsdRecord {
    AsdRecord {
        kind,
        seq,
        usrn: Usrn(usrn),
        whole_road,
        authority_code: Some(4605),
        detail_code: Some(1),
        wkt: wkt.map(str::to_string),
        change: ChangeFlag::Unchanged,
    }
}

pub fn property(uprn: i64, status: LogicalStatus) -> Property {
    Property {
        uprn: Uprn(uprn),
        parent_uprn: None,
        easting: 431813.5,
        northing: 289231.25,
        logical_status: status,
        classification: "RD04".into(),
        lpis: smallvec![Lpi {
            language: Language::Eng,
            logical_status: status,
            address: "1 HIGH STREET, ANYTOWN".into(),
            postcode: Some("AN1 1AA".into()),
        }],
    }
}

// ---------------------------------------------------------------------------
// Reference file builders (stored-method ZIP, no compression needed)
// ---------------------------------------------------------------------------

/// Minimal valid shapefile holding a single point record.
pub fn point_shapefile() -> Vec<u8> {
    let mut record = Vec::new();
    record.extend_from_slice(&1i32.to_le_bytes());
    record.extend_from_slice(&431813.5f64.to_le_bytes());
    record.extend_from_slice(&289231.25f64.to_le_bytes());

    let mut buf = Vec::new();
    buf.extend_from_slice(&9994i32.to_be_bytes());
    buf.extend_from_slice(&[0u8; 20]);
    let total = 100 + 8 + record.len();
    buf.extend_from_slice(&((total / 2) as i32).to_be_bytes());
    buf.extend_from_slice(&1000i32.to_le_bytes());
    buf.extend_from_slice(&1i32.to_le_bytes());
    for v in [0.0f64, 0.0, 500000.0, 500000.0] {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    buf.extend_from_slice(&[0u8; 32]);
    buf.extend_from_slice(&1i32.to_be_bytes());
    buf.extend_from_slice(&((record.len() / 2) as i32).to_be_bytes());
    buf.extend_from_slice(&record);
    buf
}

/// Wrap members into a stored-method ZIP archive.
pub fn zip_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut buf = Vec::new();
    for (name, data) in entries {
        buf.extend_from_slice(&0x0403_4b50u32.to_le_bytes());
        buf.extend_from_slice(&20u16.to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes()); // stored
        buf.extend_from_slice(&[0u8; 8]);
        buf.extend_from_slice(&(data.len() as u32).to_le_bytes());
        buf.extend_from_slice(&(data.len() as u32).to_le_bytes());
        buf.extend_from_slice(&(name.len() as u16).to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes());
        buf.extend_from_slice(name.as_bytes());
        buf.extend_from_slice(data);
    }
    buf
}
