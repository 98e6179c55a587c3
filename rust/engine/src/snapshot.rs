// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inbound domain snapshot.
//!
//! The surrounding application owns the canonical collections; the engine
//! receives them as a read-only snapshot on each render pass and never
//! mutates them. Everything the engine sends back travels as events.

use crate::layers::LayerKind;
use gazmap_model::{
    AsdKind, Esu, EsuId, ExtentKey, Jurisdiction, Property, ProvenanceExtent, Street, Uprn, Usrn,
};

/// The single object currently designated for digitizing.
///
/// The numeric object-type codes of the wire protocol (13/21/22/51..66) are
/// available via [`EditTarget::object_type_code`]; logic always matches on
/// the variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Esu(EsuId),
    Blpu(Uprn),
    Extent(ExtentKey),
    Asd { kind: AsdKind, usrn: Usrn, seq: u32 },
}

/// Edit-right family an edit target belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditFamily {
    Street,
    Property,
    Asd,
}

impl EditTarget {
    /// Wire object-type code.
    pub fn object_type_code(&self) -> u8 {
        match self {
            EditTarget::Esu(_) => 13,
            EditTarget::Blpu(_) => 21,
            EditTarget::Extent(_) => 22,
            EditTarget::Asd { kind, .. } => kind.code(),
        }
    }

    /// The permission family gating the digitizing tool.
    pub fn family(&self) -> EditFamily {
        match self {
            EditTarget::Esu(_) => EditFamily::Street,
            EditTarget::Blpu(_) | EditTarget::Extent(_) => EditFamily::Property,
            EditTarget::Asd { .. } => EditFamily::Asd,
        }
    }

    /// The layer that renders this object, dimmed to half rather than
    /// quarter opacity while editing.
    pub fn target_layer(&self) -> LayerKind {
        match self {
            EditTarget::Esu(_) => LayerKind::Street,
            EditTarget::Blpu(_) => LayerKind::Property,
            EditTarget::Extent(_) => LayerKind::Extent,
            EditTarget::Asd { kind, .. } => LayerKind::Asd(*kind),
        }
    }

    /// Direct sibling of the target layer, kept at half opacity.
    pub fn sibling_layer(&self) -> Option<LayerKind> {
        match self {
            EditTarget::Esu(_) => Some(LayerKind::LlpgStreet),
            EditTarget::Blpu(_) => Some(LayerKind::BackgroundProperties),
            EditTarget::Extent(_) => Some(LayerKind::BackgroundProvenance),
            EditTarget::Asd { .. } => Some(LayerKind::Street),
        }
    }
}

/// What a map click currently captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointCaptureMode {
    #[default]
    None,
    PropertyPoint,
    StreetStart,
    StreetEnd,
    DivideEsu,
    AssignEsu,
}

/// Where the surrounding application wants the view zoomed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomTarget {
    Street(Usrn),
    Property(Uprn),
}

/// Highlight request pushed down by the surrounding application, e.g. when
/// hovering a record list row.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightRequest {
    pub kind: crate::events::HighlightKind,
    pub ids: Vec<String>,
}

/// Read-only snapshot of the surrounding application's state.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub streets: Vec<Street>,
    pub llpg_streets: Vec<Street>,
    pub properties: Vec<Property>,
    pub extents: Vec<ProvenanceExtent>,

    pub background_streets: Vec<Street>,
    pub unassigned_esus: Vec<Esu>,
    pub background_properties: Vec<Property>,
    pub background_extents: Vec<ProvenanceExtent>,

    /// USRN of the street record currently open in the editor; gates ASD
    /// overlay materialization.
    pub open_street: Option<Usrn>,
    /// Object currently designated for digitizing.
    pub editing: Option<EditTarget>,
    pub zoom_to: Option<ZoomTarget>,
    pub highlight_request: Option<HighlightRequest>,
    pub point_capture: PointCaptureMode,
    pub jurisdiction: Option<Jurisdiction>,
}

impl Snapshot {
    /// Find an ESU across foreground streets and the unassigned set.
    pub fn find_esu(&self, id: EsuId) -> Option<&Esu> {
        self.streets
            .iter()
            .flat_map(|s| s.esus.iter())
            .chain(self.unassigned_esus.iter())
            .find(|e| e.id == id)
    }

    pub fn find_property(&self, uprn: Uprn) -> Option<&Property> {
        self.properties.iter().find(|p| p.uprn == uprn)
    }

    pub fn find_extent(&self, key: ExtentKey) -> Option<&ProvenanceExtent> {
        self.extents.iter().find(|e| e.key == key)
    }

    pub fn find_asd(&self, kind: AsdKind, usrn: Usrn, seq: u32) -> Option<&gazmap_model::AsdRecord> {
        self.streets
            .iter()
            .filter(|s| s.usrn == usrn)
            .flat_map(|s| s.asd.iter())
            .find(|a| a.kind == kind && a.seq == seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_type_codes_match_wire_protocol() {
        assert_eq!(EditTarget::Esu(EsuId(1)).object_type_code(), 13);
        assert_eq!(EditTarget::Blpu(Uprn(1)).object_type_code(), 21);
        assert_eq!(EditTarget::Extent(ExtentKey(1)).object_type_code(), 22);
        assert_eq!(
            EditTarget::Asd {
                kind: AsdKind::PublicRightOfWay,
                usrn: Usrn(1),
                seq: 1
            }
            .object_type_code(),
            66
        );
    }

    #[test]
    fn families_gate_the_right_permission() {
        assert_eq!(EditTarget::Esu(EsuId(1)).family(), EditFamily::Street);
        assert_eq!(EditTarget::Blpu(Uprn(1)).family(), EditFamily::Property);
        assert_eq!(
            EditTarget::Extent(ExtentKey(1)).family(),
            EditFamily::Property
        );
        assert_eq!(
            EditTarget::Asd {
                kind: AsdKind::Construction,
                usrn: Usrn(1),
                seq: 1
            }
            .family(),
            EditFamily::Asd
        );
    }
}
