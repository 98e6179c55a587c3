// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Symbology tables: domain codes to visual styles and human labels.
//!
//! Every resolver is total: unknown codes fall back to a defined neutral
//! style and an "Unknown" label, they never fail. The layer projector uses
//! these tables when building feature attribute rows, and the renderer
//! definitions reference the same styles by symbol code.

use gazmap_model::{AsdKind, LogicalStatus, ProvenanceCode, StreetRecordType, StreetState};

/// RGBA colour.
pub type Rgba = [u8; 4];

/// Line rendering pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePattern {
    Solid,
    Dash,
    DashDot,
    /// Point/polygon symbols carry no line pattern.
    None,
}

/// Marker shape for point symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Square,
    Diamond,
}

/// A resolved visual style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub color: Rgba,
    pub line: LinePattern,
    pub marker: Option<MarkerShape>,
    pub width: f32,
}

/// Decoration applied to selected features.
pub const HIGHLIGHT_COLOR: Rgba = [0, 255, 255, 255];

const FALLBACK_COLOR: Rgba = [128, 128, 128, 255];

fn line_style(color: Rgba, line: LinePattern, width: f32, highlighted: bool) -> Style {
    Style {
        color: if highlighted { HIGHLIGHT_COLOR } else { color },
        line,
        marker: None,
        width,
    }
}

fn marker_style(color: Rgba, marker: MarkerShape, highlighted: bool) -> Style {
    Style {
        color: if highlighted { HIGHLIGHT_COLOR } else { color },
        line: LinePattern::None,
        marker: Some(marker),
        width: 1.0,
    }
}

// ---------------------------------------------------------------------------
// Street
// ---------------------------------------------------------------------------

pub fn street_state_label(state: Option<StreetState>) -> &'static str {
    match state {
        Some(StreetState::UnderConstruction) => "Under construction",
        Some(StreetState::Open) => "Open",
        Some(StreetState::PermanentlyClosed) => "Permanently closed",
        Some(StreetState::AddressingOnly) => "For addressing purposes only",
        None => "Unknown",
    }
}

pub fn street_type_label(record_type: StreetRecordType) -> &'static str {
    match record_type {
        StreetRecordType::OfficialDesignated => "Official designated street name",
        StreetRecordType::StreetDescription => "Street description",
        StreetRecordType::NumberedStreet => "Numbered street",
        StreetRecordType::UnofficialName => "Unofficial street description",
        StreetRecordType::LlpgAccess => "Description used for LLPG access",
    }
}

pub fn street_style(state: Option<StreetState>, highlighted: bool) -> Style {
    let (color, pattern) = match state {
        Some(StreetState::UnderConstruction) => ([230, 152, 0, 255], LinePattern::Dash),
        Some(StreetState::Open) => ([51, 102, 204, 255], LinePattern::Solid),
        Some(StreetState::PermanentlyClosed) => ([153, 51, 51, 255], LinePattern::DashDot),
        Some(StreetState::AddressingOnly) => ([102, 153, 102, 255], LinePattern::Dash),
        None => (FALLBACK_COLOR, LinePattern::Solid),
    };
    line_style(color, pattern, 2.0, highlighted)
}

// ---------------------------------------------------------------------------
// Property
// ---------------------------------------------------------------------------

pub fn logical_status_label(status: LogicalStatus) -> &'static str {
    match status {
        LogicalStatus::Approved => "Approved",
        LogicalStatus::Alternative => "Alternative",
        LogicalStatus::Candidate => "Candidate",
        LogicalStatus::Provisional => "Provisional",
        LogicalStatus::Rejected => "Rejected",
        LogicalStatus::Historical => "Historical",
    }
}

/// Top-level BLPU classification label from the first character of the code.
pub fn classification_label(classification: &str) -> &'static str {
    match classification.chars().next() {
        Some('C') => "Commercial",
        Some('L') => "Land",
        Some('M') => "Military",
        Some('P') => "Parent shell",
        Some('R') => "Residential",
        Some('U') => "Unclassified",
        Some('X') => "Dual use",
        Some('Z') => "Object of interest",
        _ => "Unknown",
    }
}

pub fn property_style(status: LogicalStatus, classification: &str, highlighted: bool) -> Style {
    let color = match status {
        LogicalStatus::Approved => [45, 108, 48, 255],
        LogicalStatus::Alternative => [70, 130, 180, 255],
        LogicalStatus::Candidate => [189, 160, 43, 255],
        LogicalStatus::Provisional => [189, 160, 43, 255],
        LogicalStatus::Rejected => [150, 60, 60, 255],
        LogicalStatus::Historical => [110, 110, 110, 255],
    };
    let marker = match classification.chars().next() {
        Some('C') => MarkerShape::Square,
        Some('P') => MarkerShape::Diamond,
        _ => MarkerShape::Circle,
    };
    marker_style(color, marker, highlighted)
}

// ---------------------------------------------------------------------------
// ASD
// ---------------------------------------------------------------------------

pub fn asd_label(kind: AsdKind) -> &'static str {
    match kind {
        AsdKind::Maintenance => "Maintenance responsibility",
        AsdKind::Reinstatement => "Reinstatement category",
        AsdKind::ScottishSpecialDesignation => "Special designation",
        AsdKind::Interest => "Interested organisation",
        AsdKind::Construction => "Construction",
        AsdKind::SpecialDesignation => "Special designation",
        AsdKind::HeightWidthWeight => "Height, width and weight restriction",
        AsdKind::PublicRightOfWay => "Public right of way",
    }
}

pub fn asd_style(kind: AsdKind, highlighted: bool) -> Style {
    let (color, pattern) = match kind {
        AsdKind::Maintenance => ([0, 129, 112, 255], LinePattern::Solid),
        AsdKind::Reinstatement => ([102, 51, 153, 255], LinePattern::Solid),
        AsdKind::ScottishSpecialDesignation => ([170, 85, 0, 255], LinePattern::Dash),
        AsdKind::Interest => ([0, 102, 153, 255], LinePattern::Solid),
        AsdKind::Construction => ([204, 102, 0, 255], LinePattern::Solid),
        AsdKind::SpecialDesignation => ([170, 85, 0, 255], LinePattern::Dash),
        AsdKind::HeightWidthWeight => ([153, 0, 51, 255], LinePattern::DashDot),
        AsdKind::PublicRightOfWay => ([51, 153, 51, 255], LinePattern::Dash),
    };
    line_style(color, pattern, 3.0, highlighted)
}

/// Popup phrasing for the ASD whole-road flag; never the raw boolean.
pub fn whole_road_label(whole_road: bool) -> &'static str {
    if whole_road {
        "Whole road"
    } else {
        "Part of road"
    }
}

// ---------------------------------------------------------------------------
// Provenance
// ---------------------------------------------------------------------------

pub fn provenance_label(code: ProvenanceCode) -> &'static str {
    match code {
        ProvenanceCode::FormalTenancyAgreement => "Formal tenancy agreement",
        ProvenanceCode::UnregisteredLandTitle => "Unregistered land title",
        ProvenanceCode::Occupancy => "Occupancy",
        ProvenanceCode::InferredFromPhysicalFeatures => "Inferred from physical features",
        ProvenanceCode::RentalAgreement => "Rental agreement",
        ProvenanceCode::RegisteredLandTitle => "Registered land title",
        ProvenanceCode::InferredFromUse => "Inferred from use",
    }
}

pub fn provenance_style(code: ProvenanceCode, highlighted: bool) -> Style {
    let color = match code {
        ProvenanceCode::RegisteredLandTitle => [86, 156, 214, 120],
        ProvenanceCode::FormalTenancyAgreement => [120, 170, 120, 120],
        ProvenanceCode::RentalAgreement => [170, 140, 90, 120],
        _ => [140, 140, 170, 120],
    };
    Style {
        color: if highlighted { HIGHLIGHT_COLOR } else { color },
        line: LinePattern::Solid,
        marker: None,
        width: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_codes_have_defined_fallbacks() {
        assert_eq!(street_state_label(None), "Unknown");
        assert_eq!(classification_label(""), "Unknown");
        assert_eq!(classification_label("Q99"), "Unknown");
        let style = street_style(None, false);
        assert_eq!(style.color, FALLBACK_COLOR);
    }

    #[test]
    fn highlighting_overrides_color_only() {
        let plain = asd_style(AsdKind::Interest, false);
        let lit = asd_style(AsdKind::Interest, true);
        assert_eq!(lit.color, HIGHLIGHT_COLOR);
        assert_eq!(plain.line, lit.line);
        assert_eq!(plain.width, lit.width);
    }

    #[test]
    fn whole_road_phrasing() {
        assert_eq!(whole_road_label(true), "Whole road");
        assert_eq!(whole_road_label(false), "Part of road");
    }

    #[test]
    fn every_asd_kind_has_a_label() {
        for kind in AsdKind::ALL {
            assert!(!asd_label(kind).is_empty());
        }
    }
}
