// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Additional Street Data overlay records.
//!
//! ASD rows attach maintenance, designation and restriction attributes to a
//! street, each with its own line geometry. The eight record kinds are a
//! closed set; the numeric wire codes (51..66) never appear in logic outside
//! this module.

use crate::codes::{ChangeFlag, Jurisdiction};
use crate::ids::Usrn;

/// The eight ASD record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AsdKind {
    /// 51, maintenance responsibility (Scottish)
    Maintenance,
    /// 52, reinstatement category (Scottish)
    Reinstatement,
    /// 53, special designation (Scottish)
    ScottishSpecialDesignation,
    /// 61, interest
    Interest,
    /// 62, construction
    Construction,
    /// 63, special designation
    SpecialDesignation,
    /// 64, height, width and weight restriction
    HeightWidthWeight,
    /// 66, public right of way
    PublicRightOfWay,
}

impl AsdKind {
    /// All kinds in wire-code order.
    pub const ALL: [AsdKind; 8] = [
        AsdKind::Maintenance,
        AsdKind::Reinstatement,
        AsdKind::ScottishSpecialDesignation,
        AsdKind::Interest,
        AsdKind::Construction,
        AsdKind::SpecialDesignation,
        AsdKind::HeightWidthWeight,
        AsdKind::PublicRightOfWay,
    ];

    /// Numeric wire code used by the remote API.
    pub fn code(self) -> u8 {
        match self {
            AsdKind::Maintenance => 51,
            AsdKind::Reinstatement => 52,
            AsdKind::ScottishSpecialDesignation => 53,
            AsdKind::Interest => 61,
            AsdKind::Construction => 62,
            AsdKind::SpecialDesignation => 63,
            AsdKind::HeightWidthWeight => 64,
            AsdKind::PublicRightOfWay => 66,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            51 => Some(AsdKind::Maintenance),
            52 => Some(AsdKind::Reinstatement),
            53 => Some(AsdKind::ScottishSpecialDesignation),
            61 => Some(AsdKind::Interest),
            62 => Some(AsdKind::Construction),
            63 => Some(AsdKind::SpecialDesignation),
            64 => Some(AsdKind::HeightWidthWeight),
            66 => Some(AsdKind::PublicRightOfWay),
            _ => None,
        }
    }

    /// Whether this record kind is legal for the given jurisdiction.
    ///
    /// Scottish authorities maintain the 51/52/53 overlays; English and Welsh
    /// authorities the 61/62/63/64/66 set.
    pub fn legal_in(self, jurisdiction: Jurisdiction) -> bool {
        match jurisdiction {
            Jurisdiction::Scotland => matches!(
                self,
                AsdKind::Maintenance
                    | AsdKind::Reinstatement
                    | AsdKind::ScottishSpecialDesignation
            ),
            Jurisdiction::EnglandWales => matches!(
                self,
                AsdKind::Interest
                    | AsdKind::Construction
                    | AsdKind::SpecialDesignation
                    | AsdKind::HeightWidthWeight
                    | AsdKind::PublicRightOfWay
            ),
        }
    }
}

/// One ASD overlay row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AsdRecord {
    pub kind: AsdKind,
    /// Sequence number unique within (usrn, kind).
    pub seq: u32,
    pub usrn: Usrn,
    /// True when the record applies to the whole street rather than a part.
    pub whole_road: bool,
    /// Organisation responsible for the record (SWA-style authority code).
    pub authority_code: Option<i64>,
    /// Kind-specific detail code (designation type, construction type, ...).
    pub detail_code: Option<i32>,
    /// LINESTRING WKT; `None` for whole-road records, which inherit the
    /// street's own geometry.
    pub wkt: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub change: ChangeFlag,
}

impl AsdRecord {
    /// Whether this row contributes geometry to a render pass.
    ///
    /// Whole-road rows are displayable without their own geometry because
    /// the projector substitutes the street's ESU geometry.
    pub fn is_displayable(&self) -> bool {
        if !self.change.is_displayable() {
            return false;
        }
        self.whole_road || self.wkt.as_deref().is_some_and(|w| !w.trim().is_empty())
    }
}
