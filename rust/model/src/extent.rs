// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BLPU provenance extent records.

use crate::codes::ChangeFlag;
use crate::ids::{ExtentKey, Uprn};

/// Provenance code: the evidentiary basis for a property's extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProvenanceCode {
    /// F
    FormalTenancyAgreement,
    /// L
    UnregisteredLandTitle,
    /// O
    Occupancy,
    /// P
    InferredFromPhysicalFeatures,
    /// R
    RentalAgreement,
    /// T
    RegisteredLandTitle,
    /// U
    InferredFromUse,
}

impl ProvenanceCode {
    pub fn code(self) -> char {
        match self {
            ProvenanceCode::FormalTenancyAgreement => 'F',
            ProvenanceCode::UnregisteredLandTitle => 'L',
            ProvenanceCode::Occupancy => 'O',
            ProvenanceCode::InferredFromPhysicalFeatures => 'P',
            ProvenanceCode::RentalAgreement => 'R',
            ProvenanceCode::RegisteredLandTitle => 'T',
            ProvenanceCode::InferredFromUse => 'U',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'F' => Some(ProvenanceCode::FormalTenancyAgreement),
            'L' => Some(ProvenanceCode::UnregisteredLandTitle),
            'O' => Some(ProvenanceCode::Occupancy),
            'P' => Some(ProvenanceCode::InferredFromPhysicalFeatures),
            'R' => Some(ProvenanceCode::RentalAgreement),
            'T' => Some(ProvenanceCode::RegisteredLandTitle),
            'U' => Some(ProvenanceCode::InferredFromUse),
            _ => None,
        }
    }
}

/// One provenance extent polygon.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProvenanceExtent {
    /// Local primary key of the row, distinct from the UPRN it belongs to.
    pub key: ExtentKey,
    pub uprn: Uprn,
    pub code: ProvenanceCode,
    /// POLYGON WKT.
    pub wkt: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub change: ChangeFlag,
}

impl ProvenanceExtent {
    pub fn is_displayable(&self) -> bool {
        self.change.is_displayable() && self.wkt.as_deref().is_some_and(|w| !w.trim().is_empty())
    }

    /// Token used by the selection engine to group extents of one property.
    pub fn selection_token(&self) -> String {
        format!("{}|{}", self.uprn, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provenance_codes_round_trip() {
        for c in ['F', 'L', 'O', 'P', 'R', 'T', 'U'] {
            assert_eq!(ProvenanceCode::from_code(c).unwrap().code(), c);
        }
        assert_eq!(ProvenanceCode::from_code('X'), None);
    }

    #[test]
    fn selection_token_combines_uprn_and_key() {
        let extent = ProvenanceExtent {
            key: ExtentKey(42),
            uprn: Uprn(100010001),
            code: ProvenanceCode::Occupancy,
            wkt: Some("POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))".into()),
            change: ChangeFlag::Unchanged,
        };
        assert_eq!(extent.selection_token(), "100010001|42");
        assert!(extent.is_displayable());
    }
}
