// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Street and ESU records.

use crate::asd::AsdRecord;
use crate::codes::{ChangeFlag, Language};
use crate::ids::{EsuId, Usrn};
use smallvec::SmallVec;

/// Street record type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StreetRecordType {
    OfficialDesignated,
    StreetDescription,
    NumberedStreet,
    UnofficialName,
    LlpgAccess,
}

impl StreetRecordType {
    /// Numeric wire code.
    pub fn code(self) -> u8 {
        match self {
            StreetRecordType::OfficialDesignated => 1,
            StreetRecordType::StreetDescription => 2,
            StreetRecordType::NumberedStreet => 3,
            StreetRecordType::UnofficialName => 4,
            StreetRecordType::LlpgAccess => 9,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(StreetRecordType::OfficialDesignated),
            2 => Some(StreetRecordType::StreetDescription),
            3 => Some(StreetRecordType::NumberedStreet),
            4 => Some(StreetRecordType::UnofficialName),
            9 => Some(StreetRecordType::LlpgAccess),
            _ => None,
        }
    }

    /// Type-9 streets exist only for LLPG addressing and are rendered on
    /// their own layer, separate from the highway network.
    #[inline]
    pub fn is_llpg_only(self) -> bool {
        matches!(self, StreetRecordType::LlpgAccess)
    }
}

/// Street (and ESU) operational state code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StreetState {
    UnderConstruction,
    Open,
    PermanentlyClosed,
    AddressingOnly,
}

impl StreetState {
    pub fn code(self) -> u8 {
        match self {
            StreetState::UnderConstruction => 1,
            StreetState::Open => 2,
            StreetState::PermanentlyClosed => 4,
            StreetState::AddressingOnly => 5,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(StreetState::UnderConstruction),
            2 => Some(StreetState::Open),
            4 => Some(StreetState::PermanentlyClosed),
            5 => Some(StreetState::AddressingOnly),
            _ => None,
        }
    }
}

/// Language-tagged street descriptor.
///
/// A street carries one descriptor per language; only the English one is used
/// for display.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreetDescriptor {
    pub language: Language,
    /// Upper-case description text as stored by the API.
    pub text: String,
    pub locality: Option<String>,
    pub town: Option<String>,
}

/// Elementary Street Unit: one line segment of a street's physical extent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Esu {
    pub id: EsuId,
    pub state: Option<StreetState>,
    /// LINESTRING WKT; `None` until the ESU has been digitized.
    pub wkt: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub change: ChangeFlag,
}

impl Esu {
    /// Whether this ESU contributes geometry to a render pass.
    #[inline]
    pub fn is_displayable(&self) -> bool {
        self.change.is_displayable() && self.wkt.as_deref().is_some_and(|w| !w.trim().is_empty())
    }
}

/// Street record keyed by USRN.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Street {
    pub usrn: Usrn,
    pub record_type: StreetRecordType,
    pub state: Option<StreetState>,
    pub descriptors: SmallVec<[StreetDescriptor; 2]>,
    pub esus: Vec<Esu>,
    /// ASD overlay rows, all eight kinds in one collection.
    #[cfg_attr(feature = "serde", serde(default))]
    pub asd: Vec<AsdRecord>,
}

impl Street {
    /// English descriptor, the one used for display.
    pub fn english_descriptor(&self) -> Option<&StreetDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.language == Language::Eng)
    }

    /// Streets not yet persisted have a non-positive USRN.
    #[inline]
    pub fn is_new(&self) -> bool {
        self.usrn.is_provisional()
    }

    /// ESUs that should currently render.
    pub fn displayable_esus(&self) -> impl Iterator<Item = &Esu> {
        self.esus.iter().filter(|e| e.is_displayable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn street_with_descriptors(descriptors: SmallVec<[StreetDescriptor; 2]>) -> Street {
        Street {
            usrn: Usrn(1001),
            record_type: StreetRecordType::OfficialDesignated,
            state: Some(StreetState::Open),
            descriptors,
            esus: Vec::new(),
            asd: Vec::new(),
        }
    }

    #[test]
    fn english_descriptor_preferred() {
        let street = street_with_descriptors(smallvec![
            StreetDescriptor {
                language: Language::Cym,
                text: "STRYD FAWR".into(),
                locality: None,
                town: None,
            },
            StreetDescriptor {
                language: Language::Eng,
                text: "HIGH STREET".into(),
                locality: None,
                town: Some("ANYTOWN".into()),
            },
        ]);
        assert_eq!(street.english_descriptor().unwrap().text, "HIGH STREET");
    }

    #[test]
    fn record_type_codes_round_trip() {
        for code in [1u8, 2, 3, 4, 9] {
            let ty = StreetRecordType::from_code(code).unwrap();
            assert_eq!(ty.code(), code);
        }
        assert_eq!(StreetRecordType::from_code(7), None);
    }

    #[test]
    fn esu_without_geometry_is_not_displayable() {
        let esu = Esu {
            id: EsuId(14),
            state: None,
            wkt: None,
            change: ChangeFlag::Unchanged,
        };
        assert!(!esu.is_displayable());

        let esu = Esu {
            wkt: Some("  ".into()),
            ..esu
        };
        assert!(!esu.is_displayable());

        let esu = Esu {
            wkt: Some("LINESTRING (0 0, 1 1)".into()),
            id: EsuId(14),
            state: None,
            change: ChangeFlag::Delete,
        };
        assert!(!esu.is_displayable());
    }
}
