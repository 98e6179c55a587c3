// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property (BLPU/LPI) records.

use crate::codes::Language;
use crate::ids::Uprn;
use smallvec::SmallVec;

/// Maximum parent/child nesting depth permitted when adding children.
pub const MAX_CHILD_NESTING: usize = 6;

/// BLPU/LPI logical status.
///
/// The numeric codes carry display precedence: lower is "more live". The
/// ordering derives from the wire code, so `min` across a set of statuses is
/// the display status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogicalStatus {
    /// 1
    Approved,
    /// 3
    Alternative,
    /// 5
    Candidate,
    /// 6
    Provisional,
    /// 7
    Rejected,
    /// 8
    Historical,
}

impl LogicalStatus {
    pub fn code(self) -> u8 {
        match self {
            LogicalStatus::Approved => 1,
            LogicalStatus::Alternative => 3,
            LogicalStatus::Candidate => 5,
            LogicalStatus::Provisional => 6,
            LogicalStatus::Rejected => 7,
            LogicalStatus::Historical => 8,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(LogicalStatus::Approved),
            3 => Some(LogicalStatus::Alternative),
            5 => Some(LogicalStatus::Candidate),
            6 => Some(LogicalStatus::Provisional),
            7 => Some(LogicalStatus::Rejected),
            8 => Some(LogicalStatus::Historical),
            _ => None,
        }
    }
}

/// Land and Property Identifier: one language-tagged address row of a BLPU.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lpi {
    pub language: Language,
    pub logical_status: LogicalStatus,
    pub address: String,
    pub postcode: Option<String>,
}

/// Property record: a BLPU point plus its LPI rows.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Property {
    pub uprn: Uprn,
    pub parent_uprn: Option<Uprn>,
    pub easting: f64,
    pub northing: f64,
    pub logical_status: LogicalStatus,
    /// BLPU classification code, e.g. "RD04".
    pub classification: String,
    pub lpis: SmallVec<[Lpi; 2]>,
}

impl Property {
    /// Point position as an [easting, northing] pair.
    #[inline]
    pub fn position(&self) -> [f64; 2] {
        [self.easting, self.northing]
    }

    /// The logical status used for display when a UPRN has several LPI rows:
    /// the numerically lowest (most live) status present, falling back to
    /// the BLPU's own status when there are no LPIs.
    pub fn display_logical_status(&self) -> LogicalStatus {
        self.lpis
            .iter()
            .map(|l| l.logical_status)
            .min()
            .unwrap_or(self.logical_status)
            .min(self.logical_status)
    }

    /// English LPI address, falling back to the first row.
    pub fn display_address(&self) -> Option<&str> {
        self.lpis
            .iter()
            .find(|l| l.language == Language::Eng)
            .or_else(|| self.lpis.first())
            .map(|l| l.address.as_str())
    }
}

/// Depth of `uprn` in the parent/child hierarchy formed by `properties`.
///
/// A property with no parent is at level 0. A broken or cyclic parent chain
/// stops counting at [`MAX_CHILD_NESTING`] so the result is always usable as
/// a cap check.
pub fn nesting_level(uprn: Uprn, properties: &[Property]) -> usize {
    let mut level = 0;
    let mut current = uprn;
    while level < MAX_CHILD_NESTING {
        let parent = properties
            .iter()
            .find(|p| p.uprn == current)
            .and_then(|p| p.parent_uprn);
        match parent {
            Some(p) => {
                level += 1;
                current = p;
            }
            None => break,
        }
    }
    level
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn property(uprn: i64, parent: Option<i64>, status: LogicalStatus) -> Property {
        Property {
            uprn: Uprn(uprn),
            parent_uprn: parent.map(Uprn),
            easting: 431000.0,
            northing: 289000.0,
            logical_status: status,
            classification: "RD04".into(),
            lpis: smallvec![],
        }
    }

    #[test]
    fn status_codes_round_trip() {
        for code in [1u8, 3, 5, 6, 7, 8] {
            let status = LogicalStatus::from_code(code).unwrap();
            assert_eq!(status.code(), code);
        }
        assert_eq!(LogicalStatus::from_code(2), None);
    }

    #[test]
    fn display_status_is_minimum_across_lpis() {
        let mut prop = property(100010001, None, LogicalStatus::Historical);
        prop.lpis = smallvec![
            Lpi {
                language: Language::Eng,
                logical_status: LogicalStatus::Rejected,
                address: "1 HIGH STREET".into(),
                postcode: None,
            },
            Lpi {
                language: Language::Cym,
                logical_status: LogicalStatus::Approved,
                address: "1 STRYD FAWR".into(),
                postcode: None,
            },
        ];
        assert_eq!(prop.display_logical_status(), LogicalStatus::Approved);
    }

    #[test]
    fn display_status_falls_back_to_blpu() {
        let prop = property(100010001, None, LogicalStatus::Provisional);
        assert_eq!(prop.display_logical_status(), LogicalStatus::Provisional);
    }

    #[test]
    fn nesting_level_walks_parents() {
        let props = vec![
            property(1, None, LogicalStatus::Approved),
            property(2, Some(1), LogicalStatus::Approved),
            property(3, Some(2), LogicalStatus::Approved),
        ];
        assert_eq!(nesting_level(Uprn(1), &props), 0);
        assert_eq!(nesting_level(Uprn(2), &props), 1);
        assert_eq!(nesting_level(Uprn(3), &props), 2);
    }

    #[test]
    fn nesting_level_survives_cycles() {
        let props = vec![
            property(1, Some(2), LogicalStatus::Approved),
            property(2, Some(1), LogicalStatus::Approved),
        ];
        assert_eq!(nesting_level(Uprn(1), &props), MAX_CHILD_NESTING);
    }
}
