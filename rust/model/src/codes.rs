// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Code tables shared across record families.

/// Language tag carried by street descriptors and LPIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Language {
    /// English
    Eng,
    /// Welsh
    Cym,
    /// Gaelic
    Gae,
}

impl Language {
    /// Three-letter wire code used by the remote API.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Eng => "ENG",
            Language::Cym => "CYM",
            Language::Gae => "GAE",
        }
    }

    /// Decode the wire code; unknown codes yield `None`.
    pub fn from_str_code(code: &str) -> Option<Self> {
        match code {
            "ENG" => Some(Language::Eng),
            "CYM" => Some(Language::Cym),
            "GAE" => Some(Language::Gae),
            _ => None,
        }
    }
}

/// Row lifecycle flag carried by mutable sub-records (ESUs, ASD rows).
///
/// `Delete`-flagged rows stay in the collection until the surrounding
/// application saves, but are never projected onto the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChangeFlag {
    #[default]
    Unchanged,
    Insert,
    Update,
    Delete,
}

impl ChangeFlag {
    /// Whether a row with this flag should be rendered.
    #[inline]
    pub fn is_displayable(self) -> bool {
        !matches!(self, ChangeFlag::Delete)
    }
}

/// Jurisdiction variant of the authority operating the gazetteer.
///
/// Determines which ASD overlay kinds are legal (see `asd::AsdKind`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Jurisdiction {
    EnglandWales,
    Scotland,
}

/// Title-case a description for display: first letter of each word upper,
/// rest lower. The remote API stores street descriptors in upper case.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            // Apostrophes stay inside the word so "MARY'S" becomes "Mary's"
            if !(ch == '\'' || ch == '\u{2019}') {
                at_word_start = true;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_codes_round_trip() {
        for lang in [Language::Eng, Language::Cym, Language::Gae] {
            assert_eq!(Language::from_str_code(lang.as_str()), Some(lang));
        }
        assert_eq!(Language::from_str_code("FRA"), None);
    }

    #[test]
    fn delete_rows_are_not_displayable() {
        assert!(ChangeFlag::Unchanged.is_displayable());
        assert!(ChangeFlag::Insert.is_displayable());
        assert!(ChangeFlag::Update.is_displayable());
        assert!(!ChangeFlag::Delete.is_displayable());
    }

    #[test]
    fn title_case_descriptions() {
        assert_eq!(title_case("HIGH STREET"), "High Street");
        assert_eq!(title_case("ST. MARY'S GATE"), "St. Mary's Gate");
        assert_eq!(title_case(""), "");
    }
}
