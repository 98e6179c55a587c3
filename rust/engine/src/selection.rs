// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Selection state and highlight synchronization.
//!
//! Three independent accumulate-toggle selections (ESUs, extents,
//! properties) with a capped property set and an explicit event
//! de-duplication policy. The vendor SDK delivers duplicate click events, so
//! a toggle of the same id within the debounce window is suppressed; the
//! policy is a pure function of the event id and timestamps, testable
//! without a wall clock.

use crate::events::{EngineEvent, HighlightKind, NoticeSeverity};
use crate::surface::MapSurface;
use gazmap_model::{EsuId, Uprn};
use rustc_hash::FxHashSet;
use tracing::debug;

/// Property multi-select hard cap.
pub const MAX_PROPERTY_SELECTION: usize = 300;

/// Duplicate-click suppression window in milliseconds.
pub const DEBOUNCE_WINDOW_MS: u64 = 500;

/// Last-seen toggle, the whole state the debounce policy needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebounceState {
    pub last_id: Option<String>,
    pub last_at_ms: u64,
}

/// Event de-duplication policy: apply a toggle unless it repeats the same
/// id within the window.
pub fn should_apply_toggle(state: &DebounceState, id: &str, now_ms: u64) -> bool {
    match &state.last_id {
        Some(last) if last == id => now_ms.saturating_sub(state.last_at_ms) >= DEBOUNCE_WINDOW_MS,
        _ => true,
    }
}

/// Result of one click-toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// Suppressed as a duplicate/echo event.
    Debounced,
}

/// Multi-select state for ESUs, extents and properties.
#[derive(Debug, Default)]
pub struct SelectionEngine {
    esus: FxHashSet<EsuId>,
    /// Extent grouping tokens ("uprn|key").
    extents: FxHashSet<String>,
    properties: FxHashSet<Uprn>,
    debounce: DebounceState,
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn esus(&self) -> impl Iterator<Item = EsuId> + '_ {
        self.esus.iter().copied()
    }

    pub fn extents(&self) -> impl Iterator<Item = &str> {
        self.extents.iter().map(String::as_str)
    }

    pub fn properties(&self) -> impl Iterator<Item = Uprn> + '_ {
        self.properties.iter().copied()
    }

    pub fn esu_count(&self) -> usize {
        self.esus.len()
    }

    pub fn extent_count(&self) -> usize {
        self.extents.len()
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Toggle an ESU from a map click.
    pub fn toggle_esu(&mut self, id: EsuId, now_ms: u64) -> ToggleOutcome {
        let key = id.to_string();
        if !should_apply_toggle(&self.debounce, &key, now_ms) {
            return ToggleOutcome::Debounced;
        }
        self.remember(key, now_ms);
        if self.esus.remove(&id) {
            ToggleOutcome::Removed
        } else {
            self.esus.insert(id);
            ToggleOutcome::Added
        }
    }

    /// Toggle an extent by its grouping token.
    pub fn toggle_extent(&mut self, token: &str, now_ms: u64) -> ToggleOutcome {
        if !should_apply_toggle(&self.debounce, token, now_ms) {
            return ToggleOutcome::Debounced;
        }
        self.remember(token.to_string(), now_ms);
        if self.extents.remove(token) {
            ToggleOutcome::Removed
        } else {
            self.extents.insert(token.to_string());
            ToggleOutcome::Added
        }
    }

    /// Toggle a property from a map click, subject to the selection cap.
    pub fn toggle_property(&mut self, uprn: Uprn, now_ms: u64) -> Result<ToggleOutcome, EngineEvent> {
        let key = uprn.to_string();
        if !should_apply_toggle(&self.debounce, &key, now_ms) {
            return Ok(ToggleOutcome::Debounced);
        }
        self.remember(key, now_ms);
        if self.properties.remove(&uprn) {
            return Ok(ToggleOutcome::Removed);
        }
        if self.properties.len() >= MAX_PROPERTY_SELECTION {
            return Err(selection_limit_notice());
        }
        self.properties.insert(uprn);
        Ok(ToggleOutcome::Added)
    }

    /// Add a whole batch of properties (rectangle/polygon select).
    ///
    /// A batch that would push the total above the cap leaves the selection
    /// unchanged and yields exactly one blocking notice.
    pub fn select_properties(&mut self, uprns: &[Uprn]) -> Result<usize, EngineEvent> {
        let new: Vec<Uprn> = uprns
            .iter()
            .copied()
            .filter(|u| !self.properties.contains(u))
            .collect();
        if self.properties.len() + new.len() > MAX_PROPERTY_SELECTION {
            debug!(
                current = self.properties.len(),
                adding = new.len(),
                "property selection limit refused batch"
            );
            return Err(selection_limit_notice());
        }
        let added = new.len();
        self.properties.extend(new);
        Ok(added)
    }

    pub fn clear_esus(&mut self) {
        self.esus.clear();
    }

    pub fn clear_extents(&mut self) {
        self.extents.clear();
    }

    pub fn clear_properties(&mut self) {
        self.properties.clear();
    }

    fn remember(&mut self, id: String, now_ms: u64) {
        self.debounce = DebounceState {
            last_id: Some(id),
            last_at_ms: now_ms,
        };
    }

    /// Push the current selection of `kind` onto the surface as a highlight
    /// decoration, replacing any previous one. Requires materialized layers,
    /// so callers run this only after z-order enforcement.
    pub fn apply_highlight(&self, surface: &mut dyn MapSurface, kind: HighlightKind) {
        let ids: Vec<String> = match kind {
            HighlightKind::Esu | HighlightKind::Street => {
                self.esus.iter().map(|id| id.to_string()).collect()
            }
            HighlightKind::Extent => self.extents.iter().cloned().collect(),
            HighlightKind::Property | HighlightKind::SelectProperty => {
                self.properties.iter().map(|u| u.to_string()).collect()
            }
            // Background, unassigned and ASD highlights come from host
            // requests, not from the click selection
            _ => Vec::new(),
        };
        let layer = kind.layer();
        if ids.is_empty() {
            surface.clear_highlight(layer);
        } else {
            let present = surface.query_feature_ids(layer, &ids);
            surface.set_highlight(layer, &present);
        }
    }

    /// Event mirroring the selection into the host's record lists.
    pub fn list_event(&self, kind: HighlightKind) -> EngineEvent {
        let ids: Vec<String> = match kind {
            HighlightKind::Esu | HighlightKind::Street => {
                self.esus.iter().map(|id| id.to_string()).collect()
            }
            HighlightKind::Extent => self.extents.iter().cloned().collect(),
            _ => self.properties.iter().map(|u| u.to_string()).collect(),
        };
        EngineEvent::HighlightListItem { kind, ids }
    }
}

fn selection_limit_notice() -> EngineEvent {
    EngineEvent::Notice {
        severity: NoticeSeverity::Blocking,
        text: format!("Selection is limited to {MAX_PROPERTY_SELECTION} properties"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debounce_policy_is_pure() {
        let state = DebounceState {
            last_id: Some("14".into()),
            last_at_ms: 1000,
        };
        assert!(!should_apply_toggle(&state, "14", 1200));
        assert!(should_apply_toggle(&state, "14", 1500));
        assert!(should_apply_toggle(&state, "15", 1200));
        assert!(should_apply_toggle(&DebounceState::default(), "14", 0));
    }

    #[test]
    fn duplicate_toggle_within_window_is_idempotent() {
        let mut sel = SelectionEngine::new();
        assert_eq!(sel.toggle_esu(EsuId(14), 1000), ToggleOutcome::Added);
        // The SDK echoes the same click within the window
        assert_eq!(sel.toggle_esu(EsuId(14), 1100), ToggleOutcome::Debounced);
        assert_eq!(sel.esu_count(), 1);
    }

    #[test]
    fn toggle_after_window_removes() {
        let mut sel = SelectionEngine::new();
        sel.toggle_esu(EsuId(14), 1000);
        assert_eq!(sel.toggle_esu(EsuId(14), 1600), ToggleOutcome::Removed);
        assert_eq!(sel.esu_count(), 0);
    }

    #[test]
    fn property_batch_over_cap_is_refused_atomically() {
        let mut sel = SelectionEngine::new();
        let first: Vec<Uprn> = (0..290).map(|i| Uprn(i)).collect();
        assert_eq!(sel.select_properties(&first).unwrap(), 290);

        let second: Vec<Uprn> = (290..320).map(|i| Uprn(i)).collect();
        let err = sel.select_properties(&second).unwrap_err();
        assert!(matches!(
            err,
            EngineEvent::Notice {
                severity: NoticeSeverity::Blocking,
                ..
            }
        ));
        // Unchanged, not partially applied
        assert_eq!(sel.property_count(), 290);
    }

    #[test]
    fn property_batch_counts_only_new_ids() {
        let mut sel = SelectionEngine::new();
        let all: Vec<Uprn> = (0..MAX_PROPERTY_SELECTION as i64).map(Uprn).collect();
        sel.select_properties(&all).unwrap();
        // Re-selecting already-present ids is not growth
        assert_eq!(sel.select_properties(&all[..10]).unwrap(), 0);
        assert_eq!(sel.property_count(), MAX_PROPERTY_SELECTION);
    }

    #[test]
    fn single_toggle_respects_cap() {
        let mut sel = SelectionEngine::new();
        let all: Vec<Uprn> = (0..MAX_PROPERTY_SELECTION as i64).map(Uprn).collect();
        sel.select_properties(&all).unwrap();
        assert!(sel
            .toggle_property(Uprn(MAX_PROPERTY_SELECTION as i64 + 1), 99_000)
            .is_err());
        // Removing one is always allowed
        assert_eq!(
            sel.toggle_property(Uprn(0), 199_000).unwrap(),
            ToggleOutcome::Removed
        );
    }
}
