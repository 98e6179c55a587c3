// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layer lifecycle: creation, replacement, visibility, opacity and z-order.
//!
//! Live layer handles live in a `slotmap` arena; the logical name to key
//! index and the persistent visibility map are `FxHashMap`s. Visibility is
//! remembered per logical layer name, not derived from feature presence, so
//! a layer a user hid stays hidden across re-renders.

use crate::feature::LayerDef;
use crate::surface::MapSurface;
use gazmap_model::AsdKind;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use tracing::debug;

/// Logical layer names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// User-loaded reference file, by load index. Base of the stack.
    ReferenceFile(u32),
    BackgroundStreets,
    UnassignedEsus,
    BackgroundProvenance,
    BackgroundProperties,
    Street,
    LlpgStreet,
    Asd(AsdKind),
    Extent,
    Property,
    ZoomHighlight,
    EditOverlay,
}

impl LayerKind {
    /// Z-order rank, bottom to top. The edit overlay is always topmost.
    pub fn rank(self) -> u32 {
        match self {
            LayerKind::ReferenceFile(index) => index.min(999),
            LayerKind::BackgroundStreets => 1000,
            LayerKind::UnassignedEsus => 1100,
            LayerKind::BackgroundProvenance => 1200,
            LayerKind::BackgroundProperties => 1300,
            LayerKind::Street => 1400,
            LayerKind::LlpgStreet => 1500,
            LayerKind::Asd(kind) => 1600 + kind.code() as u32,
            LayerKind::Extent => 1700,
            LayerKind::Property => 1800,
            LayerKind::ZoomHighlight => 1900,
            LayerKind::EditOverlay => 2000,
        }
    }

    /// Stable name for logging and the surface.
    pub fn name(self) -> String {
        match self {
            LayerKind::ReferenceFile(index) => format!("referenceFile{index}"),
            LayerKind::BackgroundStreets => "backgroundStreets".to_string(),
            LayerKind::UnassignedEsus => "unassignedEsus".to_string(),
            LayerKind::BackgroundProvenance => "backgroundProvenance".to_string(),
            LayerKind::BackgroundProperties => "backgroundProperties".to_string(),
            LayerKind::Street => "street".to_string(),
            LayerKind::LlpgStreet => "llpgStreet".to_string(),
            LayerKind::Asd(kind) => format!("asd{}", kind.code()),
            LayerKind::Extent => "extent".to_string(),
            LayerKind::Property => "property".to_string(),
            LayerKind::ZoomHighlight => "zoomHighlight".to_string(),
            LayerKind::EditOverlay => "editGraphics".to_string(),
        }
    }

    /// Configured target opacity when not dimmed by an edit session.
    pub fn default_opacity(self) -> f64 {
        match self {
            LayerKind::BackgroundStreets
            | LayerKind::UnassignedEsus
            | LayerKind::BackgroundProvenance
            | LayerKind::BackgroundProperties => 0.5,
            LayerKind::Extent => 0.75,
            _ => 1.0,
        }
    }
}

/// Opacity increment applied per animation frame during a fade-in.
const FADE_STEP: f64 = 0.125;

new_key_type! {
    /// Key for a live layer in the arena.
    pub struct LayerKey;
}

#[derive(Debug)]
struct LiveLayer {
    kind: LayerKind,
    feature_count: usize,
    /// Current opacity as last pushed to the surface.
    opacity: f64,
    /// Opacity to restore to when not dimmed/fading.
    target_opacity: f64,
    has_popup: bool,
}

#[derive(Debug)]
struct Fade {
    key: LayerKey,
    target: f64,
}

/// Keeps the live map surface's layer set consistent with the latest
/// projection.
pub struct LayerManager {
    layers: SlotMap<LayerKey, LiveLayer>,
    index: FxHashMap<LayerKind, LayerKey>,
    /// Remembered visibility per logical layer name.
    visibility: FxHashMap<LayerKind, bool>,
    fades: Vec<Fade>,
    edit_overlay_created: bool,
    /// Active edit-session dim: (target layer, half-opacity sibling).
    /// Survives reconciles so a mid-edit re-render keeps layers dimmed.
    dim: Option<(LayerKind, Option<LayerKind>)>,
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerManager {
    pub fn new() -> Self {
        Self {
            layers: SlotMap::with_key(),
            index: FxHashMap::default(),
            visibility: FxHashMap::default(),
            fades: Vec::new(),
            edit_overlay_created: false,
            dim: None,
        }
    }

    /// Opacity and popup state a layer should carry right now, given any
    /// active edit-session dim.
    fn dimmed_state(&self, kind: LayerKind, target_opacity: f64, has_popup: bool) -> (f64, bool) {
        match self.dim {
            Some((target, sibling)) if kind != target => {
                let opacity = if Some(kind) == sibling { 0.5 } else { 0.25 };
                (opacity, false)
            }
            _ => (target_opacity, has_popup),
        }
    }

    /// Replace the layer for `def.kind`: remove any existing layer with that
    /// name, add a fresh one only if the projection produced features, and
    /// re-apply the remembered visibility flag.
    pub fn reconcile(&mut self, surface: &mut dyn MapSurface, def: LayerDef) {
        let kind = def.kind;
        debug_assert!(
            kind != LayerKind::EditOverlay,
            "the edit overlay is never reconciled"
        );

        if let Some(key) = self.index.remove(&kind) {
            self.layers.remove(key);
            self.fades.retain(|f| f.key != key);
            surface.remove_layer(kind);
        }

        if def.features.is_empty() {
            debug!(layer = %kind.name(), "layer empty, not re-added");
            return;
        }

        let visible = *self.visibility.entry(kind).or_insert(true);
        let feature_count = def.features.len();
        let has_popup = def.popup.is_some();
        let (opacity, popups_enabled) = self.dimmed_state(kind, def.opacity, has_popup);

        surface.add_layer(&def);
        surface.set_visibility(kind, visible);
        surface.set_opacity(kind, opacity);
        if has_popup && !popups_enabled {
            surface.set_popups_enabled(kind, false);
        }

        let key = self.layers.insert(LiveLayer {
            kind,
            feature_count,
            opacity,
            target_opacity: def.opacity,
            has_popup,
        });
        self.index.insert(kind, key);
        debug!(layer = %kind.name(), features = feature_count, "layer reconciled");
    }

    /// Toggle a layer's visibility. A hidden-to-visible transition starts a
    /// fade from zero opacity once the layer finishes loading.
    ///
    /// Returns true when the flag actually changed.
    pub fn set_visible(
        &mut self,
        surface: &mut dyn MapSurface,
        kind: LayerKind,
        visible: bool,
    ) -> bool {
        let was = self.visibility.insert(kind, visible).unwrap_or(true);
        if was == visible {
            return false;
        }
        if let Some(&key) = self.index.get(&kind) {
            surface.set_visibility(kind, visible);
            if visible {
                if let Some(layer) = self.layers.get_mut(key) {
                    layer.opacity = 0.0;
                    surface.set_opacity(kind, 0.0);
                    let target = layer.target_opacity;
                    self.fades.retain(|f| f.key != key);
                    self.fades.push(Fade { key, target });
                }
            }
        }
        true
    }

    pub fn is_visible(&self, kind: LayerKind) -> bool {
        self.visibility.get(&kind).copied().unwrap_or(true)
    }

    /// Advance in-flight fades by one animation frame. A fade holds at zero
    /// until the surface reports the layer's initial load complete, which
    /// avoids a visible pop.
    pub fn tick_fades(&mut self, surface: &mut dyn MapSurface) {
        let layers = &mut self.layers;
        self.fades.retain_mut(|fade| {
            let Some(layer) = layers.get_mut(fade.key) else {
                return false;
            };
            if !surface.layer_loaded(layer.kind) {
                return true;
            }
            layer.opacity = (layer.opacity + FADE_STEP).min(fade.target);
            surface.set_opacity(layer.kind, layer.opacity);
            layer.opacity < fade.target
        });
    }

    pub fn fades_pending(&self) -> bool {
        !self.fades.is_empty()
    }

    /// Reassign z-order bottom to top by rank. The edit overlay, once
    /// created, always participates and always lands on top.
    pub fn enforce_order(&mut self, surface: &mut dyn MapSurface) {
        let mut kinds: Vec<LayerKind> = self.index.keys().copied().collect();
        if self.edit_overlay_created {
            kinds.push(LayerKind::EditOverlay);
        }
        kinds.sort_by_key(|k| k.rank());
        surface.set_layer_order(&kinds);
    }

    /// Create the edit overlay exactly once per session.
    pub fn ensure_edit_overlay(&mut self, surface: &mut dyn MapSurface) {
        if !self.edit_overlay_created {
            surface.create_edit_overlay();
            self.edit_overlay_created = true;
            debug!("edit overlay created");
        }
    }

    pub fn edit_overlay_created(&self) -> bool {
        self.edit_overlay_created
    }

    /// Dim every layer except the edit target and disable their popups.
    /// The target's direct sibling keeps half opacity so its context stays
    /// readable.
    pub fn dim_for_edit(
        &mut self,
        surface: &mut dyn MapSurface,
        target: LayerKind,
        sibling: Option<LayerKind>,
    ) {
        self.dim = Some((target, sibling));
        for layer in self.layers.values_mut() {
            if layer.kind == target {
                continue;
            }
            let opacity = if Some(layer.kind) == sibling { 0.5 } else { 0.25 };
            layer.opacity = opacity;
            surface.set_opacity(layer.kind, opacity);
            surface.set_popups_enabled(layer.kind, false);
        }
    }

    /// Undo [`Self::dim_for_edit`]: every layer returns to its configured
    /// opacity with popups re-enabled.
    pub fn restore_after_edit(&mut self, surface: &mut dyn MapSurface) {
        self.dim = None;
        for layer in self.layers.values_mut() {
            layer.opacity = layer.target_opacity;
            surface.set_opacity(layer.kind, layer.target_opacity);
            surface.set_popups_enabled(layer.kind, layer.has_popup);
        }
    }

    pub fn has_layer(&self, kind: LayerKind) -> bool {
        self.index.contains_key(&kind)
    }

    pub fn feature_count(&self, kind: LayerKind) -> usize {
        self.index
            .get(&kind)
            .and_then(|&key| self.layers.get(key))
            .map_or(0, |l| l.feature_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_are_strictly_layered() {
        let order = [
            LayerKind::ReferenceFile(0),
            LayerKind::BackgroundStreets,
            LayerKind::UnassignedEsus,
            LayerKind::BackgroundProvenance,
            LayerKind::BackgroundProperties,
            LayerKind::Street,
            LayerKind::LlpgStreet,
            LayerKind::Asd(AsdKind::Interest),
            LayerKind::Extent,
            LayerKind::Property,
            LayerKind::ZoomHighlight,
            LayerKind::EditOverlay,
        ];
        for pair in order.windows(2) {
            assert!(
                pair[0].rank() < pair[1].rank(),
                "{:?} must rank below {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn asd_layers_rank_between_llpg_street_and_extent() {
        for kind in AsdKind::ALL {
            let rank = LayerKind::Asd(kind).rank();
            assert!(rank > LayerKind::LlpgStreet.rank());
            assert!(rank < LayerKind::Extent.rank());
        }
    }

    #[test]
    fn background_layers_default_translucent() {
        assert_eq!(LayerKind::BackgroundStreets.default_opacity(), 0.5);
        assert_eq!(LayerKind::Street.default_opacity(), 1.0);
    }
}
