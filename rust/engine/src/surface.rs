// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The map-surface contract.
//!
//! This trait is everything the engine relies on from the vendor rendering
//! SDK. The engine never reaches past it: all layer, popup, highlight and
//! digitizing-tool manipulation goes through these methods, which keeps the
//! synchronization logic pure and testable against a recording fake.

use crate::feature::LayerDef;
use crate::layers::LayerKind;

/// Creation tool matching the geometry kind of the edit target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateTool {
    Point,
    Polyline,
    Polygon,
}

/// The single graphic shown on the edit overlay while digitizing.
#[derive(Debug, Clone, PartialEq)]
pub struct EditGraphic {
    /// Ring/path arrays in the uniform codec form.
    pub rings: Vec<Vec<[f64; 2]>>,
    pub tool: CreateTool,
    /// False applies the "invalid" symbol (self-intersecting line,
    /// multi-ring polygon).
    pub valid: bool,
}

/// Contract with the interactive map rendering surface.
pub trait MapSurface {
    /// Whether the surface has finished initializing. Layer manipulation
    /// must wait for readiness.
    fn is_ready(&self) -> bool;

    fn add_layer(&mut self, def: &LayerDef);
    fn remove_layer(&mut self, kind: LayerKind);

    /// Create the edit overlay. Called exactly once per session; the overlay
    /// is never removed afterwards, only shown, hidden and reordered.
    fn create_edit_overlay(&mut self);
    fn set_edit_graphic(&mut self, graphic: Option<EditGraphic>);

    fn set_visibility(&mut self, kind: LayerKind, visible: bool);
    fn set_opacity(&mut self, kind: LayerKind, opacity: f64);
    fn set_popups_enabled(&mut self, kind: LayerKind, enabled: bool);
    fn set_layer_order(&mut self, bottom_to_top: &[LayerKind]);

    /// Whether a layer's tiles/features have finished their initial load;
    /// opacity fades start only after this reports true.
    fn layer_loaded(&self, kind: LayerKind) -> bool;

    /// Of `ids`, return those materialized as features on the layer.
    fn query_feature_ids(&self, kind: LayerKind, ids: &[String]) -> Vec<String>;
    fn set_highlight(&mut self, kind: LayerKind, ids: &[String]);
    fn clear_highlight(&mut self, kind: LayerKind);

    fn arm_create_tool(&mut self, tool: CreateTool);
    fn disarm_tool(&mut self);
    fn set_tool_visible(&mut self, visible: bool);
    fn set_snap_layers(&mut self, kinds: &[LayerKind]);

    /// Synchronously release all native rendering resources. The one
    /// mandatory teardown guarantee: called from the unmount path.
    fn destroy(&mut self);
}
