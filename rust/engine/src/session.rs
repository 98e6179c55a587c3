// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Edit session state machine.
//!
//! At most one object is ever being digitized. Entering an edit dims every
//! other layer and arms the matching creation tool when the target has no
//! geometry yet; leaving restores opacities and popups. A switch between
//! targets always runs the full exit sequence first, so two layers are never
//! dimmed for editing at the same time.

use crate::events::EngineEvent;
use crate::layers::LayerManager;
use crate::ports::UserRightsPort;
use crate::snapping::{snap_layers_for, SnapConfig};
use crate::snapshot::{EditFamily, EditTarget, Snapshot};
use crate::surface::{CreateTool, EditGraphic, MapSurface};
use gazmap_model::parse_rings;
use tracing::debug;

/// Session state: browsing, or digitizing one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Browsing,
    Editing(EditTarget),
}

/// Everything an edit-session transition touches.
pub struct SessionDeps<'a> {
    pub surface: &'a mut dyn MapSurface,
    pub layers: &'a mut LayerManager,
    pub snapshot: &'a Snapshot,
    pub rights: &'a dyn UserRightsPort,
    pub snap_config: &'a SnapConfig,
    pub events: &'a mut Vec<EngineEvent>,
}

/// The edit session state machine.
#[derive(Debug, Default)]
pub struct EditSession {
    state: EditState,
    /// Guard against re-arming the creation tool on every re-render.
    create_tool_armed: bool,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing(_))
    }

    pub fn create_tool_armed(&self) -> bool {
        self.create_tool_armed
    }

    /// Reconcile the session against the currently designated edit target.
    ///
    /// Re-designating the same object is idempotent: the overlay graphic is
    /// not re-added and the creation tool is not re-armed.
    pub fn sync(&mut self, designated: Option<EditTarget>, deps: &mut SessionDeps<'_>) {
        match (self.state, designated) {
            (EditState::Browsing, None) => {}
            (EditState::Browsing, Some(target)) => self.enter(target, deps),
            (EditState::Editing(current), Some(target)) if current == target => {}
            (EditState::Editing(_), Some(target)) => {
                // Full exit before entry: no transient double-dim
                self.exit(deps);
                self.enter(target, deps);
            }
            (EditState::Editing(_), None) => self.exit(deps),
        }
    }

    fn enter(&mut self, target: EditTarget, deps: &mut SessionDeps<'_>) {
        debug!(code = target.object_type_code(), "entering edit session");
        deps.layers.ensure_edit_overlay(deps.surface);
        deps.layers
            .dim_for_edit(deps.surface, target.target_layer(), target.sibling_layer());

        let tool = creation_tool(&target);
        let rings = target_rings(&target, deps.snapshot);
        deps.surface.set_edit_graphic(rings.clone().map(|rings| EditGraphic {
            rings,
            tool,
            valid: true,
        }));

        let snap = snap_layers_for(Some(&target), deps.snap_config);
        deps.surface.set_snap_layers(&snap);

        // The overlay graphic is shown regardless; the tool only with the
        // matching edit right.
        let permitted = match target.family() {
            EditFamily::Street => deps.rights.can_edit_street(),
            EditFamily::Property => deps.rights.can_edit_property(),
            EditFamily::Asd => deps.rights.can_edit_asd(),
        };
        deps.surface.set_tool_visible(permitted);

        if permitted && rings.is_none() && !self.create_tool_armed {
            deps.surface.arm_create_tool(tool);
            self.create_tool_armed = true;
            deps.events
                .push(EngineEvent::CreateToolActivated { active: true });
        }

        self.state = EditState::Editing(target);
    }

    fn exit(&mut self, deps: &mut SessionDeps<'_>) {
        debug!("leaving edit session");
        deps.surface.set_edit_graphic(None);
        deps.layers.restore_after_edit(deps.surface);
        deps.surface.disarm_tool();
        deps.surface.set_tool_visible(false);
        deps.surface.set_snap_layers(&[]);
        if self.create_tool_armed {
            deps.events
                .push(EngineEvent::CreateToolActivated { active: false });
        }
        self.create_tool_armed = false;
        self.state = EditState::Browsing;
    }
}

/// Creation tool matching the target's geometry kind.
fn creation_tool(target: &EditTarget) -> CreateTool {
    match target {
        EditTarget::Esu(_) | EditTarget::Asd { .. } => CreateTool::Polyline,
        EditTarget::Blpu(_) => CreateTool::Point,
        EditTarget::Extent(_) => CreateTool::Polygon,
    }
}

/// Current geometry of the target, if it has been digitized before.
fn target_rings(target: &EditTarget, snapshot: &Snapshot) -> Option<Vec<Vec<[f64; 2]>>> {
    match target {
        EditTarget::Esu(id) => snapshot
            .find_esu(*id)
            .and_then(|e| e.wkt.as_deref())
            .and_then(parse_rings),
        EditTarget::Blpu(uprn) => snapshot
            .find_property(*uprn)
            .map(|p| vec![vec![p.position()]]),
        EditTarget::Extent(key) => snapshot
            .find_extent(*key)
            .and_then(|e| e.wkt.as_deref())
            .and_then(parse_rings),
        EditTarget::Asd { kind, usrn, seq } => snapshot
            .find_asd(*kind, *usrn, *seq)
            .and_then(|a| a.wkt.as_deref())
            .and_then(parse_rings),
    }
}
