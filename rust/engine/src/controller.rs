// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The map controller: one render/update path over the injected surface.
//!
//! A render pass runs strictly in order: project, reconcile layers, enforce
//! z-order, sync the edit session, then highlights (highlighting queries the
//! surface, so it needs materialized, ordered layers). Everything the engine
//! wants the host to do is queued as events and drained after each call.

use crate::actions::{ActionDispatcher, PopupAction};
use crate::edit;
use crate::error::{Error, Result};
use crate::events::{EngineEvent, HighlightKind, NoticeSeverity};
use crate::layers::{LayerKind, LayerManager};
use crate::ports::{ConfirmDecision, RecordEditingPort, UserRightsPort};
use crate::project::project;
use crate::reference::{decode_reference_file, reference_layer_def, ReferenceLayer};
use crate::remote::RemoteError;
use crate::selection::SelectionEngine;
use crate::session::{EditSession, EditState, SessionDeps};
use crate::snapping::SnapConfig;
use crate::snapshot::{EditTarget, PointCaptureMode, Snapshot};
use crate::surface::{CreateTool, EditGraphic, MapSurface};
use gazmap_model::{Property, Street, Uprn, Usrn};
use tracing::{debug, warn};

/// Map service providers this deployment knows how to configure.
const KNOWN_PROVIDERS: &[&str] = &["OS", "thunderforest", "viaEuropa"];

/// Owns the map surface and keeps it consistent with the domain snapshot.
pub struct MapController<S: MapSurface> {
    surface: S,
    layers: LayerManager,
    session: EditSession,
    selection: SelectionEngine,
    dispatcher: ActionDispatcher,
    snap_config: SnapConfig,
    reference_layers: Vec<ReferenceLayer>,
    next_reference_index: u32,
    events: Vec<EngineEvent>,
    extent_merge_in_progress: bool,
    /// Generation checks for in-flight auxiliary fetches.
    requested_street: Option<Usrn>,
    requested_property: Option<Uprn>,
    destroyed: bool,
}

impl<S: MapSurface> MapController<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            layers: LayerManager::new(),
            session: EditSession::new(),
            selection: SelectionEngine::new(),
            dispatcher: ActionDispatcher::new(),
            snap_config: SnapConfig::default(),
            reference_layers: Vec::new(),
            next_reference_index: 0,
            events: Vec::new(),
            extent_merge_in_progress: false,
            requested_street: None,
            requested_property: None,
            destroyed: false,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn session_state(&self) -> EditState {
        self.session.state()
    }

    pub fn selection(&self) -> &SelectionEngine {
        &self.selection
    }

    /// Events queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // -----------------------------------------------------------------------
    // Render path
    // -----------------------------------------------------------------------

    /// One full render pass against the latest snapshot.
    pub fn render(&mut self, snapshot: &Snapshot, rights: &dyn UserRightsPort) -> Result<()> {
        if self.destroyed {
            return Err(Error::Surface("controller already torn down".to_string()));
        }
        if !self.surface.is_ready() {
            debug!("surface not ready, render deferred");
            return Ok(());
        }
        if self.extent_merge_in_progress {
            debug!("extent merge in progress, render suppressed");
            return Ok(());
        }

        // Projection is pure; if it produced nothing the previous layer set
        // stays intact.
        let projection = project(snapshot, rights, &self.snap_config);
        for def in projection.layers {
            self.layers.reconcile(&mut self.surface, def);
        }

        let mut deps = SessionDeps {
            surface: &mut self.surface,
            layers: &mut self.layers,
            snapshot,
            rights,
            snap_config: &self.snap_config,
            events: &mut self.events,
        };
        self.session.sync(snapshot.editing, &mut deps);

        // Reconciliation done, session settled: now z-order, then highlights
        self.layers.enforce_order(&mut self.surface);

        // Highlights query the surface, so they run after ordering
        for kind in [
            HighlightKind::Esu,
            HighlightKind::Property,
            HighlightKind::Extent,
        ] {
            self.selection.apply_highlight(&mut self.surface, kind);
        }
        if let Some(request) = &snapshot.highlight_request {
            let layer = request.kind.layer();
            let present = self.surface.query_feature_ids(layer, &request.ids);
            self.surface.set_highlight(layer, &present);
        }
        Ok(())
    }

    /// Advance fade-in animations by one frame.
    pub fn on_frame(&mut self) {
        self.layers.tick_fades(&mut self.surface);
    }

    /// Toggle a layer's visibility from the layer control.
    pub fn set_layer_visible(&mut self, kind: LayerKind, visible: bool) {
        if self.layers.set_visible(&mut self.surface, kind, visible) {
            self.events
                .push(EngineEvent::LayerVisibilityChanged { kind, visible });
        }
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    pub fn esu_clicked(&mut self, id: gazmap_model::EsuId, now_ms: u64) {
        self.selection.toggle_esu(id, now_ms);
        self.selection
            .apply_highlight(&mut self.surface, HighlightKind::Esu);
        self.events
            .push(self.selection.list_event(HighlightKind::Esu));
    }

    pub fn extent_clicked(&mut self, token: &str, now_ms: u64) {
        self.selection.toggle_extent(token, now_ms);
        self.selection
            .apply_highlight(&mut self.surface, HighlightKind::Extent);
        self.events
            .push(self.selection.list_event(HighlightKind::Extent));
    }

    pub fn property_clicked(&mut self, uprn: Uprn, now_ms: u64) {
        match self.selection.toggle_property(uprn, now_ms) {
            Ok(_) => {
                self.selection
                    .apply_highlight(&mut self.surface, HighlightKind::Property);
                self.events
                    .push(self.selection.list_event(HighlightKind::Property));
            }
            Err(notice) => self.events.push(notice),
        }
    }

    /// Rectangle/polygon property selection.
    pub fn properties_selected(&mut self, uprns: &[Uprn]) {
        match self.selection.select_properties(uprns) {
            Ok(_) => {
                self.selection
                    .apply_highlight(&mut self.surface, HighlightKind::Property);
                self.events
                    .push(self.selection.list_event(HighlightKind::Property));
            }
            Err(notice) => self.events.push(notice),
        }
    }

    // -----------------------------------------------------------------------
    // Digitizing
    // -----------------------------------------------------------------------

    /// Point-capture click (property point, street start/end).
    pub fn capture_point(&mut self, mode: PointCaptureMode, point: [f64; 2]) {
        match mode {
            PointCaptureMode::PropertyPoint
            | PointCaptureMode::StreetStart
            | PointCaptureMode::StreetEnd => {
                self.events.push(edit::point_moved(point[0], point[1]));
            }
            _ => {}
        }
    }

    /// Drag of the BLPU point completed.
    pub fn point_dragged(&mut self, x: f64, y: f64) {
        self.events.push(edit::point_moved(x, y));
    }

    /// Live polyline update from the digitizing tool.
    pub fn line_changed(&mut self, parts: &[Vec<[f64; 2]>]) {
        let outcome = edit::line_updated(parts);
        self.surface.set_edit_graphic(Some(EditGraphic {
            rings: parts.to_vec(),
            tool: CreateTool::Polyline,
            valid: outcome.valid,
        }));
        self.events.extend(outcome.events);
    }

    /// Live polygon update; `None` means the polygon was deleted.
    pub fn polygon_changed(&mut self, rings: Option<&[Vec<[f64; 2]>]>) {
        let outcome = edit::polygon_updated(rings);
        self.surface.set_edit_graphic(rings.map(|r| EditGraphic {
            rings: r.to_vec(),
            tool: CreateTool::Polygon,
            valid: outcome.valid,
        }));
        self.events.extend(outcome.events);
    }

    /// Divide-ESU capture click.
    pub fn divide_click(&mut self, snapshot: &Snapshot, point: [f64; 2]) {
        let EditState::Editing(EditTarget::Esu(id)) = self.session.state() else {
            debug!("divide click outside an ESU edit, ignored");
            return;
        };
        let Some(esu) = snapshot.find_esu(id) else {
            warn!(esu = %id, "divide target vanished from snapshot");
            return;
        };
        if let Some(event) = edit::divide_esu(esu, point) {
            self.events.push(event);
        }
    }

    /// Merge the currently selected ESUs into the lead record's geometry.
    pub fn merge_selected_esus(&mut self, snapshot: &Snapshot) {
        let selected: Vec<&gazmap_model::Esu> = self
            .selection
            .esus()
            .filter_map(|id| snapshot.find_esu(id))
            .collect();
        match edit::merge_esus(&selected) {
            Ok(event) => {
                self.events.push(event);
                self.selection.clear_esus();
                self.selection
                    .apply_highlight(&mut self.surface, HighlightKind::Esu);
            }
            Err(notice) => self.events.push(notice),
        }
    }

    /// Merge the currently selected extents; re-renders are suppressed until
    /// the host calls [`Self::complete_extent_merge`].
    pub fn merge_selected_extents(&mut self, snapshot: &Snapshot) {
        let tokens: Vec<String> = self.selection.extents().map(str::to_string).collect();
        let selected: Vec<&gazmap_model::ProvenanceExtent> = snapshot
            .extents
            .iter()
            .filter(|e| tokens.iter().any(|t| t == &e.selection_token()))
            .collect();
        match edit::merge_extents(&selected) {
            Ok(event) => {
                self.extent_merge_in_progress = true;
                self.events.push(EngineEvent::ExtentMergeBegin);
                self.events.push(event);
                self.selection.clear_extents();
                self.selection
                    .apply_highlight(&mut self.surface, HighlightKind::Extent);
            }
            Err(notice) => self.events.push(notice),
        }
    }

    /// The surrounding application finished persisting the extent merge.
    pub fn complete_extent_merge(&mut self) {
        if self.extent_merge_in_progress {
            self.extent_merge_in_progress = false;
            self.events.push(EngineEvent::ExtentMergeEnd);
        }
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    pub fn dispatch_action(
        &mut self,
        action: PopupAction,
        records: &dyn RecordEditingPort,
        rights: &dyn UserRightsPort,
        snapshot: &Snapshot,
    ) {
        let events = self.dispatcher.dispatch(action, records, rights, snapshot);
        self.events.extend(events);
    }

    pub fn resolve_confirmation(&mut self, decision: ConfirmDecision) {
        let events = self.dispatcher.resolve_confirmation(decision);
        self.events.extend(events);
    }

    // -----------------------------------------------------------------------
    // Reference files
    // -----------------------------------------------------------------------

    /// Load a zipped shapefile as a reference layer.
    ///
    /// On failure the notice names the file and the existing layer set is
    /// untouched.
    pub fn load_reference_file(&mut self, title: &str, zip_bytes: &[u8], snappable: bool) {
        match decode_reference_file(title, zip_bytes) {
            Ok(collection) => {
                let layer = ReferenceLayer {
                    index: self.next_reference_index,
                    title: title.to_string(),
                    collection,
                    visible: true,
                    opacity: 1.0,
                    snappable,
                };
                self.next_reference_index += 1;
                let kind = LayerKind::ReferenceFile(layer.index);
                let def = reference_layer_def(&layer);
                if snappable {
                    self.snap_config.esu_refs.push(kind);
                    self.snap_config.blpu_refs.push(kind);
                    self.snap_config.extent_refs.push(kind);
                }
                self.reference_layers.push(layer);
                self.layers.reconcile(&mut self.surface, def);
                self.layers.enforce_order(&mut self.surface);
                self.events.push(EngineEvent::Notice {
                    severity: NoticeSeverity::Info,
                    text: format!("Reference file '{title}' loaded"),
                });
            }
            Err(err) => {
                warn!(%err, title, "reference file rejected");
                self.events.push(EngineEvent::Notice {
                    severity: NoticeSeverity::Warning,
                    text: format!("Reference file '{title}' could not be loaded"),
                });
            }
        }
    }

    /// Unload a previously loaded reference file.
    pub fn unload_reference_file(&mut self, index: u32) {
        let kind = LayerKind::ReferenceFile(index);
        self.reference_layers.retain(|l| l.index != index);
        self.snap_config.esu_refs.retain(|k| *k != kind);
        self.snap_config.blpu_refs.retain(|k| *k != kind);
        self.snap_config.extent_refs.retain(|k| *k != kind);
        self.surface.remove_layer(kind);
        self.layers.enforce_order(&mut self.surface);
    }

    pub fn reference_layers(&self) -> &[ReferenceLayer] {
        &self.reference_layers
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    /// Validate the configured base-map service provider. An unknown
    /// provider is a deployment misconfiguration and surfaces loudly.
    pub fn configure_service_provider(&mut self, provider: &str) -> Result<()> {
        if KNOWN_PROVIDERS.contains(&provider) {
            return Ok(());
        }
        self.events.push(EngineEvent::Notice {
            severity: NoticeSeverity::Blocking,
            text: format!("Unknown map service provider '{provider}'"),
        });
        Err(Error::Configuration(format!(
            "unknown service provider '{provider}'"
        )))
    }

    // -----------------------------------------------------------------------
    // Auxiliary fetch plumbing
    // -----------------------------------------------------------------------

    /// Ids the snapshot references that the search cache cannot resolve.
    ///
    /// The host runs the actual fetches (they are the engine's only async
    /// boundary) and feeds results back through
    /// [`Self::apply_street_fetch`] / [`Self::apply_property_fetch`].
    pub fn pending_lookups(
        &self,
        snapshot: &Snapshot,
        lookup: &dyn crate::ports::LookupPort,
    ) -> (Option<Usrn>, Option<Uprn>) {
        let street = match snapshot.zoom_to {
            Some(crate::snapshot::ZoomTarget::Street(usrn)) if !lookup.street_cached(usrn) => {
                Some(usrn)
            }
            _ => None,
        };
        let property = match snapshot.zoom_to {
            Some(crate::snapshot::ZoomTarget::Property(uprn)) if !lookup.property_cached(uprn) => {
                Some(uprn)
            }
            _ => None,
        };
        (street, property)
    }

    /// Note that a street fetch is in flight; stale responses are dropped.
    pub fn request_street(&mut self, usrn: Usrn) {
        self.requested_street = Some(usrn);
    }

    pub fn request_property(&mut self, uprn: Uprn) {
        self.requested_property = Some(uprn);
    }

    /// Apply a completed street fetch. Returns the record for the host to
    /// merge into its search collections when it is still wanted.
    pub fn apply_street_fetch(
        &mut self,
        usrn: Usrn,
        result: std::result::Result<Option<Street>, RemoteError>,
        rights: &dyn UserRightsPort,
    ) -> Option<Street> {
        if self.requested_street != Some(usrn) {
            debug!(%usrn, "stale street fetch dropped");
            return None;
        }
        self.requested_street = None;
        self.apply_fetch(result, rights)
    }

    pub fn apply_property_fetch(
        &mut self,
        uprn: Uprn,
        result: std::result::Result<Option<Property>, RemoteError>,
        rights: &dyn UserRightsPort,
    ) -> Option<Property> {
        if self.requested_property != Some(uprn) {
            debug!(%uprn, "stale property fetch dropped");
            return None;
        }
        self.requested_property = None;
        self.apply_fetch(result, rights)
    }

    fn apply_fetch<T>(
        &mut self,
        result: std::result::Result<Option<T>, RemoteError>,
        rights: &dyn UserRightsPort,
    ) -> Option<T> {
        match result {
            Ok(Some(record)) => {
                self.events.push(EngineEvent::SearchDataChanged);
                Some(record)
            }
            Ok(None) => None,
            Err(err) if err.is_fatal() => {
                self.events.push(EngineEvent::SessionExpired);
                None
            }
            Err(err) => {
                if rights.verbose_logging() {
                    debug!(%err, "auxiliary fetch failed, continuing without data");
                }
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // Teardown
    // -----------------------------------------------------------------------

    /// Synchronously release the surface and all owned widgets. Idempotent.
    pub fn teardown(&mut self) {
        if !self.destroyed {
            self.surface.destroy();
            self.destroyed = true;
        }
    }
}

impl<S: MapSurface> Drop for MapController<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
