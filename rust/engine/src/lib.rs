// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # GazMap Engine
//!
//! The map/editing synchronization engine: projects gazetteer domain
//! collections into named map layers, reconciles them against a live map
//! surface, and runs the digitizing workflow (create, reshape, divide,
//! merge, assign) with its selection, snapping and permission rules.
//!
//! ## Overview
//!
//! - **Projection** ([`project`]): pure snapshot-to-layer derivation with
//!   background/foreground identity de-duplication
//! - **Lifecycle** ([`layers::LayerManager`]): layer swap, remembered
//!   visibility, fade-in, z-order enforcement
//! - **Edit session** ([`session::EditSession`]): the Browsing/Editing state
//!   machine with dim/restore side effects and the create-tool guard
//! - **Edit handlers** ([`edit`]): point/line/polygon updates, divide,
//!   merge, with validation gating
//! - **Selection** ([`selection::SelectionEngine`]): capped accumulate-
//!   toggle sets with duplicate-event debouncing
//! - **Controller** ([`controller::MapController`]): the single render/
//!   update path tying it all together over a [`surface::MapSurface`]
//!
//! The engine is synchronous and single-threaded; the only async boundary
//! is the auxiliary record fetch client ([`remote::ApiClient`]).

pub mod actions;
pub mod controller;
pub mod edit;
pub mod error;
pub mod events;
pub mod feature;
pub mod layers;
pub mod ports;
pub mod project;
pub mod reference;
pub mod remote;
pub mod selection;
pub mod session;
pub mod snapping;
pub mod snapshot;
pub mod surface;
pub mod symbology;

pub use actions::{ActionDispatcher, ActionId, PopupAction};
pub use controller::MapController;
pub use error::{Error, Result};
pub use events::{EngineEvent, HighlightKind, NoticeSeverity};
pub use feature::{Feature, FeatureGeometry, FieldDef, LayerDef, PopupSpec, Renderer};
pub use layers::{LayerKind, LayerManager};
pub use ports::{ConfirmDecision, LookupPort, RecordEditingPort, UserRightsPort};
pub use project::{project, Projection};
pub use reference::{decode_reference_file, ReferenceLayer};
pub use remote::{ApiClient, RemoteError};
pub use selection::{
    should_apply_toggle, DebounceState, SelectionEngine, ToggleOutcome, DEBOUNCE_WINDOW_MS,
    MAX_PROPERTY_SELECTION,
};
pub use session::{EditSession, EditState};
pub use snapping::{snap_layers_for, SnapConfig};
pub use snapshot::{EditFamily, EditTarget, HighlightRequest, PointCaptureMode, Snapshot, ZoomTarget};
pub use surface::{CreateTool, EditGraphic, MapSurface};
