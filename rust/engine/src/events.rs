// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound events: the engine's only mutation path back into the
//! surrounding application.

use crate::layers::LayerKind;
use crate::snapshot::PointCaptureMode;
use gazmap_model::AsdKind;

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Info,
    Warning,
    /// Blocks the workflow until acknowledged (validation failures,
    /// configuration errors).
    Blocking,
}

/// A highlightable record collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightKind {
    Street,
    Esu,
    BackgroundEsu,
    UnassignedEsu,
    Asd(AsdKind),
    Property,
    SelectProperty,
    Extent,
}

impl HighlightKind {
    /// The live layer this collection's features are queried from.
    pub fn layer(self) -> LayerKind {
        match self {
            HighlightKind::Street | HighlightKind::Esu => LayerKind::Street,
            HighlightKind::BackgroundEsu => LayerKind::BackgroundStreets,
            HighlightKind::UnassignedEsu => LayerKind::UnassignedEsus,
            HighlightKind::Asd(kind) => LayerKind::Asd(kind),
            HighlightKind::Property => LayerKind::Property,
            HighlightKind::SelectProperty => LayerKind::BackgroundProperties,
            HighlightKind::Extent => LayerKind::Extent,
        }
    }
}

/// Events drained by the host after each engine call.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A point drag completed; coordinates rounded to 4 decimal places.
    SetCoordinate { x: f64, y: f64 },
    /// A valid polyline was digitized.
    SetLineGeometry { wkt: String },
    /// A valid polygon was digitized; `None` means explicitly cleared.
    SetPolygonGeometry { wkt: Option<String> },
    /// An ESU was divided into two pieces.
    EsuDivided { first_wkt: String, second_wkt: String },
    LayerVisibilityChanged { kind: LayerKind, visible: bool },
    /// Selection changed for a record collection; the host mirrors it in
    /// its list UI.
    HighlightListItem { kind: HighlightKind, ids: Vec<String> },
    /// Provenance merge started; re-renders are suppressed until the host
    /// completes the merge.
    ExtentMergeBegin,
    ExtentMergeEnd,
    CreateToolActivated { active: bool },
    /// The auxiliary fetch augmented the search collections.
    SearchDataChanged,
    NavigateTo { route: String },
    /// The host should switch its point-capture mode.
    PointCaptureRequested { mode: PointCaptureMode },
    Notice { severity: NoticeSeverity, text: String },
    /// A popup action is parked behind the unsaved-changes gate; the host
    /// must ask the user and call back with the decision.
    SaveConfirmationRequested,
    /// HTTP 401 from the remote API; forces re-authentication.
    SessionExpired,
}
