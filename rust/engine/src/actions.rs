// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Popup action dispatch through the unsaved-changes gate.
//!
//! Every record-open action from a map popup runs through the same path:
//! permission check, child-nesting cap, then the unsaved-changes gate. An
//! action arriving while the open record has unsaved changes is parked until
//! the user decides; cancel drops it.

use crate::events::{EngineEvent, NoticeSeverity};
use crate::ports::{ConfirmDecision, RecordEditingPort, UserRightsPort};
use crate::snapshot::{PointCaptureMode, Snapshot};
use gazmap_model::{nesting_level, AsdKind, EsuId, Uprn, Usrn, MAX_CHILD_NESTING};
use tracing::debug;

/// Popup action identifiers, as referenced by layer popup specs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionId {
    OpenStreetRecord,
    OpenPropertyRecord,
    AddProperty,
    AddRangeProperties,
    AddChild,
    AddRangeChildren,
    DivideEsu,
    AssignEsu,
    StreetStreetView,
    PropertyStreetView,
    OpenAsdRecord(AsdKind),
}

/// A clicked popup action with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum PopupAction {
    OpenStreetRecord(Usrn),
    OpenPropertyRecord(Uprn),
    AddProperty(Usrn),
    AddRangeProperties(Usrn),
    AddChild(Uprn),
    AddRangeChildren(Uprn),
    DivideEsu(EsuId),
    AssignEsu(EsuId),
    StreetStreetView([f64; 2]),
    PropertyStreetView([f64; 2]),
    OpenAsdRecord { kind: AsdKind, usrn: Usrn, seq: u32 },
}

impl PopupAction {
    /// Whether the acting user may run this action at all.
    fn permitted(&self, rights: &dyn UserRightsPort) -> bool {
        match self {
            PopupAction::AddProperty(_)
            | PopupAction::AddRangeProperties(_)
            | PopupAction::AddChild(_)
            | PopupAction::AddRangeChildren(_) => rights.can_edit_property(),
            PopupAction::DivideEsu(_) | PopupAction::AssignEsu(_) => rights.can_edit_street(),
            _ => true,
        }
    }
}

/// Routes popup actions into the surrounding application.
#[derive(Debug, Default)]
pub struct ActionDispatcher {
    pending: Option<PopupAction>,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Dispatch a popup action click.
    pub fn dispatch(
        &mut self,
        action: PopupAction,
        records: &dyn RecordEditingPort,
        rights: &dyn UserRightsPort,
        snapshot: &Snapshot,
    ) -> Vec<EngineEvent> {
        if !action.permitted(rights) {
            debug!(?action, "action refused, missing edit right");
            return vec![EngineEvent::Notice {
                severity: NoticeSeverity::Warning,
                text: "You do not have permission to perform this action".to_string(),
            }];
        }

        if let PopupAction::AddChild(parent) | PopupAction::AddRangeChildren(parent) = &action {
            let level = nesting_level(*parent, &snapshot.properties);
            if level + 1 >= MAX_CHILD_NESTING {
                return vec![EngineEvent::Notice {
                    severity: NoticeSeverity::Blocking,
                    text: format!(
                        "Properties cannot be nested more than {MAX_CHILD_NESTING} levels deep"
                    ),
                }];
            }
        }

        if records.has_unsaved_changes() {
            debug!(?action, "action parked behind unsaved-changes gate");
            self.pending = Some(action);
            return vec![EngineEvent::SaveConfirmationRequested];
        }

        run(action)
    }

    /// Apply the user's save/discard decision to the parked action.
    pub fn resolve_confirmation(&mut self, decision: ConfirmDecision) -> Vec<EngineEvent> {
        let Some(action) = self.pending.take() else {
            return Vec::new();
        };
        match decision {
            ConfirmDecision::SaveAndContinue | ConfirmDecision::Discard => run(action),
            ConfirmDecision::Cancel => {
                debug!(?action, "parked action dropped");
                Vec::new()
            }
        }
    }
}

/// Run an action that passed all gates.
fn run(action: PopupAction) -> Vec<EngineEvent> {
    match action {
        PopupAction::OpenStreetRecord(usrn) => vec![EngineEvent::NavigateTo {
            route: format!("/street/{usrn}"),
        }],
        PopupAction::OpenPropertyRecord(uprn) => vec![EngineEvent::NavigateTo {
            route: format!("/property/{uprn}"),
        }],
        PopupAction::AddProperty(usrn) => vec![EngineEvent::NavigateTo {
            route: format!("/property/create/{usrn}"),
        }],
        PopupAction::AddRangeProperties(usrn) => vec![EngineEvent::NavigateTo {
            route: format!("/property/create-range/{usrn}"),
        }],
        PopupAction::AddChild(parent) => vec![EngineEvent::NavigateTo {
            route: format!("/property/create-child/{parent}"),
        }],
        PopupAction::AddRangeChildren(parent) => vec![EngineEvent::NavigateTo {
            route: format!("/property/create-child-range/{parent}"),
        }],
        PopupAction::DivideEsu(_) => vec![EngineEvent::PointCaptureRequested {
            mode: PointCaptureMode::DivideEsu,
        }],
        PopupAction::AssignEsu(_) => vec![EngineEvent::PointCaptureRequested {
            mode: PointCaptureMode::AssignEsu,
        }],
        PopupAction::StreetStreetView([x, y]) | PopupAction::PropertyStreetView([x, y]) => {
            vec![EngineEvent::NavigateTo {
                route: format!("/street-view/{x}/{y}"),
            }]
        }
        PopupAction::OpenAsdRecord { kind, usrn, seq } => vec![EngineEvent::NavigateTo {
            route: format!("/street/{usrn}/asd/{}/{seq}", kind.code()),
        }],
    }
}
