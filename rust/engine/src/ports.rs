// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capability ports injected at the composition root.
//!
//! The engine depends on these interfaces, never on the surrounding
//! application's concrete stores.

use gazmap_model::{Uprn, Usrn};

/// Rights of the acting user.
pub trait UserRightsPort {
    fn can_edit_street(&self) -> bool;
    fn can_edit_property(&self) -> bool;
    fn can_edit_asd(&self) -> bool;
    /// Gate for transient-failure logging; fetch failures are never logged
    /// unconditionally to end users.
    fn verbose_logging(&self) -> bool;
}

/// The surrounding record editor's unsaved-changes lifecycle.
pub trait RecordEditingPort {
    fn has_unsaved_changes(&self) -> bool;
}

/// The in-memory search cache of the surrounding application.
pub trait LookupPort {
    fn street_cached(&self, usrn: Usrn) -> bool;
    fn property_cached(&self, uprn: Uprn) -> bool;
}

/// The user's decision on the save/discard confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmDecision {
    /// Save the open record, then run the parked action.
    SaveAndContinue,
    /// Discard changes, then run the parked action.
    Discard,
    /// Keep editing; the parked action is dropped.
    Cancel,
}
