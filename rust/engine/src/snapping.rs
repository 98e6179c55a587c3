// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snap-layer resolution per edit-target family.

use crate::layers::LayerKind;
use crate::snapshot::EditTarget;
use gazmap_model::AsdKind;
use smallvec::SmallVec;

/// User-configured reference layers participating in snapping, per family.
#[derive(Debug, Clone, Default)]
pub struct SnapConfig {
    pub esu_refs: Vec<LayerKind>,
    pub blpu_refs: Vec<LayerKind>,
    pub extent_refs: Vec<LayerKind>,
}

/// Ordered snap-layer list for the current edit target.
///
/// Pure table lookup; an empty list means nothing is being edited and the
/// digitizing tool snaps to nothing.
pub fn snap_layers_for(
    target: Option<&EditTarget>,
    config: &SnapConfig,
) -> SmallVec<[LayerKind; 8]> {
    let mut layers: SmallVec<[LayerKind; 8]> = SmallVec::new();
    let Some(target) = target else {
        return layers;
    };

    match target {
        EditTarget::Esu(_) => {
            layers.push(LayerKind::EditOverlay);
            layers.push(LayerKind::BackgroundStreets);
            layers.push(LayerKind::UnassignedEsus);
            layers.push(LayerKind::Street);
            layers.push(LayerKind::LlpgStreet);
            layers.extend(config.esu_refs.iter().copied());
        }
        EditTarget::Blpu(_) => {
            layers.push(LayerKind::BackgroundStreets);
            layers.push(LayerKind::UnassignedEsus);
            layers.push(LayerKind::BackgroundProvenance);
            layers.push(LayerKind::BackgroundProperties);
            layers.push(LayerKind::Property);
            layers.extend(config.blpu_refs.iter().copied());
        }
        EditTarget::Extent(_) => {
            layers.push(LayerKind::EditOverlay);
            layers.push(LayerKind::Extent);
            layers.extend(config.extent_refs.iter().copied());
        }
        EditTarget::Asd { kind, .. } => {
            layers.push(LayerKind::EditOverlay);
            for sibling in AsdKind::ALL {
                if sibling != *kind {
                    layers.push(LayerKind::Asd(sibling));
                }
            }
            layers.push(LayerKind::Street);
            layers.extend(config.esu_refs.iter().copied());
        }
    }
    layers
}
