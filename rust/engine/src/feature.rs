// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Renderable layer content: features, field schemas, renderers, popups.
//!
//! The projector emits these; the map surface consumes them. Attribute
//! values are `serde_json::Value` so the surface can show them verbatim in
//! attribute tables and popups.

use crate::actions::ActionId;
use crate::layers::LayerKind;
use crate::symbology::Style;
use serde_json::{Map, Value};

/// Geometry of one renderable feature.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureGeometry {
    Point([f64; 2]),
    /// One or more polyline parts.
    Line(Vec<Vec<[f64; 2]>>),
    /// Outer ring plus holes.
    Polygon(Vec<Vec<[f64; 2]>>),
}

/// One feature: geometry plus a flat attribute row.
#[derive(Debug, Clone)]
pub struct Feature {
    /// Identity used for highlight queries and de-duplication.
    pub id: String,
    pub geometry: FeatureGeometry,
    pub attributes: Map<String, Value>,
}

impl Feature {
    pub fn new(id: impl Into<String>, geometry: FeatureGeometry) -> Self {
        Self {
            id: id.into(),
            geometry,
            attributes: Map::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }
}

/// Static field schema entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub alias: &'static str,
}

/// Maps one symbol-code value to its style.
#[derive(Debug, Clone)]
pub struct SymbolEntry {
    pub key: String,
    pub style: Style,
}

/// Renderer definition: features are styled by looking their symbol code up
/// in the symbol table. The symbol code is a renderer discriminant only and
/// is never round-tripped to the API.
#[derive(Debug, Clone)]
pub struct Renderer {
    pub discriminant_field: &'static str,
    pub symbols: Vec<SymbolEntry>,
    pub default_style: Style,
}

/// Popup configuration for a layer.
#[derive(Debug, Clone)]
pub struct PopupSpec {
    pub title_field: &'static str,
    pub fields: Vec<FieldDef>,
    pub actions: Vec<ActionId>,
}

/// Everything needed to (re)construct one map layer.
#[derive(Debug, Clone)]
pub struct LayerDef {
    pub kind: LayerKind,
    pub features: Vec<Feature>,
    pub fields: Vec<FieldDef>,
    pub renderer: Renderer,
    pub popup: Option<PopupSpec>,
    /// Configured target opacity for the layer.
    pub opacity: f64,
    /// Point clustering; never set on layers used as snap targets.
    pub clustered: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_attributes_accumulate() {
        let feature = Feature::new("1001", FeatureGeometry::Point([431813.5, 289231.25]))
            .with_attr("usrn", 1001)
            .with_attr("description", "High Street");
        assert_eq!(feature.attributes["usrn"], 1001);
        assert_eq!(feature.attributes["description"], "High Street");
    }
}
