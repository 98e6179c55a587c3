// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # GazMap Domain Model
//!
//! Gazetteer domain records and codecs built with [nom](https://docs.rs/nom).
//! Everything the synchronization engine knows about streets, properties and
//! their geometry text lives here; this crate has no map knowledge.
//!
//! ## Overview
//!
//! - **Records**: streets with ESUs and ASD overlays, BLPU/LPI properties,
//!   provenance extents, all keyed by typed ids (USRN, UPRN, ...)
//! - **WKT Codec**: tolerant POINT/LINESTRING/POLYGON parsing with
//!   round-trip serialization, floats via
//!   [lexical-core](https://docs.rs/lexical-core)
//! - **Reference Files**: zipped-shapefile decoding into a generic geometry
//!   collection for uploaded background layers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gazmap_model::wkt::{parse_rings, parse_wkt};
//!
//! let rings = parse_rings("LINESTRING (0 0, 10 0, 10 5)").unwrap();
//! assert_eq!(rings[0].len(), 3);
//!
//! // Blank or malformed geometry text never panics
//! assert!(parse_wkt("").is_none());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: enable serialization support for the domain records

pub mod archive;
pub mod asd;
pub mod codes;
pub mod error;
pub mod extent;
pub mod ids;
pub mod property;
pub mod shapefile;
pub mod street;
pub mod wkt;

pub use archive::{extract_member, ArchiveMember};
pub use asd::{AsdKind, AsdRecord};
pub use codes::{title_case, ChangeFlag, Jurisdiction, Language};
pub use error::{Error, Result};
pub use extent::{ProvenanceCode, ProvenanceExtent};
pub use ids::{EsuId, ExtentKey, Uprn, Usrn};
pub use property::{nesting_level, LogicalStatus, Lpi, Property, MAX_CHILD_NESTING};
pub use shapefile::{decode_shapefile, GeometryCollection, RefShape};
pub use street::{Esu, Street, StreetDescriptor, StreetRecordType, StreetState};
pub use wkt::{parse_rings, parse_wkt, WktGeometry};
