// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed gazetteer identifiers.
//!
//! Every record family gets its own newtype so a USRN can never be passed
//! where a UPRN is expected. New (not yet persisted) records use ids <= 0.

use std::fmt;

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub i64);

        impl $name {
            /// Raw numeric value.
            #[inline]
            pub fn value(self) -> i64 {
                self.0
            }

            /// Ids at or below zero mark records not yet persisted by the API.
            #[inline]
            pub fn is_provisional(self) -> bool {
                self.0 <= 0
            }
        }

        impl From<i64> for $name {
            fn from(v: i64) -> Self {
                Self(v)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype! {
    /// Unique Street Reference Number.
    Usrn
}

id_newtype! {
    /// Unique Property Reference Number.
    Uprn
}

id_newtype! {
    /// Elementary Street Unit id.
    EsuId
}

id_newtype! {
    /// Local primary key of a provenance extent row.
    ExtentKey
}
