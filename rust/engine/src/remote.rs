// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Auxiliary record fetch client.
//!
//! Resolves a USRN or UPRN not present in the in-memory search cache against
//! the remote API. HTTP 401 becomes a session-expired signal; every other
//! non-2xx outcome is non-fatal and yields "no data", leaving the map
//! rendering whatever was already known.

use gazmap_model::{Property, Street, Uprn, Usrn};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors from the remote API.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// HTTP 401: the session must re-authenticate.
    #[error("session expired")]
    SessionExpired,

    /// Any other non-2xx status; non-fatal, treated as no data.
    #[error("unexpected status {0}")]
    Status(u16),

    /// Transport-level failure; non-fatal, treated as no data.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl RemoteError {
    /// Whether this failure should bubble to the global session handler
    /// rather than degrade to "no data available".
    pub fn is_fatal(&self) -> bool {
        matches!(self, RemoteError::SessionExpired)
    }
}

/// JSON client for the gazetteer API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Fetch one street with its ESUs and ASD rows.
    pub async fn fetch_street(&self, usrn: Usrn) -> Result<Option<Street>, RemoteError> {
        self.fetch_json(&format!("{}/streets/{usrn}", self.base_url))
            .await
    }

    /// Fetch one property with its LPIs.
    pub async fn fetch_property(&self, uprn: Uprn) -> Result<Option<Property>, RemoteError> {
        self.fetch_json(&format!("{}/properties/{uprn}", self.base_url))
            .await
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, RemoteError> {
        let response = self.http.get(url).send().await?;
        match response.status().as_u16() {
            401 => Err(RemoteError::SessionExpired),
            404 => Ok(None),
            status if (200..300).contains(&status) => Ok(Some(response.json::<T>().await?)),
            status => Err(RemoteError::Status(status)),
        }
    }
}
